//! Presentation geometry
//!
//! Turns a frame snapshot into vector strokes. Drawing them is up to the host.

pub mod shapes;

pub use shapes::{DisplayList, Dot, Segment, Transform, asteroid_outline};
