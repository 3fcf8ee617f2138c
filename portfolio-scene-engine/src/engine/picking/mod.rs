//! Ray casting against scene objects.

pub mod picker;
pub mod ray;

pub use picker::{Hit, pick, pick_at};
pub use ray::Ray;
