//! Asset loading for the item list and scene configuration.
//!
//! Both files are JSON assets; the scene starts once they have loaded or
//! failed, falling back to defaults for a missing configuration.

/// Item manifest asset and the system that builds the scene from it.
pub mod items_loader;
