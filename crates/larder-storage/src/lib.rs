//! larder-storage
//!
//! Local persistence for recipes and uploaded images, and the recipe store
//! that owns the in-memory collection.

pub mod error;
pub mod images;
pub mod memory;
pub mod recipes;
pub mod store;
