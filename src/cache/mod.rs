//! Local image cache

pub mod image_cache;

pub use image_cache::{CacheStats, ImageCache};
