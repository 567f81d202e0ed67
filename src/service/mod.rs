//! Service layer module.
//!
//! Business rules for the exercise tracker and the URL shortener.

pub mod shortener;
pub mod tracker;

pub use shortener::ShortenerService;
pub use tracker::TrackerService;
