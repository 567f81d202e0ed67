//! Request extractors.

mod body;

pub use body::JsonOrForm;
