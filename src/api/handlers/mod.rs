//! Request handlers.

pub mod health;
pub mod shorturl;
pub mod tracker;
