//! Utility Module
//!
//! - [`Timer`]: frame timer driving [`Dynamics::update`](crate::Dynamics::update)

pub mod time;

pub use time::Timer;
