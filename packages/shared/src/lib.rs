//! Utilities shared by the Kyodo packages.

pub mod logger;
pub mod time;
