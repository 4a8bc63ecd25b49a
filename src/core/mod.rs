//! Core types and constants for the device tracker

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
