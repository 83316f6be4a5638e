//! Type definitions for the price estimation service

pub mod city;
pub mod estimate;
pub mod input;

pub use city::City;
pub use estimate::{EstimateResponse, EstimateStatus};
pub use input::RawInput;
