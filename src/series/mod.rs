//! Implements the access to openPMD time series

mod json_series;
mod memory_series;
mod time_series;
pub use crate::series::json_series::*;
pub use crate::series::memory_series::*;
pub use crate::series::time_series::*;
