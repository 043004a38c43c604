//! Implements the constants, enums, file naming, and options of the converter

mod constants;
mod enums;
mod filepath;
mod options;
pub use crate::base::constants::*;
pub use crate::base::enums::*;
pub use crate::base::filepath::*;
pub use crate::base::options::*;
