//! Makes available common structures needed to convert openPMD data
//!
//! You may write `use opmd2vtk::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{ConversionConfig, FieldOptions, Geometry, Selection, SpeciesOptions, VtkFormat, DEFAULT_OUT_DIR};
pub use crate::convert::{Mesh, Opmd2Vtk};
pub use crate::series::{FieldData, FieldGrid, FieldMetadata, JsonSeries, MemorySeries, TimeSeries};
