//! Opmd2vtk converts openPMD time series to VTK files
//!
//! Fields are written on structured meshes: regular grids for Cartesian
//! geometries and cylindrical grids (with an artificial azimuthal sweep) for
//! thetaMode geometries. Particle species are written as point clouds.
//!
//! # Example
//!
//! ```
//! use opmd2vtk::prelude::*;
//! use opmd2vtk::StrError;
//! use ndarray::ArrayD;
//!
//! fn main() -> Result<(), StrError> {
//!     let grid = FieldGrid::new(&["x", "y", "z"], &[4, 4, 4], &[0.0; 3], &[1.0; 3])?;
//!     let values = ArrayD::from_elem(vec![4, 4, 4], 1.0);
//!     let mut series = MemorySeries::new();
//!     series.add_field("rho", FieldMetadata::scalar(Geometry::Cartesian));
//!     series.set_field_data("rho", None, 3, FieldData { values, grid })?;
//!
//!     let out_dir = std::env::temp_dir().join("opmd2vtk_doc_example");
//!     let converter = Opmd2Vtk::new(&series, &out_dir)?;
//!     let paths = converter.write_fields_vtk(3, &FieldOptions::new())?;
//!     assert!(paths[0].ends_with("vtk_fields_0000003.vtk"));
//!     Ok(())
//! }
//! ```

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod convert;
pub mod prelude;
pub mod series;
