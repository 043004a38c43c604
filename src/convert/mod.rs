//! Implements the conversion of fields and particle species to VTK files

mod converter;
mod field_artifact;
mod mesh;
mod species_artifact;
mod vtk_file;
pub use crate::convert::converter::*;
pub use crate::convert::field_artifact::*;
pub use crate::convert::mesh::*;
pub use crate::convert::species_artifact::*;
