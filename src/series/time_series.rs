use crate::base::{FieldType, Geometry};
use crate::StrError;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

/// Holds the metadata of a field record
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FieldMetadata {
    /// Type tag (scalar, vector, or other)
    pub field_type: FieldType,

    /// Geometry of the mesh record
    pub geometry: Geometry,

    /// Names of the record components (empty for scalars)
    ///
    /// Examples: `["x", "y", "z"]` (cartesian) or `["r", "t", "z"]` (thetaMode)
    pub components: Vec<String>,
}

impl FieldMetadata {
    /// Allocates the metadata of a Cartesian scalar field
    pub fn scalar(geometry: Geometry) -> Self {
        FieldMetadata {
            field_type: FieldType::Scalar,
            geometry,
            components: Vec::new(),
        }
    }

    /// Allocates the metadata of a vector field
    pub fn vector(geometry: Geometry, components: &[&str]) -> Self {
        FieldMetadata {
            field_type: FieldType::Vector,
            geometry,
            components: components.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Returns true if the record holds the given component
    pub fn has_component(&self, component: &str) -> bool {
        self.components.iter().any(|c| c == component)
    }
}

/// Holds the sampling lattice of a field, in SI units
///
/// For thetaMode, the axes are (r, z) and the data array has an extra leading axis
/// with the 2·Nm-1 azimuthal mode coefficients.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FieldGrid {
    /// Labels of the axes in the order of the data array, e.g., `["x", "y", "z"]` or `["r", "z"]`
    pub axis_labels: Vec<String>,

    /// Number of samples along each axis
    pub shape: Vec<usize>,

    /// Coordinate of the first sample along each axis
    pub origin: Vec<f64>,

    /// Distance between consecutive samples along each axis
    pub spacing: Vec<f64>,
}

impl FieldGrid {
    /// Allocates a new instance, checking the consistency of the axes
    pub fn new(axis_labels: &[&str], shape: &[usize], origin: &[f64], spacing: &[f64]) -> Result<Self, StrError> {
        let ndim = axis_labels.len();
        if ndim < 1 {
            return Err("grid must have at least one axis");
        }
        if shape.len() != ndim || origin.len() != ndim || spacing.len() != ndim {
            return Err("grid shape, origin, and spacing must match the number of axes");
        }
        Ok(FieldGrid {
            axis_labels: axis_labels.iter().map(|l| l.to_string()).collect(),
            shape: shape.to_vec(),
            origin: origin.to_vec(),
            spacing: spacing.to_vec(),
        })
    }

    /// Returns the index of the axis with the given label
    pub fn axis(&self, label: &str) -> Option<usize> {
        self.axis_labels.iter().position(|l| l == label)
    }

    /// Returns the total number of samples
    pub fn num_samples(&self) -> usize {
        self.shape.iter().product()
    }
}

/// Holds the raw data of a field (or field component) at an iteration
#[derive(Clone, Debug)]
pub struct FieldData {
    /// Values in SI units
    pub values: ArrayD<f64>,

    /// Sampling lattice of the values
    pub grid: FieldGrid,
}

impl FieldData {
    /// Checks that the values are sampled on the grid
    ///
    /// The values may have one extra leading axis (azimuthal modes of thetaMode fields).
    pub fn check_shape(&self) -> Result<(), StrError> {
        let shape = self.values.shape();
        let ndim = self.grid.shape.len();
        if shape.len() < ndim || shape.len() > ndim + 1 || shape[(shape.len() - ndim)..] != self.grid.shape[..] {
            return Err("field values must have the shape of the grid");
        }
        Ok(())
    }
}

/// Defines the interface to an openPMD time series
pub trait TimeSeries {
    /// Returns the available iterations, in ascending order
    fn iterations(&self) -> Vec<u64>;

    /// Returns the names of the available fields
    fn avail_fields(&self) -> Vec<String>;

    /// Returns the names of the available particle species
    fn avail_species(&self) -> Vec<String>;

    /// Returns the metadata of a field
    fn field_metadata(&self, field: &str) -> Result<FieldMetadata, StrError>;

    /// Returns the data of a field
    ///
    /// # Input
    ///
    /// * `component` -- the record component (e.g., "x" or "r") or None for scalars
    fn get_field(&self, field: &str, component: Option<&str>, iteration: u64) -> Result<FieldData, StrError>;

    /// Returns the per-particle values of a quantity, e.g., "x", "ux", "w"
    fn get_particle(&self, species: &str, quantity: &str, iteration: u64) -> Result<Vec<f64>, StrError>;

    /// Returns the sampling lattice of a field
    fn field_grid(&self, field: &str, iteration: u64) -> Result<FieldGrid, StrError> {
        let metadata = self.field_metadata(field)?;
        let component = metadata.components.first().map(|c| c.as_str());
        Ok(self.get_field(field, component, iteration)?.grid)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{FieldGrid, FieldMetadata};
    use crate::base::{FieldType, Geometry};

    #[test]
    fn field_grid_captures_errors() {
        assert_eq!(
            FieldGrid::new(&[], &[], &[], &[]).err(),
            Some("grid must have at least one axis")
        );
        assert_eq!(
            FieldGrid::new(&["x", "z"], &[2], &[0.0, 0.0], &[1.0, 1.0]).err(),
            Some("grid shape, origin, and spacing must match the number of axes")
        );
    }

    #[test]
    fn field_grid_works() {
        let grid = FieldGrid::new(&["r", "z"], &[3, 5], &[0.0, -1.0], &[0.1, 0.2]).unwrap();
        assert_eq!(grid.axis("z"), Some(1));
        assert_eq!(grid.axis("x"), None);
        assert_eq!(grid.num_samples(), 15);
    }

    #[test]
    fn field_metadata_works() {
        let meta = FieldMetadata::vector(Geometry::ThetaMode, &["r", "t", "z"]);
        assert_eq!(meta.field_type, FieldType::Vector);
        assert!(meta.has_component("t"));
        assert!(!meta.has_component("x"));
        let meta = FieldMetadata::scalar(Geometry::Cartesian);
        assert_eq!(meta.field_type, FieldType::Scalar);
        assert_eq!(meta.components.len(), 0);
    }
}
