use super::{FieldData, FieldMetadata, TimeSeries};
use crate::StrError;
use std::collections::{BTreeSet, HashMap};

/// Implements a time series held in memory
///
/// Useful to convert data produced by other means (e.g., in-situ or synthetic data).
///
/// # Examples
///
/// ```
/// use ndarray::ArrayD;
/// use opmd2vtk::base::Geometry;
/// use opmd2vtk::series::{FieldData, FieldGrid, FieldMetadata, MemorySeries, TimeSeries};
///
/// let mut series = MemorySeries::new();
/// series.add_field("rho", FieldMetadata::scalar(Geometry::Cartesian));
/// let grid = FieldGrid::new(&["x", "y", "z"], &[2, 2, 2], &[0.0; 3], &[1.0; 3]).unwrap();
/// let values = ArrayD::from_elem(vec![2, 2, 2], 1.0);
/// series.set_field_data("rho", None, 0, FieldData { values, grid }).unwrap();
/// assert_eq!(series.avail_fields(), &["rho"]);
/// assert_eq!(series.iterations(), &[0]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemorySeries {
    /// Holds the fields and their metadata, in insertion order
    fields: Vec<(String, FieldMetadata)>,

    /// Holds the species names, in insertion order
    species: Vec<String>,

    /// Maps (field, component, iteration) to data; the component is empty for scalars
    field_data: HashMap<(String, String, u64), FieldData>,

    /// Maps (species, quantity, iteration) to per-particle values
    particle_data: HashMap<(String, String, u64), Vec<f64>>,

    /// Holds all iterations that received data
    iterations: BTreeSet<u64>,
}

impl MemorySeries {
    /// Allocates an empty series
    pub fn new() -> Self {
        MemorySeries::default()
    }

    /// Registers a field (or replaces its metadata)
    pub fn add_field(&mut self, field: &str, metadata: FieldMetadata) -> &mut Self {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some(entry) => entry.1 = metadata,
            None => self.fields.push((field.to_string(), metadata)),
        }
        self
    }

    /// Stores the data of a registered field
    ///
    /// # Input
    ///
    /// * `component` -- the record component or None for scalars
    pub fn set_field_data(
        &mut self,
        field: &str,
        component: Option<&str>,
        iteration: u64,
        data: FieldData,
    ) -> Result<&mut Self, StrError> {
        if !self.fields.iter().any(|(name, _)| name == field) {
            return Err("field must be registered before setting its data");
        }
        data.check_shape()?;
        let key = (field.to_string(), component.unwrap_or("").to_string(), iteration);
        self.field_data.insert(key, data);
        self.iterations.insert(iteration);
        Ok(self)
    }

    /// Registers a particle species
    pub fn add_species(&mut self, species: &str) -> &mut Self {
        if !self.species.iter().any(|s| s == species) {
            self.species.push(species.to_string());
        }
        self
    }

    /// Stores the per-particle values of a quantity of a registered species
    pub fn set_particle_data(
        &mut self,
        species: &str,
        quantity: &str,
        iteration: u64,
        values: &[f64],
    ) -> Result<&mut Self, StrError> {
        if !self.species.iter().any(|s| s == species) {
            return Err("species must be registered before setting its data");
        }
        let key = (species.to_string(), quantity.to_string(), iteration);
        self.particle_data.insert(key, values.to_vec());
        self.iterations.insert(iteration);
        Ok(self)
    }
}

impl TimeSeries for MemorySeries {
    fn iterations(&self) -> Vec<u64> {
        self.iterations.iter().copied().collect()
    }

    fn avail_fields(&self) -> Vec<String> {
        self.fields.iter().map(|(name, _)| name.clone()).collect()
    }

    fn avail_species(&self) -> Vec<String> {
        self.species.clone()
    }

    fn field_metadata(&self, field: &str) -> Result<FieldMetadata, StrError> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, metadata)| metadata.clone())
            .ok_or("field is not available")
    }

    fn get_field(&self, field: &str, component: Option<&str>, iteration: u64) -> Result<FieldData, StrError> {
        let key = (field.to_string(), component.unwrap_or("").to_string(), iteration);
        self.field_data.get(&key).cloned().ok_or("field data is not available")
    }

    fn get_particle(&self, species: &str, quantity: &str, iteration: u64) -> Result<Vec<f64>, StrError> {
        let key = (species.to_string(), quantity.to_string(), iteration);
        self.particle_data
            .get(&key)
            .cloned()
            .ok_or("particle quantity is not available")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::MemorySeries;
    use crate::base::Geometry;
    use crate::series::{FieldData, FieldGrid, FieldMetadata, TimeSeries};
    use ndarray::ArrayD;

    fn sample_data(shape: &[usize]) -> FieldData {
        let grid = FieldGrid::new(&["x", "z"], shape, &[0.0, 0.0], &[1.0, 1.0]).unwrap();
        FieldData {
            values: ArrayD::zeros(shape.to_vec()),
            grid,
        }
    }

    #[test]
    fn set_data_captures_errors() {
        let mut series = MemorySeries::new();
        assert_eq!(
            series.set_field_data("rho", None, 0, sample_data(&[2, 3])).err(),
            Some("field must be registered before setting its data")
        );
        series.add_field("rho", FieldMetadata::scalar(Geometry::Cartesian));
        let mut wrong = sample_data(&[2, 3]);
        wrong.values = ArrayD::zeros(vec![3, 2]);
        assert_eq!(
            series.set_field_data("rho", None, 0, wrong).err(),
            Some("field values must have the shape of the grid")
        );
        assert_eq!(
            series.set_particle_data("electrons", "x", 0, &[1.0]).err(),
            Some("species must be registered before setting its data")
        );
    }

    #[test]
    fn memory_series_works() {
        let mut series = MemorySeries::new();
        series
            .add_field("E", FieldMetadata::vector(Geometry::Cartesian, &["x", "y", "z"]))
            .add_field("rho", FieldMetadata::scalar(Geometry::Cartesian))
            .add_species("electrons")
            .add_species("electrons");
        series.set_field_data("rho", None, 20, sample_data(&[2, 3])).unwrap();
        series.set_field_data("E", Some("x"), 10, sample_data(&[2, 3])).unwrap();
        series.set_particle_data("electrons", "w", 10, &[1.0, 2.0]).unwrap();

        assert_eq!(series.iterations(), &[10, 20]);
        assert_eq!(series.avail_fields(), &["E", "rho"]);
        assert_eq!(series.avail_species(), &["electrons"]);
        assert_eq!(series.field_metadata("B").err(), Some("field is not available"));
        assert_eq!(series.get_field("rho", None, 20).unwrap().values.shape(), &[2, 3]);
        assert_eq!(series.get_field("rho", None, 10).err(), Some("field data is not available"));
        assert_eq!(series.get_particle("electrons", "w", 10).unwrap(), &[1.0, 2.0]);
        assert_eq!(
            series.get_particle("electrons", "ux", 10).err(),
            Some("particle quantity is not available")
        );
        // the grid of a vector field comes from its first component
        assert_eq!(series.field_grid("E", 10).unwrap().shape, &[2, 3]);
    }
}
