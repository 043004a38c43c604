use crate::base::SpeciesOptions;
use crate::series::TimeSeries;
use crate::StrError;
use log::debug;
use std::collections::HashMap;
use vtkio::model::{
    Attribute, Attributes, DataArrayBase, DataSet, ElementType, IOBuffer, Piece, PolyDataPiece, VertexNumbers,
};

/// Holds the particles of a species as a point cloud with per-particle values
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesArtifact {
    /// Particle positions
    pub points: Vec<[f64; 3]>,

    /// Named per-particle values, in the order of the requested scalars
    pub scalars: Vec<(String, Vec<f64>)>,
}

impl SpeciesArtifact {
    /// Reads and filters the particles of a species
    ///
    /// # Input
    ///
    /// * `series` -- the time series
    /// * `species` -- the species name
    /// * `iteration` -- the iteration
    /// * `options` -- the requested scalars, the selection, and the fixed z-origin
    pub fn new(
        series: &dyn TimeSeries,
        species: &str,
        iteration: u64,
        options: &SpeciesOptions,
    ) -> Result<Self, StrError> {
        // load each quantity once
        let mut quantities: Vec<String> = ["x", "y", "z"].iter().map(|q| q.to_string()).collect();
        quantities.extend(options.scalars.iter().cloned());
        if let Some(select) = &options.select {
            quantities.extend(select.quantities());
        }
        let mut values: HashMap<String, Vec<f64>> = HashMap::new();
        for quantity in quantities {
            if !values.contains_key(&quantity) {
                let data = series.get_particle(species, &quantity, iteration)?;
                values.insert(quantity, data);
            }
        }
        let count = values["x"].len();
        if values.values().any(|v| v.len() != count) {
            return Err("particle quantities have different lengths");
        }

        // selection
        let mask = match &options.select {
            Some(select) => select.mask(&values, count)?,
            None => vec![true; count],
        };
        let selected: Vec<usize> = (0..count).filter(|i| mask[*i]).collect();
        debug!("{}: {} of {} particles selected", species, selected.len(), count);

        // shift of the z-origin
        let shift = match options.zmin_fixed {
            Some(zmin) => match reference_zmin(series, iteration, &values["z"]) {
                Some(z0) => zmin - z0,
                None => 0.0,
            },
            None => 0.0,
        };

        let (x, y, z) = (&values["x"], &values["y"], &values["z"]);
        let points = selected.iter().map(|i| [x[*i], y[*i], z[*i] + shift]).collect();
        let scalars = options
            .scalars
            .iter()
            .map(|name| {
                let data = &values[name];
                (name.clone(), selected.iter().map(|i| data[*i]).collect::<Vec<_>>())
            })
            .collect();
        Ok(SpeciesArtifact { points, scalars })
    }

    /// Returns the number of particles
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Returns the VTK poly data with one vertex per particle (single precision)
    pub(crate) fn to_dataset(&self) -> DataSet {
        let npoint = self.points.len();
        let coords: Vec<f32> = self.points.iter().flat_map(|p| p.iter().map(|x| *x as f32)).collect();
        let verts = if npoint > 0 {
            let mut vertices = Vec::with_capacity(2 * npoint);
            for i in 0..npoint {
                vertices.push(1);
                vertices.push(i as u32);
            }
            Some(VertexNumbers::Legacy {
                num_cells: npoint as u32,
                vertices,
            })
        } else {
            None
        };
        let point = self
            .scalars
            .iter()
            .map(|(name, data)| {
                Attribute::DataArray(DataArrayBase {
                    name: name.clone(),
                    elem: ElementType::Scalars {
                        num_comp: 1,
                        lookup_table: None,
                    },
                    data: IOBuffer::new(data.iter().map(|v| *v as f32).collect::<Vec<_>>()),
                })
            })
            .collect();
        DataSet::PolyData {
            meta: None,
            pieces: vec![Piece::Inline(Box::new(PolyDataPiece {
                points: IOBuffer::new(coords),
                verts,
                lines: None,
                polys: None,
                strips: None,
                data: Attributes { point, cell: Vec::new() },
            }))],
        }
    }
}

/// Returns the z-origin of the visualization domain
///
/// This is the z-origin of the first field grid, if any, otherwise the minimum particle z.
fn reference_zmin(series: &dyn TimeSeries, iteration: u64, z: &[f64]) -> Option<f64> {
    if let Some(field) = series.avail_fields().first() {
        if let Ok(grid) = series.field_grid(field, iteration) {
            if let Some(axis) = grid.axis("z") {
                return Some(grid.origin[axis]);
            }
        }
    }
    z.iter().copied().reduce(f64::min)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SpeciesArtifact;
    use crate::base::{Geometry, Selection, SpeciesOptions};
    use crate::series::{FieldData, FieldGrid, FieldMetadata, MemorySeries};
    use ndarray::ArrayD;

    fn sample_series() -> MemorySeries {
        let mut series = MemorySeries::new();
        series.add_species("electrons");
        let data = [
            ("x", [0.0, 1.0, 2.0]),
            ("y", [0.0, 0.0, 0.0]),
            ("z", [5.0, 6.0, 7.0]),
            ("ux", [0.1, 0.2, 0.3]),
            ("uy", [0.0, 0.0, 0.0]),
            ("uz", [1.0, 10.0, 100.0]),
            ("w", [1.0, 2.0, 3.0]),
        ];
        for (quantity, values) in data {
            series.set_particle_data("electrons", quantity, 0, &values).unwrap();
        }
        series
    }

    #[test]
    fn new_captures_errors() {
        let mut series = sample_series();
        let mut options = SpeciesOptions::new();
        options.set_scalars(&["charge"]);
        assert_eq!(
            SpeciesArtifact::new(&series, "electrons", 0, &options).err(),
            Some("particle quantity is not available")
        );
        series.set_particle_data("electrons", "charge", 0, &[1.0]).unwrap();
        assert_eq!(
            SpeciesArtifact::new(&series, "electrons", 0, &options).err(),
            Some("particle quantities have different lengths")
        );
    }

    #[test]
    fn new_works() {
        let series = sample_series();
        let artifact = SpeciesArtifact::new(&series, "electrons", 0, &SpeciesOptions::new()).unwrap();
        assert_eq!(artifact.num_points(), 3);
        assert_eq!(artifact.points[1], [1.0, 0.0, 6.0]);
        let names: Vec<_> = artifact.scalars.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, &["ux", "uy", "uz", "w"]);
        assert_eq!(artifact.scalars[3].1, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn selection_works() {
        let series = sample_series();
        let mut select = Selection::new();
        select.add("uz", Some(5.0), None);
        let mut options = SpeciesOptions::new();
        options.set_scalars(&["w"]).set_select(select);
        let artifact = SpeciesArtifact::new(&series, "electrons", 0, &options).unwrap();
        assert_eq!(artifact.points, &[[1.0, 0.0, 6.0], [2.0, 0.0, 7.0]]);
        assert_eq!(artifact.scalars, &[("w".to_string(), vec![2.0, 3.0])]);

        // everything excluded
        let mut select = Selection::new();
        select.add("uz", None, Some(0.0));
        options.set_select(select);
        let artifact = SpeciesArtifact::new(&series, "electrons", 0, &options).unwrap();
        assert_eq!(artifact.num_points(), 0);
        assert_eq!(artifact.scalars, &[("w".to_string(), Vec::new())]);
    }

    #[test]
    fn zmin_fixed_uses_particles_without_fields() {
        let series = sample_series();
        let mut options = SpeciesOptions::new();
        options.set_zmin_fixed(0.0);
        let artifact = SpeciesArtifact::new(&series, "electrons", 0, &options).unwrap();
        let z: Vec<_> = artifact.points.iter().map(|p| p[2]).collect();
        assert_eq!(z, &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn zmin_fixed_uses_field_grid() {
        let mut series = sample_series();
        series.add_field("rho", FieldMetadata::scalar(Geometry::Cartesian));
        let grid = FieldGrid::new(&["x", "z"], &[1, 2], &[0.0, 4.0], &[1.0, 1.0]).unwrap();
        let values = ArrayD::zeros(vec![1, 2]);
        series.set_field_data("rho", None, 0, FieldData { values, grid }).unwrap();
        let mut options = SpeciesOptions::new();
        options.set_zmin_fixed(10.0);
        let artifact = SpeciesArtifact::new(&series, "electrons", 0, &options).unwrap();
        let z: Vec<_> = artifact.points.iter().map(|p| p[2]).collect();
        assert_eq!(z, &[11.0, 12.0, 13.0]);
    }
}
