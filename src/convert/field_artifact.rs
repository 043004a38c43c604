use super::mesh::{azimuthal_angles, cartesian_slots, theta_mode_axes};
use crate::base::{FieldType, Geometry, CARTESIAN_COMPONENTS};
use crate::series::{FieldData, FieldMetadata, TimeSeries};
use crate::StrError;
use ndarray::{Axis, Ix3};
use vtkio::model::{Attribute, DataArrayBase, ElementType, IOBuffer};

/// Holds the values of a field converted to the mesh points
#[derive(Clone, Debug, PartialEq)]
pub struct FieldArtifact {
    /// Name of the VTK array, e.g., "rho", "E", or "Ex"
    pub name: String,

    /// Number of components (1 for scalars or 3 for vectors)
    pub num_comp: usize,

    /// Values in point order; the components of vectors are interleaved
    pub data: Vec<f64>,
}

impl FieldArtifact {
    /// Returns the number of points holding values
    pub fn num_points(&self) -> usize {
        self.data.len() / self.num_comp
    }

    /// Returns the VTK point attribute holding the values (single precision)
    pub(crate) fn to_attribute(&self) -> Attribute {
        let elem = if self.num_comp == 3 {
            ElementType::Vectors
        } else {
            ElementType::Scalars {
                num_comp: self.num_comp as u32,
                lookup_table: None,
            }
        };
        let data: Vec<f32> = self.data.iter().map(|v| *v as f32).collect();
        Attribute::DataArray(DataArrayBase {
            name: self.name.clone(),
            elem,
            data: IOBuffer::new(data),
        })
    }
}

/// Extracts field values at an iteration and arranges them in mesh point order
pub struct FieldSampler<'a> {
    /// Holds the time series
    series: &'a dyn TimeSeries,

    /// Holds the iteration
    iteration: u64,

    /// Holds the number of azimuthal intervals (thetaMode only)
    nth: usize,
}

impl<'a> FieldSampler<'a> {
    /// Allocates a new instance
    pub fn new(series: &'a dyn TimeSeries, iteration: u64, nth: usize) -> Self {
        FieldSampler { series, iteration, nth }
    }

    /// Converts a field according to its declared type
    ///
    /// Returns None if the type is neither scalar nor vector.
    pub fn convert(&self, field: &str, metadata: &FieldMetadata) -> Result<Option<FieldArtifact>, StrError> {
        match metadata.field_type {
            FieldType::Scalar => Ok(Some(self.scalar(field, metadata)?)),
            FieldType::Vector => Ok(Some(self.vector(field, metadata)?)),
            FieldType::Other(_) => Ok(None),
        }
    }

    /// Converts a scalar field
    pub fn scalar(&self, field: &str, metadata: &FieldMetadata) -> Result<FieldArtifact, StrError> {
        let data = self.sample(field, metadata.geometry, None)?;
        Ok(FieldArtifact {
            name: field.to_string(),
            num_comp: 1,
            data,
        })
    }

    /// Converts a vector field to its Cartesian (x, y, z) components
    pub fn vector(&self, field: &str, metadata: &FieldMetadata) -> Result<FieldArtifact, StrError> {
        let mut components = Vec::with_capacity(3);
        for component in CARTESIAN_COMPONENTS {
            components.push(self.cartesian_component(field, metadata, component)?);
        }
        let npoint = components[0].len();
        if components.iter().any(|c| c.len() != npoint) {
            return Err("vector components have different sizes");
        }
        let mut data = Vec::with_capacity(3 * npoint);
        for p in 0..npoint {
            for values in &components {
                data.push(values[p]);
            }
        }
        Ok(FieldArtifact {
            name: field.to_string(),
            num_comp: 3,
            data,
        })
    }

    /// Converts a single Cartesian component (x, y, or z) of a vector field
    ///
    /// The name of the artifact is the field name followed by the component, e.g., "Ex".
    pub fn component(&self, field: &str, metadata: &FieldMetadata, component: &str) -> Result<FieldArtifact, StrError> {
        let data = self.cartesian_component(field, metadata, component)?;
        Ok(FieldArtifact {
            name: format!("{}{}", field, component),
            num_comp: 1,
            data,
        })
    }

    /// Returns the values of a Cartesian component in mesh point order
    ///
    /// The x and y components of thetaMode fields stored as (r, t, z) are obtained by rotation.
    fn cartesian_component(&self, field: &str, metadata: &FieldMetadata, component: &str) -> Result<Vec<f64>, StrError> {
        if metadata.has_component(component) {
            return self.sample(field, metadata.geometry, Some(component));
        }
        let rotated = metadata.geometry == Geometry::ThetaMode
            && (component == "x" || component == "y")
            && metadata.has_component("r")
            && metadata.has_component("t");
        if !rotated {
            return Err("vector component is not available");
        }
        let fr = self.sample(field, metadata.geometry, Some("r"))?;
        let ft = self.sample(field, metadata.geometry, Some("t"))?;
        if fr.len() != ft.len() {
            return Err("vector components have different sizes");
        }
        let angles = azimuthal_angles(self.nth)?;
        let ntheta = angles.len();
        let values = fr
            .iter()
            .zip(&ft)
            .enumerate()
            .map(|(p, (r, t))| {
                let theta = angles[p % ntheta];
                if component == "x" {
                    r * theta.cos() - t * theta.sin()
                } else {
                    r * theta.sin() + t * theta.cos()
                }
            })
            .collect();
        Ok(values)
    }

    /// Reads a record component and returns its values in mesh point order
    fn sample(&self, field: &str, geometry: Geometry, component: Option<&str>) -> Result<Vec<f64>, StrError> {
        let data = self.series.get_field(field, component, self.iteration)?;
        data.check_shape()?;
        match geometry {
            Geometry::Cartesian => sample_cartesian(&data),
            Geometry::ThetaMode => sample_theta_mode(&data, self.nth),
        }
    }
}

/// Flattens Cartesian values with x running fastest and z slowest
pub(crate) fn sample_cartesian(data: &FieldData) -> Result<Vec<f64>, StrError> {
    let slots = cartesian_slots(&data.grid)?;
    if data.values.ndim() != slots.len() {
        return Err("cartesian field values must have one axis per grid axis");
    }
    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.sort_by(|a, b| slots[*b].cmp(&slots[*a]));
    let view = data.values.view().permuted_axes(order);
    Ok(view.iter().copied().collect())
}

/// Reconstructs thetaMode values on the azimuthal sweep, with θ running fastest, then r, then z
///
/// The mode coefficients are arranged as (mode 0, Re mode 1, Im mode 1, Re mode 2, ...), and
/// F(θ) = F₀ + Σₘ [Re Fₘ cos(mθ) + Im Fₘ sin(mθ)].
pub(crate) fn sample_theta_mode(data: &FieldData, nth: usize) -> Result<Vec<f64>, StrError> {
    let (ir, iz) = theta_mode_axes(&data.grid)?;
    let view = data
        .values
        .view()
        .into_dimensionality::<Ix3>()
        .map_err(|_| "thetaMode field values must have a modes axis")?;
    let view = if ir < iz { view } else { view.permuted_axes([0, 2, 1]) };
    let ncoef = view.len_of(Axis(0));
    if ncoef % 2 == 0 {
        return Err("number of thetaMode coefficients must be odd");
    }
    let nmode = (ncoef + 1) / 2;
    let angles = azimuthal_angles(nth)?;
    let trig: Vec<Vec<(f64, f64)>> = angles
        .iter()
        .map(|theta| {
            (1..nmode)
                .map(|m| ((m as f64) * theta).sin_cos())
                .map(|(sin, cos)| (cos, sin))
                .collect()
        })
        .collect();
    let (nr, nz) = (view.len_of(Axis(1)), view.len_of(Axis(2)));
    let mut values = Vec::with_capacity(nz * nr * angles.len());
    for k in 0..nz {
        for i in 0..nr {
            for modes in &trig {
                let mut value = view[[0, i, k]];
                for (m, (cos, sin)) in modes.iter().enumerate() {
                    let m = m + 1;
                    value += cos * view[[2 * m - 1, i, k]] + sin * view[[2 * m, i, k]];
                }
                values.push(value);
            }
        }
    }
    Ok(values)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
