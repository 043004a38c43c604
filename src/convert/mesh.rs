use crate::base::Geometry;
use crate::series::FieldGrid;
use crate::StrError;
use std::f64::consts::PI;
use std::fmt;
use vtkio::model::{Attributes, DataSet, Extent, IOBuffer, ImageDataPiece, Piece, StructuredGridPiece};

/// Holds the geometry on which the field values are written
///
/// The mesh is a plain value: it is computed from the grid of a field and
/// handed over to the VTK writer together with the field values.
#[derive(Clone, Debug, PartialEq)]
pub enum Mesh {
    /// Regular grid (VTK structured points)
    Regular {
        /// Number of points along x, y, and z
        dimensions: [usize; 3],

        /// Coordinates of the first point
        origin: [f64; 3],

        /// Distance between points along x, y, and z
        spacing: [f64; 3],
    },

    /// Cylindrical grid with explicit points (VTK structured grid)
    Cylindrical {
        /// Number of points along θ (nth + 1), r, and z
        dimensions: [usize; 3],

        /// Cartesian coordinates ordered with θ running fastest, then r, then z
        points: Vec<[f64; 3]>,
    },
}

impl Mesh {
    /// Allocates the mesh corresponding to a field grid
    ///
    /// # Input
    ///
    /// * `geometry` -- the geometry of the mesh record
    /// * `grid` -- the sampling lattice of the field
    /// * `nth` -- the number of azimuthal intervals (thetaMode only)
    /// * `zmin_fixed` -- replaces the z-origin of the grid, if given
    pub fn new(geometry: Geometry, grid: &FieldGrid, nth: usize, zmin_fixed: Option<f64>) -> Result<Self, StrError> {
        match geometry {
            Geometry::Cartesian => Mesh::regular(grid, zmin_fixed),
            Geometry::ThetaMode => Mesh::cylindrical(grid, nth, zmin_fixed),
        }
    }

    /// Allocates a regular 3D grid from a Cartesian field grid
    ///
    /// Axes absent from the grid (1D and 2D data) get one point, origin 0, and spacing 1.
    pub fn regular(grid: &FieldGrid, zmin_fixed: Option<f64>) -> Result<Self, StrError> {
        let slots = cartesian_slots(grid)?;
        let mut dimensions = [1; 3];
        let mut origin = [0.0; 3];
        let mut spacing = [1.0; 3];
        for (axis, slot) in slots.iter().enumerate() {
            dimensions[*slot] = grid.shape[axis];
            origin[*slot] = grid.origin[axis];
            spacing[*slot] = grid.spacing[axis];
        }
        if let Some(zmin) = zmin_fixed {
            origin[2] = zmin;
        }
        Ok(Mesh::Regular {
            dimensions,
            origin,
            spacing,
        })
    }

    /// Allocates a cylindrical 3D grid by sweeping the (r, z) plane around the z-axis
    ///
    /// The sweep has nth + 1 azimuthal samples; the last one closes the loop and
    /// coincides with the first one.
    pub fn cylindrical(grid: &FieldGrid, nth: usize, zmin_fixed: Option<f64>) -> Result<Self, StrError> {
        let (ir, iz) = theta_mode_axes(grid)?;
        let angles = azimuthal_angles(nth)?;
        let (nr, nz) = (grid.shape[ir], grid.shape[iz]);
        let (r0, dr) = (grid.origin[ir], grid.spacing[ir]);
        let (z0, dz) = (zmin_fixed.unwrap_or(grid.origin[iz]), grid.spacing[iz]);
        let trig: Vec<_> = angles.iter().map(|theta| (theta.cos(), theta.sin())).collect();
        let mut points = Vec::with_capacity(nz * nr * trig.len());
        for k in 0..nz {
            let z = z0 + (k as f64) * dz;
            for i in 0..nr {
                let r = r0 + (i as f64) * dr;
                for (cos, sin) in &trig {
                    points.push([r * cos, r * sin, z]);
                }
            }
        }
        Ok(Mesh::Cylindrical {
            dimensions: [nth + 1, nr, nz],
            points,
        })
    }

    /// Returns the number of points along each direction of the structured mesh
    pub fn dimensions(&self) -> [usize; 3] {
        match self {
            Mesh::Regular { dimensions, .. } => *dimensions,
            Mesh::Cylindrical { dimensions, .. } => *dimensions,
        }
    }

    /// Returns the total number of points
    pub fn num_points(&self) -> usize {
        self.dimensions().iter().product()
    }

    /// Returns the VTK data set holding this mesh and the given point data
    pub(crate) fn to_dataset(&self, data: Attributes) -> DataSet {
        let dims = self.dimensions();
        let extent = Extent::Dims([dims[0] as u32, dims[1] as u32, dims[2] as u32]);
        match self {
            Mesh::Regular { origin, spacing, .. } => DataSet::ImageData {
                extent: extent.clone(),
                origin: [origin[0] as f32, origin[1] as f32, origin[2] as f32],
                spacing: [spacing[0] as f32, spacing[1] as f32, spacing[2] as f32],
                meta: None,
                pieces: vec![Piece::Inline(Box::new(ImageDataPiece { extent, data }))],
            },
            Mesh::Cylindrical { points, .. } => {
                let coords: Vec<f32> = points.iter().flat_map(|p| p.iter().map(|x| *x as f32)).collect();
                DataSet::StructuredGrid {
                    extent: extent.clone(),
                    meta: None,
                    pieces: vec![Piece::Inline(Box::new(StructuredGridPiece {
                        extent,
                        points: IOBuffer::new(coords),
                        data,
                    }))],
                }
            }
        }
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mesh::Regular {
                dimensions,
                origin,
                spacing,
            } => write!(
                f,
                "regular mesh: dimensions = {:?}, origin = {:?}, spacing = {:?}",
                dimensions, origin, spacing
            ),
            Mesh::Cylindrical { dimensions, .. } => {
                write!(f, "cylindrical mesh: dimensions (θ, r, z) = {:?}", dimensions)
            }
        }
    }
}

/// Returns the nth + 1 angles of the azimuthal sweep
///
/// The angle of index j is 2π (j mod nth) / nth; thus, the last angle is
/// exactly equal to the first one and closes the loop.
pub fn azimuthal_angles(nth: usize) -> Result<Vec<f64>, StrError> {
    if nth < 1 {
        return Err("nth must be ≥ 1");
    }
    Ok((0..=nth)
        .map(|j| 2.0 * PI * ((j % nth) as f64) / (nth as f64))
        .collect())
}

/// Returns the VTK slot (0 ↔ x, 1 ↔ y, 2 ↔ z) of each axis of a Cartesian grid
pub(crate) fn cartesian_slots(grid: &FieldGrid) -> Result<Vec<usize>, StrError> {
    let mut slots = Vec::with_capacity(grid.axis_labels.len());
    for label in &grid.axis_labels {
        let slot = match label.as_str() {
            "x" => 0,
            "y" => 1,
            "z" => 2,
            _ => return Err("cartesian grid axes must be labelled x, y, or z"),
        };
        if slots.contains(&slot) {
            return Err("cartesian grid has a repeated axis");
        }
        slots.push(slot);
    }
    Ok(slots)
}

/// Returns the indices of the r and z axes of a thetaMode grid
pub(crate) fn theta_mode_axes(grid: &FieldGrid) -> Result<(usize, usize), StrError> {
    match (grid.axis("r"), grid.axis("z")) {
        (Some(ir), Some(iz)) if grid.axis_labels.len() == 2 => Ok((ir, iz)),
        _ => Err("thetaMode grid axes must be labelled r and z"),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
