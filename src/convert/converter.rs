use super::vtk_file::write_vtk;
use super::{FieldArtifact, FieldSampler, Mesh, SpeciesArtifact};
use crate::base::{
    filename_field_component, filename_fields, filename_species, filepath_vtk, FieldOptions, FieldType,
    SpeciesOptions, VtkFormat, CARTESIAN_COMPONENTS,
};
use crate::series::{FieldMetadata, TimeSeries};
use crate::StrError;
use log::{debug, info, warn};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use vtkio::model::Attributes;

/// Converts the fields and particle species of a time series to VTK files
///
/// The converter holds no mesh between calls: each call builds the meshes
/// from the grids of the converted fields.
pub struct Opmd2Vtk<'a> {
    /// Holds the time series
    series: &'a dyn TimeSeries,

    /// Holds the output directory
    output_dir: PathBuf,
}

impl<'a> Opmd2Vtk<'a> {
    /// Allocates a new instance and creates the output directory
    ///
    /// # Input
    ///
    /// * `series` -- the time series
    /// * `output_dir` -- may be a String, &str, or Path
    pub fn new<P>(series: &'a dyn TimeSeries, output_dir: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let output_dir = PathBuf::from(output_dir);
        fs::create_dir_all(&output_dir).map_err(|_| "cannot create output directory")?;
        Ok(Opmd2Vtk { series, output_dir })
    }

    /// Returns the output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes the fields of an iteration
    ///
    /// With the common mesh option, all fields are written to a single file
    /// "vtk_fields_{iteration}". Otherwise, each scalar field is written to
    /// "vtk_fields_{field}_{iteration}" and each Cartesian component of a vector
    /// field to "vtk_fields_{field}{component}_{iteration}". Fields whose type
    /// is neither scalar nor vector are skipped.
    ///
    /// Returns the paths of the written files.
    pub fn write_fields_vtk(&self, iteration: u64, options: &FieldOptions) -> Result<Vec<PathBuf>, StrError> {
        let fields = match &options.fields {
            Some(fields) => fields.clone(),
            None => self.series.avail_fields(),
        };
        let sampler = FieldSampler::new(self.series, iteration, options.nth);
        if options.common_mesh {
            let path = self.write_fields_common(&fields, &sampler, iteration, options)?;
            Ok(vec![path])
        } else {
            self.write_fields_separate(&fields, &sampler, iteration, options)
        }
    }

    /// Writes the particles of the species of an iteration
    ///
    /// Each species is written to "vtk_specie_{species}_{iteration}" as a point
    /// cloud carrying the requested scalars. Returns the paths of the written files.
    pub fn write_species_vtk(&self, iteration: u64, options: &SpeciesOptions) -> Result<Vec<PathBuf>, StrError> {
        let available = self.series.avail_species();
        let species = match &options.species {
            Some(species) => species.clone(),
            None => available.clone(),
        };
        let mut paths = Vec::new();
        for name in &species {
            if !available.contains(name) {
                return Err("species is not available");
            }
            let artifact = SpeciesArtifact::new(self.series, name, iteration, options)?;
            let path = filepath_vtk(&self.output_dir, &filename_species(name, iteration));
            let title = format!("{} at iteration {}", name, iteration);
            write_vtk(artifact.to_dataset(), &title, &path, options.format)?;
            info!("{}: {} particles written to {}", name, artifact.num_points(), path.display());
            paths.push(path);
        }
        Ok(paths)
    }

    /// Writes all fields on the mesh of the first convertible field
    fn write_fields_common(
        &self,
        fields: &[String],
        sampler: &FieldSampler,
        iteration: u64,
        options: &FieldOptions,
    ) -> Result<PathBuf, StrError> {
        let mut mesh: Option<Mesh> = None;
        let mut artifacts = Vec::new();
        for field in fields {
            let metadata = self.series.field_metadata(field)?;
            let artifact = match sampler.convert(field, &metadata)? {
                Some(artifact) => artifact,
                None => {
                    warn!("{}: skipping field of type {}", field, metadata.field_type);
                    continue;
                }
            };
            if mesh.is_none() {
                mesh = Some(self.field_mesh(field, &metadata, iteration, options)?);
            }
            if let Some(mesh) = &mesh {
                if artifact.num_points() != mesh.num_points() {
                    return Err("field does not match the common mesh");
                }
            }
            artifacts.push(artifact);
        }
        let mesh = mesh.ok_or("there are no fields to convert")?;
        let path = filepath_vtk(&self.output_dir, &filename_fields(iteration));
        let title = format!("fields at iteration {}", iteration);
        write_artifacts(&mesh, &artifacts, &title, &path, options.format)?;
        let names: Vec<&str> = artifacts.iter().map(|a| a.name.as_str()).collect();
        info!("{} written to {}", names.join(", "), path.display());
        Ok(path)
    }

    /// Writes each scalar field and each Cartesian component of vector fields to its own file
    fn write_fields_separate(
        &self,
        fields: &[String],
        sampler: &FieldSampler,
        iteration: u64,
        options: &FieldOptions,
    ) -> Result<Vec<PathBuf>, StrError> {
        let mut paths = Vec::new();
        for field in fields {
            let metadata = self.series.field_metadata(field)?;
            let artifacts = match metadata.field_type {
                FieldType::Scalar => vec![sampler.scalar(field, &metadata)?],
                FieldType::Vector => {
                    let mut artifacts = Vec::with_capacity(CARTESIAN_COMPONENTS.len());
                    for component in CARTESIAN_COMPONENTS {
                        artifacts.push(sampler.component(field, &metadata, component)?);
                    }
                    artifacts
                }
                FieldType::Other(_) => {
                    warn!("{}: skipping field of type {}", field, metadata.field_type);
                    continue;
                }
            };
            let mesh = self.field_mesh(field, &metadata, iteration, options)?;
            for artifact in artifacts {
                if artifact.num_points() != mesh.num_points() {
                    return Err("field does not match its mesh");
                }
                let path = filepath_vtk(&self.output_dir, &filename_field_component(&artifact.name, iteration));
                let title = format!("{} at iteration {}", artifact.name, iteration);
                write_artifacts(&mesh, &[artifact], &title, &path, options.format)?;
                info!("written to {}", path.display());
                paths.push(path);
            }
        }
        Ok(paths)
    }

    /// Builds the mesh from the grid of a field
    fn field_mesh(
        &self,
        field: &str,
        metadata: &FieldMetadata,
        iteration: u64,
        options: &FieldOptions,
    ) -> Result<Mesh, StrError> {
        let grid = self.series.field_grid(field, iteration)?;
        let mesh = Mesh::new(metadata.geometry, &grid, options.nth, options.zmin_fixed)?;
        debug!("{}: {}", field, mesh);
        Ok(mesh)
    }
}

/// Writes field artifacts as point data of a mesh
fn write_artifacts(
    mesh: &Mesh,
    artifacts: &[FieldArtifact],
    title: &str,
    path: &Path,
    format: VtkFormat,
) -> Result<(), StrError> {
    let data = Attributes {
        point: artifacts.iter().map(|a| a.to_attribute()).collect(),
        cell: Vec::new(),
    };
    write_vtk(mesh.to_dataset(data), title, path, format)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
