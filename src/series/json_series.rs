use super::{FieldData, FieldGrid, FieldMetadata, TimeSeries};
use crate::base::{FieldType, Geometry, SPEED_OF_LIGHT};
use crate::StrError;
use ndarray::{ArrayD, IxDyn};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Implements a reader of openPMD series written with the JSON backend
///
/// The series is either a single file holding all iterations (group-based encoding)
/// or a directory with one `.json` file per iteration (file-based encoding). Every file
/// is organized as `data/<iteration>/<meshesPath>` and `data/<iteration>/<particlesPath>`.
///
/// All values are converted to SI units using the `unitSI` and `gridUnitSI` attributes.
/// The lists of fields and species, and the field metadata, come from the first iteration.
pub struct JsonSeries {
    /// Holds the iteration groups
    iterations: BTreeMap<u64, Value>,

    /// Holds the name of the meshes group, e.g., "meshes"
    meshes_path: String,

    /// Holds the name of the particles group, e.g., "particles"
    particles_path: String,

    /// Holds the available fields
    fields: Vec<String>,

    /// Holds the available species
    species: Vec<String>,

    /// Holds the metadata of each field (or the reason why it cannot be read)
    metadata: HashMap<String, Result<FieldMetadata, StrError>>,
}

impl JsonSeries {
    /// Opens a JSON file or a directory with JSON files
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn open<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path);
        let files: Vec<PathBuf> = if path.is_dir() {
            let mut files: Vec<_> = fs::read_dir(path)
                .map_err(|_| "cannot read directory")?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.extension().map_or(false, |ext| ext == "json"))
                .collect();
            files.sort();
            files
        } else {
            vec![path.to_path_buf()]
        };
        let mut documents = Vec::new();
        for file in &files {
            let reader = BufReader::new(File::open(file).map_err(|_| "cannot open file")?);
            let document: Value = serde_json::from_reader(reader).map_err(|_| "cannot parse JSON file")?;
            documents.push(document);
        }
        JsonSeries::from_documents(documents)
    }

    /// Reads a series from a JSON string (group-based encoding)
    pub fn from_json_str(text: &str) -> Result<Self, StrError> {
        let document: Value = serde_json::from_str(text).map_err(|_| "cannot parse JSON string")?;
        JsonSeries::from_documents(vec![document])
    }

    /// Collects the iterations of all documents
    fn from_documents(documents: Vec<Value>) -> Result<Self, StrError> {
        let first = documents.first().ok_or("series has no files")?;
        let meshes_path = group_name(first, "meshesPath", "meshes");
        let particles_path = group_name(first, "particlesPath", "particles");

        let mut iterations = BTreeMap::new();
        for mut document in documents {
            let data = match document.get_mut("data").and_then(|d| d.as_object_mut()) {
                Some(data) => std::mem::take(data),
                None => return Err("openPMD JSON file has no data group"),
            };
            for (key, group) in data {
                let iteration: u64 = key.parse().map_err(|_| "cannot parse iteration number")?;
                iterations.insert(iteration, group);
            }
        }
        let first_iteration = iterations.values().next().ok_or("series has no iterations")?;

        let mut fields = Vec::new();
        let mut metadata = HashMap::new();
        if let Some(meshes) = first_iteration.get(&meshes_path).and_then(|m| m.as_object()) {
            for (name, record) in meshes {
                fields.push(name.clone());
                metadata.insert(name.clone(), record_metadata(record));
            }
        }
        let species = match first_iteration.get(&particles_path).and_then(|p| p.as_object()) {
            Some(particles) => particles.keys().cloned().collect(),
            None => Vec::new(),
        };

        Ok(JsonSeries {
            iterations,
            meshes_path,
            particles_path,
            fields,
            species,
            metadata,
        })
    }

    /// Returns the group of an iteration
    fn iteration(&self, iteration: u64) -> Result<&Value, StrError> {
        self.iterations.get(&iteration).ok_or("iteration is not available")
    }

    /// Returns the records of a species at an iteration
    fn species_node(&self, species: &str, iteration: u64) -> Result<&Value, StrError> {
        self.iteration(iteration)?
            .get(&self.particles_path)
            .and_then(|p| p.get(species))
            .ok_or("species is not available")
    }
}

impl TimeSeries for JsonSeries {
    fn iterations(&self) -> Vec<u64> {
        self.iterations.keys().copied().collect()
    }

    fn avail_fields(&self) -> Vec<String> {
        self.fields.clone()
    }

    fn avail_species(&self) -> Vec<String> {
        self.species.clone()
    }

    fn field_metadata(&self, field: &str) -> Result<FieldMetadata, StrError> {
        match self.metadata.get(field) {
            Some(result) => result.clone(),
            None => Err("field is not available"),
        }
    }

    fn get_field(&self, field: &str, component: Option<&str>, iteration: u64) -> Result<FieldData, StrError> {
        let metadata = self.field_metadata(field)?;
        let record = self
            .iteration(iteration)?
            .get(&self.meshes_path)
            .and_then(|m| m.get(field))
            .ok_or("field is not available")?;
        let node = match component {
            Some(c) => record.get(c).ok_or("field component is not available")?,
            None => {
                if !is_component(record) {
                    return Err("field is not a scalar record");
                }
                record
            }
        };
        let (extent, values) = read_component(node)?;
        let grid = record_grid(record, node, &extent, metadata.geometry)?;
        let values = ArrayD::from_shape_vec(IxDyn(&extent), values).map_err(|_| "cannot reshape field data")?;
        let data = FieldData { values, grid };
        data.check_shape()?;
        Ok(data)
    }

    fn get_particle(&self, species: &str, quantity: &str, iteration: u64) -> Result<Vec<f64>, StrError> {
        let node = self.species_node(species, iteration)?;
        match quantity {
            "x" | "y" | "z" => {
                let position = node
                    .get("position")
                    .and_then(|r| r.get(quantity))
                    .ok_or("particle position is not available")?;
                let (_, mut values) = read_component(position)?;
                if let Some(offset) = node.get("positionOffset").and_then(|r| r.get(quantity)) {
                    let (_, offset) = read_component(offset)?;
                    combine(&mut values, &offset, |v, o| v + o)?;
                }
                Ok(values)
            }
            "ux" | "uy" | "uz" => {
                let axis = &quantity[1..];
                let momentum = node
                    .get("momentum")
                    .and_then(|r| r.get(axis))
                    .ok_or("particle momentum is not available")?;
                let (_, mut values) = read_component(momentum)?;
                let mass = node.get("mass").ok_or("particle mass is not available")?;
                let (_, mass) = read_component(mass)?;
                combine(&mut values, &mass, |p, m| p / (m * SPEED_OF_LIGHT))?;
                Ok(values)
            }
            _ => {
                let name = if quantity == "w" { "weighting" } else { quantity };
                let record = node.get(name).ok_or("particle quantity is not available")?;
                if !is_component(record) {
                    return Err("particle quantity is not a scalar record");
                }
                let (_, values) = read_component(record)?;
                Ok(values)
            }
        }
    }
}

/// Returns the name of a group from a root attribute such as meshesPath = "meshes/"
fn group_name(document: &Value, attribute_name: &str, default: &str) -> String {
    match attribute(document, attribute_name).and_then(|v| v.as_str()) {
        Some(path) => path.trim_end_matches('/').to_string(),
        None => default.to_string(),
    }
}

/// Returns the value of an attribute
///
/// Attributes are stored as `{"datatype": "...", "value": ...}`; plain values are also accepted.
fn attribute<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    let attr = node.get("attributes")?.get(name)?;
    match (attr.get("datatype"), attr.get("value")) {
        (Some(_), Some(value)) => Some(value),
        _ => Some(attr),
    }
}

fn attribute_f64(node: &Value, name: &str) -> Option<f64> {
    attribute(node, name).and_then(|v| v.as_f64())
}

fn attribute_vec_f64(node: &Value, name: &str) -> Option<Vec<f64>> {
    match attribute(node, name)? {
        Value::Array(items) => items.iter().map(|v| v.as_f64()).collect(),
        value => value.as_f64().map(|v| vec![v]),
    }
}

fn attribute_vec_str(node: &Value, name: &str) -> Option<Vec<String>> {
    match attribute(node, name)? {
        Value::Array(items) => items.iter().map(|v| v.as_str().map(|s| s.to_string())).collect(),
        value => value.as_str().map(|s| vec![s.to_string()]),
    }
}

/// Returns true if the node holds data (a dataset or a constant)
fn is_component(node: &Value) -> bool {
    node.get("data").is_some() || attribute(node, "value").is_some()
}

/// Determines the type tag, geometry, and components of a mesh record
fn record_metadata(record: &Value) -> Result<FieldMetadata, StrError> {
    let geometry: Geometry = match attribute(record, "geometry").and_then(|g| g.as_str()) {
        Some(g) => g.parse()?,
        None => Geometry::Cartesian,
    };
    if is_component(record) {
        return Ok(FieldMetadata::scalar(geometry));
    }
    let components: Vec<String> = match record.as_object() {
        Some(map) => map
            .iter()
            .filter(|(key, value)| *key != "attributes" && value.is_object())
            .map(|(key, _)| key.clone())
            .collect(),
        None => return Err("mesh record must be a JSON object"),
    };
    let field_type = if components.is_empty() {
        FieldType::Other("empty".to_string())
    } else {
        FieldType::Vector
    };
    Ok(FieldMetadata {
        field_type,
        geometry,
        components,
    })
}

/// Computes the sampling lattice of a record component
fn record_grid(record: &Value, node: &Value, extent: &[usize], geometry: Geometry) -> Result<FieldGrid, StrError> {
    let mut labels = attribute_vec_str(record, "axisLabels").ok_or("mesh record has no axisLabels")?;
    let mut spacing = attribute_vec_f64(record, "gridSpacing").ok_or("mesh record has no gridSpacing")?;
    let mut offset = attribute_vec_f64(record, "gridGlobalOffset").ok_or("mesh record has no gridGlobalOffset")?;
    let unit = attribute_f64(record, "gridUnitSI").unwrap_or(1.0);
    let ndim = labels.len();
    let mut position = attribute_vec_f64(node, "position").unwrap_or_else(|| vec![0.0; ndim]);
    if spacing.len() != ndim || offset.len() != ndim || position.len() != ndim {
        return Err("mesh record attributes do not match the number of axes");
    }
    if attribute(record, "dataOrder").and_then(|d| d.as_str()) == Some("F") {
        labels.reverse();
        spacing.reverse();
        offset.reverse();
        position.reverse();
    }
    let shape = match geometry {
        Geometry::Cartesian => extent,
        Geometry::ThetaMode => extent.get(1..).unwrap_or(&[]),
    };
    if shape.len() != ndim {
        return Err("field extent does not match the number of axes");
    }
    let origin: Vec<f64> = (0..ndim).map(|i| (offset[i] + position[i] * spacing[i]) * unit).collect();
    let spacing: Vec<f64> = spacing.iter().map(|d| d * unit).collect();
    let labels: Vec<&str> = labels.iter().map(|l| l.as_str()).collect();
    FieldGrid::new(&labels, shape, &origin, &spacing)
}

/// Reads the values of a record component (dataset or constant) in SI units
///
/// Returns `(extent, values)`.
fn read_component(node: &Value) -> Result<(Vec<usize>, Vec<f64>), StrError> {
    let unit = attribute_f64(node, "unitSI").unwrap_or(1.0);
    let (extent, mut values) = if let Some(data) = node.get("data") {
        let mut shape = Vec::new();
        let mut values = Vec::new();
        flatten(data, 0, &mut shape, &mut values)?;
        let extent = match node.get("extent").and_then(|e| e.as_array()) {
            Some(e) => e
                .iter()
                .map(|n| n.as_u64().map(|n| n as usize))
                .collect::<Option<Vec<_>>>()
                .ok_or("cannot parse extent")?,
            None => shape,
        };
        if extent.iter().product::<usize>() != values.len() {
            return Err("data size does not match the extent");
        }
        (extent, values)
    } else if let Some(value) = attribute(node, "value") {
        let value = value.as_f64().ok_or("constant record component must be numeric")?;
        let extent: Vec<usize> = attribute_vec_f64(node, "shape")
            .ok_or("constant record component has no shape")?
            .iter()
            .map(|n| *n as usize)
            .collect();
        let count = extent.iter().product();
        (extent, vec![value; count])
    } else {
        return Err("record component has no data");
    };
    if unit != 1.0 {
        values.iter_mut().for_each(|v| *v *= unit);
    }
    Ok((extent, values))
}

/// Flattens nested JSON arrays in row-major order, recording the shape
///
/// Null entries (unwritten chunks) become NaN.
fn flatten(value: &Value, depth: usize, shape: &mut Vec<usize>, values: &mut Vec<f64>) -> Result<(), StrError> {
    match value {
        Value::Array(items) => {
            if shape.len() == depth {
                shape.push(items.len());
            } else if shape.len() < depth || shape[depth] != items.len() {
                return Err("data array is ragged");
            }
            for item in items {
                flatten(item, depth + 1, shape, values)?;
            }
            Ok(())
        }
        Value::Number(n) => {
            values.push(n.as_f64().ok_or("cannot convert number")?);
            Ok(())
        }
        Value::Null => {
            values.push(f64::NAN);
            Ok(())
        }
        _ => Err("data must be numeric"),
    }
}

/// Combines per-particle values with another array of the same length or with a single value
fn combine<F>(values: &mut [f64], other: &[f64], op: F) -> Result<(), StrError>
where
    F: Fn(f64, f64) -> f64,
{
    if other.len() == 1 {
        values.iter_mut().for_each(|v| *v = op(*v, other[0]));
    } else if other.len() == values.len() {
        values.iter_mut().zip(other).for_each(|(v, o)| *v = op(*v, *o));
    } else {
        return Err("particle records have different lengths");
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
