use super::{VtkFormat, DEFAULT_NTH, DEFAULT_SPECIES_SCALARS};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the options of a fields conversion
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldOptions {
    /// Fields to be converted; None means all available fields
    pub fields: Option<Vec<String>>,

    /// Encoding of the VTK files
    pub format: VtkFormat,

    /// Fixed z-origin of the visualization domain (e.g., to freeze a moving window)
    pub zmin_fixed: Option<f64>,

    /// Number of azimuthal intervals of the cylindrical mesh (thetaMode only)
    ///
    /// **Note:** The conversion becomes slow for nth ≫ 10.
    pub nth: usize,

    /// Writes all fields on a single mesh; otherwise, one file per field component
    pub common_mesh: bool,
}

impl Default for FieldOptions {
    fn default() -> Self {
        FieldOptions {
            fields: None,
            format: VtkFormat::Binary,
            zmin_fixed: None,
            nth: DEFAULT_NTH,
            common_mesh: true,
        }
    }
}

impl FieldOptions {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        FieldOptions::default()
    }

    /// Sets the list of fields to be converted
    pub fn set_fields(&mut self, fields: &[&str]) -> &mut Self {
        self.fields = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Sets the encoding of the VTK files
    pub fn set_format(&mut self, format: VtkFormat) -> &mut Self {
        self.format = format;
        self
    }

    /// Sets the fixed z-origin of the visualization domain
    pub fn set_zmin_fixed(&mut self, zmin: f64) -> &mut Self {
        self.zmin_fixed = Some(zmin);
        self
    }

    /// Sets the number of azimuthal intervals of the cylindrical mesh
    pub fn set_nth(&mut self, nth: usize) -> Result<&mut Self, StrError> {
        if nth < 1 {
            return Err("nth must be ≥ 1");
        }
        self.nth = nth;
        Ok(self)
    }

    /// Enables or disables the common mesh output
    pub fn set_common_mesh(&mut self, flag: bool) -> &mut Self {
        self.common_mesh = flag;
        self
    }
}

/// Holds the options of a species conversion
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpeciesOptions {
    /// Species to be converted; None means all available species
    pub species: Option<Vec<String>>,

    /// Encoding of the VTK files
    pub format: VtkFormat,

    /// Per-particle quantities attached to the points, e.g., "ux", "w", "charge", "id"
    pub scalars: Vec<String>,

    /// Restricts the conversion to the particles satisfying the selection
    pub select: Option<Selection>,

    /// Fixed z-origin of the visualization domain
    pub zmin_fixed: Option<f64>,
}

impl Default for SpeciesOptions {
    fn default() -> Self {
        SpeciesOptions {
            species: None,
            format: VtkFormat::Binary,
            scalars: DEFAULT_SPECIES_SCALARS.iter().map(|s| s.to_string()).collect(),
            select: None,
            zmin_fixed: None,
        }
    }
}

impl SpeciesOptions {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        SpeciesOptions::default()
    }

    /// Sets the list of species to be converted
    pub fn set_species(&mut self, species: &[&str]) -> &mut Self {
        self.species = Some(species.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Sets the encoding of the VTK files
    pub fn set_format(&mut self, format: VtkFormat) -> &mut Self {
        self.format = format;
        self
    }

    /// Sets the per-particle quantities attached to the points
    pub fn set_scalars(&mut self, scalars: &[&str]) -> &mut Self {
        self.scalars = scalars.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Sets the particle selection
    pub fn set_select(&mut self, select: Selection) -> &mut Self {
        self.select = Some(select);
        self
    }

    /// Sets the fixed z-origin of the visualization domain
    pub fn set_zmin_fixed(&mut self, zmin: f64) -> &mut Self {
        self.zmin_fixed = Some(zmin);
        self
    }
}

/// Holds the bounds imposed on per-particle quantities
///
/// A particle is selected if `min < value < max` for every quantity in the selection.
/// A missing bound is not checked. In JSON, the selection reads as `{"uz": [5.0, null]}`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Selection {
    rules: BTreeMap<String, (Option<f64>, Option<f64>)>,
}

impl Selection {
    /// Allocates an empty selection (all particles are selected)
    pub fn new() -> Self {
        Selection { rules: BTreeMap::new() }
    }

    /// Adds (or replaces) the bounds on a quantity
    pub fn add(&mut self, quantity: &str, min: Option<f64>, max: Option<f64>) -> &mut Self {
        self.rules.insert(quantity.to_string(), (min, max));
        self
    }

    /// Adds a rule given as "quantity:min:max", where min and/or max may be empty
    ///
    /// Example: "uz:5:" selects the particles with uz > 5.
    pub fn add_rule(&mut self, rule: &str) -> Result<&mut Self, StrError> {
        let parts: Vec<_> = rule.split(':').collect();
        if parts.len() != 3 || parts[0].is_empty() {
            return Err("selection rule must be formatted as quantity:min:max");
        }
        let bound = |s: &str| -> Result<Option<f64>, StrError> {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                s.trim().parse().map(Some).map_err(|_| "cannot parse selection bound")
            }
        };
        let min = bound(parts[1])?;
        let max = bound(parts[2])?;
        Ok(self.add(parts[0], min, max))
    }

    /// Returns the names of the constrained quantities
    pub fn quantities(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }

    /// Returns true if no quantity is constrained
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the mask of selected particles
    ///
    /// # Input
    ///
    /// * `values` -- maps each constrained quantity to its per-particle values
    /// * `count` -- the number of particles
    pub fn mask(&self, values: &HashMap<String, Vec<f64>>, count: usize) -> Result<Vec<bool>, StrError> {
        let mut mask = vec![true; count];
        for (quantity, (min, max)) in &self.rules {
            let data = values.get(quantity).ok_or("selection quantity is not available")?;
            if data.len() != count {
                return Err("selection quantity has an incorrect number of particles");
            }
            for (keep, value) in mask.iter_mut().zip(data) {
                if let Some(min) = min {
                    *keep = *keep && value > min;
                }
                if let Some(max) = max {
                    *keep = *keep && value < max;
                }
            }
        }
        Ok(mask)
    }
}

/// Holds the options of fields and species conversions as read from a JSON file
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Options for the fields
    pub fields: FieldOptions,

    /// Options for the species
    pub species: SpeciesOptions,
}

impl ConversionConfig {
    /// Reads a JSON file containing this struct
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(file);
        let config: ConversionConfig = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        if config.fields.nth < 1 {
            return Err("nth must be ≥ 1");
        }
        Ok(config)
    }

    /// Writes a JSON file with this struct
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer_pretty(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
