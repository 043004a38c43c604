use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Defines the type tag of a field record
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum FieldType {
    /// Single-component field, e.g., the charge density
    Scalar,

    /// Three-component field, e.g., the electric field
    Vector,

    /// Any other tag; such fields are skipped by the converter
    Other(String),
}

impl FieldType {
    /// Returns the number of components of the converted field
    ///
    /// Returns None for unsupported tags.
    pub fn num_comp(&self) -> Option<usize> {
        match self {
            FieldType::Scalar => Some(1),
            FieldType::Vector => Some(3),
            FieldType::Other(_) => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldType::Scalar => write!(f, "scalar"),
            FieldType::Vector => write!(f, "vector"),
            FieldType::Other(tag) => write!(f, "{}", tag),
        }
    }
}

/// Defines the geometry of a mesh record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Geometry {
    /// Regular grid with axes labelled by x, y, and/or z
    Cartesian,

    /// Axisymmetric (r, z) grid decomposed in azimuthal modes
    ThetaMode,
}

impl FromStr for Geometry {
    type Err = StrError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cartesian" => Ok(Geometry::Cartesian),
            "thetaMode" => Ok(Geometry::ThetaMode),
            _ => Err("unsupported mesh geometry"),
        }
    }
}

/// Defines the encoding of the legacy VTK files
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VtkFormat {
    /// Human-readable text
    Ascii,

    /// Big-endian binary
    Binary,
}

impl Default for VtkFormat {
    fn default() -> Self {
        VtkFormat::Binary
    }
}

impl FromStr for VtkFormat {
    type Err = StrError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascii" => Ok(VtkFormat::Ascii),
            "binary" => Ok(VtkFormat::Binary),
            _ => Err("VTK format must be 'ascii' or 'binary'"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{FieldType, Geometry, VtkFormat};

    #[test]
    fn field_type_works() {
        let tensor = FieldType::Other("tensor".to_string());
        assert_eq!(FieldType::Scalar.num_comp(), Some(1));
        assert_eq!(FieldType::Vector.num_comp(), Some(3));
        assert_eq!(tensor.num_comp(), None);
        assert_eq!(format!("{}", FieldType::Vector), "vector");
        assert_eq!(format!("{}", tensor), "tensor");
    }

    #[test]
    fn geometry_and_format_parse() {
        assert_eq!("cartesian".parse::<Geometry>(), Ok(Geometry::Cartesian));
        assert_eq!("thetaMode".parse::<Geometry>(), Ok(Geometry::ThetaMode));
        assert_eq!("spherical".parse::<Geometry>().err(), Some("unsupported mesh geometry"));
        assert_eq!("ascii".parse::<VtkFormat>(), Ok(VtkFormat::Ascii));
        assert_eq!("binary".parse::<VtkFormat>(), Ok(VtkFormat::Binary));
        assert_eq!(VtkFormat::default(), VtkFormat::Binary);
        assert!("xml".parse::<VtkFormat>().is_err());
    }
}
