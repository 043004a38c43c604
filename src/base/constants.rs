/// Defines the directory where the VTK files are saved
pub const DEFAULT_OUT_DIR: &str = "./diags/vtk";

/// Defines the default number of azimuthal samples for thetaMode geometries
pub const DEFAULT_NTH: usize = 24;

/// Defines the number of digits of the iteration suffix in filenames
pub const ITERATION_DIGITS: usize = 7;

/// Defines the extension of the legacy VTK files
pub const VTK_EXTENSION: &str = "vtk";

/// Defines the speed of light in vacuum (m/s)
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Defines the Cartesian components of vector fields
pub const CARTESIAN_COMPONENTS: [&str; 3] = ["x", "y", "z"];

/// Defines the default per-particle quantities written for each species
pub const DEFAULT_SPECIES_SCALARS: [&str; 4] = ["ux", "uy", "uz", "w"];
