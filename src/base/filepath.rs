use super::{ITERATION_DIGITS, VTK_EXTENSION};
use std::path::{Path, PathBuf};

/// Returns the iteration number zero-padded to seven digits
///
/// Iterations above 9999999 are not truncated.
pub fn iteration_string(iteration: u64) -> String {
    format!("{:0>width$}", iteration, width = ITERATION_DIGITS)
}

/// Returns the filename stem of the common-mesh fields file, e.g., "vtk_fields_0000003"
pub fn filename_fields(iteration: u64) -> String {
    format!("vtk_fields_{}", iteration_string(iteration))
}

/// Returns the filename stem of a single field or field component, e.g., "vtk_fields_Ex_0000003"
///
/// # Input
///
/// * `field_full` -- the field name with the component suffix, if any (e.g., "rho" or "Ex")
pub fn filename_field_component(field_full: &str, iteration: u64) -> String {
    format!("vtk_fields_{}_{}", field_full, iteration_string(iteration))
}

/// Returns the filename stem of a species file, e.g., "vtk_specie_electrons_0000003"
pub fn filename_species(species: &str, iteration: u64) -> String {
    format!("vtk_specie_{}_{}", species, iteration_string(iteration))
}

/// Returns the full path of a VTK file
///
/// # Input
///
/// * `out_dir` -- the output directory
/// * `stem` -- the filename without extension; ".vtk" will be added
pub fn filepath_vtk(out_dir: &Path, stem: &str) -> PathBuf {
    let mut filename = String::from(stem);
    filename.push('.');
    filename.push_str(VTK_EXTENSION);
    out_dir.join(filename)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_string_works() {
        assert_eq!(iteration_string(0), "0000000");
        assert_eq!(iteration_string(3), "0000003");
        assert_eq!(iteration_string(1234567), "1234567");
        assert_eq!(iteration_string(12345678), "12345678");
        for iteration in [0, 1, 9, 10, 99, 500, 65_536, 999_999, 9_999_999] {
            let suffix = iteration_string(iteration);
            assert_eq!(suffix.len(), 7);
            assert_eq!(suffix.parse::<u64>().unwrap(), iteration);
        }
    }

    #[test]
    fn filenames_work() {
        assert_eq!(filename_fields(3), "vtk_fields_0000003");
        assert_eq!(filename_field_component("Ex", 20), "vtk_fields_Ex_0000020");
        assert_eq!(filename_field_component("rho", 20), "vtk_fields_rho_0000020");
        assert_eq!(filename_species("electrons", 100), "vtk_specie_electrons_0000100");
        assert_eq!(
            filepath_vtk(Path::new("/tmp/opmd2vtk"), "vtk_fields_0000003"),
            PathBuf::from("/tmp/opmd2vtk/vtk_fields_0000003.vtk")
        );
    }
}
