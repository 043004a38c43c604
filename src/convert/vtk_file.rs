use crate::base::VtkFormat;
use crate::StrError;
use std::path::Path;
use vtkio::model::{ByteOrder, DataSet, Vtk};

/// Writes a legacy VTK file
///
/// # Input
///
/// * `data` -- the data set (mesh or point cloud) with its point data
/// * `title` -- the title written in the header of the file
/// * `path` -- the path of the file (must end with `.vtk`)
/// * `format` -- ascii or big-endian binary
pub(crate) fn write_vtk(data: DataSet, title: &str, path: &Path, format: VtkFormat) -> Result<(), StrError> {
    let vtk = Vtk {
        version: (4, 2).into(),
        title: title.to_string(),
        byte_order: ByteOrder::BigEndian,
        data,
        file_path: None,
    };
    match format {
        VtkFormat::Ascii => vtk.export_ascii(path).map_err(|_| "cannot write VTK file"),
        VtkFormat::Binary => vtk.export_be(path).map_err(|_| "cannot write VTK file"),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::write_vtk;
    use crate::base::VtkFormat;
    use crate::convert::Mesh;
    use std::fs;
    use vtkio::model::Attributes;

    fn no_data() -> Attributes {
        Attributes {
            point: Vec::new(),
            cell: Vec::new(),
        }
    }

    #[test]
    fn write_vtk_captures_errors() {
        let mesh = Mesh::Regular {
            dimensions: [1, 1, 1],
            origin: [0.0; 3],
            spacing: [1.0; 3],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("mesh.vtk");
        assert_eq!(
            write_vtk(mesh.to_dataset(no_data()), "mesh", &path, VtkFormat::Ascii).err(),
            Some("cannot write VTK file")
        );
    }

    #[test]
    fn write_vtk_works() {
        let mesh = Mesh::Regular {
            dimensions: [2, 3, 1],
            origin: [0.0, 1.0, 0.0],
            spacing: [0.5, 0.5, 1.0],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.vtk");
        write_vtk(mesh.to_dataset(no_data()), "mesh", &path, VtkFormat::Ascii).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("STRUCTURED_POINTS"));
        assert!(contents.contains("DIMENSIONS"));

        let path = dir.path().join("mesh_binary.vtk");
        write_vtk(mesh.to_dataset(no_data()), "mesh", &path, VtkFormat::Binary).unwrap();
        assert!(path.exists());
    }
}
