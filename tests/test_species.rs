use opmd2vtk::prelude::*;
use opmd2vtk::StrError;
use std::fs;

fn particle_series() -> Result<MemorySeries, StrError> {
    let mut series = MemorySeries::new();
    series.add_species("electrons").add_species("ions");
    for species in ["electrons", "ions"] {
        series
            .set_particle_data(species, "x", 5, &[0.0, 1.0, 2.0, 3.0])?
            .set_particle_data(species, "y", 5, &[0.0, 0.0, 0.0, 0.0])?
            .set_particle_data(species, "z", 5, &[1.0, 2.0, 3.0, 4.0])?
            .set_particle_data(species, "ux", 5, &[0.0, 0.0, 0.0, 0.0])?
            .set_particle_data(species, "uy", 5, &[0.0, 0.0, 0.0, 0.0])?
            .set_particle_data(species, "uz", 5, &[1.0, 3.0, 6.0, 9.0])?
            .set_particle_data(species, "w", 5, &[1.0, 1.0, 1.0, 1.0])?;
    }
    Ok(series)
}

#[test]
fn test_species_all_particles() -> Result<(), StrError> {
    let series = particle_series()?;
    let dir = tempfile::tempdir().map_err(|_| "cannot create temporary directory")?;
    let converter = Opmd2Vtk::new(&series, dir.path())?;
    let mut options = SpeciesOptions::new();
    options.set_format(VtkFormat::Ascii);
    let paths = converter.write_species_vtk(5, &options)?;
    assert_eq!(
        paths,
        &[
            dir.path().join("vtk_specie_electrons_0000005.vtk"),
            dir.path().join("vtk_specie_ions_0000005.vtk"),
        ]
    );
    let contents = fs::read_to_string(&paths[0]).map_err(|_| "cannot read file")?;
    assert!(contents.contains("POLYDATA"));
    assert!(contents.contains("POINTS 4"));
    assert!(contents.contains("VERTICES 4 8"));
    for name in ["ux", "uy", "uz", "w"] {
        assert!(contents.contains(&format!("SCALARS {}", name)));
    }
    Ok(())
}

#[test]
fn test_species_selection() -> Result<(), StrError> {
    let series = particle_series()?;
    let dir = tempfile::tempdir().map_err(|_| "cannot create temporary directory")?;
    let converter = Opmd2Vtk::new(&series, dir.path())?;

    // strict bounds: 1 < uz < 9 keeps two particles
    let mut select = Selection::new();
    select.add_rule("uz:1:9")?;
    let mut options = SpeciesOptions::new();
    options
        .set_species(&["electrons"])
        .set_scalars(&["uz"])
        .set_select(select)
        .set_format(VtkFormat::Ascii);
    let paths = converter.write_species_vtk(5, &options)?;
    assert_eq!(paths.len(), 1);
    let contents = fs::read_to_string(&paths[0]).map_err(|_| "cannot read file")?;
    assert!(contents.contains("POINTS 2"));
    assert!(contents.contains("SCALARS uz"));
    assert!(!contents.contains("SCALARS ux"));

    // nothing selected is not an error
    let mut select = Selection::new();
    select.add("uz", Some(100.0), None);
    options.set_select(select);
    let paths = converter.write_species_vtk(5, &options)?;
    assert_eq!(paths.len(), 1);
    let contents = fs::read_to_string(&paths[0]).map_err(|_| "cannot read file")?;
    assert!(contents.contains("POINTS 0"));
    Ok(())
}

#[test]
fn test_species_zmin_fixed() -> Result<(), StrError> {
    let series = particle_series()?;
    let dir = tempfile::tempdir().map_err(|_| "cannot create temporary directory")?;
    let converter = Opmd2Vtk::new(&series, dir.path())?;
    let mut options = SpeciesOptions::new();
    options
        .set_species(&["ions"])
        .set_scalars(&[])
        .set_zmin_fixed(0.0)
        .set_format(VtkFormat::Ascii);
    let paths = converter.write_species_vtk(5, &options)?;
    let contents = fs::read_to_string(&paths[0]).map_err(|_| "cannot read file")?;

    // without fields, the lowest particle moves to z = 0
    let start = contents.find("POINTS 4").map(|i| i + "POINTS 4".len()).unwrap_or(0);
    let coords: Vec<f64> = contents[start..]
        .split_whitespace()
        .skip(1) // data type
        .take(12)
        .filter_map(|token| token.parse().ok())
        .collect();
    assert_eq!(coords, &[0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 2.0, 0.0, 2.0, 3.0, 0.0, 3.0]);
    Ok(())
}
