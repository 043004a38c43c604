use log::*;
use opmd2vtk::prelude::*;
use opmd2vtk::StrError;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "opmd2vtk",
    about = "Converts openPMD fields and particle species to VTK files for visualization with Paraview"
)]
struct Options {
    /// openPMD series written with the JSON backend (a file or a directory of files)
    input: String,

    /// Output directory
    #[structopt(short = "o", long = "output")]
    output: Option<String>,

    /// Iterations to convert (all by default)
    #[structopt(short = "i", long = "iterations")]
    iterations: Vec<u64>,

    /// Fields to convert (all by default)
    #[structopt(long)]
    fields: Vec<String>,

    /// Species to convert (all by default)
    #[structopt(long)]
    species: Vec<String>,

    /// Per-particle quantities attached to the points (ux uy uz w by default)
    #[structopt(long)]
    scalars: Vec<String>,

    /// Particle selection rules formatted as quantity:min:max, e.g., uz:5:
    #[structopt(long)]
    select: Vec<String>,

    /// Writes ascii instead of binary files
    #[structopt(long)]
    ascii: bool,

    /// Fixed z-origin of the visualization domain
    #[structopt(long)]
    zmin_fixed: Option<f64>,

    /// Number of azimuthal intervals of cylindrical meshes
    #[structopt(long)]
    nth: Option<usize>,

    /// Writes each field component to its own file
    #[structopt(long)]
    separate: bool,

    /// Does not convert the fields
    #[structopt(long)]
    skip_fields: bool,

    /// Does not convert the species
    #[structopt(long)]
    skip_species: bool,

    /// JSON file with the conversion options (the flags above take precedence)
    #[structopt(long)]
    config: Option<String>,

    /// Increases the verbosity (-v, -vv)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// Disables the log messages
    #[structopt(short = "q", long = "quiet")]
    quiet: bool,
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();
    logging_init(options.verbose + 2, options.quiet)?;
    let config = conversion_config(&options)?;

    // load data
    info!("Reading {}", options.input);
    let series = JsonSeries::open(&options.input)?;
    let iterations = if options.iterations.is_empty() {
        series.iterations()
    } else {
        options.iterations.clone()
    };

    // write VTK files
    let output = options.output.as_deref().unwrap_or(DEFAULT_OUT_DIR);
    let converter = Opmd2Vtk::new(&series, output)?;
    let mut count = 0;
    for iteration in &iterations {
        debug!("iteration {}", iteration);
        if !options.skip_fields && !series.avail_fields().is_empty() {
            count += converter.write_fields_vtk(*iteration, &config.fields)?.len();
        }
        if !options.skip_species && !series.avail_species().is_empty() {
            count += converter.write_species_vtk(*iteration, &config.species)?.len();
        }
    }

    // message
    let dir = converter.output_dir().display().to_string();
    let thin_line = format!("{:─^1$}", "", dir.len());
    println!("\n\n{}", thin_line);
    println!("{} VTK files generated for {} iterations in:", count, iterations.len());
    println!("{}", dir);
    println!("{}\n\n", thin_line);
    Ok(())
}

/// Sets up the log messages on stderr (verbosity 2 shows the info messages)
fn logging_init(verbosity: usize, quiet: bool) -> Result<(), StrError> {
    stderrlog::new()
        .module(module_path!())
        .quiet(quiet)
        .verbosity(verbosity)
        .show_level(false)
        .color(stderrlog::ColorChoice::Never)
        .timestamp(stderrlog::Timestamp::Off)
        .init()
        .map_err(|_| "cannot initialize the log messages")
}

/// Reads the configuration file, if any, and applies the command line flags
fn conversion_config(options: &Options) -> Result<ConversionConfig, StrError> {
    let mut config = match &options.config {
        Some(path) => ConversionConfig::read_json(path)?,
        None => ConversionConfig::default(),
    };
    if !options.fields.is_empty() {
        config.fields.fields = Some(options.fields.clone());
    }
    if !options.species.is_empty() {
        config.species.species = Some(options.species.clone());
    }
    if !options.scalars.is_empty() {
        config.species.scalars = options.scalars.clone();
    }
    let mut select = Selection::new();
    for rule in &options.select {
        select.add_rule(rule)?;
    }
    if !select.is_empty() {
        config.species.set_select(select);
    }
    if options.ascii {
        config.fields.set_format(VtkFormat::Ascii);
        config.species.set_format(VtkFormat::Ascii);
    }
    if let Some(zmin) = options.zmin_fixed {
        config.fields.set_zmin_fixed(zmin);
        config.species.set_zmin_fixed(zmin);
    }
    if let Some(nth) = options.nth {
        config.fields.set_nth(nth)?;
    }
    if options.separate {
        config.fields.set_common_mesh(false);
    }
    Ok(config)
}
