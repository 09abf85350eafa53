use std::path::Path;

use clap::{Parser, Subcommand};
use log::info;
use survey_chainage::{
    annotate_records, build_centerline,
    config::MAX_DECIMALS,
    feature::feature_name,
    geometry::Point,
    io::{read_options_json, read_records_csv, write_records_csv, PointFileFormat},
    record::FEATURE_NAME,
    Centerline, ChainageReference, ProjectionOptions, Projector, Rounding,
};

fn parse_format(s: &str) -> Result<PointFileFormat, String> {
    PointFileFormat::from_str(s)
        .ok_or_else(|| format!("unknown point file format '{s}' (header, pnezd, penzd, pencd, pnecd)"))
}

fn parse_rounding(s: &str) -> Result<Rounding, String> {
    Rounding::from_str(s).ok_or_else(|| format!("unknown rounding mode '{s}' (half-away, half-even)"))
}

/// Locate survey points along a centerline by chainage and offset.
#[derive(Parser)]
#[command(name = "survey_chainage_cli", version)]
struct Cli {
    /// JSON file with projection options
    #[arg(long, global = true)]
    config: Option<String>,
    /// Decimal places for chainage and offset (at most 15)
    #[arg(
        long,
        global = true,
        value_parser = clap::value_parser!(u32).range(0..=MAX_DECIMALS as i64)
    )]
    decimals: Option<u32>,
    /// Rounding of ties: half-away or half-even
    #[arg(long, global = true, value_parser = parse_rounding)]
    rounding: Option<Rounding>,
    /// Report stored alignment chainages instead of arc length from the first point
    #[arg(long, global = true)]
    stored_chainage: bool,
    /// Column layout of the alignment file
    #[arg(long, global = true, default_value = "pencd", value_parser = parse_format)]
    alignment_format: PointFileFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a survey file with chainage and offset against an alignment file.
    Project {
        alignment: String,
        survey: String,
        /// Output CSV file or directory; a timestamped name is used for directories
        output: Option<String>,
        /// Column layout of the survey file
        #[arg(long, default_value = "pnezd", value_parser = parse_format)]
        survey_format: PointFileFormat,
        /// Add a FeatureName column built from the description and feature columns
        #[arg(long)]
        feature_names: bool,
        /// Project points on all cores
        #[arg(long)]
        parallel: bool,
    },
    /// Summarize the centerline built from an alignment file.
    Centerline { alignment: String },
    /// Compute chainage and offset of a single coordinate pair.
    Locate {
        alignment: String,
        #[arg(allow_negative_numbers = true)]
        easting: f64,
        #[arg(allow_negative_numbers = true)]
        northing: f64,
    },
}

fn projection_options(cli: &Cli) -> survey_chainage::Result<ProjectionOptions> {
    let mut options = match &cli.config {
        Some(path) => read_options_json(path)?,
        None => ProjectionOptions::default(),
    };
    if let Some(decimals) = cli.decimals {
        options.decimals = decimals;
    }
    if let Some(rounding) = cli.rounding {
        options.rounding = rounding;
    }
    if cli.stored_chainage {
        options.chainage_reference = ChainageReference::Stored;
    }
    Ok(options)
}

fn load_centerline(path: &str, format: PointFileFormat) -> survey_chainage::Result<Centerline> {
    let records = read_records_csv(path, format)?;
    build_centerline(&records)
}

/// Resolves the output file, naming it `Survey_Report_<timestamp>.csv` when
/// only a directory (or nothing) is given.
fn output_path(output: Option<&str>) -> String {
    let name = format!(
        "Survey_Report_{}.csv",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    );
    match output {
        Some(path) if Path::new(path).is_dir() => {
            Path::new(path).join(name).to_string_lossy().into_owned()
        }
        Some(path) => path.to_string(),
        None => name,
    }
}

fn run(cli: &Cli) -> survey_chainage::Result<()> {
    let mut options = projection_options(cli)?;
    match &cli.command {
        Commands::Project {
            alignment,
            survey,
            output,
            survey_format,
            feature_names,
            parallel,
        } => {
            options.parallel |= *parallel;
            let centerline = load_centerline(alignment, cli.alignment_format)?;
            let records = read_records_csv(survey, *survey_format)?;
            let mut annotated = annotate_records(&records, &centerline, &options)?;
            if *feature_names {
                for rec in &mut annotated {
                    let name = feature_name(rec);
                    rec.set(FEATURE_NAME, name);
                }
            }
            let output = output_path(output.as_deref());
            write_records_csv(&output, &annotated)?;
            info!("projected {} point(s) onto {}", annotated.len(), alignment);
            println!("Projected {} point(s)", annotated.len());
            println!("Wrote {}", output);
        }
        Commands::Centerline { alignment } => {
            let centerline = load_centerline(alignment, cli.alignment_format)?;
            println!("Vertices: {}", centerline.len());
            println!("Distinct vertices: {}", centerline.distinct_vertex_count());
            println!("Length: {}", options.format(centerline.length()));
            println!("Start chainage: {}", options.format(centerline.start_chainage()));
            println!("End chainage: {}", options.format(centerline.end_chainage()));
        }
        Commands::Locate {
            alignment,
            easting,
            northing,
        } => {
            let centerline = load_centerline(alignment, cli.alignment_format)?;
            let projector = Projector::new(&centerline, options)?;
            let proj = projector.project_point(Point::new(*easting, *northing))?;
            println!(
                "{},{}",
                options.format(proj.chainage),
                options.format(proj.offset)
            );
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env().init();
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
