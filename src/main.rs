//! dcaspt2-input Command-Line Interface
//!
//! This module contains the main entry point for the dcaspt2-input program and
//! handles command-line argument parsing, help system integration, logging
//! setup and the input generation pipeline.
//!
//! # Usage
//!
//! dcaspt2-input supports two main commands:
//!
//! 1. **Input Creation** (`dcaspt2-input ci <listing_file> [output_file]`):
//!    Creates an orbital-table input file from an orbital listing
//!
//! 2. **Input Generation** (`dcaspt2-input <input_file>`):
//!    Prints the spinor summary and writes the IVO and CASPT2 inputs
//!
//! # Examples
//!
//! ```bash
//! # Create an input file from an orbital listing
//! dcaspt2-input ci orbitals.txt
//!
//! # Generate the DIRAC-CASPT2 inputs
//! dcaspt2-input h2o.inp
//! ```
//!
//! # Help System
//!
//! - `dcaspt2-input --help` - General help
//! - `dcaspt2-input --help keywords` - All input file keywords
//! - `dcaspt2-input --help categories` - Orbital categories
//! - `dcaspt2-input --help examples` - Example input files
//! - `dcaspt2-input ci --help` - Input creation help

use dcaspt2_input::caspt2::{active_electrons, render_caspt2_input};
use dcaspt2_input::controller::{Controller, Event, TextSummary};
use dcaspt2_input::settings::{SettingsManager, CONFIG_FILE_NAME};
use dcaspt2_input::{io, parser, validation};
use log::{info, warn};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::mpsc;

/// Main entry point for dcaspt2-input.
///
/// Loads the settings, initializes the logger, parses command-line arguments
/// and dispatches to the requested command. Exits with code 1 on any error.
fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    // Check for help flags before processing commands
    check_help_flags(&args);

    let settings = match SettingsManager::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Warning: {}; using built-in defaults", e);
            SettingsManager::defaults()
        }
    };

    let command = &args[1];

    match command.as_str() {
        "ci" => {
            init_logging(&settings, None);

            if args.len() < 3 {
                eprintln!("Error: Missing file argument");
                eprintln!("Usage:");
                eprintln!(
                    "  {} ci <listing_file> [output_file]  - Create input file",
                    args[0]
                );
                eprintln!(
                    "  {} ci {}              - Create settings template",
                    args[0], CONFIG_FILE_NAME
                );
                process::exit(1);
            }

            let file_arg = &args[2];

            if file_arg == CONFIG_FILE_NAME {
                match run_create_settings_template() {
                    Ok(()) => {
                        println!("✓ Settings template created successfully!");
                        println!("  Output file: {}", CONFIG_FILE_NAME);
                        println!("\nNext steps:");
                        println!("  1. Review and edit the {} file", CONFIG_FILE_NAME);
                        println!("  2. Adjust output file names and default active space as needed");
                        println!("  3. The settings will be automatically loaded by dcaspt2-input");
                    }
                    Err(e) => {
                        eprintln!("Error creating settings template: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                let listing_path = Path::new(file_arg);
                let output_path = args.get(3).map(Path::new);

                match run_create_input(listing_path, output_path, &settings) {
                    Ok(output_file) => {
                        println!("✓ Input file created successfully!");
                        println!("  Output file: {}", output_file.display());
                        println!("\nNext steps:");
                        println!("  1. Review the default classification in the *ORBITALS section");
                        println!("  2. Set totsym and the RAS limits as needed");
                        println!("  3. Run dcaspt2-input: {} {}", args[0], output_file.display());
                    }
                    Err(e) => {
                        eprintln!("Error creating input file: {}", e);
                        process::exit(1);
                    }
                }
            }
        }
        _ => {
            if !command.starts_with('-') {
                let input_path = Path::new(&args[1]);
                let debug_log_file = debug_log_path(&settings, input_path);
                init_logging(&settings, debug_log_file.as_deref());

                match run_generate(input_path, &settings, debug_log_file.as_deref()) {
                    Ok(()) => println!("\n****DIRAC-CASPT2 inputs written****"),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                eprintln!("Error: Unknown command: {}", command);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }
}

/// Initializes the console logger, or the debug log file when one is given.
///
/// The level comes from the `[logging]` settings; `RUST_LOG` overrides it.
fn init_logging(settings: &SettingsManager, debug_log_file: Option<&Path>) {
    let level = settings
        .logging()
        .level
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info);

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis();

    let target = match debug_log_file.map(fs::File::create) {
        Some(Ok(file)) => env_logger::Target::Pipe(Box::new(file)),
        Some(Err(e)) => {
            eprintln!("Warning: cannot create debug log file: {}", e);
            env_logger::Target::Stdout
        }
        None => env_logger::Target::Stdout,
    };
    builder.target(target).init();
}

/// Debug log file name for an input file, if file logging is enabled.
fn debug_log_path(settings: &SettingsManager, input_path: &Path) -> Option<PathBuf> {
    if !settings.logging().file_logging {
        return None;
    }
    let input_stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("job");
    Some(PathBuf::from(format!("dcaspt2_debug_{}.log", input_stem)))
}

/// Check for help flags and print appropriate help
fn check_help_flags(args: &[String]) {
    use dcaspt2_input::help::*;

    if args.len() >= 3 && (args[1] == "--help" || args[1] == "-h") {
        match args[2].as_str() {
            "keywords" => print_keyword_help(),
            "categories" => print_category_help(),
            "examples" => print_examples(),
            _ => print_global_help(),
        }
        process::exit(0);
    }

    if args.len() == 2 && (args[1] == "--help" || args[1] == "-h") {
        print_global_help();
        process::exit(0);
    }

    if args.len() >= 3 && args[1] == "ci" && (args[2] == "--help" || args[2] == "-h") {
        print_ci_help();
        process::exit(0);
    }
}

/// Prints usage information to stderr.
fn print_usage(program_name: &str) {
    eprintln!("dcaspt2-input - DIRAC-CASPT2 input generator");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} ci <listing_file> [output_file]", program_name);
    eprintln!("                    Create an input file from an orbital listing");
    eprintln!();
    eprintln!("  {} ci {}", program_name, CONFIG_FILE_NAME);
    eprintln!("                    Create a settings template file for configuration");
    eprintln!();
    eprintln!("  {} <input_file>", program_name);
    eprintln!("                    Write the IVO and CASPT2 inputs for the input file");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} ci orbitals.txt", program_name);
    eprintln!("  {} ci orbitals.txt h2o.inp", program_name);
    eprintln!("  {} h2o.inp", program_name);
}

/// Creates an input file from an orbital listing.
///
/// # Errors
///
/// Returns an error if the listing does not exist, has an unsupported
/// extension, cannot be parsed, or the output cannot be written.
fn run_create_input(
    listing_file: &Path,
    output_path: Option<&Path>,
    settings: &SettingsManager,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    use dcaspt2_input::template_generator::*;

    if !listing_file.exists() {
        return Err(format!("Listing file not found: {}", listing_file.display()).into());
    }

    if !is_supported_format(listing_file) {
        return Err("Unsupported file format. Supported formats: .txt, .out, .orb".into());
    }

    println!("Reading orbitals from: {}", listing_file.display());
    let template_content = generate_template_from_listing(listing_file, settings.general())?;

    let output_path = match output_path {
        Some(p) => p.to_path_buf(),
        None => get_default_output_path(listing_file),
    };

    write_template_to_file(&template_content, &output_path)?;

    Ok(output_path)
}

/// Creates a settings template in the current directory.
///
/// # Errors
///
/// Returns an error if the file already exists or cannot be written.
fn run_create_settings_template() -> Result<(), Box<dyn std::error::Error>> {
    let settings_path = Path::new(CONFIG_FILE_NAME);

    if settings_path.exists() {
        return Err(format!(
            "{} already exists. Please remove it first or choose a different location.",
            CONFIG_FILE_NAME
        )
        .into());
    }

    SettingsManager::create_template(settings_path)?;

    Ok(())
}

/// Prints the settings and input parameters in effect.
fn print_configuration(
    input_data: &parser::InputData,
    settings: &SettingsManager,
    debug_log_file: Option<&Path>,
) {
    let info = &input_data.info;
    let input = &input_data.user_input;

    println!("{}", "=".repeat(76));
    println!("CONFIGURATION AND SETTINGS");
    println!("{}", "=".repeat(76));
    println!();
    println!("Settings Configuration:");
    println!("  Source: {}", settings.config_source());
    println!();

    println!("Input File Parameters:");
    println!("  Electrons:                  {}", info.electron_number);
    match info.point_group {
        Some(pg) => println!("  Point Group:                {}", pg),
        None => println!("  Point Group:                unknown"),
    }
    if let Some(scheme) = &info.moltra_scheme {
        println!("  MOLTRA Scheme:              {}", scheme);
    }
    println!("  Orbitals:                   {}", input_data.snapshot.len());
    println!("  Target Symmetry:            {}", input.totsym);
    println!("  Selected Root:              {}", input.selectroot);
    println!("  DIRAC Version:              {}", input.diracver);
    println!("  Level Shifts (e/p):         {} / {}", input.eshift, input.pshift);

    println!("\nOutput Files:");
    println!("  IVO Input:                  {}", settings.ivo_path().display());
    println!("  CASPT2 Input:               {}", settings.caspt2_path().display());
    println!("  JSON Summary:               {}", settings.output().summary_json);
    if let Some(log_file) = debug_log_file {
        println!("  Debug Log File:             {}", log_file.display());
    }

    println!();
    println!("{}", "=".repeat(76));
    println!();
}

/// Runs the input generation pipeline for one input file.
///
/// 1. Parse the input file
/// 2. Feed the orbital table to the controller, which writes the IVO input
/// 3. Print the spinor summary
/// 4. Validate and write the CASPT2 input
/// 5. Write the JSON summary if enabled
fn run_generate(
    input_path: &Path,
    settings: &SettingsManager,
    debug_log_file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("**** dcaspt2-input: DIRAC-CASPT2 Input Generator ****");
    println!("              Version {}\n", env!("CARGO_PKG_VERSION"));

    let content = fs::read_to_string(input_path)?;
    let input_data =
        parser::parse_input_with_default_version(&content, settings.general().default_diracver)?;

    print_configuration(&input_data, settings, debug_log_file);

    if let Err(e) = validation::validate_input_data(&input_data) {
        warn!("Validation failed: {:?}", e.category);
        return Err(e.into());
    }

    let output_dir = Path::new(&settings.output().directory);
    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
    }

    let mut controller = Controller::new(
        input_data.info,
        input_data.user_input,
        TextSummary::default(),
        settings.ivo_path(),
    );

    let (sender, receiver) = mpsc::channel();
    sender.send(Event::ClassificationChanged(input_data.snapshot))?;
    drop(sender);
    controller.run(receiver)?;

    let derived = controller.derived().ok_or("No orbital table was processed")?;

    println!("Spinor Summary:");
    for line in controller.view().lines() {
        for part in line.lines() {
            println!("  {}", part);
        }
    }
    println!();

    if settings.general().print_level > 0 {
        println!("IVO Parameters:");
        println!(
            "  ninact = {}  nact = {}  nsec = {}  nelec = {}",
            derived.ivo.ninact, derived.ivo.nact, derived.ivo.nsec, derived.ivo.nelec
        );
        println!("  nocc   = {:?}", derived.ivo.nocc);
        if derived.ivo.has_cutoff() {
            println!("  nvcut  = {:?}", derived.ivo.nvcut);
        }
        println!(
            "  CASPT2 active electrons = {}",
            active_electrons(controller.info(), &derived.tally)
        );
        println!();
    }

    let caspt2 = render_caspt2_input(
        controller.snapshot(),
        &derived.tally,
        controller.info(),
        controller.input(),
    );
    io::write_caspt2_input(&caspt2, &settings.caspt2_path())?;
    info!("CASPT2 input written to {}", settings.caspt2_path().display());

    println!("IVO input:    {}", controller.ivo_path().display());
    println!("CASPT2 input: {}", settings.caspt2_path().display());

    if settings.output().summary_json {
        let summary_path = settings.summary_path(input_path);
        io::write_summary_json(derived, &summary_path)?;
        println!("JSON summary: {}", summary_path.display());
    }

    Ok(())
}
