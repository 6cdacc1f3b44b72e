use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process;
use suvmap_core::cli::{Cli, OutputFormat};
use suvmap_core::pipeline::{discovery, resolve};
use suvmap_core::{InMemoryIndex, LoadablesReport, ResolveOptions, RwvmLoadable};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if !cli.directory.is_dir() {
        eprintln!("Error: {} is not a directory", cli.directory.display());
        process::exit(1);
    }

    info!("scanning directory: {}", cli.directory.display());

    let dicom_files = match collect_dicom_files(&cli.directory) {
        Ok(files) => files,
        Err(e) => {
            error!("failed to read directory: {}", e);
            eprintln!("Error: failed to read directory: {}", e);
            process::exit(1);
        }
    };

    if dicom_files.is_empty() {
        eprintln!("Error: no DICOM files found in directory");
        process::exit(1);
    }

    info!("found {} DICOM files", dicom_files.len());

    let index = InMemoryIndex::from_files(dicom_files);
    let loadables = discovery::examine(&index.series_groups(), &index);

    if loadables.is_empty() {
        eprintln!("No RWVM objects found");
        process::exit(1);
    }

    info!("found {} RWVM interpretations", loadables.len());

    let options = ResolveOptions { strict: cli.strict };
    let mut resolved = Vec::new();
    for loadable in loadables {
        let name = loadable.name.clone();
        match resolve::resolve_references(loadable, &index, &options) {
            Ok(loadable) => resolved.push(loadable),
            Err(e) => {
                error!("failed to resolve '{}': {}", name, e);
                if cli.strict {
                    eprintln!("Error: failed to resolve '{}': {}", name, e);
                    process::exit(1);
                }
            }
        }
    }

    output_loadables(&resolved, cli.format);
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn collect_dicom_files(directory: &PathBuf) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension() {
                if ext.eq_ignore_ascii_case("dcm") || ext.eq_ignore_ascii_case("dicom") {
                    files.push(path);
                }
            } else if is_dicom_file(&path) {
                info!("found headerless DICOM file: {}", path.display());
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Checks for the 128-byte preamble followed by the "DICM" magic string
fn is_dicom_file(path: &PathBuf) -> bool {
    use std::fs::File;
    use std::io::Read;

    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let mut buffer = [0u8; 132];
    match file.read(&mut buffer) {
        Ok(n) if n >= 132 => &buffer[128..132] == b"DICM",
        _ => false,
    }
}

fn output_loadables(loadables: &[RwvmLoadable], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", LoadablesReport::new(loadables));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(loadables) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("failed to serialize to JSON: {}", e);
                        eprintln!("Error: failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                log::warn!("JSON output requested without the 'json' feature");
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}
