//! PackedXML CLI - convert BigWorld packed section files to plain XML.
//!
//! This is the main entry point for the packedxml command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use packedxml::{Dictionary, Header, PackedXml, Settings};
use packedxml_common::BinaryReader;

/// PackedXML - BigWorld packed section conversion tool
#[derive(Parser)]
#[command(name = "packedxml")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a packed section file to XML
    Convert {
        /// Input packed section file
        #[arg(short, long)]
        input: PathBuf,

        /// Output XML file
        #[arg(short, long)]
        output: PathBuf,

        /// Name for the synthetic root element
        #[arg(long, default_value = "packedSection")]
        root_name: String,

        /// Wrap stray leading text of mixed-content elements into a <value> child
        #[arg(long)]
        fix_unnamed_values: bool,
    },

    /// Convert every packed section found under a directory
    Extract {
        /// Input directory
        #[arg(short, long, env = "INPUT_FOLDER")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "OUTPUT_FOLDER")]
        output: PathBuf,

        /// Only convert files whose path contains this substring
        #[arg(short, long)]
        filter: Option<String>,

        /// Name for the synthetic root element
        #[arg(long, default_value = "packedSection")]
        root_name: String,

        /// Wrap stray leading text of mixed-content elements into a <value> child
        #[arg(long)]
        fix_unnamed_values: bool,
    },

    /// Print the string dictionary of a packed section
    Strings {
        /// Input packed section file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            root_name,
            fix_unnamed_values,
        } => {
            let settings = Settings {
                root_name,
                fix_unnamed_values,
            };
            cmd_convert(&input, &output, &settings)?;
        }
        Commands::Extract {
            input,
            output,
            filter,
            root_name,
            fix_unnamed_values,
        } => {
            let settings = Settings {
                root_name,
                fix_unnamed_values,
            };
            cmd_extract(&input, &output, filter.as_deref(), &settings)?;
        }
        Commands::Strings { input } => {
            cmd_strings(&input)?;
        }
    }

    Ok(())
}

fn cmd_convert(input: &Path, output: &Path, settings: &Settings) -> Result<()> {
    println!("Converting: {} -> {}", input.display(), output.display());

    let data = fs::read(input).context("Failed to read input file")?;

    if !PackedXml::is_packed_xml(&data) {
        anyhow::bail!("Input file is not a packed section");
    }

    let packed = PackedXml::parse_with(&data, settings).context("Failed to decode packed section")?;
    let xml = packed.to_xml_string().context("Failed to render XML")?;
    fs::write(output, xml).context("Failed to write output file")?;

    println!("Conversion complete");

    Ok(())
}

fn cmd_extract(input: &Path, output: &Path, filter: Option<&str>, settings: &Settings) -> Result<()> {
    println!("Scanning: {}", input.display());

    let candidates: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            filter
                .map(|pattern| path.to_string_lossy().contains(pattern))
                .unwrap_or(true)
        })
        .collect();

    println!("Converting up to {} files...", candidates.len());

    let pb = ProgressBar::new(candidates.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut converted = 0;
    let mut skipped = 0;
    let mut errors = 0;

    for path in &candidates {
        pb.inc(1);

        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                errors += 1;
                continue;
            }
        };

        // Everything else in a game's res tree (textures, scripts, plain
        // XML) is skipped silently.
        if !PackedXml::is_packed_xml(&data) {
            skipped += 1;
            continue;
        }

        let relative = path.strip_prefix(input).unwrap_or(path);
        let output_path = output.join(relative).with_extension("xml");

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        match convert_one(&data, path, settings) {
            Ok(xml) => {
                fs::write(&output_path, xml)?;
                converted += 1;
            }
            Err(e) => {
                eprintln!("Error converting {}: {}", path.display(), e);
                errors += 1;
            }
        }
    }

    pb.finish_with_message("Done");
    println!(
        "Converted {} files in {:?} ({} skipped, {} errors)",
        converted,
        start.elapsed(),
        skipped,
        errors
    );

    Ok(())
}

fn convert_one(data: &[u8], path: &Path, settings: &Settings) -> Result<String> {
    let packed = PackedXml::parse_with(data, settings)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    let xml = packed.to_xml_string().context("Failed to render XML")?;
    Ok(xml)
}

fn cmd_strings(input: &Path) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;

    let source = format!(
        "file \"{}\"",
        input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string())
    );

    let mut reader = BinaryReader::new(&data);
    let header = Header::read(&mut reader, &source)?;
    let dictionary = Dictionary::read(&mut reader)?;

    println!("Version: {}", header.version);
    for (index, name) in dictionary.iter().enumerate() {
        println!("{index:>6}  {name}");
    }
    println!("\nTotal: {} entries", dictionary.len());

    Ok(())
}
