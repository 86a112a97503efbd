//! kiimail CLI
//!
//! Commands: compile, validate

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use kiimail_builder::{compile, parse_document, validate_document, EmailError};
use kiimail_dispatch::{HtmlToText, PlainTextConverter, TextOptions};

#[derive(Parser)]
#[command(name = "kiimail")]
#[command(about = "Compile and check stored email templates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a template to HTML
    Compile {
        /// Template JSON file
        file: PathBuf,

        /// Print the plaintext alternative instead of HTML
        #[arg(long)]
        text: bool,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check one or more templates for structural errors
    Validate {
        /// Template JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile { file, text, output } => run_compile(&file, text, output.as_deref()),
        Commands::Validate { files } => run_validate(&files),
    }
}

fn read_template(path: &Path) -> Result<String, EmailError> {
    fs::read_to_string(path)
        .map_err(|e| EmailError::MalformedDocument(format!("Failed to read file: {}", e)))
}

fn run_compile(file: &Path, text: bool, output: Option<&Path>) -> ExitCode {
    let result = read_template(file).and_then(|raw| parse_document(&raw));
    let doc = match result {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("✗ {}: {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let html = compile(&doc);
    let rendered = if text {
        match PlainTextConverter.convert(&html, &TextOptions::default()) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("✗ {}: {}", file.display(), e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        html
    };

    match output {
        Some(path) => match fs::write(path, rendered) {
            Ok(()) => {
                println!("✓ {} -> {}", file.display(), path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("✗ failed to write {}: {}", path.display(), e);
                ExitCode::FAILURE
            }
        },
        None => {
            println!("{}", rendered);
            ExitCode::SUCCESS
        }
    }
}

fn run_validate(files: &[PathBuf]) -> ExitCode {
    let mut exit_code = ExitCode::SUCCESS;

    for file in files {
        let result = read_template(file)
            .and_then(|raw| parse_document(&raw))
            .and_then(|doc| validate_document(&doc));
        match result {
            Ok(()) => println!("✓ {} is valid", file.display()),
            Err(e) => {
                eprintln!("✗ {} has errors:", file.display());
                eprintln!("  {}", e);
                exit_code = ExitCode::FAILURE;
            }
        }
    }

    exit_code
}
