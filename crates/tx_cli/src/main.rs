use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tx_ast::TransformOptions;
use tx_parser::parse_snapshot;
use tx_transform::transform;

mod tracing_config;

#[derive(Parser)]
#[command(name = "txc", about = "Compile tx/tm class-name helpers out of JavaScript and TypeScript")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile helper calls and rewrite the helper import.
    Transform {
        /// Input .js/.jsx/.ts/.tsx file.
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write a source map next to the output.
        #[arg(long)]
        source_map: bool,
        /// Module the surviving import should point at.
        #[arg(long)]
        module_name: Option<String>,
        /// Give up after this many rewrite passes.
        #[arg(long)]
        max_passes: Option<usize>,
    },
    /// Run the transform and report any error without writing output.
    Check {
        input: PathBuf,
        #[arg(long)]
        module_name: Option<String>,
    },
    /// Parse and dump the AST.
    Parse {
        input: PathBuf,
        /// Dump as JSON instead of Rust debug output.
        #[arg(long)]
        ast: bool,
    },
}

fn read_input(input: &Path) -> Result<(String, String)> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    Ok((source, input.display().to_string()))
}

fn main() -> Result<()> {
    tracing_config::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Transform {
            input,
            output,
            source_map,
            module_name,
            max_passes,
        } => {
            let (source, filename) = read_input(&input)?;

            let mut options = TransformOptions::default().with_file_name(&filename);
            if let Some(module_name) = module_name {
                options = options.with_module_name(module_name);
            }
            if let Some(max_passes) = max_passes {
                options.max_passes = max_passes;
            }

            let result = transform(&source, &options)
                .with_context(|| format!("failed to transform {filename}"))?;

            match &output {
                Some(path) => std::fs::write(path, &result.code)?,
                None => print!("{}", result.code),
            }

            if source_map {
                let mut json = Vec::new();
                result
                    .map
                    .to_writer(&mut json)
                    .context("failed to serialize source map")?;
                let map_path = match &output {
                    Some(path) => format!("{}.map", path.display()),
                    None => format!("{filename}.map"),
                };
                std::fs::write(&map_path, json)?;
                eprintln!("Source map written to {map_path}");
            }
        }
        Commands::Check { input, module_name } => {
            let (source, filename) = read_input(&input)?;
            let mut options = TransformOptions::default().with_file_name(&filename);
            if let Some(module_name) = module_name {
                options = options.with_module_name(module_name);
            }
            transform(&source, &options)
                .with_context(|| format!("failed to transform {filename}"))?;
            eprintln!("OK: {filename}");
        }
        Commands::Parse { input, ast } => {
            let (source, filename) = read_input(&input)?;
            let snapshot = parse_snapshot(&source, &filename)?;

            if ast {
                let json = serde_json::to_string_pretty(&snapshot.module)?;
                println!("{json}");
            } else {
                println!("{:#?}", snapshot.module);
            }
        }
    }

    Ok(())
}
