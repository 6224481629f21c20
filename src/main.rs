use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use typebridge::config::{load_config, merge_with_cli_args};
use typebridge::output::{run_formatter, run_hook, write_files, write_if_changed};
use typebridge::parsers::openapi_parser::load_value;
use typebridge::{
    assemble_document, validate_document, GeneratorRegistry, ParserRegistry, RouteManifest,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config file (overrides default location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an OpenAPI 3.1 document from an analyzer route manifest
    Openapi {
        /// Route manifest JSON
        manifest: PathBuf,

        /// Output file for the document
        #[arg(short, long, default_value = "openapi.json")]
        output: PathBuf,
    },

    /// Generate a TypeScript client from an OpenAPI document
    Client {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        spec: Option<PathBuf>,

        /// Output directory for generated code
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report structural problems in an OpenAPI document
    Validate {
        /// Path to the OpenAPI document (YAML or JSON)
        document: PathBuf,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    match args.command {
        Command::Openapi { manifest, output } => {
            build_document(args.config.as_deref(), &manifest, &output)
        }
        Command::Client { spec, output } => generate_client(args.config.as_deref(), spec, output),
        Command::Validate { document } => validate(&document),
    }
}

fn build_document(config_path: Option<&Path>, manifest: &Path, output: &Path) -> Result<()> {
    let config = load_config(config_path)?;

    let content = fs::read_to_string(manifest)
        .with_context(|| format!("Failed to read route manifest: {:?}", manifest))?;
    let manifest = RouteManifest::from_json(&content)?;

    let document = assemble_document(&manifest, &config.document);
    let json = document.to_json_pretty()?;

    let value: serde_json::Value = serde_json::from_str(&json)?;
    for violation in validate_document(&value) {
        warn!(path = %violation.path, "{}", violation.message);
    }

    write_if_changed(output, &json)
        .with_context(|| format!("Failed to write document: {:?}", output))?;
    info!(path = %output.display(), "Wrote OpenAPI document.");
    Ok(())
}

fn generate_client(
    config_path: Option<&Path>,
    spec: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let merged_config = merge_with_cli_args(config, spec, output);

    let input_config = merged_config.input.ok_or_else(|| {
        anyhow::anyhow!("No input source specified. Use --spec or configure input in config file")
    })?;

    info!(source = %input_config.source.display(), "Reading input.");

    let parser_registry = ParserRegistry::new();

    // Determine input format (explicit or auto-detect)
    let format = input_config.format.clone().unwrap_or_else(|| {
        parser_registry
            .detect_format(&input_config.source)
            .unwrap_or("openapi")
            .to_string()
    });

    let parser = parser_registry
        .get(&format)
        .ok_or_else(|| anyhow::anyhow!("Unknown input format: {}", format))?;

    let document = parser
        .parse(&input_config.source)
        .with_context(|| format!("Failed to parse {} input", format))?;

    info!(
        format = %format,
        components = document.components.len(),
        operations = document.operations.len(),
        "Parsed input."
    );

    let generator_registry = GeneratorRegistry::new();
    let output_dir = merged_config
        .output
        .unwrap_or_else(|| PathBuf::from("generated"));

    for hook in &merged_config.hooks.before_generate {
        run_hook(hook)?;
    }

    let mut written = Vec::new();
    let mut generated_count = 0;
    for gen_config in &merged_config.generations {
        if !gen_config.enabled {
            info!(generator = %gen_config.generator, "Skipping disabled generator.");
            continue;
        }

        let generator = generator_registry.get(&gen_config.generator).ok_or_else(|| {
            anyhow::anyhow!(
                "{} (available: {})",
                typebridge::Error::UnknownGenerator(gen_config.generator.clone()),
                generator_registry.available_generators().join(", ")
            )
        })?;

        generator.validate_config(gen_config)?;

        let files = generator
            .generate_from_ir(&document, gen_config)
            .with_context(|| format!("Failed to generate with '{}'", gen_config.generator))?;

        let target = match &gen_config.output_dir {
            Some(dir) => output_dir.join(dir),
            None => output_dir.clone(),
        };
        written.extend(write_files(&target, &files)?);
        generated_count += 1;
    }

    if let Some(formatter) = &merged_config.formatter {
        run_formatter(formatter, &written);
    }

    for hook in &merged_config.hooks.after_generate {
        run_hook(hook)?;
    }

    if generated_count == 0 {
        warn!("No generators were enabled. Check your configuration.");
    } else {
        info!(
            generators = generated_count,
            changed = written.len(),
            "Generation finished."
        );
    }

    Ok(())
}

fn validate(path: &Path) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read document: {:?}", path))?;
    let value = load_value(&content)?;

    let violations = validate_document(&value);
    for violation in &violations {
        println!("{violation}");
    }
    if !violations.is_empty() {
        anyhow::bail!("{} violation(s) in {:?}", violations.len(), path);
    }
    info!(path = %path.display(), "Document is valid.");
    Ok(())
}
