use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use genmsg::{encode_json, plan_to_json};
use genmsg_compiler::error::GenError;
use genmsg_compiler::loader::load_schemas;
use genmsg_compiler::naming::uncamelcase;
use genmsg_compiler::{build_catalog, generate, GenerateOptions, Language, MessageRef};

#[derive(Parser)]
#[command(name = "genmsg")]
#[command(about = "Generate alignment-aware wire encoders from .msg schemas", long_about = None)]
struct Cli {
    /// Log planning decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate encoders for every message type under the schema roots
    Generate {
        /// Schema root laid out as `<root>/<package>/msg/<Type>.msg` (repeatable, earlier wins)
        #[arg(short, long = "root", required = true)]
        roots: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Target language: `rust` or `c`
        #[arg(short, long, default_value_t = Language::Rust)]
        lang: Language,
    },

    /// Print the encoder plans of one message type as JSON
    Plan {
        #[arg(short, long = "root", required = true)]
        roots: Vec<PathBuf>,

        /// Message type as `package/Name`
        #[arg(short = 't', long = "type")]
        type_name: String,
    },

    /// Encode a JSON value with a message type's plan and print the bytes as hex
    Encode {
        #[arg(short, long = "root", required = true)]
        roots: Vec<PathBuf>,

        /// Message type as `package/Name`
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// JSON file holding the message value
        #[arg(short, long)]
        input: PathBuf,

        /// Stop before this field (partial encoder)
        #[arg(long)]
        until: Option<String>,

        /// Output buffer size in bytes
        #[arg(long, default_value_t = 65536)]
        capacity: usize,
    },

    /// Print the normalized (uncamelcased) form of type names
    Normalize {
        names: Vec<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn parse_type(text: &str) -> Result<MessageRef, GenError> {
    MessageRef::parse(text).ok_or_else(|| GenError::UnknownMessage(text.to_string()))
}

fn main() -> Result<(), GenError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate { roots, output, lang } => {
            let options = GenerateOptions::new(roots, output).with_language(lang);
            let report = generate(&options)?;
            info!(
                messages = report.messages,
                encoders = report.encoders,
                files = report.files.len(),
                language = %report.language,
                "generation finished"
            );
            println!(
                "Generated {} encoders for {} message types into {}",
                report.encoders,
                report.messages,
                options.output_root.display()
            );
            Ok(())
        }

        Commands::Plan { roots, type_name } => {
            let message = parse_type(&type_name)?;
            let schemas = load_schemas(&roots)?;
            let catalog = build_catalog(&schemas)?;
            let set = catalog
                .get(&message)
                .ok_or_else(|| GenError::UnknownMessage(message.to_string()))?;
            println!("{}", plan_to_json(set)?);
            Ok(())
        }

        Commands::Encode { roots, type_name, input, until, capacity } => {
            let message = parse_type(&type_name)?;
            let schemas = load_schemas(&roots)?;
            let catalog = build_catalog(&schemas)?;
            let json = fs::read_to_string(&input).map_err(|source| GenError::IoAt {
                path: input.clone(),
                source,
            })?;
            let bytes = encode_json(&catalog, &message, &json, until.as_deref(), capacity)?;
            debug!(message = %message, len = bytes.len(), "encoded");
            let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
            println!("{}", hex.join(" "));
            Ok(())
        }

        Commands::Normalize { names } => {
            for name in &names {
                println!("{} -> {}", name, uncamelcase(name));
            }
            Ok(())
        }
    }
}
