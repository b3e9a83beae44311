use clap::{Parser, Subcommand};
use comfyscope::config::{PartialMachineConfig, looks_like_model_url, model_from_url};
use comfyscope::prelude::*;
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};

/// Inspect and canonicalize ComfyUI workflows, machine configs and model lists
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report what kind of fragment a file contains
    Classify {
        /// Input file, or '-' for stdin
        input: String,
    },
    /// Normalize a workflow graph and print the render-ready nodes and edges
    Normalize {
        /// Input file, or '-' for stdin
        input: String,
        /// Skip malformed nodes instead of rejecting the document
        #[arg(long)]
        lenient: bool,
        /// Only print the summary line and warnings
        #[arg(short, long)]
        summary: bool,
    },
    /// Reconcile machine config fragments into one canonical export shape
    Machine {
        /// Input files, or '-' for stdin; later fragments win
        #[arg(required = true)]
        inputs: Vec<String>,
        /// Custom-node manifest used to fill missing commit hashes
        #[arg(short, long)]
        directory: Option<String>,
        /// Keep the ComfyUI version from the input instead of the pinned one
        #[arg(long)]
        keep_version: bool,
    },
    /// Reconcile a model list into its canonical export shape
    Models {
        /// Input file, or '-' for stdin
        input: String,
    },
    /// Pull a custom node list and model list out of an assistant reply
    Extract {
        /// Input file, or '-' for stdin
        input: String,
    },
    /// Guess a model entry from a direct download link
    ModelUrl {
        url: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Classify { input } => {
            let text = read_input(&input);
            let fragment = classify_fragment(&text);
            print_json(&fragment.kind());
        }
        Command::Normalize {
            input,
            lenient,
            summary,
        } => run_normalize(&input, lenient, summary),
        Command::Machine {
            inputs,
            directory,
            keep_version,
        } => run_machine(&inputs, directory.as_deref(), keep_version),
        Command::Extract { input } => run_extract(&input),
        Command::Models { input } => {
            let value = read_json(&input);
            print_json(&reconcile_model_list(&value));
        }
        Command::ModelUrl { url } => {
            if !looks_like_model_url(&url) {
                info!("'{}' does not look like a weights file link", url);
            }
            print_json(&model_from_url(&url));
        }
    }
}

fn run_normalize(input: &str, lenient: bool, summary_only: bool) {
    let text = read_input(input);
    let mut builder = Normalizer::builder();
    if lenient {
        builder = builder.lenient();
    }
    let graph = builder
        .build()
        .normalize(text.as_str())
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    if summary_only {
        println!("{}", graph.summary);
        for warning in &graph.summary.warnings {
            println!("  warning: {}", warning);
        }
    } else {
        print_json(&graph);
    }
}

fn run_machine(inputs: &[String], directory: Option<&str>, keep_version: bool) {
    let policy = if keep_version {
        VersionPolicy::PreferInput
    } else {
        VersionPolicy::Pinned
    };
    let reconciler = Reconciler::builder().with_version_policy(policy).build();
    let config =
        reconciler.machine_config_from_fragments(inputs.iter().map(|path| read_json(path)));

    let config = match directory {
        Some(path) => {
            let manifest = NodeDirectory::from_json(&read_input(path));
            if manifest.is_none() {
                warn!("Node directory '{}' is not valid JSON; hashes left as-is", path);
            }
            reconciler.cross_reference(config, manifest.as_ref())
        }
        None => config,
    };
    print_json(&config);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Extracted {
    machine_config: Option<MachineConfig>,
    models_config: Option<ModelList>,
}

fn run_extract(input: &str) {
    let text = read_input(input);
    let extracted = Extracted {
        machine_config: PartialMachineConfig::from_custom_node_text(&text)
            .map(reconcile_machine_config),
        models_config: extract_model_data(&text),
    };
    if extracted.machine_config.is_none() && extracted.models_config.is_none() {
        info!("Nothing to extract from '{}'", input);
    }
    print_json(&extracted);
}

fn read_input(path: &str) -> String {
    if path == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to read stdin: {}", e)));
        text
    } else {
        fs::read_to_string(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)))
    }
}

fn read_json(path: &str) -> Value {
    serde_json::from_str(&read_input(path))
        .unwrap_or_else(|e| exit_with_error(&format!("'{}' is not valid JSON: {}", path, e)))
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    let text = export_json(value).unwrap_or_else(|e| exit_with_error(&e.to_string()));
    println!("{}", text);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
