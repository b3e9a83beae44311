use clap::Parser;
use rand::{Rng, rngs::ThreadRng};
use serde_json::{Value, json};
use std::fs;

const NODE_TYPES: [(&str, &str, &str); 6] = [
    ("CheckpointLoaderSimple", "", "MODEL"),
    ("CLIPTextEncode", "CLIP", "CONDITIONING"),
    ("EmptyLatentImage", "", "LATENT"),
    ("KSampler", "MODEL", "LATENT"),
    ("VAEDecode", "LATENT", "IMAGE"),
    ("SaveImage", "IMAGE", ""),
];

/// A CLI tool to generate synthetic ComfyUI workflows for the normalizer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_workflow.json")]
    output: String,

    /// Number of far-apart node clusters
    #[arg(long, default_value_t = 3)]
    clusters: usize,

    /// Nodes per cluster
    #[arg(long, default_value_t = 6)]
    nodes: usize,

    /// Distance between cluster origins, in canvas units
    #[arg(long, default_value_t = 8000.0)]
    spread: f64,

    /// Number of links pointing at nodes that do not exist
    #[arg(long, default_value_t = 0)]
    dangling: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.clusters == 0 || cli.nodes == 0 {
        eprintln!("Error: --clusters and --nodes must both be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating workflow ({} clusters x {} nodes, spread {}, {} dangling links)...",
        cli.clusters, cli.nodes, cli.spread, cli.dangling
    );

    let mut nodes = Vec::new();
    let mut links = Vec::new();
    let mut next_id = 1i64;
    for cluster in 0..cli.clusters {
        let origin = (cluster as f64 * cli.spread, (cluster % 2) as f64 * cli.spread / 2.0);
        let first_id = next_id;
        for i in 0..cli.nodes {
            nodes.push(generate_node(&mut rng, next_id, i, origin));
            if i > 0 {
                let (_, _, data_type) = NODE_TYPES[(i - 1) % NODE_TYPES.len()];
                links.push(generate_link(links.len() as i64 + 1, next_id - 1, next_id, data_type));
            }
            next_id += 1;
        }
        println!(
            "-> Cluster {} at ({}, {}): nodes {}..{}",
            cluster,
            origin.0,
            origin.1,
            first_id,
            next_id - 1
        );
    }

    for _ in 0..cli.dangling {
        let source = rng.random_range(1..next_id);
        let missing = next_id + rng.random_range(1000..2000);
        links.push(generate_link(links.len() as i64 + 1, source, missing, "IMAGE"));
    }
    println!("-> Generated {} links.", links.len());

    let workflow = json!({
        "last_node_id": next_id - 1,
        "last_link_id": links.len(),
        "nodes": nodes,
        "links": links,
        "groups": [],
        "config": {},
        "extra": {},
        "version": 0.4
    });

    fs::write(&cli.output, serde_json::to_string_pretty(&workflow)?)?;
    println!("Successfully generated and saved workflow to '{}'", cli.output);

    Ok(())
}

/// Generates one node, jittered around its cluster origin.
fn generate_node(rng: &mut ThreadRng, id: i64, index: usize, origin: (f64, f64)) -> Value {
    let (node_type, input_type, output_type) = NODE_TYPES[index % NODE_TYPES.len()];
    let x = origin.0 + index as f64 * 350.0 + rng.random_range(-40.0..40.0);
    let y = origin.1 + rng.random_range(0.0..600.0);

    let inputs: Vec<Value> = (!input_type.is_empty())
        .then(|| json!({"name": input_type.to_lowercase(), "type": input_type, "link": null}))
        .into_iter()
        .collect();
    let outputs: Vec<Value> = (!output_type.is_empty())
        .then(|| json!({"name": output_type, "type": output_type, "links": [], "slot_index": 0}))
        .into_iter()
        .collect();

    json!({
        "id": id,
        "type": node_type,
        "pos": [x.round(), y.round()],
        "size": [rng.random_range(210..430), rng.random_range(46..270)],
        "flags": {},
        "order": id - 1,
        "mode": 0,
        "inputs": inputs,
        "outputs": outputs,
        "properties": {"Node name for S&R": node_type},
        "widgets_values": []
    })
}

fn generate_link(id: i64, source: i64, target: i64, data_type: &str) -> Value {
    json!([id, source, 0, target, 0, data_type])
}
