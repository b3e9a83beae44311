//! Common test utilities for building workflow documents and config fragments.
use serde_json::{Value, json};

/// A workflow node at `(x, y)` with no slots.
#[allow(dead_code)]
pub fn node(id: i64, node_type: &str, x: f64, y: f64) -> Value {
    json!({
        "id": id,
        "type": node_type,
        "pos": [x, y],
        "size": [315, 98],
        "flags": {},
        "order": id,
        "mode": 0,
        "properties": {"Node name for S&R": node_type}
    })
}

/// A `[id, source, source_slot, target, target_slot, type]` link tuple.
#[allow(dead_code)]
pub fn link(id: i64, source: i64, target: i64, data_type: &str) -> Value {
    json!([id, source, 0, target, 0, data_type])
}

/// Wraps nodes and links into a workflow document the way ComfyUI saves it.
#[allow(dead_code)]
pub fn workflow(nodes: Vec<Value>, links: Vec<Value>) -> Value {
    json!({
        "last_node_id": nodes.len(),
        "last_link_id": links.len(),
        "nodes": nodes,
        "links": links,
        "groups": [],
        "config": {},
        "extra": {},
        "version": 0.4
    })
}

/// Three nodes, two of them close together and one far away, chained 1→2→3.
#[allow(dead_code)]
pub fn three_node_workflow() -> Value {
    workflow(
        vec![
            node(1, "CheckpointLoaderSimple", 0.0, 0.0),
            node(2, "KSampler", 50.0, 50.0),
            node(3, "SaveImage", 6000.0, 6000.0),
        ],
        vec![link(1, 1, 2, "MODEL"), link(2, 2, 3, "IMAGE")],
    )
}

/// The default text-to-image graph, as exported by ComfyUI.
#[allow(dead_code)]
pub const DEFAULT_WORKFLOW_JSON: &str = r#"{
  "last_node_id": 9,
  "last_link_id": 9,
  "nodes": [
    {"id": 7, "type": "CLIPTextEncode", "pos": [413, 389], "size": {"0": 425.28, "1": 180.61},
     "inputs": [{"name": "clip", "type": "CLIP", "link": 5}],
     "outputs": [{"name": "CONDITIONING", "type": "CONDITIONING", "links": [6], "slot_index": 0}],
     "widgets_values": ["text, watermark"]},
    {"id": 6, "type": "CLIPTextEncode", "pos": [415, 186], "size": {"0": 422.85, "1": 164.31},
     "inputs": [{"name": "clip", "type": "CLIP", "link": 3}],
     "outputs": [{"name": "CONDITIONING", "type": "CONDITIONING", "links": [4], "slot_index": 0}],
     "widgets_values": ["beautiful scenery nature glass bottle landscape"]},
    {"id": 5, "type": "EmptyLatentImage", "pos": [473, 609], "size": {"0": 315, "1": 106},
     "outputs": [{"name": "LATENT", "type": "LATENT", "links": [2], "slot_index": 0}],
     "widgets_values": [512, 512, 1]},
    {"id": 3, "type": "KSampler", "pos": [863, 186], "size": {"0": 315, "1": 262},
     "inputs": [
       {"name": "model", "type": "MODEL", "link": 1},
       {"name": "positive", "type": "CONDITIONING", "link": 4},
       {"name": "negative", "type": "CONDITIONING", "link": 6},
       {"name": "latent_image", "type": "LATENT", "link": 2}
     ],
     "outputs": [{"name": "LATENT", "type": "LATENT", "links": [7], "slot_index": 0}],
     "widgets_values": [156680208700286, "randomize", 20, 8, "euler", "normal", 1]},
    {"id": 8, "type": "VAEDecode", "pos": [1209, 188], "size": {"0": 210, "1": 46},
     "inputs": [{"name": "samples", "type": "LATENT", "link": 7}, {"name": "vae", "type": "VAE", "link": 8}],
     "outputs": [{"name": "IMAGE", "type": "IMAGE", "links": [9], "slot_index": 0}]},
    {"id": 9, "type": "SaveImage", "pos": [1451, 189], "size": {"0": 210, "1": 58},
     "inputs": [{"name": "images", "type": "IMAGE", "link": 9}],
     "widgets_values": ["ComfyUI"]},
    {"id": 4, "type": "CheckpointLoaderSimple", "pos": [26, 474], "size": {"0": 315, "1": 98},
     "outputs": [
       {"name": "MODEL", "type": "MODEL", "links": [1], "slot_index": 0},
       {"name": "CLIP", "type": "CLIP", "links": [3, 5], "slot_index": 1},
       {"name": "VAE", "type": "VAE", "links": [8], "slot_index": 2}
     ],
     "widgets_values": ["v1-5-pruned-emaonly.safetensors"]}
  ],
  "links": [
    [1, 4, 0, 3, 0, "MODEL"],
    [2, 5, 0, 3, 3, "LATENT"],
    [3, 4, 1, 6, 0, "CLIP"],
    [4, 6, 0, 3, 1, "CONDITIONING"],
    [5, 4, 1, 7, 0, "CLIP"],
    [6, 7, 0, 3, 2, "CONDITIONING"],
    [7, 3, 0, 8, 0, "LATENT"],
    [8, 4, 2, 8, 1, "VAE"],
    [9, 8, 0, 9, 0, "IMAGE"]
  ],
  "groups": [],
  "config": {},
  "extra": {},
  "version": 0.4
}"#;

/// A machine config fragment as a chat tool call might produce it.
#[allow(dead_code)]
pub fn chat_machine_config() -> Value {
    json!({
        "comfyui": "latest",
        "git_custom_nodes": {
            "https://github.com/ltdrdata/ComfyUI-Impact-Pack": {"hash": "", "disabled": false},
            "https://github.com/Kosinkadink/ComfyUI-VideoHelperSuite.git": {"hash": "a1b2c3"}
        },
        "file_custom_nodes": []
    })
}
