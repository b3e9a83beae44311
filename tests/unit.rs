//! Unit tests for small public pieces: palette, layout options, errors.
mod common;
use common::*;
use comfyscope::prelude::*;
use comfyscope::workflow::palette::{DEFAULT_EDGE_COLOR, DEFAULT_NODE_COLOR, edge_color, node_color};
use comfyscope::workflow::{DEFAULT_SPREAD_THRESHOLD, Vec2};

#[test]
fn test_layout_defaults() {
    let options = LayoutOptions::default();
    assert_eq!(options.spread_threshold, DEFAULT_SPREAD_THRESHOLD);
    assert_eq!(options.cell_size, 1000.0);
    assert_eq!(options.group_step_x, 1000.0);
    assert_eq!(options.row_wrap_x, 3000.0);
    assert_eq!(options.group_step_y, 500.0);
    assert_eq!(options.min_node_width, 250.0);
    assert!(options.avoid_overlap);
    assert_eq!(options.group_margin, 100.0);

    let normalizer = Normalizer::default();
    assert_eq!(*normalizer.layout(), options);
    assert_eq!(normalizer.node_policy(), NodePolicy::Strict);
}

#[test]
fn test_threshold_is_exclusive() {
    let exactly = workflow(vec![node(1, "A", 0.0, 0.0), node(2, "B", 5000.0, 0.0)], vec![]);
    assert!(!normalize_workflow(&exactly).unwrap().summary.declustered);

    let just_over = workflow(vec![node(1, "A", 0.0, 0.0), node(2, "B", 5000.5, 0.0)], vec![]);
    assert!(normalize_workflow(&just_over).unwrap().summary.declustered);
}

#[test]
fn test_neighbouring_cells_split_a_cluster() {
    // 499 and 501 round to different 1000-unit cells.
    let doc = workflow(
        vec![
            node(1, "A", 499.0, 0.0),
            node(2, "B", 501.0, 0.0),
            node(3, "C", 9000.0, 0.0),
        ],
        vec![link(1, 1, 2, "LATENT")],
    );
    let graph = normalize_workflow(&doc).unwrap();
    assert_eq!(graph.summary.group_count, 3);
    assert_eq!(graph.render_edges.len(), 1);
    assert_eq!(graph.node(2).unwrap().position, Vec2::new(1000.0, 0.0));
}

#[test]
fn test_palette_fallbacks() {
    assert_eq!(edge_color("CONDITIONING"), "#8338EC");
    assert_eq!(edge_color("*"), DEFAULT_EDGE_COLOR);
    assert_eq!(node_color("VAEDecode"), "#1F6582");
    assert_eq!(node_color("UpscaleModelLoader"), DEFAULT_NODE_COLOR);
}

#[test]
fn test_warning_display() {
    let warning = GraphWarning::DanglingLink {
        link_id: 4,
        missing_node_id: 12,
    };
    assert_eq!(warning.to_string(), "link 4 dropped: node 12 does not exist");
    assert_eq!(
        GraphWarning::MissingLinks.to_string(),
        "document has no 'links' array"
    );
}

#[test]
fn test_parse_error_display() {
    let err = ParseError::MalformedNode {
        index: 2,
        reason: "missing numeric 'id'".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Invalid workflow JSON: node at index 2 is malformed: missing numeric 'id'"
    );
}

#[test]
fn test_empty_workflow_is_valid() {
    let graph = normalize_workflow(r#"{"nodes": [], "links": []}"#).unwrap();
    assert!(graph.is_empty());
    assert_eq!(graph.summary.group_count, 0);
    assert_eq!(graph.summary.to_string(), "0 nodes, 0 connections");
}

#[test]
fn test_known_and_unknown_edge_types() {
    assert_eq!(edge_color("MODEL"), "#FF5607");
    assert_eq!(edge_color("VHS_BatchManager"), "#00F5D4");
    assert_eq!(edge_color("SOMETHING_ELSE"), DEFAULT_EDGE_COLOR);
    assert_eq!(edge_color(""), DEFAULT_EDGE_COLOR);
}

#[test]
fn test_palette_lookup_is_case_sensitive() {
    assert_eq!(edge_color("model"), DEFAULT_EDGE_COLOR);
    assert_eq!(node_color("ksampler"), DEFAULT_NODE_COLOR);
    assert_eq!(node_color("KSampler"), "#423C5E");
}
