use super::document::{NodeSpec, Vec2};
use ahash::AHashMap;
use itertools::Itertools;
use log::debug;

pub const DEFAULT_SPREAD_THRESHOLD: f64 = 5000.0;
pub const DEFAULT_CELL_SIZE: f64 = 1000.0;
pub const DEFAULT_GROUP_STEP_X: f64 = 1000.0;
pub const DEFAULT_ROW_WRAP_X: f64 = 3000.0;
pub const DEFAULT_GROUP_STEP_Y: f64 = 500.0;
pub const DEFAULT_MIN_NODE_WIDTH: f64 = 250.0;
pub const DEFAULT_GROUP_MARGIN: f64 = 100.0;

/// Tunables for the declustering layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// A bounding box wider or taller than this triggers grouping.
    pub spread_threshold: f64,
    /// Side of the grid cell used to bucket nodes into groups.
    pub cell_size: f64,
    /// Horizontal distance between consecutive groups.
    pub group_step_x: f64,
    /// Once the horizontal offset exceeds this, the next group starts a new row.
    pub row_wrap_x: f64,
    /// Vertical distance between rows of groups.
    pub group_step_y: f64,
    /// Nodes are never rendered narrower than this.
    pub min_node_width: f64,
    /// Advance past the extent of the previous group (and row) when it is
    /// larger than the fixed steps. Without it a group wider than
    /// `group_step_x` or taller than `group_step_y` overlaps its neighbour.
    pub avoid_overlap: bool,
    /// Gap kept between groups when `avoid_overlap` is set.
    pub group_margin: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            spread_threshold: DEFAULT_SPREAD_THRESHOLD,
            cell_size: DEFAULT_CELL_SIZE,
            group_step_x: DEFAULT_GROUP_STEP_X,
            row_wrap_x: DEFAULT_ROW_WRAP_X,
            group_step_y: DEFAULT_GROUP_STEP_Y,
            min_node_width: DEFAULT_MIN_NODE_WIDTH,
            avoid_overlap: true,
            group_margin: DEFAULT_GROUP_MARGIN,
        }
    }
}

/// Axis-aligned bounding box over node positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub(crate) fn of(nodes: &[&NodeSpec]) -> Option<Self> {
        let (min_x, max_x) = nodes.iter().map(|n| n.position.x).minmax().into_option()?;
        let (min_y, max_y) = nodes.iter().map(|n| n.position.y).minmax().into_option()?;
        Some(Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        })
    }

    pub(crate) fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub(crate) fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GroupKey {
    All,
    /// Bit patterns of the rounded cell coordinates, so huge values never collide.
    Cell(u64, u64),
}

/// A node with its final position.
#[derive(Debug)]
pub(crate) struct PlacedNode<'a> {
    pub node: &'a NodeSpec,
    pub position: Vec2,
    pub group: usize,
}

#[derive(Debug)]
pub(crate) struct Layout<'a> {
    /// Nodes in group order, members in document order within each group.
    pub placed: Vec<PlacedNode<'a>>,
    pub group_count: usize,
    pub declustered: bool,
}

/// Rendered width of a node: its own width, but never below the minimum.
pub(crate) fn render_width(node: &NodeSpec, options: &LayoutOptions) -> f64 {
    node.size
        .map_or(options.min_node_width, |s| s.x.max(options.min_node_width))
}

/// Rounds `v / cell` half-up to a cell index, folding `-0.0` into `0.0`.
fn cell_index(v: f64, cell: f64) -> f64 {
    let index = (v / cell + 0.5).floor();
    if index == 0.0 { 0.0 } else { index }
}

/// Buckets nodes into groups keyed in first-seen order.
fn group_nodes<'a>(
    nodes: &'a [NodeSpec],
    options: &LayoutOptions,
    declustered: bool,
) -> Vec<Vec<&'a NodeSpec>> {
    let mut index: AHashMap<GroupKey, usize> = AHashMap::new();
    let mut groups: Vec<Vec<&NodeSpec>> = Vec::new();
    for node in nodes {
        let key = if declustered {
            GroupKey::Cell(
                cell_index(node.position.x, options.cell_size).to_bits(),
                cell_index(node.position.y, options.cell_size).to_bits(),
            )
        } else {
            GroupKey::All
        };
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(node);
    }
    groups
}

/// Computes deconflicted positions for every node.
///
/// Each group is re-homed to its own local minimum and then shifted by a
/// group offset that advances along a row and wraps. Internal relative
/// layout is preserved. Steps never shrink below the fixed ones in
/// [`LayoutOptions`]; with `avoid_overlap` they grow to clear each group's
/// rendered extent.
pub(crate) fn arrange<'a>(nodes: &'a [NodeSpec], options: &LayoutOptions) -> Layout<'a> {
    let all: Vec<&NodeSpec> = nodes.iter().collect();
    let Some(bounds) = Bounds::of(&all) else {
        return Layout {
            placed: Vec::new(),
            group_count: 0,
            declustered: false,
        };
    };

    let declustered =
        bounds.width() > options.spread_threshold || bounds.height() > options.spread_threshold;
    let groups = group_nodes(nodes, options, declustered);
    if declustered {
        debug!(
            "Workflow spans {}x{} units; declustering into {} groups",
            bounds.width(),
            bounds.height(),
            groups.len()
        );
    }

    let mut placed = Vec::with_capacity(nodes.len());
    let mut offset = Vec2::default();
    let mut row_height: f64 = 0.0;
    for (group_index, members) in groups.iter().enumerate() {
        // Non-empty by construction.
        let Some(local) = Bounds::of(members) else {
            continue;
        };
        let mut extent = Vec2::default();
        for &node in members {
            let x = node.position.x - local.min.x;
            let y = node.position.y - local.min.y;
            extent.x = extent.x.max(x + render_width(node, options));
            extent.y = extent.y.max(y + node.size.map_or(0.0, |s| s.y));
            placed.push(PlacedNode {
                node,
                position: Vec2::new(x + offset.x, y + offset.y),
                group: group_index,
            });
        }

        if !declustered {
            continue;
        }
        if options.avoid_overlap {
            row_height = row_height.max(extent.y);
            offset.x += options.group_step_x.max(extent.x + options.group_margin);
            if offset.x > options.row_wrap_x {
                offset.x = 0.0;
                offset.y += options.group_step_y.max(row_height + options.group_margin);
                row_height = 0.0;
            }
        } else {
            offset.x += options.group_step_x;
            if offset.x > options.row_wrap_x {
                offset.x = 0.0;
                offset.y += options.group_step_y;
            }
        }
    }

    Layout {
        placed,
        group_count: groups.len(),
        declustered,
    }
}
