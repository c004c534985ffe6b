//! Sugiyama layout engine.
//!
//! Delegates layering and crossing reduction to `rust-sugiyama`. The crate
//! lays out each weakly connected component on its own, so components are
//! packed side by side here, and nodes without edges (which it never sees)
//! form a final row of their own.

use std::collections::{BTreeSet, HashMap};

use log::debug;
use rust_sugiyama::configure::Config;

use trellis_core::{
    geometry::{Orientation, Point},
    identifier::NodeId,
};

use crate::{
    error::TrellisError,
    layout::{Layout, LayoutEngine, LayoutGraph},
};

/// Spacing `rust-sugiyama` leaves between neighbouring vertices.
const VERTEX_SPACING: f32 = 3.0;

/// The Sugiyama layout engine
pub struct Engine {
    horizontal_spacing: f32,
    vertical_spacing: f32,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            horizontal_spacing: 200.0,
            vertical_spacing: 120.0,
        }
    }

    /// Set the horizontal spacing between nodes
    pub fn set_horizontal_spacing(&mut self, spacing: f32) -> &mut Self {
        self.horizontal_spacing = spacing;
        self
    }

    /// Set the vertical spacing between layers
    pub fn set_vertical_spacing(&mut self, spacing: f32) -> &mut Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Run `rust-sugiyama` and return raw coordinates per component, keyed by
    /// the sequential ids handed to it.
    fn components(edges: Vec<(u32, u32)>) -> Result<Vec<Vec<(u32, f32, f32)>>, TrellisError> {
        let layouts = std::panic::catch_unwind(move || {
            let config = Config {
                minimum_length: 1,
                vertex_spacing: f64::from(VERTEX_SPACING),
                ..Default::default()
            };
            rust_sugiyama::from_edges(&edges, &config)
        });

        match layouts {
            Ok(results) => Ok(results
                .iter()
                .map(|(coords, _, _)| {
                    coords
                        .iter()
                        .filter_map(|&(id, (x, y))| {
                            let id = u32::try_from(id).ok()?;
                            Some((id, x as f32, y as f32))
                        })
                        .collect()
                })
                .collect()),
            Err(err) => {
                let message = if let Some(panic_msg) = err.downcast_ref::<String>() {
                    format!("rust-sugiyama panicked: {panic_msg}")
                } else if let Some(panic_msg) = err.downcast_ref::<&str>() {
                    format!("rust-sugiyama panicked: {panic_msg}")
                } else {
                    "rust-sugiyama panicked with unknown error".to_string()
                };
                Err(TrellisError::Layout(message))
            }
        }
    }
}

impl LayoutEngine for Engine {
    fn layout(
        &self,
        graph: &LayoutGraph,
        orientation: Orientation,
    ) -> Result<Layout, TrellisError> {
        // Sequential ids in graph order.
        let sequential: HashMap<NodeId, u32> = graph
            .nodes
            .iter()
            .zip(0u32..)
            .map(|(&id, seq)| (id, seq))
            .collect();

        let edges: Vec<(u32, u32)> = graph
            .edges
            .iter()
            .filter_map(|edge| {
                let source = *sequential.get(&edge.source)?;
                let target = *sequential.get(&edge.target)?;
                (source != target).then_some((source, target))
            })
            .collect();
        let connected: BTreeSet<u32> = edges.iter().flat_map(|&(s, t)| [s, t]).collect();

        let mut grid: HashMap<u32, (f32, f32)> = HashMap::new();
        let mut next_column = 0.0f32;

        if !edges.is_empty() {
            debug!(
                nodes = connected.len(),
                edges = edges.len();
                "Applying Sugiyama algorithm"
            );

            for coords in Self::components(edges.clone())? {
                if coords.is_empty() {
                    continue;
                }
                let min_x = coords.iter().map(|c| c.1).fold(f32::MAX, f32::min);
                let max_x = coords.iter().map(|c| c.1).fold(f32::MIN, f32::max);

                // Layers are ranked by distinct y so any y scale maps to whole layers.
                let mut levels: Vec<f32> = coords.iter().map(|c| c.2).collect();
                levels.sort_by(f32::total_cmp);
                levels.dedup();
                let ranks: HashMap<u32, usize> = coords
                    .iter()
                    .map(|&(id, _, y)| (id, levels.partition_point(|level| *level < y)))
                    .collect();

                // Parents must end up on the lower layer whatever the sign of y.
                let inverted = edges
                    .iter()
                    .find_map(|(source, target)| Some((ranks.get(source)?, ranks.get(target)?)))
                    .is_some_and(|(source, target)| source > target);
                let top = levels.len().saturating_sub(1);

                for &(id, x, _) in &coords {
                    let column = next_column + (x - min_x) / VERTEX_SPACING;
                    let rank = ranks.get(&id).copied().unwrap_or(0);
                    let layer = if inverted { top - rank } else { rank };
                    grid.insert(id, (column, layer as f32));
                }
                next_column += (max_x - min_x) / VERTEX_SPACING + 1.0;
            }
        }

        // rust-sugiyama never sees edgeless nodes.
        let mut isolated_column = next_column;
        for &seq in sequential.values().collect::<BTreeSet<_>>() {
            if !grid.contains_key(&seq) {
                grid.insert(seq, (isolated_column, 0.0));
                isolated_column += 1.0;
            }
        }

        let mut layout = Layout::default();
        for (id, seq) in &sequential {
            let Some(&(column, layer)) = grid.get(seq) else {
                return Err(TrellisError::Layout(format!(
                    "rust-sugiyama returned no position for node {id}"
                )));
            };
            let point = Point::new(
                column * self.horizontal_spacing,
                layer * self.vertical_spacing,
            );
            layout.positions.insert(*id, orientation.orient(point));
        }
        layout.route_straight(graph);

        debug!(nodes = layout.positions.len(); "Sugiyama layout generated");
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::identifier::EdgeId;

    use crate::layout::LayoutEdge;

    use super::*;

    #[test]
    fn test_parents_above_children() {
        let graph = LayoutGraph {
            nodes: (0..3).map(NodeId::new).collect(),
            edges: vec![
                LayoutEdge {
                    id: EdgeId::new(0),
                    source: NodeId::new(0),
                    target: NodeId::new(1),
                },
                LayoutEdge {
                    id: EdgeId::new(1),
                    source: NodeId::new(1),
                    target: NodeId::new(2),
                },
            ],
        };

        let layout = Engine::new().layout(&graph, Orientation::Down).unwrap();
        let y = |raw| layout.positions[&NodeId::new(raw)].y();

        assert!(y(0) < y(1));
        assert!(y(1) < y(2));
        assert_eq!(layout.routes.len(), 2);
    }

    #[test]
    fn test_isolated_nodes_are_placed() {
        let graph = LayoutGraph {
            nodes: (0..3).map(NodeId::new).collect(),
            edges: Vec::new(),
        };

        let layout = Engine::new().layout(&graph, Orientation::Down).unwrap();

        assert_eq!(layout.positions.len(), 3);
        let mut xs: Vec<f32> = layout.positions.values().map(|p| p.x()).collect();
        xs.sort_by(f32::total_cmp);
        xs.dedup();
        assert_eq!(xs.len(), 3);
    }
}
