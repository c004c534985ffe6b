//! Basic layered layout engine.
//!
//! Assigns every node to the layer given by its longest path from a source,
//! then spreads each layer evenly, centered on the widest one. Nodes keep the
//! order they appear in within the graph, so results are stable.

use std::collections::HashMap;

use log::debug;
use petgraph::{algo::toposort, graph::DiGraph};

use trellis_core::{
    geometry::{Orientation, Point},
    identifier::NodeId,
};

use crate::{
    error::TrellisError,
    layout::{Layout, LayoutEngine, LayoutGraph},
};

/// The basic layout engine
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

    pub fn set_horizontal_spacing(&mut self, spacing: f32) -> &mut Self {
        self.horizontal_spacing = spacing;
        self
    }

    pub fn set_vertical_spacing(&mut self, spacing: f32) -> &mut Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Layer index per node, sources at layer zero.
    fn assign_layers(graph: &LayoutGraph) -> Result<HashMap<NodeId, usize>, TrellisError> {
        let mut dag = DiGraph::<NodeId, ()>::with_capacity(graph.nodes.len(), graph.edges.len());
        let indices: HashMap<NodeId, _> = graph
            .nodes
            .iter()
            .map(|&id| (id, dag.add_node(id)))
            .collect();
        for edge in &graph.edges {
            if let (Some(&source), Some(&target)) =
                (indices.get(&edge.source), indices.get(&edge.target))
            {
                dag.add_edge(source, target, ());
            }
        }

        let order = toposort(&dag, None).map_err(|cycle| {
            TrellisError::Layout(format!(
                "graph has a cycle through node {}",
                dag[cycle.node_id()]
            ))
        })?;

        let mut layers: HashMap<NodeId, usize> = HashMap::with_capacity(order.len());
        for index in order {
            let layer = layers.get(&dag[index]).copied().unwrap_or(0);
            layers.insert(dag[index], layer);
            for child in dag.neighbors(index) {
                let entry = layers.entry(dag[child]).or_insert(0);
                *entry = (*entry).max(layer + 1);
            }
        }
        Ok(layers)
    }
}

impl LayoutEngine for Engine {
    fn layout(
        &self,
        graph: &LayoutGraph,
        orientation: Orientation,
    ) -> Result<Layout, TrellisError> {
        let layers = Self::assign_layers(graph)?;

        let depth = layers.values().copied().max().map_or(0, |max| max + 1);
        let mut rows: Vec<Vec<NodeId>> = vec![Vec::new(); depth];
        for id in &graph.nodes {
            if let Some(&layer) = layers.get(id) {
                rows[layer].push(*id);
            }
        }
        let widest = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut layout = Layout::default();
        for (layer, row) in rows.iter().enumerate() {
            let indent = (widest - row.len()) as f32 / 2.0;
            for (slot, id) in row.iter().enumerate() {
                let x = (indent + slot as f32) * self.horizontal_spacing;
                let y = layer as f32 * self.vertical_spacing;
                layout
                    .positions
                    .insert(*id, orientation.orient(Point::new(x, y)));
            }
        }
        layout.route_straight(graph);

        debug!(nodes = layout.positions.len(), layers = depth; "Basic layout generated");
        Ok(layout)
    }
}
