//! Visibility filtering and automatic layout of diagrams.
//!
//! Only the visible part of a diagram is laid out. Criteria are hidden unless
//! a problem they belong to shows its criteria, and edges touching a hidden
//! node are hidden with it. Hidden parts keep the geometry of the last layout
//! that saw them.

mod engines;

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use trellis_core::{
    geometry::{Orientation, Point},
    identifier::{EdgeId, NodeId},
    schema::{NodeType, RelationName},
};

pub use engines::{EngineBuilder, LayoutEngine, LayoutEngineKind};

use crate::{
    error::TrellisError,
    topic::{Diagram, Edge, Node},
};

/// An edge handed to a layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

/// The visible graph a layout engine positions.
///
/// Nodes keep diagram order so engines can break ties deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutGraph {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<LayoutEdge>,
}

/// Geometry produced by a layout engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub positions: HashMap<NodeId, Point>,
    pub routes: HashMap<EdgeId, Vec<Point>>,
}

impl Layout {
    /// Route every edge of `graph` as a straight segment between its
    /// positioned endpoints. Edges with an unpositioned end get no route.
    pub fn route_straight(&mut self, graph: &LayoutGraph) {
        for edge in &graph.edges {
            if let (Some(&from), Some(&to)) = (
                self.positions.get(&edge.source),
                self.positions.get(&edge.target),
            ) {
                self.routes.insert(edge.id, vec![from, to]);
            }
        }
    }
}

/// Which parts of a diagram are currently hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    hidden_nodes: HashSet<NodeId>,
    hidden_edges: HashSet<EdgeId>,
}

impl Visibility {
    /// Compute visibility for a diagram.
    ///
    /// A criterion is visible when at least one problem it is a criterion for
    /// shows its criteria. Criteria attached to no problem stay visible.
    pub fn of(diagram: &Diagram) -> Self {
        let mut shown: HashMap<NodeId, bool> = HashMap::new();
        for edge in diagram.edges() {
            if edge.label() != RelationName::CriterionFor {
                continue;
            }
            let (Ok(problem), Ok(criterion)) = (
                diagram.find_node(edge.source()),
                diagram.find_node(edge.target()),
            ) else {
                continue;
            };
            if problem.node_type() != NodeType::Problem
                || criterion.node_type() != NodeType::Criterion
            {
                continue;
            }
            *shown.entry(criterion.id()).or_insert(false) |= problem.show_criteria();
        }

        let hidden_nodes: HashSet<NodeId> = shown
            .into_iter()
            .filter_map(|(criterion, visible)| (!visible).then_some(criterion))
            .collect();
        let hidden_edges = diagram
            .edges()
            .iter()
            .filter(|edge| {
                hidden_nodes.contains(&edge.source()) || hidden_nodes.contains(&edge.target())
            })
            .map(Edge::id)
            .collect();

        Self {
            hidden_nodes,
            hidden_edges,
        }
    }

    pub fn is_node_hidden(&self, id: NodeId) -> bool {
        self.hidden_nodes.contains(&id)
    }

    pub fn is_edge_hidden(&self, id: EdgeId) -> bool {
        self.hidden_edges.contains(&id)
    }

    /// The graph of visible parts, in diagram order.
    pub fn visible_graph(&self, diagram: &Diagram) -> LayoutGraph {
        LayoutGraph {
            nodes: diagram
                .nodes()
                .iter()
                .map(Node::id)
                .filter(|id| !self.is_node_hidden(*id))
                .collect(),
            edges: diagram
                .edges()
                .iter()
                .filter(|edge| !self.is_edge_hidden(edge.id()))
                .map(|edge| LayoutEdge {
                    id: edge.id(),
                    source: edge.source(),
                    target: edge.target(),
                })
                .collect(),
        }
    }
}

/// Nodes and edges of a diagram after a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutedParts {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Lay out the visible parts of a diagram.
///
/// Returns the full node and edge lists with visible parts repositioned and
/// hidden flags refreshed. Hidden parts keep their previous geometry. The
/// diagram itself is not modified.
///
/// # Errors
///
/// Returns [`TrellisError::Layout`] if the engine fails or returns a result
/// whose identities differ from the visible graph it was given.
pub fn layout_visible_components(
    diagram: &Diagram,
    engine: &dyn LayoutEngine,
) -> Result<LayoutedParts, TrellisError> {
    let visibility = Visibility::of(diagram);
    let graph = visibility.visible_graph(diagram);
    let orientation: Orientation = diagram.kind().orientation();

    debug!(
        diagram:% = diagram.id(),
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        orientation:?;
        "Laying out visible components"
    );

    let layout = engine.layout(&graph, orientation)?;
    check_identities(&graph, &layout)?;

    let nodes = diagram
        .nodes()
        .iter()
        .map(|node| {
            let mut node = node.clone();
            let hidden = visibility.is_node_hidden(node.id());
            node.set_hidden(hidden);
            if let Some(&position) = layout.positions.get(&node.id()) {
                node.set_position(position);
            }
            node
        })
        .collect();

    let edges = diagram
        .edges()
        .iter()
        .map(|edge| {
            let mut edge = edge.clone();
            edge.set_hidden(visibility.is_edge_hidden(edge.id()));
            if let Some(route) = layout.routes.get(&edge.id()) {
                edge.set_route(route.clone());
            }
            edge
        })
        .collect();

    trace!(diagram:% = diagram.id(); "Layout applied");
    Ok(LayoutedParts { nodes, edges })
}

/// Lay out a diagram in place.
pub(crate) fn relayout(diagram: &mut Diagram, engine: &dyn LayoutEngine) -> Result<(), TrellisError> {
    let LayoutedParts { nodes, edges } = layout_visible_components(diagram, engine)?;
    diagram.replace_parts(nodes, edges);
    Ok(())
}

/// The engine must position exactly the visible nodes and route exactly the
/// visible edges.
fn check_identities(graph: &LayoutGraph, layout: &Layout) -> Result<(), TrellisError> {
    let nodes_match = layout.positions.len() == graph.nodes.len()
        && graph.nodes.iter().all(|id| layout.positions.contains_key(id));
    if !nodes_match {
        return Err(TrellisError::Layout(format!(
            "engine positioned {} nodes, expected the {} visible ones",
            layout.positions.len(),
            graph.nodes.len()
        )));
    }

    let edges_match = layout.routes.len() == graph.edges.len()
        && graph.edges.iter().all(|edge| layout.routes.contains_key(&edge.id));
    if !edges_match {
        return Err(TrellisError::Layout(format!(
            "engine routed {} edges, expected the {} visible ones",
            layout.routes.len(),
            graph.edges.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use trellis_core::identifier::DiagramId;

    use crate::topic::DiagramKind;

    use super::*;

    /// problem(0) -criterion for-> criterion(1), problem(0) -solves-> solution(2),
    /// criterion(1) -embodies-> solution(2)
    fn diagram_with_criterion() -> Diagram {
        let mut diagram = Diagram::new(DiagramId::Root, DiagramKind::Problem);
        diagram.push_node(Node::new(NodeId::new(0), NodeType::Problem, DiagramId::Root));
        diagram.push_node(Node::new(NodeId::new(1), NodeType::Criterion, DiagramId::Root));
        diagram.push_node(Node::new(NodeId::new(2), NodeType::Solution, DiagramId::Root));
        diagram.push_edge(Edge::new(
            EdgeId::new(0),
            NodeId::new(0),
            NodeId::new(1),
            RelationName::CriterionFor,
        ));
        diagram.push_edge(Edge::new(
            EdgeId::new(1),
            NodeId::new(0),
            NodeId::new(2),
            RelationName::Solves,
        ));
        diagram.push_edge(Edge::new(
            EdgeId::new(2),
            NodeId::new(1),
            NodeId::new(2),
            RelationName::Embodies,
        ));
        diagram
    }

    fn grid_engine(graph: &LayoutGraph, _: Orientation) -> Result<Layout, TrellisError> {
        let mut layout = Layout::default();
        for (index, id) in graph.nodes.iter().enumerate() {
            layout
                .positions
                .insert(*id, Point::new(index as f32 * 10.0, 0.0));
        }
        layout.route_straight(graph);
        Ok(layout)
    }

    #[test]
    fn test_criteria_hidden_by_default() {
        let diagram = diagram_with_criterion();
        let visibility = Visibility::of(&diagram);

        assert!(visibility.is_node_hidden(NodeId::new(1)));
        assert!(!visibility.is_node_hidden(NodeId::new(2)));
        assert!(visibility.is_edge_hidden(EdgeId::new(0)));
        assert!(visibility.is_edge_hidden(EdgeId::new(2)));
        assert!(!visibility.is_edge_hidden(EdgeId::new(1)));

        let graph = visibility.visible_graph(&diagram);
        assert_eq!(graph.nodes, vec![NodeId::new(0), NodeId::new(2)]);
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn test_criteria_shown_when_problem_shows() {
        let mut diagram = diagram_with_criterion();
        diagram
            .find_node_mut(NodeId::new(0))
            .unwrap()
            .toggle_show_criteria()
            .unwrap();

        let visibility = Visibility::of(&diagram);
        assert!(!visibility.is_node_hidden(NodeId::new(1)));
        assert!(!visibility.is_edge_hidden(EdgeId::new(2)));
    }

    #[test]
    fn test_hidden_parts_keep_geometry() {
        let mut diagram = diagram_with_criterion();
        let before = Point::new(-5.0, -5.0);
        diagram.find_node_mut(NodeId::new(1)).unwrap().set_position(before);

        let parts = layout_visible_components(&diagram, &grid_engine).unwrap();

        let criterion = parts.nodes.iter().find(|n| n.id() == NodeId::new(1)).unwrap();
        assert!(criterion.is_hidden());
        assert_eq!(criterion.position(), before);

        let solution = parts.nodes.iter().find(|n| n.id() == NodeId::new(2)).unwrap();
        assert!(!solution.is_hidden());
        assert_eq!(solution.position(), Point::new(10.0, 0.0));

        let solves = parts.edges.iter().find(|e| e.id() == EdgeId::new(1)).unwrap();
        assert_eq!(solves.route(), &[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    }

    #[test]
    fn test_identity_mismatch_rejected() {
        let diagram = diagram_with_criterion();
        let lossy = |graph: &LayoutGraph, _: Orientation| -> Result<Layout, TrellisError> {
            let mut layout = Layout::default();
            if let Some(first) = graph.nodes.first() {
                layout.positions.insert(*first, Point::default());
            }
            Ok(layout)
        };

        assert!(matches!(
            layout_visible_components(&diagram, &lossy),
            Err(TrellisError::Layout(_))
        ));
    }
}
