//! Graph-level checks on proposed edges.
//!
//! [`EdgeValidation`] extends [`TypeSchema`] with the checks that need the
//! whole diagram: duplicates, self-loops and cycles. Cycle detection runs on
//! a [`petgraph`] view of the diagram built per call.

use std::collections::HashMap;

use log::trace;
use petgraph::{
    algo::{has_path_connecting, is_cyclic_directed},
    graph::{DiGraph, NodeIndex},
};

use trellis_core::{
    identifier::{EdgeId, NodeId},
    schema::{EdgeRejection, EditMode, RelationName, TypeSchema},
};

use crate::topic::{Diagram, Node};

/// Directed petgraph view of a diagram's parent-to-child edges.
pub(crate) struct DiagramGraph {
    graph: DiGraph<NodeId, EdgeId>,
    indices: HashMap<NodeId, NodeIndex>,
}

impl DiagramGraph {
    /// Build the view, leaving out the edge `skip` if given.
    pub(crate) fn new(diagram: &Diagram, skip: Option<EdgeId>) -> Self {
        let mut graph = DiGraph::with_capacity(diagram.nodes().len(), diagram.edges().len());
        let indices: HashMap<NodeId, NodeIndex> = diagram
            .nodes()
            .iter()
            .map(|node| (node.id(), graph.add_node(node.id())))
            .collect();

        for edge in diagram.edges() {
            if Some(edge.id()) == skip {
                continue;
            }
            if let (Some(&source), Some(&target)) =
                (indices.get(&edge.source()), indices.get(&edge.target()))
            {
                graph.add_edge(source, target, edge.id());
            }
        }

        Self { graph, indices }
    }

    /// Check whether `to` can be reached from `from` by following edges.
    pub(crate) fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        match (self.indices.get(&from), self.indices.get(&to)) {
            (Some(&from), Some(&to)) => has_path_connecting(&self.graph, from, to, None),
            _ => false,
        }
    }

    /// Check whether the diagram contains a directed cycle.
    pub(crate) fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }
}

/// Diagram-aware edge validation.
pub trait EdgeValidation {
    /// Validate a new edge from `parent` to `child` and return the relation it
    /// would carry.
    ///
    /// # Errors
    ///
    /// Returns the [`EdgeRejection`] explaining why the edge is not allowed.
    fn validate_edge(
        &self,
        diagram: &Diagram,
        parent: &Node,
        child: &Node,
        mode: EditMode,
    ) -> Result<RelationName, EdgeRejection> {
        self.validate_edge_ignoring(diagram, parent, child, mode, None)
    }

    /// Like [`EdgeValidation::validate_edge`] but treats the edge `ignoring`
    /// as absent, for re-pointing an existing edge.
    ///
    /// # Errors
    ///
    /// Returns the [`EdgeRejection`] explaining why the edge is not allowed.
    fn validate_edge_ignoring(
        &self,
        diagram: &Diagram,
        parent: &Node,
        child: &Node,
        mode: EditMode,
        ignoring: Option<EdgeId>,
    ) -> Result<RelationName, EdgeRejection>;

    /// Check whether an edge from `parent` to `child` may be created.
    fn can_create_edge(
        &self,
        diagram: &Diagram,
        parent: &Node,
        child: &Node,
        mode: EditMode,
    ) -> bool {
        self.validate_edge(diagram, parent, child, mode).is_ok()
    }
}

impl EdgeValidation for TypeSchema {
    fn validate_edge_ignoring(
        &self,
        diagram: &Diagram,
        parent: &Node,
        child: &Node,
        mode: EditMode,
        ignoring: Option<EdgeId>,
    ) -> Result<RelationName, EdgeRejection> {
        if parent.id() == child.id() {
            return Err(EdgeRejection::SelfLoop(parent.id().to_string()));
        }

        let duplicate = diagram.edges().iter().any(|edge| {
            Some(edge.id()) != ignoring
                && edge.source() == parent.id()
                && edge.target() == child.id()
        });
        if duplicate {
            return Err(EdgeRejection::Duplicate {
                parent: parent.id().to_string(),
                child: child.id().to_string(),
            });
        }

        let relation = self.check_pair(parent.node_type(), child.node_type(), mode)?;

        // parent -> child closes a cycle iff parent is already reachable from child.
        if DiagramGraph::new(diagram, ignoring).reaches(child.id(), parent.id()) {
            return Err(EdgeRejection::Cycle {
                parent: parent.id().to_string(),
                child: child.id().to_string(),
            });
        }

        trace!(parent:% = parent.id(), child:% = child.id(), relation:%; "Edge accepted");
        Ok(relation)
    }
}
