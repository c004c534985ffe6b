//! The topic entity model and its read accessors.
//!
//! A [`Topic`] owns a root problem [`Diagram`] plus any number of claim
//! diagrams created lazily for arguable parts. Entities expose getters only;
//! every write goes through [`crate::DiagramMutator`] or
//! [`crate::ScoreSynchronizer`].

use std::collections::HashSet;

use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Serialize};

use trellis_core::{
    geometry::{Orientation, Point},
    identifier::{Arguable, DiagramId, EdgeId, IdAllocator, NodeId},
    schema::{NodeType, RelationName},
    score::Score,
};

use crate::{error::TrellisError, structure::DiagramGraph};

/// Text and score carried by a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    label: String,
    #[serde(default)]
    score: Score,
    /// Only present on problem nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    show_criteria: Option<bool>,
}

/// A typed node of a diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    id: NodeId,
    #[serde(rename = "type")]
    node_type: NodeType,
    diagram_id: DiagramId,
    data: NodeData,
    #[serde(default)]
    position: Point,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    selected: bool,
}

impl Node {
    /// Build a node with its type's default label and no score.
    pub(crate) fn new(id: NodeId, node_type: NodeType, diagram_id: DiagramId) -> Self {
        Self::with_data(id, node_type, diagram_id, node_type.default_label(), Score::UNSCORED)
    }

    pub(crate) fn with_data(
        id: NodeId,
        node_type: NodeType,
        diagram_id: DiagramId,
        label: String,
        score: Score,
    ) -> Self {
        let show_criteria = (node_type == NodeType::Problem).then_some(false);
        Self {
            id,
            node_type,
            diagram_id,
            data: NodeData {
                label,
                score,
                show_criteria,
            },
            position: Point::default(),
            hidden: false,
            selected: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// The diagram this node belongs to.
    pub fn diagram_id(&self) -> DiagramId {
        self.diagram_id
    }

    pub fn label(&self) -> &str {
        &self.data.label
    }

    pub fn score(&self) -> Score {
        self.data.score
    }

    /// Whether criteria under this problem are shown. Always `false` for
    /// non-problem nodes.
    pub fn show_criteria(&self) -> bool {
        self.data.show_criteria.unwrap_or(false)
    }

    /// Position computed by the last layout.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Whether the last visibility computation hid this node.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_label(&mut self, label: String) {
        self.data.label = label;
    }

    pub(crate) fn set_score(&mut self, score: Score) {
        self.data.score = score;
    }

    /// Flip the show-criteria flag and return the new value.
    pub(crate) fn toggle_show_criteria(&mut self) -> Result<bool, TrellisError> {
        if self.node_type != NodeType::Problem {
            return Err(TrellisError::invariant(format!(
                "node {} is a {}, not a problem",
                self.id, self.node_type
            )));
        }
        let show = !self.show_criteria();
        self.data.show_criteria = Some(show);
        Ok(show)
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

/// Score carried by an edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    #[serde(default)]
    score: Score,
}

/// A labelled edge from a parent node to a child node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    label: RelationName,
    #[serde(default)]
    data: EdgeData,
    /// Routing hints from the last layout.
    #[serde(default)]
    route: Vec<Point>,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    selected: bool,
}

impl Edge {
    pub(crate) fn new(id: EdgeId, source: NodeId, target: NodeId, label: RelationName) -> Self {
        Self {
            id,
            source,
            target,
            label,
            data: EdgeData::default(),
            route: Vec::new(),
            hidden: false,
            selected: false,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// The parent end of the edge.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// The child end of the edge.
    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn label(&self) -> RelationName {
        self.label
    }

    pub fn score(&self) -> Score {
        self.data.score
    }

    pub fn route(&self) -> &[Point] {
        &self.route
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_score(&mut self, score: Score) {
        self.data.score = score;
    }

    /// Re-point both ends and relabel.
    pub(crate) fn reconnect(&mut self, source: NodeId, target: NodeId, label: RelationName) {
        self.source = source;
        self.target = target;
        self.label = label;
    }

    pub(crate) fn set_route(&mut self, route: Vec<Point>) {
        self.route = route;
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

/// Borrowed view of a node or edge located through an [`Arguable`].
#[derive(Debug, Clone, Copy)]
pub enum ScorableRef<'a> {
    Node(&'a Node),
    Edge(&'a Edge),
}

impl ScorableRef<'_> {
    pub fn score(&self) -> Score {
        match self {
            Self::Node(node) => node.score(),
            Self::Edge(edge) => edge.score(),
        }
    }

    /// Check whether this is the root claim of a claim diagram.
    pub fn is_root_claim(&self) -> bool {
        matches!(self, Self::Node(node) if node.node_type() == NodeType::RootClaim)
    }
}

/// The kind of a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagramKind {
    Problem,
    Claim,
}

impl DiagramKind {
    /// Orientation layered layouts use for this kind of diagram.
    pub fn orientation(self) -> Orientation {
        match self {
            Self::Problem => Orientation::Down,
            Self::Claim => Orientation::Right,
        }
    }
}

/// One cell of a [`CriteriaTable`]: the `embodies` edge joining a criterion
/// and a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriteriaCell {
    pub edge: EdgeId,
    pub score: Score,
}

/// How well each solution of a problem embodies each of its criteria.
///
/// `cells[row][column]` relates `criteria[row]` to `solutions[column]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaTable {
    pub problem: NodeId,
    pub criteria: Vec<NodeId>,
    pub solutions: Vec<NodeId>,
    pub cells: Vec<Vec<Option<CriteriaCell>>>,
}

/// A diagram: a node list and an edge list of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    id: DiagramId,
    kind: DiagramKind,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Diagram {
    pub(crate) fn new(id: DiagramId, kind: DiagramKind) -> Self {
        Self {
            id,
            kind,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn id(&self) -> DiagramId {
        self.id
    }

    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Find a node by id.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if the node is not in this diagram.
    pub fn find_node(&self, id: NodeId) -> Result<&Node, TrellisError> {
        self.nodes
            .iter()
            .find(|node| node.id == id)
            .ok_or_else(|| TrellisError::not_found(format!("node {id} in diagram {}", self.id)))
    }

    /// Find an edge by id.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if the edge is not in this diagram.
    pub fn find_edge(&self, id: EdgeId) -> Result<&Edge, TrellisError> {
        self.edges
            .iter()
            .find(|edge| edge.id == id)
            .ok_or_else(|| TrellisError::not_found(format!("edge {id} in diagram {}", self.id)))
    }

    /// Locate the node or edge an [`Arguable`] refers to.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if no part of that kind and id exists.
    pub fn find_scorable(&self, arguable: Arguable) -> Result<ScorableRef<'_>, TrellisError> {
        match arguable {
            Arguable::Node(id) => self.find_node(id).map(ScorableRef::Node),
            Arguable::Edge(id) => self.find_edge(id).map(ScorableRef::Edge),
        }
    }

    /// The root claim of a claim diagram.
    pub fn root_claim(&self) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|node| node.node_type == NodeType::RootClaim)
    }

    /// Iterate over the nodes of one type, in diagram order.
    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(move |node| node.node_type == node_type)
    }

    /// Check whether an edge from `source` to `target` exists.
    pub fn contains_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.source == source && edge.target == target)
    }

    /// Children reached from `parent` through edges labelled `label`.
    pub fn children_via(&self, parent: NodeId, label: RelationName) -> impl Iterator<Item = NodeId> {
        self.edges
            .iter()
            .filter(move |edge| edge.source == parent && edge.label == label)
            .map(|edge| edge.target)
    }

    /// Human-readable statement argued about in the claim diagram of `arguable`.
    ///
    /// Nodes read `"<label>" is important`; edges read
    /// `"<child label>" <relation> "<parent label>"`.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if the arguable or an edge endpoint is
    /// missing.
    pub fn implicit_label(&self, arguable: Arguable) -> Result<String, TrellisError> {
        match arguable {
            Arguable::Node(id) => {
                let node = self.find_node(id)?;
                Ok(format!("\"{}\" is important", node.label()))
            }
            Arguable::Edge(id) => {
                let edge = self.find_edge(id)?;
                let parent = self.find_node(edge.source)?;
                let child = self.find_node(edge.target)?;
                Ok(format!(
                    "\"{}\" {} \"{}\"",
                    child.label(),
                    edge.label,
                    parent.label()
                ))
            }
        }
    }

    /// Build the criteria table of a problem.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if the problem is missing and
    /// [`TrellisError::InvariantViolation`] if the node is not a problem.
    pub fn criteria_table(&self, problem_id: NodeId) -> Result<CriteriaTable, TrellisError> {
        let problem = self.find_node(problem_id)?;
        if problem.node_type != NodeType::Problem {
            return Err(TrellisError::invariant(format!(
                "criteria table requested for {} node {problem_id}",
                problem.node_type
            )));
        }

        let criteria: Vec<NodeId> = self
            .children_via(problem_id, RelationName::CriterionFor)
            .collect();
        let solutions: Vec<NodeId> = self.children_via(problem_id, RelationName::Solves).collect();

        let cells = criteria
            .iter()
            .map(|criterion| {
                solutions
                    .iter()
                    .map(|solution| {
                        self.edges
                            .iter()
                            .find(|edge| {
                                edge.source == *criterion
                                    && edge.target == *solution
                                    && edge.label == RelationName::Embodies
                            })
                            .map(|edge| CriteriaCell {
                                edge: edge.id,
                                score: edge.score(),
                            })
                    })
                    .collect()
            })
            .collect();

        Ok(CriteriaTable {
            problem: problem_id,
            criteria,
            solutions,
            cells,
        })
    }

    pub(crate) fn find_node_mut(&mut self, id: NodeId) -> Result<&mut Node, TrellisError> {
        let diagram_id = self.id;
        self.nodes
            .iter_mut()
            .find(|node| node.id == id)
            .ok_or_else(|| TrellisError::not_found(format!("node {id} in diagram {diagram_id}")))
    }

    pub(crate) fn find_edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge, TrellisError> {
        let diagram_id = self.id;
        self.edges
            .iter_mut()
            .find(|edge| edge.id == id)
            .ok_or_else(|| TrellisError::not_found(format!("edge {id} in diagram {diagram_id}")))
    }

    /// Write a score to the node or edge an [`Arguable`] refers to.
    pub(crate) fn set_scorable_score(
        &mut self,
        arguable: Arguable,
        score: Score,
    ) -> Result<(), TrellisError> {
        match arguable {
            Arguable::Node(id) => self.find_node_mut(id)?.set_score(score),
            Arguable::Edge(id) => self.find_edge_mut(id)?.set_score(score),
        }
        Ok(())
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub(crate) fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Replace both part lists at once, as produced by a layout pass.
    pub(crate) fn replace_parts(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.nodes = nodes;
        self.edges = edges;
    }
}

/// A claim diagram as listed in a topic overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimDiagramSummary {
    pub id: DiagramId,
    pub arguable: Arguable,
    pub label: String,
}

/// The aggregate root: every diagram of a topic plus the shared id counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    diagrams: IndexMap<DiagramId, Diagram>,
    active_diagram_id: DiagramId,
    #[serde(flatten)]
    ids: IdAllocator,
}

impl Topic {
    /// Create a fresh topic: a root problem diagram holding one problem node.
    pub fn new() -> Self {
        let mut ids = IdAllocator::default();
        let mut root = Diagram::new(DiagramId::Root, DiagramKind::Problem);
        root.push_node(Node::new(ids.next_node_id(), NodeType::Problem, DiagramId::Root));

        let mut diagrams = IndexMap::new();
        diagrams.insert(DiagramId::Root, root);

        Self {
            diagrams,
            active_diagram_id: DiagramId::Root,
            ids,
        }
    }

    /// Iterate over every diagram, root first, then claim diagrams in creation order.
    pub fn diagrams(&self) -> impl Iterator<Item = &Diagram> {
        self.diagrams.values()
    }

    /// Look up a diagram.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if no diagram has that id.
    pub fn diagram(&self, id: DiagramId) -> Result<&Diagram, TrellisError> {
        self.diagrams
            .get(&id)
            .ok_or_else(|| TrellisError::not_found(format!("diagram {id}")))
    }

    pub fn has_diagram(&self, id: DiagramId) -> bool {
        self.diagrams.contains_key(&id)
    }

    /// The root problem diagram.
    pub fn root_diagram(&self) -> Result<&Diagram, TrellisError> {
        self.diagram(DiagramId::Root)
    }

    pub fn active_diagram_id(&self) -> DiagramId {
        self.active_diagram_id
    }

    /// The diagram edits currently apply to.
    pub fn active_diagram(&self) -> Result<&Diagram, TrellisError> {
        self.diagram(self.active_diagram_id)
    }

    /// The id counters.
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Every claim diagram with the label of its root claim.
    pub fn claim_diagrams(&self) -> Vec<ClaimDiagramSummary> {
        self.diagrams
            .values()
            .filter_map(|diagram| {
                let arguable = diagram.id.claim_key()?;
                let label = diagram
                    .root_claim()
                    .map(|node| node.label().to_string())
                    .unwrap_or_default();
                Some(ClaimDiagramSummary {
                    id: diagram.id,
                    arguable,
                    label,
                })
            })
            .collect()
    }

    /// Check the structural invariants of a topic, typically after loading it.
    ///
    /// Verifies that the root and active diagrams exist, that every diagram is
    /// stored under its own id with the matching kind, that edge endpoints live
    /// in the edge's diagram, that ids are unique and below the counters, and
    /// that each claim diagram holds exactly one root claim and argues about a
    /// part of the root diagram with the same score, and that no diagram
    /// contains a cycle.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::InvariantViolation`] describing the first
    /// violation found, or [`TrellisError::NotFound`] for a missing diagram.
    pub fn validate(&self) -> Result<(), TrellisError> {
        let root = self.root_diagram()?;
        if root.kind != DiagramKind::Problem {
            return Err(TrellisError::invariant("root diagram is not a problem diagram"));
        }
        self.active_diagram()?;

        let mut node_ids = HashSet::new();
        let mut edge_ids = HashSet::new();

        for (key, diagram) in &self.diagrams {
            if *key != diagram.id {
                return Err(TrellisError::invariant(format!(
                    "diagram {} stored under key {key}",
                    diagram.id
                )));
            }

            let expected_kind = if key.is_root() {
                DiagramKind::Problem
            } else {
                DiagramKind::Claim
            };
            if diagram.kind != expected_kind {
                return Err(TrellisError::invariant(format!(
                    "diagram {key} has kind {:?}",
                    diagram.kind
                )));
            }

            for node in &diagram.nodes {
                if node.diagram_id != *key {
                    return Err(TrellisError::invariant(format!(
                        "node {} claims diagram {} but is stored in {key}",
                        node.id, node.diagram_id
                    )));
                }
                if node.id.get() >= self.ids.peek_node_id() || !node_ids.insert(node.id) {
                    return Err(TrellisError::invariant(format!(
                        "node id {} is reused or was never allocated",
                        node.id
                    )));
                }
            }

            for edge in &diagram.edges {
                if edge.id.get() >= self.ids.peek_edge_id() || !edge_ids.insert(edge.id) {
                    return Err(TrellisError::invariant(format!(
                        "edge id {} is reused or was never allocated",
                        edge.id
                    )));
                }
                if diagram.find_node(edge.source).is_err() || diagram.find_node(edge.target).is_err()
                {
                    return Err(TrellisError::invariant(format!(
                        "edge {} has an endpoint outside diagram {key}",
                        edge.id
                    )));
                }
            }

            if DiagramGraph::new(diagram, None).has_cycle() {
                return Err(TrellisError::invariant(format!(
                    "diagram {key} contains a cycle"
                )));
            }

            if let Some(arguable) = key.claim_key() {
                let root_claims = diagram.nodes_of_type(NodeType::RootClaim).count();
                if root_claims != 1 {
                    return Err(TrellisError::invariant(format!(
                        "claim diagram {key} has {root_claims} root claims"
                    )));
                }
                let Ok(part) = root.find_scorable(arguable) else {
                    return Err(TrellisError::invariant(format!(
                        "claim diagram {key} does not argue about a part of the root diagram"
                    )));
                };
                let mirrored = diagram.root_claim().map(Node::score);
                if mirrored != Some(part.score()) {
                    return Err(TrellisError::invariant(format!(
                        "root claim of {key} is not scored like {arguable}"
                    )));
                }
            }
        }

        trace!(
            diagrams = self.diagrams.len(),
            nodes = node_ids.len(),
            edges = edge_ids.len();
            "Topic validated"
        );
        Ok(())
    }

    pub(crate) fn diagram_mut(&mut self, id: DiagramId) -> Result<&mut Diagram, TrellisError> {
        self.diagrams
            .get_mut(&id)
            .ok_or_else(|| TrellisError::not_found(format!("diagram {id}")))
    }

    pub(crate) fn active_diagram_mut(&mut self) -> Result<&mut Diagram, TrellisError> {
        self.diagram_mut(self.active_diagram_id)
    }

    pub(crate) fn ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    pub(crate) fn insert_diagram(&mut self, diagram: Diagram) {
        self.diagrams.insert(diagram.id, diagram);
    }

    pub(crate) fn set_active_diagram_id(&mut self, id: DiagramId) {
        self.active_diagram_id = id;
    }
}

impl Default for Topic {
    fn default() -> Self {
        Self::new()
    }
}
