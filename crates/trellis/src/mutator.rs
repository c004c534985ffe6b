//! Structural edits of a topic.
//!
//! Every fallible edit runs against a draft copy of the topic. The draft
//! replaces the live topic only when the whole edit, including the relayout
//! of the touched diagram, succeeds. A failed edit leaves the topic and its
//! id counters untouched.

use log::{debug, info};

use trellis_core::{
    identifier::{Arguable, DiagramId, EdgeId, NodeId},
    schema::{EditMode, NodeType, RelationDirection, RelationName, TypeSchema},
};

use crate::{
    error::TrellisError,
    layout::{LayoutEngine, relayout},
    structure::{DiagramGraph, EdgeValidation},
    topic::{Diagram, DiagramKind, Edge, Node, Topic},
};

/// A requested change to the selection flag of one node or edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub part: Arguable,
    pub selected: bool,
}

/// Applies structural edits to a topic.
pub struct DiagramMutator<'a> {
    topic: &'a mut Topic,
    schema: &'a TypeSchema,
    mode: EditMode,
    engine: &'a dyn LayoutEngine,
    read_only: bool,
}

impl<'a> DiagramMutator<'a> {
    pub fn new(
        topic: &'a mut Topic,
        schema: &'a TypeSchema,
        mode: EditMode,
        engine: &'a dyn LayoutEngine,
    ) -> Self {
        Self {
            topic,
            schema,
            mode,
            engine,
            read_only: false,
        }
    }

    /// Refuse every change to topic data while `read_only` is set.
    ///
    /// Navigation between existing diagrams and selection stay available.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    fn ensure_writable(&self, action: &str) -> Result<(), TrellisError> {
        if self.read_only {
            debug!(action; "Edit refused, topic is read-only");
            return Err(TrellisError::read_only(action));
        }
        Ok(())
    }

    /// The topic being edited.
    pub fn topic(&self) -> &Topic {
        self.topic
    }

    /// Run `apply` on a draft and commit it only if it succeeds.
    fn transact<T>(
        &mut self,
        action: &str,
        apply: impl FnOnce(&mut Topic) -> Result<T, TrellisError>,
    ) -> Result<T, TrellisError> {
        let mut draft = self.topic.clone();
        match apply(&mut draft) {
            Ok(value) => {
                *self.topic = draft;
                debug!(action; "Edit committed");
                Ok(value)
            }
            Err(err) => {
                debug!(action, err:%; "Edit discarded");
                Err(err)
            }
        }
    }

    /// Add a node of `to_node_type` next to `from_node_id` in the active
    /// diagram, joined by an edge labelled `relation`.
    ///
    /// With [`RelationDirection::Child`] the new node becomes a child of the
    /// existing one, with [`RelationDirection::Parent`] its parent. A
    /// criterion or solution added next to a problem is also joined by
    /// `embodies` edges to the problem's existing solutions or criteria,
    /// leaving out any such edge that would close a cycle.
    ///
    /// Returns the id of the new node.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if `from_node_id` is not in the
    /// active diagram, or [`TrellisError::Layout`] if relayout fails.
    pub fn add_node(
        &mut self,
        from_node_id: NodeId,
        direction: RelationDirection,
        to_node_type: NodeType,
        relation: RelationName,
    ) -> Result<NodeId, TrellisError> {
        self.ensure_writable("add_node")?;
        let engine = self.engine;
        self.transact("add_node", |draft| {
            let diagram_id = draft.active_diagram_id();
            let from_type = draft.active_diagram()?.find_node(from_node_id)?.node_type();

            let node_id = draft.ids_mut().next_node_id();
            let edge_id = draft.ids_mut().next_edge_id();
            let (source, target) = match direction {
                RelationDirection::Parent => (node_id, from_node_id),
                RelationDirection::Child => (from_node_id, node_id),
            };

            let cross_links = cross_link_targets(
                draft.active_diagram()?,
                from_node_id,
                from_type,
                to_node_type,
            )?;

            let diagram = draft.active_diagram_mut()?;
            diagram.push_node(Node::new(node_id, to_node_type, diagram_id));
            diagram.push_edge(Edge::new(edge_id, source, target, relation));

            let mut cross_count = 0;
            for other in cross_links {
                // criterion -> solution, whichever of the two is new.
                let (source, target) = if to_node_type == NodeType::Criterion {
                    (node_id, other)
                } else {
                    (other, node_id)
                };
                if DiagramGraph::new(draft.active_diagram()?, None).reaches(target, source) {
                    debug!(source:%, target:%; "Cross link skipped, it would close a cycle");
                    continue;
                }
                let id = draft.ids_mut().next_edge_id();
                draft
                    .active_diagram_mut()?
                    .push_edge(Edge::new(id, source, target, RelationName::Embodies));
                cross_count += 1;
            }

            let diagram = draft.active_diagram_mut()?;
            relayout(diagram, engine)?;

            info!(
                node:% = node_id,
                node_type:% = to_node_type,
                from:% = from_node_id,
                relation:%,
                cross_links = cross_count;
                "Node added"
            );
            Ok(node_id)
        })
    }

    /// Connect two nodes of the active diagram.
    ///
    /// The relation is taken from the schema. Returns `None`, leaving the
    /// topic unchanged, if the edge is disallowed: duplicate, self-loop,
    /// unlicensed while restricted, or cycle-introducing.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if either node is not in the active
    /// diagram, or [`TrellisError::Layout`] if relayout fails.
    pub fn connect_nodes(
        &mut self,
        parent_id: NodeId,
        child_id: NodeId,
    ) -> Result<Option<EdgeId>, TrellisError> {
        self.ensure_writable("connect_nodes")?;
        let (schema, mode, engine) = (self.schema, self.mode, self.engine);
        self.transact("connect_nodes", |draft| {
            let relation = {
                let diagram = draft.active_diagram()?;
                let parent = diagram.find_node(parent_id)?;
                let child = diagram.find_node(child_id)?;
                match schema.validate_edge(diagram, parent, child, mode) {
                    Ok(relation) => relation,
                    Err(rejection) => {
                        debug!(parent:% = parent_id, child:% = child_id, rejection:%; "Connection rejected");
                        return Ok(None);
                    }
                }
            };

            let edge_id = draft.ids_mut().next_edge_id();
            let diagram = draft.active_diagram_mut()?;
            diagram.push_edge(Edge::new(edge_id, parent_id, child_id, relation));
            relayout(diagram, engine)?;

            info!(edge:% = edge_id, parent:% = parent_id, child:% = child_id, relation:%; "Nodes connected");
            Ok(Some(edge_id))
        })
    }

    /// Re-point an existing edge of the active diagram at new endpoints.
    ///
    /// The edge keeps its id and score and takes the relation the schema
    /// gives the new pair. Returns `false`, leaving the topic unchanged, if
    /// the new connection is disallowed.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if the edge or either node is not in
    /// the active diagram, or [`TrellisError::Layout`] if relayout fails.
    pub fn reconnect_edge(
        &mut self,
        edge_id: EdgeId,
        new_source: NodeId,
        new_target: NodeId,
    ) -> Result<bool, TrellisError> {
        self.ensure_writable("reconnect_edge")?;
        let (schema, mode, engine) = (self.schema, self.mode, self.engine);
        self.transact("reconnect_edge", |draft| {
            let relation = {
                let diagram = draft.active_diagram()?;
                diagram.find_edge(edge_id)?;
                let parent = diagram.find_node(new_source)?;
                let child = diagram.find_node(new_target)?;
                match schema.validate_edge_ignoring(diagram, parent, child, mode, Some(edge_id)) {
                    Ok(relation) => relation,
                    Err(rejection) => {
                        debug!(edge:% = edge_id, rejection:%; "Reconnection rejected");
                        return Ok(false);
                    }
                }
            };

            let diagram = draft.active_diagram_mut()?;
            diagram
                .find_edge_mut(edge_id)?
                .reconnect(new_source, new_target, relation);
            relayout(diagram, engine)?;

            info!(edge:% = edge_id, parent:% = new_source, child:% = new_target, relation:%; "Edge reconnected");
            Ok(true)
        })
    }

    /// Set the label of a node in the active diagram.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if the node is not in the active diagram.
    pub fn set_node_label(&mut self, node_id: NodeId, label: &str) -> Result<(), TrellisError> {
        self.ensure_writable("set_node_label")?;
        let node = self.topic.active_diagram_mut()?.find_node_mut(node_id)?;
        node.set_label(label.to_string());
        debug!(node:% = node_id, label; "Label set");
        Ok(())
    }

    /// Flip whether a problem shows its criteria, then relayout.
    ///
    /// Returns the new value of the flag.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if the node is not in the active
    /// diagram, [`TrellisError::InvariantViolation`] if it is not a problem,
    /// or [`TrellisError::Layout`] if relayout fails.
    pub fn toggle_show_criteria(&mut self, node_id: NodeId) -> Result<bool, TrellisError> {
        self.ensure_writable("toggle_show_criteria")?;
        let engine = self.engine;
        self.transact("toggle_show_criteria", |draft| {
            let diagram = draft.active_diagram_mut()?;
            let show = diagram.find_node_mut(node_id)?.toggle_show_criteria()?;
            relayout(diagram, engine)?;
            info!(problem:% = node_id, show; "Criteria visibility toggled");
            Ok(show)
        })
    }

    /// Make the claim diagram of `arguable` active, creating it on first use.
    ///
    /// A new claim diagram holds a single root claim labelled with the
    /// implicit statement about the arguable and carrying its score.
    ///
    /// Returns the id of the now-active diagram.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::InvariantViolation`] when creating a claim
    /// diagram from anywhere but the root diagram, [`TrellisError::NotFound`]
    /// if the arguable is missing, [`TrellisError::ReadOnly`] when a read-only
    /// topic would gain a diagram, or [`TrellisError::Layout`] if layout fails.
    pub fn set_or_create_active_diagram(
        &mut self,
        arguable: Arguable,
    ) -> Result<DiagramId, TrellisError> {
        if !self.topic.has_diagram(arguable.claim_diagram_id()) {
            self.ensure_writable("set_or_create_active_diagram")?;
        }
        let engine = self.engine;
        self.transact("set_or_create_active_diagram", |draft| {
            let claim_id = arguable.claim_diagram_id();

            if !draft.has_diagram(claim_id) {
                let (label, score) = {
                    let active = draft.active_diagram()?;
                    if !active.id().is_root() {
                        return Err(TrellisError::invariant(format!(
                            "claims about {arguable} in claim diagram {} are not supported",
                            active.id()
                        )));
                    }
                    let score = active.find_scorable(arguable)?.score();
                    (active.implicit_label(arguable)?, score)
                };

                let node_id = draft.ids_mut().next_node_id();
                let mut diagram = Diagram::new(claim_id, DiagramKind::Claim);
                diagram.push_node(Node::with_data(
                    node_id,
                    NodeType::RootClaim,
                    claim_id,
                    label,
                    score,
                ));
                relayout(&mut diagram, engine)?;
                draft.insert_diagram(diagram);
                info!(diagram:% = claim_id, root_claim:% = node_id; "Claim diagram created");
            }

            draft.set_active_diagram_id(claim_id);
            Ok(claim_id)
        })
    }

    /// Make an existing diagram active.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if no diagram has that id.
    pub fn set_active_diagram(&mut self, diagram_id: DiagramId) -> Result<(), TrellisError> {
        if !self.topic.has_diagram(diagram_id) {
            return Err(TrellisError::not_found(format!("diagram {diagram_id}")));
        }
        self.topic.set_active_diagram_id(diagram_id);
        debug!(diagram:% = diagram_id; "Active diagram set");
        Ok(())
    }

    /// Clear the selection flag of every node and edge in the active diagram.
    pub fn deselect_all(&mut self) -> Result<(), TrellisError> {
        let diagram = self.topic.active_diagram_mut()?;
        for node in diagram.nodes_mut() {
            node.set_selected(false);
        }
        for edge in diagram.edges_mut() {
            edge.set_selected(false);
        }
        Ok(())
    }

    /// Apply a batch of selection changes to the active diagram.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if any target is missing, in which
    /// case no change is applied.
    pub fn set_selected(&mut self, changes: &[SelectionChange]) -> Result<(), TrellisError> {
        self.transact("set_selected", |draft| {
            let diagram = draft.active_diagram_mut()?;
            for change in changes {
                match change.part {
                    Arguable::Node(id) => diagram.find_node_mut(id)?.set_selected(change.selected),
                    Arguable::Edge(id) => diagram.find_edge_mut(id)?.set_selected(change.selected),
                }
            }
            Ok(())
        })
    }

    /// Replace the topic with a fresh one holding a single problem.
    pub fn reset_topic(&mut self) -> Result<(), TrellisError> {
        self.ensure_writable("reset_topic")?;
        let engine = self.engine;
        self.transact("reset_topic", |draft| {
            *draft = Topic::new();
            relayout(draft.diagram_mut(DiagramId::Root)?, engine)?;
            info!("Topic reset");
            Ok(())
        })
    }
}

/// Existing nodes a new criterion or solution must be cross-linked to.
///
/// A criterion added next to a problem embodies-links to each solution of
/// that problem; a solution links from each of its criteria.
fn cross_link_targets(
    diagram: &Diagram,
    from_node_id: NodeId,
    from_type: NodeType,
    to_node_type: NodeType,
) -> Result<Vec<NodeId>, TrellisError> {
    if from_type != NodeType::Problem {
        return Ok(Vec::new());
    }
    let complementary = match to_node_type {
        NodeType::Criterion => RelationName::Solves,
        NodeType::Solution => RelationName::CriterionFor,
        _ => return Ok(Vec::new()),
    };

    diagram
        .children_via(from_node_id, complementary)
        .map(|id| diagram.find_node(id).map(Node::id))
        .collect()
}

#[cfg(test)]
mod tests {
    use trellis_core::score::Score;

    use crate::layout::{EngineBuilder, LayoutEngineKind};

    use super::*;

    struct Fixture {
        topic: Topic,
        engine: Box<dyn LayoutEngine>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                topic: Topic::new(),
                engine: EngineBuilder::new().build(LayoutEngineKind::Basic),
            }
        }

        fn mutator(&mut self, mode: EditMode) -> DiagramMutator<'_> {
            DiagramMutator::new(&mut self.topic, TypeSchema::standard(), mode, &*self.engine)
        }
    }

    const ROOT_PROBLEM: NodeId = NodeId::new(0);

    #[test]
    fn test_add_child_node() {
        let mut fixture = Fixture::new();
        let id = fixture
            .mutator(EditMode::Restricted)
            .add_node(
                ROOT_PROBLEM,
                RelationDirection::Child,
                NodeType::Solution,
                RelationName::Solves,
            )
            .unwrap();

        let root = fixture.topic.root_diagram().unwrap();
        assert_eq!(id, NodeId::new(1));
        assert_eq!(root.nodes().len(), 2);
        assert_eq!(root.find_node(id).unwrap().label(), "new solution");
        let edge = &root.edges()[0];
        assert_eq!((edge.source(), edge.target()), (ROOT_PROBLEM, id));
        assert_eq!(edge.label(), RelationName::Solves);
        assert_eq!(fixture.topic.ids().peek_edge_id(), 1);
    }

    #[test]
    fn test_add_parent_node() {
        let mut fixture = Fixture::new();
        let id = fixture
            .mutator(EditMode::Restricted)
            .add_node(
                ROOT_PROBLEM,
                RelationDirection::Parent,
                NodeType::Problem,
                RelationName::Causes,
            )
            .unwrap();

        let edge = &fixture.topic.root_diagram().unwrap().edges()[0];
        assert_eq!((edge.source(), edge.target()), (id, ROOT_PROBLEM));
    }

    #[test]
    fn test_add_node_missing_source_changes_nothing() {
        let mut fixture = Fixture::new();
        let before = fixture.topic.clone();

        let result = fixture.mutator(EditMode::Restricted).add_node(
            NodeId::new(99),
            RelationDirection::Child,
            NodeType::Solution,
            RelationName::Solves,
        );

        assert!(matches!(result, Err(TrellisError::NotFound(_))));
        assert_eq!(fixture.topic, before);
    }

    #[test]
    fn test_criterion_cross_links_to_existing_solutions() {
        let mut fixture = Fixture::new();
        let mut mutator = fixture.mutator(EditMode::Restricted);
        let first = mutator
            .add_node(ROOT_PROBLEM, RelationDirection::Child, NodeType::Solution, RelationName::Solves)
            .unwrap();
        let second = mutator
            .add_node(ROOT_PROBLEM, RelationDirection::Child, NodeType::Solution, RelationName::Solves)
            .unwrap();
        let criterion = mutator
            .add_node(
                ROOT_PROBLEM,
                RelationDirection::Child,
                NodeType::Criterion,
                RelationName::CriterionFor,
            )
            .unwrap();

        let root = fixture.topic.root_diagram().unwrap();
        assert!(root.contains_edge(criterion, first));
        assert!(root.contains_edge(criterion, second));
        assert_eq!(root.edges().len(), 5);
    }

    #[test]
    fn test_solution_cross_links_from_existing_criteria() {
        let mut fixture = Fixture::new();
        let mut mutator = fixture.mutator(EditMode::Restricted);
        let criterion = mutator
            .add_node(
                ROOT_PROBLEM,
                RelationDirection::Child,
                NodeType::Criterion,
                RelationName::CriterionFor,
            )
            .unwrap();
        let solution = mutator
            .add_node(ROOT_PROBLEM, RelationDirection::Child, NodeType::Solution, RelationName::Solves)
            .unwrap();

        let root = fixture.topic.root_diagram().unwrap();
        let embodies = root
            .edges()
            .iter()
            .find(|edge| edge.label() == RelationName::Embodies)
            .unwrap();
        assert_eq!((embodies.source(), embodies.target()), (criterion, solution));
    }

    #[test]
    fn test_cross_link_closing_a_cycle_is_skipped() {
        let mut fixture = Fixture::new();
        let criterion = fixture
            .mutator(EditMode::Restricted)
            .add_node(
                ROOT_PROBLEM,
                RelationDirection::Child,
                NodeType::Criterion,
                RelationName::CriterionFor,
            )
            .unwrap();

        // A solution parenting the problem would close
        // problem -> criterion -> solution -> problem through its cross link.
        let solution = fixture
            .mutator(EditMode::Unrestricted)
            .add_node(
                ROOT_PROBLEM,
                RelationDirection::Parent,
                NodeType::Solution,
                RelationName::RelatesTo,
            )
            .unwrap();

        let root = fixture.topic.root_diagram().unwrap();
        assert!(root.contains_edge(solution, ROOT_PROBLEM));
        assert!(!root.contains_edge(criterion, solution));
        assert_eq!(root.edges().len(), 2);
        assert_eq!(fixture.topic.ids().peek_edge_id(), 2);
        assert!(fixture.topic.validate().is_ok());

        assert!(
            fixture
                .mutator(EditMode::Unrestricted)
                .toggle_show_criteria(ROOT_PROBLEM)
                .unwrap()
        );
    }

    #[test]
    fn test_connect_rejections_are_no_ops() {
        let mut fixture = Fixture::new();
        let mut mutator = fixture.mutator(EditMode::Restricted);
        let solution = mutator
            .add_node(ROOT_PROBLEM, RelationDirection::Child, NodeType::Solution, RelationName::Solves)
            .unwrap();
        let before = mutator.topic().clone();

        // Duplicate, reversed (unlicensed), and self-loop.
        assert_eq!(mutator.connect_nodes(ROOT_PROBLEM, solution).unwrap(), None);
        assert_eq!(mutator.connect_nodes(solution, ROOT_PROBLEM).unwrap(), None);
        assert_eq!(mutator.connect_nodes(solution, solution).unwrap(), None);

        assert_eq!(mutator.topic(), &before);
    }

    #[test]
    fn test_connect_unrestricted_uses_fallback_relation() {
        let mut fixture = Fixture::new();
        let solution = fixture
            .mutator(EditMode::Restricted)
            .add_node(ROOT_PROBLEM, RelationDirection::Child, NodeType::Solution, RelationName::Solves)
            .unwrap();
        let effect = fixture
            .mutator(EditMode::Restricted)
            .add_node(solution, RelationDirection::Child, NodeType::Effect, RelationName::CreatedBy)
            .unwrap();

        // effect -> solution would close solution -> effect -> solution.
        assert_eq!(
            fixture.mutator(EditMode::Unrestricted).connect_nodes(effect, solution).unwrap(),
            None
        );

        let other = fixture
            .mutator(EditMode::Restricted)
            .add_node(ROOT_PROBLEM, RelationDirection::Child, NodeType::Solution, RelationName::Solves)
            .unwrap();
        let edge = fixture
            .mutator(EditMode::Unrestricted)
            .connect_nodes(effect, other)
            .unwrap()
            .unwrap();
        assert_eq!(
            fixture.topic.root_diagram().unwrap().find_edge(edge).unwrap().label(),
            RelationName::RelatesTo
        );
    }

    #[test]
    fn test_reconnect_edge() {
        let mut fixture = Fixture::new();
        let mut mutator = fixture.mutator(EditMode::Restricted);
        let first = mutator
            .add_node(ROOT_PROBLEM, RelationDirection::Child, NodeType::Problem, RelationName::Causes)
            .unwrap();
        let second = mutator
            .add_node(ROOT_PROBLEM, RelationDirection::Child, NodeType::Problem, RelationName::Causes)
            .unwrap();

        // Edge 0 is root -> first; point it at first -> second instead.
        assert!(mutator.reconnect_edge(EdgeId::new(0), first, second).unwrap());
        let edge = mutator.topic().root_diagram().unwrap().find_edge(EdgeId::new(0)).unwrap();
        assert_eq!((edge.source(), edge.target()), (first, second));

        // second -> root would close root -> second.
        assert!(!mutator.reconnect_edge(EdgeId::new(0), second, ROOT_PROBLEM).unwrap());
    }

    #[test]
    fn test_toggle_show_criteria_relayouts_visibility() {
        let mut fixture = Fixture::new();
        let mut mutator = fixture.mutator(EditMode::Restricted);
        let criterion = mutator
            .add_node(
                ROOT_PROBLEM,
                RelationDirection::Child,
                NodeType::Criterion,
                RelationName::CriterionFor,
            )
            .unwrap();
        assert!(mutator.topic().root_diagram().unwrap().find_node(criterion).unwrap().is_hidden());

        assert!(mutator.toggle_show_criteria(ROOT_PROBLEM).unwrap());
        assert!(!mutator.topic().root_diagram().unwrap().find_node(criterion).unwrap().is_hidden());

        assert!(matches!(
            mutator.toggle_show_criteria(criterion),
            Err(TrellisError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_claim_diagram_created_once() {
        let mut fixture = Fixture::new();
        let mut mutator = fixture.mutator(EditMode::Restricted);
        mutator.set_node_label(ROOT_PROBLEM, "noise").unwrap();

        let arguable = Arguable::Node(ROOT_PROBLEM);
        let claim_id = mutator.set_or_create_active_diagram(arguable).unwrap();
        assert_eq!(claim_id.to_string(), "node-0");
        assert_eq!(mutator.topic().active_diagram_id(), claim_id);

        let claim = mutator.topic().diagram(claim_id).unwrap();
        let root_claim = claim.root_claim().unwrap();
        assert_eq!(root_claim.label(), "\"noise\" is important");
        assert_eq!(root_claim.score(), Score::UNSCORED);
        assert_eq!(root_claim.id(), NodeId::new(1));

        mutator.set_active_diagram(DiagramId::Root).unwrap();
        mutator.set_or_create_active_diagram(arguable).unwrap();
        assert_eq!(mutator.topic().claim_diagrams().len(), 1);
        assert_eq!(mutator.topic().ids().peek_node_id(), 2);
    }

    #[test]
    fn test_claims_about_claims_rejected() {
        let mut fixture = Fixture::new();
        let mut mutator = fixture.mutator(EditMode::Restricted);
        mutator.set_or_create_active_diagram(Arguable::Node(ROOT_PROBLEM)).unwrap();
        let before = mutator.topic().clone();

        let result = mutator.set_or_create_active_diagram(Arguable::Node(NodeId::new(1)));
        assert!(matches!(result, Err(TrellisError::InvariantViolation(_))));
        assert_eq!(mutator.topic(), &before);
    }

    #[test]
    fn test_selection() {
        let mut fixture = Fixture::new();
        let mut mutator = fixture.mutator(EditMode::Restricted);
        mutator
            .set_selected(&[SelectionChange {
                part: Arguable::Node(ROOT_PROBLEM),
                selected: true,
            }])
            .unwrap();
        assert!(mutator.topic().root_diagram().unwrap().nodes()[0].is_selected());

        let result = mutator.set_selected(&[
            SelectionChange {
                part: Arguable::Node(ROOT_PROBLEM),
                selected: false,
            },
            SelectionChange {
                part: Arguable::Edge(EdgeId::new(3)),
                selected: true,
            },
        ]);
        assert!(result.is_err());
        assert!(mutator.topic().root_diagram().unwrap().nodes()[0].is_selected());

        mutator.deselect_all().unwrap();
        assert!(!mutator.topic().root_diagram().unwrap().nodes()[0].is_selected());
    }

    #[test]
    fn test_set_active_diagram_unknown() {
        let mut fixture = Fixture::new();
        let unknown = Arguable::Edge(EdgeId::new(4)).claim_diagram_id();
        assert!(matches!(
            fixture.mutator(EditMode::Restricted).set_active_diagram(unknown),
            Err(TrellisError::NotFound(_))
        ));
    }

    #[test]
    fn test_read_only_refuses_edits() {
        let mut fixture = Fixture::new();
        let solution = fixture
            .mutator(EditMode::Restricted)
            .add_node(ROOT_PROBLEM, RelationDirection::Child, NodeType::Solution, RelationName::Solves)
            .unwrap();
        let claim_id = fixture
            .mutator(EditMode::Restricted)
            .set_or_create_active_diagram(Arguable::Node(ROOT_PROBLEM))
            .unwrap();
        fixture
            .mutator(EditMode::Restricted)
            .set_active_diagram(DiagramId::Root)
            .unwrap();
        let before = fixture.topic.clone();

        let mut mutator = fixture.mutator(EditMode::Unrestricted).with_read_only(true);
        assert!(matches!(
            mutator.add_node(ROOT_PROBLEM, RelationDirection::Child, NodeType::Criterion, RelationName::CriterionFor),
            Err(TrellisError::ReadOnly(_))
        ));
        assert!(matches!(
            mutator.connect_nodes(solution, ROOT_PROBLEM),
            Err(TrellisError::ReadOnly(_))
        ));
        assert!(matches!(
            mutator.reconnect_edge(EdgeId::new(0), ROOT_PROBLEM, solution),
            Err(TrellisError::ReadOnly(_))
        ));
        assert!(matches!(
            mutator.set_or_create_active_diagram(Arguable::Node(solution)),
            Err(TrellisError::ReadOnly(_))
        ));
        assert_eq!(mutator.topic(), &before);

        // Existing diagrams remain reachable.
        assert_eq!(
            mutator.set_or_create_active_diagram(Arguable::Node(ROOT_PROBLEM)).unwrap(),
            claim_id
        );
        assert_eq!(mutator.topic().claim_diagrams().len(), 1);
    }

    #[test]
    fn test_reset_topic() {
        let mut fixture = Fixture::new();
        let mut mutator = fixture.mutator(EditMode::Restricted);
        mutator
            .add_node(ROOT_PROBLEM, RelationDirection::Child, NodeType::Solution, RelationName::Solves)
            .unwrap();
        mutator.set_or_create_active_diagram(Arguable::Node(ROOT_PROBLEM)).unwrap();

        mutator.reset_topic().unwrap();
        assert_eq!(mutator.topic(), &Topic::new());
    }
}
