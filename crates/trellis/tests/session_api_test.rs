//! Integration tests for the Session API
//!
//! These walk through typical editing flows using only the public surface.

use trellis::{
    Session, TrellisError,
    config::AppConfig,
    geometry::{Orientation, Point},
    identifier::{Arguable, DiagramId, EdgeId, NodeId},
    layout::{Layout, LayoutGraph},
    persistence::{JsonFileStore, TopicStore},
    schema::{NodeType, RelationDirection, RelationName},
    score::Score,
};

const P1: NodeId = NodeId::new(0);

fn session() -> Session {
    Session::new(&AppConfig::default())
}

fn add_child(session: &mut Session, from: NodeId, node_type: NodeType, relation: RelationName) -> NodeId {
    session
        .mutator()
        .add_node(from, RelationDirection::Child, node_type, relation)
        .expect("add_node should succeed")
}

#[test]
fn test_criterion_links_to_existing_solution() {
    let mut session = session();

    let s1 = add_child(&mut session, P1, NodeType::Solution, RelationName::Solves);
    {
        let root = session.topic().root_diagram().unwrap();
        assert_eq!(root.nodes().len(), 2);
        assert_eq!(root.edges().len(), 1);
        assert_eq!(root.edges()[0].label(), RelationName::Solves);
        assert_eq!((root.edges()[0].source(), root.edges()[0].target()), (P1, s1));
    }

    let c1 = add_child(&mut session, P1, NodeType::Criterion, RelationName::CriterionFor);
    let root = session.topic().root_diagram().unwrap();
    assert!(root.contains_edge(P1, c1));

    let embodies: Vec<_> = root
        .edges()
        .iter()
        .filter(|edge| edge.label() == RelationName::Embodies)
        .collect();
    assert_eq!(embodies.len(), 1);
    assert_eq!((embodies[0].source(), embodies[0].target()), (c1, s1));
}

#[test]
fn test_claim_diagram_mirrors_score_and_is_created_once() {
    let mut session = session();
    let s1 = add_child(&mut session, P1, NodeType::Solution, RelationName::Solves);
    let seven = Score::new(7).unwrap();
    session.set_score(Arguable::Node(s1), seven).unwrap();

    let diagrams_before = session.topic().diagrams().count();
    let claim_id = session
        .mutator()
        .set_or_create_active_diagram(Arguable::Node(s1))
        .unwrap();
    assert_eq!(session.topic().diagrams().count(), diagrams_before + 1);

    let claim = session.topic().diagram(claim_id).unwrap();
    assert_eq!(claim.nodes().len(), 1);
    assert_eq!(claim.root_claim().unwrap().score(), seven);
    assert_eq!(claim.root_claim().unwrap().label(), "\"new solution\" is important");

    session
        .mutator()
        .set_or_create_active_diagram(Arguable::Node(s1))
        .unwrap();
    assert_eq!(session.topic().diagrams().count(), diagrams_before + 1);
}

#[test]
fn test_arguing_in_a_claim_diagram() {
    let mut session = session();
    let s1 = add_child(&mut session, P1, NodeType::Solution, RelationName::Solves);
    let claim_id = session
        .mutator()
        .set_or_create_active_diagram(Arguable::Edge(EdgeId::new(0)))
        .unwrap();
    let root_claim = session
        .topic()
        .diagram(claim_id)
        .unwrap()
        .root_claim()
        .unwrap()
        .id();

    let options = session
        .addable_relations(root_claim, RelationDirection::Child)
        .unwrap();
    let to_types: Vec<NodeType> = options.iter().map(|option| option.to_node_type).collect();
    assert_eq!(to_types, vec![NodeType::Support, NodeType::Critique]);

    let support = add_child(&mut session, root_claim, NodeType::Support, RelationName::Supports);
    add_child(&mut session, support, NodeType::Critique, RelationName::Critiques);

    // Scoring the root claim reaches the edge in the root diagram.
    let three = Score::new(3).unwrap();
    session.set_score(Arguable::Node(root_claim), three).unwrap();
    let root = session.topic().root_diagram().unwrap();
    assert_eq!(root.find_edge(EdgeId::new(0)).unwrap().score(), three);

    // Claim diagrams lay out left to right.
    let claim = session.topic().diagram(claim_id).unwrap();
    let root_claim_x = claim.find_node(root_claim).unwrap().position().x();
    let support_x = claim.find_node(support).unwrap().position().x();
    assert!(root_claim_x < support_x);

    let summaries = session.topic().claim_diagrams();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].arguable, Arguable::Edge(EdgeId::new(0)));
    assert_eq!(summaries[0].label, "\"new solution\" solves \"new problem\"");
    assert!(session.topic().root_diagram().unwrap().find_node(s1).is_ok());
}

#[test]
fn test_failed_layout_discards_edit() {
    let failing = |_: &LayoutGraph, _: Orientation| -> Result<Layout, TrellisError> {
        Err(TrellisError::Layout("engine unavailable".to_string()))
    };
    let mut session = session().with_engine(Box::new(failing));
    let before = session.topic().clone();

    let result = session.mutator().add_node(
        P1,
        RelationDirection::Child,
        NodeType::Solution,
        RelationName::Solves,
    );

    assert!(matches!(result, Err(TrellisError::Layout(_))));
    assert_eq!(session.topic(), &before);
    assert_eq!(session.topic().ids().peek_node_id(), 1);
}

#[test]
fn test_custom_engine_positions_are_applied() {
    let diagonal = |graph: &LayoutGraph, _: Orientation| -> Result<Layout, TrellisError> {
        let mut layout = Layout::default();
        for (index, id) in graph.nodes.iter().enumerate() {
            let offset = index as f32;
            layout.positions.insert(*id, Point::new(offset, offset));
        }
        layout.route_straight(graph);
        Ok(layout)
    };
    let mut session = session().with_engine(Box::new(diagonal));

    let s1 = add_child(&mut session, P1, NodeType::Solution, RelationName::Solves);

    let root = session.topic().root_diagram().unwrap();
    assert_eq!(root.find_node(s1).unwrap().position(), Point::new(1.0, 1.0));
    assert_eq!(
        root.edges()[0].route(),
        &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]
    );
}

#[test]
fn test_file_round_trip_preserves_everything() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("topic.json"));

    let mut session = session();
    let s1 = add_child(&mut session, P1, NodeType::Solution, RelationName::Solves);
    add_child(&mut session, P1, NodeType::Criterion, RelationName::CriterionFor);
    session.mutator().set_node_label(s1, "bike lanes").unwrap();
    session.mutator().toggle_show_criteria(P1).unwrap();
    session
        .mutator()
        .set_or_create_active_diagram(Arguable::Node(s1))
        .unwrap();
    session.save(&store).unwrap();

    let loaded = Session::load(&store, &AppConfig::default()).unwrap();
    assert_eq!(loaded.topic(), session.topic());
    assert_eq!(
        loaded.topic().active_diagram_id(),
        DiagramId::Claim(Arguable::Node(s1))
    );
    assert_eq!(store.load().unwrap().ids(), session.topic().ids());
}
