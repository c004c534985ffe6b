//! Node types, relations and the schema that licenses them.
//!
//! A [`TypeSchema`] is a static table of `(parent type, child type, relation)`
//! triples. Edges point from parent to child and a relation name reads
//! "*child* relation *parent*": a `problem → solution` edge labelled
//! [`RelationName::Solves`] reads "the solution solves the problem".
//!
//! Every query takes an explicit [`EditMode`]. In
//! [`EditMode::Unrestricted`] any pair of node types may be related; pairs the
//! schema does not license fall back to [`RelationName::RelatesTo`].

use std::{borrow::Cow, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Problem,
    Solution,
    SolutionComponent,
    Criterion,
    Effect,
    RootClaim,
    Support,
    Critique,
}

impl NodeType {
    /// Every node type.
    pub const ALL: [NodeType; 8] = [
        NodeType::Problem,
        NodeType::Solution,
        NodeType::SolutionComponent,
        NodeType::Criterion,
        NodeType::Effect,
        NodeType::RootClaim,
        NodeType::Support,
        NodeType::Critique,
    ];

    /// The camelCase name used in snapshots and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Problem => "problem",
            Self::Solution => "solution",
            Self::SolutionComponent => "solutionComponent",
            Self::Criterion => "criterion",
            Self::Effect => "effect",
            Self::RootClaim => "rootClaim",
            Self::Support => "support",
            Self::Critique => "critique",
        }
    }

    /// Label given to a freshly created node of this type.
    pub fn default_label(self) -> String {
        match self {
            Self::SolutionComponent => "new component".to_string(),
            Self::RootClaim => "new claim".to_string(),
            other => format!("new {}", other.as_str()),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|node_type| node_type.as_str() == s)
            .ok_or_else(|| format!("unknown node type `{s}`"))
    }
}

/// Named edge types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationName {
    #[serde(rename = "causes")]
    Causes,
    #[serde(rename = "solves")]
    Solves,
    #[serde(rename = "criterion for")]
    CriterionFor,
    #[serde(rename = "embodies")]
    Embodies,
    #[serde(rename = "is part of")]
    IsPartOf,
    #[serde(rename = "created by")]
    CreatedBy,
    #[serde(rename = "supports")]
    Supports,
    #[serde(rename = "critiques")]
    Critiques,
    /// Fallback used for pairs the schema does not license.
    #[serde(rename = "relates to")]
    RelatesTo,
}

impl RelationName {
    /// The human-readable relation text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Causes => "causes",
            Self::Solves => "solves",
            Self::CriterionFor => "criterion for",
            Self::Embodies => "embodies",
            Self::IsPartOf => "is part of",
            Self::CreatedBy => "created by",
            Self::Supports => "supports",
            Self::Critiques => "critiques",
            Self::RelatesTo => "relates to",
        }
    }
}

impl fmt::Display for RelationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of an existing node a new node is added on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationDirection {
    /// The new node becomes the parent (edge source).
    Parent,
    /// The new node becomes the child (edge target).
    Child,
}

/// A licensed `(parent, child, name)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub parent: NodeType,
    pub child: NodeType,
    pub name: RelationName,
}

impl Relation {
    /// Create a relation triple.
    pub const fn new(parent: NodeType, child: NodeType, name: RelationName) -> Self {
        Self {
            parent,
            child,
            name,
        }
    }
}

/// A way to extend a node: the type of node to add and the relation joining them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddableRelation {
    pub to_node_type: NodeType,
    pub relation: Relation,
}

/// Whether edits are validated against the schema.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    /// Only schema-licensed relations are allowed.
    #[default]
    Restricted,
    /// Any two node types may be related.
    Unrestricted,
}

/// Reasons a proposed edge is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdgeRejection {
    #[error("an edge from {parent} to {child} already exists")]
    Duplicate { parent: String, child: String },

    #[error("node {0} cannot be connected to itself")]
    SelfLoop(String),

    #[error("no relation from {parent} to {child} is licensed")]
    Unlicensed { parent: NodeType, child: NodeType },

    #[error("an edge from {parent} to {child} would introduce a cycle")]
    Cycle { parent: String, child: String },
}

const STANDARD_RELATIONS: &[Relation] = &[
    Relation::new(NodeType::Problem, NodeType::Problem, RelationName::Causes),
    Relation::new(NodeType::Problem, NodeType::Solution, RelationName::Solves),
    Relation::new(NodeType::Problem, NodeType::Criterion, RelationName::CriterionFor),
    Relation::new(NodeType::Criterion, NodeType::Solution, RelationName::Embodies),
    Relation::new(NodeType::Solution, NodeType::SolutionComponent, RelationName::IsPartOf),
    Relation::new(
        NodeType::SolutionComponent,
        NodeType::SolutionComponent,
        RelationName::IsPartOf,
    ),
    Relation::new(NodeType::Solution, NodeType::Effect, RelationName::CreatedBy),
    Relation::new(NodeType::SolutionComponent, NodeType::Effect, RelationName::CreatedBy),
    Relation::new(NodeType::Effect, NodeType::Effect, RelationName::CreatedBy),
    Relation::new(NodeType::Effect, NodeType::Problem, RelationName::CreatedBy),
    Relation::new(NodeType::RootClaim, NodeType::Support, RelationName::Supports),
    Relation::new(NodeType::RootClaim, NodeType::Critique, RelationName::Critiques),
    Relation::new(NodeType::Support, NodeType::Support, RelationName::Supports),
    Relation::new(NodeType::Support, NodeType::Critique, RelationName::Critiques),
    Relation::new(NodeType::Critique, NodeType::Support, RelationName::Supports),
    Relation::new(NodeType::Critique, NodeType::Critique, RelationName::Critiques),
];

static STANDARD: TypeSchema = TypeSchema {
    relations: Cow::Borrowed(STANDARD_RELATIONS),
};

/// Table of legal relations between node types.
///
/// # Examples
///
/// ```
/// use trellis_core::schema::{EditMode, NodeType, RelationName, TypeSchema};
///
/// let schema = TypeSchema::standard();
/// assert_eq!(
///     schema.relation(NodeType::Problem, NodeType::Solution, EditMode::Restricted),
///     Some(RelationName::Solves)
/// );
/// assert_eq!(
///     schema.relation(NodeType::Solution, NodeType::Problem, EditMode::Restricted),
///     None
/// );
/// assert_eq!(
///     schema.relation(NodeType::Solution, NodeType::Problem, EditMode::Unrestricted),
///     Some(RelationName::RelatesTo)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSchema {
    relations: Cow<'static, [Relation]>,
}

impl TypeSchema {
    /// The built-in schema for problem and claim diagrams.
    pub fn standard() -> &'static TypeSchema {
        &STANDARD
    }

    /// Create a schema from a custom relation table.
    pub fn new(relations: Vec<Relation>) -> Self {
        Self {
            relations: Cow::Owned(relations),
        }
    }

    /// Borrow the relation table.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// The canonical relation for an ordered `(parent, child)` pair.
    ///
    /// Returns `None` when the pair is unlicensed and `mode` is restricted.
    pub fn relation(
        &self,
        parent: NodeType,
        child: NodeType,
        mode: EditMode,
    ) -> Option<RelationName> {
        let licensed = self
            .relations
            .iter()
            .find(|relation| relation.parent == parent && relation.child == child)
            .map(|relation| relation.name);

        match (licensed, mode) {
            (Some(name), _) => Some(name),
            (None, EditMode::Unrestricted) => Some(RelationName::RelatesTo),
            (None, EditMode::Restricted) => None,
        }
    }

    /// Check that a `(parent, child)` pair may be related under `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeRejection::Unlicensed`] if no relation exists for the pair
    /// while restricted.
    pub fn check_pair(
        &self,
        parent: NodeType,
        child: NodeType,
        mode: EditMode,
    ) -> Result<RelationName, EdgeRejection> {
        self.relation(parent, child, mode)
            .ok_or(EdgeRejection::Unlicensed { parent, child })
    }

    /// Relations reachable by extending a node of `node_type`.
    ///
    /// With [`RelationDirection::Child`] the new node becomes a child of the
    /// existing one, with [`RelationDirection::Parent`] its parent. An empty
    /// list means the node cannot be extended in that direction.
    ///
    /// Root claims are never offered in unrestricted mode: a claim diagram
    /// holds exactly one.
    pub fn addable_relations_from(
        &self,
        node_type: NodeType,
        direction: RelationDirection,
        mode: EditMode,
    ) -> Vec<AddableRelation> {
        match mode {
            EditMode::Restricted => self
                .relations
                .iter()
                .filter_map(|relation| {
                    let to_node_type = match direction {
                        RelationDirection::Child if relation.parent == node_type => relation.child,
                        RelationDirection::Parent if relation.child == node_type => relation.parent,
                        _ => return None,
                    };
                    Some(AddableRelation {
                        to_node_type,
                        relation: *relation,
                    })
                })
                .collect(),
            EditMode::Unrestricted => NodeType::ALL
                .into_iter()
                .filter(|to_node_type| *to_node_type != NodeType::RootClaim)
                .map(|to_node_type| {
                    let (parent, child) = match direction {
                        RelationDirection::Child => (node_type, to_node_type),
                        RelationDirection::Parent => (to_node_type, node_type),
                    };
                    // Unrestricted lookups always resolve.
                    let name = self
                        .relation(parent, child, EditMode::Unrestricted)
                        .unwrap_or(RelationName::RelatesTo);
                    AddableRelation {
                        to_node_type,
                        relation: Relation::new(parent, child, name),
                    }
                })
                .collect(),
        }
    }
}

impl Default for TypeSchema {
    fn default() -> Self {
        STANDARD.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_relations_are_unique_per_pair() {
        let relations = TypeSchema::standard().relations();
        for (i, a) in relations.iter().enumerate() {
            for b in &relations[i + 1..] {
                assert!(
                    !(a.parent == b.parent && a.child == b.child),
                    "duplicate pair {:?} -> {:?}",
                    a.parent,
                    a.child
                );
            }
        }
    }

    #[test]
    fn test_addable_children_of_problem() {
        let addable = TypeSchema::standard().addable_relations_from(
            NodeType::Problem,
            RelationDirection::Child,
            EditMode::Restricted,
        );
        let types: Vec<NodeType> = addable.iter().map(|a| a.to_node_type).collect();

        assert_eq!(
            types,
            vec![NodeType::Problem, NodeType::Solution, NodeType::Criterion]
        );
        assert!(addable.iter().all(|a| a.relation.parent == NodeType::Problem));
    }

    #[test]
    fn test_addable_parents_of_solution() {
        let addable = TypeSchema::standard().addable_relations_from(
            NodeType::Solution,
            RelationDirection::Parent,
            EditMode::Restricted,
        );
        let names: Vec<RelationName> = addable.iter().map(|a| a.relation.name).collect();

        assert_eq!(names, vec![RelationName::Solves, RelationName::Embodies]);
    }

    #[test]
    fn test_root_claim_has_no_parents() {
        let addable = TypeSchema::standard().addable_relations_from(
            NodeType::RootClaim,
            RelationDirection::Parent,
            EditMode::Restricted,
        );
        assert!(addable.is_empty());
    }

    #[test]
    fn test_unrestricted_offers_every_type_but_root_claim() {
        let addable = TypeSchema::standard().addable_relations_from(
            NodeType::Solution,
            RelationDirection::Child,
            EditMode::Unrestricted,
        );

        assert_eq!(addable.len(), NodeType::ALL.len() - 1);
        assert!(addable.iter().all(|a| a.to_node_type != NodeType::RootClaim));

        let effect = addable
            .iter()
            .find(|a| a.to_node_type == NodeType::Effect)
            .unwrap();
        assert_eq!(effect.relation.name, RelationName::CreatedBy);

        let problem = addable
            .iter()
            .find(|a| a.to_node_type == NodeType::Problem)
            .unwrap();
        assert_eq!(problem.relation.name, RelationName::RelatesTo);
        assert_eq!(problem.relation.parent, NodeType::Solution);
    }

    #[test]
    fn test_check_pair() {
        let schema = TypeSchema::standard();
        assert_eq!(
            schema.check_pair(NodeType::Criterion, NodeType::Solution, EditMode::Restricted),
            Ok(RelationName::Embodies)
        );
        assert_eq!(
            schema.check_pair(NodeType::Support, NodeType::Problem, EditMode::Restricted),
            Err(EdgeRejection::Unlicensed {
                parent: NodeType::Support,
                child: NodeType::Problem,
            })
        );
    }

    #[test]
    fn test_custom_schema() {
        let schema = TypeSchema::new(vec![Relation::new(
            NodeType::Effect,
            NodeType::Solution,
            RelationName::Causes,
        )]);

        assert_eq!(
            schema.relation(NodeType::Effect, NodeType::Solution, EditMode::Restricted),
            Some(RelationName::Causes)
        );
        assert_eq!(
            schema.relation(NodeType::Problem, NodeType::Solution, EditMode::Restricted),
            None
        );
    }

    #[test]
    fn test_node_type_names_round_trip() {
        for node_type in NodeType::ALL {
            assert_eq!(node_type.as_str().parse::<NodeType>(), Ok(node_type));
            let json = serde_json::to_string(&node_type).unwrap();
            assert_eq!(json, format!("\"{}\"", node_type.as_str()));
        }
        assert!("idea".parse::<NodeType>().is_err());
    }

    #[test]
    fn test_relation_name_serde() {
        let json = serde_json::to_string(&RelationName::CriterionFor).unwrap();
        assert_eq!(json, "\"criterion for\"");
        assert_eq!(RelationName::RelatesTo.to_string(), "relates to");
    }
}
