//! Identifiers for topic parts and diagrams.
//!
//! Node and edge ids are plain integers handed out by an [`IdAllocator`] that
//! is shared by every diagram of a topic, so an id is unique across the whole
//! topic, not just within one diagram.
//!
//! Claim diagrams are keyed by the [`Arguable`] they argue about. The key has
//! a stable text form (`node-3`, `edge-7`) that parses back losslessly; the
//! root diagram's text form is `root`.

use std::{fmt, str::FromStr};

use log::trace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a node, unique within a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw id value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an edge, unique within a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Wrap a raw id value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors produced when parsing identifiers from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIdError {
    #[error("`{0}` is not a claim diagram id")]
    NotAClaimDiagram(String),

    #[error("unknown arguable kind `{0}`")]
    UnknownKind(String),

    #[error("invalid numeric id in `{0}`")]
    InvalidNumber(String),
}

/// Whether an arguable is a node or an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArguableKind {
    Node,
    Edge,
}

impl ArguableKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Edge => "edge",
        }
    }
}

impl fmt::Display for ArguableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArguableKind {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "edge" => Ok(Self::Edge),
            other => Err(ParseIdError::UnknownKind(other.to_string())),
        }
    }
}

/// A part of a topic that can carry a score and be argued about.
///
/// This is the tagged (kind, id) pair that keys claim diagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Arguable {
    Node(NodeId),
    Edge(EdgeId),
}

impl Arguable {
    /// Build an arguable from its kind and raw id.
    pub fn new(kind: ArguableKind, raw: u64) -> Self {
        match kind {
            ArguableKind::Node => Self::Node(NodeId::new(raw)),
            ArguableKind::Edge => Self::Edge(EdgeId::new(raw)),
        }
    }

    /// The kind of part this arguable refers to.
    pub fn kind(self) -> ArguableKind {
        match self {
            Self::Node(_) => ArguableKind::Node,
            Self::Edge(_) => ArguableKind::Edge,
        }
    }

    /// The raw id value, regardless of kind.
    pub fn raw_id(self) -> u64 {
        match self {
            Self::Node(id) => id.get(),
            Self::Edge(id) => id.get(),
        }
    }

    /// The id of the claim diagram that argues about this arguable.
    ///
    /// Pure and deterministic; [`DiagramId::claim_key`] is its inverse.
    pub fn claim_diagram_id(self) -> DiagramId {
        DiagramId::Claim(self)
    }
}

impl fmt::Display for Arguable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind(), self.raw_id())
    }
}

impl From<NodeId> for Arguable {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<EdgeId> for Arguable {
    fn from(id: EdgeId) -> Self {
        Self::Edge(id)
    }
}

/// Identifier of a diagram within a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DiagramId {
    /// The topic's problem diagram.
    Root,
    /// The claim diagram arguing about an arguable.
    Claim(Arguable),
}

impl DiagramId {
    const ROOT: &'static str = "root";

    /// Parse the text form of a claim diagram id back into its arguable.
    ///
    /// # Errors
    ///
    /// Returns [`ParseIdError::NotAClaimDiagram`] for `root` or any text that
    /// is not of the form `<kind>-<id>`.
    pub fn parse_claim(s: &str) -> Result<Arguable, ParseIdError> {
        let (kind, raw) = s
            .split_once('-')
            .ok_or_else(|| ParseIdError::NotAClaimDiagram(s.to_string()))?;
        let kind: ArguableKind = kind.parse()?;
        let raw: u64 = raw
            .parse()
            .map_err(|_| ParseIdError::InvalidNumber(s.to_string()))?;
        Ok(Arguable::new(kind, raw))
    }

    /// The arguable this diagram argues about, or `None` for the root diagram.
    pub fn claim_key(self) -> Option<Arguable> {
        match self {
            Self::Root => None,
            Self::Claim(arguable) => Some(arguable),
        }
    }

    /// Check whether this is the root diagram id.
    pub fn is_root(self) -> bool {
        matches!(self, Self::Root)
    }
}

impl fmt::Display for DiagramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str(Self::ROOT),
            Self::Claim(arguable) => write!(f, "{arguable}"),
        }
    }
}

impl FromStr for DiagramId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::ROOT {
            return Ok(Self::Root);
        }
        Self::parse_claim(s).map(Self::Claim)
    }
}

impl From<DiagramId> for String {
    fn from(id: DiagramId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for DiagramId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Monotonic counters producing topic-wide unique node and edge ids.
///
/// The counters are part of the topic snapshot; an id is never handed out
/// twice for the lifetime of a topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdAllocator {
    next_node_id: u64,
    next_edge_id: u64,
}

impl IdAllocator {
    /// Create an allocator that resumes from the given counters.
    pub fn new(next_node_id: u64, next_edge_id: u64) -> Self {
        Self {
            next_node_id,
            next_edge_id,
        }
    }

    /// Allocate the next node id.
    pub fn next_node_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        trace!(node:% = id; "Node id allocated");
        id
    }

    /// Allocate the next edge id.
    pub fn next_edge_id(&mut self) -> EdgeId {
        let id = EdgeId::new(self.next_edge_id);
        self.next_edge_id += 1;
        trace!(edge:% = id; "Edge id allocated");
        id
    }

    /// The value the next node id will take.
    pub fn peek_node_id(&self) -> u64 {
        self.next_node_id
    }

    /// The value the next edge id will take.
    pub fn peek_edge_id(&self) -> u64 {
        self.next_edge_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_monotonic() {
        let mut ids = IdAllocator::default();

        assert_eq!(ids.next_node_id(), NodeId::new(0));
        assert_eq!(ids.next_node_id(), NodeId::new(1));
        assert_eq!(ids.next_edge_id(), EdgeId::new(0));
        assert_eq!(ids.peek_node_id(), 2);
        assert_eq!(ids.peek_edge_id(), 1);
    }

    #[test]
    fn test_allocator_resumes() {
        let mut ids = IdAllocator::new(10, 4);
        assert_eq!(ids.next_node_id(), NodeId::new(10));
        assert_eq!(ids.next_edge_id(), EdgeId::new(4));
    }

    #[test]
    fn test_claim_diagram_id_text_form() {
        let node = Arguable::Node(NodeId::new(3));
        let edge = Arguable::Edge(EdgeId::new(7));

        assert_eq!(node.claim_diagram_id().to_string(), "node-3");
        assert_eq!(edge.claim_diagram_id().to_string(), "edge-7");
        assert_eq!(DiagramId::Root.to_string(), "root");
    }

    #[test]
    fn test_parse_claim_rejects_non_claim_ids() {
        assert_eq!(
            DiagramId::parse_claim("root"),
            Err(ParseIdError::NotAClaimDiagram("root".to_string()))
        );
        assert_eq!(
            DiagramId::parse_claim("widget-1"),
            Err(ParseIdError::UnknownKind("widget".to_string()))
        );
        assert_eq!(
            DiagramId::parse_claim("node-x"),
            Err(ParseIdError::InvalidNumber("node-x".to_string()))
        );
        assert_eq!(DiagramId::Root.claim_key(), None);
    }

    #[test]
    fn test_diagram_id_json_form() {
        let json = serde_json::to_string(&DiagramId::Claim(Arguable::Node(NodeId::new(2)))).unwrap();
        assert_eq!(json, "\"node-2\"");

        let back: DiagramId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DiagramId::Claim(Arguable::Node(NodeId::new(2))));
        assert!(serde_json::from_str::<DiagramId>("\"nope\"").is_err());
    }

    #[test]
    fn test_arguable_accessors() {
        let arguable = Arguable::new(ArguableKind::Edge, 9);
        assert_eq!(arguable.kind(), ArguableKind::Edge);
        assert_eq!(arguable.raw_id(), 9);
        assert_eq!(Arguable::from(NodeId::new(1)).kind(), ArguableKind::Node);
    }
}
