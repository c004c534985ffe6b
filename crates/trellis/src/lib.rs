//! Trellis - a topic graph and argumentation engine
//!
//! This library holds the model behind structured problem-solving maps:
//! typed graphs of problems, solutions and criteria, plus claim diagrams that
//! argue for the score given to any node or edge. It validates structural
//! edits against a relation schema, keeps mirrored scores consistent and
//! relayouts diagrams after every structural change.

pub mod config;
pub mod layout;
pub mod persistence;
pub mod topic;

mod error;
mod mutator;
mod scoring;
mod structure;

pub use trellis_core::{geometry, identifier, schema, score};

pub use error::TrellisError;
pub use mutator::{DiagramMutator, SelectionChange};
pub use scoring::ScoreSynchronizer;
pub use structure::EdgeValidation;

use log::{debug, info};

use config::AppConfig;
use identifier::{Arguable, NodeId};
use layout::{EngineBuilder, LayoutEngine};
use persistence::TopicStore;
use schema::{AddableRelation, EditMode, RelationDirection, TypeSchema};
use score::Score;
use topic::Topic;

/// An editing session over one topic.
///
/// Bundles the topic with the schema, edit mode and layout engine every edit
/// needs.
///
/// # Examples
///
/// ```rust
/// use trellis::{
///     Session,
///     config::AppConfig,
///     identifier::{Arguable, NodeId},
///     schema::{NodeType, RelationDirection, RelationName},
///     score::Score,
/// };
///
/// let mut session = Session::new(&AppConfig::default());
/// let problem = NodeId::new(0);
///
/// let solution = session.mutator().add_node(
///     problem,
///     RelationDirection::Child,
///     NodeType::Solution,
///     RelationName::Solves,
/// )?;
/// session.set_score(Arguable::Node(solution), Score::new(7).unwrap_or_default())?;
///
/// let root = session.topic().root_diagram()?;
/// assert_eq!(root.nodes().len(), 2);
/// # Ok::<(), trellis::TrellisError>(())
/// ```
pub struct Session {
    topic: Topic,
    schema: TypeSchema,
    mode: EditMode,
    read_only: bool,
    engine: Box<dyn LayoutEngine>,
}

impl Session {
    /// Start a session on a fresh topic.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_parts(Topic::new(), config)
    }

    /// Start a session on an existing topic after validating it.
    ///
    /// # Errors
    ///
    /// Returns the first invariant the topic violates.
    pub fn from_topic(topic: Topic, config: &AppConfig) -> Result<Self, TrellisError> {
        topic.validate()?;
        Ok(Self::with_parts(topic, config))
    }

    /// Start a session on the topic held by `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be loaded or is invalid. No
    /// session exists in that case.
    pub fn load(store: &dyn TopicStore, config: &AppConfig) -> Result<Self, TrellisError> {
        let topic = store.load()?;
        Self::from_topic(topic, config)
    }

    fn with_parts(topic: Topic, config: &AppConfig) -> Self {
        let engine = EngineBuilder::from_config(config.layout()).build(config.layout().engine());
        let mode = config.editing().mode();
        let read_only = config.editing().read_only();
        info!(engine:% = config.layout().engine(), mode:?, read_only; "Session started");
        Self {
            topic,
            schema: TypeSchema::default(),
            mode,
            read_only,
            engine,
        }
    }

    /// Replace the layout engine.
    pub fn with_engine(mut self, engine: Box<dyn LayoutEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Replace the relation schema.
    pub fn with_schema(mut self, schema: TypeSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Save the topic to `store`.
    pub fn save(&self, store: &dyn TopicStore) -> Result<(), TrellisError> {
        store.save(&self.topic)
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn into_topic(self) -> Topic {
        self.topic
    }

    pub fn schema(&self) -> &TypeSchema {
        &self.schema
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Switch between restricted and unrestricted editing.
    pub fn set_mode(&mut self, mode: EditMode) {
        debug!(mode:?; "Edit mode changed");
        self.mode = mode;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Open or close the topic for writes. A read-only session still
    /// navigates between existing diagrams and selects parts.
    pub fn set_read_only(&mut self, read_only: bool) {
        debug!(read_only; "Read-only changed");
        self.read_only = read_only;
    }

    /// Structural edits of the topic.
    pub fn mutator(&mut self) -> DiagramMutator<'_> {
        DiagramMutator::new(&mut self.topic, &self.schema, self.mode, &*self.engine)
            .with_read_only(self.read_only)
    }

    /// Score writes on the topic.
    pub fn scores(&mut self) -> ScoreSynchronizer<'_> {
        ScoreSynchronizer::new(&mut self.topic).with_read_only(self.read_only)
    }

    /// Shorthand for [`ScoreSynchronizer::set_score`].
    pub fn set_score(&mut self, arguable: Arguable, score: Score) -> Result<(), TrellisError> {
        self.scores().set_score(arguable, score)
    }

    /// The ways a node of the active diagram can be extended in `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if the node is not in the active diagram.
    pub fn addable_relations(
        &self,
        node_id: NodeId,
        direction: RelationDirection,
    ) -> Result<Vec<AddableRelation>, TrellisError> {
        let node_type = self.topic.active_diagram()?.find_node(node_id)?.node_type();
        Ok(self
            .schema
            .addable_relations_from(node_type, direction, self.mode))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}
