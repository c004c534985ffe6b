//! Score writes that keep mirrored scores in step.
//!
//! A part of the root diagram and the root claim of its claim diagram carry
//! the same score. Writing either one writes both.

use log::{debug, info};

use trellis_core::{
    identifier::{Arguable, DiagramId},
    score::Score,
};

use crate::{error::TrellisError, topic::Topic};

/// Writes scores and propagates them to their mirror.
pub struct ScoreSynchronizer<'a> {
    topic: &'a mut Topic,
    read_only: bool,
}

impl<'a> ScoreSynchronizer<'a> {
    pub fn new(topic: &'a mut Topic) -> Self {
        Self {
            topic,
            read_only: false,
        }
    }

    /// Refuse score writes while `read_only` is set.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Score a node or edge of the active diagram.
    ///
    /// Scoring a root claim also scores the part its claim diagram argues
    /// about; scoring a part that has a claim diagram also scores that
    /// diagram's root claim. Every target is resolved before anything is
    /// written, so a failed call changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::NotFound`] if the arguable or its mirror is
    /// missing, [`TrellisError::InvariantViolation`] if a claim diagram has
    /// no root claim, or [`TrellisError::ReadOnly`] on a read-only topic.
    pub fn set_score(&mut self, arguable: Arguable, score: Score) -> Result<(), TrellisError> {
        if self.read_only {
            return Err(TrellisError::read_only("set_score"));
        }
        let writes = self.targets(arguable)?;

        for &(diagram_id, target) in &writes {
            self.topic
                .diagram_mut(diagram_id)?
                .set_scorable_score(target, score)?;
        }

        let mirrored = writes.len() > 1;
        info!(arguable:%, score:%, mirrored; "Score set");
        Ok(())
    }

    /// Every `(diagram, part)` a score write on `arguable` must reach.
    fn targets(&self, arguable: Arguable) -> Result<Vec<(DiagramId, Arguable)>, TrellisError> {
        let active_id = self.topic.active_diagram_id();
        let active = self.topic.active_diagram()?;
        let scorable = active.find_scorable(arguable)?;

        let mut writes = vec![(active_id, arguable)];

        if scorable.is_root_claim() {
            let mirrored = active_id.claim_key().ok_or_else(|| {
                TrellisError::invariant(format!("root claim {arguable} outside a claim diagram"))
            })?;
            self.topic.root_diagram()?.find_scorable(mirrored)?;
            writes.push((DiagramId::Root, mirrored));
        }

        let claim_id = arguable.claim_diagram_id();
        if self.topic.has_diagram(claim_id) {
            let root_claim = self.topic.diagram(claim_id)?.root_claim().ok_or_else(|| {
                TrellisError::invariant(format!("claim diagram {claim_id} has no root claim"))
            })?;
            writes.push((claim_id, Arguable::Node(root_claim.id())));
        }

        debug!(arguable:%, targets = writes.len(); "Score targets resolved");
        Ok(writes)
    }
}
