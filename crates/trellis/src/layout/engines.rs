//! Layout engine selection.
//!
//! Engines implement [`LayoutEngine`]. [`EngineBuilder`] creates the engine
//! named by a [`LayoutEngineKind`] with the configured spacing. Closures with
//! the right signature are engines too, which keeps tests and embedders free
//! of boilerplate.

mod basic;
mod sugiyama;

use std::{fmt, str::FromStr};

use log::trace;
use serde::{Deserialize, Serialize};

use trellis_core::geometry::Orientation;

use crate::{
    config::LayoutConfig,
    error::TrellisError,
    layout::{Layout, LayoutGraph},
};

/// Available layout algorithms.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutEngineKind {
    /// Longest-path layering with in-layer centering.
    #[default]
    Basic,
    /// Sugiyama layered drawing via `rust-sugiyama`.
    Sugiyama,
}

impl fmt::Display for LayoutEngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Sugiyama => write!(f, "sugiyama"),
        }
    }
}

impl FromStr for LayoutEngineKind {
    type Err = TrellisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "sugiyama" => Ok(Self::Sugiyama),
            other => Err(TrellisError::Config(format!("unknown layout engine `{other}`"))),
        }
    }
}

/// Computes positions for the nodes and routes for the edges of a graph.
pub trait LayoutEngine {
    /// Lay out `graph` with layers advancing along `orientation`.
    ///
    /// The result must position every node and route every edge of `graph`,
    /// and nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Layout`] if positions cannot be computed.
    fn layout(&self, graph: &LayoutGraph, orientation: Orientation)
    -> Result<Layout, TrellisError>;
}

impl<F> LayoutEngine for F
where
    F: Fn(&LayoutGraph, Orientation) -> Result<Layout, TrellisError>,
{
    fn layout(
        &self,
        graph: &LayoutGraph,
        orientation: Orientation,
    ) -> Result<Layout, TrellisError> {
        self(graph, orientation)
    }
}

/// Builder for configured layout engines.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    horizontal_spacing: f32,
    vertical_spacing: f32,
}

impl EngineBuilder {
    /// Create a builder with the default spacing.
    pub fn new() -> Self {
        Self::from_config(&LayoutConfig::default())
    }

    /// Create a builder with the spacing of a [`LayoutConfig`].
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            horizontal_spacing: config.horizontal_spacing(),
            vertical_spacing: config.vertical_spacing(),
        }
    }

    /// Set the distance between neighbouring nodes within a layer
    pub fn with_horizontal_spacing(mut self, spacing: f32) -> Self {
        self.horizontal_spacing = spacing;
        self
    }

    /// Set the distance between consecutive layers
    pub fn with_vertical_spacing(mut self, spacing: f32) -> Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Build the engine of the given kind.
    pub fn build(&self, kind: LayoutEngineKind) -> Box<dyn LayoutEngine> {
        trace!(
            kind:%,
            horizontal_spacing = self.horizontal_spacing,
            vertical_spacing = self.vertical_spacing;
            "Building layout engine"
        );
        match kind {
            LayoutEngineKind::Basic => {
                let mut engine = basic::Engine::new();
                engine.set_horizontal_spacing(self.horizontal_spacing);
                engine.set_vertical_spacing(self.vertical_spacing);
                Box::new(engine)
            }
            LayoutEngineKind::Sugiyama => {
                let mut engine = sugiyama::Engine::new();
                engine.set_horizontal_spacing(self.horizontal_spacing);
                engine.set_vertical_spacing(self.vertical_spacing);
                Box::new(engine)
            }
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
