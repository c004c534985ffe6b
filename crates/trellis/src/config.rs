//! Configuration types for Trellis sessions.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out and how edits are validated. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and editing settings.
//! - [`LayoutConfig`] - Selects the [`LayoutEngineKind`] and its spacing.
//! - [`EditingConfig`] - Selects the [`EditMode`] new sessions start in.
//!
//! # Example
//!
//! ```
//! # use trellis::config::AppConfig;
//! # use trellis_core::schema::EditMode;
//! let config = AppConfig::default();
//! assert_eq!(config.editing().mode(), EditMode::Restricted);
//! ```

use serde::Deserialize;

use trellis_core::schema::EditMode;

pub use crate::layout::LayoutEngineKind;

/// Top-level configuration combining layout and editing settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Editing configuration section.
    #[serde(default)]
    editing: EditingConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and editing configurations.
    ///
    /// # Arguments
    ///
    /// * `layout` - Layout engine settings.
    /// * `editing` - Edit validation settings.
    pub fn new(layout: LayoutConfig, editing: EditingConfig) -> Self {
        Self { layout, editing }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the editing configuration.
    pub fn editing(&self) -> &EditingConfig {
        &self.editing
    }
}

/// Layout engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Engine used to position visible nodes.
    engine: LayoutEngineKind,

    /// Distance between neighbouring nodes within a layer.
    horizontal_spacing: f32,

    /// Distance between consecutive layers.
    vertical_spacing: f32,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    pub fn new(engine: LayoutEngineKind, horizontal_spacing: f32, vertical_spacing: f32) -> Self {
        Self {
            engine,
            horizontal_spacing,
            vertical_spacing,
        }
    }

    /// Returns the configured [`LayoutEngineKind`].
    pub fn engine(&self) -> LayoutEngineKind {
        self.engine
    }

    /// Returns the spacing between nodes within a layer.
    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    /// Returns the spacing between layers.
    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            engine: LayoutEngineKind::default(),
            horizontal_spacing: 200.0,
            vertical_spacing: 120.0,
        }
    }
}

/// Edit validation configuration.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct EditingConfig {
    /// Start sessions with schema validation disabled.
    #[serde(default)]
    unrestricted: bool,

    /// Start sessions that refuse every change to topic data.
    #[serde(default)]
    readonly: bool,
}

impl EditingConfig {
    /// Creates a new [`EditingConfig`].
    pub fn new(unrestricted: bool) -> Self {
        Self {
            unrestricted,
            readonly: false,
        }
    }

    /// Sets whether sessions start read-only.
    pub fn with_read_only(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// Returns whether sessions start read-only.
    pub fn read_only(&self) -> bool {
        self.readonly
    }

    /// Returns the [`EditMode`] sessions start in.
    pub fn mode(&self) -> EditMode {
        if self.unrestricted {
            EditMode::Unrestricted
        } else {
            EditMode::Restricted
        }
    }
}
