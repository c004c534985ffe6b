//! Command-line argument definitions for the Trellis CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Every invocation names a topic file, applies one
//! [`Command`] to it and saves the result.

use clap::{Parser, Subcommand};

use trellis::{
    identifier::{Arguable, DiagramId, ParseIdError},
    schema::NodeType,
    score::Score,
};

/// Command-line arguments for the Trellis topic editor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the topic JSON file
    #[arg(short, long, global = true, default_value = "topic.json")]
    pub topic: String,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Allow relations the schema does not license
    #[arg(long, global = true)]
    pub unrestricted: bool,

    /// Open the topic read-only; edits fail and the file is never rewritten
    #[arg(long, global = true)]
    pub readonly: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// The operation applied to the topic.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a topic holding a single problem
    Init {
        /// Replace an existing topic file
        #[arg(long)]
        force: bool,
    },

    /// Print the active diagram
    Show,

    /// Add a node next to an existing node of the active diagram
    AddNode {
        /// Id of the existing node
        from: u64,

        /// Type of the new node (problem, solution, criterion, ...)
        node_type: NodeType,

        /// Add the new node as the parent instead of the child
        #[arg(long)]
        parent: bool,

        /// Label for the new node
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Connect two nodes of the active diagram
    Connect { parent: u64, child: u64 },

    /// Move an edge onto a new pair of nodes
    Reconnect { edge: u64, parent: u64, child: u64 },

    /// Set the label of a node
    Label { node: u64, text: String },

    /// Show or hide the criteria of a problem
    ToggleCriteria { problem: u64 },

    /// Score a node or edge of the active diagram, e.g. `node-3 7` or `edge-0 -`
    Score {
        #[arg(value_parser = parse_arguable)]
        part: Arguable,
        score: Score,
    },

    /// Open the claim diagram arguing about a node or edge, creating it if needed
    Claim {
        #[arg(value_parser = parse_arguable)]
        part: Arguable,
    },

    /// Switch to an existing diagram (`root`, `node-3`, `edge-0`)
    Activate { diagram: DiagramId },

    /// Print the criteria table of a problem
    Criteria { problem: u64 },
}

fn parse_arguable(s: &str) -> Result<Arguable, ParseIdError> {
    DiagramId::parse_claim(s)
}
