//! Trellis CLI library
//!
//! This module contains the core CLI logic for editing Trellis topic files.
//! Each invocation loads the topic, applies one command and saves it again.

pub mod error_adapter;

mod args;
mod config;
mod report;

pub use args::{Args, Command};
pub use error_adapter::ErrorAdapter;

use std::io::{self, Write};

use log::{debug, info};

use trellis::{
    Session, TrellisError,
    config::AppConfig,
    identifier::{EdgeId, NodeId},
    persistence::JsonFileStore,
    schema::{EdgeRejection, EditMode, NodeType, RelationDirection},
};

/// Run the Trellis CLI application, writing reports to stdout.
///
/// # Errors
///
/// Returns `TrellisError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid or missing topic snapshots
/// - Edits the topic rejects
pub fn run(args: &Args) -> Result<(), TrellisError> {
    let stdout = io::stdout();
    execute(args, &mut stdout.lock())
}

/// Run one command against the topic file, writing reports to `out`.
///
/// The topic file is only rewritten when the command changed the topic and
/// the session is writable.
///
/// # Errors
///
/// See [`run`].
pub fn execute(args: &Args, out: &mut impl Write) -> Result<(), TrellisError> {
    info!(topic = args.topic, command:? = args.command; "Processing topic");

    let app_config = config::load_config(args.config.as_ref())?;
    let store = JsonFileStore::new(&args.topic);

    if let Command::Init { force } = args.command {
        return init(&store, &app_config, force, out);
    }

    if !store.exists() {
        return Err(TrellisError::not_found(format!(
            "topic file {}; run `trellis init` first",
            args.topic
        )));
    }

    let mut session = Session::load(&store, &app_config)?;
    if args.unrestricted {
        session.set_mode(EditMode::Unrestricted);
    }
    if args.readonly {
        session.set_read_only(true);
    }

    let changed = apply(&mut session, &args.command, out)?;
    if changed && session.is_read_only() {
        debug!("Read-only session, topic file left as is");
    } else if changed {
        session.save(&store)?;
        info!(topic = args.topic; "Topic updated");
    } else {
        debug!("Topic unchanged");
    }
    Ok(())
}

fn init(
    store: &JsonFileStore,
    config: &AppConfig,
    force: bool,
    out: &mut impl Write,
) -> Result<(), TrellisError> {
    if store.exists() && !force {
        return Err(TrellisError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "{} already exists; pass --force to replace it",
                store.path().display()
            ),
        )));
    }

    let mut session = Session::new(config);
    session.mutator().reset_topic()?;
    session.save(store)?;
    report::write_diagram(out, session.topic().active_diagram()?)?;
    Ok(())
}

/// Apply a command to the session. Returns whether the topic changed.
fn apply(
    session: &mut Session,
    command: &Command,
    out: &mut impl Write,
) -> Result<bool, TrellisError> {
    match command {
        Command::Init { .. } => Ok(false),
        Command::Show => {
            report::write_diagram(out, session.topic().active_diagram()?)?;
            report::write_claim_diagrams(out, session.topic())?;
            Ok(false)
        }
        Command::AddNode {
            from,
            node_type,
            parent,
            label,
        } => {
            let from = NodeId::new(*from);
            let direction = if *parent {
                RelationDirection::Parent
            } else {
                RelationDirection::Child
            };
            let node_id = add_node(session, from, direction, *node_type)?;
            if let Some(label) = label {
                session.mutator().set_node_label(node_id, label)?;
            }
            writeln!(out, "added node {node_id}")?;
            Ok(true)
        }
        Command::Connect { parent, child } => {
            let connected = session
                .mutator()
                .connect_nodes(NodeId::new(*parent), NodeId::new(*child))?;
            match connected {
                Some(edge_id) => writeln!(out, "added edge {edge_id}")?,
                None => writeln!(out, "nodes {parent} and {child} cannot be connected")?,
            }
            Ok(connected.is_some())
        }
        Command::Reconnect {
            edge,
            parent,
            child,
        } => {
            let moved = session.mutator().reconnect_edge(
                EdgeId::new(*edge),
                NodeId::new(*parent),
                NodeId::new(*child),
            )?;
            if moved {
                writeln!(out, "edge {edge} now joins {parent} -> {child}")?;
            } else {
                writeln!(out, "edge {edge} cannot join {parent} -> {child}")?;
            }
            Ok(moved)
        }
        Command::Label { node, text } => {
            session.mutator().set_node_label(NodeId::new(*node), text)?;
            Ok(true)
        }
        Command::ToggleCriteria { problem } => {
            let shown = session
                .mutator()
                .toggle_show_criteria(NodeId::new(*problem))?;
            let state = if shown { "shown" } else { "hidden" };
            writeln!(out, "criteria of problem {problem} {state}")?;
            Ok(true)
        }
        Command::Score { part, score } => {
            session.set_score(*part, *score)?;
            writeln!(out, "{part} scored {score}")?;
            Ok(true)
        }
        Command::Claim { part } => {
            let diagram_id = session.mutator().set_or_create_active_diagram(*part)?;
            report::write_diagram(out, session.topic().diagram(diagram_id)?)?;
            Ok(true)
        }
        Command::Activate { diagram } => {
            session.mutator().set_active_diagram(*diagram)?;
            report::write_diagram(out, session.topic().active_diagram()?)?;
            Ok(true)
        }
        Command::Criteria { problem } => {
            let diagram = session.topic().active_diagram()?;
            let table = diagram.criteria_table(NodeId::new(*problem))?;
            report::write_criteria(out, diagram, &table)?;
            Ok(false)
        }
    }
}

/// Add a node using the relation the schema offers for the pair.
fn add_node(
    session: &mut Session,
    from: NodeId,
    direction: RelationDirection,
    node_type: NodeType,
) -> Result<NodeId, TrellisError> {
    let relation = session
        .addable_relations(from, direction)?
        .into_iter()
        .find(|option| option.to_node_type == node_type)
        .map(|option| option.relation.name);

    let Some(relation) = relation else {
        let from_type = session.topic().active_diagram()?.find_node(from)?.node_type();
        let (parent, child) = match direction {
            RelationDirection::Parent => (node_type, from_type),
            RelationDirection::Child => (from_type, node_type),
        };
        return Err(EdgeRejection::Unlicensed { parent, child }.into());
    };

    session
        .mutator()
        .add_node(from, direction, node_type, relation)
}
