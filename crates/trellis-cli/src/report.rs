//! Plain-text rendering of diagrams and criteria tables.

use std::io::{self, Write};

use trellis::topic::{CriteriaTable, Diagram, DiagramKind, Topic};

/// Write a diagram as one line per node and edge.
pub fn write_diagram(out: &mut impl Write, diagram: &Diagram) -> io::Result<()> {
    let kind = match diagram.kind() {
        DiagramKind::Problem => "problem",
        DiagramKind::Claim => "claim",
    };
    writeln!(out, "diagram {} ({kind})", diagram.id())?;

    for node in diagram.nodes() {
        let position = node.position();
        write!(
            out,
            "  node {} [{}] \"{}\" score {} at ({:.0}, {:.0})",
            node.id(),
            node.node_type(),
            node.label(),
            node.score(),
            position.x(),
            position.y(),
        )?;
        if node.is_hidden() {
            write!(out, " hidden")?;
        }
        writeln!(out)?;
    }

    for edge in diagram.edges() {
        write!(
            out,
            "  edge {}: {} -> {} {} score {}",
            edge.id(),
            edge.source(),
            edge.target(),
            edge.label(),
            edge.score(),
        )?;
        if edge.is_hidden() {
            write!(out, " hidden")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// List the claim diagrams of a topic.
pub fn write_claim_diagrams(out: &mut impl Write, topic: &Topic) -> io::Result<()> {
    for summary in topic.claim_diagrams() {
        writeln!(out, "claim {}: {}", summary.id, summary.label)?;
    }
    Ok(())
}

/// Write a criteria table with criteria as rows and solutions as columns.
///
/// Cells without an `embodies` edge print as `.`.
pub fn write_criteria(
    out: &mut impl Write,
    diagram: &Diagram,
    table: &CriteriaTable,
) -> io::Result<()> {
    let label = |id| {
        diagram
            .find_node(id)
            .map(|node| node.label().to_string())
            .unwrap_or_else(|_| id.to_string())
    };

    writeln!(out, "criteria for \"{}\"", label(table.problem))?;
    let header: Vec<String> = table.solutions.iter().map(|id| label(*id)).collect();
    writeln!(out, "  | {}", header.join(" | "))?;

    for (criterion, row) in table.criteria.iter().zip(&table.cells) {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Some(cell) => cell.score.to_string(),
                None => ".".to_string(),
            })
            .collect();
        writeln!(out, "  {} | {}", label(*criterion), cells.join(" | "))?;
    }
    Ok(())
}
