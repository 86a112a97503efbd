use std::collections::HashSet;

use crate::document::{EmailDocument, NodeId, NodeKind, ROOT_ID};
use crate::error::{EmailError, EmailResult};

/// Strict structural checks for callers that want more than the compiler's
/// degrade-to-empty behaviour. The compiler itself never calls this.
pub fn validate_document(doc: &EmailDocument) -> EmailResult<()> {
    validate_reserved_id(doc)?;
    validate_id_uniqueness(doc)?;
    validate_alignment(doc)?;
    validate_cell_counts(doc)
}

/// Every node below the root, with its level, in stored order
fn descendants(doc: &EmailDocument) -> Vec<(NodeKind, NodeId)> {
    let mut nodes = Vec::new();
    for block in &doc.blocks {
        nodes.push((NodeKind::Block, block.id));
        for cell in &block.cells {
            nodes.push((NodeKind::Cell, cell.id));
            for widget in &cell.widgets {
                nodes.push((NodeKind::Widget, widget.id));
            }
        }
    }
    nodes
}

fn validate_reserved_id(doc: &EmailDocument) -> EmailResult<()> {
    match descendants(doc).into_iter().find(|(_, id)| *id == ROOT_ID) {
        Some((kind, _)) => Err(EmailError::ReservedId {
            kind: kind.to_string(),
        }),
        None => Ok(()),
    }
}

fn validate_id_uniqueness(doc: &EmailDocument) -> EmailResult<()> {
    let mut seen = HashSet::new();
    if doc.id != ROOT_ID {
        seen.insert(doc.id);
    }
    for (_, id) in descendants(doc) {
        if !seen.insert(id) {
            return Err(EmailError::DuplicateId { id });
        }
    }
    Ok(())
}

fn validate_alignment(doc: &EmailDocument) -> EmailResult<()> {
    for cell in doc.blocks.iter().flat_map(|b| &b.cells) {
        if let Some(Err(value)) = cell.h_align() {
            return Err(EmailError::InvalidAlignment {
                cell: cell.id,
                property: "hAlign".to_string(),
                value: value.to_string(),
            });
        }
        if let Some(Err(value)) = cell.v_align() {
            return Err(EmailError::InvalidAlignment {
                cell: cell.id,
                property: "vAlign".to_string(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_cell_counts(doc: &EmailDocument) -> EmailResult<()> {
    for block in &doc.blocks {
        let Some(format) = block.format else {
            continue;
        };
        if let Some(expected) = format.columns() {
            if block.cells.len() != expected {
                return Err(EmailError::CellCountMismatch {
                    block: block.id,
                    format: format.as_str().to_string(),
                    expected,
                    found: block.cells.len(),
                });
            }
        }
    }
    Ok(())
}
