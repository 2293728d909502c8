//! Foreign node display

use crate::{ForeignKind, ForeignNode};

/// One-line description, e.g. `Rule: .a` or `AtRule: @media screen`
pub fn print_foreign_node_with_details(node: &ForeignNode) -> String {
    match &node.kind {
        ForeignKind::Root => "Root".to_string(),
        ForeignKind::AtRule { name, params } if params.is_empty() => format!("AtRule: @{}", name),
        ForeignKind::AtRule { name, params } => format!("AtRule: @{} {}", name, params),
        ForeignKind::Rule { selector } => format!("Rule: {}", selector),
        ForeignKind::Decl { prop, important: true, .. } => format!("Declaration: {} !important", prop),
        ForeignKind::Decl { prop, .. } => format!("Declaration: {}", prop),
        ForeignKind::Comment { .. } => "Comment".to_string(),
    }
}
