//! Node display helpers

use crate::{LightNode, NodeKind};

/// `Kind: label`, e.g. `Rule: style` or `Declaration: color`. Functions
/// also print their argument count, e.g. `Function: calc 5`.
pub fn print_node_with_details(node: &LightNode) -> String {
    match (node.kind, &node.data.detail) {
        (NodeKind::Function, Some(arguments)) => format!("{}: {} {}", node.kind, node.data.label, arguments),
        _ => format!("{}: {}", node.kind, node.data.label),
    }
}

/// Embedded start location, e.g. `(0:4)`, with `~` for scanned ones
pub fn print_node_location(node: &LightNode) -> Option<String> {
    let location = node.data.location?;
    let marker = match location.origin {
        crate::LocationOrigin::Engine => "",
        crate::LocationOrigin::Scanned => "~",
    };
    Some(format!("({}{})", marker, location.position))
}
