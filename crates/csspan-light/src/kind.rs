//! Node kinds reported by the engine visitor

use std::fmt;

use serde::Serialize;

/// Visitor event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Angle,
    Color,
    CustomIdent,
    DashedIdent,
    Declaration,
    EnvironmentVariable,
    Function,
    Image,
    MediaQuery,
    Ratio,
    Resolution,
    Rule,
    Selector,
    SupportsCondition,
    Time,
    Token,
    Url,
    Variable,
}

impl NodeKind {
    pub const ALL: [NodeKind; 18] = [
        NodeKind::Angle,
        NodeKind::Color,
        NodeKind::CustomIdent,
        NodeKind::DashedIdent,
        NodeKind::Declaration,
        NodeKind::EnvironmentVariable,
        NodeKind::Function,
        NodeKind::Image,
        NodeKind::MediaQuery,
        NodeKind::Ratio,
        NodeKind::Resolution,
        NodeKind::Rule,
        NodeKind::Selector,
        NodeKind::SupportsCondition,
        NodeKind::Time,
        NodeKind::Token,
        NodeKind::Url,
        NodeKind::Variable,
    ];

    /// Kinds that arrive as enter/exit pairs and may own children
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeKind::Rule
                | NodeKind::Declaration
                | NodeKind::Function
                | NodeKind::MediaQuery
                | NodeKind::Variable
                | NodeKind::Image
                | NodeKind::EnvironmentVariable
                | NodeKind::SupportsCondition
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Angle => "Angle",
            NodeKind::Color => "Color",
            NodeKind::CustomIdent => "CustomIdent",
            NodeKind::DashedIdent => "DashedIdent",
            NodeKind::Declaration => "Declaration",
            NodeKind::EnvironmentVariable => "EnvironmentVariable",
            NodeKind::Function => "Function",
            NodeKind::Image => "Image",
            NodeKind::MediaQuery => "MediaQuery",
            NodeKind::Ratio => "Ratio",
            NodeKind::Resolution => "Resolution",
            NodeKind::Rule => "Rule",
            NodeKind::Selector => "Selector",
            NodeKind::SupportsCondition => "SupportsCondition",
            NodeKind::Time => "Time",
            NodeKind::Token => "Token",
            NodeKind::Url => "Url",
            NodeKind::Variable => "Variable",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
