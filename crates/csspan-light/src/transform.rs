//! Transform entry point
//!
//! Parses CSS with lightningcss, walks it with [`EngineVisitor`] to build
//! the range-annotated tree, then re-serializes the stylesheet.

use lightningcss::error::{Error, ParserError};
use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::visitor::Visit;

use csspan_index::RangeStore;
use csspan_text::SourceText;

use crate::engine::EngineVisitor;
use crate::{LightError, LightTree, NodeId, TransformConfig, TreeBuilder};

/// Output of [`transform`]
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Tree with every node resolved
    pub tree: LightTree,
    /// Byte ranges of the tree's nodes
    pub store: RangeStore<NodeId>,
    /// Re-serialized stylesheet
    pub css: String,
}

/// Parse `css` and build its range-annotated tree
pub fn transform(css: &str, config: &TransformConfig) -> Result<TransformResult, LightError> {
    tracing::debug!("Transforming {} ({} bytes)", config.filename, css.len());

    let options = ParserOptions {
        filename: config.filename.clone(),
        flags: config.parser_flags(),
        error_recovery: config.error_recovery,
        ..ParserOptions::default()
    };
    let mut stylesheet = StyleSheet::parse(css, options).map_err(parse_error)?;

    let mut builder = TreeBuilder::new(SourceText::new(css));
    stylesheet.visit(&mut EngineVisitor::new(&mut builder, config.scan_locations))?;

    let printed = stylesheet
        .to_css(PrinterOptions {
            minify: config.minify,
            ..PrinterOptions::default()
        })
        .map_err(|e| LightError::Print(e.to_string()))?;

    let tree = builder.finish()?;
    let store = tree.build_store()?;
    tracing::debug!(
        "Transformed {}: {} nodes, {} bytes out",
        config.filename,
        tree.len(),
        printed.code.len()
    );

    Ok(TransformResult {
        tree,
        store,
        css: printed.code,
    })
}

fn parse_error(error: Error<ParserError<'_>>) -> LightError {
    let (line, column) = error.loc.as_ref().map_or((0, 0), |loc| (loc.line, loc.column));
    LightError::Parse {
        message: error.kind.to_string(),
        line,
        column,
    }
}
