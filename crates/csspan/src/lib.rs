//! csspan
//!
//! Maps lightningcss AST nodes back to source ranges and lines them up
//! with a PostCSS-shaped tree of the same stylesheet.

mod config;
mod locator;
mod session;

pub use config::Config;
pub use locator::{Locator, NodeRef, Side, project_across};
pub use session::Inspection;

pub use csspan_foreign as foreign;
pub use csspan_index as index;
pub use csspan_light as light;
pub use csspan_text as text;

use csspan_foreign::ForeignError;
use csspan_light::LightError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Inspection error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Engine tree: {0}")]
    Light(#[from] LightError),

    #[error("Foreign tree: {0}")]
    Foreign(#[from] ForeignError),
}
