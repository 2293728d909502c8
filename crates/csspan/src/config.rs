//! Inspection Configuration

use csspan_light::TransformConfig;

/// Options for [`crate::Inspection::run`]
#[derive(Debug, Clone)]
pub struct Config {
    /// Engine transform options
    pub transform: TransformConfig,

    /// Also parse the PostCSS-shaped tree
    pub foreign: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transform: TransformConfig::default(),
            foreign: true,
        }
    }
}
