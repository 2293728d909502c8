//! One stylesheet, both trees

use csspan_foreign::ForeignNode;
use csspan_light::{LightTree, TransformResult, transform};
use csspan_text::SourceText;

use crate::{Config, Error, Locator};

/// Engine and foreign trees built from the same CSS
#[derive(Debug, Clone)]
pub struct Inspection {
    light: TransformResult,
    foreign: Option<ForeignNode>,
}

impl Inspection {
    /// Transform `css` and, if enabled, parse its foreign tree
    pub fn run(css: &str, config: &Config) -> Result<Self, Error> {
        let light = transform(css, &config.transform)?;
        let foreign = if config.foreign {
            Some(csspan_foreign::parse(css)?)
        } else {
            None
        };

        tracing::info!(
            "Inspected {}: {} engine nodes, {} foreign nodes",
            config.transform.filename,
            light.tree.len(),
            foreign.as_ref().map_or(0, |root| root.walk().count().saturating_sub(1))
        );

        Ok(Self { light, foreign })
    }

    /// Replace both trees with those of `css`. On error the previous
    /// trees are kept.
    pub fn rerun(&mut self, css: &str, config: &Config) -> Result<(), Error> {
        *self = Self::run(css, config)?;
        Ok(())
    }

    pub fn light(&self) -> &TransformResult {
        &self.light
    }

    pub fn tree(&self) -> &LightTree {
        &self.light.tree
    }

    pub fn foreign(&self) -> Option<&ForeignNode> {
        self.foreign.as_ref()
    }

    /// Re-serialized stylesheet
    pub fn output(&self) -> &str {
        &self.light.css
    }

    pub fn source(&self) -> &SourceText {
        self.light.tree.source()
    }

    pub fn locator(&self) -> Result<Locator<'_>, Error> {
        Locator::new(&self.light, self.foreign.as_ref())
    }
}
