//! Transform Configuration

use lightningcss::stylesheet::ParserFlags;

/// Options for [`crate::transform`]
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// File name reported in parse errors
    pub filename: String,

    /// Parse `@custom-media` rules
    pub custom_media: bool,

    /// Skip invalid rules and declarations instead of failing
    pub error_recovery: bool,

    /// Minify the re-serialized output
    pub minify: bool,

    /// Locate declarations and function values by scanning the source
    pub scan_locations: bool,
}

impl TransformConfig {
    pub(crate) fn parser_flags(&self) -> ParserFlags {
        let mut flags = ParserFlags::empty();
        if self.custom_media {
            flags |= ParserFlags::CUSTOM_MEDIA;
        }
        flags
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            filename: "input.css".to_string(),
            custom_media: true,
            error_recovery: false,
            minify: false,
            scan_locations: true,
        }
    }
}
