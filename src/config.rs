//! Render settings loaded from JSON.
//!
//! Every section is optional; anything left out takes its default, so
//! `{}` is a valid configuration describing A4 pages with 20mm margins and
//! no decorations.
//!
//! ```
//! use docflow::{Mm, RenderConfig};
//!
//! let config = RenderConfig::from_json(r#"{
//!     "geometry": { "margins": { "top": 25, "right": 15, "bottom": 25, "left": 15 } },
//!     "flow": { "carry_last_line_with_title": true },
//!     "decorations": { "watermark_opacity": 0.1 }
//! }"#).unwrap();
//! assert_eq!(config.geometry.width, Mm(210.0));
//! assert_eq!(config.geometry.margins.left, Mm(15.0));
//! assert!(config.flow.carry_last_line_with_title);
//! ```

use crate::decorate::{DecorationOptions, DecorationSources};
use crate::drivers::Typography;
use crate::flow::FlowOptions;
use crate::geometry::PageGeometry;
use crate::LayoutError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub geometry: PageGeometry,
    pub flow: FlowOptions,
    pub decorations: DecorationOptions,
    /// Where the header, footer and watermark images live
    pub assets: DecorationSources,
    pub typography: Typography,
    pub preview_watermark: bool,
}

impl RenderConfig {
    /// Parse a configuration, rejecting geometry that leaves no content area
    pub fn from_json(json: &str) -> Result<RenderConfig, LayoutError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.geometry.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RenderConfig, LayoutError> {
        let json = std::fs::read_to_string(path)?;
        RenderConfig::from_json(&json)
    }
}
