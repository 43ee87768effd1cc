//! Importer Settings
//!
//! Configuration for a [`ProjectImporter`](crate::import::ProjectImporter).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use project_importer::settings::ImportSettings;
//!
//! // Defaults match the editor's own export conventions
//! let settings = ImportSettings::default();
//!
//! // Serve assets from a different location and ignore physics
//! let settings = ImportSettings {
//!     root_url: "assets/".into(),
//!     enable_physics: false,
//!     ..Default::default()
//! };
//! ```
//!
//! Settings can also be read from JSON; missing keys fall back to their
//! defaults.

use serde::Deserialize;

/// Name the editor gives the implicit scene root in node descriptors.
pub const DEFAULT_ROOT_NODE_NAME: &str = "Scene";

/// Prefix the legacy inline-texture format put in front of texture names.
pub const DEFAULT_LEGACY_TEXTURE_PREFIX: &str = "data:";

/// Importer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportSettings {
    /// Prefix joined in front of relative texture and sound urls.
    pub root_url: String,

    /// Descriptor name that binds the implicit scene root instead of a node.
    pub root_node_name: String,

    /// Prefix stripped from the names of legacy base64 particle textures.
    pub legacy_texture_prefix: String,

    /// When `false`, physics descriptors are ignored and the scene's physics
    /// flag is left untouched.
    pub enable_physics: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            root_url: String::new(),
            root_node_name: DEFAULT_ROOT_NODE_NAME.to_string(),
            legacy_texture_prefix: DEFAULT_LEGACY_TEXTURE_PREFIX.to_string(),
            enable_physics: true,
        }
    }
}

impl ImportSettings {
    /// Parses settings from a JSON string; absent keys keep their defaults.
    pub fn from_json_str(json: &str) -> crate::errors::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves a url found in a payload against [`root_url`](Self::root_url).
    ///
    /// Absolute urls (with a scheme) and data URIs are returned unchanged.
    #[must_use]
    pub fn resolve_url(&self, url: &str) -> String {
        if self.root_url.is_empty() || url.contains("://") || url.starts_with("data:") {
            url.to_string()
        } else {
            format!("{}{}", self.root_url, url)
        }
    }
}
