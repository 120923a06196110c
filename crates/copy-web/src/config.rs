//! Copy-button behaviour knobs and the demo site's TOML config.
//!
//! `CopyConfig` is shared by both sides: the server serialises it into the
//! page root, the wasm client reads it back before binding buttons.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BUTTON_CLASS: &str = "copy-btn";
pub const DEFAULT_SOURCE_TAG: &str = "PRE";
pub const DEFAULT_SUCCESS_CLASS: &str = "btn-success";
pub const DEFAULT_SUCCESS_MARKUP: &str = r#"<i class="bi bi-check-lg"></i>"#;
pub const DEFAULT_REVERT_DELAY_MS: u64 = 2000;

/// Attribute on a button naming the id of its source block.
pub const TARGET_ATTRIBUTE: &str = "data-copy-target";
/// Set on a button once a click handler is attached; holds its button id.
pub const BOUND_ATTRIBUTE: &str = "data-copy-bound";
/// Id of the element the client binds under.
pub const ROOT_ELEMENT_ID: &str = "copy-root";
/// Attribute on the root element holding the JSON-encoded `CopyConfig`.
pub const CONFIG_ATTRIBUTE: &str = "data-copy-config";

// ── Copy behaviour ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    /// Marker class identifying copy buttons.
    pub button_class: String,
    /// Tag the source block must have (compared case-insensitively).
    pub source_tag: String,
    pub success_class: String,
    pub success_markup: String,
    pub revert_delay_ms: u64,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            button_class: DEFAULT_BUTTON_CLASS.into(),
            source_tag: DEFAULT_SOURCE_TAG.into(),
            success_class: DEFAULT_SUCCESS_CLASS.into(),
            success_markup: DEFAULT_SUCCESS_MARKUP.into(),
            revert_delay_ms: DEFAULT_REVERT_DELAY_MS,
        }
    }
}

impl CopyConfig {
    pub fn revert_delay(&self) -> Duration {
        Duration::from_millis(self.revert_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("button_class", &self.button_class),
            ("source_tag", &self.source_tag),
            ("success_class", &self.success_class),
        ] {
            if value.trim().is_empty() {
                bail!("copy.{} must not be empty", name);
            }
            if value.chars().any(char::is_whitespace) {
                bail!("copy.{} must be a single token, got {:?}", name, value);
            }
        }
        if self.revert_delay_ms == 0 {
            bail!("copy.revert_delay_ms must be greater than zero");
        }
        Ok(())
    }

    /// Decode the attribute value written by the server. Anything unreadable
    /// or invalid falls back to defaults.
    pub fn from_attribute(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return Self::default();
        };
        match serde_json::from_str::<Self>(raw) {
            Ok(config) if config.validate().is_ok() => config,
            Ok(_) => {
                log::warn!("Ignoring invalid {}; using defaults", CONFIG_ATTRIBUTE);
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {}; using defaults", CONFIG_ATTRIBUTE, e);
                Self::default()
            }
        }
    }

    pub fn to_attribute(&self) -> String {
        // Plain strings and an integer; serialisation cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ── Site (server side) ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub copy: CopyConfig,
    pub snippets: Vec<Snippet>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Deployment snippets".into(),
            copy: CopyConfig::default(),
            snippets: vec![
                Snippet {
                    id: "snippet-install".into(),
                    title: "Install".into(),
                    body: "cargo install cargo-leptos\nrustup target add wasm32-unknown-unknown".into(),
                },
                Snippet {
                    id: "snippet-build".into(),
                    title: "Build".into(),
                    body: "cargo leptos build --release".into(),
                },
                Snippet {
                    id: "snippet-serve".into(),
                    title: "Serve".into(),
                    body: "LEPTOS_SITE_ADDR=0.0.0.0:3000 ./target/release/copy-web".into(),
                },
            ],
        }
    }
}

impl SiteConfig {
    /// Load config from a TOML file. Missing sections take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.copy.validate()?;
        let mut seen = std::collections::HashSet::new();
        for snippet in &self.snippets {
            if snippet.id.trim().is_empty() || snippet.id.chars().any(char::is_whitespace) {
                bail!("snippet {:?} has an invalid id {:?}", snippet.title, snippet.id);
            }
            if !seen.insert(snippet.id.as_str()) {
                bail!("duplicate snippet id {:?}", snippet.id);
            }
        }
        Ok(())
    }
}
