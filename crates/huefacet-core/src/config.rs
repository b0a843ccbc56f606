//! Configuration types for huefacet.
//!
//! [`FacetConfig::load`] reads `~/.config/huefacet/config.toml`, creating it
//! with hardcoded defaults if it does not yet exist. [`FacetConfig::load_from`]
//! layers an explicit file over the defaults, and [`FacetConfig::defaults`]
//! returns the defaults without touching the filesystem (useful in tests).
//!
//! The field configuration is fixed for the lifetime of a facet. Cross-field
//! constraints (such as `nested = true` without a `label_field_path`) are not
//! enforced here; the compiler degrades to non-nested shapes instead.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[fields]
label_field       = "label"
color_field       = "color"
nested            = false
parent_doc_count  = false
aggregation_size  = 10
aggregation_key   = "colorPickerTerms"
load_aggregations = true
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/huefacet/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct FacetConfig {
    #[serde(default)]
    pub fields: FieldConfig,
}

/// `[fields]` section: where labels and colours live in the indexed documents
/// and how the label aggregation is shaped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldConfig {
    #[serde(default = "default_label_field")]
    pub label_field: String,
    #[serde(default = "default_color_field")]
    pub color_field: String,
    /// Nested-document path holding the label field.
    #[serde(default)]
    pub label_field_path: Option<String>,
    /// Nested-document path holding the colour object, when it is nested
    /// one level deeper than the label.
    #[serde(default)]
    pub color_field_path: Option<String>,
    #[serde(default)]
    pub nested: bool,
    /// Count buckets at parent-document granularity via `reverse_nested`.
    #[serde(default)]
    pub parent_doc_count: bool,
    #[serde(default = "default_aggregation_size")]
    pub aggregation_size: usize,
    #[serde(default = "default_aggregation_key")]
    pub aggregation_key: String,
    #[serde(default)]
    pub order_key: Option<String>,
    #[serde(default)]
    pub order_direction: Option<OrderDirection>,
    #[serde(default = "default_load_aggregations")]
    pub load_aggregations: bool,
}

fn default_label_field() -> String { "label".to_string() }
fn default_color_field() -> String { "color".to_string() }
fn default_aggregation_size() -> usize { 10 }
fn default_aggregation_key() -> String { "colorPickerTerms".to_string() }
fn default_load_aggregations() -> bool { true }

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            label_field: default_label_field(),
            color_field: default_color_field(),
            label_field_path: None,
            color_field_path: None,
            nested: false,
            parent_doc_count: false,
            aggregation_size: default_aggregation_size(),
            aggregation_key: default_aggregation_key(),
            order_key: None,
            order_direction: None,
            load_aggregations: default_load_aggregations(),
        }
    }
}

impl FieldConfig {
    pub fn new(label_field: impl Into<String>, color_field: impl Into<String>) -> Self {
        Self {
            label_field: label_field.into(),
            color_field: color_field.into(),
            ..Self::default()
        }
    }

    pub fn with_label_path(mut self, path: impl Into<String>) -> Self {
        self.label_field_path = Some(path.into());
        self
    }

    pub fn with_color_path(mut self, path: impl Into<String>) -> Self {
        self.color_field_path = Some(path.into());
        self
    }

    pub fn nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    pub fn parent_doc_count(mut self, parent_doc_count: bool) -> Self {
        self.parent_doc_count = parent_doc_count;
        self
    }

    pub fn aggregation_size(mut self, size: usize) -> Self {
        self.aggregation_size = size;
        self
    }

    pub fn order_by(mut self, key: impl Into<String>, direction: Option<OrderDirection>) -> Self {
        self.order_key = Some(key.into());
        self.order_direction = direction;
        self
    }

    /// The nested path the label aggregation runs under, if any. Requires
    /// both `nested` and a `label_field_path`.
    pub fn aggregation_scope(&self) -> Option<&str> {
        if self.nested {
            self.label_field_path.as_deref()
        } else {
            None
        }
    }

    /// The nested path colour ranges need in addition to the label scope.
    /// `None` when the colour object shares the label's scope.
    pub fn color_scope(&self) -> Option<&str> {
        match self.color_field_path.as_deref() {
            Some(path) if Some(path) != self.label_field_path.as_deref() => Some(path),
            _ => None,
        }
    }

    /// `colorField.h`, `colorField.s` or `colorField.l`.
    pub fn color_component_field(&self, component: &str) -> String {
        format!("{}.{}", self.color_field, component)
    }
}

/// Sort direction for the label terms aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "asc",
            OrderDirection::Desc => "desc",
        }
    }
}

impl Default for FacetConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl FacetConfig {
    /// Load from `~/.config/huefacet/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load an explicit file layered on top of the built-in defaults. The
    /// file must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        tracing::debug!(path = %path.display(), fields = ?cfg.fields, "config: loaded");
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("huefacet")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
