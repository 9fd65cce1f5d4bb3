//! Generator configuration
//!
//! Settings come from an optional `metablock.toml` next to where the generator
//! runs. A missing file is not an error: the built-in defaults describe the
//! store this tool was written for. CLI flags override file values.
//!
//! ```toml
//! shop = "example.myshopify.com"
//! api_version = "2024-01"
//! output = "blocks/product-metafields.liquid"
//! include_namespaces = ["custom", "reviews"]
//! exclude_keys = ["rating", "rating_count"]
//!
//! [objects.fin_characteristics]
//! title = "Form, Function & Feel"
//!
//! [objects.fin_characteristics.bars.rake]
//! left_label = "Upright"
//! left_sublabel = "Tight Turns"
//! right_label = "Raked"
//! right_sublabel = "Drawn-Out Turns"
//! ```
//!
//! Note that an `[objects]` table in the file replaces the built-in
//! presentation entries as a whole.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use url::Url;

use crate::fetch::admin_endpoint;
use crate::generator::FieldFilter;

/// Config file picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "metablock.toml";

/// Environment variable holding the Admin API access token
pub const TOKEN_ENV: &str = "SHOPIFY_ADMIN_TOKEN";

/// Labels and icons drawn at both ends of a bar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarPresentation {
    pub left_label: String,
    pub left_sublabel: String,
    pub right_label: String,
    pub right_sublabel: String,
    /// Theme asset name or absolute URL
    pub left_icon: String,
    /// Theme asset name or absolute URL
    pub right_icon: String,
}

impl BarPresentation {
    fn labels(left: &str, left_sub: &str, right: &str, right_sub: &str) -> Self {
        Self {
            left_label: left.to_string(),
            left_sublabel: left_sub.to_string(),
            right_label: right.to_string(),
            right_sublabel: right_sub.to_string(),
            ..Self::default()
        }
    }
}

/// Presentation of one metaobject type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectPresentation {
    /// Section title; the definition's display name when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Bar endpoints keyed by metaobject field key
    pub bars: BTreeMap<String, BarPresentation>,
}

/// Presentation entries keyed by metaobject type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresentationConfig(pub BTreeMap<String, ObjectPresentation>);

impl PresentationConfig {
    /// Configured endpoints for `(object_type, key)`, if any
    pub fn bar(&self, object_type: &str, key: &str) -> Option<&BarPresentation> {
        self.0.get(object_type).and_then(|o| o.bars.get(key))
    }

    /// Configured section title for `object_type`, if any
    pub fn title(&self, object_type: &str) -> Option<&str> {
        self.0.get(object_type).and_then(|o| o.title.as_deref())
    }

    /// Built-in presentation of the `fin_characteristics` metaobject
    pub fn fin_characteristics() -> Self {
        let bars = [
            ("rake", BarPresentation::labels("Upright", "Tight Turns", "Raked", "Drawn-Out Turns")),
            ("area", BarPresentation::labels("Less Area", "Loose", "More Area", "Stable")),
            ("speed", BarPresentation::labels("Speed Control", "", "Speed Generating", "Drive")),
            ("flex", BarPresentation::labels("Less Flex", "Responsive", "More Flex", "Projection")),
        ]
        .into_iter()
        .map(|(key, bar)| (key.to_string(), bar))
        .collect();
        let mut objects = BTreeMap::new();
        objects.insert(
            "fin_characteristics".to_string(),
            ObjectPresentation {
                title: Some("Form, Function & Feel".to_string()),
                bars,
            },
        );
        Self(objects)
    }
}

/// Settings of the product metafields block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockSettings {
    /// Block name shown in the theme editor
    pub name: String,
    /// Default heading text
    pub heading: String,
    /// Anchor text for `url` metafields
    pub link_text: String,
}

impl Default for BlockSettings {
    fn default() -> Self {
        Self {
            name: "Product specs".to_string(),
            heading: "Specifications".to_string(),
            link_text: "View Guide".to_string(),
        }
    }
}

/// Settings of standalone metaobject blocks (`object-block`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectBlockSettings {
    /// Namespace of the product metafield holding the reference
    pub namespace: String,
    /// Default heading text
    pub heading: String,
}

impl Default for ObjectBlockSettings {
    fn default() -> Self {
        Self {
            namespace: "custom".to_string(),
            heading: "Form, Function & Feel".to_string(),
        }
    }
}

/// Complete generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Shop domain (`*.myshopify.com`)
    pub shop: String,
    /// Admin API version
    pub api_version: String,
    /// Full GraphQL endpoint; overrides `shop`/`api_version` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Output path of the product metafields block
    pub output: PathBuf,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Only metafields in these namespaces are rendered
    pub include_namespaces: Vec<String>,
    /// Metafield keys never rendered in the flat list
    pub exclude_keys: Vec<String>,
    pub block: BlockSettings,
    pub object_block: ObjectBlockSettings,
    pub objects: PresentationConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            shop: "7aa0b1-14.myshopify.com".to_string(),
            api_version: "2024-01".to_string(),
            endpoint: None,
            output: PathBuf::from("blocks/product-metafields.liquid"),
            timeout_secs: 30,
            include_namespaces: ["custom", "gato_heroi", "reviews", "descriptors"]
                .map(String::from)
                .to_vec(),
            exclude_keys: [
                "rating_value",
                "review_count",
                "rating",
                "rating_count",
                "availability",
                "fin_characteristics",
            ]
            .map(String::from)
            .to_vec(),
            block: BlockSettings::default(),
            object_block: ObjectBlockSettings::default(),
            objects: PresentationConfig::fin_characteristics(),
        }
    }
}

impl GeneratorConfig {
    /// GraphQL endpoint to query
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint override or the shop domain does not form a valid URL.
    pub fn endpoint_url(&self) -> anyhow::Result<Url> {
        match &self.endpoint {
            Some(endpoint) => Url::parse(endpoint)
                .with_context(|| format!("Invalid endpoint URL: {endpoint}")),
            None => admin_endpoint(&self.shop, &self.api_version).with_context(|| {
                format!(
                    "Invalid shop domain or API version: {} / {}",
                    self.shop, self.api_version
                )
            }),
        }
    }

    /// Namespace allow-list and key deny-list as a filter
    pub fn filter(&self) -> FieldFilter {
        FieldFilter::new(self.include_namespaces.clone(), self.exclude_keys.clone())
    }

    /// Default output path of the standalone block for `object_type`
    pub fn object_block_output(object_type: &str) -> PathBuf {
        PathBuf::from("blocks").join(format!("{}.liquid", object_type.replace('_', "-")))
    }
}

/// Load a configuration file
///
/// # Returns
///
/// Returns `Ok(Some(config))` if the file exists and parses,
/// `Ok(None)` if it doesn't exist (not an error),
/// `Err` if it exists but fails to parse.
pub fn load_config_file(path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    let config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;

    Ok(Some(config))
}

/// Resolve the configuration for a run
///
/// Priority:
/// 1. Explicitly provided path (via CLI); it must exist
/// 2. [`DEFAULT_CONFIG_FILE`] in `dir`
/// 3. Built-in defaults
pub fn resolve_config(explicit_path: Option<&Path>, dir: &Path) -> anyhow::Result<GeneratorConfig> {
    if let Some(path) = explicit_path {
        return load_config_file(path)?
            .ok_or_else(|| anyhow::anyhow!("Config file not found: {}", path.display()));
    }
    Ok(load_config_file(&dir.join(DEFAULT_CONFIG_FILE))?.unwrap_or_default())
}
