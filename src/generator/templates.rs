use askama::Template;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::classify::{title_case, BarField, ObjectSection};
use crate::config::BlockSettings;
use crate::schema::{FieldDescriptor, FieldKind};

/// Stylesheet rules shared by every metaobject chart
const CHART_STYLES: &str = include_str!("../../templates/chart_styles.css");

/// Format of the `Generated:` line in provenance headers
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Icon source at one end of a bar; at most one side is set
#[derive(Debug, Clone, Default)]
pub struct IconView {
    /// Theme asset name, resolved with `asset_url`
    pub asset: String,
    /// Absolute or root-relative URL
    pub url: String,
}

impl IconView {
    fn new(icon: &str) -> Self {
        let icon = icon.trim();
        if icon.is_empty() {
            Self::default()
        } else if icon.contains("://") || icon.starts_with('/') {
            Self {
                url: icon.to_string(),
                ..Self::default()
            }
        } else {
            // Spliced into a single-quoted Liquid string
            Self {
                asset: icon.replace('\'', ""),
                ..Self::default()
            }
        }
    }
}

/// A bar as the section template sees it
///
/// Labels are raw text; the template HTML-escapes them.
#[derive(Debug, Clone)]
pub struct BarView {
    /// Field display name, used in a Liquid comment
    pub name: String,
    /// Metaobject field key
    pub key: String,
    /// Liquid expression yielding the marker position in percent
    pub marker: String,
    pub left_label: String,
    pub left_sublabel: String,
    pub right_label: String,
    pub right_sublabel: String,
    pub left_icon: IconView,
    pub right_icon: IconView,
}

/// A text description as the section template sees it
#[derive(Debug, Clone)]
pub struct TextView {
    pub key: String,
    pub label: String,
    /// Liquid output expression for the value
    pub value: String,
}

/// A flat metafield item as the block template sees it
#[derive(Debug, Clone)]
pub struct ItemView {
    /// Liquid path of the metafield
    pub path: String,
    /// Display name
    pub label: String,
    /// Rendered as a link to the metafield value
    pub link: bool,
    /// Liquid output expression for non-link values
    pub value: String,
}

/// Template data for one metaobject chart section
#[derive(Template)]
#[template(path = "object_section.liquid", syntax = "liquid", escape = "none")]
pub struct ObjectSectionTemplate {
    /// Emit the assign + blank guard around the section
    pub guarded: bool,
    pub var: String,
    pub value_path: String,
    /// CSS modifier derived from the metaobject type
    pub modifier: String,
    pub title: String,
    pub bars: Vec<BarView>,
    pub texts: Vec<TextView>,
}

/// Template data for the product metafields block
#[derive(Template)]
#[template(path = "product_block.liquid", syntax = "liquid", escape = "none")]
pub struct ProductBlockTemplate {
    pub generated_at: String,
    pub field_count: usize,
    pub namespaces: String,
    pub metaobjects: String,
    /// Pre-rendered chart sections
    pub sections: Vec<String>,
    pub items: Vec<ItemView>,
    /// Text of link items
    pub link_text: String,
    pub chart_styles: &'static str,
    /// `{% schema %}` JSON
    pub schema: String,
}

/// Template data for a standalone metaobject block
#[derive(Template)]
#[template(path = "object_block.liquid", syntax = "liquid", escape = "none")]
pub struct ObjectBlockTemplate {
    pub banner: String,
    pub banner_rule: String,
    pub generated_at: String,
    pub type_name: String,
    pub field_count: usize,
    /// `namespace.key` of the referencing metafield
    pub reference: String,
    pub var: String,
    /// Pre-rendered, unguarded chart section
    pub section: String,
    pub chart_styles: &'static str,
    pub schema: String,
}

/// Theme editor settings schema of a generated block
///
/// The settings are a closed set: heading visibility, text and size, and
/// top/bottom padding. Nothing here depends on fetched definitions.
#[derive(Debug, Clone, Serialize)]
pub struct BlockSchema {
    pub name: String,
    pub tag: Option<String>,
    pub settings: Vec<Setting>,
    pub presets: Vec<Preset>,
}

/// One theme editor setting
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Setting {
    Paragraph {
        content: String,
    },
    Checkbox {
        id: &'static str,
        label: &'static str,
        default: bool,
    },
    Text {
        id: &'static str,
        label: &'static str,
        default: String,
    },
    Select {
        id: &'static str,
        label: &'static str,
        options: Vec<SelectOption>,
        default: &'static str,
    },
    Range {
        id: &'static str,
        label: &'static str,
        min: u32,
        max: u32,
        step: u32,
        unit: &'static str,
        default: u32,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    pub name: String,
    pub category: &'static str,
}

impl BlockSchema {
    pub fn new(name: &str, note: &str, heading: &str) -> Self {
        let padding = |id: &'static str, label: &'static str| Setting::Range {
            id,
            label,
            min: 0,
            max: 100,
            step: 1,
            unit: "px",
            default: 16,
        };
        Self {
            name: name.to_string(),
            tag: None,
            settings: vec![
                Setting::Paragraph {
                    content: note.to_string(),
                },
                Setting::Checkbox {
                    id: "show_heading",
                    label: "Show heading",
                    default: true,
                },
                Setting::Text {
                    id: "heading",
                    label: "Heading",
                    default: heading.to_string(),
                },
                Setting::Select {
                    id: "heading_size",
                    label: "Heading size",
                    options: vec![
                        SelectOption { value: "h4", label: "Small" },
                        SelectOption { value: "h3", label: "Medium" },
                        SelectOption { value: "h2", label: "Large" },
                    ],
                    default: "h4",
                },
                padding("padding-block-start", "Top padding"),
                padding("padding-block-end", "Bottom padding"),
            ],
            presets: vec![Preset {
                name: name.to_string(),
                category: "Product",
            }],
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Everything the product metafields block renders
#[derive(Debug, Clone)]
pub struct ProductBlock {
    /// Flat items, already filtered
    pub items: Vec<FieldDescriptor>,
    /// Chart sections with at least one classified field
    pub sections: Vec<ObjectSection>,
    /// Included namespaces, for the provenance header
    pub namespaces: Vec<String>,
    pub settings: BlockSettings,
}

/// Everything a standalone metaobject block renders
#[derive(Debug, Clone)]
pub struct ObjectBlock {
    pub section: ObjectSection,
    /// Number of fields on the metaobject definition
    pub field_count: usize,
    /// Block name shown in the theme editor
    pub name: String,
    /// Default heading text
    pub heading: String,
}

/// Liquid expression placing the marker of `bar` in percent
///
/// Values on a 0..100 scale are used as-is; other scales are mapped
/// linearly with `(value - min) * 100 / (max - min)`.
pub fn marker_expression(var: &str, bar: &BarField) -> String {
    let value = format!("{var}.{}.value", bar.key);
    if bar.scale.is_percent() {
        value
    } else {
        format!(
            "{value} | minus: {} | times: 100.0 | divided_by: {}",
            bar.scale.min,
            bar.scale.span()
        )
    }
}

fn bar_view(var: &str, bar: &BarField) -> BarView {
    let p = &bar.presentation;
    BarView {
        name: bar.display_name.clone(),
        key: bar.key.clone(),
        marker: marker_expression(var, bar),
        left_label: p.left_label.clone(),
        left_sublabel: p.left_sublabel.clone(),
        right_label: p.right_label.clone(),
        right_sublabel: p.right_sublabel.clone(),
        left_icon: IconView::new(&p.left_icon),
        right_icon: IconView::new(&p.right_icon),
    }
}

/// Render one chart section
///
/// `title` is HTML-escaped by the template. Liquid output such as
/// `{{ product.title }}` has no characters to escape and passes through.
/// With `guarded` the section assigns the metaobject itself and renders only
/// when the reference is set; otherwise the caller is responsible for both.
pub fn render_object_section(
    section: &ObjectSection,
    title: &str,
    guarded: bool,
) -> anyhow::Result<String> {
    let var = section.liquid_var();
    let bars = section.bars.iter().map(|bar| bar_view(&var, bar)).collect();
    let texts = section
        .texts
        .iter()
        .map(|text| {
            let value = format!("{var}.{}.value", text.key);
            TextView {
                key: text.key.clone(),
                label: text.label.clone(),
                value: if text.multi_line {
                    format!("{value} | newline_to_br")
                } else {
                    value
                },
            }
        })
        .collect();
    let rendered = ObjectSectionTemplate {
        guarded,
        modifier: section.type_name.replace('_', "-"),
        value_path: section.value_path(),
        var,
        title: title.to_string(),
        bars,
        texts,
    }
    .render()?;
    Ok(rendered)
}

fn item_view(field: &FieldDescriptor) -> ItemView {
    let path = field.liquid_path();
    let value = match field.kind() {
        FieldKind::MultiLineText => format!("{path}.value | newline_to_br"),
        _ => format!("{path}.value"),
    };
    ItemView {
        label: field.display_name.clone(),
        link: field.kind() == FieldKind::Link,
        path,
        value,
    }
}

fn section_summary(section: &ObjectSection) -> String {
    format!(
        "{} ({} bars, {} descriptions)",
        section.type_name,
        section.bars.len(),
        section.texts.len()
    )
}

/// Render the product metafields block
///
/// Output depends only on `block` and `generated_at`.
pub fn render_product_block(
    block: &ProductBlock,
    generated_at: DateTime<Utc>,
) -> anyhow::Result<String> {
    let sections = block
        .sections
        .iter()
        .map(|section| render_object_section(section, &section.title, true))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let metaobjects = if block.sections.is_empty() {
        "none".to_string()
    } else {
        block
            .sections
            .iter()
            .map(section_summary)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let schema = BlockSchema::new(
        &block.settings.name,
        "Auto-generated from Shopify metafields.",
        &block.settings.heading,
    );
    let rendered = ProductBlockTemplate {
        generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
        field_count: block.items.len(),
        namespaces: block.namespaces.join(", "),
        metaobjects,
        sections,
        items: block
            .items
            .iter()
            .map(item_view)
            .collect(),
        link_text: block.settings.link_text.clone(),
        chart_styles: CHART_STYLES,
        schema: schema.to_json()?,
    }
    .render()?;
    Ok(rendered)
}

/// Render a standalone block for one metaobject reference
pub fn render_object_block(
    block: &ObjectBlock,
    generated_at: DateTime<Utc>,
) -> anyhow::Result<String> {
    let section = &block.section;
    let banner = title_case(&section.type_name.replace('_', " ")).to_uppercase();
    let banner_rule = "=".repeat(banner.chars().count() + " - AUTO-GENERATED".len());
    let schema = BlockSchema::new(
        &block.name,
        &format!(
            "Auto-generated. Only shows on products with {} metaobject.",
            section.type_name
        ),
        &block.heading,
    );
    let rendered = ObjectBlockTemplate {
        banner,
        banner_rule,
        generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
        type_name: section.type_name.clone(),
        field_count: block.field_count,
        reference: format!("{}.{}", section.namespace, section.reference_key),
        var: section.liquid_var(),
        section: render_object_section(section, "{{ product.title }}", false)?,
        chart_styles: CHART_STYLES,
        schema: schema.to_json()?,
    }
    .render()?;
    Ok(rendered)
}
