use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::{BarPresentation, PresentationConfig};
use crate::schema::{Bounds, FieldDescriptor, FieldKind, ObjectTypeDefinition};

/// Namespace allow-list plus key deny-list
#[derive(Debug, Clone, Default)]
pub struct FieldFilter {
    include_namespaces: HashSet<String>,
    exclude_keys: HashSet<String>,
}

impl FieldFilter {
    pub fn new(
        include_namespaces: impl IntoIterator<Item = String>,
        exclude_keys: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            include_namespaces: include_namespaces.into_iter().collect(),
            exclude_keys: exclude_keys.into_iter().collect(),
        }
    }

    pub fn admits_namespace(&self, namespace: &str) -> bool {
        self.include_namespaces.contains(namespace)
    }

    /// Whether `field` may appear in the flat list
    pub fn admits_flat(&self, field: &FieldDescriptor) -> bool {
        self.admits_namespace(&field.namespace) && !self.exclude_keys.contains(&field.key)
    }
}

/// Fetched definitions split by how they are rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Scalar and link fields rendered as label/value items
    pub flat: Vec<FieldDescriptor>,
    /// Metaobject references rendered as chart sections
    pub references: Vec<FieldDescriptor>,
}

/// Split fetched definitions into flat items and metaobject references
///
/// The namespace allow-list applies to both groups. The key deny-list only
/// applies to flat items; references are kept regardless of their key.
/// API order is preserved in both groups.
pub fn partition(fields: Vec<FieldDescriptor>, filter: &FieldFilter) -> Partition {
    let mut result = Partition::default();
    for field in fields {
        if !filter.admits_namespace(&field.namespace) {
            debug!(namespace = %field.namespace, key = %field.key, "namespace not included");
            continue;
        }
        if field.kind() == FieldKind::ObjectReference {
            result.references.push(field);
        } else if filter.admits_flat(&field) {
            result.flat.push(field);
        } else {
            debug!(namespace = %field.namespace, key = %field.key, "key excluded");
        }
    }
    result
}

/// Percentage scale of a bar, always with `max > min` and a span that fits in `i64`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub min: i64,
    pub max: i64,
}

impl Scale {
    pub const PERCENT: Scale = Scale { min: 0, max: 100 };

    pub fn span(&self) -> i64 {
        self.max - self.min
    }

    pub fn is_percent(&self) -> bool {
        *self == Self::PERCENT
    }
}

/// Resolve declared bounds into a usable scale
///
/// Missing sides default to 0 and 100. An empty or inverted range, or one
/// whose span does not fit in an `i64`, falls back to 0..100 entirely.
pub fn resolve_scale(bounds: Option<&Bounds>) -> Scale {
    let Some(bounds) = bounds else {
        return Scale::PERCENT;
    };
    let scale = Scale {
        min: bounds.min.unwrap_or(Scale::PERCENT.min),
        max: bounds.max.unwrap_or(Scale::PERCENT.max),
    };
    if scale.max <= scale.min {
        warn!(min = scale.min, max = scale.max, "empty bar range; using 0..100");
        return Scale::PERCENT;
    }
    if scale.max.checked_sub(scale.min).is_none() {
        warn!(min = scale.min, max = scale.max, "bar range too wide; using 0..100");
        return Scale::PERCENT;
    }
    scale
}

/// A numeric metaobject field drawn as a marker on a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarField {
    pub key: String,
    pub display_name: String,
    pub scale: Scale,
    pub presentation: BarPresentation,
}

/// A text metaobject field rendered as a labelled description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub key: String,
    pub label: String,
    pub multi_line: bool,
}

/// A metaobject reference with its classified fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSection {
    /// Namespace of the referencing product metafield
    pub namespace: String,
    /// Key of the referencing product metafield
    pub reference_key: String,
    /// Metaobject type
    pub type_name: String,
    /// Section title
    pub title: String,
    pub bars: Vec<BarField>,
    pub texts: Vec<TextField>,
}

impl ObjectSection {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty() && self.texts.is_empty()
    }

    /// Liquid path of the referencing metafield on the current product
    pub fn value_path(&self) -> String {
        format!("product.metafields.{}.{}", self.namespace, self.reference_key)
    }

    /// Liquid variable the resolved metaobject is assigned to
    pub fn liquid_var(&self) -> String {
        let raw = format!("{}_{}", self.namespace, self.reference_key);
        raw.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect()
    }
}

/// Classify the fields of a referenced metaobject
///
/// `number_integer` fields become bars, single- and multi-line text fields
/// become descriptions, everything else is dropped. Definition order is kept.
pub fn classify_object(
    reference: &FieldDescriptor,
    definition: &ObjectTypeDefinition,
    presentation: &PresentationConfig,
) -> ObjectSection {
    let mut bars = Vec::new();
    let mut texts = Vec::new();
    for sub in &definition.sub_fields {
        match sub.kind() {
            FieldKind::Bar => {
                let presentation = presentation
                    .bar(&definition.type_name, &sub.key)
                    .cloned()
                    .unwrap_or_else(|| BarPresentation {
                        left_label: sub.display_name.clone(),
                        ..BarPresentation::default()
                    });
                bars.push(BarField {
                    key: sub.key.clone(),
                    display_name: sub.display_name.clone(),
                    scale: resolve_scale(sub.bounds.as_ref()),
                    presentation,
                });
            }
            kind if kind.is_text() => texts.push(TextField {
                key: sub.key.clone(),
                label: description_label(&sub.display_name, &sub.key),
                multi_line: kind == FieldKind::MultiLineText,
            }),
            _ => {
                debug!(
                    object_type = %definition.type_name,
                    key = %sub.key,
                    type_name = %sub.type_name,
                    "metaobject field not visualized"
                );
            }
        }
    }

    let title = presentation
        .title(&definition.type_name)
        .map(str::to_string)
        .unwrap_or_else(|| {
            if definition.display_name.is_empty() {
                title_case(&definition.type_name.replace('_', " "))
            } else {
                definition.display_name.clone()
            }
        });

    ObjectSection {
        namespace: reference.namespace.clone(),
        reference_key: reference.key.clone(),
        type_name: definition.type_name.clone(),
        title,
        bars,
        texts,
    }
}

/// Label of a text description: `"Form Text"` → `"Form"`
///
/// A trailing "text" word (any case, after a space or underscore) is stripped
/// and the rest title-cased. Falls back to the key when the display name is blank.
pub fn description_label(display_name: &str, key: &str) -> String {
    let source = if display_name.trim().is_empty() {
        key
    } else {
        display_name
    };
    let mut words: Vec<&str> = source
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|w| !w.is_empty())
        .collect();
    match words.last().copied() {
        Some(last) if words.len() > 1 && last.eq_ignore_ascii_case("text") => {
            words.pop();
        }
        // "FormText"
        Some(last) if last.len() > 4 && last.ends_with("Text") => {
            let trimmed = &last[..last.len() - 4];
            if let Some(slot) = words.last_mut() {
                *slot = trimmed;
            }
        }
        _ => {}
    }
    title_case(&words.join(" "))
}

/// Upper-case the first letter of each word, lower-case the rest
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
