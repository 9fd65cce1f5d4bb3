//! # Schema Module
//!
//! Descriptors for the metafield and metaobject definitions returned by the
//! Shopify Admin API. These are the inputs of the generator; they are built
//! once per run by [`crate::fetch`] and never mutated afterwards.
//!
//! Presentation decisions are made from the declared type name through
//! [`FieldKind`], a closed set of kinds the generator knows how to render.
//! Type names it does not recognise map to [`FieldKind::Opaque`].

use serde::{Deserialize, Serialize};

/// Validation name carrying the referenced metaobject definition id
pub const METAOBJECT_DEFINITION_ID: &str = "metaobject_definition_id";

/// Presentation kind derived from a declared metafield type name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `number_integer`: bounded numeric, drawn as a marker on a track
    Bar,
    /// `single_line_text_field`
    SingleLineText,
    /// `multi_line_text_field`: line breaks are preserved when rendered
    MultiLineText,
    /// `url`: rendered as a link
    Link,
    /// `metaobject_reference`: points at a metaobject with its own fields
    ObjectReference,
    /// Any other type; rendered raw in the flat list, dropped from charts
    Opaque,
}

impl FieldKind {
    /// Map a Shopify type name (e.g. `number_integer`) to a presentation kind
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name {
            "number_integer" => FieldKind::Bar,
            "single_line_text_field" => FieldKind::SingleLineText,
            "multi_line_text_field" => FieldKind::MultiLineText,
            "url" => FieldKind::Link,
            "metaobject_reference" => FieldKind::ObjectReference,
            _ => FieldKind::Opaque,
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, FieldKind::SingleLineText | FieldKind::MultiLineText)
    }
}

/// A named validation declared on a definition (`min`, `max`, `metaobject_definition_id`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub name: String,
    pub value: String,
}

impl Validation {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn find_validation<'a>(validations: &'a [Validation], name: &str) -> Option<&'a str> {
    validations
        .iter()
        .find(|v| v.name == name)
        .map(|v| v.value.as_str())
}

/// A product metafield definition
///
/// Identity is `(namespace, key)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Metafield namespace (e.g. `custom`)
    pub namespace: String,
    /// Metafield key (e.g. `warranty`)
    pub key: String,
    /// Merchant-facing name
    pub display_name: String,
    /// Declared Shopify type name
    pub type_name: String,
    /// Declared validations
    pub validations: Vec<Validation>,
}

impl FieldDescriptor {
    pub fn new(
        namespace: impl Into<String>,
        key: impl Into<String>,
        display_name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            display_name: display_name.into(),
            type_name: type_name.into(),
            validations: Vec::new(),
        }
    }

    pub fn with_validation(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.validations.push(Validation::new(name, value));
        self
    }

    pub fn kind(&self) -> FieldKind {
        FieldKind::from_type_name(&self.type_name)
    }

    pub fn validation(&self, name: &str) -> Option<&str> {
        find_validation(&self.validations, name)
    }

    /// Liquid path of the metafield on the current product
    pub fn liquid_path(&self) -> String {
        format!("product.metafields.{}.{}", self.namespace, self.key)
    }
}

/// Declared `min`/`max` validations of a numeric field
///
/// Either side may be missing; [`crate::generator::resolve_scale`] fills the gaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl Bounds {
    /// Read bounds from `min`/`max` validations, `None` when neither parses
    pub fn from_validations(validations: &[Validation]) -> Option<Self> {
        let bounds = Self {
            min: find_validation(validations, "min").and_then(parse_bound),
            max: find_validation(validations, "max").and_then(parse_bound),
        };
        if bounds.min.is_none() && bounds.max.is_none() {
            None
        } else {
            Some(bounds)
        }
    }
}

// Integer validations arrive as strings; some stores save them as "10.0".
fn parse_bound(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.round() as i64)
    })
}

/// A field of a metaobject definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubFieldDescriptor {
    pub key: String,
    pub display_name: String,
    pub type_name: String,
    pub bounds: Option<Bounds>,
}

impl SubFieldDescriptor {
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            type_name: type_name.into(),
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, min: i64, max: i64) -> Self {
        self.bounds = Some(Bounds {
            min: Some(min),
            max: Some(max),
        });
        self
    }

    pub fn kind(&self) -> FieldKind {
        FieldKind::from_type_name(&self.type_name)
    }
}

/// A metaobject definition with its fields in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTypeDefinition {
    /// Metaobject type (e.g. `fin_characteristics`)
    pub type_name: String,
    /// Merchant-facing name
    pub display_name: String,
    /// Fields in the order the API returned them
    pub sub_fields: Vec<SubFieldDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_from_type_name() {
        assert_eq!(FieldKind::from_type_name("number_integer"), FieldKind::Bar);
        assert_eq!(
            FieldKind::from_type_name("single_line_text_field"),
            FieldKind::SingleLineText
        );
        assert_eq!(
            FieldKind::from_type_name("multi_line_text_field"),
            FieldKind::MultiLineText
        );
        assert_eq!(FieldKind::from_type_name("url"), FieldKind::Link);
        assert_eq!(
            FieldKind::from_type_name("metaobject_reference"),
            FieldKind::ObjectReference
        );
        assert_eq!(FieldKind::from_type_name("number_decimal"), FieldKind::Opaque);
        assert_eq!(
            FieldKind::from_type_name("list.single_line_text_field"),
            FieldKind::Opaque
        );
        assert_eq!(FieldKind::from_type_name(""), FieldKind::Opaque);
    }

    #[test]
    fn test_bounds_from_validations() {
        let validations = vec![Validation::new("min", "0"), Validation::new("max", "10")];
        assert_eq!(
            Bounds::from_validations(&validations),
            Some(Bounds {
                min: Some(0),
                max: Some(10)
            })
        );
    }

    #[test]
    fn test_bounds_partial_and_decimal() {
        let validations = vec![Validation::new("max", " 10.0 ")];
        assert_eq!(
            Bounds::from_validations(&validations),
            Some(Bounds {
                min: None,
                max: Some(10)
            })
        );
    }

    #[test]
    fn test_bounds_absent_or_garbage() {
        assert_eq!(Bounds::from_validations(&[]), None);
        let validations = vec![Validation::new("min", "low"), Validation::new("regex", "x")];
        assert_eq!(Bounds::from_validations(&validations), None);
    }

    #[test]
    fn test_liquid_path() {
        let field = FieldDescriptor::new("custom", "warranty", "Warranty", "single_line_text_field");
        assert_eq!(field.liquid_path(), "product.metafields.custom.warranty");
    }

    #[test]
    fn test_field_validation_lookup() {
        let field = FieldDescriptor::new("custom", "fin", "Fin", "metaobject_reference")
            .with_validation(METAOBJECT_DEFINITION_ID, "gid://shopify/MetaobjectDefinition/1");
        assert_eq!(
            field.validation(METAOBJECT_DEFINITION_ID),
            Some("gid://shopify/MetaobjectDefinition/1")
        );
        assert_eq!(field.validation("min"), None);
    }
}
