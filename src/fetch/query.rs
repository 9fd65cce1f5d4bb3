//! GraphQL documents and response shapes for the Admin API.

use serde::Deserialize;

use super::error::FetchError;
use crate::schema::{
    Bounds, FieldDescriptor, ObjectTypeDefinition, SubFieldDescriptor, Validation,
};

pub(crate) const METAFIELD_DEFINITIONS: &str = r#"
query MetafieldDefinitions {
  metafieldDefinitions(ownerType: PRODUCT, first: 100) {
    edges {
      node {
        namespace
        key
        name
        type { name }
        validations { name value }
      }
    }
  }
}
"#;

pub(crate) const METAOBJECT_DEFINITION_BY_TYPE: &str = r#"
query MetaobjectDefinitionByType($type: String!) {
  metaobjectDefinitionByType(type: $type) {
    type
    name
    fieldDefinitions {
      key
      name
      type { name }
      validations { name value }
    }
  }
}
"#;

pub(crate) const METAOBJECT_DEFINITION_BY_ID: &str = r#"
query MetaobjectDefinition($id: ID!) {
  metaobjectDefinition(id: $id) {
    type
    name
    fieldDefinitions {
      key
      name
      type { name }
      validations { name value }
    }
  }
}
"#;

/// Standard GraphQL response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

impl<T> Envelope<T> {
    /// Unwrap the data, turning error-only responses into [`FetchError::GraphQl`]
    ///
    /// Partial responses (data and errors) keep the data; the errors are logged.
    pub(crate) fn into_data(self) -> Result<T, FetchError> {
        let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
        match self.data {
            Some(data) => {
                if !messages.is_empty() {
                    tracing::warn!(errors = ?messages, "partial GraphQL response");
                }
                Ok(data)
            }
            None if !messages.is_empty() => Err(FetchError::GraphQl(messages)),
            None => Err(FetchError::Decode(
                "response carried neither data nor errors".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TypeRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidationNode {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl From<ValidationNode> for Validation {
    fn from(node: ValidationNode) -> Self {
        Validation::new(node.name, node.value.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetafieldDefinitionsData {
    pub metafield_definitions: Option<Connection<MetafieldDefinitionNode>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetafieldDefinitionNode {
    pub namespace: String,
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub validations: Vec<ValidationNode>,
}

impl From<MetafieldDefinitionNode> for FieldDescriptor {
    fn from(node: MetafieldDefinitionNode) -> Self {
        FieldDescriptor {
            namespace: node.namespace,
            key: node.key,
            display_name: node.name,
            type_name: node.type_ref.name,
            validations: node.validations.into_iter().map(Validation::from).collect(),
        }
    }
}

impl MetafieldDefinitionsData {
    pub(crate) fn into_fields(self) -> Vec<FieldDescriptor> {
        self.metafield_definitions
            .map(|conn| {
                conn.edges
                    .into_iter()
                    .map(|edge| FieldDescriptor::from(edge.node))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetaobjectByTypeData {
    #[serde(rename = "metaobjectDefinitionByType")]
    pub definition: Option<MetaobjectDefinitionNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetaobjectByIdData {
    #[serde(rename = "metaobjectDefinition")]
    pub definition: Option<MetaobjectDefinitionNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetaobjectDefinitionNode {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub field_definitions: Vec<MetaobjectFieldNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetaobjectFieldNode {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub validations: Vec<ValidationNode>,
}

impl From<MetaobjectDefinitionNode> for ObjectTypeDefinition {
    fn from(node: MetaobjectDefinitionNode) -> Self {
        let sub_fields = node
            .field_definitions
            .into_iter()
            .map(|field| {
                let validations: Vec<Validation> =
                    field.validations.into_iter().map(Validation::from).collect();
                SubFieldDescriptor {
                    key: field.key,
                    display_name: field.name,
                    type_name: field.type_ref.name,
                    bounds: Bounds::from_validations(&validations),
                }
            })
            .collect();
        ObjectTypeDefinition {
            type_name: node.type_name,
            display_name: node.name,
            sub_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metafield_definitions_decode() {
        let body = json!({
            "data": {
                "metafieldDefinitions": {
                    "edges": [
                        { "node": {
                            "namespace": "custom",
                            "key": "warranty",
                            "name": "Warranty",
                            "type": { "name": "single_line_text_field" },
                            "validations": []
                        }},
                        { "node": {
                            "namespace": "custom",
                            "key": "fin_characteristics",
                            "name": "Fin characteristics",
                            "type": { "name": "metaobject_reference" },
                            "validations": [
                                { "name": "metaobject_definition_id", "value": "gid://shopify/MetaobjectDefinition/7" }
                            ]
                        }}
                    ]
                }
            }
        });
        let envelope: Envelope<MetafieldDefinitionsData> = serde_json::from_value(body).unwrap();
        let fields = envelope.into_data().unwrap().into_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].key, "warranty");
        assert_eq!(fields[0].display_name, "Warranty");
        assert_eq!(
            fields[1].validation("metaobject_definition_id"),
            Some("gid://shopify/MetaobjectDefinition/7")
        );
    }

    #[test]
    fn test_metaobject_definition_decode_keeps_order_and_bounds() {
        let body = json!({
            "data": {
                "metaobjectDefinitionByType": {
                    "type": "fin_characteristics",
                    "name": "Fin characteristics",
                    "fieldDefinitions": [
                        { "key": "rake", "name": "Rake", "type": { "name": "number_integer" },
                          "validations": [ { "name": "min", "value": "0" }, { "name": "max", "value": "10" } ] },
                        { "key": "form_text", "name": "Form Text", "type": { "name": "multi_line_text_field" },
                          "validations": [] },
                        { "key": "area", "name": "Area", "type": { "name": "number_integer" } }
                    ]
                }
            }
        });
        let envelope: Envelope<MetaobjectByTypeData> = serde_json::from_value(body).unwrap();
        let definition: ObjectTypeDefinition =
            envelope.into_data().unwrap().definition.unwrap().into();
        let keys: Vec<_> = definition.sub_fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["rake", "form_text", "area"]);
        assert_eq!(
            definition.sub_fields[0].bounds,
            Some(Bounds {
                min: Some(0),
                max: Some(10)
            })
        );
        assert_eq!(definition.sub_fields[2].bounds, None);
    }

    #[test]
    fn test_missing_definition_is_none() {
        let body = json!({ "data": { "metaobjectDefinitionByType": null } });
        let envelope: Envelope<MetaobjectByTypeData> = serde_json::from_value(body).unwrap();
        assert!(envelope.into_data().unwrap().definition.is_none());
    }

    #[test]
    fn test_error_only_response() {
        let body = json!({ "errors": [ { "message": "Access denied for metafieldDefinitions field." } ] });
        let envelope: Envelope<MetafieldDefinitionsData> = serde_json::from_value(body).unwrap();
        match envelope.into_data() {
            Err(FetchError::GraphQl(messages)) => {
                assert_eq!(messages, ["Access denied for metafieldDefinitions field."]);
            }
            other => panic!("expected GraphQl error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_envelope_is_decode_error() {
        let envelope: Envelope<MetafieldDefinitionsData> =
            serde_json::from_value(json!({})).unwrap();
        assert!(matches!(envelope.into_data(), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_null_connection_yields_no_fields() {
        let body = json!({ "data": { "metafieldDefinitions": null } });
        let envelope: Envelope<MetafieldDefinitionsData> = serde_json::from_value(body).unwrap();
        assert!(envelope.into_data().unwrap().into_fields().is_empty());
    }
}
