//! # Fetch Module
//!
//! Reads metafield and metaobject definitions from the Shopify Admin GraphQL API.
//!
//! ## Overview
//!
//! The generator only ever needs three read-only queries:
//!
//! - **`metafieldDefinitions(ownerType: PRODUCT)`** - every product metafield definition
//! - **`metaobjectDefinitionByType(type:)`** - a metaobject's own field definitions
//! - **`metaobjectDefinition(id:)`** - the same, addressed by definition id
//!
//! [`SchemaSource`] is the seam between the pipeline and the network;
//! [`AdminClient`] is the production implementation over blocking `reqwest`.
//!
//! ## Resolving metaobject references
//!
//! A `metaobject_reference` metafield normally declares which definition it
//! points at through its `metaobject_definition_id` validation. When that
//! validation is missing the referencing field's key is assumed to equal the
//! metaobject type (`custom.fin_characteristics` → `fin_characteristics`).
//! That fallback is a naming convention, not a schema guarantee, so it is
//! logged every time it is used.
//!
//! ## Failure model
//!
//! Every [`FetchError`] is fatal for the run. There are no retries; the next
//! scheduled run is the retry.

mod client;
mod error;
mod query;

pub use client::{admin_endpoint, AdminClient, ACCESS_TOKEN_HEADER};
pub use error::FetchError;

use tracing::warn;

use crate::schema::{FieldDescriptor, ObjectTypeDefinition, METAOBJECT_DEFINITION_ID};

/// Source of metafield and metaobject definitions
pub trait SchemaSource {
    /// All product metafield definitions, in API order
    fn field_definitions(&self) -> Result<Vec<FieldDescriptor>, FetchError>;

    /// Metaobject definition for a type, `None` if the store has no such type
    fn object_definition(&self, type_name: &str)
        -> Result<Option<ObjectTypeDefinition>, FetchError>;

    /// Metaobject definition by its global id, `None` if it does not exist
    fn object_definition_by_id(&self, id: &str)
        -> Result<Option<ObjectTypeDefinition>, FetchError>;
}

/// Where a metaobject reference field points
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectTarget {
    /// Declared through the `metaobject_definition_id` validation
    ById(String),
    /// Inferred from the referencing field's key
    ByKey(String),
}

impl ObjectTarget {
    /// Work out which definition `field` references
    pub fn for_field(field: &FieldDescriptor) -> Self {
        match field.validation(METAOBJECT_DEFINITION_ID) {
            Some(id) if !id.trim().is_empty() => ObjectTarget::ById(id.trim().to_string()),
            _ => {
                warn!(
                    namespace = %field.namespace,
                    key = %field.key,
                    "no metaobject_definition_id on reference; assuming metaobject type equals key"
                );
                ObjectTarget::ByKey(field.key.clone())
            }
        }
    }

    /// Fetch the definition this target names
    pub fn fetch(&self, source: &dyn SchemaSource) -> Result<Option<ObjectTypeDefinition>, FetchError> {
        match self {
            ObjectTarget::ById(id) => source.object_definition_by_id(id),
            ObjectTarget::ByKey(type_name) => source.object_definition(type_name),
        }
    }
}
