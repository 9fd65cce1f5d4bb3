use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use super::error::FetchError;
use super::query::{
    Envelope, MetafieldDefinitionsData, MetaobjectByIdData, MetaobjectByTypeData,
    METAFIELD_DEFINITIONS, METAOBJECT_DEFINITION_BY_ID, METAOBJECT_DEFINITION_BY_TYPE,
};
use super::SchemaSource;
use crate::schema::{FieldDescriptor, ObjectTypeDefinition};

/// Header carrying the Admin API access token
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Build the Admin GraphQL endpoint for a shop domain and API version
///
/// ```
/// use metablock::fetch::admin_endpoint;
///
/// let url = admin_endpoint("example.myshopify.com", "2024-01").unwrap();
/// assert_eq!(url.as_str(), "https://example.myshopify.com/admin/api/2024-01/graphql.json");
/// ```
pub fn admin_endpoint(shop: &str, api_version: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
        "https://{shop}/admin/api/{api_version}/graphql.json"
    ))
}

/// Blocking Admin API client
///
/// Issues one POST per query, no retries. The token is sent as
/// [`ACCESS_TOKEN_HEADER`] and never logged.
pub struct AdminClient {
    endpoint: Url,
    token: String,
    http: reqwest::blocking::Client,
}

impl AdminClient {
    /// Create a client for `endpoint`
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the HTTP client cannot be built
    /// (e.g. TLS backend initialisation failure).
    pub fn new(endpoint: Url, token: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("metablock/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self {
            endpoint,
            token: token.into(),
            http,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn post<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T, FetchError> {
        debug!(operation, endpoint = %self.endpoint, "posting admin query");
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(ACCESS_TOKEN_HEADER, self.token.as_str())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::status(status.as_u16(), body.trim()));
        }

        let envelope: Envelope<T> = response
            .json()
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        envelope.into_data()
    }
}

impl SchemaSource for AdminClient {
    fn field_definitions(&self) -> Result<Vec<FieldDescriptor>, FetchError> {
        let data: MetafieldDefinitionsData =
            self.post("MetafieldDefinitions", METAFIELD_DEFINITIONS, json!({}))?;
        let fields = data.into_fields();
        info!(count = fields.len(), "fetched product metafield definitions");
        Ok(fields)
    }

    fn object_definition(&self, type_name: &str) -> Result<Option<ObjectTypeDefinition>, FetchError> {
        let data: MetaobjectByTypeData = self.post(
            "MetaobjectDefinitionByType",
            METAOBJECT_DEFINITION_BY_TYPE,
            json!({ "type": type_name }),
        )?;
        Ok(data.definition.map(ObjectTypeDefinition::from))
    }

    fn object_definition_by_id(&self, id: &str) -> Result<Option<ObjectTypeDefinition>, FetchError> {
        let data: MetaobjectByIdData = self.post(
            "MetaobjectDefinition",
            METAOBJECT_DEFINITION_BY_ID,
            json!({ "id": id }),
        )?;
        Ok(data.definition.map(ObjectTypeDefinition::from))
    }
}
