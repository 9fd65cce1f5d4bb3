#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use metablock::fetch::{FetchError, SchemaSource, ACCESS_TOKEN_HEADER};
use metablock::schema::{FieldDescriptor, ObjectTypeDefinition, SubFieldDescriptor};

/// In-memory definitions standing in for the Admin API
#[derive(Default)]
pub struct FixtureSource {
    pub fields: Vec<FieldDescriptor>,
    pub objects: Vec<ObjectTypeDefinition>,
    /// When set, every query fails with this HTTP status
    pub fail_with: Option<u16>,
    /// Object types requested, in order
    pub requested: Mutex<Vec<String>>,
}

impl FixtureSource {
    pub fn new(fields: Vec<FieldDescriptor>, objects: Vec<ObjectTypeDefinition>) -> Self {
        Self {
            fields,
            objects,
            ..Self::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), FetchError> {
        match self.fail_with {
            Some(status) => Err(FetchError::Status {
                status,
                body: "fixture failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl SchemaSource for FixtureSource {
    fn field_definitions(&self) -> Result<Vec<FieldDescriptor>, FetchError> {
        self.check()?;
        Ok(self.fields.clone())
    }

    fn object_definition(
        &self,
        type_name: &str,
    ) -> Result<Option<ObjectTypeDefinition>, FetchError> {
        self.check()?;
        self.requested.lock().unwrap().push(type_name.to_string());
        Ok(self
            .objects
            .iter()
            .find(|o| o.type_name == type_name)
            .cloned())
    }

    fn object_definition_by_id(
        &self,
        id: &str,
    ) -> Result<Option<ObjectTypeDefinition>, FetchError> {
        self.check()?;
        // Fixture ids are "gid://shopify/MetaobjectDefinition/<type>"
        let type_name = id.rsplit('/').next().unwrap_or(id);
        self.object_definition(type_name)
    }
}

/// The store's two scalar fields plus the fin characteristics reference
pub fn acceptance_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("custom", "warranty", "Warranty", "single_line_text_field"),
        FieldDescriptor::new("custom", "sizing_chart", "Sizing Chart", "url"),
        FieldDescriptor::new(
            "custom",
            "fin_characteristics",
            "Fin Characteristics",
            "metaobject_reference",
        ),
    ]
}

pub fn fin_characteristics() -> ObjectTypeDefinition {
    ObjectTypeDefinition {
        type_name: "fin_characteristics".to_string(),
        display_name: "Fin Characteristics".to_string(),
        sub_fields: vec![
            SubFieldDescriptor::new("rake", "Rake", "number_integer").with_bounds(0, 100),
            SubFieldDescriptor::new("area", "Area", "number_integer").with_bounds(0, 100),
            SubFieldDescriptor::new("speed", "Speed", "number_integer").with_bounds(0, 100),
            SubFieldDescriptor::new("flex", "Flex", "number_integer").with_bounds(0, 100),
            SubFieldDescriptor::new("form_text", "Form Text", "single_line_text_field"),
            SubFieldDescriptor::new("function_text", "Function Text", "single_line_text_field"),
            SubFieldDescriptor::new("feel_text", "Feel Text", "single_line_text_field"),
            SubFieldDescriptor::new("overall_text", "Overall Text", "multi_line_text_field"),
        ],
    }
}

/// A request received by [`MockAdmin`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub token: Option<String>,
    pub body: String,
}

/// Minimal Admin GraphQL endpoint on a random local port
///
/// `respond` maps a request body to `(status, json body)`.
pub struct MockAdmin {
    server: Arc<tiny_http::Server>,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockAdmin {
    pub fn start<F>(respond: F) -> Self
    where
        F: Fn(&str) -> (u16, String) + Send + 'static,
    {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let worker = Arc::clone(&server);
        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for mut request in worker.incoming_requests() {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body).unwrap();
                let token = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv(ACCESS_TOKEN_HEADER))
                    .map(|h| h.value.as_str().to_string());
                recorded.lock().unwrap().push(RecordedRequest {
                    token,
                    body: body.clone(),
                });

                let (status, payload) = respond(&body);
                let header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .unwrap();
                let response = tiny_http::Response::from_string(payload)
                    .with_status_code(status)
                    .with_header(header);
                if let Err(err) = request.respond(response) {
                    eprintln!("mock admin failed to respond: {err}");
                }
            }
        });

        Self { server, requests }
    }

    pub fn endpoint(&self) -> String {
        let addr = self.server.server_addr().to_ip().unwrap();
        format!("http://{addr}/admin/api/2024-01/graphql.json")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Drop for MockAdmin {
    fn drop(&mut self) {
        self.server.unblock();
    }
}

/// Wire response for the acceptance store
pub fn acceptance_response(body: &str) -> (u16, String) {
    if body.contains("metafieldDefinitions") {
        return (200, metafield_definitions_json());
    }
    if body.contains("metaobjectDefinitionByType") {
        return (200, fin_characteristics_json());
    }
    (400, r#"{"errors":[{"message":"unexpected query"}]}"#.to_string())
}

pub fn metafield_definitions_json() -> String {
    serde_json::json!({
        "data": {
            "metafieldDefinitions": {
                "edges": [
                    { "node": {
                        "namespace": "custom", "key": "warranty", "name": "Warranty",
                        "type": { "name": "single_line_text_field" }, "validations": []
                    }},
                    { "node": {
                        "namespace": "custom", "key": "sizing_chart", "name": "Sizing Chart",
                        "type": { "name": "url" }, "validations": []
                    }},
                    { "node": {
                        "namespace": "custom", "key": "fin_characteristics",
                        "name": "Fin Characteristics",
                        "type": { "name": "metaobject_reference" }, "validations": []
                    }}
                ]
            }
        }
    })
    .to_string()
}

pub fn fin_characteristics_json() -> String {
    let bar = |key: &str, name: &str| {
        serde_json::json!({
            "key": key, "name": name, "type": { "name": "number_integer" },
            "validations": [
                { "name": "min", "value": "0" },
                { "name": "max", "value": "100" }
            ]
        })
    };
    let text = |key: &str, name: &str| {
        serde_json::json!({
            "key": key, "name": name, "type": { "name": "single_line_text_field" },
            "validations": []
        })
    };
    serde_json::json!({
        "data": {
            "metaobjectDefinitionByType": {
                "type": "fin_characteristics",
                "name": "Fin Characteristics",
                "fieldDefinitions": [
                    bar("rake", "Rake"),
                    bar("area", "Area"),
                    bar("speed", "Speed"),
                    bar("flex", "Flex"),
                    text("form_text", "Form Text"),
                    text("function_text", "Function Text"),
                    text("feel_text", "Feel Text"),
                    text("overall_text", "Overall Text")
                ]
            }
        }
    })
    .to_string()
}
