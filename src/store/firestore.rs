//! Firestore REST backend
//!
//! Talks to the Firestore v1 REST API. Documents are created through
//! `documents:commit` so `DataSubmitted` can be set by a server-side
//! `REQUEST_TIME` transform; listing follows `nextPageToken` until the
//! whole collection has been read.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{DocumentStore, NewDocument, StoreError, StoredDocument};

/// Connection settings for a Firestore project
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// API root, e.g. `https://firestore.googleapis.com`
    pub base_url: String,
    pub project_id: String,
    /// Database id, `(default)` for most projects
    pub database: String,
    /// Web API key; requests go unauthenticated when absent
    pub api_key: Option<String>,
    pub request_timeout_ms: u64,
    /// Documents per list page
    pub page_size: u32,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://firestore.googleapis.com".to_string(),
            project_id: String::new(),
            database: "(default)".to_string(),
            api_key: None,
            request_timeout_ms: 10_000,
            page_size: 300,
        }
    }
}

/// Firestore-backed [`DocumentStore`]
pub struct FirestoreStore {
    client: Client,
    config: FirestoreConfig,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// `projects/{p}/databases/{db}/documents`
    fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.config.project_id, self.config.database
        )
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) if !key.is_empty() => request.query(&[("key", key.as_str())]),
            _ => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = self
            .with_key(request)
            .send()
            .await
            .map_err(StoreError::from_reqwest)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(StoreError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn add(&self, collection: &str, doc: NewDocument) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let name = format!("{}/{}/{}", self.documents_root(), collection, id);
        let body = commit_body(&name, &doc);

        let url = self.api_url(&format!("{}:commit", self.documents_root()));
        self.send(self.client.post(&url).json(&body)).await?;

        tracing::debug!(collection = %collection, doc_id = %id, "Committed document to Firestore");
        Ok(id)
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let url = self.api_url(&format!(
            "{}/{}",
            self.documents_root(),
            urlencoding::encode(collection)
        ));

        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", self.config.page_size.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let page: ListResponse = self
                .send(request)
                .await?
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;

            match page.merge_into(&mut documents) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(collection = %collection, count = documents.len(), "Listed Firestore documents");
        Ok(documents)
    }
}

fn commit_body(name: &str, doc: &NewDocument) -> Value {
    let fields: Map<String, Value> = doc
        .fields
        .iter()
        .map(|(k, v)| (k.clone(), to_firestore_value(v)))
        .collect();

    let transforms: Vec<Value> = doc
        .server_timestamps
        .iter()
        .map(|field| json!({ "fieldPath": field, "setToServerValue": "REQUEST_TIME" }))
        .collect();

    json!({
        "writes": [{
            "update": { "name": name, "fields": fields },
            "updateTransforms": transforms,
            "currentDocument": { "exists": false }
        }]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl ListResponse {
    /// Append this page's documents, returning the token for the next page
    fn merge_into(self, documents: &mut Vec<StoredDocument>) -> Option<String> {
        documents.extend(self.documents.into_iter().map(FirestoreDocument::into_stored));
        self.next_page_token.filter(|token| !token.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreDocument {
    fn into_stored(self) -> StoredDocument {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        StoredDocument {
            id,
            fields: self
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), from_firestore_value(v)))
                .collect(),
        }
    }
}

/// Plain JSON to a Firestore typed value
fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(to_firestore_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({
            "mapValue": {
                "fields": map
                    .iter()
                    .map(|(k, v)| (k.clone(), to_firestore_value(v)))
                    .collect::<Map<String, Value>>()
            }
        }),
    }
}

/// Firestore typed value to plain JSON. Timestamps and references become
/// strings.
fn from_firestore_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|m| m.iter().next()) else {
        return Value::Null;
    };

    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => inner.clone(),
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or_else(|_| inner.clone()),
            other => other.clone(),
        },
        "doubleValue" => inner.clone(),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(from_firestore_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(|fields| {
                    fields
                        .iter()
                        .map(|(k, v)| (k.clone(), from_firestore_value(v)))
                        .collect()
                })
                .unwrap_or_default(),
        ),
        _ => inner.clone(),
    }
}
