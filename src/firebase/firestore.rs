//! Firestore REST client for the inventory and the token registry.
//!
//! Products are read with a `runQuery` structured query filtering on status
//! and expiry date (the store compares the zero-padded `YYYY-MM-DD` strings
//! lexicographically, which matches calendar order). Registrations are read
//! with a collection-group query across all `users/{uid}/tokens` scopes and
//! deleted individually by document path.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::error;

use crate::buckets::DATE_FORMAT;
use crate::config::AlertConfig;
use crate::errors::{AlertError, AlertResult};
use crate::store::{DeviceRegistration, Product, ProductStore, TokenRegistry};

/// REST client bound to one project and one access token (one job run).
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    http: Client,
    base_url: String,
    project_id: String,
    access_token: String,
    products_collection: String,
    tokens_collection: String,
}

impl FirestoreClient {
    pub fn new(
        http: Client,
        config: &AlertConfig,
        project_id: String,
        access_token: String,
    ) -> Self {
        Self {
            http,
            base_url: config.endpoints.firestore_base.clone(),
            project_id,
            access_token,
            products_collection: config.firestore.products_collection.clone(),
            tokens_collection: config.firestore.tokens_collection.clone(),
        }
    }

    fn documents_root(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }

    /// Issue a `runQuery` and return the matched document objects.
    async fn run_query(&self, body: Value) -> AlertResult<Vec<Value>> {
        let url = format!("{}:runQuery", self.documents_root());

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AlertError::Store(format!("runQuery request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            error!("Firestore runQuery returned {status}");
            return Err(AlertError::Store(format!("runQuery returned {status}")));
        }

        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| AlertError::Store(format!("malformed runQuery response: {e}")))?;

        // Rows without a "document" key carry only a read time; skip them.
        Ok(rows
            .into_iter()
            .filter_map(|mut row| match row.get_mut("document") {
                Some(doc) => Some(doc.take()),
                None => None,
            })
            .collect())
    }
}

#[async_trait]
impl ProductStore for FirestoreClient {
    async fn expiring_products(
        &self,
        today: NaiveDate,
        horizon_days: u32,
    ) -> AlertResult<Vec<Product>> {
        let cutoff = (today + Duration::days(horizon_days as i64))
            .format(DATE_FORMAT)
            .to_string();

        let documents = self
            .run_query(products_query(&self.products_collection, &cutoff))
            .await?;

        Ok(documents.iter().filter_map(decode_product).collect())
    }
}

#[async_trait]
impl TokenRegistry for FirestoreClient {
    async fn all_registrations(&self) -> AlertResult<Vec<DeviceRegistration>> {
        let documents = self
            .run_query(registrations_query(&self.tokens_collection))
            .await?;

        Ok(documents.iter().filter_map(decode_registration).collect())
    }

    async fn delete_registration(&self, doc_path: &str) -> AlertResult<()> {
        let url = format!("{}/v1/{}", self.base_url, doc_path);

        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| AlertError::Store(format!("delete request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AlertError::Store(format!(
                "delete of {doc_path} returned {status}"
            )));
        }

        Ok(())
    }
}

/// Structured query for active products expiring on or before `cutoff`.
pub(crate) fn products_query(collection: &str, cutoff: &str) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "compositeFilter": {
                    "op": "AND",
                    "filters": [
                        {
                            "fieldFilter": {
                                "field": { "fieldPath": "status" },
                                "op": "EQUAL",
                                "value": { "stringValue": "ACTIVE" }
                            }
                        },
                        {
                            "fieldFilter": {
                                "field": { "fieldPath": "expiryDate" },
                                "op": "LESS_THAN_OR_EQUAL",
                                "value": { "stringValue": cutoff }
                            }
                        }
                    ]
                }
            }
        }
    })
}

/// Collection-group query returning every registration across all users.
pub(crate) fn registrations_query(collection: &str) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection, "allDescendants": true }]
        }
    })
}

fn string_field(document: &Value, name: &str) -> Option<String> {
    document
        .get("fields")?
        .get(name)?
        .get("stringValue")?
        .as_str()
        .map(String::from)
}

/// Decode a product document. Status defaults to empty and the expiry date
/// stays optional; malformed dates are excluded downstream by the bucket
/// calculator rather than here.
pub(crate) fn decode_product(document: &Value) -> Option<Product> {
    document.get("fields")?;
    Some(Product {
        status: string_field(document, "status").unwrap_or_default(),
        expiry_date: string_field(document, "expiryDate"),
    })
}

/// Token lookup for a registration document: the document's own id (last
/// path segment) when present, else the string field named `token`. Records
/// with neither are dropped.
fn registration_token(document: &Value) -> Option<String> {
    let doc_id = document
        .get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .filter(|id| !id.is_empty());

    if let Some(id) = doc_id {
        return Some(id.to_string());
    }

    string_field(document, "token").filter(|t| !t.is_empty())
}

/// Decode a registration document into a token plus its deletable path.
pub(crate) fn decode_registration(document: &Value) -> Option<DeviceRegistration> {
    let doc_path = document.get("name")?.as_str()?.to_string();
    let token = registration_token(document)?;
    Some(DeviceRegistration { token, doc_path })
}
