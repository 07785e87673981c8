//! Shared plumbing for the v1 resource managers

use super::patch::Patch;
use crate::client::error::{Error, Result};
use crate::client::transport::{Headers, Method, Response, Transport};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// API version prefix for every path
pub const API_PREFIX: &str = "/v1";

/// Collection path, e.g. `/v1/nodes`
pub fn collection_path(collection: &str) -> String {
    format!("{}/{}", API_PREFIX, collection)
}

/// Path of one resource. The identifier is encoded as a single path segment.
///
/// Empty, `.` and `..` identifiers are rejected: URL resolution would turn
/// them into the collection or its parent.
pub fn resource_path(collection: &str, id: &str) -> Result<String> {
    if matches!(id, "" | "." | "..") {
        return Err(Error::InvalidArgument(format!(
            "'{}' is not a valid {} identifier",
            id, collection
        )));
    }
    Ok(format!(
        "{}/{}",
        collection_path(collection),
        urlencoding::encode(id)
    ))
}

/// Path below one resource, e.g. `/v1/nodes/{id}/ports`
pub fn nested_path(collection: &str, id: &str, rest: &str) -> Result<String> {
    Ok(format!(
        "{}/{}",
        resource_path(collection, id)?,
        rest.trim_start_matches('/')
    ))
}

/// Decode a record timestamp.
///
/// Accepts RFC 3339 with an offset, or a naive ISO 8601 time taken as UTC.
pub(crate) fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

/// Issues requests for a manager and decodes the responses.
///
/// Every method performs exactly one transport call.
#[derive(Clone)]
pub(crate) struct Manager {
    transport: Arc<dyn Transport>,
}

impl Manager {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub(crate) async fn list<R: DeserializeOwned>(&self, path: &str, key: &str) -> Result<Vec<R>> {
        let response = self.transport.get(path, &Headers::new()).await?;
        let body = expect_body(Method::Get, path, response)?;

        let Value::Object(mut map) = body else {
            return Err(missing_key(key, path));
        };
        let items = map.remove(key).ok_or_else(|| missing_key(key, path))?;

        decode(path, items)
    }

    pub(crate) async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self.transport.get(path, &Headers::new()).await?;
        decode(path, expect_body(Method::Get, path, response)?)
    }

    pub(crate) async fn create<R, B>(&self, path: &str, fields: &B) -> Result<R>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(fields).map_err(Error::Encode)?;
        let response = self
            .transport
            .post(path, &Headers::new(), Some(&body))
            .await?;
        decode(path, expect_body(Method::Post, path, response)?)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.transport.delete(path, &Headers::new()).await?;
        Ok(())
    }

    pub(crate) async fn update<R: DeserializeOwned>(&self, path: &str, patch: &Patch) -> Result<R> {
        let body = patch.to_value()?;
        let response = self
            .transport
            .patch(path, &Headers::new(), Some(&body))
            .await?;
        decode(path, expect_body(Method::Patch, path, response)?)
    }

    pub(crate) async fn put<R: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<R> {
        let response = self.transport.put(path, &Headers::new(), Some(body)).await?;
        decode(path, expect_body(Method::Put, path, response)?)
    }
}

fn expect_body(method: Method, path: &str, response: Response) -> Result<Value> {
    match response.body {
        Some(Value::Null) | None => Err(Error::EmptyBody {
            method,
            path: path.to_string(),
        }),
        Some(body) => Ok(body),
    }
}

fn missing_key(key: &str, path: &str) -> Error {
    Error::MissingKey {
        key: key.to_string(),
        path: path.to_string(),
    }
}

fn decode<R: DeserializeOwned>(path: &str, value: Value) -> Result<R> {
    serde_json::from_value(value).map_err(|source| Error::Decode {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(collection_path("nodes"), "/v1/nodes");
        assert_eq!(resource_path("ports", "abc").unwrap(), "/v1/ports/abc");
        assert_eq!(
            nested_path("nodes", "abc", "state/power").unwrap(),
            "/v1/nodes/abc/state/power"
        );
    }

    #[test]
    fn test_identifier_cannot_add_segments() {
        assert_eq!(resource_path("nodes", "a/b").unwrap(), "/v1/nodes/a%2Fb");
        assert_eq!(resource_path("nodes", "../x").unwrap(), "/v1/nodes/..%2Fx");
    }

    #[test]
    fn test_dot_segment_identifiers_are_rejected() {
        for id in ["", ".", ".."] {
            let err = resource_path("nodes", id).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{:?}", id);
            assert!(nested_path("nodes", id, "ports").is_err());
        }
        assert_eq!(resource_path("nodes", "...").unwrap(), "/v1/nodes/...");
    }

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(default, deserialize_with = "deserialize_timestamp")]
        at: Option<DateTime<Utc>>,
    }

    fn stamp(value: Value) -> Option<DateTime<Utc>> {
        serde_json::from_value::<Stamped>(value).unwrap().at
    }

    #[test]
    fn test_timestamps_with_and_without_offset() {
        let with_offset = stamp(serde_json::json!({"at": "2013-09-12T12:00:00+02:00"}));
        let naive = stamp(serde_json::json!({"at": "2013-09-12T10:00:00.000123"}));
        assert_eq!(with_offset.unwrap().to_rfc3339(), "2013-09-12T10:00:00+00:00");
        assert_eq!(naive.unwrap().timestamp(), with_offset.unwrap().timestamp());
        assert_eq!(stamp(serde_json::json!({"at": null})), None);
        assert_eq!(stamp(serde_json::json!({})), None);
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        assert!(serde_json::from_value::<Stamped>(serde_json::json!({"at": "yesterday"})).is_err());
    }

    #[test]
    fn test_expect_body_rejects_null() {
        let err = expect_body(
            Method::Get,
            "/v1/nodes/x",
            Response::json(Value::Null),
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyBody { .. }));
    }
}
