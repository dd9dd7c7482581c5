//! Pure request builders and the response envelope.
//!
//! Builders never touch the network, so hosts can build a request on the UI
//! side, ship it to a worker, and hand the response back to the owner.

use crate::api::{ApiError, ApiResult};
use crate::model::resource::{FieldValue, RecordId, Resource};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// One API call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the base URL, without a leading slash.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// `GET <resource>/`, optionally filtered by parent identity.
    pub fn list<R: Resource>(parent: Option<RecordId>) -> Self {
        let spec = R::spec();
        let query = match (spec.parent_param, parent) {
            (Some(param), Some(parent_id)) => vec![(param.to_string(), parent_id.to_string())],
            _ => Vec::new(),
        };
        Self {
            method: Method::Get,
            path: spec.collection_path(),
            query,
            body: None,
        }
    }

    /// `GET <resource>/<id>`.
    pub fn retrieve<R: Resource>(id: RecordId) -> Self {
        Self {
            method: Method::Get,
            path: R::spec().record_path(id),
            query: Vec::new(),
            body: None,
        }
    }

    /// `POST <resource>/` with the record's editable fields.
    pub fn create<R: Resource>(fields: Map<String, Value>) -> Self {
        Self {
            method: Method::Post,
            path: R::spec().collection_path(),
            query: Vec::new(),
            body: Some(Value::Object(fields)),
        }
    }

    /// `PATCH <resource>/<id>` naming exactly one attribute.
    pub fn patch_field<R: Resource>(id: RecordId, key: &str, value: &FieldValue) -> Self {
        let mut body = Map::new();
        body.insert(key.to_string(), value.to_json());
        Self {
            method: Method::Patch,
            path: R::spec().record_path(id),
            query: Vec::new(),
            body: Some(Value::Object(body)),
        }
    }

    /// `DELETE <resource>/<id>`, no body.
    pub fn delete<R: Resource>(id: RecordId) -> Self {
        Self {
            method: Method::Delete,
            path: R::spec().record_path(id),
            query: Vec::new(),
            body: None,
        }
    }
}

/// Raw response as returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Converts a non-2xx response into its taxonomy error.
    pub fn into_result(self) -> ApiResult<Self> {
        match ApiError::from_status(self.status, self.body.as_str()) {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
