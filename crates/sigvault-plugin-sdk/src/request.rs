//! Requests dispatched by the host to a backend, and their responses.

use crate::data::{AttributeValue, Attributes};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation requested on a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Read,
    Write,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request against a backend.
///
/// `path` is relative to the backend's mount point once the host has routed
/// it. `data` is the request body; it is empty for reads and deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Correlation ID for logging.
    pub id: String,

    /// Requested operation.
    pub operation: Operation,

    /// Request path.
    pub path: String,

    /// Request body.
    #[serde(default)]
    pub data: Attributes,

    /// Whether the caller holds root privileges. Set by the host after
    /// authentication; backends never derive it themselves.
    #[serde(default)]
    pub privileged: bool,
}

impl Request {
    /// Create a request with a fresh correlation ID and an empty body.
    pub fn new(operation: Operation, path: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            operation,
            path: path.into(),
            data: Attributes::new(),
            privileged: false,
        }
    }

    /// Create a read request.
    pub fn read(path: impl Into<String>) -> Self {
        Self::new(Operation::Read, path)
    }

    /// Create a write request carrying `data`.
    pub fn write(path: impl Into<String>, data: Attributes) -> Self {
        Self::new(Operation::Write, path).with_data(data)
    }

    /// Create a delete request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Operation::Delete, path)
    }

    /// Replace the request body.
    pub fn with_data(mut self, data: Attributes) -> Self {
        self.data = data;
        self
    }

    /// Mark the request as coming from a root-privileged caller.
    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }
}

/// Payload returned by a backend.
///
/// Backends return `Option<Response>`; `None` means the request succeeded
/// with nothing to return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Response fields.
    pub data: Attributes,
}

impl Response {
    /// Create a response from a data bag.
    pub fn new(data: Attributes) -> Self {
        Self { data }
    }

    /// Create a response with a single field.
    pub fn with_field(key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self::new(Attributes::new().with(key, value))
    }

    /// Look up a response field.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.data.get(key)
    }
}
