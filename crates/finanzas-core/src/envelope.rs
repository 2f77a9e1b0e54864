//! Response envelopes
//!
//! Two conventions coexist on the backend:
//! - `{isSuccess, value, error: {message}}` ([`ApiEnvelope`])
//! - `{data}` ([`DataEnvelope`])
//!
//! Each resource declares which one it speaks through [`EnvelopeKind`].

use crate::error::EnvelopeError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Error body inside a failed [`ApiEnvelope`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
    /// Machine-readable code
    #[serde(default)]
    pub code: Option<String>,
}

/// Discriminated success/error envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    /// Whether the call succeeded
    pub is_success: bool,
    /// Payload on success
    #[serde(default = "Option::default")]
    pub value: Option<T>,
    /// Failure details
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope around `value`
    #[inline]
    #[must_use]
    pub fn success(value: T) -> Self {
        Self {
            is_success: true,
            value: Some(value),
            error: None,
        }
    }

    /// Failed envelope carrying `message`
    #[inline]
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            value: None,
            error: Some(ApiErrorBody {
                message: Some(message.into()),
                code: None,
            }),
        }
    }

    /// Server message of a failed envelope, with a generic fallback
    #[must_use]
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .and_then(|e| e.message.clone())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "La operación no se pudo completar".to_string())
    }

    /// Unwrap the value
    ///
    /// # Errors
    /// - `EnvelopeError::Failure` when `isSuccess` is false
    /// - `EnvelopeError::MissingValue` when a success carries no value
    pub fn into_result(self) -> Result<T, EnvelopeError> {
        if !self.is_success {
            return Err(EnvelopeError::Failure(self.error_message()));
        }
        self.value.ok_or(EnvelopeError::MissingValue)
    }
}

/// `{data}` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    /// Payload
    pub data: T,
}

/// Which envelope a resource uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeKind {
    /// `{isSuccess, value, error}`
    Result,
    /// `{data}`
    Data,
}

impl EnvelopeKind {
    /// Decode `body` and extract the payload
    ///
    /// # Errors
    /// Shape mismatch, or a failed `Result` envelope.
    pub fn unwrap<T: DeserializeOwned>(self, body: serde_json::Value) -> Result<T, EnvelopeError> {
        match self {
            EnvelopeKind::Result => serde_json::from_value::<ApiEnvelope<T>>(body)?.into_result(),
            EnvelopeKind::Data => Ok(serde_json::from_value::<DataEnvelope<T>>(body)?.data),
        }
    }

    /// Check a body whose payload is irrelevant (deletes, toggles without echo)
    ///
    /// # Errors
    /// A failed `Result` envelope. Anything else is accepted.
    pub fn ensure_success(self, body: &serde_json::Value) -> Result<(), EnvelopeError> {
        if self == EnvelopeKind::Data || body.is_null() {
            return Ok(());
        }
        match serde_json::from_value::<ApiEnvelope<serde_json::Value>>(body.clone()) {
            Ok(envelope) if !envelope.is_success => {
                Err(EnvelopeError::Failure(envelope.error_message()))
            }
            _ => Ok(()),
        }
    }
}

/// One page of a paginated listing
///
/// A body without `totalCount` counts the items it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    from = "RawPage<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Page<T> {
    /// Rows of this page
    pub items: Vec<T>,
    /// Rows across all pages
    pub total_count: u64,
    /// 1-based page number
    pub page: u32,
    /// Requested page size, 0 when the server omits it
    pub page_size: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage<T> {
    #[serde(default = "Vec::new", alias = "data")]
    items: Vec<T>,
    #[serde(default, alias = "totalRecords")]
    total_count: Option<u64>,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default)]
    page_size: u32,
}

impl<T> From<RawPage<T>> for Page<T> {
    fn from(raw: RawPage<T>) -> Self {
        Self {
            total_count: raw.total_count.unwrap_or(raw.items.len() as u64),
            items: raw.items,
            page: raw.page,
            page_size: raw.page_size,
        }
    }
}

fn default_page() -> u32 {
    1
}

impl<T> Page<T> {
    /// Number of pages for `total_count` at `page_size`
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return u64::from(self.total_count > 0);
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    /// Whether a later page exists
    #[inline]
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}
