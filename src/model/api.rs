use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    pub error: String,
}

/// Body of responses that only carry a human readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Success envelope `{message?, data}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DataDto<T> {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    pub data: T,
}

impl<T> DataDto<T> {
    pub fn new(data: T) -> Self {
        Self {
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Some(message.into()),
            data,
        }
    }
}

/// Paginated success envelope. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    pub data: Vec<T>,
    pub total_docs: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

/// Reference to an entity given either as a bare id or as an object carrying `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum IdRef {
    Id(String),
    Object { id: String },
}

impl IdRef {
    pub fn into_id(self) -> String {
        match self {
            IdRef::Id(id) => id,
            IdRef::Object { id } => id,
        }
    }
}
