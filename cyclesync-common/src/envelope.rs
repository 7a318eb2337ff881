use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The uniform `{success, message?, data?}` response shape every backend
/// endpoint replies with. `message` and `data` are omitted from the wire
/// when absent.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// An envelope that arrived with `success == false`, carrying whatever
/// message the server attached.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The server rejected the request: {}", .message.as_deref().unwrap_or("no message given"))]
pub struct Rejection {
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    #[must_use]
    pub fn success_empty() -> Self {
        Self {
            success: true,
            message: None,
            data: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn into_result(self) -> Result<Option<T>, Rejection> {
        if self.success {
            Ok(self.data)
        } else {
            Err(Rejection {
                message: self.message,
            })
        }
    }
}
