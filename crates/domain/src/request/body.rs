//! HTTP Request body types

use serde::{Deserialize, Serialize};

/// Content type sent with every XML payload.
pub const XML_CONTENT_TYPE: &str = "application/xml";

/// The kind of request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestBodyKind {
    /// No body
    #[default]
    None,
    /// Raw text body with an explicit content type
    Raw {
        /// The content type (e.g., "application/xml")
        content_type: String,
    },
}

/// HTTP request body with content and type information.
///
/// An XML body with empty content is still sent with its content type;
/// the contract checks that the service rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequestBody {
    /// The kind of body
    pub kind: RequestBodyKind,
    /// The body content as a string
    #[serde(default)]
    pub content: String,
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: RequestBodyKind::None,
            content: String::new(),
        }
    }

    /// Creates an XML body. The content is sent verbatim, well-formed or not.
    #[must_use]
    pub fn xml(content: impl Into<String>) -> Self {
        Self {
            kind: RequestBodyKind::Raw {
                content_type: XML_CONTENT_TYPE.to_string(),
            },
            content: content.into(),
        }
    }

    /// Returns whether the body has no content.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // String::is_empty is not const
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, RequestBodyKind::None) || self.content.is_empty()
    }

    /// Returns the content type if applicable.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        match &self.kind {
            RequestBodyKind::None => None,
            RequestBodyKind::Raw { content_type } => Some(content_type),
        }
    }
}
