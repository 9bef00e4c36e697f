//! JSON payloads returned by the service's own endpoints.
//!
//! # Design Decisions
//! - One struct per payload shape, serialized with serde
//! - Field names are part of the public contract (`message`, `status`)

use serde::Serialize;

/// `{"message": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{"status": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

impl StatusBody {
    pub const HEALTHY: Self = Self { status: "healthy" };
}
