//! Backend-to-UI events and error modeling for the desktop GUI controller.

use client_core::LookupError;
use shared::protocol::LookupData;
use uuid::Uuid;

use crate::ui::map::tiles::{TileImage, TileKey};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    LookupSettled {
        request_id: Uuid,
        outcome: Result<LookupData, LookupError>,
    },
    TileLoaded {
        key: TileKey,
        image: TileImage,
    },
    TileFailed {
        key: TileKey,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Configuration,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    General,
}

/// Status-banner error raised outside the lookup form itself.
#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("url")
            || message_lower.contains("scheme")
            || message_lower.contains("runtime")
            || message_lower.contains("config")
        {
            UiErrorCategory::Configuration
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("dns")
            || message_lower.contains("disconnect")
            || message_lower.contains("queue")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Banner text; startup failures get a hint since nothing works until relaunch.
    pub fn banner_text(&self) -> String {
        match (self.context, self.category) {
            (UiErrorContext::BackendStartup, UiErrorCategory::Configuration) => format!(
                "Backend worker startup failure: {}. Check the configured server URL and relaunch.",
                self.message
            ),
            (UiErrorContext::BackendStartup, _) => {
                format!("Backend worker startup failure: {}", self.message)
            }
            _ => self.message.clone(),
        }
    }
}
