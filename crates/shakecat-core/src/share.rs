//! Share/export of a revealed message.
//!
//! The host supplies two targets: a native share sheet and a clipboard.
//! Native is tried first; only an `Unsupported` native target falls through
//! to the clipboard. Every failure ends as a [`ShareOutcome`], never an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

pub const MESSAGE_PLACEHOLDER: &str = "{message}";

pub const DEFAULT_TITLE: &str = "Котик с подарками";

pub const DEFAULT_TEMPLATE: &str =
    "Моё предсказание: {message} 🎁✨\n\nПопробуй и ты получить предсказание от котика!";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareTemplate {
    title: String,
    template: String,
}

impl Default for ShareTemplate {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl ShareTemplate {
    pub fn new(title: &str, template: &str) -> Result<Self> {
        if !template.contains(MESSAGE_PLACEHOLDER) {
            return Err(CoreError::InvalidTemplate(format!(
                "template must contain {MESSAGE_PLACEHOLDER}"
            )));
        }
        Ok(Self {
            title: title.to_string(),
            template: template.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn render(&self, message: &str) -> ShareRequest {
        ShareRequest {
            title: self.title.clone(),
            text: self.template.replace(MESSAGE_PLACEHOLDER, message),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    Unsupported,
    Cancelled,
    Failed(String),
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareError::Unsupported => write!(f, "share target unsupported"),
            ShareError::Cancelled => write!(f, "share cancelled"),
            ShareError::Failed(msg) => write!(f, "share failed: {msg}"),
        }
    }
}

impl std::error::Error for ShareError {}

pub trait ShareTarget {
    fn share(&mut self, request: &ShareRequest) -> std::result::Result<(), ShareError>;
}

/// A platform with no share capability of this kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoShare;

impl ShareTarget for NoShare {
    fn share(&mut self, _request: &ShareRequest) -> std::result::Result<(), ShareError> {
        Err(ShareError::Unsupported)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ShareOutcome {
    Shared,
    Copied,
    /// Nothing to share: no message is revealed.
    NothingRevealed,
    /// Cancelled or failed. Swallowed; the reason is kept for logging only.
    Dropped { reason: String },
}

/// Native first, clipboard only when native is unsupported.
pub fn share_with_fallback(
    native: &mut dyn ShareTarget,
    clipboard: &mut dyn ShareTarget,
    request: &ShareRequest,
) -> ShareOutcome {
    match native.share(request) {
        Ok(()) => ShareOutcome::Shared,
        Err(ShareError::Unsupported) => match clipboard.share(request) {
            Ok(()) => ShareOutcome::Copied,
            Err(e) => ShareOutcome::Dropped {
                reason: e.to_string(),
            },
        },
        Err(e) => ShareOutcome::Dropped {
            reason: e.to_string(),
        },
    }
}
