use std::io;

use thiserror::Error;

/// Fatal failures raised while constructing a screen. No partially initialised
/// screen is ever returned alongside one of these.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("invalid screen configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot create window: {0}")]
    Backend(#[from] io::Error),
    #[error("could not create a {major}.{minor} graphics context: {reason}")]
    Context {
        major: u32,
        minor: u32,
        reason: String,
    },
}

/// Failure raised by a widget notification handler or a screen callback.
///
/// The dispatcher logs these and reports the event as not consumed.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl WidgetError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Outcome of a notification: `Ok(true)` when the event was consumed.
pub type HandlerResult<T = bool> = Result<T, WidgetError>;
