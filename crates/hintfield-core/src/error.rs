use thiserror::Error;

use crate::ViewId;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("layout failed: {0}")]
    Layout(String),
    #[error("no text input with state key {0}")]
    UnknownInput(ViewId),
    #[error("no text input is focused")]
    NoFocus,
}

impl From<taffy::TaffyError> for UiError {
    fn from(e: taffy::TaffyError) -> Self {
        UiError::Layout(e.to_string())
    }
}

pub type UiResult<T> = Result<T, UiError>;
