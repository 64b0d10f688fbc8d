use thiserror::Error;

use crate::shader::Stage;

/// Failures while opening the window or its rendering context.
#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("failed to create window: {0}")]
    WindowCreation(String),

    #[error("failed to create rendering context: {0}")]
    Context(String),
}

impl SessionError {
    pub(crate) fn window_creation(err: impl std::fmt::Display) -> Self {
        Self::WindowCreation(err.to_string())
    }

    pub(crate) fn context(err: impl std::fmt::Display) -> Self {
        Self::Context(err.to_string())
    }
}

#[derive(Debug, Error)]
pub(crate) enum ShaderError {
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: Stage, log: String },

    #[error("shader program failed to link:\n{log}")]
    Link { log: String },
}
