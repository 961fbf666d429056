use thiserror::Error;

use gl_wrapper::GlError;

pub mod mount;
pub mod scene;
pub mod setup;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),
    #[error(transparent)]
    Gl(#[from] GlError),
}
