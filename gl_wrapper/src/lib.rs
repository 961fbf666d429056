use thiserror::Error;

pub mod backend;
pub mod geometry;
pub mod native;
pub mod program;
pub mod recording;
pub mod renderer;
pub mod shader;

pub use backend::{BufferUsage, Gl, Primitive};
pub use native::NativeGl;
pub use recording::{GlCall, RecordingGl};

#[derive(Debug, Error)]
pub enum GlError {
    #[error("{kind} shader failed to compile: {log}")]
    Compilation {
        kind: shader::ShaderKind,
        log: String,
    },
    #[error("program failed to link: {0}")]
    Linking(String),
    #[error("driver refused to create a {0} object")]
    Creation(&'static str),
    #[error("shader source contains a NUL byte")]
    InvalidSource(#[from] std::ffi::NulError),
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("attribute `{0}` is not active in the program")]
    MissingAttribute(String),
    #[error("uniform `{0}` is not active in the program")]
    MissingUniform(String),
}
