use std::ffi::CString;
use std::fmt::{Display, Formatter};

use gl::types::{GLenum, GLuint};

use crate::backend::Gl;
use crate::GlError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    pub const fn as_gl(&self) -> GLenum {
        match self {
            ShaderKind::Vertex => gl::VERTEX_SHADER,
            ShaderKind::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl Display for ShaderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderKind::Vertex => write!(f, "vertex"),
            ShaderKind::Fragment => write!(f, "fragment"),
        }
    }
}

/// Successfully compiled shader stage, deleted on drop.
pub struct Shader<G: Gl> {
    gl: G,
    id: GLuint,
}

impl<G: Gl> Shader<G> {
    /// Creates, sources and compiles a shader.
    ///
    /// A stage that fails to compile has its info log written to the error
    /// log and is deleted before the error is returned.
    pub fn compile(gl: &G, kind: ShaderKind, src: &str) -> Result<Self, GlError> {
        let src = CString::new(src)?;

        let id = gl.create_shader(kind);
        if id == 0 {
            return Err(GlError::Creation("shader"));
        }

        gl.shader_source(id, &src);
        gl.compile_shader(id);

        if !gl.compile_status(id) {
            let log = gl.shader_info_log(id);
            log::error!("Could not compile {kind} shader:\n{log}");
            gl.delete_shader(id);

            return Err(GlError::Compilation { kind, log });
        }

        log::debug!("Compiled {kind} shader {id}");

        Ok(Self {
            gl: gl.clone(),
            id,
        })
    }

    pub fn get_id(&self) -> GLuint {
        self.id
    }

}

impl<G: Gl> Drop for Shader<G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id)
    }
}
