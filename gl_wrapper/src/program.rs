use std::ffi::CString;

use gl::types::{GLint, GLuint};

use crate::backend::Gl;
use crate::shader::{Shader, ShaderKind};
use crate::GlError;

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
        }
    }

    /// Compiles both stages and links them.
    ///
    /// Stops at the first failing step. Shaders compiled before the failure
    /// are deleted, the fragment stage is never compiled when the vertex stage
    /// fails and nothing is linked unless both compiled.
    pub fn build<G: Gl>(self, gl: &G) -> Result<Program<G>, GlError> {
        let vert = Shader::compile(gl, ShaderKind::Vertex, self.vert)?;
        let frag = Shader::compile(gl, ShaderKind::Fragment, self.frag)?;

        Program::link(gl, &vert, &frag)
    }
}

/// Linked program, deleted on drop.
pub struct Program<G: Gl> {
    gl: G,
    id: GLuint,
}

impl<G: Gl> Program<G> {
    pub fn link(gl: &G, vert: &Shader<G>, frag: &Shader<G>) -> Result<Self, GlError> {
        let id = gl.create_program();
        if id == 0 {
            return Err(GlError::Creation("program"));
        }

        gl.attach_shader(id, vert.get_id());
        gl.attach_shader(id, frag.get_id());
        gl.link_program(id);

        if !gl.link_status(id) {
            let log = gl.program_info_log(id);
            log::error!("Could not link program:\n{log}");
            gl.delete_program(id);

            return Err(GlError::Linking(log));
        }

        log::debug!("Linked program {id}");

        Ok(Self { gl: gl.clone(), id })
    }

    pub fn get_id(&self) -> GLuint {
        self.id
    }

    pub fn attrib_location(&self, name: &str) -> Result<GLuint, GlError> {
        let c_name = CString::new(name)?;

        self.gl
            .attrib_location(self.id, &c_name)
            .ok_or_else(|| GlError::MissingAttribute(name.to_string()))
    }

    pub fn uniform_location(&self, name: &str) -> Result<GLint, GlError> {
        let c_name = CString::new(name)?;

        self.gl
            .uniform_location(self.id, &c_name)
            .ok_or_else(|| GlError::MissingUniform(name.to_string()))
    }

    /// Program has to be in use.
    pub fn set_uniform_2f(&self, location: GLint, x: f32, y: f32) {
        self.gl.uniform_2f(location, x, y);
    }
}

impl<G: Gl> Drop for Program<G> {
    fn drop(&mut self) {
        self.gl.delete_program(self.id)
    }
}
