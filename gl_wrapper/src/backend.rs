use std::ffi::CStr;

use gl::types::{GLbitfield, GLenum, GLint, GLsizei, GLuint};

use crate::shader::ShaderKind;

/// Graphics calls issued by the wrappers in this crate.
///
/// Every method maps to exactly one GL entry point. Object names are plain
/// `GLuint`s, `0` meaning the driver could not create the object. Handles are
/// expected to be cheap to clone so that objects can keep one around and
/// release themselves on drop.
pub trait Gl: Clone {
    fn create_shader(&self, kind: ShaderKind) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &CStr);
    fn compile_shader(&self, shader: GLuint);
    fn compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn delete_program(&self, program: GLuint);
    fn use_program(&self, program: GLuint);

    /// `None` when the attribute is not active in the linked program.
    fn attrib_location(&self, program: GLuint, name: &CStr) -> Option<GLuint>;
    /// `None` when the uniform is not active in the linked program.
    fn uniform_location(&self, program: GLuint, name: &CStr) -> Option<GLint>;
    fn uniform_2f(&self, location: GLint, x: f32, y: f32);

    fn create_buffer(&self) -> GLuint;
    fn bind_array_buffer(&self, buffer: GLuint);
    fn array_buffer_data(&self, data: &[f32], usage: BufferUsage);
    fn delete_buffer(&self, buffer: GLuint);

    fn enable_vertex_attrib_array(&self, index: GLuint);
    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        size: GLint,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    );

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: GLbitfield);
    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn draw_arrays(&self, mode: Primitive, first: GLint, count: GLsizei);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferUsage {
    /// Data is uploaded once and never modified.
    StaticDraw,
}

impl BufferUsage {
    pub const fn as_gl(&self) -> GLenum {
        match self {
            BufferUsage::StaticDraw => gl::STATIC_DRAW,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
}

impl Primitive {
    pub const fn as_gl(&self) -> GLenum {
        match self {
            Primitive::Triangles => gl::TRIANGLES,
        }
    }
}
