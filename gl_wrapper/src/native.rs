use std::ffi::{c_char, c_void, CStr};

use gl::types::{GLbitfield, GLint, GLsizei, GLuint};

use crate::backend::{BufferUsage, Gl, Primitive};
use crate::shader::ShaderKind;

/// [`Gl`] backed by the function pointers of the `gl` crate.
///
/// The pointers are process global, so the handle itself carries no data. It
/// can only be obtained through [`NativeGl::load_with`], after a context has
/// been made current.
#[derive(Debug, Copy, Clone)]
pub struct NativeGl {
    _private: (),
}

impl NativeGl {
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);

        Self { _private: () }
    }
}

fn trim_log(mut buf: Vec<u8>) -> String {
    if let Some(end) = buf.iter().position(|b| *b == 0) {
        buf.truncate(end);
    }

    String::from_utf8_lossy(&buf).trim_end().to_string()
}

impl Gl for NativeGl {
    fn create_shader(&self, kind: ShaderKind) -> GLuint {
        unsafe { gl::CreateShader(kind.as_gl()) }
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        unsafe {
            gl::ShaderSource(
                shader,
                1,
                (&source.as_ptr()) as *const *const c_char,
                std::ptr::null(),
            );
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        let mut success: GLint = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut GLint) };
        success == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len: GLint = 0;

        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint);

            let mut buf = vec![0_u8; len.max(1) as usize];
            gl::GetShaderInfoLog(
                shader,
                buf.len() as GLsizei,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut c_char,
            );

            trim_log(buf)
        }
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn link_status(&self, program: GLuint) -> bool {
        let mut success: GLint = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut GLint) };
        success == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len: GLint = 0;

        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint);

            let mut buf = vec![0_u8; len.max(1) as usize];
            gl::GetProgramInfoLog(
                program,
                buf.len() as GLsizei,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut c_char,
            );

            trim_log(buf)
        }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn attrib_location(&self, program: GLuint, name: &CStr) -> Option<GLuint> {
        let location = unsafe { gl::GetAttribLocation(program, name.as_ptr()) };
        GLuint::try_from(location).ok()
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> Option<GLint> {
        let location = unsafe { gl::GetUniformLocation(program, name.as_ptr()) };
        (location >= 0).then_some(location)
    }

    fn uniform_2f(&self, location: GLint, x: f32, y: f32) {
        unsafe { gl::Uniform2f(location, x, y) }
    }

    fn create_buffer(&self) -> GLuint {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, (&mut id) as *mut GLuint) };
        id
    }

    fn bind_array_buffer(&self, buffer: GLuint) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, buffer) }
    }

    fn array_buffer_data(&self, data: &[f32], usage: BufferUsage) {
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(data) as isize,
                data.as_ptr() as *const c_void,
                usage.as_gl(),
            );
        }
    }

    fn delete_buffer(&self, buffer: GLuint) {
        unsafe { gl::DeleteBuffers(1, (&buffer) as *const GLuint) }
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        size: GLint,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    ) {
        let normalized = if normalized { gl::TRUE } else { gl::FALSE };

        unsafe {
            gl::VertexAttribPointer(
                index,
                size,
                gl::FLOAT,
                normalized,
                stride,
                offset as *const c_void,
            );
        }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear(&self, mask: GLbitfield) {
        unsafe { gl::Clear(mask) }
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { gl::Viewport(x, y, width, height) }
    }

    fn draw_arrays(&self, mode: Primitive, first: GLint, count: GLsizei) {
        unsafe { gl::DrawArrays(mode.as_gl(), first, count) }
    }
}
