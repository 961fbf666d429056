use gl::types::GLuint;

use crate::backend::{Gl, Primitive};
use crate::geometry::Geometry;
use crate::program::Program;

/// Parameters of an issued draw call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub mode: Primitive,
    pub first: i32,
    pub count: i32,
}

pub struct GlRenderer<G: Gl> {
    gl: G,
    current_program: GLuint,
}

impl<G: Gl> GlRenderer<G> {
    pub fn new(gl: &G) -> Self {
        Self {
            gl: gl.clone(),
            current_program: 0,
        }
    }

    pub fn use_program(&mut self, program: &Program<G>) {
        let p_id = program.get_id();
        if self.current_program != p_id {
            self.gl.use_program(p_id);
            self.current_program = p_id;
        }
    }

    /// Draws the whole geometry as a triangle list.
    ///
    /// Attribute pointers are taken from the currently bound array buffer.
    pub fn draw(&mut self, geometry: &Geometry<G>, program: &Program<G>) -> DrawCall {
        self.use_program(program);

        let call = DrawCall {
            mode: Primitive::Triangles,
            first: 0,
            count: geometry.vertices() as i32,
        };

        self.gl.draw_arrays(call.mode, call.first, call.count);

        call
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    /// Clears both the color and depth buffer.
    pub fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
    }
}
