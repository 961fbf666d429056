use gl::types::GLuint;

use crate::backend::{BufferUsage, Gl};
use crate::GlError;

pub struct GeometryBuilder<'a> {
    attribute: Option<(GLuint, VertexAttribute)>,
    data: &'a [f32],
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attribute: None,
        }
    }

    /// Data is read as one tightly packed attribute at `location`.
    pub fn with_attribute(mut self, location: GLuint, attr: VertexAttribute) -> Self {
        self.attribute = Some((location, attr));
        self
    }

    /// Uploads the data into a fresh array buffer and describes the attribute.
    ///
    /// The buffer stays bound, the attribute pointer refers to it.
    pub fn build<G: Gl>(self, gl: &G) -> Result<Geometry<G>, GlError> {
        let (location, attr) = self.attribute.ok_or(GlError::InvalidDataLength)?;

        if self.data.len() % attr.size() != 0 {
            return Err(GlError::InvalidDataLength);
        }

        let vbo = gl.create_buffer();
        if vbo == 0 {
            return Err(GlError::Creation("buffer"));
        }

        gl.bind_array_buffer(vbo);
        gl.array_buffer_data(self.data, BufferUsage::StaticDraw);

        gl.enable_vertex_attrib_array(location);
        gl.vertex_attrib_pointer(location, attr.size() as i32, false, 0, 0);

        let vertices = self.data.len() / attr.size();

        log::debug!("Uploaded {vertices} vertices into buffer {vbo}");

        Ok(Geometry {
            gl: gl.clone(),
            vbo,
            vertices,
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VertexAttribute {
    Vec2,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Vec2 => 2,
        }
    }
}

/// Vertex buffer, deleted on drop.
pub struct Geometry<G: Gl> {
    gl: G,
    vbo: GLuint,
    vertices: usize,
}

impl<G: Gl> Geometry<G> {
    pub fn vbo(&self) -> GLuint {
        self.vbo
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }
}

impl<G: Gl> Drop for Geometry<G> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.vbo);
    }
}
