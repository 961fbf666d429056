use gl_wrapper::geometry::{Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{Program, ProgramBuilder};
use gl_wrapper::renderer::{DrawCall, GlRenderer};
use gl_wrapper::Gl;

use crate::scene::{
    SurfaceSize, FRAGMENT_SHADER, POSITIONS, POSITION_ATTRIBUTE, RESOLUTION_UNIFORM,
    VERTEX_SHADER,
};
use crate::SetupError;

/// Objects created by [`draw_once`], alive for as long as the surface is mounted.
pub struct Scene<G: Gl> {
    // drop order: buffer before program
    geometry: Geometry<G>,
    program: Program<G>,
    draw: DrawCall,
}

impl<G: Gl> Scene<G> {
    pub fn program(&self) -> &Program<G> {
        &self.program
    }

    pub fn geometry(&self) -> &Geometry<G> {
        &self.geometry
    }

    pub fn draw_call(&self) -> DrawCall {
        self.draw
    }
}

/// Compiles the shaders, uploads the rectangle and draws it once.
///
/// Nothing is cleared or drawn unless the program linked and exposes both
/// the position attribute and the resolution uniform.
pub fn draw_once<G: Gl>(gl: &G, surface: SurfaceSize) -> Result<Scene<G>, SetupError> {
    let program = ProgramBuilder::new(VERTEX_SHADER, FRAGMENT_SHADER).build(gl)?;

    let position = program.attrib_location(POSITION_ATTRIBUTE)?;
    let resolution = program.uniform_location(RESOLUTION_UNIFORM)?;

    let mut renderer = GlRenderer::new(gl);

    renderer.clear_color(0.0, 0.0, 0.0, 0.0);
    renderer.resize(surface.width, surface.height);
    renderer.use_program(&program);

    let geometry = GeometryBuilder::new(&POSITIONS)
        .with_attribute(position, VertexAttribute::Vec2)
        .build(gl)?;

    program.set_uniform_2f(resolution, surface.width as f32, surface.height as f32);

    let draw = renderer.draw(&geometry, &program);

    log::info!(
        "Drew {} vertices on a {}x{} surface",
        draw.count,
        surface.width,
        surface.height
    );

    Ok(Scene {
        geometry,
        program,
        draw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gl_wrapper::recording::{GlCall, RecordingGl};
    use gl_wrapper::shader::ShaderKind;
    use gl_wrapper::{BufferUsage, GlError, Primitive};

    #[test]
    fn draw_sequence_order() {
        let gl = RecordingGl::new();

        let scene = draw_once(&gl, SurfaceSize::new(640, 480)).unwrap();
        let program = scene.program().get_id();
        let vbo = scene.geometry().vbo();

        let calls = gl.calls();
        let link = calls
            .iter()
            .position(|c| *c == GlCall::LinkProgram(program))
            .unwrap();

        assert_eq!(
            calls[link + 1..],
            [
                GlCall::DeleteShader(2),
                GlCall::DeleteShader(1),
                GlCall::ClearColor([0.0; 4]),
                GlCall::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT),
                GlCall::Viewport {
                    x: 0,
                    y: 0,
                    width: 640,
                    height: 480
                },
                GlCall::UseProgram(program),
                GlCall::CreateBuffer(vbo),
                GlCall::BindArrayBuffer(vbo),
                GlCall::ArrayBufferData {
                    data: POSITIONS.to_vec(),
                    usage: BufferUsage::StaticDraw
                },
                GlCall::EnableVertexAttribArray(0),
                GlCall::VertexAttribPointer {
                    index: 0,
                    size: 2,
                    normalized: false,
                    stride: 0,
                    offset: 0
                },
                GlCall::Uniform2f {
                    location: 0,
                    x: 640.0,
                    y: 480.0
                },
                GlCall::DrawArrays {
                    mode: Primitive::Triangles,
                    first: 0,
                    count: 6
                },
            ]
        );
    }

    #[test]
    fn link_failure_draws_nothing() {
        let gl = RecordingGl::new();
        gl.fail_link("attribute limit exceeded");

        let res = draw_once(&gl, SurfaceSize::default());

        assert!(matches!(res, Err(SetupError::Gl(GlError::Linking(_)))));
        assert!(!gl
            .calls()
            .iter()
            .any(|c| matches!(c, GlCall::Clear(_) | GlCall::DrawArrays { .. })));
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn fragment_failure_leaks_nothing() {
        let gl = RecordingGl::new();
        gl.fail_compile(ShaderKind::Fragment, "0:4: 'gl_fragcolor' : undeclared identifier");

        let res = draw_once(&gl, SurfaceSize::default());

        assert!(matches!(
            res,
            Err(SetupError::Gl(GlError::Compilation {
                kind: ShaderKind::Fragment,
                ..
            }))
        ));
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn refused_buffer_stops_before_draw() {
        let gl = RecordingGl::new();
        gl.refuse_buffers();

        let res = draw_once(&gl, SurfaceSize::default());

        assert!(matches!(
            res,
            Err(SetupError::Gl(GlError::Creation("buffer")))
        ));
        let calls = gl.calls();
        assert!(!calls.iter().any(|c| matches!(
            c,
            GlCall::ArrayBufferData { .. } | GlCall::Uniform2f { .. } | GlCall::DrawArrays { .. }
        )));
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn scene_release() {
        let gl = RecordingGl::new();

        let scene = draw_once(&gl, SurfaceSize::default()).unwrap();
        assert_eq!(gl.live_objects(), 2);

        drop(scene);
        assert_eq!(gl.live_objects(), 0);
    }
}
