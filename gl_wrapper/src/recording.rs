use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ffi::CStr;
use std::rc::Rc;

use gl::types::{GLbitfield, GLint, GLsizei, GLuint};

use crate::backend::{BufferUsage, Gl, Primitive};
use crate::shader::ShaderKind;

/// State changing call observed by a [`RecordingGl`].
///
/// Queries (status, logs, locations) are answered but not recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateShader { kind: ShaderKind, shader: GLuint },
    ShaderSource { shader: GLuint, source: String },
    CompileShader(GLuint),
    DeleteShader(GLuint),
    CreateProgram(GLuint),
    AttachShader { program: GLuint, shader: GLuint },
    LinkProgram(GLuint),
    DeleteProgram(GLuint),
    UseProgram(GLuint),
    Uniform2f { location: GLint, x: f32, y: f32 },
    CreateBuffer(GLuint),
    BindArrayBuffer(GLuint),
    ArrayBufferData { data: Vec<f32>, usage: BufferUsage },
    DeleteBuffer(GLuint),
    EnableVertexAttribArray(GLuint),
    VertexAttribPointer {
        index: GLuint,
        size: GLint,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    },
    ClearColor([f32; 4]),
    Clear(GLbitfield),
    Viewport { x: GLint, y: GLint, width: GLsizei, height: GLsizei },
    DrawArrays { mode: Primitive, first: GLint, count: GLsizei },
}

/// [`Gl`] implementation that keeps everything in memory.
///
/// Shaders compile and programs link unless a failure was requested with
/// [`RecordingGl::fail_compile`] or [`RecordingGl::fail_link`]. An attribute or
/// uniform is active when its name occurs in one of the attached sources.
/// Clones share the same recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingGl {
    state: Rc<RefCell<State>>,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<GlCall>,
    next_name: GLuint,
    live: HashSet<GLuint>,
    shaders: HashMap<GLuint, ShaderState>,
    programs: HashMap<GLuint, ProgramState>,
    compile_failures: HashMap<ShaderKind, String>,
    link_failure: Option<String>,
    refuse_buffers: bool,
}

#[derive(Debug)]
struct ShaderState {
    kind: ShaderKind,
    source: String,
    compiled: bool,
}

#[derive(Debug, Default)]
struct ProgramState {
    attached: Vec<GLuint>,
    linked: bool,
    log: String,
    sources: Vec<String>,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

impl State {
    fn allocate(&mut self) -> GLuint {
        self.next_name += 1;
        self.live.insert(self.next_name);
        self.next_name
    }
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every following compile of a `kind` shader fails with `log`.
    pub fn fail_compile(&self, kind: ShaderKind, log: &str) {
        self.state
            .borrow_mut()
            .compile_failures
            .insert(kind, log.to_string());
    }

    /// Every following link fails with `log`.
    pub fn fail_link(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    /// Every following buffer creation returns the null name.
    pub fn refuse_buffers(&self) {
        self.state.borrow_mut().refuse_buffers = true;
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    /// Number of shaders, programs and buffers created and not yet deleted.
    pub fn live_objects(&self) -> usize {
        self.state.borrow().live.len()
    }

    fn record(&self, call: GlCall) {
        log::trace!("{call:?}");
        self.state.borrow_mut().calls.push(call);
    }

    fn delete(&self, name: GLuint, call: GlCall) {
        {
            let mut state = self.state.borrow_mut();
            state.live.remove(&name);
            state.shaders.remove(&name);
            state.programs.remove(&name);
        }
        self.record(call);
    }
}

impl Gl for RecordingGl {
    fn create_shader(&self, kind: ShaderKind) -> GLuint {
        let shader = {
            let mut state = self.state.borrow_mut();
            let shader = state.allocate();
            state.shaders.insert(
                shader,
                ShaderState {
                    kind,
                    source: String::new(),
                    compiled: false,
                },
            );
            shader
        };
        self.record(GlCall::CreateShader { kind, shader });
        shader
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        let source = source.to_string_lossy().to_string();
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.clone();
        }
        self.record(GlCall::ShaderSource { shader, source });
    }

    fn compile_shader(&self, shader: GLuint) {
        {
            let mut state = self.state.borrow_mut();
            let State {
                shaders,
                compile_failures,
                ..
            } = &mut *state;
            if let Some(s) = shaders.get_mut(&shader) {
                s.compiled = !compile_failures.contains_key(&s.kind);
            }
        }
        self.record(GlCall::CompileShader(shader));
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let state = self.state.borrow();
        state
            .shaders
            .get(&shader)
            .filter(|s| !s.compiled)
            .and_then(|s| state.compile_failures.get(&s.kind))
            .cloned()
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: GLuint) {
        self.delete(shader, GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> GLuint {
        let program = {
            let mut state = self.state.borrow_mut();
            let program = state.allocate();
            state.programs.insert(program, ProgramState::default());
            program
        };
        self.record(GlCall::CreateProgram(program));
        program
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.push(shader);
        }
        self.record(GlCall::AttachShader { program, shader });
    }

    fn link_program(&self, program: GLuint) {
        {
            let mut state = self.state.borrow_mut();
            let State {
                shaders,
                programs,
                link_failure,
                ..
            } = &mut *state;

            if let Some(p) = programs.get_mut(&program) {
                let stages: Vec<&ShaderState> =
                    p.attached.iter().filter_map(|s| shaders.get(s)).collect();
                let complete = stages.iter().all(|s| s.compiled)
                    && stages.iter().any(|s| s.kind == ShaderKind::Vertex)
                    && stages.iter().any(|s| s.kind == ShaderKind::Fragment);

                p.sources = stages.iter().map(|s| s.source.clone()).collect();
                p.attributes.clear();
                p.uniforms.clear();

                match (complete, link_failure) {
                    (_, Some(log)) => {
                        p.linked = false;
                        p.log = log.clone();
                    }
                    (false, None) => {
                        p.linked = false;
                        p.log = "program needs a compiled vertex and fragment shader".into();
                    }
                    (true, None) => {
                        p.linked = true;
                        p.log.clear();
                    }
                }
            }
        }
        self.record(GlCall::LinkProgram(program));
    }

    fn link_status(&self, program: GLuint) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: GLuint) {
        self.delete(program, GlCall::DeleteProgram(program));
    }

    fn use_program(&self, program: GLuint) {
        self.record(GlCall::UseProgram(program));
    }

    fn attrib_location(&self, program: GLuint, name: &CStr) -> Option<GLuint> {
        let name = name.to_str().ok()?;
        let mut state = self.state.borrow_mut();
        let p = state.programs.get_mut(&program).filter(|p| p.linked)?;

        if !p.sources.iter().any(|s| s.contains(name)) {
            return None;
        }

        let index = match p.attributes.iter().position(|a| a == name) {
            Some(i) => i,
            None => {
                p.attributes.push(name.to_string());
                p.attributes.len() - 1
            }
        };

        Some(index as GLuint)
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> Option<GLint> {
        let name = name.to_str().ok()?;
        let mut state = self.state.borrow_mut();
        let p = state.programs.get_mut(&program).filter(|p| p.linked)?;

        if !p.sources.iter().any(|s| s.contains(name)) {
            return None;
        }

        let index = match p.uniforms.iter().position(|u| u == name) {
            Some(i) => i,
            None => {
                p.uniforms.push(name.to_string());
                p.uniforms.len() - 1
            }
        };

        Some(index as GLint)
    }

    fn uniform_2f(&self, location: GLint, x: f32, y: f32) {
        self.record(GlCall::Uniform2f { location, x, y });
    }

    fn create_buffer(&self) -> GLuint {
        let buffer = {
            let mut state = self.state.borrow_mut();
            if state.refuse_buffers {
                0
            } else {
                state.allocate()
            }
        };
        self.record(GlCall::CreateBuffer(buffer));
        buffer
    }

    fn bind_array_buffer(&self, buffer: GLuint) {
        self.record(GlCall::BindArrayBuffer(buffer));
    }

    fn array_buffer_data(&self, data: &[f32], usage: BufferUsage) {
        self.record(GlCall::ArrayBufferData {
            data: data.to_vec(),
            usage,
        });
    }

    fn delete_buffer(&self, buffer: GLuint) {
        self.delete(buffer, GlCall::DeleteBuffer(buffer));
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        self.record(GlCall::EnableVertexAttribArray(index));
    }

    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        size: GLint,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    ) {
        self.record(GlCall::VertexAttribPointer {
            index,
            size,
            normalized,
            stride,
            offset,
        });
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(GlCall::ClearColor([r, g, b, a]));
    }

    fn clear(&self, mask: GLbitfield) {
        self.record(GlCall::Clear(mask));
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.record(GlCall::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn draw_arrays(&self, mode: Primitive, first: GLint, count: GLsizei) {
        self.record(GlCall::DrawArrays { mode, first, count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERT: &CStr = c"attribute vec2 a_position; uniform vec2 u_resolution; void main() {}";
    const FRAG: &CStr = c"void main() {}";

    fn linked(gl: &RecordingGl) -> GLuint {
        let vert = gl.create_shader(ShaderKind::Vertex);
        gl.shader_source(vert, VERT);
        gl.compile_shader(vert);
        let frag = gl.create_shader(ShaderKind::Fragment);
        gl.shader_source(frag, FRAG);
        gl.compile_shader(frag);

        let program = gl.create_program();
        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        program
    }

    #[test]
    fn clones_share_calls() {
        let gl = RecordingGl::new();
        let other = gl.clone();

        other.clear(gl::COLOR_BUFFER_BIT);

        assert_eq!(gl.calls(), vec![GlCall::Clear(gl::COLOR_BUFFER_BIT)]);
    }

    #[test]
    fn injected_compile_failure() {
        let gl = RecordingGl::new();
        gl.fail_compile(ShaderKind::Fragment, "0:1: bad token");

        let vert = gl.create_shader(ShaderKind::Vertex);
        gl.compile_shader(vert);
        let frag = gl.create_shader(ShaderKind::Fragment);
        gl.compile_shader(frag);

        assert!(gl.compile_status(vert));
        assert_eq!(gl.shader_info_log(vert), "");
        assert!(!gl.compile_status(frag));
        assert_eq!(gl.shader_info_log(frag), "0:1: bad token");
    }

    #[test]
    fn link_needs_both_stages() {
        let gl = RecordingGl::new();
        let vert = gl.create_shader(ShaderKind::Vertex);
        gl.compile_shader(vert);

        let program = gl.create_program();
        gl.attach_shader(program, vert);
        gl.link_program(program);

        assert!(!gl.link_status(program));
        assert!(!gl.program_info_log(program).is_empty());
    }

    #[test]
    fn locations_come_from_attached_sources() {
        let gl = RecordingGl::new();
        let program = linked(&gl);

        assert!(gl.link_status(program));
        assert_eq!(gl.attrib_location(program, c"a_position"), Some(0));
        assert_eq!(gl.attrib_location(program, c"a_position"), Some(0));
        assert_eq!(gl.uniform_location(program, c"u_resolution"), Some(0));
        assert_eq!(gl.attrib_location(program, c"a_color"), None);
    }

    #[test]
    fn refused_buffer_is_null() {
        let gl = RecordingGl::new();
        gl.refuse_buffers();

        assert_eq!(gl.create_buffer(), 0);
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn live_objects_follow_deletes() {
        let gl = RecordingGl::new();
        let buffer = gl.create_buffer();
        let shader = gl.create_shader(ShaderKind::Vertex);
        assert_eq!(gl.live_objects(), 2);

        gl.delete_buffer(buffer);
        gl.delete_shader(shader);
        assert_eq!(gl.live_objects(), 0);
    }
}
