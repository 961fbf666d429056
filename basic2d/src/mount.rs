use gl_wrapper::Gl;

use crate::scene::SurfaceSize;
use crate::setup::{draw_once, Scene};
use crate::SetupError;

pub enum MountState<G: Gl> {
    Pending,
    Ready(Scene<G>),
    Failed,
}

/// Runs the draw setup at most once for a mounted surface.
pub struct Mount<G: Gl> {
    surface: SurfaceSize,
    state: MountState<G>,
}

impl<G: Gl> Mount<G> {
    pub fn new(surface: SurfaceSize) -> Self {
        Self {
            surface,
            state: MountState::Pending,
        }
    }

    pub fn state(&self) -> &MountState<G> {
        &self.state
    }

    pub fn scene(&self) -> Option<&Scene<G>> {
        match &self.state {
            MountState::Ready(scene) => Some(scene),
            _ => None,
        }
    }

    /// Acquires the context and draws, the first time it is called.
    ///
    /// Returns `Ok(true)` when a frame was drawn by this call and `Ok(false)`
    /// when the mount was already set up or already failed; `acquire` is not
    /// called in that case. Any error leaves the mount failed for good.
    pub fn on_surface_ready<F>(&mut self, acquire: F) -> Result<bool, SetupError>
    where
        F: FnOnce() -> Result<G, SetupError>,
    {
        if !matches!(self.state, MountState::Pending) {
            log::debug!("Surface already set up, ignoring ready signal");
            return Ok(false);
        }

        self.state = MountState::Failed;

        let gl = acquire()?;
        let scene = draw_once(&gl, self.surface)?;

        self.state = MountState::Ready(scene);

        Ok(true)
    }

    /// Releases everything created for the surface.
    pub fn unmount(self) {
        if let MountState::Ready(scene) = self.state {
            log::debug!(
                "Releasing program {} and buffer {}",
                scene.program().get_id(),
                scene.geometry().vbo()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gl_wrapper::recording::{GlCall, RecordingGl};
    use gl_wrapper::shader::ShaderKind;

    fn draws(gl: &RecordingGl) -> usize {
        gl.calls()
            .iter()
            .filter(|c| matches!(c, GlCall::DrawArrays { .. }))
            .count()
    }

    #[test]
    fn second_signal_is_ignored() {
        let gl = RecordingGl::new();
        let mut mount = Mount::new(SurfaceSize::default());

        assert!(mount.on_surface_ready(|| Ok(gl.clone())).unwrap());
        assert!(!mount
            .on_surface_ready(|| panic!("context acquired twice"))
            .unwrap());

        assert_eq!(draws(&gl), 1);
        assert!(mount.scene().is_some());
    }

    #[test]
    fn missing_context_aborts() {
        let mut mount: Mount<RecordingGl> = Mount::new(SurfaceSize::default());

        let res = mount.on_surface_ready(|| {
            Err(SetupError::ContextUnavailable("no matching config".into()))
        });

        assert!(matches!(res, Err(SetupError::ContextUnavailable(_))));
        assert!(matches!(mount.state(), MountState::Failed));
    }

    #[test]
    fn failure_is_terminal() {
        let gl = RecordingGl::new();
        gl.fail_compile(ShaderKind::Vertex, "0:1: syntax error");
        let mut mount = Mount::new(SurfaceSize::default());

        assert!(mount.on_surface_ready(|| Ok(gl.clone())).is_err());
        assert!(!mount.on_surface_ready(|| Ok(gl.clone())).unwrap());

        assert!(matches!(mount.state(), MountState::Failed));
        assert_eq!(draws(&gl), 0);
    }

    #[test]
    fn unmount_releases_objects() {
        let gl = RecordingGl::new();
        let mut mount = Mount::new(SurfaceSize::new(320, 200));
        mount.on_surface_ready(|| Ok(gl.clone())).unwrap();
        assert_eq!(gl.live_objects(), 2);

        mount.unmount();

        assert_eq!(gl.live_objects(), 0);
    }
}
