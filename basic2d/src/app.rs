use glutin::config::{Api, Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{Display, DisplayApiPreference, GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle};

use std::ffi::CString;
use std::num::NonZeroU32;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use basic2d::mount::Mount;
use basic2d::scene::SurfaceSize;
use basic2d::SetupError;

use gl_wrapper::NativeGl;

use crate::args::Args;

pub struct App {
    event_loop: EventLoop<()>,
    window: Window,
    gl_config: Config,
    mount: Mount<NativeGl>,
}

impl App {
    pub fn new(args: &Args) -> Result<Self, SetupError> {
        let event_loop = EventLoop::new();
        let window = WindowBuilder::new()
            .with_inner_size(window_size(args))
            .with_resizable(false)
            .with_title("Basic 2D render")
            .build(&event_loop)
            .map_err(|e| SetupError::ContextUnavailable(e.to_string()))?;

        let gl_display = unsafe {
            Display::new(
                event_loop.raw_display_handle(),
                display_preference(&window),
            )
        }
        .map_err(|e| SetupError::ContextUnavailable(e.to_string()))?;

        let template = ConfigTemplateBuilder::new()
            .with_api(Api::GLES2)
            .compatible_with_native_window(window.raw_window_handle())
            .build();

        let configs = unsafe { gl_display.find_configs(template) }
            .map_err(|e| SetupError::ContextUnavailable(e.to_string()))?;
        let gl_config = first_config(configs)?;

        let (width, height): (u32, u32) = window.inner_size().into();
        let mount = Mount::new(SurfaceSize::new(width, height));

        Ok(Self {
            event_loop,
            window,
            gl_config,
            mount,
        })
    }

    pub fn run(self) -> ! {
        let App {
            event_loop,
            window,
            gl_config,
            mount,
        } = self;

        let mut window = Some(window);
        let mut mount = Some(mount);
        let mut gl_window: Option<GlWindow> = None;

        event_loop.run(move |event, _window_target, control_flow| {
            *control_flow = ControlFlow::Wait;
            match event {
                Event::Resumed => {
                    let Some(mount) = &mut mount else {
                        return;
                    };

                    let res = mount.on_surface_ready(|| {
                        let window = window.take().ok_or_else(|| {
                            SetupError::ContextUnavailable("window already consumed".to_string())
                        })?;
                        let (gl, target) = GlWindow::acquire(window, &gl_config)?;
                        gl_window = Some(target);
                        Ok(gl)
                    });

                    match res {
                        Ok(true) => {
                            if let Some(target) = &gl_window {
                                if let Err(e) = target.surface.swap_buffers(&target.context) {
                                    log::error!("Could not present frame: {e}");
                                }
                            }
                        }
                        Ok(false) => {}
                        Err(SetupError::ContextUnavailable(reason)) => {
                            notify_user(&reason);
                            control_flow.set_exit_with_code(-1);
                        }
                        Err(e) => log::error!("Setup aborted: {e}"),
                    }
                }
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } => {
                    if let Some(mount) = mount.take() {
                        mount.unmount();
                    }
                    // context goes after everything created with it
                    gl_window = None;
                    control_flow.set_exit();
                }
                _ => (),
            }
        })
    }
}

/// Blocks on a message box telling the user nothing can be drawn.
pub fn notify_user(reason: &str) {
    log::error!("Could not acquire graphics context: {reason}");

    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Basic 2D render")
        .set_description(notice_text(reason))
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn notice_text(reason: &str) -> String {
    format!("This system does not support OpenGL ES 2.0, nothing can be drawn.\n\n{reason}")
}

/// `--width`/`--height` are drawing-buffer pixels, independent of the scale factor.
fn window_size(args: &Args) -> Size {
    Size::Physical(PhysicalSize::new(args.width, args.height))
}

#[cfg(target_os = "windows")]
fn display_preference(window: &Window) -> DisplayApiPreference {
    DisplayApiPreference::WglThenEgl(Some(window.raw_window_handle()))
}

#[cfg(target_os = "macos")]
fn display_preference(_window: &Window) -> DisplayApiPreference {
    DisplayApiPreference::Cgl
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn display_preference(_window: &Window) -> DisplayApiPreference {
    DisplayApiPreference::Egl
}

/// Takes the first config the display offers.
///
/// An empty set is not an error for the display itself, only for us.
fn first_config<C>(mut configs: impl Iterator<Item = C>) -> Result<C, SetupError> {
    configs.next().ok_or_else(|| {
        SetupError::ContextUnavailable("display offers no OpenGL ES 2.0 config".to_string())
    })
}

pub struct GlWindow {
    // XXX the context and surface must be dropped before the window.
    pub context: PossiblyCurrentContext,
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    /// Creates a GL ES 2.0 context for the window and makes it current.
    pub fn acquire(window: Window, config: &Config) -> Result<(NativeGl, Self), SetupError> {
        let unavailable = |e: glutin::error::Error| SetupError::ContextUnavailable(e.to_string());

        let raw_window_handle = window.raw_window_handle();
        let gl_display = config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(Some(Version::new(2, 0))))
            .build(Some(raw_window_handle));

        let not_current =
            unsafe { gl_display.create_context(config, &context_attr) }.map_err(unavailable)?;

        let (width, height): (u32, u32) = window.inner_size().into();
        let (width, height) = NonZeroU32::new(width)
            .zip(NonZeroU32::new(height))
            .ok_or_else(|| SetupError::ContextUnavailable("window has no area".to_string()))?;

        let attrs =
            SurfaceAttributesBuilder::<WindowSurface>::new().build(raw_window_handle, width, height);

        let surface =
            unsafe { gl_display.create_window_surface(config, &attrs) }.map_err(unavailable)?;

        let context = not_current.make_current(&surface).map_err(unavailable)?;

        let gl = NativeGl::load_with(|s| match CString::new(s) {
            Ok(s) => gl_display.get_proc_address(s.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        log::debug!("Acquired GL ES 2.0 context");

        Ok((
            gl,
            Self {
                context,
                surface,
                window,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_config_is_unavailable_context() {
        let res = first_config(std::iter::empty::<u32>());

        assert!(matches!(res, Err(SetupError::ContextUnavailable(_))));
    }

    #[test]
    fn first_offered_config_wins() {
        assert_eq!(first_config([3, 1, 2].into_iter()).unwrap(), 3);
    }

    #[test]
    fn window_is_sized_in_pixels() {
        let args = Args {
            width: 640,
            height: 480,
            headless: false,
        };

        assert_eq!(
            window_size(&args),
            Size::Physical(PhysicalSize::new(640, 480))
        );
    }

    #[test]
    fn notice_names_reason() {
        let text = notice_text("EGL_NOT_INITIALIZED");

        assert!(text.contains("OpenGL ES 2.0"));
        assert!(text.ends_with("EGL_NOT_INITIALIZED"));
    }
}
