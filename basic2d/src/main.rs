use clap::Parser;

use basic2d::mount::Mount;
use basic2d::scene::SurfaceSize;
use basic2d::SetupError;

use gl_wrapper::RecordingGl;

mod app;
mod args;

use app::App;
use args::Args;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.headless {
        if let Err(e) = run_headless(&args) {
            eprintln!("Setup failed: {e}");
            std::process::exit(-1);
        }
        return;
    }

    let app = match App::new(&args) {
        Ok(app) => app,
        Err(e) => {
            app::notify_user(&e.to_string());
            std::process::exit(-1);
        }
    };

    app.run();
}

fn run_headless(args: &Args) -> Result<(), SetupError> {
    let gl = RecordingGl::new();
    let mut mount = Mount::new(SurfaceSize::new(args.width, args.height));

    let res = mount.on_surface_ready(|| Ok(gl.clone()));

    for call in gl.calls() {
        println!("{call:?}");
    }

    mount.unmount();

    res.map(|_| ())
}
