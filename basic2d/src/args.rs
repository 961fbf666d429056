use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// Width of the drawing surface in pixels
    #[arg(long, default_value_t = 640, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,
    /// Height of the drawing surface in pixels
    #[arg(long, default_value_t = 480, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,
    /// Run against an in-memory context and print the issued GL calls
    #[arg(long)]
    pub headless: bool,
}
