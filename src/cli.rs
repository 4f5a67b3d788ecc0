use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "prism-tracer")]
#[command(about = "Render a scene of simple solids with direct lighting and hard shadows")]
pub struct Args {
    /// Scene description (JSON); the built-in demo scene is used when omitted
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Image width in pixels (overrides the scene file)
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels (overrides the scene file)
    #[arg(long)]
    pub height: Option<u32>,

    /// Worker threads, 0 for one per hardware thread (overrides the scene file)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Output image; format follows the extension. Defaults to renders/render_<w>x<h>_<suffix>.png
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    #[arg(long, value_enum, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,
}
