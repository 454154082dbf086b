use clap::Parser;
use std::path::PathBuf;

/// Geosphere — a software-rasterized, rippling icosphere in your terminal.
#[derive(Parser, Debug)]
#[command(name = "geosphere", version, about)]
pub struct Args {
    /// TOML config file.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Log filter override (e.g. debug, geosphere=trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Target frames per second.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: Option<u32>,
}

pub fn parse() -> Args {
    Args::parse()
}
