use clap::Parser;

use crate::{screen::MAX_SEGMENTS, timer::progress::DEFAULT_SEGMENTS};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Initial value of the hours field.
    #[arg(long, default_value_t = 0)]
    pub hours: u32,

    /// Initial value of the minutes field.
    #[arg(short, long, default_value_t = 0)]
    pub minutes: u32,

    /// Initial value of the seconds field.
    #[arg(short, long, default_value_t = 0)]
    pub seconds: u32,

    /// Number of segments in the progress indicator.
    #[arg(long, default_value_t = DEFAULT_SEGMENTS, value_parser = parse_segments)]
    pub segments: usize,

    /// Size of one screen pixel in the window at startup.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=20))]
    pub scale: u32,
}

fn parse_segments(s: &str) -> Result<usize, String> {
    let segments: usize = s.parse().map_err(|_| format!("`{}` is not a number", s))?;
    if (1..=MAX_SEGMENTS).contains(&segments) {
        Ok(segments)
    } else {
        Err(format!("segments must be between 1 and {}", MAX_SEGMENTS))
    }
}
