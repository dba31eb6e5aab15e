//! Pure helpers the presentation layer derives from the timer counters.

/// Default number of segments in the progress indicator.
pub const DEFAULT_SEGMENTS: usize = 10;
/// At or below this many seconds left the countdown is shown as urgent.
pub const URGENT_THRESHOLD: u32 = 10;

/// Number of lit segments out of `segments` for the fraction `remaining / total`.
///
/// Rounds half up, so 30 of 120 seconds on a 10 segment gauge lights 3.
/// Returns 0 when `total` is 0.
pub fn active_segments(remaining: u32, total: u32, segments: usize) -> usize {
    if total == 0 {
        return 0;
    }

    let remaining = remaining.min(total) as u64;
    let total = total as u64;
    let segments = segments as u64;

    ((2 * remaining * segments + total) / (2 * total)) as usize
}

pub fn is_urgent(remaining: u32) -> bool {
    remaining <= URGENT_THRESHOLD
}

/// Split a number of seconds into hours, minutes and seconds.
pub fn split_hms(seconds: u32) -> (u32, u32, u32) {
    (seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}

/// Format seconds as `HH : MM : SS`.
pub fn format_hms(seconds: u32) -> String {
    let (h, m, s) = split_hms(seconds);
    format!("{:02} : {:02} : {:02}", h, m, s)
}
