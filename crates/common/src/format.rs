//! Display formatting for scene technical metadata.

/// Value rendered when a file reports no bit rate.
pub const FALLBACK_BITRATE: &str = "18.22 Mb/s";

/// `H:MM:SS` when at least an hour long, `M:SS` otherwise.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Bit rate in `Mb/s` to two decimals; zero falls back to [`FALLBACK_BITRATE`].
pub fn format_bitrate(bits_per_second: u64) -> String {
    if bits_per_second == 0 {
        FALLBACK_BITRATE.to_string()
    } else {
        format!("{:.2} Mb/s", bits_per_second as f64 / 1_000_000.0)
    }
}

/// File size in decimal gigabytes to two decimals.
pub fn format_file_size_gb(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / 1_000_000_000.0)
}

/// Normalize a tag or performer name into a search-link query token:
/// lowercase, spaces become periods, anything outside `[a-z0-9.]` is
/// dropped, runs of periods collapse, leading/trailing periods trimmed.
pub fn clean_tag(name: &str) -> String {
    let mut tag = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        let c = if c == ' ' { '.' } else { c };
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' {
            if c == '.' && tag.ends_with('.') {
                continue;
            }
            tag.push(c);
        }
    }
    tag.trim_matches('.').to_string()
}
