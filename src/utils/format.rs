// === Display-width and timestamp formatting utilities ===
use chrono::{DateTime, Local, TimeZone, Utc};
use unicode_width::UnicodeWidthChar;

/// Truncate string to fit display width, or pad with spaces to fill.
/// Handles CJK/fullwidth characters correctly (2 columns each) and
/// expands tabs to the next 4-column stop.
pub fn truncate_or_pad(s: &str, width: usize) -> String {
    let mut result = String::with_capacity(width);
    let mut display_width = 0;

    for ch in s.chars() {
        if ch == '\t' {
            let spaces = 4 - (display_width % 4);
            for _ in 0..spaces {
                if display_width >= width {
                    break;
                }
                result.push(' ');
                display_width += 1;
            }
        } else {
            let ch_width = ch.width().unwrap_or(0);
            if display_width + ch_width > width {
                break;
            }
            result.push(ch);
            display_width += ch_width;
        }
    }

    while display_width < width {
        result.push(' ');
        display_width += 1;
    }

    result
}

/// Format file size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    }
}

/// Format a Unix-millisecond stamp relative to now ("just now", "5m ago").
/// Falls back to a plain date once the distance exceeds a week.
pub fn format_relative_time(stamp_ms: u64) -> String {
    let then = match Utc.timestamp_millis_opt(stamp_ms as i64).single() {
        Some(t) => t,
        None => return String::from("unknown"),
    };
    let elapsed = Utc::now().signed_duration_since(then);
    let secs = elapsed.num_seconds();

    if secs < 0 {
        return String::from("just now");
    }
    if secs < 10 {
        String::from("just now")
    } else if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86400 {
        format!("{}h ago", secs / 3600)
    } else if secs < 86400 * 7 {
        format!("{}d ago", secs / 86400)
    } else {
        let local: DateTime<Local> = then.with_timezone(&Local);
        local.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_or_pad() {
        assert_eq!(truncate_or_pad("hello", 10), "hello     ");
        assert_eq!(truncate_or_pad("hello world!", 5), "hello");
        assert_eq!(truncate_or_pad("", 3), "   ");
    }

    #[test]
    fn test_truncate_or_pad_tabs() {
        assert_eq!(truncate_or_pad("\ta", 6), "    a ");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
    }

    #[test]
    fn test_format_relative_time_recent() {
        let now = Utc::now().timestamp_millis() as u64;
        assert_eq!(format_relative_time(now), "just now");
    }
}
