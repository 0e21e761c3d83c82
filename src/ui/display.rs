use std::f64::consts::{FRAC_PI_2, TAU};

use unicode_width::UnicodeWidthChar;

/// Render a countdown as `MM:SS`. Minutes keep growing past 99 rather than wrap.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Share of the session already used, in [0, 1]
pub fn progress_fraction(remaining_secs: u32, default_secs: u32) -> f64 {
    if default_secs == 0 {
        return 0.0;
    }
    (1.0 - remaining_secs as f64 / default_secs as f64).clamp(0.0, 1.0)
}

/// Points along a clockwise arc starting at twelve o'clock covering `fraction` of a full turn
pub fn ring_points(fraction: f64, radius: f64, steps: usize) -> Vec<(f64, f64)> {
    let fraction = fraction.clamp(0.0, 1.0);
    let count = (steps as f64 * fraction).round() as usize;
    if count == 0 {
        return Vec::new();
    }

    (0..=count)
        .map(|i| {
            let angle = FRAC_PI_2 - TAU * (i as f64 / steps as f64);
            (radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// The longest suffix of `text` that fits in `width` terminal columns
pub fn visible_tail(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();

    for (idx, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }

    &text[start..]
}
