//! Progress-bar styling for percentage cells.

/// CSS class for a percentage band.
pub fn bar_class(percent: u32) -> &'static str {
    match percent {
        0..=39 => "bar-danger",
        40..=79 => "bar-warning",
        80..=99 => "bar-info",
        _ => "bar-success",
    }
}

/// Bar width in percent, clamped to 0-100.
pub fn bar_width(percent: u32) -> u32 {
    percent.min(100)
}
