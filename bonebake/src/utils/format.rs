//! Formatting utilities

use glam::Mat4;

/// Format a matrix as four row lines
pub fn format_matrix_rows(matrix: &Mat4) -> Vec<String> {
    (0..4)
        .map(|r| {
            let row = matrix.row(r);
            format!(
                "[{:>9.4} {:>9.4} {:>9.4} {:>9.4}]",
                row.x, row.y, row.z, row.w
            )
        })
        .collect()
}

/// Format an optional index, `-` when absent
pub fn format_optional_index(index: Option<usize>) -> String {
    index.map_or_else(|| "-".to_string(), |i| i.to_string())
}

/// Format a tick count with its value in seconds when the rate is usable
pub fn format_ticks(ticks: f64, ticks_per_second: f64) -> String {
    if ticks_per_second.is_finite() && ticks_per_second > 0.0 {
        format!("{ticks:.2} ticks ({:.3} s)", ticks / ticks_per_second)
    } else {
        format!("{ticks:.2} ticks")
    }
}
