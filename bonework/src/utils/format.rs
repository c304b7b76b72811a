//! Formatting utilities

use bonework_skeleton::glam::Mat4;

/// Format a matrix as four text lines, one per row
pub fn format_matrix_rows(matrix: &Mat4) -> String {
    (0..4)
        .map(|i| {
            let row = matrix.row(i);
            format!("{:>8.3} {:>8.3} {:>8.3} {:>8.3}", row.x, row.y, row.z, row.w)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
