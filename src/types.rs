//! Matrix type aliases and diagnostic formatting.

use ndarray::{Array1, Array2};

/// One-dimensional matrix: a flat vector of values.
pub type Matrix1d = Array1<f32>;

/// Two-dimensional matrix: rows of columns, row-major.
pub type Matrix2d = Array2<f32>;

/// Render a 1D matrix as `[a, b, c]` with fixed decimal precision.
pub fn format_matrix1d(matrix: &Matrix1d, precision: usize) -> String {
    let cells: Vec<String> = matrix
        .iter()
        .map(|v| format!("{:.*}", precision, v))
        .collect();
    format!("[{}]", cells.join(", "))
}

/// Render a 2D matrix as `[[a, b], [c, d]]` with fixed decimal precision.
pub fn format_matrix2d(matrix: &Matrix2d, precision: usize) -> String {
    let rows: Vec<String> = matrix
        .rows()
        .into_iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|v| format!("{:.*}", precision, v)).collect();
            format!("[{}]", cells.join(", "))
        })
        .collect();
    format!("[{}]", rows.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_format_matrix1d() {
        let m = arr1(&[1.0, 0.5, -2.0]);
        assert_eq!(format_matrix1d(&m, 2), "[1.00, 0.50, -2.00]");
    }

    #[test]
    fn test_format_matrix2d() {
        let m = arr2(&[[1.0, 2.0], [3.0, 4.5]]);
        assert_eq!(format_matrix2d(&m, 1), "[[1.0, 2.0], [3.0, 4.5]]");
    }

    #[test]
    fn test_format_empty() {
        let m = Matrix1d::zeros(0);
        assert_eq!(format_matrix1d(&m, 2), "[]");
    }
}
