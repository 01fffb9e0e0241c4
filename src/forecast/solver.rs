//! Dense penalised least squares for the handful of columns the additive model uses.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SolveError {
    #[error("design has {rows} rows but {targets} targets")]
    TargetMismatch { rows: usize, targets: usize },
    #[error("row {row} has {got} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },
    #[error("system is singular at column {0}")]
    Singular(usize),
}

const PIVOT_EPS: f64 = 1e-12;

/// Minimises `||Xb - y||^2 + sum_j penalties[j] * b_j^2` through the normal equations.
/// A zero penalty leaves that coefficient unregularised.
pub fn ridge_least_squares(
    rows: &[Vec<f64>],
    y: &[f64],
    penalties: &[f64],
) -> Result<Vec<f64>, SolveError> {
    if rows.len() != y.len() {
        return Err(SolveError::TargetMismatch {
            rows: rows.len(),
            targets: y.len(),
        });
    }
    let p = penalties.len();

    // X'X + diag(penalties), X'y. Row-major p x p.
    let mut gram = vec![0.0; p * p];
    let mut rhs = vec![0.0; p];
    for (r, (row, &target)) in rows.iter().zip(y).enumerate() {
        if row.len() != p {
            return Err(SolveError::RaggedRow {
                row: r,
                got: row.len(),
                expected: p,
            });
        }
        for i in 0..p {
            let xi = row[i];
            if xi == 0.0 {
                continue;
            }
            rhs[i] += xi * target;
            for j in i..p {
                gram[i * p + j] += xi * row[j];
            }
        }
    }
    for i in 0..p {
        for j in 0..i {
            gram[i * p + j] = gram[j * p + i];
        }
        gram[i * p + i] += penalties[i];
    }

    solve_linear_system(gram, rhs, p)
}

/// Gaussian elimination with partial pivoting on a row-major `n x n` matrix.
pub fn solve_linear_system(mut a: Vec<f64>, mut b: Vec<f64>, n: usize) -> Result<Vec<f64>, SolveError> {
    let scale = a.iter().fold(0.0_f64, |m, v| m.max(v.abs())).max(1.0);

    for col in 0..n {
        // Find pivot
        let mut max_row = col;
        for k in (col + 1)..n {
            if a[k * n + col].abs() > a[max_row * n + col].abs() {
                max_row = k;
            }
        }
        if a[max_row * n + col].abs() <= PIVOT_EPS * scale {
            return Err(SolveError::Singular(col));
        }

        if max_row != col {
            for j in 0..n {
                a.swap(col * n + j, max_row * n + j);
            }
            b.swap(col, max_row);
        }

        let pivot = a[col * n + col];
        for k in (col + 1)..n {
            let factor = a[k * n + col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                a[k * n + j] -= factor * a[col * n + j];
            }
            b[k] -= factor * b[col];
        }
    }

    // Back substitution
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let tail: f64 = ((i + 1)..n).map(|j| a[i * n + j] * x[j]).sum();
        x[i] = (b[i] - tail) / a[i * n + i];
    }
    Ok(x)
}
