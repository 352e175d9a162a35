//! Householder QR factorization

use super::{solve_orthogonal, Solver, Work};
use crate::dense::DenseMatrix;
use fmat_core::{validate_square, Matrix, QrMethod, Result};

/// `A = Q R` with orthogonal `Q` and upper-triangular `R`
#[derive(Debug, Clone)]
pub struct Qr {
    q: Work,
    r: Work,
    method: QrMethod,
    reflections: usize,
}

impl Qr {
    /// Factor `matrix` with `min(rows, columns)` Householder reflections
    ///
    /// [`QrMethod::Full`] keeps `Q` as `m x m` and `R` as `m x n`;
    /// [`QrMethod::Thin`] keeps the leading `m x k` and `k x n` blocks with
    /// `k = min(m, n)`.
    pub fn factor(matrix: &DenseMatrix, method: QrMethod) -> Result<Self> {
        let (m, n) = matrix.dimensions();
        let steps = m.min(n);
        let mut r = Work::of(matrix);
        let mut reflectors = Vec::with_capacity(steps);

        for k in 0..steps {
            let norm = (k..m).map(|i| r[(i, k)] * r[(i, k)]).sum::<f64>().sqrt();
            if norm == 0.0 {
                reflectors.push(None);
                continue;
            }
            let alpha = if r[(k, k)] >= 0.0 { -norm } else { norm };
            let mut v: Vec<f64> = (k..m).map(|i| r[(i, k)]).collect();
            v[0] -= alpha;
            let v_norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            if v_norm == 0.0 {
                reflectors.push(None);
                continue;
            }
            v.iter_mut().for_each(|x| *x /= v_norm);

            for col in k..n {
                let dot: f64 = v.iter().enumerate().map(|(i, vi)| vi * r[(k + i, col)]).sum();
                for (i, vi) in v.iter().enumerate() {
                    r[(k + i, col)] -= 2.0 * vi * dot;
                }
            }
            r[(k, k)] = alpha;
            for i in k + 1..m {
                r[(i, k)] = 0.0;
            }
            reflectors.push(Some(v));
        }

        // Q = H_0 H_1 ... H_{steps-1}
        let mut q = Work::identity(m);
        for (k, reflector) in reflectors.iter().enumerate().rev() {
            let Some(v) = reflector else { continue };
            for col in 0..m {
                let dot: f64 = v.iter().enumerate().map(|(i, vi)| vi * q[(k + i, col)]).sum();
                for (i, vi) in v.iter().enumerate() {
                    q[(k + i, col)] -= 2.0 * vi * dot;
                }
            }
        }

        let reflections = reflectors.iter().filter(|v| v.is_some()).count();
        let (q, r) = match method {
            QrMethod::Full => (q, r),
            QrMethod::Thin => (q.block(m, steps), r.block(steps, n)),
        };
        log::trace!("qr: {m}x{n}, {reflections} reflections");
        Ok(Self {
            q,
            r,
            method,
            reflections,
        })
    }

    pub fn q(&self) -> DenseMatrix {
        self.q.to_matrix()
    }

    pub fn r(&self) -> DenseMatrix {
        self.r.to_matrix()
    }

    pub fn method(&self) -> QrMethod {
        self.method
    }

    /// Whether the leading `min(m, n)` diagonal of `R` has no zero
    pub fn is_full_rank(&self) -> bool {
        let steps = self.r.rows().min(self.r.columns());
        (0..steps).all(|i| self.r[(i, i)] != 0.0)
    }

    /// Determinant of a square input
    pub fn determinant(&self) -> Result<f64> {
        let n = validate_square((self.q.rows(), self.r.columns()))?;
        let sign = if self.reflections % 2 == 0 { 1.0 } else { -1.0 };
        Ok(sign * (0..n).map(|i| self.r[(i, i)]).product::<f64>())
    }
}

impl Solver for Qr {
    /// Least-squares solution for inputs with at least as many rows as columns
    fn solve(&self, rhs: &DenseMatrix) -> Result<DenseMatrix> {
        solve_orthogonal(&self.q, &self.r, rhs)
    }
}
