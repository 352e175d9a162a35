//! Singular value decomposition by one-sided Jacobi rotations

use super::jacobi::{argsort_by, Rotation};
use super::{rhs_work, Solver, Work};
use crate::dense::DenseMatrix;
use fmat_core::{FmatError, Matrix, Result, MAX_JACOBI_SWEEPS};

/// Column pairs whose cosine is below this are treated as orthogonal
const ORTHOGONALITY_TOLERANCE: f64 = 1e-12;

/// Economy-size `A = U diag(s) V^T` with `k = min(m, n)` singular values in
/// descending order; `U` is `m x k` and `V^T` is `k x n`
#[derive(Debug, Clone)]
pub struct Svd {
    singular_values: Vec<f64>,
    u: Option<Work>,
    vt: Option<Work>,
    rows: usize,
    columns: usize,
}

impl Svd {
    pub fn factor(matrix: &DenseMatrix, compute_vectors: bool) -> Result<Self> {
        let (rows, columns) = matrix.dimensions();
        let work = Work::of(matrix);
        // Orthogonalize the columns of the taller orientation
        let transposed = rows < columns;
        let work = if transposed { work.transpose() } else { work };
        let (singular_values, left, right) = one_sided_jacobi(work)?;

        let (u, vt) = if !compute_vectors {
            (None, None)
        } else if transposed {
            // A^T = U' S V'^T  =>  A = V' S U'^T
            (Some(right), Some(left.transpose()))
        } else {
            (Some(left), Some(right.transpose()))
        };
        Ok(Self {
            singular_values,
            u,
            vt,
            rows,
            columns,
        })
    }

    /// Singular values in descending order
    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// Left singular vectors as columns
    pub fn u(&self) -> Result<DenseMatrix> {
        self.u.as_ref().map(Work::to_matrix).ok_or(FmatError::VectorsNotComputed)
    }

    /// Right singular vectors as rows
    pub fn vt(&self) -> Result<DenseMatrix> {
        self.vt.as_ref().map(Work::to_matrix).ok_or(FmatError::VectorsNotComputed)
    }

    /// Largest singular value
    pub fn l2_norm(&self) -> f64 {
        self.singular_values.first().copied().unwrap_or(0.0)
    }

    /// Ratio of the largest to the smallest singular value
    pub fn condition_number(&self) -> f64 {
        let smallest = self.singular_values.last().copied().unwrap_or(0.0);
        self.l2_norm() / smallest
    }

    /// Singular values below this are treated as zero
    fn tolerance(&self) -> f64 {
        self.rows.max(self.columns) as f64 * self.l2_norm() * f64::from(f32::EPSILON)
    }

    /// Number of singular values above the rank tolerance
    pub fn rank(&self) -> usize {
        let tolerance = self.tolerance();
        self.singular_values.iter().filter(|&&s| s > tolerance).count()
    }
}

/// Returns `(s, U, V)` for a work matrix with `rows >= columns`
fn one_sided_jacobi(mut u: Work) -> Result<(Vec<f64>, Work, Work)> {
    let n = u.columns();
    let mut v = Work::identity(n);

    let mut converged = false;
    for _ in 0..MAX_JACOBI_SWEEPS {
        converged = true;
        for p in 0..n {
            for q in p + 1..n {
                let (col_p, col_q) = (u.column(p), u.column(q));
                let a_pp: f64 = col_p.iter().map(|x| x * x).sum();
                let a_qq: f64 = col_q.iter().map(|x| x * x).sum();
                let a_pq: f64 = col_p.iter().zip(col_q).map(|(x, y)| x * y).sum();
                if a_pq.abs() <= ORTHOGONALITY_TOLERANCE * (a_pp * a_qq).sqrt() {
                    continue;
                }
                converged = false;
                let rotation = Rotation::annihilate(a_pp, a_qq, a_pq);
                rotation.apply_to_columns(&mut u, p, q);
                rotation.apply_to_columns(&mut v, p, q);
            }
        }
        if converged {
            break;
        }
    }
    if !converged {
        return Err(FmatError::NotConverged);
    }

    let norms: Vec<f64> = (0..n)
        .map(|j| u.column(j).iter().map(|x| x * x).sum::<f64>().sqrt())
        .collect();
    for (j, &norm) in norms.iter().enumerate() {
        if norm > 0.0 {
            u.column_mut(j).iter_mut().for_each(|x| *x /= norm);
        }
    }

    let order = argsort_by(&norms, |a, b| b.total_cmp(&a));
    let singular_values = order.iter().map(|&j| norms[j]).collect();
    Ok((singular_values, u.permute_columns(&order), v.permute_columns(&order)))
}

impl Solver for Svd {
    /// Minimum-norm least-squares solution `x = V S^+ U^T b`
    fn solve(&self, rhs: &DenseMatrix) -> Result<DenseMatrix> {
        let (Some(u), Some(vt)) = (&self.u, &self.vt) else {
            return Err(FmatError::VectorsNotComputed);
        };
        let b = rhs_work(rhs, self.rows)?;
        let tolerance = self.tolerance();
        let mut x = Work::zeros(self.columns, b.columns());
        for col in 0..b.columns() {
            let rhs_col = b.column(col);
            for (k, &sigma) in self.singular_values.iter().enumerate() {
                if sigma <= tolerance {
                    continue;
                }
                let coefficient =
                    u.column(k).iter().zip(rhs_col).map(|(a, b)| a * b).sum::<f64>() / sigma;
                for row in 0..self.columns {
                    x[(row, col)] += coefficient * vt[(k, row)];
                }
            }
        }
        Ok(x.to_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factorization::test_support::{assert_close, general};

    fn reconstruct(svd: &Svd) -> DenseMatrix {
        let u = svd.u().unwrap();
        let s: Vec<f32> = svd.singular_values().iter().map(|&v| v as f32).collect();
        let scaled = DenseMatrix::from_fn(u.rows(), u.columns(), |row, col| u.at(row, col) * s[col])
            .unwrap();
        scaled.multiply(&svd.vt().unwrap()).unwrap()
    }

    #[test]
    fn test_known_singular_values() {
        let matrix = DenseMatrix::of_array(&[[3.0, 0.0], [4.0, 5.0]]).unwrap();
        let svd = matrix.svd(true).unwrap();
        let s = svd.singular_values();
        assert!((s[0] - 45f64.sqrt()).abs() < 1e-6);
        assert!((s[1] - 5f64.sqrt()).abs() < 1e-6);
        assert!((svd.condition_number() - 3.0).abs() < 1e-6);
        assert_eq!(svd.rank(), 2);
        assert_close(&reconstruct(&svd), &matrix, 1e-5);
    }

    #[test]
    fn test_wide_and_tall() {
        let tall = DenseMatrix::of_array(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        let svd = tall.svd(true).unwrap();
        assert_eq!(svd.u().unwrap().dimensions(), (3, 2));
        assert_eq!(svd.vt().unwrap().dimensions(), (2, 2));
        assert_close(&reconstruct(&svd), &tall, 1e-5);

        let wide = tall.transpose();
        let svd = wide.svd(true).unwrap();
        assert_eq!(svd.u().unwrap().dimensions(), (2, 2));
        assert_eq!(svd.vt().unwrap().dimensions(), (2, 3));
        assert_close(&reconstruct(&svd), &wide, 1e-5);
    }

    #[test]
    fn test_values_only() {
        let svd = general().svd(false).unwrap();
        assert_eq!(svd.u().err(), Some(FmatError::VectorsNotComputed));
        let rhs = DenseMatrix::zeros(3, 1).unwrap();
        assert_eq!(svd.solve(&rhs).err(), Some(FmatError::VectorsNotComputed));
        let product: f64 = svd.singular_values().iter().product();
        assert!((product - 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_rank_deficient_solve() {
        let matrix = DenseMatrix::of_array(&[[1.0, 1.0], [1.0, 1.0]]).unwrap();
        let svd = matrix.svd(true).unwrap();
        assert_eq!(svd.rank(), 1);
        let rhs = DenseMatrix::of_column_major(2, 1, [2.0, 2.0]).unwrap();
        let x = svd.solve(&rhs).unwrap();
        assert_close(&x, &DenseMatrix::of_column_major(2, 1, [1.0, 1.0]).unwrap(), 1e-5);
    }
}
