//! Symmetric eigenvalue decomposition by cyclic Jacobi rotations

use super::jacobi::{argsort_by, Rotation};
use super::{rhs_work, Solver, Work};
use crate::dense::DenseMatrix;
use fmat_core::{validate_square, FmatError, Matrix, Result, MAX_JACOBI_SWEEPS};

/// `A = V diag(lambda) V^T` with eigenvalues in ascending order and the
/// matching orthonormal eigenvectors as the columns of `V`
#[derive(Debug, Clone)]
pub struct Evd {
    eigenvalues: Vec<f64>,
    eigenvectors: Work,
}

impl Evd {
    /// Fails with [`FmatError::NotSymmetric`] unless `matrix` equals its transpose
    pub fn factor(matrix: &DenseMatrix) -> Result<Self> {
        let n = validate_square(matrix.dimensions())?;
        if !matrix.is_symmetric() {
            return Err(FmatError::NotSymmetric);
        }
        let mut work = Work::of(matrix);
        let mut vectors = Work::identity(n);

        let tolerance = n as f64 * f64::EPSILON * work.frobenius_norm();

        let mut converged = false;
        for sweep in 0..MAX_JACOBI_SWEEPS {
            let largest = (0..n)
                .flat_map(|p| (p + 1..n).map(move |q| (p, q)))
                .map(|(p, q)| work[(p, q)].abs())
                .fold(0.0, f64::max);
            if largest <= tolerance {
                log::trace!("evd: {n}x{n} converged after {sweep} sweeps");
                converged = true;
                break;
            }
            for p in 0..n {
                for q in p + 1..n {
                    if work[(p, q)].abs() <= tolerance {
                        continue;
                    }
                    let rotation = Rotation::annihilate(work[(p, p)], work[(q, q)], work[(p, q)]);
                    rotation.apply_two_sided(&mut work, p, q);
                    rotation.apply_to_columns(&mut vectors, p, q);
                }
            }
        }
        if !converged {
            return Err(FmatError::NotConverged);
        }

        let diagonal: Vec<f64> = (0..n).map(|i| work[(i, i)]).collect();
        let order = argsort_by(&diagonal, |a, b| a.total_cmp(&b));
        Ok(Self {
            eigenvalues: order.iter().map(|&i| diagonal[i]).collect(),
            eigenvectors: vectors.permute_columns(&order),
        })
    }

    /// Eigenvalues in ascending order
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// Eigenvectors as columns, in eigenvalue order
    pub fn eigenvectors(&self) -> DenseMatrix {
        self.eigenvectors.to_matrix()
    }

    /// Eigenvalues on the diagonal of a dense matrix
    pub fn d(&self) -> DenseMatrix {
        let n = self.eigenvalues.len();
        let mut d = Work::zeros(n, n);
        for (i, &value) in self.eigenvalues.iter().enumerate() {
            d[(i, i)] = value;
        }
        d.to_matrix()
    }

    pub fn determinant(&self) -> f64 {
        self.eigenvalues.iter().product()
    }

    /// Whether no eigenvalue is zero
    pub fn is_full_rank(&self) -> bool {
        self.eigenvalues.iter().all(|&value| value != 0.0)
    }
}

impl Solver for Evd {
    fn solve(&self, rhs: &DenseMatrix) -> Result<DenseMatrix> {
        if !self.is_full_rank() {
            return Err(FmatError::Singular);
        }
        let v = &self.eigenvectors;
        let n = v.rows();
        let b = rhs_work(rhs, n)?;
        let mut x = Work::zeros(n, b.columns());
        for col in 0..b.columns() {
            let rhs_col = b.column(col);
            for (k, &lambda) in self.eigenvalues.iter().enumerate() {
                let coefficient =
                    v.column(k).iter().zip(rhs_col).map(|(a, b)| a * b).sum::<f64>() / lambda;
                for row in 0..n {
                    x[(row, col)] += coefficient * v[(row, k)];
                }
            }
        }
        Ok(x.to_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factorization::test_support::{assert_close, general, spd};

    #[test]
    fn test_known_eigenvalues() {
        let matrix = DenseMatrix::of_array(&[[2.0, 1.0], [1.0, 2.0]]).unwrap();
        let evd = matrix.evd().unwrap();
        assert!((evd.eigenvalues()[0] - 1.0).abs() < 1e-9);
        assert!((evd.eigenvalues()[1] - 3.0).abs() < 1e-9);
        assert!((evd.determinant() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_reconstructs() {
        let matrix = spd();
        let evd = matrix.evd().unwrap();
        let v = evd.eigenvectors();
        let rebuilt = v.multiply(&evd.d()).unwrap().transpose_and_multiply(&v).unwrap();
        assert_close(&rebuilt, &matrix, 1e-3);

        let expected = DenseMatrix::of_column_major(3, 1, [1.0, 0.0, -1.0]).unwrap();
        let rhs = matrix.multiply(&expected).unwrap();
        assert_close(&evd.solve(&rhs).unwrap(), &expected, 1e-3);
    }

    #[test]
    fn test_rejects_asymmetric() {
        assert_eq!(general().evd().err(), Some(FmatError::NotSymmetric));
        assert_eq!(
            DenseMatrix::zeros(2, 3).unwrap().evd().err(),
            Some(FmatError::NotSquare)
        );
    }
}
