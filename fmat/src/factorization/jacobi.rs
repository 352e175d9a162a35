//! Jacobi rotations shared by the SVD and symmetric eigen solvers

use super::Work;

/// Plane rotation `[c s; -s c]` that annihilates one off-diagonal entry
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rotation {
    pub c: f64,
    pub s: f64,
}

impl Rotation {
    /// Rotation zeroing `a_pq` of the symmetric 2x2 block `[a_pp a_pq; a_pq a_qq]`
    ///
    /// Uses `t = sign(tau) / (|tau| + sqrt(1 + tau^2))` with
    /// `tau = (a_qq - a_pp) / (2 a_pq)`, which avoids cancellation.
    pub fn annihilate(a_pp: f64, a_qq: f64, a_pq: f64) -> Self {
        if a_pq == 0.0 {
            return Self { c: 1.0, s: 0.0 };
        }
        let tau = (a_qq - a_pp) / (2.0 * a_pq);
        let root = (1.0 + tau * tau).sqrt();
        let t = if tau >= 0.0 {
            1.0 / (tau + root)
        } else {
            -1.0 / (-tau + root)
        };
        let c = 1.0 / (1.0 + t * t).sqrt();
        Self { c, s: t * c }
    }

    /// `[col_p, col_q] = [c col_p - s col_q, s col_p + c col_q]`
    pub fn apply_to_columns(&self, work: &mut Work, p: usize, q: usize) {
        for row in 0..work.rows() {
            let (x, y) = (work[(row, p)], work[(row, q)]);
            work[(row, p)] = self.c * x - self.s * y;
            work[(row, q)] = self.s * x + self.c * y;
        }
    }

    /// `A = J^T A J` for symmetric `A`, zeroing `A[p, q]`
    pub fn apply_two_sided(&self, work: &mut Work, p: usize, q: usize) {
        let (a_pp, a_qq, a_pq) = (work[(p, p)], work[(q, q)], work[(p, q)]);
        let (c, s) = (self.c, self.s);
        for k in 0..work.rows() {
            if k == p || k == q {
                continue;
            }
            let (a_kp, a_kq) = (work[(k, p)], work[(k, q)]);
            let new_kp = c * a_kp - s * a_kq;
            let new_kq = s * a_kp + c * a_kq;
            work[(k, p)] = new_kp;
            work[(p, k)] = new_kp;
            work[(k, q)] = new_kq;
            work[(q, k)] = new_kq;
        }
        work[(p, p)] = c * c * a_pp - 2.0 * c * s * a_pq + s * s * a_qq;
        work[(q, q)] = s * s * a_pp + 2.0 * c * s * a_pq + c * c * a_qq;
        work[(p, q)] = 0.0;
        work[(q, p)] = 0.0;
    }
}

/// Indices of `values` sorted by the given comparison of values
pub(crate) fn argsort_by<F>(values: &[f64], mut compare: F) -> Vec<usize>
where
    F: FnMut(f64, f64) -> std::cmp::Ordering,
{
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| compare(values[i], values[j]));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_zeroes_off_diagonal() {
        let mut work = Work::zeros(2, 2);
        work[(0, 0)] = 2.0;
        work[(1, 1)] = 3.0;
        work[(0, 1)] = 1.0;
        work[(1, 0)] = 1.0;
        let rotation = Rotation::annihilate(2.0, 3.0, 1.0);
        assert!((rotation.c * rotation.c + rotation.s * rotation.s - 1.0).abs() < 1e-12);
        rotation.apply_two_sided(&mut work, 0, 1);
        assert_eq!(work[(0, 1)], 0.0);
        // trace is preserved
        assert!((work[(0, 0)] + work[(1, 1)] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_argsort() {
        let order = argsort_by(&[1.0, 3.0, 2.0], |a, b| b.total_cmp(&a));
        assert_eq!(order, vec![1, 2, 0]);
    }
}
