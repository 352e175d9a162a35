//! Factorization pass-through and serde form of dense matrices

use fmat::distribution;
use fmat::{DenseMatrix, DenseVector, FmatError, Matrix, MatrixOperations, QrMethod, Solver};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assert_all_close(actual: &DenseMatrix, expected: &DenseMatrix, tolerance: f32) {
    assert_eq!(actual.dimensions(), expected.dimensions());
    for (a, e) in actual
        .to_column_major_vec()
        .iter()
        .zip(expected.to_column_major_vec())
    {
        assert!((a - e).abs() <= tolerance, "{a} vs {e}");
    }
}

/// `B^T B + n I` is symmetric positive definite for any `B`
fn random_spd(n: usize, seed: u64) -> DenseMatrix {
    let mut sampler = distribution::normal(0.0, 1.0, Some(seed)).unwrap();
    let b = DenseMatrix::random(n, n, &mut sampler).unwrap();
    let gram = b.transpose_this_and_multiply(&b).unwrap();
    gram.add(&DenseMatrix::diagonal_filled(n, n, n as f32).unwrap())
        .unwrap()
}

#[test]
fn every_solver_recovers_a_known_solution() {
    init();
    let matrix = random_spd(6, 31);
    let expected = DenseMatrix::from_fn(6, 2, |row, col| (row as f32 - 2.0) * (col as f32 + 1.0))
        .unwrap();
    let rhs = matrix.multiply(&expected).unwrap();
    let before = matrix.clone();

    let solvers: Vec<(&str, Box<dyn Solver>)> = vec![
        ("cholesky", Box::new(matrix.cholesky().unwrap())),
        ("lu", Box::new(matrix.lu().unwrap())),
        ("qr", Box::new(matrix.qr(QrMethod::Full).unwrap())),
        ("thin qr", Box::new(matrix.qr(QrMethod::Thin).unwrap())),
        ("gram-schmidt", Box::new(matrix.gram_schmidt().unwrap())),
        ("svd", Box::new(matrix.svd(true).unwrap())),
        ("evd", Box::new(matrix.evd().unwrap())),
    ];
    for (name, solver) in &solvers {
        let solution = solver.solve(&rhs).unwrap();
        for (a, e) in solution
            .to_column_major_vec()
            .iter()
            .zip(expected.to_column_major_vec())
        {
            assert!((a - e).abs() <= 1e-3, "{name}: {a} vs {e}");
        }
    }
    assert_eq!(matrix, before);
}

#[test]
fn solve_vector_matches_matrix_solve() {
    init();
    let matrix = random_spd(4, 32);
    let x = DenseVector::of_slice(&[1.0, -1.0, 2.0, 0.5]).unwrap();
    let b = matrix.multiply_vector(&x).unwrap();
    let solved = matrix.lu().unwrap().solve_vector(&b).unwrap();
    for (a, e) in solved.to_vec().iter().zip(x.to_vec()) {
        assert!((a - e).abs() <= 1e-4);
    }
}

#[test]
fn determinant_agrees_across_factorizations() {
    init();
    let matrix = random_spd(5, 33);
    let lu = matrix.determinant().unwrap();
    let cholesky = matrix.cholesky().unwrap().determinant();
    let evd = matrix.evd().unwrap().determinant();
    let qr = matrix.qr(QrMethod::Full).unwrap().determinant().unwrap();
    for other in [cholesky, evd, qr] {
        assert!((lu - other).abs() <= 1e-3 * lu.abs(), "{lu} vs {other}");
    }
}

#[test]
fn numerical_failures_are_reported() {
    init();
    let singular = DenseMatrix::of_array(&[[1.0, 2.0], [2.0, 4.0]]).unwrap();
    assert!(singular.lu().unwrap().is_singular());
    let rhs = DenseMatrix::filled(2, 1, 1.0).unwrap();
    assert_eq!(
        singular.lu().unwrap().solve(&rhs).err(),
        Some(FmatError::Singular)
    );
    assert_eq!(
        singular.cholesky().err(),
        Some(FmatError::NotPositiveDefinite)
    );
    assert_eq!(
        DenseMatrix::of_array(&[[1.0, 2.0], [3.0, 4.0]]).unwrap().evd().err(),
        Some(FmatError::NotSymmetric)
    );
    assert_eq!(singular.svd(true).unwrap().rank(), 1);
}

#[test]
fn svd_reconstructs_a_rectangular_matrix() {
    init();
    let mut sampler = distribution::uniform(-1.0, 1.0, Some(34)).unwrap();
    let matrix = DenseMatrix::random(7, 4, &mut sampler).unwrap();
    let svd = matrix.svd(true).unwrap();
    let u = svd.u().unwrap();
    let s = svd.singular_values();
    let scaled = DenseMatrix::from_fn(7, 4, |row, col| u.at(row, col) * s[col] as f32).unwrap();
    assert_all_close(&scaled.multiply(&svd.vt().unwrap()).unwrap(), &matrix, 1e-4);
    assert!(s.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn serde_round_trip_is_column_major() {
    init();
    let matrix = DenseMatrix::of_array(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    let json = serde_json::to_string(&matrix).unwrap();
    assert_eq!(json, r#"{"rows":2,"columns":3,"data":[1.0,4.0,2.0,5.0,3.0,6.0]}"#);
    let decoded: DenseMatrix = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, matrix);

    let bad = r#"{"rows":2,"columns":3,"data":[1.0]}"#;
    assert!(serde_json::from_str::<DenseMatrix>(bad).is_err());
}
