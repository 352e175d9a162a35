//! Behavioural properties of dense matrix construction and arithmetic

use fmat::distribution;
use fmat::{
    DenseMatrix, DenseVector, DiagonalMatrix, FmatError, Matrix, MatrixOperations, SharedBuffer,
    SparseMatrix,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random(rows: usize, columns: usize, seed: u64) -> DenseMatrix {
    let mut sampler = distribution::uniform(-10.0, 10.0, Some(seed)).unwrap();
    DenseMatrix::random(rows, columns, &mut sampler).unwrap()
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

#[test]
fn zeros_reads_zero_everywhere() {
    init();
    let matrix = DenseMatrix::zeros(4, 7).unwrap();
    for row in 0..4 {
        for col in 0..7 {
            assert_eq!(matrix.at(row, col), 0.0);
        }
    }
    assert_eq!(DenseMatrix::zeros(0, 3).err(), Some(FmatError::InvalidDimension));
}

#[test]
fn column_major_round_trip_through_copy() {
    init();
    let array = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
    let original = DenseMatrix::of_array(&array).unwrap();
    let copy = DenseMatrix::of_matrix(&original).unwrap();
    let rebuilt = DenseMatrix::of_column_major(2, 3, copy.to_column_major_vec()).unwrap();
    assert_eq!(rebuilt.to_array::<2, 3>().unwrap(), array);
    assert_eq!(copy.to_column_major_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    assert_eq!(copy.to_row_major_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn double_transpose_is_identity() {
    init();
    let matrix = random(5, 3, 11);
    assert_eq!(matrix.transpose().transpose(), matrix);
    assert_eq!(matrix.transpose().dimensions(), (3, 5));
}

#[test]
fn sum_with_negation_is_zero() {
    init();
    let matrix = random(6, 6, 12);
    assert_eq!(
        matrix.add(&matrix.negate().unwrap()).unwrap(),
        DenseMatrix::zeros(6, 6).unwrap()
    );
}

#[test]
fn identity_trace_equals_order() {
    init();
    for n in 1..6 {
        assert_eq!(DenseMatrix::identity(n).unwrap().trace(), Ok(n as f32));
    }
    assert_eq!(
        DenseMatrix::zeros(2, 3).unwrap().trace(),
        Err(FmatError::NotSquare)
    );
}

#[test]
fn product_shapes() {
    init();
    let a = DenseMatrix::zeros(2, 3).unwrap();
    let b = DenseMatrix::zeros(4, 2).unwrap();
    assert_eq!(a.multiply(&b).err(), Some(FmatError::DimensionMismatch));
    let c = DenseMatrix::zeros(3, 4).unwrap();
    assert_eq!(a.multiply(&c).unwrap().dimensions(), (2, 4));
}

#[test]
fn ones_plus_diagonal() {
    init();
    let ones = DenseMatrix::filled(3, 3, 1.0).unwrap();
    let expected = DenseMatrix::of_array(&[[2.0, 1.0, 1.0], [1.0, 3.0, 1.0], [1.0, 1.0, 4.0]]).unwrap();

    let diagonal = DiagonalMatrix::of_square_diagonal(&[1.0, 2.0, 3.0]).unwrap();
    assert_eq!(ones.add(&diagonal).unwrap(), expected);

    let dense_diagonal = DenseMatrix::of_diagonal_array(&[1.0, 2.0, 3.0]).unwrap();
    assert_eq!(ones.add(&dense_diagonal).unwrap(), expected);

    let sparse = SparseMatrix::of_matrix(&diagonal);
    assert_eq!(ones.add(&sparse).unwrap(), expected);
}

#[test]
fn diagonal_filled_has_expected_trace() {
    init();
    let matrix = DenseMatrix::diagonal_filled(3, 3, 5.0).unwrap();
    assert_eq!(matrix.trace(), Ok(15.0));
    for row in 0..3 {
        for col in 0..3 {
            if row != col {
                assert_eq!(matrix.at(row, col), 0.0);
            }
        }
    }
}

#[test]
fn modulus_and_remainder_signs() {
    init();
    let matrix = DenseMatrix::filled(2, 2, -1.0).unwrap();
    assert_eq!(matrix.modulus(3.0).unwrap(), DenseMatrix::filled(2, 2, 2.0).unwrap());
    assert_eq!(matrix.remainder(3.0).unwrap(), DenseMatrix::filled(2, 2, -1.0).unwrap());

    let divisor = DenseMatrix::filled(2, 2, 3.0).unwrap();
    assert_eq!(
        matrix.pointwise_modulus(&divisor).unwrap(),
        DenseMatrix::filled(2, 2, 2.0).unwrap()
    );
    assert_eq!(
        matrix.pointwise_remainder(&divisor).unwrap(),
        DenseMatrix::filled(2, 2, -1.0).unwrap()
    );
}

#[test]
fn scalar_multiply_then_divide_round_trips() {
    init();
    let matrix = random(8, 5, 13);
    for scalar in [0.5, 3.0, -7.25, 1e3] {
        let round_trip = matrix
            .multiply_scalar(scalar)
            .and_then(|scaled| scaled.divide_scalar(scalar))
            .unwrap();
        assert_all_close(&round_trip, &matrix, 1e-4);
    }
}

#[test]
fn bound_buffers_alias_both_ways() {
    init();
    let buffer = SharedBuffer::new(vec![1.0, 2.0, 3.0, 4.0]);
    let matrix = DenseMatrix::bind(2, 2, buffer.clone()).unwrap();

    buffer.write()[3] = 40.0;
    assert_eq!(matrix.at(1, 1), 40.0);

    matrix.set(0, 1, 30.0).unwrap();
    assert_eq!(buffer.read()[2], 30.0);

    let copy = DenseMatrix::of_matrix(&matrix).unwrap();
    copy.set(0, 0, 10.0).unwrap();
    assert_eq!(buffer.read()[0], 1.0);

    assert_eq!(
        DenseMatrix::bind(3, 2, buffer).err(),
        Some(FmatError::InvalidDimension)
    );
}

#[test]
fn result_may_alias_an_operand() {
    init();
    let a = DenseMatrix::of_array(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    let b = DenseMatrix::of_array(&[[5.0, 6.0], [7.0, 8.0]]).unwrap();
    let expected = a.multiply(&b).unwrap();

    let mut alias = a.share();
    a.multiply_into(&b, &mut alias).unwrap();
    assert_eq!(a, expected);

    let mut alias = b.share();
    b.subtract_into(&b.share(), &mut alias).unwrap();
    assert_eq!(b, DenseMatrix::zeros(2, 2).unwrap());
}

#[test]
fn duplicate_indexed_entries_are_rejected() {
    init();
    let entries = [(0, 0, 1.0), (1, 1, 2.0), (0, 0, 3.0)];
    assert_eq!(
        DenseMatrix::of_indexed(2, 2, entries).err(),
        Some(FmatError::DuplicateEntry)
    );
    assert_eq!(
        SparseMatrix::of_indexed(2, 2, entries).err(),
        Some(FmatError::DuplicateEntry)
    );
    assert_eq!(
        DenseMatrix::of_indexed(2, 2, [(2, 0, 1.0)]).err(),
        Some(FmatError::IndexOutOfBounds)
    );
}

#[test]
fn matrix_vector_products() {
    init();
    let matrix = DenseMatrix::of_array(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    let x = DenseVector::of_slice(&[1.0, 0.0, -1.0]).unwrap();
    assert_eq!(matrix.multiply_vector(&x).unwrap().to_vec(), vec![-2.0, -2.0]);

    let y = DenseVector::of_slice(&[1.0, 1.0]).unwrap();
    assert_eq!(
        matrix.left_multiply_vector(&y).unwrap().to_vec(),
        vec![5.0, 7.0, 9.0]
    );
    assert_eq!(
        matrix.multiply_vector(&y).err(),
        Some(FmatError::DimensionMismatch)
    );
}

#[test]
fn norms_of_random_matrices_are_consistent() {
    init();
    let matrix = random(7, 4, 14);
    let frobenius = matrix.frobenius_norm().unwrap();
    let l2 = matrix.l2_norm().unwrap();
    assert!(l2 <= frobenius + 1e-4);
    assert!(frobenius <= 2.0 * l2 + 1e-4);
    assert!(matrix.l1_norm().unwrap() > 0.0);
    assert!(matrix.infinity_norm().unwrap() > 0.0);
    assert!(matrix.condition_number().unwrap() >= 1.0);
}
