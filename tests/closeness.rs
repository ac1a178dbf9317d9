/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use blockmat::{Closeness, DenseMatrix, Matrix, MatrixClosenessCheck};
use blockmat::matrix::arithmetics::{mean_column, mean_element, mean_row};
use blockmat::matrix::utils::to_row_major_vec;
use blockmat_assert_close::assert_close;

mod shared;
use self::shared::{dense, init_logger, random_dense};

#[test]
fn distant_value_is_reported_with_its_index() {
    init_logger();
    let a = dense(&[[1.0, 2.0], [3.0, 4.0]]);
    let b = dense(&[[1.0, 2.0], [3.0, 5.0]]);
    let result = MatrixClosenessCheck::absolute(0.0).apply(&*a, &*b);
    assert_eq!(result, Closeness::ValuesDistant { row: 1, column: 1, lhs: 4.0, rhs: 5.0 });
    assert_eq!(
        result.to_string(),
        "Matrix values distant; lhs element value = 4.0, rhs element value = 5.0, row index = 1, column index = 1",
    );
}

#[test]
fn row_count_is_checked_first() {
    init_logger();
    let result = MatrixClosenessCheck::absolute(1.0).apply(&DenseMatrix::zeros(2, 2), &DenseMatrix::zeros(3, 5));
    assert_eq!(result, Closeness::RowCountMismatch { lhs: 2, rhs: 3 });
    assert_eq!(result.to_string(), "Row count mismatch; lhs row count = 2, rhs row count = 3");
}

#[test]
fn views_compare_against_storage() {
    init_logger();
    let m = random_dense(4, 3);
    let twice = m.clone().transpose().transpose();
    MatrixClosenessCheck::absolute(0.0).assert_satisfied(&*m, &*twice);

    // the Gram matrix of a random tall matrix is invertible
    let gram = m.clone().transpose().mult(&*m);
    let product = gram.invert().mult(&*gram);
    MatrixClosenessCheck::absolute(1e-8).assert_satisfied(&*product, &DenseMatrix::identity(3));
}

#[test]
fn streaming_means() {
    init_logger();
    let value = 0.1 + 0.2;
    let rows: Vec<[f64; 3]> = vec![[value; 3]; 1000];
    let m = dense(&rows);

    // identical samples give back the sample exactly
    assert_eq!(to_row_major_vec(&*mean_row(&*m)), vec![value; 3]);
    assert_eq!(to_row_major_vec(&*mean_column(&*m)), vec![value; 1000]);
    assert_close!(mean_element(&*m), value);

    let m = dense(&[[1.0, 2.0], [3.0, 6.0]]);
    assert_eq!(to_row_major_vec(&*mean_row(&*m)), vec![2.0, 4.0]);
    assert_eq!(to_row_major_vec(&*mean_column(&*m)), vec![1.5, 4.5]);
}
