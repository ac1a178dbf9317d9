/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

#![allow(dead_code)]

use std::sync::Once;

use blockmat::{DenseMatrix, Matrix, SharedMatrix};

static LOGGER_ONCE: Once = Once::new();

/// Sends log output to the captured test stderr. Honors `RUST_LOG`.
pub fn init_logger() {
    LOGGER_ONCE.call_once(|| {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    });
}

pub fn dense<R: AsRef<[f64]>>(rows: &[R]) -> SharedMatrix<f64> {
    DenseMatrix::from_rows(rows).shared()
}

/// A `rows x columns` matrix of uniform samples from `[-1, 1)`.
pub fn random_dense(rows: usize, columns: usize) -> SharedMatrix<f64> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let data = (0..rows * columns).map(|_| rng.gen_range(-1.0..1.0)).collect();
    DenseMatrix::from_row_major_data((rows, columns), data).shared()
}
