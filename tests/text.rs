/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use pretty_assertions::assert_eq;

use blockmat::{Matrix, SymmetricMatrix};
use blockmat::matrix::utils::to_nested_vec;
use blockmat::text;

mod shared;
use self::shared::init_logger;

#[test]
fn dense_round_trip() {
    init_logger();
    let m = text::from_dense_str("[1, 2; 3, 4]").unwrap();
    let formatted = text::to_string(&*m);
    assert_eq!(formatted, "2x2 [[1, 2], [3, 4]]");
    assert_eq!(m.to_string(), formatted);

    // the shape prefix is not part of the dense form
    let body = formatted.trim_start_matches("2x2 ").replace("], [", "; ");
    let again = text::from_dense_str(&body).unwrap();
    assert_eq!(to_nested_vec(&*again), to_nested_vec(&*m));
}

#[test]
fn sparse_defaults_to_zero() {
    init_logger();
    let m = text::from_str("2x2: 0,0=5; 1,1=7").unwrap();
    assert_eq!(to_nested_vec(&*m), vec![vec![5.0, 0.0], vec![0.0, 7.0]]);
    assert_eq!(text::to_string(&*m), "2x2 [[5, 0], [0, 7]]");
}

#[test]
fn parse_errors_are_values() {
    init_logger();
    let err = text::from_str("[1, 2; 3]").unwrap_err();
    assert_eq!(err, text::ParseError::RaggedRow { row: 1, expected: 2, actual: 1 });

    let err = text::from_str("1x1: 0,3=1").unwrap_err();
    assert_eq!(err.to_string(), "entry (0, 3) is outside of a 1x1 matrix");
}

#[test]
fn display_of_views() {
    init_logger();
    let m = text::from_str("[1, 2.5; 3, 4]").unwrap();
    assert_eq!(m.clone().transpose().to_string(), "2x2 [[1, 3], [2.5, 4]]");
    assert_eq!(SymmetricMatrix::from_lower(&*m).to_string(), "2x2 [[1, 3], [3, 4]]");
}
