/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Text encodings of `f64` matrices.
//!
//! Two forms are read:
//!
//! * dense: `[1, 2; 3, 4]`, rows separated by `;` and elements by `,`.
//!   Brackets are optional and empty pieces are skipped.
//! * sparse: `2x2: 0,0=5; 1,1=7`, the shape followed by explicit entries.
//!   Entries that are not listed keep the builder's initial fill.
//!
//! One form is written: `2x2 [[1, 2], [3, 4]]`, which is also the `Display`
//! of every matrix.

#[macro_use] extern crate log;

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use blockmat_matrix::{DenseBuilder, Element, Matrix, MatrixBuilder, SharedMatrix};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected number of values in row at index {row}: expected: {expected}, got {actual}")]
    RaggedRow { row: usize, expected: usize, actual: usize },

    #[error("Invalid matrix string format: {text:?}")]
    Format { text: String },

    #[error("invalid number {text:?}")]
    Number { text: String, #[source] source: ParseFloatError },

    #[error("invalid index {text:?}")]
    Index { text: String, #[source] source: ParseIntError },

    #[error("entry ({row}, {column}) is outside of a {row_count}x{column_count} matrix")]
    OutOfBounds { row: usize, column: usize, row_count: usize, column_count: usize },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Reads either form, choosing sparse when the text contains an `x`.
pub fn from_str_into<B>(builder: &mut B, text: &str) -> ParseResult<SharedMatrix<f64>>
where B: ?Sized + MatrixBuilder<f64>,
{
    match text.contains('x') {
        true => from_sparse_str_into(builder, text),
        false => from_dense_str_into(builder, text),
    }
}

pub fn from_dense_str_into<B>(builder: &mut B, text: &str) -> ParseResult<SharedMatrix<f64>>
where B: ?Sized + MatrixBuilder<f64>,
{
    let text = text.replace('[', "").replace(']', "");
    let rows: Vec<Vec<f64>> = non_empty_pieces(&text, ';')
        .map(|row| non_empty_pieces(row, ',').map(parse_value).collect())
        .collect::<ParseResult<_>>()?;

    let column_count = rows.first().map_or(0, |row| row.len());
    for (i, row) in rows.iter().enumerate() {
        if row.len() != column_count {
            return Err(ParseError::RaggedRow { row: i, expected: column_count, actual: row.len() });
        }
    }

    builder.set_shape(rows.len(), column_count);
    for (r, row) in rows.into_iter().enumerate() {
        for (c, value) in row.into_iter().enumerate() {
            builder.set(r, c, value);
        }
    }
    Ok(builder.build())
}

pub fn from_sparse_str_into<B>(builder: &mut B, text: &str) -> ParseResult<SharedMatrix<f64>>
where B: ?Sized + MatrixBuilder<f64>,
{
    let format_error = || ParseError::Format { text: text.to_string() };

    let mut parts = text.split(':');
    let shape = parts.next().unwrap_or("");
    let entries = parts.next();
    if parts.next().is_some() {
        return Err(format_error());
    }

    let (row_count, column_count) = match split_pair(shape, 'x') {
        Some((r, c)) => (parse_index(r)?, parse_index(c)?),
        None => return Err(format_error()),
    };

    let mut assignments = vec![];
    for entry in entries.into_iter().flat_map(|s| non_empty_pieces(s, ';')) {
        let (index, value) = split_pair(entry, '=').ok_or_else(format_error)?;
        let (row, column) = split_pair(index, ',').ok_or_else(format_error)?;
        let (row, column) = (parse_index(row)?, parse_index(column)?);
        if row >= row_count || column >= column_count {
            return Err(ParseError::OutOfBounds { row, column, row_count, column_count });
        }
        assignments.push((row, column, parse_value(value)?));
    }

    trace!("sparse text: {}x{} with {} entries", row_count, column_count, assignments.len());
    builder.set_shape(row_count, column_count);
    for (row, column, value) in assignments {
        builder.set(row, column, value);
    }
    Ok(builder.build())
}

/// [`from_str_into`] with a fresh dense builder.
pub fn from_str(text: &str) -> ParseResult<SharedMatrix<f64>> {
    from_str_into(&mut DenseBuilder::new(), text)
}

/// [`from_dense_str_into`] with a fresh dense builder.
pub fn from_dense_str(text: &str) -> ParseResult<SharedMatrix<f64>> {
    from_dense_str_into(&mut DenseBuilder::new(), text)
}

/// [`from_sparse_str_into`] with a fresh dense builder, so unlisted entries are zero.
pub fn from_sparse_str(text: &str) -> ParseResult<SharedMatrix<f64>> {
    from_sparse_str_into(&mut DenseBuilder::new(), text)
}

/// `RxC [[a, b], [c, d]]`.
pub fn to_string<T: Element + std::fmt::Display>(m: &dyn Matrix<T>) -> String {
    blockmat_matrix::matrix_to_string(m)
}

fn non_empty_pieces(text: &str, separator: char) -> impl Iterator<Item = &str> {
    text.split(separator).map(str::trim).filter(|s| !s.is_empty())
}

/// Exactly two trimmed pieces around `separator`.
fn split_pair(text: &str, separator: char) -> Option<(&str, &str)> {
    let mut pieces = text.split(separator).map(str::trim);
    match (pieces.next(), pieces.next(), pieces.next()) {
        (Some(a), Some(b), None) => Some((a, b)),
        _ => None,
    }
}

fn parse_value(text: &str) -> ParseResult<f64> {
    text.trim().parse().map_err(|source| ParseError::Number { text: text.to_string(), source })
}

fn parse_index(text: &str) -> ParseResult<usize> {
    text.trim().parse().map_err(|source| ParseError::Index { text: text.to_string(), source })
}
