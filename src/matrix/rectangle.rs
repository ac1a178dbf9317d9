/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::convert::TryFrom;
use std::fmt;
use std::ops::Range;

use crate::errors::InvalidRectangle;

/// A region of a matrix: top row, left column, and (nonzero) extents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "[usize; 4]", into = "[usize; 4]"))]
pub struct Rectangle {
    top_row: usize,
    left_column: usize,
    row_count: usize,
    column_count: usize,
}

impl Rectangle {
    /// # Panics
    ///
    /// Panics if either count is zero.
    pub fn new(top_row: usize, left_column: usize, row_count: usize, column_count: usize) -> Self {
        match Self::try_new(top_row, left_column, row_count, column_count) {
            Ok(rect) => rect,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(
        top_row: usize,
        left_column: usize,
        row_count: usize,
        column_count: usize,
    ) -> Result<Self, InvalidRectangle> {
        if row_count == 0 || column_count == 0 {
            return Err(InvalidRectangle { row_count, column_count });
        }
        Ok(Rectangle { top_row, left_column, row_count, column_count })
    }

    pub fn top_row(&self) -> usize { self.top_row }
    pub fn left_column(&self) -> usize { self.left_column }
    pub fn row_count(&self) -> usize { self.row_count }
    pub fn column_count(&self) -> usize { self.column_count }

    /// One past the last row.
    pub fn bottom_row(&self) -> usize { self.top_row + self.row_count }
    /// One past the last column.
    pub fn right_column(&self) -> usize { self.left_column + self.column_count }

    pub fn row_range(&self) -> Range<usize> { self.top_row..self.bottom_row() }
    pub fn column_range(&self) -> Range<usize> { self.left_column..self.right_column() }

    /// The same region in the transposed matrix.
    pub fn transposed(&self) -> Self {
        Rectangle {
            top_row: self.left_column,
            left_column: self.top_row,
            row_count: self.column_count,
            column_count: self.row_count,
        }
    }

    /// Shift by an offset; used to express a region of a sub-matrix in the
    /// coordinates of its parent.
    pub fn translated(&self, rows: usize, columns: usize) -> Self {
        Rectangle {
            top_row: self.top_row + rows,
            left_column: self.left_column + columns,
            ..*self
        }
    }

    /// Whether `other` lies entirely within `self`.
    pub fn contains(&self, other: &Rectangle) -> bool {
        self.top_row <= other.top_row
            && self.left_column <= other.left_column
            && other.bottom_row() <= self.bottom_row()
            && other.right_column() <= self.right_column()
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "(top row {}, left column {}, {}x{})",
            self.top_row, self.left_column, self.row_count, self.column_count,
        )
    }
}

impl TryFrom<[usize; 4]> for Rectangle {
    type Error = InvalidRectangle;

    fn try_from([top, left, rows, columns]: [usize; 4]) -> Result<Self, Self::Error> {
        Rectangle::try_new(top, left, rows, columns)
    }
}

impl From<Rectangle> for [usize; 4] {
    fn from(rect: Rectangle) -> [usize; 4] {
        [rect.top_row, rect.left_column, rect.row_count, rect.column_count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let rect = Rectangle::new(1, 2, 3, 4);
        assert_eq!(rect.row_range(), 1..4);
        assert_eq!(rect.column_range(), 2..6);
        assert_eq!(rect.transposed(), Rectangle::new(2, 1, 4, 3));
        assert_eq!(rect.translated(10, 20), Rectangle::new(11, 22, 3, 4));
        assert!(rect.contains(&Rectangle::new(2, 3, 1, 1)));
        assert!(!rect.contains(&Rectangle::new(2, 3, 3, 1)));
        assert_eq!(rect.to_string(), "(top row 1, left column 2, 3x4)");
    }

    #[test]
    fn equality_is_fieldwise() {
        assert_eq!(Rectangle::new(0, 0, 1, 1), Rectangle::new(0, 0, 1, 1));
        assert_ne!(Rectangle::new(0, 0, 1, 1), Rectangle::new(0, 1, 1, 1));
    }

    #[test]
    #[should_panic(expected = "rectangle must have a nonzero")]
    fn empty_rectangle() {
        Rectangle::new(0, 0, 0, 3);
    }

    #[test]
    fn fallible_construction() {
        assert_eq!(
            Rectangle::try_new(0, 0, 2, 0),
            Err(InvalidRectangle { row_count: 2, column_count: 0 }),
        );
        assert_eq!(Rectangle::try_from([1, 1, 1, 1]), Ok(Rectangle::new(1, 1, 1, 1)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_validates() {
        let rect: Rectangle = ::serde_json::from_str("[0, 1, 2, 3]").unwrap();
        assert_eq!(rect, Rectangle::new(0, 1, 2, 3));
        assert_eq!(::serde_json::to_string(&rect).unwrap(), "[0,1,2,3]");
        assert!(::serde_json::from_str::<Rectangle>("[0, 1, 0, 3]").is_err());
    }
}
