/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;

use crate::element::Element;
use crate::matrix::{check_index, BuilderFactory, Matrix, Memo, SharedMatrix};
use crate::rectangle::Rectangle;
use crate::utils;
use super::bands::BandTable;

/// Builds the row-band and column-band tables of a grid whose cells have the
/// given shapes.
///
/// # Panics
///
/// Panics unless every cell in a block row shares a height and every cell in
/// a block column shares a width.
fn grid_bands(shapes: &[Vec<(usize, usize)>]) -> (BandTable, BandTable) {
    let width = shapes.first().map_or(0, |row| row.len());
    for (i, row) in shapes.iter().enumerate() {
        assert_eq!(row.len(), width, "block row {} has {} blocks, expected {}", i, row.len(), width);
    }

    let heights: Vec<usize> = shapes.iter().map(|row| row.first().map_or(0, |s| s.0)).collect();
    let widths: Vec<usize> = match shapes.first() {
        Some(row) => row.iter().map(|s| s.1).collect(),
        None => vec![],
    };
    for (i, row) in shapes.iter().enumerate() {
        for (j, &(rows, columns)) in row.iter().enumerate() {
            assert_eq!(
                rows, heights[i],
                "block ({}, {}) has {} rows, but block row {} is {} rows high", i, j, rows, i, heights[i],
            );
            assert_eq!(
                columns, widths[j],
                "block ({}, {}) has {} columns, but block column {} is {} columns wide", i, j, columns, j, widths[j],
            );
        }
    }
    (BandTable::new(heights), BandTable::new(widths))
}

/// A grid of matrices, read as one.
pub struct BlockMatrix<T: Element> {
    blocks: Vec<Vec<SharedMatrix<T>>>,
    rows: BandTable,
    columns: BandTable,
    factory: BuilderFactory<T>,
    memo: Memo<T>,
}

impl<T: Element> BlockMatrix<T> {
    /// # Panics
    ///
    /// Panics if the block shapes do not line up into a grid.
    pub fn new(blocks: Vec<Vec<SharedMatrix<T>>>) -> Self {
        Self::with_builder(blocks, T::default_builder)
    }

    /// A single row of blocks.
    pub fn row(blocks: Vec<SharedMatrix<T>>) -> Self { Self::new(vec![blocks]) }

    /// A single column of blocks.
    pub fn column(blocks: Vec<SharedMatrix<T>>) -> Self {
        Self::new(blocks.into_iter().map(|b| vec![b]).collect())
    }

    pub fn with_builder(blocks: Vec<Vec<SharedMatrix<T>>>, factory: BuilderFactory<T>) -> Self {
        let shapes: Vec<Vec<_>> = blocks.iter()
            .map(|row| row.iter().map(|b| b.dims()).collect())
            .collect();
        let (rows, columns) = grid_bands(&shapes);
        BlockMatrix { blocks, rows, columns, factory, memo: Memo::new() }
    }

    pub fn block(&self, block_row: usize, block_column: usize) -> &SharedMatrix<T> {
        &self.blocks[block_row][block_column]
    }

    /// Number of block rows and block columns.
    pub fn grid_dims(&self) -> (usize, usize) { (self.rows.band_count(), self.columns.band_count()) }
}

impl<T: Element> fmt::Debug for BlockMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BlockMatrix").field("blocks", &self.blocks).finish()
    }
}

impl<T: Element> Matrix<T> for BlockMatrix<T> {
    fn get(&self, row: usize, column: usize) -> T {
        check_index(self.dims(), row, column);
        let (block_row, r) = self.rows.locate(row);
        let (block_column, c) = self.columns.locate(column);
        self.blocks[block_row][block_column].get(r, c)
    }

    fn row_count(&self) -> usize { self.rows.len() }

    fn column_count(&self) -> usize { self.columns.len() }

    fn builder_factory(&self) -> BuilderFactory<T> { self.factory }

    fn memo(&self) -> Option<&Memo<T>> { Some(&self.memo) }

    fn determinant(&self) -> T {
        self.memo.determinant_with(|| self.materialize().determinant())
    }
}

//--------------------------------------------------------

/// A grid of regions of a single matrix, read as one.
///
/// The regions may overlap and need not be in order.
pub struct BlockMatrixOfRectangles<T: Element> {
    matrix: SharedMatrix<T>,
    rects: Vec<Vec<Rectangle>>,
    rows: BandTable,
    columns: BandTable,
    factory: BuilderFactory<T>,
    memo: Memo<T>,
}

impl<T: Element> BlockMatrixOfRectangles<T> {
    /// # Panics
    ///
    /// Panics if a rectangle does not fit in `matrix`, or if the rectangle
    /// shapes do not line up into a grid.
    pub fn new(matrix: SharedMatrix<T>, rects: Vec<Vec<Rectangle>>) -> Self {
        let factory = matrix.builder_factory();
        Self::with_builder(matrix, rects, factory)
    }

    pub fn with_builder(matrix: SharedMatrix<T>, rects: Vec<Vec<Rectangle>>, factory: BuilderFactory<T>) -> Self {
        for rect in rects.iter().flatten() {
            assert!(
                utils::is_valid_rectangle(&*matrix, rect),
                "rectangle {} does not fit in a {}x{} matrix", rect, matrix.row_count(), matrix.column_count(),
            );
        }
        let shapes: Vec<Vec<_>> = rects.iter()
            .map(|row| row.iter().map(|r| (r.row_count(), r.column_count())).collect())
            .collect();
        let (rows, columns) = grid_bands(&shapes);
        BlockMatrixOfRectangles { matrix, rects, rows, columns, factory, memo: Memo::new() }
    }

    pub fn rectangles(&self) -> &[Vec<Rectangle>] { &self.rects }
}

impl<T: Element> fmt::Debug for BlockMatrixOfRectangles<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BlockMatrixOfRectangles")
            .field("rects", &self.rects)
            .field("matrix", &self.matrix)
            .finish()
    }
}

impl<T: Element> Matrix<T> for BlockMatrixOfRectangles<T> {
    fn get(&self, row: usize, column: usize) -> T {
        check_index(self.dims(), row, column);
        let (block_row, r) = self.rows.locate(row);
        let (block_column, c) = self.columns.locate(column);
        let rect = &self.rects[block_row][block_column];
        self.matrix.get(rect.top_row() + r, rect.left_column() + c)
    }

    fn row_count(&self) -> usize { self.rows.len() }

    fn column_count(&self) -> usize { self.columns.len() }

    fn builder_factory(&self) -> BuilderFactory<T> { self.factory }

    fn memo(&self) -> Option<&Memo<T>> { Some(&self.memo) }

    fn determinant(&self) -> T {
        self.memo.determinant_with(|| self.materialize().determinant())
    }
}
