/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;
use std::sync::Arc;

use crate::element::{Element, Scalar};
use crate::matrix::{check_index, BuilderFactory, Matrix, Memo, SharedMatrix};
use super::bands::BandTable;

/// Blocks laid along the main diagonal, with `zero` everywhere else.
///
/// Blocks need not be square; the view is (sum of block rows) by (sum of
/// block columns).
pub struct BlockDiagonalView<T: Element> {
    blocks: Vec<SharedMatrix<T>>,
    zero: T,
    rows: BandTable,
    columns: BandTable,
    factory: BuilderFactory<T>,
    memo: Memo<T>,
}

impl<T: Scalar> BlockDiagonalView<T> {
    pub fn new(blocks: Vec<SharedMatrix<T>>) -> Self { Self::with_zero(blocks, T::zero()) }
}

impl<T: Element> BlockDiagonalView<T> {
    pub fn with_zero(blocks: Vec<SharedMatrix<T>>, zero: T) -> Self {
        Self::with_builder(blocks, zero, T::default_builder)
    }

    pub fn with_builder(blocks: Vec<SharedMatrix<T>>, zero: T, factory: BuilderFactory<T>) -> Self {
        let rows = BandTable::new(blocks.iter().map(|b| b.row_count()).collect());
        let columns = BandTable::new(blocks.iter().map(|b| b.column_count()).collect());
        BlockDiagonalView { blocks, zero, rows, columns, factory, memo: Memo::new() }
    }

    pub fn blocks(&self) -> &[SharedMatrix<T>] { &self.blocks }
}

impl<T: Element> fmt::Debug for BlockDiagonalView<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BlockDiagonalView")
            .field("blocks", &self.blocks)
            .field("zero", &self.zero)
            .finish()
    }
}

impl<T: Element> Matrix<T> for BlockDiagonalView<T> {
    fn get(&self, row: usize, column: usize) -> T {
        check_index(self.dims(), row, column);
        let (block_row, r) = self.rows.locate(row);
        let (block_column, c) = self.columns.locate(column);
        match block_row == block_column {
            true => self.blocks[block_row].get(r, c),
            false => self.zero.clone(),
        }
    }

    fn row_count(&self) -> usize { self.rows.len() }

    fn column_count(&self) -> usize { self.columns.len() }

    fn builder_factory(&self) -> BuilderFactory<T> { self.factory }

    fn memo(&self) -> Option<&Memo<T>> { Some(&self.memo) }

    fn is_symmetric_by_construction(&self) -> bool {
        self.blocks.iter().all(|b| b.row_count() == b.column_count() && b.is_symmetric_by_construction())
    }

    /// Scales each block; the result is still a block-diagonal view.
    fn scale(&self, scalar: T) -> SharedMatrix<T>
    where T: Scalar,
    {
        Arc::new(BlockDiagonalView {
            blocks: self.blocks.iter().map(|b| b.scale(scalar)).collect(),
            zero: self.zero,
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            factory: self.factory,
            memo: Memo::new(),
        })
    }

    fn determinant(&self) -> T {
        self.memo.determinant_with(|| self.materialize().determinant())
    }
}
