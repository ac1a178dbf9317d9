/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

/// Lookup table from a global index to `(band, offset within band)`, for a
/// partition of `0..len` into consecutive bands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BandTable {
    sizes: Vec<usize>,
    starts: Vec<usize>,
    // per index
    bands: Vec<usize>,
    offsets: Vec<usize>,
}

impl BandTable {
    pub(crate) fn new(sizes: Vec<usize>) -> Self {
        let mut starts = Vec::with_capacity(sizes.len());
        let mut bands = vec![];
        let mut offsets = vec![];
        let mut start = 0;
        for (band, &size) in sizes.iter().enumerate() {
            starts.push(start);
            bands.extend(std::iter::repeat(band).take(size));
            offsets.extend(0..size);
            start += size;
        }
        BandTable { sizes, starts, bands, offsets }
    }

    /// Total length covered by all bands.
    pub(crate) fn len(&self) -> usize { self.bands.len() }

    pub(crate) fn band_count(&self) -> usize { self.sizes.len() }

    #[inline]
    pub(crate) fn locate(&self, index: usize) -> (usize, usize) {
        (self.bands[index], self.offsets[index])
    }

    pub(crate) fn start(&self, band: usize) -> usize { self.starts[band] }

    pub(crate) fn size(&self, band: usize) -> usize { self.sizes[band] }
}
