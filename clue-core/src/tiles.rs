//! Spatial index over a regular grid of tiles.
//!
//! The pipeline only reads the index through [`SpatialIndex`]. [`TileGeometry`]
//! owns the coordinate-to-bin mapping; [`Tiles`] pairs a geometry with the bin
//! contents produced by the tile builder.

use std::num::NonZeroUsize;

use crate::bucket::BucketTable;

/// Per-dimension `[min, max]` extent of an axis-aligned search box.
pub type SearchBox<const D: usize> = [[f32; 2]; D];

/// Read access to a populated spatial index.
///
/// Bins are addressed two ways: by a global bin id in `0..bin_count()`, and by
/// a per-dimension bin coordinate that [`Self::bin_at`] flattens into the
/// global id.
pub trait SpatialIndex<const D: usize> {
    /// Returns the global bin holding `coords`.
    fn bin_of(&self, coords: &[f32; D]) -> usize;

    /// Returns the inclusive per-dimension bin range covering `search_box`.
    fn bin_range_for_box(&self, search_box: &SearchBox<D>) -> BinRange<D>;

    /// Flattens a per-dimension bin coordinate into a global bin id.
    fn bin_at(&self, bin: &[u32; D]) -> usize;

    /// Returns the point indices stored in `bin`.
    fn bin_contents(&self, bin: usize) -> &[u32];

    /// Returns the total number of bins.
    fn bin_count(&self) -> usize;
}

/// Inclusive per-dimension range of bin coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinRange<const D: usize> {
    min: [u32; D],
    max: [u32; D],
}

impl<const D: usize> BinRange<D> {
    /// Creates a range spanning `min[d]..=max[d]` in every dimension.
    #[must_use]
    pub const fn new(min: [u32; D], max: [u32; D]) -> Self {
        Self { min, max }
    }

    /// Returns the lower corner.
    #[must_use]
    #[rustfmt::skip]
    pub const fn min(&self) -> [u32; D] { self.min }

    /// Returns the upper corner.
    #[must_use]
    #[rustfmt::skip]
    pub const fn max(&self) -> [u32; D] { self.max }

    /// Enumerates the cartesian product of the per-dimension ranges.
    ///
    /// The first dimension varies slowest, the last fastest, mirroring a
    /// nested loop with one level per dimension.
    ///
    /// # Examples
    /// ```
    /// use clue_core::BinRange;
    ///
    /// let bins: Vec<_> = BinRange::new([0, 4], [1, 5]).iter().collect();
    /// assert_eq!(bins, vec![[0, 4], [0, 5], [1, 4], [1, 5]]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> BinRangeIter<D> {
        let exhausted = self.min.iter().zip(&self.max).any(|(lo, hi)| lo > hi);
        BinRangeIter {
            range: *self,
            next: (!exhausted).then_some(self.min),
        }
    }

    /// Returns how many bins the range covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.min
            .iter()
            .zip(&self.max)
            .map(|(&lo, &hi)| if hi < lo { 0 } else { (hi - lo) as usize + 1 })
            .product()
    }

    /// Returns `true` when the range covers no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const D: usize> IntoIterator for &BinRange<D> {
    type Item = [u32; D];
    type IntoIter = BinRangeIter<D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Odometer over the bins of a [`BinRange`].
#[derive(Clone, Debug)]
pub struct BinRangeIter<const D: usize> {
    range: BinRange<D>,
    next: Option<[u32; D]>,
}

impl<const D: usize> Iterator for BinRangeIter<D> {
    type Item = [u32; D];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let mut advanced = current;
        self.next = None;
        for dim in (0..D).rev() {
            if advanced[dim] < self.range.max[dim] {
                advanced[dim] += 1;
                advanced[dim + 1..].copy_from_slice(&self.range.min[dim + 1..]);
                self.next = Some(advanced);
                break;
            }
        }
        Some(current)
    }
}

/// Regular grid partition of the bounding box of a point set.
///
/// Coordinates outside the box clamp to the border bins, so every finite
/// coordinate maps to exactly one bin.
///
/// # Examples
/// ```
/// use clue_core::TileGeometry;
///
/// let geometry = TileGeometry::new([0.0, 0.0], [10.0, 10.0], [5, 5]);
/// assert_eq!(geometry.bin_count(), 25);
/// assert_eq!(geometry.bin_of(&[0.0, 0.0]), 0);
/// assert_eq!(geometry.bin_of(&[10.0, 10.0]), 24);
/// assert_eq!(geometry.bin_of(&[3.0, 9.0]), 1 * 5 + 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TileGeometry<const D: usize> {
    min: [f32; D],
    tile_size: [f32; D],
    tiles_per_dim: [u32; D],
    bin_count: usize,
}

impl<const D: usize> TileGeometry<D> {
    /// Creates a geometry spanning `min..=max` with `tiles_per_dim[d]` tiles
    /// along dimension `d`. Zero tile counts are raised to one, and degenerate
    /// extents use unit-sized tiles.
    #[must_use]
    pub fn new(min: [f32; D], max: [f32; D], tiles_per_dim: [u32; D]) -> Self {
        let tiles_per_dim = tiles_per_dim.map(|tiles| tiles.max(1));
        let mut tile_size = [1.0_f32; D];
        for dim in 0..D {
            let extent = max[dim] - min[dim];
            if extent.is_finite() && extent > 0.0 {
                tile_size[dim] = extent / tiles_per_dim[dim] as f32;
            }
        }
        let bin_count = tiles_per_dim.iter().map(|&tiles| tiles as usize).product();
        Self {
            min,
            tile_size,
            tiles_per_dim,
            bin_count,
        }
    }

    /// Sizes a grid over the bounding box of `coords` so that, on average,
    /// each tile holds about `points_per_tile` points.
    ///
    /// An empty slice yields a single unit tile at the origin.
    #[must_use]
    pub fn for_points(coords: &[[f32; D]], points_per_tile: NonZeroUsize) -> Self {
        let Some(first) = coords.first() else {
            return Self::new([0.0; D], [1.0; D], [1; D]);
        };
        let mut min = *first;
        let mut max = *first;
        for point in coords {
            for dim in 0..D {
                min[dim] = min[dim].min(point[dim]);
                max[dim] = max[dim].max(point[dim]);
            }
        }

        let tiles = coords.len().div_ceil(points_per_tile.get()).max(1);
        let per_dim = tiles_per_dimension(tiles, D);
        Self::new(min, max, [per_dim; D])
    }

    /// Returns the number of tiles along each dimension.
    #[must_use]
    #[rustfmt::skip]
    pub fn tiles_per_dim(&self) -> [u32; D] { self.tiles_per_dim }

    /// Returns the tile edge length along each dimension.
    #[must_use]
    #[rustfmt::skip]
    pub fn tile_size(&self) -> [f32; D] { self.tile_size }

    fn bin_coordinate(&self, dim: usize, value: f32) -> u32 {
        let offset = (value - self.min[dim]) / self.tile_size[dim];
        let last = self.tiles_per_dim[dim] - 1;
        if offset.is_nan() || offset <= 0.0 {
            0
        } else if offset >= last as f32 {
            last
        } else {
            // Truncation towards zero is the floor for positive offsets.
            (offset as u32).min(last)
        }
    }

    pub(crate) fn bin_coordinates(&self, coords: &[f32; D]) -> [u32; D] {
        let mut bin = [0_u32; D];
        for (dim, slot) in bin.iter_mut().enumerate() {
            *slot = self.bin_coordinate(dim, coords[dim]);
        }
        bin
    }

    /// Returns the global bin holding `coords`.
    #[must_use]
    pub fn bin_of(&self, coords: &[f32; D]) -> usize {
        self.global_bin(&self.bin_coordinates(coords))
    }

    /// Returns the total number of bins.
    #[must_use]
    #[rustfmt::skip]
    pub fn bin_count(&self) -> usize { self.bin_count }

    /// Flattens a per-dimension bin coordinate, first dimension most
    /// significant.
    #[must_use]
    pub fn global_bin(&self, bin: &[u32; D]) -> usize {
        bin.iter()
            .zip(&self.tiles_per_dim)
            .fold(0_usize, |acc, (&index, &tiles)| {
                acc * tiles as usize + index as usize
            })
    }

    /// Returns the bin range covering `search_box`, clamped to the grid.
    #[must_use]
    pub fn range_for_box(&self, search_box: &SearchBox<D>) -> BinRange<D> {
        let mut min = [0_u32; D];
        let mut max = [0_u32; D];
        for (dim, [lo, hi]) in search_box.iter().enumerate() {
            min[dim] = self.bin_coordinate(dim, *lo);
            max[dim] = self.bin_coordinate(dim, *hi);
        }
        BinRange::new(min, max)
    }
}

/// Smallest per-dimension tile count whose `dimensions`-th power covers
/// `tiles`.
fn tiles_per_dimension(tiles: usize, dimensions: usize) -> u32 {
    let exponent = u32::try_from(dimensions).unwrap_or(u32::MAX).max(1);
    let mut per_dim = (tiles as f64).powf(1.0 / f64::from(exponent)).floor() as u32;
    per_dim = per_dim.max(1);
    while (per_dim as usize)
        .checked_pow(exponent)
        .is_some_and(|covered| covered < tiles)
    {
        per_dim += 1;
    }
    per_dim
}

/// A [`TileGeometry`] together with the point indices filed under each bin.
#[derive(Clone, Debug)]
pub struct Tiles<const D: usize> {
    geometry: TileGeometry<D>,
    bins: BucketTable,
}

impl<const D: usize> Tiles<D> {
    pub(crate) fn from_parts(geometry: TileGeometry<D>, bins: BucketTable) -> Self {
        Self { geometry, bins }
    }

    /// Returns the grid geometry.
    #[must_use]
    #[rustfmt::skip]
    pub fn geometry(&self) -> &TileGeometry<D> { &self.geometry }

    /// Returns the number of points filed across all bins.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.bins.len()
    }

    /// Returns the occupancy of the fullest bin.
    #[must_use]
    pub fn max_occupancy(&self) -> usize {
        self.bins.max_bucket_len()
    }
}

impl<const D: usize> SpatialIndex<D> for Tiles<D> {
    fn bin_of(&self, coords: &[f32; D]) -> usize {
        self.geometry.bin_of(coords)
    }

    fn bin_range_for_box(&self, search_box: &SearchBox<D>) -> BinRange<D> {
        self.geometry.range_for_box(search_box)
    }

    fn bin_at(&self, bin: &[u32; D]) -> usize {
        self.geometry.global_bin(bin)
    }

    fn bin_contents(&self, bin: usize) -> &[u32] {
        self.bins.get(bin)
    }

    fn bin_count(&self) -> usize {
        self.geometry.bin_count
    }
}
