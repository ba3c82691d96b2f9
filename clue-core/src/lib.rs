//! CLUE core library.
//!
//! Density-based clustering of low-dimensional point sets in five data
//! parallel phases: tile filling, local density, nearest-higher search,
//! classification, and cluster propagation. [`Clue::run`] drives them all;
//! the phase functions are public for callers that need intermediate values.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bucket;
mod builder;
mod clue;
mod error;
mod exec;
mod kernels;
mod points;
mod result;
mod tiles;

#[cfg(test)]
mod test_utils;

pub use crate::{
    bucket::{BucketError, BucketTable},
    builder::{ClueBuilder, ClueParams, ExecutionStrategy},
    clue::Clue,
    error::{ClueError, ClueErrorCode, Result},
    exec::Executor,
    kernels::{
        Classification, NearestHigher, Thresholds, assign_clusters, fill_tiles, find_clusters,
        local_density, nearest_higher, nearest_higher_of, point_density, propagate_from_seed,
    },
    points::{PointRole, PointSet},
    result::{ClusterId, ClusteringResult},
    tiles::{BinRange, BinRangeIter, SearchBox, SpatialIndex, TileGeometry, Tiles},
};
