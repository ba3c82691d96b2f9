//! Error types for the CLUE core library.
//!
//! Every failure the pipeline can report is a configuration error in the
//! sense of the algorithm: the run aborts and the point set is left without
//! annotations. Each variant carries a stable machine-readable code.

use std::{fmt, num::NonZeroUsize};

use thiserror::Error;

use crate::builder::ExecutionStrategy;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced when configuring or running [`crate::Clue`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ClueError {
    /// The critical distance must be positive and finite.
    #[error("critical distance must be positive and finite (got {got})")]
    InvalidCriticalDistance {
        /// The rejected critical distance.
        got: f32,
    },
    /// The density threshold must be positive and finite.
    #[error("density threshold must be positive and finite (got {got})")]
    InvalidDensityThreshold {
        /// The rejected density threshold.
        got: f32,
    },
    /// The outlier delta factor must be positive and finite.
    #[error("outlier delta factor must be positive and finite (got {got})")]
    InvalidOutlierDeltaFactor {
        /// The rejected multiplier.
        got: f32,
    },
    /// The per-seed traversal stack must hold at least one entry.
    #[error("local_stack_size_per_seed must be at least 1 (got {got})")]
    InvalidStackSize {
        /// The rejected capacity.
        got: usize,
    },
    /// The tiling heuristic needs at least one point per tile.
    #[error("points_per_tile must be at least 1 (got {got})")]
    InvalidPointsPerTile {
        /// The rejected tile occupancy target.
        got: usize,
    },
    /// A fixed tile capacity, when configured, must be at least one.
    #[error("tile capacity must be at least 1 (got {got})")]
    InvalidTileCapacity {
        /// The rejected capacity.
        got: usize,
    },
    /// Points must have at least one coordinate.
    #[error("points must have at least one dimension")]
    ZeroDimension,
    /// The point set passed to the pipeline contained no points.
    #[error("point set contains no points")]
    EmptyPointSet,
    /// A coordinate was NaN or infinite.
    #[error("point {point} has a non-finite coordinate in dimension {dimension}")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        point: usize,
        /// Dimension holding the offending value.
        dimension: usize,
    },
    /// A flat coordinate buffer did not match the requested dimensionality.
    #[error("expected coordinates of dimension {expected} but found {actual}")]
    DimensionMismatch {
        /// Dimensionality required by the point set.
        expected: usize,
        /// Dimensionality (or trailing length) actually supplied.
        actual: usize,
    },
    /// Per-point arrays handed to one phase had different lengths.
    #[error("expected {expected} entries in {array} but found {actual}")]
    LengthMismatch {
        /// Name of the offending array.
        array: &'static str,
        /// Number of points the phase was given.
        expected: usize,
        /// Length of the offending array.
        actual: usize,
    },
    /// A spatial index or follower table referred to a point the phase does
    /// not hold.
    #[error("point index {point} is out of range for {points} points")]
    PointOutOfRange {
        /// The rejected point index.
        point: usize,
        /// Number of points the phase was given.
        points: usize,
    },
    /// The point count does not fit the 32-bit point index space.
    #[error("{points} points exceed the 32-bit point index space")]
    IndexOverflow {
        /// Number of points supplied.
        points: usize,
    },
    /// A tile received more points than its fixed capacity.
    #[error("tile {bin} received {count} points but its capacity is {capacity}")]
    TileCapacityExceeded {
        /// Global bin identifier of the overfull tile.
        bin: usize,
        /// Number of points that mapped to the tile.
        count: usize,
        /// Configured per-tile capacity.
        capacity: NonZeroUsize,
    },
    /// The spatial index mapped a point to a bin it does not hold.
    #[error("point {point} mapped to bin {bin} but the index has {bins} bins")]
    BinOutOfRange {
        /// Index of the point being filed.
        point: usize,
        /// The rejected bin identifier.
        bin: usize,
        /// Number of bins in the index.
        bins: usize,
    },
    /// A follower chain was deeper than the per-seed traversal stack allows.
    #[error(
        "follower chain below seed {seed} reaches depth {depth}, exceeding local_stack_size_per_seed {capacity}"
    )]
    StackCapacityExceeded {
        /// Point index of the seed whose traversal overflowed.
        seed: u32,
        /// Depth of the follower that could not be pushed.
        depth: usize,
        /// Configured per-seed capacity.
        capacity: NonZeroUsize,
    },
    /// A point classified as follower had no nearest-higher neighbour.
    #[error("point {point} is a follower but has no nearest-higher neighbour within the search radius")]
    MissingNearestHigher {
        /// Index of the orphaned follower.
        point: u32,
    },
    /// Propagation was asked for a cluster id with no matching seed.
    #[error("cluster {cluster} does not exist; classification found {seeds} seeds")]
    UnknownCluster {
        /// The rejected cluster id.
        cluster: u32,
        /// Number of seeds available.
        seeds: usize,
    },
    /// The requested execution strategy is unavailable in the current build.
    #[error("the requested execution strategy {requested:?} is not available in this build")]
    BackendUnavailable {
        /// Strategy that could not be satisfied by the current build.
        requested: ExecutionStrategy,
    },
}

define_error_codes! {
    /// Stable codes describing [`ClueError`] variants.
    enum ClueErrorCode for ClueError {
        /// The critical distance must be positive and finite.
        InvalidCriticalDistance => InvalidCriticalDistance { .. } => "CLUE_INVALID_CRITICAL_DISTANCE",
        /// The density threshold must be positive and finite.
        InvalidDensityThreshold => InvalidDensityThreshold { .. } => "CLUE_INVALID_DENSITY_THRESHOLD",
        /// The outlier delta factor must be positive and finite.
        InvalidOutlierDeltaFactor => InvalidOutlierDeltaFactor { .. } => "CLUE_INVALID_OUTLIER_DELTA_FACTOR",
        /// The per-seed traversal stack must hold at least one entry.
        InvalidStackSize => InvalidStackSize { .. } => "CLUE_INVALID_STACK_SIZE",
        /// The tiling heuristic needs at least one point per tile.
        InvalidPointsPerTile => InvalidPointsPerTile { .. } => "CLUE_INVALID_POINTS_PER_TILE",
        /// A fixed tile capacity must be at least one.
        InvalidTileCapacity => InvalidTileCapacity { .. } => "CLUE_INVALID_TILE_CAPACITY",
        /// Points must have at least one coordinate.
        ZeroDimension => ZeroDimension => "CLUE_ZERO_DIMENSION",
        /// The point set contained no points.
        EmptyPointSet => EmptyPointSet => "CLUE_EMPTY_POINT_SET",
        /// A coordinate was NaN or infinite.
        NonFiniteCoordinate => NonFiniteCoordinate { .. } => "CLUE_NON_FINITE_COORDINATE",
        /// A coordinate buffer did not match the requested dimensionality.
        DimensionMismatch => DimensionMismatch { .. } => "CLUE_DIMENSION_MISMATCH",
        /// Per-point arrays had different lengths.
        LengthMismatch => LengthMismatch { .. } => "CLUE_LENGTH_MISMATCH",
        /// A point index was out of range.
        PointOutOfRange => PointOutOfRange { .. } => "CLUE_POINT_OUT_OF_RANGE",
        /// The point count does not fit the point index space.
        IndexOverflow => IndexOverflow { .. } => "CLUE_INDEX_OVERFLOW",
        /// A tile received more points than its capacity.
        TileCapacityExceeded => TileCapacityExceeded { .. } => "CLUE_TILE_CAPACITY_EXCEEDED",
        /// The spatial index mapped a point outside its bins.
        BinOutOfRange => BinOutOfRange { .. } => "CLUE_BIN_OUT_OF_RANGE",
        /// A follower chain was deeper than the traversal stack allows.
        StackCapacityExceeded => StackCapacityExceeded { .. } => "CLUE_STACK_CAPACITY_EXCEEDED",
        /// A follower had no nearest-higher neighbour.
        MissingNearestHigher => MissingNearestHigher { .. } => "CLUE_MISSING_NEAREST_HIGHER",
        /// A cluster id had no matching seed.
        UnknownCluster => UnknownCluster { .. } => "CLUE_UNKNOWN_CLUSTER",
        /// The requested execution strategy is unavailable in the current build.
        BackendUnavailable => BackendUnavailable { .. } => "CLUE_BACKEND_UNAVAILABLE",
    }
}

impl ClueError {
    /// Returns `true` when the error was raised while validating parameters,
    /// before any phase ran.
    ///
    /// # Examples
    /// ```
    /// use clue_core::ClueError;
    ///
    /// assert!(ClueError::InvalidStackSize { got: 0 }.is_parameter_error());
    /// assert!(!ClueError::EmptyPointSet.is_parameter_error());
    /// ```
    #[must_use]
    pub const fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCriticalDistance { .. }
                | Self::InvalidDensityThreshold { .. }
                | Self::InvalidOutlierDeltaFactor { .. }
                | Self::InvalidStackSize { .. }
                | Self::InvalidPointsPerTile { .. }
                | Self::InvalidTileCapacity { .. }
        )
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ClueError>;
