use redcode::Point;
use thiserror::Error;

/// Parameters for a single round.
///
/// The defaults describe the classic 1D setup: an 8000-cell core with one
/// row, an 80000 cycle tie cap, and conventional process and length limits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RoundConfig {
    /// Number of columns in the core
    pub core_size_x: u32,
    /// Number of rows in the core.  1 collapses to classic 1D Core War.
    pub core_size_y: u32,
    /// Cycles executed before all surviving warriors tie
    pub cycles: u32,
    /// Process queue capacity per warrior
    pub max_processes: usize,
    /// Longest accepted warrior image
    pub max_length: usize,
    /// Minimum flat-index distance between warrior placements
    pub min_distance: u32,
    /// Seed for the placement RNG.  Two rounds with the same seed, config,
    /// and warriors execute identically.
    pub rng_seed: Option<u64>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            core_size_x: 8000,
            core_size_y: 1,
            cycles: 80_000,
            max_processes: 8000,
            max_length: 100,
            min_distance: 100,
            rng_seed: None,
        }
    }
}

impl RoundConfig {
    /// The extent of the core as a point
    #[must_use]
    pub fn extent(&self) -> Point {
        Point::new(
            i32::try_from(self.core_size_x).unwrap_or(i32::MAX),
            i32::try_from(self.core_size_y).unwrap_or(i32::MAX),
        )
    }

    /// Total number of cells in the core
    #[must_use]
    pub fn core_cells(&self) -> usize {
        self.core_size_x as usize * self.core_size_y as usize
    }

    /// Check the configuration for values no round can be built from.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.core_size_x == 0 || self.core_size_y == 0 {
            return Err(ConfigError::ZeroCoreSize);
        }
        if i32::try_from(self.core_size_x).is_err()
            || i32::try_from(self.core_size_y).is_err()
        {
            return Err(ConfigError::CoreTooLarge);
        }
        if self.cycles == 0 {
            return Err(ConfigError::ZeroCycles);
        }
        if self.max_processes == 0 {
            return Err(ConfigError::ZeroProcesses);
        }
        if self.max_length == 0 {
            return Err(ConfigError::ZeroLength);
        }
        if (self.min_distance as usize) < self.max_length {
            return Err(ConfigError::DistanceUnderLength {
                min_distance: self.min_distance,
                max_length: self.max_length,
            });
        }
        Ok(())
    }
}

/// Rejected round configurations
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A core extent of zero cells in either direction
    #[error("core size must be positive in both directions")]
    ZeroCoreSize,

    /// A core extent too large to address
    #[error("core size does not fit in a signed 32 bit coordinate")]
    CoreTooLarge,

    /// A tie cap of zero cycles
    #[error("cycle cap must be positive")]
    ZeroCycles,

    /// A process queue capacity of zero
    #[error("process limit must be positive")]
    ZeroProcesses,

    /// A warrior length limit of zero
    #[error("warrior length limit must be positive")]
    ZeroLength,

    /// A placement distance that cannot separate maximum-length warriors
    #[error(
        "minimum distance {min_distance} is shorter than the warrior length \
         limit {max_length}"
    )]
    DistanceUnderLength {
        /// The configured placement separation
        min_distance: u32,
        /// The configured warrior length limit
        max_length: usize,
    },
}
