use log::debug;
use rand::{rngs::StdRng, Rng};
use redcode::Point;
use thiserror::Error;

use crate::config::RoundConfig;

/// Failures while loading warriors into a fresh core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// A warrior image longer than the configured limit
    #[error(
        "warrior {index} is {length} instructions long, over the limit of \
         {limit}"
    )]
    TooLong {
        /// Position of the warrior in the load order
        index: usize,
        /// Its image length
        length: usize,
        /// The configured limit
        limit: usize,
    },

    /// A warrior with no instructions at all
    #[error("warrior {index} has no instructions")]
    Empty {
        /// Position of the warrior in the load order
        index: usize,
    },

    /// The retry budget ran out before a legal arrangement appeared
    #[error(
        "could not separate {count} warriors by {min_distance} cells"
    )]
    NoRoom {
        /// Number of warriors being placed
        count: usize,
        /// The configured separation
        min_distance: u32,
    },
}

/// Candidate draws per warrior before placement gives up
const RETRY_BUDGET: usize = 20_000;

/// Choose an origin for each warrior.
///
/// The first warrior lands on a uniformly random cell.  Each later warrior
/// is drawn uniformly from cells that keep the flat-index distance to every
/// earlier origin at or above `min_distance` and whose image shares no cell
/// with an earlier image.
pub(crate) fn choose_origins(
    config: &RoundConfig,
    lengths: &[usize],
    rng: &mut StdRng,
) -> Result<Vec<Point>, PlacementError> {
    for (index, &length) in lengths.iter().enumerate() {
        if length == 0 {
            return Err(PlacementError::Empty { index });
        }
        if length > config.max_length {
            return Err(PlacementError::TooLong {
                index,
                length,
                limit: config.max_length,
            });
        }
    }

    let cells = config.core_cells();
    let no_room = PlacementError::NoRoom {
        count: lengths.len(),
        min_distance: config.min_distance,
    };
    // A circle of n origins needs n gaps of at least min_distance
    if lengths.len() > 1
        && lengths.len() as u64 * u64::from(config.min_distance) > cells as u64
    {
        return Err(no_room.clone());
    }

    let mut origins: Vec<Point> = Vec::with_capacity(lengths.len());
    for (index, &length) in lengths.iter().enumerate() {
        let mut attempts = 0;
        let origin = loop {
            if attempts >= RETRY_BUDGET {
                return Err(no_room.clone());
            }
            attempts += 1;
            let candidate = cell_at(rng.gen_range(0..cells), config);
            let legal = origins.iter().zip(lengths).all(|(&placed, &placed_len)| {
                separated(candidate, placed, config)
                    && !overlapping(candidate, length, placed, placed_len, config)
            });
            if legal {
                break candidate;
            }
        };
        debug!("placed warrior {index} ({length} cells) at {origin}");
        origins.push(origin);
    }
    Ok(origins)
}

/// The point with the given row-major flat index
fn cell_at(flat: usize, config: &RoundConfig) -> Point {
    let width = config.core_size_x as usize;
    Point::new(
        i32::try_from(flat % width).unwrap_or(0),
        i32::try_from(flat / width).unwrap_or(0),
    )
}

/// Whether two origins keep the circular flat-index separation
fn separated(a: Point, b: Point, config: &RoundConfig) -> bool {
    let cells = config.core_cells() as i64;
    let extent = config.extent();
    let fa = a.index(extent) as i64;
    let fb = b.index(extent) as i64;
    let direct = (fa - fb).abs();
    direct.min(cells - direct) >= i64::from(config.min_distance)
}

/// Whether two images, each laid out along its own row, share a cell.
///
/// Images wrap within their row, so two same-row intervals can collide
/// even when their flat indexes look far apart.
fn overlapping(
    a: Point,
    a_len: usize,
    b: Point,
    b_len: usize,
    config: &RoundConfig,
) -> bool {
    if a.y != b.y {
        return false;
    }
    let width = i64::from(config.core_size_x);
    let forward = i64::from(a.x - b.x).rem_euclid(width);
    let backward = i64::from(b.x - a.x).rem_euclid(width);
    forward < b_len as i64 || backward < a_len as i64
}
