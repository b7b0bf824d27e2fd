// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-channel iteration cutoffs.  This is what turns a Buddhabrot into
//! a Nebulabrot: each color channel only counts the first N points of
//! every escaping orbit, so channels with small thresholds show the
//! short, fast-escaping orbits and channels with large thresholds pick
//! up the long, slow ones.

use crate::errors::{BuddhaError, Result};

/// Smallest iteration budget in which any orbit can escape.
pub const MIN_BUDGET: usize = 3;

/// The red, green and blue iteration thresholds.  The largest of the
/// three is also the iteration budget for a single orbit, and is only
/// ever derived from the other three.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Thresholds {
    red: usize,
    green: usize,
    blue: usize,
    max: usize,
}

impl Thresholds {
    /// Any non-negative cutoffs are allowed, in any order.  Fails only
    /// when even the largest cutoff leaves no room for an orbit to
    /// escape: `z_1` is the seed itself, inside the radius-2 disk, so
    /// the earliest possible escape is `z_2`, seen at step 2 of a
    /// budget of at least 3.
    pub fn new(red: usize, green: usize, blue: usize) -> Result<Self> {
        let max = red.max(green).max(blue);
        if max < MIN_BUDGET {
            return Err(BuddhaError::InvalidThreshold { max });
        }
        Ok(Thresholds {
            red,
            green,
            blue,
            max,
        })
    }

    /// Red cutoff.
    pub fn red(&self) -> usize {
        self.red
    }

    /// Green cutoff.
    pub fn green(&self) -> usize {
        self.green
    }

    /// Blue cutoff.
    pub fn blue(&self) -> usize {
        self.blue
    }

    /// The iteration budget, and the length of the orbit buffer.
    pub fn max(&self) -> usize {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_is_derived_from_the_channels() {
        assert_eq!(Thresholds::new(500_000, 5000, 500).unwrap().max(), 500_000);
        assert_eq!(Thresholds::new(50, 5000, 500).unwrap().max(), 5000);
        assert_eq!(Thresholds::new(0, 0, 7).unwrap().max(), 7);
    }

    #[test]
    fn thresholds_too_small_to_escape_are_rejected() {
        match Thresholds::new(1, 0, 1) {
            Err(BuddhaError::InvalidThreshold { max: 1 }) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert!(Thresholds::new(0, 0, 0).is_err());
        assert!(Thresholds::new(0, 2, 0).is_err());
        assert!(Thresholds::new(0, 3, 0).is_ok());
    }
}
