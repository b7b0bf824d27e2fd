//! Squeezes raw visit counts, which span several orders of magnitude,
//! into a narrow display band.  The curve is a logistic in the cube
//! root of the count: it sits near 0 for empty pixels, passes its
//! midpoint of 60 at a count of 125, and flattens towards 120.
//!
//! The curve only stays strictly below 120 for counts up to about
//! 31000.  Past that, `2^(-2 (cbrt(x) - 5))` falls under f64 epsilon,
//! the denominator rounds to exactly 1, and the curve returns 120.0.
//! `tone_map` does not clamp, so counts that large map to 120, the
//! same value the original 16-bit renderer produced for them.

use crate::histogram::{HistogramGrid, Pixel};

/// Upper asymptote of the curve.
pub const TONE_CEILING: f64 = 120.0;

/// `120 / (1 + 2^(-2 (cbrt(x) - 5)))`
#[inline]
pub fn tone_curve(x: f64) -> f64 {
    TONE_CEILING / (1.0 + (-2.0 * (x.cbrt() - 5.0)).exp2())
}

/// The curve applied to one counter, truncated.
#[inline]
pub fn tone_map(count: u16) -> u16 {
    tone_curve(f64::from(count)) as u16
}

impl Pixel {
    /// Each channel passed through `tone_map`.
    pub fn tone_mapped(self) -> Pixel {
        Pixel::new(
            tone_map(self.red),
            tone_map(self.green),
            tone_map(self.blue),
        )
    }
}

impl HistogramGrid {
    /// A copy of the grid with every pixel tone mapped.
    pub fn tone_mapped(&self) -> HistogramGrid {
        self.map_pixels(Pixel::tone_mapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(tone_map(0), 0);
        assert_eq!(tone_map(8), 1);
        assert_eq!(tone_map(100), 45);
        assert_eq!(tone_map(300), 109);
        assert_eq!(tone_map(1000), 119);
    }

    #[test]
    fn large_counts_round_up_to_the_ceiling() {
        // Past about 31000 the gap to 120 is below f64 resolution.
        assert_eq!(tone_map(20_000), 119);
        assert_eq!(tone_map(u16::max_value()), 120);
    }

    #[test]
    fn curve_is_monotonic_and_bounded() {
        let mut last = 0.0;
        for x in 0..=20_000u32 {
            let y = tone_curve(f64::from(x));
            assert!(y > 0.0 && y < TONE_CEILING, "f({}) = {}", x, y);
            assert!(y >= last, "f({}) = {} < {}", x, y, last);
            last = y;
        }
        assert_eq!(tone_curve(1e12), TONE_CEILING);
    }

    #[test]
    fn pixels_map_per_channel() {
        assert_eq!(
            Pixel::new(0, 100, 1000).tone_mapped(),
            Pixel::new(0, 45, 119)
        );
    }

    #[test]
    fn grids_map_cell_by_cell() {
        let mut grid = HistogramGrid::new(2, 1).unwrap();
        *grid.get_mut(1, 0).unwrap() = Pixel::new(300, 8, 0);
        let toned = grid.tone_mapped();
        assert_eq!(toned.get(0, 0), Some(&Pixel::new(0, 0, 0)));
        assert_eq!(toned.get(1, 0), Some(&Pixel::new(109, 1, 0)));
    }
}
