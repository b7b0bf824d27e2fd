//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and the square of the complex plane that every Buddhabrot orbit
//! passes through on its way out: real and imaginary parts both in
//! [-2, 2].
use num::Complex;

use crate::errors::{BuddhaError, Result};

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.  For that reason,
/// the lower-left-hand corner is not included.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

/// The region orbits are plotted over.  Anything outside it has
/// already escaped.
pub const ESCAPE_PLANE: ComplexPlane =
    ComplexPlane(Complex { re: -2.0, im: -2.0 }, Complex { re: 2.0, im: 2.0 });

/// The x, y of a cell in the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridPoint(pub usize, pub usize);

/// Maps points on the escape plane to cells of the histogram grid.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The right-upper hand corner of the integral cartesian plane.
    /// The left-lower is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The two coordinates defining the complex cartesian plane,
    /// left-lower and right-upper
    pub complex_plane: ComplexPlane,
    // Width and height of the complex plane.
    span: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Both sides of the integral plane must be at least
    /// one cell.
    pub fn new(width: usize, height: usize) -> Result<PlaneMapper> {
        if width == 0 || height == 0 {
            return Err(BuddhaError::InvalidDimension { width, height });
        }
        let complex_plane = ESCAPE_PLANE;
        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            complex_plane,
            span: (
                (complex_plane.1).re - (complex_plane.0).re,
                (complex_plane.1).im - (complex_plane.0).im,
            ),
        })
    }

    /// Given a complex number corresponding to a location on the
    /// complex cartesian plane, return the grid cell it lands in, or
    /// None if it lands outside the grid.  The far edges (re or im of
    /// exactly 2.0) fall outside, as does anything NaN.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<GridPoint> {
        let width = self.integral_plane.0 as f64;
        let height = self.integral_plane.1 as f64;
        let left = (width * (point.re - (self.complex_plane.0).re) / self.span.0).floor();
        let top = (height * (point.im - (self.complex_plane.0).im) / self.span.1).floor();
        if !(left >= 0.0 && left < width && top >= 0.0 && top < height) {
            return None;
        }
        Some(GridPoint(left as usize, top as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planemapper_fails_on_empty_shape() {
        assert!(PlaneMapper::new(0, 4).is_err());
        assert!(PlaneMapper::new(4, 0).is_err());
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = PlaneMapper::new(4, 3).unwrap();
        assert_eq!(pm.integral_plane, IntegralPlane(4, 3));
        assert_eq!(pm.complex_plane, ESCAPE_PLANE);
    }

    #[test]
    fn point_to_pixel_on_small_planes() {
        let pm = PlaneMapper::new(4, 4).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 0.0)), Some(GridPoint(2, 2)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.0, -2.0)), Some(GridPoint(0, 0)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.99, 1.99)), Some(GridPoint(3, 3)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-0.5, 0.5)), Some(GridPoint(1, 2)));
    }

    #[test]
    fn point_to_pixel_maps_on_large_planes() {
        let pm = PlaneMapper::new(640, 480).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 0.0)), Some(GridPoint(320, 240)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.0, -2.0)), Some(GridPoint(0, 0)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.0, -1.0)), Some(GridPoint(480, 120)));
    }

    #[test]
    fn point_to_pixel_discards_the_outside() {
        let pm = PlaneMapper::new(4, 4).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(2.0, 0.0)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 2.0)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.01, 0.0)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, -7.0)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(std::f64::NAN, 0.0)), None);
    }
}
