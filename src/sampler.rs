// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Picks seed points for orbits.  Most of the radius-2 disk around the
//! origin belongs to the Mandelbrot set and never escapes, and every
//! non-escaping seed costs the full iteration budget before we find
//! out, so the two big analytically-known regions of the set are
//! thrown out before any iterating happens.

use num::Complex;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use std::f64::consts::PI;

const D4: f64 = 1.0 / 4.0;
const D16: f64 = D4 / 4.0;

/// True if the point lies inside the main cardioid of the Mandelbrot
/// set.
pub fn in_main_cardioid(point: Complex<f64>) -> bool {
    let y = point.im.powi(2);
    let q = (point.re - D4).powi(2) + y;
    q * (q + point.re - D4) <= D4 * y
}

/// True if the point lies inside the period-2 bulb, the disk of radius
/// 1/4 centered on -1.
pub fn in_period2_bulb(point: Complex<f64>) -> bool {
    (point.re + 1.0).powi(2) + point.im.powi(2) <= D16
}

/// Draws candidate seeds uniformly in angle and radius (which is
/// denser towards the origin than uniform in area) and rejects the
/// ones known to be inside the set.
#[derive(Debug, Clone)]
pub struct OrbitSampler {
    angle: Uniform<f64>,
    radius: Uniform<f64>,
}

impl Default for OrbitSampler {
    fn default() -> Self {
        OrbitSampler::new()
    }
}

impl OrbitSampler {
    /// A sampler over the open disk of radius 2.
    pub fn new() -> Self {
        OrbitSampler {
            angle: Uniform::new(0.0_f64, 2.0 * PI),
            radius: Uniform::new(0.0_f64, 2.0),
        }
    }

    /// Draw one seed.  Retries without limit.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Complex<f64> {
        loop {
            let theta = self.angle.sample(rng);
            let radius = self.radius.sample(rng);
            let c = Complex::new(theta.cos() * radius, theta.sin() * radius);
            if !(in_main_cardioid(c) || in_period2_bulb(c)) {
                return c;
            }
        }
    }
}
