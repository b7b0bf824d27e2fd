// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Runs the escape-time iteration for sampled seeds and hands every
//! escaping orbit to the accumulator.

use num::Complex;
use rand::Rng;

use crate::histogram::HistogramAccumulator;
use crate::sampler::OrbitSampler;
use crate::thresholds::Thresholds;

/// How often, in accepted samples, the progress observer is told.
pub const PROGRESS_INTERVAL: u64 = 10;

/// Something that wants to hear about how far along a trace is.
pub trait Progress {
    /// Called with the number of accepted samples so far and the
    /// number requested.
    fn update(&mut self, accepted: u64, samples: u64);
}

/// Hears nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&mut self, _accepted: u64, _samples: u64) {}
}

impl<F: FnMut(u64, u64)> Progress for F {
    fn update(&mut self, accepted: u64, samples: u64) {
        self(accepted, samples)
    }
}

/// What a finished trace looked like.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TraceSummary {
    /// Escaping samples folded into the histogram.  Always equal to
    /// the number requested.
    pub accepted: u64,
    /// The highest iteration index at which any accepted sample
    /// escaped.  Always below the iteration budget.
    pub longest_escape: usize,
}

/// Iterates `z <- z^2 + c` from sampled seeds.  The orbit buffer is
/// allocated once, at the size of the iteration budget, and reused for
/// every trial.
#[derive(Debug)]
pub struct OrbitTracer {
    budget: usize,
    orbit: Vec<Complex<f64>>,
}

impl OrbitTracer {
    /// A tracer whose iteration budget is the largest threshold.
    pub fn new(thresholds: Thresholds) -> Self {
        OrbitTracer {
            budget: thresholds.max(),
            orbit: Vec::with_capacity(thresholds.max()),
        }
    }

    /// Run one trial from `c`.  The magnitude test at step `i` looks at
    /// `z_i`, before the step computes `z_(i+1)`, so an orbit counts as
    /// escaped only if `z_i` leaves the disk for some `i` below the
    /// budget.  Returns that `i`, with the buffer holding `z_1..=z_i`,
    /// or None if the budget ran out first.
    pub fn escape(&mut self, c: Complex<f64>) -> Option<usize> {
        self.orbit.clear();
        let mut z = Complex::new(0.0_f64, 0.0_f64);
        for i in 0..self.budget {
            if z.norm_sqr() > 4.0 {
                return Some(i);
            }
            z = z * z + c;
            self.orbit.push(z);
        }
        None
    }

    /// Run one trial from `c` and return the part of the orbit that
    /// gets plotted: every point before the escaping one.
    pub fn bounded_orbit(&mut self, c: Complex<f64>) -> Option<&[Complex<f64>]> {
        match self.escape(c) {
            Some(i) => Some(&self.orbit[..i.saturating_sub(1)]),
            None => None,
        }
    }

    /// The orbit computed by the last call to `escape`.
    pub fn orbit(&self) -> &[Complex<f64>] {
        &self.orbit
    }

    /// Keep drawing seeds until `samples` of them have escaped, folding
    /// each escaping orbit into the accumulator.  The escaping point is
    /// not plotted.  Seeds that exhaust
    /// the budget are assumed to be in the set and are dropped without
    /// counting.
    pub fn trace<R, P>(
        &mut self,
        sampler: &OrbitSampler,
        rng: &mut R,
        samples: u64,
        accumulator: &mut HistogramAccumulator,
        progress: &mut P,
    ) -> TraceSummary
    where
        R: Rng + ?Sized,
        P: Progress + ?Sized,
    {
        let mut summary = TraceSummary::default();
        while summary.accepted < samples {
            let c = sampler.sample(rng);
            if let Some(orbit) = self.bounded_orbit(c) {
                accumulator.retrace(orbit);
                summary.accepted += 1;
                summary.longest_escape = summary.longest_escape.max(orbit.len() + 1);
                if summary.accepted % PROGRESS_INTERVAL == 0 {
                    progress.update(summary.accepted, samples);
                }
            }
        }
        summary
    }
}
