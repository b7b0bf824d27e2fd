#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Nebulabrot renderer
//!
//! The Buddhabrot (and the Nebulabrot) are variants of the Mandelbrot
//! set that look at the orbits of the points *outside* the set rather
//! than at the points themselves.  Every point c outside the set,
//! repeatedly squared and added to itself, eventually flies off to
//! infinity; on the way it visits a sequence of other points on the
//! complex plane.  Mapping each of those to the nearest pixel and
//! incrementing that pixel builds up a density map, the Buddhabrot.
//!
//! The Nebulabrot does this three times at once.  Each color channel
//! has its own iteration threshold and only counts the first that many
//! points of every orbit, so short orbits and long orbits end up in
//! different colors.
//!
//! Work happens in two runs.  `generate` samples seeds, traces them
//! and writes the raw counts to a histogram file; `render` reads that
//! file back, squeezes the counts through a tone curve and writes an
//! image.  See [`pipeline`] for both.

pub mod encoder;
pub mod errors;
pub mod histogram;
pub mod pipeline;
pub mod planes;
pub mod sampler;
pub mod thresholds;
pub mod tonemap;
pub mod tracer;

pub use encoder::ImageFormat;
pub use errors::{BuddhaError, Result};
pub use histogram::{HistogramAccumulator, HistogramGrid, Pixel};
pub use pipeline::{generate, render, GenerateConfig};
pub use sampler::OrbitSampler;
pub use thresholds::Thresholds;
pub use tracer::{NoProgress, OrbitTracer, Progress, TraceSummary};
