// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two phases, end to end.  Generation and rendering share nothing
//! but the histogram file; each can run in its own process.

use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::encoder::ImageFormat;
use crate::errors::{BuddhaError, Result};
use crate::histogram::{HistogramAccumulator, HistogramGrid};
use crate::sampler::OrbitSampler;
use crate::thresholds::Thresholds;
use crate::tracer::{OrbitTracer, Progress, TraceSummary};

/// Where generate leaves the histogram and render looks for it.
pub const DEFAULT_DATA_FILE: &str = ".buddhadata";

/// Where render writes the image.
pub const DEFAULT_IMAGE_FILE: &str = "buddha.ppm";

/// A validated request for a generate run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Grid width.
    pub width: usize,
    /// Grid height.
    pub height: usize,
    /// Escaping orbits to accumulate.
    pub samples: u64,
    /// Channel thresholds.
    pub thresholds: Thresholds,
}

impl GenerateConfig {
    /// Checks everything that would otherwise make generation loop
    /// forever or index off the grid.
    pub fn new(width: usize, height: usize, samples: u64, thresholds: Thresholds) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BuddhaError::InvalidDimension { width, height });
        }
        if samples == 0 {
            return Err(BuddhaError::InvalidSampleCount);
        }
        Ok(GenerateConfig {
            width,
            height,
            samples,
            thresholds,
        })
    }
}

/// Sample, trace and accumulate into a fresh grid.
pub fn generate<R, P>(
    config: &GenerateConfig,
    rng: &mut R,
    progress: &mut P,
) -> Result<(HistogramGrid, TraceSummary)>
where
    R: Rng + ?Sized,
    P: Progress + ?Sized,
{
    let mut accumulator =
        HistogramAccumulator::new(config.width, config.height, config.thresholds)?;
    let mut tracer = OrbitTracer::new(config.thresholds);
    info!(
        width = config.width,
        height = config.height,
        samples = config.samples,
        "tracing orbits"
    );
    let summary = tracer.trace(
        &OrbitSampler::new(),
        rng,
        config.samples,
        &mut accumulator,
        progress,
    );
    debug!(
        accepted = summary.accepted,
        longest_escape = summary.longest_escape,
        "trace finished"
    );
    Ok((accumulator.into_grid(), summary))
}

/// `generate`, then save the grid to `data`.
pub fn generate_to_file<R, P, Q>(
    config: &GenerateConfig,
    rng: &mut R,
    progress: &mut P,
    data: Q,
) -> Result<TraceSummary>
where
    R: Rng + ?Sized,
    P: Progress + ?Sized,
    Q: AsRef<Path>,
{
    let (grid, summary) = generate(config, rng, progress)?;
    grid.save(data)?;
    Ok(summary)
}

/// Tone map a grid and encode it.
pub fn render<W: Write>(grid: &HistogramGrid, format: ImageFormat, writer: &mut W) -> Result<()> {
    format.encode(&grid.tone_mapped(), writer)?;
    Ok(())
}

/// Read the grid in `data` and write the image to `image`.  The image
/// file is only created once the grid has been read successfully.
pub fn render_file<P, Q>(
    width: usize,
    height: usize,
    data: P,
    image: Q,
    format: ImageFormat,
) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let grid = HistogramGrid::load(data, width, height)?;
    let image = image.as_ref();
    info!(path = %image.display(), %format, "rendering");
    let mut writer = BufWriter::new(File::create(image)?);
    render(&grid, format, &mut writer)?;
    writer.flush()?;
    Ok(())
}
