// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes a tone-mapped grid out as an image.
//!
//! The PPM writer reproduces the render output byte for byte: a
//! tab-separated `P6` header declaring a maximum sample of 32767, then
//! one triplet of little-endian 16-bit samples per pixel in histogram
//! order, x outer and y inner.  Viewers read that as the transpose of
//! the complex plane with each sample scaled up by 256, which is what
//! makes the small tone values visible.  The PNG writer is the
//! conventional alternative: row-major, 8-bit, tone range stretched to
//! the full byte.

use image::png::PNGEncoder;
use image::ColorType;
use itertools::iproduct;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::histogram::HistogramGrid;
use crate::tonemap::TONE_CEILING;

/// Maximum sample value declared in the PPM header.
pub const PPM_MAXVAL: u16 = 32767;

/// The image formats render can produce.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    /// Binary 16-bit PPM in histogram order.
    Ppm,
    /// Row-major 8-bit RGB PNG.
    Png,
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ppm" => Ok(ImageFormat::Ppm),
            "png" => Ok(ImageFormat::Png),
            other => Err(format!("Unknown image format '{}'", other)),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ImageFormat::Ppm => write!(f, "ppm"),
            ImageFormat::Png => write!(f, "png"),
        }
    }
}

impl ImageFormat {
    /// Encode `grid` in this format.
    pub fn encode<W: Write>(self, grid: &HistogramGrid, writer: &mut W) -> io::Result<()> {
        match self {
            ImageFormat::Ppm => write_ppm(grid, writer),
            ImageFormat::Png => write_png(grid, writer),
        }
    }
}

/// Write the PPM header and pixel data.
pub fn write_ppm<W: Write>(grid: &HistogramGrid, writer: &mut W) -> io::Result<()> {
    write!(
        writer,
        "P6\t{}\t{}\t{}\n",
        grid.width(),
        grid.height(),
        PPM_MAXVAL
    )?;
    for pixel in grid.pixels() {
        writer.write_all(&pixel.red.to_le_bytes())?;
        writer.write_all(&pixel.green.to_le_bytes())?;
        writer.write_all(&pixel.blue.to_le_bytes())?;
    }
    Ok(())
}

fn stretch(value: u16) -> u8 {
    let scaled = f64::from(value) * 255.0 / TONE_CEILING;
    if scaled >= 255.0 {
        255
    } else {
        scaled as u8
    }
}

/// Write the grid as an 8-bit RGB PNG, one row per `y`.
pub fn write_png<W: Write>(grid: &HistogramGrid, writer: &mut W) -> io::Result<()> {
    let (width, height) = (grid.width(), grid.height());
    let mut pixels = Vec::with_capacity(width * height * 3);
    for (y, x) in iproduct!(0..height, 0..width) {
        if let Some(p) = grid.get(x, y) {
            pixels.extend_from_slice(&[stretch(p.red), stretch(p.green), stretch(p.blue)]);
        }
    }
    PNGEncoder::new(writer).encode(&pixels, width as u32, height as u32, ColorType::RGB(8))
}
