// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The histogram: one red/green/blue counter triplet per pixel, the
//! accumulator that folds orbits into it, and the binary file format
//! that carries it from the generate run to the render run.
//!
//! The file has no header.  Cells are written column by column (x
//! outer, y inner), each as three little-endian 16-bit unsigned
//! integers in red, green, blue order, so a grid occupies exactly
//! `width * height * 6` bytes.  Dimensions have to be supplied again
//! when reading.

use num::Complex;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

use crate::errors::{BuddhaError, Result};
use crate::planes::{GridPoint, PlaneMapper};
use crate::thresholds::Thresholds;

/// Bytes per cell in the histogram file.
pub const CELL_BYTES: usize = 6;

/// Visit counters for one pixel.  Increments saturate at `u16::MAX`,
/// the widest value the histogram file can hold.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Pixel {
    /// Red counter.
    pub red: u16,
    /// Green counter.
    pub green: u16,
    /// Blue counter.
    pub blue: u16,
}

impl Pixel {
    /// Build a pixel from its three channels.
    pub fn new(red: u16, green: u16, blue: u16) -> Self {
        Pixel { red, green, blue }
    }

    fn to_bytes(self) -> [u8; CELL_BYTES] {
        let (r, g, b) = (
            self.red.to_le_bytes(),
            self.green.to_le_bytes(),
            self.blue.to_le_bytes(),
        );
        [r[0], r[1], g[0], g[1], b[0], b[1]]
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Pixel {
            red: u16::from_le_bytes([bytes[0], bytes[1]]),
            green: u16::from_le_bytes([bytes[2], bytes[3]]),
            blue: u16::from_le_bytes([bytes[4], bytes[5]]),
        }
    }
}

/// A `width x height` grid of pixels in a single buffer, stored in the
/// same x-major order as the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistogramGrid {
    width: usize,
    height: usize,
    cells: Vec<Pixel>,
}

fn byte_len(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(BuddhaError::InvalidDimension { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CELL_BYTES))
        .ok_or(BuddhaError::InvalidDimension { width, height })
}

impl HistogramGrid {
    /// A zeroed grid.  Fails if either side is zero or the grid would
    /// be too large to address.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        byte_len(width, height)?;
        Ok(HistogramGrid {
            width,
            height,
            cells: vec![Pixel::default(); width * height],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(x * self.height + y)
        } else {
            None
        }
    }

    /// The pixel at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<&Pixel> {
        self.offset(x, y).map(|i| &self.cells[i])
    }

    /// Mutable access to the pixel at column `x`, row `y`.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Pixel> {
        match self.offset(x, y) {
            Some(i) => Some(&mut self.cells[i]),
            None => None,
        }
    }

    /// All pixels in file order.
    pub fn pixels(&self) -> &[Pixel] {
        &self.cells
    }

    /// A grid of the same size with `f` applied to every pixel.
    pub fn map_pixels<F: Fn(Pixel) -> Pixel>(&self, f: F) -> HistogramGrid {
        HistogramGrid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().cloned().map(f).collect(),
        }
    }

    /// Write the grid in the histogram file format.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for pixel in &self.cells {
            writer.write_all(&pixel.to_bytes())?;
        }
        Ok(())
    }

    /// Read a grid of the given size back out of the histogram file
    /// format.  Bytes past the end of the grid are ignored.
    pub fn read_from<R: Read>(reader: R, width: usize, height: usize) -> Result<Self> {
        let expected = byte_len(width, height)?;
        // Grows with what is actually there, not with what was asked for.
        let mut buffer = Vec::new();
        reader.take(expected as u64).read_to_end(&mut buffer)?;
        if buffer.len() < expected {
            return Err(BuddhaError::TruncatedIntermediateFile {
                expected: expected as u64,
                actual: buffer.len() as u64,
            });
        }
        Ok(HistogramGrid {
            width,
            height,
            cells: buffer.chunks(CELL_BYTES).map(Pixel::from_bytes).collect(),
        })
    }

    /// Write the grid to a file, replacing whatever was there.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        debug!(
            path = %path.display(),
            bytes = self.cells.len() * CELL_BYTES,
            "histogram written"
        );
        Ok(())
    }

    /// Read a grid of the given size from a file.
    pub fn load<P: AsRef<Path>>(path: P, width: usize, height: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BuddhaError::missing_file(path));
            }
            Err(e) => return Err(e.into()),
        };
        let expected = byte_len(width, height)? as u64;
        let actual = file.metadata()?.len();
        if actual < expected {
            return Err(BuddhaError::TruncatedIntermediateFile { expected, actual });
        }
        let grid = HistogramGrid::read_from(BufReader::new(file), width, height)?;
        debug!(path = %path.display(), width, height, "histogram read");
        Ok(grid)
    }
}

/// Folds escaping orbits into a histogram grid, one channel per
/// threshold.
#[derive(Debug)]
pub struct HistogramAccumulator {
    grid: HistogramGrid,
    mapper: PlaneMapper,
    thresholds: Thresholds,
}

impl HistogramAccumulator {
    /// An accumulator over a fresh, zeroed grid.
    pub fn new(width: usize, height: usize, thresholds: Thresholds) -> Result<Self> {
        Ok(HistogramAccumulator {
            grid: HistogramGrid::new(width, height)?,
            mapper: PlaneMapper::new(width, height)?,
            thresholds,
        })
    }

    /// Plot an orbit.  The point at index `i` counts towards every
    /// channel whose threshold is greater than `i`.  Points that land
    /// outside the grid are dropped.
    pub fn retrace(&mut self, orbit: &[Complex<f64>]) {
        let (red, green, blue) = (
            self.thresholds.red(),
            self.thresholds.green(),
            self.thresholds.blue(),
        );
        for (i, point) in orbit.iter().enumerate() {
            if let Some(GridPoint(x, y)) = self.mapper.point_to_pixel(point) {
                if let Some(pixel) = self.grid.get_mut(x, y) {
                    if i < red {
                        pixel.red = pixel.red.saturating_add(1);
                    }
                    if i < green {
                        pixel.green = pixel.green.saturating_add(1);
                    }
                    if i < blue {
                        pixel.blue = pixel.blue.saturating_add(1);
                    }
                }
            }
        }
    }

    /// The grid accumulated so far.
    pub fn grid(&self) -> &HistogramGrid {
        &self.grid
    }

    /// Finish accumulating and hand back the grid.
    pub fn into_grid(self) -> HistogramGrid {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn thresholds(r: usize, g: usize, b: usize) -> Thresholds {
        Thresholds::new(r, g, b).unwrap()
    }

    #[test]
    fn new_grid_is_zeroed() {
        let grid = HistogramGrid::new(3, 2).unwrap();
        assert_eq!(grid.pixels().len(), 6);
        assert!(grid.pixels().iter().all(|p| *p == Pixel::default()));
        assert!(grid.get(3, 0).is_none());
        assert!(grid.get(0, 2).is_none());
    }

    #[test]
    fn empty_grids_are_rejected() {
        assert!(HistogramGrid::new(0, 10).is_err());
        assert!(HistogramGrid::new(10, 0).is_err());
        assert!(HistogramGrid::new(usize::max_value(), 2).is_err());
    }

    #[test]
    fn file_layout_is_x_major_little_endian() {
        let mut grid = HistogramGrid::new(2, 2).unwrap();
        *grid.get_mut(0, 1).unwrap() = Pixel::new(1, 2, 3);
        *grid.get_mut(1, 0).unwrap() = Pixel::new(0x0102, 0, 0xffff);
        let mut bytes = vec![];
        grid.write_to(&mut bytes).unwrap();
        assert_eq!(
            bytes,
            vec![
                0, 0, 0, 0, 0, 0, // (0, 0)
                1, 0, 2, 0, 3, 0, // (0, 1)
                2, 1, 0, 0, 255, 255, // (1, 0)
                0, 0, 0, 0, 0, 0, // (1, 1)
            ]
        );
    }

    #[test]
    fn grids_survive_the_file_format() {
        let mut grid = HistogramGrid::new(7, 5).unwrap();
        for x in 0..7 {
            for y in 0..5 {
                let v = (x * 31 + y * 1009) as u16;
                *grid.get_mut(x, y).unwrap() = Pixel::new(v, v.wrapping_mul(3), v ^ 0xa5a5);
            }
        }
        let mut bytes = vec![];
        grid.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 7 * 5 * CELL_BYTES);
        let back = HistogramGrid::read_from(Cursor::new(bytes), 7, 5).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn short_files_are_reported() {
        let bytes = vec![0u8; 5 * CELL_BYTES + 3];
        match HistogramGrid::read_from(Cursor::new(bytes), 2, 3) {
            Err(BuddhaError::TruncatedIntermediateFile { expected, actual }) => {
                assert_eq!(expected, 36);
                assert_eq!(actual, 33);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn oversized_requests_fail_without_allocating() {
        let bytes = vec![0u8; CELL_BYTES];
        match HistogramGrid::read_from(Cursor::new(bytes), 1 << 20, 1 << 20) {
            Err(BuddhaError::TruncatedIntermediateFile { expected, actual }) => {
                assert_eq!(expected, (1u64 << 40) * 6);
                assert_eq!(actual, 6);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn load_checks_the_file_size_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid");
        HistogramGrid::new(2, 2).unwrap().save(&path).unwrap();
        match HistogramGrid::load(&path, 1 << 20, 1 << 20) {
            Err(BuddhaError::TruncatedIntermediateFile { actual: 24, .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        match HistogramGrid::load(dir.path().join(".buddhadata"), 2, 2) {
            Err(BuddhaError::MissingIntermediateFile { .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid");
        let mut grid = HistogramGrid::new(4, 3).unwrap();
        *grid.get_mut(3, 2).unwrap() = Pixel::new(9, 8, 7);
        grid.save(&path).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 72);
        assert_eq!(HistogramGrid::load(&path, 4, 3).unwrap(), grid);
    }

    #[test]
    fn retrace_gates_each_channel_on_its_threshold() {
        let mut acc = HistogramAccumulator::new(4, 4, thresholds(1, 2, 3)).unwrap();
        // Four visits to the cell holding the origin, at indices 0..4.
        let orbit = vec![Complex::new(0.1, 0.1); 4];
        acc.retrace(&orbit);
        assert_eq!(acc.grid().get(2, 2), Some(&Pixel::new(1, 2, 3)));
    }

    #[test]
    fn retrace_channels_are_independent() {
        let mut acc = HistogramAccumulator::new(4, 4, thresholds(3, 0, 1)).unwrap();
        let orbit = vec![Complex::new(-1.5, 1.5); 5];
        acc.retrace(&orbit);
        assert_eq!(acc.grid().get(0, 3), Some(&Pixel::new(3, 0, 1)));
    }

    #[test]
    fn retrace_drops_points_off_the_grid() {
        let mut acc = HistogramAccumulator::new(4, 4, thresholds(10, 10, 10)).unwrap();
        acc.retrace(&[
            Complex::new(2.0, 0.0),
            Complex::new(0.0, 2.0),
            Complex::new(-3.0, 0.0),
        ]);
        assert!(acc.grid().pixels().iter().all(|p| *p == Pixel::default()));
    }

    #[test]
    fn retrace_saturates() {
        let mut acc = HistogramAccumulator::new(1, 1, thresholds(3, 3, 3)).unwrap();
        *acc.grid.get_mut(0, 0).unwrap() = Pixel::new(u16::max_value(), 0, 0);
        acc.retrace(&[Complex::new(0.0, 0.0)]);
        assert_eq!(acc.into_grid().get(0, 0), Some(&Pixel::new(u16::max_value(), 1, 1)));
    }
}
