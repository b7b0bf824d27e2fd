// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ways a generate or render run can fail.

use failure::Fail;
use std::io;
use std::path::Path;

/// Everything that can go wrong between the command line and the
/// finished image.
#[derive(Debug, Fail)]
pub enum BuddhaError {
    /// The command line didn't match either the generate or the render
    /// form.
    #[fail(display = "{}", usage)]
    InvalidArgumentCount {
        /// Usage text to show the user.
        usage: String,
    },

    /// Render was asked for before anything was generated.
    #[fail(display = "generate {} first", path)]
    MissingIntermediateFile {
        /// Where we looked for the histogram.
        path: String,
    },

    /// The histogram file ran out before the grid was full.  Usually
    /// means render was given different dimensions than generate.
    #[fail(
        display = "histogram file is {} bytes, expected {} for the requested size",
        actual, expected
    )]
    TruncatedIntermediateFile {
        /// Bytes a grid of the requested size occupies.
        expected: u64,
        /// Bytes actually read.
        actual: u64,
    },

    /// Width or height of zero.
    #[fail(display = "image dimensions must be positive, got {}x{}", width, height)]
    InvalidDimension {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// Asked for zero samples.
    #[fail(display = "sample count must be at least 1")]
    InvalidSampleCount,

    /// No channel allows enough iterations for any orbit to escape.
    #[fail(
        display = "largest iteration threshold is {}; at least one channel must allow 3 or more",
        max
    )]
    InvalidThreshold {
        /// The largest of the three thresholds.
        max: usize,
    },

    /// Reading or writing one of the files failed.
    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for BuddhaError {
    fn from(err: io::Error) -> Self {
        BuddhaError::Io(err)
    }
}

impl BuddhaError {
    /// Helper for the one I/O failure the user can do something about.
    pub fn missing_file(path: &Path) -> Self {
        BuddhaError::MissingIntermediateFile {
            path: path.display().to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BuddhaError>;
