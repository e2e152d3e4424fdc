// Copyright 2023 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

use thiserror::Error;

/// Errors raised when building or validating a [`Cell`](super::Cell).
///
/// Degenerate geometry (zero or collinear vectors) is not an error; it gives a zero
/// volume and infinite spacings instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellError {
    #[error("invalid number of periodic directions: {0} (expected 0, 1, 2 or 3)")]
    InvalidDimension(usize),

    /// `gvecs[row] · rvecs[column]` deviates from the Kronecker delta
    #[error("reciprocal vector {row} is not dual to direct vector {column} (dot product {value})")]
    InconsistentReciprocal {
        row: usize,
        column: usize,
        value: f64,
    },

    #[error("cell vectors are linearly dependent")]
    LinearlyDependent,

    /// Minimum image convention is unsafe when twice the cutoff exceeds a spacing
    #[error("cutoff {cutoff} is larger than half the spacing {spacing} along direction {index}")]
    CutoffTooLarge {
        index: usize,
        spacing: f64,
        cutoff: f64,
    },
}
