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

//! # Simulation cells with 0, 1, 2 or 3 periodic directions
//!
//! This module contains the lattice description of a simulation cell.
//! A [`Cell`] is defined by up to three direct lattice vectors (`rvecs`) and the matching
//! reciprocal vectors (`gvecs`). The number of active vectors is the periodic dimension:
//!
//! | `nvec` | [`PeriodicDimension`] | Typical system |
//! |--------|-----------------------|----------------|
//! | 0      | `None`                | Isolated cluster |
//! | 1      | `One`                 | Wire or chain |
//! | 2      | `Two`                 | Slab |
//! | 3      | `Three`               | Bulk |
//!
//! Interaction code should depend on the [`BoundaryConditions`] trait, while the code
//! that owns the geometry updates the cell with [`Cell::update`] or [`VolumeScale`].

mod config;
mod error;
mod lattice;
mod periodic;

use crate::Point;
pub use error::CellError;
pub use lattice::{Cell, CellParameters};

/// Number of independent periodic directions of a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodicDimension {
    /// No periodic boundaries in any direction
    #[default]
    None,
    /// Periodic along the first lattice vector, e.g. a wire
    One,
    /// Periodic in the plane of the first two lattice vectors, e.g. a slab
    Two,
    /// Periodic along all three lattice vectors
    Three,
}

impl PeriodicDimension {
    /// Number of active lattice vectors
    pub const fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// True if periodic in some direction
    pub const fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl TryFrom<usize> for PeriodicDimension {
    type Error = CellError;
    fn try_from(nvec: usize) -> Result<Self, Self::Error> {
        match nvec {
            0 => Ok(Self::None),
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(CellError::InvalidDimension(nvec)),
        }
    }
}

impl From<PeriodicDimension> for usize {
    fn from(dim: PeriodicDimension) -> Self {
        dim.count()
    }
}

/// How much of the lattice data to extract from a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Extent {
    /// All three rows (or spacings), including inactive filler
    #[default]
    Full,
    /// Only the rows (or spacings) of the active periodic directions
    Active,
}

impl From<bool> for Extent {
    /// `true` selects [`Extent::Full`], `false` selects [`Extent::Active`].
    fn from(full: bool) -> Self {
        if full {
            Self::Full
        } else {
            Self::Active
        }
    }
}

/// Interface for periodic boundary conditions and minimum image convention
pub trait BoundaryConditions {
    /// Report on periodic boundary conditions
    fn pbc(&self) -> PeriodicDimension;
    /// Wrap a point into the reference cell, if appropriate
    fn boundary(&self, point: &mut Point);
    /// Minimum image distance between two points
    fn distance(&self, point1: &Point, point2: &Point) -> Point;
    /// Get the minimum squared distance between two points
    #[inline(always)]
    fn distance_squared(&self, point1: &Point, point2: &Point) -> f64 {
        self.distance(point1, point2).norm_squared()
    }
}

/// Trait for isotropic scaling of a cell and of positions inside it.
pub trait VolumeScale {
    /// Scale a `position` inside the cell as the cell would be scaled to `new_volume`.
    ///
    /// Errors if the cell cannot be scaled.
    fn scale_position(&self, new_volume: f64, position: &mut Point) -> anyhow::Result<()>;

    /// Scale the cell to a new volume.
    ///
    /// This should typically be preceded by a call to `scale_position` for each particle,
    /// since positions are scaled relative to the current volume.
    fn scale_volume(&mut self, new_volume: f64) -> anyhow::Result<()>;
}

/// Wrap a set of positions into the reference cell
pub fn wrap_positions<'a>(
    pbc: &impl BoundaryConditions,
    positions: impl IntoIterator<Item = &'a mut Point>,
) {
    if !pbc.pbc().is_some() {
        return;
    }
    for pos in positions.into_iter() {
        pbc.boundary(pos);
    }
}
