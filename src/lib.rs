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

//! # Periodic simulation cells
//!
//! Geometry kernel for simulation cells with 0, 1, 2 or 3 periodic directions.
//! A [`Cell`] stores direct and reciprocal lattice vectors together with the
//! derived volume and inter-planar spacings, and provides the minimum image
//! reduction, fractional coordinates and lattice translations needed by
//! pairwise and many-body interactions.
//!
//! ## Example
//!
//! A cubic box with side length 10:
//! ~~~
//! # use approx::assert_relative_eq;
//! use periodic_cell::{Cell, Point};
//!
//! let rvecs = [10.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 10.0];
//! let gvecs = [0.1, 0.0, 0.0, 0.0, 0.1, 0.0, 0.0, 0.0, 0.1];
//! let cell = Cell::new(&rvecs, &gvecs, 3).unwrap();
//! assert_relative_eq!(cell.volume(), 1000.0);
//!
//! let mut delta = Point::new(7.0, -3.0, 12.0);
//! cell.mic(&mut delta);
//! assert_relative_eq!(delta, Point::new(-3.0, -3.0, 2.0));
//! ~~~

#[cfg(test)]
extern crate approx;

/// A point in 3D space
pub type Point = nalgebra::Vector3<f64>;
/// A 3x3 matrix
pub type Matrix3 = nalgebra::Matrix3<f64>;

pub mod cell;

pub use cell::{
    BoundaryConditions, Cell, CellError, CellParameters, Extent, PeriodicDimension, VolumeScale,
};
