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

//! # Minimum image reduction and lattice translations
//!
//! All operations loop over the active lattice directions only and are no-ops for an
//! aperiodic cell. Rounding to the nearest lattice translation uses `ceil(f - 0.5)`,
//! so a fractional coordinate of exactly one half is kept at `+0.5` and never flipped
//! to `-0.5`.

use crate::{
    cell::{BoundaryConditions, Cell, PeriodicDimension},
    Point,
};

/// Nearest integer to `fraction`, with halves rounded up
#[inline(always)]
fn nearest_image(fraction: f64) -> f64 {
    (fraction - 0.5).ceil()
}

impl Cell {
    #[inline(always)]
    fn active_pairs(&self) -> impl Iterator<Item = (&Point, &Point)> {
        let active = self.nvec();
        self.rvecs[..active].iter().zip(&self.gvecs[..active])
    }

    /// Apply the minimum image convention to a displacement vector.
    ///
    /// Each active direction `k` is corrected in turn by subtracting the nearest integer
    /// multiple of `rvecs[k]`, using the displacement already corrected along the previous
    /// directions. For strongly skewed triclinic cells the result is not guaranteed to be
    /// the shortest periodic image.
    #[inline]
    pub fn mic(&self, delta: &mut Point) {
        for (r, g) in self.active_pairs() {
            let image = nearest_image(g.dot(&*delta));
            *delta -= image * r;
        }
    }

    /// Same reduction as [`Cell::mic`], also returning the lattice translation that was applied.
    ///
    /// The returned counts `n` satisfy `reduced = original + Σ n[k] rvecs[k]`;
    /// inactive entries are zero.
    pub fn mic_image(&self, delta: &mut Point) -> [i64; 3] {
        let mut counts = [0; 3];
        for (count, (r, g)) in counts.iter_mut().zip(self.active_pairs()) {
            let image = nearest_image(g.dot(&*delta));
            *delta -= image * r;
            *count = (-image) as i64;
        }
        counts
    }

    /// Fractional coordinates, `frac[i] = gvecs[i] · cart`.
    ///
    /// All three reciprocal rows are used regardless of the periodic dimension.
    #[inline]
    pub fn to_frac(&self, cart: &Point) -> Point {
        let [g0, g1, g2] = &self.gvecs;
        Point::new(g0.dot(cart), g1.dot(cart), g2.dot(cart))
    }

    /// Lattice translation that brings `cart` into the reference cell.
    ///
    /// Every active direction is evaluated from the unmodified `cart`, independently of the
    /// others. Inactive entries are zero. Apply the result with [`Cell::add_vec`].
    #[inline]
    pub fn to_center(&self, cart: &Point) -> [i64; 3] {
        let mut center = [0; 3];
        for (count, g) in center.iter_mut().zip(&self.gvecs[..self.nvec()]) {
            *count = (-nearest_image(g.dot(cart))) as i64;
        }
        center
    }

    /// Add the lattice translation `Σ r[k] rvecs[k]` over the active directions to `delta`.
    #[inline]
    pub fn add_vec(&self, delta: &mut Point, r: &[i64; 3]) {
        for (count, rvec) in r.iter().zip(&self.rvecs[..self.nvec()]) {
            *delta += *count as f64 * rvec;
        }
    }
}

impl BoundaryConditions for Cell {
    fn pbc(&self) -> PeriodicDimension {
        self.dimension
    }

    /// Wrap a position into the reference cell centered at the origin
    #[inline]
    fn boundary(&self, point: &mut Point) {
        let center = self.to_center(point);
        self.add_vec(point, &center);
    }

    #[inline(always)]
    fn distance(&self, point1: &Point, point2: &Point) -> Point {
        let mut delta = point1 - point2;
        self.mic(&mut delta);
        delta
    }
}
