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

//! # Lattice state of a simulation cell

use crate::{
    cell::{CellError, Extent, PeriodicDimension, VolumeScale},
    Matrix3, Point,
};
use float_cmp::approx_eq;

/// Relative determinant below which direct vectors are considered linearly dependent
const LINEAR_DEPENDENCE_THRESHOLD: f64 = 1e-10;

/// Simulation cell with 0, 1, 2 or 3 periodic directions.
///
/// The cell stores three direct lattice vectors (`rvecs`) and three reciprocal vectors
/// (`gvecs`), one per row. Only the first [`Cell::nvec`] rows describe periodic directions;
/// the remaining rows are filler supplied by the caller and are stored as-is.
///
/// # Derived quantities
///
/// - `rspacings[i] = 1 / |gvecs[i]|`, the distance between lattice planes
/// - `gspacings[i] = 1 / |rvecs[i]|`
/// - `volume`: length, area or volume spanned by the active direct vectors; zero if aperiodic
///
/// These are recomputed on every update, for all three rows. A zero row gives an infinite spacing.
///
/// The reciprocal vectors must satisfy `gvecs[i] · rvecs[j] = δij` for the active rows.
/// This is not verified on update; see [`Cell::check_reciprocal`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub(super) dimension: PeriodicDimension,
    pub(super) rvecs: [Point; 3],
    pub(super) gvecs: [Point; 3],
    rspacings: [f64; 3],
    gspacings: [f64; 3],
    volume: f64,
}

/// Lengths of, and angles between, the active direct lattice vectors
#[derive(Clone, Debug, PartialEq)]
pub struct CellParameters {
    /// One length per active vector
    pub lengths: Vec<f64>,
    /// Angles in radians: empty for fewer than two vectors, `[γ]` for two,
    /// and `[α, β, γ]` for three vectors
    pub angles: Vec<f64>,
}

impl Default for Cell {
    /// Aperiodic cell with identity filler rows
    fn default() -> Self {
        let identity = [Point::x(), Point::y(), Point::z()];
        Self {
            dimension: PeriodicDimension::None,
            rvecs: identity,
            gvecs: identity,
            rspacings: [1.0; 3],
            gspacings: [1.0; 3],
            volume: 0.0,
        }
    }
}

/// Split a row-major 3x3 buffer into three row vectors
fn rows_from_flat(flat: &[f64; 9]) -> [Point; 3] {
    std::array::from_fn(|i| Point::new(flat[3 * i], flat[3 * i + 1], flat[3 * i + 2]))
}

/// Length, area or volume spanned by the active direct vectors
fn spanned_volume(rvecs: &[Point; 3], dimension: PeriodicDimension) -> f64 {
    let [a, b, c] = rvecs;
    match dimension {
        PeriodicDimension::None => 0.0,
        PeriodicDimension::One => a.norm(),
        PeriodicDimension::Two => {
            let ab = a.dot(b);
            // round-off may give a slightly negative Gram determinant
            (a.norm_squared() * b.norm_squared() - ab * ab)
                .max(0.0)
                .sqrt()
        }
        PeriodicDimension::Three => a.dot(&b.cross(c)).abs(),
    }
}

/// Two unit vectors completing `a` into an orthonormal frame
fn complement_of_line(a: &Point) -> Result<(Point, Point), CellError> {
    let unit = a.try_normalize(0.0).ok_or(CellError::LinearlyDependent)?;
    let mut axis = Point::zeros();
    axis[unit.iamin()] = 1.0;
    let b = (axis - unit * unit.dot(&axis)).normalize();
    Ok((b, unit.cross(&b)))
}

fn copy_rows(rows: &[Point], dest: &mut [f64; 9]) -> usize {
    for (chunk, row) in dest.chunks_exact_mut(3).zip(rows) {
        chunk.copy_from_slice(row.as_slice());
    }
    rows.len() * 3
}

fn copy_spacings(spacings: &[f64], dest: &mut [f64; 3]) -> usize {
    dest[..spacings.len()].copy_from_slice(spacings);
    spacings.len()
}

impl Cell {
    /// Create a cell from row-major direct and reciprocal vectors.
    ///
    /// Errors if `nvec` is not 0, 1, 2 or 3.
    pub fn new(rvecs: &[f64; 9], gvecs: &[f64; 9], nvec: usize) -> Result<Self, CellError> {
        let mut cell = Self::default();
        cell.update(rvecs, gvecs, nvec)?;
        Ok(cell)
    }

    /// Overwrite the lattice vectors and recompute spacings and volume.
    ///
    /// `rvecs` and `gvecs` are row-major with one lattice vector per row.
    /// If `nvec` is invalid, the cell is left untouched.
    pub fn update(
        &mut self,
        rvecs: &[f64; 9],
        gvecs: &[f64; 9],
        nvec: usize,
    ) -> Result<(), CellError> {
        let dimension = PeriodicDimension::try_from(nvec)?;
        self.set_rows(rows_from_flat(rvecs), rows_from_flat(gvecs), dimension);
        Ok(())
    }

    /// Create a cell from the active direct vectors only.
    ///
    /// Inactive rows are filled with an orthonormal complement of the active vectors,
    /// and the reciprocal vectors are obtained by inverting the completed basis.
    pub fn from_rvecs(rvecs: &[Point]) -> Result<Self, CellError> {
        let dimension = PeriodicDimension::try_from(rvecs.len())?;
        let rows = match *rvecs {
            [] => [Point::x(), Point::y(), Point::z()],
            [a] => {
                let (b, c) = complement_of_line(&a)?;
                [a, b, c]
            }
            [a, b] => {
                let c = a
                    .cross(&b)
                    .try_normalize(0.0)
                    .ok_or(CellError::LinearlyDependent)?;
                [a, b, c]
            }
            [a, b, c] => [a, b, c],
            _ => return Err(CellError::InvalidDimension(rvecs.len())),
        };
        let matrix = Matrix3::from_rows(&[
            rows[0].transpose(),
            rows[1].transpose(),
            rows[2].transpose(),
        ]);
        let scale: f64 = rows.iter().map(|row| row.norm()).product();
        if scale == 0.0 || (matrix.determinant() / scale).abs() < LINEAR_DEPENDENCE_THRESHOLD {
            return Err(CellError::LinearlyDependent);
        }
        let inverse = matrix
            .try_inverse()
            .ok_or(CellError::LinearlyDependent)?;
        let gvecs = [
            inverse.column(0).into_owned(),
            inverse.column(1).into_owned(),
            inverse.column(2).into_owned(),
        ];
        let mut cell = Self::default();
        cell.set_rows(rows, gvecs, dimension);
        log::debug!(
            "Cell with {} periodic direction(s) built from direct vectors; volume = {:.4}",
            dimension.count(),
            cell.volume
        );
        Ok(cell)
    }

    /// Store rows and refresh all derived quantities
    fn set_rows(&mut self, rvecs: [Point; 3], gvecs: [Point; 3], dimension: PeriodicDimension) {
        self.dimension = dimension;
        self.rvecs = rvecs;
        self.gvecs = gvecs;
        for i in 0..3 {
            self.rspacings[i] = gvecs[i].norm().recip();
            self.gspacings[i] = rvecs[i].norm().recip();
        }
        self.volume = spanned_volume(&rvecs, dimension);
        log::trace!(
            "Updated cell: nvec = {}, volume = {}",
            dimension.count(),
            self.volume
        );
    }

    /// Periodic dimension of the cell
    #[inline(always)]
    pub fn dimension(&self) -> PeriodicDimension {
        self.dimension
    }

    /// Number of periodic directions
    #[inline(always)]
    pub fn nvec(&self) -> usize {
        self.dimension.count()
    }

    /// Length (1D), area (2D) or volume (3D) spanned by the active vectors; zero if aperiodic.
    #[inline(always)]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    fn len(&self, extent: Extent) -> usize {
        match extent {
            Extent::Full => 3,
            Extent::Active => self.nvec(),
        }
    }

    /// Direct lattice vectors, one per row
    pub fn rvecs(&self, extent: Extent) -> &[Point] {
        &self.rvecs[..self.len(extent)]
    }

    /// Reciprocal lattice vectors, one per row
    pub fn gvecs(&self, extent: Extent) -> &[Point] {
        &self.gvecs[..self.len(extent)]
    }

    /// Distances between lattice planes, `1 / |gvecs[i]|`
    pub fn rspacings(&self, extent: Extent) -> &[f64] {
        &self.rspacings[..self.len(extent)]
    }

    /// Reciprocal spacings, `1 / |rvecs[i]|`
    pub fn gspacings(&self, extent: Extent) -> &[f64] {
        &self.gspacings[..self.len(extent)]
    }

    /// Copy direct vectors into a row-major buffer and return the number of values written.
    ///
    /// With [`Extent::Active`] only the first `3 * nvec` values are written.
    pub fn copy_rvecs(&self, dest: &mut [f64; 9], extent: Extent) -> usize {
        copy_rows(self.rvecs(extent), dest)
    }

    /// Copy reciprocal vectors into a row-major buffer and return the number of values written.
    pub fn copy_gvecs(&self, dest: &mut [f64; 9], extent: Extent) -> usize {
        copy_rows(self.gvecs(extent), dest)
    }

    pub fn copy_rspacings(&self, dest: &mut [f64; 3], extent: Extent) -> usize {
        copy_spacings(self.rspacings(extent), dest)
    }

    pub fn copy_gspacings(&self, dest: &mut [f64; 3], extent: Extent) -> usize {
        copy_spacings(self.gspacings(extent), dest)
    }

    /// Lengths of, and angles between, the active direct vectors.
    ///
    /// For three vectors, `α = ∠(a₂, a₃)`, `β = ∠(a₃, a₁)` and `γ = ∠(a₁, a₂)`.
    pub fn parameters(&self) -> CellParameters {
        let active = self.rvecs(Extent::Active);
        let lengths = active.iter().map(|v| v.norm()).collect();
        let angles = match active {
            [a, b] => vec![a.angle(b)],
            [a, b, c] => vec![b.angle(c), c.angle(a), a.angle(b)],
            _ => Vec::new(),
        };
        CellParameters { lengths, angles }
    }

    /// Check that a spherical cutoff is compatible with the minimum image convention.
    ///
    /// Errors if twice the cutoff exceeds the spacing along any periodic direction.
    pub fn check_cutoff(&self, cutoff: f64) -> Result<(), CellError> {
        match self
            .rspacings(Extent::Active)
            .iter()
            .enumerate()
            .find(|(_, spacing)| 2.0 * cutoff > **spacing)
        {
            Some((index, &spacing)) => Err(CellError::CutoffTooLarge {
                index,
                spacing,
                cutoff,
            }),
            None => Ok(()),
        }
    }

    /// Check that the active reciprocal vectors are dual to the direct vectors.
    ///
    /// Not used by any other operation; call it when the vectors come from an untrusted source.
    pub fn check_reciprocal(&self, tolerance: f64) -> Result<(), CellError> {
        let active = self.nvec();
        for (row, g) in self.gvecs[..active].iter().enumerate() {
            for (column, r) in self.rvecs[..active].iter().enumerate() {
                let value = g.dot(r);
                let expected = if row == column { 1.0 } else { 0.0 };
                if !approx_eq!(f64, value, expected, epsilon = tolerance) {
                    return Err(CellError::InconsistentReciprocal { row, column, value });
                }
            }
        }
        Ok(())
    }

    /// Isotropic scaling factor for the active vectors to reach `new_volume`
    fn scale_factor(&self, new_volume: f64) -> anyhow::Result<f64> {
        if !self.dimension.is_some() {
            anyhow::bail!("Cannot scale the volume of an aperiodic cell");
        }
        if !(new_volume.is_finite() && new_volume > 0.0) {
            anyhow::bail!("New volume must be positive and finite, got {}", new_volume);
        }
        if self.volume <= 0.0 {
            anyhow::bail!("Cannot scale a cell with zero volume");
        }
        Ok((new_volume / self.volume).powf(1.0 / self.nvec() as f64))
    }
}

impl VolumeScale for Cell {
    /// Scale the position components along the active lattice vectors only
    fn scale_position(&self, new_volume: f64, position: &mut Point) -> anyhow::Result<()> {
        let scale = self.scale_factor(new_volume)?;
        let active = self.nvec();
        let current = *position;
        let shift: Point = self.rvecs[..active]
            .iter()
            .zip(&self.gvecs[..active])
            .map(|(r, g)| r * ((scale - 1.0) * g.dot(&current)))
            .sum();
        *position += shift;
        Ok(())
    }

    fn scale_volume(&mut self, new_volume: f64) -> anyhow::Result<()> {
        let scale = self.scale_factor(new_volume)?;
        let (mut rvecs, mut gvecs) = (self.rvecs, self.gvecs);
        for (r, g) in rvecs.iter_mut().zip(gvecs.iter_mut()).take(self.nvec()) {
            *r *= scale;
            *g /= scale;
        }
        let old_volume = self.volume;
        self.set_rows(rvecs, gvecs, self.dimension);
        log::debug!("Scaled cell volume {} -> {}", old_volume, self.volume);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const CUBE_RVECS: [f64; 9] = [10.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 10.0];
    const CUBE_GVECS: [f64; 9] = [0.1, 0.0, 0.0, 0.0, 0.1, 0.0, 0.0, 0.0, 0.1];
    const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

    #[test]
    fn cubic_cell() {
        let cell = Cell::new(&CUBE_RVECS, &CUBE_GVECS, 3).unwrap();
        assert_eq!(cell.nvec(), 3);
        assert_relative_eq!(cell.volume(), 1000.0);
        for i in 0..3 {
            assert_relative_eq!(cell.rspacings(Extent::Full)[i], 10.0);
            assert_relative_eq!(cell.gspacings(Extent::Full)[i], 0.1);
        }
        assert!(cell.check_reciprocal(1e-12).is_ok());
    }

    #[test]
    fn volume_by_dimension() {
        let rvecs = [3.0, 4.0, 0.0, 1.0, 2.0, 0.0, 0.0, 0.0, 5.0];
        let volumes = [0.0, 5.0, 2.0, 10.0];
        for (nvec, volume) in volumes.into_iter().enumerate() {
            let cell = Cell::new(&rvecs, &IDENTITY, nvec).unwrap();
            assert_relative_eq!(cell.volume(), volume, epsilon = 1e-12);
        }
    }

    #[test]
    fn degenerate_vectors() {
        // collinear pair in 2D
        let rvecs = [1.0, 1.0, 0.0, 2.0, 2.0, 0.0, 0.0, 0.0, 1.0];
        let cell = Cell::new(&rvecs, &IDENTITY, 2).unwrap();
        assert_eq!(cell.volume(), 0.0);

        // zero vector gives infinite spacing, not a fault
        let rvecs = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        let gvecs = [0.0; 9];
        let cell = Cell::new(&rvecs, &gvecs, 3).unwrap();
        assert_eq!(cell.volume(), 0.0);
        assert_eq!(cell.gspacings(Extent::Full)[0], f64::INFINITY);
        assert!(cell
            .rspacings(Extent::Full)
            .iter()
            .all(|s| *s == f64::INFINITY));

        let cell = Cell::new(&[0.0; 9], &[0.0; 9], 1).unwrap();
        assert_eq!(cell.volume(), 0.0);
    }

    #[test]
    fn triclinic_volume_is_determinant() {
        let rvecs = [4.0, 0.0, 0.0, 1.2, 3.5, 0.0, -0.7, 0.9, 6.1];
        let cell = Cell::new(&rvecs, &IDENTITY, 3).unwrap();
        let det = Matrix3::from_row_slice(&rvecs).determinant().abs();
        assert_relative_eq!(cell.volume(), det, epsilon = 1e-10);
        assert_relative_eq!(cell.volume(), 4.0 * 3.5 * 6.1, epsilon = 1e-10);

        // left-handed basis
        let rvecs = [0.0, 10.0, 0.0, 10.0, 0.0, 0.0, 0.0, 0.0, 10.0];
        assert!(Matrix3::from_row_slice(&rvecs).determinant() < 0.0);
        let cell = Cell::new(&rvecs, &IDENTITY, 3).unwrap();
        assert_relative_eq!(cell.volume(), 1000.0);
    }

    #[test]
    fn nearly_collinear_pair_has_zero_area() {
        let a = Point::new(0.3, 0.7, 0.0);
        let b = Point::new(3.9, 9.1, 0.0);
        // the Gram determinant rounds to a negative value
        let ab = a.dot(&b);
        assert!(a.norm_squared() * b.norm_squared() - ab * ab < 0.0);

        let rvecs = [a.x, a.y, a.z, b.x, b.y, b.z, 0.0, 0.0, 1.0];
        let cell = Cell::new(&rvecs, &IDENTITY, 2).unwrap();
        assert_eq!(cell.volume(), 0.0);
    }

    #[test]
    fn volume_is_non_negative() {
        let mut rng = StdRng::seed_from_u64(7);
        for nvec in 0..=3 {
            for i in 0..200 {
                let mut vectors: Vec<Point> = (0..nvec)
                    .map(|k| {
                        let mut v = Point::new(
                            rng.gen_range(-1.0..1.0),
                            rng.gen_range(-1.0..1.0),
                            rng.gen_range(-1.0..1.0),
                        );
                        v[k] = rng.gen_range(2.0..8.0);
                        v
                    })
                    .collect();
                // every other basis is left-handed
                if nvec >= 2 && i % 2 == 1 {
                    vectors.swap(0, 1);
                }
                let expected = match vectors.as_slice() {
                    [a] => a.norm(),
                    [a, b] => a.cross(b).norm(),
                    [a, b, c] => {
                        Matrix3::from_rows(&[a.transpose(), b.transpose(), c.transpose()])
                            .determinant()
                            .abs()
                    }
                    _ => 0.0,
                };
                let cell = Cell::from_rvecs(&vectors).unwrap();
                assert!(cell.volume() >= 0.0);
                assert_relative_eq!(cell.volume(), expected, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn invalid_dimension_leaves_cell_untouched() {
        let mut cell = Cell::new(&CUBE_RVECS, &CUBE_GVECS, 3).unwrap();
        let before = cell;
        assert_eq!(
            cell.update(&IDENTITY, &IDENTITY, 4),
            Err(CellError::InvalidDimension(4))
        );
        assert_eq!(cell, before);
        assert!(Cell::new(&IDENTITY, &IDENTITY, 7).is_err());
    }

    #[test]
    fn update_recomputes_derived() {
        let mut cell = Cell::new(&CUBE_RVECS, &CUBE_GVECS, 3).unwrap();
        let rvecs = [2.0, 0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 1.0];
        let gvecs = [0.5, 0.0, 0.0, 0.0, 0.2, 0.0, 0.0, 0.0, 1.0];
        cell.update(&rvecs, &gvecs, 2).unwrap();
        assert_eq!(cell.nvec(), 2);
        assert_relative_eq!(cell.volume(), 10.0);
        assert_eq!(cell.rspacings(Extent::Active).len(), 2);
        assert_relative_eq!(cell.rspacings(Extent::Active)[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(cell.rspacings(Extent::Active)[1], 5.0, epsilon = 1e-12);
        assert_eq!(cell.gspacings(Extent::Full), &[0.5, 0.2, 1.0]);
    }

    #[test]
    fn copy_modes() {
        let rvecs: [f64; 9] = std::array::from_fn(|i| i as f64 + 1.0);
        let gvecs: [f64; 9] = std::array::from_fn(|i| -(i as f64) - 1.0);
        for nvec in 0..=3 {
            let cell = Cell::new(&rvecs, &gvecs, nvec).unwrap();

            let mut full = [0.0; 9];
            assert_eq!(cell.copy_rvecs(&mut full, Extent::Full), 9);
            assert_eq!(full, rvecs);
            let mut active = [f64::NAN; 9];
            assert_eq!(cell.copy_rvecs(&mut active, true.into()), 9);
            let mut active = [f64::NAN; 9];
            assert_eq!(cell.copy_rvecs(&mut active, Extent::Active), 3 * nvec);
            assert_eq!(active[..3 * nvec], full[..3 * nvec]);
            assert!(active[3 * nvec..].iter().all(|x| x.is_nan()));

            let mut full = [0.0; 9];
            assert_eq!(cell.copy_gvecs(&mut full, Extent::Full), 9);
            assert_eq!(full, gvecs);
            let mut active = [0.0; 9];
            assert_eq!(cell.copy_gvecs(&mut active, Extent::Active), 3 * nvec);
            assert_eq!(active[..3 * nvec], gvecs[..3 * nvec]);

            let mut full = [0.0; 3];
            let mut active = [0.0; 3];
            assert_eq!(cell.copy_rspacings(&mut full, Extent::Full), 3);
            assert_eq!(cell.copy_rspacings(&mut active, Extent::Active), nvec);
            assert_eq!(active[..nvec], full[..nvec]);
            assert_eq!(cell.copy_gspacings(&mut full, Extent::Full), 3);
            assert_eq!(cell.copy_gspacings(&mut active, Extent::Active), nvec);
            assert_eq!(active[..nvec], full[..nvec]);

            assert_eq!(cell.rvecs(Extent::Active).len(), nvec);
            assert_eq!(cell.gvecs(Extent::Full).len(), 3);
        }
    }

    #[test]
    fn from_rvecs_is_dual() {
        let vectors = [
            Point::new(4.0, 0.3, -0.2),
            Point::new(1.1, 3.7, 0.4),
            Point::new(-0.5, 0.8, 5.2),
        ];
        for nvec in 0..=3 {
            let cell = Cell::from_rvecs(&vectors[..nvec]).unwrap();
            assert_eq!(cell.nvec(), nvec);
            assert!(cell.check_reciprocal(1e-12).is_ok());
            // completed rows are orthonormal to the active span
            for filler in &cell.rvecs(Extent::Full)[nvec..] {
                assert_relative_eq!(filler.norm(), 1.0, epsilon = 1e-12);
                for active in &vectors[..nvec] {
                    assert_abs_diff_eq!(filler.dot(active), 0.0, epsilon = 1e-12);
                }
            }
        }
        let cell = Cell::from_rvecs(&vectors).unwrap();
        let det = Matrix3::from_rows(&[
            vectors[0].transpose(),
            vectors[1].transpose(),
            vectors[2].transpose(),
        ])
        .determinant();
        assert_relative_eq!(cell.volume(), det.abs(), epsilon = 1e-10);
    }

    #[test]
    fn from_rvecs_rejects_dependent_vectors() {
        assert_eq!(
            Cell::from_rvecs(&[Point::zeros()]),
            Err(CellError::LinearlyDependent)
        );
        assert_eq!(
            Cell::from_rvecs(&[Point::new(1.0, 2.0, 3.0), Point::new(-2.0, -4.0, -6.0)]),
            Err(CellError::LinearlyDependent)
        );
        assert_eq!(
            Cell::from_rvecs(&[Point::x(), Point::y(), Point::new(1.0, 1.0, 0.0)]),
            Err(CellError::LinearlyDependent)
        );
        assert_eq!(
            Cell::from_rvecs(&[Point::x(); 4]),
            Err(CellError::InvalidDimension(4))
        );
    }

    #[test]
    fn parameters() {
        let cell = Cell::from_rvecs(&[Point::new(2.0, 0.0, 0.0)]).unwrap();
        let parameters = cell.parameters();
        assert_eq!(parameters.lengths, vec![2.0]);
        assert!(parameters.angles.is_empty());

        let cell = Cell::from_rvecs(&[Point::new(2.0, 0.0, 0.0), Point::new(1.0, 1.0, 0.0)])
            .unwrap();
        let parameters = cell.parameters();
        assert_relative_eq!(parameters.angles[0], std::f64::consts::FRAC_PI_4, epsilon = 1e-12);

        let cell = Cell::new(&CUBE_RVECS, &CUBE_GVECS, 3).unwrap();
        let parameters = cell.parameters();
        assert_eq!(parameters.lengths, vec![10.0; 3]);
        for angle in parameters.angles {
            assert_relative_eq!(angle, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        }
    }

    #[test]
    fn cutoff_check() {
        let cell = Cell::new(&CUBE_RVECS, &CUBE_GVECS, 3).unwrap();
        assert!(cell.check_cutoff(4.9).is_ok());
        assert!(cell.check_cutoff(5.0).is_ok());
        assert_eq!(
            cell.check_cutoff(5.1),
            Err(CellError::CutoffTooLarge {
                index: 0,
                spacing: 10.0,
                cutoff: 5.1
            })
        );
        // aperiodic cells accept any cutoff
        assert!(Cell::default().check_cutoff(1e6).is_ok());
    }

    #[test]
    fn reciprocal_check() {
        let mut gvecs = CUBE_GVECS;
        gvecs[4] = 0.2;
        let cell = Cell::new(&CUBE_RVECS, &gvecs, 3).unwrap();
        assert!(matches!(
            cell.check_reciprocal(1e-8),
            Err(CellError::InconsistentReciprocal {
                row: 1,
                column: 1,
                ..
            })
        ));
        // inactive rows are not checked
        let cell = Cell::new(&CUBE_RVECS, &gvecs, 1).unwrap();
        assert!(cell.check_reciprocal(1e-8).is_ok());
    }

    #[test]
    fn volume_scaling() {
        let mut cell = Cell::new(&CUBE_RVECS, &CUBE_GVECS, 3).unwrap();
        let mut position = Point::new(1.0, -2.0, 3.0);
        cell.scale_position(8000.0, &mut position).unwrap();
        assert_relative_eq!(position, Point::new(2.0, -4.0, 6.0), epsilon = 1e-12);
        cell.scale_volume(8000.0).unwrap();
        assert_relative_eq!(cell.volume(), 8000.0, epsilon = 1e-9);
        assert_relative_eq!(cell.rspacings(Extent::Full)[2], 20.0, epsilon = 1e-12);
        assert!(cell.check_reciprocal(1e-12).is_ok());

        // slab: only the in-plane components are scaled
        let mut slab =
            Cell::from_rvecs(&[Point::new(2.0, 0.0, 0.0), Point::new(0.0, 2.0, 0.0)]).unwrap();
        let mut position = Point::new(0.5, 0.5, 7.0);
        slab.scale_position(16.0, &mut position).unwrap();
        assert_relative_eq!(position, Point::new(1.0, 1.0, 7.0), epsilon = 1e-12);
        slab.scale_volume(16.0).unwrap();
        assert_relative_eq!(slab.volume(), 16.0, epsilon = 1e-12);
        assert_eq!(slab.rvecs(Extent::Full)[2], Point::z());

        assert!(Cell::default().scale_volume(1.0).is_err());
        assert!(slab.scale_volume(-1.0).is_err());
        assert!(slab.scale_volume(f64::NAN).is_err());
    }
}
