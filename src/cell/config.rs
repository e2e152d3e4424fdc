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

//! # Reading and writing cells in YAML
//!
//! A cell is given either by its active direct vectors only,
//!
//! ~~~ yaml
//! rvecs: [[10.0, 0.0, 0.0], [0.0, 10.0, 0.0]]
//! ~~~
//!
//! in which case the reciprocal vectors are derived with [`Cell::from_rvecs`], or explicitly
//! with three direct rows, three reciprocal rows and the number of periodic directions:
//!
//! ~~~ yaml
//! nvec: 2
//! rvecs: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
//! gvecs: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
//! ~~~
//!
//! Serialization always writes the explicit form.

use crate::{
    cell::{Cell, Extent},
    Point,
};
use anyhow::Context;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCell {
    #[serde(default)]
    rvecs: Vec<Point>,
    gvecs: Option<Vec<Point>>,
    nvec: Option<usize>,
}

#[derive(Serialize)]
struct ExplicitCell<'a> {
    nvec: usize,
    rvecs: &'a [Point],
    gvecs: &'a [Point],
}

/// Row-major buffer from exactly three rows
fn flatten(rows: &[Point], key: &str) -> anyhow::Result<[f64; 9]> {
    if rows.len() != 3 {
        anyhow::bail!(
            "`{}` must have three rows when `gvecs` is given, got {}",
            key,
            rows.len()
        );
    }
    let mut flat = [0.0; 9];
    for (chunk, row) in flat.chunks_exact_mut(3).zip(rows) {
        chunk.copy_from_slice(row.as_slice());
    }
    Ok(flat)
}

impl RawCell {
    fn into_cell(self) -> anyhow::Result<Cell> {
        match (self.gvecs, self.nvec) {
            (Some(gvecs), Some(nvec)) => {
                let rvecs = flatten(&self.rvecs, "rvecs")?;
                let gvecs = flatten(&gvecs, "gvecs")?;
                Ok(Cell::new(&rvecs, &gvecs, nvec)?)
            }
            (Some(_), None) => anyhow::bail!("`gvecs` requires `nvec`"),
            (None, Some(nvec)) if nvec != self.rvecs.len() => anyhow::bail!(
                "`nvec` is {} but {} direct vector(s) were given",
                nvec,
                self.rvecs.len()
            ),
            (None, _) => Ok(Cell::from_rvecs(&self.rvecs)?),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCell::deserialize(deserializer)?;
        raw.into_cell().map_err(|err| D::Error::custom(format!("{:#}", err)))
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ExplicitCell {
            nvec: self.nvec(),
            rvecs: self.rvecs(Extent::Full),
            gvecs: self.gvecs(Extent::Full),
        }
        .serialize(serializer)
    }
}

impl Cell {
    /// Get simulation cell from the `system.cell` key of a YAML input file.
    ///
    /// If no cell is defined, an aperiodic cell is returned.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(&path)
            .with_context(|| format!("Error reading file {:?}", path.as_ref()))?;
        Self::from_yaml(&yaml).with_context(|| format!("Error in file {:?}", path.as_ref()))
    }

    /// Get simulation cell from the `system.cell` key of a YAML document.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let full: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let system = full
            .get("system")
            .ok_or_else(|| anyhow::Error::msg("Could not find `system` in the YAML file."))?;

        let Some(value) = system.get("cell") else {
            log::warn!("No cell defined for the system. Using aperiodic cell.");
            return Ok(Self::default());
        };
        let cell: Self = serde_yaml::from_value(value.clone()).context("Invalid `system.cell`")?;
        if cell.dimension().is_some() && cell.volume() == 0.0 {
            log::warn!(
                "Cell with {} periodic direction(s) has zero volume",
                cell.nvec()
            );
        }
        log::debug!(
            "Loaded cell with {} periodic direction(s); volume = {:.4}",
            cell.nvec(),
            cell.volume()
        );
        Ok(cell)
    }
}
