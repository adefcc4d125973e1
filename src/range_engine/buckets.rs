//! Optional strength buckets for hints: a 13×13 matrix of 1 (strongest)
//! through 10 (weakest), in the same layout as the range grids.

use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};

use crate::range_engine::{
    error::{RangeError, Result},
    hand_key::{grid_position, Hand169, GRID},
};

pub const STRONGEST: u8 = 1;
pub const WEAKEST: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankBuckets {
    grid: [[u8; GRID]; GRID],
}

impl RankBuckets {
    /// Validate a raw matrix: 13 rows of 13 values, each within 1..=10.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self> {
        if rows.len() != GRID {
            return Err(RangeError::BucketFormat(format!("expected {GRID} rows, found {}", rows.len())));
        }
        let mut grid = [[0u8; GRID]; GRID];
        for (i, row) in rows.iter().enumerate() {
            if row.len() != GRID {
                return Err(RangeError::BucketFormat(format!(
                    "row {i}: expected {GRID} values, found {}",
                    row.len()
                )));
            }
            for (j, &value) in row.iter().enumerate() {
                if !(STRONGEST..=WEAKEST).contains(&value) {
                    return Err(RangeError::BucketFormat(format!(
                        "cell ({i}, {j}) = {value} is outside {STRONGEST}..={WEAKEST}"
                    )));
                }
                grid[i][j] = value;
            }
        }
        Ok(RankBuckets { grid })
    }

    /// Parse a JSON array of arrays.
    pub fn from_json(text: &str) -> Result<Self> {
        let rows: Vec<Vec<u8>> =
            serde_json::from_str(text).map_err(|e| RangeError::BucketFormat(e.to_string()))?;
        Self::from_rows(rows)
    }

    /// Load a bucket file. A missing file is `Ok(None)`: hints are simply
    /// left out.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no bucket file at {}, hints disabled", path.display());
                return Ok(None);
            }
            Err(e) => return Err(RangeError::BucketIo(path.to_path_buf(), e)),
        };
        let buckets = Self::from_json(&text)?;
        info!("loaded rank buckets from {}", path.display());
        Ok(Some(buckets))
    }

    /// Bucket of `hand`, 1 (strongest) to 10 (weakest).
    pub fn bucket_of(&self, hand: Hand169) -> Option<u8> {
        grid_position(hand).map(|(i, j)| self.grid[i][j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Vec<Vec<u8>> {
        // Diagonal distance from the top-left corner, clamped to 1..=10.
        (0..GRID)
            .map(|i| (0..GRID).map(|j| ((i + j) / 2 + 1).min(10) as u8).collect())
            .collect()
    }

    #[test]
    fn lookup_by_hand() {
        let buckets = RankBuckets::from_rows(ramp()).unwrap();
        assert_eq!(buckets.bucket_of("AA".parse().unwrap()), Some(1));
        assert_eq!(buckets.bucket_of("22".parse().unwrap()), Some(10));
        // AKs sits at (0, 1), AKo at (1, 0): both (0+1)/2+1 = 1
        assert_eq!(buckets.bucket_of("AKo".parse().unwrap()), Some(1));
        assert_eq!(buckets.bucket_of("T9s".parse().unwrap()), Some(5));
    }

    #[test]
    fn shape_and_range_are_checked() {
        let mut rows = ramp();
        rows[3][4] = 0;
        assert!(matches!(RankBuckets::from_rows(rows), Err(RangeError::BucketFormat(_))));
        let mut rows = ramp();
        rows.pop();
        assert!(RankBuckets::from_rows(rows).is_err());
        let mut rows = ramp();
        rows[0].push(1);
        assert!(RankBuckets::from_rows(rows).is_err());
    }

    #[test]
    fn json_matrix_is_parsed() {
        let text = serde_json::to_string(&ramp()).unwrap();
        let buckets = RankBuckets::from_json(&text).unwrap();
        assert_eq!(buckets, RankBuckets::from_rows(ramp()).unwrap());
        assert!(RankBuckets::from_json("[[1,2],[3]]").is_err());
        assert!(RankBuckets::from_json("not json").is_err());
    }

    #[test]
    fn missing_file_disables_hints() {
        let loaded = RankBuckets::load("/nonexistent/buckets.json").unwrap();
        assert!(loaded.is_none());
    }
}
