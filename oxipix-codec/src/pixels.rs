//! Run expansion and final palette index resolution.
//!
//! The last two decode stages: flatten run records into one
//! (representative id, difference) pair per pixel, then resolve each pair
//! against the representative palette index table, wrapping modulo the
//! palette size. Differences may be negative and may wrap through zero, so
//! the reduction uses `rem_euclid` to stay in `[0, palette_size)`.

use crate::decoder::RunRecord;
use oxipix_core::error::{OxiPixError, Result};

/// Expand runs into one `(rep_id, diff)` pair per pixel, in run order.
///
/// The pair count must land exactly on `expected_pixels`; a mismatch means
/// the accumulator's totals and the records disagree, which is a logic
/// defect, not bad input, and surfaces as [`OxiPixError::RleMismatch`].
pub fn expand_runs(runs: &[RunRecord], expected_pixels: u64) -> Result<Vec<(u32, i32)>> {
    let mut pairs = Vec::with_capacity(expected_pixels as usize);
    for run in runs {
        for _ in 0..run.count {
            pairs.push((run.rep_id, run.diff));
        }
    }

    if pairs.len() as u64 != expected_pixels {
        return Err(OxiPixError::rle_mismatch(pairs.len() as u64, expected_pixels));
    }
    Ok(pairs)
}

/// Resolve pairs to final palette indices.
///
/// Each pair's representative id indexes `rep_palette` for a base palette
/// index; the signed difference is added and the sum reduced modulo
/// `palette_size`, always yielding a non-negative index.
pub fn resolve_palette_indices(
    pairs: &[(u32, i32)],
    rep_palette: &[u32],
    palette_size: u32,
) -> Result<Vec<u32>> {
    let mut indices = Vec::with_capacity(pairs.len());
    for &(rep_id, diff) in pairs {
        let base = rep_palette
            .get(rep_id as usize)
            .copied()
            .ok_or_else(|| OxiPixError::invalid_rep_color_id(rep_id, rep_palette.len()))?;

        let raw = i64::from(base) + i64::from(diff);
        let index = raw.rem_euclid(i64::from(palette_size)) as u32;
        indices.push(index);
    }
    Ok(indices)
}
