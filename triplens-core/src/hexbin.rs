//! Spatial density binning on a pointy-top hexagonal grid in axial `(q, r)` coordinates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use triplens_common::{Result, TripLensError};

const SQRT3: f64 = 1.732_050_807_568_877_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexBin {
    pub q: i64,
    pub r: i64,
    pub count: u64,
}

impl HexBin {
    /// Palette index in `0..levels` proportional to `count / max_count`.
    pub fn shade(&self, max_count: u64, levels: usize) -> usize {
        if max_count == 0 || levels == 0 {
            return 0;
        }
        let frac = self.count as f64 / max_count as f64;
        ((frac * (levels - 1) as f64) as usize).min(levels - 1)
    }
}

/// Axial coordinates of the hexagon containing `(x, y)`.
pub fn cartesian_to_axial(x: f64, y: f64, size: f64) -> (i64, i64) {
    let x = x / size;
    let y = -y / size;
    let q = SQRT3 / 3.0 * x - y / 3.0;
    let r = 2.0 / 3.0 * y;
    round_hex(q, r)
}

/// Cartesian center of hexagon `(q, r)`; inverse of [`cartesian_to_axial`] at tile centers.
pub fn hex_center(q: i64, r: i64, size: f64) -> (f64, f64) {
    let (q, r) = (q as f64, r as f64);
    let x = size * SQRT3 * (q + r / 2.0);
    let y = -size * 1.5 * r;
    (x, y)
}

/// Cube rounding; halves round to even.
fn round_hex(q: f64, r: f64) -> (i64, i64) {
    let (x, z) = (q, r);
    let y = -x - z;
    let (rx, ry, rz) = (x.round_ties_even(), y.round_ties_even(), z.round_ties_even());
    let (dx, dy, dz) = ((rx - x).abs(), (ry - y).abs(), (rz - z).abs());
    let x_off = dx > dy && dx > dz;
    let q = if x_off { -(ry + rz) } else { rx };
    let r = if !x_off && !(dy > dz) { -(rx + ry) } else { rz };
    (q as i64, r as i64)
}

pub fn hexbin(x: &[f64], y: &[f64], size: f64) -> Result<Vec<HexBin>> {
    if !size.is_finite() || size <= 0.0 {
        return Err(TripLensError::invalid("size", format!("must be a positive number, got {size}")));
    }
    if x.len() != y.len() {
        return Err(TripLensError::invalid(
            "y",
            format!("length {} does not match x length {}", y.len(), x.len()),
        ));
    }
    let mut counts: BTreeMap<(i64, i64), u64> = BTreeMap::new();
    for (i, (&xv, &yv)) in x.iter().zip(y).enumerate() {
        if !xv.is_finite() {
            return Err(TripLensError::NonFiniteInput { index: i, value: xv });
        }
        if !yv.is_finite() {
            return Err(TripLensError::NonFiniteInput { index: i, value: yv });
        }
        *counts.entry(cartesian_to_axial(xv, yv, size)).or_insert(0) += 1;
    }
    tracing::debug!(points = x.len(), tiles = counts.len(), size, "hex binned");
    Ok(counts
        .into_iter()
        .map(|((q, r), count)| HexBin { q, r, count })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_tile_zero() {
        assert_eq!(cartesian_to_axial(0.0, 0.0, 1.0), (0, 0));
        assert_eq!(cartesian_to_axial(0.1, -0.1, 1.0), (0, 0));
    }

    #[test]
    fn centers_map_back_to_their_tile() {
        for q in -3..=3 {
            for r in -3..=3 {
                let (x, y) = hex_center(q, r, 0.5);
                assert_eq!(cartesian_to_axial(x, y, 0.5), (q, r), "tile ({q}, {r})");
            }
        }
    }

    #[test]
    fn counts_group_by_tile() {
        let (cx, cy) = hex_center(2, -1, 1.0);
        let x = [0.0, 0.05, cx, cx + 0.1, cx - 0.1];
        let y = [0.0, 0.05, cy, cy, cy + 0.1];
        let bins = hexbin(&x, &y, 1.0).unwrap();
        assert_eq!(bins, vec![HexBin { q: 0, r: 0, count: 2 }, HexBin { q: 2, r: -1, count: 3 }]);
    }

    #[test]
    fn rejects_bad_size_and_lengths() {
        assert!(matches!(hexbin(&[0.0], &[0.0], 0.0), Err(TripLensError::InvalidParameter { name: "size", .. })));
        assert!(matches!(hexbin(&[0.0, 1.0], &[0.0], 1.0), Err(TripLensError::InvalidParameter { name: "y", .. })));
        assert!(matches!(hexbin(&[f64::NAN], &[0.0], 1.0), Err(TripLensError::NonFiniteInput { .. })));
    }

    #[test]
    fn empty_input_gives_no_tiles() {
        assert!(hexbin(&[], &[], 0.1).unwrap().is_empty());
    }

    #[test]
    fn shade_scales_to_levels() {
        let b = HexBin { q: 0, r: 0, count: 5 };
        assert_eq!(b.shade(10, 256), 127);
        assert_eq!(b.shade(5, 256), 255);
        assert_eq!(b.shade(0, 256), 0);
    }
}
