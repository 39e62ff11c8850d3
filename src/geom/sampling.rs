//! Buffer-point generation along traversed edges.
//!
//! Each reachable stretch of an edge contributes rings of points offset
//! from the edge geometry. The offset radius follows the residual cost at
//! the sample position, capped by a fraction of the band's full range
//! distance, and the sampling step shrinks together with the radius so
//! the reachability frontier is resolved finer than the interior.

use std::f64::consts::TAU;

use geo::{Coord, LineString};
use itertools::Itertools;

use crate::config::IsochroneConfig;
use crate::geom::{meters_per_degree, planar_distance_m};

/// An edge geometry with precomputed cumulative lengths, for interpolating
/// positions at a given distance from the edge start.
pub(crate) struct EdgeWalk<'a> {
    coords: &'a [Coord<f64>],
    cumulative_m: Vec<f64>,
}

impl<'a> EdgeWalk<'a> {
    pub(crate) fn new(geometry: &'a LineString<f64>, ref_lat: f64) -> Option<Self> {
        let coords = geometry.0.as_slice();
        if coords.is_empty() {
            return None;
        }
        let mut cumulative_m = Vec::with_capacity(coords.len());
        cumulative_m.push(0.0);
        for (a, b) in coords.iter().tuple_windows() {
            let last = *cumulative_m.last().unwrap_or(&0.0);
            cumulative_m.push(last + planar_distance_m(*a, *b, ref_lat));
        }
        Some(Self {
            coords,
            cumulative_m,
        })
    }

    pub(crate) fn length_m(&self) -> f64 {
        *self.cumulative_m.last().unwrap_or(&0.0)
    }

    /// Position at `distance_m` from the edge start, clamped to the ends.
    pub(crate) fn point_at(&self, distance_m: f64) -> Coord<f64> {
        if distance_m <= 0.0 || self.coords.len() == 1 {
            return self.coords[0];
        }
        let total = self.length_m();
        if distance_m >= total {
            return self.coords[self.coords.len() - 1];
        }
        // cumulative_m is ascending; find the containing segment.
        let idx = match self
            .cumulative_m
            .binary_search_by(|probe| probe.total_cmp(&distance_m))
        {
            Ok(exact) => return self.coords[exact],
            Err(insertion) => insertion - 1,
        };
        let seg_len = self.cumulative_m[idx + 1] - self.cumulative_m[idx];
        let t = if seg_len > 0.0 {
            (distance_m - self.cumulative_m[idx]) / seg_len
        } else {
            0.0
        };
        let a = self.coords[idx];
        let b = self.coords[idx + 1];
        Coord {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        }
    }
}

/// Emits buffer points for one edge into `out`.
///
/// `start_cost`/`end_cost` are the traversal costs at the edge endpoints,
/// `range` the band threshold and `dist_per_cost` the meters travelled per
/// cost unit. Edges starting past the range contribute nothing.
#[allow(clippy::too_many_arguments)]
pub(crate) fn edge_buffer_points(
    geometry: &LineString<f64>,
    start_cost: f64,
    end_cost: f64,
    range: f64,
    dist_per_cost: f64,
    config: &IsochroneConfig,
    ref_lat: f64,
    out: &mut Vec<Coord<f64>>,
) {
    if start_cost > range {
        return;
    }
    let Some(walk) = EdgeWalk::new(geometry, ref_lat) else {
        return;
    };
    let total_len = walk.length_m();
    let max_buffer_m = config.buffer_fraction * range * dist_per_cost;

    // Reachable stretch: whole edge if the far end is within the range,
    // otherwise cut at the interpolated frontier.
    let reach_len = if end_cost <= range || end_cost <= start_cost {
        total_len
    } else {
        total_len * ((range - start_cost) / (end_cost - start_cost))
    };

    if total_len == 0.0 {
        let residual_m = (range - start_cost) * dist_per_cost;
        emit_ring(walk.point_at(0.0), residual_m.min(max_buffer_m), config, ref_lat, out);
        return;
    }

    let mut distance = 0.0;
    loop {
        let at_frontier = distance >= reach_len;
        let d = distance.min(reach_len);
        let cost_here = start_cost + (end_cost - start_cost) * (d / total_len);
        let residual_m = ((range - cost_here) * dist_per_cost).max(0.0);
        let radius_m = residual_m.min(max_buffer_m);
        emit_ring(walk.point_at(d), radius_m, config, ref_lat, out);
        if at_frontier {
            break;
        }
        // Finer steps as the residual radius shrinks towards the frontier.
        distance += radius_m.max(config.min_sample_step_m);
    }
}

/// One ring of `circle_samples` points around `center`, or the bare
/// center when the radius is below the degenerate threshold.
fn emit_ring(
    center: Coord<f64>,
    radius_m: f64,
    config: &IsochroneConfig,
    ref_lat: f64,
    out: &mut Vec<Coord<f64>>,
) {
    if radius_m < config.min_buffer_m {
        out.push(center);
        return;
    }
    let (lon_scale, lat_scale) = meters_per_degree(ref_lat);
    let n = config.circle_samples.max(4);
    for k in 0..n {
        let angle = TAU * (k as f64) / (n as f64);
        out.push(Coord {
            x: center.x + radius_m * angle.cos() / lon_scale,
            y: center.y + radius_m * angle.sin() / lat_scale,
        });
    }
}
