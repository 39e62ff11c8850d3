//! Iso-contour extraction from a rasterized cost surface.
//!
//! Marching squares over the cell-centre lattice: every square of four
//! neighbouring lattice nodes contributes directed boundary segments with
//! the reachable region on the left, the segments are stitched into
//! closed rings, and negatively oriented rings become holes of their
//! enclosing exterior. The lattice is padded with one ring of unreachable
//! nodes so every contour closes inside the domain.

use std::collections::BTreeMap;

use geo::{Contains, Coord, LineString, Point, Polygon};
use geo::Area;

/// Rasterized cost surface over cell centres.
#[derive(Debug, Clone)]
pub(crate) struct CostGrid {
    /// Coordinate of lattice node (0, 0), i.e. the first cell centre.
    pub x0: f64,
    pub y0: f64,
    /// Lattice spacing in degrees.
    pub dx: f64,
    pub dy: f64,
    pub cols: usize,
    pub rows: usize,
    /// Row-major cost values, `values[j * cols + i]`.
    pub values: Vec<f64>,
    /// Finite sentinel above every queried threshold, marking cells with
    /// no reachable edge nearby.
    pub unreached: f64,
}

/// Lattice edge identifier: (row, col, orientation). Horizontal edges run
/// from node (i, j) to (i+1, j), vertical ones to (i, j+1). Indices are in
/// padded-lattice space.
type EdgeKey = (usize, usize, u8);

const HORIZONTAL: u8 = 0;
const VERTICAL: u8 = 1;

impl CostGrid {
    /// Value at padded lattice node; the pad ring is unreachable.
    fn padded_value(&self, i: usize, j: usize) -> f64 {
        if i == 0 || j == 0 || i > self.cols || j > self.rows {
            self.unreached
        } else {
            self.values[(j - 1) * self.cols + (i - 1)]
        }
    }

    fn node_x(&self, i: usize) -> f64 {
        self.x0 + (i as f64 - 1.0) * self.dx
    }

    fn node_y(&self, j: usize) -> f64 {
        self.y0 + (j as f64 - 1.0) * self.dy
    }

    /// Interpolated crossing point on a lattice edge.
    fn crossing(&self, key: EdgeKey, threshold: f64) -> Coord<f64> {
        let (j, i, orient) = key;
        let v0 = self.padded_value(i, j);
        let (i1, j1) = match orient {
            HORIZONTAL => (i + 1, j),
            _ => (i, j + 1),
        };
        let v1 = self.padded_value(i1, j1);
        let t = if (v1 - v0).abs() < f64::EPSILON {
            0.5
        } else {
            ((threshold - v0) / (v1 - v0)).clamp(0.0, 1.0)
        };
        match orient {
            HORIZONTAL => Coord {
                x: self.node_x(i) + t * self.dx,
                y: self.node_y(j),
            },
            _ => Coord {
                x: self.node_x(i),
                y: self.node_y(j) + t * self.dy,
            },
        }
    }
}

/// Extracts the closed boundary polygons of the region with cost below or
/// equal to `threshold`. Disjoint regions come back as separate polygons;
/// unreachable enclaves inside a region come back as holes.
pub(crate) fn contour_polygons(grid: &CostGrid, threshold: f64) -> Vec<Polygon<f64>> {
    if grid.cols == 0 || grid.rows == 0 {
        return Vec::new();
    }

    // from-edge -> to-edge; each crossed lattice edge is a from-edge of
    // exactly one adjacent square, so stitching is unambiguous.
    let mut segments: BTreeMap<EdgeKey, EdgeKey> = BTreeMap::new();

    for j in 0..grid.rows + 1 {
        for i in 0..grid.cols + 1 {
            let a = grid.padded_value(i, j) <= threshold;
            let b = grid.padded_value(i + 1, j) <= threshold;
            let c = grid.padded_value(i + 1, j + 1) <= threshold;
            let d = grid.padded_value(i, j + 1) <= threshold;
            let case = usize::from(a) | usize::from(b) << 1 | usize::from(c) << 2 | usize::from(d) << 3;
            if case == 0 || case == 15 {
                continue;
            }

            let south: EdgeKey = (j, i, HORIZONTAL);
            let east: EdgeKey = (j, i + 1, VERTICAL);
            let north: EdgeKey = (j + 1, i, HORIZONTAL);
            let west: EdgeKey = (j, i, VERTICAL);

            match case {
                1 => {
                    segments.insert(south, west);
                }
                2 => {
                    segments.insert(east, south);
                }
                3 => {
                    segments.insert(east, west);
                }
                4 => {
                    segments.insert(north, east);
                }
                5 => {
                    // Saddle; disambiguate with the cell-centre average.
                    let center = (grid.padded_value(i, j)
                        + grid.padded_value(i + 1, j)
                        + grid.padded_value(i + 1, j + 1)
                        + grid.padded_value(i, j + 1))
                        / 4.0;
                    if center <= threshold {
                        segments.insert(south, east);
                        segments.insert(north, west);
                    } else {
                        segments.insert(south, west);
                        segments.insert(north, east);
                    }
                }
                6 => {
                    segments.insert(north, south);
                }
                7 => {
                    segments.insert(north, west);
                }
                8 => {
                    segments.insert(west, north);
                }
                9 => {
                    segments.insert(south, north);
                }
                10 => {
                    let center = (grid.padded_value(i, j)
                        + grid.padded_value(i + 1, j)
                        + grid.padded_value(i + 1, j + 1)
                        + grid.padded_value(i, j + 1))
                        / 4.0;
                    if center <= threshold {
                        segments.insert(east, north);
                        segments.insert(west, south);
                    } else {
                        segments.insert(east, south);
                        segments.insert(west, north);
                    }
                }
                11 => {
                    segments.insert(east, north);
                }
                12 => {
                    segments.insert(west, east);
                }
                13 => {
                    segments.insert(south, east);
                }
                14 => {
                    segments.insert(west, south);
                }
                _ => unreachable!(),
            }
        }
    }

    let rings = stitch_rings(grid, threshold, &mut segments);
    assemble_polygons(rings)
}

/// Follows from->to links until each chain closes, yielding closed rings.
fn stitch_rings(
    grid: &CostGrid,
    threshold: f64,
    segments: &mut BTreeMap<EdgeKey, EdgeKey>,
) -> Vec<LineString<f64>> {
    let mut rings = Vec::new();
    while let Some((&start, _)) = segments.first_key_value() {
        let mut coords: Vec<Coord<f64>> = Vec::new();
        let mut current = start;
        let closed = loop {
            let point = grid.crossing(current, threshold);
            if coords.last() != Some(&point) {
                coords.push(point);
            }
            let Some(next) = segments.remove(&current) else {
                break false;
            };
            if next == start {
                break true;
            }
            current = next;
        };
        if coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }
        if !closed || coords.len() < 3 {
            continue;
        }
        let first = coords[0];
        coords.push(first);
        rings.push(LineString::new(coords));
    }
    rings
}

/// Positively oriented rings become exteriors; each negatively oriented
/// ring becomes a hole of the smallest exterior containing it.
fn assemble_polygons(rings: Vec<LineString<f64>>) -> Vec<Polygon<f64>> {
    let mut exteriors: Vec<LineString<f64>> = Vec::new();
    let mut holes: Vec<LineString<f64>> = Vec::new();
    for ring in rings {
        let signed = Polygon::new(ring.clone(), vec![]).signed_area();
        if signed > 0.0 {
            exteriors.push(ring);
        } else if signed < 0.0 {
            holes.push(ring);
        }
    }

    let mut polygons: Vec<Polygon<f64>> = exteriors
        .into_iter()
        .map(|exterior| Polygon::new(exterior, vec![]))
        .collect();

    for hole in holes {
        let probe = Point::from(hole.0[0]);
        let mut best: Option<(usize, f64)> = None;
        for (idx, polygon) in polygons.iter().enumerate() {
            if polygon.contains(&probe) {
                let area = polygon.unsigned_area();
                if best.is_none_or(|(_, best_area)| area < best_area) {
                    best = Some((idx, area));
                }
            }
        }
        if let Some((idx, _)) = best {
            let (exterior, mut interiors) = polygons[idx].clone().into_inner();
            interiors.push(hole);
            polygons[idx] = Polygon::new(exterior, interiors);
        }
        // A hole with no enclosing exterior is a tracing artifact and is
        // dropped.
    }

    polygons
}
