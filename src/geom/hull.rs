//! Concave-hull construction over band point clouds.

use geo::concave_hull::ConcaveHullOptions;
use geo::{Area, ConcaveHull, ConvexHull, Coord, MultiPoint, Point, Polygon};
use log::warn;

use crate::config::IsochroneConfig;
use crate::geom::meters_per_degree;

/// Effectively-zero area in degree² for degeneracy checks.
const COLLINEAR_AREA_EPS: f64 = 1e-14;

/// Boundary polygon of a band's point cloud.
///
/// Returns `None` for an empty cloud. Collinear or near-degenerate clouds
/// fall back to a fixed-radius buffer instead of failing.
pub(crate) fn concave_hull_of(
    points: &[Coord<f64>],
    range_dist_m: f64,
    ref_lat: f64,
    config: &IsochroneConfig,
) -> Option<Polygon<f64>> {
    if points.is_empty() {
        return None;
    }
    let fallback_radius_m = (config.buffer_fraction * range_dist_m).max(config.min_buffer_m);

    let cloud: MultiPoint<f64> = points.iter().map(|c| Point::from(*c)).collect();
    if points.len() < 3 || cloud.convex_hull().unsigned_area() < COLLINEAR_AREA_EPS {
        warn!("degenerate point cloud of {} points, buffering instead", points.len());
        return Some(buffered_fallback(points, fallback_radius_m, ref_lat));
    }

    let hull = cloud.concave_hull_with_options(ConcaveHullOptions {
        concavity: adaptive_concavity(&cloud, range_dist_m, ref_lat),
        length_threshold: 0.0,
    });
    if hull.exterior().0.len() < 4 || hull.unsigned_area() < COLLINEAR_AREA_EPS {
        warn!("concave hull collapsed, buffering instead");
        return Some(buffered_fallback(points, fallback_radius_m, ref_lat));
    }
    Some(hull)
}

/// Concavity parameter scaled to the observed point density. Lower
/// concavity digs deeper into the cloud, so dense clouds get a low value
/// to keep their concavities while sparse clouds get a high one so
/// isolated frontier points are not cut off.
fn adaptive_concavity(cloud: &MultiPoint<f64>, range_dist_m: f64, ref_lat: f64) -> f64 {
    use geo::BoundingRect;

    let n = cloud.0.len().max(1);
    let Some(rect) = cloud.bounding_rect() else {
        return 2.0;
    };
    let (lon_scale, lat_scale) = meters_per_degree(ref_lat);
    let area_m2 = rect.width() * lon_scale * rect.height() * lat_scale;
    if area_m2 <= 0.0 {
        return 2.0;
    }
    // Mean nearest-point spacing estimate for a uniform cloud.
    let spacing_m = (area_m2 / n as f64).sqrt().max(1.0);
    let reference_m = (0.1 * range_dist_m).max(1.0);
    (4.0 * spacing_m / reference_m).clamp(1.0, 4.0)
}

/// Convex hull of small circles around every input point: the documented
/// fallback shape for point sets a concave hull cannot handle.
fn buffered_fallback(points: &[Coord<f64>], radius_m: f64, ref_lat: f64) -> Polygon<f64> {
    let (lon_scale, lat_scale) = meters_per_degree(ref_lat);
    let mut buffered: Vec<Point<f64>> = Vec::with_capacity(points.len() * 8);
    for coord in points {
        for k in 0..8u32 {
            let angle = std::f64::consts::TAU * f64::from(k) / 8.0;
            buffered.push(Point::new(
                coord.x + radius_m * angle.cos() / lon_scale,
                coord.y + radius_m * angle.sin() / lat_scale,
            ));
        }
    }
    let cloud: MultiPoint<f64> = buffered.into_iter().collect();
    cloud.convex_hull()
}
