//! Geometry helpers shared by the isochrone builders.
//!
//! All geometry stays in WGS84 lon/lat; meter quantities are converted
//! with a local equirectangular approximation, which is accurate enough
//! at isochrone scale (tens of kilometers) and keeps the output
//! independent of any projection library.

pub(crate) mod contour;
pub(crate) mod hull;
pub(crate) mod sampling;

use geo::{Area, Coord, Polygon, Simplify};

const METERS_PER_DEGREE_LAT: f64 = 110_540.0;
const METERS_PER_DEGREE_LON_EQUATOR: f64 = 111_320.0;

/// Meters per degree of longitude and latitude at `lat`.
pub(crate) fn meters_per_degree(lat: f64) -> (f64, f64) {
    let lon_scale = METERS_PER_DEGREE_LON_EQUATOR * lat.to_radians().cos().max(0.01);
    (lon_scale, METERS_PER_DEGREE_LAT)
}

/// Planar distance in meters between two lon/lat coordinates.
pub(crate) fn planar_distance_m(a: Coord<f64>, b: Coord<f64>, ref_lat: f64) -> f64 {
    let (lon_scale, lat_scale) = meters_per_degree(ref_lat);
    let dx = (a.x - b.x) * lon_scale;
    let dy = (a.y - b.y) * lat_scale;
    dx.hypot(dy)
}

/// Unsigned polygon area in m².
pub(crate) fn polygon_area_m2(polygon: &Polygon<f64>, ref_lat: f64) -> f64 {
    let (lon_scale, lat_scale) = meters_per_degree(ref_lat);
    polygon.unsigned_area() * lon_scale * lat_scale
}

/// Drops interior rings whose area falls below `min_area_m2`. Holes above
/// the threshold are genuine unreachable enclaves and survive.
pub(crate) fn drop_small_holes(polygon: &Polygon<f64>, min_area_m2: f64, ref_lat: f64) -> Polygon<f64> {
    if polygon.interiors().is_empty() {
        return polygon.clone();
    }
    let (lon_scale, lat_scale) = meters_per_degree(ref_lat);
    let holes = polygon
        .interiors()
        .iter()
        .filter(|ring| {
            Polygon::new((*ring).clone(), vec![]).unsigned_area() * lon_scale * lat_scale
                >= min_area_m2
        })
        .cloned()
        .collect();
    Polygon::new(polygon.exterior().clone(), holes)
}

/// Douglas-Peucker simplification over every ring, guarded against
/// collapsing a ring below a valid closed shape.
pub(crate) fn simplify_polygon(polygon: &Polygon<f64>, epsilon_deg: f64) -> Polygon<f64> {
    if epsilon_deg <= 0.0 {
        return polygon.clone();
    }
    let simplified = polygon.simplify(epsilon_deg);
    if simplified.exterior().0.len() < 4 {
        return polygon.clone();
    }
    simplified
}
