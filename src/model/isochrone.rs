//! Output data model and its GeoJSON export.

use geo::{BoundingRect, MultiPolygon, Point, Polygon, Rect};
use geojson::{Feature, FeatureCollection, Geometry, GeometryValue};
use serde_json::json;

use crate::builders::BuilderMethod;
use crate::model::range::RangeUnit;
use crate::Error;

/// One reachability band: a range value plus the polygons enclosing
/// everything reachable within it. Disjoint regions are kept as separate
/// polygons; every ring is simple and closed.
#[derive(Debug, Clone)]
pub struct Isochrone {
    pub value: f64,
    pub unit: RangeUnit,
    pub polygons: Vec<Polygon<f64>>,
    /// Band area in m², when requested.
    pub area_m2: Option<f64>,
    /// Area divided by the ideal full circle π·(range distance)²,
    /// when requested.
    pub reach_factor: Option<f64>,
}

impl Isochrone {
    pub fn empty(value: f64, unit: RangeUnit) -> Self {
        Self {
            value,
            unit,
            polygons: Vec::new(),
            area_m2: None,
            reach_factor: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// Ordered result of one isochrone computation: bands sorted ascending by
/// range, plus an echo of the resolved origin and method.
#[derive(Debug, Clone)]
pub struct IsochroneMap {
    pub origin: Point<f64>,
    pub method: BuilderMethod,
    pub isochrones: Vec<Isochrone>,
}

impl IsochroneMap {
    pub fn new(origin: Point<f64>, method: BuilderMethod, isochrones: Vec<Isochrone>) -> Self {
        Self {
            origin,
            method,
            isochrones,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Isochrone> {
        self.isochrones.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.isochrones.iter().all(Isochrone::is_empty)
    }

    /// Bounding rectangle over every band.
    pub fn envelope(&self) -> Option<Rect<f64>> {
        let mut envelope: Option<Rect<f64>> = None;
        for isochrone in &self.isochrones {
            for polygon in &isochrone.polygons {
                let Some(rect) = polygon.bounding_rect() else {
                    continue;
                };
                envelope = Some(match envelope {
                    None => rect,
                    Some(current) => Rect::new(
                        geo::Coord {
                            x: current.min().x.min(rect.min().x),
                            y: current.min().y.min(rect.min().y),
                        },
                        geo::Coord {
                            x: current.max().x.max(rect.max().x),
                            y: current.max().y.max(rect.max().y),
                        },
                    ),
                });
            }
        }
        envelope
    }

    /// Converts the map to a GeoJSON `FeatureCollection`, one feature per
    /// band, bands in ascending range order.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let mut features = Vec::with_capacity(self.isochrones.len());
        for isochrone in &self.isochrones {
            let multi = MultiPolygon::new(isochrone.polygons.clone());
            let geometry = Geometry::new(GeometryValue::from(&multi));
            let value = json!({
                "type": "Feature",
                "geometry": geometry,
                "properties": {
                    "value": isochrone.value,
                    "unit": isochrone.unit.as_str(),
                    "method": self.method.as_str(),
                    "center": [self.origin.x(), self.origin.y()],
                    "area": isochrone.area_m2,
                    "reach_factor": isochrone.reach_factor,
                }
            });
            let feature: Feature =
                serde_json::from_value(value).map_err(|e| Error::Internal(e.to_string()))?;
            features.push(feature);
        }
        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::Internal(e.to_string()))
    }
}
