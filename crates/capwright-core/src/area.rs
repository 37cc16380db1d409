//! Polymorphic alert areas.
//!
//! Every variant reduces through [`Area::normalize`] to the same shape: an
//! area description plus one or more closed CAP ring strings, holes removed,
//! exterior ring first.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::geometry;
use crate::settings::CapSettings;

/// Default simplification tolerance for admin-boundary geometry, in degrees.
const BOUNDARY_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub value_name: String,
    pub value: String,
}

impl NamedValue {
    pub fn new(value_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            value_name: value_name.into(),
            value: value.into(),
        }
    }
}

/// Geographic region affected by an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Area {
    /// Administrative boundary, simplified down to a single ring.
    Boundary {
        area_desc: String,
        geometry: geojson::Geometry,
        geocode: Vec<NamedValue>,
        altitude: Option<f64>,
        ceiling: Option<f64>,
    },
    /// Hand-drawn polygon or multipolygon.
    Polygon {
        area_desc: String,
        geometry: geojson::Geometry,
        geocode: Vec<NamedValue>,
        altitude: Option<f64>,
        ceiling: Option<f64>,
    },
    /// Circle kept in its raw `"lon,lat radius_km"` form and rasterized to
    /// a ring approximation on normalization.
    Circle {
        area_desc: String,
        circle: String,
        altitude: Option<f64>,
        ceiling: Option<f64>,
    },
    /// Institution-configured reusable geometry, referenced by name.
    Predefined {
        area_desc: String,
        geometry: geojson::Geometry,
        geocode: Vec<NamedValue>,
    },
    /// Coded area reference without geometry of its own.
    Geocode {
        area_desc: String,
        geocode: Vec<NamedValue>,
    },
}

/// Common normalized shape consumed by the serializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapArea {
    pub area_desc: String,
    /// Closed CAP ring strings, one `<polygon>` element each.
    pub polygons: Vec<String>,
    pub geocode: Vec<NamedValue>,
    pub altitude: Option<f64>,
    pub ceiling: Option<f64>,
}

impl Area {
    pub fn circle(
        area_desc: impl Into<String>,
        center_lon: f64,
        center_lat: f64,
        radius_km: f64,
    ) -> Self {
        Self::Circle {
            area_desc: area_desc.into(),
            circle: format!("{},{} {}", center_lon, center_lat, radius_km),
            altitude: None,
            ceiling: None,
        }
    }

    /// Resolves a named area from the institution settings. The lookup is
    /// case-insensitive; `None` when no such area is configured.
    pub fn predefined(name: &str, settings: &CapSettings) -> Option<Self> {
        let area = settings.predefined_area(name)?;
        Some(Self::Predefined {
            area_desc: area.name.clone(),
            geometry: area.geometry.clone(),
            geocode: Vec::new(),
        })
    }

    pub fn area_desc(&self) -> &str {
        match self {
            Self::Boundary { area_desc, .. }
            | Self::Polygon { area_desc, .. }
            | Self::Circle { area_desc, .. }
            | Self::Predefined { area_desc, .. }
            | Self::Geocode { area_desc, .. } => area_desc,
        }
    }

    pub fn normalize(&self) -> Result<CapArea, DomainError> {
        let (altitude, ceiling) = self.altitude_ceiling();
        if ceiling.is_some() && altitude.is_none() {
            return Err(DomainError::CeilingWithoutAltitude);
        }

        match self {
            Self::Boundary {
                area_desc,
                geometry,
                geocode,
                altitude,
                ceiling,
            } => {
                let geom = geometry::geojson_to_geo(geometry)?;
                let single = geometry::simplify_to_single_polygon(&geom, BOUNDARY_TOLERANCE)?;
                Ok(CapArea {
                    area_desc: area_desc.clone(),
                    polygons: vec![geometry::ring_to_cap_string(single.exterior())],
                    geocode: geocode.clone(),
                    altitude: *altitude,
                    ceiling: *ceiling,
                })
            }
            Self::Polygon {
                area_desc,
                geometry,
                geocode,
                altitude,
                ceiling,
            } => {
                let geom = geometry::geojson_to_geo(geometry)?;
                let polygons = geometry::cap_polygon_strings(&geom);
                if polygons.is_empty() {
                    return Err(DomainError::DegenerateGeometry);
                }
                Ok(CapArea {
                    area_desc: area_desc.clone(),
                    polygons,
                    geocode: geocode.clone(),
                    altitude: *altitude,
                    ceiling: *ceiling,
                })
            }
            Self::Circle {
                area_desc,
                circle,
                altitude,
                ceiling,
            } => {
                let polygon = geometry::parse_circle_string(circle)?;
                Ok(CapArea {
                    area_desc: area_desc.clone(),
                    polygons: vec![geometry::ring_to_cap_string(polygon.exterior())],
                    geocode: Vec::new(),
                    altitude: *altitude,
                    ceiling: *ceiling,
                })
            }
            Self::Predefined {
                area_desc,
                geometry,
                geocode,
            } => {
                let geom = geometry::geojson_to_geo(geometry)?;
                let polygons = geometry::cap_polygon_strings(&geom);
                if polygons.is_empty() {
                    return Err(DomainError::DegenerateGeometry);
                }
                Ok(CapArea {
                    area_desc: area_desc.clone(),
                    polygons,
                    geocode: geocode.clone(),
                    altitude: None,
                    ceiling: None,
                })
            }
            Self::Geocode { area_desc, geocode } => Ok(CapArea {
                area_desc: area_desc.clone(),
                polygons: Vec::new(),
                geocode: geocode.clone(),
                altitude: None,
                ceiling: None,
            }),
        }
    }

    fn altitude_ceiling(&self) -> (Option<f64>, Option<f64>) {
        match self {
            Self::Boundary {
                altitude, ceiling, ..
            }
            | Self::Polygon {
                altitude, ceiling, ..
            }
            | Self::Circle {
                altitude, ceiling, ..
            } => (*altitude, *ceiling),
            Self::Predefined { .. } | Self::Geocode { .. } => (None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_geojson() -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ]]))
    }

    fn multi_geojson() -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::MultiPolygon(vec![
            vec![vec![
                vec![0.0, 0.0],
                vec![1.0, 0.0],
                vec![1.0, 1.0],
                vec![0.0, 0.0],
            ]],
            vec![vec![
                vec![5.0, 5.0],
                vec![6.0, 5.0],
                vec![6.0, 6.0],
                vec![5.0, 5.0],
            ]],
        ]))
    }

    #[test]
    fn polygon_area_emits_one_ring_per_part() {
        let area = Area::Polygon {
            area_desc: "Zone A".into(),
            geometry: multi_geojson(),
            geocode: Vec::new(),
            altitude: None,
            ceiling: None,
        };
        let cap = area.normalize().unwrap();
        assert_eq!(cap.polygons.len(), 2);
        for ring in &cap.polygons {
            let pairs: Vec<&str> = ring.split(' ').collect();
            assert_eq!(pairs.first(), pairs.last());
        }
    }

    #[test]
    fn circle_area_normalizes_to_a_ring() {
        let area = Area::circle("Zone B", 10.0, 20.0, 5.0);
        let cap = area.normalize().unwrap();
        assert_eq!(cap.polygons.len(), 1);
        let pairs: Vec<&str> = cap.polygons[0].split(' ').collect();
        assert_eq!(pairs.first(), pairs.last());
        assert!(pairs.len() > 60);
    }

    #[test]
    fn boundary_area_reduces_to_single_ring() {
        let area = Area::Boundary {
            area_desc: "District".into(),
            geometry: square_geojson(),
            geocode: vec![NamedValue::new("ISO3166-2", "KE-30")],
            altitude: None,
            ceiling: None,
        };
        let cap = area.normalize().unwrap();
        assert_eq!(cap.polygons.len(), 1);
        assert_eq!(cap.geocode.len(), 1);
    }

    #[test]
    fn geocode_area_has_no_rings() {
        let area = Area::Geocode {
            area_desc: "County".into(),
            geocode: vec![NamedValue::new("SAME", "006109")],
        };
        let cap = area.normalize().unwrap();
        assert!(cap.polygons.is_empty());
        assert_eq!(cap.geocode.len(), 1);
    }

    #[test]
    fn predefined_area_resolves_from_settings() {
        let mut settings = CapSettings::new("x@y.org");
        settings.predefined_areas.push(crate::settings::PredefinedArea {
            name: "Coast".into(),
            geometry: square_geojson(),
        });

        let area = Area::predefined("coast", &settings).unwrap();
        assert_eq!(area.area_desc(), "Coast");
        let cap = area.normalize().unwrap();
        assert_eq!(cap.polygons.len(), 1);

        assert!(Area::predefined("Inland", &settings).is_none());
    }

    #[test]
    fn ceiling_without_altitude_is_rejected() {
        let area = Area::Polygon {
            area_desc: "Zone".into(),
            geometry: square_geojson(),
            geocode: Vec::new(),
            altitude: None,
            ceiling: Some(1000.0),
        };
        assert_eq!(area.normalize(), Err(DomainError::CeilingWithoutAltitude));
    }

    #[test]
    fn altitude_zero_is_preserved() {
        let area = Area::Polygon {
            area_desc: "Zone".into(),
            geometry: square_geojson(),
            geocode: Vec::new(),
            altitude: Some(0.0),
            ceiling: Some(500.0),
        };
        let cap = area.normalize().unwrap();
        assert_eq!(cap.altitude, Some(0.0));
        assert_eq!(cap.ceiling, Some(500.0));
    }
}
