//! Transcoding between rich geometry and CAP's flat polygon string grammar.
//!
//! CAP models an area as one or more single-ring polygons written as
//! space-separated `lat,lon` pairs. GeoJSON (and the `geo` types used
//! internally) order coordinates `lon,lat`, so every conversion in this
//! module flips the axis order.

use geo::{BooleanOps, BoundingRect, ConvexHull, Simplify};
use geo::{Coord, Geometry, LineString, MultiPolygon, Polygon, Rect};

use crate::error::DomainError;

/// Kilometers per degree of latitude. Flat-earth approximation used when
/// buffering circle centers; accuracy degrades near the poles and for large
/// radii, but it is preserved as-is because downstream consumers depend on
/// the exact ring shape.
const KM_PER_DEGREE: f64 = 111.12;

/// Number of segments used to approximate a circle as a ring.
const CIRCLE_SEGMENTS: usize = 64;

/// Tolerance ceiling for the doubling simplification loop. Disjoint parts
/// never merge under simplification alone, so past this point the convex
/// hull is taken instead.
const MAX_SIMPLIFY_TOLERANCE: f64 = 16.0;

/// Appends the first coordinate when a ring is open.
pub fn close_ring(ring: &mut LineString<f64>) {
    if !ring.0.is_empty() && !ring.is_closed() {
        let first = ring.0[0];
        ring.0.push(first);
    }
}

/// Renders a ring as a CAP polygon string: `"lat,lon lat,lon ..."`, closed.
pub fn ring_to_cap_string(ring: &LineString<f64>) -> String {
    let mut ring = ring.clone();
    close_ring(&mut ring);
    ring.0
        .iter()
        .map(|c| format!("{},{}", c.y, c.x))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One CAP polygon string per exterior ring. Interior rings (holes) are
/// dropped: CAP's polygon element models a single closed ring.
pub fn cap_polygon_strings(geom: &Geometry<f64>) -> Vec<String> {
    match geom {
        Geometry::Polygon(p) => vec![ring_to_cap_string(p.exterior())],
        Geometry::MultiPolygon(mp) => mp
            .0
            .iter()
            .map(|p| ring_to_cap_string(p.exterior()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Approximates a circle by buffering the center point by
/// `radius_km / 111.12` degrees and reading off the boundary as a ring.
pub fn circle_to_polygon(center_lon: f64, center_lat: f64, radius_km: f64) -> Polygon<f64> {
    let radius_deg = radius_km / KM_PER_DEGREE;
    let mut coords = Vec::with_capacity(CIRCLE_SEGMENTS + 1);
    for i in 0..CIRCLE_SEGMENTS {
        let theta = 2.0 * std::f64::consts::PI * (i as f64) / (CIRCLE_SEGMENTS as f64);
        coords.push(Coord {
            x: center_lon + radius_deg * theta.cos(),
            y: center_lat + radius_deg * theta.sin(),
        });
    }
    coords.push(coords[0]);
    Polygon::new(LineString::new(coords), vec![])
}

/// Parses a CAP circle string (`"lon,lat radius_km"`, as emitted by the
/// drawing widget) into its ring approximation.
pub fn parse_circle_string(s: &str) -> Result<Polygon<f64>, DomainError> {
    let mut parts = s.split_whitespace();
    let center = parts
        .next()
        .ok_or_else(|| DomainError::InvalidGeometry(s.to_string()))?;
    let radius: f64 = parts
        .next()
        .and_then(|r| r.parse().ok())
        .ok_or_else(|| DomainError::InvalidGeometry(s.to_string()))?;

    let mut coords = center.split(',');
    let lon: f64 = coords
        .next()
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| DomainError::InvalidGeometry(s.to_string()))?;
    let lat: f64 = coords
        .next()
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| DomainError::InvalidGeometry(s.to_string()))?;

    Ok(circle_to_polygon(lon, lat, radius))
}

/// Reduces arbitrary polygonal geometry to exactly one closed ring with no
/// holes. MultiPolygon parts are unioned, then simplified with a tolerance
/// that doubles on each retry until a single polygon remains. This is a
/// deliberately lossy reduction that trades shape fidelity for protocol
/// compliance.
pub fn simplify_to_single_polygon(
    geom: &Geometry<f64>,
    base_tolerance: f64,
) -> Result<Polygon<f64>, DomainError> {
    let parts: Vec<Polygon<f64>> = match geom {
        Geometry::Polygon(p) => vec![p.clone()],
        Geometry::MultiPolygon(mp) => mp.0.clone(),
        _ => {
            return Err(DomainError::InvalidGeometry(
                "expected Polygon or MultiPolygon".to_string(),
            ))
        }
    };

    let mut iter = parts.into_iter();
    let first = iter.next().ok_or(DomainError::DegenerateGeometry)?;
    let mut merged = MultiPolygon::new(vec![first]);
    for part in iter {
        merged = merged.union(&MultiPolygon::new(vec![part]));
    }

    let mut tolerance = base_tolerance;
    merged = merged.simplify(&tolerance);
    while merged.0.len() != 1 {
        if merged.0.is_empty() {
            return Err(DomainError::DegenerateGeometry);
        }
        tolerance *= 2.0;
        if tolerance > MAX_SIMPLIFY_TOLERANCE {
            let hull = merged.convex_hull();
            merged = MultiPolygon::new(vec![hull]);
            break;
        }
        merged = merged.simplify(&tolerance);
    }

    let polygon = merged.0.into_iter().next().ok_or(DomainError::DegenerateGeometry)?;
    let mut exterior = polygon.exterior().clone();
    close_ring(&mut exterior);
    // A closed ring needs at least a triangle plus the closing point.
    if exterior.0.len() < 4 {
        return Err(DomainError::DegenerateGeometry);
    }
    Ok(Polygon::new(exterior, vec![]))
}

/// Parses one CAP polygon string into GeoJSON ring positions (`lon,lat`),
/// closing the ring when open.
pub fn parse_cap_ring(s: &str) -> Result<Vec<Vec<f64>>, DomainError> {
    let mut positions = Vec::new();
    for pair in s.split_whitespace() {
        let mut coords = pair.split(',');
        let lat: f64 = coords
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| DomainError::InvalidGeometry(pair.to_string()))?;
        let lon: f64 = coords
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| DomainError::InvalidGeometry(pair.to_string()))?;
        positions.push(vec![lon, lat]);
    }
    if positions.is_empty() {
        return Err(DomainError::InvalidGeometry(s.to_string()));
    }
    if positions.first() != positions.last() {
        positions.push(positions[0].clone());
    }
    Ok(positions)
}

/// Converts one or more CAP polygon strings into a GeoJSON geometry,
/// returning the ring count alongside. A single ring becomes a `Polygon`;
/// several rings become a `MultiPolygon` with one single-ring polygon each.
pub fn cap_strings_to_geometry(
    rings: &[String],
) -> Result<(geojson::Geometry, usize), DomainError> {
    if rings.is_empty() {
        return Err(DomainError::DegenerateGeometry);
    }
    let mut parsed = Vec::with_capacity(rings.len());
    for ring in rings {
        parsed.push(parse_cap_ring(ring)?);
    }
    let count = parsed.len();
    let value = if count > 1 {
        geojson::Value::MultiPolygon(parsed.into_iter().map(|r| vec![r]).collect())
    } else {
        geojson::Value::Polygon(vec![parsed.into_iter().next().unwrap_or_default()])
    };
    Ok((geojson::Geometry::new(value), count))
}

/// Converts one or more CAP circle strings into a GeoJSON geometry of ring
/// approximations, returning the circle count alongside.
pub fn cap_circles_to_geometry(
    circles: &[String],
) -> Result<(geojson::Geometry, usize), DomainError> {
    if circles.is_empty() {
        return Err(DomainError::DegenerateGeometry);
    }
    let mut rings = Vec::with_capacity(circles.len());
    for circle in circles {
        let polygon = parse_circle_string(circle)?;
        let ring: Vec<Vec<f64>> = polygon.exterior().0.iter().map(|c| vec![c.x, c.y]).collect();
        rings.push(ring);
    }
    let count = rings.len();
    let value = if count > 1 {
        geojson::Value::MultiPolygon(rings.into_iter().map(|r| vec![r]).collect())
    } else {
        geojson::Value::Polygon(vec![rings.into_iter().next().unwrap_or_default()])
    };
    Ok((geojson::Geometry::new(value), count))
}

/// Rich geometry from a stored GeoJSON value.
pub fn geojson_to_geo(geom: &geojson::Geometry) -> Result<Geometry<f64>, DomainError> {
    Geometry::<f64>::try_from(geom.value.clone())
        .map_err(|e| DomainError::InvalidGeometry(e.to_string()))
}

pub fn bounding_box(geom: &Geometry<f64>) -> Option<Rect<f64>> {
    geom.bounding_rect()
}
