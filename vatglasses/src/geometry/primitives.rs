//! Polygon construction, cleanup and validation.
//!
//! Coordinates are stored GeoJSON-style: `x` is longitude, `y` is latitude.
//! Every ring produced here is closed, rounded to the configured precision and
//! free of consecutive duplicate points.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, Coord, Line, LineString, MultiPolygon, Polygon};

use super::GeometryError;
use crate::data::LatLon;

/// Decimal places kept when no precision is configured.
pub const DEFAULT_PRECISION: u32 = 8;

/// Round a value to `precision` decimal places.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Round both components of a coordinate.
pub fn round_coord(c: Coord<f64>, precision: u32) -> Coord<f64> {
    Coord {
        x: round_to(c.x, precision),
        y: round_to(c.y, precision),
    }
}

/// Round, dedupe and close a ring.
///
/// Returns the cleaned coordinate list (closed) or an error when fewer than
/// three distinct points remain.
pub fn clean_ring(coords: impl IntoIterator<Item = Coord<f64>>, precision: u32) -> Result<LineString<f64>, GeometryError> {
    let mut cleaned: Vec<Coord<f64>> = Vec::new();
    for c in coords {
        let c = round_coord(c, precision);
        if cleaned.last() != Some(&c) {
            cleaned.push(c);
        }
    }

    // Closing point is re-added below.
    while cleaned.len() > 1 && cleaned.first() == cleaned.last() {
        cleaned.pop();
    }

    if cleaned.len() < 3 {
        return Err(GeometryError::TooFewPoints(cleaned.len()));
    }

    cleaned.push(cleaned[0]);
    Ok(LineString::new(cleaned))
}

/// Build a validated polygon from sector boundary points.
pub fn sector_polygon(points: &[LatLon], precision: u32) -> Result<Polygon<f64>, GeometryError> {
    let ring = clean_ring(points.iter().map(|p| Coord { x: p.lon, y: p.lat }), precision)?;
    let polygon = Polygon::new(ring, vec![]);
    if polygon.unsigned_area() == 0.0 {
        return Err(GeometryError::Degenerate);
    }
    Ok(polygon)
}

/// The polygon's outer boundary as a closed linestring.
pub fn polygon_to_linestring(polygon: &Polygon<f64>) -> LineString<f64> {
    polygon.exterior().clone()
}

/// Rebuild a polygon from a boundary linestring, closing it if needed.
pub fn linestring_to_polygon(line: &LineString<f64>, precision: u32) -> Result<Polygon<f64>, GeometryError> {
    let ring = clean_ring(line.0.iter().copied(), precision)?;
    Ok(Polygon::new(ring, vec![]))
}

/// Round every ring of a polygon, dropping interior rings that collapse.
///
/// Returns `None` when the exterior collapses.
pub fn round_polygon(polygon: &Polygon<f64>, precision: u32) -> Option<Polygon<f64>> {
    let exterior = clean_ring(polygon.exterior().0.iter().copied(), precision).ok()?;
    let interiors = polygon
        .interiors()
        .iter()
        .filter_map(|ring| clean_ring(ring.0.iter().copied(), precision).ok())
        .collect();
    Some(Polygon::new(exterior, interiors))
}

/// Round a multipolygon and drop parts with area at or below `min_area`.
pub fn clean_multi_polygon(multi: MultiPolygon<f64>, precision: u32, min_area: f64) -> Vec<Polygon<f64>> {
    multi
        .0
        .iter()
        .filter_map(|p| round_polygon(p, precision))
        .filter(|p| p.unsigned_area() > min_area)
        .collect()
}

/// Whether the exterior ring of `polygon` crosses or overlaps itself.
///
/// Adjacent segments may only share their common vertex; any other contact
/// between two segments is a kink.
pub fn is_kinked(polygon: &Polygon<f64>) -> bool {
    let segments: Vec<Line<f64>> = polygon.exterior().lines().collect();
    let n = segments.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            match line_intersection(segments[i], segments[j]) {
                None => {}
                Some(LineIntersection::Collinear { intersection }) => {
                    if intersection.start != intersection.end || !adjacent {
                        return true;
                    }
                }
                Some(LineIntersection::SinglePoint { .. }) => {
                    if !adjacent {
                        return true;
                    }
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> LatLon {
        LatLon::new(lat, lon).unwrap()
    }

    fn square() -> Vec<LatLon> {
        vec![pt(0.0, 0.0), pt(0.0, 1.0), pt(1.0, 1.0), pt(1.0, 0.0)]
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.123456789, 3), 1.123);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }

    #[test]
    fn test_sector_polygon_closes_ring() {
        let polygon = sector_polygon(&square(), DEFAULT_PRECISION).unwrap();
        let ring = polygon.exterior();
        assert!(ring.is_closed());
        assert_eq!(ring.0.len(), 5);
        assert!((polygon.unsigned_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sector_polygon_removes_duplicates() {
        let mut points = square();
        points.insert(1, pt(0.0, 0.0));
        points.push(pt(0.0, 0.0));
        let polygon = sector_polygon(&points, DEFAULT_PRECISION).unwrap();
        assert_eq!(polygon.exterior().0.len(), 5);
    }

    #[test]
    fn test_sector_polygon_too_few_points() {
        let points = vec![pt(0.0, 0.0), pt(0.0, 1.0), pt(0.0, 1.0)];
        assert_eq!(
            sector_polygon(&points, DEFAULT_PRECISION),
            Err(GeometryError::TooFewPoints(2))
        );
    }

    #[test]
    fn test_sector_polygon_degenerate() {
        let points = vec![pt(0.0, 0.0), pt(0.0, 1.0), pt(0.0, 2.0)];
        assert_eq!(
            sector_polygon(&points, DEFAULT_PRECISION),
            Err(GeometryError::Degenerate)
        );
    }

    #[test]
    fn test_square_is_not_kinked() {
        let polygon = sector_polygon(&square(), DEFAULT_PRECISION).unwrap();
        assert!(!is_kinked(&polygon));
    }

    #[test]
    fn test_bowtie_is_kinked() {
        let points = vec![pt(0.0, 0.0), pt(2.0, 2.0), pt(0.0, 2.0), pt(1.0, 0.0)];
        let polygon = sector_polygon(&points, DEFAULT_PRECISION).unwrap();
        assert!(is_kinked(&polygon));
    }

    #[test]
    fn test_spike_is_kinked() {
        // Goes out along the bottom edge and doubles back over itself.
        let points = vec![pt(0.0, 0.0), pt(0.0, 2.0), pt(0.0, 1.0), pt(1.0, 1.0)];
        let polygon = sector_polygon(&points, DEFAULT_PRECISION).unwrap();
        assert!(is_kinked(&polygon));
    }

    #[test]
    fn test_linestring_round_trip_conversion() {
        let polygon = sector_polygon(&square(), DEFAULT_PRECISION).unwrap();
        let line = polygon_to_linestring(&polygon);
        let rebuilt = linestring_to_polygon(&line, DEFAULT_PRECISION).unwrap();
        assert_eq!(rebuilt, polygon);
    }

    #[test]
    fn test_clean_multi_polygon_drops_slivers() {
        let big = sector_polygon(&square(), DEFAULT_PRECISION).unwrap();
        let sliver = sector_polygon(
            &[pt(5.0, 5.0), pt(5.0, 5.000001), pt(5.000001, 5.000001)],
            DEFAULT_PRECISION,
        )
        .unwrap();
        let cleaned = clean_multi_polygon(MultiPolygon::new(vec![big, sliver]), DEFAULT_PRECISION, 1e-10);
        assert_eq!(cleaned.len(), 1);
    }
}
