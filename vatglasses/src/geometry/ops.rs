//! Guarded boolean operations.
//!
//! The boolean-ops backend can panic on near-degenerate input. Every call goes
//! through [`guarded`], which turns such a panic into
//! [`GeometryError::OperationFailed`] so the caller can drop one polygon's
//! contribution instead of aborting the whole pass.

use std::panic::{self, AssertUnwindSafe};

use geo::{Area, BooleanOps, MultiPolygon, Polygon};

use super::GeometryError;

/// Run `f`, converting a panic into [`GeometryError::OperationFailed`].
pub fn guarded<T>(op: &'static str, f: impl FnOnce() -> T) -> Result<T, GeometryError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let reason = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        GeometryError::OperationFailed { op, reason }
    })
}

pub fn intersection(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, GeometryError> {
    guarded("intersection", || a.intersection(b))
}

pub fn difference(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, GeometryError> {
    guarded("difference", || a.difference(b))
}

pub fn union(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, GeometryError> {
    guarded("union", || a.union(b))
}

/// Union every polygon into one (possibly multi-part) geometry.
pub fn union_all(polygons: &[Polygon<f64>]) -> Result<MultiPolygon<f64>, GeometryError> {
    let mut acc = MultiPolygon::new(vec![]);
    for polygon in polygons {
        acc = union(&acc, &MultiPolygon::new(vec![polygon.clone()]))?;
    }
    Ok(acc)
}

/// Total unsigned area, zero for an empty geometry.
pub fn area(multi: &MultiPolygon<f64>) -> f64 {
    multi.unsigned_area()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ]])
    }

    #[test]
    fn test_guarded_passes_value_through() {
        assert_eq!(guarded("noop", || 42), Ok(42));
    }

    #[test]
    fn test_guarded_catches_panic() {
        let result: Result<(), _> = guarded("explode", || panic!("boom"));
        assert_eq!(
            result,
            Err(GeometryError::OperationFailed {
                op: "explode",
                reason: "boom".to_string()
            })
        );
    }

    #[test]
    fn test_intersection_and_difference_areas() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 0.0, 2.0);
        assert!((area(&intersection(&a, &b).unwrap()) - 2.0).abs() < 1e-9);
        assert!((area(&difference(&a, &b).unwrap()) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_union_all_disjoint_and_touching() {
        let parts = vec![
            square(0.0, 0.0, 1.0).0.remove(0),
            square(1.0, 0.0, 1.0).0.remove(0),
            square(5.0, 5.0, 1.0).0.remove(0),
        ];
        let merged = union_all(&parts).unwrap();
        assert_eq!(merged.0.len(), 2);
        assert!((area(&merged) - 3.0).abs() < 1e-9);
    }
}
