//! Pairwise boundary intersection and vertex splicing.
//!
//! Before polygons are folded together, every point where two boundaries cross
//! is inserted as a vertex into both boundaries. The boolean operations then
//! see vertex-aligned topology along shared edges.
//!
//! Intersections for a pair are computed once; the memo is keyed by the
//! unordered pair so `(a, b)` and `(b, a)` share an entry.

use std::collections::HashMap;

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{BoundingRect, Coord, Intersects, LineString, Polygon};

use super::primitives::round_coord;

/// One crossing between segment `seg_low` of the lower-indexed polygon and
/// segment `seg_high` of the higher-indexed one.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Hit {
    seg_low: usize,
    seg_high: usize,
    point: Coord<f64>,
}

/// Symmetric memo of pairwise boundary intersections.
///
/// Lives for a single splitter invocation.
#[derive(Debug, Default)]
pub struct IntersectionMemo {
    hits: HashMap<(usize, usize), Vec<Hit>>,
}

impl IntersectionMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of polygon pairs computed so far.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Crossings of polygon `a` with polygon `b` as `(segment of a, point)`.
    fn crossings(&mut self, polygons: &[Polygon<f64>], a: usize, b: usize) -> Vec<(usize, Coord<f64>)> {
        let key = (a.min(b), a.max(b));
        let hits = self
            .hits
            .entry(key)
            .or_insert_with(|| boundary_hits(&polygons[key.0], &polygons[key.1]));

        hits.iter()
            .map(|hit| {
                let seg = if a == key.0 { hit.seg_low } else { hit.seg_high };
                (seg, hit.point)
            })
            .collect()
    }
}

/// Every contact point between the exterior rings of `low` and `high`.
fn boundary_hits(low: &Polygon<f64>, high: &Polygon<f64>) -> Vec<Hit> {
    let (Some(low_box), Some(high_box)) = (low.bounding_rect(), high.bounding_rect()) else {
        return Vec::new();
    };
    if !low_box.intersects(&high_box) {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for (seg_low, a) in low.exterior().lines().enumerate() {
        for (seg_high, b) in high.exterior().lines().enumerate() {
            match line_intersection(a, b) {
                None => {}
                Some(LineIntersection::SinglePoint { intersection, .. }) => hits.push(Hit {
                    seg_low,
                    seg_high,
                    point: intersection,
                }),
                Some(LineIntersection::Collinear { intersection }) => {
                    for point in [intersection.start, intersection.end] {
                        hits.push(Hit {
                            seg_low,
                            seg_high,
                            point,
                        });
                    }
                }
            }
        }
    }
    hits
}

/// Insert every pairwise boundary crossing into both polygons' exterior rings.
///
/// Returns the number of vertices added across all polygons.
pub fn splice_intersections(polygons: &mut [Polygon<f64>], memo: &mut IntersectionMemo, precision: u32) -> usize {
    let n = polygons.len();
    let mut insertions: Vec<Vec<(usize, Coord<f64>)>> = vec![Vec::new(); n];

    for (a, pending) in insertions.iter_mut().enumerate() {
        for b in 0..n {
            if a != b {
                pending.extend(memo.crossings(polygons, a, b));
            }
        }
    }

    let mut added = 0;
    for (polygon, pending) in polygons.iter_mut().zip(insertions) {
        if pending.is_empty() {
            continue;
        }
        let (ring, count) = splice_ring(polygon.exterior(), pending, precision);
        if count > 0 {
            let interiors = polygon.interiors().to_vec();
            *polygon = Polygon::new(ring, interiors);
            added += count;
        }
    }
    added
}

/// Rebuild `ring` with `pending` points inserted along their segments.
fn splice_ring(ring: &LineString<f64>, mut pending: Vec<(usize, Coord<f64>)>, precision: u32) -> (LineString<f64>, usize) {
    let coords = &ring.0;
    let mut out: Vec<Coord<f64>> = Vec::with_capacity(coords.len() + pending.len());
    let mut added = 0;

    pending.sort_by_key(|(seg, _)| *seg);
    let mut pending = pending.into_iter().peekable();

    for (seg, window) in coords.windows(2).enumerate() {
        let (start, end) = (window[0], window[1]);
        out.push(start);

        let mut on_segment: Vec<Coord<f64>> = Vec::new();
        while let Some((_, point)) = pending.next_if(|(s, _)| *s == seg) {
            let point = round_coord(point, precision);
            if point != start && point != end && !on_segment.contains(&point) {
                on_segment.push(point);
            }
        }
        on_segment.sort_by(|p, q| {
            distance_sq(start, *p)
                .partial_cmp(&distance_sq(start, *q))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        added += on_segment.len();
        out.extend(on_segment);
    }

    if let Some(last) = coords.last() {
        out.push(*last);
    }
    (LineString::new(out), added)
}

fn distance_sq(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
