//! Sector splitting: overlapping altitude-tagged polygons to a partition.
//!
//! # Algorithm
//!
//! 1. Self-intersecting inputs are dropped.
//! 2. Boundary crossings between every pair are spliced into both rings.
//! 3. Inputs are folded one at a time into the accumulated fragments. Against
//!    each fragment the still-uncovered part of the new polygon is split into
//!    the overlap (tagged with both range lists merged), the fragment's own
//!    remainder (keeping its tag) and the part carried on to the next fragment.
//!    Whatever is left after the last fragment is appended with the polygon's
//!    own range.
//!
//! A boolean-operation failure while folding one polygon discards that
//! polygon's contribution and keeps the fragments accumulated so far.

use geo::{Area, MultiPolygon, Polygon};

use crate::geometry::primitives::clean_multi_polygon;
use crate::geometry::{is_kinked, merge_ranges, ops, splice_intersections, AltitudeRange, GeometryError, IntersectionMemo};

/// One splitter input polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInput {
    pub polygon: Polygon<f64>,
    pub range: AltitudeRange,
}

/// One output fragment with every band stacked over it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub polygon: Polygon<f64>,
    pub ranges: Vec<AltitudeRange>,
}

/// Splitter tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitParams {
    /// Decimal places kept on output coordinates.
    pub precision: u32,
    /// Pieces at or below this area (square degrees) are discarded.
    pub min_fragment_area: f64,
}

/// Splitter result and counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitOutput {
    pub fragments: Vec<Fragment>,
    /// Inputs dropped for self-intersection.
    pub kinked: usize,
    /// Inputs whose fold step failed.
    pub failed: usize,
}

/// Partition `inputs` into non-overlapping fragments.
pub fn split_sectors(inputs: Vec<SplitInput>, params: SplitParams) -> SplitOutput {
    let total = inputs.len();
    let (valid, kinked): (Vec<SplitInput>, Vec<SplitInput>) =
        inputs.into_iter().partition(|input| !is_kinked(&input.polygon));

    for input in &kinked {
        tracing::warn!(range = %input.range, "Dropping self-intersecting sector");
    }

    let (mut polygons, ranges): (Vec<Polygon<f64>>, Vec<AltitudeRange>) =
        valid.into_iter().map(|i| (i.polygon, i.range)).unzip();

    let mut memo = IntersectionMemo::new();
    let spliced = splice_intersections(&mut polygons, &mut memo, params.precision);

    let mut fragments: Vec<Fragment> = Vec::new();
    let mut failed = 0;

    for (polygon, range) in polygons.into_iter().zip(ranges) {
        match fold(&fragments, polygon, range, params) {
            Ok(next) => fragments = next,
            Err(e) => {
                failed += 1;
                tracing::warn!(range = %range, error = %e, "Sector fold failed, keeping previous fragments");
            }
        }
    }

    tracing::debug!(
        inputs = total,
        kinked = kinked.len(),
        spliced,
        pairs = memo.len(),
        fragments = fragments.len(),
        failed,
        "Split sectors"
    );

    SplitOutput {
        fragments,
        kinked: kinked.len(),
        failed,
    }
}

/// Fold one polygon into the existing fragments.
fn fold(
    existing: &[Fragment],
    polygon: Polygon<f64>,
    range: AltitudeRange,
    params: SplitParams,
) -> Result<Vec<Fragment>, GeometryError> {
    let mut next: Vec<Fragment> = Vec::with_capacity(existing.len() + 2);
    let mut remaining = MultiPolygon::new(vec![polygon]);

    let push = |out: &mut Vec<Fragment>, multi: MultiPolygon<f64>, ranges: &[AltitudeRange]| {
        for polygon in clean_multi_polygon(multi, params.precision, params.min_fragment_area) {
            out.push(Fragment {
                polygon,
                ranges: ranges.to_vec(),
            });
        }
    };

    for fragment in existing {
        if remaining.0.is_empty() {
            next.push(fragment.clone());
            continue;
        }

        let current = MultiPolygon::new(vec![fragment.polygon.clone()]);
        let overlap = ops::intersection(&current, &remaining)?;
        if overlap.unsigned_area() <= params.min_fragment_area {
            next.push(fragment.clone());
            continue;
        }

        let fragment_only = ops::difference(&current, &remaining)?;
        remaining = ops::difference(&remaining, &current)?;

        let merged = merge_ranges(fragment.ranges.iter().copied().chain([range]));
        push(&mut next, fragment_only, &fragment.ranges);
        push(&mut next, overlap, &merged);
    }

    push(&mut next, remaining, &[range]);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DEFAULT_PRECISION;
    use geo::polygon;

    fn params() -> SplitParams {
        SplitParams {
            precision: DEFAULT_PRECISION,
            min_fragment_area: 1e-10,
        }
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)]
    }

    fn input(polygon: Polygon<f64>, min: u32, max: u32) -> SplitInput {
        SplitInput {
            polygon,
            range: AltitudeRange::new(min, max),
        }
    }

    fn total_area(fragments: &[Fragment]) -> f64 {
        fragments.iter().map(|f| f.polygon.unsigned_area()).sum()
    }

    fn assert_partition(fragments: &[Fragment]) {
        for (i, a) in fragments.iter().enumerate() {
            for b in &fragments[i + 1..] {
                let overlap = ops::intersection(
                    &MultiPolygon::new(vec![a.polygon.clone()]),
                    &MultiPolygon::new(vec![b.polygon.clone()]),
                )
                .unwrap();
                assert!(overlap.unsigned_area() < 1e-9, "fragments overlap");
            }
        }
    }

    #[test]
    fn test_partial_overlap_yields_three_fragments() {
        let out = split_sectors(
            vec![
                input(rect(0.0, 0.0, 2.0, 2.0), 100, 200),
                input(rect(1.0, 0.0, 3.0, 2.0), 150, 250),
            ],
            params(),
        );

        assert_eq!(out.fragments.len(), 3);
        assert_partition(&out.fragments);
        assert!((total_area(&out.fragments) - 6.0).abs() < 1e-9);

        let tags: Vec<_> = out.fragments.iter().map(|f| f.ranges.clone()).collect();
        assert!(tags.contains(&vec![AltitudeRange::new(100, 200)]));
        assert!(tags.contains(&vec![AltitudeRange::new(100, 250)]));
        assert!(tags.contains(&vec![AltitudeRange::new(150, 250)]));
    }

    #[test]
    fn test_disjoint_inputs_pass_through() {
        let out = split_sectors(
            vec![
                input(rect(0.0, 0.0, 1.0, 1.0), 0, 100),
                input(rect(5.0, 5.0, 6.0, 6.0), 0, 100),
            ],
            params(),
        );
        assert_eq!(out.fragments.len(), 2);
        assert!(out.fragments.iter().all(|f| f.ranges == vec![AltitudeRange::new(0, 100)]));
    }

    #[test]
    fn test_stacked_bands_keep_gap() {
        let out = split_sectors(
            vec![
                input(rect(0.0, 0.0, 1.0, 1.0), 0, 100),
                input(rect(0.0, 0.0, 1.0, 1.0), 300, 400),
            ],
            params(),
        );
        assert_eq!(out.fragments.len(), 1);
        assert_eq!(
            out.fragments[0].ranges,
            vec![AltitudeRange::new(0, 100), AltitudeRange::new(300, 400)]
        );
    }

    #[test]
    fn test_three_way_overlap_is_partition() {
        let out = split_sectors(
            vec![
                input(rect(0.0, 0.0, 2.0, 2.0), 0, 100),
                input(rect(1.0, 1.0, 3.0, 3.0), 100, 200),
                input(rect(0.5, 0.5, 2.5, 2.5), 300, 400),
            ],
            params(),
        );
        assert_partition(&out.fragments);

        // Union of the three rectangles: 4 + 4 - 1 plus the ring of the middle one outside both.
        let union = ops::union_all(&[rect(0.0, 0.0, 2.0, 2.0), rect(1.0, 1.0, 3.0, 3.0), rect(0.5, 0.5, 2.5, 2.5)])
            .unwrap()
            .unsigned_area();
        assert!((total_area(&out.fragments) - union).abs() < 1e-9);
    }

    #[test]
    fn test_kinked_input_dropped() {
        let bowtie = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 2.0), (x: 2.0, y: 0.0), (x: 0.0, y: 1.0)];
        let out = split_sectors(
            vec![input(bowtie, 0, 100), input(rect(5.0, 5.0, 6.0, 6.0), 0, 100)],
            params(),
        );
        assert_eq!(out.kinked, 1);
        assert_eq!(out.fragments.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(split_sectors(vec![], params()), SplitOutput::default());
    }
}
