//! Sector combining: merge fragments sharing an altitude-range list.
//!
//! Fragments are grouped by the exact range-list key in first-seen order. A
//! group of one passes through; larger groups are unioned. A failed union
//! drops that group from the combined output (the split fragments themselves
//! are unaffected).

use std::collections::HashMap;

use geo::MultiPolygon;

use crate::geometry::{envelope, ops, ranges_key, AltitudeRange};
use crate::splitter::Fragment;

/// Union of every fragment sharing one range list.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedSector {
    pub geometry: MultiPolygon<f64>,
    pub ranges: Vec<AltitudeRange>,
    /// Lowest floor in `ranges`.
    pub min: u32,
    /// Highest ceiling in `ranges`.
    pub max: u32,
}

/// Group `fragments` by range list and union each group.
pub fn combine_fragments(fragments: &[Fragment]) -> Vec<CombinedSector> {
    let mut order: Vec<(String, Vec<&Fragment>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for fragment in fragments {
        let key = ranges_key(&fragment.ranges);
        match index.get(&key) {
            Some(&i) => order[i].1.push(fragment),
            None => {
                index.insert(key.clone(), order.len());
                order.push((key, vec![fragment]));
            }
        }
    }

    let mut combined = Vec::with_capacity(order.len());
    for (key, group) in order {
        let ranges = group[0].ranges.clone();
        let Some((min, max)) = envelope(&ranges) else {
            continue;
        };

        let geometry = if group.len() == 1 {
            MultiPolygon::new(vec![group[0].polygon.clone()])
        } else {
            let polygons: Vec<_> = group.iter().map(|f| f.polygon.clone()).collect();
            match ops::union_all(&polygons) {
                Ok(geometry) => geometry,
                Err(e) => {
                    tracing::warn!(ranges = %key, parts = group.len(), error = %e, "Dropping combined sector");
                    continue;
                }
            }
        };

        combined.push(CombinedSector {
            geometry,
            ranges,
            min,
            max,
        });
    }

    combined
}
