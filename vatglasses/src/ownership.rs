//! Ownership resolution: which active Position owns each Airspace.
//!
//! For each airspace the owner list comes from the live override feed when it
//! has an entry, otherwise from the airspace's static `owner` field. The first
//! entry naming an active position wins; `group/position` entries refer to
//! another CountryGroup. An airspace without an active owner contributes
//! nothing this pass.

use std::collections::{BTreeMap, BTreeSet};

use crate::data::{AirspaceRef, DataStore, PositionKey};
use crate::roster::OwnershipOverrides;

/// Airspaces owned by each position, in config order.
pub type OwnershipMap = BTreeMap<PositionKey, Vec<AirspaceRef>>;

/// Resolve the owner of every airspace in `data`.
pub fn resolve_ownership(
    data: &DataStore,
    active: &BTreeSet<PositionKey>,
    overrides: &OwnershipOverrides,
) -> OwnershipMap {
    let mut owned = OwnershipMap::new();

    for group in data.groups() {
        for (index, airspace) in group.airspace.iter().enumerate() {
            let owners = overrides
                .owners(&group.id, index)
                .unwrap_or(airspace.owner.as_slice());

            let owner = owners
                .iter()
                .map(|reference| PositionKey::from_reference(&group.id, reference))
                .find(|key| active.contains(key));

            match owner {
                Some(key) => owned
                    .entry(key)
                    .or_default()
                    .push(AirspaceRef::new(&group.id, index)),
                None => tracing::trace!(
                    group = %group.id,
                    airspace = index,
                    id = airspace.id.as_deref().unwrap_or(""),
                    "Airspace has no active owner"
                ),
            }
        }
    }

    owned
}

/// Stable fingerprint of a set of airspaces: sorted `group:index` entries joined with `,`.
pub fn airspace_keys(airspaces: &[AirspaceRef]) -> String {
    let mut keys: Vec<String> = airspaces.iter().map(ToString::to_string).collect();
    keys.sort();
    keys.join(",")
}
