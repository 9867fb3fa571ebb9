//! Position matching: live controller to abstract Position.
//!
//! Groups are scanned with a cheap heuristic: groups whose identifier contains
//! the first two characters of the callsign go first, the rest follow in
//! config order. Within a group, Positions are tried in declaration order and
//! the first one passing every rule wins.

use std::fmt;
use std::str::FromStr;

use crate::data::{DataStore, Position, PositionKey};
use crate::roster::Controller;

/// A position excluded from matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoredPosition {
    /// Never match this position id.
    Id(String),
    /// Never match this position id for callsigns starting with `prefix`.
    WithPrefix { id: String, prefix: String },
}

impl IgnoredPosition {
    fn applies(&self, position: &Position, callsign: &str) -> bool {
        match self {
            IgnoredPosition::Id(id) => *id == position.id,
            IgnoredPosition::WithPrefix { id, prefix } => {
                *id == position.id && callsign.starts_with(prefix.as_str())
            }
        }
    }
}

impl FromStr for IgnoredPosition {
    type Err = String;

    /// Parse `ID` or `ID:PREFIX`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(':') {
            Some((id, prefix)) if !id.trim().is_empty() && !prefix.trim().is_empty() => {
                Ok(IgnoredPosition::WithPrefix {
                    id: id.trim().to_string(),
                    prefix: prefix.trim().to_string(),
                })
            }
            None if !s.is_empty() => Ok(IgnoredPosition::Id(s.to_string())),
            _ => Err(format!("expected ID or ID:PREFIX, got '{}'", s)),
        }
    }
}

impl fmt::Display for IgnoredPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoredPosition::Id(id) => f.write_str(id),
            IgnoredPosition::WithPrefix { id, prefix } => write!(f, "{}:{}", id, prefix),
        }
    }
}

/// Matches controllers against the configured Positions.
#[derive(Debug, Clone, Default)]
pub struct PositionMatcher {
    ignored: Vec<IgnoredPosition>,
}

impl PositionMatcher {
    pub fn new(ignored: Vec<IgnoredPosition>) -> Self {
        Self { ignored }
    }

    /// Find the Position for `controller`, or `None` for the fallback bucket.
    pub fn match_controller(&self, data: &DataStore, controller: &Controller) -> Option<PositionKey> {
        let hint: String = controller
            .callsign
            .chars()
            .take(2)
            .collect::<String>()
            .to_lowercase();

        let mut groups: Vec<_> = data.groups().iter().collect();
        // Stable sort keeps config order within each tier.
        groups.sort_by_key(|group| !(hint.len() == 2 && group.id.to_lowercase().contains(&hint)));

        for group in groups {
            if let Some(position) = group
                .positions
                .iter()
                .find(|position| self.accepts(position, controller))
            {
                tracing::trace!(
                    callsign = %controller.callsign,
                    group = %group.id,
                    position = %position.id,
                    "Matched controller"
                );
                return Some(PositionKey::new(&group.id, &position.id));
            }
        }

        tracing::trace!(callsign = %controller.callsign, "No position matched");
        None
    }

    fn accepts(&self, position: &Position, controller: &Controller) -> bool {
        let callsign = controller.callsign.as_str();

        if self.ignored.iter().any(|rule| rule.applies(position, callsign)) {
            return false;
        }
        if let Some(required) = &position.frequency {
            if !same_frequency(required, &controller.frequency) {
                return false;
            }
        }
        if !callsign.ends_with(position.kind.as_str()) {
            return false;
        }
        position.pre.iter().any(|prefix| callsign.starts_with(prefix.as_str()))
    }
}

/// Compare frequencies numerically when both parse, textually otherwise.
fn same_frequency(a: &str, b: &str) -> bool {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => (x - y).abs() < 0.0005,
        _ => a.trim() == b.trim(),
    }
}
