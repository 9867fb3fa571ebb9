//! Geometry primitives for sector polygons.
//!
//! Built on the `geo` crate. This module adds what the sector pipeline needs on
//! top of it:
//!
//! - [`primitives`]: ring cleanup, rounding, kink detection, polygon/linestring conversion
//! - [`intersect`]: pairwise boundary intersection splicing with a symmetric memo
//! - [`altitude`]: altitude bands and range merging
//! - [`ops`]: boolean operations guarded against backend panics
//! - [`geojson`]: GeoJSON geometry encoding

pub mod altitude;
mod error;
pub mod geojson;
pub mod intersect;
pub mod ops;
pub mod primitives;

pub use altitude::{envelope, merge_ranges, ranges_key, AltitudeRange};
pub use error::GeometryError;
pub use intersect::{splice_intersections, IntersectionMemo};
pub use primitives::{is_kinked, sector_polygon, DEFAULT_PRECISION};

pub use geo::{MultiPolygon, Polygon};
