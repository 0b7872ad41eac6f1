//! 3D coordinates and the region margin test.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::errors::CoreError;

/// A point in the catalog's 3D coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Coordinate {
    /// Create a coordinate from its components.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Parse the `coords: {x, y, z}` sub-object of a remote record.
    pub fn from_record(record: &Document) -> Result<Self, CoreError> {
        let coords = record
            .object_field("coords")
            .ok_or(CoreError::missing("coords"))?;
        let x = coords
            .f64_field("x")
            .ok_or(CoreError::invalid("coords.x", "number"))?;
        let y = coords
            .f64_field("y")
            .ok_or(CoreError::invalid("coords.y", "number"))?;
        let z = coords
            .f64_field("z")
            .ok_or(CoreError::invalid("coords.z", "number"))?;
        Ok(Self { x, y, z })
    }

    /// Margin test driving the crawl's outward propagation.
    ///
    /// True when the point falls outside the open cube of half-width `limit`
    /// around `center` on every axis. A system passing this test sits near or
    /// past the current region's edge, so it is worth centering a new scan on;
    /// one still inside the cube would only re-discover the region just
    /// scanned.
    #[must_use]
    pub fn outside_margin(&self, center: &Coordinate, limit: f64) -> bool {
        let inside_x = (center.x - limit) < self.x && self.x < (center.x + limit);
        let inside_y = (center.y - limit) < self.y && self.y < (center.y + limit);
        let inside_z = (center.z - limit) < self.z && self.z < (center.z + limit);
        !inside_x && !inside_y && !inside_z
    }

    /// Bit-exact identity for deduplicating scan centers.
    ///
    /// Region centers recur exactly when systems share a coordinate, so the
    /// visited-region set compares raw bit patterns rather than doing any
    /// fuzzy float matching.
    #[must_use]
    pub fn region_key(&self) -> (u64, u64, u64) {
        (self.x.to_bits(), self.y.to_bits(), self.z.to_bits())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_coords_sub_object() {
        let doc = Document::from_value(json!({"coords": {"x": 1.5, "y": -2.0, "z": 0.0}})).unwrap();
        let coord = Coordinate::from_record(&doc).unwrap();
        assert_eq!(coord, Coordinate::new(1.5, -2.0, 0.0));
    }

    #[test]
    fn missing_coords_is_an_error() {
        let doc = Document::from_value(json!({"name": "Sol"})).unwrap();
        assert!(Coordinate::from_record(&doc).is_err());
    }

    #[test]
    fn point_at_center_is_inside() {
        let origin = Coordinate::new(0.0, 0.0, 0.0);
        assert!(!origin.outside_margin(&origin, 90.0));
    }

    #[test]
    fn point_past_every_axis_is_outside() {
        let origin = Coordinate::new(0.0, 0.0, 0.0);
        let far = Coordinate::new(95.0, -95.0, 120.0);
        assert!(far.outside_margin(&origin, 90.0));
    }

    #[test]
    fn point_inside_one_axis_is_not_outside() {
        let origin = Coordinate::new(0.0, 0.0, 0.0);
        let edge = Coordinate::new(95.0, 0.0, 95.0);
        assert!(!edge.outside_margin(&origin, 90.0));
    }

    #[test]
    fn boundary_is_outside() {
        // The cube is open: a point exactly on the limit counts as outside.
        let origin = Coordinate::new(0.0, 0.0, 0.0);
        let rim = Coordinate::new(90.0, 90.0, 90.0);
        assert!(rim.outside_margin(&origin, 90.0));
    }

    #[test]
    fn region_key_is_bit_exact() {
        let a = Coordinate::new(0.1 + 0.2, 0.0, 0.0);
        let b = Coordinate::new(0.3, 0.0, 0.0);
        // 0.1 + 0.2 != 0.3 in f64; the keys must differ too.
        assert_ne!(a.region_key(), b.region_key());
        assert_eq!(a.region_key(), a.region_key());
    }
}
