//! Bounding boxes over feature collections.

use geo::{BoundingRect, Rect};
use serde::{Deserialize, Serialize};

use super::feature::Feature;

/// An axis-aligned lon/lat box, `min <= max` componentwise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Lower-left corner (lon, lat)
    pub min: [f64; 2],
    /// Upper-right corner (lon, lat)
    pub max: [f64; 2],
}

impl BoundingBox {
    /// Box at the origin, returned when there is nothing to bound
    pub const PLACEHOLDER: BoundingBox = BoundingBox {
        min: [0.0, 0.0],
        max: [0.0, 0.0],
    };

    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    pub fn from_rect(rect: Rect<f64>) -> Self {
        Self {
            min: [rect.min().x, rect.min().y],
            max: [rect.max().x, rect.max().y],
        }
    }

    /// Smallest box enclosing both `self` and `other`
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    /// Whether `other` lies entirely within this box (edges included)
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        self.min[0] <= other.min[0]
            && self.min[1] <= other.min[1]
            && self.max[0] >= other.max[0]
            && self.max[1] >= other.max[1]
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        ]
    }
}

/// Bounds of a single feature; `None` for features without (or with empty) geometry
pub fn feature_bounds(feature: &Feature) -> Option<BoundingBox> {
    feature
        .geometry
        .as_ref()?
        .bounding_rect()
        .map(BoundingBox::from_rect)
}

/// One box spanning every feature.
///
/// The running box starts from the first bounded feature and is widened by
/// each subsequent one. Returns [`BoundingBox::PLACEHOLDER`] when no feature
/// has bounds.
pub fn outer_bounds(features: &[Feature]) -> BoundingBox {
    features
        .iter()
        .filter_map(feature_bounds)
        .reduce(|outer, bounds| outer.union(&bounds))
        .unwrap_or(BoundingBox::PLACEHOLDER)
}
