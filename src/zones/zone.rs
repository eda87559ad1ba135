use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Semantic role of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    #[default]
    ProteinContainer,
    IngredientContainer,
    /// Any role the violation logic does not act on.
    #[serde(other)]
    Other,
}

impl ZoneKind {
    /// Containers are the zones a hand must not pick from without a tool.
    pub fn is_container(&self) -> bool {
        matches!(self, ZoneKind::ProteinContainer | ZoneKind::IngredientContainer)
    }
}

/// A rectangular region of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    /// Unique within a registry
    pub id: String,
    pub name: String,
    pub rect: Rect,
    pub kind: ZoneKind,
    pub active: bool,
}

impl Zone {
    pub fn new(id: &str, name: &str, rect: Rect, kind: ZoneKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rect,
            kind,
            active: true,
        }
    }

    #[inline]
    pub fn contains_point(&self, point: &Point) -> bool {
        self.rect.contains_point(point)
    }

    pub fn center(&self) -> Point {
        self.rect.center()
    }

    pub fn area(&self) -> f32 {
        self.rect.area()
    }
}
