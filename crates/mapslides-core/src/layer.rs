//! Layer types: one drawn annotation on the map.
//!
//! A layer is pure data. Its position in the collection is authoritative;
//! the cached `order` field is kept equal to that position by the controller.

use mapslides_geometry::{
    DistanceMeasure, LatLng, LatLngBounds, circle_area, rectangle_area,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Layer identifier - UUID, generated once at creation and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub Uuid);

impl LayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First five hex digits, as shown in layer and history lists
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..5].to_string()
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stroke and fill styling for shape layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathOptions {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl PathOptions {
    /// Stroke plus fill, used by rectangles and circles
    pub fn filled(color: impl Into<String>, fill_color: impl Into<String>, fill_opacity: f64) -> Self {
        Self {
            color: color.into(),
            fill_color: Some(fill_color.into()),
            fill_opacity: Some(fill_opacity),
            weight: None,
        }
    }

    /// Stroke only, used by arrows
    pub fn stroke(color: impl Into<String>, weight: f64) -> Self {
        Self {
            color: color.into(),
            fill_color: None,
            fill_opacity: None,
            weight: Some(weight),
        }
    }
}

/// The geometry and styling of each layer variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerKind {
    /// Rectangle from two drawn corners
    Rectangle {
        bounds: LatLngBounds,
        #[serde(rename = "pathOptions")]
        path_options: PathOptions,
    },
    /// Circle with a radius in meters
    Circle {
        center: LatLng,
        radius: f64,
        #[serde(rename = "pathOptions")]
        path_options: PathOptions,
    },
    /// Arrow pointing from start to end
    Arrow {
        start: LatLng,
        end: LatLng,
        #[serde(rename = "pathOptions")]
        path_options: PathOptions,
    },
    /// Text label anchored at a position
    #[serde(rename_all = "camelCase")]
    Text {
        text_content: String,
        text_position: LatLng,
        text_color: String,
        text_stroke_color: String,
        font_size: f64,
    },
}

impl LayerKind {
    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Rectangle { .. } => "rectangle",
            LayerKind::Circle { .. } => "circle",
            LayerKind::Arrow { .. } => "arrow",
            LayerKind::Text { .. } => "text",
        }
    }

    /// Area in square meters, for closed shapes
    pub fn area(&self, measure: &impl DistanceMeasure) -> Option<f64> {
        match self {
            LayerKind::Rectangle { bounds, .. } => Some(rectangle_area(bounds, measure)),
            LayerKind::Circle { radius, .. } => Some(circle_area(*radius)),
            LayerKind::Arrow { .. } | LayerKind::Text { .. } => None,
        }
    }

    /// Length in meters, for arrows
    pub fn distance(&self, measure: &impl DistanceMeasure) -> Option<f64> {
        match self {
            LayerKind::Arrow { start, end, .. } => Some(measure.distance(*start, *end)),
            _ => None,
        }
    }
}

/// A drawn annotation with stable identity and presentation flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub uuid: LayerId,
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_life_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_life_distance: Option<f64>,
    #[serde(flatten)]
    pub kind: LayerKind,
}

impl Layer {
    /// Build a fresh layer, caching its real-world metrics once.
    pub fn new(kind: LayerKind, measure: &impl DistanceMeasure) -> Self {
        Self {
            uuid: LayerId::new(),
            order: 0,
            is_pinned: false,
            is_hidden: false,
            real_life_area: kind.area(measure),
            real_life_distance: kind.distance(measure),
            kind,
        }
    }

    /// Row label used by layer lists, e.g. `rectangle_1a2b3`
    pub fn title(&self) -> String {
        format!("{}_{}", self.kind.name(), self.uuid.short())
    }
}
