//! Drawing gesture state: press, drag, release.
//!
//! A gesture only produces a layer on release, and only when it captured
//! enough points for its tool. Anything else is dropped without touching the
//! collection or its history.

use mapslides_geometry::{DistanceMeasure, LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

use crate::layer::{LayerKind, PathOptions};

/// Active drawing tool. `Hand` pans the map and draws nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Hand,
    Rectangle,
    Circle,
    Arrow,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Hand => "Hand",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Arrow => "Arrow",
        }
    }
}

/// Colors and weights applied to newly drawn layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawingStyle {
    pub stroke_color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub arrow_weight: f64,
    pub text_color: String,
    pub text_stroke_color: String,
    pub font_size: f64,
}

impl Default for DrawingStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#000000".to_string(),
            fill_color: "#000000".to_string(),
            fill_opacity: 0.5,
            arrow_weight: 3.0,
            text_color: "#000000".to_string(),
            text_stroke_color: "#ffffff".to_string(),
            font_size: 16.0,
        }
    }
}

impl DrawingStyle {
    fn filled(&self) -> PathOptions {
        PathOptions::filled(&self.stroke_color, &self.fill_color, self.fill_opacity)
    }

    /// A text label in this style
    pub fn text(&self, content: impl Into<String>, position: LatLng) -> LayerKind {
        LayerKind::Text {
            text_content: content.into(),
            text_position: position,
            text_color: self.text_color.clone(),
            text_stroke_color: self.text_stroke_color.clone(),
            font_size: self.font_size,
        }
    }
}

/// In-progress shape drawing
#[derive(Debug, Clone, Default)]
pub struct Gesture {
    tool: Tool,
    anchor: Option<LatLng>,
    current: Option<LatLng>,
    radius: f64,
}

impl Gesture {
    pub fn new(tool: Tool) -> Self {
        Self { tool, ..Self::default() }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools, abandoning any gesture in progress
    pub fn set_tool(&mut self, tool: Tool) {
        *self = Self::new(tool);
    }

    pub fn is_drawing(&self) -> bool {
        self.tool != Tool::Hand
    }

    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    /// Pointer down: capture the start point
    pub fn press(&mut self, pos: LatLng) {
        if !self.is_drawing() {
            return;
        }
        self.anchor = Some(pos);
        self.current = None;
        self.radius = 0.0;
    }

    /// Pointer move: update the preview
    pub fn drag(&mut self, pos: LatLng, measure: &impl DistanceMeasure) {
        let Some(anchor) = self.anchor else {
            return;
        };
        if self.tool == Tool::Circle {
            self.radius = measure.distance(anchor, pos);
        }
        self.current = Some(pos);
    }

    /// Pointer up: finish the gesture, returning the shape to commit if the
    /// gesture captured enough points. Always resets.
    pub fn release(&mut self, pos: LatLng, style: &DrawingStyle) -> Option<LayerKind> {
        let tool = self.tool;
        let finished = std::mem::replace(self, Self::new(tool));
        let anchor = finished.anchor?;

        match finished.tool {
            Tool::Hand => None,
            Tool::Rectangle => finished.current.map(|_| LayerKind::Rectangle {
                bounds: LatLngBounds::new(anchor, pos),
                path_options: style.filled(),
            }),
            Tool::Circle => (finished.radius > 0.0).then(|| LayerKind::Circle {
                center: anchor,
                radius: finished.radius,
                path_options: style.filled(),
            }),
            Tool::Arrow => finished.current.map(|end| LayerKind::Arrow {
                start: anchor,
                end,
                path_options: PathOptions::stroke(&style.stroke_color, style.arrow_weight),
            }),
        }
    }

    /// Abandon the gesture in progress
    pub fn cancel(&mut self) {
        *self = Self::new(self.tool);
    }

    /// Shape to draw as a live preview, if any
    pub fn preview(&self, style: &DrawingStyle) -> Option<LayerKind> {
        let anchor = self.anchor?;
        match self.tool {
            Tool::Hand => None,
            Tool::Rectangle => self.current.map(|corner| LayerKind::Rectangle {
                bounds: LatLngBounds::new(anchor, corner),
                path_options: style.filled(),
            }),
            Tool::Circle => (self.radius > 0.0).then(|| LayerKind::Circle {
                center: anchor,
                radius: self.radius,
                path_options: style.filled(),
            }),
            Tool::Arrow => self.current.map(|end| LayerKind::Arrow {
                start: anchor,
                end,
                path_options: PathOptions::stroke(&style.stroke_color, style.arrow_weight),
            }),
        }
    }
}
