//! A slide: one page of the presentation.

use mapslides_core::LayerController;
use mapslides_geometry::Viewport;

/// Layers, their undo history, the saved camera and an optional thumbnail.
/// Each slide owns its history outright; nothing is shared between slides.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub layers: LayerController,
    pub viewport: Viewport,
    /// Opaque image data produced by the thumbnail capture subsystem
    pub thumbnail: Option<String>,
}

impl Slide {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            layers: LayerController::new(),
            viewport,
            thumbnail: None,
        }
    }

    /// Deep copy with fresh layer uuids and an independent history
    pub fn duplicate(&self) -> Self {
        Self {
            layers: self.layers.with_fresh_ids(),
            viewport: self.viewport,
            thumbnail: self.thumbnail.clone(),
        }
    }
}
