//! Session defaults applied to new slides and new layers.

use mapslides_core::DrawingStyle;
use mapslides_geometry::Viewport;
use serde::{Deserialize, Serialize};

/// Starting camera for new slides and the style for new layers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionDefaults {
    pub viewport: Viewport,
    pub drawing: DrawingStyle,
}
