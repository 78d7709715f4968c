//! Plain-data records for exporting and importing slides.
//!
//! A slide exports as its layer collection, its history and its camera. Import
//! is all-or-nothing: the payload is shape-checked, deserialized and validated
//! before anything in the registry changes, and every layer uuid is replaced
//! so an imported slide can never collide with one already in the deck.

use anyhow::{Context, Result, bail};
use mapslides_core::{HistoryStack, Layer, LayerController};
use mapslides_geometry::Viewport;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::defaults::SessionDefaults;
use crate::registry::SlideRegistry;
use crate::slide::Slide;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideRecord {
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub history: HistoryStack,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckRecord {
    pub slides: Vec<SlideRecord>,
    #[serde(default)]
    pub current_slide_index: usize,
}

impl From<&Slide> for SlideRecord {
    fn from(slide: &Slide) -> Self {
        Self {
            layers: slide.layers.layers().to_vec(),
            history: slide.layers.history().clone(),
            viewport: slide.viewport,
            thumbnail: slide.thumbnail.clone(),
        }
    }
}

impl TryFrom<SlideRecord> for Slide {
    type Error = anyhow::Error;

    fn try_from(record: SlideRecord) -> Result<Self> {
        Ok(Self {
            layers: LayerController::from_parts(record.layers, record.history)?,
            viewport: record.viewport,
            thumbnail: record.thumbnail,
        })
    }
}

/// Reject anything whose `layers` field is missing or not an array
fn check_slide_shape(value: &Value) -> Result<()> {
    match value.get("layers") {
        Some(layers) if layers.is_array() => Ok(()),
        Some(_) => bail!("slide `layers` is not an array"),
        None => bail!("slide has no `layers` field"),
    }
}

fn parse_slide(json: &str) -> Result<Slide> {
    let value: Value = serde_json::from_str(json).context("slide is not valid JSON")?;
    check_slide_shape(&value)?;
    let record: SlideRecord = serde_json::from_value(value).context("malformed slide record")?;
    let slide = Slide::try_from(record)?;
    Ok(slide.duplicate())
}

fn parse_deck(json: &str) -> Result<(Vec<Slide>, usize)> {
    let value: Value = serde_json::from_str(json).context("deck is not valid JSON")?;
    let Some(slides) = value.get("slides").and_then(Value::as_array) else {
        bail!("deck has no `slides` array");
    };
    for (index, slide) in slides.iter().enumerate() {
        check_slide_shape(slide).with_context(|| format!("slide {index}"))?;
    }
    let record: DeckRecord = serde_json::from_value(value).context("malformed deck record")?;
    let (slides, active) = validate_deck(record)?;
    Ok((slides.iter().map(Slide::duplicate).collect(), active))
}

fn validate_deck(record: DeckRecord) -> Result<(Vec<Slide>, usize)> {
    if record.slides.is_empty() {
        bail!("deck has no slides");
    }
    if record.current_slide_index >= record.slides.len() {
        bail!(
            "current slide {} out of range for {} slides",
            record.current_slide_index,
            record.slides.len()
        );
    }
    let active = record.current_slide_index;
    let slides = record
        .slides
        .into_iter()
        .enumerate()
        .map(|(index, slide)| Slide::try_from(slide).with_context(|| format!("slide {index}")))
        .collect::<Result<Vec<_>>>()?;
    Ok((slides, active))
}

impl SlideRegistry {
    /// Snapshot of one slide; the active slide carries the live camera
    pub fn slide_record(&self, index: usize) -> Option<SlideRecord> {
        let mut record = SlideRecord::from(self.slides.get(index)?);
        if index == self.active {
            record.viewport = self.live_viewport;
        }
        Some(record)
    }

    pub fn deck_record(&self) -> DeckRecord {
        DeckRecord {
            slides: (0..self.slides.len()).filter_map(|i| self.slide_record(i)).collect(),
            current_slide_index: self.active,
        }
    }

    /// Rebuild a registry from a stored deck, keeping layer uuids as stored
    pub fn from_deck_record(record: DeckRecord, defaults: SessionDefaults) -> Result<Self> {
        let (slides, active) = validate_deck(record)?;
        let mut registry = Self::new(defaults);
        registry.live_viewport = slides[active].viewport;
        registry.slides = slides;
        registry.active = active;
        Ok(registry)
    }

    pub fn export_slide(&self, index: usize) -> Result<String> {
        let record = self
            .slide_record(index)
            .with_context(|| format!("no slide at index {index}"))?;
        Ok(serde_json::to_string_pretty(&record)?)
    }

    pub fn export_deck(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.deck_record())?)
    }

    /// Append an exported slide with fresh uuids. Returns its index.
    pub fn import_slide(&mut self, json: &str) -> Result<usize> {
        let slide = parse_slide(json).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected slide import");
        })?;
        self.slides.push(slide);
        let index = self.slides.len() - 1;
        tracing::debug!(index, "Imported slide");
        Ok(index)
    }

    /// Replace the whole deck with an exported one
    pub fn import_deck(&mut self, json: &str) -> Result<()> {
        let (slides, active) = parse_deck(json).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected deck import");
        })?;
        tracing::debug!(slides = slides.len(), active, "Imported deck");
        self.live_viewport = slides[active].viewport;
        self.slides = slides;
        self.active = active;
        self.previous = None;
        self.reset_transient();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mapslides_core::{Action, LayerKind, PathOptions};
    use mapslides_geometry::LatLng;
    use serde_json::json;

    use super::*;

    fn measure(a: LatLng, b: LatLng) -> f64 {
        ((a.lat - b.lat).powi(2) + (a.lng - b.lng).powi(2)).sqrt()
    }

    fn circle(radius: f64) -> LayerKind {
        LayerKind::Circle {
            center: LatLng::new(21.03, 105.8),
            radius,
            path_options: PathOptions::filled("#ff0000", "#ff0000", 0.5),
        }
    }

    fn drawn() -> SlideRegistry {
        let mut registry = SlideRegistry::default();
        registry.create_layer(circle(10.0), &measure);
        registry.create_layer(circle(20.0), &measure);
        registry.toggle_pin(0);
        registry.undo();
        registry
    }

    #[test]
    fn slide_record_shape() {
        let registry = drawn();
        let value: Value = serde_json::from_str(&registry.export_slide(0).unwrap()).unwrap();
        assert_eq!(value["layers"].as_array().unwrap().len(), 2);
        assert_eq!(value["layers"][0]["type"], "circle");
        assert_eq!(value["layers"][0]["isPinned"], false);
        assert_eq!(value["history"]["currentIndex"], 1);
        assert_eq!(value["history"]["actions"][2]["type"], "PIN_LAYER");
        assert!(value.get("thumbnail").is_none());
    }

    #[test]
    fn export_uses_live_viewport() {
        let mut registry = SlideRegistry::default();
        let camera = Viewport::new(LatLng::new(48.85, 2.35), 11.0);
        registry.set_viewport(camera);
        assert_eq!(registry.slide_record(0).unwrap().viewport, camera);
        assert_eq!(registry.active().viewport, Viewport::default());
    }

    #[test]
    fn slide_round_trips_through_json() {
        let registry = drawn();
        let json = registry.export_slide(0).unwrap();
        let record: SlideRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, registry.slide_record(0).unwrap());
    }

    #[test]
    fn import_slide_regenerates_uuids_and_keeps_history_replayable() {
        let mut registry = drawn();
        let json = registry.export_slide(0).unwrap();
        let index = registry.import_slide(&json).unwrap();
        assert_eq!(index, 1);

        let original = registry.get(0).unwrap().layers.layers().to_vec();
        let imported = registry.get(1).unwrap().layers.layers().to_vec();
        assert_eq!(imported.len(), original.len());
        for (a, b) in original.iter().zip(&imported) {
            assert_ne!(a.uuid, b.uuid);
            assert_eq!(a.kind, b.kind);
        }

        registry.switch_to(1);
        let replay = registry.redo().unwrap();
        assert!(replay.outcome.is_applied());
        assert!(registry.active().layers.layers()[0].is_pinned);
        assert!(matches!(replay.action, Action::PinLayer { .. }));
    }

    #[test]
    fn import_rejects_non_array_layers() {
        let mut registry = drawn();
        let before = registry.deck_record();
        for payload in [
            json!({ "layers": {} }),
            json!({ "layers": "nope" }),
            json!({ "history": { "actions": [], "currentIndex": -1 } }),
        ] {
            assert!(registry.import_slide(&payload.to_string()).is_err());
        }
        assert!(registry.import_slide("not json").is_err());
        assert_eq!(registry.deck_record(), before);
    }

    #[test]
    fn import_rejects_bad_cursor_and_duplicate_uuids() {
        let mut registry = drawn();
        let before = registry.deck_record();

        let mut value: Value = serde_json::from_str(&registry.export_slide(0).unwrap()).unwrap();
        value["history"]["currentIndex"] = json!(7);
        assert!(registry.import_slide(&value.to_string()).is_err());

        let mut value: Value = serde_json::from_str(&registry.export_slide(0).unwrap()).unwrap();
        let first = value["layers"][0].clone();
        value["layers"][1] = first;
        assert!(registry.import_slide(&value.to_string()).is_err());

        assert_eq!(registry.deck_record(), before);
    }

    #[test]
    fn minimal_slide_imports_with_defaults() {
        let mut registry = SlideRegistry::default();
        let index = registry.import_slide(r#"{ "layers": [] }"#).unwrap();
        let slide = registry.get(index).unwrap();
        assert!(slide.layers.is_empty());
        assert!(slide.layers.history().is_empty());
        assert_eq!(slide.viewport, Viewport::default());
    }

    #[test]
    fn import_deck_replaces_everything() {
        let mut source = drawn();
        source.switch_to(1);
        let json = source.export_deck().unwrap();

        let mut target = SlideRegistry::default();
        target.import_deck(&json).unwrap();
        assert_eq!(target.len(), 2);
        assert_eq!(target.active_index(), 1);
        assert_eq!(target.get(0).unwrap().layers.len(), 2);
        assert_ne!(
            target.get(0).unwrap().layers.layers()[0].uuid,
            source.get(0).unwrap().layers.layers()[0].uuid
        );
    }

    #[test]
    fn import_deck_is_all_or_nothing() {
        let source = drawn();
        let mut value: Value = serde_json::from_str(&source.export_deck().unwrap()).unwrap();
        value["slides"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "layers": 3 }));

        let mut target = drawn();
        let before = target.deck_record();
        assert!(target.import_deck(&value.to_string()).is_err());
        assert!(target.import_deck(r#"{ "slides": [], "currentSlideIndex": 0 }"#).is_err());
        assert!(target.import_deck(r#"{ "slides": [{ "layers": [] }], "currentSlideIndex": 1 }"#).is_err());
        assert_eq!(target.deck_record(), before);
    }

    #[test]
    fn stored_deck_keeps_uuids() {
        let source = drawn();
        let restored = SlideRegistry::from_deck_record(source.deck_record(), SessionDefaults::default()).unwrap();
        assert_eq!(restored.deck_record(), source.deck_record());
    }
}
