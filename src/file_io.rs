use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mapslides_session::{DeckRecord, SessionDefaults, SlideRegistry};

/// Load a deck file, or start a fresh deck if the file does not exist yet
pub fn load_deck(path: &Path, defaults: SessionDefaults) -> Result<SlideRegistry> {
    if !path.exists() {
        tracing::debug!(?path, "No deck file, starting fresh");
        return Ok(SlideRegistry::new(defaults));
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read deck {:?}", path))?;
    let record: DeckRecord = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse deck {:?}", path))?;
    SlideRegistry::from_deck_record(record, defaults)
        .with_context(|| format!("Invalid deck {:?}", path))
}

/// Save the deck as pretty JSON, creating parent directories as needed
pub fn save_deck(registry: &SlideRegistry, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    let content = registry.export_deck()?;
    fs::write(path, content).with_context(|| format!("Failed to save to {:?}", path))?;
    Ok(())
}

/// Read a file to import
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read from {:?}", path))
}

/// Write exported JSON to a file
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to save to {:?}", path))
}

#[cfg(test)]
mod tests {
    use mapslides_core::{LayerKind, PathOptions};
    use mapslides_geometry::{Haversine, LatLng};

    use super::*;

    #[test]
    fn missing_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let registry = load_deck(&dir.path().join("deck.json"), SessionDefaults::default()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.active().layers.is_empty());
    }

    #[test]
    fn save_then_load_keeps_layers_and_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deck.json");

        let mut registry = SlideRegistry::default();
        let id = registry.create_layer(
            LayerKind::Arrow {
                start: LatLng::new(21.03, 105.80),
                end: LatLng::new(21.04, 105.81),
                path_options: PathOptions::stroke("#000000", 3.0),
            },
            &Haversine,
        );
        registry.switch_to(1);
        save_deck(&registry, &path).unwrap();

        let mut loaded = load_deck(&path, SessionDefaults::default()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.active_index(), 1);
        assert_eq!(loaded.get(0).unwrap().layers.layers()[0].uuid, id);

        loaded.switch_to(0);
        assert!(loaded.undo().is_some());
        assert!(loaded.active().layers.is_empty());
    }

    #[test]
    fn corrupt_deck_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_deck(&path, SessionDefaults::default()).is_err());
    }
}
