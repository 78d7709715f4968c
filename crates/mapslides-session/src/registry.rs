//! The slide registry: N independent slides, exactly one of them active.
//!
//! The active slide's camera lives in `live_viewport` while the user pans
//! and zooms. It is written back into the slide record when the user switches
//! away, so only the registry ever needs to know which slide is live.

use mapslides_core::{Layer, LayerId, LayerKind, Replay};
use mapslides_geometry::{DistanceMeasure, Viewport};

use crate::defaults::SessionDefaults;
use crate::presentation::Presentation;
use crate::slide::Slide;

pub struct SlideRegistry {
    pub(crate) slides: Vec<Slide>,
    pub(crate) active: usize,
    /// Slide that was active before the last switch
    pub(crate) previous: Option<usize>,
    pub(crate) live_viewport: Viewport,
    /// Layer selected for detail display (transient)
    pub(crate) inspecting: Option<LayerId>,
    pub(crate) presentation: Presentation,
    pub(crate) defaults: SessionDefaults,
}

impl SlideRegistry {
    /// Create a registry holding one empty slide
    pub fn new(defaults: SessionDefaults) -> Self {
        let first = Slide::new(defaults.viewport);
        Self {
            live_viewport: first.viewport,
            slides: vec![first],
            active: 0,
            previous: None,
            inspecting: None,
            presentation: Presentation::default(),
            defaults,
        }
    }

    // --- Slide navigation ---

    /// Make `index` the active slide. An index past the end appends a new
    /// empty slide and activates it. Returns the index now active.
    pub fn switch_to(&mut self, index: usize) -> usize {
        let index = if index >= self.slides.len() {
            self.slides.push(Slide::new(self.defaults.viewport));
            self.slides.len() - 1
        } else {
            index
        };
        if index == self.active {
            return index;
        }

        self.slides[self.active].viewport = self.live_viewport;
        self.previous = Some(self.active);
        self.active = index;
        self.live_viewport = self.slides[index].viewport;
        self.reset_transient();

        tracing::debug!(from = ?self.previous, to = index, slides = self.slides.len(), "Switch slide");
        index
    }

    /// Insert a deep copy of slide `index` right after it. Returns the
    /// copy's index, or `None` if `index` is out of range.
    pub fn duplicate(&mut self, index: usize) -> Option<usize> {
        if index >= self.slides.len() {
            return None;
        }
        self.sync_live_viewport();
        let copy = self.slides[index].duplicate();
        let at = index + 1;
        self.slides.insert(at, copy);

        if self.active >= at {
            self.active += 1;
        }
        self.previous = self.previous.map(|p| if p >= at { p + 1 } else { p });
        tracing::debug!(source = index, copy = at, "Duplicate slide");
        Some(at)
    }

    /// Remove slide `index`. The last remaining slide can't be removed.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.slides.len() <= 1 || index >= self.slides.len() {
            tracing::debug!(index, slides = self.slides.len(), "Remove slide ignored");
            return false;
        }
        self.sync_live_viewport();
        self.slides.remove(index);
        self.previous = None;

        if index < self.active {
            self.active -= 1;
        } else if index == self.active {
            self.active = index.min(self.slides.len() - 1);
            self.live_viewport = self.slides[self.active].viewport;
            self.reset_transient();
        }
        tracing::debug!(index, active = self.active, "Remove slide");
        true
    }

    pub fn active(&self) -> &Slide {
        &self.slides[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Slide {
        &mut self.slides[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn previous_index(&self) -> Option<usize> {
        self.previous
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn defaults(&self) -> &SessionDefaults {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut SessionDefaults {
        &mut self.defaults
    }

    // --- Camera and thumbnails ---

    /// Current camera of the active slide
    pub fn viewport(&self) -> Viewport {
        self.live_viewport
    }

    /// Map move/zoom callback
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.live_viewport = viewport;
    }

    pub fn set_thumbnail(&mut self, index: usize, image: impl Into<String>) -> bool {
        match self.slides.get_mut(index) {
            Some(slide) => {
                slide.thumbnail = Some(image.into());
                true
            }
            None => false,
        }
    }

    // --- Layer operations on the active slide ---

    /// Draw a layer on the active slide and select it for inspection
    pub fn create_layer(&mut self, kind: LayerKind, measure: &impl DistanceMeasure) -> LayerId {
        let id = self.active_mut().layers.create_layer(kind, measure);
        self.inspecting = Some(id);
        id
    }

    pub fn delete_layer(&mut self, index: usize) -> Option<Layer> {
        self.active_mut().layers.delete_layer(index)
    }

    pub fn toggle_pin(&mut self, index: usize) -> Option<bool> {
        self.active_mut().layers.toggle_pin(index)
    }

    pub fn toggle_hide(&mut self, index: usize) -> Option<bool> {
        self.active_mut().layers.toggle_hide(index)
    }

    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> bool {
        self.active_mut().layers.reorder(old_index, new_index)
    }

    pub fn undo(&mut self) -> Option<Replay> {
        self.active_mut().layers.undo()
    }

    pub fn redo(&mut self) -> Option<Replay> {
        self.active_mut().layers.redo()
    }

    pub fn jump_to(&mut self, target: Option<usize>) -> usize {
        self.active_mut().layers.jump_to(target)
    }

    // --- Transient UI state ---

    pub fn inspect(&mut self, id: Option<LayerId>) {
        self.inspecting = id;
    }

    pub fn inspecting(&self) -> Option<LayerId> {
        self.inspecting
    }

    /// The inspected layer, if it is still on the active slide
    pub fn inspected_layer(&self) -> Option<&Layer> {
        self.inspecting.and_then(|id| self.active().layers.find(id))
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn start_presentation(&mut self) {
        self.inspecting = None;
        self.presentation.start();
    }

    pub fn stop_presentation(&mut self) {
        self.presentation.stop();
    }

    pub fn next_step(&mut self) -> Option<usize> {
        let layers = self.slides[self.active].layers.layers();
        self.presentation.advance(layers)
    }

    pub fn previous_step(&mut self) -> Option<usize> {
        let layers = self.slides[self.active].layers.layers();
        self.presentation.retreat(layers)
    }

    // --- Internal ---

    pub(crate) fn sync_live_viewport(&mut self) {
        self.slides[self.active].viewport = self.live_viewport;
    }

    pub(crate) fn reset_transient(&mut self) {
        self.inspecting = None;
        self.presentation.reset();
    }
}

impl Default for SlideRegistry {
    fn default() -> Self {
        Self::new(SessionDefaults::default())
    }
}
