//! Presentation stepping over a slide's layers.
//!
//! Pinned layers stay on screen for the whole slide and hidden layers never
//! show, so stepping skips both. The cursor never runs past the last layer;
//! stepping back past the first lands on "nothing revealed yet".

use mapslides_core::Layer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presentation {
    presenting: bool,
    index: Option<usize>,
}

fn skipped(layer: &Layer) -> bool {
    layer.is_pinned || layer.is_hidden
}

impl Presentation {
    pub fn is_presenting(&self) -> bool {
        self.presenting
    }

    /// Index of the most recently revealed layer
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Enter presentation mode with nothing revealed
    pub fn start(&mut self) {
        self.presenting = true;
        self.index = None;
    }

    pub fn stop(&mut self) {
        self.presenting = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reveal the next steppable layer
    pub fn advance(&mut self, layers: &[Layer]) -> Option<usize> {
        let len = layers.len();
        if len == 0 {
            self.index = None;
            return None;
        }
        let mut next = self.index.map_or(0, |i| i.min(len - 1) + 1);
        while next + 1 < len && skipped(&layers[next]) {
            next += 1;
        }
        self.index = Some(next.min(len - 1));
        self.index
    }

    /// Step back to the previous steppable layer
    pub fn retreat(&mut self, layers: &[Layer]) -> Option<usize> {
        let len = layers.len();
        let Some(current) = self.index.filter(|_| len > 0) else {
            self.index = None;
            return None;
        };
        let Some(mut prev) = current.min(len - 1).checked_sub(1) else {
            self.index = None;
            return None;
        };
        while prev >= 1 && skipped(&layers[prev]) {
            prev -= 1;
        }
        self.index = Some(prev);
        self.index
    }
}
