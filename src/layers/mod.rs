//! Layers with implicitly animated properties.
//!
//! Each layer owns a [`LayerState`] and implements [`Animatable`]. Setting an
//! animatable property records a [`PropertyAnimation`]; the host calls
//! [`Animatable::tick`] with the current media time to move it along.

pub mod animation;
pub mod audio;
pub mod clock;

pub use animation::{Easing, LayerState, PropertyAnimation};
pub use audio::{AudioBackend, AudioEngine, AudioLayer};
pub use clock::{ClockFace, PathElement, PathRenderer};

pub trait Animatable {
    fn layer(&self) -> &LayerState;

    fn layer_mut(&mut self) -> &mut LayerState;

    /// Whether a change of `key` invalidates the layer's drawing.
    fn needs_display_for_key(&self, _key: &str) -> bool {
        false
    }

    /// Receive the animated value of `key` for the current frame.
    fn apply_presentation_value(&mut self, key: &str, value: f64);

    /// Redraw the layer's content.
    fn display(&mut self) {}

    /// Advance animations to `now` and redraw if anything asked for it.
    fn tick(&mut self, now: f64) {
        for (key, value) in self.layer_mut().advance(now) {
            self.apply_presentation_value(key, value);
            if self.needs_display_for_key(key) {
                self.layer_mut().set_needs_display();
            }
        }
        if self.layer().needs_display() {
            self.display();
            self.layer_mut().clear_needs_display();
        }
    }
}
