use std::path::{Path, PathBuf};

use super::Animatable;
use super::animation::LayerState;
use crate::app::domain::geometry::Rect;
use crate::app::infrastructure::error::Result;

const VOLUME_KEY: &str = "volume";

/// Playback of one loaded sound.
pub trait AudioEngine {
    /// Start playing; false if playback could not start.
    fn play(&mut self) -> bool;
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
}

/// Opens audio files into engines.
pub trait AudioBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn AudioEngine>>;
}

/// A layer that plays a sound file. Its volume is an animatable property:
/// every frame of a fade is pushed to the engine.
pub struct AudioLayer {
    state: LayerState,
    source: PathBuf,
    engine: Box<dyn AudioEngine>,
    volume: f32,
}

impl AudioLayer {
    pub fn new(source: impl Into<PathBuf>, mut engine: Box<dyn AudioEngine>) -> Self {
        engine.set_volume(1.0);
        Self {
            state: LayerState::new(Rect::default()),
            source: source.into(),
            engine,
            volume: 1.0,
        }
    }

    pub fn open(path: &Path, backend: &dyn AudioBackend) -> Result<Self> {
        let engine = backend.open(path)?;
        log::debug!("Opened audio layer for {}", path.display());
        Ok(Self::new(path, engine))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn play(&mut self) -> bool {
        self.engine.play()
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    /// Model volume, the value a running fade is heading towards.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn presentation_volume(&self, now: f64) -> f32 {
        self.state
            .presentation_value(VOLUME_KEY, f64::from(self.volume), now) as f32
    }

    /// Set the volume, clamped to 0.0-1.0. Fades unless actions are disabled.
    /// NaN is ignored.
    pub fn set_volume(&mut self, volume: f32, now: f64) {
        if volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        let animating = self
            .state
            .animate(VOLUME_KEY, f64::from(self.volume), f64::from(volume), now);
        self.volume = volume;
        if !animating {
            self.engine.set_volume(volume);
        }
    }
}

impl Animatable for AudioLayer {
    fn layer(&self) -> &LayerState {
        &self.state
    }

    fn layer_mut(&mut self) -> &mut LayerState {
        &mut self.state
    }

    fn apply_presentation_value(&mut self, key: &str, value: f64) {
        if key == VOLUME_KEY {
            self.engine.set_volume(value as f32);
        }
    }
}
