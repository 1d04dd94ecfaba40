use crate::app::domain::geometry::Rect;

/// Default length of an implicit animation, in seconds.
pub const DEFAULT_ANIMATION_DURATION: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` in 0..=1 onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// A numeric property moving from one value to another over time.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAnimation {
    pub key: &'static str,
    pub from: f64,
    pub to: f64,
    pub begin: f64,
    pub duration: f64,
    pub easing: Easing,
}

impl PropertyAnimation {
    pub fn new(key: &'static str, from: f64, to: f64, begin: f64, duration: f64) -> Self {
        Self {
            key,
            from,
            to,
            begin,
            duration,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Value at time `now`. Before `begin` this is `from`; after the end, `to`.
    pub fn sample(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = self.easing.apply((now - self.begin) / self.duration);
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now >= self.begin + self.duration
    }
}

/// State every layer carries: geometry, display invalidation and the
/// animations currently running on its properties.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerState {
    bounds: Rect,
    opacity: f64,
    needs_display: bool,
    actions_disabled: bool,
    animation_duration: f64,
    animations: Vec<PropertyAnimation>,
}

impl LayerState {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            opacity: 1.0,
            needs_display: true,
            actions_disabled: false,
            animation_duration: DEFAULT_ANIMATION_DURATION,
            animations: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.needs_display = true;
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        if !opacity.is_nan() {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    pub fn needs_display(&self) -> bool {
        self.needs_display
    }

    pub fn set_needs_display(&mut self) {
        self.needs_display = true;
    }

    pub fn clear_needs_display(&mut self) {
        self.needs_display = false;
    }

    /// When set, property changes apply immediately instead of animating.
    pub fn set_actions_disabled(&mut self, disabled: bool) {
        self.actions_disabled = disabled;
    }

    pub fn actions_disabled(&self) -> bool {
        self.actions_disabled
    }

    pub fn animation_duration(&self) -> f64 {
        self.animation_duration
    }

    pub fn set_animation_duration(&mut self, seconds: f64) {
        self.animation_duration = seconds.max(0.0);
    }

    /// Start an implicit animation of `key` towards `to`. Begins from the
    /// value currently on screen, so retargeting a running animation is
    /// smooth. Returns false when actions are disabled and nothing was added.
    pub fn animate(&mut self, key: &'static str, model_value: f64, to: f64, now: f64) -> bool {
        if self.actions_disabled || self.animation_duration <= 0.0 {
            self.remove_animation(key);
            return false;
        }
        let from = self.presentation_value(key, model_value, now);
        self.add_animation(PropertyAnimation::new(key, from, to, now, self.animation_duration));
        true
    }

    /// Add `animation`, replacing any running one for the same key.
    pub fn add_animation(&mut self, animation: PropertyAnimation) {
        self.remove_animation(animation.key);
        self.animations.push(animation);
    }

    pub fn remove_animation(&mut self, key: &str) {
        self.animations.retain(|a| a.key != key);
    }

    pub fn animation(&self, key: &str) -> Option<&PropertyAnimation> {
        self.animations.iter().find(|a| a.key == key)
    }

    pub fn has_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    /// On-screen value of `key`: the running animation's sample, or the model
    /// value when nothing is animating it.
    pub fn presentation_value(&self, key: &str, model_value: f64, now: f64) -> f64 {
        self.animation(key).map_or(model_value, |a| a.sample(now))
    }

    /// Sample every running animation at `now` and drop the finished ones.
    /// Finished animations report their final value.
    pub fn advance(&mut self, now: f64) -> Vec<(&'static str, f64)> {
        let values = self.animations.iter().map(|a| (a.key, a.sample(now))).collect();
        self.animations.retain(|a| !a.is_finished(now));
        values
    }
}
