use std::f64::consts::TAU;

use super::Animatable;
use super::animation::LayerState;
use crate::app::domain::geometry::{Color, Point, Rect};

const TIME_KEY: &str = "time";
const SECONDS_PER_DAY: f64 = 86_400.0;
const HOUR_HAND_LENGTH: f64 = 0.5;
const MINUTE_HAND_LENGTH: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    MoveTo(Point),
    LineTo(Point),
    /// An ellipse inscribed in the rectangle.
    Ellipse(Rect),
}

/// Strokes paths for a shape layer.
pub trait PathRenderer {
    fn stroke_path(&mut self, path: &[PathElement], color: Color, line_width: f64);
}

/// An analogue clock: a circular face with hour and minute hands. Changing
/// the time sweeps the hands to the new position.
pub struct ClockFace {
    state: LayerState,
    renderer: Box<dyn PathRenderer>,
    /// Seconds since midnight.
    time: f64,
    shown_time: f64,
    stroke_color: Color,
    line_width: f64,
}

impl ClockFace {
    pub fn new(bounds: Rect, renderer: Box<dyn PathRenderer>) -> Self {
        Self {
            state: LayerState::new(bounds),
            renderer,
            time: 0.0,
            shown_time: 0.0,
            stroke_color: Color::BLACK,
            line_width: 2.0,
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Time the hands currently show.
    pub fn shown_time(&self) -> f64 {
        self.shown_time
    }

    /// Set the time of day in seconds since midnight; values wrap to one day.
    pub fn set_time(&mut self, seconds: f64, now: f64) {
        if !seconds.is_finite() {
            return;
        }
        let seconds = seconds.rem_euclid(SECONDS_PER_DAY);
        let animating = self.state.animate(TIME_KEY, self.shown_time, seconds, now);
        self.time = seconds;
        if !animating {
            self.shown_time = seconds;
        }
        self.state.set_needs_display();
    }

    pub fn set_time_hms(&mut self, hours: u32, minutes: u32, seconds: u32, now: f64) {
        let total = f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + f64::from(seconds);
        self.set_time(total, now);
    }

    pub fn set_stroke(&mut self, color: Color, line_width: f64) {
        self.stroke_color = color;
        self.line_width = line_width;
        self.state.set_needs_display();
    }

    /// Hour and minute hand angles in radians, clockwise from twelve o'clock.
    pub fn hand_angles(time: f64) -> (f64, f64) {
        let hours = (time / 3600.0).rem_euclid(12.0);
        let minutes = (time / 60.0).rem_euclid(60.0);
        (hours / 12.0 * TAU, minutes / 60.0 * TAU)
    }

    /// Face outline and both hands for the time currently shown.
    pub fn face_path(&self) -> Vec<PathElement> {
        let bounds = self.state.bounds();
        let center = bounds.center();
        let radius = bounds.width.min(bounds.height) / 2.0;
        let (hour_angle, minute_angle) = Self::hand_angles(self.shown_time);

        let hand_end = |angle: f64, length: f64| {
            Point::new(
                center.x + radius * length * angle.sin(),
                center.y - radius * length * angle.cos(),
            )
        };

        vec![
            PathElement::Ellipse(Rect::new(
                center.x - radius,
                center.y - radius,
                radius * 2.0,
                radius * 2.0,
            )),
            PathElement::MoveTo(center),
            PathElement::LineTo(hand_end(hour_angle, HOUR_HAND_LENGTH)),
            PathElement::MoveTo(center),
            PathElement::LineTo(hand_end(minute_angle, MINUTE_HAND_LENGTH)),
        ]
    }
}

impl Animatable for ClockFace {
    fn layer(&self) -> &LayerState {
        &self.state
    }

    fn layer_mut(&mut self) -> &mut LayerState {
        &mut self.state
    }

    fn needs_display_for_key(&self, key: &str) -> bool {
        key == TIME_KEY
    }

    fn apply_presentation_value(&mut self, key: &str, value: f64) {
        if key == TIME_KEY {
            self.shown_time = value;
        }
    }

    fn display(&mut self) {
        let path = self.face_path();
        self.renderer.stroke_path(&path, self.stroke_color, self.line_width);
    }
}
