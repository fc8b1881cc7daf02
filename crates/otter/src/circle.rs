use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arena handle of a registered circle.
///
/// The generation changes every time an arena slot is reused, so a handle kept past
/// `unregister` never addresses a different circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CircleId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl CircleId {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for CircleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Everything needed to mount a circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleSpec {
    pub label: String,
    pub color: String,
    pub x: f64,
    pub y: f64,
    /// Pixels per nominal frame.
    pub vx: f64,
    pub vy: f64,
    pub diameter: f64,
    /// Where a click navigates to.
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircleState {
    Free,
    Hovered,
    /// Terminal: the circle stops colliding and the user is navigated away.
    Clicked,
}

/// Result of clicking a circle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub label: String,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub label: String,
    pub color: String,
    pub href: Option<String>,
    pub(crate) position: Vector2<f64>,
    pub(crate) velocity: Vector2<f64>,
    base_diameter: f64,
    diameter: f64,
    state: CircleState,
}

impl Circle {
    pub(crate) fn from_spec(spec: CircleSpec) -> Self {
        Self {
            label: spec.label,
            color: spec.color,
            href: spec.href,
            position: Vector2::new(spec.x, spec.y),
            velocity: Vector2::new(spec.vx, spec.vy),
            base_diameter: spec.diameter,
            diameter: spec.diameter,
            state: CircleState::Free,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.position.x, self.position.y)
    }

    pub fn velocity(&self) -> (f64, f64) {
        (self.velocity.x, self.velocity.y)
    }

    /// Radius from the current display size.
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    pub fn state(&self) -> CircleState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state != CircleState::Clicked
    }

    pub(crate) fn hover(&mut self, scale: f64) {
        if self.state == CircleState::Free {
            self.state = CircleState::Hovered;
            self.diameter = self.base_diameter * scale;
        }
    }

    pub(crate) fn unhover(&mut self) {
        if self.state == CircleState::Hovered {
            self.state = CircleState::Free;
            self.diameter = self.base_diameter;
        }
    }

    pub(crate) fn click(&mut self) -> Navigation {
        self.state = CircleState::Clicked;
        Navigation {
            label: self.label.clone(),
            href: self.href.clone(),
        }
    }

    pub(crate) fn transform(&self, id: CircleId) -> Transform {
        Transform {
            id,
            label: self.label.clone(),
            x: self.position.x,
            y: self.position.y,
            radius: self.radius(),
            state: self.state,
        }
    }
}

/// Visual update for one circle after a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub id: CircleId,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub state: CircleState,
}
