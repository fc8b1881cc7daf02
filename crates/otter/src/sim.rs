use crate::circle::{Circle, CircleId, CircleSpec, Navigation, Transform};
use crate::config::SimulationConfig;
use crate::{Error, Result};
use nalgebra::Vector2;
use serde::Serialize;

/// Centers closer than this are treated as coincident; the pair is skipped for the frame.
const COINCIDENT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    circle: Option<Circle>,
}

/// Output of one simulation frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Time scale applied to velocities (1.0 = one nominal frame).
    pub delta: f64,
    /// Number of pairs resolved this frame.
    pub collisions: usize,
    pub transforms: Vec<Transform>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contact {
    Apart,
    Coincident,
    Resolved,
}

/// The single owner of every live circle.
///
/// Circles never touch each other directly; each frame the simulation integrates all of them and
/// then resolves collisions pair by pair.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    slots: Vec<Slot>,
    free: Vec<usize>,
    last_frame_ms: Option<f64>,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            slots: Vec::new(),
            free: Vec::new(),
            last_frame_ms: None,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Mounts a circle, clamped into the viewport.
    pub fn register(&mut self, spec: CircleSpec) -> Result<CircleId> {
        let finite = [spec.x, spec.y, spec.vx, spec.vy, spec.diameter]
            .iter()
            .all(|v| v.is_finite());
        if !finite || spec.diameter <= 0.0 {
            return Err(Error::InvalidCircle {
                label: spec.label,
                message: "position, velocity and a positive diameter must be finite".to_string(),
            });
        }

        let mut circle = Circle::from_spec(spec);
        clamp_into(&mut circle, self.config.viewport_width, self.config.viewport_height);

        let index = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.generation = slot.generation.wrapping_add(1);
                slot.circle = Some(circle);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    circle: Some(circle),
                });
                self.slots.len() - 1
            }
        };
        let id = self.id_at(index);
        tracing::debug!(%id, "registered circle");
        Ok(id)
    }

    /// Unmounts a circle and frees its arena slot.
    pub fn unregister(&mut self, id: CircleId) -> Result<Circle> {
        self.get(id).ok_or(Error::UnknownCircle { id })?;
        let slot = &mut self.slots[id.index()];
        let circle = slot.circle.take().ok_or(Error::UnknownCircle { id })?;
        self.free.push(id.index());
        tracing::debug!(%id, "unregistered circle");
        Ok(circle)
    }

    pub fn get(&self, id: CircleId) -> Option<&Circle> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.circle.as_ref()
    }

    fn get_mut(&mut self, id: CircleId) -> Result<&mut Circle> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.circle.as_mut())
            .ok_or(Error::UnknownCircle { id })
    }

    pub fn pointer_enter(&mut self, id: CircleId) -> Result<()> {
        let scale = self.config.hover_scale;
        self.get_mut(id)?.hover(scale);
        Ok(())
    }

    pub fn pointer_leave(&mut self, id: CircleId) -> Result<()> {
        self.get_mut(id)?.unhover();
        Ok(())
    }

    /// Terminal interaction: the circle leaves the simulation and the caller navigates away.
    pub fn click(&mut self, id: CircleId) -> Result<Navigation> {
        let navigation = self.get_mut(id)?.click();
        self.unregister(id)?;
        Ok(navigation)
    }

    /// Resizes the viewport and pulls every circle back inside it.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Result<()> {
        let mut config = self.config.clone();
        config.viewport_width = width;
        config.viewport_height = height;
        config.validate()?;
        self.config = config;
        for circle in self.circles_mut() {
            clamp_into(circle, width, height);
        }
        Ok(())
    }

    pub fn live_count(&self) -> usize {
        self.circles().filter(|(_, c)| c.is_live()).count()
    }

    /// Whether the host should keep scheduling frames.
    pub fn is_animating(&self) -> bool {
        self.live_count() > 0
    }

    /// Advances the simulation to `now_ms`, a monotonic timestamp in milliseconds.
    ///
    /// Returns `None`, and forgets the previous timestamp, once no live circle remains.
    pub fn frame(&mut self, now_ms: f64) -> Option<Frame> {
        if !self.is_animating() {
            self.last_frame_ms = None;
            return None;
        }
        let delta = match self.last_frame_ms {
            None => 1.0,
            Some(prev) => {
                let raw = (now_ms - prev) / self.config.nominal_frame_ms;
                if raw.is_nan() {
                    0.0
                } else {
                    raw.clamp(0.0, self.config.max_delta_factor)
                }
            }
        };
        self.last_frame_ms = Some(now_ms);
        Some(self.step(delta))
    }

    /// Runs `frames` frames at a fixed cadence and returns the last one.
    pub fn run(&mut self, frames: usize, frame_ms: f64) -> Option<Frame> {
        let start = self.last_frame_ms.unwrap_or(0.0);
        let mut last = None;
        for i in 1..=frames {
            match self.frame(start + i as f64 * frame_ms) {
                Some(frame) => last = Some(frame),
                None => break,
            }
        }
        last
    }

    /// One integration and collision pass with an explicit time scale.
    pub fn step(&mut self, delta: f64) -> Frame {
        let (width, height) = (self.config.viewport_width, self.config.viewport_height);
        for circle in self.circles_mut().filter(|c| c.is_live()) {
            circle.position += circle.velocity * delta;
            bounce_off_walls(circle, width, height);
        }

        let collisions = self.collision_pass();

        for circle in self.circles_mut() {
            clamp_into(circle, width, height);
        }

        tracing::trace!(delta, collisions, "frame");
        Frame {
            delta,
            collisions,
            transforms: self.transforms(),
        }
    }

    /// Repeats collision passes without moving time forward until nothing overlaps or
    /// `max_passes` is reached. Returns the number of passes that still found overlaps.
    pub fn resolve_overlaps(&mut self, max_passes: usize) -> usize {
        let (width, height) = (self.config.viewport_width, self.config.viewport_height);
        let mut busy = 0;
        for _ in 0..max_passes {
            let resolved = self.separation_pass();
            for circle in self.circles_mut() {
                clamp_into(circle, width, height);
            }
            if resolved == 0 {
                break;
            }
            busy += 1;
        }
        busy
    }

    pub fn transforms(&self) -> Vec<Transform> {
        self.circles().map(|(id, c)| c.transform(id)).collect()
    }

    pub fn circles(&self) -> impl Iterator<Item = (CircleId, &Circle)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let circle = slot.circle.as_ref()?;
            Some((
                CircleId {
                    index: index as u32,
                    generation: slot.generation,
                },
                circle,
            ))
        })
    }

    fn circles_mut(&mut self) -> impl Iterator<Item = &mut Circle> {
        self.slots.iter_mut().filter_map(|slot| slot.circle.as_mut())
    }

    fn id_at(&self, index: usize) -> CircleId {
        CircleId {
            index: index as u32,
            generation: self.slots[index].generation,
        }
    }

    fn live_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.circle.as_ref().is_some_and(Circle::is_live))
            .map(|(index, _)| index)
            .collect()
    }

    fn collision_pass(&mut self) -> usize {
        self.for_each_pair(collide)
    }

    fn separation_pass(&mut self) -> usize {
        self.for_each_pair(|a, b| separate(a, b).map_or(Contact::Apart, |_| Contact::Resolved))
    }

    fn for_each_pair(&mut self, mut f: impl FnMut(&mut Circle, &mut Circle) -> Contact) -> usize {
        let live = self.live_indices();
        let mut resolved = 0;
        for (i, &a) in live.iter().enumerate() {
            for &b in &live[i + 1..] {
                let Some((ca, cb)) = pair_mut(&mut self.slots, a, b) else {
                    continue;
                };
                match f(ca, cb) {
                    Contact::Resolved => resolved += 1,
                    Contact::Coincident => {
                        tracing::trace!(a, b, "skipping coincident circles");
                    }
                    Contact::Apart => {}
                }
            }
        }
        resolved
    }
}

/// Mutable access to two distinct slots, `a < b`.
fn pair_mut(slots: &mut [Slot], a: usize, b: usize) -> Option<(&mut Circle, &mut Circle)> {
    if a >= b || b >= slots.len() {
        return None;
    }
    let (lo, hi) = slots.split_at_mut(b);
    Some((lo[a].circle.as_mut()?, hi[0].circle.as_mut()?))
}

/// Pushes two overlapping circles apart by half the overlap each, returning the unit normal
/// from `a` to `b`. `None` when they do not overlap or their centers coincide.
fn separate(a: &mut Circle, b: &mut Circle) -> Option<Vector2<f64>> {
    let d = b.position - a.position;
    let dist = d.norm();
    let min_dist = a.radius() + b.radius();
    if dist >= min_dist || dist <= COINCIDENT_EPSILON {
        return None;
    }
    let normal = d / dist;
    let push = normal * ((min_dist - dist) / 2.0);
    a.position -= push;
    b.position += push;
    Some(normal)
}

/// Equal-mass elastic collision: exchange the velocity components along the normal, keep the
/// tangential ones. Pairs that are already separating keep their velocities.
fn collide(a: &mut Circle, b: &mut Circle) -> Contact {
    let dist = (b.position - a.position).norm();
    if dist >= a.radius() + b.radius() {
        return Contact::Apart;
    }
    let Some(normal) = separate(a, b) else {
        return Contact::Coincident;
    };
    let va = a.velocity.dot(&normal);
    let vb = b.velocity.dot(&normal);
    if vb - va < 0.0 {
        a.velocity += normal * (vb - va);
        b.velocity += normal * (va - vb);
    }
    Contact::Resolved
}

/// Reflects a circle off any wall it crossed.
fn bounce_off_walls(circle: &mut Circle, width: f64, height: f64) {
    let r = circle.radius();
    bounce_axis(&mut circle.position.x, &mut circle.velocity.x, r, width);
    bounce_axis(&mut circle.position.y, &mut circle.velocity.y, r, height);
}

fn bounce_axis(pos: &mut f64, vel: &mut f64, r: f64, extent: f64) {
    if 2.0 * r >= extent {
        *pos = extent / 2.0;
        return;
    }
    if *pos - r < 0.0 {
        *pos = r;
        *vel = vel.abs();
    } else if *pos + r > extent {
        *pos = extent - r;
        *vel = -vel.abs();
    }
}

/// Keeps a circle inside the viewport without touching its velocity.
fn clamp_into(circle: &mut Circle, width: f64, height: f64) {
    let r = circle.radius();
    circle.position.x = clamp_axis(circle.position.x, r, width);
    circle.position.y = clamp_axis(circle.position.y, r, height);
}

fn clamp_axis(pos: f64, r: f64, extent: f64) -> f64 {
    if 2.0 * r >= extent {
        extent / 2.0
    } else {
        pos.clamp(r, extent - r)
    }
}
