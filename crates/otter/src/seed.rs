use crate::circle::CircleSpec;
use crate::config::SimulationConfig;
use folio_core::SkillTag;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PALETTE: [&str; 8] = [
    "#f94144", "#f3722c", "#f9c74f", "#90be6d", "#43aa8b", "#4d908e", "#577590", "#277da1",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedOptions {
    /// Seed for the deterministic heading/speed/jitter stream.
    pub random_seed: u64,
    /// Preferred diameter; shrunk when the grid cells are smaller.
    pub diameter: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Colors for tags that do not carry their own.
    pub palette: Vec<String>,
    /// Prepended to the tag slug to form the click target; empty disables navigation.
    pub href_prefix: String,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            random_seed: 1,
            diameter: 100.0,
            min_speed: 0.5,
            max_speed: 1.5,
            palette: DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect(),
            href_prefix: "/projects?skill=".to_string(),
        }
    }
}

/// Builds one circle per tag, spread over a grid filling the viewport, each moving in a
/// pseudo random direction. The same seed always yields the same circles.
pub fn seed_circles(
    tags: &[SkillTag],
    config: &SimulationConfig,
    options: &SeedOptions,
) -> Vec<CircleSpec> {
    if tags.is_empty() {
        return Vec::new();
    }
    let (width, height) = (config.viewport_width, config.viewport_height);
    let n = tags.len();
    let cols = ((n as f64 * width / height).sqrt().ceil() as usize).clamp(1, n);
    let rows = n.div_ceil(cols);
    let cell_w = width / cols as f64;
    let cell_h = height / rows as f64;
    let diameter = options.diameter.min(cell_w.min(cell_h) * 0.9).max(1.0);
    let jitter_x = ((cell_w - diameter) / 2.0).max(0.0);
    let jitter_y = ((cell_h - diameter) / 2.0).max(0.0);
    let (min_speed, max_speed) = if options.min_speed <= options.max_speed {
        (options.min_speed, options.max_speed)
    } else {
        (options.max_speed, options.min_speed)
    };

    let mut rng = XorShift64Star::new(options.random_seed);
    tags.iter()
        .enumerate()
        .map(|(i, tag)| {
            let (col, row) = (i % cols, i / cols);
            let x = (col as f64 + 0.5) * cell_w + rng.next_f64_signed() * jitter_x;
            let y = (row as f64 + 0.5) * cell_h + rng.next_f64_signed() * jitter_y;
            let heading = rng.next_f64_unit() * std::f64::consts::TAU;
            let speed = min_speed + rng.next_f64_unit() * (max_speed - min_speed);
            let color = tag.color.clone().unwrap_or_else(|| {
                options
                    .palette
                    .get(i % options.palette.len().max(1))
                    .cloned()
                    .unwrap_or_else(|| "#888888".to_string())
            });
            let href = (!options.href_prefix.is_empty())
                .then(|| format!("{}{}", options.href_prefix, tag.slug()));
            CircleSpec {
                label: tag.name.clone(),
                color,
                x,
                y,
                vx: speed * heading.cos(),
                vy: speed * heading.sin(),
                diameter,
                href,
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    fn next_f64_unit(&mut self) -> f64 {
        // Map to [0, 1) with 53 bits of precision.
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }

    fn next_f64_signed(&mut self) -> f64 {
        self.next_f64_unit() * 2.0 - 1.0
    }
}
