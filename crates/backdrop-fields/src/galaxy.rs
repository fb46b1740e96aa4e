//! Spiral galaxy point cloud: arms assigned by index, radius-driven spin,
//! power-law jitter, and an inside-to-outside color ramp.
//!
//! The field is generated once. Per-frame motion is handled by
//! [`GalaxyState`], which re-derives every point from its original polar
//! coordinates so repeated updates never drift.

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::{self, Rgb};
use crate::error::FieldError;
use crate::random::RandomSource;
use crate::vertex::{self, PointVertex};

/// `#ff6a00`
const DEFAULT_INSIDE_COLOR: Rgb = [1.0, 106.0 / 255.0, 0.0];
/// `#1b3984`
const DEFAULT_OUTSIDE_COLOR: Rgb = [27.0 / 255.0, 57.0 / 255.0, 132.0 / 255.0];

/// Rotation speed about +Y in radians per second of elapsed time.
pub const DEFAULT_ANGULAR_RATE: f32 = 0.1;

/// Parameters for one galaxy generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyParams {
    /// Number of samples.
    pub count: u32,
    /// Point size given to every sample.
    pub base_size: f32,
    /// Maximum planar distance of an arm point from the center.
    pub radius: f32,
    /// Number of spiral arms.
    pub branch_count: u32,
    /// Twist per unit of radius, in radians.
    pub spin_factor: f32,
    /// Jitter magnitude as a fraction of each sample's radius.
    pub randomness_spread: f32,
    /// Exponent applied to jitter draws. Higher values pull jitter toward zero.
    pub randomness_power: f32,
    /// Color at the center.
    #[serde(with = "crate::color::hex")]
    pub inside_color: Rgb,
    /// Color at `radius`.
    #[serde(with = "crate::color::hex")]
    pub outside_color: Rgb,
    /// Rotation speed used by [`GalaxyState`], radians per second.
    pub angular_rate: f32,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 5000,
            base_size: 0.45,
            radius: 15.0,
            branch_count: 3,
            spin_factor: 1.0,
            randomness_spread: 0.2,
            randomness_power: 3.0,
            inside_color: DEFAULT_INSIDE_COLOR,
            outside_color: DEFAULT_OUTSIDE_COLOR,
            angular_rate: DEFAULT_ANGULAR_RATE,
        }
    }
}

impl GalaxyParams {
    /// Check that the parameters describe a field the generator can build.
    ///
    /// `count == 0` and `radius == 0` are accepted and produce an empty or
    /// all-origin field respectively.
    pub fn validate(&self) -> Result<(), FieldError> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(FieldError::invalid(
                "radius",
                format!("must be finite and non-negative, got {}", self.radius),
            ));
        }
        if self.branch_count == 0 {
            return Err(FieldError::invalid("branch_count", "must be at least 1"));
        }
        if !self.base_size.is_finite() || self.base_size <= 0.0 {
            return Err(FieldError::invalid(
                "base_size",
                format!("must be finite and positive, got {}", self.base_size),
            ));
        }
        if !self.randomness_spread.is_finite() || self.randomness_spread < 0.0 {
            return Err(FieldError::invalid(
                "randomness_spread",
                format!(
                    "must be finite and non-negative, got {}",
                    self.randomness_spread
                ),
            ));
        }
        if !self.randomness_power.is_finite() || self.randomness_power < 1.0 {
            return Err(FieldError::invalid(
                "randomness_power",
                format!("must be finite and >= 1, got {}", self.randomness_power),
            ));
        }
        if !self.spin_factor.is_finite() {
            return Err(FieldError::invalid("spin_factor", "must be finite"));
        }
        if !self.angular_rate.is_finite() {
            return Err(FieldError::invalid("angular_rate", "must be finite"));
        }
        Ok(())
    }
}

/// One generated particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointSample {
    pub position: Vec3,
    pub color: Rgb,
    pub size: f32,
}

/// Index-aligned attribute arrays for a generated galaxy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GalaxyField {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Rgb>,
    pub sizes: Vec<f32>,
}

impl GalaxyField {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sample `index`, or `None` past the end.
    pub fn sample(&self, index: usize) -> Option<PointSample> {
        Some(PointSample {
            position: *self.positions.get(index)?,
            color: *self.colors.get(index)?,
            size: *self.sizes.get(index)?,
        })
    }

    pub fn samples(&self) -> impl Iterator<Item = PointSample> + '_ {
        (0..self.len()).filter_map(|i| self.sample(i))
    }

    /// Interleave the attributes into GPU-ready vertices.
    pub fn vertices(&self) -> Result<Vec<PointVertex>, FieldError> {
        vertex::interleave(&self.positions, &self.colors, &self.sizes)
    }
}

/// Builds galaxy fields from a fixed set of parameters.
#[derive(Clone, Debug)]
pub struct GalaxyGenerator {
    params: GalaxyParams,
}

impl GalaxyGenerator {
    pub fn new(params: GalaxyParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GalaxyParams {
        &self.params
    }

    /// Generate the full field. All-or-nothing: invalid parameters fail
    /// before any sample is drawn.
    pub fn generate(&self, rng: &mut impl RandomSource) -> Result<GalaxyField, FieldError> {
        self.params.validate()?;
        let p = &self.params;
        let count = p.count as usize;

        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        let mut sizes = Vec::with_capacity(count);

        for i in 0..count {
            let radius = rng.next_unit() * p.radius;
            let spin_angle = radius * p.spin_factor;
            let angle = branch_angle(i, p.branch_count) + spin_angle;

            let jitter = Vec3::new(
                self.jitter(rng, radius),
                self.jitter(rng, radius),
                self.jitter(rng, radius),
            );

            positions.push(Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius) + jitter);

            let t = if p.radius > 0.0 { radius / p.radius } else { 0.0 };
            colors.push(color::lerp(p.inside_color, p.outside_color, t));

            sizes.push(p.base_size);
        }

        log::debug!(
            "Generated galaxy: {} points, {} arms, radius {}",
            count,
            p.branch_count,
            p.radius
        );

        Ok(GalaxyField {
            positions,
            colors,
            sizes,
        })
    }

    fn jitter(&self, rng: &mut impl RandomSource, radius: f32) -> f32 {
        rng.next_unit().powf(self.params.randomness_power) * self.params.randomness_spread * radius
    }
}

/// Arm angle for sample `index`: arms are assigned round-robin by index.
/// With no arms every sample sits at angle zero.
pub fn branch_angle(index: usize, branch_count: u32) -> f32 {
    if branch_count == 0 {
        return 0.0;
    }
    let arms = branch_count as usize;
    (index % arms) as f32 / arms as f32 * TAU
}

#[derive(Clone, Copy, Debug)]
struct PolarPoint {
    radius: f32,
    angle: f32,
    y: f32,
}

/// Per-frame galaxy motion, owned by the rendering surface.
///
/// Holds the original polar coordinates of every point. [`update`] rebuilds
/// the rotated positions from them, so calling it twice with the same time
/// yields identical output.
///
/// [`update`]: GalaxyState::update
#[derive(Clone, Debug)]
pub struct GalaxyState {
    original: Vec<PolarPoint>,
    positions: Vec<Vec3>,
    angular_rate: f32,
    elapsed: f32,
}

impl GalaxyState {
    pub fn new(field: &GalaxyField, angular_rate: f32) -> Self {
        let original = field
            .positions
            .iter()
            .map(|p| PolarPoint {
                radius: (p.x * p.x + p.z * p.z).sqrt(),
                angle: p.z.atan2(p.x),
                y: p.y,
            })
            .collect();

        Self {
            original,
            positions: field.positions.clone(),
            angular_rate,
            elapsed: 0.0,
        }
    }

    /// Re-derive every position for `elapsed` seconds since start.
    pub fn update(&mut self, elapsed: f32) -> &[Vec3] {
        self.elapsed = elapsed;
        let offset = elapsed * self.angular_rate;

        for (out, polar) in self.positions.iter_mut().zip(&self.original) {
            let angle = polar.angle + offset;
            *out = Vec3::new(angle.cos() * polar.radius, polar.y, angle.sin() * polar.radius);
        }

        &self.positions
    }

    /// Return to `elapsed == 0`.
    pub fn reset(&mut self) {
        self.update(0.0);
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Total rotation applied to the field at the current time, in radians.
    pub fn rotation_angle(&self) -> f32 {
        self.elapsed * self.angular_rate
    }
}
