//! Starfield/nebula point cloud: a uniform cube of points with random hues,
//! spun as one rigid body by per-frame increments.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::color::{self, Rgb};
use crate::error::FieldError;
use crate::random::RandomSource;
use crate::vertex::{self, PointVertex};

/// Parameters for one starfield generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldParams {
    /// Number of points.
    pub count: u32,
    /// Edge length of the cube the points are scattered in, centered on the origin.
    pub spread: f32,
    /// Shared point size for the whole field.
    pub point_size: f32,
    /// HSL saturation for every point.
    pub saturation: f32,
    /// HSL lightness for every point.
    pub lightness: f32,
    /// Rotation added each frame about X and Y, radians.
    pub rotation_step: [f32; 2],
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            count: 5000,
            spread: 10.0,
            point_size: 0.02,
            saturation: 0.7,
            lightness: 0.5,
            rotation_step: [0.0005, 0.001],
        }
    }
}

impl StarfieldParams {
    /// Check the parameters. `count == 0` and `spread == 0` are accepted.
    pub fn validate(&self) -> Result<(), FieldError> {
        if !self.spread.is_finite() || self.spread < 0.0 {
            return Err(FieldError::invalid(
                "spread",
                format!("must be finite and non-negative, got {}", self.spread),
            ));
        }
        if !self.point_size.is_finite() || self.point_size <= 0.0 {
            return Err(FieldError::invalid(
                "point_size",
                format!("must be finite and positive, got {}", self.point_size),
            ));
        }
        if !(0.0..=1.0).contains(&self.saturation) {
            return Err(FieldError::invalid(
                "saturation",
                format!("must lie in [0, 1], got {}", self.saturation),
            ));
        }
        if !(0.0..=1.0).contains(&self.lightness) {
            return Err(FieldError::invalid(
                "lightness",
                format!("must lie in [0, 1], got {}", self.lightness),
            ));
        }
        if self.rotation_step.iter().any(|s| !s.is_finite()) {
            return Err(FieldError::invalid("rotation_step", "must be finite"));
        }
        Ok(())
    }
}

/// Index-aligned positions and colors for a generated starfield.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StarfieldField {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Rgb>,
}

impl StarfieldField {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleave into GPU-ready vertices, every point sharing `point_size`.
    pub fn vertices(&self, point_size: f32) -> Result<Vec<PointVertex>, FieldError> {
        let sizes = vec![point_size; self.len()];
        vertex::interleave(&self.positions, &self.colors, &sizes)
    }
}

/// Builds starfields from a fixed set of parameters.
#[derive(Clone, Debug)]
pub struct StarfieldGenerator {
    params: StarfieldParams,
}

impl StarfieldGenerator {
    pub fn new(params: StarfieldParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &StarfieldParams {
        &self.params
    }

    /// Generate the field. Each point draws x, y, z, then hue.
    pub fn generate(&self, rng: &mut impl RandomSource) -> Result<StarfieldField, FieldError> {
        self.params.validate()?;
        let p = &self.params;
        let count = p.count as usize;
        let half = p.spread * 0.5;

        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);

        for _ in 0..count {
            let x = rng.next_range(-half, half);
            let y = rng.next_range(-half, half);
            let z = rng.next_range(-half, half);
            positions.push(Vec3::new(x, y, z));

            let hue = rng.next_unit();
            colors.push(color::hsl_to_rgb(hue, p.saturation, p.lightness));
        }

        log::debug!("Generated starfield: {} points, spread {}", count, p.spread);

        Ok(StarfieldField { positions, colors })
    }
}

/// Per-frame starfield rotation, owned by the rendering surface.
///
/// Unlike the galaxy, this rotation accumulates: each [`advance`] adds the
/// step to the running X and Y angles.
///
/// [`advance`]: StarfieldState::advance
#[derive(Clone, Debug)]
pub struct StarfieldState {
    rotation: Vec2,
    step: Vec2,
    frames: u64,
}

impl StarfieldState {
    pub fn new(rotation_step: [f32; 2]) -> Self {
        Self {
            rotation: Vec2::ZERO,
            step: Vec2::from_array(rotation_step),
            frames: 0,
        }
    }

    /// Advance one frame.
    pub fn advance(&mut self) {
        self.rotation += self.step;
        self.frames += 1;
    }

    /// Advance `frames` frames in one call.
    pub fn advance_by(&mut self, frames: u32) {
        for _ in 0..frames {
            self.advance();
        }
    }

    /// Accumulated rotation about X (`.x`) and Y (`.y`), radians.
    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whole-field orientation, X then Y.
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }

    /// Model matrix for the renderer.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_quat(self.orientation())
    }

    /// Apply the current orientation to a field's points.
    pub fn world_positions(&self, field: &StarfieldField) -> Vec<Vec3> {
        let orientation = self.orientation();
        field.positions.iter().map(|p| orientation * *p).collect()
    }
}
