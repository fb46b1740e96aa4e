//! The two backgrounds and their per-frame state, driven by a fixed timestep.

use backdrop_config::{Config, PreviewConfig};
use backdrop_fields::vertex::{self, PointVertex};
use backdrop_fields::{
    FieldError, GalaxyField, GalaxyGenerator, GalaxyState, PreviewImage, SeededSource,
    StarfieldField, StarfieldGenerator, StarfieldState,
};
use glam::Mat4;
use tracing::debug;

/// Both fields, generated once, plus the state each frame mutates.
pub struct Scene {
    galaxy: GalaxyField,
    galaxy_state: GalaxyState,
    galaxy_vertices: Vec<PointVertex>,
    starfield: StarfieldField,
    starfield_state: StarfieldState,
    starfield_vertices: Vec<PointVertex>,
    frame: u32,
    frame_interval: f32,
}

impl Scene {
    /// Generate both fields from the configured parameters and seed.
    ///
    /// The starfield draws from the seed after the galaxy's so the two
    /// fields are uncorrelated.
    pub fn new(config: &Config) -> Result<Self, FieldError> {
        let seed = config.run.seed;

        let galaxy = GalaxyGenerator::new(config.galaxy.clone())
            .generate(&mut SeededSource::new(seed))?;
        let galaxy_vertices = galaxy.vertices()?;
        let galaxy_state = GalaxyState::new(&galaxy, config.galaxy.angular_rate);

        let starfield = StarfieldGenerator::new(config.starfield.clone())
            .generate(&mut SeededSource::new(seed.wrapping_add(1)))?;
        let starfield_vertices = starfield.vertices(config.starfield.point_size)?;
        let starfield_state = StarfieldState::new(config.starfield.rotation_step);

        Ok(Self {
            galaxy,
            galaxy_state,
            galaxy_vertices,
            starfield,
            starfield_state,
            starfield_vertices,
            frame: 0,
            frame_interval: config.frame_interval(),
        })
    }

    /// Advance one frame: galaxy re-derived at the new elapsed time,
    /// starfield rotated by one step.
    pub fn step(&mut self) {
        self.frame += 1;
        let elapsed = self.elapsed();
        self.galaxy_state.update(elapsed);
        self.starfield_state.advance();
        debug!(frame = self.frame, elapsed, "Stepped scene");
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Seconds since the first frame.
    pub fn elapsed(&self) -> f32 {
        self.frame as f32 * self.frame_interval
    }

    pub fn galaxy(&self) -> &GalaxyField {
        &self.galaxy
    }

    pub fn galaxy_state(&self) -> &GalaxyState {
        &self.galaxy_state
    }

    pub fn starfield(&self) -> &StarfieldField {
        &self.starfield
    }

    pub fn starfield_state(&self) -> &StarfieldState {
        &self.starfield_state
    }

    /// Draw the galaxy at its current rotation.
    pub fn render_galaxy(&self, preview: &PreviewConfig) -> Result<PreviewImage, FieldError> {
        let vertices =
            vertex::with_positions(&self.galaxy_vertices, self.galaxy_state.positions())?;
        let mut image =
            PreviewImage::new(preview.width, preview.height, &preview.galaxy_background)?;
        let drawn = image.draw_points(
            &preview.galaxy_camera,
            Mat4::IDENTITY,
            &vertices,
            preview.galaxy_sprite,
        );
        debug!(frame = self.frame, drawn, "Rendered galaxy preview");
        Ok(image)
    }

    /// Draw the starfield at its current orientation.
    pub fn render_starfield(&self, preview: &PreviewConfig) -> Result<PreviewImage, FieldError> {
        let mut image =
            PreviewImage::new(preview.width, preview.height, &preview.starfield_background)?;
        let drawn = image.draw_points(
            &preview.starfield_camera,
            self.starfield_state.transform(),
            &self.starfield_vertices,
            preview.starfield_sprite,
        );
        debug!(frame = self.frame, drawn, "Rendered starfield preview");
        Ok(image)
    }
}

/// Whether `frame` of `total` should be written out. With `every == 0` only
/// the first and last frames are captured.
pub fn should_capture(frame: u32, total: u32, every: u32) -> bool {
    if frame == 0 || frame == total {
        return true;
    }
    every != 0 && frame % every == 0
}
