//! CPU point-sprite rasterizer for inspecting fields without a GPU.
//!
//! Mirrors what the scene renderer does with the fields: perspective
//! projection, distance-attenuated sprite size, a soft round falloff, and
//! additive blending over a background.

use std::path::Path;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::color::{self, Rgb};
use crate::error::FieldError;
use crate::vertex::PointVertex;

/// Sprites never exceed this many pixels across.
const MAX_SPRITE_PIXELS: f32 = 64.0;

/// Largest accepted preview width or height.
pub const MAX_PREVIEW_DIMENSION: u32 = 16_384;

/// Perspective camera looking at a target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewCamera {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PreviewCamera {
    fn default() -> Self {
        Self::galaxy()
    }
}

impl PreviewCamera {
    /// Raised three-quarter view onto the galaxy disk.
    pub fn galaxy() -> Self {
        Self {
            eye: [0.0, 20.0, 35.0],
            target: [0.0, 0.0, 0.0],
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Straight-on view from just outside the starfield cube.
    pub fn starfield() -> Self {
        Self {
            eye: [0.0, 0.0, 5.0],
            ..Self::galaxy()
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(
            Vec3::from_array(self.eye),
            Vec3::from_array(self.target),
            Vec3::Y,
        )
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }
}

/// What sits behind the points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Background {
    Solid(#[serde(with = "crate::color::hex")] Rgb),
    /// Circle centered on the image, `inner` at the center and `outer` at
    /// the corners.
    RadialGradient {
        #[serde(with = "crate::color::hex")]
        inner: Rgb,
        #[serde(with = "crate::color::hex")]
        outer: Rgb,
    },
}

impl Background {
    /// `#1b2735` fading to `#090a0f`.
    pub fn deep_space() -> Self {
        Self::RadialGradient {
            inner: [27.0 / 255.0, 39.0 / 255.0, 53.0 / 255.0],
            outer: [9.0 / 255.0, 10.0 / 255.0, 15.0 / 255.0],
        }
    }

    fn sample(&self, x: f32, y: f32, width: f32, height: f32) -> Rgb {
        match self {
            Self::Solid(c) => *c,
            Self::RadialGradient { inner, outer } => {
                let dx = x - width * 0.5;
                let dy = y - height * 0.5;
                let corner = (width * width + height * height).sqrt() * 0.5;
                let t = if corner > 0.0 {
                    (dx * dx + dy * dy).sqrt() / corner
                } else {
                    0.0
                };
                color::lerp(*inner, *outer, t)
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::Solid([0.0, 0.0, 0.0])
    }
}

/// How a point covers its square footprint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteShape {
    /// Round, fading toward the rim.
    #[default]
    Soft,
    /// Fully opaque square.
    Square,
}

/// Sprite sizing and shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteStyle {
    /// Pixel size of a unit-size point at depth 1.
    pub attenuation: f32,
    pub shape: SpriteShape,
}

impl Default for SpriteStyle {
    fn default() -> Self {
        Self {
            attenuation: 300.0,
            shape: SpriteShape::Soft,
        }
    }
}

/// Hermite step between two edges.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Opacity of a soft sprite at `distance` from its center, in sprite-space
/// units where the rim is at 0.5.
pub fn sprite_alpha(distance: f32) -> f32 {
    let strength = 1.0 - smoothstep(0.0, 0.5, distance);
    strength * strength
}

/// Screen-space diameter of a point of `size` at view `depth`.
pub fn sprite_pixels(size: f32, depth: f32, attenuation: f32) -> f32 {
    (size * attenuation / depth).clamp(1.0, MAX_SPRITE_PIXELS)
}

/// Linear RGB accumulation buffer.
#[derive(Clone, Debug)]
pub struct PreviewImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl PreviewImage {
    /// A `width` x `height` image filled with `background`. Either side may
    /// be at most [`MAX_PREVIEW_DIMENSION`].
    pub fn new(width: u32, height: u32, background: &Background) -> Result<Self, FieldError> {
        for (name, value) in [("width", width), ("height", height)] {
            if value > MAX_PREVIEW_DIMENSION {
                return Err(FieldError::invalid(
                    name,
                    format!("must be at most {MAX_PREVIEW_DIMENSION}, got {value}"),
                ));
            }
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| FieldError::invalid("width", "image too large"))?;

        let (w, h) = (width as f32, height as f32);
        let mut pixels = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                pixels.push(background.sample(x as f32 + 0.5, y as f32 + 0.5, w, h));
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Splat `vertices`, transformed by `model`, as seen from `camera`.
    /// Returns how many points landed on screen.
    pub fn draw_points(
        &mut self,
        camera: &PreviewCamera,
        model: Mat4,
        vertices: &[PointVertex],
        style: SpriteStyle,
    ) -> usize {
        if self.width == 0 || self.height == 0 {
            return 0;
        }
        let (w, h) = (self.width as f32, self.height as f32);
        let view = camera.view() * model;
        let projection = camera.projection(w / h);
        let mut drawn = 0;

        for vertex in vertices {
            let eye = view.transform_point3(vertex.position());
            let depth = -eye.z;
            if depth <= camera.near {
                continue;
            }

            let ndc = projection.project_point3(eye);
            let sx = (ndc.x * 0.5 + 0.5) * w;
            let sy = (0.5 - ndc.y * 0.5) * h;
            let diameter = sprite_pixels(vertex.size, depth, style.attenuation);
            let half = diameter * 0.5;

            if sx + half < 0.0 || sy + half < 0.0 || sx - half > w || sy - half > h {
                continue;
            }

            self.splat(sx, sy, diameter, vertex.color, style.shape);
            drawn += 1;
        }

        drawn
    }

    fn splat(&mut self, sx: f32, sy: f32, diameter: f32, color: Rgb, shape: SpriteShape) {
        let half = diameter * 0.5;
        let x0 = (sx - half).floor().max(0.0) as u32;
        let y0 = (sy - half).floor().max(0.0) as u32;
        let x1 = ((sx + half).ceil() as u32).min(self.width);
        let y1 = ((sy + half).ceil() as u32).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                // Sprite-space coordinates: (0.5, 0.5) is the center.
                let u = (px as f32 + 0.5 - (sx - half)) / diameter;
                let v = (py as f32 + 0.5 - (sy - half)) / diameter;
                if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
                    continue;
                }
                let alpha = match shape {
                    SpriteShape::Soft => {
                        sprite_alpha(((u - 0.5) * (u - 0.5) + (v - 0.5) * (v - 0.5)).sqrt())
                    }
                    SpriteShape::Square => 1.0,
                };
                let i = self.index(px, py);
                let pixel = &mut self.pixels[i];
                pixel[0] += color[0] * alpha;
                pixel[1] += color[1] * alpha;
                pixel[2] += color[2] * alpha;
            }
        }
    }

    /// Pixels brighter than `background` by more than a rounding step.
    pub fn lit_pixels(&self, background: &Background) -> usize {
        let (w, h) = (self.width as f32, self.height as f32);
        self.pixels
            .iter()
            .enumerate()
            .filter(|(i, p)| {
                let x = (*i % self.width as usize) as f32 + 0.5;
                let y = (*i / self.width as usize) as f32 + 0.5;
                let base = background.sample(x, y, w, h);
                (0..3).any(|ch| p[ch] - base[ch] > 1.0 / 255.0)
            })
            .count()
    }

    /// Clamp and quantize to RGBA8.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            bytes.push((pixel[0].clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((pixel[1].clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((pixel[2].clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push(255);
        }
        bytes
    }

    /// Write the image as a PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), FieldError> {
        let bytes = self.to_rgba8();
        let image = image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let i = self.index(x, y) * 4;
            image::Rgba([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]])
        });
        image.save(path)?;
        log::info!("Wrote preview {}", path.display());
        Ok(())
    }
}
