//! Ambient point-cloud backgrounds: a spiral galaxy and a rotating starfield.
//!
//! Each field is generated once from its parameters and a [`RandomSource`],
//! then animated per frame through a small state value owned by the caller.

pub mod color;
pub mod error;
pub mod galaxy;
pub mod preview;
pub mod random;
pub mod starfield;
pub mod vertex;

pub use color::{Rgb, hsl_to_rgb, parse_hex};
pub use error::FieldError;
pub use galaxy::{GalaxyField, GalaxyGenerator, GalaxyParams, GalaxyState, PointSample};
pub use preview::{
    Background, MAX_PREVIEW_DIMENSION, PreviewCamera, PreviewImage, SpriteShape, SpriteStyle,
};
pub use random::{FixedSource, RandomSource, SeededSource, SequenceSource};
pub use starfield::{StarfieldField, StarfieldGenerator, StarfieldParams, StarfieldState};
pub use vertex::PointVertex;
