//! Color helpers: hex parsing, linear interpolation, and HSL conversion.

use crate::error::FieldError;

/// RGB channel intensities, each in `[0, 1]`.
pub type Rgb = [f32; 3];

/// Parse `#rrggbb`, `rrggbb`, `#rgb`, or `rgb` into channel intensities.
pub fn parse_hex(text: &str) -> Result<Rgb, FieldError> {
    let digits = text.trim().trim_start_matches('#');
    let invalid = || FieldError::InvalidColor(text.to_string());

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    let bytes = match digits.len() {
        6 => [
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ],
        // Shorthand: each nibble is doubled, so "f80" == "ff8800".
        3 => [
            channel(&digits[0..1])? * 17,
            channel(&digits[1..2])? * 17,
            channel(&digits[2..3])? * 17,
        ],
        _ => return Err(invalid()),
    };

    Ok(bytes.map(|b| b as f32 / 255.0))
}

/// Format a color as lowercase `#rrggbb`. Channels are clamped to `[0, 1]`.
pub fn to_hex(color: Rgb) -> String {
    let [r, g, b] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Convex interpolation from `a` (t = 0) to `b` (t = 1). `t` is clamped.
pub fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Convert hue/saturation/lightness to RGB.
///
/// Hue wraps modulo 1; saturation and lightness are clamped to `[0, 1]`.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb {
    let h = hue.rem_euclid(1.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l];
    }

    let max = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let min = 2.0 * l - max;

    [
        hue_to_channel(min, max, h + 1.0 / 3.0),
        hue_to_channel(min, max, h),
        hue_to_channel(min, max, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(min: f32, max: f32, t: f32) -> f32 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        min + (max - min) * 6.0 * t
    } else if t < 0.5 {
        max
    } else if t < 2.0 / 3.0 {
        min + (max - min) * 6.0 * (2.0 / 3.0 - t)
    } else {
        min
    }
}

/// Serde adapter storing an [`Rgb`] as a hex string, e.g. `"#ff6a00"`.
///
/// Use with `#[serde(with = "backdrop_fields::color::hex")]`.
pub mod hex {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Rgb;

    pub fn serialize<S: Serializer>(color: &Rgb, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_hex(&text).map_err(serde::de::Error::custom)
    }
}
