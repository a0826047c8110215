// 🎨 Colors - Named colors and the sequential edge gradient

use anyhow::{bail, Result};
use std::fmt;

/// RGB color, channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("darkred", (139, 0, 0)),
    ("brown", (165, 42, 42)),
    ("firebrick", (178, 34, 34)),
    ("orange", (255, 165, 0)),
    ("gold", (255, 215, 0)),
    ("green", (0, 128, 0)),
    ("darkgreen", (0, 100, 0)),
    ("blue", (0, 0, 255)),
    ("navy", (0, 0, 128)),
    ("steelblue", (70, 130, 180)),
    ("lightblue", (173, 216, 230)),
    ("purple", (128, 0, 128)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("lightgray", (211, 211, 211)),
];

impl Rgb {
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Rgb {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parse a CSS color name (any case) or `#rrggbb`
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();

        if let Some(hex) = spec.strip_prefix('#') {
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                bail!("Invalid hex color: {}", spec);
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            return Ok(Rgb::from_u8(channel(0)?, channel(2)?, channel(4)?));
        }

        let lower = spec.to_lowercase();
        match NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
            Some((_, (r, g, b))) => Ok(Rgb::from_u8(*r, *g, *b)),
            None => bail!("Unknown color name: {}", spec),
        }
    }

    /// Hue, saturation, lightness, all in `[0, 1]`
    pub fn to_hsl(self) -> (f64, f64, f64) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (max + min) / 2.0;

        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l < 0.5 { d / (max + min) } else { d / (2.0 - max - min) };
        let h = if max == self.r {
            (self.g - self.b) / d + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / d + 2.0
        } else {
            (self.r - self.g) / d + 4.0
        };

        (h / 6.0, s, l)
    }

    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        if s == 0.0 {
            return Rgb { r: l, g: l, b: l };
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Rgb {
            r: hue_to_channel(p, q, h + 1.0 / 3.0),
            g: hue_to_channel(p, q, h),
            b: hue_to_channel(p, q, h - 1.0 / 3.0),
        }
    }

    /// `rgb(r, g, b)` with 0-255 channels
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(f, "rgb({}, {}, {})", channel(self.r), channel(self.g), channel(self.b))
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// `steps` colors from `start` to `end` inclusive, interpolated in HSL.
///
/// One step yields just `start`; zero steps yields nothing.
pub fn gradient(start: Rgb, end: Rgb, steps: usize) -> Vec<Rgb> {
    if steps == 0 {
        return Vec::new();
    }

    let (h0, s0, l0) = start.to_hsl();
    let (h1, s1, l1) = end.to_hsl();
    let intervals = steps.saturating_sub(1).max(1) as f64;

    (0..steps)
        .map(|i| {
            let t = i as f64 / intervals;
            Rgb::from_hsl(h0 + (h1 - h0) * t, s0 + (s1 - s0) * t, l0 + (l1 - l0) * t)
        })
        .collect()
}
