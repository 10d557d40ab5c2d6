//! Visual style of a label: font description, colors, alignment and inset.
//!
//! Everything here is plain data with serde support so a style can be loaded
//! from a JSON config file. Colors serialize as `"#RRGGBB"` strings.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Point;

/// Font weight/slant variants understood by the font providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

/// Description of a font: family name, size in coordinate units, weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub weight: FontWeight,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            weight: FontWeight::Normal,
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec::new("sans-serif", 12.0)
    }
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&s).ok_or_else(|| format!("invalid color {s:?}, expected #RRGGBB"))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

/// Horizontal placement of text inside the label's inset rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl HAlign {
    /// X coordinate where a run of `text_width` starts inside `[left, left + avail]`.
    pub fn start_x(self, left: f64, avail: f64, text_width: f64) -> f64 {
        match self {
            HAlign::Left => left,
            HAlign::Center => left + (avail - text_width) / 2.0,
            HAlign::Right => left + avail - text_width,
        }
    }
}

/// Paint-related style of a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub font_color: Rgb,
    /// Filled behind the text when set.
    pub back_color: Option<Rgb>,
    pub align: HAlign,
    /// Horizontal inset is applied left and right, vertical inset top and bottom.
    pub text_inset: Point,
    pub antialias: bool,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_color: Rgb::BLACK,
            back_color: None,
            align: HAlign::Center,
            text_inset: Point::default(),
            antialias: true,
        }
    }
}
