//! CSS color parsing for fill and stroke styles.
//!
//! Only the color syntax the engraving library actually emits is handled here:
//! a small keyword table, `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r,g,b)` and
//! `rgba(r,g,b,a)`. Anything else is a parse error, since an unexpected style string
//! means the library and the shim have drifted apart.

use crate::error::{Canvas2dError, Canvas2dResult};
use std::fmt;
use std::str::FromStr;

/// Keywords resolved through their hex spelling.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("none", "#0000"),
    ("transparent", "#0000"),
    ("black", "#000"),
    ("white", "#fff"),
    ("red", "#f00"),
    ("green", "#008000"),
    ("blue", "#00f"),
    ("purple", "#800080"),
    ("darkturquoise", "#00ced1"),
    ("tomato", "#ff6347"),
    ("lawngreen", "#7cfc00"),
    ("orange", "#ffa500"),
    ("brown", "#a52a2a"),
    ("lightgreen", "#90ee90"),
];

/// An RGBA color with each channel normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from 8-bit channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Format as `#rrggbbaa`.
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a)
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

impl From<Color> for tiny_skia::Color {
    fn from(c: Color) -> Self {
        tiny_skia::Color::from_rgba(
            c.r.clamp(0.0, 1.0),
            c.g.clamp(0.0, 1.0),
            c.b.clamp(0.0, 1.0),
            c.a.clamp(0.0, 1.0),
        )
        .unwrap_or(tiny_skia::Color::BLACK)
    }
}

/// Look up the hex spelling of a keyword from the shim's table.
pub fn named_color_hex(name: &str) -> Option<&'static str> {
    NAMED_COLORS
        .iter()
        .find(|(keyword, _)| *keyword == name)
        .map(|(_, hex)| *hex)
}

/// Parse a CSS color string into a [`Color`].
pub fn parse_color(text: &str) -> Canvas2dResult<Color> {
    if let Some(hex) = named_color_hex(text) {
        return parse_color(hex);
    }

    let parsed = if let Some(digits) = text.strip_prefix('#') {
        parse_hex(digits)
    } else if let Some(args) = function_args(text, "rgba") {
        parse_rgba(args)
    } else if let Some(args) = function_args(text, "rgb") {
        parse_rgb(args)
    } else {
        parse_css_keyword(text)
    };

    parsed.ok_or_else(|| Canvas2dError::ColorParseError(text.to_string()))
}

fn parse_hex(digits: &str) -> Option<Color> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    // Single digits are doubled: 0xF -> 0xFF.
    let short = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|d| d * 17);
    let pair = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();

    match digits.len() {
        3 => Some(Color::from_rgba8(short(0)?, short(1)?, short(2)?, 255)),
        4 => Some(Color::from_rgba8(short(0)?, short(1)?, short(2)?, short(3)?)),
        6 => Some(Color::from_rgba8(pair(0)?, pair(2)?, pair(4)?, 255)),
        8 => Some(Color::from_rgba8(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
        _ => None,
    }
}

/// Return the argument list of `name(...)`, without the parentheses.
fn function_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_channel(arg: &str) -> Option<u8> {
    let arg = arg.trim();
    if arg.is_empty() || !arg.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    arg.parse().ok()
}

fn parse_rgb(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').collect();
    let [r, g, b] = parts.as_slice() else {
        return None;
    };
    Some(Color::from_rgba8(
        parse_channel(r)?,
        parse_channel(g)?,
        parse_channel(b)?,
        255,
    ))
}

fn parse_rgba(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').collect();
    let [r, g, b, a] = parts.as_slice() else {
        return None;
    };
    let alpha = a.trim();
    if alpha.is_empty() || !alpha.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let alpha: f32 = alpha.parse().ok()?;
    let mut color = Color::from_rgba8(parse_channel(r)?, parse_channel(g)?, parse_channel(b)?, 0);
    color.a = alpha.clamp(0.0, 1.0);
    Some(color)
}

/// Keywords missing from the shim's table fall back to the full CSS name list.
fn parse_css_keyword(text: &str) -> Option<Color> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let parsed = csscolorparser::parse(text).ok()?;
    let [r, g, b, a] = parsed.to_array();
    Some(Color::new(r, g, b, a))
}
