//! CSS font shorthand parsing.
//!
//! Parses strings like "bold 12pt Lato" or `9pt Academico,"EB Garamond"` into a
//! [`FontDescriptor`]. Sizes are kept in points, which is the unit the engraving
//! library emits.

use crate::error::{Canvas2dError, Canvas2dResult};
use std::fmt;
use std::str::FromStr;

/// Points per CSS pixel.
const PT_PER_PX: f64 = 3.0 / 4.0;

/// Parsed font shorthand.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font families in order of preference. Only the first one is used for drawing.
    pub family: Vec<String>,
    /// Font size in points.
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: vec![family.into()],
            size,
            bold: false,
            italic: false,
        }
    }

    /// The family used for measurement and drawing.
    pub fn primary_family(&self) -> Option<&str> {
        self.family.first().map(String::as_str)
    }

    /// Font size in CSS pixels.
    pub fn size_px(&self) -> f64 {
        self.size / PT_PER_PX
    }

    /// Families joined with commas, multi-word names quoted.
    pub fn family_list(&self) -> String {
        self.family
            .iter()
            .map(|name| {
                if name.contains(char::is_whitespace) {
                    format!("\"{name}\"")
                } else {
                    name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bold {
            f.write_str("bold ")?;
        }
        if self.italic {
            f.write_str("italic ")?;
        }
        write!(f, "{}pt", self.size)?;
        if !self.family.is_empty() {
            write!(f, " {}", self.family_list())?;
        }
        Ok(())
    }
}

impl FromStr for FontDescriptor {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_font(s)
    }
}

/// Parse a CSS font shorthand string.
///
/// Keyword tokens (`bold`, `italic`, `oblique`, `normal`, numeric weights) may appear
/// anywhere relative to the size and family tokens. When more than one family token is
/// present the last one wins.
pub fn parse_font(text: &str) -> Canvas2dResult<FontDescriptor> {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Err(Canvas2dError::FontParseError(
            "font string is empty".to_string(),
        ));
    }

    let mut size = None;
    let mut family = Vec::new();
    let mut bold = false;
    let mut italic = false;

    for token in &tokens {
        match token.as_str() {
            "bold" | "bolder" => bold = true,
            "italic" | "oblique" => italic = true,
            "normal" | "small-caps" => {}
            _ => {
                if let Some(weight) = parse_numeric_weight(token) {
                    bold = weight >= 600;
                } else if let Some(pt) = parse_size(token) {
                    size = Some(pt);
                } else {
                    family = parse_families(token);
                }
            }
        }
    }

    let size = size.ok_or_else(|| {
        Canvas2dError::FontParseError(format!("no font size in {text:?}"))
    })?;

    Ok(FontDescriptor {
        family,
        size,
        bold,
        italic,
    })
}

/// Split on whitespace that is not inside double quotes.
///
/// A family list written with spaces after its commas (`Academico, "EB Garamond"`)
/// stays a single token.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in text.chars() {
        if c == '"' {
            quoted = !quoted;
            current.push(c);
        } else if c.is_whitespace() && !quoted {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    let mut merged: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match merged.last_mut() {
            Some(prev) if prev.ends_with(',') || token.starts_with(',') => prev.push_str(&token),
            _ => merged.push(token),
        }
    }
    merged
}

fn parse_numeric_weight(token: &str) -> Option<u16> {
    if !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let weight: u16 = token.parse().ok()?;
    ((100..=900).contains(&weight) && weight % 100 == 0).then_some(weight)
}

/// `<number>pt` or `<number>px`, returned in points.
fn parse_size(token: &str) -> Option<f64> {
    let (number, factor) = if let Some(n) = token.strip_suffix("pt") {
        (n, 1.0)
    } else if let Some(n) = token.strip_suffix("px") {
        (n, PT_PER_PX)
    } else {
        return None;
    };

    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let value: f64 = number.parse().ok()?;
    value.is_finite().then_some(value * factor)
}

fn parse_families(token: &str) -> Vec<String> {
    token
        .split(',')
        .map(|name| name.trim().trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
