//! Drawing state that can be saved and restored.

use crate::color::{parse_color, Color};
use crate::dom_matrix::DOMMatrix;
use crate::error::Canvas2dResult;
use crate::font_parser::{parse_font, FontDescriptor};

/// Browser default for `CanvasRenderingContext2D.font`.
pub const DEFAULT_FONT: &str = "10px sans-serif";

/// A font string together with its parsed form.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSlot {
    raw: String,
    parsed: FontDescriptor,
}

impl FontSlot {
    pub fn new(raw: &str) -> Canvas2dResult<Self> {
        Ok(Self {
            raw: raw.to_string(),
            parsed: parse_font(raw)?,
        })
    }

    /// Replace the font. Re-assigning the current string skips parsing.
    pub fn set(&mut self, raw: &str) -> Canvas2dResult<()> {
        if raw != self.raw {
            *self = Self::new(raw)?;
        }
        Ok(())
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> &FontDescriptor {
        &self.parsed
    }
}

/// A CSS color string together with its parsed form.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSlot {
    raw: String,
    color: Color,
}

impl StyleSlot {
    pub fn from_color(color: Color) -> Self {
        Self {
            raw: color.to_hex(),
            color,
        }
    }

    /// Replace the style. Re-assigning the current string skips parsing.
    pub fn set(&mut self, raw: &str) -> Canvas2dResult<()> {
        if raw != self.raw {
            self.color = parse_color(raw)?;
            self.raw = raw.to_string();
        }
        Ok(())
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Paint state carried across `save()`/`restore()`.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingState {
    pub font: FontSlot,
    pub fill_style: StyleSlot,
    pub stroke_style: StyleSlot,
    pub line_width: f64,
}

impl DrawingState {
    /// Initial state: default font, both styles set to `foreground`, 1px lines.
    pub fn new(foreground: Color) -> Canvas2dResult<Self> {
        Ok(Self {
            font: FontSlot::new(DEFAULT_FONT)?,
            fill_style: StyleSlot::from_color(foreground),
            stroke_style: StyleSlot::from_color(foreground),
            line_width: 1.0,
        })
    }
}

/// One entry of the save stack: the paint state plus the surface transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedState {
    pub state: DrawingState,
    pub transform: DOMMatrix,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_font_parses() {
        let slot = FontSlot::new(DEFAULT_FONT).unwrap();
        assert_eq!(slot.parsed().size, 7.5);
        assert_eq!(slot.parsed().primary_family(), Some("sans-serif"));
    }

    #[test]
    fn test_style_slot_keeps_raw_text() {
        let mut slot = StyleSlot::from_color(Color::BLACK);
        assert_eq!(slot.raw(), "#000000ff");
        slot.set("red").unwrap();
        assert_eq!(slot.raw(), "red");
        assert_eq!(slot.color(), Color::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_failed_set_leaves_slot_unchanged() {
        let mut slot = StyleSlot::from_color(Color::BLACK);
        assert!(slot.set("nonsense").is_err());
        assert_eq!(slot.color(), Color::BLACK);

        let mut font = FontSlot::new("12pt Lato").unwrap();
        assert!(font.set("Lato").is_err());
        assert_eq!(font.raw(), "12pt Lato");
    }
}
