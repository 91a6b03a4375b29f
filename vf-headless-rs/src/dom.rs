//! The slice of `document` the rendering library touches.

use crate::error::{HostError, HostResult};
use std::rc::Rc;
use vf_headless_canvas2d::{
    parse_font, Canvas, CanvasOptions, FontDescriptor, NativeSurface, SurfaceFactory,
};

/// Font applied to a fresh `<span>` before anything assigns `style.font`.
pub const DEFAULT_SPAN_FONT: &str = "30pt Bravura,Academico";

/// `span.style`: a font shorthand slot that keeps the raw text and its parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanStyle {
    raw: String,
    parsed: FontDescriptor,
}

impl Default for SpanStyle {
    fn default() -> Self {
        Self {
            raw: DEFAULT_SPAN_FONT.to_string(),
            parsed: FontDescriptor {
                family: vec!["Bravura".to_string(), "Academico".to_string()],
                size: 30.0,
                bold: false,
                italic: false,
            },
        }
    }
}

impl SpanStyle {
    /// Assign `style.font`. On failure the previous font is kept.
    pub fn set_raw(&mut self, text: &str) -> HostResult<()> {
        self.parsed = parse_font(text)?;
        self.raw = text.to_string();
        Ok(())
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> &FontDescriptor {
        &self.parsed
    }

    /// `style.font` read back as normalized shorthand.
    pub fn font(&self) -> String {
        self.parsed.to_string()
    }

    /// `style.fontFamily`, comma separated, multi-word names quoted.
    pub fn font_family(&self) -> String {
        self.parsed.family_list()
    }

    /// `style.fontSize`, always in points.
    pub fn font_size(&self) -> String {
        format!("{}pt", self.parsed.size)
    }

    pub fn set_font_size(&mut self, size_pt: f64) {
        self.parsed.size = size_pt;
        self.raw = self.parsed.to_string();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanElement {
    pub style: SpanStyle,
}

pub enum Element<S: NativeSurface> {
    Canvas(Canvas<S>),
    Span(SpanElement),
    /// Accepted and ignored.
    Script,
}

impl<S: NativeSurface> Element<S> {
    pub fn tag_name(&self) -> &'static str {
        match self {
            Element::Canvas(_) => "canvas",
            Element::Span(_) => "span",
            Element::Script => "script",
        }
    }

    pub fn into_canvas(self) -> Option<Canvas<S>> {
        match self {
            Element::Canvas(canvas) => Some(canvas),
            _ => None,
        }
    }

    pub fn into_span(self) -> Option<SpanElement> {
        match self {
            Element::Span(span) => Some(span),
            _ => None,
        }
    }
}

/// How `getElementById` behaves in this host.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ElementLookup {
    /// Lookups fail with [`HostError::ElementLookupUnavailable`].
    #[default]
    Unreachable,
    /// Every id resolves to a new canvas built from these options.
    Prebuilt(CanvasOptions),
}

impl ElementLookup {
    /// The 500x400 white canvas the standalone renderer exposes.
    pub fn renderer_canvas() -> Self {
        ElementLookup::Prebuilt(CanvasOptions::new(500, 400))
    }
}

pub struct Document<F: SurfaceFactory> {
    surfaces: Rc<F>,
    lookup: ElementLookup,
}

impl<F: SurfaceFactory> Document<F> {
    pub fn new(surfaces: Rc<F>, lookup: ElementLookup) -> Self {
        Self { surfaces, lookup }
    }

    pub fn surfaces(&self) -> &Rc<F> {
        &self.surfaces
    }

    pub fn element_lookup(&self) -> &ElementLookup {
        &self.lookup
    }

    /// `document.createElement(tag)` for `canvas`, `span` and `script`.
    pub fn create_element(&self, tag: &str) -> HostResult<Element<F::Surface>> {
        log::debug!(target: "host", "createElement('{tag}')");
        match tag.to_ascii_lowercase().as_str() {
            "canvas" => Ok(Element::Canvas(self.create_canvas()?)),
            "span" => Ok(Element::Span(SpanElement::default())),
            "script" => Ok(Element::Script),
            _ => Err(HostError::UnsupportedElement(tag.to_string())),
        }
    }

    /// A 1x1 measurement canvas, black on white, on a fresh surface.
    pub fn create_canvas(&self) -> HostResult<Canvas<F::Surface>> {
        Ok(Canvas::new(self.surfaces.as_ref(), &CanvasOptions::default())?)
    }

    pub fn get_element_by_id(&self, id: &str) -> HostResult<Canvas<F::Surface>> {
        match &self.lookup {
            ElementLookup::Unreachable => {
                Err(HostError::ElementLookupUnavailable(id.to_string()))
            }
            ElementLookup::Prebuilt(options) => {
                log::debug!(target: "host", "getElementById('{id}')");
                Ok(Canvas::new(self.surfaces.as_ref(), options)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use vf_headless_canvas2d::{Canvas2dError, RecordingSurfaceFactory};

    fn document(lookup: ElementLookup) -> Document<RecordingSurfaceFactory> {
        Document::new(Rc::new(RecordingSurfaceFactory), lookup)
    }

    #[test]
    fn test_span_defaults() {
        let style = SpanStyle::default();
        assert_eq!(style.raw(), DEFAULT_SPAN_FONT);
        assert_eq!(style.parsed(), &parse_font(DEFAULT_SPAN_FONT).unwrap());
        assert_eq!(style.font_size(), "30pt");
    }

    #[test]
    fn test_span_round_trip() {
        let mut style = SpanStyle::default();
        style.set_raw("italic 12px Academico, \"EB Garamond\"").unwrap();
        assert_eq!(style.raw(), "italic 12px Academico, \"EB Garamond\"");
        assert_eq!(style.font_size(), "9pt");
        assert_eq!(style.font_family(), "Academico,\"EB Garamond\"");
        assert_eq!(style.font(), "italic 9pt Academico,\"EB Garamond\"");
        assert!(style.parsed().italic);
    }

    #[test]
    fn test_span_bad_font_keeps_previous() {
        let mut style = SpanStyle::default();
        let err = style.set_raw("Bravura").unwrap_err();
        assert!(matches!(err, HostError::Canvas(Canvas2dError::FontParseError(_))));
        assert_eq!(style.raw(), DEFAULT_SPAN_FONT);
    }

    #[test]
    fn test_span_font_size_setter() {
        let mut style = SpanStyle::default();
        style.set_font_size(12.0);
        assert_eq!(style.font_size(), "12pt");
        assert_eq!(style.raw(), "12pt Bravura,Academico");
    }

    #[rstest]
    #[case("canvas")]
    #[case("span")]
    #[case("script")]
    #[case("SPAN")]
    fn test_supported_elements(#[case] tag: &str) {
        let element = document(ElementLookup::Unreachable).create_element(tag).unwrap();
        assert_eq!(element.tag_name(), tag.to_ascii_lowercase());
    }

    #[test]
    fn test_unsupported_element() {
        let err = document(ElementLookup::Unreachable)
            .create_element("div")
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Cannot create element 'div', not supported");
    }

    #[test]
    fn test_created_canvas_is_measurement_canvas() {
        let canvas = document(ElementLookup::Unreachable)
            .create_element("canvas")
            .unwrap()
            .into_canvas()
            .unwrap();
        assert_eq!((canvas.width(), canvas.height()), (1, 1));
        assert_eq!(canvas.background().to_hex(), "#ffffffff");
        assert_eq!(canvas.foreground().to_hex(), "#000000ff");
    }

    #[test]
    fn test_lookup_modes() {
        assert!(matches!(
            document(ElementLookup::Unreachable).get_element_by_id("vf"),
            Err(HostError::ElementLookupUnavailable(_))
        ));
        let canvas = document(ElementLookup::renderer_canvas())
            .get_element_by_id("vf")
            .unwrap();
        assert_eq!((canvas.width(), canvas.height()), (500, 400));
    }
}
