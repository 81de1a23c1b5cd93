// src/render/svg.rs

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// SVG document on top of `quick_xml::Writer`; elements are appended in paint
/// order and all text and attribute values are escaped by the writer.
pub struct SvgDocument {
    writer: Writer<Vec<u8>>,
}

impl SvgDocument {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let (w, h) = (width.to_string(), height.to_string());
        let view_box = format!("0 0 {} {}", w, h);
        let root = BytesStart::new("svg").with_attributes([
            ("xmlns", SVG_NS),
            ("width", w.as_str()),
            ("height", h.as_str()),
            ("viewBox", view_box.as_str()),
        ]);
        writer.write_event(Event::Start(root))?;
        Ok(Self { writer })
    }

    fn start(name: &str, attrs: &[(&str, String)]) -> BytesStart<'static> {
        let mut start = BytesStart::new(name.to_string());
        for (key, value) in attrs {
            start.push_attribute((*key, value.as_str()));
        }
        start
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, String)]) -> Result<()> {
        self.writer.write_event(Event::Empty(Self::start(name, attrs)))?;
        Ok(())
    }

    fn with_text(&mut self, name: &str, attrs: &[(&str, String)], text: &str) -> Result<()> {
        self.writer.write_event(Event::Start(Self::start(name, attrs)))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) -> Result<()> {
        self.empty(
            "rect",
            &[
                ("x", format!("{:.1}", x)),
                ("y", format!("{:.1}", y)),
                ("width", format!("{:.1}", w)),
                ("height", format!("{:.1}", h)),
                ("fill", fill.to_string()),
            ],
        )
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str) -> Result<()> {
        self.empty(
            "line",
            &[
                ("x1", format!("{:.1}", x1)),
                ("y1", format!("{:.1}", y1)),
                ("x2", format!("{:.1}", x2)),
                ("y2", format!("{:.1}", y2)),
                ("stroke", stroke.to_string()),
                ("stroke-width", "0.5".to_string()),
            ],
        )
    }

    /// A circle carrying a hover tooltip.
    pub fn marker(
        &mut self,
        id: &str,
        cx: f64,
        cy: f64,
        r: f64,
        fill: &str,
        tooltip: &str,
    ) -> Result<()> {
        let attrs = [
            ("class", format!("country {}", id)),
            ("cx", format!("{:.1}", cx)),
            ("cy", format!("{:.1}", cy)),
            ("r", format!("{:.1}", r)),
            ("fill", fill.to_string()),
            ("stroke", "#ffffff".to_string()),
            ("stroke-width", "0.5".to_string()),
        ];
        self.writer.write_event(Event::Start(Self::start("circle", &attrs)))?;
        self.with_text("title", &[], tooltip)?;
        self.writer.write_event(Event::End(BytesEnd::new("circle")))?;
        Ok(())
    }

    pub fn text(&mut self, x: f64, y: f64, size: u32, anchor: &str, content: &str) -> Result<()> {
        self.with_text(
            "text",
            &[
                ("x", format!("{:.1}", x)),
                ("y", format!("{:.1}", y)),
                ("font-family", "sans-serif".to_string()),
                ("font-size", size.to_string()),
                ("text-anchor", anchor.to_string()),
            ],
            content,
        )
    }

    pub fn finish(mut self) -> Result<String> {
        self.writer.write_event(Event::End(BytesEnd::new("svg")))?;
        String::from_utf8(self.writer.into_inner()).context("SVG output is not UTF-8")
    }
}

/// Linear interpolation between two RGB colours, on a log10 scale of the value.
#[derive(Debug, Clone, Copy)]
pub struct ColorRamp {
    pub low: (u8, u8, u8),
    pub high: (u8, u8, u8),
}

impl ColorRamp {
    pub fn shade(&self, value: u64, min: u64, max: u64) -> String {
        let t = if max <= min {
            1.0
        } else {
            let lo = (min.max(1) as f64).log10();
            let hi = (max.max(1) as f64).log10();
            let v = (value.max(1) as f64).log10();
            ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
        };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            mix(self.low.0, self.high.0),
            mix(self.low.1, self.high.1),
            mix(self.low.2, self.high.2)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_ends_and_degenerate_range() {
        let ramp = ColorRamp {
            low: (0xff, 0xff, 0xff),
            high: (0x00, 0x00, 0x00),
        };
        assert_eq!(ramp.shade(10, 10, 1000), "#ffffff");
        assert_eq!(ramp.shade(1000, 10, 1000), "#000000");
        assert_eq!(ramp.shade(100, 10, 1000), "#808080");
        assert_eq!(ramp.shade(5, 5, 5), "#000000");
    }

    #[test]
    fn document_wraps_elements() -> Result<()> {
        let mut doc = SvgDocument::new(100, 50)?;
        doc.text(50.0, 10.0, 12, "middle", "a < b & c")?;
        let svg = doc.finish()?;
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 100 50""#));
        assert!(svg.contains(">a &lt; b &amp; c</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
        Ok(())
    }

    #[test]
    fn markup_in_attributes_and_tooltips_is_escaped() -> Result<()> {
        let mut doc = SvgDocument::new(10, 10)?;
        doc.marker("x\"y", 1.0, 2.0, 3.0, "#123456", "<b>Tom & Jerry</b>")?;
        let svg = doc.finish()?;
        assert!(svg.contains("&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;</title></circle>"));
        assert!(!svg.contains("x\"y"));
        assert!(svg.contains(r#"cx="1.0""#));
        assert!(svg.contains(r##"fill="#123456""##));
        Ok(())
    }
}
