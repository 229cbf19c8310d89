//! The render target: an SVG element inside a host document.
//!
//! The host document is kept verbatim; appended elements are spliced in front of the canvas's
//! closing tag when the document is serialized, so surrounding markup survives untouched.

use crate::fmt::{escape_xml_into, fmt_attr};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SvgElement {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SvgElement>,
}

impl SvgElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute, replacing an earlier value of the same name.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    pub fn child(mut self, child: SvgElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_xml_into(out, value);
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_into(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }
}

#[derive(Debug, Clone)]
pub struct SvgCanvas {
    source: String,
    /// Byte offset of the canvas's closing tag (or of `/>` when self-closing).
    insert_at: usize,
    self_closing: bool,
    tag: String,
    width: f64,
    height: f64,
    appended: Vec<SvgElement>,
}

impl SvgCanvas {
    /// Locates the first `<svg>` element of `document` and reads its declared size.
    pub fn parse(document: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(document).map_err(|e| Error::InvalidDocument {
            message: e.to_string(),
        })?;
        let node = doc
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "svg")
            .ok_or(Error::RenderTargetMissing)?;

        let width = parse_dimension(node.attribute("width")).ok_or_else(|| {
            Error::InvalidCanvasSize {
                attribute: "width",
                value: node.attribute("width").map(str::to_string),
            }
        })?;
        let height = parse_dimension(node.attribute("height")).ok_or_else(|| {
            Error::InvalidCanvasSize {
                attribute: "height",
                value: node.attribute("height").map(str::to_string),
            }
        })?;

        let range = node.range();
        let element = &document[range.clone()];
        let tag = element[1..]
            .split(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .next()
            .unwrap_or("svg")
            .to_string();

        let (insert_at, self_closing) = if element.ends_with("/>") {
            (range.end - 2, true)
        } else {
            let close = element
                .rfind("</")
                .ok_or_else(|| Error::InvalidDocument {
                    message: "canvas element has no closing tag".to_string(),
                })?;
            (range.start + close, false)
        };

        tracing::debug!(width, height, tag = %tag, "canvas located");

        Ok(Self {
            source: document.to_string(),
            insert_at,
            self_closing,
            tag,
            width,
            height,
            appended: Vec::new(),
        })
    }

    /// A standalone SVG document of the given size.
    pub fn blank(width: f64, height: f64) -> Self {
        let source = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}"></svg>"#,
            fmt_attr(width),
            fmt_attr(height)
        );
        let insert_at = source.len() - "</svg>".len();
        Self {
            source,
            insert_at,
            self_closing: false,
            tag: "svg".to_string(),
            width,
            height,
            appended: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Appends a child to the canvas and returns its index among appended elements.
    pub fn append(&mut self, element: SvgElement) -> usize {
        self.appended.push(element);
        self.appended.len() - 1
    }

    pub fn appended(&self) -> &[SvgElement] {
        &self.appended
    }

    pub fn appended_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a SvgElement> {
        self.appended.iter().filter(move |e| e.tag == tag)
    }

    pub fn to_svg_string(&self) -> String {
        let mut children = String::new();
        for el in &self.appended {
            el.write_into(&mut children);
        }

        let mut out = String::with_capacity(self.source.len() + children.len() + 8);
        out.push_str(&self.source[..self.insert_at]);
        if self.self_closing {
            if children.is_empty() {
                out.push_str(&self.source[self.insert_at..]);
                return out;
            }
            out.push('>');
            out.push_str(&children);
            out.push_str("</");
            out.push_str(&self.tag);
            out.push('>');
            out.push_str(&self.source[self.insert_at + 2..]);
        } else {
            out.push_str(&children);
            out.push_str(&self.source[self.insert_at..]);
        }
        out
    }
}

/// Parses a user-unit or `px` length; percentages and other units are not numeric.
fn parse_dimension(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    let number = raw.strip_suffix("px").unwrap_or(raw).trim_end();
    let v = number.parse::<f64>().ok()?;
    (v.is_finite() && v >= 0.0).then_some(v)
}
