//! Minimal reader for keymap-drawer SVG output.
//!
//! Only the structure the exporters need is recovered: the root `<svg>`
//! attributes and the raw markup of every top-level child element. Nested
//! content is kept verbatim and never interpreted. Attribute values are
//! stored as written (entities are not decoded).

use crate::svg::layers::{parse_translate, Layer};
use std::fmt::Write as _;

/// Width assumed when the root has no usable `width`.
pub const DEFAULT_SVG_WIDTH: f64 = 960.0;

/// Height assumed when the root has no usable `height`.
pub const DEFAULT_SVG_HEIGHT: f64 = 2508.0;

/// Errors raised while reading an SVG document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SvgError {
    /// No element found at all
    #[error("no root element found")]
    NoRootElement,
    /// Root element is not `<svg>`
    #[error("root element is <{0}>, expected <svg>")]
    UnexpectedRoot(String),
    /// Comment, CDATA, processing instruction or tag runs to end of input
    #[error("unterminated {construct} starting at byte {offset}")]
    Unterminated {
        /// What was left open
        construct: &'static str,
        /// Byte offset of its start
        offset: usize,
    },
    /// Tag syntax not understood
    #[error("malformed tag at byte {0}")]
    MalformedTag(usize),
    /// Closing tag does not match the open element
    #[error("mismatched closing tag </{found}> at byte {offset}")]
    MismatchedClose {
        /// Name in the closing tag
        found: String,
        /// Byte offset of the closing tag
        offset: usize,
    },
    /// Input ends before `</svg>`
    #[error("missing closing </svg>")]
    UnclosedRoot,
}

/// A top-level child of the root `<svg>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    raw: String,
    open_tag_len: usize,
    self_closing: bool,
}

impl Element {
    /// Tag name, including any namespace prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value as written in the source.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        find_attr(&self.attrs, name)
    }

    /// Complete markup of the element.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Layer name if this is a `<g class="layer-NAME">` group.
    #[must_use]
    pub fn layer_name(&self) -> Option<&str> {
        if self.name != "g" {
            return None;
        }
        self.attr("class")?.strip_prefix("layer-")
    }

    /// Markup of the element with `name` set to `value`.
    ///
    /// An existing attribute keeps its position; a new one is appended.
    #[must_use]
    pub fn with_attr(&self, name: &str, value: &str) -> String {
        let mut attrs = self.attrs.clone();
        set_attr(&mut attrs, name, value);

        let mut out = format!("<{}", self.name);
        write_attrs(&mut out, &attrs);
        if self.self_closing {
            out.push_str("/>");
        } else {
            out.push('>');
            out.push_str(&self.raw[self.open_tag_len..]);
        }
        out
    }
}

/// Parsed SVG document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    root_attrs: Vec<(String, String)>,
    children: Vec<Element>,
}

impl SvgDocument {
    /// Parses the document structure.
    pub fn parse(src: &str) -> Result<Self, SvgError> {
        let mut pos = 0;

        let root = loop {
            let Some(rel) = src[pos..].find('<') else {
                return Err(SvgError::NoRootElement);
            };
            let start = pos + rel;
            if let Some(end) = skip_markup(src, start)? {
                pos = end;
                continue;
            }
            let tag = parse_open_tag(src, start)?;
            if tag.name != "svg" {
                return Err(SvgError::UnexpectedRoot(tag.name));
            }
            break tag;
        };

        if root.self_closing {
            return Ok(Self {
                root_attrs: root.attrs,
                children: Vec::new(),
            });
        }

        let mut children = Vec::new();
        let mut stack: Vec<String> = Vec::new();
        let mut current: Option<(usize, OpenTag)> = None;
        pos = root.end;

        loop {
            let Some(rel) = src[pos..].find('<') else {
                return Err(SvgError::UnclosedRoot);
            };
            let start = pos + rel;

            if let Some(end) = skip_markup(src, start)? {
                pos = end;
                continue;
            }

            if src[start..].starts_with("</") {
                let (name, end) = parse_close_tag(src, start)?;
                match stack.pop() {
                    None => {
                        if name != "svg" {
                            return Err(SvgError::MismatchedClose {
                                found: name,
                                offset: start,
                            });
                        }
                        return Ok(Self {
                            root_attrs: root.attrs,
                            children,
                        });
                    }
                    Some(open) if open == name => {
                        if stack.is_empty() {
                            if let Some((child_start, tag)) = current.take() {
                                children.push(element(src, child_start, end, tag));
                            }
                        }
                    }
                    Some(_) => {
                        return Err(SvgError::MismatchedClose {
                            found: name,
                            offset: start,
                        })
                    }
                }
                pos = end;
                continue;
            }

            let tag = parse_open_tag(src, start)?;
            let end = tag.end;
            if stack.is_empty() {
                if tag.self_closing {
                    children.push(element(src, start, end, tag));
                } else {
                    stack.push(tag.name.clone());
                    current = Some((start, tag));
                }
            } else if !tag.self_closing {
                stack.push(tag.name);
            }
            pos = end;
        }
    }

    /// Root attribute value as written in the source.
    #[must_use]
    pub fn root_attr(&self, name: &str) -> Option<&str> {
        find_attr(&self.root_attrs, name)
    }

    /// Root attributes in source order.
    #[must_use]
    pub fn root_attrs(&self) -> &[(String, String)] {
        &self.root_attrs
    }

    /// Top-level child elements in source order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Numeric root width, [`DEFAULT_SVG_WIDTH`] when missing.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.root_attr("width")
            .and_then(parse_length)
            .unwrap_or(DEFAULT_SVG_WIDTH)
    }

    /// Numeric root height, [`DEFAULT_SVG_HEIGHT`] when missing.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.root_attr("height")
            .and_then(parse_length)
            .unwrap_or(DEFAULT_SVG_HEIGHT)
    }

    /// Top-level layer groups with their offsets and heights.
    #[must_use]
    pub fn layers(&self) -> Vec<Layer> {
        let mut layers: Vec<Layer> = self
            .children
            .iter()
            .filter_map(|child| {
                let name = child.layer_name()?;
                let (x, y) = child
                    .attr("transform")
                    .and_then(parse_translate)
                    .unwrap_or((0.0, 0.0));
                Some(Layer {
                    name: name.to_string(),
                    x,
                    y_offset: y,
                    height: 0.0,
                })
            })
            .collect();
        crate::svg::layers::compute_layer_heights(&mut layers, self.height());
        layers
    }

    /// Root attributes with `overrides` applied.
    #[must_use]
    pub fn root_attrs_with(&self, overrides: &[(&str, String)]) -> Vec<(String, String)> {
        let mut attrs = self.root_attrs.clone();
        for (name, value) in overrides {
            set_attr(&mut attrs, name, value);
        }
        attrs
    }
}

/// Serializes a standalone SVG document.
#[must_use]
pub fn render_document<I, S>(root_attrs: &[(String, String)], children: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::from("<?xml version='1.0' encoding='utf-8'?>\n<svg");
    write_attrs(&mut out, root_attrs);
    out.push_str(">\n");
    for child in children {
        out.push_str("  ");
        out.push_str(child.as_ref());
        out.push('\n');
    }
    out.push_str("</svg>\n");
    out
}

/// Formats a coordinate without a trailing `.0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

fn parse_length(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    number.trim().parse().ok()
}

fn find_attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn set_attr(attrs: &mut Vec<(String, String)>, name: &str, value: &str) {
    if let Some(slot) = attrs.iter_mut().find(|(key, _)| key == name) {
        slot.1 = value.to_string();
    } else {
        attrs.push((name.to_string(), value.to_string()));
    }
}

fn write_attrs(out: &mut String, attrs: &[(String, String)]) {
    for (key, value) in attrs {
        let _ = write!(out, " {}=\"{}\"", key, value.replace('"', "&quot;"));
    }
}

fn element(src: &str, start: usize, end: usize, tag: OpenTag) -> Element {
    Element {
        open_tag_len: tag.end - start,
        self_closing: tag.self_closing,
        name: tag.name,
        attrs: tag.attrs,
        raw: src[start..end].to_string(),
    }
}

struct OpenTag {
    name: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
    end: usize,
}

/// Skips comments, CDATA, processing instructions and declarations.
///
/// Returns the offset after the construct, or `None` if `start` begins a tag.
fn skip_markup(src: &str, start: usize) -> Result<Option<usize>, SvgError> {
    let rest = &src[start..];
    let (construct, terminator) = if rest.starts_with("<!--") {
        ("comment", "-->")
    } else if rest.starts_with("<![CDATA[") {
        ("CDATA section", "]]>")
    } else if rest.starts_with("<?") {
        ("processing instruction", "?>")
    } else if rest.starts_with("<!") {
        if let Some(bracket) = rest.find('[').filter(|b| rest[..*b].find('>').is_none()) {
            let close = rest[bracket..]
                .find("]>")
                .ok_or(SvgError::Unterminated {
                    construct: "declaration",
                    offset: start,
                })?;
            return Ok(Some(start + bracket + close + 2));
        }
        ("declaration", ">")
    } else {
        return Ok(None);
    };

    rest.find(terminator)
        .map(|end| Some(start + end + terminator.len()))
        .ok_or(SvgError::Unterminated {
            construct,
            offset: start,
        })
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b':' | b'_' | b'-' | b'.') || c >= 0x80
}

fn parse_open_tag(src: &str, start: usize) -> Result<OpenTag, SvgError> {
    let bytes = src.as_bytes();
    let mut i = start + 1;

    let name_start = i;
    while i < bytes.len() && is_name_char(bytes[i]) {
        i += 1;
    }
    if i == name_start {
        return Err(SvgError::MalformedTag(start));
    }
    let name = src[name_start..i].to_string();

    let mut attrs = Vec::new();
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i) {
            None => {
                return Err(SvgError::Unterminated {
                    construct: "tag",
                    offset: start,
                })
            }
            Some(b'>') => {
                return Ok(OpenTag {
                    name,
                    attrs,
                    self_closing: false,
                    end: i + 1,
                })
            }
            Some(b'/') => {
                if bytes.get(i + 1) == Some(&b'>') {
                    return Ok(OpenTag {
                        name,
                        attrs,
                        self_closing: true,
                        end: i + 2,
                    });
                }
                return Err(SvgError::MalformedTag(start));
            }
            Some(_) => {}
        }

        let key_start = i;
        while i < bytes.len() && is_name_char(bytes[i]) {
            i += 1;
        }
        if i == key_start {
            return Err(SvgError::MalformedTag(start));
        }
        let key = src[key_start..i].to_string();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            return Err(SvgError::MalformedTag(start));
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let quote = match bytes.get(i) {
            Some(q @ (b'"' | b'\'')) => *q,
            _ => return Err(SvgError::MalformedTag(start)),
        };
        i += 1;
        let value_start = i;
        while i < bytes.len() && bytes[i] != quote {
            i += 1;
        }
        if i >= bytes.len() {
            return Err(SvgError::Unterminated {
                construct: "attribute value",
                offset: value_start,
            });
        }
        attrs.push((key, src[value_start..i].to_string()));
        i += 1;
    }
}

fn parse_close_tag(src: &str, start: usize) -> Result<(String, usize), SvgError> {
    let rest = &src[start + 2..];
    let end = rest.find('>').ok_or(SvgError::Unterminated {
        construct: "closing tag",
        offset: start,
    })?;
    let name = rest[..end].trim();
    if name.is_empty() {
        return Err(SvgError::MalformedTag(start));
    }
    Ok((name.to_string(), start + 2 + end + 1))
}
