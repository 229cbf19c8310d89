#![forbid(unsafe_code)]

use crate::{MeshViewConfig, SvgCanvas};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Render(#[from] crate::Error),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("invalid background color `{0}`")]
    Background(String),
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    /// `None` keeps the background transparent.
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
        }
    }
}

/// Fetches, renders and rasterizes in one go.
pub async fn fetch_and_render_png(
    config: &MeshViewConfig,
    host: Option<&str>,
    raster: &RasterOptions,
) -> Result<Vec<u8>> {
    let svg = crate::fetch_and_render_svg(config, host).await?;
    svg_to_png(&svg, raster)
}

pub fn canvas_to_png(canvas: &SvgCanvas, options: &RasterOptions) -> Result<Vec<u8>> {
    svg_to_png(&canvas.to_svg_string(), options)
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options.scale, options.background.as_deref())?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

fn svg_to_pixmap(svg: &str, scale: f32, background: Option<&str>) -> Result<tiny_skia::Pixmap> {
    // Host documents may wrap the canvas in other markup; usvg wants the `<svg>` itself.
    let svg = outermost_svg(svg).unwrap_or(svg);
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;

    if let Some(bg) = background {
        let color =
            parse_tiny_skia_color(bg).ok_or_else(|| RasterError::Background(bg.to_string()))?;
        pixmap.fill(color);
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn outermost_svg(text: &str) -> Option<&str> {
    let start = text.find("<svg")?;
    let end = text.rfind("</svg>")? + "</svg>".len();
    (start < end).then(|| &text[start..end])
}

fn parse_tiny_skia_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255)),
        "black" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 255)),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    fn hex2(b: &[u8]) -> Option<u8> {
        let hi = (*b.first()? as char).to_digit(16)? as u8;
        let lo = (*b.get(1)? as char).to_digit(16)? as u8;
        Some((hi << 4) | lo)
    }
    fn hex1(c: u8) -> Option<u8> {
        let v = (c as char).to_digit(16)? as u8;
        Some((v << 4) | v)
    }

    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => Some(tiny_skia::Color::from_rgba8(
            hex1(bytes[0])?,
            hex1(bytes[1])?,
            hex1(bytes[2])?,
            255,
        )),
        6 => Some(tiny_skia::Color::from_rgba8(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            255,
        )),
        8 => Some(tiny_skia::Color::from_rgba8(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            hex2(&bytes[6..8])?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MeshRenderOptions, render_grid_json};

    #[test]
    fn rendered_canvas_rasterizes_at_scale() {
        let mut canvas = SvgCanvas::blank(40.0, 30.0);
        let body = r#"{"nx":2,"ny":2,"dx":1,"dy":1,"mesh":{"segments":[
            {"a":{"x":0,"y":0}},{"a":{"x":2,"y":0}},{"a":{"x":2,"y":2}}]}}"#;
        render_grid_json(body, &mut canvas, &MeshRenderOptions::default()).unwrap();

        let options = RasterOptions {
            scale: 2.0,
            background: Some("white".to_string()),
        };
        let bytes = canvas_to_png(&canvas, &options).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
        // IHDR width/height follow the 8-byte signature and the chunk header.
        let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
        assert_eq!((width, height), (80, 60));
    }

    #[test]
    fn bad_background_is_rejected() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#;
        let options = RasterOptions {
            scale: 1.0,
            background: Some("not-a-color".to_string()),
        };
        assert!(matches!(
            svg_to_png(svg, &options),
            Err(RasterError::Background(_))
        ));
    }

    #[test]
    fn colors_parse_like_css_hex() {
        assert!(parse_tiny_skia_color("#fff").is_some());
        assert!(parse_tiny_skia_color("#00000080").is_some());
        assert!(parse_tiny_skia_color("steelblue").is_none());
    }
}
