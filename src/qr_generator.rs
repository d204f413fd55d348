use std::convert::TryFrom;
use std::fmt;
use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use qrcodegen::{QrCode, QrCodeEcc, QrSegment, Version};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::{RasterArtifact, VectorArtifact};

pub const DEFAULT_SCALE: u32 = 4;
pub const DEFAULT_MARGIN: u32 = 4;
/// Largest edge, in pixels, of a rendered symbol including its quiet zone.
pub const MAX_EDGE_PIXELS: u32 = 4096;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("nothing to encode")]
    EmptyPayload,
    #[error("payload too long for error correction level {level}: {source}")]
    DataTooLong {
        level: EcLevel,
        source: qrcodegen::DataTooLong,
    },
    #[error("scale must be at least one pixel per module")]
    InvalidScale,
    #[error("scale {scale} with margin {margin} exceeds {}px per edge", MAX_EDGE_PIXELS)]
    ImageTooLarge { scale: u32, margin: u32 },
    #[error("failed writing PNG: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum EcLevel {
    #[serde(rename = "L")]
    Low,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "Q")]
    Quartile,
    #[serde(rename = "H")]
    High,
}

impl EcLevel {
    pub const ALL: [EcLevel; 4] = [
        EcLevel::Low,
        EcLevel::Medium,
        EcLevel::Quartile,
        EcLevel::High,
    ];

    pub fn letter(self) -> &'static str {
        match self {
            Self::Low => "L",
            Self::Medium => "M",
            Self::Quartile => "Q",
            Self::High => "H",
        }
    }

    pub fn from_letter(letter: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.letter().eq_ignore_ascii_case(letter))
    }

    fn ecc(self) -> QrCodeEcc {
        match self {
            Self::Low => QrCodeEcc::Low,
            Self::Medium => QrCodeEcc::Medium,
            Self::Quartile => QrCodeEcc::Quartile,
            Self::High => QrCodeEcc::High,
        }
    }
}

impl fmt::Display for EcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// RGBA module colour, written as `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const WHITE: Color = Color([255, 255, 255, 255]);

    fn rgb_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }

    fn alpha(self) -> u8 {
        self.0[3]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid colour {0:?}, expected #rrggbb or #rrggbbaa")]
pub struct InvalidColor(String);

impl TryFrom<&str> for Color {
    type Error = InvalidColor;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        let invalid = || InvalidColor(text.to_owned());
        let hex = text.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let expanded: String = match hex.len() {
            3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_owned(),
            _ => return Err(invalid()),
        };
        let mut rgba = [255u8; 4];
        for (i, channel) in rgba.iter_mut().enumerate().take(expanded.len() / 2) {
            *channel = u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Color(rgba))
    }
}

impl TryFrom<String> for Color {
    type Error = InvalidColor;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Color::try_from(text.as_str())
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02x}", self.rgb_hex(), self.alpha())
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct EncodingRequest {
    pub payload: String,
    pub level: EcLevel,
    pub scale: u32,
    pub margin: u32,
    pub dark: Color,
    pub light: Color,
}

impl EncodingRequest {
    pub fn new(payload: impl Into<String>, level: EcLevel) -> Self {
        Self {
            payload: payload.into(),
            level,
            scale: DEFAULT_SCALE,
            margin: DEFAULT_MARGIN,
            dark: Color::BLACK,
            light: Color::WHITE,
        }
    }
}

/// Encoded symbol plus its edge length in modules and pixels, margin included.
struct Symbol {
    qr: QrCode,
    modules: u32,
    pixels: u32,
}

fn encode_symbol(request: &EncodingRequest) -> Result<Symbol, EncodingError> {
    if request.payload.is_empty() {
        return Err(EncodingError::EmptyPayload);
    }
    if request.scale == 0 {
        return Err(EncodingError::InvalidScale);
    }

    // No ECL boosting: the symbol carries exactly the requested level.
    let segments = QrSegment::make_segments(&request.payload);
    let qr = QrCode::encode_segments_advanced(
        &segments,
        request.level.ecc(),
        Version::MIN,
        Version::MAX,
        None,
        false,
    )
    .map_err(|source| EncodingError::DataTooLong {
        level: request.level,
        source,
    })?;

    let too_large = || EncodingError::ImageTooLarge {
        scale: request.scale,
        margin: request.margin,
    };
    let modules = request
        .margin
        .checked_mul(2)
        .and_then(|quiet| quiet.checked_add(qr.size() as u32))
        .ok_or_else(too_large)?;
    let pixels = modules
        .checked_mul(request.scale)
        .filter(|&pixels| pixels <= MAX_EDGE_PIXELS)
        .ok_or_else(too_large)?;

    Ok(Symbol {
        qr,
        modules,
        pixels,
    })
}

/// Dark-module predicate over the symbol padded by `margin` light modules.
/// Coordinates stay below [`MAX_EDGE_PIXELS`], so they fit an `i32`.
fn is_dark(qr: &QrCode, margin: u32, x: u32, y: u32) -> bool {
    let x = x as i32 - margin as i32;
    let y = y as i32 - margin as i32;
    qr.get_module(x, y)
}

pub fn encode_to_raster(request: &EncodingRequest) -> Result<RasterArtifact, EncodingError> {
    let Symbol { qr, pixels: width, .. } = encode_symbol(request)?;

    let dark = Rgba(request.dark.0);
    let light = Rgba(request.light.0);
    let image = RgbaImage::from_fn(width, width, |x, y| {
        if is_dark(&qr, request.margin, x / request.scale, y / request.scale) {
            dark
        } else {
            light
        }
    });

    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, ImageFormat::Png)?;

    log::debug!(
        "encoded {} byte payload at level {} into {}px raster",
        request.payload.len(),
        request.level,
        width
    );
    Ok(RasterArtifact::from_png(png.into_inner(), width))
}

fn fill_attributes(color: Color) -> String {
    if color.alpha() == 255 {
        format!("fill=\"{}\"", color.rgb_hex())
    } else {
        format!(
            "fill=\"{}\" fill-opacity=\"{:.3}\"",
            color.rgb_hex(),
            f32::from(color.alpha()) / 255.0
        )
    }
}

pub fn encode_to_vector(request: &EncodingRequest) -> Result<VectorArtifact, EncodingError> {
    let Symbol {
        qr,
        modules,
        pixels,
    } = encode_symbol(request)?;
    let size = qr.size();

    let mut path = String::new();
    for y in 0..size {
        for x in 0..size {
            if qr.get_module(x, y) {
                if !path.is_empty() {
                    path.push(' ');
                }
                path.push_str(&format!(
                    "M{},{}h1v1h-1z",
                    x as u32 + request.margin,
                    y as u32 + request.margin
                ));
            }
        }
    }

    let mut svg = String::new();
    svg += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    svg += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{px}\" height=\"{px}\" viewBox=\"0 0 {m} {m}\" shape-rendering=\"crispEdges\" stroke=\"none\">\n",
        px = pixels,
        m = modules
    );
    svg += &format!(
        "\t<rect width=\"100%\" height=\"100%\" {}/>\n",
        fill_attributes(request.light)
    );
    svg += &format!("\t<path d=\"{}\" {}/>\n", path, fill_attributes(request.dark));
    svg += "</svg>\n";

    log::debug!(
        "encoded {} byte payload at level {} into {}px vector",
        request.payload.len(),
        request.level,
        pixels
    );
    Ok(VectorArtifact::from_svg(svg))
}
