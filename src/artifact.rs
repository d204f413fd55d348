use base64::{engine::general_purpose::STANDARD, Engine as _};

pub const PNG_MIME: &str = "image/png";
pub const SVG_MIME: &str = "image/svg+xml";

/// Encoded PNG of a symbol together with its data URI.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RasterArtifact {
    png: Vec<u8>,
    width: u32,
    data_url: String,
}

impl RasterArtifact {
    pub(crate) fn from_png(png: Vec<u8>, width: u32) -> Self {
        let data_url = format!("data:{};base64,{}", PNG_MIME, STANDARD.encode(&png));
        Self {
            png,
            width,
            data_url,
        }
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Edge length in pixels; the image is square.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn mime_type(&self) -> &'static str {
        PNG_MIME
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VectorArtifact {
    svg: String,
}

impl VectorArtifact {
    pub(crate) fn from_svg(svg: String) -> Self {
        Self { svg }
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn mime_type(&self) -> &'static str {
        SVG_MIME
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Artifact<'a> {
    Raster(&'a RasterArtifact),
    Vector(&'a VectorArtifact),
}

impl Artifact<'_> {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Raster(raster) => raster.mime_type(),
            Self::Vector(vector) => vector.mime_type(),
        }
    }

    /// Raw file contents as they would be written to disk.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Raster(raster) => raster.png(),
            Self::Vector(vector) => vector.svg().as_bytes(),
        }
    }
}

impl<'a> From<&'a RasterArtifact> for Artifact<'a> {
    fn from(raster: &'a RasterArtifact) -> Self {
        Self::Raster(raster)
    }
}

impl<'a> From<&'a VectorArtifact> for Artifact<'a> {
    fn from(vector: &'a VectorArtifact) -> Self {
        Self::Vector(vector)
    }
}
