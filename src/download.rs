use js_sys::Array;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::artifact::Artifact;
use crate::qr_generator::EncodingError;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no browser window available")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("generate a QR code before downloading it")]
    NothingGenerated,
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error("browser refused the download: {0}")]
    Dom(String),
}

impl From<JsValue> for ExportError {
    fn from(value: JsValue) -> Self {
        let message = match value.dyn_ref::<js_sys::Error>() {
            Some(err) => String::from(err.to_string()),
            None => value.as_string().unwrap_or_else(|| format!("{:?}", value)),
        };
        Self::Dom(message)
    }
}

/// Host mechanism that turns an artifact into a file on the user's side.
pub trait ArtifactSink {
    fn save(&self, artifact: Artifact<'_>, filename: &str) -> Result<(), ExportError>;
}

/// Saves through a transient `<a download>` element in the current page.
#[derive(Clone, Copy, Default, Debug)]
pub struct BrowserDownload;

impl BrowserDownload {
    fn click_anchor(href: &str, filename: &str) -> Result<(), ExportError> {
        let document = web_sys::window()
            .ok_or(ExportError::NoWindow)?
            .document()
            .ok_or(ExportError::NoDocument)?;

        let a: HtmlAnchorElement = document.create_element("A")?.unchecked_into();
        a.set_href(href);
        a.set_download(filename);
        a.click();
        Ok(())
    }
}

impl ArtifactSink for BrowserDownload {
    fn save(&self, artifact: Artifact<'_>, filename: &str) -> Result<(), ExportError> {
        match artifact {
            Artifact::Raster(raster) => Self::click_anchor(raster.data_url(), filename),
            Artifact::Vector(vector) => {
                let options = BlobPropertyBag::new();
                options.set_type(vector.mime_type());
                let blob = Blob::new_with_str_sequence_and_options(
                    &Array::of1(&JsValue::from_str(vector.svg())),
                    &options,
                )?;

                let blob_url = Url::create_object_url_with_blob(&blob)?;
                let clicked = Self::click_anchor(&blob_url, filename);
                Url::revoke_object_url(&blob_url)?;
                clicked
            }
        }
    }
}

pub fn save_artifact<'a, S, A>(sink: &S, artifact: A, filename: &str) -> Result<(), ExportError>
where
    S: ArtifactSink + ?Sized,
    A: Into<Artifact<'a>>,
{
    let artifact = artifact.into();
    sink.save(artifact, filename)?;
    log::info!(
        "saved {} ({}, {} bytes)",
        filename,
        artifact.mime_type(),
        artifact.bytes().len()
    );
    Ok(())
}
