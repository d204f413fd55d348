#![recursion_limit = "512"]
use wasm_bindgen::prelude::*;

pub mod app;
pub mod artifact;
pub mod config;
pub mod download;
mod logger;
pub mod qr_generator;
pub mod session;

pub use artifact::{Artifact, RasterArtifact, VectorArtifact};
pub use config::Config;
pub use download::{save_artifact, ArtifactSink, BrowserDownload, ExportError};
pub use qr_generator::{
    encode_to_raster, encode_to_vector, Color, EcLevel, EncodingError, EncodingRequest,
};
pub use session::GeneratorSession;

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();

    logger::init(log::LevelFilter::Info);
    let config = Config::load();
    logger::init(config.log_level);
    log::info!(
        "starting QR generator (scale {}, margin {})",
        config.scale,
        config.margin
    );

    yew::App::<app::Main>::new().mount_to_body_with_props(app::Props { config });

    Ok(())
}
