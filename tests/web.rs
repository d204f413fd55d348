#![cfg(target_arch = "wasm32")]

use qr_export::{
    encode_to_raster, encode_to_vector, save_artifact, BrowserDownload, Config, EcLevel,
    EncodingRequest,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn downloads_png_through_anchor() {
    let raster = encode_to_raster(&EncodingRequest::new("https://example.com/", EcLevel::High))
        .expect("payload fits");
    save_artifact(&BrowserDownload, &raster, "qrcode.png").expect("download");
}

#[wasm_bindgen_test]
fn downloads_svg_through_blob_url() {
    let vector = encode_to_vector(&EncodingRequest::new("https://example.com/", EcLevel::High))
        .expect("payload fits");
    save_artifact(&BrowserDownload, &vector, "qrcode.svg").expect("download");
}

#[wasm_bindgen_test]
fn config_from_js_object() {
    let object = js_sys::Object::new();
    js_sys::Reflect::set(&object, &JsValue::from_str("scale"), &JsValue::from(6)).unwrap();
    js_sys::Reflect::set(
        &object,
        &JsValue::from_str("vectorFilename"),
        &JsValue::from_str("code.svg"),
    )
    .unwrap();

    let config = Config::from_js(&object).expect("valid config");
    assert_eq!(config.scale, 6);
    assert_eq!(config.vector_filename, "code.svg");
    assert_eq!(config.raster_filename, "qrcode.png");
}

#[wasm_bindgen_test]
fn config_defaults_for_undefined() {
    assert_eq!(Config::from_js(&JsValue::UNDEFINED), Ok(Config::default()));
}
