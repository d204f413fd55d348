use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::qr_generator::{Color, EcLevel, DEFAULT_MARGIN, DEFAULT_SCALE};

/// Name of the optional page global holding a config object.
pub const CONFIG_GLOBAL: &str = "qrExportConfig";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_scale")]
    pub scale: u32,

    #[serde(default = "default_margin")]
    pub margin: u32,

    #[serde(default = "default_dark")]
    pub dark: Color,

    #[serde(default = "default_light")]
    pub light: Color,

    #[serde(default = "default_initial_level")]
    pub initial_level: EcLevel,

    /// Generation ignores the selector and uses `H` unless this is set.
    #[serde(default)]
    pub apply_selected_level: bool,

    #[serde(default = "default_raster_filename")]
    pub raster_filename: String,

    #[serde(default = "default_vector_filename")]
    pub vector_filename: String,

    #[serde(default = "default_log_level")]
    pub log_level: log::LevelFilter,
}

fn default_scale() -> u32 {
    DEFAULT_SCALE
}

fn default_margin() -> u32 {
    DEFAULT_MARGIN
}

fn default_dark() -> Color {
    Color::BLACK
}

fn default_light() -> Color {
    Color::WHITE
}

fn default_initial_level() -> EcLevel {
    EcLevel::Medium
}

fn default_raster_filename() -> String {
    "qrcode.png".to_string()
}

fn default_vector_filename() -> String {
    "qrcode.svg".to_string()
}

fn default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            margin: default_margin(),
            dark: default_dark(),
            light: default_light(),
            initial_level: default_initial_level(),
            apply_selected_level: false,
            raster_filename: default_raster_filename(),
            vector_filename: default_vector_filename(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Reads a config object handed over from JavaScript. `undefined` and
    /// `null` mean "use the defaults".
    #[allow(deprecated)]
    pub fn from_js(value: &JsValue) -> Result<Self, String> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        value.into_serde().map_err(|err| err.to_string())
    }

    /// Looks up [`CONFIG_GLOBAL`] on `window`; falls back to defaults when
    /// it is absent or malformed.
    pub fn load() -> Self {
        let global = web_sys::window().and_then(|window| {
            js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)).ok()
        });

        match global {
            None => Self::default(),
            Some(value) => Self::from_js(&value).unwrap_or_else(|err| {
                log::error!("ignoring invalid {}: {}", CONFIG_GLOBAL, err);
                Self::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.raster_filename, "qrcode.png");
        assert_eq!(config.vector_filename, "qrcode.svg");
        assert_eq!(config.initial_level, EcLevel::Medium);
        assert!(!config.apply_selected_level);
    }

    #[test]
    fn fields_are_camel_case() {
        let config: Config = serde_json::from_str(
            r##"{
                "scale": 8,
                "margin": 2,
                "dark": "#0f172a",
                "light": "#f8fafc80",
                "initialLevel": "Q",
                "applySelectedLevel": true,
                "rasterFilename": "code.png",
                "logLevel": "debug"
            }"##,
        )
        .unwrap();
        assert_eq!(config.scale, 8);
        assert_eq!(config.margin, 2);
        assert_eq!(config.dark, Color([0x0f, 0x17, 0x2a, 0xff]));
        assert_eq!(config.light, Color([0xf8, 0xfa, 0xfc, 0x80]));
        assert_eq!(config.initial_level, EcLevel::Quartile);
        assert!(config.apply_selected_level);
        assert_eq!(config.raster_filename, "code.png");
        assert_eq!(config.vector_filename, "qrcode.svg");
        assert_eq!(config.log_level, log::LevelFilter::Debug);
    }

    #[test]
    fn bad_colour_is_an_error() {
        assert!(serde_json::from_str::<Config>(r#"{"dark": "black"}"#).is_err());
        assert!(serde_json::from_str::<Config>(r#"{"initialLevel": "X"}"#).is_err());
    }
}
