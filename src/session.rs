use crate::artifact::RasterArtifact;
use crate::config::Config;
use crate::download::{save_artifact, ArtifactSink, ExportError};
use crate::qr_generator::{
    encode_to_raster, encode_to_vector, EcLevel, EncodingError, EncodingRequest,
};

/// Level used for generation when the selector is not applied.
pub const GENERATION_LEVEL: EcLevel = EcLevel::High;

struct Generated {
    request: EncodingRequest,
    raster: RasterArtifact,
}

/// State behind one page view: the typed text, the level selector and the
/// code currently on display.
pub struct GeneratorSession {
    config: Config,
    text: String,
    selected_level: EcLevel,
    current: Option<Generated>,
    last_error: Option<String>,
}

impl GeneratorSession {
    pub fn new(config: Config) -> Self {
        Self {
            selected_level: config.initial_level,
            config,
            text: String::new(),
            current: None,
            last_error: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub fn selected_level(&self) -> EcLevel {
        self.selected_level
    }

    pub fn set_selected_level(&mut self, level: EcLevel) {
        self.selected_level = level;
    }

    pub fn generation_level(&self) -> EcLevel {
        if self.config.apply_selected_level {
            self.selected_level
        } else {
            GENERATION_LEVEL
        }
    }

    pub fn current(&self) -> Option<&RasterArtifact> {
        self.current.as_ref().map(|generated| &generated.raster)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn request(&self) -> EncodingRequest {
        EncodingRequest {
            payload: self.text.clone(),
            level: self.generation_level(),
            scale: self.config.scale,
            margin: self.config.margin,
            dark: self.config.dark,
            light: self.config.light,
        }
    }

    fn record_failure(&mut self, action: &str, message: String) {
        log::error!("Error {}: {}", action, message);
        self.last_error = Some(message);
    }

    /// Encodes the current text. A failure leaves the displayed code as it was.
    pub fn generate(&mut self) -> Result<&RasterArtifact, EncodingError> {
        let request = self.request();
        match encode_to_raster(&request) {
            Ok(raster) => {
                self.last_error = None;
                let generated = self.current.insert(Generated { request, raster });
                Ok(&generated.raster)
            }
            Err(err) => {
                self.record_failure("generating QR code", err.to_string());
                Err(err)
            }
        }
    }

    pub fn export_raster(&mut self, sink: &dyn ArtifactSink) -> Result<(), ExportError> {
        let result = match &self.current {
            None => Err(ExportError::NothingGenerated),
            Some(generated) => {
                save_artifact(sink, &generated.raster, &self.config.raster_filename)
            }
        };
        self.finish_export(result)
    }

    /// Re-encodes the request behind the displayed code as SVG, so text typed
    /// since the last generation does not leak into the download.
    pub fn export_vector(&mut self, sink: &dyn ArtifactSink) -> Result<(), ExportError> {
        let result = match &self.current {
            None => Err(ExportError::NothingGenerated),
            Some(generated) => encode_to_vector(&generated.request)
                .map_err(ExportError::from)
                .and_then(|vector| save_artifact(sink, &vector, &self.config.vector_filename)),
        };
        self.finish_export(result)
    }

    fn finish_export(&mut self, result: Result<(), ExportError>) -> Result<(), ExportError> {
        match &result {
            Ok(()) => self.last_error = None,
            Err(err) => self.record_failure("exporting QR code", err.to_string()),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::testing::RecordingSink;
    use crate::qr_generator::Color;

    fn session_with(text: &str) -> GeneratorSession {
        let mut session = GeneratorSession::new(Config::default());
        session.set_text(text.to_owned());
        session
    }

    #[test]
    fn generate_displays_raster() {
        let mut session = session_with("https://example.com/");
        assert!(session.current().is_none());

        let raster = session.generate().unwrap().clone();
        assert!(raster.data_url().starts_with("data:image/png;base64,"));
        assert_eq!(session.current(), Some(&raster));
        assert!(session.last_error().is_none());
    }

    #[test]
    fn selector_is_tracked_but_not_applied_by_default() {
        let mut session = session_with("level");
        assert_eq!(session.selected_level(), EcLevel::Medium);
        session.set_selected_level(EcLevel::Low);
        assert_eq!(session.selected_level(), EcLevel::Low);
        assert_eq!(session.generation_level(), EcLevel::High);

        // 2000 bytes fit at L but not at H.
        session.set_text("x".repeat(2000));
        assert!(session.generate().is_err());
    }

    #[test]
    fn selector_applies_when_configured() {
        let config = Config {
            apply_selected_level: true,
            ..Config::default()
        };
        let mut session = GeneratorSession::new(config);
        session.set_selected_level(EcLevel::Low);
        session.set_text("x".repeat(2000));
        assert_eq!(session.generation_level(), EcLevel::Low);
        assert!(session.generate().is_ok());
    }

    #[test]
    fn failed_generation_keeps_previous_code() {
        let mut session = session_with("first");
        let first = session.generate().unwrap().clone();

        session.set_text("x".repeat(4000));
        assert!(matches!(
            session.generate(),
            Err(EncodingError::DataTooLong { .. })
        ));
        assert_eq!(session.current(), Some(&first));
        assert!(session.last_error().is_some());

        session.set_text(String::new());
        assert!(matches!(
            session.generate(),
            Err(EncodingError::EmptyPayload)
        ));
        assert_eq!(session.current(), Some(&first));
    }

    #[test]
    fn latest_generation_wins() {
        let mut session = session_with("one");
        let first = session.generate().unwrap().clone();
        session.set_text("two".to_owned());
        let second = session.generate().unwrap().clone();

        assert_ne!(first, second);
        assert_eq!(session.current(), Some(&second));
    }

    #[test]
    fn exports_both_formats_with_default_names() {
        let sink = RecordingSink::default();
        let mut session = session_with("https://example.com/");
        let raster = session.generate().unwrap().clone();

        session.export_raster(&sink).unwrap();
        session.export_vector(&sink).unwrap();

        let saved = sink.saved.borrow();
        assert_eq!(saved.len(), 2);

        assert_eq!(saved[0].filename, "qrcode.png");
        assert_eq!(saved[0].mime_type, "image/png");
        assert_eq!(saved[0].contents, raster.png());

        assert_eq!(saved[1].filename, "qrcode.svg");
        assert_eq!(saved[1].mime_type, "image/svg+xml");
        let svg = std::str::from_utf8(&saved[1].contents).unwrap();
        assert!(svg.contains("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn vector_export_uses_generated_request() {
        let sink = RecordingSink::default();
        let config = Config {
            dark: Color([0x0f, 0x17, 0x2a, 0xff]),
            ..Config::default()
        };
        let mut session = GeneratorSession::new(config);
        session.set_text("generated".to_owned());
        session.generate().unwrap();

        session.set_text("x".repeat(4000));
        session.export_vector(&sink).unwrap();

        let expected = encode_to_vector(&EncodingRequest {
            dark: Color([0x0f, 0x17, 0x2a, 0xff]),
            ..EncodingRequest::new("generated", EcLevel::High)
        })
        .unwrap();
        assert_eq!(sink.saved.borrow()[0].contents, expected.svg().as_bytes());
    }

    #[test]
    fn export_without_code_fails() {
        let sink = RecordingSink::default();
        let mut session = session_with("not yet");
        assert!(matches!(
            session.export_raster(&sink),
            Err(ExportError::NothingGenerated)
        ));
        assert!(matches!(
            session.export_vector(&sink),
            Err(ExportError::NothingGenerated)
        ));
        assert!(sink.saved.borrow().is_empty());
        assert!(session.last_error().is_some());
    }

    #[test]
    fn sink_failure_keeps_displayed_code() {
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let mut session = session_with("stays");
        let raster = session.generate().unwrap().clone();

        assert!(session.export_raster(&sink).is_err());
        assert_eq!(session.current(), Some(&raster));
    }
}
