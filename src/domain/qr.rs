//! QR request value types.
//!
//! Both enumerations are validated at the single point they are parsed;
//! once a value exists it is guaranteed to be a member of the closed set,
//! so nothing downstream re-checks it. The short forms (`m`, `png`, ...)
//! match the wire values of the original service.

use std::str::FromStr;

use qrcode::EcLevel;

use super::error::DomainError;

/// Requested error-correction level for the QR symbol.
///
/// Selects what fraction of the symbol can be reconstructed when damaged,
/// trading damage tolerance against symbol size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorCorrectionLevel {
    Low,
    #[default]
    Medium,
    Quartile,
    High,
}

impl ErrorCorrectionLevel {
    /// Resolve to the encoder's correction constant. Fixed 1:1 table.
    pub fn ec_level(self) -> EcLevel {
        match self {
            ErrorCorrectionLevel::Low => EcLevel::L,
            ErrorCorrectionLevel::Medium => EcLevel::M,
            ErrorCorrectionLevel::Quartile => EcLevel::Q,
            ErrorCorrectionLevel::High => EcLevel::H,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCorrectionLevel::Low => "low",
            ErrorCorrectionLevel::Medium => "medium",
            ErrorCorrectionLevel::Quartile => "quartile",
            ErrorCorrectionLevel::High => "high",
        }
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "low" | "l" => Ok(Self::Low),
            "medium" | "m" => Ok(Self::Medium),
            "quartile" | "q" => Ok(Self::Quartile),
            "high" | "h" => Ok(Self::High),
            _ => Err(DomainError::invalid_configuration(
                "error_correction",
                value,
            )),
        }
    }
}

/// Requested output representation for the rendered symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Raster,
    Vector,
}

impl OutputFormat {
    /// Name of the concrete image format backing this output kind.
    pub fn image_name(self) -> &'static str {
        match self {
            OutputFormat::Raster => "png",
            OutputFormat::Vector => "svg",
        }
    }

    /// File extension for temporary backing files, without the dot.
    pub fn file_extension(self) -> &'static str {
        self.image_name()
    }

    /// MIME type to report for this format.
    ///
    /// The base type is derived from the image-format name; vector output is
    /// XML-based and carries the `+xml` suffix.
    pub fn mime_type(self) -> String {
        let mut mime = format!("image/{}", self.image_name().to_lowercase());
        if matches!(self, OutputFormat::Vector) {
            mime.push_str("+xml");
        }
        mime
    }
}

impl FromStr for OutputFormat {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "raster" | "png" => Ok(Self::Raster),
            "vector" | "svg" => Ok(Self::Vector),
            _ => Err(DomainError::invalid_configuration("output_format", value)),
        }
    }
}

/// One QR generation request: opaque payload plus the two resolved choices.
///
/// Owned by the call that processes it and discarded once the response
/// stream completes or fails.
#[derive(Debug, Clone)]
pub struct QrRequest {
    pub payload: String,
    pub correction: ErrorCorrectionLevel,
    pub format: OutputFormat,
}

impl QrRequest {
    pub fn new(
        payload: impl Into<String>,
        correction: ErrorCorrectionLevel,
        format: OutputFormat,
    ) -> Self {
        Self {
            payload: payload.into(),
            correction,
            format,
        }
    }

    /// Build a request with the service defaults (Medium correction, raster output).
    pub fn with_defaults(payload: impl Into<String>) -> Self {
        Self::new(
            payload,
            ErrorCorrectionLevel::default(),
            OutputFormat::default(),
        )
    }
}
