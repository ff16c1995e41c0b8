//! QR encoding and rendering pipeline.
//!
//! The service resolves a validated [`QrRequest`] into an in-memory image
//! and hands it to the stream adapter for delivery. Symbol construction is
//! delegated to the `qrcode` crate; the smallest version that fits the
//! payload at the requested correction level is chosen automatically, and a
//! payload too large for any version surfaces as [`QrCodeError::Encoding`]
//! instead of degrading the correction level.

use std::io::{self, Seek, Write};
use std::num::NonZeroUsize;

use image::{GrayImage, ImageFormat};
use metrics::counter;
use qrcode::{QrCode, render::svg, types::QrError};
use thiserror::Error;

use crate::domain::qr::{ErrorCorrectionLevel, OutputFormat, QrRequest};

use super::stream::ImageStream;

/// Side length of one module in output pixels/units.
const MODULE_SIZE: u32 = 10;

#[derive(Debug, Error)]
pub enum QrCodeError {
    #[error("payload cannot be encoded at {} correction: {source}", .level.as_str())]
    Encoding {
        level: ErrorCorrectionLevel,
        #[source]
        source: QrError,
    },
    #[error("stream backing store failure: {0}")]
    Io(#[from] io::Error),
}

/// A fully rendered symbol, transient between encode and serialize.
#[derive(Debug, Clone)]
pub enum RenderedImage {
    Raster(GrayImage),
    Vector(String),
}

impl RenderedImage {
    /// Serialize the image into the provided writer (PNG bytes for raster,
    /// UTF-8 markup for vector).
    pub(crate) fn write_to<W: Write + Seek>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            RenderedImage::Raster(bitmap) => bitmap
                .write_to(writer, ImageFormat::Png)
                .map_err(|err| match err {
                    image::ImageError::IoError(io_err) => io_err,
                    other => io::Error::other(other),
                }),
            RenderedImage::Vector(markup) => writer.write_all(markup.as_bytes()),
        }
    }
}

/// Streamed response produced for one request.
pub struct QrCodeResponse {
    pub stream: ImageStream,
    pub mime_type: String,
}

/// Stateless per-process QR service; every request is rendered in isolation.
pub struct QrCodeService {
    chunk_size: NonZeroUsize,
}

impl QrCodeService {
    pub fn new(chunk_size: NonZeroUsize) -> Self {
        Self { chunk_size }
    }

    /// Encode the payload and render it with the backend resolved from the
    /// requested output format. Atomic: either a complete image or an error.
    pub fn render(&self, request: &QrRequest) -> Result<RenderedImage, QrCodeError> {
        let code = QrCode::with_error_correction_level(
            request.payload.as_bytes(),
            request.correction.ec_level(),
        )
        .map_err(|source| {
            counter!("tessera_qrcode_encoding_failure_total").increment(1);
            QrCodeError::Encoding {
                level: request.correction,
                source,
            }
        })?;

        let image = match request.format {
            OutputFormat::Raster => {
                let bitmap = code
                    .render::<image::Luma<u8>>()
                    .module_dimensions(MODULE_SIZE, MODULE_SIZE)
                    .quiet_zone(true)
                    .build();
                RenderedImage::Raster(bitmap)
            }
            OutputFormat::Vector => {
                let markup = code
                    .render::<svg::Color>()
                    .module_dimensions(MODULE_SIZE, MODULE_SIZE)
                    .quiet_zone(true)
                    .dark_color(svg::Color("#000000"))
                    .light_color(svg::Color("#ffffff"))
                    .build();
                RenderedImage::Vector(markup)
            }
        };

        counter!(
            "tessera_qrcode_rendered_total",
            "format" => request.format.image_name()
        )
        .increment(1);

        Ok(image)
    }

    /// Pipeline entry point: render the request and persist the result into
    /// a chunked stream together with its resolved MIME type.
    pub fn produce_stream(&self, request: &QrRequest) -> Result<QrCodeResponse, QrCodeError> {
        let image = self.render(request)?;
        let stream = ImageStream::persist(&image, request.format.file_extension(), self.chunk_size)?;

        Ok(QrCodeResponse {
            stream,
            mime_type: request.format.mime_type(),
        })
    }
}
