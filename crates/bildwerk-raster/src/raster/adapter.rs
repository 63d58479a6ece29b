// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image adapter — decode and encode BMP/PNG/JPEG through the `image` crate,
// converting to and from PixelBuffer. PSA never goes through here.

use std::io::Cursor;

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{ImageFormat, PixelBuffer};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, ImageFormat as CodecFormat, RgbImage, RgbaImage};
use tracing::{debug, info, instrument};

/// Adapter onto the general-purpose codecs of the `image` crate.
///
/// Decoded images are normalised to 8-bit samples: gray sources become one
/// channel, colour sources three (R, G, B), and anything with alpha four
/// (R, G, B, A).
pub struct ImageAdapter;

impl ImageAdapter {
    /// Decode encoded file bytes of a standard format.
    #[instrument(skip(bytes), fields(data_len = bytes.len()))]
    pub fn decode(bytes: &[u8], format: ImageFormat) -> Result<PixelBuffer> {
        let codec = codec_format(format)?;
        let image = image::load_from_memory_with_format(bytes, codec).map_err(|err| {
            BildwerkError::Decode(format!("failed to decode {format}: {err}"))
        })?;
        info!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Image decoded"
        );
        Self::from_dynamic(image)
    }

    /// Encode `buffer` as a standard format. `jpeg_quality` is only used for
    /// JPEG.
    #[instrument(skip(buffer), fields(channels = buffer.channels()))]
    pub fn encode(buffer: &PixelBuffer, format: ImageFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
        let codec = codec_format(format)?;
        let image = Self::to_dynamic(buffer)?;
        let mut out = Vec::new();

        if codec == CodecFormat::Jpeg {
            if buffer.channels() == 4 {
                return Err(BildwerkError::Encode(
                    "JPEG cannot store an alpha channel".into(),
                ));
            }
            let encoder = JpegEncoder::new_with_quality(&mut out, jpeg_quality);
            image.write_with_encoder(encoder).map_err(|err| {
                BildwerkError::Encode(format!("JPEG encoding failed: {err}"))
            })?;
        } else {
            image
                .write_to(&mut Cursor::new(&mut out), codec)
                .map_err(|err| BildwerkError::Encode(format!("{format} encoding failed: {err}")))?;
        }

        debug!(bytes = out.len(), "Image encoded");
        Ok(out)
    }

    /// Convert a decoded `DynamicImage` into an 8-bit PixelBuffer.
    pub fn from_dynamic(image: DynamicImage) -> Result<PixelBuffer> {
        let color = image.color();
        let (width, height) = (image.width(), image.height());
        let (channels, samples) = if color.has_alpha() {
            (4, image.into_rgba8().into_raw())
        } else if color.has_color() {
            (3, image.into_rgb8().into_raw())
        } else {
            (1, image.into_luma8().into_raw())
        };
        PixelBuffer::new(width, height, channels, samples)
            .map_err(|err| BildwerkError::Decode(err.to_string()))
    }

    /// Wrap a copy of `buffer` as a `DynamicImage`.
    pub fn to_dynamic(buffer: &PixelBuffer) -> Result<DynamicImage> {
        let (width, height) = (buffer.width(), buffer.height());
        let raw = buffer.samples().to_vec();
        let image = match buffer.channels() {
            1 => GrayImage::from_raw(width, height, raw).map(DynamicImage::ImageLuma8),
            3 => RgbImage::from_raw(width, height, raw).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(width, height, raw).map(DynamicImage::ImageRgba8),
            _ => None,
        };
        image.ok_or_else(|| {
            BildwerkError::Encode(format!(
                "cannot represent a {}-channel buffer",
                buffer.channels()
            ))
        })
    }
}

fn codec_format(format: ImageFormat) -> Result<CodecFormat> {
    match format {
        ImageFormat::Bmp => Ok(CodecFormat::Bmp),
        ImageFormat::Png => Ok(CodecFormat::Png),
        ImageFormat::Jpeg => Ok(CodecFormat::Jpeg),
        ImageFormat::Psa => Err(BildwerkError::UnsupportedFormat(
            "PSA is handled by PsaCodec, not the image adapter".into(),
        )),
    }
}
