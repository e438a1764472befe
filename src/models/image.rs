use base64::Engine;
use image::GenericImageView;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapmorphError};

/// Accepted upload encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    /// Sniffs the container format from magic bytes. Anything else is
    /// rejected before decoding is attempted.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::Webp);
        }

        None
    }
}

impl std::fmt::Display for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// One user-uploaded photo, held in memory for the duration of a single
/// transformation. Replaced wholesale when a new file is chosen.
#[derive(Debug, Clone)]
pub struct SourceImage {
    data: Vec<u8>,
    kind: ImageKind,
    width: u32,
    height: u32,
}

impl SourceImage {
    /// Uploads above this size are rejected before any external call.
    pub const MAX_BYTES: usize = 10 * 1024 * 1024;

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.is_empty() {
            return Err(SnapmorphError::InvalidInput(
                "Please upload a photo first".into(),
            ));
        }
        if data.len() > Self::MAX_BYTES {
            return Err(SnapmorphError::InvalidInput(format!(
                "Image is {:.1}MB; the maximum is {}MB",
                data.len() as f64 / (1024.0 * 1024.0),
                Self::MAX_BYTES / (1024 * 1024),
            )));
        }

        let kind = ImageKind::from_magic_bytes(&data).ok_or(SnapmorphError::UnknownFormat)?;
        let (width, height) = image::load_from_memory(&data)?.dimensions();

        Ok(SourceImage {
            data,
            kind,
            width,
            height,
        })
    }

    /// Parses a browser-produced `data:<mime>;base64,<payload>` string.
    /// The declared mime type is ignored; the sniffed bytes are
    /// authoritative.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let (header, payload) = url.split_once(',').ok_or_else(|| {
            SnapmorphError::InvalidInput("Malformed image payload: not a data URL".into())
        })?;
        if !header.starts_with("data:") || !header.ends_with(";base64") {
            return Err(SnapmorphError::InvalidInput(
                "Malformed image payload: expected a base64 data URL".into(),
            ));
        }

        let data = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| SnapmorphError::InvalidInput(format!("Invalid base64 image: {}", e)))?;

        Self::from_bytes(data)
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size in kilobytes, for the preview caption.
    pub fn size_kb(&self) -> f64 {
        self.data.len() as f64 / 1024.0
    }

    /// Transport encoding sent to the model: media type + base64 payload.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.kind.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::{jpeg_bytes, png_bytes, WEBP_1X1};
    use super::*;

    #[test]
    fn test_sniffing_supported_formats() {
        assert_eq!(
            ImageKind::from_magic_bytes(&png_bytes(1, 1)),
            Some(ImageKind::Png)
        );
        assert_eq!(
            ImageKind::from_magic_bytes(&jpeg_bytes(1, 1)),
            Some(ImageKind::Jpeg)
        );
        assert_eq!(
            ImageKind::from_magic_bytes(&WEBP_1X1),
            Some(ImageKind::Webp)
        );
        assert_eq!(ImageKind::from_magic_bytes(b"GIF89a nope nope"), None);
        assert_eq!(ImageKind::from_magic_bytes(b"short"), None);
    }

    #[test]
    fn test_preview_dimensions_match_pixels() {
        let png = SourceImage::from_bytes(png_bytes(2, 3)).unwrap();
        assert_eq!(png.kind(), ImageKind::Png);
        assert_eq!((png.width(), png.height()), (2, 3));

        let jpeg = SourceImage::from_bytes(jpeg_bytes(4, 2)).unwrap();
        assert_eq!(jpeg.kind(), ImageKind::Jpeg);
        assert_eq!((jpeg.width(), jpeg.height()), (4, 2));

        let webp = SourceImage::from_bytes(WEBP_1X1.to_vec()).unwrap();
        assert_eq!(webp.kind(), ImageKind::Webp);
        assert_eq!((webp.width(), webp.height()), (1, 1));
    }

    #[test]
    fn test_size_kb() {
        let img = SourceImage::from_bytes(png_bytes(2, 2)).unwrap();
        assert!((img.size_kb() - img.len() as f64 / 1024.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        assert!(matches!(
            SourceImage::from_bytes(Vec::new()),
            Err(SnapmorphError::InvalidInput(_))
        ));
        assert!(matches!(
            SourceImage::from_bytes(b"GIF89a definitely not supported".to_vec()),
            Err(SnapmorphError::UnknownFormat)
        ));
    }

    #[test]
    fn test_data_url_round_trip() {
        let original = SourceImage::from_bytes(png_bytes(3, 3)).unwrap();
        let url = original.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let parsed = SourceImage::from_data_url(&url).unwrap();
        assert_eq!(parsed.kind(), ImageKind::Png);
        assert_eq!((parsed.width(), parsed.height()), (3, 3));
        assert_eq!(parsed.data(), original.data());
    }

    #[test]
    fn test_data_url_rejects_malformed() {
        assert!(SourceImage::from_data_url("not a data url").is_err());
        assert!(SourceImage::from_data_url("data:image/png;base64").is_err());
        assert!(SourceImage::from_data_url("http://example.com/a.png,xxxx").is_err());
        assert!(SourceImage::from_data_url("data:image/png;base64,!!!not-base64!!!").is_err());
    }

    #[test]
    fn test_mime_and_extension() {
        assert_eq!(ImageKind::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageKind::Png.extension(), "png");
        assert_eq!(ImageKind::Webp.to_string(), "webp");
    }
}
