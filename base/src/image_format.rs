use mime::{Mime, IMAGE_JPEG, IMAGE_PNG};
use serde_derive::{Deserialize, Serialize};
use std::fmt::Display;

/// The image kinds that may be embedded as cover art.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    #[default]
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn mime(&self) -> Mime {
        match self {
            ImageFormat::Png => IMAGE_PNG,
            ImageFormat::Jpeg => IMAGE_JPEG,
        }
    }

    pub fn ext(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    pub fn from_mime(m: &Mime) -> Option<Self> {
        match (m.type_(), m.subtype()) {
            (mime::IMAGE, mime::PNG) => Some(ImageFormat::Png),
            (mime::IMAGE, mime::JPEG) => Some(ImageFormat::Jpeg),
            (_, _) => None,
        }
    }

    /// Identifies the image kind from its magic number. On failure the
    /// sniffed extension is returned, if any could be found at all.
    pub fn sniff(data: &[u8]) -> Result<Self, Option<&'static str>> {
        match infer::get(data) {
            Some(kind) => match kind.mime_type() {
                "image/jpeg" => Ok(ImageFormat::Jpeg),
                "image/png" => Ok(ImageFormat::Png),
                _ => Err(Some(kind.extension())),
            },
            None => Err(None),
        }
    }
}

impl Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFormat::Jpeg => write!(f, "jpeg"),
            ImageFormat::Png => write!(f, "png"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
    const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00";

    #[test]
    fn test_sniff_supported() {
        assert_eq!(ImageFormat::sniff(PNG), Ok(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(JPEG), Ok(ImageFormat::Jpeg));
    }

    #[test]
    fn test_sniff_unsupported() {
        assert_eq!(ImageFormat::sniff(GIF), Err(Some("gif")));
        assert_eq!(ImageFormat::sniff(b"hello"), Err(None));
    }

    #[test]
    fn test_mime_round_trip() {
        assert_eq!(ImageFormat::from_mime(&ImageFormat::Png.mime()), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_mime(&mime::IMAGE_GIF), None);
        assert_eq!(ImageFormat::Jpeg.ext(), "jpg");
    }
}
