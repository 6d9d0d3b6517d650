#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PictureType {
    Other,
    CoverFront,
    CoverBack,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Picture {
    pub mime_type: mime::Mime,
    pub picture_type: PictureType,
    pub description: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for Picture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Picture")
            .field("mime_type", &self.mime_type)
            .field("picture_type", &self.picture_type)
            .field("description", &self.description)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Reads a stored mime type, sniffing the data when the stored value is
/// missing or malformed.
pub fn parse_mime(stored: &str, data: &[u8]) -> mime::Mime {
    stored
        .parse()
        .ok()
        .or_else(|| infer::get(data).and_then(|t| t.mime_type().parse().ok()))
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

/// Picks the front cover, falling back to the first picture.
pub fn front_cover(pictures: &[Picture]) -> Option<&Picture> {
    pictures
        .iter()
        .find(|p| p.picture_type == PictureType::CoverFront)
        .or_else(|| pictures.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pic(picture_type: PictureType, data: u8) -> Picture {
        Picture {
            mime_type: mime::IMAGE_PNG,
            picture_type,
            description: String::new(),
            data: vec![data],
        }
    }

    #[test]
    fn test_parse_mime_sniffs_garbage() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(parse_mime("", &png), mime::IMAGE_PNG);
        assert_eq!(parse_mime("image/jpeg", &png), mime::IMAGE_JPEG);
        assert_eq!(parse_mime("", b"??"), mime::APPLICATION_OCTET_STREAM);
    }

    #[test]
    fn test_front_cover_preferred() {
        let pictures = vec![pic(PictureType::CoverBack, 1), pic(PictureType::CoverFront, 2)];
        assert_eq!(front_cover(&pictures).map(|p| p.data[0]), Some(2));
    }

    #[test]
    fn test_front_cover_fallback() {
        let pictures = vec![pic(PictureType::Other, 7), pic(PictureType::CoverBack, 1)];
        assert_eq!(front_cover(&pictures).map(|p| p.data[0]), Some(7));
        assert!(front_cover(&[]).is_none());
    }
}
