use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Flac,
    Mp4,
    Id3,
}

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Could not read file for magic number analysis: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not an audio file or not a supported format: {0:?}")]
    Unsupported(PathBuf),
}

impl Format {
    pub fn from_path<P>(path: P) -> Result<Format, FormatError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let by_magic = infer::get_from_path(path)?.and_then(|t| Self::from_mime(t.mime_type()));
        by_magic
            .or_else(|| Self::from_ext(path))
            .ok_or_else(|| FormatError::Unsupported(path.to_path_buf()))
    }

    pub fn from_mime(mime: &str) -> Option<Format> {
        // Complete list here:
        // https://crates.io/crates/infer#audio
        match mime {
            "audio/mpeg" => Some(Format::Id3),
            "audio/m4a" | "audio/x-m4a" | "video/mp4" => Some(Format::Mp4),
            "audio/x-flac" => Some(Format::Flac),
            _ => None,
        }
    }

    fn from_ext(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "mp3" => Some(Format::Id3),
            "m4a" | "mp4" | "aac" => Some(Format::Mp4),
            "flac" => Some(Format::Flac),
            _ => None,
        }
    }
}

impl From<Format> for String {
    fn from(f: Format) -> String {
        match f {
            Format::Flac => "flac".to_string(),
            Format::Mp4 => "mp4".to_string(),
            Format::Id3 => "id3".to_string(),
        }
    }
}
