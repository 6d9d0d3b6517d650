use eyre::{bail, Result, WrapErr};
use std::path::{Path, PathBuf};

#[cfg(feature = "flac")]
use super::flac;
use super::format::Format;
#[cfg(feature = "id3")]
use super::id3;
#[cfg(feature = "mp4")]
use super::mp4;
use super::picture::{front_cover, Picture};
use super::{Tag, TagFrom, TagKey};

#[derive(Clone, Debug)]
pub struct TrackFile {
    pub path: PathBuf,
    pub format: Format,
    tag: Box<dyn Tag>,
}

impl TrackFile {
    pub fn open(path: &Path) -> Result<TrackFile> {
        let format = Format::from_path(path)
            .wrap_err(format!("Could not identify format for file: {:?}", path))?;
        let tag = match format {
            #[cfg(feature = "flac")]
            Format::Flac => flac::Tag::from_path(path),
            #[cfg(feature = "mp4")]
            Format::Mp4 => mp4::Tag::from_path(path),
            #[cfg(feature = "id3")]
            Format::Id3 => id3::Tag::from_path(path),
            #[allow(unreachable_patterns)]
            _ => bail!("Unsupported format {}", String::from(format)),
        }
        .wrap_err(format!("Could not read metadata from file: {:?}", path))?;
        Ok(TrackFile {
            path: path.to_path_buf(),
            format,
            tag,
        })
    }

    pub fn get_tag(&self, key: TagKey) -> Vec<String> {
        self.tag.get_tag(key)
    }

    /// The first value stored for the key, if any.
    pub fn get_first(&self, key: TagKey) -> Option<String> {
        self.get_tag(key).into_iter().find(|v| !v.is_empty())
    }

    pub fn pictures(&self) -> Result<Vec<Picture>> {
        self.tag.get_pictures()
    }

    pub fn cover(&self) -> Result<Option<Picture>> {
        Ok(front_cover(&self.pictures()?).cloned())
    }

    pub fn set_pictures(&mut self, pictures: Vec<Picture>) -> Result<()> {
        self.tag.set_pictures(pictures)
    }

    pub fn write(&mut self) -> Result<()> {
        tracing::debug! {path = ?self.path, "Writing tags"};
        self.tag
            .write_to_path(&self.path)
            .wrap_err(format!("Could not write tags to file: {:?}", self.path))
    }
}

#[cfg(all(test, feature = "id3"))]
mod tests {
    use super::*;
    use crate::PictureType;
    use ::id3::{TagLike, Version};
    use std::fs;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];

    fn mp3(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"").unwrap();
        let mut tag = ::id3::Tag::new();
        tag.set_title("Title");
        tag.set_artist("Artist");
        tag.set_album("Album");
        tag.set_track(3);
        tag.write_to_path(&path, Version::Id3v24).unwrap();
        path
    }

    #[test]
    fn test_reads_text_fields() {
        let dir = tempfile::tempdir().unwrap();
        let file = TrackFile::open(&mp3(dir.path(), "a.mp3")).unwrap();
        assert_eq!(file.format, Format::Id3);
        assert_eq!(file.get_first(TagKey::TrackTitle).as_deref(), Some("Title"));
        assert_eq!(file.get_first(TagKey::Album).as_deref(), Some("Album"));
        assert_eq!(file.get_first(TagKey::TrackNumber).as_deref(), Some("3"));
        assert_eq!(file.get_first(TagKey::AlbumArtist), None);
    }

    #[test]
    fn test_pictures_are_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = mp3(dir.path(), "a.mp3");
        let mut file = TrackFile::open(&path).unwrap();
        assert!(file.cover().unwrap().is_none());

        let pic = |data: Vec<u8>| Picture {
            mime_type: mime::IMAGE_PNG,
            picture_type: PictureType::CoverFront,
            description: "Front".to_string(),
            data,
        };
        file.set_pictures(vec![pic(vec![0; 4])]).unwrap();
        file.write().unwrap();
        let mut file = TrackFile::open(&path).unwrap();
        file.set_pictures(vec![pic(PNG.to_vec())]).unwrap();
        file.write().unwrap();

        let file = TrackFile::open(&path).unwrap();
        let pictures = file.pictures().unwrap();
        assert_eq!(pictures.len(), 1);
        assert_eq!(pictures[0].data, PNG);
        assert_eq!(pictures[0].mime_type, mime::IMAGE_PNG);
        assert_eq!(file.get_first(TagKey::Artist).as_deref(), Some("Artist"));
    }
}
