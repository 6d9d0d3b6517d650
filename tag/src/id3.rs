extern crate id3;

use super::picture::{parse_mime, Picture, PictureType};
use super::TagKey;
use core::convert::AsRef;
use eyre::{eyre, Result};
use id3::frame::{Picture as ID3Picture, PictureType as ID3PictureType};
use id3::{ErrorKind, TagLike, Version};
use std::path::Path;

#[derive(Clone)]
pub struct Tag {
    tag: id3::Tag,
}

impl crate::TagFrom for Tag {
    fn from_path<P>(path: P) -> Result<Box<dyn crate::Tag>>
    where
        P: AsRef<Path>,
    {
        let tag = match id3::Tag::read_from_path(path) {
            Ok(tag) => tag,
            // untagged files get a fresh tag block on write
            Err(id3::Error {
                kind: ErrorKind::NoTag,
                ..
            }) => id3::Tag::new(),
            Err(e) => return Err(eyre!(e)),
        };
        Ok(Box::new(Tag { tag }))
    }
}

impl From<ID3PictureType> for PictureType {
    fn from(t: ID3PictureType) -> Self {
        match t {
            ID3PictureType::CoverFront => PictureType::CoverFront,
            ID3PictureType::CoverBack => PictureType::CoverBack,
            _ => PictureType::Other,
        }
    }
}

impl From<PictureType> for ID3PictureType {
    fn from(t: PictureType) -> Self {
        match t {
            PictureType::CoverFront => ID3PictureType::CoverFront,
            PictureType::CoverBack => ID3PictureType::CoverBack,
            PictureType::Other => ID3PictureType::Other,
        }
    }
}

impl crate::Tag for Tag {
    fn get_tag(&self, key: TagKey) -> Vec<String> {
        let value = match key {
            TagKey::TrackTitle => self.tag.title().map(String::from),
            TagKey::Artist => self.tag.artist().map(String::from),
            TagKey::Album => self.tag.album().map(String::from),
            TagKey::AlbumArtist => self.tag.album_artist().map(String::from),
            TagKey::TrackNumber => self.tag.track().map(|n| n.to_string()),
            TagKey::DiscNumber => self.tag.disc().map(|n| n.to_string()),
        };
        value.into_iter().collect()
    }

    fn get_pictures(&self) -> Result<Vec<Picture>> {
        Ok(self
            .tag
            .pictures()
            .map(|pic| Picture {
                mime_type: parse_mime(pic.mime_type.as_str(), &pic.data),
                picture_type: pic.picture_type.into(),
                description: pic.description.clone(),
                data: pic.data.clone(),
            })
            .collect::<Vec<_>>())
    }

    fn set_pictures(&mut self, pictures: Vec<Picture>) -> Result<()> {
        self.tag.remove_all_pictures();
        for pic in pictures {
            self.tag.add_frame(ID3Picture {
                mime_type: pic.mime_type.to_string(),
                picture_type: pic.picture_type.into(),
                description: pic.description,
                data: pic.data,
            });
        }
        Ok(())
    }

    fn write_to_path(&mut self, path: &Path) -> Result<()> {
        self.tag
            .write_to_path(path, Version::Id3v24)
            .map_err(|e| eyre!(e))
    }
}
