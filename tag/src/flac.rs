extern crate metaflac;

use super::picture::{parse_mime, Picture, PictureType};
use super::TagKey;
use core::convert::AsRef;
use eyre::{eyre, Result};
use metaflac::block::PictureType as FLACPictureType;
use std::path::Path;

#[derive(Clone)]
pub struct Tag {
    tag: metaflac::Tag,
}

impl crate::TagFrom for Tag {
    fn from_path<P>(path: P) -> Result<Box<dyn crate::Tag>>
    where
        P: AsRef<Path>,
    {
        Ok(Box::new(Tag {
            tag: metaflac::Tag::read_from_path(path)?,
        }))
    }
}

fn key_to_str(key: TagKey) -> &'static str {
    match key {
        TagKey::TrackTitle => "TITLE",
        TagKey::Artist => "ARTIST",
        TagKey::Album => "ALBUM",
        TagKey::AlbumArtist => "ALBUMARTIST",
        TagKey::TrackNumber => "TRACKNUMBER",
        TagKey::DiscNumber => "DISCNUMBER",
    }
}

impl crate::Tag for Tag {
    fn get_tag(&self, key: TagKey) -> Vec<String> {
        self.tag
            .get_vorbis(key_to_str(key))
            .map(|values| values.map(String::from).collect())
            .unwrap_or_default()
    }

    fn get_pictures(&self) -> Result<Vec<Picture>> {
        Ok(self
            .tag
            .pictures()
            .map(|pic| Picture {
                mime_type: parse_mime(pic.mime_type.as_str(), &pic.data),
                picture_type: match pic.picture_type {
                    FLACPictureType::CoverFront => PictureType::CoverFront,
                    FLACPictureType::CoverBack => PictureType::CoverBack,
                    _ => PictureType::Other,
                },
                description: pic.description.clone(),
                data: pic.data.clone(),
            })
            .collect::<Vec<_>>())
    }

    fn set_pictures(&mut self, pictures: Vec<Picture>) -> Result<()> {
        // remove all the previous pictures
        for pic in self.tag.clone().pictures() {
            self.tag.remove_picture_type(pic.picture_type);
        }
        for pic in pictures {
            self.tag.add_picture(
                pic.mime_type.to_string(),
                match pic.picture_type {
                    PictureType::CoverFront => FLACPictureType::CoverFront,
                    PictureType::CoverBack => FLACPictureType::CoverBack,
                    PictureType::Other => FLACPictureType::Other,
                },
                pic.data,
            );
        }
        Ok(())
    }

    fn write_to_path(&mut self, path: &Path) -> Result<()> {
        self.tag.write_to_path(path).map_err(|e| eyre!(e))
    }
}
