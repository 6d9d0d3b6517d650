extern crate mp4ameta;

use super::picture::{Picture, PictureType};
use super::TagKey;
use core::convert::AsRef;
use eyre::{bail, eyre, Result};
use mp4ameta::{Img, ImgFmt};
use std::path::Path;

#[derive(Clone)]
pub struct Tag {
    tag: mp4ameta::Tag,
}

impl crate::TagFrom for Tag {
    fn from_path<P>(path: P) -> Result<Box<dyn crate::Tag>>
    where
        P: AsRef<Path>,
    {
        Ok(Box::new(Tag {
            tag: mp4ameta::Tag::read_from_path(path)?,
        }))
    }
}

impl crate::Tag for Tag {
    fn get_tag(&self, key: TagKey) -> Vec<String> {
        let value = match key {
            TagKey::TrackTitle => self.tag.title().map(String::from),
            TagKey::Artist => self.tag.artist().map(String::from),
            TagKey::Album => self.tag.album().map(String::from),
            TagKey::AlbumArtist => self.tag.album_artist().map(String::from),
            TagKey::TrackNumber => self.tag.track_number().map(|n| n.to_string()),
            TagKey::DiscNumber => self.tag.disc_number().map(|n| n.to_string()),
        };
        value.into_iter().collect()
    }

    fn get_pictures(&self) -> Result<Vec<Picture>> {
        Ok(self
            .tag
            .artworks()
            .map(|img| Picture {
                mime_type: match img.fmt {
                    ImgFmt::Png => mime::IMAGE_PNG,
                    ImgFmt::Jpeg => mime::IMAGE_JPEG,
                    ImgFmt::Bmp => mime::IMAGE_BMP,
                },
                // covr atoms carry no picture type
                picture_type: PictureType::CoverFront,
                description: String::new(),
                data: img.data.to_owned(),
            })
            .collect::<Vec<_>>())
    }

    fn set_pictures(&mut self, pictures: Vec<Picture>) -> Result<()> {
        self.tag.remove_artworks();
        for pic in pictures {
            if pic.picture_type != PictureType::CoverFront {
                bail!("mp4 only supports cover front art");
            }
            let fmt = match (pic.mime_type.type_(), pic.mime_type.subtype()) {
                (mime::IMAGE, mime::PNG) => ImgFmt::Png,
                (mime::IMAGE, mime::JPEG) => ImgFmt::Jpeg,
                (mime::IMAGE, mime::BMP) => ImgFmt::Bmp,
                _ => bail!("Invalid mime type for a picture in mp4: {}", pic.mime_type),
            };
            self.tag.add_artwork(Img::new(fmt, pic.data));
        }
        Ok(())
    }

    fn write_to_path(&mut self, path: &Path) -> Result<()> {
        self.tag.write_to_path(path).map_err(|e| eyre!(e))
    }
}
