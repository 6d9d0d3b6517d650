#[cfg(feature = "flac")]
mod flac;
#[cfg(feature = "id3")]
mod id3;
#[cfg(feature = "mp4")]
mod mp4;

pub mod file;
pub mod format;
pub mod picture;

use eyre::Result;
use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::path::Path;

pub use file::TrackFile;
pub use format::{Format, FormatError};
pub use picture::{Picture, PictureType};

/// The textual fields read back from a tag block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKey {
    TrackTitle,
    Artist,
    Album,
    AlbumArtist,
    TrackNumber,
    DiscNumber,
}

pub trait TagFrom {
    fn from_path<P>(path: P) -> Result<Box<dyn Tag>>
    where
        P: AsRef<Path>;
}

pub trait TagClone: Send {
    fn clone_box(&self) -> Box<dyn Tag>;
}

impl<T> TagClone for T
where
    T: 'static + Tag + Clone,
{
    fn clone_box(&self) -> Box<dyn Tag> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Tag> {
    fn clone(&self) -> Box<dyn Tag> {
        self.clone_box()
    }
}

impl Debug for Box<dyn Tag> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        f.debug_struct("Tag")
            .field("title", &self.get_tag(TagKey::TrackTitle))
            .field("artist", &self.get_tag(TagKey::Artist))
            .field("album", &self.get_tag(TagKey::Album))
            .field("pictures", &self.get_pictures().map(|p| p.len()))
            .finish()
    }
}

pub trait Tag: TagClone {
    fn get_tag(&self, key: TagKey) -> Vec<String>;
    fn get_pictures(&self) -> Result<Vec<Picture>>;
    /// Replaces every picture in the tag block with the given ones.
    fn set_pictures(&mut self, pictures: Vec<Picture>) -> Result<()>;

    fn write_to_path(&mut self, path: &Path) -> Result<()>;
}
