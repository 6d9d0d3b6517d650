use base::setting::EmbedArt as EmbedArtSettings;
use base::ImageFormat;
use eyre::{Result, WrapErr};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tag::{Picture, PictureType, TrackFile};

use super::Hooks;
use crate::library::{Album, Item, Library};
use crate::query::Query;

/// Embeds cover art into audio files and extracts it back out.
#[derive(Debug, Clone)]
pub struct EmbedArt {
    config: EmbedArtSettings,
}

/// `stem` with `.ext` appended, keeping any dots already in the stem.
fn with_extension(stem: &Path, ext: &str) -> PathBuf {
    let mut path = OsString::from(stem.as_os_str());
    path.push(".");
    path.push(ext);
    PathBuf::from(path)
}

impl EmbedArt {
    pub fn new(config: EmbedArtSettings) -> Self {
        EmbedArt { config }
    }

    /// Writes the image into every item, replacing embedded art. Returns the
    /// number of files written; images other than JPEG and PNG write nothing.
    pub fn embed(&self, image: &Path, items: &[Item]) -> Result<usize> {
        let data = fs::read(image).wrap_err(format!("Could not read image {:?}", image))?;
        let format = match ImageFormat::sniff(&data) {
            Ok(format) => format,
            Err(kind) => {
                tracing::error! {
                    kind = kind.unwrap_or("unknown"),
                    ?image,
                    "A file of this type is not allowed as cover art"
                };
                return Ok(0);
            }
        };

        tracing::debug! {?image, %format, items = items.len(), "Embedding album art"};
        for item in items {
            let mut file = TrackFile::open(&item.path)?;
            file.set_pictures(vec![Picture {
                mime_type: format.mime(),
                picture_type: PictureType::CoverFront,
                description: String::new(),
                data: data.clone(),
            }])?;
            file.write()?;
        }
        Ok(items.len())
    }

    /// Saves the item's embedded art next to `outstem`, adding the image
    /// extension. Returns the written path, or `None` without art.
    pub fn extract(&self, outstem: &Path, item: &Item) -> Result<Option<PathBuf>> {
        let file = TrackFile::open(&item.path)?;
        let Some(picture) = file.cover()? else {
            tracing::error! {
                artist = %item.artist,
                title = %item.title,
                "No album art present"
            };
            return Ok(None);
        };
        let format = ImageFormat::from_mime(&picture.mime_type)
            .or_else(|| ImageFormat::sniff(&picture.data).ok())
            .unwrap_or(ImageFormat::Png);
        let outpath = with_extension(outstem, format.ext());
        tracing::info! {
            artist = %item.artist,
            title = %item.title,
            to = ?outpath,
            "Extracting album art"
        };
        fs::write(&outpath, &picture.data)
            .wrap_err(format!("Could not write image {:?}", outpath))?;
        Ok(Some(outpath))
    }

    /// Embeds into the first album matching the query.
    pub fn embed_command(&self, lib: &Library, image: &Path, query: &Query) -> Result<usize> {
        let Some(album) = lib.albums(query).into_iter().next() else {
            tracing::error!("No album matches query");
            return Ok(0);
        };
        tracing::info! {
            albumartist = %album.albumartist,
            album = %album.name,
            "Embedding album art"
        };
        self.embed(image, &album.items)
    }

    /// Extracts from the first item matching the query.
    pub fn extract_command(
        &self,
        lib: &Library,
        outstem: &Path,
        query: &Query,
    ) -> Result<Option<PathBuf>> {
        let Some(item) = lib.items(query).next() else {
            tracing::error!("No item matches query");
            return Ok(None);
        };
        self.extract(outstem, item)
    }

    pub fn album_imported(&self, album: &Album) -> Result<()> {
        if !self.config.auto {
            return Ok(());
        }
        if let Some(artpath) = album.artpath.as_ref() {
            self.embed(artpath, &album.items)?;
        }
        Ok(())
    }

    pub fn register(self: Arc<Self>, hooks: &mut Hooks) {
        hooks.on_album_imported(move |album| self.album_imported(album));
    }
}
