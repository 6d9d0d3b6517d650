use base::util::path_to_str;
use base::ImageFormat;
use eyre::{eyre, Result};
use scan_dir::ScanDir;
use serde_derive::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tag::{TagKey, TrackFile};

use crate::query::{Fields, Query};

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub albumartist: String,
    pub track: Option<u32>,
    pub disc: Option<u32>,
}

/// Reads `3` out of both `3` and `3/12`.
fn number(value: Option<String>) -> Option<u32> {
    value?.split('/').next()?.trim().parse().ok()
}

impl Item {
    pub fn from_file(file: &TrackFile) -> Item {
        let artist = file.get_first(TagKey::Artist).unwrap_or_default();
        Item {
            path: file.path.clone(),
            title: file.get_first(TagKey::TrackTitle).unwrap_or_default(),
            albumartist: file
                .get_first(TagKey::AlbumArtist)
                .unwrap_or_else(|| artist.clone()),
            artist,
            album: file.get_first(TagKey::Album).unwrap_or_default(),
            track: number(file.get_first(TagKey::TrackNumber)),
            disc: number(file.get_first(TagKey::DiscNumber)),
        }
    }
}

impl Fields for Item {
    const DEFAULT_FIELDS: &'static [&'static str] = &["title", "artist", "album", "albumartist"];

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        Some(match name {
            "title" => Cow::Borrowed(self.title.as_str()),
            "artist" => Cow::Borrowed(self.artist.as_str()),
            "album" => Cow::Borrowed(self.album.as_str()),
            "albumartist" => Cow::Borrowed(self.albumartist.as_str()),
            "path" => self.path.to_string_lossy(),
            "track" => Cow::Owned(self.track?.to_string()),
            "disc" => Cow::Owned(self.disc?.to_string()),
            _ => return None,
        })
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Album {
    pub name: String,
    pub albumartist: String,
    pub dir: PathBuf,
    /// Art file stored next to the items, if any.
    pub artpath: Option<PathBuf>,
    pub items: Vec<Item>,
}

impl Album {
    fn new(items: Vec<Item>, art_name: &str) -> Album {
        let first = items.first().cloned().unwrap_or_default();
        let dir = first
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let artpath = [ImageFormat::Jpeg, ImageFormat::Png]
            .iter()
            .map(|fmt| dir.join(format!("{}.{}", art_name, fmt.ext())))
            .find(|p| p.is_file());
        Album {
            name: first.album,
            albumartist: first.albumartist,
            dir,
            artpath,
            items,
        }
    }
}

impl Fields for Album {
    const DEFAULT_FIELDS: &'static [&'static str] = &["album", "albumartist"];

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        Some(match name {
            "album" => Cow::Borrowed(self.name.as_str()),
            "albumartist" => Cow::Borrowed(self.albumartist.as_str()),
            "path" => self.dir.to_string_lossy(),
            _ => return None,
        })
    }
}

/// The audio files below the library root.
#[derive(Debug, Clone)]
pub struct Library {
    pub root: PathBuf,
    art_name: String,
    items: Vec<Item>,
}

fn all_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = ScanDir::files()
        .walk(path_to_str(path)?, |iter| {
            iter.map(|(ref entry, _)| entry.path()).collect::<Vec<_>>()
        })
        .map_err(|errs| match errs.first().map(|e| eyre!(e.to_string())) {
            Some(e) => e,
            None => eyre!("Could not walk library directory {:?}", path),
        })?;
    files.sort();
    Ok(files)
}

impl Library {
    pub fn open(root: &Path, art_name: &str) -> Result<Library> {
        let items = all_files(root)?
            .iter()
            .filter_map(|path| match TrackFile::open(path) {
                Ok(file) => Some(Item::from_file(&file)),
                Err(err) => {
                    tracing::debug! {?path, %err, "Skipping unreadable file"};
                    None
                }
            })
            .collect::<Vec<_>>();
        tracing::info! {?root, items = items.len(), "Opened library"};
        Ok(Library {
            root: root.to_path_buf(),
            art_name: art_name.to_string(),
            items,
        })
    }

    pub fn items<'a: 'q, 'q>(
        &'a self,
        query: &'q Query,
    ) -> impl Iterator<Item = &'a Item> + 'q {
        self.items.iter().filter(move |i| query.matches(*i))
    }

    /// Items grouped by album artist and album, in scan order.
    pub fn albums(&self, query: &Query) -> Vec<Album> {
        let mut groups: Vec<Vec<Item>> = Vec::new();
        for item in self.items.iter() {
            let group = groups.iter_mut().find(|g| {
                g.first()
                    .map_or(false, |f| f.albumartist == item.albumartist && f.album == item.album)
            });
            match group {
                Some(group) => group.push(item.clone()),
                None => groups.push(vec![item.clone()]),
            }
        }
        groups
            .into_iter()
            .map(|items| Album::new(items, &self.art_name))
            .filter(|album| query.matches(album))
            .collect()
    }
}
