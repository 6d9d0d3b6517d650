pub mod embedart;

use eyre::Result;

use crate::autotag::FieldMap;
use crate::fetch::musicbrainz::{Recording, Release};
use crate::library::Album;

type TrackExtract = Box<dyn Fn(&Recording) -> Option<FieldMap> + Send + Sync>;
type AlbumExtract = Box<dyn Fn(&Release) -> Option<FieldMap> + Send + Sync>;
type AlbumImported = Box<dyn Fn(&Album) -> Result<()> + Send + Sync>;

/// Listeners registered by plugins, called in registration order.
#[derive(Default)]
pub struct Hooks {
    track_extract: Vec<TrackExtract>,
    album_extract: Vec<AlbumExtract>,
    album_imported: Vec<AlbumImported>,
}

impl Hooks {
    pub fn on_track_extract<F>(&mut self, f: F)
    where
        F: Fn(&Recording) -> Option<FieldMap> + Send + Sync + 'static,
    {
        self.track_extract.push(Box::new(f));
    }

    pub fn on_album_extract<F>(&mut self, f: F)
    where
        F: Fn(&Release) -> Option<FieldMap> + Send + Sync + 'static,
    {
        self.album_extract.push(Box::new(f));
    }

    pub fn on_album_imported<F>(&mut self, f: F)
    where
        F: Fn(&Album) -> Result<()> + Send + Sync + 'static,
    {
        self.album_imported.push(Box::new(f));
    }

    pub fn track_extract(&self, recording: &Recording) -> Vec<FieldMap> {
        self.track_extract.iter().filter_map(|f| f(recording)).collect()
    }

    pub fn album_extract(&self, release: &Release) -> Vec<FieldMap> {
        self.album_extract.iter().filter_map(|f| f(release)).collect()
    }

    /// Notifies every listener. Failures are logged and do not stop the
    /// remaining listeners.
    pub fn album_imported(&self, album: &Album) {
        for listener in self.album_imported.iter() {
            if let Err(err) = listener(album) {
                tracing::error! {album = %album.name, %err, "Album import listener failed"};
            }
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("track_extract", &self.track_extract.len())
            .field("album_extract", &self.album_extract.len())
            .field("album_imported", &self.album_imported.len())
            .finish()
    }
}
