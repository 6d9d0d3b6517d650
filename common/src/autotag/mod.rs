mod credit;
mod info;
pub mod map;
#[cfg(test)]
pub mod testing;

pub use credit::{credit_elements, flatten_artist_credit, preferred_alias, CreditElement, FlatCredit};
pub use info::{AlbumInfo, FieldMap, FieldValue, TrackInfo, DATA_SOURCE};

use base::setting::Settings;
use futures::stream::{self, BoxStream, StreamExt};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::fetch::musicbrainz::{
    Api, ApiError, Criteria, RELEASE_INCLUDES, TRACK_INCLUDES, VARIOUS_ARTISTS_ID,
};
use crate::plugins::Hooks;

lazy_static! {
    static ref MBID: Regex = Regex::new("[a-f0-9]{8}(-[a-f0-9]{4}){3}-[a-f0-9]{12}").unwrap();
}

/// A failed call to MusicBrainz, with the operation and its input.
#[derive(Debug, Error)]
#[error("{source} in {verb} with query {query}")]
pub struct MusicBrainzError {
    pub verb: &'static str,
    pub query: String,
    pub source: ApiError,
}

impl MusicBrainzError {
    fn new(verb: &'static str, query: impl std::fmt::Debug, source: ApiError) -> Self {
        MusicBrainzError {
            verb,
            query: format!("{:?}", query),
            source,
        }
    }
}

/// Metadata already present on the files, used to narrow album searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExtraTag {
    CatalogNum,
    Country,
    Label,
    Media,
    Year,
}

impl ExtraTag {
    fn search_key(&self) -> &'static str {
        match self {
            ExtraTag::CatalogNum => "catno",
            ExtraTag::Country => "country",
            ExtraTag::Label => "label",
            ExtraTag::Media => "format",
            ExtraTag::Year => "date",
        }
    }
}

/// Finds the first MBID-looking substring.
pub fn parse_id(s: &str) -> Option<&str> {
    MBID.find(s).map(|m| m.as_str())
}

fn search_value(s: &str) -> String {
    s.trim().to_lowercase()
}

pub fn album_criteria(
    artist: Option<&str>,
    album: &str,
    tracks: Option<usize>,
    extra: &BTreeMap<ExtraTag, String>,
) -> Criteria {
    let mut criteria = Criteria::new();
    criteria.insert("release", search_value(album));
    match artist {
        Some(artist) => criteria.insert("artist", search_value(artist)),
        None => criteria.insert("arid", VARIOUS_ARTISTS_ID.to_string()),
    };
    if let Some(tracks) = tracks {
        criteria.insert("tracks", tracks.to_string());
    }
    for (tag, value) in extra {
        let mut value = search_value(value);
        if *tag == ExtraTag::CatalogNum {
            value.retain(|c| c != ' ');
        }
        if !value.is_empty() {
            criteria.insert(tag.search_key(), value);
        }
    }
    criteria
}

/// Looks up and searches MusicBrainz, mapping the results to tagger records.
pub struct MusicBrainz<A> {
    api: A,
    settings: Arc<Settings>,
    hooks: Arc<Hooks>,
}

impl<A: Api> MusicBrainz<A> {
    pub fn new(api: A, settings: Arc<Settings>, hooks: Arc<Hooks>) -> Self {
        MusicBrainz {
            api,
            settings,
            hooks,
        }
    }

    /// Searches for releases and fetches each hit in full, lazily. Hits that
    /// can no longer be found are skipped.
    pub async fn match_album<'a>(
        &'a self,
        artist: Option<&str>,
        album: &str,
        tracks: Option<usize>,
        extra: &BTreeMap<ExtraTag, String>,
    ) -> Result<BoxStream<'a, Result<AlbumInfo, MusicBrainzError>>, MusicBrainzError> {
        let criteria = album_criteria(artist, album, tracks, extra);
        let ids = if criteria.values().all(|v| v.is_empty()) {
            Vec::new()
        } else {
            tracing::debug! {?criteria, "Searching for MusicBrainz releases"};
            self.api
                .search_releases(&criteria, self.settings.musicbrainz.searchlimit)
                .await
                .map_err(|e| MusicBrainzError::new("release search", &criteria, e))?
                .releases
                .into_iter()
                .map(|r| r.id)
                .collect()
        };
        Ok(stream::iter(ids)
            .then(move |id| async move { self.album_for_id(&id).await })
            .filter_map(|res| futures::future::ready(res.transpose()))
            .boxed())
    }

    pub async fn match_track(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<Vec<TrackInfo>, MusicBrainzError> {
        let mut criteria = Criteria::new();
        criteria.insert("artist", search_value(artist));
        criteria.insert("recording", search_value(title));
        if criteria.values().all(|v| v.is_empty()) {
            return Ok(Vec::new());
        }
        tracing::debug! {?criteria, "Searching for MusicBrainz recordings"};
        let res = self
            .api
            .search_recordings(&criteria, self.settings.musicbrainz.searchlimit)
            .await
            .map_err(|e| MusicBrainzError::new("recording search", &criteria, e))?;
        Ok(res
            .recordings
            .iter()
            .map(|r| map::track_info(r, None, &self.settings, &self.hooks))
            .collect())
    }

    pub async fn album_for_id(&self, id: &str) -> Result<Option<AlbumInfo>, MusicBrainzError> {
        tracing::debug! {%id, "Requesting MusicBrainz release"};
        let Some(albumid) = parse_id(id) else {
            tracing::debug! {%id, "Invalid MBID"};
            return Ok(None);
        };
        let mut release = match self.api.get_release_by_id(albumid, RELEASE_INCLUDES).await {
            Ok(release) => release,
            Err(ApiError::NotFound) => {
                tracing::debug! {%albumid, "Album ID match failed"};
                return Ok(None);
            }
            Err(e) => return Err(MusicBrainzError::new("get release by ID", albumid, e)),
        };
        map::recover_relations(&mut release, &self.api)
            .await
            .map_err(|e| MusicBrainzError::new("browse recordings", albumid, e))?;
        Ok(Some(map::album_info(&release, &self.settings, &self.hooks)))
    }

    pub async fn track_for_id(&self, id: &str) -> Result<Option<TrackInfo>, MusicBrainzError> {
        let Some(trackid) = parse_id(id) else {
            tracing::debug! {%id, "Invalid MBID"};
            return Ok(None);
        };
        match self.api.get_recording_by_id(trackid, TRACK_INCLUDES).await {
            Ok(recording) => Ok(Some(map::track_info(
                &recording,
                None,
                &self.settings,
                &self.hooks,
            ))),
            Err(ApiError::NotFound) => {
                tracing::debug! {%trackid, "Track ID match failed"};
                Ok(None)
            }
            Err(e) => Err(MusicBrainzError::new("get recording by ID", trackid, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{recording_json, release_json, MockApi};
    use super::*;
    use futures::TryStreamExt;

    const RELEASE_ID: &str = "b1a9c0e9-d987-4042-ae91-78d6a3267d69";
    const OTHER_ID: &str = "0b6b4ba0-d36f-47bd-b4ea-6a5b91842d29";
    const RECORDING_ID: &str = "c64e2a4c-26ac-4f1f-9ec5-1a6c4ac44bbd";

    fn client(api: MockApi) -> MusicBrainz<MockApi> {
        MusicBrainz::new(api, Arc::new(Settings::default()), Arc::new(Hooks::default()))
    }

    #[test]
    fn parses_ids_from_urls() {
        assert_eq!(
            parse_id(&format!("https://musicbrainz.org/release/{RELEASE_ID}")),
            Some(RELEASE_ID)
        );
        assert_eq!(parse_id("not an id"), None);
        assert_eq!(parse_id("B1A9C0E9-D987-4042-AE91-78D6A3267D69"), None);
    }

    #[test]
    fn album_criteria_cleans_values() {
        let extra = BTreeMap::from([
            (ExtraTag::CatalogNum, " NO DATA 02 ".to_string()),
            (ExtraTag::Media, "CD".to_string()),
            (ExtraTag::Label, "  ".to_string()),
        ]);
        let criteria = album_criteria(Some(" Radiohead "), "OK Computer", Some(12), &extra);
        assert_eq!(criteria.get("artist").map(String::as_str), Some("radiohead"));
        assert_eq!(criteria.get("release").map(String::as_str), Some("ok computer"));
        assert_eq!(criteria.get("tracks").map(String::as_str), Some("12"));
        assert_eq!(criteria.get("catno").map(String::as_str), Some("nodata02"));
        assert_eq!(criteria.get("format").map(String::as_str), Some("cd"));
        assert!(!criteria.contains_key("label"));
    }

    #[test]
    fn missing_artist_searches_various_artists() {
        let criteria = album_criteria(None, "Now 42", None, &BTreeMap::new());
        assert_eq!(criteria.get("arid").map(String::as_str), Some(VARIOUS_ARTISTS_ID));
        assert!(!criteria.contains_key("artist"));
    }

    #[tokio::test]
    async fn invalid_id_is_not_found() {
        let mb = client(MockApi::default());
        assert!(mb.album_for_id("nothing here").await.unwrap().is_none());
        assert!(mb.track_for_id("nothing here").await.unwrap().is_none());
        assert!(mb.api.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let mb = client(MockApi::default());
        assert!(mb.album_for_id(RELEASE_ID).await.unwrap().is_none());
        assert!(mb.track_for_id(RECORDING_ID).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failures_carry_verb_and_id() {
        let mb = client(MockApi {
            fail: true,
            ..Default::default()
        });
        let err = mb.album_for_id(RELEASE_ID).await.unwrap_err();
        assert_eq!(err.verb, "get release by ID");
        assert!(err.query.contains(RELEASE_ID));
        assert!(err.to_string().ends_with(&format!("in get release by ID with query \"{RELEASE_ID}\"")));

        let err = mb.track_for_id(RECORDING_ID).await.unwrap_err();
        assert_eq!(err.verb, "get recording by ID");
        assert!(err.query.contains(RECORDING_ID));
    }

    #[tokio::test]
    async fn fetches_a_track_by_id() {
        let mb = client(MockApi::default().with_recording(recording_json(RECORDING_ID, "Lucky")));
        let track = mb.track_for_id(RECORDING_ID).await.unwrap().unwrap();
        assert_eq!(track.title.as_deref(), Some("Lucky"));
        assert_eq!(track.index, None);
    }

    #[tokio::test]
    async fn album_search_fetches_every_hit() {
        let api = MockApi::default()
            .with_release(release_json(RELEASE_ID, &[2]))
            .with_release_hits(&[RELEASE_ID, OTHER_ID]);
        let mb = client(api);
        let albums = mb
            .match_album(Some("Radiohead"), "OK Computer", None, &BTreeMap::new())
            .await
            .unwrap()
            .try_collect::<Vec<_>>()
            .await
            .unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].album_id.as_deref(), Some(RELEASE_ID));
        assert_eq!(albums[0].tracks.len(), 2);
        assert_eq!(
            mb.api.calls(),
            vec![
                "search releases artist:radiohead release:ok computer".to_string(),
                format!("release {RELEASE_ID}"),
                format!("release {OTHER_ID}"),
            ]
        );
    }

    #[tokio::test]
    async fn empty_album_search_does_nothing() {
        let mb = client(MockApi::default());
        let albums = mb
            .match_album(Some("  "), " ", None, &BTreeMap::new())
            .await
            .unwrap()
            .try_collect::<Vec<_>>()
            .await
            .unwrap();
        assert!(albums.is_empty());
        assert!(mb.api.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_search_is_an_error() {
        let mb = client(MockApi {
            fail: true,
            ..Default::default()
        });
        let err = match mb.match_album(Some("a"), "b", None, &BTreeMap::new()).await {
            Err(err) => err,
            Ok(_) => panic!("search should fail"),
        };
        assert_eq!(err.verb, "release search");
        let err = mb.match_track("a", "b").await.unwrap_err();
        assert_eq!(err.verb, "recording search");
    }

    #[tokio::test]
    async fn track_search_maps_results() {
        let api = MockApi {
            recording_search: vec![
                serde_json::from_value(recording_json("r1", "Airbag")).unwrap(),
                serde_json::from_value(recording_json("r2", "Airbag (live)")).unwrap(),
            ],
            ..Default::default()
        };
        let mb = client(api);
        let tracks = mb.match_track("Radiohead", "Airbag").await.unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].title.as_deref(), Some("Airbag (live)"));
        assert!(mb.match_track(" ", "").await.unwrap().is_empty());
    }
}
