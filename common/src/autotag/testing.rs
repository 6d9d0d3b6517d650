use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::fetch::musicbrainz::{
    Api, ApiError, Criteria, Recording, RecordingBrowse, RecordingSearch, Release, ReleaseSearch,
};

/// In-memory MusicBrainz serving fixtures and recording every call.
#[derive(Default)]
pub struct MockApi {
    pub releases: HashMap<String, Release>,
    pub recordings: HashMap<String, Recording>,
    pub release_search: Vec<Release>,
    pub recording_search: Vec<Recording>,
    pub browse: Vec<Recording>,
    /// Answer every call with a server error.
    pub fail: bool,
    pub log: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn with_release(mut self, release: Value) -> Self {
        let release: Release = serde_json::from_value(release).unwrap();
        self.releases.insert(release.id.clone(), release);
        self
    }

    pub fn with_recording(mut self, recording: Value) -> Self {
        let recording: Recording = serde_json::from_value(recording).unwrap();
        self.recordings.insert(recording.id.clone(), recording);
        self
    }

    pub fn with_release_hits(mut self, ids: &[&str]) -> Self {
        self.release_search = ids
            .iter()
            .map(|id| Release {
                id: id.to_string(),
                ..Default::default()
            })
            .collect();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.log.lock().unwrap().push(call);
        if self.fail {
            return Err(ApiError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "down for maintenance".to_string(),
            });
        }
        Ok(())
    }
}

fn describe(criteria: &Criteria) -> String {
    criteria
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl Api for MockApi {
    async fn search_releases(
        &self,
        criteria: &Criteria,
        _limit: u32,
    ) -> Result<ReleaseSearch, ApiError> {
        self.record(format!("search releases {}", describe(criteria)))?;
        Ok(ReleaseSearch {
            count: self.release_search.len() as i64,
            offset: 0,
            releases: self.release_search.clone(),
        })
    }

    async fn search_recordings(
        &self,
        criteria: &Criteria,
        _limit: u32,
    ) -> Result<RecordingSearch, ApiError> {
        self.record(format!("search recordings {}", describe(criteria)))?;
        Ok(RecordingSearch {
            count: self.recording_search.len() as i64,
            offset: 0,
            recordings: self.recording_search.clone(),
        })
    }

    async fn get_release_by_id(&self, id: &str, _includes: &[&str]) -> Result<Release, ApiError> {
        self.record(format!("release {id}"))?;
        self.releases.get(id).cloned().ok_or(ApiError::NotFound)
    }

    async fn get_recording_by_id(
        &self,
        id: &str,
        _includes: &[&str],
    ) -> Result<Recording, ApiError> {
        self.record(format!("recording {id}"))?;
        self.recordings.get(id).cloned().ok_or(ApiError::NotFound)
    }

    async fn browse_recordings(
        &self,
        release: &str,
        _includes: &[&str],
        limit: u32,
        offset: usize,
    ) -> Result<RecordingBrowse, ApiError> {
        self.record(format!("browse {release} {offset}"))?;
        Ok(RecordingBrowse {
            recording_count: self.browse.len() as i64,
            recording_offset: offset as i64,
            recordings: self
                .browse
                .iter()
                .skip(offset)
                .take(limit as usize)
                .cloned()
                .collect(),
        })
    }
}

fn artist(id: &str, name: &str, sort_name: &str) -> Value {
    json!({"id": id, "name": name, "sort-name": sort_name})
}

/// A recording with a full set of artist and work relations.
pub fn recording_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "length": 383000,
        "video": false,
        "disambiguation": "",
        "isrcs": ["GBAYE9700181", "GBAYE9700182"],
        "artist-credit": [{
            "name": "Radiohead",
            "joinphrase": "",
            "artist": artist("a74b1b7f-71a5-4011-9441-d0b5e4122711", "Radiohead", "Radiohead")
        }],
        "relations": [
            {"type": "remixer", "target-type": "artist",
             "artist": artist("shadow", "DJ Shadow", "Shadow, DJ")},
            {"type": "arranger", "target-type": "artist",
             "artist": artist("nigel", "Nigel Godrich", "Godrich, Nigel")},
            {"type": "performance", "target-type": "work", "work": {
                "id": "w1",
                "title": "Paranoid Android (work)",
                "disambiguation": "song",
                "relations": [
                    {"type": "composer", "target-type": "artist",
                     "artist": artist("thom", "Thom Yorke", "Yorke, Thom")},
                    {"type": "composer", "target-type": "artist",
                     "artist": artist("jonny", "Jonny Greenwood", "Greenwood, Jonny")},
                    {"type": "lyricist", "target-type": "artist",
                     "artist": artist("thom", "Thom Yorke", "Yorke, Thom")}
                ]
            }}
        ]
    })
}

/// A release with one medium per entry of `tracks`, each holding that many
/// tracks.
pub fn release_json(id: &str, tracks: &[usize]) -> Value {
    let media = tracks
        .iter()
        .enumerate()
        .map(|(m, count)| {
            let side = (b'A' + m as u8) as char;
            let tracks = (1..=*count)
                .map(|t| {
                    let recording = recording_json(
                        &format!("{id}-r{}-{t}", m + 1),
                        &format!("Track {}-{t}", m + 1),
                    );
                    json!({
                        "id": format!("{id}-t{}-{t}", m + 1),
                        "number": format!("{side}{t}"),
                        "position": t,
                        "title": null,
                        "length": null,
                        "recording": recording
                    })
                })
                .collect::<Vec<_>>();
            json!({
                "position": m + 1,
                "title": format!("Disc {}", m + 1),
                "format": "CD",
                "track-count": count,
                "tracks": tracks
            })
        })
        .collect::<Vec<_>>();
    json!({
        "id": id,
        "title": "OK Computer",
        "status": "Official",
        "disambiguation": "remaster",
        "asin": "B000002UJQ",
        "country": "GB",
        "date": "2009-03",
        "release-events": [{"date": "2009-03", "area": {"iso-3166-1-codes": ["GB"]}}],
        "artist-credit": [{
            "name": "Radiohead",
            "joinphrase": "",
            "artist": artist("a74b1b7f-71a5-4011-9441-d0b5e4122711", "Radiohead", "Radiohead")
        }],
        "release-group": {
            "id": "rg1",
            "type": "Album",
            "primary-type": "Album",
            "secondary-types": ["Live"],
            "first-release-date": "1997-05-21",
            "disambiguation": "",
            "genres": [{"name": "rock", "count": 3}, {"name": "alternative", "count": 1}]
        },
        "label-info": [{"catalog-number": "NODATA 02", "label": {"id": "l1", "name": "Parlophone"}}],
        "text-representation": {"script": "Latn", "language": "eng"},
        "media": media,
        "genres": [{"name": "alternative", "count": 1}]
    })
}
