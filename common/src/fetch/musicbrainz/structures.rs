use serde_derive::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub status: Option<String>,
    pub disambiguation: Option<String>,
    pub asin: Option<String>,
    pub country: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "release-events")]
    #[serde(default)]
    pub release_events: Vec<Event>,
    #[serde(rename = "artist-credit")]
    #[serde(default)]
    pub artist_credit: Vec<ArtistCredit>,
    #[serde(rename = "release-group")]
    pub release_group: Option<ReleaseGroup>,
    #[serde(rename = "label-info")]
    #[serde(default)]
    pub label_info: Vec<LabelInfo>,
    #[serde(rename = "text-representation")]
    pub text_representation: Option<TextRepresentation>,
    #[serde(default)]
    pub media: Vec<Medium>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseGroup {
    pub id: String,
    pub title: Option<String>,
    /// Legacy single release type.
    #[serde(rename = "type")]
    pub type_field: Option<String>,
    #[serde(rename = "primary-type")]
    pub primary_type: Option<String>,
    #[serde(rename = "secondary-types")]
    #[serde(default)]
    pub secondary_types: Vec<String>,
    #[serde(rename = "first-release-date")]
    pub first_release_date: Option<String>,
    pub disambiguation: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistCredit {
    /// The name the artist is credited as on this appearance.
    pub name: Option<String>,
    pub joinphrase: Option<String>,
    pub artist: Artist,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(rename = "sort-name")]
    pub sort_name: Option<String>,
    pub disambiguation: Option<String>,
    #[serde(default)]
    pub aliases: Vec<Alias>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    #[serde(rename = "sort-name")]
    pub sort_name: Option<String>,
    pub locale: Option<String>,
    pub primary: Option<bool>,
    #[serde(rename = "type")]
    pub type_field: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub date: Option<String>,
    pub area: Option<Area>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub name: Option<String>,
    #[serde(rename = "iso-3166-1-codes")]
    #[serde(default)]
    pub iso_3166_1_codes: Vec<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medium {
    pub position: Option<u32>,
    pub title: Option<String>,
    pub format: Option<String>,
    #[serde(rename = "track-count")]
    pub track_count: Option<u32>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(rename = "data-tracks")]
    #[serde(default)]
    pub data_tracks: Vec<Track>,
    pub pregap: Option<Track>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub number: Option<String>,
    pub position: Option<u32>,
    pub title: Option<String>,
    pub length: Option<u64>,
    #[serde(rename = "artist-credit")]
    pub artist_credit: Option<Vec<ArtistCredit>>,
    pub recording: Recording,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub id: String,
    pub title: Option<String>,
    pub length: Option<u64>,
    pub video: Option<bool>,
    pub disambiguation: Option<String>,
    #[serde(default)]
    pub isrcs: Vec<String>,
    #[serde(rename = "artist-credit")]
    pub artist_credit: Option<Vec<ArtistCredit>>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Recording {
    pub fn artist_relations(&self) -> impl Iterator<Item = (&str, &Artist)> {
        self.relations.iter().filter_map(Relation::artist)
    }

    pub fn work_relations(&self) -> impl Iterator<Item = (&str, &Work)> {
        self.relations
            .iter()
            .filter_map(|r| r.work.as_ref().map(|w| (r.type_field.as_str(), w)))
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(rename = "type")]
    #[serde(default)]
    pub type_field: String,
    #[serde(rename = "target-type")]
    pub target_type: Option<String>,
    pub artist: Option<Artist>,
    pub work: Option<Work>,
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl Relation {
    fn artist(&self) -> Option<(&str, &Artist)> {
        self.artist.as_ref().map(|a| (self.type_field.as_str(), a))
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Work {
    pub id: String,
    pub title: Option<String>,
    pub disambiguation: Option<String>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Work {
    pub fn artist_relations(&self) -> impl Iterator<Item = (&str, &Artist)> {
        self.relations.iter().filter_map(Relation::artist)
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRepresentation {
    pub language: Option<String>,
    pub script: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelInfo {
    #[serde(rename = "catalog-number")]
    pub catalog_number: Option<String>,
    pub label: Option<Label>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseSearch {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub releases: Vec<Release>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingSearch {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub recordings: Vec<Recording>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingBrowse {
    #[serde(rename = "recording-count")]
    #[serde(default)]
    pub recording_count: i64,
    #[serde(rename = "recording-offset")]
    #[serde(default)]
    pub recording_offset: i64,
    #[serde(default)]
    pub recordings: Vec<Recording>,
}
