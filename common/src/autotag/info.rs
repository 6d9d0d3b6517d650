use serde_derive::Serialize;
use std::collections::BTreeMap;

pub const DATA_SOURCE: &str = "MusicBrainz";

/// Extra values a hook listener wants merged into a record.
pub type FieldMap = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl FieldValue {
    fn into_string(self) -> String {
        match self {
            FieldValue::Str(s) => s,
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Bool(b) => b.to_string(),
        }
    }

    fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            FieldValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Str(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Strips NUL characters and turns strings left empty into `None`.
fn clean(value: &mut Option<String>) {
    if let Some(s) = value.as_mut() {
        if s.contains('\0') {
            s.retain(|c| c != '\0');
        }
        if s.is_empty() {
            *value = None;
        }
    }
}

fn clean_extra(extra: &mut FieldMap) {
    extra.retain(|_, v| match v {
        FieldValue::Str(s) => {
            s.retain(|c| c != '\0');
            !s.is_empty()
        }
        _ => true,
    });
}

#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct TrackInfo {
    pub title: Option<String>,
    pub track_id: Option<String>,
    pub release_track_id: Option<String>,
    pub index: Option<u32>,
    pub medium: Option<u32>,
    pub medium_index: Option<u32>,
    pub medium_total: Option<u32>,
    pub artist: Option<String>,
    pub artist_sort: Option<String>,
    pub artist_credit: Option<String>,
    pub artist_id: Option<String>,
    pub remixer: Option<String>,
    /// Duration in seconds.
    pub length: Option<f64>,
    pub trackdisambig: Option<String>,
    pub isrc: Option<String>,
    pub work: Option<String>,
    pub mb_workid: Option<String>,
    pub work_disambig: Option<String>,
    pub lyricist: Option<String>,
    pub composer: Option<String>,
    pub composer_sort: Option<String>,
    pub arranger: Option<String>,
    pub disctitle: Option<String>,
    pub media: Option<String>,
    pub track_alt: Option<String>,
    pub data_source: String,
    pub data_url: String,
    #[serde(flatten)]
    pub extra: FieldMap,
}

impl TrackInfo {
    fn str_field(&mut self, name: &str) -> Option<&mut Option<String>> {
        Some(match name {
            "title" => &mut self.title,
            "track_id" => &mut self.track_id,
            "release_track_id" => &mut self.release_track_id,
            "artist" => &mut self.artist,
            "artist_sort" => &mut self.artist_sort,
            "artist_credit" => &mut self.artist_credit,
            "artist_id" => &mut self.artist_id,
            "remixer" => &mut self.remixer,
            "trackdisambig" => &mut self.trackdisambig,
            "isrc" => &mut self.isrc,
            "work" => &mut self.work,
            "mb_workid" => &mut self.mb_workid,
            "work_disambig" => &mut self.work_disambig,
            "lyricist" => &mut self.lyricist,
            "composer" => &mut self.composer,
            "composer_sort" => &mut self.composer_sort,
            "arranger" => &mut self.arranger,
            "disctitle" => &mut self.disctitle,
            "media" => &mut self.media,
            "track_alt" => &mut self.track_alt,
            _ => return None,
        })
    }

    fn int_field(&mut self, name: &str) -> Option<&mut Option<u32>> {
        Some(match name {
            "index" => &mut self.index,
            "medium" => &mut self.medium,
            "medium_index" => &mut self.medium_index,
            "medium_total" => &mut self.medium_total,
            _ => return None,
        })
    }

    /// Merges hook-provided values. Known names overwrite the typed field,
    /// anything else lands in `extra`.
    pub fn update(&mut self, fields: FieldMap) {
        for (name, value) in fields {
            if let Some(slot) = self.str_field(&name) {
                *slot = Some(value.into_string());
            } else if let Some(slot) = self.int_field(&name) {
                match value.as_int().and_then(|i| u32::try_from(i).ok()) {
                    Some(i) => *slot = Some(i),
                    None => tracing::warn! {%name, ?value, "Ignoring non-integer track field"},
                }
            } else if name == "length" {
                match value.as_float() {
                    Some(f) => self.length = Some(f),
                    None => tracing::warn! {?value, "Ignoring non-numeric track length"},
                }
            } else {
                self.extra.insert(name, value);
            }
        }
    }

    pub fn finalize(&mut self) {
        for name in TRACK_STR_FIELDS {
            if let Some(slot) = self.str_field(name) {
                clean(slot);
            }
        }
        clean_extra(&mut self.extra);
    }
}

const TRACK_STR_FIELDS: &[&str] = &[
    "title",
    "track_id",
    "release_track_id",
    "artist",
    "artist_sort",
    "artist_credit",
    "artist_id",
    "remixer",
    "trackdisambig",
    "isrc",
    "work",
    "mb_workid",
    "work_disambig",
    "lyricist",
    "composer",
    "composer_sort",
    "arranger",
    "disctitle",
    "media",
    "track_alt",
];

#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct AlbumInfo {
    pub album: Option<String>,
    pub album_id: Option<String>,
    pub artist: Option<String>,
    pub artist_sort: Option<String>,
    pub artist_credit: Option<String>,
    pub artist_id: Option<String>,
    pub tracks: Vec<TrackInfo>,
    pub mediums: usize,
    pub va: bool,
    pub asin: Option<String>,
    pub releasegroup_id: Option<String>,
    pub albumstatus: Option<String>,
    pub albumdisambig: Option<String>,
    pub releasegroupdisambig: Option<String>,
    pub albumtype: Option<String>,
    pub albumtypes: Vec<String>,
    pub country: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub original_year: Option<i32>,
    pub original_month: Option<u8>,
    pub original_day: Option<u8>,
    pub label: Option<String>,
    pub catalognum: Option<String>,
    pub script: Option<String>,
    pub language: Option<String>,
    pub media: Option<String>,
    pub genre: Option<String>,
    pub data_source: String,
    pub data_url: String,
    #[serde(flatten)]
    pub extra: FieldMap,
}

const ALBUM_STR_FIELDS: &[&str] = &[
    "album",
    "album_id",
    "artist",
    "artist_sort",
    "artist_credit",
    "artist_id",
    "asin",
    "releasegroup_id",
    "albumstatus",
    "albumdisambig",
    "releasegroupdisambig",
    "albumtype",
    "country",
    "label",
    "catalognum",
    "script",
    "language",
    "media",
    "genre",
];

impl AlbumInfo {
    fn str_field(&mut self, name: &str) -> Option<&mut Option<String>> {
        Some(match name {
            "album" => &mut self.album,
            "album_id" => &mut self.album_id,
            "artist" => &mut self.artist,
            "artist_sort" => &mut self.artist_sort,
            "artist_credit" => &mut self.artist_credit,
            "artist_id" => &mut self.artist_id,
            "asin" => &mut self.asin,
            "releasegroup_id" => &mut self.releasegroup_id,
            "albumstatus" => &mut self.albumstatus,
            "albumdisambig" => &mut self.albumdisambig,
            "releasegroupdisambig" => &mut self.releasegroupdisambig,
            "albumtype" => &mut self.albumtype,
            "country" => &mut self.country,
            "label" => &mut self.label,
            "catalognum" => &mut self.catalognum,
            "script" => &mut self.script,
            "language" => &mut self.language,
            "media" => &mut self.media,
            "genre" => &mut self.genre,
            _ => return None,
        })
    }

    fn set_int(&mut self, name: &str, value: i64) -> bool {
        match name {
            "year" | "original_year" => {
                let Ok(v) = i32::try_from(value) else {
                    return false;
                };
                if name == "year" {
                    self.year = Some(v);
                } else {
                    self.original_year = Some(v);
                }
            }
            "month" | "day" | "original_month" | "original_day" => {
                let Ok(v) = u8::try_from(value) else {
                    return false;
                };
                let slot = match name {
                    "month" => &mut self.month,
                    "day" => &mut self.day,
                    "original_month" => &mut self.original_month,
                    _ => &mut self.original_day,
                };
                *slot = Some(v);
            }
            "mediums" => match usize::try_from(value) {
                Ok(v) => self.mediums = v,
                Err(_) => return false,
            },
            _ => return false,
        }
        true
    }

    /// Merges hook-provided values. Known names overwrite the typed field,
    /// anything else lands in `extra`.
    pub fn update(&mut self, fields: FieldMap) {
        for (name, value) in fields {
            if let Some(slot) = self.str_field(&name) {
                *slot = Some(value.into_string());
                continue;
            }
            let numeric = matches!(
                name.as_str(),
                "year" | "month" | "day" | "original_year" | "original_month" | "original_day"
                    | "mediums"
            );
            if numeric {
                if !value.as_int().map_or(false, |i| self.set_int(&name, i)) {
                    tracing::warn! {%name, ?value, "Ignoring invalid album field"};
                }
            } else if name == "va" {
                match value {
                    FieldValue::Bool(b) => self.va = b,
                    other => tracing::warn! {value = ?other, "Ignoring non-boolean va field"},
                }
            } else {
                self.extra.insert(name, value);
            }
        }
    }

    /// Cleans every string of the album and of its tracks.
    pub fn finalize(&mut self) {
        for name in ALBUM_STR_FIELDS {
            if let Some(slot) = self.str_field(name) {
                clean(slot);
            }
        }
        self.albumtypes.iter_mut().for_each(|t| t.retain(|c| c != '\0'));
        self.albumtypes.retain(|t| !t.is_empty());
        clean_extra(&mut self.extra);
        self.tracks.iter_mut().for_each(TrackInfo::finalize);
    }
}
