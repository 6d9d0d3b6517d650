use base::setting::Settings;
use base::util::maybe_date;
use itertools::Itertools;
use std::collections::HashMap;

use super::credit::flatten_artist_credit;
use super::info::{AlbumInfo, TrackInfo, DATA_SOURCE};
use crate::fetch::musicbrainz::{
    Api, ApiError, Artist, ArtistCredit, Genre, Recording, Release, Track, BROWSE_INCLUDES,
    VARIOUS_ARTISTS_ID,
};
use crate::plugins::Hooks;

pub const BASE_URL: &str = "https://musicbrainz.org/";

/// Recording titles MusicBrainz uses as placeholders rather than music.
const SKIPPED_TRACKS: &[&str] = &["[data track]"];

/// Above this many tracks release lookups come back without relations.
pub const BROWSE_MAXTRACKS: usize = 500;
pub const BROWSE_CHUNKSIZE: u32 = 100;

const NO_LABEL: &str = "[no label]";

pub fn track_url(id: &str) -> String {
    format!("{}recording/{}", BASE_URL, id)
}

pub fn album_url(id: &str) -> String {
    format!("{}release/{}", BASE_URL, id)
}

/// Where a track sits on its release. All numbers are 1-based.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackPosition {
    pub index: u32,
    pub medium: Option<u32>,
    pub medium_index: Option<u32>,
    pub medium_total: u32,
}

fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn seconds(ms: Option<u64>) -> Option<f64> {
    ms.filter(|ms| *ms > 0).map(|ms| ms as f64 / 1000.0)
}

fn related_names<'a>(
    relations: impl Iterator<Item = (&'a str, &'a Artist)>,
    kind: &str,
) -> Vec<&'a Artist> {
    relations
        .filter(|(k, _)| *k == kind)
        .map(|(_, a)| a)
        .collect()
}

fn join_names(artists: &[&Artist]) -> Option<String> {
    if artists.is_empty() {
        return None;
    }
    Some(artists.iter().map(|a| a.name.as_str()).join(", "))
}

fn set_artist(info: &mut TrackInfo, credit: &[ArtistCredit], settings: &Settings) {
    let flat = flatten_artist_credit(credit, &settings.import);
    info.artist = Some(flat.name);
    info.artist_sort = Some(flat.sort_name);
    info.artist_credit = Some(flat.credit);
    info.artist_id = credit.first().map(|ac| ac.artist.id.clone());
}

/// Maps a recording to a track. `position` is only given for tracks that
/// belong to a release.
pub fn track_info(
    recording: &Recording,
    position: Option<TrackPosition>,
    settings: &Settings,
    hooks: &Hooks,
) -> TrackInfo {
    let mut info = TrackInfo {
        title: recording.title.clone(),
        track_id: Some(recording.id.clone()),
        data_source: DATA_SOURCE.to_string(),
        data_url: track_url(&recording.id),
        ..Default::default()
    };
    if let Some(pos) = position {
        info.index = Some(pos.index);
        info.medium = pos.medium;
        info.medium_index = pos.medium_index;
        info.medium_total = Some(pos.medium_total);
    }

    if let Some(credit) = recording.artist_credit.as_deref().filter(|c| !c.is_empty()) {
        set_artist(&mut info, credit, settings);
    }

    info.remixer = join_names(&related_names(recording.artist_relations(), "remixer"));
    info.length = seconds(recording.length);
    info.trackdisambig = non_empty(&recording.disambiguation);
    if !recording.isrcs.is_empty() {
        info.isrc = Some(recording.isrcs.join(";"));
    }

    let mut lyricist = Vec::new();
    let mut composer = Vec::new();
    for (kind, work) in recording.work_relations() {
        if kind != "performance" {
            continue;
        }
        info.work = work.title.clone();
        info.mb_workid = Some(work.id.clone());
        if let Some(disambig) = non_empty(&work.disambiguation) {
            info.work_disambig = Some(disambig);
        }
        lyricist.extend(related_names(work.artist_relations(), "lyricist"));
        composer.extend(related_names(work.artist_relations(), "composer"));
    }
    info.lyricist = join_names(&lyricist);
    info.composer = join_names(&composer);
    if !composer.is_empty() {
        info.composer_sort = Some(
            composer
                .iter()
                .map(|a| a.sort_name.as_deref().unwrap_or(a.name.as_str()))
                .join(", "),
        );
    }
    info.arranger = join_names(&related_names(recording.artist_relations(), "arranger"));

    for fields in hooks.track_extract(recording) {
        info.update(fields);
    }
    info.finalize();
    info
}

/// Picks the first release event in a preferred country, falling back to
/// the release's own country and date.
pub fn preferred_release_event(
    release: &Release,
    countries: &[String],
) -> (Option<String>, Option<String>) {
    for country in countries {
        let event = release.release_events.iter().find(|e| {
            e.area
                .as_ref()
                .map_or(false, |a| a.iso_3166_1_codes.contains(country))
        });
        if let Some(event) = event {
            return (Some(country.clone()), event.date.clone());
        }
    }
    (release.country.clone(), release.date.clone())
}

/// Sums counts per genre name and renders the names by descending count.
/// Ties keep the order in which the names were first seen.
pub fn merge_genres<'a>(sources: impl IntoIterator<Item = &'a [Genre]>) -> Option<String> {
    let mut totals: Vec<(&str, u64)> = Vec::new();
    for genre in sources.into_iter().flatten() {
        match totals.iter_mut().find(|(name, _)| *name == genre.name) {
            Some((_, count)) => *count += genre.count,
            None => totals.push((genre.name.as_str(), genre.count)),
        }
    }
    if totals.is_empty() {
        return None;
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    Some(totals.into_iter().map(|(name, _)| name).join("; "))
}

fn track_total(release: &Release) -> usize {
    release.media.iter().map(|m| m.tracks.len()).sum()
}

/// MusicBrainz drops recording relations from release lookups with more
/// than [`BROWSE_MAXTRACKS`] tracks. Browses the release's recordings page
/// by page and swaps them into the tracks.
pub async fn recover_relations<A: Api + ?Sized>(
    release: &mut Release,
    api: &A,
) -> Result<(), ApiError> {
    let ntracks = track_total(release);
    if ntracks <= BROWSE_MAXTRACKS {
        return Ok(());
    }
    tracing::debug! {id = %release.id, ntracks, "Album has too many tracks"};
    let mut recordings = HashMap::new();
    for offset in (0..ntracks).step_by(BROWSE_CHUNKSIZE as usize) {
        tracing::debug! {offset, "Retrieving tracks"};
        let page = api
            .browse_recordings(&release.id, BROWSE_INCLUDES, BROWSE_CHUNKSIZE, offset)
            .await?;
        recordings.extend(page.recordings.into_iter().map(|r| (r.id.clone(), r)));
    }
    for track in release.media.iter_mut().flat_map(|m| m.tracks.iter_mut()) {
        match recordings.get(&track.recording.id) {
            Some(recording) => track.recording = recording.clone(),
            None => tracing::warn! {
                recording = %track.recording.id,
                "Recording missing from browse results, keeping release data"
            },
        }
    }
    Ok(())
}

fn keep_track(track: &Track, settings: &Settings) -> bool {
    if let Some(title) = track.recording.title.as_deref() {
        if SKIPPED_TRACKS.contains(&title) {
            return false;
        }
    }
    !(track.recording.video == Some(true) && settings.matching.ignore_video_tracks)
}

fn album_tracks(release: &Release, settings: &Settings, hooks: &Hooks) -> Vec<TrackInfo> {
    let mut infos = Vec::new();
    let mut index = 0;
    for medium in release.media.iter() {
        let format = medium.format.as_deref();
        if format.map_or(false, |f| settings.matching.ignored_media.iter().any(|m| m == f)) {
            continue;
        }

        let mut tracks = medium.tracks.iter().collect::<Vec<_>>();
        if !settings.matching.ignore_data_tracks {
            tracks.extend(medium.data_tracks.iter());
        }
        let medium_total = tracks.len() as u32;
        if let Some(pregap) = medium.pregap.as_ref() {
            tracks.insert(0, pregap);
        }

        for track in tracks {
            if !keep_track(track, settings) {
                continue;
            }
            index += 1;
            let position = TrackPosition {
                index,
                medium: medium.position,
                medium_index: track.position,
                medium_total,
            };
            let mut info = track_info(&track.recording, Some(position), settings, hooks);
            info.release_track_id = Some(track.id.clone());
            info.disctitle = non_empty(&medium.title);
            info.media = medium.format.clone();
            info.track_alt = track.number.clone();

            if let Some(title) = non_empty(&track.title) {
                info.title = Some(title);
            }
            if let Some(credit) = track.artist_credit.as_deref().filter(|c| !c.is_empty()) {
                set_artist(&mut info, credit, settings);
            }
            if let Some(length) = seconds(track.length) {
                info.length = Some(length);
            }
            infos.push(info);
        }
    }
    infos
}

/// Maps a fully fetched release to an album.
pub fn album_info(release: &Release, settings: &Settings, hooks: &Hooks) -> AlbumInfo {
    let flat = flatten_artist_credit(&release.artist_credit, &settings.import);
    let artist_id = release.artist_credit.first().map(|ac| ac.artist.id.clone());
    let mut info = AlbumInfo {
        album: Some(release.title.clone()),
        album_id: Some(release.id.clone()),
        artist: Some(flat.name),
        artist_sort: Some(flat.sort_name),
        artist_credit: Some(flat.credit),
        tracks: album_tracks(release, settings, hooks),
        mediums: release.media.len(),
        va: artist_id.as_deref() == Some(VARIOUS_ARTISTS_ID),
        artist_id,
        asin: release.asin.clone(),
        albumstatus: release.status.clone(),
        albumdisambig: non_empty(&release.disambiguation),
        data_source: DATA_SOURCE.to_string(),
        data_url: album_url(&release.id),
        ..Default::default()
    };
    if info.va {
        info.artist = Some(settings.va_name.clone());
    }

    let group = release.release_group.as_ref();
    if let Some(group) = group {
        info.releasegroup_id = Some(group.id.clone());
        info.releasegroupdisambig = non_empty(&group.disambiguation);
        info.albumtype = non_empty(&group.type_field)
            .or_else(|| non_empty(&group.primary_type))
            .map(|t| t.to_lowercase());
        info.albumtypes = group
            .primary_type
            .iter()
            .chain(group.secondary_types.iter())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect();
    }

    let (country, date) =
        preferred_release_event(release, &settings.matching.preferred.countries);
    info.country = country;
    let group_date = group.and_then(|g| non_empty(&g.first_release_date));
    let date = maybe_date(
        date.filter(|d| !d.is_empty())
            .or_else(|| group_date.clone())
            .as_deref(),
    );
    info.year = date.year;
    info.month = date.month;
    info.day = date.day;
    let original = maybe_date(group_date.as_deref());
    info.original_year = original.year;
    info.original_month = original.month;
    info.original_day = original.day;

    if let Some(label_info) = release.label_info.first() {
        info.label = label_info
            .label
            .as_ref()
            .map(|l| l.name.clone())
            .filter(|name| name != NO_LABEL);
        info.catalognum = label_info.catalog_number.clone();
    }

    if let Some(rep) = release.text_representation.as_ref() {
        info.script = rep.script.clone();
        info.language = rep.language.clone();
    }

    info.media = release.media.first().and_then(|m| m.format.clone());

    if settings.musicbrainz.genres {
        let group_genres = group.map_or(&[][..], |g| g.genres.as_slice());
        info.genre = merge_genres([group_genres, release.genres.as_slice()]);
    }

    for fields in hooks.album_extract(release) {
        info.update(fields);
    }
    info.finalize();
    info
}
