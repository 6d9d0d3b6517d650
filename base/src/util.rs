use eyre::{eyre, Result};
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

pub fn path_to_str(path: &Path) -> Result<String> {
    Ok(String::from(path.to_str().ok_or_else(|| {
        eyre!("Could not convert path to string: {:?}", path)
    })?))
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalDate {
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub day: Option<u8>,
}

/// Parses a (possibly partial) `YYYY-MM-DD` date. Parts are consumed left to
/// right into the year, month and day slots; a part that is not an integer
/// leaves its slot unset and the following part moves on to the next slot.
pub fn maybe_date(d: Option<&str>) -> OptionalDate {
    let mut res = OptionalDate::default();
    let s = match d {
        Some(s) if !s.is_empty() => s,
        _ => return res,
    };
    let mut parts = s.split('-');
    if let Some(year) = parts.next().and_then(|p| p.trim().parse::<i32>().ok()) {
        res.year = Some(year);
    }
    if let Some(month) = parts.next().and_then(|p| p.trim().parse::<u8>().ok()) {
        res.month = Some(month);
    }
    if let Some(day) = parts.next().and_then(|p| p.trim().parse::<u8>().ok()) {
        res.day = Some(day);
    }
    tracing::trace!(date = %s, ?res, "Parsed date");
    res
}
