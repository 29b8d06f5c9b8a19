use crate::domain::contract::RawChartSnapshot;
use anyhow::{ensure, Context};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One point-in-time set of sales rankings across genres.
///
/// Genres keep the order they had in the source. Deserializing goes through
/// [`RawChartSnapshot`], so a deserialized or validated value has unique genre
/// names, contiguous ranks and fully populated entries. Values built by hand
/// carry no such guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChartSnapshot")]
pub struct ChartSnapshot {
    #[serde(serialize_with = "serialize_updated")]
    pub updated: DateTime<Utc>,
    pub source: String,
    #[serde(serialize_with = "serialize_genres")]
    pub genres: Vec<GenreChart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreChart {
    pub name: String,
    pub entries: Vec<RankingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub sales: SalesFigure,
}

/// Unit sales, written with `,` every three digits (`"285,000"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SalesFigure(pub u64);

impl ChartSnapshot {
    pub fn genre(&self, name: &str) -> Option<&[RankingEntry]> {
        self.genres
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.entries.as_slice())
    }

    pub fn genre_names(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(|g| g.name.as_str())
    }

    pub fn entry(&self, genre: &str, rank: u32) -> Option<&RankingEntry> {
        self.genre(genre)?.iter().find(|e| e.rank == rank)
    }

    /// Summed in `u128`; a genre of full-range `u64` figures cannot overflow it.
    pub fn total_sales(&self, genre: &str) -> Option<u128> {
        self.genre(genre)
            .map(|entries| entries.iter().map(|e| u128::from(e.sales.0)).sum())
    }

    pub fn entry_count(&self) -> usize {
        self.genres.iter().map(|g| g.entries.len()).sum()
    }
}

impl SalesFigure {
    pub fn units(self) -> u64 {
        self.0
    }
}

impl FromStr for SalesFigure {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        ensure!(!s.is_empty(), "sales figure must be non-empty");

        let mut groups = s.split(',');
        let head = groups.next().unwrap_or_default();
        ensure!(
            (1..=3).contains(&head.len()) && head.bytes().all(|b| b.is_ascii_digit()),
            "sales figure must start with 1-3 digits: {s:?}"
        );
        ensure!(
            !(head.starts_with('0') && s.len() > 1),
            "sales figure must not have leading zeros: {s:?}"
        );

        let mut digits = head.to_string();
        for group in groups {
            ensure!(
                group.len() == 3 && group.bytes().all(|b| b.is_ascii_digit()),
                "sales figure must group digits in threes: {s:?}"
            );
            digits.push_str(group);
        }

        let units = digits
            .parse::<u64>()
            .with_context(|| format!("sales figure out of range: {s:?}"))?;
        Ok(Self(units))
    }
}

impl fmt::Display for SalesFigure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        f.write_str(&out)
    }
}

impl Serialize for SalesFigure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

// Same shape as JavaScript's `Date.toISOString()`: 2026-02-14T15:30:00.000Z
fn serialize_updated<S>(updated: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&updated.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn serialize_genres<S>(genres: &[GenreChart], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(genres.len()))?;
    for genre in genres {
        map.serialize_entry(&genre.name, &genre.entries)?;
    }
    map.end()
}
