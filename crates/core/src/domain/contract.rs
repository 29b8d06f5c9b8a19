use crate::domain::chart::{ChartSnapshot, GenreChart, RankingEntry, SalesFigure};
use anyhow::{ensure, Context};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Chart data exactly as it appears on the wire, before any invariant is checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawChartSnapshot {
    pub updated: String,
    pub source: String,
    pub genres: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRankingEntry {
    pub rank: i64,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub sales: String,
}

impl RawChartSnapshot {
    pub fn validate_and_into_snapshot(self) -> anyhow::Result<ChartSnapshot> {
        let updated = DateTime::parse_from_rfc3339(self.updated.trim())
            .with_context(|| format!("updated is not an ISO-8601 timestamp: {:?}", self.updated))?
            .with_timezone(&Utc);

        let source = self.source.trim().to_string();
        ensure!(!source.is_empty(), "source must be non-empty");

        let mut seen_genres = BTreeSet::<String>::new();
        let mut genres = Vec::with_capacity(self.genres.len());
        for (name, value) in self.genres {
            let name = name.trim().to_string();
            ensure!(!name.is_empty(), "genre name must be non-empty");
            ensure!(seen_genres.insert(name.clone()), "duplicate genre {name:?}");

            let raw_entries = serde_json::from_value::<Vec<RawRankingEntry>>(value)
                .with_context(|| format!("genre {name:?} does not match the ranking entry schema"))?;

            let mut entries = Vec::with_capacity(raw_entries.len());
            for (expected_rank, raw) in (1u32..).zip(raw_entries) {
                entries.push(raw.validate_and_into_entry(&name, expected_rank)?);
            }

            genres.push(GenreChart { name, entries });
        }

        Ok(ChartSnapshot {
            updated,
            source,
            genres,
        })
    }
}

impl RawRankingEntry {
    fn validate_and_into_entry(
        self,
        genre: &str,
        expected_rank: u32,
    ) -> anyhow::Result<RankingEntry> {
        ensure!(
            self.rank >= 1,
            "genre {genre:?}: rank must be positive (got {})",
            self.rank
        );
        // Ranks must read 1, 2, 3, ... in list order.
        ensure!(
            self.rank == i64::from(expected_rank),
            "genre {genre:?}: expected rank {expected_rank}, got {}",
            self.rank
        );

        let title = self.title.trim().to_string();
        ensure!(!title.is_empty(), "genre {genre:?} rank {expected_rank}: title must be non-empty");

        let author = self.author.trim().to_string();
        ensure!(!author.is_empty(), "genre {genre:?} rank {expected_rank}: author must be non-empty");

        let publisher = self.publisher.trim().to_string();
        ensure!(
            !publisher.is_empty(),
            "genre {genre:?} rank {expected_rank}: publisher must be non-empty"
        );

        let sales = self
            .sales
            .trim()
            .parse::<SalesFigure>()
            .with_context(|| format!("genre {genre:?} rank {expected_rank}: invalid sales figure"))?;

        Ok(RankingEntry {
            rank: expected_rank,
            title,
            author,
            publisher,
            sales,
        })
    }
}

impl TryFrom<RawChartSnapshot> for ChartSnapshot {
    type Error = anyhow::Error;

    fn try_from(raw: RawChartSnapshot) -> anyhow::Result<Self> {
        raw.validate_and_into_snapshot()
    }
}
