use crate::config::ChartOptions;
use crate::domain::chart::{ChartSnapshot, RankingEntry};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

// Headings of the all-genre chart, which repeats rows from the per-genre charts.
const OVERALL_GENRES: [&str; 2] = ["Overall", "総合"];

/// Something about a chart worth a second look. Findings never change the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartIssue {
    EmptyGenre {
        genre: String,
    },
    ShortChart {
        genre: String,
        entries: usize,
        depth: usize,
    },
    DepthExceeded {
        genre: String,
        entries: usize,
        depth: usize,
    },
    SalesOutOfOrder {
        genre: String,
        rank: u32,
        sales: u64,
        previous_sales: u64,
    },
    DuplicateTitle {
        genre: String,
        title: String,
        first_rank: u32,
        rank: u32,
    },
    OverallMismatch {
        genre: String,
        rank: u32,
        title: String,
        other_genre: String,
        other_rank: u32,
    },
}

impl ChartIssue {
    pub fn genre(&self) -> &str {
        match self {
            Self::EmptyGenre { genre }
            | Self::ShortChart { genre, .. }
            | Self::DepthExceeded { genre, .. }
            | Self::SalesOutOfOrder { genre, .. }
            | Self::DuplicateTitle { genre, .. }
            | Self::OverallMismatch { genre, .. } => genre,
        }
    }
}

impl fmt::Display for ChartIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGenre { genre } => write!(f, "genre {genre:?} has no entries"),
            Self::ShortChart {
                genre,
                entries,
                depth,
            } => write!(
                f,
                "genre {genre:?} has {entries} of {depth} entries (truncated chart?)"
            ),
            Self::DepthExceeded {
                genre,
                entries,
                depth,
            } => write!(
                f,
                "genre {genre:?} has {entries} entries, more than the chart depth of {depth}"
            ),
            Self::SalesOutOfOrder {
                genre,
                rank,
                sales,
                previous_sales,
            } => write!(
                f,
                "genre {genre:?} rank {rank} sold {sales}, more than rank {} ({previous_sales})",
                rank.saturating_sub(1)
            ),
            Self::DuplicateTitle {
                genre,
                title,
                first_rank,
                rank,
            } => write!(
                f,
                "genre {genre:?} lists {title:?} at rank {first_rank} and rank {rank}"
            ),
            Self::OverallMismatch {
                genre,
                rank,
                title,
                other_genre,
                other_rank,
            } => write!(
                f,
                "genre {genre:?} rank {rank} ({title:?}) disagrees with {other_genre:?} rank {other_rank} on author or publisher"
            ),
        }
    }
}

pub fn audit_snapshot(snapshot: &ChartSnapshot, options: &ChartOptions) -> Vec<ChartIssue> {
    let mut issues = Vec::new();

    for genre in &snapshot.genres {
        let name = &genre.name;
        let entries = genre.entries.len();

        if entries == 0 {
            issues.push(ChartIssue::EmptyGenre {
                genre: name.clone(),
            });
            continue;
        }

        if entries < options.max_depth {
            issues.push(ChartIssue::ShortChart {
                genre: name.clone(),
                entries,
                depth: options.max_depth,
            });
        } else if entries > options.max_depth {
            issues.push(ChartIssue::DepthExceeded {
                genre: name.clone(),
                entries,
                depth: options.max_depth,
            });
        }

        if options.check_sales_order {
            for pair in genre.entries.windows(2) {
                let (above, below) = (&pair[0], &pair[1]);
                if below.sales > above.sales {
                    issues.push(ChartIssue::SalesOutOfOrder {
                        genre: name.clone(),
                        rank: below.rank,
                        sales: below.sales.units(),
                        previous_sales: above.sales.units(),
                    });
                }
            }
        }

        let mut first_seen = HashMap::<&str, u32>::new();
        for entry in &genre.entries {
            if let Some(&first_rank) = first_seen.get(entry.title.as_str()) {
                issues.push(ChartIssue::DuplicateTitle {
                    genre: name.clone(),
                    title: entry.title.clone(),
                    first_rank,
                    rank: entry.rank,
                });
            } else {
                first_seen.insert(&entry.title, entry.rank);
            }
        }
    }

    issues.extend(overall_mismatches(snapshot));
    issues
}

// The overall chart is compiled from the same rows as the per-genre charts, so a
// title listed in both should carry the same author and publisher.
fn overall_mismatches(snapshot: &ChartSnapshot) -> Vec<ChartIssue> {
    let mut reference = HashMap::<String, (&str, &RankingEntry)>::new();
    for genre in &snapshot.genres {
        if OVERALL_GENRES.contains(&genre.name.as_str()) {
            continue;
        }
        for entry in &genre.entries {
            reference
                .entry(title_key(&entry.title))
                .or_insert((genre.name.as_str(), entry));
        }
    }

    let mut issues = Vec::new();
    for genre in &snapshot.genres {
        if !OVERALL_GENRES.contains(&genre.name.as_str()) {
            continue;
        }
        for entry in &genre.entries {
            let Some((other_genre, other)) = reference.get(&title_key(&entry.title)) else {
                continue;
            };
            if other.author != entry.author || other.publisher != entry.publisher {
                issues.push(ChartIssue::OverallMismatch {
                    genre: genre.name.clone(),
                    rank: entry.rank,
                    title: entry.title.clone(),
                    other_genre: other_genre.to_string(),
                    other_rank: other.rank,
                });
            }
        }
    }
    issues
}

fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{GenreChart, RankingEntry, SalesFigure};
    use chrono::TimeZone;
    use serde_json::json;

    fn genre(name: &str, rows: &[(&str, u64)]) -> GenreChart {
        GenreChart {
            name: name.to_string(),
            entries: (1u32..)
                .zip(rows)
                .map(|(rank, (title, sales))| RankingEntry {
                    rank,
                    title: title.to_string(),
                    author: "Haruki Murakami".to_string(),
                    publisher: "Kodansha".to_string(),
                    sales: SalesFigure(*sales),
                })
                .collect(),
        }
    }

    fn snapshot(genres: Vec<GenreChart>) -> ChartSnapshot {
        ChartSnapshot {
            updated: chrono::Utc.with_ymd_and_hms(2026, 2, 14, 15, 30, 0).unwrap(),
            source: "oricon.co.jp".to_string(),
            genres,
        }
    }

    fn options(max_depth: usize) -> ChartOptions {
        ChartOptions {
            max_depth,
            check_sales_order: true,
        }
    }

    #[test]
    fn clean_chart_has_no_issues() {
        let s = snapshot(vec![genre("Comics", &[("A", 30), ("B", 20), ("C", 20)])]);
        assert!(audit_snapshot(&s, &options(3)).is_empty());
    }

    #[test]
    fn flags_short_and_deep_charts() {
        let s = snapshot(vec![
            genre("Short", &[("A", 3), ("B", 2)]),
            genre("Deep", &[("A", 4), ("B", 3), ("C", 2), ("D", 1)]),
            genre("Empty", &[]),
        ]);
        let issues = audit_snapshot(&s, &options(3));
        assert_eq!(
            issues,
            vec![
                ChartIssue::ShortChart {
                    genre: "Short".to_string(),
                    entries: 2,
                    depth: 3,
                },
                ChartIssue::DepthExceeded {
                    genre: "Deep".to_string(),
                    entries: 4,
                    depth: 3,
                },
                ChartIssue::EmptyGenre {
                    genre: "Empty".to_string(),
                },
            ]
        );
    }

    #[test]
    fn flags_sales_inversion_unless_disabled() {
        let s = snapshot(vec![genre("Comics", &[("A", 10), ("B", 25)])]);
        let issues = audit_snapshot(&s, &options(2));
        assert_eq!(
            issues,
            vec![ChartIssue::SalesOutOfOrder {
                genre: "Comics".to_string(),
                rank: 2,
                sales: 25,
                previous_sales: 10,
            }]
        );
        assert_eq!(
            issues[0].to_string(),
            "genre \"Comics\" rank 2 sold 25, more than rank 1 (10)"
        );

        let relaxed = ChartOptions {
            max_depth: 2,
            check_sales_order: false,
        };
        assert!(audit_snapshot(&s, &relaxed).is_empty());
    }

    #[test]
    fn flags_duplicate_titles_within_a_genre() {
        let s = snapshot(vec![
            genre("Comics", &[("Kitchen", 3), ("After Dark", 2), ("Kitchen", 1)]),
            genre("Paperback", &[("Kitchen", 3), ("Verity", 2), ("Never Lie", 1)]),
        ]);
        let issues = audit_snapshot(&s, &options(3));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].genre(), "Comics");
        assert!(matches!(
            &issues[0],
            ChartIssue::DuplicateTitle { first_rank: 1, rank: 3, .. }
        ));
    }

    #[test]
    fn flags_overall_rows_that_disagree_with_their_genre() {
        let mut overall = genre("Overall", &[("kitchen", 3), ("Verity", 2)]);
        overall.entries[0].publisher = "Fukutake Shoten".to_string();
        let s = snapshot(vec![
            overall,
            genre("Light Literature", &[("Kitchen", 3), ("After Dark", 1)]),
            genre("Paperback", &[("Verity", 2), ("Never Lie", 1)]),
        ]);

        let issues = audit_snapshot(&s, &options(2));
        assert_eq!(
            issues,
            vec![ChartIssue::OverallMismatch {
                genre: "Overall".to_string(),
                rank: 1,
                title: "kitchen".to_string(),
                other_genre: "Light Literature".to_string(),
                other_rank: 1,
            }]
        );
    }

    #[test]
    fn display_tolerates_hand_built_rank_zero() {
        let issue = ChartIssue::SalesOutOfOrder {
            genre: "Comics".to_string(),
            rank: 0,
            sales: 2,
            previous_sales: 1,
        };
        assert_eq!(
            issue.to_string(),
            "genre \"Comics\" rank 0 sold 2, more than rank 0 (1)"
        );
    }

    #[test]
    fn issues_serialize_with_kind_tag() {
        let issue = ChartIssue::ShortChart {
            genre: "Light Literature".to_string(),
            entries: 5,
            depth: 10,
        };
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            json!({"kind": "short_chart", "genre": "Light Literature", "entries": 5, "depth": 10})
        );
    }
}
