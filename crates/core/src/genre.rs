use crate::domain::chart::ChartSnapshot;
use anyhow::ensure;
use std::collections::HashSet;

// Genre headings used by the Japanese distributor charts (Tohan, Nippan, Oricon).
const GENRE_NAMES: [(&str, &str); 12] = [
    ("総合", "Overall"),
    ("文芸書", "Literature & Fiction"),
    ("ノンフィクション・ライトエッセイ", "Non-Fiction & Light Essays"),
    ("エンターテイメント", "Entertainment"),
    ("ビジネス書", "Business Books"),
    ("趣味実用書", "Hobby & Practical"),
    ("生活実用書", "Lifestyle & Practical"),
    ("児童書", "Children's Books"),
    ("ノベルス", "Novels"),
    ("新書", "New Books"),
    ("文庫", "Pocket Books"),
    ("コミックス", "Comics"),
];

pub fn english_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    GENRE_NAMES
        .iter()
        .find(|(ja, _)| *ja == name)
        .map(|(_, en)| *en)
}

/// Returns a copy of `snapshot` with known genre names in English.
///
/// Unknown names are kept as they are. Fails if two genres would end up with
/// the same name.
pub fn translate_genres(snapshot: &ChartSnapshot) -> anyhow::Result<ChartSnapshot> {
    let mut out = snapshot.clone();
    let mut seen = HashSet::with_capacity(out.genres.len());

    for genre in &mut out.genres {
        if let Some(en) = english_name(&genre.name) {
            tracing::debug!(from = %genre.name, to = en, "translated genre name");
            genre.name = en.to_string();
        }
        ensure!(
            seen.insert(genre.name.clone()),
            "genre name {:?} appears twice after translation",
            genre.name
        );
    }

    Ok(out)
}
