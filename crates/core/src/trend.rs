use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::search::fuzzy_score;
use crate::treemap::{WeightedItem, OVERFLOW_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Google,
    TikTok,
    X,
    Reddit,
    Gather,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Google,
        Platform::TikTok,
        Platform::X,
        Platform::Reddit,
        Platform::Gather,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Google => "Google Trends",
            Platform::TikTok => "TikTok",
            Platform::X => "X",
            Platform::Reddit => "Reddit",
            Platform::Gather => "Gather",
        }
    }
}

/// The common shape every platform adapter reduces its trends to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendRecord {
    pub id: String,
    pub title: String,
    pub platform: Platform,
    /// Search/post/view volume, whatever the platform counts.
    pub volume: u64,
    /// Volume change vs the previous capture, in percent.
    pub change_pct: f32,
    pub captured_at: DateTime<Utc>,
}

/// Reduce ranked records to layout inputs: the top `max_tiles` by volume,
/// with everything past the cutoff folded into a single overflow item. The
/// overflow weight is nominal only; the engine demotes it to the smallest
/// tile regardless.
pub fn rank_for_layout(records: &[TrendRecord], max_tiles: usize) -> Vec<WeightedItem> {
    let mut ranked: Vec<&TrendRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.volume.cmp(&a.volume));

    let cutoff = max_tiles.min(ranked.len());
    let mut items: Vec<WeightedItem> = ranked[..cutoff]
        .iter()
        .map(|r| WeightedItem::new(r.id.clone(), r.volume as f64))
        .collect();

    let hidden = &ranked[cutoff..];
    if !hidden.is_empty() {
        let leftover: u64 = hidden.iter().map(|r| r.volume).sum();
        items.push(WeightedItem::new(OVERFLOW_ID, leftover as f64));
    }
    items
}

/// Number of records folded into the overflow tile for a given cutoff.
pub fn overflow_count(records: &[TrendRecord], max_tiles: usize) -> usize {
    records.len().saturating_sub(max_tiles)
}

/// Platform filter plus fuzzy title match. An empty query keeps everything
/// in volume order; a non-empty one keeps matches sorted by score.
pub fn filter_records(
    records: &[TrendRecord],
    platform: Option<Platform>,
    query: &str,
) -> Vec<TrendRecord> {
    let by_platform = records
        .iter()
        .filter(|r| platform.map_or(true, |p| r.platform == p));

    if query.trim().is_empty() {
        let mut out: Vec<TrendRecord> = by_platform.cloned().collect();
        out.sort_by(|a, b| b.volume.cmp(&a.volume));
        return out;
    }

    let mut scored: Vec<(i64, TrendRecord)> = by_platform
        .filter_map(|r| fuzzy_score(query, &r.title).map(|s| (s, r.clone())))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, r)| r).collect()
}
