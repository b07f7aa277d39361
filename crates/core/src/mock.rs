use chrono::{Duration, Utc};

use crate::trend::{Platform, TrendRecord};

const TOPICS: &[&str] = &[
    "ai agents",
    "election polls",
    "sourdough starter",
    "marathon training",
    "rust 2024 edition",
    "quiet luxury",
    "solar flare",
    "transfer window",
    "vision pro apps",
    "cold plunge",
    "heat pump rebates",
    "indie game jam",
    "meal prep hacks",
    "vintage film cameras",
    "city builder games",
    "open source llms",
    "street food tour",
    "home battery storage",
    "speedcubing",
    "trail running shoes",
];

/// Deterministic sample trends for demos and the CLI `--sample` flag.
/// Same seed, same records; no RNG dependency needed.
pub fn sample_trends(seed: u64, per_platform: usize) -> Vec<TrendRecord> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).max(1);
    let now = Utc::now();

    let mut out = Vec::with_capacity(per_platform * Platform::ALL.len());
    for platform in Platform::ALL {
        for i in 0..per_platform {
            let r = xorshift(&mut state);
            let topic = TOPICS[(r as usize) % TOPICS.len()];
            let volume = 500 + r % 2_000_000;
            let change = ((xorshift(&mut state) % 2000) as f32 - 1000.0) / 10.0;
            out.push(TrendRecord {
                id: format!("{}-{}", platform.label().to_lowercase().replace(' ', "-"), i),
                title: topic.to_string(),
                platform,
                volume,
                change_pct: change,
                captured_at: now - Duration::minutes((r % 120) as i64),
            });
        }
    }
    out
}

fn xorshift(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    x
}
