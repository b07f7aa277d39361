use std::time::Instant;

use trendmap_core::treemap::TreemapItem;
use trendmap_core::trend::{Platform, TrendRecord};
use trendmap_core::viewport::ViewportTracker;
use trendmap_core::{filter_records, layout, rank_for_layout};

pub struct AppState {
    pub records: Vec<TrendRecord>,
    pub platform: Option<Platform>,
    pub search: String,
    pub max_tiles: usize,
    pub selected: Option<String>,

    pub tracker: ViewportTracker,
    pub tiles: Vec<TreemapItem>,
    pub filtered: Vec<TrendRecord>,
    /// Set when filters change; forces a relayout at the committed size.
    pub dirty: bool,
}

impl AppState {
    pub fn new(records: Vec<TrendRecord>) -> Self {
        Self {
            records,
            platform: None,
            search: String::new(),
            max_tiles: 20,
            selected: None,
            tracker: ViewportTracker::new(),
            tiles: Vec::new(),
            filtered: Vec::new(),
            dirty: true,
        }
    }

    /// Recompute tiles when the measured panel size commits or filters moved.
    pub fn refresh(&mut self, w: f32, h: f32, now: Instant) {
        let committed = self.tracker.observe(w, h, now);
        if committed.is_none() && !self.dirty {
            return;
        }
        let Some((vw, vh)) = self.tracker.committed() else {
            return;
        };

        self.filtered = filter_records(&self.records, self.platform, &self.search);
        let items = rank_for_layout(&self.filtered, self.max_tiles);
        self.tiles = layout(&items, 0.0, 0.0, vw, vh);
        self.dirty = false;
    }

    pub fn record(&self, id: &str) -> Option<&TrendRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn hidden_count(&self) -> usize {
        self.filtered.len().saturating_sub(self.max_tiles)
    }

    pub fn set_platform(&mut self, platform: Option<Platform>) {
        if self.platform != platform {
            self.platform = platform;
            self.selected = None;
            self.dirty = true;
        }
    }
}
