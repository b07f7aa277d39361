use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Reserved id for the aggregate "+N more" tile. At most one item per call
/// should carry it; if several do, only the first in input order is demoted,
/// the rest are laid out as regular items.
pub const OVERFLOW_ID: &str = "__others__";

/// Tiles never shrink below this footprint so they stay clickable.
const MIN_TILE_W: f64 = 20.0;
const MIN_TILE_H: f64 = 15.0;

/// Zero / missing weights are raised to this so the item stays visible.
const MIN_WEIGHT: f64 = 1.0;

/// The overflow tile is reweighted to this fraction of the smallest regular
/// weight (floored at MIN_WEIGHT), regardless of its nominal weight.
const OVERFLOW_FRACTION: f64 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn area(&self) -> f32 {
        self.w * self.h
    }
}

/// One layout input: a stable id plus the scalar driving its share of area.
/// Callers keep their payload (trend record, click handler, ...) keyed by id.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedItem {
    pub id: String,
    pub weight: f64,
}

impl WeightedItem {
    pub fn new(id: impl Into<String>, weight: f64) -> Self {
        Self { id: id.into(), weight }
    }
}

/// One placed tile. `weight` is the effective weight after coercion and
/// overflow demotion, i.e. the one that produced `rect`.
#[derive(Clone, Debug, PartialEq)]
pub struct TreemapItem {
    pub id: String,
    pub weight: f64,
    pub rect: Rect,
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("duplicate item id `{0}`")]
    DuplicateId(String),
    #[error("negative weight {weight} for item `{id}`")]
    NegativeWeight { id: String, weight: f64 },
}

/// Optional precondition check. `layout` itself never validates and never
/// fails; callers that want duplicate/negative inputs surfaced run this first.
pub fn validate(items: &[WeightedItem]) -> Result<(), LayoutError> {
    let mut seen = HashSet::with_capacity(items.len());
    for it in items {
        if !seen.insert(it.id.as_str()) {
            return Err(LayoutError::DuplicateId(it.id.clone()));
        }
        if it.weight < 0.0 {
            return Err(LayoutError::NegativeWeight {
                id: it.id.clone(),
                weight: it.weight,
            });
        }
    }
    Ok(())
}

/// Squarified treemap layout (Bruls, Huizing, van Wijk).
///
/// Partitions the `(x, y, width, height)` box into one tile per item,
/// proportioned by weight and kept roughly square. Total over its inputs:
/// an empty list yields `[]`, a zero-area box yields one zero-area tile per
/// item, nothing panics.
pub fn layout(items: &[WeightedItem], x: f32, y: f32, width: f32, height: f32) -> Vec<TreemapItem> {
    if items.is_empty() {
        return Vec::new();
    }

    // Degenerate box: keep identities, nothing visible to place.
    if width <= 0.0 || height <= 0.0 {
        return items
            .iter()
            .map(|it| TreemapItem {
                id: it.id.clone(),
                weight: it.weight,
                rect: Rect {
                    x,
                    y,
                    w: width.max(0.0),
                    h: height.max(0.0),
                },
            })
            .collect();
    }

    let ordered = order_items(items);
    let total: f64 = ordered.iter().map(|it| it.weight).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    // Normalize weights to pixel areas filling the box.
    let box_area = width as f64 * height as f64;
    let areas: Vec<f64> = ordered.iter().map(|it| it.weight / total * box_area).collect();

    let mut out = Vec::with_capacity(ordered.len());
    squarify(
        &ordered,
        &areas,
        x as f64,
        y as f64,
        width as f64,
        height as f64,
        &mut out,
    );
    tracing::debug!(tiles = out.len(), width, height, "treemap layout done");
    out
}

/// Coerce weights, demote the overflow item, and sort descending with the
/// overflow item pinned last so it receives the residual (smallest) slot.
fn order_items(items: &[WeightedItem]) -> Vec<WeightedItem> {
    let overflow_at = items.iter().position(|it| it.id == OVERFLOW_ID);

    let mut regular = Vec::with_capacity(items.len());
    let mut overflow = None;
    for (i, it) in items.iter().enumerate() {
        let coerced = WeightedItem {
            id: it.id.clone(),
            weight: it.weight.max(MIN_WEIGHT),
        };
        if Some(i) == overflow_at {
            overflow = Some(coerced);
        } else {
            regular.push(coerced);
        }
    }

    // Stable sort: equal weights keep input order.
    regular.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));

    if let Some(mut o) = overflow {
        let min_regular = regular.iter().map(|it| it.weight).fold(f64::INFINITY, f64::min);
        if min_regular.is_finite() {
            o.weight = (min_regular * OVERFLOW_FRACTION).max(MIN_WEIGHT);
        }
        regular.push(o);
    }
    regular
}

fn squarify(
    items: &[WeightedItem],
    areas: &[f64],
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    out: &mut Vec<TreemapItem>,
) {
    match items.len() {
        0 => return,
        1 => {
            out.push(tile(&items[0], x, y, w.max(MIN_TILE_W), h.max(MIN_TILE_H)));
            return;
        }
        _ => {}
    }

    // Residual space eaten by float dust: pin what is left at minimum size.
    if w <= f64::EPSILON || h <= f64::EPSILON {
        for it in items {
            out.push(tile(it, x, y, MIN_TILE_W, MIN_TILE_H));
        }
        return;
    }

    let total: f64 = areas.iter().sum();
    if total <= 0.0 {
        for it in items {
            out.push(tile(it, x, y, 0.0, 0.0));
        }
        return;
    }

    // A column strip consumes width when the box is wide, a row strip
    // consumes height when it is tall.
    let column = w >= h;
    let long = if column { h } else { w };

    // Pick the prefix length whose strip has the best (lowest) aspect score:
    // strip thickness vs the average member length along the strip.
    let mut best_k = 1;
    let mut best_sum = areas[0];
    let mut best_score = f64::INFINITY;
    let mut prefix = 0.0;
    for (k, &a) in areas.iter().enumerate() {
        prefix += a;
        let thickness = prefix / total * if column { w } else { h };
        let avg_len = long / (k + 1) as f64;
        let score = aspect(thickness, avg_len);
        if score < best_score {
            best_score = score;
            best_k = k + 1;
            best_sum = prefix;
        }
    }
    tracing::trace!(best_k, best_score, column, "strip chosen");

    let (strip_items, rest_items) = items.split_at(best_k);
    let (strip_areas, rest_areas) = areas.split_at(best_k);

    if column {
        let cw = best_sum / total * w;
        let mut cy = y;
        for (it, &a) in strip_items.iter().zip(strip_areas) {
            let ch = a / best_sum * h;
            out.push(tile(it, x, cy, cw.max(MIN_TILE_W), ch.max(MIN_TILE_H)));
            cy += ch;
        }
        squarify(rest_items, rest_areas, x + cw, y, w - cw, h, out);
    } else {
        let ch = best_sum / total * h;
        let mut cx = x;
        for (it, &a) in strip_items.iter().zip(strip_areas) {
            let cw = a / best_sum * w;
            out.push(tile(it, cx, y, cw.max(MIN_TILE_W), ch.max(MIN_TILE_H)));
            cx += cw;
        }
        squarify(rest_items, rest_areas, x, y + ch, w, h - ch, out);
    }
}

fn aspect(a: f64, b: f64) -> f64 {
    if a <= 0.0 || b <= 0.0 {
        return f64::INFINITY;
    }
    (a / b).max(b / a)
}

fn tile(item: &WeightedItem, x: f64, y: f64, w: f64, h: f64) -> TreemapItem {
    TreemapItem {
        id: item.id.clone(),
        weight: item.weight,
        rect: Rect {
            x: x as f32,
            y: y as f32,
            w: w as f32,
            h: h as f32,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ws: &[(&str, f64)]) -> Vec<WeightedItem> {
        ws.iter().map(|(id, w)| WeightedItem::new(*id, *w)).collect()
    }

    fn area_of(tiles: &[TreemapItem], id: &str) -> f32 {
        tiles.iter().find(|t| t.id == id).expect("tile missing").rect.area()
    }

    #[test]
    fn one_tile_per_item_with_distinct_ids() {
        let input = items(&[
            ("a", 50.0),
            ("b", 20.0),
            ("c", 12.0),
            ("d", 8.0),
            ("e", 5.0),
            ("f", 3.0),
            ("g", 2.0),
        ]);
        let tiles = layout(&input, 0.0, 0.0, 640.0, 480.0);
        assert_eq!(tiles.len(), input.len());
        let ids: HashSet<&str> = tiles.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), input.len());
        for it in &input {
            assert!(ids.contains(it.id.as_str()));
        }
    }

    #[test]
    fn single_item_fills_viewport() {
        let tiles = layout(&items(&[("only", 7.0)]), 0.0, 0.0, 1920.0, 1080.0);
        assert_eq!(tiles.len(), 1);
        let r = tiles[0].rect;
        assert!((r.x, r.y) == (0.0, 0.0));
        assert!((r.w - 1920.0).abs() < 1e-3);
        assert!((r.h - 1080.0).abs() < 1e-3);
    }

    #[test]
    fn tiles_cover_viewport_area() {
        let tiles = layout(&items(&[("a", 60.0), ("b", 30.0), ("c", 10.0)]), 0.0, 0.0, 300.0, 100.0);
        let sum: f32 = tiles.iter().map(|t| t.rect.area()).sum();
        assert!((sum - 30_000.0).abs() < 1.0, "covered {sum}");
    }

    #[test]
    fn scenario_60_30_10_proportions() {
        let tiles = layout(&items(&[("a", 60.0), ("b", 30.0), ("c", 10.0)]), 0.0, 0.0, 300.0, 100.0);
        assert_eq!(tiles.len(), 3);
        assert!((area_of(&tiles, "a") - 18_000.0).abs() < 50.0);
        assert!((area_of(&tiles, "b") - 9_000.0).abs() < 50.0);
        assert!((area_of(&tiles, "c") - 3_000.0).abs() < 50.0);
    }

    #[test]
    fn no_two_tiles_overlap() {
        let input = items(&[
            ("a", 34.0),
            ("b", 29.0),
            ("c", 21.0),
            ("d", 13.0),
            ("e", 8.0),
            ("f", 5.0),
            ("g", 3.0),
            ("h", 2.0),
        ]);
        let tiles = layout(&input, 0.0, 0.0, 400.0, 300.0);
        for (i, t1) in tiles.iter().enumerate() {
            for t2 in &tiles[i + 1..] {
                let (a, b) = (t1.rect, t2.rect);
                let ox = (a.x + a.w).min(b.x + b.w) - a.x.max(b.x);
                let oy = (a.y + a.h).min(b.y + b.h) - a.y.max(b.y);
                let overlap = ox.max(0.0) * oy.max(0.0);
                assert!(overlap < 1e-2, "{} and {} overlap by {overlap}", t1.id, t2.id);
            }
        }
    }

    #[test]
    fn heavier_items_get_no_less_area() {
        let input = items(&[("a", 50.0), ("b", 40.0), ("c", 30.0), ("d", 20.0), ("e", 10.0)]);
        let tiles = layout(&input, 0.0, 0.0, 500.0, 400.0);
        let areas: Vec<f32> = ["a", "b", "c", "d", "e"].iter().map(|id| area_of(&tiles, id)).collect();
        for pair in areas.windows(2) {
            assert!(pair[0] >= pair[1] - 1e-2);
        }
    }

    #[test]
    fn overflow_tile_is_smallest_despite_huge_weight() {
        let mut input = items(&[
            ("t1", 100.0),
            ("t2", 100.0),
            ("t3", 100.0),
            ("t4", 100.0),
            ("t5", 100.0),
        ]);
        input.push(WeightedItem::new(OVERFLOW_ID, 999_999.0));
        let tiles = layout(&input, 0.0, 0.0, 500.0, 300.0);
        assert_eq!(tiles.len(), 6);
        let overflow_area = area_of(&tiles, OVERFLOW_ID);
        for t in tiles.iter().filter(|t| t.id != OVERFLOW_ID) {
            assert!(
                overflow_area < t.rect.area(),
                "overflow {} vs {} {}",
                overflow_area,
                t.id,
                t.rect.area()
            );
        }
    }

    #[test]
    fn only_first_overflow_claimant_is_demoted() {
        let input = vec![
            WeightedItem::new(OVERFLOW_ID, 5.0),
            WeightedItem::new("t", 100.0),
            WeightedItem::new(OVERFLOW_ID, 100.0),
        ];
        let tiles = layout(&input, 0.0, 0.0, 600.0, 400.0);
        assert_eq!(tiles.len(), 3);
        // Regular weights are {100, 100}, so the demoted copy lands at 10.
        let demoted: Vec<&TreemapItem> = tiles
            .iter()
            .filter(|t| t.id == OVERFLOW_ID && (t.weight - 10.0).abs() < 1e-9)
            .collect();
        assert_eq!(demoted.len(), 1);
        let kept: Vec<&TreemapItem> = tiles
            .iter()
            .filter(|t| t.id == OVERFLOW_ID && (t.weight - 100.0).abs() < 1e-9)
            .collect();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn zero_weights_are_coerced_to_slivers() {
        let tiles = layout(&items(&[("a", 0.0), ("b", 0.0)]), 0.0, 0.0, 200.0, 100.0);
        assert_eq!(tiles.len(), 2);
        for t in &tiles {
            assert!(t.rect.area() > 0.0, "{} vanished", t.id);
        }
        // Both coerced to the same minimum weight, so both get half the box.
        assert!((area_of(&tiles, "a") - area_of(&tiles, "b")).abs() < 1.0);
    }

    #[test]
    fn empty_input_yields_empty_layout() {
        assert!(layout(&[], 0.0, 0.0, 800.0, 600.0).is_empty());
    }

    #[test]
    fn zero_viewport_yields_zero_area_tiles() {
        let input = items(&[("a", 3.0), ("b", 2.0), ("c", 1.0)]);
        let tiles = layout(&input, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(tiles.len(), 3);
        for (t, it) in tiles.iter().zip(&input) {
            assert_eq!(t.id, it.id);
            assert_eq!(t.rect.area(), 0.0);
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let input = items(&[("a", 17.0), ("b", 17.0), ("c", 11.0), ("d", 3.0)]);
        let first = layout(&input, 0.0, 0.0, 512.0, 384.0);
        let second = layout(&input, 0.0, 0.0, 512.0, 384.0);
        assert_eq!(first, second);
    }

    #[test]
    fn tiles_never_collapse_below_minimum_footprint() {
        let input: Vec<WeightedItem> = (0..30)
            .map(|i| WeightedItem::new(format!("t{i}"), 1.0 + i as f64))
            .collect();
        let tiles = layout(&input, 0.0, 0.0, 100.0, 60.0);
        assert_eq!(tiles.len(), 30);
        for t in &tiles {
            assert!(t.rect.w >= 20.0 && t.rect.h >= 15.0, "{} is {:?}", t.id, t.rect);
        }
    }

    #[test]
    fn origin_offset_is_respected() {
        let tiles = layout(&items(&[("a", 2.0), ("b", 1.0)]), 40.0, 25.0, 300.0, 100.0);
        for t in &tiles {
            assert!(t.rect.x >= 40.0 - 1e-3);
            assert!(t.rect.y >= 25.0 - 1e-3);
            assert!(t.rect.x + t.rect.w <= 340.0 + 1e-2);
            assert!(t.rect.y + t.rect.h <= 125.0 + 1e-2);
        }
    }

    #[test]
    fn validate_flags_duplicates_and_negatives() {
        let dup = items(&[("a", 1.0), ("a", 2.0)]);
        assert!(matches!(validate(&dup), Err(LayoutError::DuplicateId(id)) if id == "a"));

        let neg = items(&[("a", 1.0), ("b", -4.0)]);
        assert!(matches!(validate(&neg), Err(LayoutError::NegativeWeight { .. })));

        let ok = items(&[("a", 1.0), ("b", 0.0)]);
        assert!(validate(&ok).is_ok());
    }
}
