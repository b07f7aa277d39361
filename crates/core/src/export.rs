use crate::treemap::TreemapItem;
use crate::trend::TrendRecord;

pub fn trends_to_csv(records: &[TrendRecord], mut w: impl std::io::Write) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer
        .write_record(["id", "title", "platform", "volume", "change_pct", "captured_at"])
        .ok();
    for r in records {
        writer.write_record([
            r.id.clone(),
            r.title.clone(),
            r.platform.label().to_string(),
            r.volume.to_string(),
            format!("{:.1}", r.change_pct),
            r.captured_at.to_rfc3339(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn layout_to_json(tiles: &[TreemapItem]) -> serde_json::Value {
    serde_json::json!({
        "tiles": tiles.iter().map(|t| serde_json::json!({
            "id": t.id,
            "weight": t.weight,
            "x": t.rect.x,
            "y": t.rect.y,
            "w": t.rect.w,
            "h": t.rect.h,
        })).collect::<Vec<_>>()
    })
}

pub fn report_to_pdf(records: &[TrendRecord], out: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    use printpdf::*;
    let (doc, page1, layer1) = PdfDocument::new("Trend Report", Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    layer.use_text("Trend Report", 14.0, Mm(15.0), Mm(280.0), &font);
    let mut y = 270.0;
    for r in records.iter().take(44) {
        let line = format!(
            "{}  [{}]  volume {}  change {:+.1}%",
            r.title,
            r.platform.label(),
            crate::human::human_count(r.volume),
            r.change_pct
        );
        layer.use_text(line, 9.0, Mm(15.0), Mm(y), &font);
        y -= 5.5;
    }
    let file = std::fs::File::create(out)?;
    let mut buf = std::io::BufWriter::new(file);
    doc.save(&mut buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::Platform;
    use chrono::Utc;

    fn record(id: &str, volume: u64) -> TrendRecord {
        TrendRecord {
            id: id.into(),
            title: format!("topic {id}"),
            platform: Platform::Reddit,
            volume,
            change_pct: 2.5,
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_record() {
        let records = vec![record("a", 100), record("b", 50)];
        let mut buf = Vec::new();
        trends_to_csv(&records, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,title,platform,volume"));
        assert!(lines[1].contains("topic a"));
    }

    #[test]
    fn layout_json_carries_tile_geometry() {
        let tiles = crate::treemap::layout(
            &[
                crate::treemap::WeightedItem::new("a", 2.0),
                crate::treemap::WeightedItem::new("b", 1.0),
            ],
            0.0,
            0.0,
            300.0,
            100.0,
        );
        let v = layout_to_json(&tiles);
        let arr = v["tiles"].as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["id"], "a");
        assert!(arr[0]["w"].as_f64().unwrap() > 0.0);
    }
}
