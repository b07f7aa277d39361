use std::time::{Duration, Instant};

use anyhow::Context;
use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Ui};
use trendmap_core::export;
use trendmap_core::human::human_count;
use trendmap_core::trend::Platform;
use trendmap_core::OVERFLOW_ID;

use crate::state::AppState;

pub fn draw(app: &mut AppState, ctx: &egui::Context) {
    egui::TopBottomPanel::top("top").show(ctx, |ui| {
        top_bar(ui, app);
    });

    egui::SidePanel::left("sidebar")
        .resizable(true)
        .default_width(320.0)
        .show(ctx, |ui| {
            side_panel(ui, app);
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        treemap_panel(ui, app, ctx);
    });
}

fn top_bar(ui: &mut Ui, app: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label("Platform:");
        let current = app.platform;
        egui::ComboBox::from_id_source("platform")
            .selected_text(current.map_or("All", |p| p.label()))
            .show_ui(ui, |ui| {
                let mut pick = current;
                ui.selectable_value(&mut pick, None, "All");
                for p in Platform::ALL {
                    ui.selectable_value(&mut pick, Some(p), p.label());
                }
                app.set_platform(pick);
            });

        ui.separator();
        ui.label("Search:");
        if ui.text_edit_singleline(&mut app.search).changed() {
            app.dirty = true;
            app.selected = None;
        }

        ui.separator();
        ui.label("Tiles:");
        if ui.add(egui::Slider::new(&mut app.max_tiles, 4..=48)).changed() {
            app.dirty = true;
        }

        ui.separator();
        if ui.button("Export JSON").clicked() {
            if let Err(e) = export_json(app) {
                eprintln!("export failed: {e:#}");
            }
        }
        if ui.button("Export CSV").clicked() {
            if let Err(e) = export_csv(app) {
                eprintln!("export failed: {e:#}");
            }
        }
    });
}

fn side_panel(ui: &mut Ui, app: &mut AppState) {
    ui.heading("Trends");
    ui.label(format!("{} shown", app.filtered.len()));
    ui.separator();

    if let Some(r) = app.selected.as_deref().and_then(|id| app.record(id)) {
        ui.strong(&r.title);
        ui.label(format!("{}  ·  {}", r.platform.label(), human_count(r.volume)));
        ui.label(format!("change {:+.1}%", r.change_pct));
        let age = chrono::Utc::now().signed_duration_since(r.captured_at);
        ui.label(format!(
            "captured {} ({} min ago)",
            r.captured_at.format("%Y-%m-%d %H:%M"),
            age.num_minutes().max(0)
        ));
        ui.separator();
    }

    let mut clicked = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for r in &app.filtered {
            let selected = app.selected.as_deref() == Some(r.id.as_str());
            let label = format!("{}  ({})", r.title, human_count(r.volume));
            if ui.selectable_label(selected, label).clicked() {
                clicked = Some(r.id.clone());
            }
        }
    });
    if let Some(id) = clicked {
        app.selected = Some(id);
    }
}

fn treemap_panel(ui: &mut Ui, app: &mut AppState, ctx: &egui::Context) {
    let avail = ui.available_rect_before_wrap();
    app.refresh(avail.width(), avail.height(), Instant::now());
    if app.tracker.is_settling() {
        // Keep polling until the debounced size commits.
        ctx.request_repaint_after(Duration::from_millis(50));
    }

    let origin = avail.min;
    let mut clicked = None;
    for t in &app.tiles {
        let rect = Rect::from_min_size(
            origin + egui::vec2(t.rect.x, t.rect.y),
            egui::vec2(t.rect.w, t.rect.h),
        );
        let response = ui.allocate_rect(rect, Sense::click());

        let (fill, label) = if t.id == OVERFLOW_ID {
            (
                Color32::from_gray(70),
                format!("+{} more", app.hidden_count()),
            )
        } else {
            match app.record(&t.id) {
                Some(r) => (
                    platform_color(r.platform),
                    format!("{}\n{}", r.title, human_count(r.volume)),
                ),
                None => (Color32::from_gray(120), t.id.clone()),
            }
        };

        let selected = app.selected.as_deref() == Some(t.id.as_str());
        let painter = ui.painter();
        painter.rect_filled(rect.shrink(1.0), 2.0, fill);
        if selected || response.hovered() {
            painter.rect_stroke(rect.shrink(1.0), 2.0, Stroke::new(2.0, Color32::WHITE));
        }
        if rect.width() > 60.0 && rect.height() > 28.0 {
            painter.text(
                rect.min + egui::vec2(5.0, 4.0),
                Align2::LEFT_TOP,
                label,
                FontId::proportional(12.0),
                Color32::WHITE,
            );
        }

        if response.clicked() && t.id != OVERFLOW_ID {
            clicked = Some(t.id.clone());
        }
    }
    if let Some(id) = clicked {
        app.selected = Some(id);
    }
}

fn platform_color(p: Platform) -> Color32 {
    match p {
        Platform::Google => Color32::from_rgb(66, 103, 178),
        Platform::TikTok => Color32::from_rgb(120, 60, 140),
        Platform::X => Color32::from_rgb(40, 40, 48),
        Platform::Reddit => Color32::from_rgb(196, 93, 52),
        Platform::Gather => Color32::from_rgb(46, 125, 90),
    }
}

fn export_json(app: &AppState) -> anyhow::Result<()> {
    let Some(path) = rfd::FileDialog::new().set_file_name("layout.json").save_file() else {
        return Ok(());
    };
    let json = export::layout_to_json(&app.tiles);
    std::fs::write(&path, json.to_string()).with_context(|| path.display().to_string())?;
    Ok(())
}

fn export_csv(app: &AppState) -> anyhow::Result<()> {
    let Some(path) = rfd::FileDialog::new().set_file_name("trends.csv").save_file() else {
        return Ok(());
    };
    let file = std::fs::File::create(&path).with_context(|| path.display().to_string())?;
    export::trends_to_csv(&app.filtered, file)?;
    Ok(())
}
