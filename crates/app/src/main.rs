mod state;
mod ui;

use eframe::egui;
use state::AppState;
use trendmap_core::mock::sample_trends;

struct TrendmapApp {
    state: AppState,
}

impl TrendmapApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            state: AppState::new(sample_trends(42, 8)),
        }
    }
}

impl eframe::App for TrendmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::draw(&mut self.state, ctx);
    }
}

fn main() -> eframe::Result<()> {
    trendmap_core::init_tracing();
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Trendmap",
        options,
        Box::new(|cc| Ok(Box::new(TrendmapApp::new(cc)))),
    )
}
