use std::sync::Arc;

use eframe::egui::{self, ColorImage};

use crate::config::LabConfig;
use crate::export;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SpectroLabApp {
    pub state: AppState,
}

impl Default for SpectroLabApp {
    fn default() -> Self {
        Self::new(LabConfig::default())
    }
}

impl SpectroLabApp {
    pub fn new(config: LabConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }

    /// Write the pending PNG export once the requested screenshot arrives.
    fn finish_export(&mut self, ctx: &egui::Context) {
        let Some(path) = self.state.pending_export.clone() else {
            return;
        };
        let shot: Option<Arc<ColorImage>> = ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(shot) = shot else {
            return;
        };

        self.state.pending_export = None;
        let region = self
            .state
            .plot_rect
            .map(|rect| (rect, ctx.pixels_per_point()));
        match export::save_png(&shot, region, &path) {
            Ok(()) => self.state.set_info(format!("Saved plot to {}", path.display())),
            Err(e) => {
                log::error!("Failed to save plot: {e:#}");
                self.state.set_error(format!("Error: {e:#}"));
            }
        }
    }
}

impl eframe::App for SpectroLabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.finish_export(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: data entry and results ----
        egui::SidePanel::left("input_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::instrument_plot(ui, &mut self.state);
        });
    }
}
