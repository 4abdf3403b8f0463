use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, TextEdit, Ui};
use egui_extras::{Column, TableBuilder};

use crate::analysis::AnalysisOutcome;
use crate::data::model::InstrumentMode;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – mode, data entry and results
// ---------------------------------------------------------------------------

/// Render the left input / results panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            mode_selector(ui, state);
            ui.separator();

            data_editor(ui, state);
            ui.separator();

            style_controls(ui, state);
            ui.separator();

            ui.heading("Results");
            match state.mode {
                InstrumentMode::UvVis => uvvis_results(ui, state),
                InstrumentMode::Calibration => calibration_results(ui, state),
                InstrumentMode::Concentration => {
                    calibration_results(ui, state);
                    ui.add_space(6.0);
                    concentration_inputs(ui, state);
                }
                InstrumentMode::Chromatography => peak_table(ui, state),
                InstrumentMode::Ftir => ftir_results(ui, state),
            }
        });
}

fn mode_selector(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Simulation");
    let mut selected = state.mode;
    for mode in InstrumentMode::ALL {
        ui.radio_value(&mut selected, mode, mode.to_string());
    }
    state.set_mode(selected);
}

fn data_editor(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Data");
    let sep = state.config.delimiter;
    ui.label(
        RichText::new(format!("One row per line: {}", state.mode.columns().join(format!(" {sep} ").as_str())))
            .small(),
    );

    let edited = ui
        .add(
            TextEdit::multiline(state.input_mut())
                .code_editor()
                .desired_rows(10)
                .desired_width(f32::INFINITY),
        )
        .changed();
    if edited {
        state.recompute();
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("Example").clicked() {
            state.reset_input();
        }
        if ui
            .small_button("Simulate")
            .on_hover_text("Replace the data with simulated instrument output")
            .clicked()
        {
            let seed = (ui.input(|i| i.time) * 1000.0) as u64;
            state.load_demo(seed);
        }
    });
}

fn style_controls(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Trace colour");
        let mut color = state.trace_color;
        if ui.color_edit_button_srgba(&mut color).changed() {
            state.set_trace_color(color);
        }
    });
    if state.mode == InstrumentMode::UvVis {
        ui.checkbox(&mut state.show_reference, "Show reference spectrum (simulated)");
    }
}

// ---------------------------------------------------------------------------
// Per-mode results
// ---------------------------------------------------------------------------

fn uvvis_results(ui: &mut Ui, state: &AppState) {
    if let Some(AnalysisOutcome::LambdaMax(peak)) = &state.outcome {
        ui.label(
            RichText::new(format!("λmax = {} nm", peak.sample.x))
                .strong()
                .color(Color32::DARK_GREEN),
        );
        ui.label(format!(
            "Absorbance at λmax: {:.d$}",
            peak.sample.y,
            d = state.config.decimals
        ));
    }
}

fn calibration_results(ui: &mut Ui, state: &AppState) {
    if let Some(AnalysisOutcome::Calibration(model)) = &state.outcome {
        let d = state.config.decimals;
        ui.label(RichText::new(model.equation(d)).strong());
        ui.label(format!("R² = {:.d$}", model.r_squared));
        ui.label(format!("{} standards", model.n_points));
    }
}

fn concentration_inputs(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Sample concentration");
    let d = state.config.decimals;

    egui::Grid::new("concentration_inputs")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Sample absorbance");
            ui.add(
                DragValue::new(&mut state.sample_absorbance)
                    .speed(0.01)
                    .range(0.0..=f64::INFINITY)
                    .fixed_decimals(2),
            );
            ui.end_row();

            ui.label("Slope");
            ui.add(DragValue::new(&mut state.slope_input).speed(0.001).fixed_decimals(d));
            ui.end_row();

            ui.label("Intercept");
            ui.add(DragValue::new(&mut state.intercept_input).speed(0.001).fixed_decimals(d));
            ui.end_row();
        });

    if ui.button("Compute concentration").clicked() {
        state.compute_concentration();
    }
    if let Some(c) = state.sample_concentration {
        ui.label(
            RichText::new(format!("Estimated concentration: {c:.2} ppm"))
                .strong()
                .color(Color32::DARK_GREEN),
        );
    }
}

fn peak_table(ui: &mut Ui, state: &AppState) {
    let Some(AnalysisOutcome::Peaks(report)) = &state.outcome else {
        return;
    };
    let d = state.config.decimals;

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto(), 6)
        .header(18.0, |mut header| {
            for title in ["#", "tR (min)", "Height", "Width", "Area", "Area %"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (i, q) in report.peaks.iter().enumerate() {
                body.row(18.0, |mut row| {
                    let cells = [
                        format!("{}", i + 1),
                        format!("{:.2}", q.peak.retention_time),
                        format!("{:.2}", q.peak.height),
                        format!("{:.2}", q.peak.width),
                        format!("{:.d$}", q.area),
                        format!("{:.2}", q.percent_area),
                    ];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });

    ui.label(format!("Total area: {:.d$}", report.total_area));
    if let Some(major) = report.major_peak() {
        ui.label(format!("Major component: peak {}", major + 1));
    }
}

fn ftir_results(ui: &mut Ui, state: &mut AppState) {
    if let Some(AnalysisOutcome::FunctionalGroups { strongest, bands }) = &state.outcome {
        ui.label(
            RichText::new(format!("Strongest band: {:.0} cm⁻¹", strongest.sample.x))
                .strong()
                .color(Color32::DARK_GREEN),
        );
        egui::Grid::new("ftir_bands")
            .striped(true)
            .num_columns(2)
            .show(ui, |ui: &mut Ui| {
                for band in bands {
                    ui.label(format!("{:.0} cm⁻¹", band.wavenumber));
                    ui.label(band.group.label());
                    ui.end_row();
                }
            });
    }

    ui.add_space(6.0);
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Look up wavenumber");
        ui.add(
            DragValue::new(&mut state.query_wavenumber)
                .speed(5.0)
                .range(0.0..=5000.0)
                .suffix(" cm⁻¹"),
        );
    });
    ui.label(RichText::new(state.query_group().label()).strong());
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.plot_rect.is_some(), egui::Button::new("Save plot as PNG…"))
                .clicked()
            {
                save_plot_dialog(ui.ctx(), state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();
        ui.label(state.mode.to_string());

        if let Some(table) = &state.table {
            ui.separator();
            ui.label(format!("{} rows", table.len()));
        }

        if let Some(status) = &state.status {
            ui.separator();
            let color = if status.is_error {
                Color32::RED
            } else {
                Color32::DARK_GREEN
            };
            ui.label(RichText::new(&status.text).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open instrument data")
        .add_filter("Supported files", &["csv", "txt", "tsv", "json", "parquet", "pq"])
        .add_filter("Text", &["csv", "txt", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_file(&path);
    }
}

/// Ask for a destination and request a screenshot; the app writes the PNG
/// once the screenshot arrives.
pub fn save_plot_dialog(ctx: &egui::Context, state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save plot")
        .add_filter("PNG image", &["png"])
        .set_file_name("plot.png")
        .save_file();

    if let Some(path) = file {
        state.pending_export = Some(path);
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
    }
}
