use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, PlotUi, Points, Polygon, Text, VLine};

use crate::analysis::simulate::chromatogram_trace;
use crate::analysis::{AnalysisOutcome, CalibrationModel, reference_overlay};
use crate::color::{faded, generate_palette};
use crate::data::model::{CalibrationPoint, InstrumentMode, SpectrumSample};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Instrument plot (central panel)
// ---------------------------------------------------------------------------

/// Render the plot of the active mode in the central panel.
pub fn instrument_plot(ui: &mut Ui, state: &mut AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Enter data in the side panel or open a file  (File → Open…)");
        });
        state.plot_rect = None;
        return;
    }

    let (x_label, y_label) = state.mode.axis_labels();
    let snapshot: &AppState = state;

    let response = Plot::new("instrument_plot")
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| match snapshot.mode {
            InstrumentMode::UvVis => uvvis(plot_ui, snapshot),
            InstrumentMode::Calibration | InstrumentMode::Concentration => {
                calibration(plot_ui, snapshot)
            }
            InstrumentMode::Chromatography => chromatogram(plot_ui, snapshot),
            InstrumentMode::Ftir => ftir(plot_ui, snapshot),
        });

    state.plot_rect = Some(response.response.rect);
}

fn trace(samples: &[SpectrumSample]) -> PlotPoints<'static> {
    samples.iter().map(|s| [s.x, s.y]).collect()
}

fn uvvis(plot_ui: &mut PlotUi, state: &AppState) {
    let Some(samples) = state.spectrum() else {
        return;
    };

    plot_ui.line(
        Line::new(trace(&samples))
            .name("Sample spectrum")
            .color(state.trace_color)
            .width(1.5),
    );

    if state.show_reference {
        let reference = reference_overlay(&samples, state.config.reference_scale);
        plot_ui.line(
            Line::new(trace(&reference))
                .name("Reference")
                .color(Color32::GRAY)
                .style(LineStyle::dotted_dense()),
        );
    }

    if let Some(AnalysisOutcome::LambdaMax(peak)) = &state.outcome {
        plot_ui.vline(
            VLine::new(peak.sample.x)
                .name(format!("λmax = {} nm", peak.sample.x))
                .color(Color32::RED)
                .style(LineStyle::dashed_loose()),
        );
    }
}

fn calibration(plot_ui: &mut PlotUi, state: &AppState) {
    let Some(table) = &state.table else {
        return;
    };
    let points = table.calibration_points();

    plot_ui.points(
        Points::new(
            points
                .iter()
                .map(|p| [p.concentration, p.absorbance])
                .collect::<PlotPoints>(),
        )
        .name("Standards")
        .color(state.trace_color)
        .radius(4.0),
    );

    if let Some(AnalysisOutcome::Calibration(model)) = &state.outcome {
        regression_line(plot_ui, model, &points, state);
    }

    if state.mode == InstrumentMode::Concentration {
        if let Some(c) = state.sample_concentration {
            plot_ui.points(
                Points::new(vec![[c, state.sample_absorbance]])
                    .name(format!("Sample ({c:.2} ppm)"))
                    .color(Color32::RED)
                    .shape(egui_plot::MarkerShape::Diamond)
                    .radius(6.0),
            );
            plot_ui.vline(
                VLine::new(c)
                    .color(faded(Color32::RED, 120))
                    .style(LineStyle::dashed_loose()),
            );
        }
    }
}

fn regression_line(
    plot_ui: &mut PlotUi,
    model: &CalibrationModel,
    points: &[CalibrationPoint],
    state: &AppState,
) {
    let mut lo = points
        .iter()
        .map(|p| p.concentration)
        .fold(f64::INFINITY, f64::min);
    let mut hi = points
        .iter()
        .map(|p| p.concentration)
        .fold(f64::NEG_INFINITY, f64::max);
    if let Some(c) = state.sample_concentration.filter(|_| state.mode == InstrumentMode::Concentration) {
        lo = lo.min(c);
        hi = hi.max(c);
    }

    let d = state.config.decimals;
    plot_ui.line(
        Line::new(PlotPoints::new(vec![
            [lo, model.predict(lo)],
            [hi, model.predict(hi)],
        ]))
        .name(format!("{}  (R² = {:.d$})", model.equation(d), model.r_squared))
        .color(Color32::from_rgb(0x2c, 0xa0, 0x2c))
        .width(2.0),
    );
}

fn chromatogram(plot_ui: &mut PlotUi, state: &AppState) {
    let Some(table) = &state.table else {
        return;
    };
    let peaks = table.peaks();
    let colors = generate_palette(peaks.len());
    let report = match &state.outcome {
        Some(AnalysisOutcome::Peaks(r)) => Some(r),
        _ => None,
    };

    let end = peaks
        .iter()
        .map(|p| p.retention_time + p.width)
        .fold(0.0, f64::max);
    let narrowest = peaks.iter().map(|p| p.width).fold(f64::INFINITY, f64::min);
    let step = (narrowest / 20.0).max(end / 5000.0);
    if step.is_finite() && step > 0.0 {
        plot_ui.line(
            Line::new(PlotPoints::new(chromatogram_trace(&peaks, step)))
                .name("Detector signal")
                .color(Color32::GRAY)
                .width(1.0),
        );
    }

    for (i, (p, color)) in peaks.iter().zip(colors).enumerate() {
        let half = p.width / 2.0;
        let triangle = vec![
            [p.retention_time - half, 0.0],
            [p.retention_time, p.height],
            [p.retention_time + half, 0.0],
        ];
        plot_ui.polygon(
            Polygon::new(PlotPoints::new(triangle))
                .name(format!("Peak {} @ {:.2} min", i + 1, p.retention_time))
                .fill_color(faded(color, 90))
                .stroke(Stroke::new(1.5, color)),
        );

        if let Some(q) = report.and_then(|r| r.peaks.get(i)) {
            plot_ui.text(
                Text::new(
                    PlotPoint::new(p.retention_time, p.height),
                    RichText::new(format!("{:.1} %", q.percent_area)).color(color),
                )
                .anchor(Align2::CENTER_BOTTOM),
            );
        }
    }
}

fn ftir(plot_ui: &mut PlotUi, state: &AppState) {
    let Some(samples) = state.spectrum() else {
        return;
    };

    plot_ui.line(
        Line::new(trace(&samples))
            .name("FTIR spectrum")
            .color(state.trace_color)
            .width(1.5),
    );

    if let Some(AnalysisOutcome::FunctionalGroups { bands, .. }) = &state.outcome {
        let colors = generate_palette(bands.len());
        for (band, color) in bands.iter().zip(colors) {
            plot_ui.points(
                Points::new(vec![[band.wavenumber, band.absorbance]])
                    .name(format!("{:.0} cm⁻¹: {}", band.wavenumber, band.group))
                    .color(color)
                    .radius(4.0),
            );
            plot_ui.text(
                Text::new(
                    PlotPoint::new(band.wavenumber, band.absorbance),
                    RichText::new(band.group.label()).color(color).small(),
                )
                .anchor(Align2::CENTER_BOTTOM),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_outlives_its_samples() {
        let points = {
            let samples = vec![SpectrumSample::new(200.0, 0.1), SpectrumSample::new(210.0, 0.3)];
            trace(&samples)
        };
        let xy: Vec<[f64; 2]> = points.points().iter().map(|p| [p.x, p.y]).collect();
        assert_eq!(xy, vec![[200.0, 0.1], [210.0, 0.3]]);
    }
}
