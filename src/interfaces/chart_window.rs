use crate::domain::market::CleanedRecord;
use crate::domain::ports::ChartRenderer;
use crate::interfaces::chart_data::ChartSeries;
use anyhow::Result;
use chrono::{TimeZone, Utc};
use egui_plot::{Legend, Line, Plot};
use tracing::{info, warn};

const CLOSE_COLOR: egui::Color32 = egui::Color32::from_rgb(31, 119, 180);
const AVERAGE_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 165, 0);

/// Opens a native window with the price chart and blocks until it is closed.
#[derive(Debug, Clone, Copy)]
pub struct ChartWindowRenderer {
    window: usize,
}

impl ChartWindowRenderer {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl ChartRenderer for ChartWindowRenderer {
    fn render(&self, records: &[CleanedRecord], ticker: &str) -> Result<()> {
        if records.is_empty() {
            warn!("No data to plot for {}", ticker);
            return Ok(());
        }

        let series = ChartSeries::build(records, ticker, self.window);
        let title = series.title.clone();
        info!("Opening chart window: {}", title);

        let native_options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1000.0, 600.0])
                .with_title(&title),
            ..Default::default()
        };

        eframe::run_native(
            &title,
            native_options,
            Box::new(|_cc| Ok(Box::new(PriceChartApp { series }))),
        )
        .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

        Ok(())
    }
}

struct PriceChartApp {
    series: ChartSeries,
}

impl eframe::App for PriceChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.series.title);
            ui.add_space(8.0);

            Plot::new("price_chart")
                .show_grid([true, true])
                .legend(Legend::default())
                .x_axis_label("Date")
                .y_axis_label("Price")
                .x_axis_formatter(|mark, _range| {
                    Utc.timestamp_opt(mark.value as i64, 0)
                        .single()
                        .map(|dt| dt.format("%Y-%m-%d").to_string())
                        .unwrap_or_default()
                })
                .show(ui, |plot_ui| {
                    plot_ui.line(
                        Line::new(
                            self.series.close_label.clone(),
                            self.series.close_points.clone(),
                        )
                        .color(CLOSE_COLOR),
                    );
                    if !self.series.average_points.is_empty() {
                        plot_ui.line(
                            Line::new(
                                self.series.average_label.clone(),
                                self.series.average_points.clone(),
                            )
                            .color(AVERAGE_COLOR),
                        );
                    }
                });
        });
    }
}
