//! Result inspection: read the measured curve and the model fit out of an
//! optimization result file and plot both on log-log axes.

use std::path::Path;

use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::nexus;
use crate::widgets::file_line::FileLineSelect;

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutputTab {
    result_file: FileLineSelect,
    q_dataset: String,
    intensity_dataset: String,
    fit_dataset: String,
    #[serde(skip)]
    measured: Vec<[f64; 2]>,
    #[serde(skip)]
    fit: Vec<[f64; 2]>,
    #[serde(skip)]
    message: String,
}

impl Default for OutputTab {
    fn default() -> Self {
        Self {
            result_file: FileLineSelect::new(
                "Select McSAS3 result file",
                "McSAS3 result Files",
                &["nxs", "h5", "hdf5"],
            ),
            q_dataset: "analyses/MCResult1/mcdata/binnedData/Q".to_string(),
            intensity_dataset: "analyses/MCResult1/mcdata/binnedData/I".to_string(),
            fit_dataset: "analyses/MCResult1/optimization/repetition1/modelI".to_string(),
            measured: Vec::new(),
            fit: Vec::new(),
            message: String::new(),
        }
    }
}

/// Pair Q against intensity and keep only points a log-log plot can show.
fn log_log_points(q: &[f64], intensity: &[f64]) -> Vec<[f64; 2]> {
    q.iter()
        .zip(intensity.iter())
        .filter(|(q, i)| **q > 0.0 && **i > 0.0)
        .map(|(q, i)| [q.log10(), i.log10()])
        .collect()
}

impl OutputTab {
    fn load_result(&mut self, path: &Path) {
        self.measured.clear();
        self.fit.clear();
        if !path.exists() {
            self.message = format!("Cannot access file: {}", path.display());
            return;
        }

        let q = match nexus::read_f64_1d(path, &self.q_dataset) {
            Ok(values) => values,
            Err(e) => {
                self.message = format!("Error reading {}: {e}", self.q_dataset);
                return;
            }
        };
        let intensity = match nexus::read_f64_1d(path, &self.intensity_dataset) {
            Ok(values) => values,
            Err(e) => {
                self.message = format!("Error reading {}: {e}", self.intensity_dataset);
                return;
            }
        };
        self.measured = log_log_points(&q, &intensity);

        // The fit curve is optional; a result written before histogramming
        // may not carry it yet.
        match nexus::read_f64_1d(path, &self.fit_dataset) {
            Ok(model) => {
                self.fit = log_log_points(&q, &model);
                self.message = format!(
                    "Loaded {} measured and {} fit points from {}.",
                    self.measured.len(),
                    self.fit.len(),
                    path.display()
                );
            }
            Err(e) => {
                log::warn!("No model fit curve in {}: {e}", path.display());
                self.message = format!(
                    "Loaded {} measured points from {}. No model fit curve found.",
                    self.measured.len(),
                    path.display()
                );
            }
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let mut reload = self.result_file.ui(ui);

        ui.collapsing("Dataset paths", |ui| {
            ui.horizontal(|ui| {
                ui.label("Q:");
                ui.text_edit_singleline(&mut self.q_dataset);
            });
            ui.horizontal(|ui| {
                ui.label("Intensity:");
                ui.text_edit_singleline(&mut self.intensity_dataset);
            });
            ui.horizontal(|ui| {
                ui.label("Model fit:");
                ui.text_edit_singleline(&mut self.fit_dataset);
            });
            if ui.button("Reload").clicked() {
                reload = self.result_file.path();
            }
        });

        if let Some(path) = reload {
            self.load_result(&path);
        }

        if !self.message.is_empty() {
            ui.label(&self.message);
        }

        Plot::new("output_plot")
            .legend(Legend::default())
            .x_axis_label("log10(Q)")
            .y_axis_label("log10(I)")
            .show(ui, |plot_ui| {
                if !self.measured.is_empty() {
                    plot_ui.line(Line::new(
                        "Measured",
                        PlotPoints::from(self.measured.clone()),
                    ));
                }
                if !self.fit.is_empty() {
                    plot_ui.line(Line::new("Model fit", PlotPoints::from(self.fit.clone())));
                }
            });
    }
}
