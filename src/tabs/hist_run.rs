//! Batch histogramming runs over optimization result files with
//! `mcsas3_cli_histogrammer`.

use std::collections::HashMap;
use std::path::Path;

use crate::runner::{RunnerEvent, TaskRunner};
use crate::widgets::file_line::FileLineSelect;
use crate::widgets::file_list::FileSelectionList;

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HistRunTab {
    files: FileSelectionList,
    hist_config: FileLineSelect,
    interpreter: String,
    #[serde(skip)]
    runner: Option<TaskRunner>,
    #[serde(skip)]
    progress: u8,
    #[serde(skip)]
    output_log: String,
    #[serde(skip)]
    notice: Option<String>,
}

impl Default for HistRunTab {
    fn default() -> Self {
        Self {
            files: FileSelectionList::new(
                "Loaded Result Files:",
                "McSAS3 result Files",
                &["nxs", "h5", "hdf5"],
            ),
            hist_config: FileLineSelect::new(
                "Select histogramming configuration file",
                "YAML hist config Files",
                &["yaml"],
            ),
            interpreter: "python3".to_string(),
            runner: None,
            progress: 0,
            output_log: String::new(),
            notice: None,
        }
    }
}

impl HistRunTab {
    pub fn set_hist_config(&mut self, path: &Path) {
        self.hist_config.set_path(path);
    }

    fn start_run(&mut self) {
        self.notice = None;
        let files = self.files.paths();
        if files.is_empty() {
            self.notice = Some("No files selected.".to_string());
            return;
        }
        let hist_config = match self.hist_config.path() {
            Some(path) if path.exists() => path,
            Some(path) => {
                self.notice = Some(format!("Cannot access file: {}", path.display()));
                return;
            }
            None => {
                self.notice = Some("Select a histogramming configuration first.".to_string());
                return;
            }
        };

        let template = format!(
            "{} -m mcsas3.mcsas3_cli_histogrammer -r {{input_file}} -H {{hist_config}} -i 1",
            self.interpreter
        );
        let extra = HashMap::from([(
            "hist_config".to_string(),
            hist_config.to_string_lossy().into_owned(),
        )]);

        self.files.reset_statuses();
        self.progress = 0;
        self.output_log.clear();
        self.runner = Some(TaskRunner::spawn(files, template, extra));
    }

    fn poll_runner(&mut self, ctx: &egui::Context) {
        let events: Vec<RunnerEvent> = match &mut self.runner {
            Some(runner) => runner.poll(),
            None => return,
        };
        let mut finished = false;
        for event in events {
            match event {
                RunnerEvent::Status { file, status } => self.files.set_status(&file, status),
                RunnerEvent::Progress(percent) => self.progress = percent,
                RunnerEvent::Output(text) => {
                    self.output_log.push_str(&text);
                    self.output_log.push('\n');
                }
                RunnerEvent::Finished => finished = true,
            }
        }
        if finished {
            if let Some(mut runner) = self.runner.take() {
                runner.finish();
            }
            log::info!("All histogramming tasks finished");
        } else {
            ctx.request_repaint();
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.poll_runner(ui.ctx());

        self.files.ui(ui);
        ui.separator();

        if let Some(path) = self.hist_config.ui(ui) {
            if !path.exists() {
                self.notice = Some(format!("Cannot access file: {}", path.display()));
            }
        }

        ui.horizontal(|ui| {
            ui.label("Python interpreter:");
            ui.add(egui::TextEdit::singleline(&mut self.interpreter).desired_width(160.0));
        });

        ui.add(egui::ProgressBar::new(self.progress as f32 / 100.0).show_percentage());

        let running = self.runner.is_some();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!running, egui::Button::new("Run Histogramming ..."))
                .clicked()
            {
                self.start_run();
            }
            if running {
                ui.add(egui::widgets::Spinner::default());
            }
        });

        if let Some(notice) = &self.notice {
            ui.colored_label(egui::Color32::LIGHT_RED, notice);
        }

        if !self.output_log.is_empty() {
            ui.separator();
            ui.label("Process output:");
            egui::ScrollArea::vertical()
                .id_salt("hist_run_output")
                .max_height(140.0)
                .show(ui, |ui| {
                    ui.monospace(&self.output_log);
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_list_sets_notice_without_spawning() {
        let mut tab = HistRunTab::default();
        tab.start_run();
        assert_eq!(tab.notice.as_deref(), Some("No files selected."));
        assert!(tab.runner.is_none());
    }
}
