//! Batch optimization runs: one `mcsas3_cli_runner` process per selected
//! file, driven by the sequential task runner.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::runner::{RunnerEvent, TaskRunner};
use crate::widgets::file_line::FileLineSelect;
use crate::widgets::file_list::FileSelectionList;

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OptimizationTab {
    files: FileSelectionList,
    data_config: FileLineSelect,
    run_config: FileLineSelect,
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

impl Default for OptimizationTab {
    fn default() -> Self {
        Self {
            files: FileSelectionList::new("Loaded Files:", "All Files", &[]),
            data_config: FileLineSelect::new(
                "Select data load configuration file",
                "YAML data config Files",
                &["yaml"],
            ),
            run_config: FileLineSelect::new(
                "Select run configuration file",
                "YAML run config Files",
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

impl OptimizationTab {
    pub fn set_data_config(&mut self, path: &Path) {
        self.data_config.set_path(path);
    }

    pub fn set_run_config(&mut self, path: &Path) {
        self.run_config.set_path(path);
    }

    fn existing_config(line: &FileLineSelect, what: &str) -> Result<PathBuf, String> {
        let path = line
            .path()
            .ok_or_else(|| format!("Select a {what} first."))?;
        if !path.exists() {
            return Err(format!("Cannot access file: {}", path.display()));
        }
        Ok(path)
    }

    fn start_run(&mut self) {
        self.notice = None;
        let files = self.files.paths();
        if files.is_empty() {
            self.notice = Some("No files selected.".to_string());
            return;
        }
        let data_config = match Self::existing_config(&self.data_config, "data load configuration")
        {
            Ok(path) => path,
            Err(notice) => {
                self.notice = Some(notice);
                return;
            }
        };
        let run_config = match Self::existing_config(&self.run_config, "run configuration") {
            Ok(path) => path,
            Err(notice) => {
                self.notice = Some(notice);
                return;
            }
        };

        let template = format!(
            "{} -m mcsas3.mcsas3_cli_runner -f {{input_file}} -F {{data_config}} \
             -r {{result_file}} -R {{run_config}} -i 1 -d",
            self.interpreter
        );
        let extra = HashMap::from([
            (
                "data_config".to_string(),
                data_config.to_string_lossy().into_owned(),
            ),
            (
                "run_config".to_string(),
                run_config.to_string_lossy().into_owned(),
            ),
        ]);

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
            log::info!("All optimization tasks finished");
        } else {
            ctx.request_repaint();
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.poll_runner(ui.ctx());

        self.files.ui(ui);
        ui.separator();

        if let Some(path) = self.data_config.ui(ui) {
            if !path.exists() {
                self.notice = Some(format!("Cannot access file: {}", path.display()));
            }
        }
        if let Some(path) = self.run_config.ui(ui) {
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
                .add_enabled(!running, egui::Button::new("Run McSAS3 Optimization ..."))
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
                .id_salt("optimization_output")
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
        let mut tab = OptimizationTab::default();
        tab.start_run();
        assert_eq!(tab.notice.as_deref(), Some("No files selected."));
        assert!(tab.runner.is_none());
    }
}
