//! Histogramming configuration: edit the multi-document histogram ranges and
//! try them against a single result file.

use std::path::{Path, PathBuf};

use crate::config::{ConfigSelect, HIST_CONFIG_DIR};
use crate::error::AppError;
use crate::runner::TestRun;
use crate::widgets::file_line::FileLineSelect;
use crate::widgets::yaml_editor::YamlEditor;
use crate::yaml_doc;

const TEMP_CONFIG_NAME: &str = "hist_config_temp_ui.yaml";

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HistSettingsTab {
    config: ConfigSelect,
    editor: YamlEditor,
    test_file: FileLineSelect,
    interpreter: String,
    #[serde(skip)]
    info: String,
    #[serde(skip)]
    test_run: Option<TestRun>,
    #[serde(skip)]
    auto_loaded: bool,
}

impl Default for HistSettingsTab {
    fn default() -> Self {
        Self {
            config: ConfigSelect::new(HIST_CONFIG_DIR),
            editor: YamlEditor::new(HIST_CONFIG_DIR),
            test_file: FileLineSelect::new(
                "Select McSAS3 result file for a test run",
                "McSAS3 result Files",
                &["nxs", "h5", "hdf5"],
            ),
            interpreter: "python3".to_string(),
            info: String::new(),
            test_run: None,
            auto_loaded: false,
        }
    }
}

/// Write the editor's documents to a temp file and build the histogrammer
/// argv against it. The temp file is removed once the run completes.
fn test_command(
    interpreter: &str,
    docs: &[serde_yaml::Value],
    test_file: &Path,
) -> Result<(Vec<String>, PathBuf), AppError> {
    let temp_path = std::env::temp_dir().join(TEMP_CONFIG_NAME);
    std::fs::write(&temp_path, yaml_doc::format_documents(docs)?)?;
    let argv = vec![
        interpreter.to_string(),
        "-m".to_string(),
        "mcsas3.mcsas3_cli_histogrammer".to_string(),
        "-r".to_string(),
        test_file.to_string_lossy().into_owned(),
        "-H".to_string(),
        temp_path.to_string_lossy().into_owned(),
        "-i".to_string(),
        "1".to_string(),
    ];
    Ok((argv, temp_path))
}

impl HistSettingsTab {
    fn load_config(&mut self, path: &Path) {
        if let Err(e) = self.editor.load_from(path) {
            log::error!("Error loading hist configuration {}: {e}", path.display());
            self.info = format!("Error loading configuration {}: {e}", path.display());
        }
    }

    fn test_histogramming(&mut self) {
        let test_file = match self.test_file.path() {
            Some(path) if path.exists() => path,
            Some(path) => {
                self.info = format!("Cannot access file: {}", path.display());
                return;
            }
            None => {
                self.info = "Select a result file to test against first.".to_string();
                return;
            }
        };
        if self.editor.has_error() {
            self.info = "Fix the YAML errors before testing.".to_string();
            return;
        }

        match test_command(&self.interpreter, &self.editor.docs(), &test_file) {
            Ok((argv, temp_path)) => {
                log::info!("Testing histogramming: {argv:?}");
                self.info = "Running histogramming test ...".to_string();
                self.test_run = Some(TestRun::spawn(argv, Some(temp_path)));
            }
            Err(e) => {
                log::error!("Could not prepare histogramming test: {e}");
                self.info = format!("Could not prepare histogramming test: {e}");
            }
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) -> Option<PathBuf> {
        if !self.auto_loaded {
            self.auto_loaded = true;
            if self.editor.text().is_empty() {
                if let Some(path) = self.config.first_named() {
                    self.load_config(&path);
                }
            }
        }

        if let Some(message) = self.test_run.as_ref().and_then(TestRun::poll) {
            self.info = message;
            self.test_run = None;
        }
        if self.test_run.is_some() {
            ui.ctx().request_repaint();
        }

        if let Some(path) = self.config.ui(ui, "Select Default Histogramming Configuration:") {
            self.load_config(&path);
        }

        ui.label("Histogramming Configuration (YAML, one document per histogram):");
        let response = self.editor.ui(ui);
        if response.changed && self.editor.is_dirty() {
            self.config.mark_custom();
        }
        if response.saved.is_some() {
            self.config.refresh();
        }

        if let Some(path) = self.test_file.ui(ui) {
            if !path.exists() {
                self.info = format!("Cannot access file: {}", path.display());
            }
        }

        let testing = self.test_run.is_some();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!testing, egui::Button::new("Test Histogramming"))
                .clicked()
            {
                self.test_histogramming();
            }
            if testing {
                ui.add(egui::widgets::Spinner::default());
            }
        });

        ui.separator();
        egui::ScrollArea::vertical()
            .id_salt("hist_settings_info")
            .max_height(160.0)
            .show(ui, |ui| {
                if self.info.is_empty() {
                    ui.weak("Test output will be displayed here.");
                } else {
                    ui.monospace(&self.info);
                }
            });

        response.saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_writes_temp_config_and_builds_argv() {
        let docs = yaml_doc::parse_documents(
            "parameter: radius\nnBin: 50\n---\nparameter: radius\nnBin: 25\n",
        )
        .unwrap();
        let (argv, temp_path) =
            test_command("python3", &docs, Path::new("/data/a_output.hdf5")).unwrap();

        assert!(temp_path.exists());
        assert_eq!(argv[0], "python3");
        assert_eq!(argv[1..4], ["-m", "mcsas3.mcsas3_cli_histogrammer", "-r"]);
        assert_eq!(argv[4], "/data/a_output.hdf5");
        assert_eq!(argv[5], "-H");
        assert_eq!(argv[6], temp_path.to_string_lossy());
        assert_eq!(argv[7..], ["-i".to_string(), "1".to_string()]);

        let written = std::fs::read_to_string(&temp_path).unwrap();
        assert_eq!(yaml_doc::parse_documents(&written).unwrap(), docs);
        std::fs::remove_file(temp_path).unwrap();
    }
}
