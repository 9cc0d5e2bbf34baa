//! Data loading configuration: pick or edit a read configuration, point at a
//! test data file, and list the datasets an HDF5/NeXus file offers.

use std::path::{Path, PathBuf};

use crate::config::{ConfigSelect, READ_CONFIG_DIR};
use crate::debounce::Debounce;
use crate::nexus;
use crate::widgets::file_line::FileLineSelect;
use crate::widgets::yaml_editor::YamlEditor;

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DataSettingsTab {
    config: ConfigSelect,
    editor: YamlEditor,
    test_file: FileLineSelect,
    #[serde(skip)]
    datasets: Vec<String>,
    #[serde(skip)]
    message: String,
    #[serde(skip)]
    debounce: Debounce,
    #[serde(skip)]
    auto_loaded: bool,
}

impl Default for DataSettingsTab {
    fn default() -> Self {
        Self {
            config: ConfigSelect::new(READ_CONFIG_DIR),
            editor: YamlEditor::new(READ_CONFIG_DIR),
            test_file: FileLineSelect::new("Select test data file", "All Files", &[]),
            datasets: Vec::new(),
            message: String::new(),
            debounce: Debounce::default(),
            auto_loaded: false,
        }
    }
}

impl DataSettingsTab {
    fn load_config(&mut self, path: &Path) {
        if let Err(e) = self.editor.load_from(path) {
            log::error!("Error loading configuration {}: {e}", path.display());
            self.message = format!("Error loading configuration {}: {e}", path.display());
        }
        self.refresh_messages();
    }

    fn refresh_messages(&mut self) {
        let mut message = String::new();
        if let Some(error) = self.editor.error_message() {
            message.push_str(&format!("YAML Error: {error}\n"));
        }
        if !self.datasets.is_empty() {
            message.push_str(&format!(
                "Available datasets in file ({} found):\n{}",
                self.datasets.len(),
                self.datasets.join("\n")
            ));
        }
        self.message = message;
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

        if let Some(path) = self.config.ui(ui, "Select Default Configuration:") {
            self.load_config(&path);
        }

        ui.label("Data Loading Configuration (YAML):");
        let response = self.editor.ui(ui);
        if response.changed {
            if self.editor.is_dirty() {
                self.config.mark_custom();
            }
            self.debounce.arm();
        }
        if response.saved.is_some() {
            self.config.refresh();
        }

        if let Some(path) = self.test_file.ui(ui) {
            self.open_test_file(&path);
        }

        if self.debounce.fire() {
            self.refresh_messages();
        }
        if let Some(remaining) = self.debounce.remaining() {
            ui.ctx().request_repaint_after(remaining);
        }

        ui.separator();
        egui::ScrollArea::vertical()
            .id_salt("data_settings_messages")
            .max_height(160.0)
            .show(ui, |ui| {
                if self.message.is_empty() {
                    ui.weak("Messages will be displayed here.");
                } else {
                    ui.monospace(&self.message);
                }
            });

        response.saved
    }

    fn open_test_file(&mut self, path: &Path) {
        if !path.exists() {
            log::warn!("File does not exist: {}", path.display());
            self.message = format!("Cannot access file: {}", path.display());
            return;
        }
        log::debug!("File loaded: {}", path.display());
        self.datasets.clear();
        if nexus::is_nexus_file(path) {
            match nexus::list_datasets(path) {
                Ok(infos) => {
                    self.datasets = infos.iter().map(ToString::to_string).collect();
                }
                Err(e) => {
                    let error = format!("Error reading HDF5 file: {e}. Verify the file structure.");
                    log::error!("{error}");
                    self.message = error;
                    return;
                }
            }
        }
        self.refresh_messages();
    }
}
