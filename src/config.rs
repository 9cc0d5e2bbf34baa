//! Discovery of the well-known configuration directories and the dropdown
//! selection state shared by the settings tabs.

use std::fs;
use std::path::{Path, PathBuf};

pub const READ_CONFIG_DIR: &str = "read_configurations";
pub const RUN_CONFIG_DIR: &str = "run_configurations";
pub const HIST_CONFIG_DIR: &str = "hist_configurations";

/// Which configuration the editor currently shows: a named file from the
/// configuration directory, or free-form edits that no longer match any file.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConfigChoice {
    Named(String),
    #[default]
    Custom,
}

impl ConfigChoice {
    pub fn display_name(&self) -> &str {
        match self {
            ConfigChoice::Named(name) => name,
            ConfigChoice::Custom => "<custom...>",
        }
    }
}

/// List the `*.yaml` files in a configuration directory, creating the
/// directory if it does not exist yet.
pub fn default_config_files(directory: impl AsRef<Path>) -> Vec<String> {
    let dir = directory.as_ref();
    if !dir.exists() {
        if let Err(e) = fs::create_dir_all(dir) {
            log::error!("Could not create config directory {}: {e}", dir.display());
            return Vec::new();
        }
    }

    let mut names = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yaml") {
                if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
    }
    names.sort();
    names
}

/// Configuration dropdown backed by a directory listing.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConfigSelect {
    directory: PathBuf,
    pub choice: ConfigChoice,
    #[serde(skip)]
    names: Vec<String>,
    #[serde(skip)]
    scanned: bool,
}

impl Default for ConfigSelect {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(READ_CONFIG_DIR),
            choice: ConfigChoice::Custom,
            names: Vec::new(),
            scanned: false,
        }
    }
}

impl ConfigSelect {
    pub fn new(directory: &str) -> Self {
        Self {
            directory: PathBuf::from(directory),
            ..Default::default()
        }
    }

    pub fn refresh(&mut self) {
        self.names = default_config_files(&self.directory);
        self.scanned = true;
    }

    /// First named configuration on disk, if any. Used to auto-load a
    /// starting configuration when a tab comes up empty.
    pub fn first_named(&mut self) -> Option<PathBuf> {
        if !self.scanned {
            self.refresh();
        }
        let name = self.names.first()?.clone();
        self.choice = ConfigChoice::Named(name.clone());
        Some(self.directory.join(name))
    }

    pub fn mark_custom(&mut self) {
        self.choice = ConfigChoice::Custom;
    }

    /// Returns the path of a named configuration picked this frame.
    pub fn ui(&mut self, ui: &mut egui::Ui, label: &str) -> Option<PathBuf> {
        if !self.scanned {
            self.refresh();
        }

        let mut picked = None;
        ui.horizontal(|ui| {
            ui.label(label);
            egui::ComboBox::from_id_salt(self.directory.clone())
                .selected_text(self.choice.display_name().to_string())
                .show_ui(ui, |ui| {
                    for name in self.names.clone() {
                        if ui
                            .selectable_value(
                                &mut self.choice,
                                ConfigChoice::Named(name.clone()),
                                &name,
                            )
                            .clicked()
                        {
                            picked = Some(self.directory.join(&name));
                        }
                    }
                    ui.selectable_value(&mut self.choice, ConfigChoice::Custom, "<custom...>");
                });

            if ui
                .small_button("↻")
                .on_hover_text("Refresh the configuration list")
                .clicked()
            {
                self.refresh();
            }
        });
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_yaml_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("configs");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("b.yaml"), "b: 1\n").unwrap();
        std::fs::write(dir.join("a.yaml"), "a: 1\n").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let names = default_config_files(&dir);
        assert_eq!(names, vec!["a.yaml".to_string(), "b.yaml".to_string()]);
    }

    #[test]
    fn creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("fresh");
        assert!(!dir.exists());
        let names = default_config_files(&dir);
        assert!(names.is_empty());
        assert!(dir.exists());
    }

    #[test]
    fn custom_choice_display() {
        assert_eq!(ConfigChoice::Custom.display_name(), "<custom...>");
        assert_eq!(
            ConfigChoice::Named("run.yaml".into()).display_name(),
            "run.yaml"
        );
    }
}
