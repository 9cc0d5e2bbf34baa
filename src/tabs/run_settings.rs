//! Run configuration: pick or edit a run configuration and summarize the
//! model settings it selects.

use std::path::{Path, PathBuf};

use crate::config::{ConfigSelect, RUN_CONFIG_DIR};
use crate::widgets::yaml_editor::YamlEditor;

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RunSettingsTab {
    config: ConfigSelect,
    editor: YamlEditor,
    #[serde(skip)]
    info: String,
    #[serde(skip)]
    auto_loaded: bool,
}

impl Default for RunSettingsTab {
    fn default() -> Self {
        Self {
            config: ConfigSelect::new(RUN_CONFIG_DIR),
            editor: YamlEditor::new(RUN_CONFIG_DIR),
            info: String::new(),
            auto_loaded: false,
        }
    }
}

fn scalar_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "Not specified".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| "Not specified".to_string()),
    }
}

fn field(doc: &serde_yaml::Mapping, key: &str) -> String {
    doc.get(&serde_yaml::Value::from(key))
        .map(scalar_text)
        .unwrap_or_else(|| "Not specified".to_string())
}

/// Summary of the run configuration shown next to the editor. The full
/// parameter listing for a sasmodels model lives with the external library;
/// here only the settings the document itself carries are shown.
pub fn describe_run_config(docs: &[serde_yaml::Value]) -> String {
    let Some(doc) = docs.first().and_then(|value| value.as_mapping()) else {
        return "Invalid YAML or empty configuration.".to_string();
    };

    let model_name = doc
        .get(&serde_yaml::Value::from("modelName"))
        .map(scalar_text)
        .unwrap_or_else(|| "Unknown Model".to_string());

    let mut info = String::from("Configuration Details:\n");
    info.push_str(&format!("Model Name: {model_name}\n"));
    info.push_str(&format!("Max Iterations: {}\n", field(doc, "maxIter")));
    info.push_str(&format!("Convergence Criterion: {}\n", field(doc, "convCrit")));
    info.push_str(&format!("Cores: {}\n", field(doc, "nCores")));

    if model_name.starts_with("mcsas_") {
        info.push_str("\nUsing internal McSAS model. No additional sasmodels parameters available.\n");
    } else {
        info.push_str(
            "\nTo configure model parameters, add each to 'fitParameterLimits' or \
             'staticParameters' in the YAML editor.\n\
             For 'fitParameterLimits', specify lower and upper limits as a list.",
        );
    }
    info
}

impl RunSettingsTab {
    fn load_config(&mut self, path: &Path) {
        if let Err(e) = self.editor.load_from(path) {
            log::error!("Error loading run configuration {}: {e}", path.display());
        }
        self.update_info();
    }

    fn update_info(&mut self) {
        self.info = describe_run_config(&self.editor.docs());
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) -> Option<PathBuf> {
        if !self.auto_loaded {
            self.auto_loaded = true;
            if self.editor.text().is_empty() {
                if let Some(path) = self.config.first_named() {
                    self.load_config(&path);
                }
            }
            self.update_info();
        }

        if let Some(path) = self.config.ui(ui, "Select Default Run Configuration:") {
            self.load_config(&path);
        }

        ui.label("Run Configuration (YAML):");
        let response = self.editor.ui(ui);
        if response.changed {
            if self.editor.is_dirty() {
                self.config.mark_custom();
            }
            self.update_info();
        }
        if response.saved.is_some() {
            self.config.refresh();
        }

        ui.separator();
        ui.label("Model Parameters Info:");
        egui::ScrollArea::vertical()
            .id_salt("run_settings_info")
            .max_height(160.0)
            .show(ui, |ui| {
                ui.monospace(&self.info);
            });

        response.saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml_doc::parse_documents;

    #[test]
    fn summarizes_known_fields() {
        let docs =
            parse_documents("modelName: sphere\nmaxIter: 100000\nconvCrit: 1.0\nnCores: 4\n")
                .unwrap();
        let info = describe_run_config(&docs);
        assert!(info.contains("Model Name: sphere"));
        assert!(info.contains("Max Iterations: 100000"));
        assert!(info.contains("Convergence Criterion: 1"));
        assert!(info.contains("Cores: 4"));
        assert!(info.contains("fitParameterLimits"));
    }

    #[test]
    fn internal_models_get_a_note() {
        let docs = parse_documents("modelName: mcsas_gaussianchain\n").unwrap();
        let info = describe_run_config(&docs);
        assert!(info.contains("internal McSAS model"));
    }

    #[test]
    fn empty_configuration_is_reported() {
        assert_eq!(
            describe_run_config(&[]),
            "Invalid YAML or empty configuration."
        );
    }
}
