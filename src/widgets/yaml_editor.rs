//! Plain-text YAML editing surface with syntect coloring and inline
//! parse-error highlighting, plus load/save against a default directory.

use std::path::{Path, PathBuf};

use egui::TextBuffer;
use egui::text::{LayoutJob, LayoutSection};

use crate::error::AppError;
use crate::yaml_doc;

const ERROR_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(120, 40, 40);

#[derive(Clone, Debug)]
struct ParseIssue {
    line: Option<usize>,
    message: String,
}

#[derive(Default)]
pub struct YamlEditorResponse {
    pub changed: bool,
    pub loaded: Option<PathBuf>,
    pub saved: Option<PathBuf>,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct YamlEditor {
    buffer: String,
    directory: PathBuf,
    #[serde(skip)]
    error: Option<ParseIssue>,
    /// Text as it came off disk, for detecting divergence from the last
    /// loaded named configuration.
    #[serde(skip)]
    loaded_text: Option<String>,
}

impl Default for YamlEditor {
    fn default() -> Self {
        Self {
            buffer: String::new(),
            directory: PathBuf::from("."),
            error: None,
            loaded_text: None,
        }
    }
}

impl YamlEditor {
    pub fn new(directory: &str) -> Self {
        Self {
            directory: PathBuf::from(directory),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn set_text(&mut self, text: String) {
        self.buffer = text;
        self.validate();
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error_line(&self) -> Option<usize> {
        self.error.as_ref().and_then(|issue| issue.line)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|issue| issue.message.as_str())
    }

    /// The buffer no longer matches the last loaded file content.
    pub fn is_dirty(&self) -> bool {
        self.loaded_text.as_deref() != Some(self.buffer.as_str())
    }

    pub fn validate(&mut self) {
        match yaml_doc::parse_documents(&self.buffer) {
            Ok(_) => self.error = None,
            Err(e) => {
                self.error = Some(ParseIssue {
                    line: yaml_doc::error_line(&e),
                    message: e.to_string(),
                });
            }
        }
    }

    /// Parsed documents, or empty when the buffer does not parse.
    pub fn docs(&self) -> Vec<serde_yaml::Value> {
        match yaml_doc::parse_documents(&self.buffer) {
            Ok(docs) => docs,
            Err(e) => {
                log::error!("YAML parsing error: {e}");
                Vec::new()
            }
        }
    }

    pub fn set_docs(&mut self, docs: &[serde_yaml::Value]) {
        match yaml_doc::format_documents(docs) {
            Ok(text) => {
                self.loaded_text = Some(text.clone());
                self.buffer = text;
                self.validate();
            }
            Err(e) => log::error!("Could not format YAML documents: {e}"),
        }
    }

    /// Load a file, normalizing it through parse + re-serialize so the editor
    /// always shows block-style YAML.
    pub fn load_from(&mut self, path: &Path) -> Result<(), AppError> {
        log::debug!("Loading YAML configuration from file: {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let docs = yaml_doc::parse_documents(&text)?;
        self.set_docs(&docs);
        Ok(())
    }

    /// Write the parsed buffer back out; refuses to save an unparseable one.
    pub fn save_to(&mut self, path: &Path) -> Result<(), AppError> {
        let docs = yaml_doc::parse_documents(&self.buffer)?;
        std::fs::write(path, yaml_doc::format_documents(&docs)?)?;
        self.loaded_text = Some(self.buffer.clone());
        log::debug!("Saved YAML configuration to file: {}", path.display());
        Ok(())
    }

    fn load_dialog(&mut self) -> Option<PathBuf> {
        let path = rfd::FileDialog::new()
            .add_filter("YAML", &["yaml"])
            .set_directory(&self.directory)
            .pick_file()?;
        match self.load_from(&path) {
            Ok(()) => Some(path),
            Err(e) => {
                log::error!("Error loading YAML file {}: {e}", path.display());
                self.buffer = "Error loading YAML file.".to_string();
                None
            }
        }
    }

    fn save_dialog(&mut self) -> Option<PathBuf> {
        let mut path = rfd::FileDialog::new()
            .add_filter("YAML", &["yaml"])
            .set_directory(&self.directory)
            .save_file()?;
        if path.extension().and_then(|s| s.to_str()) != Some("yaml") {
            path.set_extension("yaml");
        }
        match self.save_to(&path) {
            Ok(()) => Some(path),
            Err(e) => {
                log::error!("Error saving YAML to file {}: {e}", path.display());
                None
            }
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) -> YamlEditorResponse {
        let mut response = YamlEditorResponse::default();

        let error_line = self.error_line();
        let mut layouter = move |ui: &egui::Ui, buf: &dyn TextBuffer, wrap_width: f32| {
            let theme =
                egui_extras::syntax_highlighting::CodeTheme::from_memory(ui.ctx(), ui.style());
            let mut job = egui_extras::syntax_highlighting::highlight(
                ui.ctx(),
                ui.style(),
                &theme,
                buf.as_str(),
                "yaml",
            );
            if let Some(line) = error_line {
                mark_error_line(&mut job, buf.as_str(), line);
            }
            job.wrap.max_width = wrap_width;
            ui.fonts_mut(|f| f.layout_job(job))
        };

        let edit = ui.add(
            egui::TextEdit::multiline(&mut self.buffer)
                .code_editor()
                .desired_rows(16)
                .desired_width(f32::INFINITY)
                .layouter(&mut layouter),
        );
        if edit.changed() {
            self.validate();
            response.changed = true;
        }

        if let Some(issue) = &self.error {
            ui.colored_label(egui::Color32::LIGHT_RED, &issue.message);
        }

        ui.horizontal(|ui| {
            if ui.button("Load Configuration").clicked() {
                response.loaded = self.load_dialog();
                response.changed |= response.loaded.is_some();
            }
            if ui.button("Save Configuration").clicked() {
                response.saved = self.save_dialog();
            }
        });

        response
    }
}

/// Paint a background behind the 1-based `line`, splitting any highlight
/// sections that straddle its boundaries.
fn mark_error_line(job: &mut LayoutJob, text: &str, line: usize) {
    let mut offset = 0;
    for (index, raw_line) in text.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            apply_background(job, offset..offset + raw_line.len());
            return;
        }
        offset += raw_line.len();
    }
}

fn apply_background(job: &mut LayoutJob, range: std::ops::Range<usize>) {
    let mut sections = Vec::with_capacity(job.sections.len() + 2);
    for section in job.sections.drain(..) {
        let sr = section.byte_range.clone();
        if sr.end <= range.start || sr.start >= range.end {
            sections.push(section);
            continue;
        }
        if sr.start < range.start {
            sections.push(LayoutSection {
                leading_space: section.leading_space,
                byte_range: sr.start..range.start,
                format: section.format.clone(),
            });
        }
        let mut marked = section.format.clone();
        marked.background = ERROR_BACKGROUND;
        sections.push(LayoutSection {
            leading_space: if sr.start < range.start {
                0.0
            } else {
                section.leading_space
            },
            byte_range: sr.start.max(range.start)..sr.end.min(range.end),
            format: marked,
        });
        if sr.end > range.end {
            sections.push(LayoutSection {
                leading_space: 0.0,
                byte_range: range.end..sr.end,
                format: section.format,
            });
        }
    }
    job.sections = sections;
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::text::TextFormat;

    #[test]
    fn validation_sets_and_clears_the_error() {
        let mut editor = YamlEditor::default();
        editor.set_text("key: [1, 2\n".to_string());
        assert!(editor.has_error());

        editor.set_text("key: [1, 2]\n".to_string());
        assert!(!editor.has_error());

        editor.set_text("key: [again\n".to_string());
        assert!(editor.has_error());
    }

    #[test]
    fn docs_returns_empty_on_parse_failure() {
        let mut editor = YamlEditor::default();
        editor.set_text("broken: [".to_string());
        assert!(editor.docs().is_empty());
    }

    #[test]
    fn dirty_tracking_compares_against_loaded_text() {
        let mut editor = YamlEditor::default();
        let docs = crate::yaml_doc::parse_documents("a: 1\n").unwrap();
        editor.set_docs(&docs);
        assert!(!editor.is_dirty());
        editor.set_text("a: 2\n".to_string());
        assert!(editor.is_dirty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");

        let mut editor = YamlEditor::default();
        editor.set_text("nbins: 100\ncsvargs:\n  sep: ';'\n".to_string());
        editor.save_to(&path).unwrap();

        let mut reloaded = YamlEditor::default();
        reloaded.load_from(&path).unwrap();
        assert_eq!(
            crate::yaml_doc::parse_documents(editor.text()).unwrap(),
            crate::yaml_doc::parse_documents(reloaded.text()).unwrap()
        );
    }

    #[test]
    fn save_refuses_invalid_buffer() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        let mut editor = YamlEditor::default();
        editor.set_text("broken: [".to_string());
        assert!(editor.save_to(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn error_line_background_splits_sections() {
        let text = "a: 1\nb: [\nc: 3\n";
        let mut job = LayoutJob::single_section(text.to_string(), TextFormat::default());
        mark_error_line(&mut job, text, 2);

        assert_eq!(job.sections.len(), 3);
        assert_eq!(job.sections[1].byte_range, 5..10);
        assert_eq!(job.sections[1].format.background, ERROR_BACKGROUND);
        assert_ne!(job.sections[0].format.background, ERROR_BACKGROUND);
        assert_ne!(job.sections[2].format.background, ERROR_BACKGROUND);
    }

    #[test]
    fn out_of_range_error_line_marks_nothing() {
        let text = "a: 1\n";
        let mut job = LayoutJob::single_section(text.to_string(), TextFormat::default());
        mark_error_line(&mut job, text, 10);
        assert_eq!(job.sections.len(), 1);
    }
}
