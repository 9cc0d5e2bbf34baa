use std::path::{Path, PathBuf};

/// Single-path selector: an editable line plus a browse button.
#[derive(Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FileLineSelect {
    placeholder: String,
    filter_name: String,
    filter_extensions: Vec<String>,
    path_text: String,
}

impl FileLineSelect {
    pub fn new(placeholder: &str, filter_name: &str, extensions: &[&str]) -> Self {
        Self {
            placeholder: placeholder.to_string(),
            filter_name: filter_name.to_string(),
            filter_extensions: extensions.iter().map(|s| s.to_string()).collect(),
            path_text: String::new(),
        }
    }

    pub fn path(&self) -> Option<PathBuf> {
        if self.path_text.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(self.path_text.trim()))
        }
    }

    pub fn set_path(&mut self, path: &Path) {
        self.path_text = path.to_string_lossy().into_owned();
    }

    /// Returns the path when one was picked or confirmed with Enter this
    /// frame. Existence checks stay with the owning tab.
    pub fn ui(&mut self, ui: &mut egui::Ui) -> Option<PathBuf> {
        let mut selected = None;
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.path_text)
                    .hint_text(self.placeholder.clone())
                    .desired_width(ui.available_width() - 80.0),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                selected = self.path();
            }

            if ui.button("Browse...").clicked() {
                let mut dialog = rfd::FileDialog::new();
                if !self.filter_extensions.is_empty() {
                    let extensions: Vec<&str> =
                        self.filter_extensions.iter().map(String::as_str).collect();
                    dialog = dialog.add_filter(self.filter_name.clone(), &extensions);
                }
                if let Some(path) = dialog.pick_file() {
                    self.set_path(&path);
                    selected = Some(path);
                }
            }
        });
        selected
    }
}
