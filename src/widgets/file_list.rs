use std::path::{Path, PathBuf};

use egui_extras::{Column, TableBuilder};

use crate::runner::TaskStatus;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub status: TaskStatus,
}

/// User-curated list of input files with per-entry run status. Paths are
/// deduplicated by exact string; removal acts on the explicit selection only.
#[derive(Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FileSelectionList {
    pub title: String,
    entries: Vec<FileEntry>,
    selected: Vec<PathBuf>,
    #[serde(skip)]
    pub notice: Option<String>,
    filter_name: String,
    filter_extensions: Vec<String>,
}

impl FileSelectionList {
    pub fn new(title: &str, filter_name: &str, extensions: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            filter_name: filter_name.to_string(),
            filter_extensions: extensions.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Returns false when the path was already present.
    pub fn add_file(&mut self, path: PathBuf) -> bool {
        if self.entries.iter().any(|entry| entry.path == path) {
            return false;
        }
        self.entries.push(FileEntry {
            path,
            status: TaskStatus::Pending,
        });
        true
    }

    pub fn remove_selected(&mut self) {
        if self.selected.is_empty() {
            self.notice = Some("Select one or more files to remove.".to_string());
            return;
        }
        let selected = std::mem::take(&mut self.selected);
        self.entries.retain(|entry| !selected.contains(&entry.path));
        self.notice = None;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.selected.clear();
        self.notice = None;
    }

    pub fn toggle_selection(&mut self, path: &Path) {
        if let Some(pos) = self.selected.iter().position(|p| p == path) {
            self.selected.remove(pos);
        } else {
            self.selected.push(path.to_path_buf());
        }
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|entry| entry.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Status updates are keyed by path, so entries added or removed while a
    /// run is in flight never shift which file an update lands on. Updates
    /// for files no longer in the list are dropped.
    pub fn set_status(&mut self, path: &Path, status: TaskStatus) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.path == path) {
            entry.status = status;
        } else {
            log::warn!("Status update for unlisted file {}", path.display());
        }
    }

    pub fn status_of(&self, path: &Path) -> Option<TaskStatus> {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| entry.status)
    }

    pub fn reset_statuses(&mut self) {
        for entry in &mut self.entries {
            entry.status = TaskStatus::Pending;
        }
    }

    fn load_files_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new();
        if !self.filter_extensions.is_empty() {
            let extensions: Vec<&str> =
                self.filter_extensions.iter().map(String::as_str).collect();
            dialog = dialog.add_filter(self.filter_name.clone(), &extensions);
        }
        if let Some(files) = dialog.pick_files() {
            for file in files {
                self.add_file(file);
            }
        }
    }

    fn status_color(status: TaskStatus) -> egui::Color32 {
        match status {
            TaskStatus::Pending => egui::Color32::GRAY,
            TaskStatus::Running => egui::Color32::YELLOW,
            TaskStatus::Complete => egui::Color32::GREEN,
            TaskStatus::Failed => egui::Color32::RED,
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label(&self.title);

        ui.horizontal(|ui| {
            if ui.button("Load Files").clicked() {
                self.load_files_dialog();
            }
            if ui.button("Remove Selected").clicked() {
                self.remove_selected();
            }
            if ui.button("Clear Files").clicked() {
                self.clear();
            }
        });

        // Files dropped anywhere on the window land in the visible list.
        let dropped = ui.ctx().input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(path) = file.path {
                self.add_file(path);
            }
        }

        let entries: Vec<FileEntry> = self.entries.clone();
        TableBuilder::new(ui)
            .id_salt(self.title.clone())
            .column(Column::remainder())
            .column(Column::auto())
            .striped(true)
            .vscroll(true)
            .max_scroll_height(180.0)
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.label("File");
                });
                header.col(|ui| {
                    ui.label("Status");
                });
            })
            .body(|mut body| {
                for entry in &entries {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            let is_selected = self.selected.contains(&entry.path);
                            let label = entry.path.to_string_lossy();
                            if ui.selectable_label(is_selected, label).clicked() {
                                self.toggle_selection(&entry.path);
                            }
                        });
                        row.col(|ui| {
                            ui.colored_label(
                                Self::status_color(entry.status),
                                entry.status.label(),
                            );
                        });
                    });
                }
            });

        if let Some(notice) = &self.notice {
            ui.colored_label(egui::Color32::LIGHT_RED, notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(paths: &[&str]) -> FileSelectionList {
        let mut list = FileSelectionList::new("Loaded Files:", "All Files", &[]);
        for path in paths {
            list.add_file(PathBuf::from(path));
        }
        list
    }

    #[test]
    fn duplicate_add_does_not_grow_the_list() {
        let mut list = list_with(&["a.h5", "b.h5"]);
        assert!(!list.add_file(PathBuf::from("a.h5")));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn remove_without_selection_is_a_noop_with_notice() {
        let mut list = list_with(&["a.h5", "b.h5"]);
        list.remove_selected();
        assert_eq!(list.len(), 2);
        assert!(list.notice.is_some());
    }

    #[test]
    fn remove_acts_on_selection_only() {
        let mut list = list_with(&["a.h5", "b.h5", "c.h5"]);
        list.toggle_selection(Path::new("b.h5"));
        list.remove_selected();
        assert_eq!(list.paths(), vec![PathBuf::from("a.h5"), PathBuf::from("c.h5")]);
        assert!(list.notice.is_none());
    }

    #[test]
    fn statuses_update_by_path_and_reset() {
        let mut list = list_with(&["a.h5", "b.h5"]);
        list.set_status(Path::new("b.h5"), TaskStatus::Failed);
        assert_eq!(list.status_of(Path::new("b.h5")), Some(TaskStatus::Failed));
        assert_eq!(list.status_of(Path::new("a.h5")), Some(TaskStatus::Pending));
        list.reset_statuses();
        assert_eq!(list.status_of(Path::new("b.h5")), Some(TaskStatus::Pending));
    }

    #[test]
    fn status_updates_survive_removal_of_another_entry() {
        let mut list = list_with(&["a.h5", "b.h5"]);
        list.toggle_selection(Path::new("a.h5"));
        list.remove_selected();

        list.set_status(Path::new("b.h5"), TaskStatus::Complete);
        assert_eq!(
            list.status_of(Path::new("b.h5")),
            Some(TaskStatus::Complete)
        );

        // An update for the removed file is dropped, not misattributed.
        list.set_status(Path::new("a.h5"), TaskStatus::Failed);
        assert_eq!(
            list.status_of(Path::new("b.h5")),
            Some(TaskStatus::Complete)
        );
    }
}
