use crate::tabs::{
    DataSettingsTab, HistRunTab, HistSettingsTab, OptimizationTab, OutputTab, RunSettingsTab,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Tab {
    #[default]
    DataSettings,
    RunSettings,
    Optimization,
    HistSettings,
    Histogramming,
    Output,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::DataSettings,
        Tab::RunSettings,
        Tab::Optimization,
        Tab::HistSettings,
        Tab::Histogramming,
        Tab::Output,
    ];

    pub fn title(&self) -> &str {
        match self {
            Tab::DataSettings => "Data Settings",
            Tab::RunSettings => "Run Settings",
            Tab::Optimization => "Optimization",
            Tab::HistSettings => "Histogram Settings",
            Tab::Histogramming => "Histogramming",
            Tab::Output => "Output",
        }
    }
}

/// Top-level application state, persisted through eframe storage between
/// sessions.
#[derive(Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SasDesk {
    active_tab: Tab,
    data_settings: DataSettingsTab,
    run_settings: RunSettingsTab,
    optimization: OptimizationTab,
    hist_settings: HistSettingsTab,
    histogramming: HistRunTab,
    output: OutputTab,
}

impl SasDesk {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        if let Some(storage) = cc.storage {
            return eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default();
        }
        Default::default()
    }
}

impl eframe::App for SasDesk {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn ui(&mut self, ui: &mut egui::Ui, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show_inside(ui, |ui| {
            ui.horizontal(|ui| {
                egui::global_theme_preference_switch(ui);
                ui.separator();
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.active_tab, tab, tab.title());
                }
            });
        });

        egui::CentralPanel::default().show_inside(ui, |ui| match self.active_tab {
            Tab::DataSettings => {
                if let Some(path) = self.data_settings.ui(ui) {
                    self.optimization.set_data_config(&path);
                }
            }
            Tab::RunSettings => {
                if let Some(path) = self.run_settings.ui(ui) {
                    self.optimization.set_run_config(&path);
                }
            }
            Tab::Optimization => self.optimization.ui(ui),
            Tab::HistSettings => {
                if let Some(path) = self.hist_settings.ui(ui) {
                    self.histogramming.set_hist_config(&path);
                }
            }
            Tab::Histogramming => self.histogramming.ui(ui),
            Tab::Output => self.output.ui(ui),
        });
    }
}
