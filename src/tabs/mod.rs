pub mod data_settings;
pub mod hist_run;
pub mod hist_settings;
pub mod optimization;
pub mod output;
pub mod run_settings;

pub use data_settings::DataSettingsTab;
pub use hist_run::HistRunTab;
pub use hist_settings::HistSettingsTab;
pub use optimization::OptimizationTab;
pub use output::OutputTab;
pub use run_settings::RunSettingsTab;
