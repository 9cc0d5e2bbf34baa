//! Thin wrappers around the HDF5 library for the result artifacts the
//! external tools produce. Only enumeration and 1-D dataset reads; all
//! interpretation of the contents stays with the user.
//!
//! Compiled behind the `hdf5` cargo feature since it needs a system libhdf5.
//! Without it the calls return `AppError::NoHdf5Support` and the tabs show a
//! notice instead.

use std::fmt::Display;
use std::path::Path;

use crate::error::AppError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetInfo {
    pub path: String,
    pub shape: Vec<usize>,
}

impl Display for DatasetInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Path: {}, Shape: {:?}", self.path, self.shape)
    }
}

pub fn is_nexus_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("h5" | "hdf5" | "nxs")
    )
}

/// Recursively enumerate dataset paths and shapes for display.
#[cfg(feature = "hdf5")]
pub fn list_datasets(file: &Path) -> Result<Vec<DatasetInfo>, AppError> {
    let file = hdf5::File::open(file)?;
    let mut out = Vec::new();
    visit_group(&file, "", &mut out)?;
    Ok(out)
}

#[cfg(feature = "hdf5")]
fn visit_group(group: &hdf5::Group, prefix: &str, out: &mut Vec<DatasetInfo>) -> Result<(), AppError> {
    for name in group.member_names()? {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };
        if let Ok(subgroup) = group.group(&name) {
            visit_group(&subgroup, &path, out)?;
        } else if let Ok(dataset) = group.dataset(&name) {
            out.push(DatasetInfo {
                path,
                shape: dataset.shape(),
            });
        }
    }
    Ok(())
}

/// Read a named 1-D float dataset, e.g. a Q or intensity column under
/// `/analyses/MCResult1/...`.
#[cfg(feature = "hdf5")]
pub fn read_f64_1d(file: &Path, dataset: &str) -> Result<Vec<f64>, AppError> {
    let file = hdf5::File::open(file)?;
    let dataset = file.dataset(dataset)?;
    Ok(dataset.read_1d::<f64>()?.to_vec())
}

#[cfg(not(feature = "hdf5"))]
pub fn list_datasets(_file: &Path) -> Result<Vec<DatasetInfo>, AppError> {
    Err(AppError::NoHdf5Support)
}

#[cfg(not(feature = "hdf5"))]
pub fn read_f64_1d(_file: &Path, _dataset: &str) -> Result<Vec<f64>, AppError> {
    Err(AppError::NoHdf5Support)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_nexus_extensions() {
        assert!(is_nexus_file(Path::new("run_output.hdf5")));
        assert!(is_nexus_file(Path::new("a.h5")));
        assert!(is_nexus_file(Path::new("a.nxs")));
        assert!(!is_nexus_file(Path::new("a.csv")));
        assert!(!is_nexus_file(Path::new("no_extension")));
    }

    #[test]
    fn dataset_info_display() {
        let info = DatasetInfo {
            path: "entry/data/I".into(),
            shape: vec![512],
        };
        assert_eq!(info.to_string(), "Path: entry/data/I, Shape: [512]");
    }
}
