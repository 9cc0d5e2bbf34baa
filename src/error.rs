use std::error::Error;
use std::fmt::Display;

#[derive(Debug)]
pub enum AppError {
    File(std::io::Error),
    Yaml(serde_yaml::Error),
    Placeholder(String),
    CommandSyntax(shell_words::ParseError),
    EmptyCommand,
    #[cfg(feature = "hdf5")]
    Hdf5(hdf5::Error),
    NoHdf5Support,
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> AppError {
        AppError::File(err)
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> AppError {
        AppError::Yaml(err)
    }
}

impl From<shell_words::ParseError> for AppError {
    fn from(err: shell_words::ParseError) -> AppError {
        AppError::CommandSyntax(err)
    }
}

#[cfg(feature = "hdf5")]
impl From<hdf5::Error> for AppError {
    fn from(err: hdf5::Error) -> AppError {
        AppError::Hdf5(err)
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::File(x) => write!(f, "File I/O error: {}", x),
            AppError::Yaml(x) => write!(f, "YAML error: {}", x),
            AppError::Placeholder(x) => {
                write!(f, "Command template references unknown placeholder '{{{}}}'", x)
            }
            AppError::CommandSyntax(x) => write!(f, "Could not split command line: {}", x),
            AppError::EmptyCommand => write!(f, "Command template produced an empty command"),
            #[cfg(feature = "hdf5")]
            AppError::Hdf5(x) => write!(f, "HDF5 error: {}", x),
            AppError::NoHdf5Support => {
                write!(f, "Built without HDF5 support (enable the `hdf5` feature)")
            }
        }
    }
}

impl Error for AppError {}
