use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum IoError {
    /// Input path does not exist.
    NotFound(PathBuf),
    /// File exists but could not be read.
    Read { path: PathBuf, message: String },
    /// File was read but its contents are not a usable table.
    Parse { path: PathBuf, message: String },
    /// Extension we have no reader for.
    UnsupportedFormat(String),
    /// Output could not be written.
    Write { path: PathBuf, message: String },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "input file '{}' not found", path.display()),
            Self::Read { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Parse { path, message } => {
                write!(f, "cannot parse {}: {message}", path.display())
            }
            Self::UnsupportedFormat(ext) => write!(f, "unsupported file format: {ext}"),
            Self::Write { path, message } => {
                write!(f, "cannot write {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for IoError {}
