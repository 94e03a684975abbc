use std::fmt;
use std::path::PathBuf;

/// Where the CSV snapshot is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Fetched over HTTP(S).
    Http(String),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl Source {
    /// Anything starting with `http` is a URL; everything else is a path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http") {
            Source::Http(location.to_string())
        } else {
            Source::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Http(url) => f.write_str(url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}
