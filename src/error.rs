use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid collection address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("parse anchor page: {reason}")]
    Parse { reason: String },

    #[error("fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("extract {element} from {url}: element not found")]
    Extraction { url: String, element: String },

    #[error("write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("load template {}: {reason}", path.display())]
    Template { path: PathBuf, reason: String },

    #[error("render template {name}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

impl Error {
    pub fn invalid_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }

    pub fn fetch(url: impl ToString, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn extraction(url: impl ToString, element: impl Into<String>) -> Self {
        Self::Extraction {
            url: url.to_string(),
            element: element.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
