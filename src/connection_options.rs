use crate::{Error, Result};
use url::Url;

#[derive(Clone, Debug, Default)]
pub struct ConnectionOptions {
    pub scheme: Option<String>,
    pub file_path: Option<String>, // SQLite
    pub memory: bool,
}

impl ConnectionOptions {
    pub fn with_scheme(mut self, scheme: Option<String>) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_file_path(mut self, file_path: Option<String>) -> Self {
        self.file_path = file_path;
        self
    }

    pub fn with_memory(mut self, memory: bool) -> Self {
        self.memory = memory;
        self
    }

    pub fn in_memory() -> Self {
        Self::default()
            .with_scheme(Some("sqlite".to_string()))
            .with_memory(true)
    }
}

impl TryFrom<&str> for ConnectionOptions {
    type Error = Error;

    /// Accepts `sqlite://:memory:`, `sqlite:///absolute/path.db`,
    /// `sqlite://relative.db` or a plain file path.
    fn try_from(dsn: &str) -> Result<Self> {
        if dsn.is_empty() {
            return Err(Error::invalid_dsn(dsn));
        }

        if dsn.eq("sqlite://:memory:") || dsn.eq(":memory:") {
            return Ok(Self::in_memory());
        }

        if !dsn.contains("://") {
            return Ok(Self::default()
                .with_scheme(Some("sqlite".to_string()))
                .with_file_path(Some(dsn.to_string())));
        }

        let url = Url::parse(dsn).map_err(|_| Error::invalid_dsn(dsn))?;
        let options = match url.scheme() {
            "sqlite" | "sqlite3" => {
                let path = match url.host_str() {
                    Some(host) if !host.is_empty() => format!("{}{}", host, url.path()),
                    _ => url.path().to_string(),
                };

                if path.is_empty() {
                    return Err(Error::invalid_dsn(dsn));
                }

                Self::default()
                    .with_scheme(Some("sqlite".to_string()))
                    .with_file_path(Some(path))
            }
            scheme => Self::default().with_scheme(Some(scheme.to_string())),
        };

        Ok(options)
    }
}
