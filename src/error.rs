use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch page: {0}")]
    PageFetch(#[from] reqwest::Error),

    // Specific HTTP status code errors
    #[error("Page not found (404): {url}")]
    PageNotFound { url: String },

    #[error("Server error ({status}): {message} (URL: {url})")]
    ServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("Client error ({status}): {message} (URL: {url})")]
    ClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("Rate limit exceeded (429): {message} (URL: {url})")]
    RateLimit { message: String, url: String },

    #[error("Service unavailable ({status}): {message} (URL: {url})")]
    ServiceUnavailable {
        status: u16,
        message: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while fetching: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    // Page structure errors
    #[error("No statistics table found for '{table}' (URL: {url})")]
    TableNotFound { table: String, url: String },

    #[error("Page returned empty or missing data: {message} (URL: {url})")]
    PageNoData { message: String, url: String },

    // Dataset errors
    #[error("No source table produced any player record: {0}")]
    NoRecords(String),

    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { column: String, file: String },

    #[error("Flattened column count {actual} does not match declared schema size {expected}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create a page not found error
    pub fn page_not_found(url: impl Into<String>) -> Self {
        Self::PageNotFound { url: url.into() }
    }

    /// Create a server error (5xx status codes)
    pub fn server_error(status: u16, message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a client error (4xx status codes except 404 and 429)
    pub fn client_error(status: u16, message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a service unavailable error
    pub fn service_unavailable(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ServiceUnavailable {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a table not found error
    pub fn table_not_found(table: impl Into<String>, url: impl Into<String>) -> Self {
        Self::TableNotFound {
            table: table.into(),
            url: url.into(),
        }
    }

    /// Create a page no data error
    pub fn page_no_data(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::PageNoData {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a missing column error
    pub fn missing_column(column: impl Into<String>, file: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            file: file.into(),
        }
    }
}
