/// Errors that can occur during registry operations
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("driver already exists: {0}")]
    DuplicateDriver(String),

    #[error("driver not found: {0}")]
    DriverNotFound(String),

    #[error("customer already exists: {0}")]
    DuplicateCustomer(String),
}

/// Errors surfaced by a directory lookup.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    /// The backing store could not be reached
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    /// The store answered with data that could not be read
    #[error("invalid directory record: {0}")]
    InvalidRecord(String),
}
