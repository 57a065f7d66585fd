/// Opaque failure from a persistence backend.
///
/// The ledger never inspects or retries these; it only propagates them.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid plate number: {0}")]
    InvalidPlate(String),

    #[error("Plate {plate} was already rated by this user today")]
    AlreadyRatedToday { plate: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[source] StoreError),
}

impl CoreError {
    /// Wrap any backend error as [`CoreError::Store`].
    pub fn store(err: impl Into<StoreError>) -> Self {
        Self::Store(err.into())
    }

    /// Whether this is an expected business outcome rather than a fault.
    pub fn is_business_rule(&self) -> bool {
        matches!(self, Self::InvalidPlate(_) | Self::AlreadyRatedToday { .. })
    }
}
