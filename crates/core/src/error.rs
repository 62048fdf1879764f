use thiserror::Error;

/// Ledger error types.
///
/// Each variant maps to an HTTP status code via [`LedgerError::status_code`].
/// Use [`LedgerError::into_response`] to produce a standardized JSON response
/// of the form `{ "message": "..." }`.
#[derive(Error, Debug)]
pub enum LedgerError {
    // --- 400 Bad Request ---
    #[error("{0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("You only have {available:.2} credits available to sell")]
    InsufficientCredits { requested: f64, available: f64 },

    #[error("Insufficient funds. You need ${required:.2} but only have ${available:.2} available.")]
    InsufficientFunds { required: f64, available: f64 },

    // --- 401 Unauthorized ---
    #[error("Authentication required")]
    Unauthenticated,

    // --- 403 Forbidden ---
    #[error("{0}")]
    Forbidden(String),

    // --- 404 Not Found ---
    #[error("{0}")]
    NotFound(String),

    // --- 409 Conflict ---
    #[error("{0}")]
    Conflict(String),

    // --- 500 Internal Server Error ---
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_)
            | Self::Validation(_)
            | Self::InsufficientCredits { .. }
            | Self::InsufficientFunds { .. } => 400,
            Self::Unauthenticated => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Config(_) | Self::Database(_) | Self::Serialization(_) | Self::Internal(_) => 500,
        }
    }

    /// Whether the error was raised before any write was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::BadRequest(_)
                | Self::Validation(_)
                | Self::InsufficientCredits { .. }
                | Self::InsufficientFunds { .. }
        )
    }

    /// Convert this error into a standardized [`LedgerResponse`].
    ///
    /// Internal errors (500) use a generic message to avoid leaking details.
    ///
    /// [`LedgerResponse`]: crate::types::LedgerResponse
    pub fn into_response(self) -> crate::types::LedgerResponse {
        let status = self.status_code();
        let message = match status {
            500 => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        crate::types::LedgerResponse::json(
            status,
            &serde_json::json!({
                "message": message
            }),
        )
        .unwrap_or_else(|_| crate::types::LedgerResponse::text(status, &message))
    }

    // --- Constructors ---

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

#[cfg(feature = "sqlx-postgres")]
impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    DatabaseError::Constraint(db_err.to_string())
                } else {
                    DatabaseError::Query(db_err.to_string())
                }
            }
            sqlx::Error::PoolClosed => DatabaseError::Connection("Pool closed".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::Connection("Pool timed out".to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DatabaseError::Decode(err.to_string())
            }
            _ => DatabaseError::Query(err.to_string()),
        }
    }
}

#[cfg(feature = "sqlx-postgres")]
impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Database(DatabaseError::from(err))
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Convert `validator::ValidationErrors` into a standardized error response body.
///
/// Returns a 422 response with `{ "code": "VALIDATION_ERROR", "message": "...", "errors": {...} }`.
pub fn validation_error_response(
    errors: &validator::ValidationErrors,
) -> crate::types::LedgerResponse {
    let field_errors: std::collections::HashMap<String, Vec<String>> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect();

    let body = serde_json::json!({
        "code": "VALIDATION_ERROR",
        "message": "Validation failed",
        "errors": field_errors,
    });

    crate::types::LedgerResponse::json(422, &body)
        .unwrap_or_else(|_| crate::types::LedgerResponse::text(422, "Validation failed"))
}

/// Validate a request body, returning a parsed + validated value or an error response.
pub fn validate_request_body<T>(
    req: &crate::types::LedgerRequest,
) -> Result<T, crate::types::LedgerResponse>
where
    T: serde::de::DeserializeOwned + validator::Validate,
{
    let value: T = req.body_as_json().map_err(|e| {
        crate::types::LedgerResponse::json(
            400,
            &serde_json::json!({
                "message": format!("Invalid JSON: {}", e),
            }),
        )
        .unwrap_or_else(|_| crate::types::LedgerResponse::text(400, "Invalid JSON"))
    })?;

    value.validate().map_err(|e| validation_error_response(&e))?;

    Ok(value)
}
