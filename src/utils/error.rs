use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("Invalid interval: check-in {start} must be before check-out {end}")]
    InvalidInterval { start: String, end: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Reservation store error: {message}")]
    Store { message: String },

    #[error("CSV error at row {row}: {message}")]
    Csv { row: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 使用者輸入問題，拒絕請求即可
    Low,
    Medium,
    High,
    Critical,
}

impl BookingError {
    /// 可由呼叫端轉成 4xx 類驗證失敗的錯誤
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookingError::InvalidDate { .. }
                | BookingError::InvalidInterval { .. }
                | BookingError::Validation { .. }
        )
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BookingError::InvalidDate { .. }
            | BookingError::InvalidInterval { .. }
            | BookingError::Validation { .. } => ErrorSeverity::Low,
            BookingError::Csv { .. } | BookingError::Serialization(_) => ErrorSeverity::Medium,
            BookingError::Config { .. } | BookingError::InvalidConfigValue { .. } => {
                ErrorSeverity::High
            }
            BookingError::Store { .. } | BookingError::Io(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BookingError::InvalidDate { input, .. } => {
                format!("'{}' is not a date we understand", input)
            }
            BookingError::InvalidInterval { start, end } => format!(
                "Check-out ({}) must be at least one day after check-in ({})",
                end, start
            ),
            BookingError::Validation { message } => message.clone(),
            BookingError::Config { .. } | BookingError::InvalidConfigValue { .. } => {
                format!("Configuration problem: {}", self)
            }
            BookingError::Csv { row, .. } => format!("Could not read reservation on row {}", row),
            BookingError::Store { .. } | BookingError::Io(_) | BookingError::Serialization(_) => {
                "Reservations could not be loaded or saved".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BookingError::InvalidDate { .. } => {
                "Use YYYY-MM-DD or an RFC 3339 timestamp such as 2024-01-10T14:00:00Z"
            }
            BookingError::InvalidInterval { .. } => "Pick a check-out date after the check-in date",
            BookingError::Validation { .. } => "Fix the request fields and try again",
            BookingError::Config { .. } | BookingError::InvalidConfigValue { .. } => {
                "Check the TOML config file and command line flags"
            }
            BookingError::Csv { .. } => {
                "Expected header: id,resource_id,check_in,check_out,guest"
            }
            BookingError::Store { .. } | BookingError::Io(_) | BookingError::Serialization(_) => {
                "Check that the store path exists and contains a JSON array of reservations"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
