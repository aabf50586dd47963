use color_eyre::eyre::Report;
use thiserror::Error;

use super::{ShiftStateError, TimeWindowError};

#[derive(Debug, Error)]
pub enum AuthAPIError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Missing token")]
    MissingToken,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

#[derive(Debug, Error)]
pub enum ShiftAPIError {
    #[error("Authentication error")]
    AuthenticationError(#[from] AuthAPIError),
    #[error("{0}")]
    InvalidTimeFormat(#[source] TimeWindowError),
    #[error("{0}")]
    InvalidShiftDuration(#[source] TimeWindowError),
    #[error("Shift conflicts with an existing shift for this employee")]
    ShiftConflict,
    #[error("Resource with ID not found: {0}")]
    NotFound(uuid::Uuid),
    #[error("Employee has already clocked in for this shift")]
    AlreadyClockedIn,
    #[error("Employee has not clocked in for this shift")]
    NotClockedIn,
    #[error("Employee has already clocked out for this shift")]
    AlreadyClockedOut,
    #[error("{0}")]
    Forbidden(String),
    #[error("Completed shifts cannot be deleted")]
    CannotDeleteCompleted,
    #[error("{0}")]
    InvalidStatusTransition(#[source] ShiftStateError),
    #[error("Shift was modified concurrently, retry the request")]
    ConcurrentModification,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
    #[error("Validation error")]
    ValidationError(#[from] ValidationError),
}

impl ShiftAPIError {
    /// Machine-readable kind sent alongside the human message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthenticationError(AuthAPIError::MissingToken) => {
                "MissingToken"
            }
            Self::AuthenticationError(AuthAPIError::InvalidToken) => {
                "InvalidToken"
            }
            Self::AuthenticationError(AuthAPIError::UnexpectedError(_)) => {
                "UnexpectedError"
            }
            Self::InvalidTimeFormat(_) => "InvalidTimeFormat",
            Self::InvalidShiftDuration(_) => "InvalidShiftDuration",
            Self::ShiftConflict => "ShiftConflict",
            Self::NotFound(_) => "NotFound",
            Self::AlreadyClockedIn => "AlreadyClockedIn",
            Self::NotClockedIn => "NotClockedIn",
            Self::AlreadyClockedOut => "AlreadyClockedOut",
            Self::Forbidden(_) => "Forbidden",
            Self::CannotDeleteCompleted => "CannotDeleteCompleted",
            Self::InvalidStatusTransition(_) => "InvalidStatusTransition",
            Self::ConcurrentModification => "ConcurrentModification",
            Self::UnexpectedError(_) => "UnexpectedError",
            Self::ValidationError(_) => "ValidationError",
        }
    }
}

impl From<TimeWindowError> for ShiftAPIError {
    fn from(error: TimeWindowError) -> Self {
        match error {
            TimeWindowError::InvalidTimeFormat(_) => {
                Self::InvalidTimeFormat(error)
            }
            _ => Self::InvalidShiftDuration(error),
        }
    }
}

impl From<ShiftStateError> for ShiftAPIError {
    fn from(error: ShiftStateError) -> Self {
        match error {
            ShiftStateError::NotAssignedEmployee => Self::Forbidden(
                "Only the assigned employee can clock in or out".to_string(),
            ),
            ShiftStateError::AlreadyClockedIn => Self::AlreadyClockedIn,
            ShiftStateError::NotClockedIn => Self::NotClockedIn,
            ShiftStateError::AlreadyClockedOut => Self::AlreadyClockedOut,
            ShiftStateError::CannotDeleteCompleted => {
                Self::CannotDeleteCompleted
            }
            ShiftStateError::ClockOutBeforeClockIn => Self::ValidationError(
                ValidationError::new(error.to_string()),
            ),
            e @ (ShiftStateError::Finalized(_)
            | ShiftStateError::InvalidTransition { .. }) => {
                Self::InvalidStatusTransition(e)
            }
        }
    }
}

#[derive(Debug, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: String) -> Self {
        Self(message)
    }

    pub fn as_ref(&self) -> &String {
        &self.0
    }
}
