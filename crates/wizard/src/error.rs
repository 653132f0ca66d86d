use atelier_core::error::CoreError;
use atelier_core::services::ServiceError;

/// User-facing failure taxonomy of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// Local input problem; nothing was sent anywhere.
    #[error("{0}")]
    Validation(String),

    /// The account may not perform the action (no credits, plan limits).
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Session expired")]
    SessionExpired,

    /// The user cancelled; never surfaced as an error banner.
    #[error("Cancelled")]
    Cancelled,

    /// Anything else that went wrong talking to a collaborator.
    #[error("Service unavailable: {0}")]
    Transport(String),
}

impl From<CoreError> for WizardError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            not_found @ CoreError::NotFound { .. } => Self::Validation(not_found.to_string()),
        }
    }
}

/// Map a collaborator error onto the wizard taxonomy.
///
/// | Service error               | Wizard error     |
/// |-----------------------------|------------------|
/// | `Status { 401 }`            | `SessionExpired` |
/// | `Status { 402 \| 403 }`     | `AccessDenied`   |
/// | `Cancelled`                 | `Cancelled`      |
/// | anything else               | `Transport`      |
pub fn classify(err: &ServiceError) -> WizardError {
    match err {
        ServiceError::Cancelled => WizardError::Cancelled,
        ServiceError::Status { status: 401, .. } => WizardError::SessionExpired,
        ServiceError::Status {
            status: 402 | 403,
            message,
        } => WizardError::AccessDenied(message.clone()),
        other => WizardError::Transport(other.to_string()),
    }
}
