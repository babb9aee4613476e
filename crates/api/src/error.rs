// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use sdms::CoreError;
use sdms_domain::DomainError;
use sdms_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The entity is no longer in the state the operation requires.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// Storage or another dependency failed.
    DependencyFailure {
        /// A description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::DependencyFailure { message } => {
                write!(f, "Dependency failure: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

fn invalid(field: &str, message: String) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

/// Translates a domain error into an API error.
///
/// Field validation failures become `InvalidInput`. Lifecycle violations
/// become `Conflict`: the entity exists but is no longer in a state that
/// allows the operation.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let description: String = err.to_string();
    match err {
        DomainError::InvalidName(msg) => invalid("name", msg),
        DomainError::InvalidItemName(msg) => invalid("item_name", msg),
        DomainError::InvalidItemType(msg) => invalid("item_type", msg),
        DomainError::InvalidQuantity { field, .. } => invalid(field, description),
        DomainError::EmptyDonation => invalid("items", description),
        DomainError::MissingRejectionReason => invalid("reason", description),
        DomainError::InvalidLocation { .. } => invalid("location", description),
        DomainError::InvalidDonationStatus(_)
        | DomainError::InvalidRequestStatus(_)
        | DomainError::InvalidLogisticsStatus(_) => invalid("status", description),
        DomainError::InvalidUrgency(_) => invalid("urgency", description),
        DomainError::InvalidItemCondition(_) => invalid("condition", description),
        DomainError::InvalidParticipantRole(_) => invalid("role", description),
        DomainError::InvalidNotificationType(_) => invalid("notification_type", description),
        DomainError::InvalidTrackingId(_) => invalid("tracking_id", description),
        DomainError::InvalidDonationTransition { .. }
        | DomainError::InvalidRequestTransition { .. }
        | DomainError::InvalidLogisticsTransition { .. } => ApiError::Conflict {
            message: description,
        },
        DomainError::IncompatibleMatch { .. } => ApiError::DomainRuleViolation {
            rule: String::from("compatible_item_type"),
            message: description,
        },
        DomainError::ParticipantRoleMismatch { .. } => ApiError::DomainRuleViolation {
            rule: String::from("participant_role"),
            message: description,
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::MissingEntity { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a storage error into an API error.
///
/// # Arguments
///
/// * `resource_type` - The resource named in a `ResourceNotFound` error
/// * `err` - The storage error
#[must_use]
pub fn translate_persistence_error(resource_type: &str, err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message,
        },
        PersistenceError::ConcurrentModification { .. } | PersistenceError::Duplicate(_) => {
            ApiError::Conflict {
                message: err.to_string(),
            }
        }
        other => ApiError::DependencyFailure {
            message: other.to_string(),
        },
    }
}
