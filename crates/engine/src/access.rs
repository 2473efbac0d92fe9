//! Access decisions over accounts.
//!
//! [`decide`] is pure: the only stored fact it needs (whether an active
//! trainer assignment exists) is looked up by the caller and passed in.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Trainer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Trainer => "trainer",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "client" => Ok(Self::Client),
            "trainer" => Ok(Self::Trainer),
            "admin" => Ok(Self::Admin),
            other => Err(EngineError::InvalidRole(format!("invalid account role: {other}"))),
        }
    }
}

/// The authenticated caller.
///
/// `role` is `None` when the stored role is not one the platform supports;
/// such requesters are denied everywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Requester {
    pub account_id: Uuid,
    pub role: Option<Role>,
}

impl Requester {
    #[must_use]
    pub fn new(account_id: Uuid, role: Role) -> Self {
        Self {
            account_id,
            role: Some(role),
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    Unauthenticated,
    NotSelf,
    NotAssigned,
    UnsupportedRole,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: Option<DenyReason>,
}

impl AccessDecision {
    const ALLOW: Self = Self {
        allowed: true,
        reason: None,
    };

    fn deny(reason: DenyReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }

    /// Converts a denial into the matching engine error.
    pub fn into_result(self) -> Result<(), EngineError> {
        match self.reason {
            None if self.allowed => Ok(()),
            Some(DenyReason::Unauthenticated) => Err(EngineError::Unauthenticated),
            Some(DenyReason::NotSelf) => Err(EngineError::Forbidden(
                "clients may only act on their own account".to_string(),
            )),
            Some(DenyReason::NotAssigned) => Err(EngineError::Forbidden(
                "trainer is not assigned to this client".to_string(),
            )),
            Some(DenyReason::UnsupportedRole) | None => Err(EngineError::Forbidden(
                "role is not allowed to act on accounts".to_string(),
            )),
        }
    }
}

/// Decides whether `requester` may act on the account `target`.
///
/// - admin: always
/// - client: only on itself
/// - trainer: only with an active assignment to `target`
/// - anything else, including no requester: denied
#[must_use]
pub fn decide(
    requester: Option<&Requester>,
    target: Uuid,
    has_active_assignment: bool,
) -> AccessDecision {
    let Some(requester) = requester else {
        return AccessDecision::deny(DenyReason::Unauthenticated);
    };
    match requester.role {
        Some(Role::Admin) => AccessDecision::ALLOW,
        Some(Role::Client) if requester.account_id == target => AccessDecision::ALLOW,
        Some(Role::Client) => AccessDecision::deny(DenyReason::NotSelf),
        Some(Role::Trainer) if has_active_assignment => AccessDecision::ALLOW,
        Some(Role::Trainer) => AccessDecision::deny(DenyReason::NotAssigned),
        None => AccessDecision::deny(DenyReason::UnsupportedRole),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_always_allowed() {
        let admin = Requester::new(Uuid::new_v4(), Role::Admin);
        assert!(decide(Some(&admin), Uuid::new_v4(), false).allowed);
    }

    #[test]
    fn client_is_limited_to_itself() {
        let id = Uuid::new_v4();
        let client = Requester::new(id, Role::Client);
        assert!(decide(Some(&client), id, false).allowed);
        let other = decide(Some(&client), Uuid::new_v4(), true);
        assert_eq!(other.reason, Some(DenyReason::NotSelf));
    }

    #[test]
    fn trainer_needs_an_active_assignment() {
        let trainer = Requester::new(Uuid::new_v4(), Role::Trainer);
        let client = Uuid::new_v4();
        assert!(decide(Some(&trainer), client, true).allowed);
        assert_eq!(
            decide(Some(&trainer), client, false).reason,
            Some(DenyReason::NotAssigned)
        );
    }

    #[test]
    fn missing_or_unknown_requester_is_denied() {
        let target = Uuid::new_v4();
        assert_eq!(
            decide(None, target, true).into_result(),
            Err(EngineError::Unauthenticated)
        );
        let stranger = Requester {
            account_id: target,
            role: None,
        };
        assert_eq!(
            decide(Some(&stranger), target, true).reason,
            Some(DenyReason::UnsupportedRole)
        );
    }

    #[test]
    fn decision_is_repeatable() {
        let trainer = Requester::new(Uuid::new_v4(), Role::Trainer);
        let client = Uuid::new_v4();
        assert_eq!(
            decide(Some(&trainer), client, false),
            decide(Some(&trainer), client, false)
        );
    }
}
