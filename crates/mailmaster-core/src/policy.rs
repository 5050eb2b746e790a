//! Authorization policies
//!
//! Every check goes through [`authorize`], which first applies the admin
//! capability and only then consults the resource policy. The returned
//! [`Decision`] records which of the two produced the outcome.

use mailmaster_common::types::UserRole;
use mailmaster_common::{Error, Result};
use std::fmt;
use tracing::{debug, warn};

/// Abilities an actor may request on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ability {
    ViewAny,
    View,
    Create,
    Update,
    Delete,
    Restore,
    ForceDelete,
}

impl Ability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ability::ViewAny => "viewAny",
            Ability::View => "view",
            Ability::Create => "create",
            Ability::Update => "update",
            Ability::Delete => "delete",
            Ability::Restore => "restore",
            Ability::ForceDelete => "forceDelete",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-resource rule set
pub trait Policy {
    /// Resource name used in logs
    const RESOURCE: &'static str;

    fn allows(role: UserRole, ability: Ability) -> bool;
}

/// Shared rules: reads and writes are open, deletion is admin only, and
/// restore/force delete are never granted.
fn content_rules(role: UserRole, ability: Ability) -> bool {
    match ability {
        Ability::ViewAny | Ability::View | Ability::Create | Ability::Update => true,
        Ability::Delete => role == UserRole::Admin,
        Ability::Restore | Ability::ForceDelete => false,
    }
}

pub struct NewsletterPolicy;

impl Policy for NewsletterPolicy {
    const RESOURCE: &'static str = "newsletter";

    fn allows(role: UserRole, ability: Ability) -> bool {
        content_rules(role, ability)
    }
}

pub struct CampaignPolicy;

impl Policy for CampaignPolicy {
    const RESOURCE: &'static str = "campaign";

    fn allows(role: UserRole, ability: Ability) -> bool {
        content_rules(role, ability)
    }
}

/// Where an authorization outcome came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Granted by the admin capability before the policy ran
    AdminBypass,
    /// Granted by the resource policy
    Allowed,
    /// Refused by the resource policy
    Denied,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Decision::Denied)
    }
}

/// Evaluate `ability` for an actor with `role` against policy `P`
pub fn check<P: Policy>(role: UserRole, ability: Ability) -> Decision {
    if role == UserRole::Admin {
        return Decision::AdminBypass;
    }

    if P::allows(role, ability) {
        Decision::Allowed
    } else {
        Decision::Denied
    }
}

/// Like [`check`], but a denial becomes [`Error::PermissionDenied`]
pub fn authorize<P: Policy>(role: UserRole, ability: Ability) -> Result<Decision> {
    let decision = check::<P>(role, ability);
    if decision.is_allowed() {
        debug!(
            resource = P::RESOURCE,
            ability = %ability,
            decision = ?decision,
            "Authorization granted"
        );
        Ok(decision)
    } else {
        warn!(
            resource = P::RESOURCE,
            ability = %ability,
            role = %role,
            "Authorization denied"
        );
        Err(Error::PermissionDenied(format!(
            "{} on {}",
            ability,
            P::RESOURCE
        )))
    }
}
