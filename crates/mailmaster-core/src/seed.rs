//! Demo data

use crate::accounts::{AccountService, Registration};
use mailmaster_common::types::UserRole;
use mailmaster_common::Result;
use tracing::info;

/// Users created by [`seed_demo_users`]
pub const DEMO_USERS: [(&str, &str, UserRole); 2] = [
    ("Admin User", "admin@example.com", UserRole::Admin),
    ("Editor User", "editor@example.com", UserRole::Editor),
];

/// Create the admin and editor demo users when missing
pub async fn seed_demo_users(accounts: &AccountService, password: &str) -> Result<usize> {
    let mut created = 0;
    for (name, email, role) in DEMO_USERS {
        let registration = Registration {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
        };
        if accounts.ensure_user(registration).await? {
            info!(email, role = %role, "Seeded demo user");
            created += 1;
        }
    }
    Ok(created)
}
