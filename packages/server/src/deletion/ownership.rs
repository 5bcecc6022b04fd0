use crate::utils::jwt::ADMIN_LEVEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Standard,
    Admin,
}

impl Role {
    /// Map the auth server's level name onto a role. Unknown levels get no extra rights.
    pub fn from_level_name(level_name: &str) -> Self {
        if level_name == ADMIN_LEVEL {
            Role::Admin
        } else {
            Role::Standard
        }
    }
}

/// The authenticated actor behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub role: Role,
}

/// Decide whether `principal` may modify a recipe owned by `owner_id`.
///
/// Returns the owner id that the write must be scoped by, or `None` when
/// the principal is neither the owner nor an admin. For admins this is the
/// recipe's real owner, so the statement keeps its owner predicate instead of
/// turning into an unconditional write.
pub fn resolve_owner(owner_id: i32, principal: &Principal) -> Option<i32> {
    match principal.role {
        Role::Admin => Some(owner_id),
        Role::Standard if principal.id == owner_id => Some(owner_id),
        Role::Standard => None,
    }
}
