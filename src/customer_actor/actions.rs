use crate::domain::Role;

/// Admin actions on an account beyond profile edits.
#[derive(Debug, Clone)]
pub enum CustomerAction {
    /// Locks an active account or unlocks a locked one.
    ToggleActive,
    /// Replaces the account's role.
    AssignRole(Role),
}

/// Results from CustomerActions - variants match 1:1 with CustomerAction
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerActionResult {
    /// The account's `is_active` after the toggle
    ToggleActive(bool),
    /// The role the account had before
    AssignRole(Role),
}
