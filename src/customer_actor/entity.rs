use chrono::Utc;

use super::actions::{CustomerAction, CustomerActionResult};
use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserPatch};

impl Entity for User {
    type Id = String;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = CustomerAction;
    type ActionResult = CustomerActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    /// Registers a new, active account.
    ///
    /// # Errors
    /// Rejects a missing name or an email without `@`.
    fn from_create_params(id: String, params: UserCreate) -> Result<Self, String> {
        if params.name.trim().is_empty() {
            return Err("Name required".to_string());
        }
        check_email(&params.email)?;
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            role: params.role,
            is_active: true,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, patch: UserPatch) -> Result<(), String> {
        if let Some(email) = patch.email {
            check_email(&email)?;
            self.email = email;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: CustomerAction) -> Result<CustomerActionResult, String> {
        match action {
            CustomerAction::ToggleActive => {
                self.is_active = !self.is_active;
                Ok(CustomerActionResult::ToggleActive(self.is_active))
            }
            CustomerAction::AssignRole(role) => {
                let previous = std::mem::replace(&mut self.role, role);
                Ok(CustomerActionResult::AssignRole(previous))
            }
        }
    }
}

fn check_email(email: &str) -> Result<(), String> {
    if !email.contains('@') {
        return Err(format!("Invalid email: {}", email));
    }
    Ok(())
}
