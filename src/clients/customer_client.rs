use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::customer_actor::{CustomerAction, CustomerActionResult, CustomerError};
use crate::domain::{Role, User, UserCreate, UserPatch};

/// Client for the customer directory actor.
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<User>,
}

impl CustomerClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn register(&self, params: UserCreate) -> Result<String, CustomerError> {
        debug!("Sending request");
        Ok(self.inner.create(params).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: String) -> Result<Option<User>, CustomerError> {
        debug!("Sending request");
        Ok(self.inner.get(id).await?)
    }

    /// All accounts, oldest first.
    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<User>, CustomerError> {
        debug!("Sending request");
        let mut users = self.inner.list().await?;
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn update_customer(
        &self,
        id: String,
        patch: UserPatch,
    ) -> Result<User, CustomerError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?)
    }

    /// Returns the account's new `is_active`.
    #[instrument(skip(self))]
    pub async fn toggle_active(&self, id: String) -> Result<bool, CustomerError> {
        debug!("Sending request");
        match self.inner.perform_action(id, CustomerAction::ToggleActive).await? {
            CustomerActionResult::ToggleActive(active) => Ok(active),
            other => Err(CustomerError::ActorCommunicationError(format!(
                "Unexpected result: {:?}",
                other
            ))),
        }
    }

    /// Returns the role the account had before.
    #[instrument(skip(self))]
    pub async fn assign_role(&self, id: String, role: Role) -> Result<Role, CustomerError> {
        debug!("Sending request");
        match self.inner.perform_action(id, CustomerAction::AssignRole(role)).await? {
            CustomerActionResult::AssignRole(previous) => Ok(previous),
            other => Err(CustomerError::ActorCommunicationError(format!(
                "Unexpected result: {:?}",
                other
            ))),
        }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CustomerError> {
        debug!("Sending shutdown request");
        Ok(self.inner.shutdown().await?)
    }
}
