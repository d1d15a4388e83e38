//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! [`create_mock_ledger_client`] and [`create_mock_client`] return a client
//! wired to a receiver the test controls. The `expect_*` helpers pull the
//! next request off that receiver, so a test can assert on what the client
//! sent and script the actor's reply.

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use crate::clients::LedgerClient;
use crate::domain::{CandidateItem, Order, OrderCandidate, OrderQuote};
use crate::ledger_actor::{LedgerError, LedgerRequest};

pub fn create_mock_ledger_client(
    buffer_size: usize,
) -> (LedgerClient, mpsc::Receiver<LedgerRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (LedgerClient::new(sender), receiver)
}

/// Returns `None` if the next request is not a quote.
pub async fn expect_quote(
    receiver: &mut mpsc::Receiver<LedgerRequest>,
) -> Option<(Vec<CandidateItem>, oneshot::Sender<Result<OrderQuote, LedgerError>>)> {
    match receiver.recv().await {
        Some(LedgerRequest::QuoteOrder { items, respond_to }) => Some((items, respond_to)),
        _ => None,
    }
}

/// Returns `None` if the next request is not a commit.
pub async fn expect_commit(
    receiver: &mut mpsc::Receiver<LedgerRequest>,
) -> Option<(OrderCandidate, oneshot::Sender<Result<Order, LedgerError>>)> {
    match receiver.recv().await {
        Some(LedgerRequest::CommitOrder { candidate, respond_to }) => Some((candidate, respond_to)),
        _ => None,
    }
}

pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<oneshot::Sender<Result<Vec<T>, FrameworkError>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, oneshot::Sender<Result<T::ActionResult, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::CustomerClient;
    use crate::customer_actor::{CustomerAction, CustomerActionResult, CustomerError};
    use crate::domain::{Role, User, UserCreate};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        let create_task = tokio::spawn(async move {
            let user = UserCreate {
                name: "Test".to_string(),
                email: "test@example.com".to_string(),
                role: Role::Customer,
            };
            client.create(user).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "Test");
        responder.send(Ok("u9".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("u9".to_string()));
    }

    #[tokio::test]
    async fn test_customer_client_sorts_oldest_first() {
        let (inner, mut receiver) = create_mock_client::<User>(10);
        let client = CustomerClient::new(inner);

        let task = tokio::spawn(async move { client.list_customers().await });

        let responder = expect_list(&mut receiver).await.expect("Expected List request");
        let older = User::new("b", "Older", "older@example.com", Role::Customer);
        let mut newer = User::new("a", "Newer", "newer@example.com", Role::Customer);
        newer.created_at = older.created_at + chrono::Duration::days(1);
        responder.send(Ok(vec![newer, older])).unwrap();

        let users = task.await.unwrap().unwrap();
        assert_eq!(users[0].id, "b");
        assert_eq!(users[1].id, "a");
    }

    #[tokio::test]
    async fn test_customer_client_toggle_and_closed_actor() {
        let (inner, mut receiver) = create_mock_client::<User>(10);
        let client = CustomerClient::new(inner);

        let task = tokio::spawn(async move { client.toggle_active("u1".to_string()).await });

        let (id, action, responder) = expect_action(&mut receiver).await.expect("Expected Action request");
        assert_eq!(id, "u1");
        assert!(matches!(action, CustomerAction::ToggleActive));
        responder.send(Ok(CustomerActionResult::ToggleActive(false))).unwrap();
        assert_eq!(task.await.unwrap(), Ok(false));

        drop(receiver);
        let (inner, receiver) = create_mock_client::<User>(1);
        drop(receiver);
        let client = CustomerClient::new(inner);
        assert!(matches!(
            client.toggle_active("u1".to_string()).await,
            Err(CustomerError::ActorCommunicationError(_))
        ));
    }
}
