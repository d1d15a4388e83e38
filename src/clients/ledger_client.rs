use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{
    CandidateItem, Order, OrderCandidate, OrderQuote, OrderStatus, PaymentStatus, Product,
    ProductCreate, ProductPatch, SalesSummary,
};
use crate::ledger_actor::{LedgerError, LedgerRequest};

/// Handle to the ledger actor. Cheap to clone; every clone talks to the same
/// mailbox.
#[derive(Clone)]
pub struct LedgerClient {
    sender: mpsc::Sender<LedgerRequest>,
}

impl LedgerClient {
    pub fn new(sender: mpsc::Sender<LedgerRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), LedgerError> {
        debug!("Sending shutdown request");
        self.sender
            .send(LedgerRequest::Shutdown)
            .await
            .map_err(|e| LedgerError::ActorCommunicationError(e.to_string()))
    }
}

// Catalog
client_method!(LedgerClient => fn list_products() -> Vec<Product> as LedgerRequest::ListProducts, Error = LedgerError);
client_method!(LedgerClient => fn get_product(id: String) -> Option<Product> as LedgerRequest::GetProduct, Error = LedgerError);
client_method!(LedgerClient => fn create_product(params: ProductCreate) -> Product as LedgerRequest::CreateProduct, Error = LedgerError);
client_method!(LedgerClient => fn update_product(id: String, patch: ProductPatch) -> Product as LedgerRequest::UpdateProduct, Error = LedgerError);
client_method!(LedgerClient => fn delete_product(id: String) -> () as LedgerRequest::DeleteProduct, Error = LedgerError);

// Orders
client_method!(LedgerClient => fn list_orders() -> Vec<Order> as LedgerRequest::ListOrders, Error = LedgerError);
client_method!(LedgerClient => fn list_orders_for_user(user_id: String) -> Vec<Order> as LedgerRequest::ListOrdersForUser, Error = LedgerError);
client_method!(LedgerClient => fn get_order(id: String) -> Option<Order> as LedgerRequest::GetOrder, Error = LedgerError);
client_method!(LedgerClient => fn quote_order(items: Vec<CandidateItem>) -> OrderQuote as LedgerRequest::QuoteOrder, Error = LedgerError);
client_method!(LedgerClient => fn commit_order(candidate: OrderCandidate) -> Order as LedgerRequest::CommitOrder, Error = LedgerError);
client_method!(LedgerClient => fn update_order_status(id: String, status: OrderStatus) -> Order as LedgerRequest::UpdateOrderStatus, Error = LedgerError);
client_method!(LedgerClient => fn update_payment_status(id: String, payment_status: PaymentStatus) -> Order as LedgerRequest::UpdatePaymentStatus, Error = LedgerError);
client_method!(LedgerClient => fn sales_summary() -> SalesSummary as LedgerRequest::SalesSummary, Error = LedgerError);
