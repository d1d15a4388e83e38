use tokio::sync::oneshot;

use super::error::LedgerError;
use crate::domain::{
    CandidateItem, Order, OrderCandidate, OrderQuote, OrderStatus, PaymentStatus, Product,
    ProductCreate, ProductPatch, SalesSummary,
};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;
pub type LedgerResponse<T> = ServiceResponse<T, LedgerError>;

/// Requests understood by the ledger actor. Each variant carries its
/// parameters and a oneshot channel for the reply.
#[derive(Debug)]
pub enum LedgerRequest {
    ListProducts {
        respond_to: LedgerResponse<Vec<Product>>,
    },
    GetProduct {
        id: String,
        respond_to: LedgerResponse<Option<Product>>,
    },
    CreateProduct {
        params: ProductCreate,
        respond_to: LedgerResponse<Product>,
    },
    UpdateProduct {
        id: String,
        patch: ProductPatch,
        respond_to: LedgerResponse<Product>,
    },
    DeleteProduct {
        id: String,
        respond_to: LedgerResponse<()>,
    },
    ListOrders {
        respond_to: LedgerResponse<Vec<Order>>,
    },
    ListOrdersForUser {
        user_id: String,
        respond_to: LedgerResponse<Vec<Order>>,
    },
    GetOrder {
        id: String,
        respond_to: LedgerResponse<Option<Order>>,
    },
    QuoteOrder {
        items: Vec<CandidateItem>,
        respond_to: LedgerResponse<OrderQuote>,
    },
    CommitOrder {
        candidate: OrderCandidate,
        respond_to: LedgerResponse<Order>,
    },
    UpdateOrderStatus {
        id: String,
        status: OrderStatus,
        respond_to: LedgerResponse<Order>,
    },
    UpdatePaymentStatus {
        id: String,
        payment_status: PaymentStatus,
        respond_to: LedgerResponse<Order>,
    },
    SalesSummary {
        respond_to: LedgerResponse<SalesSummary>,
    },
    Shutdown,
}
