use anyhow::Result;
use tracing::{error, info, Instrument};

use order_ledger::app_system::{setup_tracing, LedgerConfig, LedgerSystem};
use order_ledger::domain::{CandidateItem, OrderStatus, PaymentMethod};

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let config = LedgerConfig::from_env()?;
    info!(?config, "Starting order ledger");

    let system = LedgerSystem::start(config)?;

    let customer = system
        .customer_client
        .get_customer("u1".to_string())
        .await?
        .map(|user| user.identity());

    let span = tracing::info_span!("checkout");
    let checkout_result = async {
        info!("Checking out demo cart");
        system
            .checkout_client
            .checkout(
                customer,
                vec![CandidateItem::new("1", 2), CandidateItem::new("5", 1)],
                PaymentMethod::Stripe,
            )
            .await
    }
    .instrument(span)
    .await;

    match checkout_result {
        Ok(order) => {
            info!(
                order_id = %order.id(),
                order_number = %order.order_number(),
                total = order.total_amount(),
                "Order placed"
            );
            let shipped = system
                .ledger_client
                .update_order_status(order.id().to_string(), OrderStatus::Shipped)
                .await?;
            info!(status = %shipped.status(), "Order status updated");
        }
        Err(e) => error!(error = %e, "Checkout failed"),
    }

    let summary = system.ledger_client.sales_summary().await?;
    info!(
        products = summary.product_count,
        orders = summary.order_count,
        revenue = summary.paid_revenue,
        "Sales summary"
    );

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
