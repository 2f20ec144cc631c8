//! End-to-end walkthrough against a running store (`STORE_URL`, default
//! `http://localhost:3001`): registers a client, runs one service through the
//! whole workflow, and prints the resulting statistics and tracking state.

use sg_taller_lib::commands::{clients, services, stats, tracking};
use sg_taller_lib::models::{BudgetItem, CreateClient, CreateService, ServiceCategory, ServiceStatus};
use sg_taller_lib::{setup_tracing, StoreClient, StoreError, WhatsAppClient};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), StoreError> {
    setup_tracing();

    let store = StoreClient::from_env();
    info!(base_url = %store.base_url(), "connecting to store");

    // Notifications are optional; without credentials the workflow runs the
    // same, just silently.
    let relay = WhatsAppClient::from_env().ok();
    if relay.is_none() {
        info!("whatsapp credentials not set, notifications disabled");
    }

    let client = clients::create_client(
        &store,
        CreateClient {
            full_name: "María González".to_string(),
            phone: "5491122334455".to_string(),
            email: "maria@example.com".to_string(),
            address: "Av. Siempre Viva 742".to_string(),
            service_ids: Vec::new(),
        },
    )
    .await?;
    info!(client_id = %client.id, name = %client.full_name, "client registered");

    let mut intake = CreateService::intake(&client.id, "Samsung A52", ServiceCategory::Phones);
    intake.details = "No enciende, posible falla de placa".to_string();
    intake.budget.add_item(BudgetItem::new("Cambio de placa", 45000.0));
    intake.budget.add_item(BudgetItem::new("Mano de obra", 15000.0));
    let service = services::create_service(&store, intake).await?;
    info!(service_id = %service.id, total = service.budget.total, "service opened");

    services::set_status(&store, relay.as_ref(), &service.id, ServiceStatus::InReview).await?;
    services::set_status(&store, relay.as_ref(), &service.id, ServiceStatus::RepairInProgress).await?;
    services::set_status(&store, relay.as_ref(), &service.id, ServiceStatus::ReadyForPickup).await?;
    let delivered = services::deliver_service(&store, &service.id).await?;
    info!(
        service_id = %delivered.id,
        exit_date = delivered.exit_date.as_deref().unwrap_or("-"),
        "service delivered"
    );

    let view = tracking::track_service(&store, &delivered.id).await?;
    info!(
        status = %view.service.status.label(),
        description = tracking::status_description(&view.service.status),
        stages = ?view.stages,
        "public tracking state"
    );

    let report = stats::get_statistics(&store, &stats::StatsFilter::ALL).await?;
    info!(
        revenue = report.total_revenue,
        delivered = report.delivered_count,
        active = report.active_count,
        avg_days = ?report.avg_service_days,
        "statistics"
    );

    Ok(())
}
