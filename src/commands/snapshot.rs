use crate::commands::snapshot_service;
use crate::config::AppConfig;
use crate::services::RefreshOutcome;
use chrono::Utc;

/// Take today's snapshot from the command line; `force` skips the daily gate
pub async fn run(force: bool) {
    let config = AppConfig::from_env();
    let service = match snapshot_service(&config).await {
        Ok(service) => service,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let now = Utc::now();
    println!(
        "🕒 Eastern time: {}",
        service.schedule().local_now(now).format("%Y-%m-%d %H:%M:%S")
    );

    let outcome = if force {
        println!("📥 Forcing snapshot fetch...");
        service.force_refresh(now).await
    } else {
        service.refresh_if_due(now).await
    };

    service.store().close().await;

    match outcome {
        RefreshOutcome::Stored(rows) => println!("✅ Stored {} records", rows),
        RefreshOutcome::NotDue => println!("⏭️  Snapshot not due (before 15:00 Eastern or already stored today)"),
        RefreshOutcome::AlreadyStored => println!("⏭️  This snapshot is already stored"),
        RefreshOutcome::Failed(reason) => {
            eprintln!("❌ Snapshot failed: {}", reason);
            std::process::exit(1);
        }
    }
}
