use crate::config::AppConfig;
use crate::services::{SnapshotSchedule, SnapshotStore};
use chrono::Utc;

const RECENT_DATES: usize = 10;

pub async fn run() {
    println!("📊 Snapshot Store Status\n");

    let config = AppConfig::from_env();
    if let Err(e) = show_status(&config).await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn show_status(config: &AppConfig) -> crate::error::Result<()> {
    let store = SnapshotStore::connect(&config.database_url).await?;
    let schedule = SnapshotSchedule::default();
    let now = Utc::now();

    let count = store.record_count().await?;
    let latest = store.latest_snapshot_date().await?;
    let dates = store.snapshot_dates().await?;

    println!("🗄️  Database:       {}", config.database_url);
    println!("📈 Total records:  {}", count);
    println!("📅 Snapshot days:  {}", dates.len());
    match latest {
        Some(date) => println!("🔹 Latest:         {}", date),
        None => println!("⚠️  No snapshots stored yet. Run 'stockmovers snapshot --force'."),
    }

    println!(
        "🕒 Eastern time:   {}",
        schedule.local_now(now).format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "⏰ Snapshot due:   {}",
        if schedule.should_fetch(now, latest) { "yes" } else { "no" }
    );

    if !dates.is_empty() {
        println!("\n═══════════════════════════════════════════════════════════\n");
        println!("Recent snapshot days:");
        for date in dates.iter().take(RECENT_DATES) {
            println!("   {}", date);
        }
        if dates.len() > RECENT_DATES {
            println!("   ... and {} more", dates.len() - RECENT_DATES);
        }
    }

    println!("\n💡 Tip: file cache lives in {}", config.cache_dir.display());

    store.close().await;
    Ok(())
}
