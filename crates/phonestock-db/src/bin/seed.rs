//! # Seed Data Generator
//!
//! Populates a SQLite document store with phone models and units for
//! development, then runs a few sample searches against it.
//!
//! ## Usage
//! ```bash
//! # Generate 500 units (default) into ./phonestock_dev.db
//! cargo run -p phonestock-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p phonestock-db --bin seed -- --count 5000
//!
//! # Specify database path and main warehouse
//! cargo run -p phonestock-db --bin seed -- --db ./data/store.db --warehouse HN-01
//! ```
//!
//! ## Generated Units
//! - Cycle through the catalog models below
//! - Every 5th unit goes to a second warehouse
//! - 1 in 10 is sold (written in the export shape), 1 in 10 removed
//! - IMEI: 15 digits, `35` followed by the unit index

use std::env;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use phonestock_core::document::{encode_model, encode_unit};
use phonestock_core::{Attribution, LifecycleState, PhoneModel, PhoneUnit, SearchPage};
use phonestock_db::{Database, DocumentStore, PhoneDetailSearchIndex, StoreSettings};

/// Catalog entries: (id, name, sku, keywords)
const MODELS: &[(&str, &str, &str, &[&str])] = &[
    ("ip15", "iPhone 15", "APL-IP15", &["apple", "ip15"]),
    ("ip15p", "iPhone 15 Pro", "APL-IP15P", &["apple", "ip15p"]),
    ("ip15pm", "iPhone 15 Pro Max", "APL-IP15PM", &["apple", "promax"]),
    ("ip14", "iPhone 14", "APL-IP14", &["apple", "ip14"]),
    ("s24", "Galaxy S24", "SAM-S24", &["samsung"]),
    ("s24u", "Galaxy S24 Ultra", "SAM-S24U", &["samsung", "ultra"]),
    ("a55", "Galaxy A55", "SAM-A55", &["samsung"]),
    ("px9", "Pixel 9", "GOO-PX9", &["google"]),
    ("px9p", "Pixel 9 Pro", "GOO-PX9P", &["google"]),
    ("rn13", "Redmi Note 13", "XIA-RN13", &["xiaomi", "redmi"]),
];

const COLORS: &[&str] = &["Black", "White", "Blue", "Natural Titanium", "Pink"];

const CONDITIONS: &[&str] = &["", "New, sealed", "Like new", "Scratched back", "Battery 87%"];

const EMPLOYEES: &[(&str, &str)] = &[("e1", "Lan"), ("e2", "Minh"), ("e3", "Tuan")];

const SECOND_WAREHOUSE: &str = "W2";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path: Option<String> = None;
    let mut warehouse = String::from("W1");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--warehouse" | "-w" => {
                if i + 1 < args.len() {
                    warehouse = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Phonestock Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>        Number of units to generate (default: 500)");
                println!("  -d, --db <PATH>        Database file path (default: ./phonestock_dev.db)");
                println!("  -w, --warehouse <ID>   Main warehouse id (default: W1)");
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut settings = StoreSettings::load(None)?;
    settings.database.path = db_path.unwrap_or_else(|| "./phonestock_dev.db".to_string()).into();

    println!("Phonestock Seed Data Generator");
    println!("==============================");
    println!("Database:  {}", settings.database.path.display());
    println!("Warehouse: {}", warehouse);
    println!("Units:     {}", count);
    println!();

    let db = Database::new(settings.db_config()).await?;
    let store = db.documents();
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let collections = &settings.collections;
    let existing = store.count(&collections.active, &[]).await?;
    if existing > 0 {
        println!("⚠ Store already has {} active units", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    for model in catalog() {
        store
            .put(&collections.catalog, &model.id, encode_model(&model))
            .await?;
    }
    println!("✓ Wrote {} catalog models", MODELS.len());

    println!();
    println!("Generating units...");
    let start = std::time::Instant::now();
    let mut written = [0usize; 3];
    let mut sample_imeis: Vec<(LifecycleState, String)> = Vec::new();

    for index in 0..count {
        let unit = generate_unit(index, &warehouse);
        let partition = unit.lifecycle_state;

        // Sold lines are keyed by the sale, not the unit
        let key = match partition {
            LifecycleState::Sold => Uuid::new_v4().to_string(),
            LifecycleState::Active | LifecycleState::Removed => unit.id.clone(),
        };

        if let Err(e) = store
            .put(
                collections.partition(partition),
                &key,
                encode_unit(&unit, partition),
            )
            .await
        {
            eprintln!("Failed to write unit {}: {}", unit.id, e);
            continue;
        }

        let slot = partition_slot(partition);
        written[slot] += 1;
        if unit.warehouse_id == warehouse
            && partition != LifecycleState::Removed
            && !sample_imeis.iter().any(|(p, _)| *p == partition)
        {
            sample_imeis.push((partition, unit.imei.clone()));
        }

        if (index + 1) % 500 == 0 {
            println!("  Generated {} units...", index + 1);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} active, {} sold, {} removed in {:?}",
        written[0], written[1], written[2], elapsed
    );

    // Sample searches
    println!();
    println!("Sample searches in {}:", warehouse);
    let index = PhoneDetailSearchIndex::from_settings(Arc::new(store), &settings);

    let page = index.first_page(&warehouse, None).await?;
    print_page("(no term)", &page);

    let page = index.search(&warehouse, Some("iphone pro"), 2, 10).await?;
    print_page("'iphone pro' page 2", &page);

    for (partition, imei) in &sample_imeis {
        let page = index.first_page(&warehouse, Some(imei)).await?;
        print_page(&format!("IMEI {} ({})", imei, partition), &page);
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,phonestock=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn catalog() -> Vec<PhoneModel> {
    MODELS
        .iter()
        .map(|(id, name, sku, keywords)| PhoneModel {
            id: id.to_string(),
            name: name.to_string(),
            sku: sku.to_string(),
            search_keywords: keywords.iter().map(|k| k.to_string()).collect(),
        })
        .collect()
}

/// Generates one unit deterministically from its index.
fn generate_unit(index: usize, warehouse: &str) -> PhoneUnit {
    let (model_id, ..) = MODELS[index % MODELS.len()];
    let (employee_id, employee_name) = EMPLOYEES[index % EMPLOYEES.len()];

    let lifecycle_state = match index % 10 {
        7 => LifecycleState::Sold,
        9 => LifecycleState::Removed,
        _ => LifecycleState::Active,
    };

    let warehouse_id = if index % 5 == 4 {
        SECOND_WAREHOUSE.to_string()
    } else {
        warehouse.to_string()
    };

    // Import price: 5,000,000 - 29,000,000 in 1,000,000 steps
    let import_price = 5_000_000 + ((index * 7) % 25) as i64 * 1_000_000;
    let sale_price = import_price + 1_500_000;

    PhoneUnit {
        id: Uuid::new_v4().to_string(),
        phone_model_id: model_id.to_string(),
        warehouse_id,
        color: COLORS[index % COLORS.len()].to_string(),
        imei: format!("35{:013}", index),
        import_price,
        sale_price,
        condition_notes: CONDITIONS[index % CONDITIONS.len()].to_string(),
        last_updated_by: Attribution {
            employee_id: employee_id.to_string(),
            employee_name: employee_name.to_string(),
        },
        import_id: Some(format!("import-{:04}", index / 50)),
        imported_at: Some(Utc::now() - Duration::days((index % 90) as i64)),
        lifecycle_state,
    }
}

fn partition_slot(partition: LifecycleState) -> usize {
    match partition {
        LifecycleState::Active => 0,
        LifecycleState::Sold => 1,
        LifecycleState::Removed => 2,
    }
}

fn print_page(label: &str, page: &SearchPage) {
    println!("  {}: {} of {}", label, page.items.len(), page.total_count);
    for item in page.items.iter().take(3) {
        println!(
            "    - {} {} {} [{}]",
            item.model_name,
            item.unit.color,
            item.unit.imei,
            item.lifecycle_state()
        );
    }
}
