use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, Instrument};

use order_desk::app_system::{setup_tracing, OrderDesk};
use order_desk::clients::ItemRow;
use order_desk::config::AppConfig;
use order_desk::domain::{OrderItem, OrderItemStatus, MAX_PAGE_SIZE};
use order_desk::workflow::{ActionInput, ItemAction};

/// Supplier order desk: list order items and move them through the workflow.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "ORDER_DESK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List order items with the actions each one offers
    List {
        /// Status filter; repeat for several (defaults come from config)
        #[arg(short, long = "status", value_name = "STATUS", value_parser = parse_status)]
        statuses: Vec<OrderItemStatus>,
        /// Search by part number or title
        #[arg(long)]
        search: Option<String>,
        /// Restrict to one organization
        #[arg(long)]
        org: Option<String>,
        /// Page size
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_PAGE_SIZE as i64))]
        limit: Option<u32>,
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show one order item in full
    Show { id: String },
    /// Accept a pending item
    Accept { id: String },
    /// Reject a pending item
    Reject {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Mark a confirmed item as shipped
    Ship {
        id: String,
        #[arg(long)]
        carrier: String,
        #[arg(long)]
        tracking: String,
        #[arg(long)]
        url: Option<String>,
    },
    /// Mark a shipped item as delivered
    Deliver { id: String },
}

fn parse_status(raw: &str) -> Result<OrderItemStatus, String> {
    match OrderItemStatus::from(raw) {
        OrderItemStatus::Unknown(other) => Err(format!(
            "unknown status {:?} (expected one of: {})",
            other,
            OrderItemStatus::KNOWN
                .iter()
                .map(OrderItemStatus::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )),
        known => Ok(known),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    setup_tracing(&args.log_level);

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };
    config.apply_env_overrides()?;
    info!(base_url = %config.api.base_url, "Configuration loaded");

    let desk = OrderDesk::from_config(&config)?;
    let span = tracing::info_span!("command");
    let result = run(&desk, &config, args.command).instrument(span).await;

    desk.shutdown().await?;
    result
}

async fn run(desk: &OrderDesk, config: &AppConfig, command: Command) -> anyhow::Result<()> {
    let orders = &desk.orders;

    let (id, input) = match command {
        Command::List { statuses, search, org, limit, pages } => {
            let mut query = config.list_query();
            if !statuses.is_empty() {
                query.statuses = statuses;
            }
            query.search = search.or(query.search);
            query.org_id = org.or(query.org_id);
            query.limit = limit.unwrap_or(query.limit);

            orders.load(query).await?;
            for _ in 1..pages {
                if !orders.load_more().await? {
                    break;
                }
            }

            let view = orders.snapshot().await?;
            print_rows(&orders.rows().await?);
            if let Some(cursor) = view.next_cursor {
                println!("\nmore results available (next cursor {})", cursor);
            }
            return Ok(());
        }
        Command::Show { id } => {
            let item = orders.open_detail(&id).await?;
            println!("{}", serde_json::to_string_pretty(&item)?);
            println!("actions: {}", action_list(item.permitted_actions()));
            return Ok(());
        }
        Command::Accept { id } => (id, ActionInput::Accept),
        Command::Reject { id, reason } => (id, ActionInput::Reject { reason }),
        Command::Ship { id, carrier, tracking, url } => (
            id,
            ActionInput::Ship {
                carrier_code: carrier,
                tracking_number: tracking,
                tracking_url: url,
            },
        ),
        Command::Deliver { id } => (id, ActionInput::Deliver),
    };

    // Only offer what the current status allows, as the list view does.
    let current = orders.open_detail(&id).await?;
    let action = input.action();
    if !current.offers(action) {
        bail!(
            "{} is not available for item {} in status {} (allowed: {})",
            action,
            current.reference_label(),
            current.status,
            action_list(current.permitted_actions())
        );
    }

    let updated = orders.dispatch(&id, input).await?;
    print_rows(&[ItemRow {
        actions: updated.permitted_actions(),
        item: updated,
    }]);
    Ok(())
}

fn action_list(actions: &[ItemAction]) -> String {
    if actions.is_empty() {
        return "-".to_string();
    }
    actions
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn print_rows(rows: &[ItemRow]) {
    if rows.is_empty() {
        println!("no order items");
        return;
    }
    println!(
        "{:<10} {:<11} {:<36} {:>4}  {:<24} ACTIONS",
        "REF", "STATUS", "PRODUCT", "QTY", "BUYER"
    );
    for row in rows {
        let item: &OrderItem = &row.item;
        println!(
            "{:<10} {:<11} {:<36} {:>4}  {:<24} {}",
            item.reference_label(),
            item.status,
            truncate(&item.product_title, 36),
            item.quantity,
            truncate(item.buyer_label(), 24),
            action_list(row.actions)
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
