use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;

use mfgops_console::{
    clients::{ApiClient, CatalogClient, DocumentApi, OrderClient, ProductionClient, ReportClient},
    config,
    dto::report_wire::StockFilter,
    models::document::DocumentStatus,
    reports,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize()?;

    match cli.command {
        Commands::Catalog(command) => handle_catalog_command(&context, command, cli.json).await?,
        Commands::Orders(command) => handle_orders_command(&context, command, cli.json).await?,
        Commands::Production(command) => {
            handle_production_command(&context, command, cli.json).await?
        }
        Commands::Stock(args) => handle_stock_command(&context, args, cli.json).await?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "mfgops",
    about = "Manufacturing-operations console CLI for catalogs, orders, production and reports",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Catalog(CatalogCommands),
    #[command(subcommand)]
    Orders(OrdersCommands),
    #[command(subcommand)]
    Production(ProductionCommands),
    Stock(StockArgs),
}

#[derive(Subcommand)]
enum CatalogCommands {
    Vendors,
    Products,
    Components,
}

#[derive(Subcommand)]
enum OrdersCommands {
    List,
    Show(ShowArgs),
    Status(StatusArgs),
    Delete(ShowArgs),
}

#[derive(Subcommand)]
enum ProductionCommands {
    List,
    Show(ShowArgs),
    Status(StatusArgs),
}

#[derive(Args)]
struct ShowArgs {
    #[arg(long, help = "Server id of the document")]
    id: i64,
}

#[derive(Args)]
struct StatusArgs {
    #[arg(long, help = "Server id of the document")]
    id: i64,
    #[arg(long, help = "New status, e.g. Pending, Processing, Finished")]
    status: String,
}

#[derive(Args)]
struct StockArgs {
    #[arg(long, help = "Window start (YYYY-MM-DD)")]
    from: Option<String>,
    #[arg(long, help = "Window end (YYYY-MM-DD)")]
    to: Option<String>,
    #[arg(long, help = "Restrict to one component id")]
    component: Option<i64>,
}

struct CliContext {
    catalog: CatalogClient,
    orders: Arc<OrderClient>,
    production: Arc<ProductionClient>,
    reports: ReportClient,
}

impl CliContext {
    fn initialize() -> Result<Self> {
        let cfg = config::load_config().context("failed to load configuration")?;
        config::init_tracing(cfg.log_level(), cfg.log_json);

        let api = ApiClient::from_config(&cfg).context("failed to build API client")?;
        Ok(Self {
            catalog: CatalogClient::new(api.clone()),
            orders: Arc::new(OrderClient::new(api.clone())),
            production: Arc::new(ProductionClient::new(api.clone())),
            reports: ReportClient::new(api),
        })
    }
}

async fn handle_catalog_command(
    context: &CliContext,
    command: CatalogCommands,
    json: bool,
) -> Result<()> {
    match command {
        CatalogCommands::Vendors => {
            let vendors = context.catalog.active_vendors().await?;
            if json {
                print_json(&vendors)?;
            } else {
                for vendor in &vendors {
                    println!("{:>6}  {}", vendor.id, vendor.name);
                }
                println!("{} vendor(s)", vendors.len());
            }
        }
        CatalogCommands::Products => {
            let products = context.catalog.active_products().await?;
            if json {
                print_json(&products)?;
            } else {
                for product in &products {
                    println!("{:>6}  {:<32} {}", product.id, product.name, product.rate);
                }
                println!("{} product(s)", products.len());
            }
        }
        CatalogCommands::Components => {
            let components = context.catalog.active_components().await?;
            if json {
                print_json(&components)?;
            } else {
                for component in &components {
                    println!(
                        "{:>6}  {:<32} {:<8} {}",
                        component.id,
                        component.name,
                        component.unit.as_deref().unwrap_or("-"),
                        component.rate
                    );
                }
                println!("{} component(s)", components.len());
            }
        }
    }
    Ok(())
}

async fn handle_orders_command(
    context: &CliContext,
    command: OrdersCommands,
    json: bool,
) -> Result<()> {
    match command {
        OrdersCommands::List => {
            let orders = context.orders.list().await?;
            if json {
                return print_json(&orders);
            }
            for order in &orders {
                println!(
                    "{:>6}  {}  {}  {}",
                    order.id,
                    order
                        .order_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".into()),
                    order.order_status.as_deref().unwrap_or("-"),
                    order.order_note.as_deref().unwrap_or("")
                );
            }
        }
        OrdersCommands::Show(args) => {
            let doc = context.orders.fetch(args.id).await?;
            print_json(&doc)?;
        }
        OrdersCommands::Status(args) => {
            let status = parse_status(&args.status)?;
            let message = context.orders.update_status(args.id, status).await?;
            println!(
                "{}",
                message.unwrap_or_else(|| format!("Order {} set to {}", args.id, status))
            );
        }
        OrdersCommands::Delete(args) => {
            let message = context.orders.delete(args.id).await?;
            println!(
                "{}",
                message.unwrap_or_else(|| format!("Order {} deleted", args.id))
            );
        }
    }
    Ok(())
}

async fn handle_production_command(
    context: &CliContext,
    command: ProductionCommands,
    json: bool,
) -> Result<()> {
    match command {
        ProductionCommands::List => {
            let runs = context.production.list().await?;
            if json {
                return print_json(&runs);
            }
            for run in &runs {
                println!(
                    "{:>6}  {}  {}  qty {}  amount {}",
                    run.id,
                    run.production_p_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".into()),
                    run.production_p_status.as_deref().unwrap_or("-"),
                    run.quantity,
                    run.amount
                );
            }
        }
        ProductionCommands::Show(args) => {
            let doc = context.production.fetch(args.id).await?;
            print_json(&doc)?;
        }
        ProductionCommands::Status(args) => {
            let status = parse_status(&args.status)?;
            let message = context.production.update_status(args.id, status).await?;
            println!(
                "{}",
                message.unwrap_or_else(|| format!("Production {} set to {}", args.id, status))
            );
        }
    }
    Ok(())
}

async fn handle_stock_command(context: &CliContext, args: StockArgs, json: bool) -> Result<()> {
    let filter = StockFilter {
        from_date: parse_date(args.from.as_deref())?,
        to_date: parse_date(args.to.as_deref())?,
        component_id: args.component,
    };
    let rows = context.reports.component_stock(&filter).await?;
    let summaries = reports::summarize_stock(&rows);

    if json {
        #[derive(Serialize)]
        struct Line<'a> {
            component: &'a str,
            opening: String,
            closing: String,
            negative: bool,
        }
        let lines: Vec<Line<'_>> = summaries
            .iter()
            .map(|s| Line {
                component: &s.component_name,
                opening: s.opening.to_string(),
                closing: s.closing.to_string(),
                negative: s.is_negative(),
            })
            .collect();
        print_json(&lines)?;
    } else {
        for summary in &summaries {
            println!(
                "{:<32} opening {:>12}  closing {:>12}{}",
                summary.component_name,
                summary.opening,
                summary.closing,
                if summary.is_negative() { "  (negative)" } else { "" }
            );
        }
        println!("{} component(s)", summaries.len());
    }
    Ok(())
}

fn parse_status(raw: &str) -> Result<DocumentStatus> {
    DocumentStatus::from_str(raw)
        .map_err(|_| anyhow::anyhow!("unknown status '{}'", raw))
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
    })
    .transpose()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
