//! Command-line front end for the order lifecycle and production reports.
//!
//! Usage:
//!
//! ```text
//! pedidos [--config pedidos.toml] <command>
//! ```
//!
//! Commands operate on the `PostgreSQL` database named by `database.url` (or
//! `PEDIDOS_DATABASE_URL`). Run `pedidos init-db` once before anything else.
//! Log verbosity follows `RUST_LOG`, defaulting to `pedidos=info,warn`.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use mockable::DefaultClock;
use pedidos::{
    config::{PedidosConfig, load_config, load_config_from_path},
    order::{
        adapters::postgres::{PostgresOrderRepository, build_pool, run_migrations},
        domain::{Order, OrderFilter, OrderId, OrderStatus, ParseOrderStatusError},
        ports::OrderRepositoryError,
        services::{CreateOrderRequest, OrderLifecycleService, TransitionOrderRequest},
    },
    production::{DashboardService, DashboardSnapshot, RankedOrder, ReportService},
};
use std::{
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
};
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

type Lifecycle = OrderLifecycleService<PostgresOrderRepository, DefaultClock>;

const DEFAULT_LOG_FILTER: &str = "pedidos=info,warn";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file; defaults to `./pedidos.toml` when present.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending database migrations.
    InitDb,
    /// Register a new order.
    Create(CreateArgs),
    /// Set an order's status and urgent flag.
    Transition(TransitionArgs),
    /// List orders in queue order.
    List(ListArgs),
    /// Show the status history of an order.
    History {
        /// Order identifier.
        id: OrderId,
    },
    /// Delete an order and its history.
    Delete {
        /// Order identifier.
        id: OrderId,
    },
    /// Print the production board and metrics.
    Dashboard {
        /// Emit the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the activity report for a date range.
    Report {
        /// First day, `YYYY-MM-DD`.
        #[arg(long)]
        start: NaiveDate,
        /// Last day, `YYYY-MM-DD`; defaults to `start`.
        #[arg(long)]
        end: Option<NaiveDate>,
    },
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// Project or voucher reference.
    #[arg(long)]
    reference: String,
    /// Equipment description.
    #[arg(long)]
    equipment: String,
    /// Number of machines.
    #[arg(long)]
    quantity: i64,
    /// External order code.
    #[arg(long)]
    code: Option<String>,
    /// Service notes.
    #[arg(long)]
    description: Option<String>,
    /// Operating system image label.
    #[arg(long)]
    image: Option<String>,
    /// Initial status; defaults to pending.
    #[arg(long, value_parser = parse_status)]
    status: Option<OrderStatus>,
    /// Flag the order urgent.
    #[arg(long)]
    urgent: bool,
    /// Operator registering the order.
    #[arg(long)]
    actor: Option<String>,
}

#[derive(Args, Debug)]
struct TransitionArgs {
    /// Order identifier.
    id: OrderId,
    /// Target status.
    #[arg(long, value_parser = parse_status)]
    status: OrderStatus,
    /// Flag the order urgent; omitting it clears the flag.
    #[arg(long)]
    urgent: bool,
    /// Operator performing the change.
    #[arg(long, default_value = "")]
    actor: String,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Restrict to these statuses.
    #[arg(long = "status", value_parser = parse_status)]
    statuses: Vec<OrderStatus>,
    /// Case-insensitive reference substring.
    #[arg(long)]
    reference: Option<String>,
    /// Include completed and cancelled orders.
    #[arg(long)]
    all: bool,
}

fn parse_status(value: &str) -> Result<OrderStatus, ParseOrderStatusError> {
    OrderStatus::try_from(value)
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => load_config_from_path(path)?,
        None => load_config()?,
    };
    run(cli.command, &config).await
}

async fn run(command: Command, config: &PedidosConfig) -> Result<(), BoxError> {
    let pool = build_pool(config.database.require_url()?, config.database.pool_size)?;
    if matches!(command, Command::InitDb) {
        let mut connection = pool.get().map_err(OrderRepositoryError::persistence)?;
        let applied = run_migrations(&mut connection)?;
        writeln!(io::stdout().lock(), "{applied} migration(s) applied")?;
        return Ok(());
    }

    let repository = Arc::new(PostgresOrderRepository::new(pool));
    let clock = Arc::new(DefaultClock);
    let lifecycle: Lifecycle =
        OrderLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock));
    let mut out = io::stdout().lock();

    match command {
        Command::InitDb => {}
        Command::Create(args) => {
            let order = lifecycle.create_order(create_request(args)).await?;
            writeln!(out, "created {}", order.id())?;
            write_order_line(&mut out, None, &order)?;
        }
        Command::Transition(args) => {
            let request =
                TransitionOrderRequest::new(args.id, args.status, args.urgent, args.actor);
            let order = lifecycle.apply_transition(request).await?;
            write_order_line(&mut out, None, &order)?;
        }
        Command::List(args) => {
            let mut filter = if args.all {
                OrderFilter::all()
            } else {
                OrderFilter::open()
            };
            if !args.statuses.is_empty() {
                filter = filter.with_statuses(args.statuses);
            }
            if let Some(needle) = args.reference {
                filter = filter.with_reference_containing(needle);
            }
            for order in &lifecycle.list_orders(&filter).await? {
                write_order_line(&mut out, None, order)?;
            }
        }
        Command::History { id } => {
            for entry in lifecycle.history(id).await? {
                writeln!(
                    out,
                    "{}  {} -> {}  by {}",
                    entry.changed_at().format("%Y-%m-%d %H:%M"),
                    entry.previous_label(),
                    entry.new_status().label(),
                    entry.changed_by(),
                )?;
            }
        }
        Command::Delete { id } => {
            lifecycle.delete_order(id).await?;
            writeln!(out, "deleted {id}")?;
        }
        Command::Dashboard { json } => {
            let dashboard = DashboardService::new(repository, clock, config.dashboard_settings()?);
            let snapshot = dashboard.snapshot().await?;
            if json {
                serde_json::to_writer_pretty(&mut out, &snapshot)?;
                writeln!(out)?;
            } else {
                write_dashboard(&mut out, &snapshot)?;
            }
        }
        Command::Report { start, end } => {
            let service =
                ReportService::new(repository, config.timezone()?, config.report_settings());
            let text = service.activity_report(start, end.unwrap_or(start)).await?;
            writeln!(out, "{text}")?;
        }
    }
    Ok(())
}

fn create_request(args: CreateArgs) -> CreateOrderRequest {
    let mut request = CreateOrderRequest::new(args.reference, args.equipment, args.quantity)
        .with_urgent(args.urgent);
    if let Some(code) = args.code {
        request = request.with_code(code);
    }
    if let Some(description) = args.description {
        request = request.with_service_description(description);
    }
    if let Some(image) = args.image {
        request = request.with_system_image(image);
    }
    if let Some(status) = args.status {
        request = request.with_status(status);
    }
    if let Some(actor) = args.actor {
        request = request.with_created_by(actor);
    }
    request
}

fn write_order_line(out: &mut impl Write, rank: Option<usize>, order: &Order) -> io::Result<()> {
    let position = rank.map_or_else(|| "  ".to_owned(), |value| format!("{value:>2}"));
    let urgent = if order.is_urgent() { "!" } else { " " };
    writeln!(
        out,
        "{position} {urgent} {}  {:<14} {:<24} x{:<4} {}",
        order.id(),
        order.status().label(),
        order.reference(),
        order.quantity().value(),
        order.equipment(),
    )
}

fn write_ranked(
    out: &mut impl Write,
    title: &str,
    entries: &[RankedOrder],
    overflow: usize,
) -> io::Result<()> {
    writeln!(out, "{title}:")?;
    for entry in entries {
        write_order_line(out, Some(entry.display_rank), &entry.order)?;
    }
    if overflow > 0 {
        writeln!(out, "   ... +{overflow}")?;
    }
    Ok(())
}

fn write_dashboard(out: &mut impl Write, snapshot: &DashboardSnapshot) -> io::Result<()> {
    let board = &snapshot.board;
    writeln!(out, "Painel de produção - {}", board.today.format("%d/%m/%Y"))?;
    writeln!(out)?;
    write_ranked(out, "Prioridades", &board.work_set, 0)?;
    for (title, preview) in [
        ("Em montagem", &board.in_assembly),
        ("Backlog", &board.backlog),
        ("Aguardando chegada", &board.awaiting_arrival),
        ("Pendentes", &board.pending),
    ] {
        write_ranked(out, title, &preview.items, preview.overflow)?;
    }
    writeln!(out)?;

    let completed = board.completed_today.totals.overall();
    let cancelled = board.cancelled_today.totals.overall();
    writeln!(out, "Concluídos hoje: {} ({} unidades)", completed.count, completed.quantity)?;
    writeln!(out, "Cancelados hoje: {} ({} unidades)", cancelled.count, cancelled.quantity)?;

    let metrics = &snapshot.metrics;
    writeln!(
        out,
        "Mês: {} pedidos, {} unidades, média {:.1}/dia útil (mês anterior {:.1})",
        metrics.completed_count,
        metrics.completed_quantity,
        metrics.daily_average,
        metrics.previous_month.daily_average,
    )?;
    match metrics.record {
        Some(record) => writeln!(
            out,
            "Recorde: {} com {} pedidos ({} unidades)",
            record.date.format("%d/%m"),
            record.count,
            record.quantity,
        )?,
        None => writeln!(out, "Recorde: -")?,
    }
    for week in &snapshot.weekly {
        let marker = if week.is_current { "*" } else { " " };
        writeln!(
            out,
            "{marker} {} a {}: {}/{}",
            week.week_start.format("%d/%m"),
            week.week_end().format("%d/%m"),
            week.quantity,
            week.goal,
        )?;
    }
    Ok(())
}
