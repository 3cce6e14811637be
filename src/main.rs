//! Restro Dashboard command line entry point.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use restro_dashboard_lib::config::{
    ConfigOverrides, ENV_BASE_URL, ENV_LOG_DIR, ENV_PAGE_SIZE, ENV_TIMEOUT_SECS,
};
use restro_dashboard_lib::logging::{self, LogOptions};
use restro_dashboard_lib::models::{
    parse_wire, EntryType, OrderStatus, PartyType, PaymentStatus, Role, TableStatus,
};
use restro_dashboard_lib::pagination::Pager;
use restro_dashboard_lib::period::{parse_date, DateRange, ReportFilter, TimePeriod};
use restro_dashboard_lib::report::{expense_report, ledger_summary, sales_report};
use restro_dashboard_lib::resources::{
    auth, backup, daybook, expenses, menu, overview, parties, reports, sales, tables, users,
};
use restro_dashboard_lib::validation::{
    ExpenseForm, LoginForm, MenuCategoryForm, MenuItemForm, PartyForm, PartyTransactionForm,
    SalesUpdateForm, TableForm, UserForm,
};
use restro_dashboard_lib::{storage, views, ApiClient, AppConfig, HttpTransport, Query, Session};

#[derive(Parser, Debug)]
#[command(name = "restro-dashboard")]
#[command(version)]
#[command(about = "Restaurant admin dashboard for the POS REST API", long_about = None)]
struct Cli {
    /// Dashboard API base URL
    #[arg(long, global = true, env = ENV_BASE_URL)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = ENV_TIMEOUT_SECS)]
    timeout: Option<u64>,

    /// Rows per page in list views
    #[arg(long, global = true, env = ENV_PAGE_SIZE)]
    page_size: Option<usize>,

    /// Directory for daily rolling log files
    #[arg(long, global = true, env = ENV_LOG_DIR)]
    log_dir: Option<PathBuf>,

    /// Emit console logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the identity for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RESTRO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and forget the stored identity
    Logout,
    /// Show the stored identity
    Whoami,
    /// Sales list, report and edits
    #[command(subcommand)]
    Sales(SalesCommand),
    /// Expenses, categories and payment methods
    #[command(subcommand)]
    Expenses(ExpenseCommand),
    /// Server-side analytics for a date window
    Analytics(WindowArgs),
    /// Customers, suppliers and their ledgers
    #[command(subcommand)]
    Parties(PartyCommand),
    /// Dining tables
    #[command(subcommand)]
    Tables(TableCommand),
    /// Menu categories and items
    #[command(subcommand)]
    Menu(MenuCommand),
    /// Staff accounts
    #[command(subcommand)]
    Users(UserCommand),
    /// Daily cash book, today unless --date is given
    Daybook {
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Summary cards for today
    Overview,
    /// Ask the server to create a database backup
    Backup,
}

/// Report window: a canned period, or --from/--to for a custom range.
#[derive(Args, Debug, Clone)]
struct WindowArgs {
    /// today, 3days, 7days, 30days or 180days
    #[arg(long, default_value = "today")]
    period: TimePeriod,
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Subcommand, Debug)]
enum SalesCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Report(WindowArgs),
    /// Change the statuses of an existing sale
    Update {
        id: u64,
        #[arg(long, value_parser = parse_wire::<PaymentStatus>)]
        payment_status: Option<PaymentStatus>,
        #[arg(long, value_parser = parse_wire::<OrderStatus>)]
        order_status: Option<OrderStatus>,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete {
        id: u64,
    },
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Report(WindowArgs),
    Add {
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        category: u64,
        #[arg(long)]
        party: Option<u64>,
        #[arg(long)]
        payment_method: Option<u64>,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete {
        id: u64,
    },
    Categories,
    Methods,
}

#[derive(Subcommand, Debug)]
enum PartyCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long = "type", value_parser = parse_wire::<PartyType>, default_value = "customer")]
        party_type: PartyType,
        #[arg(long)]
        address: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        balance: f64,
    },
    /// Ledger of one party
    Transactions {
        id: u64,
    },
    AddTransaction {
        #[arg(long)]
        party: u64,
        #[arg(long = "type", value_parser = parse_wire::<EntryType>)]
        entry_type: EntryType,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        description: String,
        #[arg(long)]
        reference: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum TableCommand {
    List,
    Add {
        name: String,
    },
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_wire::<TableStatus>)]
        status: Option<TableStatus>,
    },
    Delete {
        id: u64,
    },
    /// Orders currently open on a table
    Orders {
        id: u64,
    },
}

#[derive(Subcommand, Debug)]
enum MenuCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        category: Option<u64>,
    },
    AddCategory {
        name: String,
    },
    AddItem {
        #[arg(long)]
        category: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        unavailable: bool,
    },
    UpdateItem {
        id: u64,
        #[arg(long)]
        category: Option<u64>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        available: Option<bool>,
    },
    DeleteItem {
        id: u64,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    List,
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "RESTRO_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, value_parser = parse_wire::<Role>, default_value = "waiter")]
        role: Role,
    },
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn notice<T>(query: &Query<T>) {
    if let Some(text) = query.notice.as_deref() {
        eprintln!("{text}");
    }
}

/// Print one page of `items` with the page footer. An out-of-range page
/// leaves the pager on page 1.
fn show_page<T>(items: &[T], pager: &mut Pager, page: usize, render: impl Fn(&[T]) -> String) {
    let view = views::page_view(items, pager, page, render);
    if view.out_of_range {
        eprintln!("Page {page} is out of range, showing page {}", pager.current());
    }
    println!("{}", view.body);
}

fn report_filter(window: &WindowArgs, page_size: usize) -> ReportFilter {
    ReportFilter::from_args(window.period, window.from, window.to, page_size)
}

fn window_or_notice(filter: &ReportFilter) -> Option<DateRange> {
    let range = filter.range(today());
    match range {
        Some(r) => println!("{r}"),
        None => eprintln!("Select both --from and --to (start on or before end)"),
    }
    range
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    if !value.is_null() {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn run_sales(client: &ApiClient, cmd: SalesCommand, page_size: usize) -> Result<()> {
    match cmd {
        SalesCommand::List { page } => {
            let query = Query::settle(sales::list_sales(client).await, "Error getting sales");
            notice(&query);
            show_page(&query.data, &mut Pager::new(page_size), page, views::sales_table);
        }
        SalesCommand::Report(window) => {
            let mut filter = report_filter(&window, page_size);
            let query = match window_or_notice(&filter) {
                Some(range) => Query::settle(
                    sales::sales_in_range(client, &range).await,
                    "Error getting sales report",
                ),
                None => Query::idle(),
            };
            notice(&query);
            println!("{}", views::sales_report_view(&sales_report(&query.data)));
            show_page(&query.data, filter.pager_mut(), window.page, views::sales_table);
        }
        SalesCommand::Update {
            id,
            payment_status,
            order_status,
            notes,
        } => {
            let sale = sales::get_sale(client, id)
                .await
                .with_context(|| format!("loading sale {id}"))?;
            let form = SalesUpdateForm {
                payment_status: payment_status.unwrap_or(sale.payment_status),
                order_status: order_status.unwrap_or(sale.order_status),
                payment_method_id: sale.payment_method_id.unwrap_or_default(),
                order_type: sale.order_type,
                table_id: sale.table_id.unwrap_or_default(),
                party_id: sale.party_id.unwrap_or_default(),
                sub_total: sale.sub_total,
                discount: sale.discount,
                tax: sale.tax,
                total: sale.total,
                notes: notes.or(sale.notes),
                sales_items: None,
            };
            sales::update_sale(client, id, &form)
                .await
                .with_context(|| format!("updating sale {id}"))?;
            println!("Sale {} updated", sale.invoice_number);
        }
        SalesCommand::Delete { id } => {
            sales::delete_sale(client, id)
                .await
                .with_context(|| format!("deleting sale {id}"))?;
            println!("Sale {id} deleted");
        }
    }
    Ok(())
}

async fn run_expenses(client: &ApiClient, cmd: ExpenseCommand, page_size: usize) -> Result<()> {
    match cmd {
        ExpenseCommand::List { page } => {
            let query =
                Query::settle(expenses::list_expenses(client).await, "Error getting expenses");
            notice(&query);
            show_page(&query.data, &mut Pager::new(page_size), page, views::expenses_table);
        }
        ExpenseCommand::Report(window) => {
            let mut filter = report_filter(&window, page_size);
            let query = match window_or_notice(&filter) {
                Some(range) => Query::settle(
                    expenses::expenses_in_range(client, &range).await,
                    "Error getting expense report",
                ),
                None => Query::idle(),
            };
            notice(&query);
            println!("{}", views::expense_report_view(&expense_report(&query.data)));
            show_page(&query.data, filter.pager_mut(), window.page, views::expenses_table);
        }
        ExpenseCommand::Add {
            description,
            amount,
            category,
            party,
            payment_method,
            notes,
        } => {
            let form = ExpenseForm {
                description,
                amount,
                category_id: category,
                party_id: party,
                payment_method_id: payment_method,
                notes,
            };
            expenses::create_expense(client, &form)
                .await
                .context("creating expense")?;
            println!("Expense recorded: {}", views::format_currency(amount));
        }
        ExpenseCommand::Delete { id } => {
            expenses::delete_expense(client, id)
                .await
                .with_context(|| format!("deleting expense {id}"))?;
            println!("Expense {id} deleted");
        }
        ExpenseCommand::Categories => {
            let query = Query::settle(
                expenses::expense_categories(client).await,
                "Error getting expense categories",
            );
            notice(&query);
            for c in &query.data {
                println!("{:>4}  {}", c.id, c.name);
            }
        }
        ExpenseCommand::Methods => {
            let query = Query::settle(
                sales::payment_methods(client).await,
                "Error getting payment methods",
            );
            notice(&query);
            for m in &query.data {
                println!("{:>4}  {}", m.id, m.name);
            }
        }
    }
    Ok(())
}

async fn run_parties(client: &ApiClient, cmd: PartyCommand) -> Result<()> {
    match cmd {
        PartyCommand::List => {
            let query = Query::settle(parties::list_parties(client).await, "Error getting parties");
            notice(&query);
            println!("{}", views::parties_table(&query.data));
        }
        PartyCommand::Add {
            name,
            party_type,
            address,
            phone,
            email,
            balance,
        } => {
            let form = PartyForm {
                name,
                party_type,
                address,
                phone,
                email,
                balance,
                is_active: true,
            };
            parties::create_party(client, &form)
                .await
                .context("creating party")?;
            println!("Party {} created", form.name);
        }
        PartyCommand::Transactions { id } => {
            let query = Query::settle(
                parties::party_transactions(client, id).await,
                "Error getting party transactions",
            );
            notice(&query);
            println!(
                "{}",
                views::ledger_view(&query.data, &ledger_summary(&query.data))
            );
        }
        PartyCommand::AddTransaction {
            party,
            entry_type,
            amount,
            description,
            reference,
        } => {
            let form = PartyTransactionForm {
                party_id: party,
                entry_type,
                amount,
                reference,
                description,
                created_by: client.session().user_id().and_then(|id| id.parse().ok()),
            };
            parties::add_party_transaction(client, &form)
                .await
                .context("adding party transaction")?;
            println!("Transaction added to party {party}");
        }
    }
    Ok(())
}

async fn run_tables(client: &ApiClient, cmd: TableCommand) -> Result<()> {
    match cmd {
        TableCommand::List => {
            let query = Query::settle(tables::list_tables(client).await, "Error getting tables");
            notice(&query);
            let counts = tables::status_counts(&query.data);
            println!("{}", views::tables_view(&query.data, &counts));
        }
        TableCommand::Add { name } => {
            let form = TableForm {
                name: Some(name),
                status: Some(TableStatus::Available),
            };
            tables::create_table(client, &form)
                .await
                .context("creating table")?;
            println!("Table created");
        }
        TableCommand::Update { id, name, status } => {
            tables::update_table(client, id, &TableForm { name, status })
                .await
                .with_context(|| format!("updating table {id}"))?;
            println!("Table {id} updated");
        }
        TableCommand::Delete { id } => {
            tables::delete_table(client, id)
                .await
                .with_context(|| format!("deleting table {id}"))?;
            println!("Table {id} deleted");
        }
        TableCommand::Orders { id } => {
            let query = Query::settle(
                tables::table_orders(client, id).await,
                "Failed to fetch table details",
            );
            notice(&query);
            println!("{}", views::orders_view(&query.data));
        }
    }
    Ok(())
}

async fn run_menu(client: &ApiClient, cmd: MenuCommand) -> Result<()> {
    match cmd {
        MenuCommand::List { search, category } => {
            let query = Query::settle(menu::menu(client).await, "Error getting menu");
            notice(&query);
            let all = menu::flatten(&query.data);
            let filter = menu::MenuFilter {
                search,
                category_id: category,
            };
            let shown = filter.apply(&all);
            println!("{}", views::menu_table(&shown, menu::available_count(&shown)));
        }
        MenuCommand::AddCategory { name } => {
            menu::create_category(client, &MenuCategoryForm { name })
                .await
                .context("creating menu category")?;
            println!("Category created");
        }
        MenuCommand::AddItem {
            category,
            name,
            rate,
            description,
            unavailable,
        } => {
            let form = MenuItemForm {
                category_id: category,
                item_name: name,
                description,
                rate,
                image: None,
                is_available: !unavailable,
            };
            menu::create_item(client, &form)
                .await
                .context("creating menu item")?;
            println!("Menu item {} created", form.item_name);
        }
        MenuCommand::UpdateItem {
            id,
            category,
            name,
            rate,
            description,
            available,
        } => {
            let categories = menu::menu(client).await.context("loading menu")?;
            let Some(item) = menu::flatten(&categories).into_iter().find(|i| i.id == id) else {
                bail!("menu item {id} not found");
            };
            let form = MenuItemForm {
                category_id: category.unwrap_or(item.category_id),
                item_name: name.unwrap_or_else(|| item.item_name.clone()),
                description: description.or_else(|| item.description.clone()),
                rate: rate.unwrap_or(item.rate),
                image: item.image.clone(),
                is_available: available.unwrap_or(item.is_available),
            };
            menu::update_item(client, id, &form)
                .await
                .with_context(|| format!("updating menu item {id}"))?;
            println!("Menu item {id} updated");
        }
        MenuCommand::DeleteItem { id } => {
            menu::delete_item(client, id)
                .await
                .with_context(|| format!("deleting menu item {id}"))?;
            println!("Menu item {id} deleted");
        }
    }
    Ok(())
}

async fn run_users(client: &ApiClient, cmd: UserCommand) -> Result<()> {
    match cmd {
        UserCommand::List => {
            let query = Query::settle(users::list_users(client).await, "Error getting users");
            notice(&query);
            println!("{}", views::users_table(&query.data));
        }
        UserCommand::Add {
            username,
            email,
            password,
            role,
        } => {
            let form = UserForm {
                username,
                email,
                password,
                role,
            };
            users::create_user(client, &form)
                .await
                .context("creating user")?;
            println!("User {} created", form.username);
        }
    }
    Ok(())
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let transport = Arc::new(HttpTransport::new(&config.base_url, config.timeout)?);
    let session = match &cli.command {
        Command::Login { .. } => Session::anonymous(),
        _ => storage::load_session(),
    };
    let mut client = ApiClient::new(transport, session, config.cache_ttl);
    debug!(target_url = %client.describe(), "client ready");

    match cli.command {
        Command::Login { email, password } => {
            let user_id = auth::login(&mut client, &LoginForm { email, password })
                .await
                .context("login failed")?;
            storage::save_identity(&user_id, &config.base_url)?;
            println!("Logged in as user {user_id}");
        }
        Command::Logout => {
            let result = auth::logout(&mut client).await;
            storage::clear_identity()?;
            println!("Logged out");
            if let Err(e) = result {
                eprintln!("Server logout failed: {e}");
            }
        }
        Command::Whoami => match client.session().user_id() {
            Some(id) => println!("Logged in as user {id} at {}", config.base_url),
            None => println!("Not logged in"),
        },
        command => {
            client
                .require_session()
                .context("run `restro-dashboard login` first")?;
            dispatch(&client, command, &config).await?;
        }
    }
    Ok(())
}

/// Commands that need a stored identity.
async fn dispatch(client: &ApiClient, command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Sales(cmd) => run_sales(client, cmd, config.page_size).await?,
        Command::Expenses(cmd) => run_expenses(client, cmd, config.page_size).await?,
        Command::Analytics(window) => {
            let filter = report_filter(&window, config.page_size);
            let query = match window_or_notice(&filter) {
                Some(range) => Query::settle(
                    reports::analytics(client, &range).await,
                    "Error getting analytics report",
                ),
                None => Query::idle(),
            };
            notice(&query);
            println!("{}", views::analytics_view(&query.data));
        }
        Command::Parties(cmd) => run_parties(client, cmd).await?,
        Command::Tables(cmd) => run_tables(client, cmd).await?,
        Command::Menu(cmd) => run_menu(client, cmd).await?,
        Command::Users(cmd) => run_users(client, cmd).await?,
        Command::Daybook { date } => {
            let query = Query::settle(
                daybook::daybook(client, date, today()).await,
                "Error getting daybook data",
            );
            notice(&query);
            println!("{}", views::daybook_view(&query.data));
        }
        Command::Overview => {
            let view = overview::overview(client, today()).await;
            for text in view.notices() {
                eprintln!("{text}");
            }
            println!("{}", views::overview_view(&view));
        }
        Command::Backup => {
            let body = backup::create_backup(client)
                .await
                .context("Failed to create backup")?;
            println!("Backup created successfully");
            print_json(&body)?;
        }
        Command::Login { .. } | Command::Logout | Command::Whoami => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        base_url: cli.base_url.clone(),
        timeout_secs: cli.timeout,
        page_size: cli.page_size,
        log_dir: cli.log_dir.clone(),
    };
    let config = AppConfig::from_env(overrides, storage::remembered_base_url())
        .context("loading configuration")?;

    let _guard = logging::init(&LogOptions {
        log_dir: config.log_dir.clone(),
        json: cli.log_json,
    })?;
    info!(base_url = %config.base_url, "restro-dashboard starting");

    run(cli, config).await
}
