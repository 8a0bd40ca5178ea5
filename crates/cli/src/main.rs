mod menu;
mod run;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use cuppa_core::{group_orders, Order, OrderParser};
use cuppa_storage::{resolve_price, InMemoryPriceStore, PriceMatch, PriceStore};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Coffee order parsing toolkit.
#[derive(Parser)]
#[command(name = "cuppa", version, about = "Coffee order parsing toolkit")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a free-text order and show its structured form
    Parse {
        /// Order text, e.g. "Large Cap 2 Sugars"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show the price lookup keys for an order, most specific first
    Keys {
        /// Order text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Decode a stored (canonical JSON) order
    Decode {
        /// Canonical payload, e.g. '{"size": "Large", "type": "Cappuccino"}'
        payload: String,
    },

    /// Look up the price of an order at a cafe
    Price {
        /// Path to the menu TOML file
        #[arg(long, env = "CUPPA_MENU")]
        menu: PathBuf,
        /// Cafe id from the menu file
        #[arg(long)]
        cafe: String,
        /// Order text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List cafes and their normalized price lists
    Prices {
        /// Path to the menu TOML file
        #[arg(long, env = "CUPPA_MENU")]
        menu: PathBuf,
        /// Only show this cafe
        #[arg(long)]
        cafe: Option<String>,
    },

    /// Group a coffee run file into identical orders
    Run {
        /// Path to the run file (one order per line, optionally "name: order")
        file: PathBuf,
        /// Path to the menu TOML file (needed with --cafe)
        #[arg(long, env = "CUPPA_MENU")]
        menu: Option<PathBuf>,
        /// Price the run at this cafe
        #[arg(long)]
        cafe: Option<String>,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let parser = match OrderParser::new() {
        Ok(p) => p,
        Err(e) => {
            let msg = format!("internal error: failed to build spec registry: {}", e);
            exit_with_error(&msg, cli.output, cli.quiet);
        }
    };

    match cli.command {
        Commands::Parse { text } => {
            cmd_parse(&parser, &text.join(" "), cli.output, cli.quiet);
        }
        Commands::Keys { text } => {
            cmd_keys(&parser, &text.join(" "), cli.output, cli.quiet);
        }
        Commands::Decode { payload } => {
            cmd_decode(&parser, &payload, cli.output, cli.quiet);
        }
        Commands::Price { menu, cafe, text } => {
            cmd_price(&parser, &menu, &cafe, &text.join(" "), cli.output, cli.quiet);
        }
        Commands::Prices { menu, cafe } => {
            cmd_prices(&parser, &menu, cafe.as_deref(), cli.output, cli.quiet);
        }
        Commands::Run { file, menu, cafe } => {
            let pricing = match (menu, cafe) {
                (Some(menu), Some(cafe)) => Some((menu, cafe)),
                (None, Some(_)) => {
                    exit_with_error(
                        "error: --cafe requires --menu (or CUPPA_MENU)",
                        cli.output,
                        cli.quiet,
                    );
                }
                _ => None,
            };
            cmd_run(&parser, &file, pricing, cli.output, cli.quiet);
        }
    }
}

/// Log to stderr, filtered by `CUPPA_LOG` (default: warn).
fn init_logging() {
    let filter = EnvFilter::try_from_env("CUPPA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn missing_message(parser: &OrderParser, text: &str, order: &Order) -> Option<String> {
    let missing = parser.validation_errors(order);
    if missing.is_empty() {
        return None;
    }
    let details: Vec<String> = missing
        .iter()
        .map(|spec| format!("{} ({})", spec.attribute, spec.question))
        .collect();
    Some(format!(
        "invalid order '{}': missing {}",
        text,
        details.join(", ")
    ))
}

/// Parse `text` and exit if the result is not a valid order.
fn parse_valid(parser: &OrderParser, text: &str, output: OutputFormat, quiet: bool) -> Order {
    let order = parser.parse(text);
    if let Some(msg) = missing_message(parser, text, &order) {
        exit_with_error(&msg, output, quiet);
    }
    order
}

fn encode(order: &Order, output: OutputFormat, quiet: bool) -> String {
    match order.encode() {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("internal error: failed to encode order: {}", e);
            exit_with_error(&msg, output, quiet);
        }
    }
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| format!("serialization error: {}", e))
    );
}

fn runtime(output: OutputFormat, quiet: bool) -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let msg = format!("internal error: failed to create tokio runtime: {}", e);
            exit_with_error(&msg, output, quiet);
        }
    }
}

fn cmd_parse(parser: &OrderParser, text: &str, output: OutputFormat, quiet: bool) {
    let order = parser.parse(text);
    let missing = parser.validation_errors(&order);
    let canonical = encode(&order, output, quiet);

    match output {
        OutputFormat::Json => {
            let missing_json: Vec<serde_json::Value> = missing
                .iter()
                .map(|spec| {
                    serde_json::json!({
                        "attribute": spec.attribute.name(),
                        "question": spec.question,
                    })
                })
                .collect();
            print_json(&serde_json::json!({
                "input": text,
                "valid": missing.is_empty(),
                "display": order.to_string(),
                "canonical": canonical,
                "attributes": &order,
                "missing": missing_json,
            }));
        }
        OutputFormat::Text => {
            if missing.is_empty() && !quiet {
                println!("{}", order);
                println!("canonical: {}", canonical);
            }
        }
    }

    if let Some(msg) = missing_message(parser, text, &order) {
        if output == OutputFormat::Text {
            report_error(&msg, output, quiet);
        }
        process::exit(1);
    }
}

fn cmd_keys(parser: &OrderParser, text: &str, output: OutputFormat, quiet: bool) {
    let order = parse_valid(parser, text, output, quiet);
    let keys = order.ordered_price_keys();
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&serde_json::json!(keys)),
        OutputFormat::Text => {
            for key in &keys {
                println!("{}", key);
            }
        }
    }
}

fn cmd_decode(parser: &OrderParser, payload: &str, output: OutputFormat, quiet: bool) {
    let order = match parser.decode(payload) {
        Ok(order) => order,
        Err(e) => {
            tracing::warn!(payload, error = %e, "failed to decode stored order");
            exit_with_error(&format!("error: {}", e), output, quiet);
        }
    };
    let canonical = encode(&order, output, quiet);
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "display": order.to_string(),
            "canonical": canonical,
            "attributes": &order,
        })),
        OutputFormat::Text => {
            println!("{}", order);
            println!("canonical: {}", canonical);
        }
    }
}

/// Read the menu file and load it into a store, exiting on failure.
async fn open_store(
    parser: &OrderParser,
    menu_path: &Path,
    output: OutputFormat,
    quiet: bool,
) -> InMemoryPriceStore {
    let menu = match menu::read_menu(menu_path) {
        Ok(m) => m,
        Err(e) => exit_with_error(&format!("error: {}", e), output, quiet),
    };
    match menu::load_store(&menu, parser).await {
        Ok(store) => store,
        Err(e) => exit_with_error(
            &format!("error in menu '{}': {}", menu_path.display(), e),
            output,
            quiet,
        ),
    }
}

fn describe_match(found: &PriceMatch) -> String {
    if found.fuzz == 0 {
        format!("{}", found.amount)
    } else {
        format!("{} (priced as {})", found.amount, found.price_key)
    }
}

fn cmd_price(
    parser: &OrderParser,
    menu_path: &Path,
    cafe_id: &str,
    text: &str,
    output: OutputFormat,
    quiet: bool,
) {
    let order = parse_valid(parser, text, output, quiet);
    let rt = runtime(output, quiet);
    let result = rt.block_on(async {
        let store = open_store(parser, menu_path, output, quiet).await;
        resolve_price(&store, cafe_id, &order).await
    });

    let found = match result {
        Ok(Some(found)) => found,
        Ok(None) => {
            let msg = format!("no price for '{}' at cafe '{}'", order, cafe_id);
            exit_with_error(&msg, output, quiet);
        }
        Err(e) => exit_with_error(&format!("error: {}", e), output, quiet),
    };

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "order": order.to_string(),
            "cafe": cafe_id,
            "price_key": found.price_key,
            "amount": found.amount,
            "fuzz": found.fuzz,
        })),
        OutputFormat::Text => println!("{}: {}", order, describe_match(&found)),
    }
}

fn cmd_prices(
    parser: &OrderParser,
    menu_path: &Path,
    cafe_id: Option<&str>,
    output: OutputFormat,
    quiet: bool,
) {
    let rt = runtime(output, quiet);
    let result = rt.block_on(async {
        let store = open_store(parser, menu_path, output, quiet).await;
        let cafes = match cafe_id {
            Some(id) => vec![store.get_cafe(id).await?],
            None => store.list_cafes().await?,
        };
        let mut listing = Vec::with_capacity(cafes.len());
        for cafe in cafes {
            let prices = store.list_prices(&cafe.id).await?;
            listing.push((cafe, prices));
        }
        Ok::<_, cuppa_storage::StorageError>(listing)
    });

    let listing = match result {
        Ok(l) => l,
        Err(e) => exit_with_error(&format!("error: {}", e), output, quiet),
    };

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let cafes: Vec<serde_json::Value> = listing
                .iter()
                .map(|(cafe, prices)| {
                    serde_json::json!({
                        "id": cafe.id,
                        "name": cafe.name,
                        "prices": prices,
                    })
                })
                .collect();
            print_json(&serde_json::json!(cafes));
        }
        OutputFormat::Text => {
            for (cafe, prices) in &listing {
                println!("{} ({})", cafe.id, cafe.name);
                if prices.is_empty() {
                    println!("  no prices");
                }
                for p in prices {
                    println!("  {}: {}", p.price_key, p.amount);
                }
            }
        }
    }
}

fn cmd_run(
    parser: &OrderParser,
    file: &Path,
    pricing: Option<(PathBuf, String)>,
    output: OutputFormat,
    quiet: bool,
) {
    let content = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", file.display(), e);
            exit_with_error(&msg, output, quiet);
        }
    };

    let mut orders = Vec::new();
    let mut names = Vec::new();
    let mut skipped = Vec::new();
    for entry in run::read_run(&content) {
        let order = parser.parse(&entry.text);
        if let Some(msg) = missing_message(parser, &entry.text, &order) {
            tracing::warn!(line = entry.line, text = %entry.text, "skipping invalid order");
            if output == OutputFormat::Text {
                report_error(&format!("line {}: {}", entry.line, msg), output, quiet);
            }
            skipped.push(entry);
            continue;
        }
        orders.push(order);
        names.push(entry.name);
    }

    let groups = group_orders(&orders);

    let prices: Vec<Option<PriceMatch>> = match &pricing {
        Some((menu_path, cafe_id)) => {
            let rt = runtime(output, quiet);
            let result = rt.block_on(async {
                let store = open_store(parser, menu_path, output, quiet).await;
                let mut found = Vec::with_capacity(groups.len());
                for group in &groups {
                    found.push(resolve_price(&store, cafe_id, &group.order).await?);
                }
                Ok::<_, cuppa_storage::StorageError>(found)
            });
            match result {
                Ok(found) => found,
                Err(e) => exit_with_error(&format!("error: {}", e), output, quiet),
            }
        }
        None => vec![None; groups.len()],
    };

    let total: Decimal = groups
        .iter()
        .zip(&prices)
        .filter_map(|(g, p)| p.as_ref().map(|p| p.amount * Decimal::from(g.count())))
        .sum();
    let unpriced = prices.iter().filter(|p| p.is_none()).count();

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let groups_json: Vec<serde_json::Value> = groups
                .iter()
                .zip(&prices)
                .map(|(g, p)| {
                    let members: Vec<&str> = g
                        .members
                        .iter()
                        .filter_map(|&i| names[i].as_deref())
                        .collect();
                    serde_json::json!({
                        "order": g.order.to_string(),
                        "count": g.count(),
                        "names": members,
                        "price": p,
                    })
                })
                .collect();
            let skipped_json: Vec<serde_json::Value> = skipped
                .iter()
                .map(|e| serde_json::json!({ "line": e.line, "text": e.text }))
                .collect();
            let mut doc = serde_json::json!({
                "groups": groups_json,
                "skipped": skipped_json,
            });
            if pricing.is_some() {
                doc["total"] = serde_json::json!(total);
                doc["unpriced"] = serde_json::json!(unpriced);
            }
            print_json(&doc);
        }
        OutputFormat::Text => {
            if groups.is_empty() {
                println!("no orders");
                return;
            }
            for (g, p) in groups.iter().zip(&prices) {
                let members: Vec<&str> = g
                    .members
                    .iter()
                    .filter_map(|&i| names[i].as_deref())
                    .collect();
                let mut line = format!("{} x {}", g.count(), g.order);
                if !members.is_empty() {
                    line.push_str(&format!(" ({})", members.join(", ")));
                }
                if pricing.is_some() {
                    match p {
                        Some(found) => line.push_str(&format!(" @ {}", describe_match(found))),
                        None => line.push_str(" @ no price"),
                    }
                }
                println!("{}", line);
            }
            if pricing.is_some() {
                println!("total: {}", total);
                if unpriced > 0 {
                    println!("unpriced groups: {}", unpriced);
                }
            }
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

fn exit_with_error(msg: &str, output: OutputFormat, quiet: bool) -> ! {
    report_error(msg, output, quiet);
    process::exit(1);
}
