use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use revrec::config::{config_dir, config_file, init_config, load_config};
use revrec::{load_invoices, Config, RecognitionSummary, Recognizer, Result};

#[derive(Parser)]
#[command(name = "revrec")]
#[command(version, about = "Accrual revenue recognition for invoice ledgers", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.revrec)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Show recognized vs. deferred revenue per month
    Recognize {
        /// JSON file containing an array of invoices
        #[arg(short, long)]
        invoices: PathBuf,

        /// First day of the reporting window (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Last day of the reporting window (YYYY-MM-DD, default: today)
        #[arg(long)]
        to: Option<String>,

        /// Also print the per-day breakdown
        #[arg(long)]
        daily: bool,

        /// Print the full summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the deferred revenue balance at a point in time
    Deferred {
        /// JSON file containing an array of invoices
        #[arg(short, long)]
        invoices: PathBuf,

        /// Balance date (YYYY-MM-DD or timestamp, default: today)
        #[arg(long)]
        as_of: Option<String>,

        /// Print the balance as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show config location and the active recognition policy
    Status,
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr, filtered by RUST_LOG (default: warn).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Recognize {
            invoices,
            from,
            to,
            daily,
            json,
        } => cmd_recognize(&cfg_dir, &invoices, from, to, daily, json),
        Commands::Deferred {
            invoices,
            as_of,
            json,
        } => cmd_deferred(&cfg_dir, &invoices, as_of, json),
        Commands::Status => cmd_status(&cfg_dir),
    }
}

/// Initialize config directory with template file
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    let path = init_config(cfg_dir)?;

    println!("Initialized revrec config at: {}", cfg_dir.display());
    println!();
    println!("Adjust the recognition policy:  $EDITOR {}", path.display());
    println!();
    println!("Then run a report:");
    println!("  revrec recognize --invoices <invoices.json> --from <YYYY-MM-DD>");

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "MONTH")]
    month: String,
    #[tabled(rename = "RECOGNIZED")]
    recognized: String,
    #[tabled(rename = "DEFERRED")]
    deferred: String,
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "RECOGNIZED")]
    recognized: String,
    #[tabled(rename = "DEFERRED")]
    deferred: String,
    #[tabled(rename = "INVOICES")]
    invoices: String,
}

/// Format minor units as money with thousands separators, e.g. `$1,234.50`
fn format_money(minor_units: i64, currency_symbol: &str) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    format!(
        "{}{}{}.{:02}",
        sign,
        currency_symbol,
        format_grouped_int(abs / 100),
        abs % 100
    )
}

fn format_grouped_int(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// Draw a separator above the last row of a rounded table (the TOTAL row).
fn separate_totals_row(table: &str) -> String {
    let lines: Vec<&str> = table.lines().collect();
    if lines.len() < 5 {
        return table.to_string();
    }

    // Parse the top border to discover column widths
    let Some(inner) = lines[0].strip_prefix('╭').and_then(|s| s.strip_suffix('╮')) else {
        return table.to_string();
    };

    let separator = inner
        .split('┬')
        .map(|p| "─".repeat(p.chars().count()))
        .collect::<Vec<_>>()
        .join("┼");

    let split = lines.len() - 2;
    let mut out = lines[..split].join("\n");
    out.push_str(&format!("\n├{separator}┤\n"));
    out.push_str(&lines[split..].join("\n"));
    out
}

fn print_summary(summary: &RecognitionSummary, config: &Config, daily: bool) {
    let symbol = &config.display.currency_symbol;

    if summary.daily_breakdown.is_empty() {
        println!("No revenue in the selected window.");
        return;
    }

    if daily {
        let rows: Vec<DayRow> = summary
            .daily_breakdown
            .iter()
            .map(|d| DayRow {
                date: d.date.clone(),
                recognized: format_money(d.recognized_amount, symbol),
                deferred: format_money(d.deferred_amount, symbol),
                invoices: d.contributors.join(", "),
            })
            .collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
        println!();
    }

    let mut rows: Vec<MonthRow> = summary
        .monthly_breakdown
        .iter()
        .map(|m| MonthRow {
            month: m.month.clone(),
            recognized: format_money(m.recognized, symbol),
            deferred: format_money(m.deferred, symbol),
        })
        .collect();
    rows.push(MonthRow {
        month: "TOTAL".to_string(),
        recognized: format_money(summary.total_recognized, symbol),
        deferred: format_money(summary.total_deferred, symbol),
    });

    let table = Table::new(rows).with(Style::rounded()).to_string();
    let table = separate_totals_row(&table);
    println!("{table}");
}

/// Recognized vs. deferred revenue report
fn cmd_recognize(
    cfg_dir: &Path,
    invoices_path: &Path,
    from: Option<String>,
    to: Option<String>,
    daily: bool,
    json: bool,
) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let invoices = load_invoices(invoices_path)?;
    let recognizer = Recognizer::new(config.recognition);

    let summary = recognizer.calculate_recognition(&invoices, from.as_deref(), to.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "Revenue recognition ({} invoices, {} to {})",
        invoices.len(),
        from.as_deref().unwrap_or("start"),
        to.as_deref().unwrap_or("today")
    );
    print_summary(&summary, &config, daily);

    Ok(())
}

/// Deferred revenue balance at a point in time
fn cmd_deferred(
    cfg_dir: &Path,
    invoices_path: &Path,
    as_of: Option<String>,
    json: bool,
) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let invoices = load_invoices(invoices_path)?;
    let recognizer = Recognizer::new(config.recognition);

    let as_of = as_of.unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());
    let balance = recognizer.get_deferred_revenue_balance(&invoices, &as_of)?;

    if json {
        let body = serde_json::json!({ "asOf": as_of, "deferredBalance": balance });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!(
            "Deferred balance as of {}: {}",
            as_of,
            format_money(balance, &config.display.currency_symbol)
        );
    }

    Ok(())
}

/// Show config location and effective policy
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let path = config_file(cfg_dir);

    println!("Revrec Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    if path.exists() {
        println!("Config file:      {}", path.display());
    } else {
        println!("Config file:      {} (not found, using defaults)", path.display());
    }
    println!("Rounding:         {}", config.recognition.rounding);
    println!("Invalid dates:    {}", config.recognition.invalid_dates);
    println!("Negative amounts: {}", config.recognition.negative_amounts);
    println!("Currency symbol:  {}", config.display.currency_symbol);

    Ok(())
}
