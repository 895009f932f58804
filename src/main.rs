use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use splitsolver::{
    has_outstanding_balances, validate_expenses, BalanceStatus, Group, SettlementConfig,
    DEFAULT_TOLERANCE,
};

#[derive(Parser)]
#[command(
    name = "splitsolver",
    version,
    about = "Work out who owes whom in a group and how to settle up",
    long_about = "Reads a group snapshot (participants and expenses, as JSON) and prints \
                  each participant's balance or the fewest payments that settle the group."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GroupArgs {
    /// Path to the group JSON file
    group: PathBuf,

    /// Balances closer to zero than this count as settled
    #[arg(long, env = "SPLITSOLVER_TOLERANCE", default_value_t = DEFAULT_TOLERANCE)]
    tolerance: Decimal,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every participant's net balance
    Balances(GroupArgs),

    /// Suggest the payments that settle the group
    Settle(GroupArgs),

    /// Check that every expense references known participants and adds up
    Validate(GroupArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Balances(args) => show_balances(&args),
        Commands::Settle(args) => show_settlements(&args),
        Commands::Validate(args) => validate(&args),
    }
}

fn load_group(path: &Path) -> Result<Group> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read group file {}", path.display()))?;
    let group: Group = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse group file {}", path.display()))?;
    tracing::debug!(
        group = %group.id,
        participants = group.participants.len(),
        expenses = group.expenses.len(),
        "loaded group"
    );
    Ok(group)
}

fn show_balances(args: &GroupArgs) -> Result<()> {
    let group = load_group(&args.group)?;
    let config = SettlementConfig::with_tolerance(args.tolerance);
    let balances = group.balances()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&balances)?);
        return Ok(());
    }

    if balances.is_empty() {
        println!("No balances to show.");
        return Ok(());
    }

    println!("{}: {:.2} spent in total", group.name, group.total_expenses()?);
    for balance in &balances {
        let status = match balance.status(&config) {
            BalanceStatus::IsOwed => "is owed",
            BalanceStatus::Owes => "owes",
            BalanceStatus::SettledUp => "settled up",
        };
        let sign = if balance.balance > Decimal::ZERO { "+" } else { "" };
        println!(
            "{:<20} {}{:.2}  {}",
            balance.participant_name, sign, balance.balance, status
        );
    }
    Ok(())
}

fn show_settlements(args: &GroupArgs) -> Result<()> {
    let group = load_group(&args.group)?;
    let config = SettlementConfig::with_tolerance(args.tolerance);
    let balances = group.balances()?;
    let settlements = splitsolver::plan_settlements_with(&balances, &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&settlements)?);
        return Ok(());
    }

    if !has_outstanding_balances(&balances, &config) || settlements.is_empty() {
        println!("All settled up!");
        return Ok(());
    }

    let plural = if settlements.len() > 1 { "s" } else { "" };
    println!(
        "Settle all debts with {} transaction{}:",
        settlements.len(),
        plural
    );
    for settlement in &settlements {
        println!("  {}", settlement);
    }
    Ok(())
}

fn validate(args: &GroupArgs) -> Result<()> {
    let group = load_group(&args.group)?;
    let config = SettlementConfig::with_tolerance(args.tolerance);

    validate_expenses(&group.participants, &group.expenses, &config)
        .with_context(|| format!("Group {} is not valid", group.name))?;

    println!(
        "{}: {} participants, {} expenses, all valid",
        group.name,
        group.participants.len(),
        group.expenses.len()
    );
    Ok(())
}
