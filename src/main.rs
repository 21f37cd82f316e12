//! splitwise-engine CLI
//!
//! Settle group expenses from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Compute who pays whom for a group file
//! splitwise-engine settle --input trip.json
//!
//! # Output as JSON
//! splitwise-engine settle --input trip.json --format json
//!
//! # Show per-participant balances
//! splitwise-engine balances --input trip.json
//!
//! # Generate a random group for testing
//! splitwise-engine generate --participants 6 --expenses 40
//! ```
//!
//! Set `RUST_LOG=debug` to trace the settlement sweep.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use rust_decimal::Decimal;
use splitwise_engine::core::balance::{BalanceSheet, Standing};
use splitwise_engine::core::error::SettlementError;
use splitwise_engine::core::expense::{parse_amount_f64, parse_amount_str, Expense};
use splitwise_engine::core::group::ExpenseGroup;
use splitwise_engine::core::participant::ParticipantId;
use splitwise_engine::engine::settlement::Settlement;
use splitwise_engine::simulation::generator::{generate_random_group, GroupConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;

/// Group expense sharing and debt settlement
#[derive(Parser, Debug)]
#[command(name = "splitwise-engine", version)]
#[command(about = "Compute who owes whom in a shared expense group", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the transfers that settle a group
    Settle {
        /// Path to JSON group file
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// Show each participant's paid total and net balance
    Balances {
        /// Path to JSON group file
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// Generate a random group file (for testing)
    Generate {
        #[arg(long, default_value_t = 5)]
        participants: usize,
        #[arg(long, default_value_t = 20)]
        expenses: usize,
        /// Write to file instead of stdout
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot access '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid group file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Settlement(#[from] SettlementError),
}

/// JSON schema for an input group.
#[derive(serde::Deserialize, serde::Serialize)]
struct GroupFile {
    #[serde(default = "default_group_name")]
    name: String,
    participants: Vec<String>,
    #[serde(default)]
    expenses: Vec<ExpenseInput>,
}

fn default_group_name() -> String {
    "group".to_string()
}

#[derive(serde::Deserialize, serde::Serialize)]
struct ExpenseInput {
    #[serde(alias = "payer")]
    paid_by: String,
    amount: AmountInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// When the expense happened; defaults to load time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<DateTime<Utc>>,
}

/// Amounts may be given as JSON numbers or strings.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    fn to_decimal(&self) -> Result<Decimal, SettlementError> {
        match self {
            AmountInput::Number(n) => parse_amount_f64(*n),
            AmountInput::Text(s) => parse_amount_str(s),
        }
    }
}

/// JSON output schema for a settle run.
#[derive(serde::Serialize)]
struct SettleOutput<'a> {
    group: &'a str,
    total: Decimal,
    share: Decimal,
    valid: bool,
    settlements: &'a [Settlement],
}

#[derive(serde::Serialize)]
struct BalanceOutput {
    participant: String,
    paid: Decimal,
    net: Decimal,
    status: &'static str,
}

fn load_group(path: &Path) -> Result<ExpenseGroup, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file: GroupFile = serde_json::from_str(&content)?;
    let group = build_group(file)?;

    info!(
        "loaded group '{}' with {} participants and {} expenses",
        group.name(),
        group.participants().len(),
        group.expenses().len()
    );
    Ok(group)
}

fn build_group(file: GroupFile) -> Result<ExpenseGroup, SettlementError> {
    let participants = file.participants.into_iter().map(ParticipantId::from).collect();
    let mut group = ExpenseGroup::new(file.name, participants)?;
    for input in file.expenses {
        let mut expense = Expense::new(ParticipantId::from(input.paid_by), input.amount.to_decimal()?);
        if let Some(description) = input.description {
            expense = expense.with_description(description);
        }
        if let Some(date) = input.date {
            expense = expense.with_created_at(date);
        }
        group.add_expense(expense)?;
    }
    Ok(group)
}

fn cmd_settle(input: &Path, format: Format) -> Result<(), CliError> {
    let group = load_group(input)?;
    let plan = group.plan()?;

    match format {
        Format::Json => {
            let output = SettleOutput {
                group: group.name(),
                total: plan.balances().total().round_dp(2),
                share: plan.balances().share().round_dp(2),
                valid: plan.is_valid(),
                settlements: plan.settlements(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Format::Text => {
            println!("Group: {}\n", group.name());
            println!("{}", plan);
        }
    }
    Ok(())
}

fn cmd_balances(input: &Path, format: Format) -> Result<(), CliError> {
    let group = load_group(input)?;
    let sheet: BalanceSheet = group.balances()?;

    match format {
        Format::Json => {
            let rows: Vec<BalanceOutput> = sheet
                .positions()
                .iter()
                .map(|p| BalanceOutput {
                    participant: p.participant.to_string(),
                    paid: p.paid.round_dp(2),
                    net: p.net.round_dp(2),
                    status: match p.standing() {
                        Standing::Debtor(_) => "DEBTOR",
                        Standing::Creditor(_) => "CREDITOR",
                        Standing::Settled => "SETTLED",
                    },
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Format::Text => println!("{}", sheet),
    }
    Ok(())
}

fn cmd_generate(participants: usize, expenses: usize, output: Option<&Path>) -> Result<(), CliError> {
    let config = GroupConfig {
        participant_count: participants,
        expense_count: expenses,
        ..Default::default()
    };
    let group = generate_random_group(&config)?;

    let file = GroupFile {
        name: group.name().to_string(),
        participants: group.participants().iter().map(|p| p.to_string()).collect(),
        expenses: group
            .expenses()
            .iter()
            .map(|e| ExpenseInput {
                paid_by: e.payer().to_string(),
                amount: AmountInput::Text(e.amount().to_string()),
                description: e.description().map(str::to_string),
                date: Some(e.created_at()),
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&file)?;

    match output {
        Some(path) => {
            fs::write(path, &json).map_err(|source| CliError::Io {
                path: path.display().to_string(),
                source,
            })?;
            eprintln!(
                "Generated {} expenses across {} participants → {}",
                group.expenses().len(),
                group.participants().len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Settle { input, format } => cmd_settle(input, *format),
        Command::Balances { input, format } => cmd_balances(input, *format),
        Command::Generate {
            participants,
            expenses,
            output,
        } => cmd_generate(*participants, *expenses, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn parse(json: &str) -> Result<ExpenseGroup, SettlementError> {
        build_group(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_expense_date_overrides_created_at() {
        let group = parse(
            r#"{
                "name": "trip",
                "participants": ["A", "B"],
                "expenses": [
                    { "paid_by": "A", "amount": 40, "date": "2024-03-01T12:00:00Z" },
                    { "payer": "B", "amount": "1,000.50" }
                ]
            }"#,
        )
        .unwrap();

        let dated = &group.expenses()[0];
        assert_eq!(dated.created_at(), Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        assert_eq!(dated.amount(), dec!(40));
        assert_eq!(group.expenses()[1].amount(), dec!(1000.50));
        assert!(group.expenses()[1].created_at() > dated.created_at());
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let result = serde_json::from_str::<GroupFile>(
            r#"{ "participants": ["A", "B"], "expenses": [{ "paid_by": "A", "amount": 1, "date": "yesterday" }] }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_payer_in_file() {
        let result = parse(r#"{ "participants": ["A", "B"], "expenses": [{ "paid_by": "Z", "amount": 5 }] }"#);
        assert_eq!(
            result.unwrap_err(),
            SettlementError::UnresolvedPayer {
                payer: ParticipantId::new("Z")
            }
        );
    }
}
