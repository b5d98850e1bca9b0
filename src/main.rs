//! settlement-engine CLI
//!
//! Split shared expenses and settle debts from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Settle a session file
//! settlement-engine settle --input session.json
//!
//! # Output as JSON
//! settlement-engine settle --input session.json --format json
//!
//! # Net balances only
//! settlement-engine balances --input session.json
//!
//! # Generate a random session for testing
//! settlement-engine generate --participants 6 --expenses 20
//! ```

use rand::Rng;
use rust_decimal::Decimal;
use settlement_engine::core::currency::{CurrencyCode, RateTable};
use settlement_engine::core::ledger::ExpenseLedger;
use settlement_engine::core::participant::{Group, ParticipantId};
use settlement_engine::settlement::planner::SettlementPlanner;
use settlement_engine::simulation::scenario::{generate_scenario, ScenarioConfig};
use std::collections::HashMap;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"settlement-engine — multi-currency expense splitting and debt settlement

USAGE:
    settlement-engine <COMMAND> [OPTIONS]

COMMANDS:
    settle      Split all expenses and compute the payment plan
    balances    Show net balances without planning payments
    generate    Generate a random session file (for testing)
    help        Show this message

OPTIONS (settle, balances):
    --input <FILE>      Path to JSON session file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (generate):
    --participants <N>  Number of participants (default: 5)
    --expenses <N>      Number of expenses (default: 30)
    --currencies <LIST> Comma-separated codes, first is the settlement
                        currency (default: USD)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    settlement-engine settle --input session.json
    settlement-engine settle --input session.json --format json
    settlement-engine generate --participants 6 --currencies USD,EUR --output test.json"#
    );
}

/// JSON schema for session input.
#[derive(serde::Deserialize)]
struct SessionFile {
    base_currency: String,
    participants: Vec<String>,
    #[serde(default)]
    rates: HashMap<String, Decimal>,
    expenses: Vec<ExpenseInput>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct ExpenseInput {
    payer: String,
    amount: String,
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// JSON output schema for settlement results.
#[derive(serde::Serialize)]
struct SettlementOutput {
    settlement_currency: String,
    expenses: Vec<ExpenseOutput>,
    balances: Vec<BalanceOutput>,
    payments: Vec<PaymentOutput>,
}

#[derive(serde::Serialize)]
struct ExpenseOutput {
    payer: String,
    original_amount: String,
    original_currency: String,
    converted_amount: String,
    description: Option<String>,
}

#[derive(serde::Serialize)]
struct BalanceOutput {
    participant: String,
    balance: String,
    status: String,
}

#[derive(serde::Serialize)]
struct PaymentOutput {
    from: String,
    to: String,
    amount: String,
}

fn load_session(path: &str) -> (ExpenseLedger, usize) {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: SessionFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "base_currency": "USD",
  "participants": ["alice", "bob"],
  "rates": {{ "EUR": 0.90 }},
  "expenses": [
    {{ "payer": "alice", "amount": "90", "currency": "EUR", "description": "hotel" }}
  ]
}}"#
        );
        process::exit(1);
    });

    let base = CurrencyCode::new(file.base_currency.trim().to_uppercase());
    let mut rates = RateTable::new(base.clone());
    for (code, rate) in file.rates {
        rates
            .set_rate(CurrencyCode::new(code.trim().to_uppercase()), rate)
            .unwrap_or_else(|e| {
                eprintln!("Invalid rate table: {}", e);
                process::exit(1);
            });
    }
    log::info!(
        "rate snapshot loaded: {} currencies against {}",
        rates.currencies().len(),
        base
    );

    let group = Group::new(
        file.participants
            .iter()
            .map(|p| ParticipantId::new(p.trim()))
            .collect(),
    )
    .unwrap_or_else(|e| {
        eprintln!("Invalid participant list: {}", e);
        process::exit(1);
    });

    let mut ledger = ExpenseLedger::new(group, rates);
    let mut rejected = 0usize;
    for entry in file.expenses {
        let amount: Decimal = match entry.amount.parse() {
            Ok(a) => a,
            Err(e) => {
                log::warn!("skipping expense with bad amount '{}': {}", entry.amount, e);
                rejected += 1;
                continue;
            }
        };
        let result = ledger.add_expense(
            &ParticipantId::new(entry.payer.trim()),
            amount,
            &CurrencyCode::new(entry.currency.trim().to_uppercase()),
            entry.description.as_deref(),
        );
        if let Err(e) = result {
            log::warn!("skipping expense: {}", e);
            rejected += 1;
        }
    }

    (ledger, rejected)
}

fn parse_io_options(args: &[String]) -> (String, String) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    (path, format)
}

fn balance_outputs(ledger: &ExpenseLedger) -> Vec<BalanceOutput> {
    ledger
        .net_balances()
        .entries()
        .iter()
        .map(|(participant, balance)| BalanceOutput {
            participant: participant.to_string(),
            balance: balance.round_dp(2).to_string(),
            status: if *balance > Decimal::ZERO {
                "CREDITOR".to_string()
            } else if *balance < Decimal::ZERO {
                "DEBTOR".to_string()
            } else {
                "SETTLED".to_string()
            },
        })
        .collect()
}

fn cmd_settle(args: &[String]) {
    let (path, format) = parse_io_options(args);
    let (ledger, rejected) = load_session(&path);
    if rejected > 0 {
        eprintln!("Warning: {} expense entries were rejected.", rejected);
    }

    let balances = ledger.net_balances();
    let plan = SettlementPlanner::plan(&balances).unwrap_or_else(|e| {
        eprintln!("Internal error: {}", e);
        process::exit(1);
    });

    if format == "json" {
        let output = SettlementOutput {
            settlement_currency: ledger.settlement_currency().to_string(),
            expenses: ledger
                .expenses()
                .iter()
                .map(|e| ExpenseOutput {
                    payer: e.payer().to_string(),
                    original_amount: e.original_amount().to_string(),
                    original_currency: e.original_currency().to_string(),
                    converted_amount: e.converted_amount().to_string(),
                    description: e.description().map(str::to_string),
                })
                .collect(),
            balances: balance_outputs(&ledger),
            payments: plan
                .payments()
                .iter()
                .map(|p| PaymentOutput {
                    from: p.from.to_string(),
                    to: p.to.to_string(),
                    amount: p.amount.to_string(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        let currency = ledger.settlement_currency();
        println!("--- Expense Summary ---");
        for expense in ledger.expenses() {
            println!(
                "{} paid {} {} ({} {}) for {}",
                expense.payer(),
                expense.original_amount(),
                expense.original_currency(),
                expense.converted_amount(),
                currency,
                expense.description().unwrap_or("unspecified"),
            );
        }
        println!("\n--- Net Balances ---");
        for (participant, balance) in ledger.net_balances().entries() {
            println!("{}: {} {}", participant, balance.round_dp(2), currency);
        }
        println!("\n--- Settlements ---");
        if plan.is_empty() {
            println!("Everyone is settled; no payments required.");
        } else {
            for payment in plan.payments() {
                println!("{} {}", payment, currency);
            }
        }
    }
}

fn cmd_balances(args: &[String]) {
    let (path, format) = parse_io_options(args);
    let (ledger, rejected) = load_session(&path);
    if rejected > 0 {
        eprintln!("Warning: {} expense entries were rejected.", rejected);
    }

    if format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&balance_outputs(&ledger)).unwrap()
        );
    } else {
        let currency = ledger.settlement_currency();
        for (participant, balance) in ledger.net_balances().entries() {
            println!("{}: {} {}", participant, balance.round_dp(2), currency);
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut participants = 5usize;
    let mut expenses = 30usize;
    let mut currencies_str = "USD".to_string();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                participants = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--participants requires a number");
                    process::exit(1);
                });
            }
            "--expenses" => {
                i += 1;
                expenses = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--expenses requires a number");
                    process::exit(1);
                });
            }
            "--currencies" => {
                i += 1;
                currencies_str = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--currencies requires a comma-separated list");
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let currencies: Vec<CurrencyCode> = currencies_str
        .split(',')
        .map(|s| CurrencyCode::new(s.trim().to_uppercase()))
        .collect();

    let config = ScenarioConfig {
        participant_count: participants,
        currencies: currencies.clone(),
        expense_count: expenses,
        ..Default::default()
    };
    let scenario = generate_scenario(&config);

    // Invent plausible rates for the non-base currencies.
    let mut rng = rand::thread_rng();
    let rates: HashMap<String, Decimal> = currencies
        .iter()
        .skip(1)
        .map(|c| {
            let rate = Decimal::new(rng.gen_range(5..50_000), 3);
            (c.to_string(), rate)
        })
        .collect();

    #[derive(serde::Serialize)]
    struct OutputFile {
        base_currency: String,
        participants: Vec<String>,
        rates: HashMap<String, Decimal>,
        expenses: Vec<ExpenseInput>,
    }

    let output = OutputFile {
        base_currency: currencies[0].to_string(),
        participants: scenario
            .group
            .iter()
            .map(|p| p.to_string())
            .collect(),
        rates,
        expenses: scenario
            .expenses
            .iter()
            .map(|(payer, amount, currency)| ExpenseInput {
                payer: payer.to_string(),
                amount: amount.to_string(),
                currency: currency.to_string(),
                description: None,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            output.expenses.len(),
            participants,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "balances" => cmd_balances(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
