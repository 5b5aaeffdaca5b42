//! split-ledger CLI
//!
//! Compute balances and settling payments for a group from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Summarize a group's expenses
//! split-ledger summary --input group.json
//!
//! # Output as JSON
//! split-ledger summary --input group.json --format json
//!
//! # Plan payments for a precomputed balance map
//! split-ledger settle --input balances.json
//!
//! # Generate a random group for testing
//! split-ledger generate --members 8 --expenses 40
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use indexmap::IndexMap;
use rust_decimal::Decimal;
use split_ledger::core::balance::Balances;
use split_ledger::core::expense::{CreditorShare, NewExpense};
use split_ledger::core::group::GroupId;
use split_ledger::core::member::{Member, MemberId};
use split_ledger::settlement::planner::{PlannerConfig, SettlementPlanner};
use split_ledger::settlement::summary::{summarize_group, GroupSummary};
use split_ledger::simulation::random_group::{generate_random_group, GroupConfig};
use split_ledger::store::InMemoryStore;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"split-ledger — shared-expense balances and settlement planning

USAGE:
    split-ledger <COMMAND> [OPTIONS]

COMMANDS:
    summary     Compute balances and payments for a group file
    settle      Plan payments for a balance map
    generate    Generate a random group file (for testing)
    help        Show this message

OPTIONS (summary, settle):
    --input <FILE>        Path to JSON input file
    --format <FORMAT>     Output format: text (default) or json
    --tolerance <AMOUNT>  Accepted imbalance before refusing to settle (default: 0.000001)

OPTIONS (generate):
    --members <N>       Number of members (default: 6)
    --expenses <N>      Number of expenses (default: 20)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    split-ledger summary --input group.json
    split-ledger summary --input group.json --format json
    split-ledger settle --input balances.json --tolerance 0.01
    split-ledger generate --members 8 --expenses 40 --output group.json"#
    );
}

/// JSON schema for a group file.
#[derive(serde::Serialize, serde::Deserialize)]
struct GroupFile {
    #[serde(default = "default_group_name")]
    name: String,
    members: Vec<String>,
    #[serde(default)]
    expenses: Vec<ExpenseInput>,
}

fn default_group_name() -> String {
    "group".to_string()
}

#[derive(serde::Serialize, serde::Deserialize)]
struct ExpenseInput {
    description: String,
    amount: Decimal,
    creditors: Vec<CreditorInput>,
    debtors: Vec<String>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CreditorInput {
    member: String,
    amount: Decimal,
}

/// JSON schema for a balance map file; member order is preserved.
#[derive(serde::Deserialize)]
struct BalancesFile {
    balances: IndexMap<String, Decimal>,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

struct CommonOptions {
    input_path: String,
    format: String,
    config: PlannerConfig,
}

fn parse_common_options(args: &[String]) -> CommonOptions {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut config = PlannerConfig::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(
                    args.get(i)
                        .cloned()
                        .unwrap_or_else(|| fail("--input requires a file path")),
                );
            }
            "--format" => {
                i += 1;
                format = args
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| fail("--format requires 'text' or 'json'"));
            }
            "--tolerance" => {
                i += 1;
                let tolerance: Decimal = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--tolerance requires a decimal amount"));
                config = config.with_tolerance(tolerance);
            }
            other => fail(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    if format != "text" && format != "json" {
        fail(format!("Unknown format '{}': expected 'text' or 'json'", format));
    }

    CommonOptions {
        input_path: input_path.unwrap_or_else(|| fail("--input <FILE> is required")),
        format,
        config,
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> T {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading file '{}': {}", path, e)));
    serde_json::from_str(&content).unwrap_or_else(|e| fail(format!("parsing JSON: {}", e)))
}

/// Load a group file into a fresh store, resolving member names to ids.
fn load_group(file: GroupFile) -> (InMemoryStore, GroupId) {
    let mut store = InMemoryStore::new();
    let group = store.create_group(file.name);

    let mut ids: IndexMap<String, MemberId> = IndexMap::new();
    for name in file.members {
        let id = store
            .add_member(group, name.as_str())
            .unwrap_or_else(|e| fail(e));
        ids.insert(name, id);
    }
    let resolve = |name: &str| -> MemberId {
        ids.get(name)
            .copied()
            .unwrap_or_else(|| fail(format!("expense references unknown member '{}'", name)))
    };

    for expense in file.expenses {
        let creditors = expense
            .creditors
            .iter()
            .map(|c| CreditorShare::new(resolve(&c.member), c.amount))
            .collect();
        let debtors = expense.debtors.iter().map(|d| resolve(d)).collect();
        store
            .add_expense(
                group,
                NewExpense::new(expense.description, expense.amount, creditors, debtors),
            )
            .unwrap_or_else(|e| fail(e));
    }
    (store, group)
}

fn print_summary(summary: &GroupSummary, format: &str) {
    if format == "json" {
        let json = summary
            .to_json_pretty()
            .unwrap_or_else(|e| fail(format!("serializing summary: {}", e)));
        println!("{}", json);
    } else {
        println!("{}", summary);
    }
}

fn cmd_summary(args: &[String]) {
    let options = parse_common_options(args);
    let (store, group) = load_group(read_json(&options.input_path));

    let planner = SettlementPlanner::new(options.config);
    let summary = summarize_group(&store, group, &planner).unwrap_or_else(|e| fail(e));
    print_summary(&summary, &options.format);
}

fn cmd_settle(args: &[String]) {
    let options = parse_common_options(args);
    let file: BalancesFile = read_json(&options.input_path);

    let group = GroupId::new();
    let members: Vec<Member> = file
        .balances
        .keys()
        .enumerate()
        .map(|(i, name)| Member::new(MemberId::new(i as u64 + 1), name.as_str(), group))
        .collect();
    let balances: Balances = members
        .iter()
        .zip(file.balances.values())
        .map(|(m, b)| (m.id(), *b))
        .collect();

    let planner = SettlementPlanner::new(options.config);
    let payments = planner
        .compute_payments(&balances)
        .unwrap_or_else(|e| fail(e));
    let summary = GroupSummary::build(&members, &balances, &payments).unwrap_or_else(|e| fail(e));
    print_summary(&summary, &options.format);
}

fn cmd_generate(args: &[String]) {
    let mut config = GroupConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--members" => {
                i += 1;
                config.member_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--members requires a number"));
            }
            "--expenses" => {
                i += 1;
                config.expense_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--expenses requires a number"));
            }
            "--output" => {
                i += 1;
                output_path = Some(
                    args.get(i)
                        .cloned()
                        .unwrap_or_else(|| fail("--output requires a file path")),
                );
            }
            other => fail(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let snapshot = generate_random_group(&config).unwrap_or_else(|e| fail(e));
    let names: IndexMap<MemberId, String> = snapshot
        .members
        .iter()
        .map(|m| (m.id(), m.name().to_string()))
        .collect();
    let name_of = |id: &MemberId| names.get(id).cloned().unwrap_or_default();

    let output = GroupFile {
        name: "generated".to_string(),
        members: names.values().cloned().collect(),
        expenses: snapshot
            .expenses
            .iter()
            .map(|e| ExpenseInput {
                description: e.description().to_string(),
                amount: e.total_amount(),
                creditors: e
                    .creditors()
                    .iter()
                    .map(|c| CreditorInput {
                        member: name_of(&c.member),
                        amount: c.amount,
                    })
                    .collect(),
                debtors: e.debtors().iter().map(name_of).collect(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output)
        .unwrap_or_else(|e| fail(format!("serializing group: {}", e)));

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| fail(format!("writing to '{}': {}", path, e)));
        eprintln!(
            "Generated {} expenses across {} members → {}",
            snapshot.expenses.len(),
            snapshot.members.len(),
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
        "summary" => cmd_summary(rest),
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
