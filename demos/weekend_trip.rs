//! Weekend trip settlement example.
//!
//! Records a handful of shared expenses and prints who owes whom.

use rust_decimal_macros::dec;
use split_ledger::prelude::*;

fn main() -> Result<()> {
    println!("╔══════════════════════════════════════════╗");
    println!("║   split-ledger: Weekend Trip Example     ║");
    println!("╚══════════════════════════════════════════╝\n");

    let mut store = InMemoryStore::new();
    let trip = store.create_group("Weekend trip");

    let alice = store.add_member(trip, "alice")?;
    let bob = store.add_member(trip, "bob")?;
    let carol = store.add_member(trip, "carol")?;
    let dave = store.add_member(trip, "dave")?;

    // Alice and Bob split the cabin booking between them
    store.add_expense(
        trip,
        NewExpense::new(
            "Cabin",
            dec!(400),
            vec![
                CreditorShare::new(alice, dec!(250)),
                CreditorShare::new(bob, dec!(150)),
            ],
            vec![alice, bob, carol, dave],
        ),
    )?;
    store.add_expense(
        trip,
        NewExpense::new(
            "Groceries",
            dec!(120),
            vec![CreditorShare::new(carol, dec!(120))],
            vec![alice, bob, carol, dave],
        ),
    )?;
    // Only Alice and Dave took the car
    store.add_expense(
        trip,
        NewExpense::new(
            "Fuel",
            dec!(60),
            vec![CreditorShare::new(dave, dec!(60))],
            vec![alice, dave],
        ),
    )?;
    // Three-way dinner split that does not divide evenly
    store.add_expense(
        trip,
        NewExpense::new(
            "Dinner",
            dec!(100),
            vec![CreditorShare::new(bob, dec!(100))],
            vec![alice, bob, carol],
        ),
    )?;

    let summary = summarize_group(&store, trip, &SettlementPlanner::default())?;
    println!("{}", summary);

    println!("━━━ JSON ━━━\n");
    match summary.to_json_pretty() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Could not serialize summary: {}", e),
    }
    Ok(())
}
