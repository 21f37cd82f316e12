//! Recording settlements and marking them paid.
//!
//! Recomputing after a new expense updates the pending transfers in
//! place instead of piling up duplicates.

use splitwise_engine::prelude::*;
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("━━━ Settlement Book ━━━\n");

    let mut flat = ExpenseGroup::new(
        "flat 4B",
        vec![
            ParticipantId::new("mia"),
            ParticipantId::new("noah"),
            ParticipantId::new("omar"),
        ],
    )?;
    flat.add_expense(Expense::new(ParticipantId::new("mia"), dec!(210)).with_description("internet"))?;

    let mut book = SettlementBook::new();
    let recorded = book.record(flat.id(), &flat.settlements()?);
    println!("Initial:");
    for record in &recorded {
        println!("  {} -> {}  {}  [{}]", record.from(), record.to(), record.amount(), record.status());
    }

    flat.add_expense(Expense::new(ParticipantId::new("noah"), dec!(60)).with_description("cleaning"))?;
    let recorded = book.record(flat.id(), &flat.settlements()?);
    println!("\nAfter noah pays for cleaning:");
    for record in &recorded {
        println!("  {} -> {}  {}  [{}]", record.from(), record.to(), record.amount(), record.status());
    }

    if let Some(first) = recorded.first() {
        book.complete(flat.id(), first.id())?;
    }

    println!("\nHistory (newest first):");
    for record in book.for_group(flat.id()) {
        println!("  {} -> {}  {}  [{}]", record.from(), record.to(), record.amount(), record.status());
    }
    Ok(())
}
