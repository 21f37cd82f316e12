//! Settling a shared trip.
//!
//! Shows how the engine turns a handful of expenses into the transfers
//! that even everyone out.

use splitwise_engine::core::expense::Expense;
use splitwise_engine::core::group::ExpenseGroup;
use splitwise_engine::core::participant::ParticipantId;
use rust_decimal_macros::dec;

fn main() {
    println!("╔════════════════════════════════════════════╗");
    println!("║  splitwise-engine: Trip Settlement Example ║");
    println!("╚════════════════════════════════════════════╝\n");

    let friends: Vec<ParticipantId> = ["ana", "ben", "cleo", "dev"]
        .into_iter()
        .map(ParticipantId::from)
        .collect();

    let mut trip = match ExpenseGroup::new("Lisbon", friends) {
        Ok(group) => group,
        Err(e) => {
            eprintln!("cannot create group: {}", e);
            return;
        }
    };

    let expenses = [
        ("ana", dec!(320.00), "apartment"),
        ("ben", dec!(84.50), "dinner"),
        ("ana", dec!(45.30), "tram passes"),
        ("dev", dec!(150.20), "boat tour"),
    ];
    for (payer, amount, description) in expenses {
        let expense = Expense::new(ParticipantId::new(payer), amount).with_description(description);
        if let Err(e) = trip.add_expense(expense) {
            eprintln!("skipping expense: {}", e);
        }
    }

    match trip.plan() {
        Ok(plan) => {
            println!("{}", plan.balances());
            println!("{}", plan);
            println!("{}", plan.check());
        }
        Err(e) => eprintln!("cannot settle: {}", e),
    }
}
