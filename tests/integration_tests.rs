use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use splitwise_engine::book::record::SettlementStatus;
use splitwise_engine::book::settlement_book::SettlementBook;
use splitwise_engine::core::error::SettlementError;
use splitwise_engine::core::expense::Expense;
use splitwise_engine::core::group::ExpenseGroup;
use splitwise_engine::core::participant::ParticipantId;
use splitwise_engine::engine::settlement::{Settlement, SettlementEngine};

fn ids(names: &[&str]) -> Vec<ParticipantId> {
    names.iter().map(|n| ParticipantId::new(*n)).collect()
}

fn paid(payer: &str, amount: Decimal) -> Expense {
    Expense::new(ParticipantId::new(payer), amount)
}

fn transfer(from: &str, to: &str, amount: Decimal) -> Settlement {
    Settlement::new(ParticipantId::new(from), ParticipantId::new(to), amount)
}

/// One payer covers everything; both debtors pay the sole creditor in order.
#[test]
fn single_payer_is_repaid_in_participant_order() {
    let expenses = vec![paid("A", dec!(300)), paid("B", dec!(0)), paid("C", dec!(0))];
    let result = SettlementEngine::compute_settlements(&ids(&["A", "B", "C"]), &expenses).unwrap();

    assert_eq!(
        result,
        vec![transfer("B", "A", dec!(100)), transfer("C", "A", dec!(100))]
    );
}

#[test]
fn no_expenses_means_no_transfers() {
    let result = SettlementEngine::compute_settlements(&ids(&["A", "B"]), &[]).unwrap();
    assert!(result.is_empty());
}

#[test]
fn single_participant_is_rejected() {
    let err = SettlementEngine::compute_settlements(&ids(&["A"]), &[]).unwrap_err();
    assert!(matches!(err, SettlementError::InvalidInput { .. }));
}

#[test]
fn empty_participant_list_is_rejected() {
    let err = SettlementEngine::compute_settlements(&[], &[paid("A", dec!(10))]).unwrap_err();
    assert!(matches!(err, SettlementError::InvalidInput { .. }));
}

#[test]
fn unknown_payer_is_rejected() {
    let err = SettlementEngine::compute_settlements(&ids(&["A", "B"]), &[paid("C", dec!(50))])
        .unwrap_err();
    assert_eq!(
        err,
        SettlementError::UnresolvedPayer {
            payer: ParticipantId::new("C")
        }
    );
}

#[test]
fn equal_contributions_need_no_transfers() {
    let expenses = vec![paid("A", dec!(300)), paid("B", dec!(300)), paid("C", dec!(300))];
    let result = SettlementEngine::compute_settlements(&ids(&["A", "B", "C"]), &expenses).unwrap();
    assert!(result.is_empty());
}

/// A weekend trip: several payers, several debtors.
#[test]
fn weekend_trip_scenario() {
    let friends = ids(&["ana", "ben", "cleo", "dev", "eli"]);
    let mut trip = ExpenseGroup::new("weekend", friends.clone()).unwrap();

    trip.add_expense(paid("ana", dec!(420.00)).with_description("cabin"))
        .unwrap();
    trip.add_expense(paid("ben", dec!(96.40)).with_description("groceries"))
        .unwrap();
    trip.add_expense(paid("ana", dec!(58.60)).with_description("fuel"))
        .unwrap();
    trip.add_expense(paid("dev", dec!(125.00)).with_description("boat"))
        .unwrap();

    // total 700, share 140
    let plan = trip.plan().unwrap();
    assert_eq!(plan.balances().total(), dec!(700));
    assert_eq!(plan.balances().share(), dec!(140));
    assert!(plan.balances().is_balanced());

    // ana +338.60, ben -43.60, cleo -140, dev -15, eli -140
    assert_eq!(
        plan.settlements(),
        &[
            transfer("ben", "ana", dec!(43.60)),
            transfer("cleo", "ana", dec!(140)),
            transfer("dev", "ana", dec!(15)),
            transfer("eli", "ana", dec!(140)),
        ]
    );
    assert!(plan.is_valid());
    assert_eq!(plan.total_transferred(), dec!(338.60));
}

/// Two creditors: the head debtor is split across them.
#[test]
fn debtor_split_across_creditors() {
    let expenses = vec![paid("B", dec!(200)), paid("C", dec!(100))];
    let result =
        SettlementEngine::compute_settlements(&ids(&["A", "B", "C", "D"]), &expenses).unwrap();

    // share 75: A -75, B +125, C +25, D -75
    assert_eq!(
        result,
        vec![
            transfer("A", "B", dec!(75)),
            transfer("D", "B", dec!(50)),
            transfer("D", "C", dec!(25)),
        ]
    );
}

/// Computed transfers flow into the book, merge on recompute, and complete.
#[test]
fn settlements_recorded_and_completed() {
    let mut group = ExpenseGroup::new("flat", ids(&["A", "B", "C"])).unwrap();
    group.add_expense(paid("A", dec!(300))).unwrap();

    let mut book = SettlementBook::new();
    let first = book.record(group.id(), &group.settlements().unwrap());
    assert_eq!(first.len(), 2);

    // A new expense changes the amounts; pending pairs are updated in place.
    group.add_expense(paid("A", dec!(30))).unwrap();
    let second = book.record(group.id(), &group.settlements().unwrap());
    assert_eq!(book.len(), 2);
    assert_eq!(second[0].id(), first[0].id());
    assert_eq!(second[0].amount(), dec!(110));

    let done = book.complete(group.id(), second[0].id()).unwrap();
    assert_eq!(done.status(), SettlementStatus::Completed);
    assert_eq!(book.pending(group.id()).len(), 1);
}

#[test]
fn settlement_json_shape() {
    let result = SettlementEngine::compute_settlements(&ids(&["A", "B"]), &[paid("A", dec!(50))])
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json[0]["from"], "B");
    assert_eq!(json[0]["to"], "A");
    assert_eq!(json[0]["amount"], "25.00");
}

#[test]
fn plan_serializes() {
    let expenses = vec![paid("A", dec!(90))];
    let plan = SettlementEngine::plan(&ids(&["A", "B", "C"]), &expenses).unwrap();
    let parsed = serde_json::to_value(&plan).unwrap();

    assert!(parsed.get("balances").is_some());
    assert_eq!(parsed["settlements"].as_array().unwrap().len(), 2);
}
