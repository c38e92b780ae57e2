/// Balance arithmetic on a single player's ledger entry
use soulkeeper::souls::{Category, SoulBalances};

#[test]
fn test_new_entry_is_all_zero() {
    let souls = SoulBalances::new();
    for category in Category::ALL {
        assert_eq!(souls.balance(category), 0, "{}", category);
    }
    assert_eq!(souls.total(), 0);
}

#[test]
fn test_credit_and_debit_stay_non_negative() {
    let mut souls = SoulBalances::new();
    souls.credit(Category::Minerals, 5);
    souls.debit(Category::Minerals, 8);
    assert_eq!(souls.balance(Category::Minerals), 0);

    // Non-positive adjustments are no-ops
    souls.credit(Category::Crops, 3);
    souls.credit(Category::Crops, -10);
    souls.debit(Category::Crops, -10);
    souls.debit(Category::Crops, 0);
    assert_eq!(souls.balance(Category::Crops), 3);
}

#[test]
fn test_credit_then_debit_restores_balance() {
    for category in Category::ALL {
        for start in [0i64, 1, 7, 500, 1_000_000] {
            for amount in [1i64, 2, 50, 999] {
                let mut souls = SoulBalances::new();
                souls.set(category, start);
                souls.credit(category, amount);
                souls.debit(category, amount);
                assert_eq!(
                    souls.balance(category),
                    start,
                    "{} start={} amount={}",
                    category,
                    start,
                    amount
                );
                assert_eq!(souls.total(), start);
            }
        }
    }
}

#[test]
fn test_credit_saturates_instead_of_wrapping() {
    let mut souls = SoulBalances::new();
    souls.set(Category::Hunting, i64::MAX - 1);
    souls.credit(Category::Hunting, 10);
    assert_eq!(souls.balance(Category::Hunting), i64::MAX);
}

#[test]
fn test_set_clamps_negative() {
    let mut souls = SoulBalances::new();
    souls.set(Category::Assassination, -50);
    assert_eq!(souls.balance(Category::Assassination), 0);
    souls.set(Category::Assassination, 250);
    assert_eq!(souls.balance(Category::Assassination), 250);
}

#[test]
fn test_redeem_is_all_or_nothing() {
    let mut souls = SoulBalances::new();
    souls.credit(Category::Crops, 5);

    assert!(!souls.can_redeem(Category::Crops, 10));
    assert!(!souls.redeem(Category::Crops, 10));
    assert_eq!(souls.balance(Category::Crops), 5);

    assert!(!souls.can_redeem(Category::Crops, 0));
    assert!(!souls.can_redeem(Category::Crops, -1));

    assert!(souls.redeem(Category::Crops, 5));
    assert_eq!(souls.balance(Category::Crops), 0);
}

#[test]
fn test_categories_are_independent() {
    let mut souls = SoulBalances::new();
    souls.credit(Category::Minerals, 7);
    souls.credit(Category::Hunting, 2);
    souls.debit(Category::Crops, 100);

    let listed: Vec<(Category, i64)> = souls.iter().collect();
    assert_eq!(
        listed,
        vec![
            (Category::Minerals, 7),
            (Category::Crops, 0),
            (Category::Assassination, 0),
            (Category::Hunting, 2),
        ]
    );
    assert_eq!(souls.total(), 9);
}

#[test]
fn test_category_labels_parse_case_insensitively() {
    assert_eq!(Category::from_label("minerals"), Some(Category::Minerals));
    assert_eq!(Category::from_label("CROPS"), Some(Category::Crops));
    assert_eq!(Category::from_label("Hunting"), Some(Category::Hunting));
    assert_eq!(Category::from_label("Fishing"), None);
    assert_eq!(Category::from_label(""), None);
}
