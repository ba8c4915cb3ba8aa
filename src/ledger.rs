use std::collections::btree_map::Entry;

use crate::schemas::{Balances, User};

/// Which side of an IOU a user is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Lender,
    Borrower,
}

/// Applies a debt of `amount` owed by `borrower` to `lender`, netted against
/// whatever the two already owe each other.
///
/// The caller is responsible for passing two distinct users and a positive,
/// finite amount.
pub fn record_transaction(lender: &mut User, borrower: &mut User, amount: f64) {
    let borrower_name = borrower.name.clone();
    adjust_balances(lender, Role::Lender, &borrower_name, amount);
    lender.balance += amount;

    let lender_name = lender.name.clone();
    adjust_balances(borrower, Role::Borrower, &lender_name, amount);
    borrower.balance -= amount;
}

/// Updates the named balances of a single user for one side of an IOU.
///
/// Existing debt in the opposite direction is cancelled first. Whatever is
/// left of `amount` after that is added in the direction of the IOU.
pub fn adjust_balances(user: &mut User, role: Role, counterparty: &str, amount: f64) {
    let (reduce, increase) = match role {
        Role::Lender => (&mut user.owes, &mut user.owed_by),
        Role::Borrower => (&mut user.owed_by, &mut user.owes),
    };

    match reduce.get(counterparty).copied() {
        Some(previous) if amount < previous => {
            reduce.insert(counterparty.to_owned(), previous - amount);
        }
        Some(previous) => {
            reduce.remove(counterparty);
            increase_named_balance(increase, counterparty, amount - previous);
        }
        None => increase_named_balance(increase, counterparty, amount),
    }
}

/// Adds `delta` to the amount stored for `name`, creating the entry if needed.
/// An entry whose sum reaches exactly zero is removed.
pub fn increase_named_balance(balances: &mut Balances, name: &str, delta: f64) {
    match balances.entry(name.to_owned()) {
        Entry::Occupied(mut entry) => {
            let sum = *entry.get() + delta;
            if sum == 0.0 {
                entry.remove();
            } else {
                entry.insert(sum);
            }
        }
        Entry::Vacant(entry) => {
            if delta != 0.0 {
                entry.insert(delta);
            }
        }
    }
}
