use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::error::{LedgerError, Result};
use crate::ledger;
use crate::schemas::{User, UserName};

/// Largest difference tolerated between a seeded balance and the sum of its
/// named balances, relative to the magnitude of that sum.
const BALANCE_TOLERANCE: f64 = 1e-9;

/// Name-indexed collection of every user known to the ledger.
#[derive(Clone, Debug, Default)]
pub struct Directory {
    users: BTreeMap<UserName, User>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from existing records, rejecting anything that
    /// breaks the ledger invariants.
    pub fn from_users(users: Vec<User>) -> Result<Self> {
        let mut directory = Directory::new();
        for user in users {
            if let Err(err) = check_name(&user.name) {
                return Err(LedgerError::InconsistentLedger(err.to_string()));
            }
            if directory.users.contains_key(&user.name) {
                return Err(LedgerError::InconsistentLedger(format!(
                    "user {} appears more than once",
                    user.name
                )));
            }
            directory.users.insert(user.name.clone(), user);
        }
        directory.check_invariants()?;
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn create_user(&mut self, name: &str) -> Result<User> {
        check_name(name)?;
        if self.users.contains_key(name) {
            return Err(LedgerError::DuplicateUser(name.to_string()));
        }
        let user = User::new(name);
        self.users.insert(user.name.clone(), user.clone());
        info!(user = name, "created user");
        Ok(user)
    }

    pub fn find_user(&self, name: &str) -> Result<&User> {
        self.users
            .get(name)
            .ok_or_else(|| LedgerError::UserNotFound(name.to_string()))
    }

    /// Records for the requested names, sorted by name. Unknown names are
    /// skipped and repeated names are returned once.
    pub fn select_users(&self, names: &[UserName]) -> Vec<User> {
        let names: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        names
            .into_iter()
            .filter_map(|name| {
                let user = self.users.get(name);
                if user.is_none() {
                    debug!(user = name, "skipping unknown user in query");
                }
                user.cloned()
            })
            .collect()
    }

    /// Every record, sorted by name.
    pub fn all_users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    /// Records an IOU and returns both updated users ordered by name.
    ///
    /// Nothing is written unless every check passes, so a rejected IOU leaves
    /// the directory unchanged.
    pub fn record_transaction(
        &mut self,
        lender: &str,
        borrower: &str,
        amount: f64,
    ) -> Result<Vec<User>> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if lender == borrower {
            return Err(LedgerError::SelfTransaction(lender.to_string()));
        }
        let mut lender_user = self.find_user(lender)?.clone();
        let mut borrower_user = self.find_user(borrower)?.clone();

        ledger::record_transaction(&mut lender_user, &mut borrower_user, amount);
        if !is_finite(&lender_user) || !is_finite(&borrower_user) {
            return Err(LedgerError::InvalidAmount(amount));
        }
        info!(lender, borrower, amount, "recorded IOU");

        self.users.insert(lender_user.name.clone(), lender_user.clone());
        self.users
            .insert(borrower_user.name.clone(), borrower_user.clone());

        let mut users = vec![lender_user, borrower_user];
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    fn check_invariants(&self) -> Result<()> {
        for user in self.users.values() {
            let name = &user.name;
            for (counterparty, amount) in user.owes.iter().chain(user.owed_by.iter()) {
                if counterparty == name {
                    return Err(inconsistent(format!("{name} lists themselves as a counterparty")));
                }
                if !amount.is_finite() || *amount <= 0.0 {
                    return Err(inconsistent(format!(
                        "{name} has non-positive amount {amount} for {counterparty}"
                    )));
                }
            }
            if let Some(counterparty) = user.owes.keys().find(|c| user.owed_by.contains_key(*c)) {
                return Err(inconsistent(format!(
                    "{name} both owes and is owed by {counterparty}"
                )));
            }

            let expected = user.owed_by.values().sum::<f64>() - user.owes.values().sum::<f64>();
            if (user.balance - expected).abs() > BALANCE_TOLERANCE * expected.abs().max(1.0) {
                return Err(inconsistent(format!(
                    "{name} has balance {} but named balances sum to {expected}",
                    user.balance
                )));
            }

            for (counterparty, amount) in &user.owes {
                let mirrored = self
                    .users
                    .get(counterparty)
                    .and_then(|other| other.owed_by.get(name));
                if mirrored != Some(amount) {
                    return Err(inconsistent(format!(
                        "{name} owes {counterparty} {amount} but it is not mirrored"
                    )));
                }
            }
            for (counterparty, amount) in &user.owed_by {
                let mirrored = self
                    .users
                    .get(counterparty)
                    .and_then(|other| other.owes.get(name));
                if mirrored != Some(amount) {
                    return Err(inconsistent(format!(
                        "{counterparty} owes {name} {amount} but it is not mirrored"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Names are rejected when blank or padded with whitespace, so `" Adam"`
/// can never shadow `"Adam"`.
fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::MalformedRequest(
            "user name must not be blank".to_string(),
        ));
    }
    if name.trim() != name {
        return Err(LedgerError::MalformedRequest(format!(
            "user name {name:?} must not start or end with whitespace"
        )));
    }
    Ok(())
}

fn is_finite(user: &User) -> bool {
    user.balance.is_finite()
        && user
            .owes
            .values()
            .chain(user.owed_by.values())
            .all(|amount| amount.is_finite())
}

fn inconsistent(message: String) -> LedgerError {
    LedgerError::InconsistentLedger(message)
}
