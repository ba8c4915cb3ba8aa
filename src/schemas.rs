use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type UserName = String;

/// Amounts keyed by counterparty. Every stored amount is strictly positive.
pub type Balances = BTreeMap<UserName, f64>;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub name: UserName,
    #[serde(default)]
    pub owes: Balances,
    #[serde(default)]
    pub owed_by: Balances,
    #[serde(default)]
    pub balance: f64,
}

impl User {
    pub fn new(name: impl Into<UserName>) -> Self {
        User {
            name: name.into(),
            owes: Balances::new(),
            owed_by: Balances::new(),
            balance: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UsersFilter {
    pub users: Vec<UserName>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewUser {
    pub user: UserName,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Iou {
    pub lender: UserName,
    pub borrower: UserName,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UsersJson {
    pub users: Vec<User>,
}
