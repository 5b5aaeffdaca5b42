//! Foundational types: members, groups, expenses, balances and payments.

pub mod balance;
pub mod expense;
pub mod group;
pub mod member;
pub mod payment;
