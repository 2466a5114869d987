//! Core reporting logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Ledger data arrives through the [`reports::TransactionSource`] trait.
//!
//! # Modules
//!
//! - `ledger` - Accounts, transaction lines, normal balances, in-memory ledger
//! - `reports` - Account transactions report: filter, accumulation, grouping, DTO
//! - `export` - Table, CSV, PDF and JSON output built from the report DTO
//! - `currency` - Enabled currencies and the default reporting currency
//! - `events` - Domain events over a broadcast channel

pub mod currency;
pub mod events;
pub mod export;
pub mod ledger;
pub mod reports;
