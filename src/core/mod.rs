pub mod balance;
pub mod error;
pub mod expense;
pub mod group;
pub mod participant;
