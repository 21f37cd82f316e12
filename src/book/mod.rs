pub mod record;
pub mod settlement_book;
