pub mod settlement;
pub mod verification;
