pub mod age_rank;
pub mod history;
pub mod team;
