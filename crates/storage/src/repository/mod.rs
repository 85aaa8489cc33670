mod rankings;

pub use rankings::RankingStore;
