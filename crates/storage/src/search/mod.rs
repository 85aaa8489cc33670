mod fuzzy;

pub use fuzzy::{SearchIndex, SearchResult};
