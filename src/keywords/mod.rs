// Keyword handling: the scanned vocabulary, the sparse scorer, and the
// three fixed category sets used for the relevance decision.

pub mod categories;
pub mod scorer;
pub mod vocabulary;
