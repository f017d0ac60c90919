pub mod evaluation;
pub mod no_selection;
pub mod selection_strategy;
pub mod tournament;

pub use evaluation::EvaluationMethod;
pub use no_selection::NoSelection;
pub use selection_strategy::SelectionStrategy;
pub use tournament::TournamentSelection;
