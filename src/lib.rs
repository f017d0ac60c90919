pub mod breeding;
pub mod caching;
pub mod constraints;
pub mod decomposition;
pub mod error;
pub mod evolution;
pub mod generator;
pub mod genome;
pub mod io;
pub mod metrics;
pub mod nsga;
pub mod rng;
pub mod selection;
pub mod timetable;

// Re-export commonly used types for convenience
pub use error::{GeneticError, OptionExt, Result, ResultExt};
pub use evolution::{EvolutionLauncher, EvolutionOptions};
pub use genome::Genome;
pub use nsga::Nsga2;
pub use rng::RandomNumberGenerator;
pub use timetable::{Chromosome, Configuration, Course, Room, SessionCode};
