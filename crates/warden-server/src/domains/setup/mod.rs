mod seeder;

pub use seeder::{SeedError, SeedOutcome, SeedState, Seeder};
