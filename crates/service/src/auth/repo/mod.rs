pub mod seaorm;

pub use seaorm::SeaOrmUserDirectory;
