pub mod board;
pub mod game;
pub mod input;
pub mod messages;
pub mod search;
pub mod supervisor;
