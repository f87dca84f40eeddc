use crate::board::{Color, Location, Move};
use std::fmt;

// Intraprocess Communication Messages

// Presentation to Game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
   Click(Location), // Pointer press already mapped to a board square
   Undo,
   Reset,
}

// Game to Presentation, each fired once
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
   Capture,
   SelfMove,
   Draw,
   GameOver { winner: Color },
}

impl fmt::Display for Signal {
   fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
      match self {
         Signal::Capture => write!(f, "capture"),
         Signal::SelfMove => write!(f, "self-move"),
         Signal::Draw => write!(f, "draw"),
         Signal::GameOver { .. } => write!(f, "game-over"),
      }
   }
}

// Search worker to Supervisor
pub(crate) enum WorkerMessage {
   BestMove(Option<Move>),
}
