use crate::board::{Location, Move, PromotionTarget};
use smallvec::SmallVec;

/// The human's in-progress two-click gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
   #[default]
   Empty,
   One(Location),
   Two(Location, Location),
}

impl Selection {
   /// The most recently clicked square, if any
   pub fn last(self) -> Option<Location> {
      match self {
         Selection::Empty => None,
         Selection::One(a) => Some(a),
         Selection::Two(_, b) => Some(b),
      }
   }

   /// Clicking the last selected square again deselects everything. A third
   /// click drops the oldest square.
   #[must_use]
   pub fn click(self, square: Location) -> Selection {
      if self.last() == Some(square) {
         return Selection::Empty;
      }
      match self {
         Selection::Empty => Selection::One(square),
         Selection::One(a) => Selection::Two(a, square),
         Selection::Two(_, b) => Selection::Two(b, square),
      }
   }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateMove {
   pub origin: Location,
   pub destination: Location,
}

impl CandidateMove {
   /// Matches the gesture against the legal moves of this turn. A pawn
   /// reaching the last rank becomes a queen.
   pub fn resolve(self, legal_moves: &[Move]) -> Option<Move> {
      let matches: SmallVec<[Move; 4]> = legal_moves
         .iter()
         .filter(|m| m.origin == self.origin && m.destination == self.destination)
         .copied()
         .collect();
      matches
         .iter()
         .find(|m| m.promotion == Some(PromotionTarget::Queen))
         .or_else(|| matches.first())
         .copied()
   }
}

#[derive(Debug, Default)]
pub struct InputCollector {
   selection: Selection,
}

impl InputCollector {
   pub fn selection(&self) -> Selection {
      self.selection
   }

   pub fn clear(&mut self) {
      self.selection = Selection::Empty;
   }

   /// Feeds one click. Once two squares are selected on the human's turn the
   /// gesture is handed back and the selection is emptied.
   pub fn click(&mut self, square: Location, human_turn: bool) -> Option<CandidateMove> {
      self.selection = self.selection.click(square);
      match self.selection {
         Selection::Two(origin, destination) if human_turn => {
            self.selection = Selection::Empty;
            Some(CandidateMove { origin, destination })
         }
         _ => None,
      }
   }

   /// A rejected gesture seeds a new one from its second square
   pub fn reject(&mut self, candidate: CandidateMove) {
      self.selection = Selection::One(candidate.destination);
   }
}
