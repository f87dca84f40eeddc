use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const KNIGHT_OFFSETS: [(i8, i8); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
const KING_OFFSETS: [(i8, i8); 8] = [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

const PROMOTION_TARGETS: [PromotionTarget; 4] = [
   PromotionTarget::Queen,
   PromotionTarget::Rook,
   PromotionTarget::Bishop,
   PromotionTarget::Knight,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
   White,
   Black,
}

impl Color {
   fn as_num(self) -> usize {
      match self {
         Color::White => 0,
         Color::Black => 1,
      }
   }

   /// Rank direction a pawn of this color advances in
   fn forward(self) -> i8 {
      match self {
         Color::White => 1,
         Color::Black => -1,
      }
   }
}

impl std::ops::Not for Color {
   type Output = Color;
   fn not(self) -> Color {
      match self {
         Color::Black => Color::White,
         Color::White => Color::Black,
      }
   }
}

impl fmt::Display for Color {
   fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
      match self {
         Color::White => write!(f, "White"),
         Color::Black => write!(f, "Black"),
      }
   }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Piece {
   Pawn,
   Rook,
   Knight,
   Bishop,
   Queen,
   King,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColoredPiece {
   pub color: Color,
   pub piece: Piece,
}

impl ColoredPiece {
   pub fn new(color: Color, piece: Piece) -> ColoredPiece {
      ColoredPiece { color, piece }
   }

   /// FEN letter, uppercase for white
   pub fn to_char(self) -> char {
      let c = match self.piece {
         Piece::Pawn => 'p',
         Piece::Rook => 'r',
         Piece::Knight => 'n',
         Piece::Bishop => 'b',
         Piece::Queen => 'q',
         Piece::King => 'k',
      };
      match self.color {
         Color::White => c.to_ascii_uppercase(),
         Color::Black => c,
      }
   }

   fn from_char(c: char) -> Option<ColoredPiece> {
      let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
      let piece = match c.to_ascii_lowercase() {
         'p' => Piece::Pawn,
         'r' => Piece::Rook,
         'n' => Piece::Knight,
         'b' => Piece::Bishop,
         'q' => Piece::Queen,
         'k' => Piece::King,
         _ => return None,
      };
      Some(ColoredPiece { color, piece })
   }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PromotionTarget {
   Knight,
   Bishop,
   Rook,
   Queen,
}

impl PromotionTarget {
   fn piece(self) -> Piece {
      match self {
         PromotionTarget::Knight => Piece::Knight,
         PromotionTarget::Bishop => Piece::Bishop,
         PromotionTarget::Rook => Piece::Rook,
         PromotionTarget::Queen => Piece::Queen,
      }
   }
}

impl fmt::Display for PromotionTarget {
   fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
      let display = match self {
         PromotionTarget::Knight => "n",
         PromotionTarget::Bishop => "b",
         PromotionTarget::Rook => "r",
         PromotionTarget::Queen => "q",
      };
      write!(f, "{}", display)
   }
}

impl FromStr for PromotionTarget {
   type Err = String;

   fn from_str(s: &str) -> Result<PromotionTarget, String> {
      match s {
         "n" => Ok(PromotionTarget::Knight),
         "b" => Ok(PromotionTarget::Bishop),
         "r" => Ok(PromotionTarget::Rook),
         "q" => Ok(PromotionTarget::Queen),
         _ => Err(format!("Expected one of ASCII nbrq for promotion target, got {}", s)),
      }
   }
}

/// A square of the board. Index 0 is a1, 7 is h1, 63 is h8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location(u8);

impl Location {
   pub fn from_index(index: u8) -> Option<Location> {
      if index < 64 {
         Some(Location(index))
      } else {
         None
      }
   }

   pub fn from_file_rank(file: u8, rank: u8) -> Option<Location> {
      if file < 8 && rank < 8 {
         Some(Location(rank * 8 + file))
      } else {
         None
      }
   }

   /// Screen coordinates: row 0 is the eighth rank, col 0 is the a-file
   pub fn from_row_col(row: u8, col: u8) -> Option<Location> {
      if row < 8 {
         Location::from_file_rank(col, 7 - row)
      } else {
         None
      }
   }

   pub fn index(self) -> usize {
      self.0 as usize
   }

   pub fn file(self) -> u8 {
      self.0 % 8
   }

   pub fn rank(self) -> u8 {
      self.0 / 8
   }

   pub fn row(self) -> u8 {
      7 - self.rank()
   }

   pub fn col(self) -> u8 {
      self.file()
   }

   /// King-move distance between two squares
   pub fn distance(self, other: Location) -> u8 {
      let df = (self.file() as i8 - other.file() as i8).unsigned_abs();
      let dr = (self.rank() as i8 - other.rank() as i8).unsigned_abs();
      df.max(dr)
   }

   fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Location> {
      let file = self.file() as i8 + file_delta;
      let rank = self.rank() as i8 + rank_delta;
      if (0..8).contains(&file) && (0..8).contains(&rank) {
         Some(Location((rank * 8 + file) as u8))
      } else {
         None
      }
   }
}

impl fmt::Display for Location {
   fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
      write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
   }
}

impl FromStr for Location {
   type Err = String;

   fn from_str(algebraic: &str) -> Result<Location, String> {
      let bytes = algebraic.as_bytes();
      if bytes.len() != 2 {
         return Err(format!("{} not a valid algebraic location; wrong length", algebraic));
      }
      let file = match bytes[0] {
         b'a'..=b'h' => bytes[0] - b'a',
         file => return Err(format!("{} is not a valid algebraic file, expected a..=h", file as char)),
      };
      let rank = match bytes[1] {
         b'1'..=b'8' => bytes[1] - b'1',
         rank => return Err(format!("{} is not a valid algebraic rank, expected 1..=8", rank as char)),
      };
      Ok(Location(rank * 8 + file))
   }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
   Normal,
   DoublePawnPush,
   EnPassant,
   KingsideCastle,
   QueensideCastle,
}

/// A legal transition produced by move generation. Two moves are equal when
/// they share origin, destination and promotion target.
#[derive(Clone, Copy, Debug)]
pub struct Move {
   pub origin: Location,
   pub destination: Location,
   pub promotion: Option<PromotionTarget>,
   pub moved: ColoredPiece,
   pub captured: Option<ColoredPiece>,
   pub kind: MoveKind,
}

impl PartialEq for Move {
   fn eq(&self, other: &Move) -> bool {
      self.origin == other.origin && self.destination == other.destination && self.promotion == other.promotion
   }
}

impl Eq for Move {}

impl Move {
   pub fn is_capture(&self) -> bool {
      self.captured.is_some()
   }

   pub fn is_en_passant(&self) -> bool {
      self.kind == MoveKind::EnPassant
   }

   /// Where the captured piece stood; differs from the destination only for en passant
   pub fn captured_location(&self) -> Location {
      if self.is_en_passant() {
         Location::from_file_rank(self.destination.file(), self.origin.rank()).unwrap_or(self.destination)
      } else {
         self.destination
      }
   }
}

impl fmt::Display for Move {
   fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
      write!(f, "{}{}", self.origin, self.destination)?;
      if let Some(promotion) = self.promotion {
         write!(f, "{}", promotion)?;
      }
      Ok(())
   }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
   pub squares: [Option<ColoredPiece>; 64],
   pub white_kingside_castle: bool,
   pub white_queenside_castle: bool,
   pub black_kingside_castle: bool,
   pub black_queenside_castle: bool,
   pub en_passant_square: Option<Location>,
   pub side_to_move: Color,
   king_locations: [Location; 2],
}

impl Position {
   pub fn piece_at(&self, location: Location) -> Option<ColoredPiece> {
      self.squares[location.index()]
   }

   pub fn king_location(&self, color: Color) -> Location {
      self.king_locations[color.as_num()]
   }

   pub fn in_check(&self, color: Color) -> bool {
      self.square_is_attacked(color, self.king_location(color))
   }

   pub fn square_is_attacked(&self, defender: Color, square: Location) -> bool {
      let attacker = !defender;
      let holds = |location: Option<Location>, pieces: &[Piece]| {
         location
            .and_then(|l| self.piece_at(l))
            .map_or(false, |p| p.color == attacker && pieces.contains(&p.piece))
      };

      // a pawn attacks diagonally forward, so look one rank behind the square from its side
      let back = -attacker.forward();
      if holds(square.offset(1, back), &[Piece::Pawn]) || holds(square.offset(-1, back), &[Piece::Pawn]) {
         return true;
      }

      if KNIGHT_OFFSETS.iter().any(|&(df, dr)| holds(square.offset(df, dr), &[Piece::Knight])) {
         return true;
      }

      if KING_OFFSETS.iter().any(|&(df, dr)| holds(square.offset(df, dr), &[Piece::King])) {
         return true;
      }

      let slides_to = |directions: &[(i8, i8)], pieces: &[Piece]| {
         directions.iter().any(|&(df, dr)| {
            let mut cur = square.offset(df, dr);
            while let Some(l) = cur {
               if let Some(p) = self.piece_at(l) {
                  return p.color == attacker && pieces.contains(&p.piece);
               }
               cur = l.offset(df, dr);
            }
            false
         })
      };

      slides_to(&ROOK_DIRECTIONS, &[Piece::Rook, Piece::Queen])
         || slides_to(&BISHOP_DIRECTIONS, &[Piece::Bishop, Piece::Queen])
   }

   pub fn gen_moves_color(&self, color: Color, do_check_checking: bool) -> Vec<Move> {
      let mut results = Vec::with_capacity(64);
      for index in 0..64 {
         let origin = Location(index);
         let mover = match self.piece_at(origin) {
            Some(p) if p.color == color => p,
            _ => continue,
         };
         match mover.piece {
            Piece::Pawn => pawn_movegen(self, origin, mover, &mut results),
            Piece::Knight => step_movegen(self, origin, mover, &KNIGHT_OFFSETS, &mut results),
            Piece::King => {
               step_movegen(self, origin, mover, &KING_OFFSETS, &mut results);
               castle_movegen(self, origin, mover, &mut results);
            }
            Piece::Rook => slide_movegen(self, origin, mover, &ROOK_DIRECTIONS, &mut results),
            Piece::Bishop => slide_movegen(self, origin, mover, &BISHOP_DIRECTIONS, &mut results),
            Piece::Queen => {
               slide_movegen(self, origin, mover, &ROOK_DIRECTIONS, &mut results);
               slide_movegen(self, origin, mover, &BISHOP_DIRECTIONS, &mut results);
            }
         }
      }

      if do_check_checking {
         results.retain(|x| {
            let mut cb = self.clone();
            cb.apply_move(*x);
            !cb.in_check(color)
         });
      }

      results
   }

   /// Plays a move produced by `gen_moves_color` for this position
   pub fn apply_move(&mut self, a_move: Move) {
      let color = a_move.moved.color;

      self.squares[a_move.origin.index()] = None;
      if a_move.is_capture() {
         self.squares[a_move.captured_location().index()] = None;
      }
      let placed = match a_move.promotion {
         Some(target) => ColoredPiece::new(color, target.piece()),
         None => a_move.moved,
      };
      self.squares[a_move.destination.index()] = Some(placed);

      if a_move.moved.piece == Piece::King {
         self.king_locations[color.as_num()] = a_move.destination;
         match color {
            Color::White => {
               self.white_kingside_castle = false;
               self.white_queenside_castle = false;
            }
            Color::Black => {
               self.black_kingside_castle = false;
               self.black_queenside_castle = false;
            }
         }
         let rank = a_move.origin.rank();
         let rook_hop = match a_move.kind {
            MoveKind::KingsideCastle => Some((7, 5)),
            MoveKind::QueensideCastle => Some((0, 3)),
            _ => None,
         };
         if let Some((from_file, to_file)) = rook_hop {
            let from = Location(rank * 8 + from_file);
            let to = Location(rank * 8 + to_file);
            self.squares[to.index()] = self.squares[from.index()].take();
         }
      }

      // Revoke castling rights if a rook moved or was captured
      for corner in [a_move.origin, a_move.destination] {
         match corner.0 {
            0 => self.white_queenside_castle = false,
            7 => self.white_kingside_castle = false,
            56 => self.black_queenside_castle = false,
            63 => self.black_kingside_castle = false,
            _ => (),
         }
      }

      self.en_passant_square = if a_move.kind == MoveKind::DoublePawnPush {
         a_move.origin.offset(0, color.forward())
      } else {
         None
      };

      self.side_to_move = !self.side_to_move;
   }

   fn castle_rights(&self, color: Color) -> (bool, bool) {
      match color {
         Color::White => (self.white_kingside_castle, self.white_queenside_castle),
         Color::Black => (self.black_kingside_castle, self.black_queenside_castle),
      }
   }
}

fn push_move(
   results: &mut Vec<Move>,
   origin: Location,
   destination: Location,
   moved: ColoredPiece,
   captured: Option<ColoredPiece>,
   kind: MoveKind,
) {
   results.push(Move {
      origin,
      destination,
      promotion: None,
      moved,
      captured,
      kind,
   });
}

fn pawn_movegen(position: &Position, origin: Location, mover: ColoredPiece, results: &mut Vec<Move>) {
   let forward = mover.color.forward();
   let (start_rank, promotion_rank) = match mover.color {
      Color::White => (1, 7),
      Color::Black => (6, 0),
   };

   let mut add = |destination: Location, captured: Option<ColoredPiece>, kind: MoveKind| {
      if destination.rank() == promotion_rank {
         for target in PROMOTION_TARGETS.iter() {
            results.push(Move {
               origin,
               destination,
               promotion: Some(*target),
               moved: mover,
               captured,
               kind,
            });
         }
      } else {
         push_move(results, origin, destination, mover, captured, kind);
      }
   };

   if let Some(one_step) = origin.offset(0, forward) {
      if position.piece_at(one_step).is_none() {
         add(one_step, None, MoveKind::Normal);
         if origin.rank() == start_rank {
            if let Some(two_step) = one_step.offset(0, forward) {
               if position.piece_at(two_step).is_none() {
                  add(two_step, None, MoveKind::DoublePawnPush);
               }
            }
         }
      }
   }

   for file_delta in [-1, 1] {
      let target = match origin.offset(file_delta, forward) {
         Some(t) => t,
         None => continue,
      };
      match position.piece_at(target) {
         Some(p) if p.color != mover.color => add(target, Some(p), MoveKind::Normal),
         None if position.en_passant_square == Some(target) => {
            let victim = ColoredPiece::new(!mover.color, Piece::Pawn);
            add(target, Some(victim), MoveKind::EnPassant);
         }
         _ => (),
      }
   }
}

fn step_movegen(
   position: &Position,
   origin: Location,
   mover: ColoredPiece,
   offsets: &[(i8, i8)],
   results: &mut Vec<Move>,
) {
   for &(df, dr) in offsets {
      if let Some(destination) = origin.offset(df, dr) {
         match position.piece_at(destination) {
            Some(p) if p.color == mover.color => (),
            captured => push_move(results, origin, destination, mover, captured, MoveKind::Normal),
         }
      }
   }
}

fn slide_movegen(
   position: &Position,
   origin: Location,
   mover: ColoredPiece,
   directions: &[(i8, i8)],
   results: &mut Vec<Move>,
) {
   for &(df, dr) in directions {
      let mut ray: SmallVec<[Location; 7]> = SmallVec::new();
      let mut cur = origin.offset(df, dr);
      let mut blocker = None;
      while let Some(l) = cur {
         match position.piece_at(l) {
            None => ray.push(l),
            Some(p) => {
               if p.color != mover.color {
                  blocker = Some((l, p));
               }
               break;
            }
         }
         cur = l.offset(df, dr);
      }
      for destination in ray {
         push_move(results, origin, destination, mover, None, MoveKind::Normal);
      }
      if let Some((destination, captured)) = blocker {
         push_move(results, origin, destination, mover, Some(captured), MoveKind::Normal);
      }
   }
}

fn castle_movegen(position: &Position, origin: Location, mover: ColoredPiece, results: &mut Vec<Move>) {
   let home_rank = match mover.color {
      Color::White => 0,
      Color::Black => 7,
   };
   if origin != Location(home_rank * 8 + 4) {
      return;
   }
   let (kingside, queenside) = position.castle_rights(mover.color);
   if !(kingside || queenside) || position.in_check(mover.color) {
      return;
   }

   let on_rank = |file: u8| Location(home_rank * 8 + file);
   let empty = |files: &[u8]| files.iter().all(|f| position.piece_at(on_rank(*f)).is_none());
   let safe = |files: &[u8]| files.iter().all(|f| !position.square_is_attacked(mover.color, on_rank(*f)));
   let own_rook = |file: u8| position.piece_at(on_rank(file)) == Some(ColoredPiece::new(mover.color, Piece::Rook));

   if kingside && own_rook(7) && empty(&[5, 6]) && safe(&[5, 6]) {
      push_move(results, origin, on_rank(6), mover, None, MoveKind::KingsideCastle);
   }
   if queenside && own_rook(0) && empty(&[1, 2, 3]) && safe(&[2, 3]) {
      push_move(results, origin, on_rank(2), mover, None, MoveKind::QueensideCastle);
   }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct HistoryEntry {
   position: Position,
   halfmove_clock: u64,
   fullmove_number: u64,
   applied: Move,
}

/// A game in progress: the live position plus everything needed to take moves back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
   pub position: Position,
   pub halfmove_clock: u64,
   pub fullmove_number: u64,
   history: Vec<HistoryEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
   Ongoing,
   Checkmate { winner: Color },
   Stalemate,
}

impl GameStatus {
   pub fn is_terminal(self) -> bool {
      self != GameStatus::Ongoing
   }
}

impl State {
   #[cfg(test)]
   pub fn from_moves(moves: &str) -> Result<State, String> {
      let mut state = State::from_start();
      for a_str_move in moves.split_whitespace() {
         let a_move = state.parse_move(a_str_move)?;
         state.apply_move(a_move);
      }
      Ok(state)
   }

   pub fn from_start() -> State {
      match State::from_fen(START_FEN) {
         Ok(state) => state,
         Err(e) => unreachable!("start position failed to parse: {}", e),
      }
   }

   pub fn side_to_move(&self) -> Color {
      self.position.side_to_move
   }

   pub fn king_location(&self, color: Color) -> Location {
      self.position.king_location(color)
   }

   pub fn in_check(&self) -> bool {
      self.position.in_check(self.position.side_to_move)
   }

   pub fn gen_moves(&self) -> Vec<Move> {
      self.position.gen_moves_color(self.position.side_to_move, true)
   }

   /// Finds the legal move written in UCI notation (e.g. `e2e4`, `a7a8q`)
   pub fn parse_move(&self, uci: &str) -> Result<Move, String> {
      if !uci.is_ascii() || uci.len() < 4 || uci.len() > 5 {
         return Err(format!(
            "A full move has to be 4-5 bytes long, got a move ({}) that was {} bytes long",
            uci,
            uci.len()
         ));
      }
      let origin: Location = uci[..2].parse()?;
      let destination: Location = uci[2..4].parse()?;
      let promotion = match uci.get(4..5) {
         Some(p) => Some(p.parse::<PromotionTarget>()?),
         None => None,
      };
      self
         .gen_moves()
         .into_iter()
         .find(|m| m.origin == origin && m.destination == destination && m.promotion == promotion)
         .ok_or_else(|| format!("{} is not a legal move in this position", uci))
   }

   pub fn apply_move(&mut self, a_move: Move) {
      self.history.push(HistoryEntry {
         position: self.position.clone(),
         halfmove_clock: self.halfmove_clock,
         fullmove_number: self.fullmove_number,
         applied: a_move,
      });

      if a_move.is_capture() || a_move.moved.piece == Piece::Pawn {
         self.halfmove_clock = 0;
      } else {
         self.halfmove_clock += 1;
      }
      if a_move.moved.color == Color::Black {
         self.fullmove_number += 1;
      }
      self.position.apply_move(a_move);
   }

   /// Takes back the last move, returning it. Does nothing at the root of the game.
   pub fn undo_move(&mut self) -> Option<Move> {
      let entry = self.history.pop()?;
      self.position = entry.position;
      self.halfmove_clock = entry.halfmove_clock;
      self.fullmove_number = entry.fullmove_number;
      Some(entry.applied)
   }

   pub fn move_log(&self) -> impl Iterator<Item = &Move> + '_ {
      self.history.iter().map(|e| &e.applied)
   }

   pub fn last_move(&self) -> Option<&Move> {
      self.history.last().map(|e| &e.applied)
   }

   pub fn status(&self, moves: &[Move]) -> GameStatus {
      if !moves.is_empty() {
         return GameStatus::Ongoing;
      }
      if self.in_check() {
         GameStatus::Checkmate {
            winner: !self.position.side_to_move,
         }
      } else {
         GameStatus::Stalemate
      }
   }

   pub fn from_fen(fen: &str) -> Result<State, String> {
      let fen_sections: Vec<&str> = fen.split_whitespace().collect();
      if fen_sections.len() != 6 && fen_sections.len() != 4 {
         return Err(format!(
            "malformed FEN; expected 4 or 6 whitespace delimited sections, found {}",
            fen_sections.len()
         ));
      }

      let ranks: Vec<&str> = fen_sections[0].split('/').collect();
      if ranks.len() != 8 {
         return Err(format!("malformed FEN; expected 8 ranks, found {}", ranks.len()));
      }

      let mut squares = [None; 64];
      let mut kings: [Option<Location>; 2] = [None, None];
      for (i, rank_text) in ranks.iter().enumerate() {
         let rank = 7 - i as u8;
         let mut file: u8 = 0;
         for c in rank_text.chars() {
            if let Some(skip) = c.to_digit(10) {
               if !(1..=8).contains(&skip) {
                  return Err(format!("malformed FEN; bad empty square count {} on rank {}", c, rank + 1));
               }
               file += skip as u8;
               continue;
            }
            let piece = ColoredPiece::from_char(c).ok_or_else(|| {
               format!(
                  "malformed FEN; got unexpected character {} during piece placement, expecting one of pbnrqkPBNRQK12345678/",
                  c
               )
            })?;
            let location = Location::from_file_rank(file, rank)
               .ok_or_else(|| format!("malformed FEN; too many squares on rank {}", rank + 1))?;
            if piece.piece == Piece::King {
               if kings[piece.color.as_num()].is_some() {
                  return Err(format!("malformed FEN; more than one {} king", piece.color));
               }
               kings[piece.color.as_num()] = Some(location);
            }
            squares[location.index()] = Some(piece);
            file += 1;
         }
         if file != 8 {
            return Err(format!(
               "malformed FEN; got to end of rank {} without all squares in rank accounted for",
               rank + 1
            ));
         }
      }

      let king_locations = match kings {
         [Some(white), Some(black)] => [white, black],
         _ => return Err("malformed FEN; each side needs exactly one king".into()),
      };

      let side_to_move = match fen_sections[1] {
         "w" => Color::White,
         "b" => Color::Black,
         other => {
            return Err(format!(
               "malformed FEN; got unexpected {} parsing player to move. Expecting one of wb",
               other
            ));
         }
      };

      let castling = fen_sections[2];
      let mut rights = [false; 4];
      if castling != "-" {
         for c in castling.chars() {
            let slot = match c {
               'K' => 0,
               'Q' => 1,
               'k' => 2,
               'q' => 3,
               _ => {
                  return Err(format!(
                     "malformed FEN; found {} when parsing castling rights. Expected one of KQkq",
                     c
                  ));
               }
            };
            if rights[slot] {
               return Err(format!("malformed FEN; encountered castling right {} twice", c));
            }
            rights[slot] = true;
         }
      }

      let en_passant_square = match fen_sections[3] {
         "-" => None,
         algebraic => Some(
            algebraic
               .parse::<Location>()
               .map_err(|e| format!("malformed FEN; en passant square was not valid algebraic notation: {}", e))?,
         ),
      };

      let (halfmove_clock, fullmove_number) = if fen_sections.len() == 6 {
         let halfmove_clock = fen_sections[4].parse::<u64>().map_err(|e| {
            format!(
               "malformed FEN; halfmove clock value {} couldn't be parsed as a number: {}",
               fen_sections[4], e
            )
         })?;
         let fullmove_number = fen_sections[5].parse::<u64>().map_err(|e| {
            format!(
               "malformed FEN; fullmove number {} couldn't be parsed as a number: {}",
               fen_sections[5], e
            )
         })?;
         (halfmove_clock, fullmove_number)
      } else {
         (0, 1)
      };

      Ok(State {
         position: Position {
            squares,
            white_kingside_castle: rights[0],
            white_queenside_castle: rights[1],
            black_kingside_castle: rights[2],
            black_queenside_castle: rights[3],
            en_passant_square,
            side_to_move,
            king_locations,
         },
         halfmove_clock,
         fullmove_number,
         history: Vec::new(),
      })
   }
}
