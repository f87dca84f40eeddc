use crate::board::{Color, GameStatus, Location, Move, State};
use crate::input::{InputCollector, Selection};
use crate::messages::{InputEvent, Signal};
use crate::search::Searcher;
use crate::supervisor::{SearchPoll, SearchSupervisor, SearchTask};
use log::{debug, error, info, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Player {
   Human,
   Computer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
   pub white: Player,
   pub black: Player,
   /// Animation steps per square of travel. Zero turns animation off.
   pub frames_per_square: u32,
}

impl Default for GameConfig {
   fn default() -> GameConfig {
      GameConfig {
         white: Player::Human,
         black: Player::Computer,
         frames_per_square: 8,
      }
   }
}

impl GameConfig {
   pub fn player(&self, color: Color) -> Player {
      match color {
         Color::White => self.white,
         Color::Black => self.black,
      }
   }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
   HumanToMove,
   WorkerPending,
   WorkerRunning,
   ApplyingResult,
   Animating,
   GameOver,
}

/// One-shot guard for a terminal signal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Latch {
   Armed,
   Fired,
}

impl Latch {
   /// True exactly once between re-arms
   fn fire(&mut self) -> bool {
      let armed = *self == Latch::Armed;
      *self = Latch::Fired;
      armed
   }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationFrame {
   /// 0.0 at the origin square, 1.0 at the destination
   pub fraction: f32,
   pub row: f32,
   pub col: f32,
}

/// Slide of the last piece moved, in screen rows and columns
#[derive(Clone, Copy, Debug)]
pub struct Animation {
   pub a_move: Move,
   frame_count: u32,
}

impl Animation {
   fn new(a_move: Move, frames_per_square: u32) -> Animation {
      let distance = a_move.origin.distance(a_move.destination) as u32;
      Animation {
         a_move,
         frame_count: (distance * frames_per_square).max(1),
      }
   }

   pub fn frame_count(&self) -> u32 {
      self.frame_count
   }

   /// `frame_count + 1` frames, both ends included
   pub fn frames(&self) -> impl Iterator<Item = AnimationFrame> + '_ {
      let (start_row, start_col) = (self.a_move.origin.row() as f32, self.a_move.origin.col() as f32);
      let d_r = self.a_move.destination.row() as f32 - start_row;
      let d_c = self.a_move.destination.col() as f32 - start_col;
      (0..=self.frame_count).map(move |frame| {
         let fraction = frame as f32 / self.frame_count as f32;
         AnimationFrame {
            fraction,
            row: start_row + d_r * fraction,
            col: start_col + d_c * fraction,
         }
      })
   }
}

/// Drives one game: whose turn it is, turning clicks into moves, running the
/// computer's search in the background, and noticing when the game ends.
///
/// The presentation layer calls `handle_input` for each event and `update`
/// once per frame, plays back `animation()` when there is one and then calls
/// `finish_animation`.
pub struct Game<S: Searcher> {
   config: GameConfig,
   initial: State,
   state: State,
   legal_moves: Vec<Move>,
   status: GameStatus,
   input: InputCollector,
   supervisor: SearchSupervisor<S>,
   task: Option<SearchTask>,
   phase: Phase,
   move_undone: bool,
   animation: Option<Animation>,
   game_over_latch: Latch,
   draw_latch: Latch,
   signals: Vec<Signal>,
}

impl<S: Searcher> Game<S> {
   pub fn new(config: GameConfig, searcher: S, seed: Option<u64>) -> Game<S> {
      Game::from_state(config, State::from_start(), searcher, seed)
   }

   /// Reset returns to `state` rather than the standard start
   pub fn from_state(config: GameConfig, state: State, searcher: S, seed: Option<u64>) -> Game<S> {
      let legal_moves = state.gen_moves();
      let status = state.status(&legal_moves);
      let mut game = Game {
         config,
         initial: state.clone(),
         state,
         legal_moves,
         status,
         input: InputCollector::default(),
         supervisor: SearchSupervisor::new(searcher, seed),
         task: None,
         phase: Phase::HumanToMove,
         move_undone: false,
         animation: None,
         game_over_latch: Latch::Armed,
         draw_latch: Latch::Armed,
         signals: Vec::new(),
      };
      game.settle();
      game
   }

   pub fn state(&self) -> &State {
      &self.state
   }

   pub fn legal_moves(&self) -> &[Move] {
      &self.legal_moves
   }

   pub fn status(&self) -> GameStatus {
      self.status
   }

   pub fn selection(&self) -> Selection {
      self.input.selection()
   }

   pub fn phase(&self) -> Phase {
      self.phase
   }

   pub fn king_location(&self, color: Color) -> Location {
      self.state.king_location(color)
   }

   pub fn animation(&self) -> Option<&Animation> {
      self.animation.as_ref()
   }

   pub fn live_tasks(&self) -> usize {
      self.supervisor.live_tasks()
   }

   pub fn latches(&self) -> (Latch, Latch) {
      (self.game_over_latch, self.draw_latch)
   }

   pub fn human_turn(&self) -> bool {
      self.config.player(self.state.side_to_move()) == Player::Human
   }

   /// End-of-game banner text while the game is over
   pub fn banner(&self) -> Option<String> {
      if self.phase != Phase::GameOver {
         return None;
      }
      match self.status {
         GameStatus::Checkmate { winner } => Some(format!("{} Wins", winner)),
         GameStatus::Stalemate => Some("Draw".into()),
         GameStatus::Ongoing => None,
      }
   }

   /// Signals fired since the last call
   pub fn drain_signals(&mut self) -> Vec<Signal> {
      std::mem::take(&mut self.signals)
   }

   pub fn handle_input(&mut self, event: InputEvent) {
      match event {
         InputEvent::Click(square) => self.click(square),
         InputEvent::Undo => self.undo(),
         InputEvent::Reset => self.reset(),
      }
   }

   /// One frame's worth of work. Never waits on the search worker.
   pub fn update(&mut self) {
      match self.phase {
         Phase::WorkerPending if !self.move_undone => {
            self.launch_search();
            self.poll_search();
         }
         Phase::WorkerRunning => self.poll_search(),
         Phase::GameOver => {
            self.monitor();
         }
         _ => (),
      }
      self.move_undone = false;
   }

   pub fn finish_animation(&mut self) {
      if self.phase != Phase::Animating {
         return;
      }
      self.animation = None;
      self.settle();
   }

   fn click(&mut self, square: Location) {
      if self.phase == Phase::GameOver || self.phase == Phase::Animating {
         return;
      }
      let human_turn = self.human_turn();
      let candidate = match self.input.click(square, human_turn) {
         Some(c) => c,
         None => return,
      };
      match candidate.resolve(&self.legal_moves) {
         Some(a_move) => {
            self.phase = Phase::ApplyingResult;
            self.apply(a_move, Player::Human);
         }
         None => {
            trace!("{}{} is not a legal move", candidate.origin, candidate.destination);
            self.input.reject(candidate);
         }
      }
   }

   fn launch_search(&mut self) {
      debug_assert!(self.task.is_none());
      let task = self.supervisor.request_move(&self.state.position, &self.legal_moves);
      self.task = Some(task);
      self.phase = Phase::WorkerRunning;
   }

   fn poll_search(&mut self) {
      let task = match self.task.as_mut() {
         Some(t) => t,
         None => {
            self.phase = Phase::WorkerPending;
            return;
         }
      };
      match self.supervisor.poll(task) {
         SearchPoll::Pending => (),
         SearchPoll::Ready(best) => {
            self.task = None;
            match best {
               Some(a_move) => {
                  self.phase = Phase::ApplyingResult;
                  self.apply(a_move, Player::Computer);
               }
               None => {
                  // the rules engine reported an ongoing game with no legal moves
                  error!("no move available for {} although the game is not over", self.state.side_to_move());
                  self.phase = Phase::HumanToMove;
               }
            }
         }
      }
   }

   /// The move sequencer. `a_move` must come from this turn's legal moves.
   /// Only the human's own moves make a sound.
   fn apply(&mut self, a_move: Move, player: Player) {
      info!("{} plays {}", self.state.side_to_move(), a_move);
      if player == Player::Human {
         self.signals.push(if a_move.is_capture() {
            Signal::Capture
         } else {
            Signal::SelfMove
         });
      }
      self.state.apply_move(a_move);
      self.refresh();

      if self.config.frames_per_square > 0 {
         self.animation = Some(Animation::new(a_move, self.config.frames_per_square));
         self.phase = Phase::Animating;
      } else {
         self.settle();
      }
   }

   fn undo(&mut self) {
      self.cancel_search();
      match self.state.undo_move() {
         Some(m) => info!("took back {}", m),
         None => debug!("nothing to undo"),
      }
      self.rewind();
   }

   fn reset(&mut self) {
      self.cancel_search();
      self.state = self.initial.clone();
      info!("new game");
      self.rewind();
   }

   fn cancel_search(&mut self) {
      if let Some(task) = self.task.take() {
         self.supervisor.cancel(task);
      }
   }

   fn rewind(&mut self) {
      self.input.clear();
      self.animation = None;
      self.game_over_latch = Latch::Armed;
      self.draw_latch = Latch::Armed;
      self.move_undone = true;
      self.refresh();
      self.settle();
   }

   fn refresh(&mut self) {
      self.legal_moves = self.state.gen_moves();
      self.status = self.state.status(&self.legal_moves);
   }

   /// After a move lands (or is taken back): end the game or hand over the turn
   fn settle(&mut self) {
      self.phase = if self.monitor() {
         Phase::GameOver
      } else if self.human_turn() {
         Phase::HumanToMove
      } else {
         Phase::WorkerPending
      };
   }

   /// Terminal-state check; fires each signal at most once per game over
   fn monitor(&mut self) -> bool {
      match self.status {
         GameStatus::Checkmate { winner } => {
            if self.state.in_check() && self.game_over_latch.fire() {
               info!("checkmate, {} wins", winner);
               self.signals.push(Signal::GameOver { winner });
            }
         }
         GameStatus::Stalemate => {
            if self.draw_latch.fire() {
               info!("stalemate");
               self.signals.push(Signal::Draw);
            }
         }
         GameStatus::Ongoing => (),
      }
      self.status.is_terminal()
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::board::Position;
   use parking_lot::Mutex;
   use std::sync::atomic::{AtomicBool, Ordering};
   use std::sync::mpsc;
   use std::sync::Arc;
   use std::thread;
   use std::time::{Duration, Instant};

   /// Plays the first legal move
   struct FirstMove;

   impl Searcher for FirstMove {
      fn find_best_move(&self, _: &Position, legal_moves: &[Move], _: &AtomicBool) -> Option<Move> {
         legal_moves.first().copied()
      }
   }

   struct NoMove;

   impl Searcher for NoMove {
      fn find_best_move(&self, _: &Position, _: &[Move], _: &AtomicBool) -> Option<Move> {
         None
      }
   }

   /// Holds the first legal move back until the gate opens
   struct Gated {
      gate: Mutex<mpsc::Receiver<()>>,
      done: Arc<AtomicBool>,
   }

   impl Searcher for Gated {
      fn find_best_move(&self, _: &Position, legal_moves: &[Move], cancelled: &AtomicBool) -> Option<Move> {
         loop {
            if cancelled.load(Ordering::SeqCst) {
               return None;
            }
            match self.gate.lock().recv_timeout(Duration::from_millis(1)) {
               Ok(()) => break,
               Err(mpsc::RecvTimeoutError::Timeout) => continue,
               Err(mpsc::RecvTimeoutError::Disconnected) => return None,
            }
         }
         self.done.store(true, Ordering::SeqCst);
         legal_moves.first().copied()
      }
   }

   fn gated() -> (Gated, mpsc::Sender<()>, Arc<AtomicBool>) {
      let (tx, rx) = mpsc::channel();
      let done = Arc::new(AtomicBool::new(false));
      let searcher = Gated {
         gate: Mutex::new(rx),
         done: Arc::clone(&done),
      };
      (searcher, tx, done)
   }

   fn loc(s: &str) -> Location {
      s.parse().unwrap()
   }

   fn hotseat() -> GameConfig {
      GameConfig {
         white: Player::Human,
         black: Player::Human,
         frames_per_square: 8,
      }
   }

   fn play<S: Searcher>(game: &mut Game<S>, uci: &str) {
      game.handle_input(InputEvent::Click(loc(&uci[..2])));
      game.handle_input(InputEvent::Click(loc(&uci[2..4])));
      game.finish_animation();
   }

   /// Runs frames until `done` holds, as the frame loop would
   fn run_until<S: Searcher>(game: &mut Game<S>, done: impl Fn(&Game<S>) -> bool) {
      let start = Instant::now();
      while !done(&*game) {
         assert!(start.elapsed() < Duration::from_secs(30), "game stuck in {:?}", game.phase());
         game.update();
         assert!(game.live_tasks() <= 1);
         thread::sleep(Duration::from_millis(1));
      }
   }

   #[test]
   fn legal_gestures_match_direct_application() {
      let start = State::from_start();
      for a_move in start.gen_moves() {
         let mut game = Game::new(hotseat(), FirstMove, Some(0));
         game.handle_input(InputEvent::Click(a_move.origin));
         game.handle_input(InputEvent::Click(a_move.destination));

         let mut expected = start.clone();
         expected.apply_move(a_move);
         assert_eq!(game.state(), &expected);
         assert_eq!(game.selection(), Selection::Empty);
      }
   }

   #[test]
   fn illegal_gestures_leave_position_alone() {
      let start = State::from_start();
      let legal = start.gen_moves();
      for a in 0..64 {
         for b in (0..64).filter(|b| *b != a) {
            let (a, b) = (Location::from_index(a).unwrap(), Location::from_index(b).unwrap());
            if legal.iter().any(|m| m.origin == a && m.destination == b) {
               continue;
            }
            let mut game = Game::new(hotseat(), FirstMove, Some(0));
            game.handle_input(InputEvent::Click(a));
            game.handle_input(InputEvent::Click(b));
            assert_eq!(game.state(), &start);
            assert_eq!(game.selection(), Selection::One(b));
         }
      }
   }

   #[test]
   fn rejected_gesture_can_continue_from_second_square() {
      let mut game = Game::new(hotseat(), FirstMove, Some(0));
      game.handle_input(InputEvent::Click(loc("e1")));
      game.handle_input(InputEvent::Click(loc("e2")));
      assert_eq!(game.selection(), Selection::One(loc("e2")));
      game.handle_input(InputEvent::Click(loc("e4")));
      assert_eq!(game.state().last_move().map(|m| m.to_string()), Some("e2e4".to_string()));
   }

   #[test]
   fn pawn_push_against_computer() {
      let mut game = Game::new(GameConfig::default(), FirstMove, Some(0));
      assert_eq!(game.phase(), Phase::HumanToMove);
      game.handle_input(InputEvent::Click(loc("e2")));
      game.handle_input(InputEvent::Click(loc("e4")));

      let signals = game.drain_signals();
      assert!(signals.contains(&Signal::SelfMove));
      assert!(!signals.contains(&Signal::Capture));
      assert_eq!(game.state().side_to_move(), Color::Black);
      assert_eq!(game.legal_moves().len(), 20);
      assert!(game.legal_moves().iter().all(|m| m.moved.color == Color::Black));

      assert_eq!(game.phase(), Phase::Animating);
      let animation = game.animation().copied().unwrap();
      assert_eq!(animation.frame_count(), 16);
      let frames: Vec<_> = animation.frames().collect();
      assert_eq!(frames.len(), 17);
      assert_eq!(frames[0].row, 6.0);
      assert_eq!(frames[16].row, 4.0);
      assert_eq!(frames[16].fraction, 1.0);

      game.finish_animation();
      assert_eq!(game.phase(), Phase::WorkerPending);
      run_until(&mut game, |g| g.phase() == Phase::Animating);
      game.finish_animation();
      assert_eq!(game.phase(), Phase::HumanToMove);
      assert_eq!(game.state().move_log().count(), 2);
   }

   #[test]
   fn capture_fires_capture_signal() {
      let mut game = Game::new(hotseat(), FirstMove, Some(0));
      play(&mut game, "e2e4");
      play(&mut game, "d7d5");
      game.drain_signals();
      play(&mut game, "e4d5");
      assert_eq!(game.drain_signals(), vec![Signal::Capture]);
   }

   #[test]
   fn empty_search_result_plays_a_legal_move() {
      let mut game = Game::new(GameConfig::default(), NoMove, Some(9));
      play(&mut game, "e2e4");
      let replies = game.legal_moves().to_vec();
      run_until(&mut game, |g| g.phase() == Phase::Animating);
      let played = *game.state().last_move().unwrap();
      assert!(replies.contains(&played));
      assert_eq!(played.moved.color, Color::Black);
      game.finish_animation();
      assert_eq!(game.phase(), Phase::HumanToMove);
   }

   #[test]
   fn undo_while_worker_running_cancels_search() {
      let (searcher, _gate, _) = gated();
      let mut game = Game::new(GameConfig::default(), searcher, Some(0));
      play(&mut game, "e2e4");
      game.update();
      assert_eq!(game.phase(), Phase::WorkerRunning);
      assert_eq!(game.live_tasks(), 1);

      game.handle_input(InputEvent::Undo);
      assert_eq!(game.phase(), Phase::HumanToMove);
      assert_eq!(game.live_tasks(), 0);
      assert_eq!(game.latches(), (Latch::Armed, Latch::Armed));
      assert_eq!(game.state(), &State::from_start());
   }

   #[test]
   fn cancelled_result_is_never_applied() {
      let (searcher, gate, done) = gated();
      let config = GameConfig {
         white: Player::Computer,
         black: Player::Human,
         frames_per_square: 0,
      };
      let mut game = Game::new(config, searcher, Some(0));
      assert_eq!(game.phase(), Phase::WorkerPending);
      game.update();
      assert_eq!(game.phase(), Phase::WorkerRunning);

      // let the worker produce its move, but never poll for it
      gate.send(()).unwrap();
      let start = Instant::now();
      while !done.load(Ordering::SeqCst) {
         assert!(start.elapsed() < Duration::from_secs(30));
         thread::sleep(Duration::from_millis(1));
      }
      thread::sleep(Duration::from_millis(20));

      game.handle_input(InputEvent::Reset);
      assert_eq!(game.live_tasks(), 0);
      // the reset frame holds the computer back
      game.update();
      assert_eq!(game.phase(), Phase::WorkerPending);
      assert_eq!(game.state(), &State::from_start());

      // a fresh search starts, and the stale result does not show up in its place
      game.update();
      assert_eq!(game.phase(), Phase::WorkerRunning);
      for _ in 0..20 {
         game.update();
         thread::sleep(Duration::from_millis(1));
      }
      assert_eq!(game.phase(), Phase::WorkerRunning);
      assert_eq!(game.state(), &State::from_start());
   }

   #[test]
   fn checkmate_fires_once_and_rearms_on_undo() {
      let mut game = Game::new(hotseat(), FirstMove, Some(0));
      play(&mut game, "f2f3");
      play(&mut game, "e7e5");
      play(&mut game, "g2g4");
      game.drain_signals();
      play(&mut game, "d8h4");

      assert_eq!(game.phase(), Phase::GameOver);
      let signals = game.drain_signals();
      assert_eq!(
         signals.iter().filter(|s| **s == Signal::GameOver { winner: Color::Black }).count(),
         1
      );
      assert_eq!(game.banner(), Some("Black Wins".to_string()));

      for _ in 0..5 {
         game.update();
      }
      assert!(game.drain_signals().is_empty());

      // clicks are ignored once the game is over
      game.handle_input(InputEvent::Click(loc("a2")));
      game.handle_input(InputEvent::Click(loc("a3")));
      assert_eq!(game.phase(), Phase::GameOver);
      assert_eq!(game.selection(), Selection::Empty);

      game.handle_input(InputEvent::Undo);
      assert_eq!(game.phase(), Phase::HumanToMove);
      assert_eq!(game.banner(), None);
      play(&mut game, "d8h4");
      assert_eq!(game.phase(), Phase::GameOver);
      assert!(game.drain_signals().contains(&Signal::GameOver { winner: Color::Black }));
   }

   #[test]
   fn stalemate_fires_draw_once() {
      let state = State::from_fen("k7/8/8/1Q6/8/8/8/7K w - - 0 1").unwrap();
      let mut game = Game::from_state(hotseat(), state, FirstMove, Some(0));
      play(&mut game, "b5b6");
      assert_eq!(game.phase(), Phase::GameOver);
      assert_eq!(game.banner(), Some("Draw".to_string()));
      for _ in 0..5 {
         game.update();
      }
      let signals = game.drain_signals();
      assert_eq!(signals.iter().filter(|s| **s == Signal::Draw).count(), 1);

      game.handle_input(InputEvent::Reset);
      assert_eq!(game.phase(), Phase::HumanToMove);
      assert_eq!(game.latches(), (Latch::Armed, Latch::Armed));
   }

   #[test]
   fn computer_against_computer_keeps_one_task() {
      let config = GameConfig {
         white: Player::Computer,
         black: Player::Computer,
         frames_per_square: 0,
      };
      let mut game = Game::new(config, FirstMove, Some(0));
      run_until(&mut game, |g| g.state().move_log().count() >= 6 || g.phase() == Phase::GameOver);
      game.update();
      assert!(game.live_tasks() <= 1);
      game.handle_input(InputEvent::Reset);
      assert_eq!(game.live_tasks(), 0);
   }

   #[test]
   fn reset_restores_the_starting_position() {
      let mut game = Game::new(hotseat(), FirstMove, Some(0));
      play(&mut game, "e2e4");
      game.handle_input(InputEvent::Click(loc("d7")));
      game.handle_input(InputEvent::Reset);
      assert_eq!(game.state(), &State::from_start());
      assert_eq!(game.selection(), Selection::Empty);
      assert_eq!(game.legal_moves().len(), 20);
      assert!(game.animation().is_none());
   }

   #[test]
   fn computer_moves_are_silent() {
      let config = GameConfig {
         white: Player::Computer,
         black: Player::Human,
         frames_per_square: 0,
      };
      let mut game = Game::new(config, FirstMove, Some(0));
      run_until(&mut game, |g| g.state().move_log().count() == 1);
      assert!(game.drain_signals().is_empty());
      assert_eq!(game.phase(), Phase::HumanToMove);

      let reply = game.legal_moves()[0];
      game.handle_input(InputEvent::Click(reply.origin));
      game.handle_input(InputEvent::Click(reply.destination));
      assert_eq!(game.drain_signals(), vec![Signal::SelfMove]);
   }

   #[test]
   fn clicks_are_ignored_while_animating() {
      let mut game = Game::new(hotseat(), FirstMove, Some(0));
      game.handle_input(InputEvent::Click(loc("e2")));
      game.handle_input(InputEvent::Click(loc("e4")));
      assert_eq!(game.phase(), Phase::Animating);

      game.handle_input(InputEvent::Click(loc("e7")));
      game.handle_input(InputEvent::Click(loc("e5")));
      assert_eq!(game.selection(), Selection::Empty);
      assert_eq!(game.state().move_log().count(), 1);
      assert_eq!(game.phase(), Phase::Animating);

      game.finish_animation();
      assert_eq!(game.phase(), Phase::HumanToMove);
      play(&mut game, "e7e5");
      assert_eq!(game.state().move_log().count(), 2);
   }

   #[test]
   fn undo_and_reset_during_animation_rewind() {
      let mut game = Game::new(hotseat(), FirstMove, Some(0));
      play(&mut game, "f2f3");
      play(&mut game, "e7e5");
      play(&mut game, "g2g4");
      play(&mut game, "d8h4");
      assert_eq!(game.latches(), (Latch::Fired, Latch::Armed));

      game.handle_input(InputEvent::Undo);
      assert_eq!(game.latches(), (Latch::Armed, Latch::Armed));
      game.handle_input(InputEvent::Click(loc("d8")));
      game.handle_input(InputEvent::Click(loc("h4")));
      assert_eq!(game.phase(), Phase::Animating);

      game.handle_input(InputEvent::Undo);
      assert!(game.animation().is_none());
      assert_eq!(game.phase(), Phase::HumanToMove);
      assert_eq!(game.state().move_log().count(), 3);
      assert_eq!(game.latches(), (Latch::Armed, Latch::Armed));
      // nothing left to finish
      game.finish_animation();
      assert_eq!(game.phase(), Phase::HumanToMove);

      game.handle_input(InputEvent::Click(loc("d8")));
      game.handle_input(InputEvent::Click(loc("h4")));
      assert_eq!(game.phase(), Phase::Animating);
      game.handle_input(InputEvent::Reset);
      assert!(game.animation().is_none());
      assert_eq!(game.phase(), Phase::HumanToMove);
      assert_eq!(game.state(), &State::from_start());
      assert_eq!(game.latches(), (Latch::Armed, Latch::Armed));
   }
}
