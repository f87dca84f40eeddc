use fxhash::FxHashSet;
use log::{info, warn};
use skirmish_lib::board::{Color, Location};
use skirmish_lib::game::{Animation, AnimationFrame, Game, Phase};
use skirmish_lib::messages::{InputEvent, Signal};
use skirmish_lib::search::Searcher;
use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const MOVES_PER_ROW: usize = 3;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
   Game(InputEvent),
   Quit,
   Invalid(String),
}

/// `e2` clicks a square, `e2e4` clicks two, `z` undoes, `r` resets, `q` quits
pub fn parse_line(line: &str) -> Vec<Command> {
   let mut commands = Vec::new();
   for word in line.split_whitespace() {
      match word {
         "z" | "undo" => commands.push(Command::Game(InputEvent::Undo)),
         "r" | "reset" => commands.push(Command::Game(InputEvent::Reset)),
         "q" | "quit" | "exit" => commands.push(Command::Quit),
         _ if word.is_ascii() && (word.len() == 2 || word.len() == 4) => {
            let squares: Result<Vec<Location>, String> = (0..word.len())
               .step_by(2)
               .map(|i| word[i..i + 2].parse::<Location>())
               .collect();
            match squares {
               Ok(squares) => commands.extend(squares.into_iter().map(|s| Command::Game(InputEvent::Click(s)))),
               Err(e) => commands.push(Command::Invalid(e)),
            }
         }
         _ => commands.push(Command::Invalid(format!("unrecognized input {}", word))),
      }
   }
   commands
}

/// Reads stdin on its own thread so the frame loop never blocks on the keyboard
pub fn spawn_reader(sender: mpsc::Sender<Command>) -> io::Result<thread::JoinHandle<()>> {
   thread::Builder::new().name("stdin".into()).spawn(move || {
      let stdin = io::stdin();
      for line in stdin.lock().lines() {
         let line = match line {
            Ok(l) => l,
            Err(e) => {
               warn!("Encountered I/O error reading input: {}", e);
               break;
            }
         };
         for command in parse_line(&line) {
            if sender.send(command).is_err() {
               return;
            }
         }
      }
      // end of input
      let _ = sender.send(Command::Quit);
   })
}

pub fn play_signal(signal: Signal) {
   info!("sound: {}", signal);
   print!("\x07");
   let _ = io::stdout().flush();
}

/// Synchronous sub-loop; owns the terminal until the piece has arrived
pub fn play_animation(animation: &Animation, steps_per_second: u32) {
   let step = Duration::from_secs_f64(1.0 / f64::from(steps_per_second.max(1)));
   let mut out = io::stdout();
   for frame in animation.frames() {
      let _ = write!(out, "\r{}", animation_line(animation, &frame));
      let _ = out.flush();
      thread::sleep(step);
   }
   let _ = writeln!(out);
}

fn animation_line(animation: &Animation, frame: &AnimationFrame) -> String {
   const WIDTH: usize = 20;
   let filled = ((frame.fraction * WIDTH as f32).round() as usize).min(WIDTH);
   let a_move = &animation.a_move;
   // the captured piece stays on its square until the slide ends
   let captured = match a_move.captured {
      Some(piece) if frame.fraction < 1.0 => format!(" takes {} on {}", piece.to_char(), a_move.captured_location()),
      _ => String::new(),
   };
   format!(
      "{} [{}{}] row {:.2} col {:.2}{}",
      a_move,
      "#".repeat(filled),
      " ".repeat(WIDTH - filled),
      frame.row,
      frame.col,
      captured
   )
}

pub fn draw_game_state<S: Searcher>(game: &Game<S>) -> io::Result<()> {
   let stdout = io::stdout();
   let mut out = stdout.lock();
   out.write_all(render(game).as_bytes())?;
   out.flush()
}

fn render<S: Searcher>(game: &Game<S>) -> String {
   let mut buf = render_board(game);
   buf.push_str(&render_move_log(game));
   if let Some(banner) = game.banner() {
      buf.push_str(&format!("\n   *** {} ***\n", banner));
   }
   buf.push_str(&status_line(game));
   buf.push('\n');
   buf
}

fn render_board<S: Searcher>(game: &Game<S>) -> String {
   let state = game.state();
   let selected = game.selection().last();

   // highlight moves from the selected square when it holds a piece of the side to move
   let targets: FxHashSet<Location> = match selected {
      Some(square) if state.position.piece_at(square).map(|p| p.color) == Some(state.side_to_move()) => game
         .legal_moves()
         .iter()
         .filter(|m| m.origin == square)
         .map(|m| m.destination)
         .collect(),
      _ => FxHashSet::default(),
   };
   let checked_king = if state.in_check() {
      Some(game.king_location(state.side_to_move()))
   } else {
      None
   };

   let mut buf = String::new();
   for row in 0..8 {
      buf.push_str(&format!(" {} ", 8 - row));
      for col in 0..8 {
         let square = match Location::from_row_col(row, col) {
            Some(s) => s,
            None => continue,
         };
         let glyph = match state.position.piece_at(square) {
            Some(p) => p.to_char(),
            None if (row + col) % 2 == 0 => '.',
            None => ':',
         };
         let (open, close) = if Some(square) == selected {
            ('[', ']')
         } else if Some(square) == checked_king {
            ('!', '!')
         } else if targets.contains(&square) {
            ('*', ' ')
         } else {
            (' ', ' ')
         };
         buf.push(open);
         buf.push(glyph);
         buf.push(close);
      }
      buf.push('\n');
   }
   buf.push_str("    a  b  c  d  e  f  g  h\n");
   buf
}

fn render_move_log<S: Searcher>(game: &Game<S>) -> String {
   let moves: Vec<String> = game.state().move_log().map(|m| m.to_string()).collect();
   let move_texts: Vec<String> = moves
      .chunks(2)
      .enumerate()
      .map(|(i, pair)| format!("{}.{} ", i + 1, pair.join(" ")))
      .collect();
   let mut buf = String::new();
   for row in move_texts.chunks(MOVES_PER_ROW) {
      buf.push_str("   ");
      buf.push_str(&row.join(" "));
      buf.push('\n');
   }
   buf
}

fn status_line<S: Searcher>(game: &Game<S>) -> String {
   let side = match game.state().side_to_move() {
      Color::White => "White",
      Color::Black => "Black",
   };
   match game.phase() {
      Phase::GameOver => "game over; z to undo, r for a new game, q to quit".to_string(),
      Phase::WorkerPending | Phase::WorkerRunning => format!("{} is thinking...", side),
      _ => format!("{} to move (square, z, r, q)> ", side),
   }
}
