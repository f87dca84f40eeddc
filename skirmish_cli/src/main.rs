mod settings;
mod terminal;

use log::{error, warn};
use settings::{Opt, Settings};
use skirmish_lib::board::State;
use skirmish_lib::game::Game;
use skirmish_lib::search::{Negamax, Searcher};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;
use terminal::Command;

fn main() {
   pretty_env_logger::init();
   let opt = Opt::from_args();

   let settings = match Settings::load(&opt) {
      Ok(s) => s,
      Err(e) => {
         error!("{}", e);
         std::process::exit(1);
      }
   };

   let state = match &settings.fen {
      Some(fen) => match State::from_fen(fen) {
         Ok(s) => s,
         Err(e) => {
            error!("Bad FEN {}: {}", fen, e);
            std::process::exit(1);
         }
      },
      None => State::from_start(),
   };

   let game = Game::from_state(
      settings.game_config(),
      state,
      Negamax::new(settings.depth),
      settings.seed,
   );

   if let Err(e) = main_loop(game, &settings) {
      error!("{}", e);
      std::process::exit(1);
   }
}

fn main_loop<S: Searcher>(mut game: Game<S>, settings: &Settings) -> Result<(), String> {
   let (command_tx, command_rx) = mpsc::channel();
   terminal::spawn_reader(command_tx).map_err(|e| format!("couldn't start input thread: {}", e))?;

   let frame_time = Duration::from_secs_f64(1.0 / f64::from(settings.fps));
   let mut dirty = true;

   loop {
      let frame_start = Instant::now();

      loop {
         match command_rx.try_recv() {
            Ok(Command::Game(event)) => {
               game.handle_input(event);
               dirty = true;
            }
            Ok(Command::Invalid(e)) => warn!("{}", e),
            Ok(Command::Quit) | Err(TryRecvError::Disconnected) => return Ok(()),
            Err(TryRecvError::Empty) => break,
         }
      }

      let phase = game.phase();
      let moves_played = game.state().move_log().count();
      game.update();
      if game.phase() != phase || game.state().move_log().count() != moves_played {
         dirty = true;
      }

      for signal in game.drain_signals() {
         terminal::play_signal(signal);
      }

      if let Some(animation) = game.animation().copied() {
         terminal::play_animation(&animation, settings.animation_fps);
         game.finish_animation();
         dirty = true;
      }

      if dirty {
         terminal::draw_game_state(&game).map_err(|e| format!("couldn't draw: {}", e))?;
         dirty = false;
      }

      if let Some(remaining) = frame_time.checked_sub(frame_start.elapsed()) {
         thread::sleep(remaining);
      }
   }
}
