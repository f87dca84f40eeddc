use serde::Deserialize;
use skirmish_lib::game::{GameConfig, Player};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use structopt::StructOpt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
   Human,
   Computer,
}

impl FromStr for PlayerKind {
   type Err = String;

   fn from_str(s: &str) -> Result<PlayerKind, String> {
      match s {
         "human" => Ok(PlayerKind::Human),
         "computer" | "ai" => Ok(PlayerKind::Computer),
         _ => Err(format!("Expected human or computer, got {}", s)),
      }
   }
}

impl From<PlayerKind> for Player {
   fn from(kind: PlayerKind) -> Player {
      match kind {
         PlayerKind::Human => Player::Human,
         PlayerKind::Computer => Player::Computer,
      }
   }
}

/// Play chess in the terminal, against the computer or a friend
#[derive(StructOpt, Debug, Default)]
#[structopt(name = "skirmish")]
pub struct Opt {
   /// Who plays white: human or computer
   #[structopt(long = "white")]
   pub white: Option<PlayerKind>,
   /// Who plays black: human or computer
   #[structopt(long = "black")]
   pub black: Option<PlayerKind>,
   /// Search depth of the computer player
   #[structopt(short = "d", long = "depth")]
   pub depth: Option<u64>,
   /// Frames per second of the main loop
   #[structopt(long = "fps")]
   pub fps: Option<u32>,
   /// Animation frames per square a piece travels, 0 disables animation
   #[structopt(long = "frames-per-square")]
   pub frames_per_square: Option<u32>,
   /// Start from this FEN instead of the standard position
   #[structopt(long = "fen")]
   pub fen: Option<String>,
   /// Seed for the fallback move picker
   #[structopt(long = "seed")]
   pub seed: Option<u64>,
   /// JSON settings file; flags take precedence over it
   #[structopt(short = "c", long = "config", parse(from_os_str))]
   pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
   pub white: PlayerKind,
   pub black: PlayerKind,
   pub depth: u64,
   pub fps: u32,
   pub animation_fps: u32,
   pub frames_per_square: u32,
   pub fen: Option<String>,
   pub seed: Option<u64>,
}

impl Default for Settings {
   fn default() -> Settings {
      Settings {
         white: PlayerKind::Human,
         black: PlayerKind::Computer,
         depth: 3,
         fps: 15,
         animation_fps: 100,
         frames_per_square: 8,
         fen: None,
         seed: None,
      }
   }
}

impl Settings {
   pub fn load(opt: &Opt) -> Result<Settings, String> {
      let base = match &opt.config {
         Some(path) => Settings::from_file(path)?,
         None => Settings::default(),
      };
      base.with_overrides(opt).validated()
   }

   fn from_file(path: &Path) -> Result<Settings, String> {
      let text = std::fs::read_to_string(path)
         .map_err(|e| format!("couldn't read settings file {}: {}", path.display(), e))?;
      Settings::from_json(&text).map_err(|e| format!("{}: {}", path.display(), e))
   }

   fn from_json(text: &str) -> Result<Settings, String> {
      serde_json::from_str(text).map_err(|e| format!("malformed settings: {}", e))
   }

   fn with_overrides(mut self, opt: &Opt) -> Settings {
      if let Some(white) = opt.white {
         self.white = white;
      }
      if let Some(black) = opt.black {
         self.black = black;
      }
      if let Some(depth) = opt.depth {
         self.depth = depth;
      }
      if let Some(fps) = opt.fps {
         self.fps = fps;
      }
      if let Some(frames_per_square) = opt.frames_per_square {
         self.frames_per_square = frames_per_square;
      }
      if opt.fen.is_some() {
         self.fen = opt.fen.clone();
      }
      if opt.seed.is_some() {
         self.seed = opt.seed;
      }
      self
   }

   fn validated(self) -> Result<Settings, String> {
      if self.fps == 0 || self.animation_fps == 0 {
         return Err("frame rates must be at least 1".into());
      }
      if self.depth == 0 {
         return Err("search depth must be at least 1".into());
      }
      Ok(self)
   }

   pub fn game_config(&self) -> GameConfig {
      GameConfig {
         white: self.white.into(),
         black: self.black.into(),
         frames_per_square: self.frames_per_square,
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn defaults_match_human_against_computer() {
      let settings = Settings::load(&Opt::default()).unwrap();
      assert_eq!(settings, Settings::default());
      let config = settings.game_config();
      assert_eq!(config.white, Player::Human);
      assert_eq!(config.black, Player::Computer);
      assert_eq!(config.frames_per_square, 8);
   }

   #[test]
   fn partial_json_keeps_defaults() {
      let settings = Settings::from_json(r#"{ "black": "human", "depth": 2 }"#).unwrap();
      assert_eq!(settings.black, PlayerKind::Human);
      assert_eq!(settings.depth, 2);
      assert_eq!(settings.fps, 15);
   }

   #[test]
   fn unknown_json_fields_are_rejected() {
      assert!(Settings::from_json(r#"{ "colour": "blue" }"#).is_err());
   }

   #[test]
   fn flags_override_file() {
      let opt = Opt {
         white: Some(PlayerKind::Computer),
         depth: Some(4),
         ..Opt::default()
      };
      let settings = Settings::from_json(r#"{ "white": "human", "depth": 2, "fps": 30 }"#)
         .unwrap()
         .with_overrides(&opt);
      assert_eq!(settings.white, PlayerKind::Computer);
      assert_eq!(settings.depth, 4);
      assert_eq!(settings.fps, 30);
   }

   #[test]
   fn zero_fps_is_invalid() {
      let opt = Opt {
         fps: Some(0),
         ..Opt::default()
      };
      assert!(Settings::load(&opt).is_err());
   }

   #[test]
   fn player_kind_parses() {
      assert_eq!("human".parse(), Ok(PlayerKind::Human));
      assert_eq!("computer".parse(), Ok(PlayerKind::Computer));
      assert!("robot".parse::<PlayerKind>().is_err());
   }
}
