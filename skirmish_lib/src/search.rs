use crate::board::{Color, Move, Piece, Position};
use log::trace;
use noisy_float::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

const MATE_SCORE: f64 = 10000.0;

/// Something that can pick a move for the side to move. Runs on a worker
/// thread against a private copy of the position, and should give up soon
/// after `cancelled` becomes true.
pub trait Searcher: Send + Sync + 'static {
   fn find_best_move(&self, position: &Position, legal_moves: &[Move], cancelled: &AtomicBool) -> Option<Move>;
}

/// Fixed depth negamax with alpha-beta pruning. Root moves are searched in parallel.
#[derive(Clone, Copy, Debug)]
pub struct Negamax {
   pub depth: u64,
}

impl Negamax {
   pub fn new(depth: u64) -> Negamax {
      Negamax { depth: depth.max(1) }
   }
}

impl Searcher for Negamax {
   fn find_best_move(&self, position: &Position, legal_moves: &[Move], cancelled: &AtomicBool) -> Option<Move> {
      search(self.depth, position, legal_moves, cancelled).1
   }
}

pub fn find_random_move<R: Rng + ?Sized>(legal_moves: &[Move], rng: &mut R) -> Option<Move> {
   legal_moves.choose(rng).copied()
}

fn search(depth: u64, position: &Position, legal_moves: &[Move], cancelled: &AtomicBool) -> (f64, Option<Move>) {
   let search_time_start = Instant::now();
   if legal_moves.is_empty() {
      return (0.0, None);
   }
   let scores: Vec<_> = legal_moves
      .par_iter()
      .map(|a_move| {
         let mut new_position = position.clone();
         new_position.apply_move(*a_move);
         let mut ne = 0;
         let mut ng = 0;
         let score = -nega_max(
            depth.saturating_sub(1),
            1,
            &new_position,
            std::f64::NEG_INFINITY,
            std::f64::INFINITY,
            cancelled,
            &mut ne,
            &mut ng,
         );
         (*a_move, score, ne, ng)
      })
      .collect();

   if cancelled.load(Ordering::Relaxed) {
      trace!(
         "search @ depth {} cancelled after {}",
         depth,
         search_time_start.elapsed().as_secs_f64()
      );
      return (0.0, None);
   }

   let mut nodes_expanded: u64 = 1;
   let mut nodes_generated: u64 = 1 + legal_moves.len() as u64;
   for (_, _, ne, ng) in scores.iter() {
      nodes_expanded += *ne;
      nodes_generated += *ng;
   }
   trace!(
      "nodes generated: {} nodes expanded: {}",
      nodes_generated,
      nodes_expanded
   );

   let best = scores.iter().max_by_key(|(_, score, _, _)| r64(*score));
   match best {
      Some((b, score, _, _)) => {
         trace!(
            "search @ depth {} took {}. best move: {} ({})",
            depth,
            search_time_start.elapsed().as_secs_f64(),
            b,
            score
         );
         (*score, Some(*b))
      }
      None => (0.0, None),
   }
}

fn nega_max(
   depth: u64,
   dist_from_root: u64,
   position: &Position,
   mut alpha: f64,
   beta: f64,
   cancelled: &AtomicBool,
   nodes_expanded: &mut u64,
   nodes_generated: &mut u64,
) -> f64 {
   if cancelled.load(Ordering::Relaxed) {
      return 0.0;
   }
   if depth == 0 {
      return evaluate(position, position.side_to_move);
   }
   let mut max: f64 = -MATE_SCORE + dist_from_root as f64;
   let moves = position.gen_moves_color(position.side_to_move, true);
   *nodes_expanded += 1;
   *nodes_generated += moves.len() as u64;
   if moves.is_empty() && !position.in_check(position.side_to_move) {
      // stalemate
      return 0.0;
   }
   for a_move in moves {
      let mut position = position.clone();
      position.apply_move(a_move);

      let score = -nega_max(
         depth - 1,
         dist_from_root + 1,
         &position,
         -beta,
         -alpha,
         cancelled,
         nodes_expanded,
         nodes_generated,
      );
      if score > max {
         max = score;
      }
      if max > alpha {
         alpha = max;
      }
      if alpha >= beta {
         break;
      }
   }
   max
}

fn mat_val(piece: Piece) -> f64 {
   match piece {
      Piece::Pawn => 1.0,
      Piece::Knight => 3.0,
      Piece::Bishop => 3.0,
      Piece::Rook => 5.0,
      Piece::Queen => 10.0,
      Piece::King => 0.0,
   }
}

fn evaluate(position: &Position, side_to_move: Color) -> f64 {
   let mut white_mat_score = 0.0;
   let mut black_mat_score = 0.0;
   let mut white_dist_score = 0.0;
   let mut black_dist_score = 0.0;

   for (i, square) in position.squares.iter().enumerate() {
      let occupant = match square {
         Some(p) => p,
         None => continue,
      };
      let row = (i / 8) as f64;
      match occupant.color {
         Color::White => {
            white_mat_score += mat_val(occupant.piece);
            if occupant.piece != Piece::King {
               white_dist_score += row;
            }
         }
         Color::Black => {
            black_mat_score += mat_val(occupant.piece);
            if occupant.piece != Piece::King {
               black_dist_score += 7.0 - row;
            }
         }
      }
   }

   let mat_score = white_mat_score - black_mat_score;
   let dist_score = white_dist_score - black_dist_score;
   let mobility_score = position.gen_moves_color(Color::White, false).len() as f64
      - position.gen_moves_color(Color::Black, false).len() as f64;
   let final_score = mat_score * 0.9 + mobility_score * 0.06 + dist_score * 0.04;

   if side_to_move == Color::White {
      final_score
   } else {
      -final_score
   }
}
