use crate::board::{Move, Position};
use crate::messages::WorkerMessage;
use crate::search::{find_random_move, Searcher};
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;
use std::thread;

#[derive(Debug, PartialEq, Eq)]
pub enum SearchPoll {
   Pending,
   /// `None` only when there was no legal move to fall back on
   Ready(Option<Move>),
}

/// One outstanding worker invocation.
///
/// The worker runs on its own thread against a snapshot of the position and
/// reports through a single-slot channel. Cancelling (or dropping) the task
/// raises the worker's cancel flag and lets go of the channel, so anything the
/// worker still produces is never read.
pub struct SearchTask {
   id: u64,
   receiver: mpsc::Receiver<WorkerMessage>,
   worker: Option<thread::JoinHandle<()>>,
   cancelled: Arc<AtomicBool>,
   legal_moves: Vec<Move>,
   live_tasks: Arc<AtomicUsize>,
   retired: bool,
}

impl SearchTask {
   /// Safe to call any number of times, including after the worker finished
   pub fn cancel(&mut self) {
      if self.retired {
         return;
      }
      self.cancelled.store(true, Ordering::SeqCst);
      debug!("cancelled search task {}", self.id);
      // detach, the worker exits at its next checkpoint
      self.worker.take();
      self.retire();
   }

   fn retire(&mut self) {
      if !self.retired {
         self.retired = true;
         self.live_tasks.fetch_sub(1, Ordering::SeqCst);
      }
   }
}

impl Drop for SearchTask {
   fn drop(&mut self) {
      self.cancel();
   }
}

pub struct SearchSupervisor<S> {
   searcher: Arc<S>,
   rng: StdRng,
   next_id: u64,
   live_tasks: Arc<AtomicUsize>,
}

impl<S: Searcher> SearchSupervisor<S> {
   pub fn new(searcher: S, seed: Option<u64>) -> SearchSupervisor<S> {
      let rng = match seed {
         Some(seed) => StdRng::seed_from_u64(seed),
         None => StdRng::from_entropy(),
      };
      SearchSupervisor {
         searcher: Arc::new(searcher),
         rng,
         next_id: 0,
         live_tasks: Arc::new(AtomicUsize::new(0)),
      }
   }

   /// Number of tasks that have been requested and neither retrieved nor cancelled
   pub fn live_tasks(&self) -> usize {
      self.live_tasks.load(Ordering::SeqCst)
   }

   /// Starts a worker on a copy of `position`. Only one task may be alive at a time.
   pub fn request_move(&mut self, position: &Position, legal_moves: &[Move]) -> SearchTask {
      debug_assert_eq!(self.live_tasks(), 0, "a search task is already running");

      let id = self.next_id;
      self.next_id += 1;

      let (sender, receiver) = mpsc::sync_channel(1);
      let cancelled = Arc::new(AtomicBool::new(false));

      let searcher = Arc::clone(&self.searcher);
      let flag = Arc::clone(&cancelled);
      let snapshot = position.clone();
      let moves = legal_moves.to_vec();
      let spawned = thread::Builder::new()
         .name(format!("search-{}", id))
         .spawn(move || {
            let best = searcher.find_best_move(&snapshot, &moves, &flag);
            if flag.load(Ordering::SeqCst) {
               trace!("search task {} finished after being cancelled", id);
               return;
            }
            // the receiver is gone if the task was dropped in the meantime
            let _ = sender.send(WorkerMessage::BestMove(best));
         });

      let worker = match spawned {
         Ok(handle) => Some(handle),
         Err(e) => {
            // the sender went down with the closure, so the first poll falls back
            warn!("failed to spawn search worker: {}", e);
            None
         }
      };

      self.live_tasks.fetch_add(1, Ordering::SeqCst);
      info!("thinking... (task {})", id);

      SearchTask {
         id,
         receiver,
         worker,
         cancelled,
         legal_moves: legal_moves.to_vec(),
         live_tasks: Arc::clone(&self.live_tasks),
         retired: false,
      }
   }

   /// Never blocks on a running worker. Once `Ready` is returned the task is spent.
   pub fn poll(&mut self, task: &mut SearchTask) -> SearchPoll {
      if task.retired {
         return SearchPoll::Pending;
      }

      let result = match task.receiver.try_recv() {
         Ok(WorkerMessage::BestMove(best)) => best,
         Err(TryRecvError::Empty) => return SearchPoll::Pending,
         Err(TryRecvError::Disconnected) => {
            warn!("search task {} ended without reporting a move", task.id);
            None
         }
      };

      // already reported (or already dead), so this join is short
      if let Some(handle) = task.worker.take() {
         if handle.join().is_err() {
            warn!("search worker for task {} panicked", task.id);
         }
      }
      task.retire();

      match result {
         Some(best) => {
            info!("done thinking (task {}): {}", task.id, best);
            SearchPoll::Ready(Some(best))
         }
         None => {
            let fallback = find_random_move(&task.legal_moves, &mut self.rng);
            match fallback {
               Some(m) => info!("search task {} found nothing, playing random move {}", task.id, m),
               None => warn!("search task {} found nothing and there are no legal moves", task.id),
            }
            SearchPoll::Ready(fallback)
         }
      }
   }

   pub fn cancel(&mut self, mut task: SearchTask) {
      task.cancel();
   }
}
