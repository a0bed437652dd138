//! Random-play benchmark for the incremental legal-move index.
//!
//! Each game starts from an empty board. After every ply the index is
//! refined from its previous state; every `check_interval` plies it is also
//! rebuilt from the static tables and the two are compared list by list.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use polytile_core::{
    BoardConst, Color, LegalMoveIndex, Move, PieceConsideredCache, PieceMask, Position,
    PositionView, Variant,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::movegen::MoveGenerator;
use crate::stats::RolloutStats;

/// Rollout settings.
#[derive(Clone, Copy, Debug)]
pub struct RolloutConfig {
    pub variant: Variant,
    pub seed: u64,
    /// Stop after this many games; 0 runs until interrupted.
    pub games: u64,
    /// Plies between fresh cross-checks; 0 disables them.
    pub check_interval: u64,
    pub log_interval_secs: u64,
}

pub struct Rollout {
    config: RolloutConfig,
    bc: Arc<BoardConst>,
    index: LegalMoveIndex,
    fresh: LegalMoveIndex,
    considered: PieceConsideredCache,
    rng: StdRng,
    pub stats: RolloutStats,
}

impl Rollout {
    pub fn new(config: RolloutConfig, bc: Arc<BoardConst>) -> Self {
        let considered = PieceConsideredCache::new(&bc, config.variant.nu_colors());
        Self {
            index: LegalMoveIndex::new(Arc::clone(&bc)),
            fresh: LegalMoveIndex::new(Arc::clone(&bc)),
            considered,
            rng: StdRng::seed_from_u64(config.seed),
            stats: RolloutStats::new(),
            config,
            bc,
        }
    }

    /// Play games until the configured count is reached or `running` is
    /// cleared. Returns the number of completed games.
    pub fn run(&mut self, running: Arc<AtomicBool>) -> u64 {
        let mut completed = 0;
        while self.config.games == 0 || completed < self.config.games {
            if !running.load(Ordering::SeqCst) {
                break;
            }
            if !self.play_game(&running) {
                break;
            }
            completed += 1;
            self.stats.games += 1;
        }
        completed
    }

    /// Play one game. Returns false if interrupted.
    fn play_game(&mut self, running: &AtomicBool) -> bool {
        let mut pos = Position::new(self.config.variant, Arc::clone(&self.bc));
        let nu_colors = pos.nu_colors();
        self.index.init(&pos, false);
        let mut nu_passes = 0;
        let mut ply = 0u64;
        while nu_passes < nu_colors {
            if !running.load(Ordering::SeqCst) {
                return false;
            }
            if self.stats.should_log(self.config.log_interval_secs) {
                self.stats.log_progress();
            }

            let c = pos.to_play();
            let moves = self.generate(&pos, c);
            if moves.is_empty() {
                pos.pass(c);
                nu_passes += 1;
                self.stats.passes += 1;
                continue;
            }
            nu_passes = 0;
            self.stats.moves_generated += moves.len() as u64;
            let mv = moves[self.rng.random_range(0..moves.len())];
            pos.play(c, mv);
            ply += 1;
            self.stats.plies += 1;

            self.index.init(&pos, true);
            self.stats.followup_inits += 1;
            if self.config.check_interval > 0 && ply % self.config.check_interval == 0 {
                self.cross_check(&pos);
            }
        }
        self.stats.index_len = Color::all(nu_colors)
            .map(|c| self.index.precomp(c).len())
            .sum();
        true
    }

    /// Legal moves of `c`, restricted to the pieces considered at this ply
    /// unless none of those can be played.
    fn generate(&mut self, pos: &Position, c: Color) -> Vec<Move> {
        let considered = self.considered.get(pos.nu_moves());
        let mut gen = MoveGenerator::new(pos, c, considered);
        let moves = gen.collect_all(&self.index, pos);
        let all = PieceMask::all(self.bc.nu_pieces());
        if !moves.is_empty() || considered == all {
            return moves;
        }
        self.stats.considered_fallbacks += 1;
        MoveGenerator::new(pos, c, all).collect_all(&self.index, pos)
    }

    fn cross_check(&mut self, pos: &Position) {
        self.fresh.init(pos, false);
        self.stats.fresh_checks += 1;
        for c in Color::all(pos.nu_colors()) {
            if !self.index.precomp(c).lists_eq(self.fresh.precomp(c)) {
                self.stats.mismatches += 1;
                println!(
                    "Mismatch: color {} after {} moves differs from a fresh rebuild",
                    c.index(),
                    pos.nu_moves()
                );
            }
        }
    }
}
