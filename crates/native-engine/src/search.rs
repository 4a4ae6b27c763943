//! Depth- and time-limited alpha-beta search over material
//!
//! The search is deliberately simple: the controller under development does
//! not care how strong the reply is, only that one arrives (possibly slowly)
//! through the same result-code channel as human moves.

use crate::evaluation::material_eval;
use rand::seq::IndexedRandom;
use shakmaty::{Chess, Color, Move, Position};
use web_time::{Duration, Instant};

const MATE_SCORE: i32 = 1_000_000;

/// Limits forwarded by `change_settings`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_time_ms: u32,
    pub max_depth: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_time_ms: 1000,
            max_depth: 4,
        }
    }
}

/// Result of a completed search
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub depth: u32,
    pub nodes: u64,
}

struct Searcher {
    deadline: Instant,
    nodes: u64,
    timed_out: bool,
}

/// Pick a move for the side to move, `None` when there is no legal move
pub fn find_best_move(position: &Chess, limits: SearchLimits) -> Option<SearchResult> {
    let root_moves = position.legal_moves();
    if root_moves.is_empty() {
        return None;
    }

    let mut searcher = Searcher {
        deadline: Instant::now() + Duration::from_millis(u64::from(limits.max_time_ms)),
        nodes: 0,
        timed_out: false,
    };
    let mut rng = rand::rng();

    let mut best: Option<SearchResult> = None;
    // Iterative deepening so a timeout still leaves the last finished depth
    for depth in 1..=limits.max_depth.max(1) {
        let mut scored = Vec::with_capacity(root_moves.len());
        for m in ordered(&root_moves) {
            let mut child = position.clone();
            child.play_unchecked(&m);
            let score = -searcher.negamax(&child, depth - 1, -MATE_SCORE, MATE_SCORE, 1);
            if searcher.timed_out {
                break;
            }
            scored.push((m, score));
        }
        if searcher.timed_out && best.is_some() {
            break;
        }
        let Some(top) = scored.iter().map(|(_, s)| *s).max() else {
            break;
        };
        let candidates: Vec<&(Move, i32)> = scored.iter().filter(|(_, s)| *s == top).collect();
        if let Some((m, score)) = candidates.choose(&mut rng) {
            best = Some(SearchResult {
                best_move: m.clone(),
                score: *score,
                depth,
                nodes: searcher.nodes,
            });
        }
        if searcher.timed_out {
            break;
        }
    }

    best.or_else(|| {
        root_moves.first().map(|m| SearchResult {
            best_move: m.clone(),
            score: 0,
            depth: 0,
            nodes: searcher.nodes,
        })
    })
}

impl Searcher {
    fn negamax(&mut self, position: &Chess, depth: u32, mut alpha: i32, beta: i32, ply: i32) -> i32 {
        self.nodes += 1;
        if self.nodes % 1024 == 0 && Instant::now() >= self.deadline {
            self.timed_out = true;
        }
        if self.timed_out {
            return 0;
        }

        let moves = position.legal_moves();
        if moves.is_empty() {
            return if position.is_check() { -MATE_SCORE + ply } else { 0 };
        }
        if position.is_insufficient_material() {
            return 0;
        }
        if depth == 0 {
            return relative_eval(position);
        }

        let mut best = -MATE_SCORE;
        for m in ordered(&moves) {
            let mut child = position.clone();
            child.play_unchecked(&m);
            let score = -self.negamax(&child, depth - 1, -beta, -alpha, ply + 1);
            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }
        best
    }
}

fn relative_eval(position: &Chess) -> i32 {
    let eval = material_eval(position.board());
    match position.turn() {
        Color::White => eval,
        Color::Black => -eval,
    }
}

/// Captures and promotions first
fn ordered(moves: &[Move]) -> Vec<Move> {
    let mut out: Vec<Move> = moves.to_vec();
    out.sort_by_key(|m| {
        let capture = m.capture().map_or(0, crate::evaluation::role_value);
        let promotion = m.promotion().map_or(0, crate::evaluation::role_value);
        -(capture + promotion)
    });
    out
}
