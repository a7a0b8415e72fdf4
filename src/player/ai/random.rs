use crate::core::{Board, Deadline, Move};
use crate::player::PlayerController;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// プロセス共通の乱数源。初回使用時に現在時刻で初期化する
static RNG: Lazy<Mutex<StdRng>> = Lazy::new(|| {
    let seed = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| chrono::Utc::now().timestamp_micros()) as u64;
    Mutex::new(StdRng::seed_from_u64(seed))
});

/// 空きマスから一様に一つ選ぶ
pub fn random_move(moves: &[Move]) -> Option<Move> {
    match RNG.lock() {
        Ok(mut rng) => random_move_with(moves, &mut *rng),
        // poisoned: 乱数状態は壊れないのでそのまま使う
        Err(poisoned) => random_move_with(moves, &mut *poisoned.into_inner()),
    }
}

pub fn random_move_with<R: Rng + ?Sized>(moves: &[Move], rng: &mut R) -> Option<Move> {
    moves.choose(rng).copied()
}

pub struct RandomAI {
    pub name: String,
}

impl RandomAI {
    pub fn new(name: &str) -> Self {
        RandomAI {
            name: name.to_string(),
        }
    }
}

impl PlayerController for RandomAI {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(
        &self,
        _board: &mut Board,
        legal_moves: &[Move],
        _deadline: &Deadline,
    ) -> Option<Move> {
        random_move(legal_moves)
    }

    fn is_local(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn picks_only_from_given_moves() {
        let moves = vec![Move(2), Move(5), Move(9)];
        for _ in 0..50 {
            let mv = random_move(&moves).unwrap();
            assert!(moves.contains(&mv));
        }
        assert_eq!(random_move(&[]), None);
    }

    #[test]
    fn seeded_source_covers_every_move() {
        let moves: Vec<Move> = (1..=4).map(Move).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<Move> = (0..200)
            .filter_map(|_| random_move_with(&moves, &mut rng))
            .collect();
        assert_eq!(seen.len(), moves.len());
    }
}
