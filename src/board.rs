//! The visible board: two independently ordered card columns

use crate::core::{Card, CardId, Pair, PairId, Side};
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Cards currently on screen
///
/// The board always holds complete pairs: every pair id present has exactly
/// one card in the left column and one in the right column. The two columns
/// are ordered independently so position never gives a match away.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    left: Vec<Card>,
    right: Vec<Card>,
}

impl Board {
    pub fn new() -> Self {
        Board::default()
    }

    /// Deal a fresh board from a working set of pairs
    ///
    /// Left cards and right cards are shuffled separately (left first), so
    /// the two column orders are uncorrelated.
    pub fn deal(pairs: &[Pair], rng: &mut impl Rng) -> Self {
        let mut left: Vec<Card> = pairs.iter().map(Card::left_of).collect();
        let mut right: Vec<Card> = pairs.iter().map(Card::right_of).collect();
        left.shuffle(rng);
        right.shuffle(rng);
        Board { left, right }
    }

    /// Left column, top to bottom
    pub fn left(&self) -> &[Card] {
        &self.left
    }

    /// Right column, top to bottom
    pub fn right(&self) -> &[Card] {
        &self.right
    }

    pub fn column(&self, side: Side) -> &[Card] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// All cards, left column followed by right column
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.left.iter().chain(self.right.iter())
    }

    pub fn get(&self, card_id: &CardId) -> Option<&Card> {
        self.cards().find(|c| &c.id == card_id)
    }

    pub fn contains(&self, card_id: &CardId) -> bool {
        self.get(card_id).is_some()
    }

    pub fn contains_pair(&self, pair_id: PairId) -> bool {
        self.left.iter().any(|c| c.pair_id == pair_id)
    }

    /// Pair ids on the board, in left-column order
    pub fn pair_ids(&self) -> Vec<PairId> {
        self.left.iter().map(|c| c.pair_id).collect()
    }

    /// Number of complete pairs on the board
    pub fn pair_count(&self) -> usize {
        self.left.len()
    }

    /// Number of cards on the board
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Remove both cards of a pair
    ///
    /// Returns false if the pair was not on the board.
    pub fn remove_pair(&mut self, pair_id: PairId) -> bool {
        // Vec::remove keeps the remaining order stable
        let left_pos = self.left.iter().position(|c| c.pair_id == pair_id);
        let right_pos = self.right.iter().position(|c| c.pair_id == pair_id);
        match (left_pos, right_pos) {
            (Some(l), Some(r)) => {
                self.left.remove(l);
                self.right.remove(r);
                true
            }
            _ => false,
        }
    }

    /// Insert a newly drawn pair at random positions
    ///
    /// Each side draws its own index uniformly from `0..=column_len`, left
    /// first, then right.
    pub fn insert_pair(&mut self, pair: &Pair, rng: &mut impl Rng) {
        let left_idx = rng.gen_range(0..=self.left.len());
        self.left.insert(left_idx, Card::left_of(pair));
        let right_idx = rng.gen_range(0..=self.right.len());
        self.right.insert(right_idx, Card::right_of(pair));
    }

    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
    }

    /// Check the complete-pairs invariant
    ///
    /// Every pair id appears exactly once per column, every left card is on
    /// the left and every right card is on the right.
    pub fn is_consistent(&self) -> bool {
        if self.left.len() != self.right.len() {
            return false;
        }
        let mut seen: FxHashMap<PairId, (u8, u8)> = FxHashMap::default();
        for card in &self.left {
            if card.side != Side::Left {
                return false;
            }
            seen.entry(card.pair_id).or_default().0 += 1;
        }
        for card in &self.right {
            if card.side != Side::Right {
                return false;
            }
            seen.entry(card.pair_id).or_default().1 += 1;
        }
        seen.values().all(|&counts| counts == (1, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn pairs(n: u32) -> Vec<Pair> {
        (1..=n)
            .map(|i| Pair::new(i, format!("L{i}"), "term", format!("R{i}"), "definition"))
            .collect()
    }

    #[test]
    fn test_deal_holds_complete_pairs() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let board = Board::deal(&pairs(3), &mut rng);

        assert_eq!(board.len(), 6);
        assert_eq!(board.pair_count(), 3);
        assert!(board.is_consistent());
        assert!(board.left().iter().all(|c| c.side == Side::Left));
        assert!(board.right().iter().all(|c| c.side == Side::Right));
    }

    #[test]
    fn test_deal_is_reproducible_with_seed() {
        let a = Board::deal(&pairs(5), &mut ChaCha12Rng::seed_from_u64(9));
        let b = Board::deal(&pairs(5), &mut ChaCha12Rng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_remove_pair() {
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let mut board = Board::deal(&pairs(3), &mut rng);

        assert!(board.remove_pair(PairId::new(2)));
        assert_eq!(board.len(), 4);
        assert!(!board.contains_pair(PairId::new(2)));
        assert!(!board.contains(&CardId::new("term", PairId::new(2))));
        assert!(board.is_consistent());

        assert!(!board.remove_pair(PairId::new(2)));
    }

    #[test]
    fn test_insert_pair_keeps_columns_consistent() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let all = pairs(4);
        let mut board = Board::deal(&all[..2], &mut rng);

        board.insert_pair(&all[3], &mut rng);

        assert_eq!(board.pair_count(), 3);
        assert!(board.contains_pair(PairId::new(4)));
        assert!(board.is_consistent());
    }

    #[test]
    fn test_insert_into_empty_board() {
        let mut rng = ChaCha12Rng::seed_from_u64(4);
        let mut board = Board::new();
        board.insert_pair(&pairs(1)[0], &mut rng);

        assert_eq!(board.left()[0].id, "term_1");
        assert_eq!(board.right()[0].id, "definition_1");
    }

    #[test]
    fn test_inconsistent_board_detected() {
        let all = pairs(2);
        let board = Board {
            left: vec![Card::left_of(&all[0]), Card::left_of(&all[1])],
            right: vec![Card::right_of(&all[0]), Card::right_of(&all[0])],
        };
        assert!(!board.is_consistent());
    }
}
