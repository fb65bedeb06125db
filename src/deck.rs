use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A set of cards stored as a 52-bit mask. Used to track known (dead) cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CardSet(u64);

impl CardSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, card: Card) -> bool {
        let bit = 1u64 << (card.index() as u32);
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub const fn contains(&self, card: Card) -> bool {
        self.0 & (1u64 << (card.index() as u32)) != 0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn union(self, other: CardSet) -> CardSet {
        CardSet(self.0 | other.0)
    }

    pub const fn intersects(&self, other: &CardSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        (0..52u8).filter(move |&i| self.0 & (1u64 << i) != 0).filter_map(Card::from_index)
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut set = CardSet::empty();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

impl<'a> FromIterator<&'a Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = &'a Card>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

/// A standard 52-card deck.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// ```
    /// use poker_coach::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&s| Rank::ALL.iter().map(move |&r| Card::new(r, s)))
            .collect();
        Self { cards }
    }

    /// The standard deck minus every card in `dead`, in a fixed order.
    ///
    /// ```
    /// use poker_coach::cards::parse_cards;
    /// use poker_coach::deck::{CardSet, Deck};
    ///
    /// let dead: CardSet = parse_cards("As Kd").unwrap().iter().collect();
    /// assert_eq!(Deck::without(&dead).len(), 50);
    /// ```
    pub fn without(dead: &CardSet) -> Self {
        let mut deck = Self::standard();
        deck.cards.retain(|c| !dead.contains(*c));
        deck
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.cards.shuffle(&mut rng);
    }

    /// Shuffle using the provided RNG implementing Rng.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Pick `n` distinct random cards without disturbing the rest of the order more than needed.
    /// Returns fewer than `n` if the deck is short.
    pub fn deal_random<R: Rng + ?Sized>(&mut self, rng: &mut R, n: usize) -> &[Card] {
        let n = n.min(self.cards.len());
        let (picked, _) = self.cards.partial_shuffle(rng, n);
        picked
    }

    /// Draw one card from the top of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw `n` cards from the top of the deck.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).filter_map(|_| self.draw()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_52_unique_cards() {
        let d = Deck::standard();
        let set: HashSet<Card> = d.as_slice().iter().copied().collect();
        assert_eq!(set.len(), 52);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let mut d1 = Deck::standard();
        let mut d2 = Deck::standard();
        d1.shuffle_seeded(42);
        d2.shuffle_seeded(42);
        assert_eq!(d1.cards, d2.cards);
    }

    #[test]
    fn without_removes_dead_cards() {
        let dead: CardSet = parse_cards("As Kd 2c").unwrap().iter().collect();
        let d = Deck::without(&dead);
        assert_eq!(d.len(), 49);
        assert!(d.as_slice().iter().all(|c| !dead.contains(*c)));
    }

    #[test]
    fn deal_random_is_seeded_and_distinct() {
        let mut a = Deck::standard();
        let mut b = Deck::standard();
        let mut r1 = ChaCha8Rng::seed_from_u64(9);
        let mut r2 = ChaCha8Rng::seed_from_u64(9);
        let x = a.deal_random(&mut r1, 5).to_vec();
        let y = b.deal_random(&mut r2, 5).to_vec();
        assert_eq!(x, y);
        let set: HashSet<Card> = x.iter().copied().collect();
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn card_set_tracks_membership() {
        let mut s = CardSet::empty();
        let ah = "Ah".parse().unwrap();
        assert!(s.insert(ah));
        assert!(!s.insert(ah));
        assert!(s.contains(ah));
        assert_eq!(s.len(), 1);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![ah]);
    }

    #[test]
    fn draw_reduces_length() {
        let mut d = Deck::standard();
        d.shuffle_seeded(7);
        let hand = d.draw_n(5);
        assert_eq!(hand.len(), 5);
        assert_eq!(d.len(), 47);
    }
}
