use crate::cards::{Card, Suit};

/// Per-suit card counts and rank masks of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuitInfo {
    counts: [u8; 4],
    masks: [u16; 4],
}

impl SuitInfo {
    pub fn detect(cards: &[Card]) -> Self {
        let mut counts = [0u8; 4];
        let mut masks = [0u16; 4];
        for c in cards {
            let s = c.suit().index();
            counts[s] += 1;
            masks[s] |= 1 << c.rank().value();
        }
        Self { counts, masks }
    }

    /// Rank mask of the flush suit, if five or more cards share a suit.
    pub fn flush_mask(&self) -> Option<u16> {
        (0..4).find(|&s| self.counts[s] >= 5).map(|s| self.masks[s])
    }

    pub fn count(&self, suit: Suit) -> u8 {
        self.counts[suit.index()]
    }
}
