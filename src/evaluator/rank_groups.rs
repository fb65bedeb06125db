use crate::cards::Card;

/// Rank multiplicities of a set of cards, indexed by rank value (2–14).
///
/// Example: AAAKQ has count 3 at 14 and count 1 at 13 and 12.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankGroups {
    counts: [u8; 15],
}

impl RankGroups {
    pub fn from_cards(cards: &[Card]) -> Self {
        let mut counts = [0u8; 15];
        for c in cards {
            counts[c.rank().value() as usize] += 1;
        }
        Self { counts }
    }

    /// Rank values held at least `min` times, highest first.
    pub fn with_at_least(&self, min: u8) -> impl Iterator<Item = u8> + '_ {
        (2u8..=14).rev().filter(move |&v| self.counts[v as usize] >= min)
    }

    pub fn count(&self, value: u8) -> u8 {
        self.counts.get(value as usize).copied().unwrap_or(0)
    }

    /// Bit `v` set for every rank value `v` present.
    pub fn mask(&self) -> u16 {
        (2u8..=14).filter(|&v| self.counts[v as usize] > 0).fold(0u16, |m, v| m | (1 << v))
    }

    /// The `n` highest present ranks not listed in `used`, zero-padded to five slots.
    pub fn kickers(&self, used: &[u8], n: usize) -> [u8; 5] {
        let mut out = [0u8; 5];
        let live = self.with_at_least(1).filter(|v| !used.contains(v));
        for (slot, v) in live.take(n.min(5)).enumerate() {
            out[slot] = v;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn groups(s: &str) -> RankGroups {
        RankGroups::from_cards(&parse_cards(s).unwrap())
    }

    #[test]
    fn quads_and_trips_are_found_highest_first() {
        let g = groups("Ah Ad Ac As Kd 7c 7d");
        assert_eq!(g.with_at_least(4).collect::<Vec<_>>(), vec![14]);
        assert_eq!(g.with_at_least(2).collect::<Vec<_>>(), vec![14, 7]);
    }

    #[test]
    fn kickers_skip_used_ranks() {
        let g = groups("8h 8d Ac Qs 5d 3c 2d");
        assert_eq!(g.kickers(&[8], 3), [14, 12, 5, 0, 0]);
        assert_eq!(g.kickers(&[], 5), [14, 12, 8, 5, 3]);
    }

    #[test]
    fn mask_marks_present_ranks() {
        let g = groups("Ah 2d 2c");
        assert_eq!(g.mask(), (1 << 14) | (1 << 2));
    }
}
