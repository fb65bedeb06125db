//! Starting-hand notation: the 169 suit-isomorphic classes of two hole cards.

use crate::cards::{Card, Rank, Suit};
use crate::hand::HoleCards;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of distinct starting-hand classes.
pub const NUM_CANONICAL_HANDS: usize = 169;

/// One of the 169 starting-hand classes: a pair (`"QQ"`), suited (`"AKs"`) or offsuit (`"T9o"`).
///
/// `high >= low` always holds and pairs are never suited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalHand {
    high: Rank,
    low: Rank,
    suited: bool,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotationError {
    #[error("invalid hand label: '{0}'")]
    Invalid(String),
    #[error("a pair cannot be suited: '{0}'")]
    SuitedPair(String),
}

/// Canonical class of two cards. Order independent.
///
/// ```
/// use poker_coach::cards::Card;
/// use poker_coach::notation::hand_to_canonical;
///
/// let a: Card = "Kd".parse().unwrap();
/// let b: Card = "Ad".parse().unwrap();
/// assert_eq!(hand_to_canonical(a, b).to_string(), "AKs");
/// assert_eq!(hand_to_canonical(a, b), hand_to_canonical(b, a));
/// ```
pub fn hand_to_canonical(a: Card, b: Card) -> CanonicalHand {
    let (high, low) =
        if a.rank() >= b.rank() { (a.rank(), b.rank()) } else { (b.rank(), a.rank()) };
    CanonicalHand { high, low, suited: high != low && a.suit() == b.suit() }
}

impl CanonicalHand {
    pub fn pair(rank: Rank) -> Self {
        Self { high: rank, low: rank, suited: false }
    }

    /// Two distinct ranks in either order.
    pub fn unpaired(a: Rank, b: Rank, suited: bool) -> Option<Self> {
        if a == b {
            return None;
        }
        let (high, low) = if a > b { (a, b) } else { (b, a) };
        Some(Self { high, low, suited })
    }

    pub const fn high(&self) -> Rank {
        self.high
    }

    pub const fn low(&self) -> Rank {
        self.low
    }

    pub fn is_pair(&self) -> bool {
        self.high == self.low
    }

    pub const fn is_suited(&self) -> bool {
        self.suited
    }

    pub fn is_offsuit(&self) -> bool {
        !self.is_pair() && !self.suited
    }

    /// Both cards ten or higher.
    pub fn is_broadway(&self) -> bool {
        self.low.is_broadway()
    }

    /// Number of concrete card combinations: 6, 4 or 12.
    pub fn combo_count(&self) -> usize {
        if self.is_pair() {
            6
        } else if self.suited {
            4
        } else {
            12
        }
    }

    /// Every concrete two-card holding of this class, in a fixed order.
    pub fn combos(&self) -> Vec<HoleCards> {
        let mut out = Vec::with_capacity(self.combo_count());
        for (i, &s1) in Suit::ALL.iter().enumerate() {
            for (j, &s2) in Suit::ALL.iter().enumerate() {
                let keep = if self.is_pair() {
                    j > i
                } else if self.suited {
                    i == j
                } else {
                    i != j
                };
                if !keep {
                    continue;
                }
                let pair = HoleCards::try_new(Card::new(self.high, s1), Card::new(self.low, s2));
                if let Ok(h) = pair {
                    out.push(h);
                }
            }
        }
        out
    }

    /// Fixed preflop strength score. Pairs rank above everything, then
    /// suited broadway, offsuit broadway, and the remaining hands by rank
    /// with a bonus for suitedness and connectedness.
    pub fn strength(&self) -> u32 {
        let hi = self.high.value() as u32;
        let lo = self.low.value() as u32;
        if self.is_pair() {
            return 1000 + hi * 10;
        }
        let mut score = hi * 14 + lo;
        if self.is_broadway() {
            score += 300;
        }
        if self.suited {
            score += 60;
        }
        if hi - lo == 1 {
            score += 8;
        }
        score
    }

    /// All 169 classes: pairs, then suited, then offsuit; high rank first within each.
    pub fn all() -> Vec<CanonicalHand> {
        let mut out = Vec::with_capacity(NUM_CANONICAL_HANDS);
        out.extend(Rank::ALL.iter().rev().map(|&r| CanonicalHand::pair(r)));
        for suited in [true, false] {
            for (i, &hi) in Rank::ALL.iter().enumerate().rev() {
                for &lo in Rank::ALL[..i].iter().rev() {
                    out.push(CanonicalHand { high: hi, low: lo, suited });
                }
            }
        }
        out
    }
}

impl fmt::Display for CanonicalHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pair() {
            write!(f, "{}{}", self.high, self.low)
        } else {
            write!(f, "{}{}{}", self.high, self.low, if self.suited { 's' } else { 'o' })
        }
    }
}

impl FromStr for CanonicalHand {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NotationError::Invalid(s.to_string());
        let chars: Vec<char> = s.trim().chars().collect();
        let (a, b, suffix) = match chars.as_slice() {
            [a, b] => (*a, *b, None),
            [a, b, c] => (*a, *b, Some(c.to_ascii_lowercase())),
            _ => return Err(invalid()),
        };
        let a = Rank::try_from(a).map_err(|_| invalid())?;
        let b = Rank::try_from(b).map_err(|_| invalid())?;
        match suffix {
            None if a == b => Ok(CanonicalHand::pair(a)),
            Some('s') if a == b => Err(NotationError::SuitedPair(s.to_string())),
            Some('s') => CanonicalHand::unpaired(a, b, true).ok_or_else(invalid),
            Some('o') => CanonicalHand::unpaired(a, b, false).ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for CanonicalHand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CanonicalHand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CanonicalHand::from_str(&s).map_err(serde::de::Error::custom)
    }
}
