use crate::cards::{parse_cards, Card};
use crate::deck::CardSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate cards in hole cards")]
    DuplicateHoleCards,
    #[error("too many board cards: {0}")]
    TooManyBoardCards(usize),
    #[error("duplicate cards on board")]
    DuplicateBoardCards,
    #[error("hole cards overlap with board")]
    Overlap,
    #[error("expected exactly two hole cards, got {0}")]
    HoleCount(usize),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A player's two private hole cards.
///
/// ```
/// use poker_coach::hand::HoleCards;
///
/// let hole: HoleCards = "As Ks".parse().unwrap();
/// assert_eq!(hole.canonical().to_string(), "AKs");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoleCards(Card, Card);

impl HoleCards {
    pub fn try_new(a: Card, b: Card) -> Result<Self, HandError> {
        if a == b {
            return Err(HandError::DuplicateHoleCards);
        }
        Ok(Self(a, b))
    }

    pub fn from_slice(slice: &[Card]) -> Result<Self, HandError> {
        if slice.len() != 2 {
            return Err(HandError::HoleCount(slice.len()));
        }
        Self::try_new(slice[0], slice[1])
    }

    pub fn first(&self) -> Card {
        self.0
    }

    pub fn second(&self) -> Card {
        self.1
    }

    pub fn as_array(&self) -> [Card; 2] {
        [self.0, self.1]
    }

    pub fn card_set(&self) -> CardSet {
        self.as_array().iter().collect()
    }

    /// True if either card is already in `set`.
    pub fn conflicts_with(&self, set: &CardSet) -> bool {
        set.contains(self.0) || set.contains(self.1)
    }

    /// The 169-class starting-hand label for these cards.
    pub fn canonical(&self) -> crate::notation::CanonicalHand {
        crate::notation::hand_to_canonical(self.0, self.1)
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}

impl FromStr for HoleCards {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

impl Serialize for HoleCards {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HoleCards {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cards = Vec::<Card>::deserialize(deserializer)?;
        HoleCards::from_slice(&cards).map_err(serde::de::Error::custom)
    }
}

/// Community cards on the board (flop, turn, river).
///
/// ```
/// use poker_coach::hand::Board;
///
/// let board: Board = "2c 3c 4c".parse().unwrap();
/// assert_eq!(board.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn try_new(cards: Vec<Card>) -> Result<Self, HandError> {
        if cards.len() > 5 {
            return Err(HandError::TooManyBoardCards(cards.len()));
        }
        let set: CardSet = cards.iter().collect();
        if set.len() != cards.len() {
            return Err(HandError::DuplicateBoardCards);
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cards.len() == 5
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn card_set(&self) -> CardSet {
        self.cards.iter().collect()
    }

    pub fn street(&self) -> Street {
        Street::from_board_len(self.cards.len())
    }

    /// A new board with `card` appended (turn or river).
    pub fn with_card(&self, card: Card) -> Result<Self, HandError> {
        let mut cards = self.cards.clone();
        cards.push(card);
        Self::try_new(cards)
    }
}

impl FromStr for Board {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Board::try_new(cards)
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.cards.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cards = Vec::<Card>::deserialize(deserializer)?;
        Board::try_new(cards).map_err(serde::de::Error::custom)
    }
}

/// Betting round, derived from how many community cards are out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub fn from_board_len(n: usize) -> Self {
        match n {
            0..=2 => Street::Preflop,
            3 => Street::Flop,
            4 => Street::Turn,
            _ => Street::River,
        }
    }
}

/// Validate that a pair of hole cards and board form a valid Hold'em state.
/// Allows 0..=5 board cards. Ensures uniqueness across all cards.
pub fn validate_holdem(hole: &HoleCards, board: &Board) -> Result<(), HandError> {
    if board.len() > 5 {
        return Err(HandError::TooManyBoardCards(board.len()));
    }
    // Board may have been built with `new`, which skips the duplicate check
    let set = board.card_set();
    if set.len() != board.len() {
        return Err(HandError::DuplicateBoardCards);
    }
    if hole.first() == hole.second() {
        return Err(HandError::DuplicateHoleCards);
    }
    if hole.conflicts_with(&set) {
        return Err(HandError::Overlap);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn hole_cards_must_be_distinct() {
        let a = Card::new(Rank::Ace, Suit::Spades);
        assert!(matches!(HoleCards::try_new(a, a), Err(HandError::DuplicateHoleCards)));
        assert!(matches!("As".parse::<HoleCards>(), Err(HandError::HoleCount(1))));
    }

    #[test]
    fn board_try_new_checks_limits_and_dupes() {
        let six = parse_cards("2c 3c 4c 5c 6c 7c").unwrap();
        assert!(matches!(Board::try_new(six), Err(HandError::TooManyBoardCards(6))));
        assert!(matches!("2c 2c".parse::<Board>(), Err(HandError::DuplicateBoardCards)));
    }

    #[test]
    fn validate_holdem_catches_overlap() {
        let hole: HoleCards = "As Ks".parse().unwrap();
        let board = Board::new(parse_cards("As 2c 3c").unwrap());
        assert!(matches!(validate_holdem(&hole, &board), Err(HandError::Overlap)));
    }

    #[test]
    fn street_follows_board_length() {
        let board: Board = "2c 3c 4c".parse().unwrap();
        assert_eq!(board.street(), Street::Flop);
        let turn = board.with_card("Ah".parse().unwrap()).unwrap();
        assert_eq!(turn.street(), Street::Turn);
        assert!(board.with_card("2c".parse().unwrap()).is_err());
    }

    #[test]
    fn serde_reads_unicode_and_writes_canonical() {
        let hole: HoleCards = serde_json::from_str(r#"["A♠", "10♦"]"#).unwrap();
        assert_eq!(serde_json::to_string(&hole).unwrap(), r#"["As","Td"]"#);
        assert!(serde_json::from_str::<HoleCards>(r#"["As"]"#).is_err());
        assert!(serde_json::from_str::<Board>(r#"["As", "Zz"]"#).is_err());
    }
}
