//! Hand ranking.
//!
//! The rest of the crate only talks to [`HandEvaluator`], so any ranking
//! implementation can be injected. [`SevenCardEvaluator`] is the bundled one.

pub(crate) mod rank_groups;
pub(crate) mod straight_info;
pub(crate) mod suit_info;

use crate::cards::Card;
use crate::hand::{validate_holdem, Board, HandError, HoleCards};
use core::cmp::Ordering;
use rank_groups::RankGroups;
use straight_info::straight_top;
use suit_info::SuitInfo;

/// Compact, comparable hand strength. Higher is better.
/// Encodes category and ranked tiebreakers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(u64);

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    const fn from_ordinal(v: u8) -> Category {
        match v {
            0 => Category::HighCard,
            1 => Category::Pair,
            2 => Category::TwoPair,
            3 => Category::ThreeOfAKind,
            4 => Category::Straight,
            5 => Category::Flush,
            6 => Category::FullHouse,
            7 => Category::FourOfAKind,
            _ => Category::StraightFlush,
        }
    }
}

impl HandValue {
    const CAT_SHIFT: u32 = 48;
    const RANK_STRIDE: u32 = 6;

    /// Return the packed comparable value.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Pack a category and up to five rank-value tiebreakers (most significant first, 0 = unused).
    pub fn from_parts(category: Category, tiebreak: &[u8; 5]) -> Self {
        // [ category (8 bits) | r0 (6) | r1 (6) | r2 (6) | r3 (6) | r4 (6) | 18 zero bits ]
        let mut v: u64 = (category as u64) << Self::CAT_SHIFT;
        for (i, r) in tiebreak.iter().enumerate() {
            let offset = Self::CAT_SHIFT - Self::RANK_STRIDE * (i as u32 + 1);
            v |= (*r as u64) << offset;
        }
        HandValue(v)
    }

    pub const fn category(self) -> Category {
        Category::from_ordinal((self.0 >> Self::CAT_SHIFT) as u8)
    }
}

/// Detailed evaluation result. `value` drives ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Evaluation {
    value: HandValue,
    pub category: Category,
}

impl Evaluation {
    fn new(category: Category, tiebreak: [u8; 5]) -> Self {
        Self { value: HandValue::from_parts(category, &tiebreak), category }
    }

    /// Return the packed comparable value for ordering/caching.
    pub const fn value(&self) -> HandValue {
        self.value
    }
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
    #[error("not enough cards to evaluate")]
    NotEnoughCards,
    #[error("too many cards to evaluate: {0}")]
    TooManyCards(usize),
}

/// A hand-ranking capability. Higher values win; equal values tie.
pub trait HandEvaluator: Send + Sync {
    /// Rank the best five-card hand among `cards` (five to seven cards).
    fn rank(&self, cards: &[Card]) -> Option<HandValue>;

    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Default evaluator: rank counts and suit masks over up to seven cards.
#[derive(Debug, Clone, Copy, Default)]
pub struct SevenCardEvaluator;

impl HandEvaluator for SevenCardEvaluator {
    fn rank(&self, cards: &[Card]) -> Option<HandValue> {
        evaluate_cards(cards).ok().map(|e| e.value())
    }

    fn name(&self) -> &'static str {
        "seven-card"
    }
}

/// Evaluate the best five-card hand contained in 5–7 cards.
///
/// ```
/// use poker_coach::cards::parse_cards;
/// use poker_coach::evaluator::{evaluate_cards, Category};
///
/// let eval = evaluate_cards(&parse_cards("As Ah Kc Qd Jh 3s 2c").unwrap()).unwrap();
/// assert_eq!(eval.category, Category::Pair);
/// ```
pub fn evaluate_cards(cards: &[Card]) -> Result<Evaluation, EvalError> {
    match cards.len() {
        0..=4 => return Err(EvalError::NotEnoughCards),
        5..=7 => {}
        n => return Err(EvalError::TooManyCards(n)),
    }
    let groups = RankGroups::from_cards(cards);
    let suits = SuitInfo::detect(cards);
    let flush = suits.flush_mask();

    if let Some(top) = flush.and_then(straight_top) {
        return Ok(Evaluation::new(Category::StraightFlush, [top, 0, 0, 0, 0]));
    }
    if let Some(quad) = groups.with_at_least(4).next() {
        let k = groups.kickers(&[quad], 1);
        return Ok(Evaluation::new(Category::FourOfAKind, [quad, k[0], 0, 0, 0]));
    }
    if let Some(trips) = groups.with_at_least(3).next() {
        if let Some(pair) = groups.with_at_least(2).find(|&v| v != trips) {
            return Ok(Evaluation::new(Category::FullHouse, [trips, pair, 0, 0, 0]));
        }
    }
    if let Some(mask) = flush {
        let mut tb = [0u8; 5];
        for (slot, v) in (2u8..=14).rev().filter(|&v| mask & (1 << v) != 0).take(5).enumerate() {
            tb[slot] = v;
        }
        return Ok(Evaluation::new(Category::Flush, tb));
    }
    if let Some(top) = straight_top(groups.mask()) {
        return Ok(Evaluation::new(Category::Straight, [top, 0, 0, 0, 0]));
    }
    if let Some(trips) = groups.with_at_least(3).next() {
        let k = groups.kickers(&[trips], 2);
        return Ok(Evaluation::new(Category::ThreeOfAKind, [trips, k[0], k[1], 0, 0]));
    }
    let mut pairs = groups.with_at_least(2);
    match (pairs.next(), pairs.next()) {
        (Some(hi), Some(lo)) => {
            let k = groups.kickers(&[hi, lo], 1);
            Ok(Evaluation::new(Category::TwoPair, [hi, lo, k[0], 0, 0]))
        }
        (Some(p), None) => {
            let k = groups.kickers(&[p], 3);
            Ok(Evaluation::new(Category::Pair, [p, k[0], k[1], k[2], 0]))
        }
        _ => Ok(Evaluation::new(Category::HighCard, groups.kickers(&[], 5))),
    }
}

/// Evaluate exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> Evaluation {
    // five cards always satisfy the length check
    evaluate_cards(cards).unwrap_or(Evaluation::new(Category::HighCard, [0; 5]))
}

/// Evaluate seven cards (two hole + five board).
pub fn evaluate_seven(cards: &[Card; 7]) -> Evaluation {
    evaluate_cards(cards).unwrap_or(Evaluation::new(Category::HighCard, [0; 5]))
}

/// Evaluate a Hold'em hand given hole cards and a complete board.
///
/// ```
/// use poker_coach::evaluator::{evaluate_holdem, Category};
/// use poker_coach::hand::{Board, HoleCards};
///
/// let hole: HoleCards = "As Ah".parse().unwrap();
/// let board: Board = "Qc Jd 9h 3s 2c".parse().unwrap();
/// assert_eq!(evaluate_holdem(&hole, &board).unwrap().category, Category::Pair);
/// ```
pub fn evaluate_holdem(hole: &HoleCards, board: &Board) -> Result<Evaluation, EvalError> {
    validate_holdem(hole, board)?;
    let b = board.as_slice();
    if b.len() < 5 {
        return Err(EvalError::NotEnoughCards);
    }
    Ok(evaluate_seven(&[hole.first(), hole.second(), b[0], b[1], b[2], b[3], b[4]]))
}

/// Compare two Hold'em hands on a shared board.
pub fn compare_holdem(a: &HoleCards, b: &HoleCards, board: &Board) -> Result<Ordering, EvalError> {
    let va = evaluate_holdem(a, board)?;
    let vb = evaluate_holdem(b, board)?;
    Ok(va.cmp(&vb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn eval(s: &str) -> Evaluation {
        evaluate_cards(&parse_cards(s).unwrap()).unwrap()
    }

    #[test]
    fn card_count_is_checked() {
        assert!(matches!(
            evaluate_cards(&parse_cards("As Ks").unwrap()),
            Err(EvalError::NotEnoughCards)
        ));
        assert!(matches!(
            evaluate_cards(&parse_cards("As Ks Qs Js Ts 9s 8s 7s").unwrap()),
            Err(EvalError::TooManyCards(8))
        ));
    }

    #[test]
    fn short_board_errors() {
        let hole: HoleCards = "As Ks".parse().unwrap();
        let board: Board = "2c 3d 4h".parse().unwrap();
        assert!(matches!(evaluate_holdem(&hole, &board), Err(EvalError::NotEnoughCards)));
    }

    #[test]
    fn seven_card_categories() {
        assert_eq!(eval("As Ks Qs Js Ts 2d 3c").category, Category::StraightFlush);
        assert_eq!(eval("9c 9d 9h 9s Ac 2d 3c").category, Category::FourOfAKind);
        assert_eq!(eval("3c 3d 3h Js Jc Jd 2h").category, Category::FullHouse);
        assert_eq!(eval("Kh Th 8h 6h 3h 3c 3d").category, Category::Flush);
        assert_eq!(eval("Ac 2d 3h 4s 5c Kd Kh").category, Category::Straight);
        assert_eq!(eval("Qc Qd Qh 9s 2c 4d 7h").category, Category::ThreeOfAKind);
        assert_eq!(eval("Jc Jd 9c 9h 2s 2d Ah").category, Category::TwoPair);
        assert_eq!(eval("Ah Ad Ts 9c 2d 4h 6s").category, Category::Pair);
        assert_eq!(eval("Ah Kd 7s 5c 2d 3h 9s").category, Category::HighCard);
    }

    #[test]
    fn category_is_recoverable_from_value() {
        let e = eval("Jc Jd 9c 9h 2s 2d Ah");
        assert_eq!(e.value().category(), Category::TwoPair);
    }

    #[test]
    fn three_pairs_use_best_kicker() {
        // KK QQ with the third pair (8) outranking the singleton 4
        let a = eval("Kc Kd Qc Qh 8s 8d 4h");
        let b = eval("Kh Ks Qd Qs 7s 7d 6h");
        assert!(a > b);
    }

    #[test]
    fn wheel_loses_to_six_high_straight() {
        assert!(eval("Ac 2d 3h 4s 5c Kd Qh") < eval("2c 3d 4h 5s 6c Kd Qh"));
    }

    #[test]
    fn evaluator_trait_matches_free_function() {
        let cards = parse_cards("As Ah Kc Qd Jh 3s 2c").unwrap();
        let v = SevenCardEvaluator.rank(&cards).unwrap();
        assert_eq!(v, evaluate_cards(&cards).unwrap().value());
        assert!(SevenCardEvaluator.rank(&cards[..3]).is_none());
    }
}
