use super::{get_opponent_range, HandRange, OpponentInfo};
use crate::cards::Card;
use crate::config::RangeConfig;
use crate::deck::CardSet;
use crate::evaluator::rank_groups::RankGroups;
use crate::evaluator::straight_info::{best_window_count, straight_top};
use crate::evaluator::suit_info::SuitInfo;
use crate::hand::HoleCards;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

const MADE_HAND: f64 = 2.0;
const ONE_PAIR: f64 = 1.5;
const STRONG_DRAW: f64 = 1.2;
const GUTSHOT: f64 = 1.1;
const AIR: f64 = 0.7;

// Rejection attempts before falling back to filtering out blocked combos.
const REJECTION_TRIES: usize = 32;

/// How well a holding connects with the board, as a sampling weight.
///
/// Only the hole cards' contribution counts: a straight or flush that is
/// entirely on the board does not make every holding "made".
///
/// ```
/// use poker_coach::cards::parse_cards;
/// use poker_coach::range::board_connection_weight;
///
/// let board = parse_cards("Kh 7d 2s").unwrap();
/// assert_eq!(board_connection_weight(&"7c 7h".parse().unwrap(), &board), 2.0);
/// assert_eq!(board_connection_weight(&"Ac Qd".parse().unwrap(), &board), 0.7);
/// ```
pub fn board_connection_weight(hole: &HoleCards, board: &[Card]) -> f64 {
    let [a, b] = hole.as_array();
    let mut all = Vec::with_capacity(board.len() + 2);
    all.extend_from_slice(board);
    all.extend([a, b]);
    let suits = SuitInfo::detect(&all);
    let groups = RankGroups::from_cards(&all);
    let board_mask = RankGroups::from_cards(board).mask();
    let all_mask = groups.mask();
    let hole_mask = with_low_ace((1 << a.rank().value()) | (1 << b.rank().value()));

    let suited_with_hole = |n: u8| [a, b].iter().any(|c| suits.count(c.suit()) >= n);
    let on_board = |c: Card| board.iter().any(|x| x.rank() == c.rank());
    let pocket_pair = a.rank() == b.rank();

    let flush = suited_with_hole(5);
    let straight = straight_top(all_mask).is_some_and(|top| Some(top) != straight_top(board_mask));
    let set = [a, b].iter().any(|c| groups.count(c.rank().value()) >= 3);
    let two_pair = !pocket_pair && on_board(a) && on_board(b);
    if flush || straight || set || two_pair {
        return MADE_HAND;
    }
    if pocket_pair || on_board(a) || on_board(b) {
        return ONE_PAIR;
    }
    if suited_with_hole(4) || open_ended(with_low_ace(all_mask), hole_mask) {
        return STRONG_DRAW;
    }
    if gutshot(with_low_ace(all_mask), hole_mask) {
        return GUTSHOT;
    }
    AIR
}

fn with_low_ace(mask: u16) -> u16 {
    if mask & (1 << 14) != 0 {
        mask | (1 << 1)
    } else {
        mask
    }
}

// Four in a row with a live card at both ends, using at least one hole card.
fn open_ended(mask: u16, hole_mask: u16) -> bool {
    (2u8..=10).any(|low| {
        let run = 0b1111u16 << low;
        mask & run == run && hole_mask & run != 0
    })
}

// Four of the five ranks of some straight, using at least one hole card.
fn gutshot(mask: u16, hole_mask: u16) -> bool {
    if best_window_count(mask) < 4 {
        return false;
    }
    (5u8..=14).any(|top| {
        let window = 0b1_1111u16 << (top - 4);
        (mask & window).count_ones() == 4 && hole_mask & window != 0
    })
}

/// Weighted draws of concrete holdings from a range.
///
/// Build once per decision and sample many times: combos and weights are
/// precomputed, and each draw only has to dodge the cards already dealt.
#[derive(Debug, Clone)]
pub struct RangeSampler {
    combos: Vec<HoleCards>,
    weights: Vec<f64>,
    index: Option<WeightedIndex<f64>>,
}

impl RangeSampler {
    /// Uniform over the combos of `range` that avoid `dead`.
    pub fn new(range: &HandRange, dead: &CardSet) -> Self {
        let combos = range.combos(dead);
        let weights = vec![1.0; combos.len()];
        Self::from_parts(combos, weights)
    }

    /// Combos weighted by [`board_connection_weight`].
    pub fn weighted(range: &HandRange, dead: &CardSet, board: &[Card]) -> Self {
        let combos = range.combos(dead);
        let weights = combos.iter().map(|c| board_connection_weight(c, board)).collect();
        Self::from_parts(combos, weights)
    }

    /// Resolve the opponent's range and weight it by the board when they are
    /// betting or raising into a flop, turn or river.
    pub fn for_opponent(
        opponent: &OpponentInfo,
        dead: &CardSet,
        board: &[Card],
        config: &RangeConfig,
    ) -> Self {
        let range = get_opponent_range(opponent, config);
        let sampler = if board.len() >= 3 && opponent.is_aggressive_now() {
            Self::weighted(&range, dead, board)
        } else {
            Self::new(&range, dead)
        };
        if sampler.is_empty() {
            log::warn!("every combo in '{}' range is blocked", opponent.name);
        }
        sampler
    }

    fn from_parts(combos: Vec<HoleCards>, weights: Vec<f64>) -> Self {
        let index = WeightedIndex::new(&weights).ok();
        Self { combos, weights, index }
    }

    /// Number of live combos.
    pub fn len(&self) -> usize {
        self.combos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    pub fn combos(&self) -> &[HoleCards] {
        &self.combos
    }

    /// Sampling weight of a holding, in either card order.
    pub fn weight_of(&self, hole: &HoleCards) -> Option<f64> {
        let key = hole.card_set();
        self.combos.iter().position(|c| c.card_set() == key).map(|i| self.weights[i])
    }

    /// Draw one holding that avoids `blocked`, or `None` if every combo is blocked.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, blocked: &CardSet) -> Option<HoleCards> {
        let index = self.index.as_ref()?;
        for _ in 0..REJECTION_TRIES {
            let pick = self.combos[index.sample(rng)];
            if !pick.conflicts_with(blocked) {
                return Some(pick);
            }
        }
        let (live, weights): (Vec<HoleCards>, Vec<f64>) = self
            .combos
            .iter()
            .zip(&self.weights)
            .filter(|(c, _)| !c.conflicts_with(blocked))
            .map(|(c, w)| (*c, *w))
            .unzip();
        let fallback = WeightedIndex::new(&weights).ok()?;
        Some(live[fallback.sample(rng)])
    }
}

/// One-shot draw for an opponent; see [`RangeSampler::for_opponent`].
pub fn sample_hand_for_opponent<R: Rng + ?Sized>(
    opponent: &OpponentInfo,
    excluded: &CardSet,
    rng: &mut R,
    board: &[Card],
    config: &RangeConfig,
) -> Option<HoleCards> {
    RangeSampler::for_opponent(opponent, excluded, board, config).sample(rng, excluded)
}
