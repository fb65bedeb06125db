//! Win probability of hands against each other.
//!
//! A complete board is settled exactly with one showdown. Anything shorter
//! is estimated by Monte Carlo: the missing board cards are dealt at random
//! from the cards nobody holds and every runout is scored.
//!
//! Runouts are split into fixed-size batches, and batch `i` runs its own
//! `ChaCha8Rng` derived from the seed and `i`. Batches are summed in order,
//! so a seeded result is identical whether or not they ran on rayon.

use crate::cards::Card;
use crate::config::{EquityConfig, SwingThresholds};
use crate::deck::{CardSet, Deck};
use crate::evaluator::{HandEvaluator, HandValue, SevenCardEvaluator};
use crate::hand::{Board, HandError, HoleCards};
use crate::range::RangeSampler;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EquityError {
    #[error("card {0} is used more than once")]
    DuplicateCard(Card),
    #[error("board has {0} cards, at most 5 allowed")]
    TooManyBoardCards(usize),
    #[error("player '{0}' is listed twice")]
    DuplicatePlayer(String),
    #[error(transparent)]
    Hand(#[from] HandError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquityMethod {
    Exact,
    MonteCarlo,
}

/// Equity of every player in a showdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityResult {
    /// Expected share of the pot; split pots count fractionally. Sums to 1.
    pub equities: BTreeMap<String, f64>,
    /// Probability of winning outright. Sums to `1 - tie_probability`.
    pub win_probabilities: BTreeMap<String, f64>,
    /// Probability that the pot is split.
    pub tie_probability: f64,
    pub sample_count: usize,
    pub method: EquityMethod,
}

impl EquityResult {
    pub fn equity(&self, player: &str) -> Option<f64> {
        self.equities.get(player).copied()
    }
}

/// The deciding player's equity against a field of opponents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeroEquity {
    pub equity: f64,
    pub win_probability: f64,
    pub tie_probability: f64,
    pub sample_count: usize,
    pub method: EquityMethod,
}

/// One opponent in [`EquityCalculator::equity_vs_field`].
#[derive(Debug, Clone)]
pub enum Villain {
    /// Cards are known (shown down or revealed).
    Known(HoleCards),
    /// Drawn from a range each runout; random cards if every combo is blocked.
    Range(RangeSampler),
    /// Any two live cards.
    Random,
}

/// A player whose equity moved sharply between two results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquitySwing {
    pub player: String,
    pub before: f64,
    pub after: f64,
    pub delta: f64,
    pub is_dramatic: bool,
}

/// Runs showdowns through an injected [`HandEvaluator`].
///
/// ```
/// use std::collections::BTreeMap;
/// use poker_coach::config::EquityConfig;
/// use poker_coach::equity::EquityCalculator;
///
/// let evaluator = poker_coach::evaluator::SevenCardEvaluator;
/// let calc = EquityCalculator::new(evaluator, EquityConfig::default());
/// let mut players = BTreeMap::new();
/// players.insert("hero".to_string(), "As Ah".parse().unwrap());
/// players.insert("villain".to_string(), "Kd Kc".parse().unwrap());
/// let board = "2c 7d 9h Js 3s".parse().unwrap();
/// let result = calc.calculate_equity(&players, &board).unwrap().unwrap();
/// assert_eq!(result.equity("hero"), Some(1.0));
/// ```
#[derive(Clone)]
pub struct EquityCalculator {
    evaluator: Option<Arc<dyn HandEvaluator>>,
    config: EquityConfig,
}

impl std::fmt::Debug for EquityCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EquityCalculator")
            .field("evaluator", &self.evaluator.as_ref().map(|e| e.name()))
            .field("config", &self.config)
            .finish()
    }
}

impl Default for EquityCalculator {
    fn default() -> Self {
        Self::new(SevenCardEvaluator, EquityConfig::default())
    }
}

impl EquityCalculator {
    pub fn new(evaluator: impl HandEvaluator + 'static, config: EquityConfig) -> Self {
        Self { evaluator: Some(Arc::new(evaluator)), config }
    }

    pub fn with_shared(evaluator: Arc<dyn HandEvaluator>, config: EquityConfig) -> Self {
        Self { evaluator: Some(evaluator), config }
    }

    /// A calculator with no hand evaluator. Every calculation returns `Ok(None)`.
    pub fn unavailable(config: EquityConfig) -> Self {
        Self { evaluator: None, config }
    }

    pub fn is_available(&self) -> bool {
        self.evaluator.is_some()
    }

    pub fn config(&self) -> &EquityConfig {
        &self.config
    }

    /// Equity of every named hand on `board`.
    ///
    /// `Ok(None)` when there is no evaluator or fewer than two players.
    pub fn calculate_equity(
        &self,
        players: &BTreeMap<String, HoleCards>,
        board: &Board,
    ) -> Result<Option<EquityResult>, EquityError> {
        if board.len() > 5 {
            return Err(EquityError::TooManyBoardCards(board.len()));
        }
        let dead = known_cards(players.values(), board)?;
        let Some(evaluator) = self.evaluator.as_deref() else {
            log::warn!("no hand evaluator available, skipping equity");
            return Ok(None);
        };
        if players.len() < 2 {
            log::debug!("equity needs two players, got {}", players.len());
            return Ok(None);
        }

        let hands: Vec<[Card; 2]> = players.values().map(HoleCards::as_array).collect();
        let (tally, method) = if board.is_complete() {
            let mut tally = Tally::new(hands.len());
            showdown(evaluator, &hands, board.as_slice(), &mut Vec::new(), &mut tally);
            (tally, EquityMethod::Exact)
        } else {
            let template = Deck::without(&dead);
            let need = 5 - board.len();
            if template.len() < need {
                log::debug!("only {} live cards, cannot complete the board", template.len());
                return Ok(None);
            }
            let tally = self.simulate(hands.len(), |rng, tally, n| {
                let mut deck = template.clone();
                let mut full = Vec::with_capacity(5);
                let mut values = Vec::with_capacity(hands.len());
                for _ in 0..n {
                    full.clear();
                    full.extend_from_slice(board.as_slice());
                    full.extend_from_slice(deck.deal_random(rng, need));
                    showdown(evaluator, &hands, &full, &mut values, tally);
                }
            });
            (tally, EquityMethod::MonteCarlo)
        };

        if tally.samples == 0 {
            log::warn!("evaluator '{}' could not rank any showdown", evaluator.name());
            return Ok(None);
        }
        log::debug!("{method:?} equity for {} players over {} samples", hands.len(), tally.samples);
        let names = players.keys();
        Ok(Some(EquityResult {
            equities: names.clone().cloned().zip(tally.equities()).collect(),
            win_probabilities: names.cloned().zip(tally.win_probabilities()).collect(),
            tie_probability: tally.tie_probability(),
            sample_count: tally.samples as usize,
            method,
        }))
    }

    /// String ingress: `(name, "As Kd")` pairs and a board such as `"Jh 2d 5s"`.
    pub fn calculate_equity_str(
        &self,
        players: &[(&str, &str)],
        board: &str,
    ) -> Result<Option<EquityResult>, EquityError> {
        let mut hands = BTreeMap::new();
        for (name, cards) in players {
            let hole: HoleCards = cards.parse()?;
            if hands.insert(name.to_string(), hole).is_some() {
                return Err(EquityError::DuplicatePlayer(name.to_string()));
            }
        }
        let board: Board = board.parse()?;
        self.calculate_equity(&hands, &board)
    }

    /// `hero`'s equity against opponents that may be known, ranged or random.
    ///
    /// Each runout deals the villains in order, each avoiding the cards
    /// already out, then completes the board.
    pub fn equity_vs_field(
        &self,
        hero: &HoleCards,
        board: &Board,
        field: &[Villain],
    ) -> Result<Option<HeroEquity>, EquityError> {
        if board.len() > 5 {
            return Err(EquityError::TooManyBoardCards(board.len()));
        }
        let known = field.iter().filter_map(|v| match v {
            Villain::Known(h) => Some(h),
            _ => None,
        });
        let dead = known_cards(std::iter::once(hero).chain(known), board)?;
        let Some(evaluator) = self.evaluator.as_deref() else {
            log::warn!("no hand evaluator available, skipping equity");
            return Ok(None);
        };
        if field.is_empty() {
            return Ok(None);
        }

        let players = field.len() + 1;
        let all_known = field.iter().all(|v| matches!(v, Villain::Known(_)));
        let (tally, method) = if all_known && board.is_complete() {
            let mut hands = vec![hero.as_array()];
            hands.extend(field.iter().filter_map(|v| match v {
                Villain::Known(h) => Some(h.as_array()),
                _ => None,
            }));
            let mut tally = Tally::new(players);
            showdown(evaluator, &hands, board.as_slice(), &mut Vec::new(), &mut tally);
            (tally, EquityMethod::Exact)
        } else {
            let template = Deck::without(&dead);
            let tally = self.simulate(players, |rng, tally, n| {
                let mut hands = Vec::with_capacity(players);
                let mut values = Vec::with_capacity(players);
                let mut full = Vec::with_capacity(5);
                for _ in 0..n {
                    let mut deck = template.clone();
                    deck.shuffle_with(rng);
                    let mut blocked = dead;
                    hands.clear();
                    hands.push(hero.as_array());
                    let dealt = field.iter().all(|v| {
                        let hole = match v {
                            Villain::Known(h) => Some(*h),
                            Villain::Range(s) => {
                                s.sample(rng, &blocked).or_else(|| random_hole(&mut deck, &blocked))
                            }
                            Villain::Random => random_hole(&mut deck, &blocked),
                        };
                        let Some(hole) = hole else { return false };
                        blocked = blocked.union(hole.card_set());
                        hands.push(hole.as_array());
                        true
                    });
                    full.clear();
                    full.extend_from_slice(board.as_slice());
                    while full.len() < 5 {
                        let Some(c) = next_live(&mut deck, &blocked) else { break };
                        blocked.insert(c);
                        full.push(c);
                    }
                    if dealt && full.len() == 5 {
                        showdown(evaluator, &hands, &full, &mut values, tally);
                    }
                }
            });
            (tally, EquityMethod::MonteCarlo)
        };

        if tally.samples == 0 {
            log::warn!("no showdown could be scored against the field");
            return Ok(None);
        }
        log::debug!(
            "hero {hero} vs {} opponents: {method:?}, {} samples",
            field.len(),
            tally.samples
        );
        Ok(Some(HeroEquity {
            equity: tally.share[0] / tally.samples as f64,
            win_probability: tally.wins[0] as f64 / tally.samples as f64,
            tie_probability: tally.tie_probability(),
            sample_count: tally.samples as usize,
            method,
        }))
    }

    fn seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(|| {
            let seed: u64 = rand::rng().random();
            log::debug!("no equity seed configured, using {seed}");
            seed
        })
    }

    fn simulate<F>(&self, players: usize, run: F) -> Tally
    where
        F: Fn(&mut ChaCha8Rng, &mut Tally, usize) + Sync,
    {
        let seed = self.seed();
        let iterations = self.config.iterations.max(1);
        let batch = self.config.batch_size.max(1);
        let batches = iterations.div_ceil(batch);
        let job = |i: usize| {
            let n = batch.min(iterations - i * batch);
            let mut rng = ChaCha8Rng::seed_from_u64(batch_seed(seed, i));
            let mut tally = Tally::new(players);
            run(&mut rng, &mut tally, n);
            log::trace!("batch {i}: {} samples", tally.samples);
            tally
        };
        log::debug!("monte carlo: {iterations} runouts in {batches} batches, seed {seed}");

        #[cfg(feature = "parallel")]
        let tallies: Vec<Tally> = (0..batches).into_par_iter().map(job).collect();
        #[cfg(not(feature = "parallel"))]
        let tallies: Vec<Tally> = (0..batches).map(job).collect();

        tallies.into_iter().fold(Tally::new(players), Tally::merge)
    }
}

/// Players whose pot share moved by at least `thresholds.notable`, biggest move first.
pub fn detect_swings(
    before: &EquityResult,
    after: &EquityResult,
    thresholds: &SwingThresholds,
) -> Vec<EquitySwing> {
    let mut swings: Vec<EquitySwing> = before
        .equities
        .iter()
        .filter_map(|(player, &b)| {
            let a = after.equity(player)?;
            let delta = a - b;
            (delta.abs() >= thresholds.notable).then(|| EquitySwing {
                player: player.clone(),
                before: b,
                after: a,
                delta,
                is_dramatic: delta.abs() >= thresholds.dramatic,
            })
        })
        .collect();
    swings.sort_by(|x, y| {
        y.delta.abs().total_cmp(&x.delta.abs()).then_with(|| x.player.cmp(&y.player))
    });
    swings
}

fn batch_seed(seed: u64, batch: usize) -> u64 {
    seed ^ (batch as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn known_cards<'a>(
    hands: impl Iterator<Item = &'a HoleCards>,
    board: &Board,
) -> Result<CardSet, EquityError> {
    let mut dead = CardSet::empty();
    let cards = hands.flat_map(|h| h.as_array()).chain(board.as_slice().iter().copied());
    for card in cards {
        if !dead.insert(card) {
            return Err(EquityError::DuplicateCard(card));
        }
    }
    Ok(dead)
}

fn next_live(deck: &mut Deck, blocked: &CardSet) -> Option<Card> {
    std::iter::from_fn(|| deck.draw()).find(|c| !blocked.contains(*c))
}

fn random_hole(deck: &mut Deck, blocked: &CardSet) -> Option<HoleCards> {
    let a = next_live(deck, blocked)?;
    let b = next_live(deck, blocked)?;
    HoleCards::try_new(a, b).ok()
}

// Score one complete board. Returns false if the evaluator refused a hand.
fn showdown(
    evaluator: &dyn HandEvaluator,
    hands: &[[Card; 2]],
    board: &[Card],
    values: &mut Vec<HandValue>,
    tally: &mut Tally,
) -> bool {
    values.clear();
    let n = 2 + board.len();
    for hole in hands {
        let mut buf = [hole[0]; 7];
        buf[1] = hole[1];
        buf[2..n].copy_from_slice(board);
        match evaluator.rank(&buf[..n]) {
            Some(v) => values.push(v),
            None => return false,
        }
    }
    tally.record(values);
    true
}

#[derive(Debug, Clone, Default)]
struct Tally {
    share: Vec<f64>,
    wins: Vec<u64>,
    ties: u64,
    samples: u64,
}

impl Tally {
    fn new(players: usize) -> Self {
        Self { share: vec![0.0; players], wins: vec![0; players], ties: 0, samples: 0 }
    }

    fn record(&mut self, values: &[HandValue]) {
        let Some(best) = values.iter().max() else { return };
        let winners = values.iter().filter(|v| *v == best).count();
        let part = 1.0 / winners as f64;
        for (i, v) in values.iter().enumerate() {
            if v == best {
                self.share[i] += part;
                if winners == 1 {
                    self.wins[i] += 1;
                }
            }
        }
        if winners > 1 {
            self.ties += 1;
        }
        self.samples += 1;
    }

    fn merge(mut self, other: Tally) -> Tally {
        for (a, b) in self.share.iter_mut().zip(&other.share) {
            *a += b;
        }
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        self.ties += other.ties;
        self.samples += other.samples;
        self
    }

    fn equities(&self) -> impl Iterator<Item = f64> + '_ {
        let n = self.samples as f64;
        self.share.iter().map(move |s| s / n)
    }

    fn win_probabilities(&self) -> impl Iterator<Item = f64> + '_ {
        let n = self.samples as f64;
        self.wins.iter().map(move |&w| w as f64 / n)
    }

    fn tie_probability(&self) -> f64 {
        self.ties as f64 / self.samples as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(iterations: usize, seed: u64) -> EquityCalculator {
        EquityCalculator::new(
            SevenCardEvaluator,
            EquityConfig::default().with_iterations(iterations).with_seed(seed),
        )
    }

    #[test]
    fn split_board_is_an_exact_tie() {
        let r = calc(100, 1)
            .calculate_equity_str(&[("a", "2c 3d"), ("b", "4c 5d")], "As Ks Qs Js Ts")
            .unwrap()
            .unwrap();
        assert_eq!(r.method, EquityMethod::Exact);
        assert_eq!(r.sample_count, 1);
        assert_eq!(r.tie_probability, 1.0);
        assert_eq!(r.equity("a"), Some(0.5));
        assert_eq!(r.win_probabilities["a"], 0.0);
    }

    #[test]
    fn needs_two_players_and_an_evaluator() {
        let c = calc(100, 1);
        assert!(c.calculate_equity_str(&[("a", "As Ks")], "").unwrap().is_none());
        let off = EquityCalculator::unavailable(EquityConfig::default());
        assert!(off.calculate_equity_str(&[("a", "As Ks"), ("b", "Qd Qc")], "").unwrap().is_none());
    }

    #[test]
    fn shared_cards_are_rejected() {
        let c = calc(100, 1);
        assert!(matches!(
            c.calculate_equity_str(&[("a", "As Ks"), ("b", "As Qc")], ""),
            Err(EquityError::DuplicateCard(_))
        ));
        assert!(matches!(
            c.calculate_equity_str(&[("a", "As Ks"), ("b", "Qd Qc")], "Ks 2c 3c"),
            Err(EquityError::DuplicateCard(_))
        ));
        assert!(matches!(
            c.calculate_equity_str(&[("a", "As Ks"), ("a", "Qd Qc")], ""),
            Err(EquityError::DuplicatePlayer(_))
        ));
    }

    #[test]
    fn batch_boundaries_cover_all_iterations() {
        let c = EquityCalculator::new(
            SevenCardEvaluator,
            EquityConfig { iterations: 1234, seed: Some(5), batch_size: 500 },
        );
        let r = c.calculate_equity_str(&[("a", "As Ks"), ("b", "Qd Qc")], "").unwrap().unwrap();
        assert_eq!(r.sample_count, 1234);
        assert_eq!(r.method, EquityMethod::MonteCarlo);
    }

    #[test]
    fn too_few_live_cards_to_finish_the_board() {
        let deck = Deck::standard();
        let players: BTreeMap<String, HoleCards> = deck.as_slice()[..48]
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| (format!("p{i:02}"), HoleCards::try_new(pair[0], pair[1]).unwrap()))
            .collect();
        assert_eq!(players.len(), 24);
        let r = calc(100, 1).calculate_equity(&players, &Board::default()).unwrap();
        assert!(r.is_none());
    }

    #[test]
    fn field_of_known_hands_on_river_is_exact() {
        let hero: HoleCards = "As Ah".parse().unwrap();
        let board: Board = "2c 7d 9h Js 3s".parse().unwrap();
        let field = [Villain::Known("Kd Kc".parse().unwrap())];
        let r = calc(100, 1).equity_vs_field(&hero, &board, &field).unwrap().unwrap();
        assert_eq!(r.method, EquityMethod::Exact);
        assert_eq!(r.equity, 1.0);
    }

    #[test]
    fn swings_sorted_by_size() {
        let mk = |a: f64, b: f64, c: f64| EquityResult {
            equities: [("a", a), ("b", b), ("c", c)]
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            win_probabilities: BTreeMap::new(),
            tie_probability: 0.0,
            sample_count: 1,
            method: EquityMethod::Exact,
        };
        let swings =
            detect_swings(&mk(0.5, 0.3, 0.2), &mk(0.2, 0.5, 0.3), &SwingThresholds::default());
        assert_eq!(swings.len(), 2);
        assert_eq!(swings[0].player, "a");
        assert!(swings[0].is_dramatic);
        assert_eq!(swings[1].player, "b");
        assert!(!swings[1].is_dramatic);
    }

    #[test]
    fn swing_thresholds_are_inclusive() {
        let mk = |a: f64, b: f64, c: f64| EquityResult {
            equities: [("a", a), ("b", b), ("c", c)]
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            win_probabilities: BTreeMap::new(),
            tie_probability: 0.0,
            sample_count: 1,
            method: EquityMethod::Exact,
        };
        let swings =
            detect_swings(&mk(0.0, 0.0, 1.0), &mk(0.15, 0.25, 0.6), &SwingThresholds::default());
        assert_eq!(swings.len(), 3);
        let a = swings.iter().find(|s| s.player == "a").unwrap();
        assert_eq!(a.delta, 0.15);
        assert!(!a.is_dramatic);
        let b = swings.iter().find(|s| s.player == "b").unwrap();
        assert!(b.is_dramatic);
    }
}
