//! Scoring a single decision: was the action taken +EV or -EV?
//!
//! The analyzer estimates the player's equity (against known hands, opponent
//! ranges, or random hands), derives the side-pot-aware expected value of
//! calling, and compares the action taken with the EV-optimal one.

use crate::config::{CoachConfig, RangeConfig};
use crate::deck::CardSet;
use crate::equity::{EquityCalculator, EquityError, Villain};
use crate::evaluator::SevenCardEvaluator;
use crate::hand::{validate_holdem, Board, HandError, HoleCards, Street};
use crate::range::{get_opponent_range, OpponentInfo, RangeSampler};
use crate::texture::{analyze_board_texture, TextureCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum DecisionError {
    #[error("invalid hand: {0}")]
    Hand(#[from] HandError),
    #[error("equity failed: {0}")]
    Equity(#[from] EquityError),
}

/// What the player actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    #[serde(alias = "bet")]
    Raise,
    #[serde(alias = "all-in", alias = "allin")]
    AllIn,
}

impl PlayerAction {
    /// Puts chips in to continue.
    pub fn continues(self) -> bool {
        matches!(self, PlayerAction::Call | PlayerAction::Raise | PlayerAction::AllIn)
    }
}

impl std::str::FromStr for PlayerAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fold" => Ok(PlayerAction::Fold),
            "check" => Ok(PlayerAction::Check),
            "call" => Ok(PlayerAction::Call),
            "raise" | "bet" => Ok(PlayerAction::Raise),
            "all_in" | "all-in" | "allin" => Ok(PlayerAction::AllIn),
            other => Err(format!("unknown action '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimalAction {
    Call,
    Fold,
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionQuality {
    Correct,
    Mistake,
    Unknown,
}

/// Where the equity figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquitySource {
    KnownHands,
    Ranges,
    Random,
}

/// A decision to score, as supplied by the game layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    #[serde(default)]
    pub game_id: String,
    pub player_name: String,
    #[serde(default)]
    pub hand_number: u32,
    /// Betting round; derived from the board when absent.
    #[serde(default)]
    pub phase: Option<Street>,
    pub player_hand: HoleCards,
    #[serde(default)]
    pub community_cards: Board,
    pub pot_total: u64,
    pub cost_to_call: u64,
    pub player_stack: u64,
    pub num_opponents: usize,
    pub action_taken: PlayerAction,
    #[serde(default)]
    pub raise_amount: Option<u64>,
    /// Chips the player already has in front of them this street.
    #[serde(default)]
    pub player_bet: u64,
    /// Every other player's bet this street, folded players included.
    #[serde(default)]
    pub all_players_bets: Option<Vec<u64>>,
    /// Opponent holdings, when known.
    #[serde(default)]
    pub opponent_hands: BTreeMap<String, HoleCards>,
    /// Tendencies of the opponents still in the hand.
    #[serde(default)]
    pub opponents: Vec<OpponentInfo>,
}

impl DecisionRequest {
    /// A request with no betting history, stats or known opponent hands.
    pub fn new(player_name: impl Into<String>, player_hand: HoleCards, board: Board) -> Self {
        Self {
            game_id: String::new(),
            player_name: player_name.into(),
            hand_number: 0,
            phase: None,
            player_hand,
            community_cards: board,
            pot_total: 0,
            cost_to_call: 0,
            player_stack: 0,
            num_opponents: 1,
            action_taken: PlayerAction::Check,
            raise_amount: None,
            player_bet: 0,
            all_players_bets: None,
            opponent_hands: BTreeMap::new(),
            opponents: Vec::new(),
        }
    }

    pub fn with_pot(mut self, pot_total: u64, cost_to_call: u64, player_stack: u64) -> Self {
        self.pot_total = pot_total;
        self.cost_to_call = cost_to_call;
        self.player_stack = player_stack;
        self
    }

    pub fn with_action(mut self, action: PlayerAction) -> Self {
        self.action_taken = action;
        self
    }
}

/// Range summary for one opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentRangeSummary {
    pub name: String,
    pub hands: usize,
    pub combos: usize,
    pub percentage: f64,
}

/// The scored decision. Serializable for the caller to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionAnalysis {
    pub game_id: String,
    pub player_name: String,
    pub hand_number: u32,
    pub phase: Street,
    pub pot_total: u64,
    pub cost_to_call: u64,
    pub player_stack: u64,
    pub num_opponents: usize,
    pub player_hand: HoleCards,
    pub community_cards: Board,
    pub player_bet: u64,
    pub action_taken: PlayerAction,
    pub raise_amount: Option<u64>,
    pub equity: Option<f64>,
    pub equity_source: Option<EquitySource>,
    pub equity_samples: usize,
    pub required_equity: f64,
    pub pot_odds: Option<f64>,
    pub max_winnable: u64,
    pub ev_call: Option<f64>,
    pub optimal_action: Option<OptimalAction>,
    pub decision_quality: DecisionQuality,
    pub ev_lost: f64,
    pub board_texture: Option<TextureCategory>,
    pub opponent_ranges: Vec<OpponentRangeSummary>,
}

/// Break-even equity for a call: `cost / (pot + cost)`, or 0 when checking is free.
///
/// ```
/// use poker_coach::decision::required_equity;
///
/// assert!((required_equity(100, 20) - 20.0 / 120.0).abs() < 1e-12);
/// assert_eq!(required_equity(100, 0), 0.0);
/// ```
pub fn required_equity(pot_total: u64, cost_to_call: u64) -> f64 {
    if cost_to_call == 0 {
        return 0.0;
    }
    cost_to_call as f64 / pot_total.saturating_add(cost_to_call) as f64
}

/// Pot-to-call ratio (`pot / cost`), `None` when there is nothing to call.
pub fn pot_odds(pot_total: u64, cost_to_call: u64) -> Option<f64> {
    (cost_to_call > 0).then(|| pot_total as f64 / cost_to_call as f64)
}

/// The most a call can win when it puts the player all in.
///
/// Each other bet (folded players' dead money included) can only be won up
/// to the player's own contribution, and the contribution itself comes back.
/// Exact heads-up; an approximation when three or more stacks differ.
///
/// ```
/// use poker_coach::decision::calculate_max_winnable;
///
/// // 100 behind facing a 500 bet: only 100 of it can be won
/// assert_eq!(calculate_max_winnable(0, 100, 500, &[500]), 200);
/// ```
pub fn calculate_max_winnable(
    player_bet: u64,
    player_stack: u64,
    cost_to_call: u64,
    all_players_bets: &[u64],
) -> u64 {
    let contribution = player_bet.saturating_add(cost_to_call.min(player_stack));
    all_players_bets
        .iter()
        .fold(contribution, |total, &b| total.saturating_add(b.min(contribution)))
}

/// Expected chips from calling.
pub fn expected_value_of_call(
    equity: f64,
    max_winnable: u64,
    cost_to_call: u64,
    player_stack: u64,
) -> f64 {
    let risk = cost_to_call.min(player_stack) as f64;
    equity * max_winnable as f64 - (1.0 - equity) * risk
}

/// The optimal action and how the taken one compares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub optimal_action: OptimalAction,
    pub decision_quality: DecisionQuality,
    pub ev_lost: f64,
}

/// Compare `action` with the EV-optimal choice.
///
/// ```
/// use poker_coach::decision::{classify_decision, DecisionQuality, PlayerAction};
///
/// let v = classify_decision(64.0, 20, PlayerAction::Fold);
/// assert_eq!(v.decision_quality, DecisionQuality::Mistake);
/// assert_eq!(v.ev_lost, 64.0);
/// ```
pub fn classify_decision(ev_call: f64, cost_to_call: u64, action: PlayerAction) -> Verdict {
    let (optimal_action, mistake) = if cost_to_call == 0 {
        (OptimalAction::Check, action == PlayerAction::Fold)
    } else if ev_call > 0.0 {
        (OptimalAction::Call, action == PlayerAction::Fold)
    } else {
        (OptimalAction::Fold, action.continues())
    };
    // a free check is not available when facing a bet
    let decision_quality = if cost_to_call > 0 && action == PlayerAction::Check {
        DecisionQuality::Unknown
    } else if mistake {
        DecisionQuality::Mistake
    } else {
        DecisionQuality::Correct
    };
    let ev_lost = if decision_quality == DecisionQuality::Mistake { ev_call.abs() } else { 0.0 };
    Verdict { optimal_action, decision_quality, ev_lost }
}

/// Scores decisions with an injected equity calculator.
#[derive(Debug, Clone)]
pub struct DecisionAnalyzer {
    equity: EquityCalculator,
    range: RangeConfig,
}

impl Default for DecisionAnalyzer {
    fn default() -> Self {
        Self::from_config(&CoachConfig::default())
    }
}

impl DecisionAnalyzer {
    pub fn new(equity: EquityCalculator, range: RangeConfig) -> Self {
        Self { equity, range }
    }

    /// Bundled evaluator with the given settings.
    pub fn from_config(config: &CoachConfig) -> Self {
        Self::new(
            EquityCalculator::new(SevenCardEvaluator, config.equity.clone()),
            config.range.clone(),
        )
    }

    /// Estimate equity and score the action.
    ///
    /// Missing evaluator or no opponents leaves equity empty and the
    /// quality unknown; only invalid cards are errors.
    pub fn analyze(&self, request: &DecisionRequest) -> Result<DecisionAnalysis, DecisionError> {
        validate_holdem(&request.player_hand, &request.community_cards)?;
        let mut summaries = Vec::new();
        let estimate = self.estimate_equity(request, &mut summaries)?;
        let mut analysis = self.analyze_with_equity(request, estimate.map(|(e, _, _)| e));
        if let Some((_, source, samples)) = estimate {
            analysis.equity_source = Some(source);
            analysis.equity_samples = samples;
        }
        analysis.opponent_ranges = summaries;
        Ok(analysis)
    }

    /// Score the action against an equity figure computed elsewhere.
    pub fn analyze_with_equity(
        &self,
        request: &DecisionRequest,
        equity: Option<f64>,
    ) -> DecisionAnalysis {
        let r = request;
        let max_winnable = match &r.all_players_bets {
            Some(bets) if r.player_stack <= r.cost_to_call => {
                calculate_max_winnable(r.player_bet, r.player_stack, r.cost_to_call, bets)
            }
            _ => r.pot_total,
        };
        let ev_call = equity
            .map(|eq| expected_value_of_call(eq, max_winnable, r.cost_to_call, r.player_stack));
        let verdict = ev_call.map(|ev| classify_decision(ev, r.cost_to_call, r.action_taken));

        let analysis = DecisionAnalysis {
            game_id: r.game_id.clone(),
            player_name: r.player_name.clone(),
            hand_number: r.hand_number,
            phase: r.phase.unwrap_or_else(|| r.community_cards.street()),
            pot_total: r.pot_total,
            cost_to_call: r.cost_to_call,
            player_stack: r.player_stack,
            num_opponents: r.num_opponents,
            player_hand: r.player_hand,
            community_cards: r.community_cards.clone(),
            player_bet: r.player_bet,
            action_taken: r.action_taken,
            raise_amount: r.raise_amount,
            equity,
            equity_source: None,
            equity_samples: 0,
            required_equity: required_equity(r.pot_total, r.cost_to_call),
            pot_odds: pot_odds(r.pot_total, r.cost_to_call),
            max_winnable,
            ev_call,
            optimal_action: verdict.map(|v| v.optimal_action),
            decision_quality: verdict.map_or(DecisionQuality::Unknown, |v| v.decision_quality),
            ev_lost: verdict.map_or(0.0, |v| v.ev_lost),
            board_texture: analyze_board_texture(r.community_cards.as_slice()).category(),
            opponent_ranges: Vec::new(),
        };
        log::debug!(
            "{} hand {}: {:?} with equity {:?}, ev_call {:?} -> {:?}",
            analysis.player_name,
            analysis.hand_number,
            analysis.action_taken,
            analysis.equity,
            analysis.ev_call,
            analysis.decision_quality
        );
        analysis
    }

    fn estimate_equity(
        &self,
        r: &DecisionRequest,
        summaries: &mut Vec<OpponentRangeSummary>,
    ) -> Result<Option<(f64, EquitySource, usize)>, DecisionError> {
        let board = &r.community_cards;
        let (mut field, source) = if !r.opponent_hands.is_empty() {
            let field: Vec<Villain> =
                r.opponent_hands.values().map(|h| Villain::Known(*h)).collect();
            (field, EquitySource::KnownHands)
        } else if !r.opponents.is_empty() {
            let dead: CardSet = r.player_hand.card_set().union(board.card_set());
            let field = r
                .opponents
                .iter()
                .map(|o| {
                    let range = get_opponent_range(o, &self.range);
                    summaries.push(OpponentRangeSummary {
                        name: o.name.clone(),
                        hands: range.len(),
                        combos: range.combo_count(),
                        percentage: range.percentage(),
                    });
                    let sampler =
                        RangeSampler::for_opponent(o, &dead, board.as_slice(), &self.range);
                    if sampler.is_empty() {
                        Villain::Random
                    } else {
                        Villain::Range(sampler)
                    }
                })
                .collect();
            (field, EquitySource::Ranges)
        } else {
            (Vec::new(), EquitySource::Random)
        };
        // seats nobody told us about are random hands
        while field.len() < r.num_opponents {
            field.push(Villain::Random);
        }
        if field.is_empty() {
            log::debug!("{}: no opponents, equity unknown", r.player_name);
            return Ok(None);
        }

        let hero = self.equity.equity_vs_field(&r.player_hand, board, &field)?;
        Ok(hero.map(|h| (h.equity, source, h.sample_count)))
    }
}
