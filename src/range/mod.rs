//! Opponent hand ranges.
//!
//! Ranges are sets of [`CanonicalHand`] labels. They come from static,
//! nested tiers and are narrowed by what is known about the opponent:
//! table position, long-run statistics (VPIP/PFR), the preflop action
//! taken this hand and how aggressive they are on the current street.

mod sampling;
mod tables;

pub use sampling::{board_connection_weight, sample_hand_for_opponent, RangeSampler};

use crate::config::RangeConfig;
use crate::deck::CardSet;
use crate::hand::HoleCards;
use crate::notation::{CanonicalHand, NotationError, NUM_CANONICAL_HANDS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A set of starting-hand classes without duplicates.
///
/// ```
/// use poker_coach::range::HandRange;
///
/// let r: HandRange = "AA, KK, AKs".parse().unwrap();
/// assert_eq!(r.len(), 3);
/// assert_eq!(r.combo_count(), 16);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandRange {
    hands: BTreeSet<CanonicalHand>,
}

impl HandRange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a list of labels.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, NotationError> {
        labels.iter().map(|l| l.as_ref().parse::<CanonicalHand>()).collect()
    }

    pub fn insert(&mut self, hand: CanonicalHand) -> bool {
        self.hands.insert(hand)
    }

    pub fn contains(&self, hand: &CanonicalHand) -> bool {
        self.hands.contains(hand)
    }

    /// True if the concrete holding belongs to one of the classes.
    pub fn contains_hole(&self, hole: &HoleCards) -> bool {
        self.hands.contains(&hole.canonical())
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    /// Share of the 169 classes, 0–100.
    pub fn percentage(&self) -> f64 {
        self.hands.len() as f64 / NUM_CANONICAL_HANDS as f64 * 100.0
    }

    /// Number of concrete two-card holdings covered.
    pub fn combo_count(&self) -> usize {
        self.hands.iter().map(|h| h.combo_count()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalHand> + '_ {
        self.hands.iter()
    }

    pub fn difference(&self, other: &HandRange) -> HandRange {
        self.hands.difference(&other.hands).copied().collect()
    }

    pub fn intersection(&self, other: &HandRange) -> HandRange {
        self.hands.intersection(&other.hands).copied().collect()
    }

    pub fn union(&self, other: &HandRange) -> HandRange {
        self.hands.union(&other.hands).copied().collect()
    }

    pub fn is_subset(&self, other: &HandRange) -> bool {
        self.hands.is_subset(&other.hands)
    }

    /// Classes ordered strongest first by [`CanonicalHand::strength`].
    pub fn by_strength(&self) -> Vec<CanonicalHand> {
        let mut v: Vec<CanonicalHand> = self.hands.iter().copied().collect();
        v.sort_by(|a, b| b.strength().cmp(&a.strength()).then_with(|| b.cmp(a)));
        v
    }

    /// Every concrete holding in the range that avoids `dead`.
    pub fn combos(&self, dead: &CardSet) -> Vec<HoleCards> {
        self.hands
            .iter()
            .flat_map(|h| h.combos())
            .filter(|c| !c.conflicts_with(dead))
            .collect()
    }
}

impl FromIterator<CanonicalHand> for HandRange {
    fn from_iter<I: IntoIterator<Item = CanonicalHand>>(iter: I) -> Self {
        Self { hands: iter.into_iter().collect() }
    }
}

impl fmt::Display for HandRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, h) in self.by_strength().iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{h}")?;
        }
        Ok(())
    }
}

/// Comma and/or whitespace separated labels.
impl FromStr for HandRange {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(CanonicalHand::from_str)
            .collect()
    }
}

/// The nested static ranges, tightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeTier {
    UltraPremium,
    Early,
    Middle,
    Blind,
    Late,
    Loose,
    AnyTwo,
}

impl RangeTier {
    pub const ALL: [RangeTier; 7] = [
        RangeTier::UltraPremium,
        RangeTier::Early,
        RangeTier::Middle,
        RangeTier::Blind,
        RangeTier::Late,
        RangeTier::Loose,
        RangeTier::AnyTwo,
    ];

    pub fn range(self) -> &'static HandRange {
        &tier_ranges()[self as usize]
    }
}

fn labels<'a>(list: &'a [&'a str]) -> impl Iterator<Item = CanonicalHand> + 'a {
    list.iter().filter_map(|l| l.parse().ok())
}

fn tier_ranges() -> &'static [HandRange; 7] {
    static TIERS: OnceLock<[HandRange; 7]> = OnceLock::new();
    TIERS.get_or_init(|| {
        let adds = [
            tables::ULTRA_PREMIUM,
            tables::EARLY_ADDS,
            tables::MIDDLE_ADDS,
            tables::BLIND_ADDS,
            tables::LATE_ADDS,
            tables::LOOSE_ADDS,
        ];
        let mut acc = HandRange::new();
        let mut out: [HandRange; 7] = Default::default();
        for (slot, list) in out.iter_mut().zip(adds) {
            acc.hands.extend(labels(list));
            *slot = acc.clone();
        }
        out[6] = CanonicalHand::all().into_iter().collect();
        out
    })
}

/// The default re-raising range used when nothing is known about the opponent.
pub fn standard_3bet_range() -> HandRange {
    labels(tables::STANDARD_3BET).collect()
}

/// Coarse seat group used to pick a default range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Early,
    Middle,
    Late,
    Blind,
}

impl Position {
    const LABELS: &'static [(&'static str, Position)] = &[
        ("UTG", Position::Early),
        ("UTG+1", Position::Early),
        ("UTG+2", Position::Early),
        ("EP", Position::Early),
        ("EARLY", Position::Early),
        ("LJ", Position::Middle),
        ("LOJACK", Position::Middle),
        ("MP", Position::Middle),
        ("MP+1", Position::Middle),
        ("MP+2", Position::Middle),
        ("HJ", Position::Middle),
        ("HIJACK", Position::Middle),
        ("MIDDLE", Position::Middle),
        ("CO", Position::Late),
        ("CUTOFF", Position::Late),
        ("BTN", Position::Late),
        ("BU", Position::Late),
        ("BUTTON", Position::Late),
        ("DEALER", Position::Late),
        ("LATE", Position::Late),
        ("SB", Position::Blind),
        ("BB", Position::Blind),
        ("SMALL BLIND", Position::Blind),
        ("BIG BLIND", Position::Blind),
        ("BLIND", Position::Blind),
        ("BLINDS", Position::Blind),
    ];

    /// Map a table-position label. Case-insensitive; unknown labels are `Middle`.
    pub fn from_label(label: &str) -> Position {
        let norm = label.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase();
        Self::LABELS.iter().find(|(l, _)| *l == norm).map(|(_, p)| *p).unwrap_or_else(|| {
            log::debug!("unknown position label '{label}', using middle");
            Position::Middle
        })
    }

    pub fn tier(self) -> RangeTier {
        match self {
            Position::Early => RangeTier::Early,
            Position::Middle => RangeTier::Middle,
            Position::Late => RangeTier::Late,
            Position::Blind => RangeTier::Blind,
        }
    }
}

/// What the opponent did before the flop this hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreflopAction {
    #[serde(rename = "open_raise")]
    OpenRaise,
    #[serde(rename = "call")]
    Call,
    #[serde(rename = "3bet")]
    ThreeBet,
    #[serde(rename = "4bet+")]
    FourBetPlus,
    #[serde(rename = "none")]
    None,
}

/// The opponent's most recent action on the current street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostflopAction {
    Bet,
    Raise,
    Check,
    Call,
}

impl PostflopAction {
    pub fn is_aggressive(self) -> bool {
        matches!(self, PostflopAction::Bet | PostflopAction::Raise)
    }
}

/// Everything known about one opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentInfo {
    pub name: String,
    pub position: String,
    pub hands_observed: u32,
    /// Percentage of hands voluntarily played, 0–100.
    pub vpip: f64,
    /// Percentage of hands raised preflop, 0–100.
    pub pfr: f64,
    pub aggression_factor: f64,
    pub preflop_action: Option<PreflopAction>,
    pub postflop_aggression_this_hand: Option<PostflopAction>,
}

impl Default for OpponentInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: "MP".to_string(),
            hands_observed: 0,
            vpip: 25.0,
            pfr: 15.0,
            aggression_factor: 1.5,
            preflop_action: None,
            postflop_aggression_this_hand: None,
        }
    }
}

impl OpponentInfo {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self { name: name.into(), position: position.into(), ..Self::default() }
    }

    pub fn with_stats(
        mut self,
        hands_observed: u32,
        vpip: f64,
        pfr: f64,
        aggression_factor: f64,
    ) -> Self {
        self.hands_observed = hands_observed;
        self.vpip = vpip;
        self.pfr = pfr;
        self.aggression_factor = aggression_factor;
        self
    }

    pub fn with_preflop_action(mut self, action: PreflopAction) -> Self {
        self.preflop_action = Some(action);
        self
    }

    pub fn with_postflop_action(mut self, action: PostflopAction) -> Self {
        self.postflop_aggression_this_hand = Some(action);
        self
    }

    /// Enough hands seen for VPIP/PFR to mean something.
    pub fn has_reliable_stats(&self, config: &RangeConfig) -> bool {
        self.hands_observed >= config.min_hands_for_stats
    }

    /// Bet or raised on the current street.
    pub fn is_aggressive_now(&self) -> bool {
        self.postflop_aggression_this_hand.is_some_and(PostflopAction::is_aggressive)
    }
}

/// Default range for a seat label.
///
/// ```
/// use poker_coach::range::get_range_for_position;
///
/// assert!(get_range_for_position("btn").len() > get_range_for_position("UTG").len());
/// ```
pub fn get_range_for_position(label: &str) -> HandRange {
    Position::from_label(label).tier().range().clone()
}

/// Opening range implied by a preflop raise percentage.
pub fn estimate_range_from_pfr(pfr: f64) -> HandRange {
    tables::lookup(tables::PFR_TIERS, pfr, RangeTier::UltraPremium).range().clone()
}

/// Playing range implied by a VPIP percentage.
pub fn estimate_range_from_vpip(vpip: f64) -> HandRange {
    tables::lookup(tables::VPIP_TIERS, vpip, RangeTier::Early).range().clone()
}

/// Re-raising range for an opponent who opens at `pfr`%.
///
/// Hands join in a fixed priority order, restricted to the opening range,
/// until the target width is reached or the result would exceed 60% of the
/// opening range by labels or by combos. AA and KK are always present.
pub fn estimate_3bet_range(pfr: f64) -> HandRange {
    let open = estimate_range_from_pfr(pfr);
    let width = (pfr * 0.35).clamp(4.0, 10.0);
    let target = (NUM_CANONICAL_HANDS as f64 * width / 100.0).round() as usize;
    let max_labels = open.len() * 6 / 10;
    let max_combos = open.combo_count() * 6 / 10;

    let mut out: HandRange = labels(&["AA", "KK"]).collect();
    let mut combos = out.combo_count();
    for hand in labels(tables::THREE_BET_PRIORITY) {
        if out.len() >= target.min(max_labels) {
            break;
        }
        if out.contains(&hand) || !open.contains(&hand) {
            continue;
        }
        if combos + hand.combo_count() > max_combos {
            continue;
        }
        combos += hand.combo_count();
        out.insert(hand);
    }
    log::trace!("3-bet range for pfr {pfr}: {} of {} labels", out.len(), open.len());
    out
}

/// Flatting range: hands played but not raised. Disjoint from the raising range.
pub fn estimate_calling_range(vpip: f64, pfr: f64) -> HandRange {
    estimate_range_from_vpip(vpip).difference(&estimate_range_from_pfr(pfr))
}

/// Narrow a range for the current street's action.
///
/// Only a bet or raise changes anything: a passive player (aggression
/// factor below the passive threshold) who suddenly bets is weighted to the
/// strongest part of their range. Aggressive and middling players keep
/// their full range.
pub fn apply_aggression_adjustment(
    range: &HandRange,
    aggression_factor: f64,
    is_aggressive_action: bool,
    config: &RangeConfig,
) -> HandRange {
    if !is_aggressive_action {
        return range.clone();
    }
    if aggression_factor > config.aggressive_aggression_factor {
        log::trace!("af {aggression_factor:.2}: habitual aggressor, range unchanged");
        return range.clone();
    }
    if aggression_factor >= config.passive_aggression_factor {
        return range.clone();
    }
    let keep = (range.len() as f64 * config.passive_keep_fraction).ceil() as usize;
    range.by_strength().into_iter().take(keep).collect()
}

/// Resolve the most specific range the available information supports.
///
/// ```
/// use poker_coach::config::RangeConfig;
/// use poker_coach::range::{get_opponent_range, OpponentInfo, PreflopAction, RangeTier};
///
/// let villain = OpponentInfo::new("v", "CO").with_preflop_action(PreflopAction::FourBetPlus);
/// let r = get_opponent_range(&villain, &RangeConfig::default());
/// assert_eq!(&r, RangeTier::UltraPremium.range());
/// ```
pub fn get_opponent_range(opponent: &OpponentInfo, config: &RangeConfig) -> HandRange {
    let known = opponent.has_reliable_stats(config);
    let position = || get_range_for_position(&opponent.position);

    let range = match opponent.preflop_action {
        Some(PreflopAction::FourBetPlus) => RangeTier::UltraPremium.range().clone(),
        Some(PreflopAction::ThreeBet) if known => estimate_3bet_range(opponent.pfr),
        Some(PreflopAction::ThreeBet) => standard_3bet_range(),
        Some(PreflopAction::Call) => calling_range_for(opponent, known),
        Some(PreflopAction::OpenRaise) if known => estimate_range_from_pfr(opponent.pfr),
        Some(PreflopAction::OpenRaise) => position(),
        _ if known => estimate_range_from_vpip(opponent.vpip),
        _ => position(),
    };

    let range = if known && opponent.is_aggressive_now() {
        apply_aggression_adjustment(&range, opponent.aggression_factor, true, config)
    } else {
        range
    };
    log::debug!(
        "range for '{}' ({}, {:?}, stats known: {known}): {} labels, {:.1}%",
        opponent.name,
        opponent.position,
        opponent.preflop_action,
        range.len(),
        range.percentage()
    );
    range
}

fn calling_range_for(opponent: &OpponentInfo, known: bool) -> HandRange {
    let ultra = RangeTier::UltraPremium.range();
    if !known {
        return get_range_for_position(&opponent.position).difference(ultra);
    }
    let calling = estimate_calling_range(opponent.vpip, opponent.pfr);
    if !calling.is_empty() {
        return calling;
    }
    log::warn!(
        "empty calling range for '{}' (vpip {}, pfr {}), falling back to position",
        opponent.name,
        opponent.vpip,
        opponent.pfr
    );
    let raising = estimate_range_from_pfr(opponent.pfr);
    let fallback = get_range_for_position(&opponent.position).difference(&raising);
    if fallback.is_empty() {
        RangeTier::AnyTwo.range().difference(&raising)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(label: &str) -> CanonicalHand {
        label.parse().unwrap()
    }

    #[test]
    fn every_table_label_parses() {
        for list in [
            tables::ULTRA_PREMIUM,
            tables::EARLY_ADDS,
            tables::MIDDLE_ADDS,
            tables::BLIND_ADDS,
            tables::LATE_ADDS,
            tables::LOOSE_ADDS,
            tables::STANDARD_3BET,
            tables::THREE_BET_PRIORITY,
        ] {
            for l in list {
                assert!(l.parse::<CanonicalHand>().is_ok(), "{l}");
            }
        }
    }

    #[test]
    fn tiers_are_strictly_nested() {
        for pair in RangeTier::ALL.windows(2) {
            let (a, b) = (pair[0].range(), pair[1].range());
            assert!(a.is_subset(b), "{:?} not inside {:?}", pair[0], pair[1]);
            assert!(a.len() < b.len());
        }
        assert_eq!(RangeTier::AnyTwo.range().len(), NUM_CANONICAL_HANDS);
        assert_eq!(RangeTier::AnyTwo.range().combo_count(), 1326);
    }

    #[test]
    fn standard_3bet_is_about_eight_percent() {
        let r = standard_3bet_range();
        assert!((7.0..=9.5).contains(&r.percentage()), "{}", r.percentage());
        assert!(r.contains(&hand("AA")) && r.contains(&hand("KK")));
    }

    #[test]
    fn position_labels() {
        assert_eq!(Position::from_label("utg+1"), Position::Early);
        assert_eq!(Position::from_label("Hijack"), Position::Middle);
        assert_eq!(Position::from_label(" Button "), Position::Late);
        assert_eq!(Position::from_label("Small  Blind"), Position::Blind);
        assert_eq!(Position::from_label("seat 7"), Position::Middle);
    }

    #[test]
    fn pfr_boundaries_are_inclusive() {
        assert_eq!(&estimate_range_from_pfr(7.99), RangeTier::UltraPremium.range());
        assert_eq!(&estimate_range_from_pfr(8.0), RangeTier::Early.range());
        assert_eq!(&estimate_range_from_pfr(12.0), RangeTier::Middle.range());
        assert_eq!(&estimate_range_from_pfr(18.0), RangeTier::Blind.range());
        assert_eq!(&estimate_range_from_pfr(25.0), RangeTier::Late.range());
        assert_eq!(&estimate_range_from_pfr(f64::NAN), RangeTier::UltraPremium.range());
    }

    #[test]
    fn vpip_tiers() {
        assert_eq!(&estimate_range_from_vpip(5.0), RangeTier::Early.range());
        assert_eq!(&estimate_range_from_vpip(30.0), RangeTier::Late.range());
        assert_eq!(&estimate_range_from_vpip(45.0), RangeTier::Loose.range());
        assert_eq!(&estimate_range_from_vpip(75.0), RangeTier::AnyTwo.range());
    }

    #[test]
    fn tight_opener_3bets_only_the_top() {
        let r = estimate_3bet_range(5.0);
        assert!(r.is_subset(RangeTier::UltraPremium.range()));
        assert!(r.contains(&hand("AA")) && r.contains(&hand("KK")));
        assert!(r.len() <= 3);
    }

    #[test]
    fn passive_bettor_keeps_top_seventy_percent() {
        let cfg = RangeConfig::default();
        let base = RangeTier::Middle.range();
        let narrowed = apply_aggression_adjustment(base, 0.5, true, &cfg);
        assert_eq!(narrowed.len(), (base.len() as f64 * 0.7).ceil() as usize);
        assert!(narrowed.contains(&hand("AA")));
        assert!(narrowed.is_subset(base));
        assert_eq!(&apply_aggression_adjustment(base, 0.5, false, &cfg), base);
        assert_eq!(&apply_aggression_adjustment(base, 3.0, true, &cfg), base);
        assert_eq!(&apply_aggression_adjustment(base, 1.5, true, &cfg), base);
    }

    #[test]
    fn unknown_caller_excludes_premiums() {
        let cfg = RangeConfig::default();
        let villain = OpponentInfo::new("v", "BTN").with_preflop_action(PreflopAction::Call);
        let r = get_opponent_range(&villain, &cfg);
        assert!(!r.is_empty());
        assert!(r.intersection(RangeTier::UltraPremium.range()).is_empty());
    }

    #[test]
    fn caller_with_no_gap_falls_back_to_position() {
        let cfg = RangeConfig::default();
        // vpip tier (Middle) equals pfr tier (Middle), so vpip minus pfr is empty
        let villain = OpponentInfo::new("v", "BTN")
            .with_stats(100, 15.0, 14.0, 1.5)
            .with_preflop_action(PreflopAction::Call);
        assert!(estimate_calling_range(15.0, 14.0).is_empty());
        let r = get_opponent_range(&villain, &cfg);
        assert_eq!(r, RangeTier::Late.range().difference(RangeTier::Middle.range()));
    }

    #[test]
    fn stats_are_ignored_below_the_sample_threshold() {
        let cfg = RangeConfig::default();
        let villain = OpponentInfo::new("v", "UTG").with_stats(5, 80.0, 40.0, 1.0);
        assert_eq!(&get_opponent_range(&villain, &cfg), RangeTier::Early.range());
        let villain = villain.with_stats(20, 80.0, 40.0, 1.0);
        assert_eq!(&get_opponent_range(&villain, &cfg), RangeTier::AnyTwo.range());
    }

    #[test]
    fn known_three_bettor_uses_stats() {
        let cfg = RangeConfig::default();
        let villain = OpponentInfo::new("v", "CO").with_preflop_action(PreflopAction::ThreeBet);
        assert_eq!(get_opponent_range(&villain, &cfg), standard_3bet_range());
        let villain = villain.with_stats(200, 30.0, 20.0, 2.0);
        assert_eq!(get_opponent_range(&villain, &cfg), estimate_3bet_range(20.0));
    }

    #[test]
    fn range_text_round_trip() {
        let r: HandRange = "KK AA,AKs  72o".parse().unwrap();
        assert_eq!(r.to_string(), "AA,KK,AKs,72o");
        assert!("AA, ZZ".parse::<HandRange>().is_err());
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(serde_json::from_str::<HandRange>(&json).unwrap(), r);
    }

    #[test]
    fn opponent_info_deserializes_action_labels() {
        let v: OpponentInfo = serde_json::from_str(
            r#"{"name":"v","position":"BB","preflop_action":"4bet+","postflop_aggression_this_hand":"raise"}"#,
        )
        .unwrap();
        assert_eq!(v.preflop_action, Some(PreflopAction::FourBetPlus));
        assert!(v.is_aggressive_now());
        assert_eq!(v.hands_observed, 0);
    }
}
