//! Static range data. Each tier lists only the labels it adds over the
//! previous tier, so the resolved tiers are nested by construction.

use super::RangeTier;

pub(crate) const ULTRA_PREMIUM: &[&str] = &["AA", "KK", "QQ", "JJ", "AKs", "AKo"];

pub(crate) const EARLY_ADDS: &[&str] = &[
    "TT", "99", "88", "77", "AQs", "AJs", "ATs", "KQs", "KJs", "QJs", "JTs", "AQo", "KQo",
];

pub(crate) const MIDDLE_ADDS: &[&str] = &[
    "66", "55", "A9s", "A8s", "A7s", "A6s", "A5s", "A4s", "KTs", "QTs", "T9s", "98s", "AJo",
    "ATo", "KJo",
];

pub(crate) const BLIND_ADDS: &[&str] = &[
    "44", "33", "22", "A3s", "A2s", "K9s", "Q9s", "J9s", "87s", "76s", "65s", "A9o", "KTo",
    "QJo", "QTo", "JTo",
];

pub(crate) const LATE_ADDS: &[&str] = &[
    "K8s", "K7s", "K6s", "K5s", "Q8s", "J8s", "T8s", "97s", "86s", "75s", "54s", "A8o", "A7o",
    "A6o", "A5o", "K9o", "Q9o", "J9o", "T9o", "98o",
];

pub(crate) const LOOSE_ADDS: &[&str] = &[
    "K4s", "K3s", "K2s", "Q7s", "Q6s", "Q5s", "J7s", "T7s", "96s", "85s", "64s", "53s", "43s",
    "A4o", "A3o", "A2o", "K8o", "K7o", "Q8o", "J8o", "T8o", "87o", "76o", "65o",
];

/// Typical re-raising range for an opponent with no history (about 8% of hands).
pub(crate) const STANDARD_3BET: &[&str] = &[
    "AA", "KK", "QQ", "JJ", "TT", "AKs", "AQs", "AJs", "KQs", "KJs", "A5s", "A4s", "AKo", "AQo",
];

/// Order in which hands join a stats-derived 3-bet range.
pub(crate) const THREE_BET_PRIORITY: &[&str] = &[
    "AA", "KK", "QQ", "AKs", "JJ", "AKo", "AQs", "TT", "KQs", "AJs", "A5s", "AQo", "99", "A4s",
    "KJs", "QJs", "ATs", "JTs", "KQo", "88", "A3s", "T9s", "98s", "87s", "AJo", "76s", "KTs",
    "65s", "77", "A2s", "QTs", "54s", "KJo", "66", "ATo", "55", "J9s", "K9s", "Q9s",
];

/// `(lower bound, tier)` for preflop raise percentage, checked top-down.
pub(crate) const PFR_TIERS: &[(f64, RangeTier)] = &[
    (25.0, RangeTier::Late),
    (18.0, RangeTier::Blind),
    (12.0, RangeTier::Middle),
    (8.0, RangeTier::Early),
];

/// `(lower bound, tier)` for voluntarily-put-in-pot percentage, checked top-down.
pub(crate) const VPIP_TIERS: &[(f64, RangeTier)] = &[
    (60.0, RangeTier::AnyTwo),
    (40.0, RangeTier::Loose),
    (26.0, RangeTier::Late),
    (18.0, RangeTier::Blind),
    (12.0, RangeTier::Middle),
];

/// First tier whose lower bound `value` reaches, else `floor`.
pub(crate) fn lookup(table: &[(f64, RangeTier)], value: f64, floor: RangeTier) -> RangeTier {
    table.iter().find(|(min, _)| value >= *min).map(|(_, t)| *t).unwrap_or(floor)
}
