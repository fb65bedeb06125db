//! Board texture: how coordinated (draw-heavy) the community cards are.

use crate::cards::{parse_cards, Card, CardParseError};
use serde::{Deserialize, Serialize};

/// Four-level wetness scale, driest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureCategory {
    Dry,
    SemiWet,
    Wet,
    VeryWet,
}

impl TextureCategory {
    // (minimum score, category), checked from the top
    const THRESHOLDS: [(u8, TextureCategory); 4] = [
        (5, TextureCategory::VeryWet),
        (3, TextureCategory::Wet),
        (1, TextureCategory::SemiWet),
        (0, TextureCategory::Dry),
    ];

    pub fn from_score(score: u8) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, c)| *c)
            .unwrap_or(TextureCategory::Dry)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextureCategory::Dry => "dry",
            TextureCategory::SemiWet => "semi_wet",
            TextureCategory::Wet => "wet",
            TextureCategory::VeryWet => "very_wet",
        }
    }
}

/// Structural features of a flop, turn or river board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureFeatures {
    pub paired: bool,
    pub double_paired: bool,
    pub trips_on_board: bool,
    pub monotone: bool,
    pub two_tone: bool,
    pub rainbow: bool,
    pub connected: bool,
    pub high_card_count: u8,
    pub wetness_score: u8,
    pub texture_category: TextureCategory,
}

/// Snapshot of a board. Features are only present once the flop is out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTexture {
    pub num_cards: usize,
    #[serde(flatten)]
    pub features: Option<TextureFeatures>,
}

impl BoardTexture {
    pub fn category(&self) -> Option<TextureCategory> {
        self.features.map(|f| f.texture_category)
    }
}

/// Classify community cards.
///
/// ```
/// use poker_coach::cards::parse_cards;
/// use poker_coach::texture::{analyze_board_texture, TextureCategory};
///
/// let t = analyze_board_texture(&parse_cards("Qh Jh Th").unwrap());
/// assert_eq!(t.category(), Some(TextureCategory::VeryWet));
/// ```
pub fn analyze_board_texture(cards: &[Card]) -> BoardTexture {
    let num_cards = cards.len();
    if num_cards < 3 {
        return BoardTexture { num_cards, features: None };
    }

    let mut rank_counts = [0u8; 15];
    let mut suit_counts = [0u8; 4];
    for c in cards {
        rank_counts[c.rank().value() as usize] += 1;
        suit_counts[c.suit().index()] += 1;
    }

    let multiples = rank_counts.iter().filter(|&&n| n >= 2).count();
    let paired = multiples >= 1;
    let double_paired = multiples >= 2;
    let trips_on_board = rank_counts.iter().any(|&n| n >= 3);

    let suits = suit_counts.iter().filter(|&&n| n > 0).count();
    let monotone = suits == 1;
    let two_tone = suits == 2;
    let rainbow = suits >= 3;

    let connected = is_connected(&rank_counts);
    let high_card_count = cards.iter().filter(|c| c.rank().is_broadway()).count() as u8;

    let mut wetness_score = 0u8;
    if monotone {
        wetness_score += 3;
    } else if two_tone {
        wetness_score += 1;
    }
    if connected {
        wetness_score += 2;
    }
    if paired {
        wetness_score += 1;
    }
    if high_card_count >= 2 {
        wetness_score += 1;
    }

    let features = TextureFeatures {
        paired,
        double_paired,
        trips_on_board,
        monotone,
        two_tone,
        rainbow,
        connected,
        high_card_count,
        wetness_score,
        texture_category: TextureCategory::from_score(wetness_score),
    };
    log::trace!("board texture {:?} -> {:?}", cards, features.texture_category);
    BoardTexture { num_cards, features: Some(features) }
}

/// String ingress for [`analyze_board_texture`].
pub fn analyze_board_texture_str(cards: &str) -> Result<BoardTexture, CardParseError> {
    Ok(analyze_board_texture(&parse_cards(cards)?))
}

// Three distinct ranks spanning at most four steps (room for a straight).
// The ace also counts as 1 for wheel boards.
fn is_connected(rank_counts: &[u8; 15]) -> bool {
    let mut vals: Vec<u8> = (2u8..=14).filter(|&v| rank_counts[v as usize] > 0).collect();
    if rank_counts[14] > 0 {
        vals.insert(0, 1);
    }
    vals.windows(3).any(|w| w[2] - w[0] <= 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(s: &str) -> BoardTexture {
        analyze_board_texture_str(s).unwrap()
    }

    fn features(s: &str) -> TextureFeatures {
        texture(s).features.unwrap()
    }

    #[test]
    fn preflop_and_partial_boards_only_report_count() {
        assert_eq!(texture(""), BoardTexture { num_cards: 0, features: None });
        assert_eq!(texture("Ah Kd").num_cards, 2);
        assert!(texture("Ah Kd").features.is_none());
    }

    #[test]
    fn dry_rainbow_board() {
        let f = features("Kh 7d 2s");
        assert!(f.rainbow && !f.connected && !f.paired);
        assert_eq!(f.texture_category, TextureCategory::Dry);
    }

    #[test]
    fn monotone_broadway_is_very_wet() {
        let f = features("Qh Jh Th");
        assert!(f.monotone && f.connected);
        assert_eq!(f.high_card_count, 3);
        assert_eq!(f.wetness_score, 6);
        assert_eq!(f.texture_category, TextureCategory::VeryWet);
    }

    #[test]
    fn wheel_cards_are_connected() {
        assert!(features("Ac 2d 4h").connected);
        assert!(!features("Ac 6d 9h").connected);
    }

    #[test]
    fn pairing_levels() {
        let f = features("8c 8d 3h 3s");
        assert!(f.paired && f.double_paired && !f.trips_on_board);
        let f = features("8c 8d 8h");
        assert!(f.paired && f.trips_on_board);
        assert!(!f.monotone && f.rainbow);
    }

    #[test]
    fn two_tone_connected_is_wet() {
        // two-tone +1, connected +2
        let f = features("9h 8h 6c");
        assert_eq!(f.wetness_score, 3);
        assert_eq!(f.texture_category, TextureCategory::Wet);
    }

    #[test]
    fn serializes_flat() {
        let v = serde_json::to_value(texture("Kh 7d 2s")).unwrap();
        assert_eq!(v["texture_category"], "dry");
        assert_eq!(v["num_cards"], 3);
        let v = serde_json::to_value(texture("Kh")).unwrap();
        assert!(v.get("texture_category").is_none());
    }
}
