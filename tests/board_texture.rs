use poker_coach::cards::{parse_cards, Card};
use poker_coach::texture::{analyze_board_texture, analyze_board_texture_str, TextureCategory};
use proptest::prelude::*;
use proptest::sample::subsequence;

#[test]
fn reference_boards() {
    let cat = |s: &str| analyze_board_texture_str(s).unwrap().category();
    assert_eq!(cat("Kh 7d 2s"), Some(TextureCategory::Dry));
    assert_eq!(cat("Qh Jh Th"), Some(TextureCategory::VeryWet));
    assert_eq!(cat("K♥ 7♦ 2♠"), Some(TextureCategory::Dry));
    assert_eq!(cat("As Ks 4d"), Some(TextureCategory::SemiWet));
}

#[test]
fn malformed_card_fails_at_ingress() {
    assert!(analyze_board_texture_str("Kh 7x 2s").is_err());
}

#[test]
fn category_serializes_snake_case() {
    let t = analyze_board_texture(&parse_cards("9h 8h 6c 5h").unwrap());
    let v = serde_json::to_value(t).unwrap();
    assert_eq!(v["texture_category"], "wet");
    assert_eq!(v["connected"], true);
}

proptest! {
    #[test]
    fn score_and_category_agree(
        cards in subsequence((0..52u8).filter_map(Card::from_index).collect::<Vec<_>>(), 3..=5),
    ) {
        let t = analyze_board_texture(&cards);
        let f = t.features.unwrap();
        prop_assert_eq!(t.num_cards, cards.len());
        prop_assert_eq!(f.texture_category, TextureCategory::from_score(f.wetness_score));
        prop_assert_eq!(f.monotone as u8 + f.two_tone as u8 + f.rainbow as u8, 1);
        prop_assert!(!f.double_paired || f.paired);
        prop_assert!(f.wetness_score <= 7);
    }
}
