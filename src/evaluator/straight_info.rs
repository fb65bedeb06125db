/// Top rank value of the best straight inside a rank mask (bit `v` = rank value `v`).
/// The ace also plays low, so A-2-3-4-5 reports 5.
pub fn straight_top(mask: u16) -> Option<u8> {
    let mask = if mask & (1 << 14) != 0 { mask | (1 << 1) } else { mask };
    (5u8..=14).rev().find(|&top| {
        let run = 0b1_1111u16 << (top - 4);
        mask & run == run
    })
}

/// Most ranks present inside any five-rank window, used for draw detection.
/// A full straight returns 5.
pub fn best_window_count(mask: u16) -> u32 {
    let mask = if mask & (1 << 14) != 0 { mask | (1 << 1) } else { mask };
    (5u8..=14).map(|top| (mask & (0b1_1111u16 << (top - 4))).count_ones()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(vals: &[u8]) -> u16 {
        vals.iter().fold(0, |m, v| m | (1 << v))
    }

    #[test]
    fn regular_and_broadway_straights() {
        assert_eq!(straight_top(mask(&[13, 12, 11, 10, 9])), Some(13));
        assert_eq!(straight_top(mask(&[14, 13, 12, 11, 10, 2])), Some(14));
    }

    #[test]
    fn wheel_reports_five_high() {
        assert_eq!(straight_top(mask(&[14, 2, 3, 4, 5])), Some(5));
        assert_eq!(straight_top(mask(&[14, 2, 3, 4, 5, 6])), Some(6));
    }

    #[test]
    fn gaps_are_not_straights() {
        assert_eq!(straight_top(mask(&[14, 13, 12, 11, 9])), None);
    }

    #[test]
    fn window_count_sees_draws() {
        assert_eq!(best_window_count(mask(&[9, 8, 7, 6, 2])), 4);
        assert_eq!(best_window_count(mask(&[9, 7, 6, 5])), 4);
        assert_eq!(best_window_count(mask(&[14, 9, 2])), 2);
    }
}
