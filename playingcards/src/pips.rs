use crate::card::{CARD_H, CARD_W};

const PAD_X: f32 = 45.0;
const PAD_Y: f32 = 50.0;
const PIP_EXTRA_PAD: f32 = 150.0;

/// Where the odd pip of a 5, 7 or 9 sits relative to the even grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraPip {
    Center,
    BetweenRows(usize, usize),
}

/// Pip arrangement for one rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankLayout {
    Ace,
    Face,
    DirectColumn(usize),
    EvenGrid(usize),
    OddExtended { base: usize, extra: ExtraPip },
}

pub fn rank_layout(rank: &str) -> Option<RankLayout> {
    match rank {
        "A" => Some(RankLayout::Ace),
        "J" | "Q" | "K" => Some(RankLayout::Face),
        "2" => Some(RankLayout::DirectColumn(2)),
        "3" => Some(RankLayout::DirectColumn(3)),
        "4" => Some(RankLayout::EvenGrid(2)),
        "6" => Some(RankLayout::EvenGrid(3)),
        "8" => Some(RankLayout::EvenGrid(4)),
        "10" => Some(RankLayout::EvenGrid(5)),
        "5" => Some(RankLayout::OddExtended {
            base: 4,
            extra: ExtraPip::Center,
        }),
        "7" => Some(RankLayout::OddExtended {
            base: 6,
            extra: ExtraPip::BetweenRows(0, 1),
        }),
        "9" => Some(RankLayout::OddExtended {
            base: 8,
            extra: ExtraPip::BetweenRows(1, 2),
        }),
        _ => None,
    }
}

fn px(t: f32) -> f32 {
    PAD_X + t * (CARD_W as f32 - 2.0 * PAD_X)
}

fn py(t: f32) -> f32 {
    let top = PAD_Y + PIP_EXTRA_PAD;
    top + t * (CARD_H as f32 - 2.0 * top)
}

fn row_t(i: usize, rows: usize) -> f32 {
    if rows > 1 {
        i as f32 / (rows - 1) as f32
    } else {
        0.5
    }
}

fn column_positions(n: usize) -> Vec<(f32, f32)> {
    (0..n).map(|i| (px(0.5), py(row_t(i, n)))).collect()
}

fn grid_positions(rows: usize) -> Vec<(f32, f32)> {
    let mut pips = Vec::with_capacity(rows * 2);
    for i in 0..rows {
        for tx in [0.3, 0.7] {
            pips.push((px(tx), py(row_t(i, rows))));
        }
    }
    pips
}

fn extra_position(extra: ExtraPip, rows: usize) -> (f32, f32) {
    match extra {
        ExtraPip::Center => (px(0.5), py(0.5)),
        ExtraPip::BetweenRows(i, j) => {
            let t = (row_t(i, rows) + row_t(j, rows)) / 2.0;
            (px(0.5), py(t))
        }
    }
}

/// Pip centers for a rank, in card coordinates. Aces, face cards and
/// jokers place no grid pips.
pub fn pip_positions(rank: &str) -> Vec<(f32, f32)> {
    match rank_layout(rank) {
        Some(RankLayout::DirectColumn(n)) => column_positions(n),
        Some(RankLayout::EvenGrid(rows)) => grid_positions(rows),
        Some(RankLayout::OddExtended { base, extra }) => {
            let rows = base / 2;
            let mut pips = grid_positions(rows);
            pips.push(extra_position(extra, rows));
            pips
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pip_counts_match_the_rank() {
        for (rank, count) in [
            ("2", 2),
            ("3", 3),
            ("4", 4),
            ("5", 5),
            ("6", 6),
            ("7", 7),
            ("8", 8),
            ("9", 9),
            ("10", 10),
        ] {
            assert_eq!(pip_positions(rank).len(), count, "rank {}", rank);
        }
    }

    #[test]
    fn no_grid_pips_for_ace_faces_and_jokers() {
        for rank in ["A", "J", "Q", "K", "JOKER"] {
            assert!(pip_positions(rank).is_empty(), "rank {}", rank);
        }
        assert_eq!(rank_layout("JOKER"), None);
    }

    #[test]
    fn five_is_four_plus_a_center_pip() {
        let four = pip_positions("4");
        let five = pip_positions("5");
        assert_eq!(&five[..4], &four[..]);
        assert_eq!(five[4], (px(0.5), py(0.5)));
    }

    #[test]
    fn low_ranks_stack_in_a_single_column() {
        for rank in ["2", "3"] {
            for (x, _) in pip_positions(rank) {
                assert_eq!(x, px(0.5));
            }
        }
        let three = pip_positions("3");
        assert_eq!(three[1].1, py(0.5));
    }

    #[test]
    fn seven_and_nine_place_the_odd_pip_between_rows() {
        let seven = pip_positions("7");
        assert_eq!(seven[6], (px(0.5), py(0.25)));

        let nine = pip_positions("9");
        assert_eq!(nine[8], (px(0.5), py(0.5)));
    }

    #[test]
    fn even_grids_use_two_columns() {
        for rank in ["4", "6", "8", "10"] {
            for (i, (x, _)) in pip_positions(rank).iter().enumerate() {
                let expected = if i % 2 == 0 { px(0.3) } else { px(0.7) };
                assert_eq!(*x, expected, "rank {} pip {}", rank, i);
            }
        }
    }

    #[test]
    fn pips_stay_inside_the_reserved_area() {
        for rank in ["2", "5", "7", "9", "10"] {
            for (x, y) in pip_positions(rank) {
                assert!(x >= PAD_X && x <= CARD_W as f32 - PAD_X);
                assert!(y >= 200.0 && y <= 824.0);
            }
        }
    }
}
