/// Identity of one deck member: the four suits plus the two jokers.
pub struct SuitMeta {
    pub symbol: &'static str,
    pub name: &'static str,
    pub color: (u8, u8, u8),
    pub art_slug: Option<&'static str>,
}

const BLACK: (u8, u8, u8) = (0, 0, 0);
const FIREBRICK: (u8, u8, u8) = (178, 34, 34);

pub const CARD_META: [SuitMeta; 6] = [
    SuitMeta {
        symbol: "\u{2660}",
        name: "spades",
        color: BLACK,
        art_slug: None,
    },
    SuitMeta {
        symbol: "\u{2665}",
        name: "hearts",
        color: FIREBRICK,
        art_slug: None,
    },
    SuitMeta {
        symbol: "\u{2666}",
        name: "diamonds",
        color: FIREBRICK,
        art_slug: None,
    },
    SuitMeta {
        symbol: "\u{2663}",
        name: "clubs",
        color: BLACK,
        art_slug: None,
    },
    SuitMeta {
        symbol: "\u{2605}",
        name: "joker_2",
        color: FIREBRICK,
        art_slug: Some("joker_2.png"),
    },
    SuitMeta {
        symbol: "\u{2605}",
        name: "joker_1",
        color: BLACK,
        art_slug: Some("joker_1.png"),
    },
];

impl SuitMeta {
    pub fn is_joker(&self) -> bool {
        self.art_slug.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_has_four_suits_and_two_jokers() {
        let jokers = CARD_META.iter().filter(|m| m.is_joker()).count();
        assert_eq!(jokers, 2);
        assert_eq!(CARD_META.len() - jokers, 4);
    }

    #[test]
    fn red_suits_use_firebrick() {
        for meta in &CARD_META {
            match meta.name {
                "hearts" | "diamonds" | "joker_2" => assert_eq!(meta.color, FIREBRICK),
                "spades" | "clubs" | "joker_1" => assert_eq!(meta.color, BLACK),
                other => panic!("unexpected deck member {}", other),
            }
        }
    }
}
