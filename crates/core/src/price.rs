//! Price lookup keys.
//!
//! A cafe's price list is keyed by strings like "Large Soy Cappuccino". An
//! order is reduced to such a key, and when the exact key is missing the
//! caller widens the match step by step: first any milk-based drink prices
//! like a cappuccino, then small prices like regular, then weak like normal.

use crate::attribute::Attribute;
use crate::order::{Order, DEFAULT_SIZE};

const DEFAULT_STRENGTH: &str = "Normal";

/// Drinks that are priced the same as a cappuccino when matching fuzzily.
pub const CAPPUCCINO_EQUIVALENTS: [&str; 10] = [
    "Cappuccino",
    "Chai Latte",
    "Flat White",
    "Hot Chocolate",
    "Latte",
    "Long Black",
    "Macchiato",
    "Mocha",
    "Piccolo Latte",
    "Short Black",
];

/// How far a price key has been widened, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FuzzLevel {
    Exact,
    Type,
    TypeSize,
    TypeSizeStrength,
}

impl FuzzLevel {
    pub const ALL: [FuzzLevel; 4] = [
        FuzzLevel::Exact,
        FuzzLevel::Type,
        FuzzLevel::TypeSize,
        FuzzLevel::TypeSizeStrength,
    ];

    /// Attributes matched fuzzily at this level.
    pub fn fuzz_set(self) -> &'static [Attribute] {
        match self {
            FuzzLevel::Exact => &[],
            FuzzLevel::Type => &[Attribute::Type],
            FuzzLevel::TypeSize => &[Attribute::Type, Attribute::Size],
            FuzzLevel::TypeSizeStrength => {
                &[Attribute::Type, Attribute::Size, Attribute::Strength]
            }
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

impl Order {
    /// Price key for this order with the attributes in `fuzzy` matched
    /// approximately. Sugar, iced and decaf never affect the key; milk only
    /// shows up as the soy surcharge.
    pub fn price_key(&self, fuzzy: &[Attribute]) -> String {
        let mut words: Vec<&str> = Vec::new();
        for attribute in Attribute::OUTPUT_ORDER {
            let fuzz = fuzzy.contains(&attribute);
            match attribute {
                Attribute::Size => {
                    let size = self.get(Attribute::Size).unwrap_or(DEFAULT_SIZE);
                    if fuzz && size == "Small" {
                        words.push(DEFAULT_SIZE);
                    } else {
                        words.push(size);
                    }
                }
                Attribute::Strength => {
                    let mut strength = self.get(Attribute::Strength).unwrap_or(DEFAULT_STRENGTH);
                    if fuzz && strength == "Weak" {
                        strength = DEFAULT_STRENGTH;
                    }
                    if strength != DEFAULT_STRENGTH {
                        words.push(strength);
                    }
                }
                Attribute::Milk => {
                    if matches!(self.get(Attribute::Milk), Some("Soy" | "Lactose Free")) {
                        words.push("Soy");
                    }
                }
                Attribute::Type => {
                    if let Some(ty) = self.get(Attribute::Type) {
                        if fuzz && CAPPUCCINO_EQUIVALENTS.contains(&ty) {
                            words.push("Cappuccino");
                        } else {
                            words.push(ty);
                        }
                    }
                }
                Attribute::Iced | Attribute::Decaf | Attribute::Sugar => {}
            }
        }
        words.join(" ")
    }

    /// The four price keys to try in order, most specific first.
    pub fn ordered_price_keys(&self) -> [String; 4] {
        FuzzLevel::ALL.map(|level| self.price_key(level.fuzz_set()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderParser;

    fn keys(text: &str) -> [String; 4] {
        OrderParser::new().unwrap().parse(text).ordered_price_keys()
    }

    #[test]
    fn small_latte_widens_to_regular_cappuccino() {
        assert_eq!(
            keys("Small Latte"),
            [
                "Small Latte",
                "Small Cappuccino",
                "Regular Cappuccino",
                "Regular Cappuccino"
            ]
        );
    }

    #[test]
    fn weak_strength_drops_at_last_level() {
        assert_eq!(
            keys("weak flat white"),
            [
                "Regular Weak Flat White",
                "Regular Weak Cappuccino",
                "Regular Weak Cappuccino",
                "Regular Cappuccino"
            ]
        );
    }

    #[test]
    fn extra_shot_is_kept_at_every_level() {
        let k = keys("large strong mocha");
        assert!(k.iter().all(|key| key.contains("Extra-shot")));
        assert_eq!(k[3], "Large Extra-shot Cappuccino");
    }

    #[test]
    fn soy_and_lactose_free_price_as_soy() {
        assert_eq!(keys("soy latte")[0], "Regular Soy Latte");
        assert_eq!(keys("lactose free latte")[0], "Regular Soy Latte");
        assert_eq!(keys("skim latte")[0], "Regular Latte");
    }

    #[test]
    fn sugar_iced_and_decaf_do_not_affect_price() {
        assert_eq!(keys("iced decaf latte 3 sugars")[0], "Regular Latte");
    }

    #[test]
    fn non_equivalent_types_are_never_substituted() {
        assert_eq!(
            keys("large iced chocolate"),
            [
                "Large Iced Chocolate",
                "Large Iced Chocolate",
                "Large Iced Chocolate",
                "Large Iced Chocolate"
            ]
        );
    }

    #[test]
    fn missing_type_keys_on_size_only() {
        assert_eq!(keys("")[1], "Regular");
    }

    #[test]
    fn fuzz_levels_are_progressively_wider() {
        for pair in FuzzLevel::ALL.windows(2) {
            let (narrow, wide) = (pair[0].fuzz_set(), pair[1].fuzz_set());
            assert!(narrow.iter().all(|a| wide.contains(a)));
            assert_eq!(narrow.len() + 1, wide.len());
        }
        assert_eq!(FuzzLevel::TypeSizeStrength.index(), 3);
    }
}
