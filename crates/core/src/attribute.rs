//! The closed set of order attributes and the fixed orderings over them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// One categorical dimension of a coffee order.
///
/// Variants are declared in lexicographic order of their names, so the
/// derived `Ord` matches the key order of the canonical stored form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Decaf,
    Iced,
    Milk,
    Size,
    Strength,
    Sugar,
    Type,
}

impl Attribute {
    /// Every attribute, in canonical key order.
    pub const ALL: [Attribute; 7] = [
        Attribute::Decaf,
        Attribute::Iced,
        Attribute::Milk,
        Attribute::Size,
        Attribute::Strength,
        Attribute::Sugar,
        Attribute::Type,
    ];

    /// Order in which unassigned attributes try to claim a parsed token.
    pub const PRECEDENCE: [Attribute; 7] = [
        Attribute::Size,
        Attribute::Type,
        Attribute::Milk,
        Attribute::Strength,
        Attribute::Iced,
        Attribute::Decaf,
        Attribute::Sugar,
    ];

    /// Output order for display strings and price keys.
    pub const OUTPUT_ORDER: [Attribute; 7] = [
        Attribute::Size,
        Attribute::Iced,
        Attribute::Milk,
        Attribute::Strength,
        Attribute::Decaf,
        Attribute::Type,
        Attribute::Sugar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Decaf => "decaf",
            Attribute::Iced => "iced",
            Attribute::Milk => "milk",
            Attribute::Size => "size",
            Attribute::Strength => "strength",
            Attribute::Sugar => "sugar",
            Attribute::Type => "type",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| SpecError::UnknownAttribute(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_sorted_by_name() {
        let names: Vec<&str> = Attribute::ALL.iter().map(|a| a.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn from_str_round_trips_names() {
        for attr in Attribute::ALL {
            assert_eq!(attr.name().parse::<Attribute>().unwrap(), attr);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "flavour".parse::<Attribute>().unwrap_err();
        assert!(matches!(err, SpecError::UnknownAttribute(ref n) if n == "flavour"));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Attribute::Strength).unwrap();
        assert_eq!(json, "\"strength\"");
    }
}
