//! Spec registry -- the static table of attribute definitions.
//!
//! Canonical option values are part of the stored order format and must not
//! change. Spellings are matched case-insensitively and must be unique within
//! one attribute; the same spelling may appear under different attributes
//! (`"l"` is both Latte and Large) and is then resolved by precedence.

use std::collections::{BTreeMap, HashMap};

use crate::attribute::Attribute;
use crate::error::SpecError;

/// Definition of one attribute: its options and their accepted spellings.
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    pub attribute: Attribute,
    /// Prompt shown to a user when this attribute needs to be supplied.
    pub question: &'static str,
    pub required: bool,
    /// Canonical values in declaration order.
    options: Vec<String>,
    /// Lower-cased spelling -> index into `options`.
    spellings: HashMap<String, usize>,
}

impl AttributeSpec {
    fn new(attribute: Attribute, question: &'static str, required: bool) -> Self {
        AttributeSpec {
            attribute,
            question,
            required,
            options: Vec::new(),
            spellings: HashMap::new(),
        }
    }

    /// Register `option` with its alternative spellings. The canonical value
    /// is always a spelling of itself.
    fn add_option(&mut self, option: &str, alternatives: &[&str]) -> Result<(), SpecError> {
        let index = self.options.len();
        self.options.push(option.to_owned());
        self.add_spelling(index, option)?;
        for alt in alternatives {
            self.add_spelling(index, alt)?;
        }
        Ok(())
    }

    fn add_spelling(&mut self, index: usize, spelling: &str) -> Result<(), SpecError> {
        let spelling = spelling.to_lowercase();
        if self.spellings.contains_key(&spelling) {
            return Err(SpecError::DuplicateSpelling {
                attribute: self.attribute.name().to_owned(),
                spelling,
            });
        }
        self.spellings.insert(spelling, index);
        Ok(())
    }

    /// Canonical values in declaration order.
    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(String::as_str)
    }

    /// Every accepted spelling, lower-cased.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        self.spellings.keys().map(String::as_str)
    }

    /// Whether `value` is a spelling of one of this attribute's options.
    pub fn validate(&self, value: &str) -> bool {
        self.spellings.contains_key(&value.to_lowercase())
    }

    /// Canonical value denoted by `value`, if it is a known spelling.
    pub fn option_value(&self, value: &str) -> Option<&str> {
        self.spellings
            .get(&value.to_lowercase())
            .map(|&i| self.options[i].as_str())
    }

    /// Whether `value` is exactly one of the canonical values.
    pub fn is_canonical(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

/// All attribute specs, keyed by attribute. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Registry {
    specs: BTreeMap<Attribute, AttributeSpec>,
}

impl Registry {
    pub fn spec(&self, attribute: Attribute) -> Option<&AttributeSpec> {
        self.specs.get(&attribute)
    }

    /// Look up a spec by attribute name.
    pub fn lookup(&self, name: &str) -> Result<&AttributeSpec, SpecError> {
        let attribute: Attribute = name.parse()?;
        self.spec(attribute)
            .ok_or_else(|| SpecError::UnknownAttribute(name.to_owned()))
    }

    /// Specs in canonical key order.
    pub fn specs(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.specs.values()
    }

    /// Required specs, in canonical key order.
    pub fn required(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.specs.values().filter(|s| s.required)
    }
}

/// Build the registry of all seven attributes.
///
/// Fails only if a spelling is registered twice for one attribute, which is
/// a defect in the table below and should abort startup.
pub fn build_registry() -> Result<Registry, SpecError> {
    let mut specs = BTreeMap::new();

    let mut ty = AttributeSpec::new(Attribute::Type, "What type of coffee?", true);
    ty.add_option("Cappuccino", &["Cap", "C"])?;
    ty.add_option("Latte", &["Lat", "L"])?;
    ty.add_option("Mocha", &["M"])?;
    ty.add_option("Espresso", &["E", "Es"])?;
    ty.add_option("Short Black", &["sb"])?;
    ty.add_option("Long Black", &["lb"])?;
    ty.add_option("Chai Latte", &["Chai"])?;
    ty.add_option("Macchiato", &["Mac", "Macc"])?;
    ty.add_option("Flat White", &["FW"])?;
    ty.add_option("Affogato", &["Af"])?;
    ty.add_option(
        "Hot Chocolate",
        &["hc", "hot c", "choc", "chocolate", "hot choc", "hotchoc"],
    )?;
    ty.add_option("Iced Chocolate", &[])?;
    ty.add_option("Iced Coffee", &[])?;
    ty.add_option("Babyccino", &["Frothaccino", "babycino"])?;
    ty.add_option("Piccolo Latte", &["Piccolo"])?;
    ty.add_option("Cold Drip", &["cd", "cold brew", "cb"])?;
    ty.add_option("Filtered", &[])?;
    ty.add_option("Tea", &[])?;
    specs.insert(Attribute::Type, ty);

    let mut iced = AttributeSpec::new(Attribute::Iced, "Iced or normal?", false);
    iced.add_option("Iced", &["ice"])?;
    iced.add_option("normal", &["hot"])?;
    specs.insert(Attribute::Iced, iced);

    let mut sugar = AttributeSpec::new(Attribute::Sugar, "How many sugars?", false);
    sugar.add_option("No sugar", &["0S", "0sugar", "+0", "no sugars"])?;
    sugar.add_option("1 Sugar", &["with 1", "+1", "1S", "1sugar", "sugar", "sugars"])?;
    for n in 2..12 {
        let alternatives = [
            format!("with {n}"),
            format!("{n}S"),
            format!("{n}sugar"),
            format!("{n} sugar"),
            format!("+{n}"),
        ];
        let alternatives: Vec<&str> = alternatives.iter().map(String::as_str).collect();
        sugar.add_option(&format!("{n} Sugars"), &alternatives)?;
    }
    specs.insert(Attribute::Sugar, sugar);

    let mut decaf = AttributeSpec::new(Attribute::Decaf, "Decaf?", false);
    decaf.add_option("Decaf", &["dec", "lame"])?;
    specs.insert(Attribute::Decaf, decaf);

    let mut size = AttributeSpec::new(Attribute::Size, "What size (S/L)?", false);
    size.add_option("Small", &["s", "sm"])?;
    size.add_option("Regular", &["reg", "r", "rg"])?;
    size.add_option("Large", &["L", "lge", "lg"])?;
    specs.insert(Attribute::Size, size);

    let mut strength = AttributeSpec::new(Attribute::Strength, "What strength?", false);
    strength.add_option("Weak", &["w", "half"])?;
    strength.add_option(
        "Extra-shot",
        &["strong", "double", "doubleshot", "double-shot", "x"],
    )?;
    strength.add_option("2 Extra-shots", &["xx", "triple", "tripleshot", "triple-shot"])?;
    strength.add_option("Normal", &["standard"])?;
    specs.insert(Attribute::Strength, strength);

    let mut milk = AttributeSpec::new(Attribute::Milk, "What type of milk?", false);
    milk.add_option("Fullcream", &["normal"])?;
    milk.add_option("Skim", &["skinny", "lite", "light", "sk"])?;
    milk.add_option("Soy", &["y"])?;
    milk.add_option("Lactose Free", &[])?;
    specs.insert(Attribute::Milk, milk);

    Ok(Registry { specs })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        build_registry().unwrap()
    }

    #[test]
    fn every_attribute_is_registered() {
        let reg = registry();
        for attr in Attribute::ALL {
            assert!(reg.spec(attr).is_some(), "missing spec for {attr}");
        }
    }

    #[test]
    fn only_type_is_required() {
        let reg = registry();
        let required: Vec<Attribute> = reg.required().map(|s| s.attribute).collect();
        assert_eq!(required, vec![Attribute::Type]);
    }

    #[test]
    fn spellings_are_case_insensitive() {
        let reg = registry();
        let ty = reg.spec(Attribute::Type).unwrap();
        assert_eq!(ty.option_value("c"), Some("Cappuccino"));
        assert_eq!(ty.option_value("CAP"), Some("Cappuccino"));
        assert_eq!(ty.option_value("Hot Choc"), Some("Hot Chocolate"));
        assert_eq!(ty.option_value("hc"), Some("Hot Chocolate"));
        assert_eq!(ty.option_value("flat white"), Some("Flat White"));
        assert!(!ty.validate("americano"));
    }

    #[test]
    fn canonical_value_is_its_own_spelling() {
        let reg = registry();
        for spec in reg.specs() {
            for option in spec.options() {
                assert_eq!(spec.option_value(option), Some(option));
            }
        }
    }

    #[test]
    fn sugar_counts_are_generated() {
        let reg = registry();
        let sugar = reg.spec(Attribute::Sugar).unwrap();
        assert_eq!(sugar.options().count(), 12);
        assert_eq!(sugar.option_value("+2"), Some("2 Sugars"));
        assert_eq!(sugar.option_value("2S"), Some("2 Sugars"));
        assert_eq!(sugar.option_value("2sugar"), Some("2 Sugars"));
        assert_eq!(sugar.option_value("with 11"), Some("11 Sugars"));
        assert_eq!(sugar.option_value("sugars"), Some("1 Sugar"));
        assert_eq!(sugar.option_value("no sugars"), Some("No sugar"));
        assert_eq!(sugar.option_value("12 sugars"), None);
    }

    #[test]
    fn same_spelling_across_attributes_is_allowed() {
        let reg = registry();
        assert_eq!(
            reg.spec(Attribute::Type).unwrap().option_value("l"),
            Some("Latte")
        );
        assert_eq!(
            reg.spec(Attribute::Size).unwrap().option_value("l"),
            Some("Large")
        );
        assert_eq!(
            reg.spec(Attribute::Milk).unwrap().option_value("normal"),
            Some("Fullcream")
        );
        assert_eq!(
            reg.spec(Attribute::Iced).unwrap().option_value("normal"),
            Some("normal")
        );
    }

    #[test]
    fn duplicate_spelling_within_attribute_is_rejected() {
        let mut spec = AttributeSpec::new(Attribute::Size, "?", false);
        spec.add_option("Small", &["s"]).unwrap();
        let err = spec.add_option("Short", &["S"]).unwrap_err();
        assert!(matches!(
            err,
            SpecError::DuplicateSpelling { ref attribute, ref spelling }
                if attribute == "size" && spelling == "s"
        ));
    }

    #[test]
    fn lookup_by_name() {
        let reg = registry();
        assert_eq!(reg.lookup("milk").unwrap().attribute, Attribute::Milk);
        assert!(matches!(
            reg.lookup("temperature"),
            Err(SpecError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn is_canonical_is_exact() {
        let reg = registry();
        let milk = reg.spec(Attribute::Milk).unwrap();
        assert!(milk.is_canonical("Lactose Free"));
        assert!(!milk.is_canonical("lactose free"));
        assert!(!milk.is_canonical("y"));
    }
}
