//! Order resolver -- binds tokens to attributes and owns the canonical form.

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use serde::ser::Error as _;
use serde::Serialize;

use crate::attribute::Attribute;
use crate::error::SpecError;
use crate::lexer::Vocabulary;
use crate::registry::{build_registry, AttributeSpec, Registry};

pub(crate) const DEFAULT_SIZE: &str = "Regular";

/// A resolved coffee order: at most one canonical value per attribute.
///
/// Orders are only mutated through [`OrderParser`], which guarantees every
/// stored value is a canonical option of its attribute. Unset attributes
/// stay unset; defaults are applied when rendering and keying, never here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Order {
    attributes: BTreeMap<Attribute, String>,
}

impl Order {
    pub fn get(&self, attribute: Attribute) -> Option<&str> {
        self.attributes.get(&attribute).map(String::as_str)
    }

    pub fn contains(&self, attribute: Attribute) -> bool {
        self.attributes.contains_key(&attribute)
    }

    /// Assigned attributes in canonical key order.
    pub fn attributes(&self) -> impl Iterator<Item = (Attribute, &str)> {
        self.attributes.iter().map(|(a, v)| (*a, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Canonical stored form: a flat JSON object with keys sorted by name,
    /// laid out as `{"size": "Large", "type": "Cappuccino"}`.
    ///
    /// Identical orders always encode to identical bytes, and orders stored
    /// in this layout re-encode unchanged after a decode.
    pub fn encode(&self) -> Result<String, SpecError> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, CanonicalFormatter);
        self.attributes.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| SpecError::Malformed(serde_json::Error::custom(e)))
    }

    pub(crate) fn with_default_size(&self) -> Order {
        let mut order = self.clone();
        order
            .attributes
            .entry(Attribute::Size)
            .or_insert_with(|| DEFAULT_SIZE.to_owned());
        order
    }
}

/// Single-line JSON with `", "` between entries and `": "` after keys.
struct CanonicalFormatter;

impl serde_json::ser::Formatter for CanonicalFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

impl fmt::Display for Order {
    /// Human-readable form, e.g. "Regular Soy Decaf Latte with 2 Sugars".
    /// Size is always shown; everything else only when assigned.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words: Vec<&str> = Vec::new();
        for attribute in Attribute::OUTPUT_ORDER {
            match (attribute, self.get(attribute)) {
                (Attribute::Size, None) => words.push(DEFAULT_SIZE),
                (Attribute::Sugar, Some(sugar)) => {
                    words.push("with");
                    words.push(sugar);
                }
                (_, Some(value)) => words.push(value),
                (_, None) => {}
            }
        }
        f.write_str(&words.join(" "))
    }
}

/// Registry plus vocabulary: the entry point for turning text into orders.
///
/// Build one at startup and share it; it is read-only after construction.
#[derive(Debug, Clone)]
pub struct OrderParser {
    registry: Registry,
    vocabulary: Vocabulary,
}

impl OrderParser {
    /// Build the registry and vocabulary.
    pub fn new() -> Result<Self, SpecError> {
        Ok(OrderParser::with_registry(build_registry()?))
    }

    pub fn with_registry(registry: Registry) -> Self {
        let vocabulary = Vocabulary::from_registry(&registry);
        OrderParser {
            registry,
            vocabulary,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Parse free text into an order. Never fails: unrecognized words are
    /// dropped, and the result may be invalid (check with [`validate`]).
    ///
    /// [`validate`]: OrderParser::validate
    pub fn parse(&self, text: &str) -> Order {
        let mut order = Order::default();
        for token in self.vocabulary.tokenize(text) {
            self.bind(&mut order, token);
        }
        tracing::debug!(input = text, order = %order, "parsed order");
        order
    }

    /// Give `token` to the first attribute in precedence order that is still
    /// unassigned and accepts it. Assigned attributes are never overwritten.
    fn bind(&self, order: &mut Order, token: &str) {
        for attribute in Attribute::PRECEDENCE {
            if order.contains(attribute) {
                continue;
            }
            let value = self
                .registry
                .spec(attribute)
                .and_then(|spec| spec.option_value(token));
            if let Some(value) = value {
                tracing::trace!(token, %attribute, value, "bound token");
                order.attributes.insert(attribute, value.to_owned());
                return;
            }
        }
        tracing::debug!(token, "no unassigned attribute accepts token");
    }

    /// Explicitly set one attribute from a spelling, replacing any current
    /// value. The order is left untouched on error.
    pub fn assign(
        &self,
        order: &mut Order,
        attribute: &str,
        spelling: &str,
    ) -> Result<(), SpecError> {
        let spec = self.registry.lookup(attribute)?;
        let value = spec
            .option_value(spelling)
            .ok_or_else(|| SpecError::InvalidOptionValue {
                attribute: attribute.to_owned(),
                value: spelling.to_owned(),
            })?;
        order.attributes.insert(spec.attribute, value.to_owned());
        Ok(())
    }

    /// Required attributes that have no value.
    pub fn validation_errors(&self, order: &Order) -> Vec<&AttributeSpec> {
        self.registry
            .required()
            .filter(|spec| !order.contains(spec.attribute))
            .collect()
    }

    pub fn validate(&self, order: &Order) -> bool {
        self.validation_errors(order).is_empty()
    }

    /// Rebuild an order from its canonical form and validate it.
    ///
    /// Rejects unknown attribute names, non-canonical values and orders
    /// missing a required attribute.
    pub fn decode(&self, payload: &str) -> Result<Order, SpecError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(payload)?;
        let mut order = Order::default();
        for (name, value) in raw {
            let spec = self.registry.lookup(&name)?;
            if !spec.is_canonical(&value) {
                return Err(SpecError::InvalidOptionValue {
                    attribute: name,
                    value,
                });
            }
            order.attributes.insert(spec.attribute, value);
        }

        let missing = self.validation_errors(&order);
        if !missing.is_empty() {
            return Err(SpecError::InvalidOrder {
                missing: missing
                    .iter()
                    .map(|spec| spec.attribute.name().to_owned())
                    .collect(),
            });
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> OrderParser {
        OrderParser::new().unwrap()
    }

    fn attrs(order: &Order) -> Vec<(Attribute, &str)> {
        order.attributes().collect()
    }

    #[test]
    fn empty_order_is_invalid_until_type_assigned() {
        let p = parser();
        let mut order = p.parse("");
        assert!(order.is_empty());
        assert!(!p.validate(&order));

        p.assign(&mut order, "type", "C").unwrap();
        assert!(p.validate(&order));
        p.assign(&mut order, "size", "l").unwrap();
        assert!(p.validate(&order));
        p.assign(&mut order, "milk", "soy").unwrap();
        assert!(p.validate(&order));
        assert_eq!(order.get(Attribute::Size), Some("Large"));
    }

    #[test]
    fn validation_errors_name_required_specs() {
        let p = parser();
        let order = p.parse("large soy");
        let errors = p.validation_errors(&order);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].attribute, Attribute::Type);
        assert_eq!(errors[0].question, "What type of coffee?");
    }

    #[test]
    fn assign_rejects_bad_spelling_without_mutating() {
        let p = parser();
        let mut order = p.parse("latte");
        let err = p.assign(&mut order, "milk", "oat").unwrap_err();
        assert!(matches!(err, SpecError::InvalidOptionValue { .. }));
        assert_eq!(attrs(&order), vec![(Attribute::Type, "Latte")]);
    }

    #[test]
    fn assign_rejects_unknown_attribute() {
        let p = parser();
        let mut order = Order::default();
        let err = p.assign(&mut order, "syrup", "vanilla").unwrap_err();
        assert!(matches!(err, SpecError::UnknownAttribute(ref n) if n == "syrup"));
        assert!(order.is_empty());
    }

    #[test]
    fn first_token_wins_per_attribute() {
        let p = parser();
        let order = p.parse("latte mocha");
        assert_eq!(attrs(&order), vec![(Attribute::Type, "Latte")]);
    }

    #[test]
    fn size_claims_shared_spelling_first() {
        let p = parser();
        let order = p.parse("LL");
        assert_eq!(
            attrs(&order),
            vec![(Attribute::Size, "Large"), (Attribute::Type, "Latte")]
        );
    }

    #[test]
    fn encode_sorts_keys() {
        let p = parser();
        let order = p.parse("Soy decaf latte with 2 sugars");
        assert_eq!(
            order.encode().unwrap(),
            r#"{"decaf": "Decaf", "milk": "Soy", "sugar": "2 Sugars", "type": "Latte"}"#
        );
    }

    #[test]
    fn stored_orders_reencode_byte_for_byte() {
        let p = parser();
        let stored = r#"{"size": "Large", "type": "Cappuccino"}"#;
        assert_eq!(p.decode(stored).unwrap().encode().unwrap(), stored);
    }

    #[test]
    fn empty_order_encodes_as_empty_object() {
        assert_eq!(Order::default().encode().unwrap(), "{}");
    }

    #[test]
    fn decode_round_trips() {
        let p = parser();
        let order = p.parse("Large strong skinny cap 2S");
        let encoded = order.encode().unwrap();
        let decoded = p.decode(&encoded).unwrap();
        assert_eq!(decoded, order);
        assert_eq!(decoded.encode().unwrap(), encoded);
    }

    #[test]
    fn decode_rejects_missing_type() {
        let p = parser();
        let err = p.decode(r#"{"size":"Large"}"#).unwrap_err();
        assert!(matches!(err, SpecError::InvalidOrder { ref missing } if missing == &["type"]));
        assert!(err.to_string().starts_with("invalid coffee"));
    }

    #[test]
    fn decode_rejects_unknown_attribute() {
        let p = parser();
        let err = p.decode(r#"{"type":"Latte","syrup":"Vanilla"}"#).unwrap_err();
        assert!(matches!(err, SpecError::UnknownAttribute(_)));
    }

    #[test]
    fn decode_rejects_non_canonical_value() {
        let p = parser();
        let err = p.decode(r#"{"type":"cap"}"#).unwrap_err();
        assert!(matches!(err, SpecError::InvalidOptionValue { .. }));
    }

    #[test]
    fn decode_rejects_malformed_payload() {
        let p = parser();
        assert!(matches!(p.decode("not json"), Err(SpecError::Malformed(_))));
        assert!(matches!(
            p.decode(r#"{"type":3}"#),
            Err(SpecError::Malformed(_))
        ));
    }

    #[test]
    fn display_fills_size_and_inserts_with() {
        let p = parser();
        let mut order = Order::default();
        p.assign(&mut order, "type", "Latte").unwrap();
        p.assign(&mut order, "milk", "Soy").unwrap();
        p.assign(&mut order, "decaf", "Decaf").unwrap();
        p.assign(&mut order, "sugar", "2 Sugars").unwrap();
        assert_eq!(order.to_string(), "Regular Soy Decaf Latte with 2 Sugars");

        let order = p.parse("Large Cap");
        assert_eq!(order.to_string(), "Large Cappuccino");
    }

    #[test]
    fn display_of_empty_order_is_size_only() {
        assert_eq!(Order::default().to_string(), "Regular");
    }
}
