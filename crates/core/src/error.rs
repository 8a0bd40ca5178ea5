/// All errors raised by the registry, the resolver and the canonical codec.
///
/// Free-text parsing never fails; these only come from explicit assignment,
/// decoding stored orders, and registry construction.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// An attribute name that is not in the registry. Indicates a programming
    /// error or a corrupted stored order.
    #[error("unexpected spec: {0}")]
    UnknownAttribute(String),

    /// A spelling that does not denote any option of the named attribute.
    #[error("not a valid value '{value}' for spec {attribute}")]
    InvalidOptionValue { attribute: String, value: String },

    /// A decoded order is missing one or more required attributes.
    #[error("invalid coffee: missing {}", .missing.join(", "))]
    InvalidOrder { missing: Vec<String> },

    /// The same spelling was registered twice for one attribute.
    #[error("duplicate name '{spelling}' for an option of spec {attribute}")]
    DuplicateSpelling { attribute: String, spelling: String },

    /// The canonical payload is not a flat JSON object of strings.
    #[error("malformed coffee payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
