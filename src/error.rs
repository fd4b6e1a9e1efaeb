use thiserror::Error;

pub type Result<T> = std::result::Result<T, PricingError>;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A non-fatal problem found in a rule configuration.
///
/// Warnings never abort a run: the offending condition evaluates to `false`,
/// the offending action is a no-op, and the warning is handed back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    #[error("rule '{rule_id}' uses unknown condition '{condition}'")]
    UnknownCondition { rule_id: String, condition: String },
    #[error("case '{case_code}' uses item-scoped condition '{condition}'")]
    ItemConditionInCase { case_code: String, condition: String },
    #[error("rule '{rule_id}' references unknown action '{action_id}'")]
    UnknownAction { rule_id: String, action_id: String },
    #[error("rounding policy '{policy_id}' references unknown rule '{rule_id}'")]
    UnknownRoundingRule { policy_id: String, rule_id: String },
    #[error("rounding policy '{policy_id}' has non-positive granularity")]
    InvalidRoundingGranularity { policy_id: String },
    #[error("rounding policy '{policy_id}' granularity {round_to} is finer than {min}")]
    RoundingGranularityTooFine {
        policy_id: String,
        round_to: rust_decimal::Decimal,
        min: rust_decimal::Decimal,
    },
    #[error("reduction step {step} for {item_type} is outside the usable range")]
    UnusableReductionStep { item_type: String, step: rust_decimal::Decimal },
    #[error("rule '{rule_id}' is inconsistent with its parent: {detail}")]
    InconsistentHierarchy { rule_id: String, detail: String },
    #[error("rule id '{rule_id}' is declared more than once")]
    DuplicateRule { rule_id: String },
}
