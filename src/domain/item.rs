use crate::error::PricingError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category of a tender line. Drives the reduction step.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    GeneralGoods,
    ConsumableTool,
    ControlReagent,
    CalibrationReagent,
    PrimaryReagent,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::GeneralGoods => "general_goods",
            ItemType::ConsumableTool => "consumable_tool",
            ItemType::ControlReagent => "control_reagent",
            ItemType::CalibrationReagent => "calibration_reagent",
            ItemType::PrimaryReagent => "primary_reagent",
        }
    }
}

/// Which reference price an adjustment starts from or copies.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Plan,
    #[default]
    Min,
    Max,
    PreviousWinning,
    Ceiling,
    Appraisal,
}

impl std::str::FromStr for PriceSource {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plan" => Ok(Self::Plan),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "previous_winning" => Ok(Self::PreviousWinning),
            "ceiling" => Ok(Self::Ceiling),
            "appraisal" => Ok(Self::Appraisal),
            other => Err(PricingError::ValidationError(format!(
                "Unknown price source '{other}'"
            ))),
        }
    }
}

/// Resolution state of an item after a tender run.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum PricingStatus {
    #[default]
    Pending,
    Resolved,
    Unresolved,
}

/// One tender line with its reference prices.
///
/// The engine-populated fields are skipped on input so that an item can be
/// read straight from a CSV row.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Item {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub quantity: Decimal,
    #[serde(rename = "plan")]
    pub price_plan: Decimal,
    #[serde(rename = "min")]
    pub price_min: Decimal,
    #[serde(rename = "max")]
    pub price_max: Decimal,
    #[serde(rename = "previous_winning")]
    pub price_previous_winning: Decimal,
    #[serde(rename = "ceiling")]
    pub price_ceiling: Decimal,
    /// Appraised price. Informs tender case selection, never the reduction floor.
    #[serde(rename = "appraisal")]
    pub price_appraisal: Decimal,
    #[serde(skip, default)]
    pub price_before_adjust: Decimal,
    #[serde(skip, default)]
    pub price_after_adjust: Option<Decimal>,
    #[serde(skip, default)]
    pub price_proposal: Option<Decimal>,
    #[serde(skip, default)]
    pub matched_rule_id: Option<String>,
    #[serde(skip, default)]
    pub status: PricingStatus,
}

impl Item {
    pub fn new(id: u32, name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            id,
            name: name.into(),
            item_type,
            quantity: Decimal::ONE,
            price_plan: Decimal::ZERO,
            price_min: Decimal::ZERO,
            price_max: Decimal::ZERO,
            price_previous_winning: Decimal::ZERO,
            price_ceiling: Decimal::ZERO,
            price_appraisal: Decimal::ZERO,
            price_before_adjust: Decimal::ZERO,
            price_after_adjust: None,
            price_proposal: None,
            matched_rule_id: None,
            status: PricingStatus::Pending,
        }
    }

    /// Planned budget for the whole line.
    pub fn total_value(&self) -> Decimal {
        self.price_plan * self.quantity
    }

    pub fn reference_price(&self, source: PriceSource) -> Decimal {
        match source {
            PriceSource::Plan => self.price_plan,
            PriceSource::Min => self.price_min,
            PriceSource::Max => self.price_max,
            PriceSource::PreviousWinning => self.price_previous_winning,
            PriceSource::Ceiling => self.price_ceiling,
            PriceSource::Appraisal => self.price_appraisal,
        }
    }

    /// A base price is worth reducing only while it sits at or above both the
    /// highest comparable price and the previous winning price.
    pub fn should_reduce_price(&self, base: Decimal) -> bool {
        base >= self.price_max.max(self.price_previous_winning)
    }

    /// Sets the adjusted and proposed price together.
    pub fn set_adjusted(&mut self, price: Decimal) {
        self.price_after_adjust = Some(price);
        self.price_proposal = Some(price);
    }

    /// Checks that quantity and every reference price are non-negative.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.quantity < Decimal::ZERO {
            return Err(PricingError::ValidationError(format!(
                "Item {} has negative quantity",
                self.id
            )));
        }
        let prices = [
            ("plan", self.price_plan),
            ("min", self.price_min),
            ("max", self.price_max),
            ("previous_winning", self.price_previous_winning),
            ("ceiling", self.price_ceiling),
            ("appraisal", self.price_appraisal),
        ];
        if let Some((label, _)) = prices.iter().find(|(_, p)| *p < Decimal::ZERO) {
            return Err(PricingError::ValidationError(format!(
                "Item {} has negative {label} price",
                self.id
            )));
        }
        Ok(())
    }
}
