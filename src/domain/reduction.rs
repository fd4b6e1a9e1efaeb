use super::item::{Item, ItemType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Smallest step the reduction runs with. Finer steps would need an
/// unbounded number of iterations to reach a floor.
pub const MIN_STEP: Decimal = dec!(0.0001);

/// Reduction step per item type, as a fraction (0.01 = 1%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepTable {
    pub general_goods: Decimal,
    pub consumable_tool: Decimal,
    pub control_reagent: Decimal,
    pub calibration_reagent: Decimal,
    pub primary_reagent: Decimal,
}

impl Default for StepTable {
    fn default() -> Self {
        Self {
            general_goods: dec!(0.01),
            consumable_tool: dec!(0.015),
            control_reagent: dec!(0.02),
            calibration_reagent: dec!(0.02),
            primary_reagent: dec!(0.025),
        }
    }
}

impl StepTable {
    pub fn step_for(&self, item_type: ItemType) -> Decimal {
        match item_type {
            ItemType::GeneralGoods => self.general_goods,
            ItemType::ConsumableTool => self.consumable_tool,
            ItemType::ControlReagent => self.control_reagent,
            ItemType::CalibrationReagent => self.calibration_reagent,
            ItemType::PrimaryReagent => self.primary_reagent,
        }
    }

    pub fn entries(&self) -> [(ItemType, Decimal); 5] {
        [
            (ItemType::GeneralGoods, self.general_goods),
            (ItemType::ConsumableTool, self.consumable_tool),
            (ItemType::ControlReagent, self.control_reagent),
            (ItemType::CalibrationReagent, self.calibration_reagent),
            (ItemType::PrimaryReagent, self.primary_reagent),
        ]
    }
}

/// Whether `reduce` will actually iterate with this step.
pub fn is_usable_step(step: Decimal) -> bool {
    step >= MIN_STEP && step < Decimal::ONE
}

/// Result of a threshold reduction: the final price and every intermediate one.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub final_price: Decimal,
    pub steps: Vec<Decimal>,
}

/// Discounts `start` by `step` repeatedly while the next price stays at or
/// above `floor`.
///
/// The loop does not run at all when `step` is outside `[MIN_STEP, 1)`, when
/// `floor` is not positive, or when `floor` is above `start`; the start price
/// is then returned unchanged with no steps. It also stops once a step no
/// longer lowers the price at decimal precision.
pub fn reduce(start: Decimal, step: Decimal, floor: Decimal) -> Reduction {
    let mut steps = Vec::new();
    if !is_usable_step(step) || floor <= Decimal::ZERO || floor > start {
        return Reduction {
            final_price: start,
            steps,
        };
    }

    let factor = Decimal::ONE - step;
    let mut current = start;
    loop {
        let next = current * factor;
        if next < floor || next >= current {
            break;
        }
        steps.push(next);
        current = next;
    }
    Reduction {
        final_price: current,
        steps,
    }
}

/// Audit record of one reduction, for reporting only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReductionLogEntry {
    pub item_id: u32,
    pub item_name: String,
    pub item_type: ItemType,
    pub original_price: Decimal,
    pub threshold_price: Decimal,
    pub step_percent: Decimal,
    pub price_steps: Vec<Decimal>,
}

impl ReductionLogEntry {
    pub fn new(item: &Item, step: Decimal, reduction: &Reduction) -> Self {
        Self {
            item_id: item.id,
            item_name: item.name.clone(),
            item_type: item.item_type,
            original_price: item.price_before_adjust,
            threshold_price: item.price_previous_winning,
            step_percent: step * Decimal::ONE_HUNDRED,
            price_steps: reduction.steps.clone(),
        }
    }
}
