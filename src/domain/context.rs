use super::case::CaseSelection;
use super::item::{Item, PriceSource};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tender-wide aggregates and selections, computed once before evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderContext {
    pub total_plan: Decimal,
    pub total_min: Decimal,
    pub total_previous_winning: Decimal,
    pub total_ceiling: Decimal,
    #[serde(default)]
    pub total_appraisal: Decimal,
    /// Reference price every item starts its adjustment from.
    pub user_choice: PriceSource,
    pub selected_rule_code: Option<String>,
    pub allow_auto_reduction: bool,
}

impl Default for TenderContext {
    fn default() -> Self {
        Self {
            total_plan: Decimal::ZERO,
            total_min: Decimal::ZERO,
            total_previous_winning: Decimal::ZERO,
            total_ceiling: Decimal::ZERO,
            total_appraisal: Decimal::ZERO,
            user_choice: PriceSource::Min,
            selected_rule_code: None,
            allow_auto_reduction: true,
        }
    }
}

impl TenderContext {
    /// Sums `price * quantity` over all items for each reference category.
    pub fn from_items(items: &[Item]) -> Self {
        let total = |source: PriceSource| -> Decimal {
            items
                .iter()
                .map(|i| i.reference_price(source) * i.quantity)
                .sum()
        };
        Self {
            total_plan: total(PriceSource::Plan),
            total_min: total(PriceSource::Min),
            total_previous_winning: total(PriceSource::PreviousWinning),
            total_ceiling: total(PriceSource::Ceiling),
            total_appraisal: total(PriceSource::Appraisal),
            ..Self::default()
        }
    }

    /// Records the selected case and resolves the base price source.
    ///
    /// `choice` is only honoured when the deepest case allows a user choice;
    /// otherwise the tender starts from the minimum price.
    pub fn apply_case(&mut self, selection: &CaseSelection<'_>, choice: Option<PriceSource>) {
        let Some(case) = selection.deepest() else {
            return;
        };
        self.selected_rule_code = Some(case.case_code.clone());
        self.user_choice = if case.allow_user_choice {
            choice.unwrap_or(PriceSource::Min)
        } else {
            PriceSource::Min
        };
        self.allow_auto_reduction = selection.path.iter().all(|c| c.allow_auto_reduction);
    }
}
