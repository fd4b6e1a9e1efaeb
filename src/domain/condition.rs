use super::context::TenderContext;
use super::item::Item;
use std::fmt;
use std::str::FromStr;

/// Prefix of the parameterised condition matching the selected tender case.
const CASE_PREFIX: &str = "case:";

/// Whether a condition reads tender aggregates only or also the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionScope {
    Tender,
    Item,
}

/// The closed set of predicates a rule node may test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    TotalPlanAtLeastMin,
    TotalPlanWithinMinAndCeiling,
    TotalPreviousWinningBelowMin,
    TotalPlanFromPreviousWinningBelowMin,
    TotalPlanBelowPreviousWinning,
    TotalCeilingBelowPlan,
    TotalPreviousWinningAboveCeiling,
    TotalAppraisalBelowMin,
    TotalAppraisalAboveCeiling,
    SelectedCase(String),
    MinBelowMax,
    MinAtLeastMax,
    PlanBelowMin,
    CeilingBelowPlan,
    PlanWithinMinAndMax,
    PlanAboveMaxWithinCeiling,
    ReductionWarranted,
}

impl Condition {
    pub fn scope(&self) -> ConditionScope {
        match self {
            Condition::TotalPlanAtLeastMin
            | Condition::TotalPlanWithinMinAndCeiling
            | Condition::TotalPreviousWinningBelowMin
            | Condition::TotalPlanFromPreviousWinningBelowMin
            | Condition::TotalPlanBelowPreviousWinning
            | Condition::TotalCeilingBelowPlan
            | Condition::TotalPreviousWinningAboveCeiling
            | Condition::TotalAppraisalBelowMin
            | Condition::TotalAppraisalAboveCeiling
            | Condition::SelectedCase(_) => ConditionScope::Tender,
            _ => ConditionScope::Item,
        }
    }

    /// Evaluates a tender-scoped condition. Item-scoped conditions yield `None`.
    pub fn evaluate_tender(&self, ctx: &TenderContext) -> Option<bool> {
        let result = match self {
            Condition::TotalPlanAtLeastMin => ctx.total_plan >= ctx.total_min,
            Condition::TotalPlanWithinMinAndCeiling => {
                ctx.total_min <= ctx.total_plan && ctx.total_plan <= ctx.total_ceiling
            }
            Condition::TotalPreviousWinningBelowMin => ctx.total_previous_winning < ctx.total_min,
            Condition::TotalPlanFromPreviousWinningBelowMin => {
                ctx.total_previous_winning <= ctx.total_plan && ctx.total_plan < ctx.total_min
            }
            Condition::TotalPlanBelowPreviousWinning => ctx.total_plan < ctx.total_previous_winning,
            Condition::TotalCeilingBelowPlan => ctx.total_ceiling < ctx.total_plan,
            Condition::TotalPreviousWinningAboveCeiling => {
                ctx.total_previous_winning > ctx.total_ceiling
            }
            Condition::TotalAppraisalBelowMin => ctx.total_appraisal < ctx.total_min,
            Condition::TotalAppraisalAboveCeiling => ctx.total_appraisal > ctx.total_ceiling,
            Condition::SelectedCase(code) => ctx.selected_rule_code.as_deref() == Some(code),
            _ => return None,
        };
        Some(result)
    }

    pub fn evaluate(&self, item: &Item, ctx: &TenderContext) -> bool {
        if let Some(result) = self.evaluate_tender(ctx) {
            return result;
        }
        match self {
            Condition::MinBelowMax => item.price_min < item.price_max,
            Condition::MinAtLeastMax => item.price_min >= item.price_max,
            Condition::PlanBelowMin => item.price_plan < item.price_min,
            Condition::CeilingBelowPlan => item.price_ceiling < item.price_plan,
            Condition::PlanWithinMinAndMax => {
                item.price_min <= item.price_plan && item.price_plan <= item.price_max
            }
            Condition::PlanAboveMaxWithinCeiling => {
                item.price_max < item.price_plan && item.price_plan <= item.price_ceiling
            }
            Condition::ReductionWarranted => item.should_reduce_price(item.price_before_adjust),
            _ => false,
        }
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(code) = s.strip_prefix(CASE_PREFIX) {
            let code = code.trim();
            if code.is_empty() {
                return Err(s.to_string());
            }
            return Ok(Condition::SelectedCase(code.to_string()));
        }
        let condition = match s {
            "total_plan_gte_min" => Condition::TotalPlanAtLeastMin,
            "total_min_lte_plan_lte_ceiling" => Condition::TotalPlanWithinMinAndCeiling,
            "total_previous_winning_lt_min" => Condition::TotalPreviousWinningBelowMin,
            "total_previous_winning_lte_plan_lt_min" => {
                Condition::TotalPlanFromPreviousWinningBelowMin
            }
            "total_plan_lt_previous_winning" => Condition::TotalPlanBelowPreviousWinning,
            "total_ceiling_lt_plan" => Condition::TotalCeilingBelowPlan,
            "total_previous_winning_gt_ceiling" => Condition::TotalPreviousWinningAboveCeiling,
            "total_appraisal_lt_min" => Condition::TotalAppraisalBelowMin,
            "total_appraisal_gt_ceiling" => Condition::TotalAppraisalAboveCeiling,
            "min_lt_max" => Condition::MinBelowMax,
            "min_gte_max" => Condition::MinAtLeastMax,
            "plan_lt_min" => Condition::PlanBelowMin,
            "ceiling_lt_plan" => Condition::CeilingBelowPlan,
            "min_lte_plan_lte_max" => Condition::PlanWithinMinAndMax,
            "max_lt_plan_lte_ceiling" => Condition::PlanAboveMaxWithinCeiling,
            "reduction_warranted" => Condition::ReductionWarranted,
            other => return Err(other.to_string()),
        };
        Ok(condition)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::TotalPlanAtLeastMin => "total_plan_gte_min",
            Condition::TotalPlanWithinMinAndCeiling => "total_min_lte_plan_lte_ceiling",
            Condition::TotalPreviousWinningBelowMin => "total_previous_winning_lt_min",
            Condition::TotalPlanFromPreviousWinningBelowMin => {
                "total_previous_winning_lte_plan_lt_min"
            }
            Condition::TotalPlanBelowPreviousWinning => "total_plan_lt_previous_winning",
            Condition::TotalCeilingBelowPlan => "total_ceiling_lt_plan",
            Condition::TotalPreviousWinningAboveCeiling => "total_previous_winning_gt_ceiling",
            Condition::TotalAppraisalBelowMin => "total_appraisal_lt_min",
            Condition::TotalAppraisalAboveCeiling => "total_appraisal_gt_ceiling",
            Condition::SelectedCase(code) => return write!(f, "{CASE_PREFIX}{code}"),
            Condition::MinBelowMax => "min_lt_max",
            Condition::MinAtLeastMax => "min_gte_max",
            Condition::PlanBelowMin => "plan_lt_min",
            Condition::CeilingBelowPlan => "ceiling_lt_plan",
            Condition::PlanWithinMinAndMax => "min_lte_plan_lte_max",
            Condition::PlanAboveMaxWithinCeiling => "max_lt_plan_lte_ceiling",
            Condition::ReductionWarranted => "reduction_warranted",
        };
        f.write_str(name)
    }
}

/// Evaluates a condition by identifier. Unknown identifiers never match.
pub fn evaluate_condition(id: &str, item: &Item, ctx: &TenderContext) -> bool {
    match id.parse::<Condition>() {
        Ok(condition) => condition.evaluate(item, ctx),
        Err(_) => {
            tracing::debug!(condition = id, "unknown condition evaluated as false");
            false
        }
    }
}
