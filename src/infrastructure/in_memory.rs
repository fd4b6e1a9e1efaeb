use crate::domain::case::CaseRule;
use crate::domain::item::PriceSource;
use crate::domain::ports::RuleConfigStore;
use crate::domain::rounding::{RoundingMode, RoundingPolicy};
use crate::domain::rule::{ActionKind, RuleAction, RuleConfig, RuleNode};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory rule configuration store.
///
/// Cloning shares the underlying configuration, so a replacement made through
/// one handle is seen by every other.
#[derive(Default, Clone)]
pub struct InMemoryRuleConfigStore {
    config: Arc<RwLock<RuleConfig>>,
}

impl InMemoryRuleConfigStore {
    pub fn new(config: RuleConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// A store seeded with [`default_rule_config`].
    pub fn with_default_rules() -> Self {
        Self::new(default_rule_config())
    }

    pub async fn replace(&self, config: RuleConfig) {
        *self.config.write().await = config;
    }
}

#[async_trait]
impl RuleConfigStore for InMemoryRuleConfigStore {
    async fn load(&self) -> Result<RuleConfig> {
        Ok(self.config.read().await.clone())
    }
}

/// Built-in tender rules.
///
/// TH2 covers tenders whose previous-winning total is below the minimum total;
/// TH3 covers tenders whose previous-winning total exceeds the ceiling total
/// and never reduces.
pub fn default_rule_config() -> RuleConfig {
    let th2 = CaseRule {
        name: "previous winning total below min total".to_string(),
        ..CaseRule::new("TH2", "total_previous_winning_lt_min")
    };
    let cases = vec![
        CaseRule {
            name: "min <= plan <= ceiling".to_string(),
            ..CaseRule::new("TH2.1", "total_min_lte_plan_lte_ceiling").child_of(&th2)
        },
        CaseRule {
            name: "previous winning <= plan < min".to_string(),
            allow_user_choice: true,
            ..CaseRule::new("TH2.2", "total_previous_winning_lte_plan_lt_min").child_of(&th2)
        },
        CaseRule {
            name: "plan below previous winning".to_string(),
            allow_user_choice: true,
            ..CaseRule::new("TH2.3", "total_plan_lt_previous_winning").child_of(&th2)
        },
        CaseRule {
            name: "ceiling below plan".to_string(),
            ..CaseRule::new("TH2.4", "total_ceiling_lt_plan").child_of(&th2)
        },
        CaseRule {
            name: "previous winning total above ceiling total".to_string(),
            allow_user_choice: true,
            allow_auto_reduction: false,
            ..CaseRule::new("TH3", "total_previous_winning_gt_ceiling")
        },
    ];
    let cases = std::iter::once(th2).chain(cases).collect();

    let rules = vec![
        RuleNode::new("th2", "TH2")
            .with_condition("total_previous_winning_lt_min")
            .with_child(
                RuleNode::new("th2_1", "TH2.1")
                    .with_condition("total_min_lte_plan_lte_ceiling")
                    .with_action("disable_reduction")
                    .with_child(
                        RuleNode::new("th2_1_1", "TH2.1.1")
                            .with_condition("reduction_warranted")
                            .with_action("sequential_reduce"),
                    ),
            )
            .with_child(
                RuleNode::new("th2_2", "TH2.2")
                    .with_condition("total_previous_winning_lte_plan_lt_min")
                    .with_action("choose_plan_or_min"),
            )
            .with_child(
                RuleNode::new("th2_3", "TH2.3")
                    .with_condition("total_plan_lt_previous_winning")
                    .with_action("choose_plan_or_min"),
            )
            .with_child(
                RuleNode::new("th2_4", "TH2.4")
                    .with_condition("total_ceiling_lt_plan")
                    .with_action("keep_ceiling"),
            ),
        RuleNode::new("th3", "TH3")
            .with_condition("total_previous_winning_gt_ceiling")
            .with_action("disable_reduction"),
    ];

    let actions = vec![
        RuleAction::new("disable_reduction", ActionKind::DisableReduction),
        RuleAction::new("sequential_reduce", ActionKind::SequentialReduce),
        RuleAction::new(
            "choose_plan_or_min",
            ActionKind::RequestExternalChoice {
                options: [PriceSource::Plan, PriceSource::Min],
            },
        ),
        RuleAction::new(
            "keep_ceiling",
            ActionKind::KeepInputPrice {
                input_price_source: PriceSource::Ceiling,
            },
        ),
    ];

    let rounding = vec![
        RoundingPolicy::new("round_th2_1_1", "th2_1_1", dec!(1000), RoundingMode::Up),
        RoundingPolicy::new("round_th2_4", "th2_4", dec!(1000), RoundingMode::Down),
    ];

    RuleConfig {
        cases,
        rules,
        actions,
        rounding,
        ..RuleConfig::default()
    }
}
