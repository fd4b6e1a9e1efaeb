use crate::domain::condition::evaluate_condition;
use crate::domain::context::TenderContext;
use crate::domain::item::{Item, PriceSource, PricingStatus};
use crate::domain::ports::PriceChooserBox;
use crate::domain::reduction::{ReductionLogEntry, reduce};
use crate::domain::rounding::round_price;
use crate::domain::rule::{ActionKind, RuleAction, RuleConfig, RuleNode};
use crate::error::ConfigWarning;
use tracing::{debug, info, warn};

/// Why an item could not be priced.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    /// No rule along any path bound an action that fired.
    NoMatchingRule,
    InvalidPrices(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemIssue {
    pub item_id: u32,
    pub name: String,
    pub kind: IssueKind,
}

/// Everything a tender run produces.
#[derive(Debug, Clone, Default)]
pub struct TenderOutcome {
    pub items: Vec<Item>,
    pub reduction_log: Vec<ReductionLogEntry>,
    pub warnings: Vec<ConfigWarning>,
    pub issues: Vec<ItemIssue>,
}

impl TenderOutcome {
    pub fn unresolved(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(|i| i.status == PricingStatus::Unresolved)
    }

    /// True when every item has a proposal and the configuration was clean.
    pub fn is_submittable(&self) -> bool {
        self.issues.is_empty() && self.warnings.is_empty()
    }
}

/// Prices tender items against a rule configuration.
///
/// The engine never mutates the caller's items: each run works on clones, so
/// the same base items can be re-evaluated under different configurations.
pub struct PricingEngine {
    config: RuleConfig,
    chooser: Option<PriceChooserBox>,
    fallback_choice: PriceSource,
}

impl PricingEngine {
    /// Creates an engine with no external chooser; choices fall back to `Min`.
    pub fn new(config: RuleConfig) -> Self {
        Self {
            config,
            chooser: None,
            fallback_choice: PriceSource::Min,
        }
    }

    pub fn with_chooser(mut self, chooser: PriceChooserBox) -> Self {
        self.chooser = Some(chooser);
        self
    }

    /// Price used when a choice is requested but none is obtained.
    pub fn with_fallback_choice(mut self, source: PriceSource) -> Self {
        self.fallback_choice = source;
        self
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Runs every item through the rule tree, then rounds the proposals.
    pub fn process_tender(&self, items: &[Item], context: &TenderContext) -> TenderOutcome {
        let warnings = self.config.validate();
        for warning in &warnings {
            warn!(%warning, "rule configuration warning");
        }
        info!(
            items = items.len(),
            case = context.selected_rule_code.as_deref().unwrap_or("-"),
            base = ?context.user_choice,
            "processing tender"
        );

        let mut outcome = TenderOutcome {
            warnings,
            ..TenderOutcome::default()
        };

        for original in items {
            let mut item = original.clone();
            item.price_before_adjust = item.reference_price(context.user_choice);
            item.price_after_adjust = None;
            item.price_proposal = None;
            item.matched_rule_id = None;

            if let Err(e) = item.validate() {
                warn!(item = item.id, error = %e, "item skipped");
                item.status = PricingStatus::Unresolved;
                outcome.issues.push(ItemIssue {
                    item_id: item.id,
                    name: item.name.clone(),
                    kind: IssueKind::InvalidPrices(e.to_string()),
                });
                outcome.items.push(item);
                continue;
            }

            let mut log = None;
            for root in &self.config.rules {
                self.apply_rules(&mut item, context, root, &mut log);
            }

            if item.price_proposal.is_some() {
                item.status = PricingStatus::Resolved;
            } else {
                warn!(item = item.id, name = %item.name, "no rule produced a price");
                item.status = PricingStatus::Unresolved;
                outcome.issues.push(ItemIssue {
                    item_id: item.id,
                    name: item.name.clone(),
                    kind: IssueKind::NoMatchingRule,
                });
            }
            outcome.reduction_log.extend(log);
            outcome.items.push(item);
        }

        self.apply_rounding(&mut outcome.items);
        outcome
    }

    fn apply_rules(
        &self,
        item: &mut Item,
        context: &TenderContext,
        node: &RuleNode,
        log: &mut Option<ReductionLogEntry>,
    ) {
        if !node.is_active {
            return;
        }
        if let Some(condition) = node.condition.as_deref()
            && !evaluate_condition(condition, item, context)
        {
            return;
        }
        if !node.applies_to(item.item_type) {
            return;
        }

        if let Some(action_id) = node.action_id.as_deref() {
            // Unknown actions are already reported by validation.
            if let Some(action) = self.config.action(action_id) {
                self.apply_action(item, context, action, log);
                item.matched_rule_id = Some(node.id.clone());
                debug!(item = item.id, rule = %node.id, action = %action.id, "action applied");
            } else {
                debug!(item = item.id, rule = %node.id, action = action_id, "unknown action skipped");
            }
        }

        for child in &node.children {
            self.apply_rules(item, context, child, log);
        }
    }

    fn apply_action(
        &self,
        item: &mut Item,
        context: &TenderContext,
        action: &RuleAction,
        log: &mut Option<ReductionLogEntry>,
    ) {
        match &action.kind {
            ActionKind::KeepInputPrice { input_price_source } => {
                item.set_adjusted(item.reference_price(*input_price_source));
            }
            ActionKind::SequentialReduce if !context.allow_auto_reduction => {
                debug!(item = item.id, "auto reduction disabled for this tender case");
                item.set_adjusted(item.price_before_adjust);
            }
            ActionKind::SequentialReduce => {
                let step = self.config.reduction_steps.step_for(item.item_type);
                let reduction = reduce(item.price_before_adjust, step, item.price_previous_winning);
                item.set_adjusted(reduction.final_price);
                *log = Some(ReductionLogEntry::new(item, step, &reduction));
            }
            ActionKind::RequestExternalChoice { options } => {
                let source = self.choose(item, *options);
                item.set_adjusted(item.reference_price(source));
            }
            ActionKind::DisableReduction => {
                item.set_adjusted(item.price_before_adjust);
            }
        }
    }

    fn choose(&self, item: &Item, options: [PriceSource; 2]) -> PriceSource {
        let answer = self
            .chooser
            .as_ref()
            .and_then(|c| c.choose_reference_price(item, options));
        match answer {
            Some(source) if options.contains(&source) => source,
            Some(source) => {
                warn!(item = item.id, ?source, "chosen price is not one of the offered options");
                self.fallback_choice
            }
            None => self.fallback_choice,
        }
    }

    fn apply_rounding(&self, items: &mut [Item]) {
        for item in items {
            let (Some(rule_id), Some(proposal)) = (item.matched_rule_id.as_deref(), item.price_proposal)
            else {
                continue;
            };
            if let Some(policy) = self.config.rounding_for(rule_id) {
                item.price_proposal = Some(round_price(proposal, policy));
            }
        }
    }
}
