use super::case::CaseRule;
use super::condition::{Condition, ConditionScope};
use super::item::{ItemType, PriceSource};
use super::reduction::{StepTable, is_usable_step};
use super::rounding::{MIN_GRANULARITY, RoundingPolicy};
use crate::error::ConfigWarning;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A node of the rule hierarchy.
///
/// A node without a condition always matches. A node whose type allow-list is
/// non-empty and excludes the item's type is skipped with its whole subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleNode {
    pub id: String,
    #[serde(default)]
    pub case_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub action_id: Option<String>,
    #[serde(default)]
    pub applies_to_types: Vec<ItemType>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub children: Vec<RuleNode>,
}

fn default_level() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl RuleNode {
    pub fn new(id: impl Into<String>, case_code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            case_code: case_code.into(),
            name: String::new(),
            level: 1,
            parent_id: None,
            condition: None,
            action_id: None,
            applies_to_types: Vec::new(),
            is_active: true,
            children: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_action(mut self, action_id: impl Into<String>) -> Self {
        self.action_id = Some(action_id.into());
        self
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = ItemType>) -> Self {
        self.applies_to_types = types.into_iter().collect();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Appends a child, linking its parent id and level to this node.
    pub fn with_child(mut self, mut child: RuleNode) -> Self {
        child.parent_id = Some(self.id.clone());
        child.relevel(self.level + 1);
        self.children.push(child);
        self
    }

    fn relevel(&mut self, level: u32) {
        self.level = level;
        for child in &mut self.children {
            child.relevel(level + 1);
        }
    }

    pub fn applies_to(&self, item_type: ItemType) -> bool {
        self.applies_to_types.is_empty() || self.applies_to_types.contains(&item_type)
    }

    /// Pre-order iterator over this node and its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &RuleNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// What a rule does to an item once it matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action_kind", rename_all = "snake_case")]
pub enum ActionKind {
    KeepInputPrice { input_price_source: PriceSource },
    SequentialReduce,
    RequestExternalChoice {
        #[serde(default = "default_choice_options")]
        options: [PriceSource; 2],
    },
    DisableReduction,
}

fn default_choice_options() -> [PriceSource; 2] {
    [PriceSource::Plan, PriceSource::Min]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleAction {
    pub id: String,
    #[serde(flatten)]
    pub kind: ActionKind,
    #[serde(default)]
    pub description: String,
}

impl RuleAction {
    pub fn new(id: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            description: String::new(),
        }
    }
}

/// Everything the engine needs to price a tender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub cases: Vec<CaseRule>,
    /// Root nodes, walked in declaration order.
    #[serde(default)]
    pub rules: Vec<RuleNode>,
    #[serde(default)]
    pub actions: Vec<RuleAction>,
    #[serde(default)]
    pub rounding: Vec<RoundingPolicy>,
    #[serde(default)]
    pub reduction_steps: StepTable,
}

impl RuleConfig {
    pub fn action(&self, id: &str) -> Option<&RuleAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// First rounding policy bound to `rule_id`.
    pub fn rounding_for(&self, rule_id: &str) -> Option<&RoundingPolicy> {
        self.rounding.iter().find(|p| p.rule_id == rule_id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RuleNode> {
        self.rules.iter().flat_map(|root| root.iter())
    }

    /// Builds the hierarchy from flat nodes linked by `parent_id`.
    ///
    /// Children keep their declaration order. A node whose parent is missing
    /// (or lies on a cycle) becomes a root and is reported.
    pub fn assemble(flat: Vec<RuleNode>) -> (Vec<RuleNode>, Vec<ConfigWarning>) {
        let mut warnings = Vec::new();
        let known: HashSet<String> = flat.iter().map(|n| n.id.clone()).collect();
        let mut by_parent: HashMap<Option<String>, Vec<RuleNode>> = HashMap::new();
        for mut node in flat {
            if let Some(parent) = node.parent_id.as_deref()
                && !known.contains(parent)
            {
                warnings.push(ConfigWarning::InconsistentHierarchy {
                    rule_id: node.id.clone(),
                    detail: format!("parent '{parent}' does not exist"),
                });
                node.parent_id = None;
            }
            by_parent.entry(node.parent_id.clone()).or_default().push(node);
        }

        fn attach(node: &mut RuleNode, by_parent: &mut HashMap<Option<String>, Vec<RuleNode>>) {
            let mut children = by_parent.remove(&Some(node.id.clone())).unwrap_or_default();
            for child in &mut children {
                attach(child, by_parent);
            }
            node.children = children;
        }

        let mut roots = by_parent.remove(&None).unwrap_or_default();
        for root in &mut roots {
            attach(root, &mut by_parent);
        }
        // Whatever is left hangs off a cycle that no root reaches.
        let mut stranded: Vec<RuleNode> = by_parent.into_values().flatten().collect();
        stranded.sort_by(|a, b| a.id.cmp(&b.id));
        for mut node in stranded {
            warnings.push(ConfigWarning::InconsistentHierarchy {
                rule_id: node.id.clone(),
                detail: "unreachable from any root".to_string(),
            });
            node.parent_id = None;
            node.children.clear();
            roots.push(node);
        }
        (roots, warnings)
    }

    /// Reports every configuration problem without failing.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for case in &self.cases {
            match case.condition.parse::<Condition>() {
                Ok(c) if c.scope() == ConditionScope::Item => {
                    warnings.push(ConfigWarning::ItemConditionInCase {
                        case_code: case.case_code.clone(),
                        condition: case.condition.clone(),
                    })
                }
                Ok(_) => {}
                Err(_) => warnings.push(ConfigWarning::UnknownCondition {
                    rule_id: case.case_code.clone(),
                    condition: case.condition.clone(),
                }),
            }
        }

        let mut seen = HashSet::new();
        for root in &self.rules {
            self.validate_node(root, None, &mut seen, &mut warnings);
        }

        for policy in &self.rounding {
            if !seen.contains(policy.rule_id.as_str()) {
                warnings.push(ConfigWarning::UnknownRoundingRule {
                    policy_id: policy.id.clone(),
                    rule_id: policy.rule_id.clone(),
                });
            }
            if policy.round_to <= rust_decimal::Decimal::ZERO {
                warnings.push(ConfigWarning::InvalidRoundingGranularity {
                    policy_id: policy.id.clone(),
                });
            } else if policy.round_to < MIN_GRANULARITY {
                warnings.push(ConfigWarning::RoundingGranularityTooFine {
                    policy_id: policy.id.clone(),
                    round_to: policy.round_to,
                    min: MIN_GRANULARITY,
                });
            }
        }

        for (item_type, step) in self.reduction_steps.entries() {
            if !is_usable_step(step) {
                warnings.push(ConfigWarning::UnusableReductionStep {
                    item_type: item_type.as_str().to_string(),
                    step,
                });
            }
        }
        warnings
    }

    fn validate_node<'a>(
        &self,
        node: &'a RuleNode,
        parent: Option<&RuleNode>,
        seen: &mut HashSet<&'a str>,
        warnings: &mut Vec<ConfigWarning>,
    ) {
        if !seen.insert(node.id.as_str()) {
            warnings.push(ConfigWarning::DuplicateRule {
                rule_id: node.id.clone(),
            });
        }
        if let Some(condition) = &node.condition
            && condition.parse::<Condition>().is_err()
        {
            warnings.push(ConfigWarning::UnknownCondition {
                rule_id: node.id.clone(),
                condition: condition.clone(),
            });
        }
        if let Some(action_id) = &node.action_id
            && self.action(action_id).is_none()
        {
            warnings.push(ConfigWarning::UnknownAction {
                rule_id: node.id.clone(),
                action_id: action_id.clone(),
            });
        }
        if let Some(parent) = parent {
            if node.parent_id.as_deref().is_some_and(|p| p != parent.id) {
                warnings.push(ConfigWarning::InconsistentHierarchy {
                    rule_id: node.id.clone(),
                    detail: format!("declared parent differs from enclosing rule '{}'", parent.id),
                });
            }
            if node.level != parent.level + 1 {
                warnings.push(ConfigWarning::InconsistentHierarchy {
                    rule_id: node.id.clone(),
                    detail: format!("level {} under level {}", node.level, parent.level),
                });
            }
        }
        for child in &node.children {
            self.validate_node(child, Some(node), seen, warnings);
        }
    }
}
