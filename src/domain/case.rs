use super::condition::Condition;
use super::context::TenderContext;
use serde::{Deserialize, Serialize};

/// A tender-level case, e.g. "TH2.1", chosen from aggregate totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRule {
    pub case_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub parent_code: Option<String>,
    pub condition: String,
    #[serde(default)]
    pub allow_user_choice: bool,
    #[serde(default = "default_true")]
    pub allow_auto_reduction: bool,
}

fn default_level() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl CaseRule {
    pub fn new(case_code: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            case_code: case_code.into(),
            name: String::new(),
            level: 1,
            parent_code: None,
            condition: condition.into(),
            allow_user_choice: false,
            allow_auto_reduction: true,
        }
    }

    pub fn child_of(mut self, parent: &CaseRule) -> Self {
        self.parent_code = Some(parent.case_code.clone());
        self.level = parent.level + 1;
        self
    }

    fn matches(&self, ctx: &TenderContext) -> bool {
        self.condition
            .parse::<Condition>()
            .ok()
            .and_then(|c| c.evaluate_tender(ctx))
            .unwrap_or(false)
    }
}

/// Root-to-leaf chain of matched cases.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseSelection<'a> {
    pub path: Vec<&'a CaseRule>,
}

impl<'a> CaseSelection<'a> {
    pub fn deepest(&self) -> Option<&'a CaseRule> {
        self.path.last().copied()
    }
}

/// Picks the first matching root case, then keeps descending into the first
/// matching child until none matches. Declaration order breaks ties.
pub fn select_case<'a>(cases: &'a [CaseRule], ctx: &TenderContext) -> Option<CaseSelection<'a>> {
    let root = cases
        .iter()
        .find(|c| c.parent_code.is_none() && c.matches(ctx))?;
    let mut path = vec![root];
    let mut current = root;
    // Bounded by the number of cases so a cyclic parent chain cannot loop.
    while path.len() < cases.len() {
        let Some(child) = cases.iter().find(|c| {
            c.parent_code.as_deref() == Some(current.case_code.as_str()) && c.matches(ctx)
        }) else {
            break;
        };
        path.push(child);
        current = child;
    }
    tracing::debug!(
        case = %current.case_code,
        depth = path.len(),
        "tender case selected"
    );
    Some(CaseSelection { path })
}
