use super::item::{Item, PriceSource};
use super::rule::RuleConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Source of a rule configuration, however it is persisted.
#[async_trait]
pub trait RuleConfigStore: Send + Sync {
    async fn load(&self) -> Result<RuleConfig>;
}

pub type RuleConfigStoreBox = Box<dyn RuleConfigStore>;

/// Picks one of two reference prices for an item.
///
/// Returning `None` means no answer was obtained; the engine then falls back
/// to its configured default.
pub trait PriceChooser {
    fn choose_reference_price(&self, item: &Item, options: [PriceSource; 2])
    -> Option<PriceSource>;
}

impl<F> PriceChooser for F
where
    F: Fn(&Item, [PriceSource; 2]) -> Option<PriceSource>,
{
    fn choose_reference_price(
        &self,
        item: &Item,
        options: [PriceSource; 2],
    ) -> Option<PriceSource> {
        self(item, options)
    }
}

pub type PriceChooserBox = Box<dyn PriceChooser>;
