use crate::domain::item::{Item, ItemType, PricingStatus};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ProposalRecord<'a> {
    id: u32,
    name: &'a str,
    #[serde(rename = "type")]
    item_type: ItemType,
    quantity: Decimal,
    price_before_adjust: Decimal,
    price_after_adjust: Option<Decimal>,
    price_proposal: Option<Decimal>,
    matched_rule_id: Option<&'a str>,
    status: PricingStatus,
}

impl<'a> From<&'a Item> for ProposalRecord<'a> {
    fn from(item: &'a Item) -> Self {
        Self {
            id: item.id,
            name: &item.name,
            item_type: item.item_type,
            quantity: item.quantity.normalize(),
            price_before_adjust: item.price_before_adjust.normalize(),
            price_after_adjust: item.price_after_adjust.map(|p| p.normalize()),
            price_proposal: item.price_proposal.map(|p| p.normalize()),
            matched_rule_id: item.matched_rule_id.as_deref(),
            status: item.status,
        }
    }
}

/// Writes priced items as CSV, one row per item, in input order.
pub struct ProposalWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ProposalWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_items<'a>(&mut self, items: impl IntoIterator<Item = &'a Item>) -> Result<()> {
        for item in items {
            self.writer.serialize(ProposalRecord::from(item))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
