#![allow(dead_code)]

use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;
use tender_pricing::domain::item::{Item, ItemType};

pub const HEADER: &str =
    "id,name,type,quantity,plan,min,max,previous_winning,ceiling,appraisal";

pub const FIXTURE: &str = "tests/fixtures/items.csv";

/// Writes a header plus the given rows to a temporary CSV file.
pub fn items_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

pub fn rules_json(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{json}").unwrap();
    file
}

/// Builds an item from `[plan, min, max, previous_winning, ceiling]`.
pub fn item(id: u32, item_type: ItemType, prices: [i64; 5]) -> Item {
    let [plan, min, max, previous_winning, ceiling] = prices.map(Decimal::from);
    let mut item = Item::new(id, format!("item {id}"), item_type);
    item.price_plan = plan;
    item.price_min = min;
    item.price_max = max;
    item.price_previous_winning = previous_winning;
    item.price_ceiling = ceiling;
    item
}

/// The five items of `tests/fixtures/items.csv`.
pub fn fixture_items() -> Vec<Item> {
    let rows = [
        (ItemType::GeneralGoods, 5, [920000, 900000, 880000, 870000, 950000]),
        (ItemType::GeneralGoods, 4, [860000, 850000, 830000, 810000, 890000]),
        (ItemType::ConsumableTool, 6, [780000, 760000, 780000, 770000, 800000]),
        (ItemType::ControlReagent, 3, [1220000, 1200000, 1180000, 1170000, 1250000]),
        (ItemType::PrimaryReagent, 2, [1420000, 1400000, 1350000, 1300000, 1450000]),
    ];
    rows.into_iter()
        .enumerate()
        .map(|(n, (item_type, quantity, prices))| {
            let mut item = item(n as u32 + 1, item_type, prices);
            item.quantity = Decimal::from(quantity);
            item
        })
        .collect()
}
