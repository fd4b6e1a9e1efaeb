use crate::domain::item::Item;
use crate::error::{PricingError, Result};
use std::io::Read;

/// Reads tender items from a CSV source.
///
/// Expected header: `id,name,type,quantity,plan,min,max,previous_winning,ceiling,appraisal`.
/// Whitespace around fields is trimmed.
pub struct ItemReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ItemReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes items; each row is validated for non-negative values.
    pub fn items(self) -> impl Iterator<Item = Result<Item>> {
        self.reader.into_deserialize().map(|result| -> Result<Item> {
            let item: Item = result.map_err(PricingError::from)?;
            item.validate()?;
            Ok(item)
        })
    }
}
