use crate::domain::item::{Item, PriceSource};
use crate::domain::ports::PriceChooser;
use crate::domain::reduction::ReductionLogEntry;
use crate::error::Result;
use std::cell::RefCell;
use std::io::{BufRead, Write};

/// Asks a human to pick a reference price, one line per question.
///
/// An empty line, end of input, or an unreadable answer yields no choice so
/// the engine falls back to its default.
pub struct PromptChooser<R: BufRead, W: Write> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> PromptChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    fn ask(&self, item: &Item, options: [PriceSource; 2]) -> std::io::Result<Option<PriceSource>> {
        let mut output = self.output.borrow_mut();
        write!(output, "Choose a price for {} (", item.name)?;
        for (n, source) in options.iter().enumerate() {
            let sep = if n == 0 { "" } else { ", " };
            write!(output, "{sep}{}: {:?} {}", n + 1, source, item.reference_price(*source))?;
        }
        write!(output, "): ")?;
        output.flush()?;

        let mut line = String::new();
        if self.input.borrow_mut().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim();
        let chosen = match answer {
            "1" => Some(options[0]),
            "2" => Some(options[1]),
            other => other.parse::<PriceSource>().ok(),
        };
        Ok(chosen)
    }
}

impl<R: BufRead, W: Write> PriceChooser for PromptChooser<R, W> {
    fn choose_reference_price(
        &self,
        item: &Item,
        options: [PriceSource; 2],
    ) -> Option<PriceSource> {
        match self.ask(item, options) {
            Ok(choice) => choice,
            Err(e) => {
                tracing::warn!(error = %e, "price prompt failed");
                None
            }
        }
    }
}

/// Prints each reduction with its intermediate prices.
pub fn write_reduction_log<W: Write>(out: &mut W, log: &[ReductionLogEntry]) -> Result<()> {
    writeln!(out, "Reduction log:")?;
    for entry in log {
        writeln!(
            out,
            "{} ({}): start {}, floor {}, step {}%",
            entry.item_name,
            entry.item_type.as_str(),
            entry.original_price.normalize(),
            entry.threshold_price.normalize(),
            entry.step_percent.normalize()
        )?;
        for price in &entry.price_steps {
            writeln!(out, "  -> {}", price.round_dp(2).normalize())?;
        }
    }
    Ok(())
}
