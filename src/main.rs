use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tender_pricing::application::engine::PricingEngine;
use tender_pricing::domain::case::select_case;
use tender_pricing::domain::context::TenderContext;
use tender_pricing::domain::item::PriceSource;
use tender_pricing::domain::ports::RuleConfigStoreBox;
use tender_pricing::infrastructure::in_memory::InMemoryRuleConfigStore;
use tender_pricing::infrastructure::json_file::JsonFileRuleConfigStore;
use tender_pricing::interfaces::console::{PromptChooser, write_reduction_log};
use tender_pricing::interfaces::csv::item_reader::ItemReader;
use tender_pricing::interfaces::csv::proposal_writer::ProposalWriter;
use tender_pricing::logging;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input tender items CSV file
    input: PathBuf,

    /// Rule configuration JSON file. Built-in rules are used when omitted.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Reference price every item starts from (plan, min, ...), overriding the tender case.
    #[arg(long)]
    base: Option<PriceSource>,

    /// Ask on the terminal whenever a rule requests a price choice.
    #[arg(long)]
    interactive: bool,

    /// Print the reduction log to stderr.
    #[arg(long)]
    show_log: bool,

    /// Fail when any item is unresolved or the configuration has warnings.
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let store: RuleConfigStoreBox = match &cli.rules {
        Some(path) => Box::new(JsonFileRuleConfigStore::new(path)),
        None => Box::new(InMemoryRuleConfigStore::with_default_rules()),
    };
    let config = store.load().await.into_diagnostic()?;

    let file = File::open(&cli.input).into_diagnostic()?;
    let mut items = Vec::new();
    for result in ItemReader::new(file).items() {
        match result {
            Ok(item) => items.push(item),
            Err(e) => tracing::error!(error = %e, "error reading item"),
        }
    }

    let mut context = TenderContext::from_items(&items);
    match select_case(&config.cases, &context) {
        Some(selection) => context.apply_case(&selection, cli.base),
        None => tracing::warn!("no tender case matched"),
    }
    if let Some(base) = cli.base {
        context.user_choice = base;
    }

    let mut engine = PricingEngine::new(config);
    if cli.interactive {
        engine = engine.with_chooser(Box::new(PromptChooser::new(io::stdin().lock(), io::stderr())));
    }
    let outcome = engine.process_tender(&items, &context);

    let stdout = io::stdout();
    let mut writer = ProposalWriter::new(stdout.lock());
    writer.write_items(&outcome.items).into_diagnostic()?;

    if cli.show_log {
        write_reduction_log(&mut io::stderr(), &outcome.reduction_log).into_diagnostic()?;
    }

    if cli.strict && !outcome.is_submittable() {
        return Err(miette::miette!(
            "tender is not ready for submission: {} item issue(s), {} configuration warning(s)",
            outcome.issues.len(),
            outcome.warnings.len()
        ));
    }

    Ok(())
}
