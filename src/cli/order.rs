use super::ui;
use crate::core::flow::{ExchangeFlow, OrderSummary};
use crate::core::{AmountMode, CurrencyCode, RateResolver};
use anyhow::Result;
use clap::Args;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct OrderArgs {
    /// Currency handed over by the client
    #[arg(long)]
    pub give: CurrencyCode,

    /// Currency received by the client
    #[arg(long)]
    pub get: CurrencyCode,

    /// Amount, e.g. "1 500,50"
    #[arg(long)]
    pub amount: String,

    /// Which side the amount refers to
    #[arg(long, default_value = "give")]
    pub mode: AmountMode,

    /// Where the client hands over the money
    #[arg(long)]
    pub from_location: String,

    /// Where the client receives the money
    #[arg(long)]
    pub to_location: String,

    /// How to reach the client
    #[arg(long)]
    pub contact: String,
}

pub async fn run(resolver: &dyn RateResolver, args: &OrderArgs) -> Result<()> {
    let summary = place_order(resolver, args).await?;
    println!("{}", render(&summary));
    Ok(())
}

/// Drives a fresh exchange flow through every step using `args`.
pub async fn place_order(resolver: &dyn RateResolver, args: &OrderArgs) -> Result<OrderSummary> {
    let mut flow = ExchangeFlow::new();
    flow.start();
    flow.choose_give(args.give)?;
    flow.choose_get(args.get)?;
    flow.choose_mode(args.mode)?;
    flow.enter_amount(&args.amount)?;
    flow.enter_from_location(&args.from_location)?;
    flow.enter_to_location(&args.to_location)?;

    let pb = ui::new_spinner("Calculating quote...");
    let calculated = flow.calculate(resolver).await.map(|_| ());
    pb.finish_and_clear();
    calculated?;

    flow.enter_contact(&args.contact)?;
    let summary = flow.submit()?;
    info!(
        give = %summary.quote.give,
        get = %summary.quote.get,
        "Order submitted"
    );
    Ok(summary)
}

pub fn render(summary: &OrderSummary) -> String {
    let quote = &summary.quote;
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Order"), ui::header_cell("")]);
    table.add_row(ui::label_row(
        "Give",
        format!("{} {}", quote.give_amount, quote.give),
    ));
    table.add_row(ui::label_row(
        "Get",
        format!("{} {}", quote.get_amount, quote.get),
    ));
    table.add_row(ui::label_row(
        "Rate",
        format!("1 {} = {} {}", quote.give, quote.rate, quote.get),
    ));
    table.add_row(ui::label_row("From", summary.from_location.clone()));
    table.add_row(ui::label_row("To", summary.to_location.clone()));
    table.add_row(ui::label_row("Contact", summary.contact.clone()));
    if !quote.sources.is_empty() {
        table.add_row(ui::label_row("Sources", quote.sources.clone()));
    }

    format!(
        "\n{}\n{table}",
        ui::style_text("Order submitted", ui::StyleType::Title)
    )
}
