use super::ui;
use crate::core::flow::FlowError;
use crate::core::quote::parse_amount;
use crate::core::{AmountMode, CurrencyCode, Quote, RateResolver};
use anyhow::{Result, anyhow};

pub async fn run(
    resolver: &dyn RateResolver,
    give: CurrencyCode,
    get: CurrencyCode,
    amount: &str,
    mode: AmountMode,
    json: bool,
) -> Result<()> {
    if give == get {
        return Err(FlowError::SameCurrency.into());
    }
    let amount = parse_amount(amount).ok_or_else(|| anyhow!("Could not parse amount: {:?}", amount))?;

    let pb = ui::new_spinner("Fetching exchange rates...");
    let result = resolver.resolve(give, get).await;
    pb.finish_and_clear();
    let quote = Quote::new(give, get, mode, amount, &result?);

    if json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        println!("{}", render(&quote));
    }
    Ok(())
}

pub fn render(quote: &Quote) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Give"), ui::header_cell("Get")]);
    table.add_row(vec![
        ui::number_cell(format!("{} {}", quote.give_amount, quote.give)),
        ui::number_cell(format!("{} {}", quote.get_amount, quote.get)),
    ]);

    let mut out = format!("\n{table}\n");
    out.push_str(&format!(
        "{} 1 {} = {} {}\n",
        ui::style_text("Rate:", ui::StyleType::Label),
        quote.give,
        quote.rate,
        quote.get
    ));
    if !quote.sources.is_empty() {
        out.push_str(&format!(
            "{} {}\n",
            ui::style_text("Sources:", ui::StyleType::Label),
            quote.sources
        ));
    }
    out.push_str(&ui::style_text(
        &format!("As of {}", quote.as_of.format("%Y-%m-%d %H:%M:%S UTC")),
        ui::StyleType::Subtle,
    ));
    out
}
