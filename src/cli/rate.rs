use super::ui;
use crate::core::{CurrencyCode, RateResolver, RateResult};
use anyhow::Result;
use comfy_table::Cell;
use serde::Serialize;

#[derive(Serialize)]
struct RateReport<'a> {
    from: CurrencyCode,
    to: CurrencyCode,
    #[serde(flatten)]
    result: &'a RateResult,
}

pub async fn run(
    resolver: &dyn RateResolver,
    from: CurrencyCode,
    to: CurrencyCode,
    json: bool,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let result = resolver.resolve(from, to).await;
    pb.finish_and_clear();
    let result = result?;

    if json {
        println!("{}", render_json(from, to, &result)?);
    } else {
        println!("{}", render(from, to, &result));
    }
    Ok(())
}

pub fn render_json(from: CurrencyCode, to: CurrencyCode, result: &RateResult) -> Result<String> {
    let report = RateReport { from, to, result };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn render(from: CurrencyCode, to: CurrencyCode, result: &RateResult) -> String {
    let headline = format!("1 {} = {:.4} {}", from, result.rate, to);
    let mut out = format!("\n{}\n", ui::style_text(&headline, ui::StyleType::Value));

    if result.path.is_empty() {
        out.push_str(&ui::style_text(
            "Same currency, no conversion needed",
            ui::StyleType::Subtle,
        ));
        return out;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Source"),
    ]);
    for (i, hop) in result.path.iter().enumerate() {
        table.add_row(vec![
            ui::number_cell((i + 1).to_string()),
            Cell::new(hop.from),
            Cell::new(hop.to),
            Cell::new(&hop.source),
        ]);
    }
    out.push_str(&format!("{table}\n"));
    out.push_str(&ui::style_text(
        &format!("As of {}", result.as_of.format("%Y-%m-%d %H:%M:%S UTC")),
        ui::StyleType::Subtle,
    ));
    out
}
