//! Buy one item straight away, leaving the cart alone.

use anyhow::Result;
use marquee_commerce::cart::NewCartItem;
use marquee_commerce::checkout::CheckoutOrchestrator;

use super::checkout::{report, role};
use super::BuyArgs;
use crate::context::Context;
use crate::navigator::TerminalNavigator;

/// Run the buy command.
pub async fn run(args: BuyArgs, ctx: &Context) -> Result<()> {
    let mut entry =
        NewCartItem::new(args.kind, args.id.as_str(), args.name.as_str(), args.price)?;
    if let Some(description) = args.description {
        entry = entry.with_description(description);
    }
    let mut line = entry.into_line_item();
    line.quantity = args.quantity;

    let api = ctx.commerce_api()?;
    let navigator = TerminalNavigator::new(ctx.output.clone());
    let mut orchestrator =
        CheckoutOrchestrator::new(api, navigator, ctx.config.checkout.clone());

    ctx.output.info(&format!(
        "Buying {} x {} ({})",
        line.quantity,
        line.display_name,
        ctx.config.checkout.currency.format_major(line.subtotal())
    ));

    let spinner = ctx.output.spinner("Creating checkout session...");
    let result = orchestrator
        .checkout_direct(vec![line], role(args.admin))
        .await;
    spinner.finish_and_clear();

    report(result, ctx)
}
