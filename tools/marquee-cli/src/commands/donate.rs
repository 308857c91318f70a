//! Donate to an artist.

use anyhow::Result;
use marquee_commerce::checkout::{CheckoutOrchestrator, DonationRequest};
use marquee_commerce::ids::ArtistId;

use super::checkout::{report, role};
use super::DonateArgs;
use crate::context::Context;
use crate::navigator::TerminalNavigator;

/// Run the donate command.
pub async fn run(args: DonateArgs, ctx: &Context) -> Result<()> {
    let api = ctx.commerce_api()?;
    let navigator = TerminalNavigator::new(ctx.output.clone());
    let mut orchestrator =
        CheckoutOrchestrator::new(api, navigator, ctx.config.checkout.clone());

    let donation = DonationRequest {
        artist_id: ArtistId::new(args.artist_id),
        artist_name: args.artist_name,
        amount: args.amount,
        message: args.message,
    };
    ctx.output.info(&format!(
        "Donating {} to {}",
        ctx.config.checkout.currency.format_major(donation.amount),
        donation.artist_name
    ));

    let spinner = ctx.output.spinner("Creating checkout session...");
    let result = orchestrator.donate(&donation, role(args.admin)).await;
    spinner.finish_and_clear();

    report(result, ctx)
}
