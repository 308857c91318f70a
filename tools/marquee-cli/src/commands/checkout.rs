//! Check out the cart.

use anyhow::{anyhow, Result};
use marquee_commerce::checkout::{
    CallerRole, CheckoutError, CheckoutOrchestrator, CheckoutSession,
};

use super::CheckoutArgs;
use crate::context::Context;
use crate::navigator::TerminalNavigator;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let api = ctx.commerce_api()?;
    let navigator = TerminalNavigator::new(ctx.output.clone());
    let mut orchestrator =
        CheckoutOrchestrator::new(api, navigator, ctx.config.checkout.clone());

    let total = cart.pricing().display_total(ctx.config.checkout.currency);
    ctx.output.info(&format!(
        "Checking out {} items ({})",
        cart.get_cart_item_count(),
        total
    ));

    let spinner = ctx.output.spinner("Creating checkout session...");
    let result = orchestrator.checkout(&cart, role(args.admin)).await;
    spinner.finish_and_clear();

    report(result, ctx)
}

pub(crate) fn role(admin: bool) -> CallerRole {
    if admin {
        CallerRole::Admin
    } else {
        CallerRole::User
    }
}

/// Print the outcome of an attempt.
pub(crate) fn report(result: Result<CheckoutSession, CheckoutError>, ctx: &Context) -> Result<()> {
    match result {
        Ok(session) => {
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "sessionId": session.session_id,
                    "url": session.redirect_url,
                }));
            } else {
                let urls = ctx.return_urls();
                ctx.output.debug(&format!("Success return: {}", urls.success));
                ctx.output.debug(&format!("Failure return: {}", urls.failure));
                ctx.output.info(
                    "After paying, run `marquee return success` (or `marquee return failure` if you cancel).",
                );
            }
            Ok(())
        }
        Err(e) => Err(anyhow!(e.user_message())),
    }
}
