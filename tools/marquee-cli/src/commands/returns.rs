//! Resume on a payment return page.

use anyhow::{bail, Result};
use marquee_commerce::checkout::{FailurePage, ReturnRoute, SuccessPage};
use marquee_commerce::ids::CheckoutSessionId;

use super::{ReturnArgs, ReturnCommand};
use crate::context::Context;

/// Run the return command.
pub async fn run(args: ReturnArgs, ctx: &Context) -> Result<()> {
    let (route, session_id) = match args.command {
        ReturnCommand::Success { session_id } => (
            ReturnRoute::Success,
            session_id
                .map(CheckoutSessionId::new)
                .filter(|id| !id.is_blank()),
        ),
        ReturnCommand::Failure => (ReturnRoute::Failure, None),
        ReturnCommand::Url { url } => match ReturnRoute::from_url(&url, &ctx.config.checkout) {
            Some(visit) => (visit.route, visit.session_id),
            None => bail!("{} is not a payment return URL", url),
        },
    };

    let mut cart = ctx.open_cart()?;
    match route {
        ReturnRoute::Success => {
            let confirmation = SuccessPage::resume(&mut cart, session_id);
            if ctx.output.is_json() {
                ctx.output.json(&confirmation);
                return Ok(());
            }
            ctx.output.header("Payment successful");
            ctx.output.success(&confirmation.message);
            if let Some(id) = &confirmation.session_id {
                ctx.output.kv("Session", id.as_str());
                ctx.output
                    .info(&format!("Run `marquee status {}` for payment details.", id));
            }
        }
        ReturnRoute::Failure => {
            let guidance = FailurePage::resume(&cart);
            if ctx.output.is_json() {
                ctx.output.json(&guidance);
                return Ok(());
            }
            ctx.output.header("Payment not completed");
            ctx.output.warn(&guidance.message);
            if guidance.item_count > 0 {
                ctx.output.info("Run `marquee checkout` to try again.");
            }
        }
    }
    Ok(())
}
