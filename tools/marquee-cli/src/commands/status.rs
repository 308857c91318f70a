//! Check a payment session.

use anyhow::{bail, Result};
use marquee_commerce::checkout::{PaymentStatusPage, StatusView};
use marquee_commerce::ids::CheckoutSessionId;

use super::StatusArgs;
use crate::context::Context;
use crate::output::status_badge;

/// Run the status command.
pub async fn run(args: StatusArgs, ctx: &Context) -> Result<()> {
    let api = ctx.commerce_api()?;
    let session_id = CheckoutSessionId::new(args.session_id);

    let spinner = ctx.output.spinner("Checking payment status...");
    let view = PaymentStatusPage::check(&api, Some(&session_id)).await;
    spinner.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&view);
        return Ok(());
    }

    ctx.output.header("Payment status");
    ctx.output.kv("Session", session_id.as_str());
    match view {
        StatusView::Paid {
            amount_display,
            customer_email,
        } => {
            ctx.output.kv("Status", &status_badge("paid"));
            ctx.output.kv("Amount", &amount_display);
            if let Some(email) = customer_email {
                ctx.output.kv("Receipt sent to", &email);
            }
        }
        StatusView::Failed { reason } => {
            ctx.output.kv("Status", &status_badge("failed"));
            ctx.output.kv("Reason", &reason);
        }
        StatusView::Unavailable { message } => {
            ctx.output.kv("Status", &status_badge("unavailable"));
            ctx.output.warn(&message);
        }
        StatusView::MissingSession => bail!("A session ID is required"),
    }
    Ok(())
}
