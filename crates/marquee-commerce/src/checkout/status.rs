//! Payment status page.

use crate::checkout::{CommerceApi, SessionStatus};
use crate::ids::CheckoutSessionId;
use crate::money::{Currency, Money};
use serde::Serialize;

/// What the status page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum StatusView {
    /// Payment went through.
    Paid {
        amount_display: String,
        customer_email: Option<String>,
    },
    /// The provider reports a failure.
    Failed { reason: String },
    /// The status could not be fetched.
    Unavailable { message: String },
    /// The page was opened without a session id.
    MissingSession,
}

/// Checks a session once when the page loads. There is no polling; the user
/// reloads to check again.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentStatusPage;

impl PaymentStatusPage {
    pub async fn check<A: CommerceApi + ?Sized>(
        api: &A,
        session_id: Option<&CheckoutSessionId>,
    ) -> StatusView {
        let Some(session_id) = session_id.filter(|id| !id.is_blank()) else {
            return StatusView::MissingSession;
        };

        match api.get_session_status(session_id).await {
            Ok(SessionStatus::Completed(details)) => {
                tracing::info!(session = %session_id, "payment completed");
                let amount_display = match Currency::from_code(&details.currency) {
                    Some(currency) => Money::new(details.amount_total_minor, currency).display(),
                    None => format!(
                        "{} {}",
                        details.amount_total_minor,
                        details.currency.to_ascii_uppercase()
                    ),
                };
                StatusView::Paid {
                    amount_display,
                    customer_email: details.customer_email,
                }
            }
            Ok(SessionStatus::Failed { reason }) => {
                tracing::info!(session = %session_id, reason = %reason, "payment failed");
                let reason = if reason.trim().is_empty() {
                    "The payment was not completed.".to_string()
                } else {
                    reason
                };
                StatusView::Failed { reason }
            }
            Err(e) => {
                tracing::warn!(session = %session_id, error = %e, "payment status unavailable");
                StatusView::Unavailable {
                    message: "We couldn't check your payment status right now. Please refresh \
                              the page to try again."
                        .to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{ApiError, CreateSessionRequest, PaymentDetails, RawSessionResponse};
    use async_trait::async_trait;
    use std::cell::Cell;

    struct StatusApi {
        status: Result<SessionStatus, ApiError>,
        calls: Cell<u32>,
    }

    #[async_trait(?Send)]
    impl CommerceApi for StatusApi {
        async fn is_payment_provider_configured(&self) -> Result<bool, ApiError> {
            Ok(true)
        }

        async fn create_checkout_session(
            &self,
            _request: &CreateSessionRequest,
        ) -> Result<RawSessionResponse, ApiError> {
            Err(ApiError::Transport("not used".to_string()))
        }

        async fn get_session_status(
            &self,
            _session_id: &CheckoutSessionId,
        ) -> Result<SessionStatus, ApiError> {
            self.calls.set(self.calls.get() + 1);
            self.status.clone()
        }
    }

    fn api(status: Result<SessionStatus, ApiError>) -> StatusApi {
        StatusApi {
            status,
            calls: Cell::new(0),
        }
    }

    #[tokio::test]
    async fn test_paid() {
        let api = api(Ok(SessionStatus::Completed(PaymentDetails {
            amount_total_minor: 2997,
            currency: "usd".to_string(),
            customer_email: Some("fan@example.com".to_string()),
        })));
        let view = PaymentStatusPage::check(&api, Some(&CheckoutSessionId::new("cs_1"))).await;
        assert_eq!(
            view,
            StatusView::Paid {
                amount_display: "$29.97".to_string(),
                customer_email: Some("fan@example.com".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_transport_error_checks_once() {
        let api = api(Err(ApiError::Transport("offline".to_string())));
        let view = PaymentStatusPage::check(&api, Some(&CheckoutSessionId::new("cs_1"))).await;
        assert!(matches!(view, StatusView::Unavailable { .. }));
        assert_eq!(api.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_missing_session_skips_api() {
        let api = api(Err(ApiError::Transport("unused".to_string())));
        assert_eq!(
            PaymentStatusPage::check(&api, None).await,
            StatusView::MissingSession
        );
        assert_eq!(
            PaymentStatusPage::check(&api, Some(&CheckoutSessionId::new(" "))).await,
            StatusView::MissingSession
        );
        assert_eq!(api.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_failed_with_blank_reason() {
        let api = api(Ok(SessionStatus::Failed {
            reason: String::new(),
        }));
        let view = PaymentStatusPage::check(&api, Some(&CheckoutSessionId::new("cs_1"))).await;
        assert_eq!(
            view,
            StatusView::Failed {
                reason: "The payment was not completed.".to_string()
            }
        );
    }
}
