//! Checkout orchestration state machine.
//!
//! One attempt runs `Idle -> Validating -> Submitting -> Redirecting`. Any
//! error moves to `Failed`, records the error, and drops back to `Idle` so the
//! user can retry with the cart untouched.

use crate::cart::{CartLineItem, CartRepository, CartStore};
use crate::checkout::{
    map_cart_items, validate_line_items, CheckoutError, CheckoutSession, CheckoutSettings,
    CommerceApi, CreateSessionRequest, DonationRequest,
};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Hands control to the payment provider.
///
/// In a browser this is a full-page navigation; the orchestrator never hears
/// back from it.
pub trait Navigator {
    fn redirect(&self, url: &str);
}

/// Who is checking out. Only changes error wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallerRole {
    Admin,
    #[default]
    User,
}

impl CallerRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, CallerRole::Admin)
    }
}

/// Phases of a checkout attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Redirecting,
    Failed,
}

impl CheckoutPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutPhase::Idle => "idle",
            CheckoutPhase::Validating => "validating",
            CheckoutPhase::Submitting => "submitting",
            CheckoutPhase::Redirecting => "redirecting",
            CheckoutPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A read-only view of an orchestrator's phase.
///
/// The orchestrator is borrowed mutably for the whole attempt, including
/// while it awaits the API. A handle taken beforehand stays readable, so a UI
/// can disable its checkout control while [`is_busy`](Self::is_busy).
#[derive(Debug, Clone, Default)]
pub struct PhaseHandle(Rc<Cell<CheckoutPhase>>);

impl PhaseHandle {
    pub fn get(&self) -> CheckoutPhase {
        self.0.get()
    }

    /// Whether an attempt is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.get(),
            CheckoutPhase::Validating | CheckoutPhase::Submitting
        )
    }

    fn set(&self, phase: CheckoutPhase) {
        self.0.set(phase);
    }
}

/// What is being bought.
#[derive(Debug, Clone)]
pub enum CheckoutSource<'a> {
    /// The cart contents.
    Cart(&'a [CartLineItem]),
    /// Items bought directly, bypassing the cart (e.g. "buy this track").
    Direct(Vec<CartLineItem>),
    /// A donation to an artist.
    Donation(&'a DonationRequest),
}

impl CheckoutSource<'_> {
    fn is_empty(&self) -> bool {
        match self {
            CheckoutSource::Cart(items) => items.is_empty(),
            CheckoutSource::Direct(items) => items.is_empty(),
            CheckoutSource::Donation(_) => false,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CheckoutSource::Cart(_) => "cart",
            CheckoutSource::Direct(_) => "direct",
            CheckoutSource::Donation(_) => "donation",
        }
    }
}

/// Turns a cart into a payment session and hands off to the provider.
///
/// Methods take `&mut self`, so one orchestrator can run only one attempt at
/// a time. Use [`phase_handle`](Self::phase_handle) to watch an attempt from
/// outside.
#[derive(Debug)]
pub struct CheckoutOrchestrator<A, N> {
    api: A,
    navigator: N,
    settings: CheckoutSettings,
    phase: PhaseHandle,
    history: Vec<CheckoutPhase>,
    last_error: Option<CheckoutError>,
}

impl<A: CommerceApi, N: Navigator> CheckoutOrchestrator<A, N> {
    pub fn new(api: A, navigator: N, settings: CheckoutSettings) -> Self {
        Self {
            api,
            navigator,
            settings,
            phase: PhaseHandle::default(),
            history: Vec::new(),
            last_error: None,
        }
    }

    /// Check out the cart. The cart itself is never modified here.
    pub async fn checkout<R: CartRepository>(
        &mut self,
        cart: &CartStore<R>,
        role: CallerRole,
    ) -> Result<CheckoutSession, CheckoutError> {
        self.run(CheckoutSource::Cart(cart.items()), role).await
    }

    /// Check out items that are not in the cart, mapped the same way cart
    /// lines are. The cart is left alone.
    pub async fn checkout_direct(
        &mut self,
        items: Vec<CartLineItem>,
        role: CallerRole,
    ) -> Result<CheckoutSession, CheckoutError> {
        self.run(CheckoutSource::Direct(items), role).await
    }

    /// Check out a donation.
    pub async fn donate(
        &mut self,
        donation: &DonationRequest,
        role: CallerRole,
    ) -> Result<CheckoutSession, CheckoutError> {
        self.run(CheckoutSource::Donation(donation), role).await
    }

    /// Run one attempt.
    pub async fn run(
        &mut self,
        source: CheckoutSource<'_>,
        role: CallerRole,
    ) -> Result<CheckoutSession, CheckoutError> {
        self.history.clear();
        self.last_error = None;
        let label = source.label();
        self.enter(CheckoutPhase::Validating);

        match self.attempt(source, role).await {
            Ok(session) => Ok(session),
            Err(e) => {
                tracing::warn!(
                    source = label,
                    error = %e,
                    class = ?e.class(),
                    message = %e.user_message(),
                    "checkout failed"
                );
                self.enter(CheckoutPhase::Failed);
                self.last_error = Some(e.clone());
                self.enter(CheckoutPhase::Idle);
                Err(e)
            }
        }
    }

    async fn attempt(
        &mut self,
        source: CheckoutSource<'_>,
        role: CallerRole,
    ) -> Result<CheckoutSession, CheckoutError> {
        if source.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let configured = self
            .api
            .is_payment_provider_configured()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "payment configuration check failed");
                CheckoutError::SessionCreationFailed(e.message().to_string())
            })?;
        if !configured {
            return Err(CheckoutError::ProviderNotConfigured {
                is_admin: role.is_admin(),
            });
        }

        let currency = self.settings.currency;
        let rounding = self.settings.rounding;
        let items = match source {
            CheckoutSource::Cart(items) => map_cart_items(items, currency, rounding)?,
            CheckoutSource::Direct(items) => map_cart_items(&items, currency, rounding)?,
            CheckoutSource::Donation(donation) => {
                vec![donation.to_line_item(currency, rounding)?]
            }
        };
        validate_line_items(&items)?;

        let urls = self.settings.return_urls();
        let request = CreateSessionRequest {
            items,
            success_url: urls.success,
            cancel_url: urls.failure,
        };

        self.enter(CheckoutPhase::Submitting);
        let raw = self
            .api
            .create_checkout_session(&request)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "checkout session request failed");
                CheckoutError::from(e)
            })?;
        let session = raw.into_session()?;

        self.enter(CheckoutPhase::Redirecting);
        tracing::info!(
            session = ?session.session_id.as_ref().map(|id| id.as_str()),
            url = %session.redirect_url,
            "redirecting to payment provider"
        );
        self.navigator.redirect(&session.redirect_url);
        Ok(session)
    }

    fn enter(&mut self, phase: CheckoutPhase) {
        tracing::debug!(from = %self.phase.get(), to = %phase, "checkout transition");
        self.phase.set(phase);
        self.history.push(phase);
    }

    /// Current phase.
    pub fn state(&self) -> CheckoutPhase {
        self.phase.get()
    }

    /// A handle that tracks the phase across attempts.
    pub fn phase_handle(&self) -> PhaseHandle {
        self.phase.clone()
    }

    /// Phases entered during the last attempt.
    pub fn history(&self) -> &[CheckoutPhase] {
        &self.history
    }

    /// Error from the last attempt, if it failed.
    pub fn last_error(&self) -> Option<&CheckoutError> {
        self.last_error.as_ref()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }
}
