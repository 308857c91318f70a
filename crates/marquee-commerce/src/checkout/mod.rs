//! Checkout module.
//!
//! Maps cart contents to payment-provider line items, talks to the remote
//! commerce API, runs the checkout state machine, and handles the pages the
//! provider redirects back to.

mod api;
mod error;
mod flow;
mod http_api;
mod line_item;
mod returns;
mod settings;
mod status;

pub use api::{
    ApiError, CheckoutSession, CommerceApi, CreateSessionRequest, PaymentDetails,
    RawSessionResponse, SessionStatus,
};
pub use error::{CheckoutError, ErrorClass};
pub use flow::{
    CallerRole, CheckoutOrchestrator, CheckoutPhase, CheckoutSource, Navigator, PhaseHandle,
};
pub use http_api::{ApiEndpoints, HttpCommerceApi};
pub use line_item::{
    map_cart_items, submitted_total, validate_line_items, CheckoutLineItem, DonationRequest,
};
pub use returns::{
    parse_session_id, Confirmation, FailurePage, PurchaseSummary, RetryGuidance, ReturnRoute,
    ReturnVisit, SuccessPage,
};
pub use settings::{
    CheckoutSettings, ReturnUrls, DEFAULT_FAILURE_PATH, DEFAULT_SUCCESS_PATH,
    SESSION_ID_PARAM, SESSION_ID_PLACEHOLDER,
};
pub use status::{PaymentStatusPage, StatusView};
