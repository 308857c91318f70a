//! Hand-off to the payment provider from a terminal.

use marquee_commerce::checkout::Navigator;

use crate::output::Output;

/// Prints the provider URL instead of navigating a browser.
pub struct TerminalNavigator {
    output: Output,
}

impl TerminalNavigator {
    pub fn new(output: Output) -> Self {
        Self { output }
    }
}

impl Navigator for TerminalNavigator {
    fn redirect(&self, url: &str) {
        self.output.success("Checkout session created");
        self.output.info("Complete your payment at:");
        self.output.list_item(url);
    }
}
