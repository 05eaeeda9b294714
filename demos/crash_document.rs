//! Builds the crash document for a failed checkout and prints it as JSON.
//!
//! Run with `cargo run --example crash_document`.

use squash_backtrace::{ErrorDocument, Exception, Introspector, config::IntrospectorConfig};

#[derive(Debug, thiserror::Error)]
#[error("gateway returned status {status}")]
struct GatewayError {
    status: u16,
}

fn charge_card(order_id: u64) -> Result<(), Exception> {
    let gateway = GatewayError { status: 502 };
    Err(Exception::new("checkout::ChargeFailed", "unable to charge card")
        .with_field("order_id", order_id)
        .with_field("amount_cents", 1999)
        .with_hidden_field("card_number")
        .with_cause(Exception::from_error(&gateway)))
}

fn main() {
    let introspector = Introspector::new(IntrospectorConfig {
        max_cause_depth: 8,
        ..IntrospectorConfig::DEFAULT
    });

    if let Err(error) = charge_card(1042) {
        let document = ErrorDocument::from_error_with(&introspector, &error);
        match serde_json::to_string_pretty(&document) {
            Ok(json) => println!("{json}"),
            Err(error) => eprintln!("failed to encode crash document: {error}"),
        }
    }
}
