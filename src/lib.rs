//! Rust client for the [Blink Debit](https://blinkpay.co.nz) APIs, to accept payments
//! from New Zealand bank accounts.
//!
//! Check out also the official Blink Debit [API documentation](https://blinkpay.co.nz/docs).
//!
//! # Usage
//!
//! ## Initialize a new `BlinkDebitClient`
//!
//! Create a new [`BlinkDebitClient`](crate::client::BlinkDebitClient) and provide the client ID
//! and client secret you got from Blink.
//!
//! ```rust,no_run
//! # use blink_debit_rust::{BlinkDebitClient, Environment, Error, apis::auth::*};
//! # fn main() -> Result<(), Error> {
//! let client = BlinkDebitClient::builder(Credentials::ClientCredentials {
//!     client_id: "some-client-id".into(),
//!     client_secret: "some-client-secret".into(),
//! })
//! .with_environment(Environment::Sandbox)
//! .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! By default, a `BlinkDebitClient` connects to the production environment.
//! It can also be built from a [`BlinkDebitConfig`](crate::client::BlinkDebitConfig),
//! e.g. loaded from a file or from environment variables.
//!
//! Access tokens are obtained with the configured credentials on the first request
//! and renewed automatically 5 minutes before they expire.
//!
//! ## Create a quick payment and wait for the customer
//!
//! ```rust,no_run
//! # use blink_debit_rust::{BlinkDebitClient, Error, apis::consents::*};
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! # let client: BlinkDebitClient = unreachable!();
//! #
//! let request = SingleConsentRequestBuilder::default()
//!     .flow(AuthFlow::from(AuthFlowDetail::Gateway {
//!         redirect_uri: "https://www.example.com/return".to_string(),
//!         flow_hint: None,
//!     }))
//!     .pcr(
//!         PcrBuilder::default()
//!             .particulars("particulars")
//!             .reference("reference")
//!             .build()
//!             .unwrap(),
//!     )
//!     .amount(Amount::nzd("25.50"))
//!     .build()
//!     .unwrap();
//! let res = client.quick_payments.create(&request).await?;
//!
//! // Send the customer to `res.redirect_uri`, then wait up to 5 minutes for them
//! // to authorise the payment. The quick payment is revoked if they don't.
//! let quick_payment = client
//!     .await_successful_quick_payment(res.quick_payment_id, 300)
//!     .await?;
//!
//! println!("Quick payment {} is {:?}", quick_payment.quick_payment_id, quick_payment.consent.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Handle the outcome of a wait
//!
//! ```rust,no_run
//! # use blink_debit_rust::{BlinkDebitClient, Error};
//! # use uuid::Uuid;
//! #
//! # #[tokio::main]
//! # async fn main() {
//! # let client: BlinkDebitClient = unreachable!();
//! # let payment_id = Uuid::new_v4();
//! match client.await_successful_payment(payment_id, 60).await {
//!     Ok(payment) => println!("Payment settled: {:?}", payment.status),
//!     Err(Error::Rejected(e)) => println!("Payment failed: {}", e),
//!     Err(Error::Timeout(e)) => println!("{}, try again later", e),
//!     Err(e) => println!("Something went wrong: {}", e),
//! }
//! # }
//! ```
//!
//! ## More examples
//!
//! Look into the [`demos`](../demos) for more example usages of this library.
//!
//! To run an example, use `cargo run` like this:
//!
//! ```shell
//! cargo run --example await_quick_payment
//! ```

#![deny(missing_debug_implementations)]
#![forbid(unsafe_code)]

pub mod apis;
pub(crate) mod authenticator;
pub mod client;
mod common;
pub mod error;
mod middlewares;
mod orchestration;
pub mod pollable;

pub use client::{BlinkDebitClient, BlinkDebitConfig, Environment};
pub use error::Error;
pub use pollable::{Classification, Classify, PollOptions};
