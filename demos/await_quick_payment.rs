use anyhow::Context;
use blink_debit_rust::{
    apis::consents::{Amount, AuthFlowDetail, PcrBuilder, SingleConsentRequestBuilder},
    BlinkDebitClient, BlinkDebitConfig, Error,
};

#[derive(serde::Deserialize, Debug)]
struct Config {
    #[serde(flatten)]
    blink: BlinkDebitConfig,
    redirect_uri: String,
    #[serde(default = "default_max_wait_seconds")]
    max_wait_seconds: u32,
}

fn default_max_wait_seconds() -> u32 {
    300
}

impl Config {
    /// Reads `config.{toml,json,yaml}` if present, overridden by `BLINKPAY_*` environment variables
    /// (e.g. `BLINKPAY_CLIENT_SECRET`).
    fn read() -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("BLINKPAY"))
            .build()?
            .try_deserialize()
            .context("Failed to assemble the required configuration")
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::read()?;

    // Setup Blink Debit client
    let client = BlinkDebitClient::from_config(&config.blink)?;

    // Create a new quick payment through the Blink gateway
    let res = client
        .quick_payments
        .create(
            &SingleConsentRequestBuilder::default()
                .flow(
                    AuthFlowDetail::Gateway {
                        redirect_uri: config.redirect_uri.clone(),
                        flow_hint: None,
                    }
                    .into(),
                )
                .pcr(
                    PcrBuilder::default()
                        .particulars("demo")
                        .reference("quick payment")
                        .build()?,
                )
                .amount(Amount::nzd("1.25"))
                .build()?,
        )
        .await?;

    tracing::info!("Created new quick payment: {}", res.quick_payment_id);
    tracing::info!(
        "Authorise it at: {}",
        res.redirect_uri.as_deref().unwrap_or("<decoupled flow>")
    );

    tracing::info!("Begin waiting...");

    match client
        .await_successful_quick_payment(res.quick_payment_id, config.max_wait_seconds)
        .await
    {
        Ok(quick_payment) => tracing::info!("{:#?}", quick_payment),
        Err(Error::Rejected(e)) => tracing::warn!("{}", e),
        Err(Error::Timeout(e)) => tracing::warn!("{}, the quick payment has been revoked", e),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Setting default subscriber failed");

    if let Err(e) = run().await {
        tracing::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}
