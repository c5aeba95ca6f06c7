//! OC Rates Widget CLI

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oc_rates_widget::{ConverterWidget, RatesServiceClient};

/// Currency converter backed by an OC Rates server
#[derive(Parser, Debug)]
#[command(name = "oc-rates-widget")]
#[command(about = "Convert an amount using an OC Rates server")]
struct Args {
    /// Base URL of the rates service
    #[arg(long, env = "RATES_SERVICE_URL", default_value = "http://localhost:3000")]
    service_url: String,

    /// Currency to convert from
    #[arg(short, long, default_value = "EUR")]
    from: String,

    /// Currency to convert to
    #[arg(short, long, default_value = "USD")]
    to: String,

    /// Amount to convert
    #[arg(short, long, default_value = "0")]
    amount: String,

    /// Only list the available currencies, do not convert
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the rendered form stays clean on stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    info!(service_url = %args.service_url, "Starting converter widget");

    let mut widget = ConverterWidget::new(RatesServiceClient::new(args.service_url));
    widget.connect().await;

    if !args.from.eq_ignore_ascii_case(widget.from_currency().code()) {
        widget.set_from_currency(&args.from).await;
    }
    widget.set_to_currency(&args.to);
    widget.set_amount(&args.amount);

    if !args.list {
        widget.convert().await;
    }

    print!("{}", widget);

    if widget.has_error() {
        anyhow::bail!("Rates service request failed");
    }
    Ok(())
}
