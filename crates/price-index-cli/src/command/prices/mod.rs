use clap::Args;
use tracing::info;

use crate::command::display::{display_table, token_label};
use crate::command::load_oracle;
use crate::core::Error;

#[derive(Args, Clone)]
pub struct PricesCommandParameters {
    #[clap(long)]
    pub profile: String,

    #[clap(long)]
    pub rpc_url: Option<String>,
}

pub async fn command_prices(params: PricesCommandParameters) -> Result<(), Error> {
    info!("💱 Fetching prices for profile: {}", params.profile);

    let (configuration, oracle) = load_oracle(&params.profile, params.rpc_url).await?;
    let chain_id = configuration.chain_id();

    let base = token_label(chain_id, &oracle.base_token());
    info!("Pricing against {} with fee tier {}", base, oracle.fee());

    let prices = oracle.get_all_prices().await?;

    let rows: Vec<Vec<String>> = prices
        .iter()
        .map(|quote| {
            vec![
                token_label(chain_id, &quote.asset),
                quote.decimals.to_string(),
                quote.as_decimal().normalized().to_string(),
            ]
        })
        .collect();

    let price_title = format!("Price ({})", base);
    display_table(&[("Token", 14), ("Decimals", 8), (price_title.as_str(), 30)], &rows);

    Ok(())
}
