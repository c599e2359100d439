use clap::Args;

use crate::command::display::{display_table, full_address, token_label};
use crate::command::load_oracle;
use crate::core::Error;

#[derive(Args, Clone)]
pub struct AssetsCommandParameters {
    #[clap(long)]
    pub profile: String,
}

pub async fn command_assets(params: AssetsCommandParameters) -> Result<(), Error> {
    let (configuration, oracle) = load_oracle(&params.profile, None).await?;
    let chain_id = configuration.chain_id();

    let rows: Vec<Vec<String>> = oracle
        .get_assets()
        .await
        .iter()
        .enumerate()
        .map(|(i, asset)| vec![i.to_string(), token_label(chain_id, asset), full_address(asset)])
        .collect();

    display_table(&[("#", 3), ("Token", 14), ("Address", 42)], &rows);

    Ok(())
}
