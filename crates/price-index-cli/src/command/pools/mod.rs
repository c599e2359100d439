use clap::Args;
use tracing::info;

use crate::command::display::{display_table, full_address, token_label};
use crate::command::load_oracle;
use crate::core::Error;

#[derive(Args, Clone)]
pub struct PoolsCommandParameters {
    #[clap(long)]
    pub profile: String,
}

pub async fn command_pools(params: PoolsCommandParameters) -> Result<(), Error> {
    let (configuration, oracle) = load_oracle(&params.profile, None).await?;
    let chain_id = configuration.chain_id();

    info!(
        "Pools against {} with fee tier {}",
        token_label(chain_id, &oracle.base_token()),
        oracle.fee()
    );

    let rows: Vec<Vec<String>> = oracle
        .get_assets()
        .await
        .iter()
        .map(|asset| {
            let pool = oracle.pool_of(*asset).map(|x| full_address(&x)).unwrap_or("-".to_string());

            vec![token_label(chain_id, asset), pool]
        })
        .collect();

    display_table(&[("Token", 14), ("Pool", 42)], &rows);

    Ok(())
}
