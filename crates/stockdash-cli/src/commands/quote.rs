use stockdash_core::{DataAccess, DataError, Ticker};

use crate::cli::QuoteArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &QuoteArgs, access: &DataAccess) -> Result<CommandResult, CliError> {
    let ticker = Ticker::parse(&args.ticker).map_err(DataError::InvalidTicker)?;
    let quote = access.get_quote(&ticker).await;

    let data = serde_json::to_value(&quote)?;
    let result = CommandResult::ok(data);
    if quote.price.is_none() {
        return Ok(result.with_notice(format!("last price for {ticker} is unavailable")));
    }
    Ok(result)
}
