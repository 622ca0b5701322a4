//! Swap quote calculation over cached prices

use dex_core::{normalize_symbol, PriceFeedError, PriceFeedResult, SwapQuote};

use crate::cache::PriceCache;

/// Compute a swap quote from the current cache contents.
///
/// Fails with `PriceUnavailable` if either symbol has never been priced,
/// `ZeroPrice` if the input token's price is zero (division guard), and
/// `InvalidAmount` for non-finite or negative amounts. A zero output-token
/// price quotes a zero output rather than erroring.
pub fn calculate_swap(
    cache: &PriceCache,
    token_in: &str,
    token_out: &str,
    amount_in: f64,
) -> PriceFeedResult<SwapQuote> {
    if !amount_in.is_finite() || amount_in < 0.0 {
        return Err(PriceFeedError::InvalidAmount(amount_in.to_string()));
    }

    let token_in = normalize_symbol(token_in);
    let token_out = normalize_symbol(token_out);

    let in_point = cache
        .get(&token_in)
        .ok_or_else(|| PriceFeedError::PriceUnavailable(token_in.clone()))?;
    let out_point = cache
        .get(&token_out)
        .ok_or_else(|| PriceFeedError::PriceUnavailable(token_out.clone()))?;

    if in_point.price_usd <= 0.0 {
        return Err(PriceFeedError::ZeroPrice(token_in));
    }

    Ok(SwapQuote::compute(
        amount_in,
        in_point.price_usd,
        out_point.price_usd,
    ))
}
