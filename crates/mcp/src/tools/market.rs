// Market Data API tools: quotes, instruments, hours, movers, options and
// price history.

use super::registry::{
    json_schema_array, json_schema_boolean, json_schema_enum, json_schema_integer,
    json_schema_number, json_schema_object, json_schema_string, ToolSpec,
};
use crate::error::ToolError;
use schwab_core::{slim_option_chain, ToolName};
use schwab_sdk::api::{
    normalize_market_date, GetInstrumentByCusipParams, GetMarketHoursByMarketIdParams,
    GetMarketHoursParams, GetMoversParams, GetOptionChainParams, GetOptionExpirationChainParams,
    GetPriceHistoryParams, GetQuoteBySymbolIdParams, GetQuotesParams, SearchInstrumentsParams,
};
use schwab_sdk::types::{
    ChainStrategy, ContractType, Entitlement, ExpirationMonth, FrequencyType, Market,
    MoversIndex, MoversSort, PeriodType, Projection, StrikeRange,
};
use schwab_sdk::SchwabClient;
use serde_json::{json, Value};
use tracing::{error, info};

pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new(
            ToolName::GetQuotes,
            "Get quotes for a list of symbols",
            json_schema_object(
                json!({
                    "symbols": json_schema_string("Comma-separated symbols, e.g. AAPL,MSFT"),
                    "fields": json_schema_string("Comma-separated subset of quote,fundamental,extended,reference,regular"),
                    "indicative": json_schema_boolean("Include indicative symbol quotes for ETFs"),
                }),
                vec!["symbols"],
            ),
            get_quotes,
        ),
        ToolSpec::new(
            ToolName::GetQuoteBySymbolId,
            "Get quote for a one symbol",
            json_schema_object(
                json!({
                    "symbol_id": json_schema_string("Symbol"),
                    "fields": json_schema_string("Comma-separated subset of quote,fundamental,extended,reference,regular"),
                }),
                vec!["symbol_id"],
            ),
            get_quote_by_symbol_id,
        ),
        ToolSpec::new(
            ToolName::SearchInstruments,
            "Search for instruments by symbols and projections",
            json_schema_object(
                json!({
                    "symbol": json_schema_string("Symbol or search text"),
                    "projection": json_schema_enum(Projection::VARIANTS, "Search mode"),
                }),
                vec!["symbol", "projection"],
            ),
            search_instruments,
        ),
        ToolSpec::new(
            ToolName::GetInstrumentByCusip,
            "Get instrument by cusip",
            json_schema_object(
                json!({ "cusip_id": json_schema_string("CUSIP") }),
                vec!["cusip_id"],
            ),
            get_instrument_by_cusip,
        ),
        ToolSpec::new(
            ToolName::GetMarketHours,
            "Get market hours for different markets",
            json_schema_object(
                json!({
                    "markets": json_schema_array(
                        json_schema_enum(Market::VARIANTS, "Market"),
                        "Markets to look up",
                    ),
                    "date": json_schema_string("Date or date-time; defaults to today"),
                }),
                vec!["markets"],
            ),
            get_market_hours,
        ),
        ToolSpec::new(
            ToolName::GetMarketHoursByMarketId,
            "Get market hours for a specific market",
            json_schema_object(
                json!({
                    "market_id": json_schema_enum(Market::VARIANTS, "Market"),
                    "date": json_schema_string("YYYY-MM-DD; defaults to today"),
                }),
                vec!["market_id"],
            ),
            get_market_hours_by_market_id,
        ),
        ToolSpec::new(
            ToolName::GetMovers,
            "Get movers for a specific index",
            json_schema_object(
                json!({
                    "symbol_id": json_schema_enum(MoversIndex::VARIANTS, "Index"),
                    "sort": json_schema_enum(MoversSort::VARIANTS, "Sort order"),
                    "frequency": json_schema_integer("Minimum percent change: 0, 1, 5, 10, 30 or 60"),
                }),
                vec!["symbol_id"],
            ),
            get_movers,
        ),
        ToolSpec::new(
            ToolName::GetOptionChain,
            "Get option chain for an optionable symbol. Use strikeCount, contractType, range, \
             fromDate/toDate, and daysToExpiration to narrow results. Response is trimmed to \
             essential trading fields.",
            json_schema_object(option_chain_properties(), vec!["symbol"]),
            get_option_chain,
        ),
        ToolSpec::new(
            ToolName::GetOptionExpirationChain,
            "Get option expiration chain for an optionable symbol",
            json_schema_object(
                json!({ "symbol": json_schema_string("Underlying symbol") }),
                vec!["symbol"],
            ),
            get_option_expiration_chain,
        ),
        ToolSpec::new(
            ToolName::GetPriceHistory,
            "Get price history for a specific symbol and date range",
            json_schema_object(
                json!({
                    "symbol": json_schema_string("Symbol"),
                    "periodType": json_schema_enum(PeriodType::VARIANTS, "Period unit"),
                    "period": json_schema_integer("Number of periods"),
                    "frequencyType": json_schema_enum(FrequencyType::VARIANTS, "Candle unit"),
                    "frequency": json_schema_integer("Candle size in frequencyType units"),
                    "startDate": json_schema_integer("Start, epoch milliseconds"),
                    "endDate": json_schema_integer("End, epoch milliseconds"),
                    "needExtendedHoursData": json_schema_boolean("Include extended hours candles"),
                    "needPreviousClose": json_schema_boolean("Include previous close"),
                }),
                vec!["symbol"],
            ),
            get_price_history,
        ),
    ]
}

fn option_chain_properties() -> Value {
    json!({
        "symbol": json_schema_string("Underlying symbol"),
        "contractType": json_schema_enum(ContractType::VARIANTS, "Calls, puts or both"),
        "strikeCount": json_schema_integer("Strikes above and below the at-the-money price"),
        "includeUnderlyingQuote": json_schema_boolean("Include the underlying quote"),
        "strategy": json_schema_enum(ChainStrategy::VARIANTS, "Chain strategy"),
        "interval": json_schema_number("Strike interval for spread strategies"),
        "strike": json_schema_number("Only this strike price"),
        "range": json_schema_enum(StrikeRange::VARIANTS, "Moneyness filter"),
        "fromDate": json_schema_string("Earliest expiration, yyyy-MM-dd"),
        "toDate": json_schema_string("Latest expiration, yyyy-MM-dd"),
        "volatility": json_schema_number("Volatility for ANALYTICAL calculations"),
        "underlyingPrice": json_schema_number("Underlying price for ANALYTICAL calculations"),
        "interestRate": json_schema_number("Interest rate for ANALYTICAL calculations"),
        "daysToExpiration": json_schema_integer("Days to expiration for ANALYTICAL calculations"),
        "expMonth": json_schema_enum(ExpirationMonth::VARIANTS, "Expiration month"),
        "optionType": json_schema_string("Option type"),
        "entitlement": json_schema_enum(Entitlement::VARIANTS, "Retail token entitlement"),
    })
}

async fn get_quotes(client: SchwabClient, params: GetQuotesParams) -> Result<Value, ToolError> {
    info!(tool = "getQuotes", symbols = %params.symbols, fields = ?params.fields, "Fetching quotes");
    Ok(client.market_data().quotes().get_quotes(&params).await?)
}

async fn get_quote_by_symbol_id(
    client: SchwabClient,
    params: GetQuoteBySymbolIdParams,
) -> Result<Value, ToolError> {
    info!(
        tool = "getQuoteBySymbolId",
        symbol_id = %params.symbol_id,
        fields = ?params.fields,
        "Fetching quote"
    );
    Ok(client.market_data().quotes().get_quote(&params).await?)
}

async fn search_instruments(
    client: SchwabClient,
    params: SearchInstrumentsParams,
) -> Result<Value, ToolError> {
    Ok(client.market_data().instruments().search(&params).await?)
}

async fn get_instrument_by_cusip(
    client: SchwabClient,
    params: GetInstrumentByCusipParams,
) -> Result<Value, ToolError> {
    Ok(client
        .market_data()
        .instruments()
        .get_by_cusip(&params.cusip_id)
        .await?)
}

async fn get_market_hours(
    client: SchwabClient,
    params: GetMarketHoursParams,
) -> Result<Value, ToolError> {
    let date = match params.date.as_deref() {
        Some(raw) => Some(normalize_market_date(raw).ok_or_else(|| {
            ToolError::validation(
                ToolName::GetMarketHours.as_str(),
                format!("invalid date `{raw}`"),
            )
        })?),
        None => None,
    };

    Ok(client
        .market_data()
        .market_hours()
        .get_market_hours(&params.markets_csv(), date.as_deref())
        .await?)
}

async fn get_market_hours_by_market_id(
    client: SchwabClient,
    params: GetMarketHoursByMarketIdParams,
) -> Result<Value, ToolError> {
    Ok(client
        .market_data()
        .market_hours()
        .get_market_hours_by_id(params.market_id, params.date.as_deref())
        .await?)
}

async fn get_movers(client: SchwabClient, params: GetMoversParams) -> Result<Value, ToolError> {
    Ok(client.market_data().movers().get_movers(&params).await?)
}

async fn get_option_chain(
    client: SchwabClient,
    params: GetOptionChainParams,
) -> Result<Value, ToolError> {
    info!(
        tool = "getOptionChain",
        symbol = %params.symbol,
        strike_count = ?params.strike_count,
        "Fetching option chain"
    );
    let chain = client
        .market_data()
        .options()
        .get_option_chain(&params)
        .await?;
    Ok(slim_option_chain(&chain))
}

async fn get_option_expiration_chain(
    client: SchwabClient,
    params: GetOptionExpirationChainParams,
) -> Result<Value, ToolError> {
    Ok(client
        .market_data()
        .options()
        .get_expiration_chain(&params)
        .await?)
}

async fn get_price_history(
    client: SchwabClient,
    params: GetPriceHistoryParams,
) -> Result<Value, ToolError> {
    info!(
        tool = "getPriceHistory",
        symbol = %params.symbol,
        period_type = ?params.period_type,
        period = ?params.period,
        frequency_type = ?params.frequency_type,
        frequency = ?params.frequency,
        start_date = ?params.start_date,
        end_date = ?params.end_date,
        "Fetching price history"
    );

    let history = client
        .market_data()
        .price_history()
        .get_price_history(&params)
        .await
        .inspect_err(|e| {
            error!(tool = "getPriceHistory", status = ?e.status(), error = %e, "Price history failed")
        })?;

    info!(
        tool = "getPriceHistory",
        symbol = ?history.symbol,
        candle_count = history.candle_count(),
        empty = ?history.empty,
        "Price history fetched"
    );
    Ok(serde_json::to_value(&history)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolRegistry;
    use schwab_core::parse_enabled_tools;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SchwabClient {
        SchwabClient::builder()
            .base_url(server.uri())
            .access_token("token")
            .build()
            .unwrap()
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new(tool_specs(), &parse_enabled_tools(Some("all")))
    }

    #[tokio::test]
    async fn test_get_quotes_passes_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketdata/v1/quotes"))
            .and(query_param("symbols", "AAPL,MSFT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "AAPL": {"quote": {"lastPrice": 190.1}},
                "MSFT": {"quote": {"lastPrice": 410.5}}
            })))
            .mount(&server)
            .await;

        let result = registry()
            .call(&client_for(&server), "getQuotes", json!({"symbols": "AAPL,MSFT"}))
            .await
            .unwrap();
        assert_eq!(result["MSFT"]["quote"]["lastPrice"], 410.5);
    }

    #[tokio::test]
    async fn test_option_chain_is_slimmed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketdata/v1/chains"))
            .and(query_param("symbol", "AAPL"))
            .and(query_param("contractType", "CALL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "symbol": "AAPL",
                "status": "SUCCESS",
                "numberOfContracts": 1,
                "callExpDateMap": {
                    "2025-06-20:30": {
                        "200.0": [{
                            "symbol": "AAPL  250620C00200000",
                            "putCall": "CALL",
                            "strikePrice": 200.0,
                            "bidPrice": 4.1,
                            "exchangeName": "OPR",
                            "delta": 0.45
                        }]
                    }
                }
            })))
            .mount(&server)
            .await;

        let result = registry()
            .call(
                &client_for(&server),
                "getOptionChain",
                json!({"symbol": "AAPL", "contractType": "CALL"}),
            )
            .await
            .unwrap();

        assert!(result.get("numberOfContracts").is_none());
        assert!(result.get("putExpDateMap").is_none());
        let contract = &result["callExpDateMap"]["2025-06-20:30"]["200.0"][0];
        assert_eq!(contract["delta"], 0.45);
        assert!(contract.get("exchangeName").is_none());
        assert!(contract.get("gamma").is_none());
    }

    #[tokio::test]
    async fn test_market_hours_date_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketdata/v1/markets"))
            .and(query_param("markets", "equity,option"))
            .and(query_param("date", "2025-03-14"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"equity": {}})))
            .expect(1)
            .mount(&server)
            .await;

        registry()
            .call(
                &client_for(&server),
                "getMarketHours",
                json!({"markets": ["equity", "option"], "date": "2025-03-14T10:00:00Z"}),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_market_hours_rejects_bad_date() {
        let server = MockServer::start().await;
        let err = registry()
            .call(
                &client_for(&server),
                "getMarketHours",
                json!({"markets": ["equity"], "date": "someday"}),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_movers_index_in_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketdata/v1/movers/%24SPX"))
            .and(query_param("sort", "VOLUME"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"screeners": []})))
            .mount(&server)
            .await;

        let result = registry()
            .call(
                &client_for(&server),
                "getMovers",
                json!({"symbol_id": "$SPX", "sort": "VOLUME"}),
            )
            .await
            .unwrap();
        assert_eq!(result, json!({"screeners": []}));
    }

    #[tokio::test]
    async fn test_price_history_passes_payload_through() {
        let server = MockServer::start().await;
        let body = json!({
            "symbol": "AAPL",
            "candles": [{"open": 1.0, "close": 2.0, "datetime": 1700000000000i64}],
            "previousClose": 1.5
        });
        Mock::given(method("GET"))
            .and(path("/marketdata/v1/pricehistory"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let result = registry()
            .call(&client_for(&server), "getPriceHistory", json!({"symbol": "AAPL"}))
            .await
            .unwrap();
        assert_eq!(result, body);
    }

    #[tokio::test]
    async fn test_price_history_failure_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketdata/v1/pricehistory"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errors": [{"title": "Bad Request"}]
            })))
            .mount(&server)
            .await;

        let err = registry()
            .call(&client_for(&server), "getPriceHistory", json!({"symbol": "AAPL"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Upstream(_)));
    }
}
