// Trader API tools: accounts, orders, transactions and user preference.
//
// Every response that can carry an account number or hash is scrubbed
// through the account display map before it reaches the agent.

use super::registry::{
    json_schema_array, json_schema_enum, json_schema_integer, json_schema_number,
    json_schema_object, json_schema_string, NoParams, ToolSpec,
};
use crate::error::ToolError;
use schwab_core::aliases::{accepted_abbreviations, normalize_order_arguments};
use schwab_core::{scrub_account_identifiers, ToolName};
use schwab_sdk::api::{
    GetAccountParams, GetAccountsParams, GetOrdersByAccountParams, GetTransactionParams,
    OrderIdParams, OrderPlacement, OrderQuery, PlaceOrderParams, ReplaceOrderParams,
    TransactionQuery,
};
use schwab_sdk::types::{
    AssetType, ComplexOrderStrategyType, Instruction, OrderDuration, OrderStatus,
    OrderStrategyType, OrderType, Session, TransactionType,
};
use schwab_sdk::{build_account_display_map, mask_account, SchwabClient};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};

pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new(
            ToolName::GetAccounts,
            "Get accounts",
            json_schema_object(
                json!({ "fields": json_schema_string("Set to 'positions' to include positions") }),
                vec![],
            ),
            get_accounts,
        ),
        ToolSpec::new(
            ToolName::GetAccountNumbers,
            "Get account numbers",
            json_schema_object(json!({}), vec![]),
            get_account_numbers,
        ),
        ToolSpec::new(
            ToolName::GetAccount,
            "Get account",
            json_schema_object(
                json!({
                    "accountNumber": account_number_schema(),
                    "fields": json_schema_string("Set to 'positions' to include positions"),
                }),
                vec!["accountNumber"],
            ),
            get_account,
        ),
        ToolSpec::new(
            ToolName::GetOrders,
            "Get orders",
            json_schema_object(order_query_properties(), vec![]),
            get_orders,
        ),
        ToolSpec::new(
            ToolName::GetOrdersByAccountNumber,
            "Get orders by account number",
            json_schema_object(
                with_properties(
                    order_query_properties(),
                    json!({ "accountNumber": account_number_schema() }),
                ),
                vec!["accountNumber"],
            ),
            get_orders_by_account,
        ),
        ToolSpec::new(
            ToolName::PlaceOrder,
            format!(
                "Place order for a specific account. Accepts abbreviations: {}.",
                accepted_abbreviations().join(", ")
            ),
            json_schema_object(
                with_properties(
                    order_body_properties(),
                    json!({ "accountNumber": account_number_schema() }),
                ),
                order_body_required(&["accountNumber"]),
            ),
            place_order,
        )
        .with_preprocess(normalize_order_arguments),
        ToolSpec::new(
            ToolName::GetOrder,
            "Get order by order id for a specific account",
            order_id_schema(),
            get_order,
        ),
        ToolSpec::new(
            ToolName::CancelOrder,
            "Cancel order by order id for a specific account",
            order_id_schema(),
            cancel_order,
        ),
        ToolSpec::new(
            ToolName::ReplaceOrder,
            format!(
                "Replace order by order id for a specific account. Accepts abbreviations: {}.",
                accepted_abbreviations().join(", ")
            ),
            json_schema_object(
                with_properties(
                    order_body_properties(),
                    json!({
                        "accountNumber": account_number_schema(),
                        "orderId": json_schema_string("Order id"),
                    }),
                ),
                order_body_required(&["accountNumber", "orderId"]),
            ),
            replace_order,
        )
        .with_preprocess(normalize_order_arguments),
        ToolSpec::new(
            ToolName::GetTransactions,
            "Get transactions across all linked accounts",
            json_schema_object(
                json!({
                    "startDate": json_schema_string("Start of range, ISO-8601 date-time"),
                    "endDate": json_schema_string("End of range, ISO-8601 date-time"),
                    "types": json_schema_enum(TransactionType::VARIANTS, "Transaction type"),
                    "symbol": json_schema_string("Only transactions for this symbol"),
                }),
                vec!["startDate", "endDate"],
            ),
            get_transactions,
        ),
        ToolSpec::new(
            ToolName::GetTransaction,
            "Get transaction",
            json_schema_object(
                json!({
                    "accountNumber": account_number_schema(),
                    "transactionId": json_schema_string("Transaction id"),
                }),
                vec!["accountNumber", "transactionId"],
            ),
            get_transaction,
        ),
        ToolSpec::new(
            ToolName::GetUserPreference,
            "Get user preference",
            json_schema_object(json!({}), vec![]),
            get_user_preference,
        ),
    ]
}

fn account_number_schema() -> Value {
    json_schema_string("Account hash value from getAccountNumbers")
}

fn order_id_schema() -> Value {
    json_schema_object(
        json!({
            "accountNumber": account_number_schema(),
            "orderId": json_schema_string("Order id"),
        }),
        vec!["accountNumber", "orderId"],
    )
}

fn order_query_properties() -> Value {
    json!({
        "maxResults": json_schema_integer("Maximum number of orders to return"),
        "fromEnteredTime": json_schema_string("ISO-8601 date-time, required with toEnteredTime"),
        "toEnteredTime": json_schema_string("ISO-8601 date-time"),
        "status": json_schema_enum(OrderStatus::VARIANTS, "Only orders in this status"),
    })
}

fn order_body_properties() -> Value {
    let leg = json_schema_object(
        json!({
            "instruction": json_schema_enum(Instruction::VARIANTS, "Leg instruction (BTO, BTC, STO, STC accepted)"),
            "quantity": json_schema_number("Number of shares or contracts"),
            "instrument": json_schema_object(
                json!({
                    "symbol": json_schema_string("Symbol"),
                    "assetType": json_schema_enum(AssetType::VARIANTS, "Asset type"),
                }),
                vec!["symbol", "assetType"],
            ),
        }),
        vec!["instruction", "quantity", "instrument"],
    );

    json!({
        "session": json_schema_enum(Session::VARIANTS, "Trading session"),
        "duration": json_schema_enum(OrderDuration::VARIANTS, "Order duration (GTC, FOK, IOC accepted)"),
        "orderType": json_schema_enum(OrderType::VARIANTS, "Order type (MKT, LMT, STP, STP_LMT accepted)"),
        "orderStrategyType": json_schema_enum(OrderStrategyType::VARIANTS, "Order strategy"),
        "complexOrderStrategyType": json_schema_enum(ComplexOrderStrategyType::VARIANTS, "Multi-leg strategy"),
        "price": json_schema_number("Limit price"),
        "stopPrice": json_schema_number("Stop price"),
        "quantity": json_schema_number("Order quantity"),
        "orderLegCollection": json_schema_array(leg, "Order legs"),
    })
}

fn order_body_required<'a>(extra: &[&'a str]) -> Vec<&'a str> {
    let mut required = extra.to_vec();
    required.extend([
        "session",
        "duration",
        "orderType",
        "orderStrategyType",
        "orderLegCollection",
    ]);
    required
}

fn with_properties(base: Value, extra: Value) -> Value {
    let mut merged = Map::new();
    for source in [extra, base] {
        if let Value::Object(fields) = source {
            merged.extend(fields);
        }
    }
    Value::Object(merged)
}

/// Replace account identifiers with their display labels.
async fn scrubbed(client: &SchwabClient, value: Value) -> Result<Value, ToolError> {
    let display_map = build_account_display_map(client).await?;
    Ok(scrub_account_identifiers(value, &display_map))
}

async fn get_accounts(client: SchwabClient, params: GetAccountsParams) -> Result<Value, ToolError> {
    info!(tool = "getAccounts", fields = ?params.fields, "Fetching accounts");
    let accounts = client.trader().accounts().get_accounts(&params).await?;

    let summaries = accounts
        .into_iter()
        .map(|mut account| match account.get_mut("securitiesAccount") {
            Some(inner) => inner.take(),
            None => Value::Object(Map::new()),
        })
        .collect();

    scrubbed(&client, Value::Array(summaries)).await
}

async fn get_account_numbers(client: SchwabClient, _: NoParams) -> Result<Value, ToolError> {
    info!(tool = "getAccountNumbers", "Fetching account numbers");
    let accounts = client.trader().accounts().get_account_numbers().await?;
    let display_map = build_account_display_map(&client).await?;

    let entries = accounts
        .iter()
        .map(|account| {
            json!({
                "accountDisplay": display_map.get(&account.account_number),
                "hashValue": account.hash_value,
            })
        })
        .collect();
    Ok(Value::Array(entries))
}

async fn get_account(client: SchwabClient, params: GetAccountParams) -> Result<Value, ToolError> {
    let account = client.trader().accounts().get_account(&params).await?;
    scrubbed(&client, account).await
}

async fn get_orders(client: SchwabClient, query: OrderQuery) -> Result<Value, ToolError> {
    info!(
        tool = "getOrders",
        max_results = ?query.max_results,
        has_date_filter = query.has_date_filter(),
        "Fetching orders"
    );
    let orders = client.trader().orders().get_orders(&query).await?;
    scrubbed(&client, Value::Array(orders)).await
}

async fn get_orders_by_account(
    client: SchwabClient,
    params: GetOrdersByAccountParams,
) -> Result<Value, ToolError> {
    let orders = client
        .trader()
        .orders()
        .get_orders_by_account(&params.account_number, &params.query)
        .await?;
    scrubbed(&client, Value::Array(orders)).await
}

async fn place_order(client: SchwabClient, params: PlaceOrderParams) -> Result<Value, ToolError> {
    let order = &params.order;
    info!(
        tool = "placeOrder",
        account = %mask_account(&params.account_number),
        order_type = %order.order_type,
        session = %order.session,
        duration = %order.duration,
        order_strategy_type = %order.order_strategy_type,
        order_leg_count = order.order_leg_collection.len(),
        "Placing order"
    );
    debug!(tool = "placeOrder", body = ?order, "Full order body");

    let placement = client
        .trader()
        .orders()
        .place_order(&params.account_number, order)
        .await
        .inspect_err(|e| {
            error!(tool = "placeOrder", status = ?e.status(), error = %e, "Order failed")
        })?;

    info!(tool = "placeOrder", order_id = ?placement.order_id, "Order placed");
    scrubbed(&client, placement_result(placement)).await
}

async fn get_order(client: SchwabClient, params: OrderIdParams) -> Result<Value, ToolError> {
    let order = client
        .trader()
        .orders()
        .get_order(&params.account_number, &params.order_id)
        .await?;
    scrubbed(&client, order).await
}

async fn cancel_order(client: SchwabClient, params: OrderIdParams) -> Result<Value, ToolError> {
    info!(
        tool = "cancelOrder",
        account = %mask_account(&params.account_number),
        order_id = %params.order_id,
        "Cancelling order"
    );
    client
        .trader()
        .orders()
        .cancel_order(&params.account_number, &params.order_id)
        .await?;

    scrubbed(
        &client,
        json!({ "orderId": params.order_id, "cancelled": true }),
    )
    .await
}

async fn replace_order(client: SchwabClient, params: ReplaceOrderParams) -> Result<Value, ToolError> {
    info!(
        tool = "replaceOrder",
        account = %mask_account(&params.account_number),
        order_id = %params.order_id,
        order_type = %params.order.order_type,
        "Replacing order"
    );
    let placement = client
        .trader()
        .orders()
        .replace_order(&params.account_number, &params.order_id, &params.order)
        .await
        .inspect_err(|e| {
            error!(tool = "replaceOrder", status = ?e.status(), error = %e, "Replace failed")
        })?;

    scrubbed(&client, placement_result(placement)).await
}

/// The Location header embeds the account hash, so only the new order id
/// is returned.
fn placement_result(placement: OrderPlacement) -> Value {
    json!({ "orderId": placement.order_id })
}

async fn get_transactions(client: SchwabClient, query: TransactionQuery) -> Result<Value, ToolError> {
    info!(tool = "getTransactions", "Fetching accounts");
    let accounts = client.trader().accounts().get_account_numbers().await?;
    if accounts.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }

    info!(
        tool = "getTransactions",
        account_count = accounts.len(),
        start_date = %query.start_date,
        end_date = %query.end_date,
        has_type = query.types.is_some(),
        symbol = ?query.symbol,
        "Fetching transactions"
    );

    // One account at a time; the first failure aborts the whole call
    let mut transactions = Vec::new();
    for account in &accounts {
        let batch = client
            .trader()
            .transactions()
            .get_transactions(&account.hash_value, &query)
            .await?;
        debug!(
            tool = "getTransactions",
            account = %mask_account(&account.hash_value),
            count = batch.len(),
            "Transactions for account"
        );
        transactions.extend(batch);
    }

    scrubbed(&client, Value::Array(transactions)).await
}

async fn get_transaction(
    client: SchwabClient,
    params: GetTransactionParams,
) -> Result<Value, ToolError> {
    info!(
        tool = "getTransaction",
        transaction_id = %params.transaction_id,
        "Fetching transaction"
    );
    let transaction = client
        .trader()
        .transactions()
        .get_transaction(&params.account_number, &params.transaction_id)
        .await?;
    scrubbed(&client, transaction).await
}

async fn get_user_preference(client: SchwabClient, _: NoParams) -> Result<Value, ToolError> {
    info!(tool = "getUserPreference", "Fetching user preference");
    let preference = client.trader().user_preference().get().await?;
    if !preference.has_streamer_info() {
        return Ok(Value::Array(Vec::new()));
    }

    info!(
        tool = "getUserPreference",
        account_count = preference.accounts().len(),
        has_streamer_info = true,
        "User preference fetched"
    );
    scrubbed(&client, serde_json::to_value(&preference)?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolRegistry;
    use schwab_core::parse_enabled_tools;
    use schwab_sdk::RetryConfig;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    async fn mount_display_sources(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/trader/v1/accounts/accountNumbers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"accountNumber": "12345678", "hashValue": "HASH1"},
                {"accountNumber": "87654321", "hashValue": "HASH2"}
            ])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/trader/v1/userPreference"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accounts": [
                    {"accountNumber": "12345678", "nickName": "Brokerage", "displayAcctId": "...678"}
                ],
                "streamerInfo": [{"streamerSocketUrl": "wss://example"}],
                "offers": []
            })))
            .mount(server)
            .await;
    }

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
    async fn test_get_accounts_unwraps_and_scrubs() {
        let server = MockServer::start().await;
        mount_display_sources(&server).await;
        Mock::given(method("GET"))
            .and(path("/trader/v1/accounts"))
            .and(query_param("fields", "positions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"securitiesAccount": {"accountNumber": "12345678", "type": "MARGIN"}}
            ])))
            .mount(&server)
            .await;

        let result = registry()
            .call(&client_for(&server), "getAccounts", json!({"fields": "positions"}))
            .await
            .unwrap();

        assert_eq!(
            result,
            json!([{"accountNumber": "Brokerage ...678", "type": "MARGIN"}])
        );
    }

    #[tokio::test]
    async fn test_get_account_numbers_hides_raw_numbers() {
        let server = MockServer::start().await;
        mount_display_sources(&server).await;

        let result = registry()
            .call(&client_for(&server), "getAccountNumbers", Value::Null)
            .await
            .unwrap();

        assert_eq!(
            result,
            json!([
                {"accountDisplay": "Brokerage ...678", "hashValue": "HASH1"},
                {"accountDisplay": "Account ...4321", "hashValue": "HASH2"}
            ])
        );
    }

    #[tokio::test]
    async fn test_place_order_normalizes_aliases() {
        let server = MockServer::start().await;
        mount_display_sources(&server).await;
        Mock::given(method("POST"))
            .and(path("/trader/v1/accounts/HASH1/orders"))
            .and(body_json(json!({
                "session": "NORMAL",
                "duration": "GOOD_TILL_CANCEL",
                "orderType": "LIMIT",
                "orderStrategyType": "SINGLE",
                "orderLegCollection": [{
                    "instruction": "BUY_TO_OPEN",
                    "quantity": 1.0,
                    "instrument": {"symbol": "AAPL  250620C00200000", "assetType": "OPTION"}
                }],
                "price": 2.5
            })))
            .respond_with(ResponseTemplate::new(201).insert_header(
                "Location",
                format!("{}/trader/v1/accounts/HASH1/orders/9001", server.uri()).as_str(),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let result = registry()
            .call(
                &client_for(&server),
                "placeOrder",
                json!({
                    "accountNumber": "HASH1",
                    "session": "NORMAL",
                    "duration": "GTC",
                    "orderType": "LMT",
                    "price": 2.5,
                    "orderStrategyType": "SINGLE",
                    "orderLegCollection": [{
                        "instruction": "BTO",
                        "quantity": 1,
                        "instrument": {"symbol": "AAPL  250620C00200000", "assetType": "OPTION"}
                    }]
                }),
            )
            .await
            .unwrap();

        assert_eq!(result, json!({"orderId": "9001"}));
    }

    #[tokio::test]
    async fn test_replace_order_normalizes_aliases() {
        let server = MockServer::start().await;
        mount_display_sources(&server).await;
        Mock::given(method("PUT"))
            .and(path("/trader/v1/accounts/HASH1/orders/9001"))
            .and(body_json(json!({
                "session": "NORMAL",
                "duration": "DAY",
                "orderType": "STOP_LIMIT",
                "orderStrategyType": "SINGLE",
                "orderLegCollection": [{
                    "instruction": "SELL_TO_CLOSE",
                    "quantity": 2.0,
                    "instrument": {"symbol": "AAPL  250620C00200000", "assetType": "OPTION"}
                }],
                "price": 1.5,
                "stopPrice": 1.6
            })))
            .respond_with(ResponseTemplate::new(201).insert_header(
                "Location",
                format!("{}/trader/v1/accounts/HASH1/orders/9002", server.uri()).as_str(),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let result = registry()
            .call(
                &client_for(&server),
                "replaceOrder",
                json!({
                    "accountNumber": "HASH1",
                    "orderId": 9001,
                    "session": "NORMAL",
                    "duration": "DAY",
                    "orderType": "STP_LMT",
                    "price": 1.5,
                    "stopPrice": 1.6,
                    "orderStrategyType": "SINGLE",
                    "orderLegCollection": [{
                        "instruction": "STC",
                        "quantity": 2,
                        "instrument": {"symbol": "AAPL  250620C00200000", "assetType": "OPTION"}
                    }]
                }),
            )
            .await
            .unwrap();

        assert_eq!(result, json!({"orderId": "9002"}));
    }

    #[tokio::test]
    async fn test_place_order_rejects_unknown_duration() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let err = registry()
            .call(
                &client_for(&server),
                "placeOrder",
                json!({
                    "accountNumber": "HASH1",
                    "session": "NORMAL",
                    "duration": "XYZ",
                    "orderType": "MARKET",
                    "orderStrategyType": "SINGLE",
                    "orderLegCollection": [{
                        "instruction": "BUY",
                        "quantity": 1,
                        "instrument": {"symbol": "AAPL", "assetType": "EQUITY"}
                    }]
                }),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_get_transactions_walks_every_account() {
        let server = MockServer::start().await;
        mount_display_sources(&server).await;
        for (hash, id) in [("HASH1", 1), ("HASH2", 2)] {
            Mock::given(method("GET"))
                .and(path(format!("/trader/v1/accounts/{hash}/transactions")))
                .and(query_param("startDate", "2025-01-01T00:00:00.000Z"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    {"activityId": id, "accountNumber": hash}
                ])))
                .expect(1)
                .mount(&server)
                .await;
        }

        let result = registry()
            .call(
                &client_for(&server),
                "getTransactions",
                json!({
                    "startDate": "2025-01-01T00:00:00.000Z",
                    "endDate": "2025-02-01T00:00:00.000Z"
                }),
            )
            .await
            .unwrap();

        assert_eq!(
            result,
            json!([
                {"activityId": 1, "accountNumber": "Brokerage ...678"},
                {"activityId": 2, "accountNumber": "Account ...4321"}
            ])
        );
    }

    #[tokio::test]
    async fn test_get_transactions_fails_fast_on_account_error() {
        let server = MockServer::start().await;
        mount_display_sources(&server).await;
        Mock::given(method("GET"))
            .and(path("/trader/v1/accounts/HASH1/transactions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"activityId": 1, "accountNumber": "HASH1"}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/trader/v1/accounts/HASH2/transactions"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "down"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = SchwabClient::builder()
            .base_url(server.uri())
            .access_token("token")
            .retry_config(RetryConfig::no_retry())
            .build()
            .unwrap();
        let err = registry()
            .call(
                &client,
                "getTransactions",
                json!({"startDate": "2025-01-01T00:00:00Z", "endDate": "2025-02-01T00:00:00Z"}),
            )
            .await
            .unwrap_err();

        match err {
            ToolError::Upstream(e) => assert_eq!(e.status(), Some(500)),
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_transactions_without_accounts_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trader/v1/accounts/accountNumbers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let result = registry()
            .call(
                &client_for(&server),
                "getTransactions",
                json!({"startDate": "2025-01-01T00:00:00Z", "endDate": "2025-02-01T00:00:00Z"}),
            )
            .await
            .unwrap();

        assert_eq!(result, json!([]));
        let requests: Vec<Request> = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_get_transaction_looks_up_by_id() {
        let server = MockServer::start().await;
        mount_display_sources(&server).await;
        Mock::given(method("GET"))
            .and(path("/trader/v1/accounts/HASH2/transactions/555"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "activityId": 555, "accountNumber": "87654321"
            })))
            .mount(&server)
            .await;

        let result = registry()
            .call(
                &client_for(&server),
                "getTransaction",
                json!({"accountNumber": "HASH2", "transactionId": 555}),
            )
            .await
            .unwrap();

        assert_eq!(result["accountNumber"], "Account ...4321");
    }

    #[tokio::test]
    async fn test_user_preference_keeps_payload_shape() {
        let server = MockServer::start().await;
        mount_display_sources(&server).await;

        let result = registry()
            .call(&client_for(&server), "getUserPreference", json!({}))
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({
                "accounts": [
                    {"accountNumber": "Brokerage ...678", "nickName": "Brokerage", "displayAcctId": "...678"}
                ],
                "streamerInfo": [{"streamerSocketUrl": "wss://example"}],
                "offers": []
            })
        );
    }

    #[tokio::test]
    async fn test_user_preference_without_streamer_info() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trader/v1/userPreference"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accounts": [{"accountNumber": "12345678"}],
                "streamerInfo": [],
                "offers": []
            })))
            .mount(&server)
            .await;

        let result = registry()
            .call(&client_for(&server), "getUserPreference", json!({}))
            .await
            .unwrap();
        assert_eq!(result, json!([]));
    }

    #[tokio::test]
    async fn test_upstream_failure_surfaces_as_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/trader/v1/accounts/HASH1/orders/77"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"message": "Order not cancelable"})),
            )
            .mount(&server)
            .await;

        let err = registry()
            .call(
                &client_for(&server),
                "cancelOrder",
                json!({"accountNumber": "HASH1", "orderId": "77"}),
            )
            .await
            .unwrap_err();

        match err {
            ToolError::Upstream(e) => assert_eq!(e.status(), Some(400)),
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
