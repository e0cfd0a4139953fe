//! Request handling
//!
//! All per-process state lives in `ServerState`: the tool registry, the
//! rate provider and the configured display precision. Requests are
//! handled one at a time, in arrival order.

use metron_core::{codes, Category, ErrorReport};
use metron_plugin::{ToolContext, ToolRegistry};
use metron_rates::{
    CachedRateProvider, FileRateProvider, RateError, RateProvider, StaticRateProvider,
};
use metron_units::{load_units_tools, UNITS};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};
use crate::config::ServerConfig;
use crate::protocol::{McpError, McpRequest, McpResponse, INVALID_REQUEST, JSONRPC_VERSION};

pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "metron";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const UNITS_URI_PREFIX: &str = "metron://units/";

/// Base used to discover the currency list at startup
const DISCOVERY_BASE: &str = "USD";

pub struct ServerState {
    tools: ToolRegistry,
    rates: Box<dyn RateProvider>,
    precision: u32,
}

impl ServerState {
    pub fn new(tools: ToolRegistry, rates: Box<dyn RateProvider>, precision: u32) -> Self {
        Self { tools, rates, precision }
    }

    /// Conversion tools plus the configured, cached rate source
    pub fn from_config(config: &ServerConfig) -> Result<Self, RateError> {
        let rates: Box<dyn RateProvider> = match &config.rates_path {
            Some(path) => {
                info!(path = %path.display(), "using rate file");
                Box::new(
                    CachedRateProvider::new(FileRateProvider::new(path))
                        .with_ttl(config.rate_ttl)
                        .with_retries(config.rate_retries),
                )
            }
            None => {
                info!("no rate file configured, using built-in rates");
                Box::new(
                    CachedRateProvider::new(StaticRateProvider::builtin()?)
                        .with_ttl(config.rate_ttl)
                        .with_retries(config.rate_retries),
                )
            }
        };

        let tools = load_units_tools(ToolRegistry::new());
        Ok(Self::new(tools, rates, config.precision))
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Replace the fallback currency list with whatever the provider knows.
    /// Failure keeps the current list.
    pub async fn refresh_currencies(&self) -> bool {
        match self.rates.fetch_rates(DISCOVERY_BASE).await {
            Ok(table) => {
                let refreshed = UNITS.refresh_from_rates(&table);
                info!(currencies = UNITS.currency_codes().len(), "currency list refreshed");
                refreshed
            }
            Err(e) => {
                warn!(error = %e, "could not load currencies, keeping fallback list");
                false
            }
        }
    }

    /// Handle one line of input. `None` means nothing is sent back.
    pub async fn handle_line(&self, line: &str) -> Option<McpResponse> {
        let request: McpRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "unparseable request");
                return Some(McpResponse::failure(None, McpError::parse_error(e)));
            }
        };

        debug!(method = %request.method, "processing");
        let response = self.handle_request(&request).await;

        // Notifications never get a response
        if request.is_notification() {
            debug!(method = %request.method, "notification processed");
            return None;
        }
        Some(response)
    }

    pub async fn handle_request(&self, request: &McpRequest) -> McpResponse {
        if request.jsonrpc != JSONRPC_VERSION {
            return McpResponse::failure(
                request.id.clone(),
                McpError::new(INVALID_REQUEST, format!("Unsupported jsonrpc version: {}", request.jsonrpc)),
            );
        }

        let result = match request.method.as_str() {
            // Lifecycle
            "initialize" => self.handle_initialize(request),
            "initialized" | "notifications/initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),

            // Tools
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tool_call(request).await,

            // Resources
            "resources/list" => self.handle_resources_list(),
            "resources/read" => self.handle_resources_read(request),

            _ => Err(McpError::method_not_found(&request.method)),
        };

        match result {
            Ok(r) => McpResponse::success(request.id.clone(), r),
            Err(e) => McpResponse::failure(request.id.clone(), e),
        }
    }

    fn handle_initialize(&self, request: &McpRequest) -> Result<JsonValue, McpError> {
        let params = request.params.as_ref();
        let client = params
            .and_then(|p| p.get("clientInfo"))
            .and_then(|c| c.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or("unknown");

        // Answer with the client's protocol version when it names one
        let protocol = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(|v| v.as_str())
            .unwrap_or(PROTOCOL_VERSION);

        info!(client, protocol, "client connected");

        Ok(json!({
            "protocolVersion": protocol,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION,
                "description": "Unit and currency conversion"
            },
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false }
            },
            "instructions": "Use list_categories and list_units to discover units, then convert or convert_expression. Currency conversions use the server's configured exchange rates."
        }))
    }

    fn handle_tools_list(&self) -> Result<JsonValue, McpError> {
        let tools: Vec<JsonValue> = self.tools.list()
            .iter()
            .map(|meta| json!({
                "name": meta.name,
                "description": meta.description,
                "inputSchema": meta.input_schema(),
            }))
            .collect();
        Ok(json!({ "tools": tools }))
    }

    async fn handle_tool_call(&self, request: &McpRequest) -> Result<JsonValue, McpError> {
        let params = request.params.as_ref()
            .ok_or_else(|| McpError::invalid_params("Missing params"))?;
        let name = params.get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;
        let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        let tool = self.tools.get_tool(name).ok_or_else(|| {
            let report = self.tools.unknown_tool(name);
            McpError::invalid_params(report.to_string()).with_data(json!(report))
        })?;

        let mut ctx = ToolContext::new().with_precision(self.precision);
        if let Some(base) = tool.required_rates(&args) {
            match self.rates.fetch_rates(&base).await {
                Ok(table) => {
                    UNITS.refresh_from_rates(&table);
                    ctx = ctx.with_rates(table);
                }
                Err(e) => {
                    warn!(tool = name, base = %base, error = %e, "rate fetch failed");
                    let report = ErrorReport::new(codes::RATE_UNAVAILABLE, e.to_string())
                        .with_suggestion("Check the configured rate source, or convert from a currency it lists");
                    return Ok(tool_error(&report));
                }
            }
        }

        match tool.call(&args, &ctx) {
            Ok(output) => Ok(json!({
                "content": [{ "type": "text", "text": output.text }],
                "structuredContent": output.data,
                "isError": false
            })),
            Err(report) => {
                debug!(tool = name, code = %report.code, "tool returned an error");
                Ok(tool_error(&report))
            }
        }
    }

    fn handle_resources_list(&self) -> Result<JsonValue, McpError> {
        let resources: Vec<JsonValue> = UNITS.categories()
            .iter()
            .map(|c| json!({
                "uri": format!("{}{}", UNITS_URI_PREFIX, c.slug()),
                "name": c.name(),
                "description": format!("{} units ({} conversion)", c.name(), c.strategy()),
                "mimeType": "application/json"
            }))
            .collect();
        Ok(json!({ "resources": resources }))
    }

    fn handle_resources_read(&self, request: &McpRequest) -> Result<JsonValue, McpError> {
        let uri = request.param_str("uri")
            .ok_or_else(|| McpError::invalid_params("Missing uri parameter"))?;

        let slug = uri.strip_prefix(UNITS_URI_PREFIX).ok_or_else(|| {
            McpError::invalid_params(format!("Invalid URI: {}. Expected {}{{category}}", uri, UNITS_URI_PREFIX))
        })?;

        let category: Category = slug.parse()
            .map_err(|e: metron_core::ConversionError| McpError::invalid_params(e.to_string()))?;
        let units = UNITS.units_for(category)
            .map_err(|e| McpError::invalid_params(e.to_string()))?;

        let text = serde_json::to_string_pretty(&json!({
            "category": category.name(),
            "strategy": category.strategy().to_string(),
            "units": *units,
        }))
        .map_err(|e| McpError::new(crate::protocol::INTERNAL_ERROR, e.to_string()))?;

        Ok(json!({
            "contents": [{
                "uri": uri,
                "mimeType": "application/json",
                "text": text
            }]
        }))
    }
}

fn tool_error(report: &ErrorReport) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": report.to_string() }],
        "structuredContent": { "error": report },
        "isError": true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use metron_core::RateTable;
    use crate::protocol::{INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR};

    fn state() -> ServerState {
        let table = RateTable::new("USD", [
            ("EUR", 0.5), ("GBP", 0.25), ("INR", 80.0), ("JPY", 150.0),
        ]).unwrap();
        ServerState::new(
            load_units_tools(ToolRegistry::new()),
            Box::new(StaticRateProvider::from_table(table)),
            6,
        )
    }

    async fn call(state: &ServerState, line: &str) -> JsonValue {
        let response = state.handle_line(line).await.expect("expected a response");
        serde_json::from_str(&response.to_line()).unwrap()
    }

    fn tool_call(id: u32, tool: &str, args: JsonValue) -> String {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": tool, "arguments": args }
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_initialize() {
        let state = state();
        let resp = call(&state, r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26","clientInfo":{"name":"test"}}}"#).await;
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"]["protocolVersion"], "2025-03-26");
        assert_eq!(resp["result"]["serverInfo"]["name"], "metron");
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let state = state();
        assert!(state.handle_line(r#"{"jsonrpc":"2.0","method":"initialized"}"#).await.is_none());
        assert!(state.handle_line(r#"{"jsonrpc":"2.0","method":"no/such"}"#).await.is_none());
    }

    #[tokio::test]
    async fn test_null_id_gets_response() {
        let state = state();
        let resp = call(&state, r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).await;
        assert_eq!(resp.get("id"), Some(&JsonValue::Null));
        assert!(resp.get("result").is_some());
    }

    #[tokio::test]
    async fn test_parse_error() {
        let state = state();
        let resp = call(&state, "{ nope").await;
        assert_eq!(resp["error"]["code"], PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let state = state();
        let resp = call(&state, r#"{"jsonrpc":"2.0","id":2,"method":"prompts/list"}"#).await;
        assert_eq!(resp["error"]["code"], METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let state = state();
        let resp = call(&state, r#"{"jsonrpc":"1.0","id":2,"method":"ping"}"#).await;
        assert_eq!(resp["error"]["code"], INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_tools_list() {
        let state = state();
        let resp = call(&state, r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#).await;
        let tools = resp["result"]["tools"].as_array().unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["convert", "convert_expression", "list_categories", "list_units"]);
        assert_eq!(tools[0]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_convert_tool() {
        let state = state();
        let resp = call(&state, &tool_call(4, "convert", json!({
            "category": "Length", "from_unit": "Kilometer", "to_unit": "Meter", "value": 1
        }))).await;
        let result = &resp["result"];
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["text"], "1 km = 1000 m");
        assert_eq!(result["structuredContent"]["value"], 1000.0);
    }

    #[tokio::test]
    async fn test_conversion_error_is_tool_error() {
        let state = state();
        let resp = call(&state, &tool_call(5, "convert", json!({
            "category": "Length", "from_unit": "Meter", "to_unit": "Kilogram", "value": 1
        }))).await;
        let result = &resp["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["error"]["code"], "UNIT_CATEGORY_MISMATCH");
    }

    #[tokio::test]
    async fn test_currency_conversion_fetches_rates() {
        let state = state();
        let resp = call(&state, &tool_call(6, "convert", json!({
            "category": "Currency", "from_unit": "EUR", "to_unit": "GBP", "value": 10
        }))).await;
        assert_eq!(resp["result"]["isError"], false);
        assert_eq!(resp["result"]["structuredContent"]["value"], 5.0);
    }

    #[tokio::test]
    async fn test_currency_missing_code() {
        let state = state();
        let resp = call(&state, &tool_call(7, "convert", json!({
            "category": "Currency", "from_unit": "USD", "to_unit": "ZZZ", "value": 10
        }))).await;
        assert_eq!(resp["result"]["isError"], true);
        assert_eq!(resp["result"]["structuredContent"]["error"]["code"], "RATE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_currency_unknown_base() {
        let state = state();
        let resp = call(&state, &tool_call(8, "convert_expression", json!({
            "expression": "10 xyz to usd"
        }))).await;
        // "xyz" is not a known unit anywhere, so the expression itself is rejected
        assert_eq!(resp["result"]["structuredContent"]["error"]["code"], "INVALID_EXPRESSION");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let state = state();
        let resp = call(&state, &tool_call(9, "convrt", json!({}))).await;
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
        assert!(resp["error"]["message"].as_str().unwrap().contains("convert"));
    }

    #[tokio::test]
    async fn test_resources() {
        let state = state();
        let resp = call(&state, r#"{"jsonrpc":"2.0","id":10,"method":"resources/list"}"#).await;
        let resources = resp["result"]["resources"].as_array().unwrap();
        assert_eq!(resources.len(), Category::ALL.len());
        assert_eq!(resources[0]["uri"], "metron://units/length");

        let resp = call(&state, r#"{"jsonrpc":"2.0","id":11,"method":"resources/read","params":{"uri":"metron://units/temperature"}}"#).await;
        let text = resp["result"]["contents"][0]["text"].as_str().unwrap();
        let body: JsonValue = serde_json::from_str(text).unwrap();
        assert_eq!(body["units"][0]["symbol"], "°C");

        let resp = call(&state, r#"{"jsonrpc":"2.0","id":12,"method":"resources/read","params":{"uri":"metron://units/luminosity"}}"#).await;
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_refresh_currencies() {
        let state = state();
        assert!(state.refresh_currencies().await);
        assert!(UNITS.currency_codes().contains(&"INR".to_string()));

        let empty = ServerState::new(ToolRegistry::new(), Box::new(StaticRateProvider::default()), 6);
        assert!(!empty.refresh_currencies().await);
    }

    #[test]
    fn test_from_config() {
        let state = ServerState::from_config(&ServerConfig::default()).unwrap();
        assert_eq!(state.tools().len(), 4);
    }
}
