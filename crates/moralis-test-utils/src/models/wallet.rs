//! Wallet-history endpoint models.
//!
//! Response shapes follow `GET /wallets/{address}/history` of the Moralis
//! API 2.2. They are read-only views used for field validation, so they
//! deserialize leniently: missing or null strings become empty and fail the
//! format checks instead of aborting the scenario.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::client::{HttpRequest, RequestOptions};
use crate::context::ScenarioContext;
use crate::error::{HarnessError, HarnessResult};

/// Addresses used by the feature files.
pub mod addresses {
    /// Well-known, very active mainnet wallet
    pub const ETHEREUM: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
    /// The zero address; has no history of its own
    pub const EMPTY_WALLET: &str = "0x0000000000000000000000000000000000000000";
}

/// Chain identifiers accepted by the provider.
pub mod chains {
    pub const ETHEREUM: &str = "eth";
    pub const POLYGON: &str = "polygon";
    pub const BSC: &str = "bsc";
    pub const AVALANCHE: &str = "avalanche";
    pub const FANTOM: &str = "fantom";
    pub const CRONOS: &str = "cronos";
    pub const ARBITRUM: &str = "arbitrum";
    pub const OPTIMISM: &str = "optimism";
}

/// Page size the provider applies when none is requested.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Body of a successful wallet-history call
///
/// Pagination counters stay untyped: the provider has served them both as
/// numbers and as numeric strings, and a string is a contract violation to
/// report rather than a reason to abort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletHistoryResponse {
    #[serde(default)]
    pub result: Option<Vec<Transaction>>,
    #[serde(default)]
    pub total: Option<Value>,
    #[serde(default)]
    pub page: Option<Value>,
    #[serde(default)]
    pub page_size: Option<Value>,
    #[serde(default)]
    pub limit: Option<Value>,
    #[serde(default)]
    pub cursor: Option<String>,
}

impl WalletHistoryResponse {
    /// Interpret a parsed body as a wallet-history page
    pub fn from_body(body: &Value) -> HarnessResult<Self> {
        if !body.is_object() {
            return Err(HarnessError::InvalidResponse(format!(
                "expected a wallet history object, got: {body}"
            )));
        }
        serde_json::from_value(body.clone()).map_err(|e| {
            HarnessError::InvalidResponse(format!("not a wallet history payload: {e}"))
        })
    }

    /// Transactions of the page; an absent list reads as empty
    pub fn transactions(&self) -> &[Transaction] {
        self.result.as_deref().unwrap_or(&[])
    }
}

/// One entry of the history page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    #[serde(deserialize_with = "null_as_default")]
    pub hash: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nonce: String,
    #[serde(deserialize_with = "null_as_default")]
    pub transaction_index: String,
    #[serde(deserialize_with = "null_as_default")]
    pub from_address: String,
    pub to_address: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gas: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gas_price: String,
    #[serde(deserialize_with = "null_as_default")]
    pub input: String,
    #[serde(deserialize_with = "null_as_default")]
    pub receipt_cumulative_gas_used: String,
    #[serde(deserialize_with = "null_as_default")]
    pub receipt_gas_used: String,
    pub receipt_contract_address: Option<String>,
    pub receipt_root: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub receipt_status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub block_timestamp: String,
    #[serde(deserialize_with = "null_as_default")]
    pub block_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub block_hash: String,
    pub transfers: Option<Vec<Transfer>>,
    pub logs: Option<Vec<Log>>,
    pub decoded_call: Option<DecodedCall>,
    pub category: Option<String>,
    pub method: Option<String>,
    pub method_hash: Option<String>,
    pub method_name: Option<String>,
}

impl Transaction {
    /// `block_timestamp` as an RFC 3339 instant
    pub fn block_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.block_timestamp)
            .ok()
            .map(|time| time.with_timezone(&Utc))
    }
}

/// Native or token movement inside a transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transfer {
    #[serde(deserialize_with = "null_as_default")]
    pub block_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub block_timestamp: String,
    #[serde(deserialize_with = "null_as_default")]
    pub from_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub to_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub transaction_hash: String,
    #[serde(deserialize_with = "null_as_default")]
    pub log_index: i64,
    pub token_address: Option<String>,
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    pub token_decimals: Option<String>,
    pub token_logo: Option<String>,
    pub token_contract_type: Option<String>,
}

/// Raw event log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Log {
    #[serde(deserialize_with = "null_as_default")]
    pub log_index: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub transaction_hash: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: String,
    pub topic0: Option<String>,
    pub topic1: Option<String>,
    pub topic2: Option<String>,
    pub topic3: Option<String>,
}

/// ABI-decoded input of the call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodedCall {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub signature: String,
    #[serde(deserialize_with = "null_as_default")]
    pub params: Vec<DecodedParam>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodedParam {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    pub value: Value,
}

/// Reads JSON `null` as the type's default, like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Optional query parameters of the endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletHistoryQuery {
    pub chain: Option<String>,
    pub from_block: Option<u64>,
    pub to_block: Option<u64>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
    pub disable_total: Option<bool>,
}

/// Builds the wallet-history call for one address
pub struct WalletHistory;

impl WalletHistory {
    /// Relative path of the endpoint
    pub fn path(address: &str) -> String {
        format!("wallets/{address}/history")
    }

    /// `GET wallets/{address}/history` with the context's API key
    pub fn request(context: &ScenarioContext, address: &str, query: &WalletHistoryQuery) -> HttpRequest {
        let options = RequestOptions::new()
            .header("X-API-Key", context.api_key.as_str())
            .header("Accept", "application/json")
            .query("chain", query.chain.as_deref().filter(|chain| !chain.is_empty()))
            .query("from_block", query.from_block)
            .query("to_block", query.to_block)
            .query("from_date", query.from_date.as_deref().filter(|date| !date.is_empty()))
            .query("to_date", query.to_date.as_deref().filter(|date| !date.is_empty()))
            .query("cursor", query.cursor.as_deref().filter(|cursor| !cursor.is_empty()))
            .query("limit", query.limit)
            .query("disable_total", query.disable_total);

        HttpRequest::get(Self::path(address), options)
    }
}
