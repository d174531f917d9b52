use cucumber::World;
use moralis_test_utils::context::keys;
use moralis_test_utils::models::{Transaction, WalletHistoryResponse};
use moralis_test_utils::{HarnessConfig, HarnessError, HarnessResult, ScenarioContext, SchemaRegistry};
use once_cell::sync::OnceCell;
use std::time::Instant;

static HARNESS: OnceCell<Harness> = OnceCell::new();

/// Process-wide state every scenario is built from.
///
/// Installed once before the runner starts and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Harness {
    pub config: HarnessConfig,
    pub http: reqwest::Client,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> HarnessResult<Self> {
        let http = config.http_client()?;
        Ok(Self { config, http })
    }

    /// Make this the harness worlds are created from.
    ///
    /// Returns `false` when one was already installed; the first one wins.
    pub fn install(self) -> bool {
        HARNESS.set(self).is_ok()
    }

    /// The installed harness, falling back to the environment when `run`
    /// was bypassed
    pub fn global() -> &'static Harness {
        HARNESS.get_or_init(|| {
            let config = HarnessConfig::load();
            let http = config.http_client().unwrap_or_else(|e| {
                tracing::warn!("{}; using a client without timeout", e);
                reqwest::Client::new()
            });
            Harness { config, http }
        })
    }
}

/// World for wallet-history scenarios
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct MoralisWorld {
    pub ctx: ScenarioContext,
    pub schemas: SchemaRegistry,
    pub started: Option<Instant>,
}

impl MoralisWorld {
    pub fn new() -> Self {
        Self::from_harness(Harness::global())
    }

    pub fn from_harness(harness: &Harness) -> Self {
        Self {
            ctx: ScenarioContext::new(&harness.config, harness.http.clone()),
            schemas: SchemaRegistry::new(harness.config.schema_dir.clone()),
            started: None,
        }
    }

    /// World built from an explicit configuration, bypassing the global harness
    pub fn with_config(config: &HarnessConfig) -> Self {
        Self {
            ctx: ScenarioContext::new(config, reqwest::Client::new()),
            schemas: SchemaRegistry::new(config.schema_dir.clone()),
            started: None,
        }
    }

    /// The last body read as a wallet-history page
    pub fn page(&self) -> HarnessResult<WalletHistoryResponse> {
        WalletHistoryResponse::from_body(self.ctx.require_body()?)
    }

    /// Transactions of the last page; absent list reads as empty
    pub fn transactions(&self) -> HarnessResult<Vec<Transaction>> {
        Ok(self.page()?.result.unwrap_or_default())
    }

    /// Transaction saved by the "store the first transaction" step
    pub fn stored_transaction(&self) -> HarnessResult<Transaction> {
        self.ctx.note_as::<Transaction>(keys::FIRST_TRANSACTION).ok_or_else(|| {
            HarnessError::missing(
                "No transaction stored. Please run 'I should store the first transaction for validation' first.",
            )
        })
    }

    /// Seconds since the before-scenario hook ran
    pub fn elapsed_secs(&self) -> f64 {
        self.started.map_or(0.0, |started| started.elapsed().as_secs_f64())
    }
}

impl Default for MoralisWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn world() -> MoralisWorld {
        MoralisWorld::with_config(&HarnessConfig::default().with_api_key("key"))
    }

    #[test]
    fn fresh_world_has_no_response() {
        let world = world();
        assert!(matches!(world.page(), Err(HarnessError::MissingPrecondition(_))));
        assert!(world.elapsed_secs() == 0.0);
    }

    #[test]
    fn stored_transaction_requires_the_store_step() {
        let mut world = world();
        let err = world.stored_transaction().unwrap_err();
        assert!(err.to_string().starts_with("No transaction stored."));

        world
            .ctx
            .set_note(
                keys::FIRST_TRANSACTION,
                Transaction {
                    hash: "0x1".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(world.stored_transaction().unwrap().hash, "0x1");
    }

    #[test]
    fn transactions_read_from_the_body() {
        let mut world = world();
        world.ctx.response_body = Some(json!({"result": [{"hash": "0xa"}, {"hash": "0xb"}]}));
        let hashes: Vec<_> = world
            .transactions()
            .unwrap()
            .into_iter()
            .map(|tx| tx.hash)
            .collect();
        assert_eq!(hashes, vec!["0xa", "0xb"]);

        world.ctx.response_body = Some(json!({"message": "oops"}));
        assert!(world.transactions().unwrap().is_empty());
    }
}
