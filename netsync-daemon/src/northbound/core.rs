//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use derive_new::new;
use netsync_northbound as northbound;
use netsync_northbound::configuration::{CommitPhase, ConfigChange};
use netsync_northbound::{
    CallbackKey, CallbackOp, NbDaemonSender, api as papi,
};
use netsync_utils::Database;
use netsync_utils::ibus;
use netsync_utils::task::Task;
use netsync_utils::yang::SchemaNodeExt;
use netsync_yang::YANG_CTX;
use pickledb::PickleDb;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{Receiver, WeakSender};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument, trace, warn};
use yang4::data::{
    Data, DataDiffFlags, DataFormat, DataParserFlags, DataPrinterFlags,
    DataTree, DataValidationFlags,
};

use crate::config::Config;
use crate::northbound::client::{api as capi, listener};
use crate::northbound::{Error, Result, db, yang};

pub struct Northbound {
    // YANG-modeled running configuration.
    running_config: Arc<DataTree<'static>>,
    // Non-volatile storage.
    db: Database,
    // Callback keys from the data providers.
    callbacks: BTreeMap<CallbackKey, WeakSender<papi::daemon::Request>>,
    // List of management interfaces.
    clients: Vec<Task<()>>,
    // List of data providers.
    providers: Vec<NbDaemonSender>,
    // Channel used to receive messages from the external clients.
    rx_clients: Receiver<capi::client::Request>,
}

#[derive(Debug, new)]
#[derive(Deserialize, Serialize)]
pub struct Transaction {
    // Unique identifier for the transaction.
    #[new(default)]
    pub id: u32,

    // Date and time for when the transaction occurred.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date: DateTime<Utc>,

    // Optional comment for the transaction.
    pub comment: String,

    // Configuration that was committed.
    #[serde(with = "netsync_yang::serde::data_tree")]
    pub configuration: DataTree<'static>,
}

// ===== impl Northbound =====

impl Northbound {
    pub(crate) async fn init(config: &Config, db: PickleDb) -> Northbound {
        let db = Arc::new(Mutex::new(db));

        // Create global YANG context.
        yang::create_context();
        let yang_ctx = YANG_CTX.get().unwrap();

        // Create empty running configuration.
        let running_config = Arc::new(DataTree::new(yang_ctx));

        // Start provider tasks (interfaces and routing).
        let providers = start_providers();

        // Load callbacks keys from data providers and check for missing
        // callbacks.
        let callbacks = load_callbacks(&providers).await;
        validate_callbacks(&callbacks);

        let (client_tx, rx_clients) = mpsc::channel(4);
        let mut nb = Northbound {
            running_config,
            db,
            callbacks,
            clients: Vec::new(),
            providers,
            rx_clients,
        };

        // Commit the startup configuration. The first transaction in the
        // rollback log is always the startup snapshot, so clients can restore
        // it later with a `Replace` commit.
        nb.commit_startup_config(config).await;

        // The daemon is synchronized with the kernel at this point. Only now
        // start accepting client connections.
        let client = listener::start(config.socket_path.clone(), client_tx);
        nb.clients.push(client);
        info!("ready to accept client connections");

        nb
    }

    // Main event loop.
    #[instrument(skip_all, name = "northbound")]
    pub(crate) async fn run(mut self: Northbound, mut signal_rx: Receiver<()>) {
        loop {
            tokio::select! {
                Some(request) = self.rx_clients.recv() => {
                    self.process_client_msg(request).await;
                }
                _ = signal_rx.recv() => {
                    // Stop accepting new requests and tear down the providers.
                    // Kernel state is left as-is.
                    self.rx_clients.close();
                    self.clients.clear();
                    self.providers.clear();
                    return;
                }
                else => return,
            }
        }
    }

    // Loads and commits the startup configuration.
    //
    // The configuration file takes precedence. When it's absent, the most
    // recent transaction from the rollback log is reapplied, so that
    // configuration metadata with no kernel counterpart (e.g. interface
    // descriptions) survives daemon restarts.
    async fn commit_startup_config(&mut self, config: &Config) {
        let candidate = match std::fs::read_to_string(
            &config.startup_config_path,
        ) {
            Ok(config_str) => {
                let yang_ctx = YANG_CTX.get().unwrap();
                match DataTree::parse_string(
                    yang_ctx,
                    &config_str,
                    DataFormat::JSON,
                    DataParserFlags::NO_VALIDATION,
                    DataValidationFlags::NO_STATE,
                ) {
                    Ok(candidate) => Some(candidate),
                    Err(error) => {
                        error!(%error, "failed to parse startup configuration");
                        None
                    }
                }
            }
            Err(error) => {
                debug!(%error, "no startup configuration file");
                let db = self.db.lock().unwrap();
                db::transaction_get_all(&db)
                    .pop()
                    .map(|transaction| transaction.configuration)
            }
        };

        if let Some(candidate) = candidate {
            let comment = "Startup configuration".to_owned();
            if let Err(error) =
                self.create_transaction(candidate, comment).await
            {
                error!(%error, "failed to commit startup configuration");
            }
        }
    }

    // Processes a message received from an external client.
    async fn process_client_msg(&mut self, request: capi::client::Request) {
        trace!(?request, "received client request");

        match request {
            capi::client::Request::Get(request) => {
                let response = self
                    .process_client_get(request.data_type, request.path)
                    .await;
                if let Some(responder) = request.responder {
                    let _ = responder.send(response);
                }
            }
            capi::client::Request::Commit(request) => {
                let response = self
                    .process_client_commit(request.config, request.comment)
                    .await;
                if let Err(error) = &response {
                    warn!(%error, "commit failed");
                }
                if let Some(responder) = request.responder {
                    let _ = responder.send(response);
                }
            }
            capi::client::Request::ListTransactions(request) => {
                let response = self.process_client_list_transactions().await;
                if let Some(responder) = request.responder {
                    let _ = responder.send(response);
                }
            }
            capi::client::Request::GetTransaction(request) => {
                let response = self
                    .process_client_get_transaction(request.transaction_id)
                    .await;
                if let Some(responder) = request.responder {
                    let _ = responder.send(response);
                }
            }
        }
    }

    // Processes a `Get` message received from an external client.
    async fn process_client_get(
        &self,
        data_type: capi::DataType,
        path: Option<String>,
    ) -> Result<capi::client::GetResponse> {
        let path = path.as_deref();
        let dtree = match data_type {
            capi::DataType::State => self.get_state(path).await?,
            capi::DataType::Configuration => self.get_configuration(path)?,
            capi::DataType::All => {
                let mut dtree_state = self.get_state(path).await?;
                let dtree_config = self.get_configuration(path)?;
                dtree_state
                    .merge(&dtree_config)
                    .map_err(Error::YangInternal)?;
                dtree_state
            }
        };

        Ok(capi::client::GetResponse { dtree })
    }

    // Processes a `Commit` message received from an external client.
    async fn process_client_commit(
        &mut self,
        config: capi::CommitConfiguration,
        comment: String,
    ) -> Result<capi::client::CommitResponse> {
        // Handle different commit operations.
        let candidate = match config {
            capi::CommitConfiguration::Merge(config) => {
                let mut candidate = self
                    .running_config
                    .duplicate()
                    .map_err(Error::YangInternal)?;
                candidate.merge(&config).map_err(Error::YangInternal)?;
                candidate
            }
            capi::CommitConfiguration::Replace(config) => config,
        };

        // Create configuration transaction.
        let transaction_id =
            self.create_transaction(candidate, comment).await?;
        Ok(capi::client::CommitResponse { transaction_id })
    }

    // Processes a `ListTransactions` message received from an external client.
    async fn process_client_list_transactions(
        &mut self,
    ) -> Result<capi::client::ListTransactionsResponse> {
        let db = self.db.lock().unwrap();
        let transactions = db::transaction_get_all(&db);
        Ok(capi::client::ListTransactionsResponse { transactions })
    }

    // Processes a `GetTransaction` message received from an external client.
    async fn process_client_get_transaction(
        &mut self,
        transaction_id: u32,
    ) -> Result<capi::client::GetTransactionResponse> {
        let db = self.db.lock().unwrap();
        let transaction = db::transaction_get(&db, transaction_id)
            .ok_or(Error::TransactionIdNotFound(transaction_id))?;
        Ok(capi::client::GetTransactionResponse {
            dtree: transaction.configuration,
        })
    }

    // Creates a configuration transaction using a two-phase commit protocol. In
    // case of success, the transaction ID is returned.
    //
    // A transaction fails if the candidate configuration fails to be
    // validated, or if any provider rejects it during the Prepare phase. In
    // both cases no kernel operation has been performed yet. Kernel errors
    // during the Apply phase don't fail the transaction: they are logged and
    // the new configuration is recorded regardless.
    async fn create_transaction(
        &mut self,
        candidate: DataTree<'static>,
        comment: String,
    ) -> Result<u32> {
        let candidate = Arc::new(candidate);

        // Validate the candidate configuration.
        self.validate_notify(&candidate)
            .await
            .map_err(Error::TransactionValidation)?;

        // Compute diff between the running config and the candidate config.
        let diff = self
            .running_config
            .diff(&candidate, DataDiffFlags::DEFAULTS)
            .map_err(Error::YangInternal)?;

        // Check if the configuration has changed.
        if diff.iter().next().is_none() {
            return Ok(0);
        }

        // Get list of configuration changes.
        let changes = northbound::configuration::changes_from_diff(&diff);

        // Log configuration transaction.
        let changes_json = diff
            .print_string(DataFormat::JSON, DataPrinterFlags::WITH_SIBLINGS)
            .map_err(Error::YangInternal)?;
        debug!(changes = %changes_json, "configuration transaction");

        // Phase 1: validate configuration and attempt to prepare resources for
        // the transaction.
        match self
            .commit_phase_notify(CommitPhase::Prepare, &candidate, &changes)
            .await
        {
            Ok(_) => {
                // Phase 2: apply the configuration changes.
                let _ = self
                    .commit_phase_notify(
                        CommitPhase::Apply,
                        &candidate,
                        &changes,
                    )
                    .await;

                // Update the running configuration.
                let running_config =
                    Arc::get_mut(&mut self.running_config).unwrap();
                running_config
                    .diff_apply(&diff)
                    .map_err(Error::YangInternal)?;
                running_config
                    .validate(DataValidationFlags::NO_STATE)
                    .map_err(Error::YangInternal)?;

                // Create transaction structure.
                let candidate = Arc::try_unwrap(candidate).unwrap();
                let mut transaction =
                    Transaction::new(Utc::now(), comment, candidate);

                // Record transaction.
                let mut db = self.db.lock().unwrap();
                db::transaction_record(&mut db, &mut transaction);

                Ok(transaction.id)
            }
            Err(error) => {
                // Phase 2: abort the configuration changes.
                let _ = self
                    .commit_phase_notify(
                        CommitPhase::Abort,
                        &candidate,
                        &changes,
                    )
                    .await;

                Err(Error::TransactionPreparation(error))
            }
        }
    }

    // Request all data providers to validate the candidate configuration.
    async fn validate_notify(
        &mut self,
        candidate: &Arc<DataTree<'static>>,
    ) -> std::result::Result<(), northbound::error::Error> {
        let mut handles = Vec::new();

        // Spawn one task per data provider.
        for daemon_tx in self.providers.iter() {
            // Prepare request.
            let (responder_tx, responder_rx) = oneshot::channel();
            let request = papi::daemon::Request::Validate(
                papi::daemon::ValidateRequest {
                    config: candidate.clone(),
                    responder: Some(responder_tx),
                },
            );

            // Spawn task to send the request and receive the response.
            let daemon_tx = daemon_tx.clone();
            let handle = tokio::spawn(async move {
                daemon_tx.send(request).await.unwrap();
                responder_rx.await.unwrap()
            });
            handles.push(handle);
        }
        // Wait for all tasks to complete.
        for handle in handles {
            handle.await.unwrap()?;
        }

        Ok(())
    }

    // Notifies all data providers of the configuration changes associated to an
    // on-going transaction.
    async fn commit_phase_notify(
        &mut self,
        phase: CommitPhase,
        candidate: &Arc<DataTree<'static>>,
        changes: &[ConfigChange],
    ) -> std::result::Result<(), northbound::error::Error> {
        for daemon_tx in self.providers.iter() {
            // Batch all changes that should be sent to this provider.
            let changes = changes
                .iter()
                .filter(|(cb_key, _)| {
                    if let Some(tx) = self.callbacks.get(cb_key) {
                        tx.upgrade().unwrap().same_channel(daemon_tx)
                    } else {
                        false
                    }
                })
                .cloned()
                .collect();

            // Prepare request.
            let (responder_tx, responder_rx) = oneshot::channel();
            let request =
                papi::daemon::Request::Commit(papi::daemon::CommitRequest {
                    phase,
                    old_config: self.running_config.clone(),
                    new_config: candidate.clone(),
                    changes,
                    responder: Some(responder_tx),
                });

            // Spawn task to send the request and receive the response.
            let daemon_tx = daemon_tx.clone();
            let handle = tokio::spawn(async move {
                daemon_tx.send(request).await.unwrap();
                responder_rx.await.unwrap()
            });

            // Wait for task to complete.
            handle.await.unwrap()?;
        }

        Ok(())
    }

    // Gets a full or partial copy of the running configuration.
    fn get_configuration(
        &self,
        path: Option<&str>,
    ) -> Result<DataTree<'static>> {
        match path {
            Some(path) => {
                let yang_ctx = YANG_CTX.get().unwrap();
                let mut dtree = DataTree::new(yang_ctx);
                for dnode in self
                    .running_config
                    .find_xpath(path)
                    .map_err(Error::YangInvalidPath)?
                {
                    let subtree =
                        dnode.duplicate(true).map_err(Error::YangInternal)?;
                    dtree.merge(&subtree).map_err(Error::YangInternal)?;
                }
                Ok(dtree)
            }
            None => {
                self.running_config.duplicate().map_err(Error::YangInternal)
            }
        }
    }

    // Gets dynamically generated operational data for the provided path. The
    // request might span multiple data providers.
    async fn get_state(&self, path: Option<&str>) -> Result<DataTree<'static>> {
        let yang_ctx = YANG_CTX.get().unwrap();
        let mut dtree = DataTree::new(yang_ctx);

        for daemon_tx in self.providers.iter() {
            // Prepare request.
            let (responder_tx, responder_rx) = oneshot::channel();
            let request =
                papi::daemon::Request::Get(papi::daemon::GetRequest {
                    path: path.map(String::from),
                    responder: Some(responder_tx),
                });
            daemon_tx.send(request).await.unwrap();

            // Receive response.
            let response = responder_rx.await.unwrap().map_err(Error::Get)?;

            // Combine all responses into a single data tree.
            dtree.merge(&response.data).map_err(Error::YangInternal)?;
        }

        Ok(dtree)
    }
}

// ===== helper functions =====

// Starts base data providers.
fn start_providers() -> Vec<NbDaemonSender> {
    let mut providers = Vec::new();
    let (ibus_tx, ibus_rx) = ibus::ibus_channels();

    // Start netsync-interface.
    let daemon_tx = netsync_interface::start(ibus_tx);
    providers.push(daemon_tx);

    // Start netsync-routing.
    let daemon_tx = netsync_routing::start(ibus_rx);
    providers.push(daemon_tx);

    providers
}

// Loads all YANG callback keys from the data providers.
async fn load_callbacks(
    providers: &[NbDaemonSender],
) -> BTreeMap<CallbackKey, WeakSender<papi::daemon::Request>> {
    let mut callbacks = BTreeMap::new();

    for provider_tx in providers.iter() {
        // Prepare request.
        let (responder_tx, responder_rx) = oneshot::channel();
        let request = papi::daemon::Request::GetCallbacks(
            papi::daemon::GetCallbacksRequest {
                responder: Some(responder_tx),
            },
        );
        provider_tx.send(request).await.unwrap();

        // Receive response.
        let provider_response = responder_rx.await.unwrap();

        // Validate and store callback key.
        for cb_key in provider_response.callbacks {
            validate_callback(&cb_key);
            callbacks.insert(cb_key, provider_tx.downgrade());
        }
    }

    callbacks
}

// Checks for missing YANG callbacks.
fn validate_callbacks(
    callbacks: &BTreeMap<CallbackKey, WeakSender<papi::daemon::Request>>,
) {
    let yang_ctx = YANG_CTX.get().unwrap();
    let mut errors: usize = 0;

    for snode in yang_ctx
        .traverse()
        .filter(|snode| snode.module().is_implemented())
        .filter(|snode| snode.is_status_current())
    {
        for operation in [
            CallbackOp::Create,
            CallbackOp::Modify,
            CallbackOp::Delete,
            CallbackOp::Lookup,
            CallbackOp::GetIterate,
            CallbackOp::GetObject,
        ] {
            let path = snode.data_path();
            if operation.is_valid(&snode) {
                let cb_key = CallbackKey::new(path.clone(), operation);
                if callbacks.get(&cb_key).is_none() {
                    error!(?operation, path = %cb_key.path, "missing callback");
                    errors += 1;
                }
            }
        }
    }

    if errors > 0 {
        error!(%errors, "failed to validate northbound callbacks");
        std::process::exit(1);
    }
}

// Checks whether the callback key is valid.
fn validate_callback(callback: &CallbackKey) {
    let yang_ctx = YANG_CTX.get().unwrap();

    if let Ok(snode) = yang_ctx.find_path(&callback.path)
        && !callback.operation.is_valid(&snode)
    {
        error!(xpath = %callback.path, operation = ?callback.operation,
            "invalid callback",
        );
        std::process::exit(1);
    }
}
