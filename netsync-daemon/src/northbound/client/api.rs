//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use netsync_utils::Responder;
use serde::{Deserialize, Serialize};
use yang4::data::DataTree;

use crate::northbound::Result;
use crate::northbound::core::Transaction;

// External client -> Daemon requests.
//
// Requests and responses are exchanged over a Unix stream socket as
// length-prefixed JSON messages. The responder channels exist only on the
// daemon side and are never put on the wire.
pub mod client {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub enum Request {
        // Request to get data (configuration, state or both).
        Get(GetRequest),
        // Request to change the running configuration.
        Commit(CommitRequest),
        // Request to get the list of transactions recorded in the rollback
        // log.
        ListTransactions(ListTransactionsRequest),
        // Request to retrieve configuration data from the rollback log.
        GetTransaction(GetTransactionRequest),
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub enum Response {
        Get(GetResponse),
        Commit(CommitResponse),
        ListTransactions(ListTransactionsResponse),
        GetTransaction(GetTransactionResponse),
        // Request failed; carries a human-readable description of the error.
        Error(String),
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct GetRequest {
        pub data_type: DataType,
        pub path: Option<String>,
        #[serde(skip)]
        pub responder: Option<Responder<Result<GetResponse>>>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct GetResponse {
        #[serde(with = "netsync_yang::serde::data_tree")]
        pub dtree: DataTree<'static>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct CommitRequest {
        pub config: CommitConfiguration,
        pub comment: String,
        #[serde(skip)]
        pub responder: Option<Responder<Result<CommitResponse>>>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct CommitResponse {
        pub transaction_id: u32,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct ListTransactionsRequest {
        #[serde(skip)]
        pub responder: Option<Responder<Result<ListTransactionsResponse>>>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct ListTransactionsResponse {
        pub transactions: Vec<Transaction>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct GetTransactionRequest {
        pub transaction_id: u32,
        #[serde(skip)]
        pub responder: Option<Responder<Result<GetTransactionResponse>>>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct GetTransactionResponse {
        #[serde(with = "netsync_yang::serde::data_tree")]
        pub dtree: DataTree<'static>,
    }

    // ===== impl Request =====

    impl std::fmt::Display for Request {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Request::Get(_) => write!(f, "Get"),
                Request::Commit(_) => write!(f, "Commit"),
                Request::ListTransactions(_) => write!(f, "ListTransactions"),
                Request::GetTransaction(_) => write!(f, "GetTransaction"),
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum DataType {
    All,
    Configuration,
    State,
}

#[derive(Debug, Deserialize, Serialize)]
pub enum CommitConfiguration {
    Merge(#[serde(with = "netsync_yang::serde::data_tree")] DataTree<'static>),
    Replace(
        #[serde(with = "netsync_yang::serde::data_tree")] DataTree<'static>,
    ),
}
