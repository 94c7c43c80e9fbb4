//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::io::ErrorKind;
use std::path::Path;

use netsync_utils::Sender;
use netsync_utils::ipc;
use netsync_utils::task::Task;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::northbound::client::api::client::{Request, Response};

// Starts the Unix-socket listener task.
pub(crate) fn start(
    socket_path: String,
    daemon_tx: Sender<Request>,
) -> Task<()> {
    Task::spawn(async move {
        // Remove the stale socket file left over from a previous run.
        if Path::new(&socket_path).exists()
            && let Err(error) = std::fs::remove_file(&socket_path)
        {
            error!(%socket_path, %error, "failed to remove stale socket file");
            return;
        }

        let listener = match UnixListener::bind(&socket_path) {
            Ok(listener) => listener,
            Err(error) => {
                error!(%socket_path, %error, "failed to bind Unix socket");
                return;
            }
        };
        info!(%socket_path, "listening for client connections");

        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    debug!("accepted client connection");
                    let daemon_tx = daemon_tx.clone();
                    let mut task = Task::spawn(async move {
                        if let Err(error) =
                            handle_client(stream, daemon_tx).await
                            && error.kind() != ErrorKind::UnexpectedEof
                        {
                            warn!(%error, "client connection error");
                        }
                    });
                    task.detach();
                }
                Err(error) => {
                    error!(%error, "failed to accept client connection");
                }
            }
        }
    })
}

// Serves a single client connection. Requests are processed one at a time,
// in the order they arrive.
async fn handle_client(
    mut stream: UnixStream,
    daemon_tx: Sender<Request>,
) -> Result<(), std::io::Error> {
    loop {
        let request: Request = ipc::recv(&mut stream).await?;
        let response = dispatch(&daemon_tx, request).await;
        ipc::send(&mut stream, &response).await?;
    }
}

// Relays a client request to the daemon and awaits the response.
async fn dispatch(daemon_tx: &Sender<Request>, request: Request) -> Response {
    match request {
        Request::Get(mut request) => {
            let (responder_tx, responder_rx) = oneshot::channel();
            request.responder = Some(responder_tx);
            if daemon_tx.send(Request::Get(request)).await.is_err() {
                return response_daemon_unavailable();
            }
            match responder_rx.await {
                Ok(Ok(response)) => Response::Get(response),
                Ok(Err(error)) => Response::Error(error.to_string()),
                Err(_) => response_daemon_unavailable(),
            }
        }
        Request::Commit(mut request) => {
            let (responder_tx, responder_rx) = oneshot::channel();
            request.responder = Some(responder_tx);
            if daemon_tx.send(Request::Commit(request)).await.is_err() {
                return response_daemon_unavailable();
            }
            match responder_rx.await {
                Ok(Ok(response)) => Response::Commit(response),
                Ok(Err(error)) => Response::Error(error.to_string()),
                Err(_) => response_daemon_unavailable(),
            }
        }
        Request::ListTransactions(mut request) => {
            let (responder_tx, responder_rx) = oneshot::channel();
            request.responder = Some(responder_tx);
            if daemon_tx
                .send(Request::ListTransactions(request))
                .await
                .is_err()
            {
                return response_daemon_unavailable();
            }
            match responder_rx.await {
                Ok(Ok(response)) => Response::ListTransactions(response),
                Ok(Err(error)) => Response::Error(error.to_string()),
                Err(_) => response_daemon_unavailable(),
            }
        }
        Request::GetTransaction(mut request) => {
            let (responder_tx, responder_rx) = oneshot::channel();
            request.responder = Some(responder_tx);
            if daemon_tx
                .send(Request::GetTransaction(request))
                .await
                .is_err()
            {
                return response_daemon_unavailable();
            }
            match responder_rx.await {
                Ok(Ok(response)) => Response::GetTransaction(response),
                Ok(Err(error)) => Response::Error(error.to_string()),
                Err(_) => response_daemon_unavailable(),
            }
        }
    }
}

fn response_daemon_unavailable() -> Response {
    Response::Error("daemon is shutting down".to_owned())
}
