//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::io::{Error, ErrorKind};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

// Maximum accepted size of a single IPC message.
pub const IPC_MAX_SIZE: usize = 1024 * 1024 * 10;

// Sends a length-prefixed JSON message over the stream.
pub async fn send<T>(stream: &mut UnixStream, data: &T) -> Result<(), Error>
where
    T: Serialize,
{
    let data = serde_json::to_vec(data)
        .map_err(|error| Error::new(ErrorKind::InvalidData, error))?;
    if data.len() > IPC_MAX_SIZE {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("message too large: {} bytes", data.len()),
        ));
    }

    stream.write_all(&data.len().to_ne_bytes()).await?;
    stream.write_all(&data).await?;
    stream.flush().await?;
    Ok(())
}

// Receives a length-prefixed JSON message from the stream.
pub async fn recv<T>(stream: &mut UnixStream) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let mut size_bytes = [0u8; size_of::<usize>()];
    stream.read_exact(&mut size_bytes).await?;
    let size = usize::from_ne_bytes(size_bytes);
    if size > IPC_MAX_SIZE {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("message too large: {size} bytes"),
        ));
    }

    let mut buffer = vec![0u8; size];
    stream.read_exact(&mut buffer).await?;
    serde_json::from_slice(&buffer)
        .map_err(|error| Error::new(ErrorKind::InvalidData, error))
}

// ===== tests =====

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq, Serialize)]
    struct Message {
        seq: u32,
        payload: String,
    }

    #[tokio::test]
    async fn message_roundtrip() {
        let (mut tx, mut rx) = UnixStream::pair().unwrap();

        let sent = Message {
            seq: 1,
            payload: "hello".to_owned(),
        };
        send(&mut tx, &sent).await.unwrap();
        let received: Message = recv(&mut rx).await.unwrap();
        assert_eq!(received, sent);
    }

    #[tokio::test]
    async fn multiple_messages_in_order() {
        let (mut tx, mut rx) = UnixStream::pair().unwrap();

        for seq in 0..3 {
            let sent = Message {
                seq,
                payload: format!("message {seq}"),
            };
            send(&mut tx, &sent).await.unwrap();
        }
        for seq in 0..3 {
            let received: Message = recv(&mut rx).await.unwrap();
            assert_eq!(received.seq, seq);
        }
    }

    #[tokio::test]
    async fn oversized_message_rejected() {
        let (mut tx, mut rx) = UnixStream::pair().unwrap();

        let size = IPC_MAX_SIZE + 1;
        tx.write_all(&size.to_ne_bytes()).await.unwrap();
        let result = recv::<Message>(&mut rx).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn closed_stream() {
        let (tx, mut rx) = UnixStream::pair().unwrap();

        drop(tx);
        let result = recv::<Message>(&mut rx).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::UnexpectedEof);
    }
}
