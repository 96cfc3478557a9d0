use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, UnboundedSender};

use linedis::codec::LineCodecError;
use linedis::connection::Connection;
use linedis::frame::Frame;

async fn create_tcp_connection(
    max_line_length: usize,
) -> Result<(UnboundedSender<Vec<u8>>, Connection, OwnedReadHalf), std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let local_addr = listener.local_addr()?;

    let client = TcpStream::connect(local_addr).await?;
    let (socket, _) = listener.accept().await?;
    let connection = Connection::new(socket, max_line_length);

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    let (replies, mut writer) = client.into_split();

    tokio::spawn(async move {
        while let Some(data) = rx.recv().await {
            // Write the received channel data to the socket.
            if writer.write_all(&data).await.is_err() {
                break;
            }
        }
        // Dropping the write half shuts down the client's side of the stream.
    });

    Ok((tx, connection, replies))
}

#[tokio::test]
async fn test_read_single_line() {
    let (tx, mut connection, _replies) = create_tcp_connection(1024).await.unwrap();

    tx.send(b"GET a\n".to_vec()).unwrap();

    let actual = connection.read_line().await.unwrap();
    assert_eq!(actual, Some(Bytes::from("GET a")));
}

#[tokio::test]
async fn test_read_multiple_lines_sequentially() {
    let (tx, mut connection, _replies) = create_tcp_connection(1024).await.unwrap();

    tx.send(b"SET a 10\nINCR a\n".to_vec()).unwrap();
    tx.send(b"DEL a\n".to_vec()).unwrap();

    assert_eq!(connection.read_line().await.unwrap(), Some(Bytes::from("SET a 10")));
    assert_eq!(connection.read_line().await.unwrap(), Some(Bytes::from("INCR a")));
    assert_eq!(connection.read_line().await.unwrap(), Some(Bytes::from("DEL a")));
}

#[tokio::test]
async fn test_read_incomplete_line() {
    let (tx, mut connection, _replies) = create_tcp_connection(1024).await.unwrap();

    // Line split into three parts to simulate partial data arriving.
    let part1 = b"SET my";
    let part2 = b"key my";
    let part3 = b"value\n";

    tokio::spawn(async move {
        let parts = vec![part1.to_vec(), part2.to_vec(), part3.to_vec()];
        for part in parts {
            tx.send(part).unwrap();
            // Simulate a delay in sending/receiving the data.
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        }
    });

    let actual = connection.read_line().await.unwrap();
    assert_eq!(actual, Some(Bytes::from("SET mykey myvalue")));
}

#[tokio::test]
async fn test_read_after_client_closed() {
    let (tx, mut connection, _replies) = create_tcp_connection(1024).await.unwrap();

    tx.send(b"GET a\nGET b".to_vec()).unwrap();
    drop(tx);

    assert_eq!(connection.read_line().await.unwrap(), Some(Bytes::from("GET a")));
    // The unterminated trailing line is discarded.
    assert_eq!(connection.read_line().await.unwrap(), None);
}

#[tokio::test]
async fn test_read_non_utf8_line() {
    let (tx, mut connection, _replies) = create_tcp_connection(1024).await.unwrap();

    tx.send(b"GET \xff\nGET \xfe\n".to_vec()).unwrap();

    let first = connection.read_line().await.unwrap().unwrap();
    let second = connection.read_line().await.unwrap().unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_read_line_too_long() {
    let (tx, mut connection, _replies) = create_tcp_connection(16).await.unwrap();

    tx.send(b"SET key a-value-longer-than-sixteen-bytes\n".to_vec())
        .unwrap();

    let err = connection.read_line().await.unwrap_err();
    assert!(matches!(err, LineCodecError::LineTooLong(16)));
}

#[tokio::test]
async fn test_write_frames() {
    let (_tx, mut connection, mut replies) = create_tcp_connection(1024).await.unwrap();

    connection.write_frame(Frame::ok()).await.unwrap();
    connection
        .write_frame(Frame::Simple(String::new()))
        .await
        .unwrap();
    connection
        .write_frame(Frame::Error("unknown command".to_string()))
        .await
        .unwrap();
    drop(connection);

    let mut received = Vec::new();
    replies.read_to_end(&mut received).await.unwrap();

    assert_eq!(received, b"OK\n\nERR unknown command\n".to_vec());
}
