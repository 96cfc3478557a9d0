use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use uuid::Uuid;

use crate::codec::{LineCodec, LineCodecError};
use crate::frame::Frame;

/// One client session's transport: request lines in, reply frames out.
pub struct Connection {
    pub id: Uuid,
    // Bytes read from the socket are buffered until a full line is available.
    framed: Framed<TcpStream, LineCodec>,
}

impl Connection {
    pub fn new(stream: TcpStream, max_line_length: usize) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            framed: Framed::new(stream, LineCodec::new(max_line_length)),
        }
    }

    /// Reads the next request line, without its terminator. Returns `None` once the client has
    /// closed the connection.
    pub async fn read_line(&mut self) -> Result<Option<Bytes>, LineCodecError> {
        self.framed.next().await.transpose()
    }

    /// Writes `frame` and flushes it to the socket.
    pub async fn write_frame(&mut self, frame: Frame) -> Result<(), LineCodecError> {
        self.framed.send(frame).await
    }
}
