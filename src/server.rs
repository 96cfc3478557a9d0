use std::future::{self, Future};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, instrument, warn};

use crate::commands::Input;
use crate::config::Config;
use crate::connection::Connection;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Binds the configured address and serves until Ctrl-C is received.
pub async fn run(config: Config) -> Result<(), Error> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;

    serve_until(listener, config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl-C handler: {}", e);
            future::pending::<()>().await;
        }
    })
    .await
}

/// Serves connections accepted from an already bound `listener`.
pub async fn serve(listener: TcpListener, config: Config) -> Result<(), Error> {
    serve_until(listener, config, future::pending()).await
}

/// Serves connections until `shutdown` completes. An accept failure stops the server with an
/// error; failures within a single connection only end that connection.
pub async fn serve_until<F>(
    listener: TcpListener,
    config: Config,
    shutdown: F,
) -> Result<(), Error>
where
    F: Future<Output = ()> + Send,
{
    // The store actor exists before the first connection is accepted, and only once.
    let store = Store::new(config.queue_capacity);

    info!("Server listening on {}", listener.local_addr()?);

    tokio::pin!(shutdown);

    loop {
        let (socket, client_address) = tokio::select! {
            _ = &mut shutdown => {
                info!("Shutting down, no longer accepting connections");
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    return Err(e.into());
                }
            },
        };

        let store = store.clone();
        let max_line_length = config.max_line_length;
        info!("Accepted connection from {:?}", client_address);

        tokio::spawn(async move {
            let res = handle_connection(socket, client_address, store, max_line_length).await;
            if let Err(e) = res {
                warn!("Connection closed with error: {}", e);
            }
        });
    }
}

#[instrument(
    name = "connection",
    skip(stream, store, max_line_length),
    fields(connection_id, client_address)
)]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    store: Store,
    max_line_length: usize,
) -> Result<(), Error> {
    let mut conn = Connection::new(stream, max_line_length);

    tracing::Span::current()
        .record("connection_id", conn.id.to_string())
        .record("client_address", client_address.to_string());

    while let Some(line) = conn.read_line().await? {
        debug!("Received line from client: {:?}", line);

        let res = match Input::try_from(&line[..]) {
            Ok(Input::Quit) => {
                info!("Client ended the session");
                return Ok(());
            }
            Ok(Input::Command(cmd)) => match store.execute(cmd).await {
                Ok(res) => res,
                Err(e) => {
                    // Answer the pending request before giving up on the session.
                    conn.write_frame(Frame::Error(e.to_string())).await?;
                    return Err(e.into());
                }
            },
            Err(e) => e.into(),
        };

        debug!("Sending reply to client: {:?}", res);
        conn.write_frame(res).await?;
    }

    info!("Connection closed");
    Ok(())
}
