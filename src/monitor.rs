//! ## Monitor Feed
//!
//! A read-only TCP feed of fleet snapshots for external dashboards. Every
//! connected client gets the current snapshot on connect and a fresh frame
//! whenever the engine publishes a change; frames are bincode, prefixed
//! with a big-endian `u32` length.
//!
//! A client that stops reading or drops its socket only ends its own task;
//! the listener and the other clients keep running.

use std::net::ToSocketAddrs;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

use crate::config;
use crate::error::LiftError;
use crate::fleet::serial;
use crate::fleet::CarState;
use crate::print;

/// Accepts monitor clients forever, one feed task per client.
///
/// # Parameters
/// - `fleet_watch_rx`: The engine's snapshot feed; each client task clones
///   its own receiver.
///
/// # Behavior
/// - Binds the configured monitor address with address reuse, so a fast
///   restart does not trip over a socket in TIME_WAIT.
/// - Returns only if the listener itself fails.
pub async fn start(fleet_watch_rx: watch::Receiver<Vec<CarState>>) -> Result<(), LiftError> {
    let listener = create_reusable_listener(config::MONITOR_BIND_ADDR, config::MONITOR_PORT)?;
    print::info(format!(
        "Monitor feed listening on {}:{}",
        config::MONITOR_BIND_ADDR,
        config::MONITOR_PORT
    ));

    loop {
        let (stream, addr) = listener.accept().await?;
        print::info(format!("Monitor client connected: {}", addr));

        let rx = fleet_watch_rx.clone();
        tokio::spawn(async move {
            if let Err(e) = feed_client(stream, rx).await {
                print::warn(format!("Monitor client {} dropped: {}", addr, e));
            }
        });
    }
}

/// Streams snapshot frames to one client: the current fleet immediately,
/// then one frame per published change. Ends cleanly when the engine side
/// of the watch channel goes away.
async fn feed_client(
    mut stream: TcpStream,
    mut rx: watch::Receiver<Vec<CarState>>,
) -> Result<(), LiftError> {
    loop {
        let fleet = rx.borrow().clone();
        let frame = serial::serialize_fleet(&fleet)?;
        stream.write_all(&(frame.len() as u32).to_be_bytes()).await?;
        stream.write_all(&frame).await?;

        if rx.changed().await.is_err() {
            return Ok(());
        }
    }
}

/// Creates a non-blocking TCP listener on the specified address and port,
/// with address reuse enabled.
///
/// # Parameters
/// - `bind`: The address to bind to.
/// - `port`: The TCP port number to bind to; `0` picks a free port.
///
/// # Returns
/// A `TcpListener` ready for accepting incoming connections.
fn create_reusable_listener(bind: &str, port: u16) -> Result<TcpListener, LiftError> {
    let addr_str = format!("{}:{}", bind, port);
    let addr = addr_str
        .to_socket_addrs()?
        .find(|a| a.is_ipv4())
        .ok_or_else(|| {
            LiftError::Io(std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                format!("no IPv4 address for {}", addr_str),
            ))
        })?;

    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_nonblocking(true)?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;
    Ok(TcpListener::from_std(socket.into())?)
}
