//! Network utilities for the proxy server.

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Create a TCP listener with SO_REUSEPORT enabled where the platform
/// supports it.
///
/// This lets a replacement process bind while the old one is still
/// draining, which is the edit-and-restart cycle this proxy lives in.
pub fn create_reusable_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_address(true)?;

    #[cfg(all(unix, not(any(target_os = "solaris", target_os = "illumos"))))]
    socket.set_reuse_port(true)?;

    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(1024)?; // Backlog size

    // Convert to tokio TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listener_binds_ephemeral_port() {
        let listener = create_reusable_listener(SocketAddr::from(([127, 0, 0, 1], 0))).unwrap();
        let addr = listener.local_addr().unwrap();
        assert_ne!(addr.port(), 0);
    }

    #[cfg(all(unix, not(any(target_os = "solaris", target_os = "illumos"))))]
    #[tokio::test]
    async fn test_two_listeners_can_share_an_address() {
        let first = create_reusable_listener(SocketAddr::from(([127, 0, 0, 1], 0))).unwrap();
        let addr = first.local_addr().unwrap();

        let second = create_reusable_listener(addr);
        assert!(second.is_ok());
    }
}
