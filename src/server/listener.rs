// Listener setup and port selection
// Creates the listening socket with socket2 and scans for the first free
// port in the configured window.

use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::TcpListener;

use crate::config::ServerConfig;

/// Bind the first available port in the configured scan window.
///
/// The first successful bind IS the final listener; there is no separate
/// probe-then-rebind step, so no other process can take the port in between.
/// Ports already in use are skipped; any other bind failure propagates
/// immediately. On exhaustion the returned error has kind `AddrInUse` and a
/// message naming the scanned range.
pub fn bind_first_available(server: &ServerConfig) -> io::Result<(TcpListener, u16)> {
    let start = server.start_port;
    let end = start.saturating_add(server.max_port_attempts.saturating_sub(1));

    for offset in 0..server.max_port_attempts {
        let port = start.saturating_add(offset);
        match bind(&server.host, port) {
            Ok(listener) => return Ok((listener, port)),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AddrInUse,
        format!("Could not find an available port in range {start}-{end}"),
    ))
}

/// Create a listening socket on the given host and port.
///
/// An empty host is the wildcard bind: a dual-stack `[::]` socket accepting
/// IPv4 and IPv6 on all interfaces.
pub fn bind(host: &str, port: u16) -> io::Result<TcpListener> {
    if host.is_empty() {
        return bind_wildcard(port);
    }

    let addr: SocketAddr = format!("{host}:{port}").parse().map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid listen address '{host}:{port}': {e}"),
        )
    })?;
    bind_addr(addr, false)
}

/// Wildcard bind covering IPv4 and IPv6 with one socket, with a plain
/// IPv4 wildcard fallback on IPv6-less hosts.
fn bind_wildcard(port: u16) -> io::Result<TcpListener> {
    match bind_addr(SocketAddr::from((Ipv6Addr::UNSPECIFIED, port)), true) {
        Ok(listener) => Ok(listener),
        // In-use means the port itself is taken; the scan must see that
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => Err(e),
        Err(_) => bind_addr(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)), false),
    }
}

fn bind_addr(addr: SocketAddr, dual_stack: bool) -> io::Result<TcpListener> {
    // Create socket with appropriate domain (IPv4 or IPv6)
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    if dual_stack {
        // Accept IPv4 connections on the IPv6 wildcard socket
        socket.set_only_v6(false)?;
    }

    // Enable SO_REUSEADDR: allows rebinding a port in TIME_WAIT state
    // across quick restarts
    socket.set_reuse_address(true)?;

    // Set non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    // Bind to the specified address
    socket.bind(&addr.into())?;

    // Start listening with a backlog queue size of 128
    socket.listen(128)?;

    // Convert socket2::Socket to std::net::TcpListener, then to tokio::net::TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_config(start_port: u16, max_port_attempts: u16) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            start_port,
            max_port_attempts,
            workers: None,
        }
    }

    #[tokio::test]
    async fn test_binds_free_port_directly() {
        let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = probe.local_addr().unwrap().port();
        drop(probe);

        let (listener, bound) = bind_first_available(&server_config(port, 1)).unwrap();
        assert_eq!(bound, port);
        assert_eq!(listener.local_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn test_skips_occupied_ports() {
        let blocker = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let blocked = blocker.local_addr().unwrap().port();

        let (listener, bound) = bind_first_available(&server_config(blocked, 10)).unwrap();
        assert!(bound > blocked);
        assert!(u32::from(bound) <= u32::from(blocked) + 9);
        assert_eq!(listener.local_addr().unwrap().port(), bound);
    }

    #[tokio::test]
    async fn test_exhaustion_names_the_range() {
        let blocker = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let blocked = blocker.local_addr().unwrap().port();

        let err = bind_first_available(&server_config(blocked, 1)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AddrInUse);
        assert!(err.to_string().contains(&format!("{blocked}-{blocked}")));
    }

    #[tokio::test]
    async fn test_invalid_host_is_not_in_use() {
        let err = bind("not an address", 8000).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
