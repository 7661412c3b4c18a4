//! Port probing for the preview server.

use tokio::net::TcpListener;

/// Whether `127.0.0.1:<port>` can be bound right now.
pub async fn is_port_available(port: u16) -> bool {
    TcpListener::bind(("127.0.0.1", port)).await.is_ok()
}

/// First free port in `start..start + attempts`, calling `on_busy` for each
/// port that is taken.
pub async fn find_available_port(
    start: u16,
    attempts: u16,
    mut on_busy: impl FnMut(u16),
) -> Option<u16> {
    for offset in 0..attempts {
        let port = start.checked_add(offset)?;
        if is_port_available(port).await {
            return Some(port);
        }
        on_busy(port);
    }
    None
}
