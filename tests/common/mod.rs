use axum::{Router, response::Html};
use std::{net::SocketAddr, sync::mpsc, thread};
use tokio::sync::oneshot;

const TODOMVC_HTML: &str = include_str!("../fixtures/todomvc.html");

/// Serves the TodoMVC fixture page on every path of a local port until dropped
pub struct FixtureServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl FixtureServer {
    pub fn start() -> Self {
        let (addr_tx, addr_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("Failed to build fixture runtime");
            runtime.block_on(async move {
                let app = Router::new().fallback(|| async { Html(TODOMVC_HTML) });

                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind fixture port");
                addr_tx.send(listener.local_addr().expect("No local address")).expect("Fixture caller went away");

                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .ok();
            });
        });

        let addr = addr_rx.recv().expect("Fixture server failed to start");
        Self { addr, shutdown: Some(shutdown_tx) }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}
