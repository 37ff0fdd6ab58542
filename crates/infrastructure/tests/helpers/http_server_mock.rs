use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

enum Route {
    Body(String),
    Stall,
}

/// Loopback HTTP/1.1 server for blocklist download tests.
///
/// Serves registered paths, answers 404 for anything else and never answers
/// stalled paths.
#[derive(Default)]
pub struct MockHttpServerBuilder {
    routes: HashMap<String, Route>,
}

impl MockHttpServerBuilder {
    pub fn serve(mut self, path: &str, body: &str) -> Self {
        self.routes.insert(path.to_string(), Route::Body(body.to_string()));
        self
    }

    pub fn stall(mut self, path: &str) -> Self {
        self.routes.insert(path.to_string(), Route::Stall);
        self
    }

    pub async fn start(self) -> std::io::Result<MockHttpServer> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let routes = Arc::new(self.routes);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let log = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accepted = listener.accept() => {
                        if let Ok((stream, _)) = accepted {
                            tokio::spawn(handle(stream, Arc::clone(&routes), Arc::clone(&log)));
                        }
                    }
                }
            }
        });

        Ok(MockHttpServer {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        })
    }
}

pub struct MockHttpServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockHttpServer {
    pub fn builder() -> MockHttpServerBuilder {
        MockHttpServerBuilder::default()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Paths requested so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockHttpServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle(
    mut stream: TcpStream,
    routes: Arc<HashMap<String, Route>>,
    log: Arc<Mutex<Vec<String>>>,
) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }

    let request = String::from_utf8_lossy(&head);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    log.lock().unwrap().push(path.clone());

    let response = match routes.get(&path) {
        Some(Route::Body(body)) => format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ),
        Some(Route::Stall) => {
            // Hold the connection open until the client gives up.
            let _ = stream.read(&mut buf).await;
            return;
        }
        None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string(),
    };

    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
