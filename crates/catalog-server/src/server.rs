use std::collections::HashMap;
use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use catalog_store::Store;
use signal_hook::consts::SIGTERM;
use signal_hook::flag;

use crate::protocol::{self, Request};
use crate::session::Session;

/// Open connections by id. A handler removes its own entry when it returns.
type Connections = Arc<Mutex<HashMap<u64, TcpStream>>>;

pub struct Server<S: Store> {
    store: Arc<S>,
    addr: String,
    shutdown: Arc<AtomicBool>,
    connections: Connections,
}

impl<S: Store + 'static> Server<S> {
    pub fn new(store: S, addr: impl Into<String>) -> Self {
        Self {
            store: Arc::new(store),
            addr: addr.into(),
            shutdown: Arc::new(AtomicBool::new(false)),
            connections: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Flag that stops [`serve`](Self::serve) when set. SIGTERM sets it too.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Number of client connections currently being served.
    pub fn open_connections(&self) -> usize {
        self.connections.lock().map(|open| open.len()).unwrap_or(0)
    }

    pub fn serve(&self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(&self.addr)?;
        tracing::info!(addr = %self.addr, "catalog-server listening");

        flag::register(SIGTERM, Arc::clone(&self.shutdown))?;

        // Non-blocking accept with short sleeps so the shutdown flag is polled.
        listener.set_nonblocking(true)?;

        let mut handles: Vec<thread::JoinHandle<()>> = Vec::new();
        let mut next_id: u64 = 0;

        while !self.shutdown.load(Ordering::Relaxed) {
            handles.retain(|handle| !handle.is_finished());

            match listener.accept() {
                Ok((stream, peer)) => {
                    tracing::debug!(%peer, "connection accepted");
                    stream.set_nonblocking(false)?;
                    let read_half = stream.try_clone()?;
                    let id = next_id;
                    next_id += 1;
                    if let Ok(mut open) = self.connections.lock() {
                        open.insert(id, read_half);
                    }

                    let store = Arc::clone(&self.store);
                    let connections = Arc::clone(&self.connections);
                    handles.push(thread::spawn(move || {
                        if let Err(e) = handle_connection(stream, store) {
                            tracing::warn!(%peer, error = %e, "connection error");
                        }
                        if let Ok(mut open) = connections.lock() {
                            open.remove(&id);
                        }
                        tracing::debug!(%peer, "connection closed");
                    }));
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(e) => {
                    // EMFILE and friends persist until connections close; back off.
                    tracing::warn!(error = %e, "accept error");
                    thread::sleep(Duration::from_millis(100));
                }
            }
        }

        tracing::info!("shutdown requested, draining connections");

        // Closing the read half unblocks handlers waiting on the next frame.
        if let Ok(open) = self.connections.lock() {
            for stream in open.values() {
                let _ = stream.shutdown(Shutdown::Read);
            }
        }

        for handle in handles {
            let _ = handle.join();
        }

        tracing::info!("shutdown complete");
        Ok(())
    }
}

fn handle_connection<S: Store>(
    stream: TcpStream,
    store: Arc<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::new(store);
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);

    loop {
        let msg = match protocol::read_frame(&mut reader) {
            Ok(msg) => msg,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Ok(()); // client disconnected or shutdown
            }
            Err(e) => return Err(e.into()),
        };

        let request: Request = rmp_serde::from_slice(&msg)?;
        let response = session.handle(request);

        let response_bytes = rmp_serde::to_vec(&response)?;
        protocol::write_frame(&mut writer, &response_bytes)?;
    }
}
