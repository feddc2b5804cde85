//! TLS connection and the receive activity.
//!
//! The encrypted stream is split in two. The write half belongs to a writer
//! task on the async runtime, fed through an unbounded queue so any thread can
//! send without blocking. The read half is driven by a dedicated OS thread
//! that blocks on each read and dispatches complete lines in order.

use crate::app::event::OutputSink;
use crate::app::handler::Dispatcher;
use crate::irc::codec::{self, LineBuffer};
use crate::irc::transport::{Transport, TransportError};
use std::io::{self, Read};
use std::sync::Arc;
use std::thread;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;

const READ_CHUNK: usize = 4096;

/// Open a TCP connection and complete the TLS handshake.
pub async fn connect(
    host: &str,
    port: u16,
    accept_invalid_certs: bool,
) -> Result<TlsStream<TcpStream>, TransportError> {
    let tcp = TcpStream::connect((host, port)).await?;
    let tls_config = if accept_invalid_certs {
        tracing::warn!("TLS certificate verification disabled");
        rustls_insecure_config()
    } else {
        rustls_default_config()
    };
    let connector = TlsConnector::from(Arc::new(tls_config));
    let server_name = rustls::pki_types::ServerName::try_from(host.to_string())
        .map_err(|_| TransportError::InvalidServerName(host.to_string()))?;
    let stream = connector.connect(server_name, tcp).await?;
    tracing::info!(host, port, "TLS handshake complete");
    Ok(stream)
}

fn rustls_default_config() -> rustls::ClientConfig {
    let root_store =
        rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}

fn rustls_insecure_config() -> rustls::ClientConfig {
    rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCert))
        .with_no_client_auth()
}

#[derive(Debug)]
struct AcceptAnyCert;

impl rustls::client::danger::ServerCertVerifier for AcceptAnyCert {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::aws_lc_rs::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}

enum Outgoing {
    Line(Vec<u8>),
    Close,
}

/// Sending half handed to the engine. Lines are queued for the writer task.
#[derive(Debug, Clone)]
pub struct WriterTransport {
    tx: mpsc::UnboundedSender<Outgoing>,
}

impl WriterTransport {
    /// Ask the writer to flush what is queued, shut the stream down and stop.
    pub fn close(&self) {
        let _ = self.tx.send(Outgoing::Close);
    }
}

impl Transport for WriterTransport {
    fn send(&self, bytes: &[u8]) -> Result<(), TransportError> {
        self.tx
            .send(Outgoing::Line(bytes.to_vec()))
            .map_err(|_| TransportError::Closed)
    }
}

/// Spawn the writer task. Write failures are reported through `sink` and the
/// task keeps draining, so every later line fails visibly as well.
pub fn spawn_writer<W>(
    handle: &Handle,
    mut writer: W,
    sink: OutputSink,
) -> (WriterTransport, JoinHandle<()>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Outgoing>();
    let task = handle.spawn(async move {
        while let Some(outgoing) = rx.recv().await {
            match outgoing {
                Outgoing::Line(bytes) => {
                    let result: io::Result<()> = async {
                        writer.write_all(&bytes).await?;
                        writer.flush().await
                    }
                    .await;
                    if let Err(e) = result {
                        tracing::warn!(error = %e, "write failed");
                        sink.text(format!("[send error] {}", e));
                    }
                }
                Outgoing::Close => {
                    let _ = writer.shutdown().await;
                    break;
                }
            }
        }
    });
    (WriterTransport { tx }, task)
}

/// Blocking `Read` over an async reader, for use from a plain OS thread.
pub struct BlockingReader<R> {
    handle: Handle,
    inner: R,
}

impl<R> BlockingReader<R> {
    pub fn new(handle: Handle, inner: R) -> Self {
        Self { handle, inner }
    }
}

impl<R: AsyncRead + Unpin> Read for BlockingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.handle.block_on(self.inner.read(buf))
    }
}

/// Read until end-of-stream or error, dispatching every complete line.
pub fn receive_loop<R: Read>(mut reader: R, dispatcher: &Dispatcher) {
    let mut lines = LineBuffer::new();
    let mut buf = [0u8; READ_CHUNK];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(error = %e, "read failed");
                break;
            }
        };
        for line in lines.push(&buf[..n]) {
            tracing::trace!(line = %line, "recv");
            dispatcher.handle_message(&codec::parse(&line));
        }
    }
    dispatcher.disconnected();
}

/// Run [`receive_loop`] on its own thread.
pub fn spawn_receiver<R>(reader: R, dispatcher: Dispatcher) -> io::Result<thread::JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("receive".into())
        .spawn(move || receive_loop(reader, &dispatcher))
}
