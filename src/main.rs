mod app;
mod config;
mod irc;
mod logging;
mod ui;

use crate::app::event::OutputSink;
use crate::app::handler::{self, Dispatcher};
use crate::app::interpreter::Interpreter;
use crate::app::state::{PendingInput, Session, SessionState};
use crate::irc::connection::{self, BlockingReader};
use crate::irc::transport::Outbox;
use crate::ui::Screen;
use anyhow::{Context, Result};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io;
use std::sync::Arc;

fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let cfg = config::load_config()?;
    logging::init(cfg.log_file.as_deref())?;

    let result = run(cfg);

    restore_terminal()?;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    Ok(())
}

fn run(cfg: config::AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let stream = runtime
        .block_on(connection::connect(
            &cfg.server,
            cfg.port,
            cfg.accept_invalid_certs,
        ))
        .with_context(|| format!("Failed to connect to {}:{}", cfg.server, cfg.port))?;
    let (reader, writer) = tokio::io::split(stream);

    let (sink, output_rx) = OutputSink::channel();
    let (transport, writer_task) = connection::spawn_writer(runtime.handle(), writer, sink.clone());
    let transport = Arc::new(transport);
    let outbox = Outbox::new(transport.clone(), sink.clone());
    let session = Session::new(SessionState::new(&cfg.nickname, &cfg.channel));
    let pending = PendingInput::new();

    handler::register(&outbox, &cfg.nickname);

    enable_raw_mode()?;
    let screen = Screen::new(io::stdout(), session.clone(), pending.clone());
    let output = ui::spawn_output(output_rx, screen).context("Failed to start output thread")?;
    sink.text(format!(
        "Connecting to {}:{} as {}, joining {}...",
        cfg.server, cfg.port, cfg.nickname, cfg.channel
    ));

    let dispatcher = Dispatcher::new(session.clone(), sink.clone(), outbox.clone(), &cfg);
    let reader = BlockingReader::new(runtime.handle().clone(), reader);
    let _receiver =
        connection::spawn_receiver(reader, dispatcher).context("Failed to start receive thread")?;

    let interpreter = Interpreter::new(session, sink.clone(), outbox, cfg.quit_message.clone());
    let input_result = ui::input::run_input(
        crossterm::event::read,
        &pending,
        &sink,
        &interpreter,
    );

    // Input is over: let the output drain, then get the farewell onto the wire.
    sink.shutdown();
    let output_result = output
        .join()
        .map_err(|_| anyhow::anyhow!("output thread panicked"))?;
    transport.close();
    let _ = runtime.block_on(writer_task);
    // The receive thread may still be parked in a read; exiting reclaims it.
    runtime.shutdown_background();

    input_result.context("Terminal input failed")?;
    output_result.context("Terminal output failed")?;
    Ok(())
}
