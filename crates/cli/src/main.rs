mod loopback;

use anyhow::{anyhow, bail, Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::{self, BufRead},
    sync::Arc,
    thread,
};

use tcplink_core::{
    config::{self, AppConfig},
    SessionEvent, SessionManager,
};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use loopback::LoopbackTransport;

const HELP: &str = "commands: :recv  :drop  :connect  :quit  (anything else is sent)";

fn main() -> Result<()> {
    init_logging()?;

    let config_path = config::ensure_default_config()?;
    let config = AppConfig::load()?;
    info!(path = %config_path.display(), endpoint = %config.endpoint, "Configuration loaded");

    let transport = Arc::new(LoopbackTransport::new());
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let printer = thread::spawn(move || {
        while let Some(event) = event_rx.blocking_recv() {
            print_event(&event);
        }
    });

    let session = SessionManager::from_config(&config, transport.clone(), event_tx);
    let status = session.connect();
    if !status.is_success() {
        bail!("failed to connect to {}: {status}", config.endpoint);
    }
    println!("{HELP}");

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        match line.trim() {
            ":quit" => break,
            ":recv" => {
                let result = session.receive();
                println!("receive: {} ({} bytes)", result.status, result.payload.len());
            }
            ":drop" => transport.drop_peer(),
            ":connect" => println!("connect: {}", session.connect()),
            _ => println!("send: {}", session.send(line.as_bytes())),
        }
    }

    // Dropping the session joins the poller and releases the event sender.
    drop(session);
    printer
        .join()
        .map_err(|_| anyhow!("event printer thread panicked"))?;
    Ok(())
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::Connected => println!("<- connected"),
        SessionEvent::Disconnected => println!("<- disconnected"),
        SessionEvent::BytesWritten(count) => println!("<- wrote {count} bytes"),
        SessionEvent::DataReceived(payload) => {
            println!("<- {}", String::from_utf8_lossy(payload))
        }
    }
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("tcplink.log");

    let env_filter = EnvFilter::from_default_env();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .compact()
        .with_ansi(false)
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}
