//! Native terminal client for the snail trail.
//!
//! Connects to the relay, hands the engine a frame-encoding outbound port,
//! and drives everything from one `select!` loop: a ~30 Hz tick runs
//! `update` then `draw`, the socket feeds inbound frames to the engine,
//! and terminal events feed the key tracker and character commits. A
//! protocol violation or a dropped connection ends the session with the
//! terminal restored and the error reported on the way out.

mod term;

use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use snail::engine::Engine;
use snail::sync::FrameSender;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::term::{KeyTracker, Term};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("connection lost")]
    WsClosed,
    #[error("protocol violation: {0}")]
    Protocol(#[from] wire::CodecError),
}

#[derive(Parser, Debug)]
#[command(name = "snail-cli", about = "Terminal client for the snail trail")]
struct Cli {
    /// Relay websocket endpoint.
    #[arg(long, env = "SNAIL_URL", default_value = "ws://127.0.0.1:8160/ws")]
    url: String,
}

type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let (stream, _) = connect_async(&cli.url)
        .await
        .map_err(|error| CliError::WsConnect(Box::new(error)))?;
    let (mut ws_tx, mut ws_rx) = stream.split();

    // Writer task: drains the engine's outbound frames onto the socket.
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Vec<u8>>();
    tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if ws_tx.send(Message::Binary(frame.into())).await.is_err() {
                break;
            }
        }
    });

    let mut engine = Engine::new();
    engine.connect(Box::new(FrameSender::new(move |frame| {
        let _ = out_tx.send(frame);
    })));

    let mut term = Term::new()?;
    let result = run(&mut engine, &mut term, &mut ws_rx).await;
    // Restore the terminal before the error (if any) is printed.
    drop(term);
    result
}

async fn run(engine: &mut Engine, term: &mut Term, ws_rx: &mut WsReader) -> Result<(), CliError> {
    let mut keys = KeyTracker::new();
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(33));
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let dt_ms = last_tick.elapsed().as_secs_f64() * 1000.0;
                last_tick = Instant::now();
                keys.expire();
                engine.set_turn(keys.turn());
                engine.update(dt_ms);
                engine.draw(&mut term.surface);
                term.present()?;
            }
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Binary(bytes))) => engine.apply_frame(&bytes)?,
                    Some(Ok(Message::Close(_))) | None => return Err(CliError::WsClosed),
                    Some(Ok(_)) => {}
                    Some(Err(error)) => return Err(CliError::WsConnect(Box::new(error))),
                }
            }
            event = events.next() => {
                let Some(event) = event else { return Ok(()) };
                match event? {
                    Event::Key(key) => {
                        if quit_requested(&key) {
                            return Ok(());
                        }
                        keys.note(&key);
                        if key.kind != KeyEventKind::Release {
                            offer_character(engine, term, &key);
                        }
                    }
                    Event::Resize(cols, rows) => {
                        term.resize(cols, rows);
                        engine.resize();
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Offer a plain character key to the engine. The engine does its own
/// validation; a rejected commit is simply dropped.
fn offer_character(engine: &mut Engine, term: &Term, key: &KeyEvent) {
    if !key.modifiers.intersection(KeyModifiers::CONTROL | KeyModifiers::ALT).is_empty() {
        return;
    }
    if let KeyCode::Char(ch) = key.code {
        let _ = engine.insert_character(ch, &term.surface);
    }
}

fn quit_requested(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
