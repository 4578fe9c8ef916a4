mod terminal;

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use nuts_client::{SearchClient, SearchConfig};
use nuts_core::{AllowanceClock, CHECK_INTERVAL, SharedClock, run_reset_loop};
use nuts_frame::render::render;
use nuts_frame::{FrameSession, ViewController, ViewError};

use terminal::{Command, HELP, TerminalHost, lifecycle_event};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout is the frame.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nuts_frame=info,nuts_client=info".into()),
        )
        .init();

    let client = SearchClient::new(SearchConfig::from_env()?)?;
    let host = TerminalHost::from_env()?;
    let events = host.events().clone();

    let clock: SharedClock = Arc::new(Mutex::new(AllowanceClock::new(Utc::now())));
    let controller = ViewController::with_ceiling(client, clock.lock().ceiling());

    let reset_task = tokio::spawn(run_reset_loop(clock.clone(), CHECK_INTERVAL, {
        let controller = controller.clone();
        move |ceiling| {
            info!("Allowance reset, ceiling back to {}", ceiling);
            controller.set_ceiling(ceiling);
        }
    }));

    let mut session = FrameSession::new(host, controller.clone());
    let Some(started) = session.start().await else {
        println!("Loading...");
        warn!("No viewer context; set NUTS_VIEWER_FID");
        reset_task.abort();
        return Ok(());
    };
    let mut subscription = started.subscription;
    let mut changes = controller.changes();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);
    print!("{}", render(&controller.snapshot(), session.state(), Utc::now()));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match Command::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                if let Some(event) = lifecycle_event(&command) {
                    events.emit(event);
                    continue;
                }
                match command {
                    Command::Show(view) => {
                        let controller = controller.clone();
                        tokio::spawn(async move { report(controller.select_view(view).await) });
                    }
                    Command::Input(text) => controller.set_search_input(text),
                    Command::Submit => {
                        let controller = controller.clone();
                        tokio::spawn(async move { report(controller.submit_search().await) });
                    }
                    Command::Add => {
                        session.prompt_add().await;
                        print!("{}", render(&controller.snapshot(), session.state(), Utc::now()));
                    }
                    Command::Ceiling(n) => {
                        clock.lock().set_ceiling(n);
                        controller.set_ceiling(n);
                    }
                    Command::Help => println!("{}", HELP),
                    Command::Quit => break,
                    Command::Remove | Command::Notify(_) | Command::Primary => {}
                }
            }
            event = subscription.recv() => {
                let Some(event) = event else { break };
                session.handle_event(event);
                print!("{}", render(&controller.snapshot(), session.state(), Utc::now()));
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                print!("{}", render(&controller.snapshot(), session.state(), Utc::now()));
            }
        }
    }

    subscription.unsubscribe();
    session.controller().cancel();
    reset_task.abort();
    info!("Frame closed");

    Ok(())
}

fn report<T>(result: Result<T, ViewError>) {
    if let Err(e) = result {
        warn!("{}", e);
    }
}
