use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use scanner_core::{update, AppState, Listing, Msg};
use scanner_logging::{scanner_debug, scanner_info, scanner_warn};

use super::config::Settings;
use super::effects::EffectRunner;
use super::ui::commands::{accept_upload_file, parse_command, Command, HELP_TEXT};
use super::ui::render;

const TICK: Duration = Duration::from_millis(75);

/// Runs the interactive session until `quit`, or until stdin closes and every
/// outstanding request has settled.
pub fn run(settings: &Settings) -> anyhow::Result<()> {
    let runner = EffectRunner::new(&settings.api_settings())?;
    let mut session = Session {
        state: AppState::with_options(settings.core_options()),
        runner,
    };
    let input = spawn_input_reader();

    println!("{HELP_TEXT}");
    session.render()?;

    let mut input_open = true;
    loop {
        if input_open {
            match input.recv_timeout(TICK) {
                Ok(line) => match parse_command(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => session.handle_command(command),
                    Ok(None) => {}
                    Err(err) => eprintln!("{err}"),
                },
                Err(RecvTimeoutError::Timeout) => session.dispatch(Msg::Tick),
                Err(RecvTimeoutError::Disconnected) => {
                    scanner_debug!("Input closed");
                    input_open = false;
                }
            }
        } else if let Some(msg) = session.runner.wait(TICK) {
            session.dispatch(msg);
        }

        session.pump_engine();
        if session.state.consume_dirty() {
            session.render()?;
        }

        if !input_open && session.is_idle() {
            break;
        }
    }

    scanner_info!("Session finished");
    Ok(())
}

struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
    }

    fn pump_engine(&mut self) {
        while let Some(msg) = self.runner.poll() {
            self.dispatch(msg);
        }
    }

    fn handle_command(&mut self, command: Command) {
        let msg = match command {
            Command::Search(query) => Msg::SearchSubmitted(query),
            Command::Upload(path) => match accept_upload_file(&path) {
                Ok(()) => Msg::UploadSubmitted(path),
                Err(err) => {
                    scanner_warn!("Upload rejected: {}", err);
                    eprintln!("{err}");
                    return;
                }
            },
            Command::View(mode) => Msg::ViewSelected(mode),
            Command::Tab(listing) => Msg::ListingTabSelected(listing),
            Command::Refresh => Msg::RefreshListings,
            Command::Dismiss => Msg::DismissClicked,
            Command::Help => {
                println!("{HELP_TEXT}");
                return;
            }
            Command::Quit => return,
        };
        self.dispatch(msg);
    }

    fn is_idle(&self) -> bool {
        self.state.upload().in_flight() == 0
            && self.state.search().in_flight() == 0
            && self.state.listing(Listing::Known).in_flight() == 0
            && self.state.listing(Listing::New).in_flight() == 0
    }

    fn render(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", "-".repeat(60))?;
        for line in render::render(&self.state.view()) {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}

fn spawn_input_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
