//! Service lifecycle: load the ledger, run the console host loop with autosave, and
//! flush once more on the way out.
//!
//! ```rust,no_run
//! use soulkeeper::config::Config;
//! use soulkeeper::server::SoulServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let mut server = SoulServer::new(config).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

use anyhow::Result;
use log::{debug, error, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::host::console::{ConsoleEvent, ConsoleHost, HELP_TEXT};
use crate::host::{CommandSender, GameHost, PlayerRef};
use crate::logutil::escape_log;
use crate::souls::{
    self, on_block_break, on_monster_kill, on_player_kill, BlockBreak, LedgerStore,
    SharedLedger, SoulRoller, ThreadRoller,
};
use crate::storage::autosave::{flush_now, Autosaver, SoulsFile};
use crate::storage::read_document;

/// What the loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineResult {
    Continue,
    Quit,
}

pub struct SoulServer {
    config: Config,
    souls_file: SoulsFile,
    ledger: SharedLedger,
    host: ConsoleHost,
    roller: Box<dyn SoulRoller + Send>,
}

impl SoulServer {
    /// Build the server and load persisted souls.
    ///
    /// A missing souls file is created empty. An unreadable one is logged and the service
    /// starts with an empty ledger rather than failing.
    pub async fn new(config: Config) -> Result<Self> {
        let souls_path = config.storage.souls_path();
        let mut store = LedgerStore::new();

        let read_path = souls_path.clone();
        match tokio::task::spawn_blocking(move || read_document(&read_path)).await? {
            Ok(doc) => {
                let report = store.load_all(&doc);
                if report.skipped > 0 {
                    warn!("Skipped {} malformed player record(s)", report.skipped);
                }
            }
            Err(e) => {
                error!(
                    "Failed to load soul data from {}: {} (starting with an empty ledger)",
                    souls_path.display(),
                    e
                );
            }
        }

        let host = ConsoleHost::new(config.permissions.clone());
        Ok(Self {
            config,
            souls_file: SoulsFile::new(souls_path),
            ledger: store.into_shared(),
            host,
            roller: Box::new(ThreadRoller),
        })
    }

    /// Swap the reward roller (tests use a fixed one).
    pub fn with_roller(mut self, roller: Box<dyn SoulRoller + Send>) -> Self {
        self.roller = roller;
        self
    }

    pub fn ledger(&self) -> SharedLedger {
        self.ledger.clone()
    }

    pub fn host(&self) -> &ConsoleHost {
        &self.host
    }

    /// Run against stdin until `quit`, end of input, or Ctrl-C.
    pub async fn run(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.run_with(stdin, |line| println!("{}", line)).await
    }

    /// Run against any line source, passing every output line to `emit`.
    pub async fn run_with<R, F>(&mut self, reader: R, mut emit: F) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        F: FnMut(&str),
    {
        info!(
            "{} started ({} player(s) loaded)",
            self.config.server.name,
            self.ledger.lock().await.len()
        );

        let autosaver = if self.config.autosave.enabled {
            Some(Autosaver::spawn(
                self.ledger.clone(),
                self.souls_file.clone(),
                self.config.autosave.interval(),
            ))
        } else {
            info!("Autosave disabled; soul data is only saved on shutdown and 'save'");
            None
        };

        let mut lines = reader.lines();
        loop {
            tokio::select! {
                next = lines.next_line() => {
                    match next {
                        Ok(Some(line)) => {
                            let (result, output) = self.handle_line(&line).await;
                            for out in output {
                                emit(&out);
                            }
                            if result == LineResult::Quit {
                                break;
                            }
                        }
                        Ok(None) => {
                            debug!("Console input closed");
                            break;
                        }
                        Err(e) => {
                            warn!("Console read error: {}", e);
                            break;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        if let Some(saver) = autosaver {
            let stats = saver.stop().await;
            debug!(
                "Autosave finished: {} save(s), {} failure(s)",
                stats.saves, stats.failures
            );
        }
        self.shutdown().await;
        Ok(())
    }

    /// Final flush; failures are logged, never fatal.
    pub async fn shutdown(&mut self) {
        info!("Shutting down {}...", self.config.server.name);
        match flush_now(&self.ledger, &self.souls_file).await {
            Ok(count) => info!("Soul data saved on shutdown ({} player(s))", count),
            Err(e) => error!(
                "Failed to save soul data to {}: {}",
                self.souls_file.path().display(),
                e
            ),
        }
    }

    /// Handle one console line and return the produced output.
    pub async fn handle_line(&mut self, line: &str) -> (LineResult, Vec<String>) {
        let event = match ConsoleEvent::parse(line) {
            Ok(Some(event)) => event,
            Ok(None) => return (LineResult::Continue, Vec::new()),
            Err(e) => {
                debug!("Rejected console line '{}': {}", escape_log(line), e);
                return (LineResult::Continue, vec![format!("! {}", e)]);
            }
        };
        let result = self.dispatch(event).await;
        (result, self.host.take_output())
    }

    async fn dispatch(&mut self, event: ConsoleEvent) -> LineResult {
        match event {
            ConsoleEvent::Join { name, admin, slots } => {
                let player = self.host.join(&name, admin, slots);
                info!("{} joined", player);
                self.host.note(format!("* {} joined", player.name));
            }
            ConsoleEvent::Leave(name) => {
                if self.host.leave(&name) {
                    self.host.note(format!("* {} left", name));
                } else {
                    self.host.note(format!("! {} is not online", name));
                }
            }
            ConsoleEvent::Break {
                name,
                block,
                growth,
                silk_touch,
            } => {
                if let Some(player) = self.require_online(&name) {
                    let event = BlockBreak {
                        block,
                        growth,
                        silk_touch,
                    };
                    let mut store = self.ledger.lock().await;
                    on_block_break(&mut store, &mut self.host, &player, &event);
                }
            }
            ConsoleEvent::Slay { name, monster } => {
                if let Some(player) = self.require_online(&name) {
                    let mut store = self.ledger.lock().await;
                    on_monster_kill(
                        &mut store,
                        &mut self.host,
                        self.roller.as_mut(),
                        &player,
                        &monster,
                    );
                }
            }
            ConsoleEvent::Pvp { killer, victim } => {
                let Some(killer) = self.require_online(&killer) else {
                    return LineResult::Continue;
                };
                if self.require_online(&victim).is_some() {
                    let mut store = self.ledger.lock().await;
                    on_player_kill(&mut store, &mut self.host, &killer);
                }
            }
            ConsoleEvent::Command { name, args } => {
                if let Some(player) = self.require_online(&name) {
                    let mut store = self.ledger.lock().await;
                    souls::execute(
                        &mut store,
                        &mut self.host,
                        &CommandSender::Player(player),
                        &args,
                    );
                }
            }
            ConsoleEvent::ConsoleCommand(args) => {
                let mut store = self.ledger.lock().await;
                souls::execute(&mut store, &mut self.host, &CommandSender::Console, &args);
            }
            ConsoleEvent::Tab { name, args } => {
                if self.require_online(&name).is_some() {
                    let suggestions = souls::tab_complete(&self.host, &args);
                    self.host.note(format!("tab: {}", suggestions.join(" ")));
                }
            }
            ConsoleEvent::Save => match flush_now(&self.ledger, &self.souls_file).await {
                Ok(count) => self.host.note(format!("* saved {} player(s)", count)),
                Err(e) => {
                    error!("Manual save failed: {}", e);
                    self.host.note(format!("! save failed: {}", e));
                }
            },
            ConsoleEvent::Status => {
                let online = self.host.online_player_names().len();
                let store = self.ledger.lock().await;
                self.host
                    .note(format!("* {} player(s), {} online", store.len(), online));
                for (category, total) in store.category_totals() {
                    self.host.note(format!("  {}: {}", category, total));
                }
            }
            ConsoleEvent::Help => self.host.note(HELP_TEXT),
            ConsoleEvent::Quit => return LineResult::Quit,
        }
        LineResult::Continue
    }

    fn require_online(&mut self, name: &str) -> Option<PlayerRef> {
        let found = self.host.find_online_player(name);
        if found.is_none() {
            self.host.note(format!("! {} is not online", name));
        }
        found
    }
}
