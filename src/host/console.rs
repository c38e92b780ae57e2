//! Line-oriented console host.
//!
//! Stands in for a game engine: a script (or an operator at a terminal) feeds one event
//! per line and the host keeps just enough world state to answer the ledger's questions:
//! who is online, who is an admin, how many free inventory slots each player has.
//!
//! Input grammar (case-insensitive keywords, `#` starts a comment):
//! ```text
//! join <name> [admin] [slots=<n>]
//! leave <name>
//! break <name> <block> [<age>/<max>|unstaged] [silk]
//! slay <name> <monster>
//! pvp <killer> <victim>
//! cmd <name> [souls args..]
//! console [souls args..]
//! tab <name> [partial args..]
//! save | status | help | quit
//! ```

use std::collections::HashMap;

use uuid::Uuid;

use super::{GameHost, GrantError, PlayerRef, PERMISSION_ADMIN};
use crate::config::PermissionsConfig;
use crate::souls::{BlockKind, CropGrowth, MonsterKind, RedemptionItem};

/// Inventory slots a player joins with unless `slots=<n>` is given.
pub const DEFAULT_FREE_SLOTS: usize = 36;

/// Stable id for a console player, derived from the lowercase name.
pub fn console_player_id(name: &str) -> Uuid {
    let key = format!("OfflinePlayer:{}", name.to_ascii_lowercase());
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Join {
        name: String,
        admin: bool,
        slots: Option<usize>,
    },
    Leave(String),
    Break {
        name: String,
        block: BlockKind,
        growth: CropGrowth,
        silk_touch: bool,
    },
    Slay {
        name: String,
        monster: MonsterKind,
    },
    Pvp {
        killer: String,
        victim: String,
    },
    Command {
        name: String,
        args: Vec<String>,
    },
    ConsoleCommand(Vec<String>),
    Tab {
        name: String,
        args: Vec<String>,
    },
    Save,
    Status,
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "join <name> [admin] [slots=N] | leave <name> | break <name> <block> [age/max|unstaged] [silk] | slay <name> <monster> | pvp <killer> <victim> | cmd <name> [args] | console [args] | tab <name> [args] | save | status | quit";

fn parse_growth(token: &str) -> Option<CropGrowth> {
    if token.eq_ignore_ascii_case("unstaged") {
        return Some(CropGrowth::Unstaged);
    }
    let (age, max_age) = token.split_once('/')?;
    Some(CropGrowth::Staged {
        age: age.parse().ok()?,
        max_age: max_age.parse().ok()?,
    })
}

impl ConsoleEvent {
    /// Parse one input line. Blank lines and comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let raw = line.split('#').next().unwrap_or("");
        let trailing_space = raw.ends_with(char::is_whitespace);
        let line = raw.trim();
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<String> = words.map(str::to_string).collect();
        let need = |n: usize| -> Result<(), String> {
            if rest.len() < n {
                Err(format!("'{}' needs at least {} argument(s)", verb, n))
            } else {
                Ok(())
            }
        };

        let event = match verb.to_ascii_lowercase().as_str() {
            "join" => {
                need(1)?;
                let mut admin = false;
                let mut slots = None;
                for flag in &rest[1..] {
                    if flag.eq_ignore_ascii_case("admin") {
                        admin = true;
                    } else if let Some(n) = flag.strip_prefix("slots=") {
                        slots = Some(n.parse().map_err(|_| format!("bad slot count '{}'", n))?);
                    } else {
                        return Err(format!("unknown join flag '{}'", flag));
                    }
                }
                ConsoleEvent::Join {
                    name: rest[0].clone(),
                    admin,
                    slots,
                }
            }
            "leave" => {
                need(1)?;
                ConsoleEvent::Leave(rest[0].clone())
            }
            "break" => {
                need(2)?;
                let mut growth = CropGrowth::Unstaged;
                let mut silk_touch = false;
                for flag in &rest[2..] {
                    if flag.eq_ignore_ascii_case("silk") {
                        silk_touch = true;
                    } else if let Some(g) = parse_growth(flag) {
                        growth = g;
                    } else {
                        return Err(format!("unknown break flag '{}'", flag));
                    }
                }
                ConsoleEvent::Break {
                    name: rest[0].clone(),
                    block: rest[1].parse().unwrap_or_else(|e| match e {}),
                    growth,
                    silk_touch,
                }
            }
            "slay" => {
                need(2)?;
                ConsoleEvent::Slay {
                    name: rest[0].clone(),
                    monster: rest[1].parse().unwrap_or_else(|e| match e {}),
                }
            }
            "pvp" => {
                need(2)?;
                ConsoleEvent::Pvp {
                    killer: rest[0].clone(),
                    victim: rest[1].clone(),
                }
            }
            "cmd" => {
                need(1)?;
                ConsoleEvent::Command {
                    name: rest[0].clone(),
                    args: rest[1..].to_vec(),
                }
            }
            "console" => ConsoleEvent::ConsoleCommand(rest),
            "tab" => {
                need(1)?;
                let mut args = rest[1..].to_vec();
                if trailing_space || args.is_empty() {
                    args.push(String::new());
                }
                ConsoleEvent::Tab {
                    name: rest[0].clone(),
                    args,
                }
            }
            "save" => ConsoleEvent::Save,
            "status" => ConsoleEvent::Status,
            "help" => ConsoleEvent::Help,
            "quit" | "exit" => ConsoleEvent::Quit,
            other => return Err(format!("unknown console verb '{}'", other)),
        };
        Ok(Some(event))
    }
}

/// Per-player state tracked by the console host.
#[derive(Debug, Clone)]
pub struct ConsolePlayer {
    pub player: PlayerRef,
    pub admin: bool,
    pub free_slots: usize,
    pub items: Vec<RedemptionItem>,
}

/// In-process host driven by [`ConsoleEvent`]s. Messages are buffered until
/// [`take_output`](ConsoleHost::take_output) is called.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    online: HashMap<String, ConsolePlayer>,
    permissions: PermissionsConfig,
    output: Vec<String>,
}

impl ConsoleHost {
    pub fn new(permissions: PermissionsConfig) -> Self {
        Self {
            online: HashMap::new(),
            permissions,
            output: Vec::new(),
        }
    }

    /// Connect a player. Configured admins are admins regardless of `admin`.
    pub fn join(&mut self, name: &str, admin: bool, slots: Option<usize>) -> PlayerRef {
        let player = PlayerRef::new(console_player_id(name), name);
        let admin = admin || self.permissions.is_admin(name);
        self.online.insert(
            name.to_ascii_lowercase(),
            ConsolePlayer {
                player: player.clone(),
                admin,
                free_slots: slots.unwrap_or(DEFAULT_FREE_SLOTS),
                items: Vec::new(),
            },
        );
        player
    }

    pub fn leave(&mut self, name: &str) -> bool {
        self.online.remove(&name.to_ascii_lowercase()).is_some()
    }

    pub fn online(&self, name: &str) -> Option<&ConsolePlayer> {
        self.online.get(&name.to_ascii_lowercase())
    }

    /// Record a console-originated line (not addressed to a player).
    pub fn note(&mut self, text: impl Into<String>) {
        self.output.push(text.into());
    }

    /// Drain buffered output lines.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }
}

impl GameHost for ConsoleHost {
    fn send_message(&mut self, player: &PlayerRef, text: &str) {
        self.output.push(format!("-> {}: {}", player.name, text));
    }

    fn send_console(&mut self, text: &str) {
        self.output.push(format!("-> console: {}", text));
    }

    fn find_online_player(&self, name: &str) -> Option<PlayerRef> {
        self.online(name).map(|p| p.player.clone())
    }

    fn online_player_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.online.values().map(|p| p.player.name.clone()).collect();
        names.sort();
        names
    }

    fn has_permission(&self, player: &PlayerRef, node: &str) -> bool {
        node == PERMISSION_ADMIN
            && self
                .online
                .values()
                .any(|p| p.player.id == player.id && p.admin)
    }

    fn has_free_slot(&self, player: &PlayerRef) -> bool {
        self.online
            .values()
            .any(|p| p.player.id == player.id && p.free_slots > 0)
    }

    fn give_item(&mut self, player: &PlayerRef, item: RedemptionItem) -> Result<(), GrantError> {
        let entry = self
            .online
            .values_mut()
            .find(|p| p.player.id == player.id)
            .ok_or(GrantError::Offline)?;
        if entry.free_slots == 0 {
            return Err(GrantError::InventoryFull);
        }
        entry.free_slots -= 1;
        entry.items.push(item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_break_with_growth_and_silk() {
        let event = ConsoleEvent::parse("break Alex wheat 7/7 silk").unwrap();
        assert_eq!(
            event,
            Some(ConsoleEvent::Break {
                name: "Alex".to_string(),
                block: BlockKind::Wheat,
                growth: CropGrowth::Staged { age: 7, max_age: 7 },
                silk_touch: true,
            })
        );
    }

    #[test]
    fn blank_and_comment_lines_are_ignored() {
        assert_eq!(ConsoleEvent::parse("   ").unwrap(), None);
        assert_eq!(ConsoleEvent::parse("# setup").unwrap(), None);
    }

    #[test]
    fn rejects_unknown_verbs_and_missing_args() {
        assert!(ConsoleEvent::parse("teleport Alex").is_err());
        assert!(ConsoleEvent::parse("pvp Alex").is_err());
        assert!(ConsoleEvent::parse("join Alex slots=many").is_err());
    }

    #[test]
    fn tab_appends_empty_argument_for_trailing_space() {
        let event = ConsoleEvent::parse("tab Alex redeem ").unwrap();
        assert_eq!(
            event,
            Some(ConsoleEvent::Tab {
                name: "Alex".to_string(),
                args: vec!["redeem".to_string(), String::new()],
            })
        );
    }

    #[test]
    fn ids_are_stable_and_case_insensitive() {
        assert_eq!(console_player_id("Steve"), console_player_id("steve"));
        assert_ne!(console_player_id("Steve"), console_player_id("Alex"));
    }

    #[test]
    fn give_item_consumes_slots() {
        let mut host = ConsoleHost::default();
        let alex = host.join("Alex", false, Some(1));
        assert!(host.has_free_slot(&alex));
        let item = RedemptionItem::new(crate::souls::Category::Crops, 1);
        assert!(host.give_item(&alex, item.clone()).is_ok());
        assert!(!host.has_free_slot(&alex));
        assert_eq!(host.give_item(&alex, item), Err(GrantError::InventoryFull));
    }

    #[test]
    fn configured_admins_get_permission() {
        let perms = PermissionsConfig {
            admins: vec!["Steve".to_string()],
        };
        let mut host = ConsoleHost::new(perms);
        let steve = host.join("steve", false, None);
        let alex = host.join("Alex", false, None);
        assert!(host.has_permission(&steve, PERMISSION_ADMIN));
        assert!(!host.has_permission(&alex, PERMISSION_ADMIN));
        assert!(!host.has_permission(&steve, "other.node"));
    }
}
