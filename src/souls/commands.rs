//! `souls` command parsing, validation and dispatch.
//!
//! Surface:
//! - `souls` - show the caller's balances
//! - `souls redeem <category> <amount>` - trade souls for a condensate item
//! - `souls set|add|remove <player> <category> <amount>` - admin overrides
//!
//! Validation order matters and is covered by tests: for the admin path the permission
//! check happens before anything else is looked at, and no ledger entry is created until
//! every argument (including the subcommand itself) has been accepted.

use log::{debug, info};
use uuid::Uuid;

use super::category::Category;
use super::item::RedemptionItem;
use super::store::LedgerStore;
use crate::host::{CommandSender, GameHost, GrantError, PlayerRef, PERMISSION_ADMIN};
use crate::logutil::escape_log;

const REDEEM_AMOUNT_HINTS: [&str; 4] = ["10", "50", "100", "500"];
const ADMIN_AMOUNT_HINTS: [&str; 5] = ["10", "50", "100", "500", "1000"];

/// Admin override kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Set,
    Add,
    Remove,
}

impl AdminAction {
    pub const ALL: [AdminAction; 3] = [AdminAction::Set, AdminAction::Add, AdminAction::Remove];

    pub fn keyword(self) -> &'static str {
        match self {
            AdminAction::Set => "set",
            AdminAction::Add => "add",
            AdminAction::Remove => "remove",
        }
    }

    pub fn parse(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.keyword().eq_ignore_ascii_case(word))
    }
}

/// Top-level shape of a `souls` invocation before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoulsCommand<'a> {
    /// No arguments.
    Show,
    /// `redeem` followed by the remaining arguments.
    Redeem(&'a [String]),
    /// Anything else; carries the full argument list.
    Admin(&'a [String]),
}

impl<'a> SoulsCommand<'a> {
    pub fn parse(args: &'a [String]) -> Self {
        match args.first() {
            None => SoulsCommand::Show,
            Some(first) if first.eq_ignore_ascii_case("redeem") => {
                SoulsCommand::Redeem(&args[1..])
            }
            Some(_) => SoulsCommand::Admin(args),
        }
    }
}

/// Why a command was refused. Each variant maps to a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    ConsoleSender,
    RedeemUsage,
    AdminUsage,
    UnknownCategory(String),
    InvalidAmount(String),
    NonPositiveAmount,
    InsufficientSouls { category: Category, current: i64 },
    InventoryFull,
    /// Host refused the item for a reason other than capacity.
    GrantFailed,
    PermissionDenied,
    TargetOffline(String),
    UnknownAction(String),
}

/// Result of running a command, for callers that need more than the chat output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Balances were listed.
    Shown,
    /// Caller has no ledger entry yet; nothing was created.
    NotFound,
    Redeemed { category: Category, amount: i64 },
    Adjusted {
        target: Uuid,
        action: AdminAction,
        category: Category,
        amount: i64,
    },
    Rejected(Rejection),
}

fn rejection_lines(rejection: &Rejection) -> Vec<String> {
    match rejection {
        Rejection::ConsoleSender => vec!["Only players can use this command.".to_string()],
        Rejection::RedeemUsage => vec!["[Souls] Usage: /souls redeem <category> <amount>".to_string()],
        Rejection::AdminUsage => vec![
            "[Souls] Admin command usage:".to_string(),
            "/souls set <player> <category> <amount>".to_string(),
            "/souls add <player> <category> <amount>".to_string(),
            "/souls remove <player> <category> <amount>".to_string(),
        ],
        Rejection::UnknownCategory(label) => vec![format!(
            "[Souls] '{}' is not a valid category. Available: {}",
            label,
            Category::label_list()
        )],
        Rejection::InvalidAmount(_) => {
            vec!["[Souls] Please enter a valid number for the amount.".to_string()]
        }
        Rejection::NonPositiveAmount => {
            vec!["[Souls] The amount to redeem must be greater than 0.".to_string()]
        }
        Rejection::InsufficientSouls { category, current } => vec![format!(
            "[Souls] Not enough {} souls. (Current: {})",
            category, current
        )],
        Rejection::InventoryFull => vec![
            "[Souls] Your inventory is full, so the souls could not be redeemed.".to_string(),
        ],
        Rejection::GrantFailed => {
            vec!["[Souls] The condensate could not be delivered; no souls were taken.".to_string()]
        }
        Rejection::PermissionDenied => {
            vec!["[Souls] You do not have permission to use this command.".to_string()]
        }
        Rejection::TargetOffline(name) => vec![format!(
            "[Souls] Online player '{}' could not be found.",
            name
        )],
        Rejection::UnknownAction(_) => {
            vec!["[Souls] Unknown admin command. (use set, add, remove)".to_string()]
        }
    }
}

fn reject(host: &mut dyn GameHost, sender: &CommandSender, rejection: Rejection) -> CommandOutcome {
    for line in rejection_lines(&rejection) {
        match sender {
            CommandSender::Player(player) => host.send_message(player, &line),
            CommandSender::Console => host.send_console(&line),
        }
    }
    CommandOutcome::Rejected(rejection)
}

fn parse_category(label: &str) -> Result<Category, Rejection> {
    Category::from_label(label).ok_or_else(|| Rejection::UnknownCategory(label.to_string()))
}

fn parse_amount(raw: &str) -> Result<i64, Rejection> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Rejection::InvalidAmount(raw.to_string()))
}

/// Execute one `souls` command. `args` excludes the command name itself.
pub fn execute(
    store: &mut LedgerStore,
    host: &mut dyn GameHost,
    sender: &CommandSender,
    args: &[String],
) -> CommandOutcome {
    let player = match sender {
        CommandSender::Player(p) => p,
        CommandSender::Console => return reject(host, sender, Rejection::ConsoleSender),
    };
    debug!(
        "souls command from {}: {}",
        player.name,
        escape_log(&args.join(" "))
    );

    let result = match SoulsCommand::parse(args) {
        SoulsCommand::Show => Ok(show(store, host, player)),
        SoulsCommand::Redeem(rest) => redeem(store, host, player, rest),
        SoulsCommand::Admin(all) => admin(store, host, player, all),
    };

    match result {
        Ok(outcome) => outcome,
        Err(rejection) => reject(host, sender, rejection),
    }
}

fn show(store: &LedgerStore, host: &mut dyn GameHost, player: &PlayerRef) -> CommandOutcome {
    let Some(souls) = store.get(&player.id) else {
        host.send_message(
            player,
            "[Souls] No soul record found. Start gathering souls through your activities!",
        );
        return CommandOutcome::NotFound;
    };

    host.send_message(player, &format!("--- {}'s Souls ---", player.name));
    for (category, amount) in souls.iter() {
        host.send_message(player, &format!("  {}: {}", category, amount));
    }
    CommandOutcome::Shown
}

fn redeem(
    store: &mut LedgerStore,
    host: &mut dyn GameHost,
    player: &PlayerRef,
    args: &[String],
) -> Result<CommandOutcome, Rejection> {
    let [label, raw_amount] = args else {
        return Err(Rejection::RedeemUsage);
    };
    let category = parse_category(label)?;
    let amount = parse_amount(raw_amount)?;
    if amount <= 0 {
        return Err(Rejection::NonPositiveAmount);
    }

    let souls = store.get_or_create(player.id);
    if !souls.can_redeem(category, amount) {
        return Err(Rejection::InsufficientSouls {
            category,
            current: souls.balance(category),
        });
    }

    if !host.has_free_slot(player) {
        return Err(Rejection::InventoryFull);
    }
    match host.give_item(player, RedemptionItem::new(category, amount)) {
        Ok(()) => {}
        Err(GrantError::InventoryFull) => return Err(Rejection::InventoryFull),
        Err(GrantError::Offline) => return Err(Rejection::GrantFailed),
    }

    souls.redeem(category, amount);
    info!("{} redeemed {} {} souls", player, amount, category);
    host.send_message(
        player,
        &format!(
            "[Souls] Redeemed {} {} souls and received a condensate.",
            amount, category
        ),
    );
    Ok(CommandOutcome::Redeemed { category, amount })
}

fn admin(
    store: &mut LedgerStore,
    host: &mut dyn GameHost,
    issuer: &PlayerRef,
    args: &[String],
) -> Result<CommandOutcome, Rejection> {
    if !host.has_permission(issuer, PERMISSION_ADMIN) {
        return Err(Rejection::PermissionDenied);
    }
    let [sub, target_name, label, raw_amount] = args else {
        return Err(Rejection::AdminUsage);
    };

    let category = parse_category(label)?;
    let amount = parse_amount(raw_amount)?;
    let target = host
        .find_online_player(target_name)
        .ok_or_else(|| Rejection::TargetOffline(target_name.to_string()))?;
    let action = AdminAction::parse(sub).ok_or_else(|| Rejection::UnknownAction(sub.to_string()))?;

    let souls = store.get_or_create(target.id);
    let (confirm, notice) = match action {
        AdminAction::Set => {
            souls.set(category, amount);
            let now = souls.balance(category);
            (
                format!("Set {}'s {} souls to {}.", target.name, category, now),
                format!("[Souls] An admin set your {} souls to {}.", category, now),
            )
        }
        AdminAction::Add => {
            souls.credit(category, amount);
            (
                format!("Added {} to {}'s {} souls.", amount, target.name, category),
                format!("[Souls] An admin added {} to your {} souls.", amount, category),
            )
        }
        AdminAction::Remove => {
            souls.debit(category, amount);
            (
                format!("Removed {} from {}'s {} souls.", amount, target.name, category),
                format!("[Souls] An admin removed {} from your {} souls.", amount, category),
            )
        }
    };

    info!(
        "Admin {} ran {} {} {} {}",
        issuer.name,
        action.keyword(),
        target,
        category,
        amount
    );
    host.send_message(issuer, &confirm);
    if target.id != issuer.id {
        host.send_message(&target, &notice);
    }

    Ok(CommandOutcome::Adjusted {
        target: target.id,
        action,
        category,
        amount,
    })
}

fn matching<'a>(candidates: impl IntoIterator<Item = &'a str>, prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    candidates
        .into_iter()
        .filter(|c| c.to_lowercase().starts_with(&prefix))
        .map(str::to_string)
        .collect()
}

/// Suggestions for the argument currently being typed (the last element of `args`).
///
/// Admin subcommands are offered to everyone; execution is where permission is enforced.
pub fn tab_complete(host: &dyn GameHost, args: &[String]) -> Vec<String> {
    let current = args.last().map(String::as_str).unwrap_or("");
    let head = args.first().map(|s| s.to_lowercase()).unwrap_or_default();
    let is_redeem = head == "redeem";
    let is_admin = AdminAction::parse(&head).is_some();
    let labels = Category::ALL.map(Category::label);

    match args.len() {
        0 | 1 => {
            let subcommands = std::iter::once("redeem").chain(AdminAction::ALL.map(AdminAction::keyword));
            matching(subcommands, current)
        }
        2 if is_redeem => matching(labels, current),
        2 if is_admin => {
            let names = host.online_player_names();
            matching(names.iter().map(String::as_str), current)
        }
        3 if is_redeem => matching(REDEEM_AMOUNT_HINTS, current),
        3 if is_admin => matching(labels, current),
        4 if is_admin => matching(ADMIN_AMOUNT_HINTS, current),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn parse_routes_by_first_word() {
        assert_eq!(SoulsCommand::parse(&[]), SoulsCommand::Show);
        let redeem = args(&["REDEEM", "Crops", "5"]);
        assert!(matches!(SoulsCommand::parse(&redeem), SoulsCommand::Redeem(rest) if rest.len() == 2));
        let admin = args(&["set", "bob", "Crops", "5"]);
        assert!(matches!(SoulsCommand::parse(&admin), SoulsCommand::Admin(all) if all.len() == 4));
    }

    #[test]
    fn admin_action_keywords() {
        assert_eq!(AdminAction::parse("SET"), Some(AdminAction::Set));
        assert_eq!(AdminAction::parse("remove"), Some(AdminAction::Remove));
        assert_eq!(AdminAction::parse("give"), None);
    }

    #[test]
    fn amount_parsing_accepts_signs_and_rejects_text() {
        assert_eq!(parse_amount("-7"), Ok(-7));
        assert_eq!(parse_amount("+3"), Ok(3));
        assert!(matches!(parse_amount("ten"), Err(Rejection::InvalidAmount(_))));
    }
}
