//! Slash-command table and dispatcher for the chat panel.
//!
//! Only `/help` is answered locally. Every other recognized command is a
//! documented shortcut: the dispatcher reports the match, but the user's
//! literal text is what goes out on the wire. The `prompt` strings exist for
//! the help output, not for substitution.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// What a matched command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Answered locally from the command table; never dispatched.
    Help,
    /// Natural-language equivalent, shown in help output only.
    Prompt(&'static str),
}

/// One entry in the static command table. Read-only for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlashCommand {
    pub trigger: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub action: CommandAction,
}

pub const SLASH_COMMANDS: &[SlashCommand] = &[
    SlashCommand {
        trigger: "help",
        aliases: &["?", "commands"],
        description: "List the shortcuts the assistant understands",
        action: CommandAction::Help,
    },
    SlashCommand {
        trigger: "summary",
        aliases: &["briefing"],
        description: "Ask for the full morning briefing",
        action: CommandAction::Prompt(
            "Give me my morning briefing: weather, markets, calendar, and tasks.",
        ),
    },
    SlashCommand {
        trigger: "weather",
        aliases: &[],
        description: "Ask about today's weather",
        action: CommandAction::Prompt("What's the weather looking like today?"),
    },
    SlashCommand {
        trigger: "markets",
        aliases: &["stocks"],
        description: "Ask how the tracked stocks and crypto are doing",
        action: CommandAction::Prompt("How are my tracked stocks and crypto doing today?"),
    },
    SlashCommand {
        trigger: "calendar",
        aliases: &["today"],
        description: "Ask what's on the calendar",
        action: CommandAction::Prompt("What's on my calendar today?"),
    },
    SlashCommand {
        trigger: "tasks",
        aliases: &["todos"],
        description: "Ask which tasks are still pending",
        action: CommandAction::Prompt("What tasks do I still have pending?"),
    },
    SlashCommand {
        trigger: "commute",
        aliases: &[],
        description: "Ask how the commute looks right now",
        action: CommandAction::Prompt("How does my commute to work look right now?"),
    },
];

/// Trigger and alias lookup, all keys lowercase.
static COMMAND_INDEX: Lazy<HashMap<&'static str, &'static SlashCommand>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for command in SLASH_COMMANDS {
        index.insert(command.trigger, command);
        for alias in command.aliases {
            index.insert(*alias, command);
        }
    }
    index
});

/// Outcome of classifying one line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<'a> {
    /// Ordinary chat message: no leading slash, or no table match.
    Message(&'a str),
    /// `/help` or an alias: answer locally, no network.
    Help,
    /// A recognized shortcut. `literal` is the full original input, which is
    /// what gets sent upstream.
    Command {
        command: &'static SlashCommand,
        literal: &'a str,
    },
}

/// Classify raw user input. The first whitespace-delimited token after `/` is
/// matched case-insensitively against triggers and aliases.
pub fn dispatch(input: &str) -> Dispatch<'_> {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Dispatch::Message(trimmed);
    };
    let token = rest.split_whitespace().next().unwrap_or("").to_ascii_lowercase();
    match COMMAND_INDEX.get(token.as_str()).copied() {
        Some(command) => match command.action {
            CommandAction::Help => Dispatch::Help,
            CommandAction::Prompt(_) => Dispatch::Command {
                command,
                literal: trimmed,
            },
        },
        None => Dispatch::Message(trimmed),
    }
}

/// The locally synthesized `/help` reply: every non-help trigger with its
/// description.
pub fn help_text() -> String {
    let mut out = String::from("Here's what I can do:\n");
    for command in SLASH_COMMANDS {
        if matches!(command.action, CommandAction::Help) {
            continue;
        }
        out.push_str(&format!("  /{} - {}\n", command.trigger, command.description));
    }
    out.push_str("Anything else you type goes straight to the assistant.");
    out
}
