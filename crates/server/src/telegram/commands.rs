//! Command parsing for inbound bot messages.
//!
//! Pure text-to-intent parsing: no I/O, no ledger access. Matching is
//! case-sensitive on exact whole tokens, so `/subscribers` is not a command.

/// Token that opens a first-contact deep link.
const START_COMMAND: &str = "/start";
/// Deep-link payload prefix; the slug is whatever follows it.
const DEEP_LINK_PREFIX: &str = "subscribe_";
const SUBSCRIBE_COMMAND: &str = "/subscribe";
const UNSUBSCRIBE_COMMAND: &str = "/unsubscribe";
const HELP_COMMAND: &str = "/help";

/// A parsed inbound intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start subscribe_<slug>` - first-contact deep link, equivalent to an
    /// explicit subscribe.
    DeepLinkSubscribe { slug: String },
    /// `/subscribe <slug>`
    Subscribe { slug: String },
    /// `/unsubscribe <slug>`
    Unsubscribe { slug: String },
    /// `/help`
    Help,
    /// A recognized command missing its required argument.
    UsageError(CommandKind),
    /// Not a command; acknowledge and do nothing.
    NoOp,
}

/// Which command a usage error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Subscribe,
    Unsubscribe,
}

/// Parse the free-text body of an inbound message into a [`Command`].
///
/// The command must be the first token of the text. Arguments are
/// space-separated; empty tokens (from repeated spaces) are skipped when
/// looking for the argument, and anything past the first argument is
/// ignored.
#[must_use]
pub fn parse_command(text: Option<&str>) -> Command {
    let Some(text) = text else {
        return Command::NoOp;
    };

    let mut tokens = text.split(' ');
    let command = tokens.next().unwrap_or_default();
    let mut args = tokens.filter(|t| !t.is_empty());

    match command {
        START_COMMAND => args
            .next()
            .and_then(|arg| arg.strip_prefix(DEEP_LINK_PREFIX))
            .filter(|slug| !slug.is_empty())
            .map_or(Command::NoOp, |slug| Command::DeepLinkSubscribe {
                slug: slug.to_owned(),
            }),
        SUBSCRIBE_COMMAND => args.next().map_or(
            Command::UsageError(CommandKind::Subscribe),
            |slug| Command::Subscribe {
                slug: slug.to_owned(),
            },
        ),
        UNSUBSCRIBE_COMMAND => args.next().map_or(
            Command::UsageError(CommandKind::Unsubscribe),
            |slug| Command::Unsubscribe {
                slug: slug.to_owned(),
            },
        ),
        HELP_COMMAND => Command::Help,
        _ => Command::NoOp,
    }
}
