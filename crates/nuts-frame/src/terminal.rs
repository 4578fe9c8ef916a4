use anyhow::{Context, Result, bail};
use tracing::info;

use nuts_frame::{AddFrameError, HostEvents, HostRuntime, Subscription};
use nuts_types::View;
use nuts_types::events::{ClientContext, FrameContext, HostEvent, HostUser, NotificationDetails};

/// Stands in for the social client when the frame runs in a terminal.
///
/// The context comes from the environment and lifecycle events are published
/// by the command loop.
pub struct TerminalHost {
    context: Option<FrameContext>,
    accept_add: bool,
    events: HostEvents,
}

impl TerminalHost {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// - `NUTS_VIEWER_FID`: viewer fid; unset means the host has no context
    /// - `NUTS_FRAME_ADDED`: whether the frame is already added (default false)
    /// - `NUTS_FRAME_ACCEPT_ADD`: answer to the add prompt (default true)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let context = match lookup("NUTS_VIEWER_FID") {
            Some(raw) => {
                let fid: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("NUTS_VIEWER_FID is not a fid: {}", raw))?;
                Some(FrameContext {
                    user: Some(HostUser {
                        fid,
                        username: None,
                    }),
                    client: ClientContext {
                        added: flag(&lookup, "NUTS_FRAME_ADDED", false)?,
                        ..Default::default()
                    },
                })
            }
            None => None,
        };

        Ok(Self {
            context,
            accept_add: flag(&lookup, "NUTS_FRAME_ACCEPT_ADD", true)?,
            events: HostEvents::new(),
        })
    }

    pub fn events(&self) -> &HostEvents {
        &self.events
    }
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some("1" | "true" | "yes") => Ok(true),
        Some("0" | "false" | "no") => Ok(false),
        Some(other) => bail!("{} must be true or false, got {}", key, other),
    }
}

impl HostRuntime for TerminalHost {
    async fn context(&self) -> Option<FrameContext> {
        self.context.clone()
    }

    fn subscribe(&self) -> Subscription {
        self.events.subscribe()
    }

    async fn add_frame(&self) -> Result<(), AddFrameError> {
        if !self.accept_add {
            return Err(AddFrameError::RejectedByUser(
                "declined in terminal".to_string(),
            ));
        }
        self.events.emit(HostEvent::FrameAdded {
            notification_details: None,
        });
        Ok(())
    }

    fn ready(&self) {
        info!("Frame ready");
    }
}

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show(View),
    Input(String),
    Submit,
    Add,
    Remove,
    Notify(bool),
    Primary,
    Ceiling(u32),
    Help,
    Quit,
}

pub const HELP: &str = "commands: stats | leaderboard | search | input <text> | submit | \
add | remove | notify on|off | primary | ceiling <n> | help | quit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match (word, rest) {
            ("stats", "") => Self::Show(View::Stats),
            ("leaderboard", "") => Self::Show(View::Leaderboard),
            ("search", "") => Self::Show(View::Search),
            ("input", text) => Self::Input(text.to_string()),
            ("submit", "") => Self::Submit,
            ("add", "") => Self::Add,
            ("remove", "") => Self::Remove,
            ("notify", "on") => Self::Notify(true),
            ("notify", "off") => Self::Notify(false),
            ("primary", "") => Self::Primary,
            ("ceiling", n) => Self::Ceiling(
                n.parse()
                    .map_err(|_| format!("ceiling needs a number, got '{}'", n))?,
            ),
            ("help", "") => Self::Help,
            ("quit" | "exit", "") => Self::Quit,
            _ => return Err(format!("unknown command '{}'", line)),
        };
        Ok(command)
    }
}

/// Host event published for a lifecycle command, if it is one.
pub fn lifecycle_event(command: &Command) -> Option<HostEvent> {
    match command {
        Command::Remove => Some(HostEvent::FrameRemoved),
        Command::Notify(true) => Some(HostEvent::NotificationsEnabled {
            notification_details: NotificationDetails {
                url: "terminal://notifications".to_string(),
                token: "terminal".to_string(),
            },
        }),
        Command::Notify(false) => Some(HostEvent::NotificationsDisabled),
        Command::Primary => Some(HostEvent::PrimaryButtonClicked),
        _ => None,
    }
}
