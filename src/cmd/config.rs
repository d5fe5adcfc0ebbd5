use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};

use crate::config::{StoredConfig, config_file_path, parse_flag};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Ask for each setting and write the config file.
    Init,
    /// Print the stored settings with the token masked.
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Setting {
    TrackerUrl,
    TrackerUser,
    TrackerToken,
    CloseStatus,
    Notify,
}

const SETTINGS: [Setting; 5] = [
    Setting::TrackerUrl,
    Setting::TrackerUser,
    Setting::TrackerToken,
    Setting::CloseStatus,
    Setting::Notify,
];

impl Setting {
    fn label(self) -> &'static str {
        match self {
            Setting::TrackerUrl => "Tracker URL",
            Setting::TrackerUser => "Tracker user",
            Setting::TrackerToken => "Tracker token",
            Setting::CloseStatus => "Close status",
            Setting::Notify => "Notifications",
        }
    }

    fn hint(self) -> &'static str {
        match self {
            Setting::TrackerUrl => " (e.g. https://tracker.example.com/api)",
            Setting::CloseStatus => " (status written when a commit closes a ticket)",
            Setting::Notify => " (yes/no)",
            Setting::TrackerUser | Setting::TrackerToken => "",
        }
    }

    fn is_secret(self) -> bool {
        self == Setting::TrackerToken
    }

    fn slot(self, cfg: &mut StoredConfig) -> &mut Option<String> {
        match self {
            Setting::TrackerUrl => &mut cfg.tracker_url,
            Setting::TrackerUser => &mut cfg.tracker_user,
            Setting::TrackerToken => &mut cfg.tracker_token,
            Setting::CloseStatus => &mut cfg.close_status,
            Setting::Notify => &mut cfg.notify,
        }
    }

    fn current(self, cfg: &StoredConfig) -> Option<&str> {
        let value = match self {
            Setting::TrackerUrl => cfg.tracker_url.as_deref(),
            Setting::TrackerUser => cfg.tracker_user.as_deref(),
            Setting::TrackerToken => cfg.tracker_token.as_deref(),
            Setting::CloseStatus => cfg.close_status.as_deref(),
            Setting::Notify => cfg.notify.as_deref(),
        };
        value.filter(|value| !value.is_empty())
    }

    /// Rejects answers that `AppConfig::load` would refuse later.
    fn normalize(self, answer: &str) -> AppResult<String> {
        match self {
            Setting::Notify => {
                let enabled = parse_flag(answer)?;
                Ok(if enabled { "yes" } else { "no" }.to_string())
            }
            Setting::TrackerUrl => {
                if answer.starts_with("http://") || answer.starts_with("https://") {
                    Ok(answer.trim_end_matches('/').to_string())
                } else {
                    Err(AppError::Configuration(format!(
                        "tracker URL must start with http:// or https://, got '{answer}'"
                    )))
                }
            }
            _ => Ok(answer.to_string()),
        }
    }

    fn display(self, cfg: &StoredConfig) -> String {
        match self.current(cfg) {
            Some(value) if self.is_secret() => mask_secret(value),
            Some(value) => value.to_string(),
            None => "<not set>".to_string(),
        }
    }
}

enum Answer {
    Keep,
    Clear,
    Set(String),
}

impl Answer {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Answer::Keep,
            "-" => Answer::Clear,
            value => Answer::Set(value.to_string()),
        }
    }
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => {
            let mut cfg = StoredConfig::load()?;
            let stdin = io::stdin();
            init(&mut cfg, &mut stdin.lock(), &mut io::stdout())?;
            cfg.save()?;
            println!("\nConfiguration saved to {}", config_file_path()?.display());
            Ok(())
        }
        ConfigCommand::Show => {
            let cfg = StoredConfig::load()?;
            println!("Configuration file: {}", config_file_path()?.display());
            for setting in SETTINGS {
                println!("{}: {}", setting.label(), setting.display(&cfg));
            }
            Ok(())
        }
    }
}

fn init(cfg: &mut StoredConfig, input: &mut impl BufRead, output: &mut impl Write) -> AppResult<()> {
    writeln!(output, "Configuring ticket-hook.")?;
    writeln!(output, "Enter keeps the current value, '-' clears it.")?;
    writeln!(output, "The token is stored in plain text in the config file.")?;
    writeln!(output)?;

    for setting in SETTINGS {
        ask(setting, cfg, input, output)?;
    }
    Ok(())
}

/// Prompts until the answer is valid; end of input keeps the current value.
fn ask(
    setting: Setting,
    cfg: &mut StoredConfig,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> AppResult<()> {
    loop {
        let shown = match setting.current(cfg) {
            Some(_) if setting.is_secret() => " [****]".to_string(),
            Some(value) => format!(" [{value}]"),
            None => String::new(),
        };
        write!(output, "{}{}{shown}: ", setting.label(), setting.hint())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }

        match Answer::parse(&line) {
            Answer::Keep => return Ok(()),
            Answer::Clear => {
                *setting.slot(cfg) = None;
                return Ok(());
            }
            Answer::Set(value) => match setting.normalize(&value) {
                Ok(value) => {
                    *setting.slot(cfg) = Some(value);
                    return Ok(());
                }
                Err(err) => writeln!(output, "  {err}")?,
            },
        }
    }
}

fn mask_secret(secret: &str) -> String {
    let chars = secret.chars().collect::<Vec<_>>();
    if chars.len() <= 6 {
        return "***".to_string();
    }
    let head = chars[..3].iter().collect::<String>();
    let tail = chars[chars.len() - 3..].iter().collect::<String>();
    format!("{head}***{tail}")
}
