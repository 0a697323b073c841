//! Command-line interface of the `auction-desk` binary.

use crate::config::DeskConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Runtime options of the `auction-desk` binary.
///
/// Every connection option can also come from the environment (see
/// [`DeskConfig::from_env`]); flags given here win.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "auction-desk",
    version,
    about = "Assign bidder numbers, cancel attendees and import guests for an auction event"
)]
pub struct CliArgs {
    /// Backend base URL.
    ///
    /// Environment variable: `AUCTION_API_URL`
    #[arg(long, env = "AUCTION_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token sent with every request.
    ///
    /// Environment variable: `AUCTION_API_TOKEN`
    #[arg(long, env = "AUCTION_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    ///
    /// Environment variable: `AUCTION_REQUEST_TIMEOUT_SECS`
    #[arg(long, env = "AUCTION_REQUEST_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Requests in flight per batch; 0 means unbounded.
    ///
    /// Environment variable: `AUCTION_MAX_CONCURRENT_REQUESTS`
    #[arg(long, env = "AUCTION_MAX_CONCURRENT_REQUESTS")]
    pub max_concurrency: Option<usize>,

    /// Probe `/health` before a batch and abort it if the backend is down.
    #[arg(long)]
    pub preflight: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Desk operations
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Assign a bidder number to a guest
    Assign {
        /// Event id
        #[arg(long)]
        event: String,
        /// Guest id
        #[arg(long)]
        guest: String,
        /// Bidder number, 100 to 999
        #[arg(long, allow_hyphen_values = true)]
        number: String,
    },

    /// Cancel attendees of an event
    Cancel {
        /// Event id
        #[arg(long)]
        event: String,
        /// Reason recorded with every cancellation
        #[arg(long)]
        reason: Option<String>,
        /// Staff notes recorded with every cancellation
        #[arg(long)]
        notes: Option<String>,
        /// Attendee ids to cancel
        #[arg(required = true, num_args = 1..)]
        attendees: Vec<String>,
    },

    /// Import guests from a JSON file
    Import {
        /// Event id
        #[arg(long)]
        event: String,
        /// JSON array of {name, email, bidder_number} objects
        file: PathBuf,
        /// Print the plan without changing anything
        #[arg(long)]
        dry_run: bool,
    },
}

impl CliArgs {
    /// Overlay explicit options onto `config`
    pub fn apply(&self, config: &mut DeskConfig) {
        if let Some(url) = &self.api_url {
            config.api.base_url.clone_from(url);
        }
        if let Some(token) = &self.token {
            config.api.token = Some(token.clone());
        }
        if let Some(timeout) = self.timeout_secs {
            config.api.request_timeout_secs = timeout;
        }
        if let Some(max_concurrency) = self.max_concurrency {
            config.batch.max_concurrency = max_concurrency;
        }
        if self.preflight {
            config.batch.preflight = true;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;

    #[test]
    fn test_parse_assign() {
        let args = CliArgs::try_parse_from([
            "auction-desk",
            "assign",
            "--event",
            "gala",
            "--guest",
            "g-1",
            "--number",
            "150",
        ])
        .unwrap();

        assert_eq!(
            args.command,
            Command::Assign {
                event: "gala".to_string(),
                guest: "g-1".to_string(),
                number: "150".to_string(),
            }
        );
    }

    #[test]
    fn test_negative_number_reaches_validation() {
        let args = CliArgs::try_parse_from([
            "auction-desk", "assign", "--event", "gala", "--guest", "g-1", "--number", "-5",
        ])
        .unwrap();
        assert!(matches!(args.command, Command::Assign { number, .. } if number == "-5"));
    }

    #[test]
    fn test_cancel_requires_attendees() {
        assert!(CliArgs::try_parse_from(["auction-desk", "cancel", "--event", "gala"]).is_err());

        let args = CliArgs::try_parse_from([
            "auction-desk",
            "--max-concurrency",
            "2",
            "--preflight",
            "cancel",
            "--event",
            "gala",
            "--reason",
            "Duplicate booking",
            "r-1",
            "g-2",
        ])
        .unwrap();

        let mut config = DeskConfig::default();
        args.apply(&mut config);
        assert_eq!(config.batch.max_concurrency, 2);
        assert!(config.batch.preflight);
        assert!(matches!(
            args.command,
            Command::Cancel { ref attendees, ref reason, .. }
                if attendees.len() == 2 && reason.as_deref() == Some("Duplicate booking")
        ));
    }
}
