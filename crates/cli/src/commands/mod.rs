//! CLI entry point and session startup
//!
//! Parses the command line, merges it over the configuration file, connects
//! to the store, lets the user pick a bucket and hands over to the [`Shell`].

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use rustyline::DefaultEditor;
use s3b_core::{Config, ConfigManager, Error, KeyLister, Navigator, ObjectStore};
use s3b_s3::{ConnectOptions, S3Client};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod bucket;
pub mod parse;
pub mod shell;

pub use bucket::{choose_bucket, find_bucket};
pub use shell::{Ended, Flow, Shell};

/// Printed when the session ends normally or on Ctrl+C
pub const FAREWELL: &str = "Bye :)";

const CREDENTIALS_HINT: &str = "\
configure a profile first:
    $ aws configure [--profile profile_name]
  then run:
    $ s3b [profile_name]";

/// s3b - interactive S3 bucket browser
///
/// Presents a bucket as a directory tree with cd, ls, up, down, mkdir and rm.
#[derive(Parser, Debug)]
#[command(name = "s3b")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Credentials profile to use
    pub profile: Option<String>,

    /// Open this bucket without showing the selection menu
    #[arg(short, long)]
    pub bucket: Option<String>,

    /// Custom endpoint URL for S3-compatible services
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Region override
    #[arg(long)]
    pub region: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long, default_value = "false")]
    pub path_style: bool,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinners
    #[arg(long, default_value = "false")]
    pub no_progress: bool,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

impl Cli {
    /// Overlay command-line flags on the loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        let connection = &mut config.connection;
        if self.profile.is_some() {
            connection.profile.clone_from(&self.profile);
        }
        if self.endpoint.is_some() {
            connection.endpoint.clone_from(&self.endpoint);
        }
        if self.region.is_some() {
            connection.region.clone_from(&self.region);
        }
        connection.path_style |= self.path_style;
        if self.no_color {
            config.defaults.color = "never".to_string();
        }
        if self.no_progress {
            config.defaults.progress = false;
        }
    }
}

/// Output settings derived from the merged configuration
pub fn output_config(config: &Config) -> OutputConfig {
    match config.defaults.color.as_str() {
        "always" => console::set_colors_enabled(true),
        "never" => console::set_colors_enabled(false),
        _ => {}
    }
    OutputConfig {
        no_color: config.defaults.color == "never",
        no_progress: !config.defaults.progress,
    }
}

fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    error
        .downcast_ref::<Error>()
        .map(ExitCode::from_error)
        .unwrap_or(ExitCode::GeneralError)
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let manager = ConfigManager::new()?;
    let mut config = manager
        .load()
        .with_context(|| format!("Failed to load {}", manager.config_path().display()))?;
    cli.apply_to(&mut config);
    config.validate().context("Invalid command-line option")?;
    Ok(config)
}

/// Run a whole session and return the process exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            Formatter::default().error(&format!("{e:#}"));
            return exit_code_for(&e);
        }
    };
    let formatter = Formatter::new(output_config(&config));

    match session(&cli, &config, &formatter).await {
        Ok(code) => code,
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            exit_code_for(&e)
        }
    }
}

async fn session(cli: &Cli, config: &Config, formatter: &Formatter) -> anyhow::Result<ExitCode> {
    formatter.println(&formatter.bold("S3 Browser"));

    let options = ConnectOptions {
        profile: config.connection.profile.clone(),
        endpoint: config.connection.endpoint.clone(),
        region: config.connection.region.clone(),
        path_style: config.connection.path_style,
    };
    let client = S3Client::new(options)
        .await
        .map_err(|e| {
            if matches!(e, Error::Auth(_)) {
                formatter.usage(CREDENTIALS_HINT);
            }
            anyhow::Error::new(e)
        })
        .context("Unable to resolve credentials")?;

    formatter.println(&format!("  profile_name: {}", client.profile()));
    formatter.println(&format!("  aws_access_key_id: {}", client.access_key_id()));

    let buckets = client
        .list_buckets()
        .await
        .context("Unable to connect to S3")?;
    if buckets.is_empty() {
        formatter.warning("No buckets found");
        return Ok(ExitCode::Success);
    }
    let names: Vec<String> = buckets.into_iter().map(|b| b.key).collect();

    let bucket = match &cli.bucket {
        Some(wanted) => find_bucket(&names, wanted)
            .ok_or_else(|| Error::NoSuchBucket(wanted.clone()))
            .context("Bucket not found")?,
        None => match choose_bucket(&names, &mut std::io::stdin().lock(), formatter)? {
            Some(bucket) => bucket,
            None => {
                formatter.println(FAREWELL);
                return Ok(ExitCode::Success);
            }
        },
    };

    let store: Arc<dyn ObjectStore> = Arc::new(client);
    let lister = KeyLister::new(store, bucket.as_str()).with_policy(config.listing_policy());
    let navigator = Navigator::open(lister)
        .await
        .with_context(|| format!("Unable to list bucket {bucket}"))?;

    let mut editor = DefaultEditor::new().context("Failed to open the terminal")?;

    let mut shell = Shell::new(navigator, formatter.clone(), config.defaults.listing_limit);
    shell.print_overview();
    let ended = shell.run(&mut editor).await?;

    formatter.println(FAREWELL);
    Ok(match ended {
        Ended::Quit => ExitCode::Success,
        Ended::Interrupted => ExitCode::Interrupted,
    })
}
