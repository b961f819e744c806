//! Entry point for the pingtop TUI. Parses args, resolves the backend profile
//! and runs the App (or one of the one-shot commands).

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use pingtop::api::{ApiClient, ProbeApi, ReqwestTransport, CHECK_PATH};
use pingtop::app::App;
use pingtop::console::Console;
use pingtop::logging;
use pingtop::profiles::{
    config_dir, load_profiles, save_profiles, Connection, ProfileRequest, ResolveProfile,
};
use pingtop::results::{entry_view, plain_line, LogLine, ResultLog, DEFAULT_MAX_ENTRIES};
use pingtop::types::DEFAULT_LIMIT;

const DEFAULT_BACKEND: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "pingtop", version, about = "URL availability console, TUI like top")]
struct Cli {
    /// Backend root URL (http://HOST:PORT)
    url: Option<String>,

    /// Use (or create) a saved backend profile
    #[arg(short = 'P', long, value_name = "NAME")]
    profile: Option<String>,

    /// Overwrite an existing profile without asking
    #[arg(long)]
    save: bool,

    /// Extra trusted CA certificate for https backends
    #[arg(short = 't', long = "tls-ca", value_name = "CERT_PEM")]
    tls_ca: Option<String>,

    /// Probe endpoint path (use /api/check for older backends)
    #[arg(long, value_name = "PATH")]
    check_path: Option<String>,

    /// How many recent results to load
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Results kept on screen during a session
    #[arg(long, default_value_t = DEFAULT_MAX_ENTRIES)]
    max_entries: usize,

    /// Resolve the connection settings, print them and exit
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Probe one URL and print the outcome
    Check { target: String },
    /// Print the most recent results
    Recent,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(conn) = resolve_connection(&cli)? else {
        return Ok(());
    };

    if cli.dry_run {
        println!("backend: {}", conn.url);
        println!(
            "check path: {}",
            conn.check_path.as_deref().unwrap_or(CHECK_PATH)
        );
        if let Some(ca) = &conn.tls_ca {
            println!("tls ca: {ca}");
        }
        return Ok(());
    }

    let ca_pem = match &conn.tls_ca {
        Some(path) => Some(std::fs::read(path).with_context(|| format!("read CA file {path}"))?),
        None => None,
    };
    let transport = ReqwestTransport::new(&conn.url, ca_pem.as_deref())?;
    let client = ApiClient::with_check_path(
        transport,
        conn.check_path.as_deref().unwrap_or(CHECK_PATH),
    );

    match cli.command {
        Some(Command::Check { target }) => {
            logging::init_stderr()?;
            let result = client.submit_check(&target).await?;
            println!("{}", plain_line(&LogLine::Entry(entry_view(&result))));
            Ok(())
        }
        Some(Command::Recent) => {
            logging::init_stderr()?;
            let mut log = ResultLog::new(cli.max_entries);
            log.load_all(client.fetch_recent(cli.limit).await?);
            for line in log.lines() {
                println!("{}", plain_line(&line));
            }
            Ok(())
        }
        None => {
            let log_path = config_dir().join("pingtop.log");
            logging::init_file(&log_path)?;
            tracing::info!(backend = %conn.url, "starting console");

            let console = Console::new(Arc::new(client), cli.limit, cli.max_entries);
            let mut app = App::new(console, conn.url.clone());
            app.run().await
        }
    }
}

/// Works out the backend to talk to, persisting profile changes on the way.
/// `None` means the user aborted a prompt.
fn resolve_connection(cli: &Cli) -> anyhow::Result<Option<Connection>> {
    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: cli.profile.clone(),
        url: cli.url.clone(),
        tls_ca: cli.tls_ca.clone(),
        check_path: cli.check_path.clone(),
    };

    let mut profiles_mut = profiles_file.clone();
    let conn = match req.resolve(&profiles_file) {
        ResolveProfile::Direct(conn) => {
            if let Some(name) = cli.profile.as_ref() {
                let overwrite = match profiles_mut.profiles.get(name) {
                    // New profile: auto-save immediately
                    None => true,
                    Some(existing) if *existing == conn => false,
                    Some(_) => {
                        cli.save
                            || prompt_yes_no(&format!(
                                "Overwrite existing profile '{name}'? [y/N]: "
                            ))
                    }
                };
                if overwrite {
                    profiles_mut.profiles.insert(name.clone(), conn.clone());
                    save_profiles(&profiles_mut).context("save profiles")?;
                }
            }
            conn
        }
        ResolveProfile::Loaded(conn) => conn,
        ResolveProfile::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let picked = line
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|idx| (1..=names.len()).contains(idx))
                .and_then(|idx| profiles_mut.profiles.get(&names[idx - 1]));
            match picked {
                Some(conn) => conn.clone(),
                None => return Ok(None),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter backend URL (http://HOST:PORT): ")?;
            let url = url.trim();
            if url.is_empty() {
                return Ok(None);
            }
            let conn = Connection {
                url: url.to_string(),
                tls_ca: cli.tls_ca.clone(),
                check_path: cli.check_path.clone(),
            };
            profiles_mut.profiles.insert(name, conn.clone());
            save_profiles(&profiles_mut).context("save profiles")?;
            conn
        }
        ResolveProfile::None => Connection {
            url: DEFAULT_BACKEND.to_string(),
            tls_ca: cli.tls_ca.clone(),
            check_path: cli.check_path.clone(),
        },
    };

    if conn.url.trim().is_empty() {
        bail!("backend URL is empty");
    }
    Ok(Some(conn))
}

fn prompt_yes_no(prompt: &str) -> bool {
    match prompt_string(prompt) {
        Ok(line) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
