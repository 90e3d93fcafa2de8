//! Soiree CLI
//!
//! Command-line client for a running Soiree server:
//! - Generate guest links
//! - Submit RSVPs
//! - View the RSVP tracker and export it as CSV
//! - Inspect or clear the local RSVP mirror

use anyhow::Context;
use clap::{Parser, Subcommand};
use reqwest::{Client, Response};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "soiree-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Invitation links, RSVPs and the host tracker from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8086", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a personalized invitation link
    Link {
        /// Guest's name
        name: String,
    },

    /// Show which view a link opens
    Open {
        /// Full invitation URL
        url: String,
    },

    /// Submit an RSVP
    Rsvp {
        /// Full name(s)
        #[arg(short, long)]
        name: String,
        /// Phone number (at least 10 digits)
        #[arg(short, long)]
        phone: String,
        /// Email address
        #[arg(short, long, default_value = "")]
        email: String,
        /// Number of guests
        #[arg(short, long, default_value = "1")]
        guests: String,
        /// Will you attend? (yes, no)
        #[arg(short, long)]
        attending: String,
        /// Message for the hosts
        #[arg(short, long, default_value = "")]
        message: String,
    },

    /// Show database connection status
    Status,

    /// Show the RSVP tracker
    Tracker {
        /// Reload instead of opening
        #[arg(short, long)]
        refresh: bool,
    },

    /// Export the loaded RSVPs as CSV
    Export {
        /// Reload the tracker before exporting
        #[arg(short, long)]
        refresh: bool,
        /// Output file (default: the server's suggested file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List RSVPs in the local mirror
    Local,

    /// Clear the local RSVP mirror
    ClearLocal {
        /// Confirm clearing
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();
    let api = format!("{}/api/v1", cli.api_url.trim_end_matches('/'));
    let json_output = cli.format == "json";

    match cli.command {
        Commands::Link { name } => {
            let response = client
                .post(format!("{}/links", api))
                .json(&serde_json::json!({ "name": name }))
                .send()
                .await
                .map_err(|e| not_reachable(&cli.api_url, e))?;
            let link = expect_json(response, "Link generation failed").await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&link)?);
            } else {
                println!("Invitation link for {}:", text(&link["guest"]["name"]));
                println!();
                println!("{}", text(&link["url"]));
            }
        }

        Commands::Open { url } => {
            let response = client
                .get(format!("{}/view", api))
                .query(&[("url", url.as_str())])
                .send()
                .await
                .map_err(|e| not_reachable(&cli.api_url, e))?;
            let route = expect_json(response, "Routing failed").await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&route)?);
            } else {
                match route["view"].as_str() {
                    Some("guest") => {
                        println!("Guest invitation for {}", text(&route["guest"]["name"]));
                        println!("Link created: {}", text(&route["guest"]["date"]));
                    }
                    _ => println!("Link generator (host view)"),
                }
                if let Some(message) = route["notice"]["message"].as_str() {
                    println!();
                    println!("{}", message);
                    println!("  ({})", text(&route["notice"]["detail"]));
                }
            }
        }

        Commands::Rsvp {
            name,
            phone,
            email,
            guests,
            attending,
            message,
        } => {
            let body = serde_json::json!({
                "name": name,
                "phone": phone,
                "email": email,
                "guests": guests,
                "attendance": attending,
                "message": message,
            });

            let response = client
                .post(format!("{}/rsvp", api))
                .json(&body)
                .send()
                .await
                .map_err(|e| not_reachable(&cli.api_url, e))?;
            let data = expect_json(response, "RSVP not accepted").await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                let confirmation = &data["confirmation"];
                println!("{}", text(&confirmation["heading"]));
                println!();
                for line in confirmation["details"].as_array().into_iter().flatten() {
                    println!("  {}", text(line));
                }
                if let Some(warning) = confirmation["warning"].as_str() {
                    println!();
                    println!("{}", warning);
                }
            }
        }

        Commands::Status => {
            let response = client
                .get(format!("{}/status", api))
                .send()
                .await
                .map_err(|e| not_reachable(&cli.api_url, e))?;
            let status = expect_json(response, "Status check failed").await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("Soiree v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("{}", text(&status["message"]));
                println!("Event: {}", text(&status["event"]));
                if let Some(backend) = status["backend"].as_str() {
                    println!("Backend: {} ({})", backend, text(&status["collection"]));
                }
                println!(
                    "Locally mirrored RSVPs: {}",
                    status["local_records"].as_u64().unwrap_or(0)
                );
            }
        }

        Commands::Tracker { refresh } => {
            let view = load_tracker(&client, &api, &cli.api_url, refresh).await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_tracker(&view);
            }
        }

        Commands::Export { refresh, output } => {
            if refresh {
                load_tracker(&client, &api, &cli.api_url, true).await?;
            }

            let response = client
                .get(format!("{}/tracker/export", api))
                .send()
                .await
                .map_err(|e| not_reachable(&cli.api_url, e))?;

            if response.status() == reqwest::StatusCode::NOT_FOUND {
                eprintln!("No data to export.");
                eprintln!("Load the tracker first: soiree-cli tracker (or use --refresh)");
                std::process::exit(1);
            }
            if !response.status().is_success() {
                let status = response.status();
                eprintln!("Export failed ({}): {}", status, error_message(response).await);
                std::process::exit(1);
            }

            let suggested = suggested_filename(&response).unwrap_or_else(|| "rsvps.csv".to_string());
            let data = response.text().await?;
            let path = output.unwrap_or_else(|| PathBuf::from(suggested));

            std::fs::write(&path, &data).with_context(|| format!("Failed to write {:?}", path))?;
            println!(
                "Exported {} RSVPs to {:?}",
                data.lines().count().saturating_sub(1),
                path
            );
        }

        Commands::Local => {
            let response = client
                .get(format!("{}/local", api))
                .send()
                .await
                .map_err(|e| not_reachable(&cli.api_url, e))?;
            let data = expect_json(response, "Failed to read local mirror").await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                let records = data["records"].as_array().cloned().unwrap_or_default();
                println!("{} locally mirrored RSVPs ({})", records.len(), text(&data["key"]));
                if !records.is_empty() {
                    println!();
                    println!("{:<25} {:<15} {:<7} {:<10} {}", "Name", "Phone", "Guests", "Attend", "Submitted");
                    println!("{}", "-".repeat(85));
                    for record in records {
                        println!(
                            "{:<25} {:<15} {:<7} {:<10} {}",
                            text(&record["guestName"]),
                            text(&record["phone"]),
                            record["numberOfGuests"].as_u64().unwrap_or(0),
                            text(&record["attendance"]),
                            text(&record["timestamp"])
                        );
                    }
                }
            }
        }

        Commands::ClearLocal { yes } => {
            let response = client
                .delete(format!("{}/local", api))
                .query(&[("confirm", yes)])
                .send()
                .await
                .map_err(|e| not_reachable(&cli.api_url, e))?;
            let outcome = expect_json(response, "Clear failed").await?;

            match outcome["state"].as_str() {
                Some("cleared") => println!(
                    "Cleared {} locally stored RSVPs.",
                    outcome["removed"].as_u64().unwrap_or(0)
                ),
                _ => {
                    println!("{}", text(&outcome["prompt"]));
                    println!();
                    println!("Re-run with --yes to confirm.");
                }
            }
        }

        Commands::Config { output } => {
            let config = soiree::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

async fn load_tracker(client: &Client, api: &str, api_url: &str, refresh: bool) -> anyhow::Result<Value> {
    let request = if refresh {
        client.post(format!("{}/tracker/refresh", api))
    } else {
        client.get(format!("{}/tracker", api))
    };
    let response = request.send().await.map_err(|e| not_reachable(api_url, e))?;
    expect_json(response, "Failed to load tracker").await
}

fn print_tracker(view: &Value) {
    if view["state"] == "error" {
        eprintln!("{}", text(&view["message"]));
        eprintln!("{}", text(&view["advice"]));
        std::process::exit(1);
    }

    let stats = &view["stats"];
    println!(
        "Total RSVPs: {}   Attending: {}   Not attending: {}   Total guests: {}",
        stats["total"].as_u64().unwrap_or(0),
        stats["attending"].as_u64().unwrap_or(0),
        stats["notAttending"].as_u64().unwrap_or(0),
        stats["totalGuests"].as_u64().unwrap_or(0)
    );
    println!();

    if let Some(notice) = view["empty_notice"].as_str() {
        println!("{}", notice);
        return;
    }

    println!(
        "{:<25} {:<15} {:<25} {:<7} {:<14} {:<20} {}",
        "Name", "Phone", "Email", "Guests", "Status", "Submitted", "Message"
    );
    println!("{}", "-".repeat(140));

    for row in view["rows"].as_array().into_iter().flatten() {
        println!(
            "{:<25} {:<15} {:<25} {:<7} {:<14} {:<20} {}",
            text(&row["name"]),
            text(&row["phone"]),
            text(&row["email"]),
            row["guests"].as_u64().unwrap_or(0),
            text(&row["status"]),
            text(&row["date_submitted"]),
            text(&row["message"]["preview"])
        );
    }
}

/// `attachment; filename="rsvps-2026-12-26.csv"` -> `rsvps-2026-12-26.csv`
fn suggested_filename(response: &Response) -> Option<String> {
    let disposition = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)?
        .to_str()
        .ok()?;
    let name = disposition.split("filename=").nth(1)?.trim_matches('"');
    (!name.is_empty()).then(|| name.to_string())
}

async fn expect_json(response: Response, context: &str) -> anyhow::Result<Value> {
    if !response.status().is_success() {
        let status = response.status();
        eprintln!("{} ({}): {}", context, status, error_message(response).await);
        std::process::exit(1);
    }
    Ok(response.json().await?)
}

/// The server's error message, or the raw body
async fn error_message(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body)
}

fn not_reachable(api_url: &str, e: reqwest::Error) -> anyhow::Error {
    anyhow::anyhow!(
        "Cannot connect to Soiree API at {}: {}\nMake sure the server is running: cargo run --bin soiree",
        api_url,
        e
    )
}

fn text(value: &Value) -> &str {
    value.as_str().unwrap_or("-")
}
