use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "counter-cli")]
#[command(about = "Client for a running path-counter service", long_about = None)]
struct Cli {
    #[arg(short, long, env = "COUNTER_URL", default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Increment the counter at PATH and print the new value
    Hit {
        /// Counter path, e.g. `blog/first-post`
        path: String,
    },
    /// Check that the service answers on its landing route
    Ping,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Hit { path } => {
            let res = client
                .get(format!("{}/{}", base, path.trim_start_matches('/')))
                .send()
                .await?;
            print_count(res).await?;
        }
        Commands::Ping => {
            let res = client.get(format!("{}/", base)).send().await?;
            let status = res.status();
            let body = res.text().await?;
            if status.is_success() && body == "1" {
                println!("ok");
            } else {
                eprintln!("Error: unexpected landing response {} {:?}", status, body);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn print_count(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if status.is_redirection() {
        eprintln!("Error: path is blocked by the service");
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    if !status.is_success() {
        eprintln!(
            "Error: service returned status {}: {}",
            status,
            json.get("error").and_then(Value::as_str).unwrap_or("unknown error")
        );
        std::process::exit(1);
    }

    match json.get("count").and_then(Value::as_i64) {
        Some(count) => println!("{}", count),
        None => println!("{}", serde_json::to_string_pretty(&json)?),
    }
    Ok(())
}
