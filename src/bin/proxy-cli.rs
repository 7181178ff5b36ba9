use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Send requests through the Gemini proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question and print the model's answer
    Ask {
        /// User prompt
        text: String,
        /// Optional system instruction
        #[arg(short, long)]
        system: Option<String>,
    },
    /// POST a JSON file (or `-` for stdin) verbatim and print the response
    Raw {
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Ask { text, system } => {
            let payload = ask_payload(&text, system.as_deref());
            let res = client.post(&cli.url).json(&payload).send().await?;
            let status = res.status();
            let body: Value = res.json().await?;

            if !status.is_success() {
                eprintln!("Error: proxy returned status {}", status);
                eprintln!("{}", serde_json::to_string_pretty(&body)?);
                return Ok(());
            }
            match first_candidate_text(&body) {
                Some(answer) => println!("{}", answer),
                None => println!("{}", serde_json::to_string_pretty(&body)?),
            }
        }
        Commands::Raw { path } => {
            let content = if path.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(&path)?
            };
            let res = client
                .post(&cli.url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(content)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

/// Build a single-turn `generateContent` request.
fn ask_payload(text: &str, system: Option<&str>) -> Value {
    let mut payload = json!({
        "contents": [{ "role": "user", "parts": [{ "text": text }] }]
    });
    if let Some(system) = system {
        payload["systemInstruction"] = json!({ "parts": [{ "text": system }] });
    }
    payload
}

/// Concatenated text parts of the first candidate, if any.
fn first_candidate_text(body: &Value) -> Option<String> {
    let parts = body
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then_some(text)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
