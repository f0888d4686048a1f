use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "example-cli")]
#[command(about = "Call an example-service instance from the command line", long_about = None)]
struct Cli {
    /// Full URL of the service path.
    #[arg(short, long, default_value = "http://localhost:8080/example")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the greeting
    Get,
    /// Send a JSON body with the given method (POST, PUT, PATCH, ...)
    Send {
        method: String,

        /// Request body; sent empty when omitted
        #[arg(short, long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = match cli.command {
        Commands::Get => client.get(&cli.url).send().await?,
        Commands::Send { method, data } => {
            let method = Method::from_bytes(method.as_bytes())?;
            client
                .request(method, &cli.url)
                .body(data.unwrap_or_default())
                .send()
                .await?
        }
    };
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
