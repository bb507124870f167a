//! One-shot analysis from the terminal: runs all four operations against the
//! configured backend and prints every region's HTML fragment.

use anyhow::{bail, Result};
use dotenv::dotenv;
use std::io::Read;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use nlp_dashboard::config::Settings;
use nlp_dashboard::dispatcher::settle_all;
use nlp_dashboard::{Dispatcher, HttpTransport, Outcome, Page, Region};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_env()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let text = if args.is_empty() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        args.join(" ")
    };

    let transport = Arc::new(HttpTransport::new(settings.analyzer_url.clone()));
    let page = Arc::new(Page::with_input(text, settings.summary_type.clone()));
    let dispatcher = Dispatcher::new(transport, page.clone());

    let outcomes = settle_all(dispatcher.run_full_analysis()).await;

    let snapshot = page.snapshot();
    if let Some(notice) = snapshot.notices.first() {
        bail!("{}", notice);
    }

    for region in Region::ALL {
        println!("== #{} ==", region.element_id());
        println!("{}\n", snapshot.region(region).trim());
    }

    let failed = outcomes.iter().filter(|o| **o == Outcome::Failed).count();
    if failed > 0 {
        eprintln!("{} of {} analyses failed against {}", failed, outcomes.len(), settings.analyzer_url);
    }

    Ok(())
}
