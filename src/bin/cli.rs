use anyhow::bail;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::interval;
use uuid::Uuid;

use nutrilog::client::api::ApiClient;
use nutrilog::client::controller::{Controller, ROLLOVER_CHECK_INTERVAL, SYNC_INTERVAL};
use nutrilog::client::identity::InstallationStore;
use nutrilog::client::state::NutritionGoals;

#[derive(Parser)]
#[command(name = "nutrilog-cli", about = "Log meals and track daily macros against goals")]
struct Cli {
    /// Base URL of the nutrilog server.
    #[arg(long, env = "NUTRILOG_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    server: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate and log a food description for today (or an explicit date).
    Add {
        food: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Show a day's entries, totals and goal progress.
    List {
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete one entry by id.
    Delete { id: Uuid },
    /// Keep the day's log in sync, reading add/del commands from stdin.
    Watch,
    /// Forget the locally stored identity; a new one is generated on next use.
    ResetIdentity,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(store) = InstallationStore::open() else {
        bail!("no durable data directory available; cannot establish a user identity");
    };

    match cli.command {
        Command::ResetIdentity => {
            store.clear()?;
            println!("stored identity cleared");
            Ok(())
        }
        command => {
            let api = ApiClient::new(cli.server);
            let controller = Controller::new(api, store, NutritionGoals::default())?;
            run(controller, command).await
        }
    }
}

async fn run(mut controller: Controller, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Add { food, date } => {
            if let Some(date) = date {
                controller.log.date = date;
            }
            controller.add_food(&food).await;
            if let Some(error) = &controller.log.error {
                bail!("{error}");
            }
            print_day(&controller);
        }
        Command::List { date } => {
            if let Some(date) = date {
                controller.log.date = date;
            }
            controller.refresh().await;
            if let Some(error) = &controller.log.error {
                bail!("{error}");
            }
            print_day(&controller);
        }
        Command::Delete { id } => {
            controller.remove(id).await;
            if let Some(error) = &controller.log.error {
                bail!("{error}");
            }
            println!("deleted {id}");
        }
        Command::Watch => watch(controller).await?,
        Command::ResetIdentity => unreachable!("handled before the controller is built"),
    }
    Ok(())
}

async fn watch(mut controller: Controller) -> anyhow::Result<()> {
    controller.start().await;
    print_day(&controller);
    println!("commands: add <food> | del <id> | quit");

    let mut sync = interval(SYNC_INTERVAL);
    let mut rollover = interval(ROLLOVER_CHECK_INTERVAL);
    // The first tick of an interval fires immediately; consume it.
    sync.tick().await;
    rollover.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = sync.tick() => {
                controller.refresh().await;
                print_day(&controller);
            }
            _ = rollover.tick() => {
                controller.check_rollover().await;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line == "quit" {
                    break;
                }
                if let Some(food) = line.strip_prefix("add ") {
                    controller.add_food(food).await;
                } else if let Some(id) = line.strip_prefix("del ") {
                    match id.trim().parse::<Uuid>() {
                        Ok(id) => controller.remove(id).await,
                        Err(_) => println!("not a valid entry id: {id}"),
                    }
                } else if !line.is_empty() {
                    println!("unrecognized command: {line}");
                }
                print_day(&controller);
            }
        }
    }
    Ok(())
}

fn print_day(controller: &Controller) {
    let log = &controller.log;
    println!();
    println!("{} ({} entries)", log.date, log.entries.len());
    for entry in &log.entries {
        println!(
            "  {}  {}  {:.0} kcal / {:.1}g protein / {:.1}g carbs / {:.1}g fats",
            entry.id, entry.description, entry.calories, entry.protein, entry.carbs, entry.fats
        );
    }
    let totals = controller.totals();
    let progress = controller.progress();
    println!(
        "  totals: {:.1} kcal ({:.0}%) / {:.1}g protein ({:.0}%) / {:.1}g carbs ({:.0}%) / {:.1}g fats ({:.0}%)",
        totals.calories,
        progress.calories,
        totals.protein,
        progress.protein,
        totals.carbs,
        progress.carbs,
        totals.fats,
        progress.fats
    );
    if let Some(error) = &log.error {
        println!("  error: {error}");
    }
}
