use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::{Parser, Subcommand};
use relays::{
    AssignmentContext, AssignmentEngine, CompetitorSelection, Config, LegAssigner,
    MoveConfirmation, MovePrompt, Registrar, RelaySlot, SqlRunStore,
};
use serde::Serialize;
use storage::Database;
use storage::dto::registration::CreateRegistrationRequest;
use storage::dto::relay::CreateRelayRequest;
use storage::repository::{
    ClassRepository, RegistrationRepository, RelayRepository, RunRepository,
};
use tokio::sync::broadcast::Receiver;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use validator::Validate;

#[derive(Parser)]
#[command(name = "relay-legs")]
#[command(about = "Assign competitors to relay legs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Overrides DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer "yes" when a competitor has to be taken from another relay
    #[arg(short, long, global = true)]
    yes: bool,
}

#[derive(Subcommand)]
enum Commands {
    AddClass {
        name: String,
    },
    AddRelay {
        #[arg(long)]
        class: i64,
        #[arg(long)]
        club: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    AddRegistration {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        registration: Option<String>,
        #[arg(long)]
        licence: Option<String>,
        #[arg(long)]
        si_id: Option<i64>,
    },
    Classes,
    Relays,
    Candidates,
    Registrations,
    Legs {
        #[arg(long)]
        relay: i64,
    },
    FreeLeg {
        #[arg(long)]
        relay: i64,
    },
    /// Put an existing competitor on the next free leg of a relay
    Assign {
        #[arg(long)]
        relay: i64,
        #[arg(long)]
        competitor: i64,
        /// Run to reuse when the competitor has several
        #[arg(long)]
        run: Option<i64>,
    },
    /// Create a competitor from a registration and put it on a relay
    Register {
        #[arg(long)]
        relay: i64,
        #[arg(long)]
        registration: i64,
    },
}

struct PromptConfirmation {
    assume_yes: bool,
    input: Mutex<Box<dyn BufRead + Send>>,
}

impl PromptConfirmation {
    fn stdin(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            input: Mutex::new(Box::new(io::BufReader::new(io::stdin()))),
        }
    }
}

impl MoveConfirmation for PromptConfirmation {
    fn confirm_move(&self, prompt: &MovePrompt) -> bool {
        if self.assume_yes {
            return true;
        }

        print!(
            "{} (competitor {}, relay {} -> {}) [y/N] ",
            prompt.message(),
            prompt.competitor_id,
            prompt.from_relay_id,
            prompt.to_relay_id
        );
        if io::stdout().flush().is_err() {
            return false;
        }

        // Called from inside the runtime; the worker is handed off while
        // stdin blocks.
        let answer = tokio::task::block_in_place(|| {
            let mut answer = String::new();
            match self.input.lock() {
                Ok(mut input) => input.read_line(&mut answer).map(|_| answer),
                Err(_) => Err(io::Error::other("prompt input is poisoned")),
            }
        });
        match answer {
            Ok(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("relay_legs={},relays={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let database_url = cli
        .database_url
        .clone()
        .or_else(|| config.database_url.clone())
        .context("DATABASE_URL is not set")?;

    let db = Database::new(&database_url)
        .await
        .context("Failed to open event database")?;
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::debug!("Database ready");

    let store = Arc::new(SqlRunStore::new(&db, config.stage_count));
    let context = AssignmentContext::new(store.clone());

    match cli.command {
        Commands::AddClass { name } => {
            let mut conn = db.pool().acquire().await?;
            let class = ClassRepository::new(&mut conn).create(&name).await?;
            print_json(&class)?;
        }
        Commands::AddRelay { class, club, name } => {
            let request = CreateRelayRequest {
                class_id: class,
                club,
                name,
            };
            request.validate()?;
            let mut conn = db.pool().acquire().await?;
            ClassRepository::new(&mut conn)
                .find_by_id(class)
                .await
                .with_context(|| format!("Class {} not found", class))?;
            let relay = RelayRepository::new(&mut conn).create(&request).await?;
            print_json(&relay)?;
        }
        Commands::AddRegistration {
            first_name,
            last_name,
            registration,
            licence,
            si_id,
        } => {
            let request = CreateRegistrationRequest {
                first_name,
                last_name,
                registration,
                licence,
                si_id,
            };
            request.validate()?;
            let mut conn = db.pool().acquire().await?;
            let registration = RegistrationRepository::new(&mut conn)
                .create(&request)
                .await?;
            print_json(&registration)?;
        }
        Commands::Classes => {
            let mut conn = db.pool().acquire().await?;
            print_json(&ClassRepository::new(&mut conn).list().await?)?;
        }
        Commands::Relays => {
            let mut conn = db.pool().acquire().await?;
            print_json(&RelayRepository::new(&mut conn).list().await?)?;
        }
        Commands::Candidates => {
            let mut conn = db.pool().acquire().await?;
            print_json(&RunRepository::new(&mut conn).list_candidates().await?)?;
        }
        Commands::Registrations => {
            let mut conn = db.pool().acquire().await?;
            print_json(&RegistrationRepository::new(&mut conn).list().await?)?;
        }
        Commands::Legs { relay } => {
            print_relay_legs(&db, relay).await?;
        }
        Commands::FreeLeg { relay } => {
            let leg = LegAssigner::new(store).find_free_leg(relay).await?;
            println!("{}", leg);
        }
        Commands::Assign {
            relay,
            competitor,
            run,
        } => {
            let slot = relay_slot(&db, relay).await?;
            let candidate = {
                let mut conn = db.pool().acquire().await?;
                RunRepository::new(&mut conn)
                    .find_candidate(competitor, run)
                    .await
                    .with_context(|| format!("Competitor {} not found", competitor))?
            };

            let mut leg_added = context.notifier.subscribe();
            let engine = AssignmentEngine::new(
                context,
                Arc::new(PromptConfirmation::stdin(cli.yes)),
                config.same_relay_policy,
            );
            let assignment = engine
                .assign(&CompetitorSelection::from(&candidate), slot)
                .await
                .context("Assignment failed")?;
            print_json(&assignment)?;
            refresh_on_leg_added(&db, relay, &mut leg_added).await?;
        }
        Commands::Register {
            relay,
            registration,
        } => {
            let slot = relay_slot(&db, relay).await?;
            let registration = {
                let mut conn = db.pool().acquire().await?;
                RegistrationRepository::new(&mut conn)
                    .find_by_id(registration)
                    .await
                    .with_context(|| format!("Registration {} not found", registration))?
            };

            let mut leg_added = context.notifier.subscribe();
            let registered = Registrar::new(context)
                .register_and_assign(&registration, slot)
                .await
                .context("Registration failed")?;
            print_json(&registered)?;
            refresh_on_leg_added(&db, relay, &mut leg_added).await?;
        }
    }

    Ok(())
}

async fn relay_slot(db: &Database, relay_id: i64) -> anyhow::Result<RelaySlot> {
    let mut conn = db.pool().acquire().await?;
    let relay = RelayRepository::new(&mut conn)
        .find_by_id(relay_id)
        .await
        .with_context(|| format!("Relay {} not found", relay_id))?;
    tracing::debug!(relay_id, relay = %relay.display_name(), "target relay");

    Ok(RelaySlot::new(relay.id, relay.class_id))
}

async fn refresh_on_leg_added(
    db: &Database,
    relay_id: i64,
    leg_added: &mut Receiver<relays::LegAdded>,
) -> anyhow::Result<()> {
    if leg_added.try_recv().is_ok() {
        print_relay_legs(db, relay_id).await?;
    }
    Ok(())
}

async fn print_relay_legs(db: &Database, relay_id: i64) -> anyhow::Result<()> {
    let mut conn = db.pool().acquire().await?;
    let legs = RunRepository::new(&mut conn)
        .list_relay_legs(relay_id)
        .await?;
    print_json(&legs)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
