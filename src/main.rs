mod commands;
mod context;
mod notify;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::context::AppContext;

#[derive(Parser)]
#[command(name = "meetgrid")]
#[command(about = "Plan meetups by painting group availability on a shared date/time grid")]
struct Cli {
    /// Act as this user (overrides `username` from config)
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new event owned by you
    New {
        /// Event name
        name: String,

        /// Candidate dates, comma separated (e.g. "2022-08-03,2022-08-04")
        #[arg(short, long, value_delimiter = ',', required = true)]
        dates: Vec<String>,

        /// First visible time of day (e.g. "09:00")
        #[arg(long, default_value = "09:00")]
        from: String,

        /// End of the visible time of day (e.g. "17:00", or "24:00")
        #[arg(long, default_value = "17:00")]
        to: String,
    },
    /// List stored events
    List,
    /// Show an event's members and availability grid
    Show {
        event: String,

        /// How many of the best time slots to list
        #[arg(long, default_value_t = 5)]
        best: usize,

        /// Print the stored event document as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a month calendar, highlighting an event's candidate dates
    Month {
        /// Month to show as YYYY-MM (defaults to the current month)
        month: Option<String>,

        /// Event whose candidate dates to highlight
        #[arg(short, long)]
        event: Option<String>,
    },
    /// Add or remove candidate dates (owner only)
    Dates {
        event: String,

        #[arg(long, value_delimiter = ',')]
        add: Vec<String>,

        #[arg(long, value_delimiter = ',')]
        remove: Vec<String>,
    },
    /// Change the visible time of day (owner only)
    Range {
        event: String,

        /// e.g. "08:00"
        from: String,

        /// e.g. "20:00"
        to: String,
    },
    /// Join an event
    Join { event: String },
    /// Leave an event (the last member leaving deletes it)
    Leave { event: String },
    /// Drag a rectangle from one cell to another, like on the web grid
    ///
    /// Cells are DATE@TIME, e.g. 2022-08-03@18:00. Starting on a cell you
    /// already marked erases the rectangle; otherwise it marks you available.
    Paint {
        event: String,
        from: String,
        to: Option<String>,
    },
    /// Show or update the configuration
    Config {
        /// Save this as your default username
        #[arg(long)]
        username: Option<String>,

        /// Save this as the event data directory
        #[arg(long)]
        data_dir: Option<std::path::PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("MEETGRID_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("meetgrid=warn,meetgrid_core=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { username, data_dir } => commands::config::run(username, data_dir),
        command => {
            let ctx = AppContext::load(cli.user)?;
            dispatch(&ctx, command).await
        }
    }
}

async fn dispatch(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::New {
            name,
            dates,
            from,
            to,
        } => commands::new::run(ctx, &name, &dates, &from, &to).await,
        Commands::List => commands::list::run(ctx).await,
        Commands::Show { event, best, json } => commands::show::run(ctx, &event, best, json).await,
        Commands::Month { month, event } => {
            commands::month::run(ctx, month.as_deref(), event.as_deref()).await
        }
        Commands::Dates { event, add, remove } => {
            commands::dates::run(ctx, &event, &add, &remove).await
        }
        Commands::Range { event, from, to } => commands::range::run(ctx, &event, &from, &to).await,
        Commands::Join { event } => commands::membership::join(ctx, &event).await,
        Commands::Leave { event } => commands::membership::leave(ctx, &event).await,
        Commands::Paint { event, from, to } => {
            commands::paint::run(ctx, &event, &from, to.as_deref()).await
        }
        Commands::Config { username, data_dir } => commands::config::run(username, data_dir),
    }
}
