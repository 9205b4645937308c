use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use usedbook_app::{models::NewListing, service::BookService};
use usedbook_kernel::settings::Settings;

/// Operate the used book inventory service
#[derive(Debug, Parser)]
#[command(name = "usedbook-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Print the effective configuration as JSON
    Config,
    /// Work with the configured book store directly
    #[command(subcommand)]
    Books(BooksCommand),
}

#[derive(Debug, Subcommand)]
enum BooksCommand {
    /// List every copy in stock
    List,
    /// List a new copy for sale
    SellNew(SellNewArgs),
    /// Buy a copy, removing it from stock
    Buy { id: String },
    /// Resell a copy at a depreciated price
    Resell {
        /// Copy identifier
        #[arg(required_unless_present = "isbn", conflicts_with = "isbn")]
        id: Option<String>,
        /// Locate the copy by ISBN instead
        #[arg(long)]
        isbn: Option<String>,
    },
}

#[derive(Debug, Args)]
struct SellNewArgs {
    #[arg(long)]
    isbn: String,
    #[arg(long)]
    title: String,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    edition: Option<String>,
    #[arg(long)]
    price: f64,
}

impl From<SellNewArgs> for NewListing {
    fn from(args: SellNewArgs) -> Self {
        Self {
            isbn: args.isbn,
            title: args.title,
            author: args.author,
            edition: args.edition,
            price: args.price,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load settings")?;
    usedbook_telemetry::init(&settings.telemetry)?;

    tracing::debug!(env = ?settings.environment, command = ?cli.command, "usedbook-cli starting");

    match cli.command {
        Command::Serve => usedbook_app::run(settings).await,
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
        Command::Books(command) => run_books(&settings, command).await,
    }
}

async fn run_books(settings: &Settings, command: BooksCommand) -> anyhow::Result<()> {
    let store = usedbook_db::connect(&settings.store)
        .await
        .context("failed to open book store")?;
    let service = BookService::new(store);

    match command {
        BooksCommand::List => {
            let books = service.get_available_books().await?;
            println!("{}", serde_json::to_string_pretty(&books)?);
        }
        BooksCommand::SellNew(args) => {
            let price = service.sell_new_book(args.into()).await?;
            println!("listed at {price}");
        }
        BooksCommand::Buy { id } => {
            service.buy_book(&id).await?;
            println!("bought {id}");
        }
        BooksCommand::Resell { id, isbn } => {
            let price = match (id, isbn) {
                (Some(id), _) => service.sell_book(&id).await?,
                (None, Some(isbn)) => service.sell_book_by_isbn(&isbn).await?,
                (None, None) => anyhow::bail!("either an id or --isbn is required"),
            };
            println!("resold at {price}");
        }
    }

    Ok(())
}
