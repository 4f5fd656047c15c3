use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use codeshelf_client::{BookId, CatalogView, HttpCatalog, Outcome};
use codeshelf_kernel::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "codeshelf", version, about = "Book catalog server and client")]
struct Cli {
    /// Catalog server to talk to
    #[arg(long, global = true, env = "CODESHELF_URL", default_value = "http://127.0.0.1:3000")]
    url: String,

    /// Client request timeout in milliseconds
    #[arg(long, global = true, default_value_t = 5000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the catalog server
    Serve,
    /// Show every book
    List,
    /// Add a book; the server assigns its id
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Edit fields of an existing book
    Edit {
        #[arg(long)]
        id: BookId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a book
    Delete {
        #[arg(long)]
        id: BookId,
    },
    /// Flip a book's availability
    Toggle {
        #[arg(long)]
        id: BookId,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load codeshelf settings")?;
    codeshelf_telemetry::init(&settings.telemetry)?;

    if let Command::Serve = cli.command {
        tracing::info!(env = ?settings.environment, "serving catalog from the CLI");
        return codeshelf_app::serve(&settings).await;
    }

    let api = HttpCatalog::new(&cli.url, Duration::from_millis(cli.timeout_ms))
        .with_context(|| format!("failed to build client for {}", cli.url))?;
    let mut view = CatalogView::new(api);
    view.mount().await;

    let outcome = match cli.command {
        Command::Serve | Command::List => None,
        Command::Add {
            title,
            author,
            image,
        } => {
            view.set_title(title);
            view.set_author(author);
            view.set_image(image);
            Some(view.save().await)
        }
        Command::Edit {
            id,
            title,
            author,
            image,
        } => {
            if view.begin_edit(id) {
                if let Some(title) = title {
                    view.set_title(title);
                }
                if let Some(author) = author {
                    view.set_author(author);
                }
                if let Some(image) = image {
                    view.set_image(image);
                }
                Some(view.save().await)
            } else {
                Some(Outcome::Skipped)
            }
        }
        Command::Delete { id } => Some(view.delete(id).await),
        Command::Toggle { id } => Some(view.toggle_availability(id).await),
    };

    print!("{}", view.render());
    if let Some(outcome) = outcome {
        tracing::info!(?outcome, "request finished");
    }

    Ok(())
}
