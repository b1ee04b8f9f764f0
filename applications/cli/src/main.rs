/// Disco - personal album listening tracker
use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use disco_catalog::LastFmClient;
use disco_cli::{args, config::DiscoConfig, output};
use disco_core::{
    types::{AlbumId, CreateAlbum, MetadataPatch, Patch, UpdateAlbum, UserId},
    AlbumQuery, AlbumSort, AlbumStatus, CollectionStats, FavoritesInput, MetadataProvider,
    StorageContext,
};
use disco_storage::{users, LocalStorageContext};
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "disco")]
#[command(about = "Track the albums you queue, play and rate", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Act for this user instead of the configured one
    #[arg(short, long, global = true)]
    user: Option<UserId>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List your albums
    List {
        /// Match title or artist
        #[arg(short, long)]
        search: Option<String>,
        /// Only albums with this status
        #[arg(long, value_parser = args::parse_status)]
        status: Option<AlbumStatus>,
        /// date_added, title, artist or status
        #[arg(long, value_parser = args::parse_sort, default_value = "date_added")]
        sort: AlbumSort,
    },
    /// Show one album with its catalog info
    Show { id: AlbumId },
    /// Add an album to your collection
    Add(AddArgs),
    /// Change fields of an album
    Update(UpdateArgs),
    /// Delete an album and its history
    Delete { id: AlbumId },
    /// Mark or unmark a favorite track
    Favorite { id: AlbumId, track: String },
    /// Listening history of an album
    #[command(subcommand)]
    History(HistoryCommand),
    /// Albums listened to in a month
    Calendar {
        /// YYYY-MM, defaults to the current month
        #[arg(value_parser = args::parse_month)]
        month: Option<(i32, u32)>,
    },
    /// Every user's albums, most recently listened first
    Community,
    /// Counts per status and average rating
    Stats,
    /// Search the catalog
    Search { query: String },
    /// Track listing and notes from the catalog
    Info { artist: String, title: String },
    /// Create a new user
    AddUser { username: String },
    /// List all users
    ListUsers,
    /// Delete a user with all their albums
    DeleteUser { id: UserId },
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
struct AddArgs {
    title: String,
    artist: String,
    #[arg(long)]
    cover: Option<String>,
    #[arg(long, value_parser = args::parse_status)]
    status: Option<AlbumStatus>,
    #[arg(long)]
    rating: Option<f64>,
    #[arg(long)]
    review: Option<String>,
    /// Favorite track, repeatable
    #[arg(long = "favorite")]
    favorites: Vec<String>,
    /// Date the album was listened to
    #[arg(long)]
    listened_at: Option<String>,
    /// Override the creation time
    #[arg(long)]
    date_added: Option<String>,
}

#[derive(Args)]
struct UpdateArgs {
    id: AlbumId,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    artist: Option<String>,
    #[arg(long)]
    cover: Option<String>,
    #[arg(long, value_parser = args::parse_status)]
    status: Option<AlbumStatus>,
    #[arg(long)]
    rating: Option<f64>,
    #[arg(long, conflicts_with = "clear_review")]
    review: Option<String>,
    #[arg(long)]
    clear_review: bool,
    /// Replace all favorites, encoded as "One;;Two"
    #[arg(long)]
    favorites: Option<String>,
    #[arg(long, conflicts_with = "clear_listened_at")]
    listened_at: Option<String>,
    /// Clear the single legacy listen date
    #[arg(long)]
    clear_listened_at: bool,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// Days an album was listened to, most recent first
    List { id: AlbumId },
    /// Record a listen
    Add {
        id: AlbumId,
        /// Defaults to today
        #[arg(value_parser = args::parse_day)]
        date: Option<NaiveDate>,
    },
    /// Forget a listen
    Remove {
        id: AlbumId,
        #[arg(value_parser = args::parse_day)]
        date: NaiveDate,
    },
}

impl From<UpdateArgs> for UpdateAlbum {
    fn from(args: UpdateArgs) -> Self {
        let review = if args.clear_review {
            Patch::Set(None)
        } else {
            Patch::from_option(args.review.map(Some))
        };
        let listened_at = if args.clear_listened_at {
            Patch::Set(None)
        } else {
            Patch::from_option(args.listened_at.map(Some))
        };

        UpdateAlbum {
            status: Patch::from_option(args.status),
            rating: Patch::from_option(args.rating),
            review,
            favorites: Patch::from_option(args.favorites.map(FavoritesInput::Encoded)),
            listened_at,
            metadata: MetadataPatch {
                title: Patch::from_option(args.title),
                artist: Patch::from_option(args.artist),
                cover: Patch::from_option(args.cover),
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "disco=info,disco_cli=info,disco_storage=info,disco_catalog=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = DiscoConfig::load(cli.config.as_deref())?;
    if let Some(user) = cli.user {
        config.user.id = user;
    }
    config.validate()?;

    let app = App { config, json: cli.json };
    app.run(cli.command).await
}

struct App {
    config: DiscoConfig,
    json: bool,
}

impl App {
    async fn run(&self, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Config => {
                print!("{}", self.config.to_toml()?);
                Ok(())
            }
            Commands::Search { query } => {
                let hits = self.catalog()?.search_albums(&query).await?;
                self.emit(&hits, || {
                    hits.iter().map(output::catalog_hit).collect::<Vec<_>>().join("\n")
                })
            }
            Commands::Info { artist, title } => {
                let info = self.catalog()?.album_info(&artist, &title).await;
                self.emit(&info, || output::album_info(&info))
            }
            command => self.run_with_storage(command).await,
        }
    }

    async fn run_with_storage(&self, command: Commands) -> anyhow::Result<()> {
        let pool = self.open_database().await?;
        let storage = LocalStorageContext::new(pool.clone(), self.config.user.id);

        match command {
            Commands::List {
                search,
                status,
                sort,
            } => {
                let albums = storage.list_albums().await?;
                let query = AlbumQuery {
                    search,
                    status,
                    sort,
                };
                let selected = query.apply(&albums);
                self.emit(&selected, || {
                    selected
                        .iter()
                        .map(|album| output::album_line(album))
                        .collect::<Vec<_>>()
                        .join("\n")
                })?;
            }
            Commands::Show { id } => {
                let album = storage
                    .get_album(id)
                    .await?
                    .with_context(|| format!("Album {id} not found"))?;
                let info = self.catalog()?.album_info(&album.artist, &album.title).await;
                self.emit(&album, || output::album_detail(&album, &info))?;
            }
            Commands::Add(add) => {
                let album = storage
                    .create_album(CreateAlbum {
                        title: add.title,
                        artist: add.artist,
                        cover: add.cover,
                        status: add.status,
                        rating: add.rating,
                        review: add.review,
                        favorites: (!add.favorites.is_empty())
                            .then(|| FavoritesInput::List(add.favorites)),
                        date_added: add.date_added,
                        listened_at: add.listened_at,
                    })
                    .await?;
                tracing::info!(album_id = album.id, "Album added");
                self.emit(&album, || output::album_line(&album))?;
            }
            Commands::Update(update) => {
                let id = update.id;
                let update = UpdateAlbum::from(update);
                if update.is_empty() {
                    anyhow::bail!("Nothing to update");
                }
                let album = storage.update_album(id, update).await?;
                self.emit(&album, || output::album_line(&album))?;
            }
            Commands::Delete { id } => {
                storage.delete_album(id).await?;
                println!("Deleted album {id}");
            }
            Commands::Favorite { id, track } => {
                let album = storage.toggle_favorite(id, &track).await?;
                let state = if album.favorites.contains(&track) {
                    "Added"
                } else {
                    "Removed"
                };
                self.emit(&album.favorites, || format!("{state} favorite {track:?}"))?;
            }
            Commands::History(HistoryCommand::List { id }) => {
                let album = storage
                    .get_album(id)
                    .await?
                    .with_context(|| format!("Album {id} not found"))?;
                let dates = album.history.dates_desc();
                self.emit(&dates, || output::history(&dates))?;
            }
            Commands::History(HistoryCommand::Add { id, date }) => {
                let date = date.unwrap_or_else(|| Local::now().date_naive());
                let dates = storage.add_history_date(id, date).await?;
                self.emit(&dates, || output::history(&dates))?;
            }
            Commands::History(HistoryCommand::Remove { id, date }) => {
                let dates = storage.remove_history_date(id, date).await?;
                self.emit(&dates, || output::history(&dates))?;
            }
            Commands::Calendar { month } => {
                let (year, month) = month.unwrap_or_else(|| {
                    let today = Local::now().date_naive();
                    (today.year(), today.month())
                });
                let calendar = storage.get_calendar(year, month).await?;
                self.emit(&calendar, || output::calendar(&calendar))?;
            }
            Commands::Community => {
                let feed = storage.community_albums().await?;
                self.emit(&feed, || {
                    feed.iter()
                        .map(output::community_line)
                        .collect::<Vec<_>>()
                        .join("\n")
                })?;
            }
            Commands::Stats => {
                let albums = storage.list_albums().await?;
                let stats = CollectionStats::from_albums(&albums);
                self.emit(&stats, || output::stats(&stats))?;
            }
            Commands::AddUser { username } => {
                let user = users::create(&pool, &username).await?;
                self.emit(&user, || output::user_line(&user))?;
            }
            Commands::ListUsers => {
                let all = users::get_all(&pool).await?;
                self.emit(&all, || {
                    all.iter().map(output::user_line).collect::<Vec<_>>().join("\n")
                })?;
            }
            Commands::DeleteUser { id } => {
                users::delete(&pool, id).await?;
                println!("Deleted user {id}");
            }
            Commands::Config | Commands::Search { .. } | Commands::Info { .. } => {}
        }

        Ok(())
    }

    async fn open_database(&self) -> anyhow::Result<SqlitePool> {
        if let Some(parent) = self
            .config
            .database_path()
            .and_then(|path| path.parent().map(ToOwned::to_owned))
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            std::fs::create_dir_all(&parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let pool = disco_storage::open(&self.config.storage.database_url).await?;
        tracing::debug!("Database ready");
        Ok(pool)
    }

    fn catalog(&self) -> anyhow::Result<LastFmClient> {
        let client = LastFmClient::new(self.config.catalog_config())?;
        if !client.is_enabled() {
            tracing::warn!("No catalog API key configured (set DISCO_CATALOG__API_KEY)");
        }
        Ok(client)
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            let rendered = text();
            if !rendered.is_empty() {
                println!("{}", rendered.trim_end());
            }
        }
        Ok(())
    }
}
