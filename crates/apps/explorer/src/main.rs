use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use catalog::seed::{demo_places, demo_store};
use catalog::{CatalogStore, EventDraft, ImageUpload, register, require_event};
use clap::{Parser, Subcommand};
use foundation::geo::SurfaceSize;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::ViewerConfig;

mod pages;
mod replay;

use pages::{Page, PageKind};
use replay::{Script, run_steps};

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse the demo event catalog on a headless map")]
struct Cli {
    /// JSON file overriding viewer settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Map container width in pixels
    #[arg(long, default_value_t = 375.0)]
    width: f64,

    /// Map container height in pixels
    #[arg(long, default_value_t = 300.0)]
    height: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the event catalog
    Events,
    /// Event list page: every event on the map
    Home,
    /// Location search page
    Search { query: String },
    /// Date course page: places joined by a route
    Course,
    /// Print one event
    Detail { id: String },
    /// Take a place at an event
    Register { id: String },
    /// Validate a new event and add it to the catalog
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        location: String,
        /// Start, as YYYY-MM-DDTHH:MM
        #[arg(long)]
        start: String,
        /// End, as YYYY-MM-DDTHH:MM
        #[arg(long)]
        end: String,
        #[arg(long, default_value = "other")]
        category: String,
        #[arg(long)]
        description: String,
        /// Cover image (png, jpg, gif or webp)
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long)]
        lat: Option<f64>,
        #[arg(long)]
        lng: Option<f64>,
    },
    /// Drive a page from a recorded session script
    Replay { script: PathBuf },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let size = SurfaceSize::new(cli.width, cli.height);
    let mut store = demo_store();

    match cli.command {
        Command::Events => print_json(&store.list()?),
        Command::Home => show_page(PageKind::Home, &config, &store, size),
        Command::Search { query } => show_page(PageKind::Search(query), &config, &store, size),
        Command::Course => show_page(PageKind::Course, &config, &store, size),
        Command::Detail { id } => print_json(&EventDetail::new(require_event(&store, &id)?)),
        Command::Register { id } => {
            let event = register(&mut store, &id)?;
            info!("registered for {}", event.title);
            print_json(&EventDetail::new(event))
        }
        Command::Create {
            title,
            location,
            start,
            end,
            category,
            description,
            image,
            lat,
            lng,
        } => {
            let image = image.as_deref().map(read_image).transpose()?;
            let draft = EventDraft {
                title,
                description,
                location,
                start,
                end,
                category,
                image,
            };
            let new_event = draft.validate()?;
            let center = config.initial_view.center;
            let event = new_event.into_event(lat.unwrap_or(center.lat), lng.unwrap_or(center.lng));
            store.upsert(event.clone())?;
            info!("created event {} ({} in catalog)", event.id, store.list()?.len());
            print_json(&event)
        }
        Command::Replay { script } => {
            let raw = fs::read_to_string(&script)
                .with_context(|| format!("read {}", script.display()))?;
            let script = Script::from_json(&raw).context("parse replay script")?;
            let mut page = Page::open(script.page_kind(), &config, store.list()?, demo_places());
            run_steps(&mut page, &script.steps);
            print_json(&page.report())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config = ViewerConfig::from_json(&raw)
        .with_context(|| format!("parse config {}", path.display()))?;
    info!("loaded config from {}", path.display());
    Ok(config)
}

fn show_page(
    kind: PageKind,
    config: &ViewerConfig,
    store: &impl CatalogStore,
    size: SurfaceSize,
) -> anyhow::Result<()> {
    let mut page = Page::open(kind, config, store.list()?, demo_places());
    page.sync.mount(size);
    page.settle();
    print_json(&page.report())
}

fn read_image(path: &Path) -> anyhow::Result<ImageUpload> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        other => bail!("unsupported image type {other:?}"),
    };
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(ImageUpload {
        mime: mime.to_string(),
        bytes,
    })
}

/// An event plus the numbers the detail page shows.
#[derive(Debug, Serialize)]
struct EventDetail {
    #[serde(flatten)]
    event: catalog::Event,
    spots_left: Option<u32>,
    fill_ratio: f64,
}

impl EventDetail {
    fn new(event: catalog::Event) -> Self {
        Self {
            spots_left: event.spots_left(),
            fill_ratio: event.fill_ratio(),
            event,
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
