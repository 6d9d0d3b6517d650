use base::setting::{self, Settings};
use base::CLI_NAME;
use clap::{Args, Parser, Subcommand};
use common::autotag::{ExtraTag, MusicBrainz};
use common::fetch::musicbrainz::Client;
use common::library::Library;
use common::plugins::{embedart::EmbedArt, Hooks};
use common::query::Query;
use eyre::{Result, WrapErr};
use futures::StreamExt;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    prelude::*,
};

#[derive(Parser)]
#[command(name = CLI_NAME, author, version, about, long_about = None)]
#[command(next_line_help = true)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Embed an image file into the items of the first matching album
    Embedart {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
        #[arg(value_name = "QUERY")]
        query: Vec<String>,
    },
    /// Extract the embedded image of the first matching item
    Extractart {
        /// Image output file, without extension
        #[arg(short, value_name = "OUTPUT", default_value = "cover")]
        output: PathBuf,
        #[arg(value_name = "QUERY")]
        query: Vec<String>,
    },
    /// Fetch a MusicBrainz release by id or URL
    Album {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Fetch a MusicBrainz recording by id or URL
    Track {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Search MusicBrainz for releases
    SearchAlbum(SearchAlbumOptions),
    /// Search MusicBrainz for recordings
    SearchTrack(SearchTrackOptions),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
struct SearchAlbumOptions {
    #[arg(long)]
    album: String,
    /// Leave out to search for various artists releases
    #[arg(long)]
    artist: Option<String>,
    #[arg(long)]
    tracks: Option<usize>,
    #[arg(long)]
    catalognum: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    label: Option<String>,
    #[arg(long)]
    media: Option<String>,
    #[arg(long)]
    year: Option<String>,
}

impl SearchAlbumOptions {
    fn extra_tags(&self) -> BTreeMap<ExtraTag, String> {
        [
            (ExtraTag::CatalogNum, &self.catalognum),
            (ExtraTag::Country, &self.country),
            (ExtraTag::Label, &self.label),
            (ExtraTag::Media, &self.media),
            (ExtraTag::Year, &self.year),
        ]
        .into_iter()
        .filter_map(|(tag, value)| value.clone().map(|v| (tag, v)))
        .collect()
    }
}

#[derive(Args)]
struct SearchTrackOptions {
    #[arg(long)]
    artist: String,
    #[arg(long)]
    title: String,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn musicbrainz(settings: &Arc<Settings>) -> Result<MusicBrainz<Client>> {
    let client = Client::new(&settings.musicbrainz).wrap_err("Could not build MusicBrainz client")?;
    Ok(MusicBrainz::new(
        client,
        settings.clone(),
        Arc::new(Hooks::default()),
    ))
}

fn library(settings: &Settings) -> Result<Library> {
    Library::open(&settings.library.path, &settings.library.art_name).wrap_err(format!(
        "Could not open library at {:?}",
        settings.library.path
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    color_eyre::install()?;
    let tracing_builder = tracing_subscriber::registry().with(fmt::layer());
    if std::env::var(base::TAGGER_LOGLEVEL).is_ok() {
        tracing_builder.with(EnvFilter::from_env(base::TAGGER_LOGLEVEL))
    } else {
        tracing_builder.with(EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
    .init();

    let cli = Cli::parse();
    let settings = Arc::new(setting::load(cli.config)?);

    match cli.command {
        Command::Embedart { image, query } => {
            let plugin = EmbedArt::new(settings.embedart.clone());
            let written = plugin.embed_command(&library(&settings)?, &image, &Query::parse(&query))?;
            tracing::info! {written, "Done embedding"};
        }
        Command::Extractart { output, query } => {
            let plugin = EmbedArt::new(settings.embedart.clone());
            if let Some(path) =
                plugin.extract_command(&library(&settings)?, &output, &Query::parse(&query))?
            {
                println!("{}", path.display());
            }
        }
        Command::Album { id } => match musicbrainz(&settings)?.album_for_id(&id).await? {
            Some(album) => print_json(&album)?,
            None => tracing::warn! {%id, "Release not found"},
        },
        Command::Track { id } => match musicbrainz(&settings)?.track_for_id(&id).await? {
            Some(track) => print_json(&track)?,
            None => tracing::warn! {%id, "Recording not found"},
        },
        Command::SearchAlbum(opts) => {
            let mb = musicbrainz(&settings)?;
            let mut albums = mb
                .match_album(
                    opts.artist.as_deref(),
                    &opts.album,
                    opts.tracks,
                    &opts.extra_tags(),
                )
                .await?;
            while let Some(album) = albums.next().await {
                print_json(&album?)?;
            }
        }
        Command::SearchTrack(opts) => {
            for track in musicbrainz(&settings)?
                .match_track(&opts.artist, &opts.title)
                .await?
            {
                print_json(&track)?;
            }
        }
        Command::Config => println!("{}", toml::to_string(settings.as_ref())?),
    }
    Ok(())
}
