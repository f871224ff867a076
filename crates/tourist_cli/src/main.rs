//! Command-line driver over `tourist_core` services.
//!
//! Every invocation opens the database, runs one use-case and prints the
//! resulting list changes as they are published.

mod args;

use anyhow::{anyhow, Context};
use args::{AlbumCmd, Cli, Command, PinCmd, RegionCmd};
use clap::Parser;
use std::sync::Arc;
use tourist_core::db::open_db;
use tourist_core::{
    default_log_level, init_logging, AlbumPage, AlbumService, ChangeEvent, ChangeHub, ChangeKind,
    ChangeListener, Collection, Coordinate, FlickrClient, FlickrConfig, MapRegion, PinId,
    PinService, RegionService, RegionSpan, ReqwestTransport, SearchDisabled,
    SqlitePhotoRepository, SqlitePinRepository, SqlitePreferenceRepository,
};

/// Prints each published change as one line on stderr.
struct ChangePrinter;

impl ChangeListener for ChangePrinter {
    fn on_change(&self, event: &ChangeEvent) {
        let sign = match event.kind {
            ChangeKind::Insert => '+',
            ChangeKind::Delete => '-',
        };
        match event.collection {
            Collection::Pins => eprintln!("{sign} pins[{}] {}", event.index, event.record_id),
            Collection::Album(pin_id) => eprintln!(
                "{sign} album({pin_id})[{}] {}",
                event.index, event.record_id
            ),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| anyhow!(err))?;
    }

    if let Command::Ping = cli.command {
        println!("tourist_core ping={}", tourist_core::ping());
        println!("tourist_core version={}", tourist_core::core_version());
        return Ok(());
    }

    let conn = open_db(&cli.db).with_context(|| format!("opening {}", cli.db.display()))?;
    let feed = Arc::new(ChangeHub::new());
    feed.subscribe(Arc::new(ChangePrinter));

    match cli.command {
        Command::Ping => {}
        Command::Pin { cmd } => {
            let service = PinService::new(SqlitePinRepository::new(&conn), feed);
            match cmd {
                PinCmd::Add { lat, lon } => {
                    let pin = service.drop_pin(Coordinate::new(lat, lon)?)?;
                    println!("{}", pin.id);
                }
                PinCmd::List => {
                    for pin in service.list_pins()? {
                        println!(
                            "{}\t{}\t{}\t{}",
                            pin.id, pin.latitude, pin.longitude, pin.created_at
                        );
                    }
                }
                PinCmd::Delete { pin_id } => service.delete_pin(parse_pin_id(&pin_id)?)?,
            }
        }
        Command::Album { cmd } => {
            let pins = SqlitePinRepository::new(&conn);
            let photos = SqlitePhotoRepository::new(&conn);
            match cmd {
                AlbumCmd::Show { pin_id } => {
                    let client = flickr_client(cli.api_key)?;
                    let service = AlbumService::new(pins, photos, client, feed);
                    print_album(&service.load_album(parse_pin_id(&pin_id)?)?)
                }
                AlbumCmd::New { pin_id } => {
                    let client = flickr_client(cli.api_key)?;
                    let service = AlbumService::new(pins, photos, client, feed);
                    print_album(&service.new_collection(parse_pin_id(&pin_id)?)?)
                }
                AlbumCmd::Clear { pin_id } => {
                    let service = AlbumService::new(pins, photos, SearchDisabled, feed);
                    let removed = service.clear_album(parse_pin_id(&pin_id)?)?;
                    println!("removed {removed} photo(s)");
                }
            }
        }
        Command::Region { cmd } => {
            let service = RegionService::new(SqlitePreferenceRepository::new(&conn));
            match cmd {
                RegionCmd::Show => {
                    let saved = service.saved_region()?;
                    match saved.center {
                        Some(center) => {
                            println!("center\t{}\t{}", center.latitude, center.longitude)
                        }
                        None => println!("center\t-"),
                    }
                    match saved.span {
                        Some(span) => {
                            println!("span\t{}\t{}", span.latitude_delta, span.longitude_delta)
                        }
                        None => println!("span\t-"),
                    }
                }
                RegionCmd::Set {
                    lat,
                    lon,
                    lat_delta,
                    lon_delta,
                } => {
                    let region = MapRegion {
                        center: Coordinate::new(lat, lon)?,
                        span: RegionSpan::new(lat_delta, lon_delta)?,
                    };
                    service.record_region_change(&region, true)?;
                }
            }
        }
    }

    Ok(())
}

fn flickr_client(api_key: Option<String>) -> anyhow::Result<FlickrClient> {
    let config = match api_key {
        Some(key) => FlickrConfig::new(key)?,
        None => FlickrConfig::from_env()?,
    };
    Ok(FlickrClient::<ReqwestTransport>::connect(config)?)
}

fn parse_pin_id(value: &str) -> anyhow::Result<PinId> {
    PinId::parse(value).with_context(|| format!("invalid pin id `{value}`"))
}

fn print_album(page: &AlbumPage) {
    if page.is_empty() {
        println!("no photos found for this location");
    }
    for photo in &page.photos {
        println!("{}\t{}", photo.id, photo.image_url().unwrap_or("<binary>"));
    }
    if page.failed_writes > 0 {
        eprintln!("{} photo(s) could not be stored", page.failed_writes);
    }
}
