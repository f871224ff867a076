use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Drop map pins and browse a Flickr photo album per pin",
    long_about = "Command-line driver for the Virtual Tourist core: manages pins, their photo albums and the saved map region in a local SQLite database."
)]
pub struct Cli {
    #[arg(
        long,
        env = "TOURIST_DB_PATH",
        default_value = "virtual_tourist.sqlite3",
        value_name = "FILE",
        help = "SQLite database file"
    )]
    pub db: PathBuf,

    #[arg(
        long,
        value_name = "DIR",
        help = "Absolute directory for rolling log files; logging is off when omitted"
    )]
    pub log_dir: Option<String>,

    #[arg(long, value_name = "LEVEL", help = "Log level (trace|debug|info|warn|error)")]
    pub log_level: Option<String>,

    #[arg(
        long,
        env = "TOURIST_FLICKR_API_KEY",
        hide_env_values = true,
        value_name = "KEY",
        help = "Flickr API key used by album commands"
    )]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Check that the core library is linked")]
    Ping,
    #[command(about = "Manage pins")]
    Pin {
        #[command(subcommand)]
        cmd: PinCmd,
    },
    #[command(about = "Show or refresh the photo album of a pin")]
    Album {
        #[command(subcommand)]
        cmd: AlbumCmd,
    },
    #[command(about = "Show or store the last map region")]
    Region {
        #[command(subcommand)]
        cmd: RegionCmd,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum PinCmd {
    #[command(about = "Drop a pin at a coordinate")]
    Add {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    #[command(about = "List pins, newest first")]
    List,
    #[command(about = "Delete a pin and its album")]
    Delete { pin_id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AlbumCmd {
    #[command(about = "Show the album, searching Flickr when it is empty")]
    Show { pin_id: String },
    #[command(about = "Replace the album with a new search result")]
    New { pin_id: String },
    #[command(about = "Remove all photos of a pin")]
    Clear { pin_id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum RegionCmd {
    #[command(about = "Print the saved map region")]
    Show,
    #[command(about = "Store a map region as if the user had moved the map")]
    Set {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long)]
        lat_delta: f64,
        #[arg(long)]
        lon_delta: f64,
    },
}
