use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::artwork::{ArtworkOptions, ArtworkRequest, FileSlot, via_local};
use crate::config;
use crate::domain::device::{Device, DeviceId, MediaSlot, TrackType};
use crate::domain::track::{Artwork, Track};
use crate::storage::mount::MountedMedia;

#[derive(Parser)]
#[command(name = "prolink-artwork")]
#[command(version)]
#[command(about = "Fetch track artwork from DJ player media")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured devices and whether their media is mounted
    Devices,
    /// Read a track's artwork file off mounted USB or SD media
    Fetch {
        /// Device number of the player
        #[arg(short, long)]
        device: u8,
        #[arg(short, long, value_enum)]
        slot: SlotArg,
        #[arg(long)]
        artwork_id: u32,
        /// Path of the artwork file on the media, e.g. /PIONEER/ART/00042.jpg
        #[arg(long)]
        artwork_path: Option<String>,
        #[arg(long, value_enum, default_value = "rekordbox")]
        track_type: TrackTypeArg,
        /// Where to write the image
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SlotArg {
    Usb,
    Sd,
    Cd,
}

impl From<SlotArg> for MediaSlot {
    fn from(slot: SlotArg) -> Self {
        match slot {
            SlotArg::Usb => MediaSlot::Usb,
            SlotArg::Sd => MediaSlot::Sd,
            SlotArg::Cd => MediaSlot::Cd,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TrackTypeArg {
    Rekordbox,
    Unanalyzed,
}

impl From<TrackTypeArg> for TrackType {
    fn from(track_type: TrackTypeArg) -> Self {
        match track_type {
            TrackTypeArg::Rekordbox => TrackType::Rekordbox,
            TrackTypeArg::Unanalyzed => TrackType::Unanalyzed,
        }
    }
}

/// Entrypoint for CLI
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::Config::load(&cli.config)?;
    let media = MountedMedia::from_config(&cfg.devices);

    match cli.command {
        Commands::Devices => {
            if cfg.devices.is_empty() {
                println!("No devices configured in {}", cli.config.display());
            }

            for device in &cfg.devices {
                println!("Device {} ({:?}): {} at {}", device.id, device.kind, device.name, device.ip);

                for slot in [FileSlot::Usb, FileSlot::Sd] {
                    let Some(location) = media.location(device.id, slot) else {
                        continue;
                    };
                    match media.root(device.id, slot).await {
                        Some(root) => println!("  {slot}: {location} mounted at {}", root.to_string_lossy()),
                        None => println!("  {slot}: {location} not mounted"),
                    }
                }
            }
        }

        Commands::Fetch {
            device,
            slot,
            artwork_id,
            artwork_path,
            track_type,
            out,
        } => {
            let device = cfg
                .device(DeviceId(device))
                .with_context(|| format!("device {device} is not configured"))?
                .device();

            let artwork = match artwork_path {
                Some(path) => Artwork::with_path(artwork_id, path),
                None => Artwork::database_only(artwork_id),
            };
            let track = Track::new(0, "").with_artwork(artwork);

            let opts = ArtworkRequest::new(device.id, slot.into(), track_type.into(), track).traced();

            let Some(bytes) = fetch_artwork(&media, &device, &opts).await? else {
                bail!("no artwork available for artwork {artwork_id} on device {}", device.id);
            };

            std::fs::write(&out, &bytes)
                .with_context(|| format!("failed to write {}", out.to_string_lossy()))?;
            println!("Wrote {} bytes to {}", bytes.len(), out.to_string_lossy());
        }
    }

    Ok(())
}

/// Reads the artwork file, telling a slot without files apart from a failed read.
async fn fetch_artwork(
    media: &MountedMedia,
    device: &Device,
    opts: &ArtworkOptions,
) -> anyhow::Result<Option<Vec<u8>>> {
    match via_local(media, media, device, opts).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.is_invalid_slot() => {
            bail!("{e}; artwork files can only be read from usb or sd media")
        }
        Err(e) => Err(e).with_context(|| {
            format!("failed to read artwork from device {} {}", device.id, opts.track_slot)
        }),
    }
}
