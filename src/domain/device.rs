use std::{fmt::Display, net::IpAddr};

use serde::Deserialize;

/// Device number a player or mixer announces itself with on the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u8);

impl Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum DeviceKind {
    Cdj = 0x01,
    Mixer = 0x03,
    Rekordbox = 0x04,
}

/// A device seen on the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub kind: DeviceKind,
    pub ip: IpAddr,
}

/// Physical storage slot of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum MediaSlot {
    Empty = 0x00,
    Cd = 0x01,
    Sd = 0x02,
    Usb = 0x03,
    /// The collection of a linked rekordbox instance
    Rb = 0x04,
}

impl Display for MediaSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MediaSlot::Empty => "empty",
            MediaSlot::Cd => "cd",
            MediaSlot::Sd => "sd",
            MediaSlot::Usb => "usb",
            MediaSlot::Rb => "rb",
        };
        f.write_str(name)
    }
}

/// How the track was loaded by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TrackType {
    None = 0x00,
    Rekordbox = 0x01,
    Unanalyzed = 0x02,
    AudioCd = 0x05,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Slots {
        slots: Vec<MediaSlot>,
        track_type: TrackType,
    }

    #[test]
    fn slots_parse_from_lowercase_names() -> anyhow::Result<()> {
        let parsed: Slots = toml::from_str(
            r#"
slots = ["usb", "sd", "cd", "rb", "empty"]
track_type = "rekordbox"
"#,
        )?;

        assert_eq!(
            parsed.slots,
            vec![
                MediaSlot::Usb,
                MediaSlot::Sd,
                MediaSlot::Cd,
                MediaSlot::Rb,
                MediaSlot::Empty
            ]
        );
        assert_eq!(parsed.track_type, TrackType::Rekordbox);
        Ok(())
    }

    #[test]
    fn slot_display_matches_config_names() {
        assert_eq!(MediaSlot::Usb.to_string(), "usb");
        assert_eq!(MediaSlot::Sd.to_string(), "sd");
        assert_eq!(MediaSlot::Cd as u8, 1);
        assert_eq!(MediaSlot::Usb as u8, 3);
    }
}
