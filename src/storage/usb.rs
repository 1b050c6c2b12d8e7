//! Locating removable media on the host by volume label.

use std::path::PathBuf;

#[cfg(not(target_os = "windows"))]
use anyhow::bail;

#[cfg(not(target_os = "windows"))]
pub async fn find_mount_by_label(label: &str) -> anyhow::Result<PathBuf> {
    let mounts = tokio::fs::read_to_string("/proc/self/mounts").await?;

    match mount_point_for_label(&mounts, label) {
        Some(mount) => Ok(mount),
        None => bail!("device '{label}' not mounted"),
    }
}

/// Finds the mount point in a `/proc/self/mounts` listing whose directory
/// name is the volume label, as desktop automounters name them.
#[cfg_attr(target_os = "windows", allow(dead_code))]
fn mount_point_for_label(mounts: &str, label: &str) -> Option<PathBuf> {
    mounts
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(unescape_mount_field)
        .map(PathBuf::from)
        .find(|mount| mount.file_name().is_some_and(|name| name == label))
}

/// The mount table escapes whitespace and backslashes as `\ooo` octal.
#[cfg_attr(target_os = "windows", allow(dead_code))]
fn unescape_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
                let value = digits.iter().fold(0u16, |acc, d| acc * 8 + u16::from(d - b'0'));
                if let Ok(byte) = u8::try_from(value) {
                    out.push(byte);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// The volume API blocks, so it runs off the async executor.
#[cfg(target_os = "windows")]
pub async fn find_mount_by_label(label: &str) -> anyhow::Result<PathBuf> {
    let label = label.to_string();
    tokio::task::spawn_blocking(move || for_windows::find_mount_by_label(&label)).await?
}

#[cfg(target_os = "windows")]
mod for_windows {
    use std::{
        ffi::OsString,
        os::windows::ffi::{OsStrExt, OsStringExt},
        path::PathBuf,
    };

    use anyhow::bail;
    use windows::{
        Win32::{
            Foundation::MAX_PATH,
            Storage::FileSystem::{GetLogicalDriveStringsW, GetVolumeInformationW},
        },
        core::PCWSTR,
    };

    pub(super) fn find_mount_by_label(label: &str) -> anyhow::Result<PathBuf> {
        match volumes()?.into_iter().find(|volume| volume.label == label) {
            Some(volume) => Ok(volume.root),
            None => bail!("device '{label}' not mounted"),
        }
    }

    #[derive(Debug)]
    struct Volume {
        root: PathBuf,
        label: String,
    }

    /// Lists drive roots that report a volume label.
    fn volumes() -> anyhow::Result<Vec<Volume>> {
        let mut buffer: [u16; 256] = [0; 256];
        let len = unsafe { GetLogicalDriveStringsW(Some(&mut buffer)) } as usize;
        if len == 0 {
            bail!("failed to list logical drives");
        }

        let mut volumes = Vec::new();

        // NUL separated drive roots, e.g. "E:\\\0F:\\\0"
        for root in buffer[..len].split(|&c| c == 0).filter(|r| !r.is_empty()) {
            let root = OsString::from_wide(root);

            let mut name: [u16; MAX_PATH as usize + 1] = [0; MAX_PATH as usize + 1];
            let root_w: Vec<u16> = root.encode_wide().chain(Some(0)).collect();

            let queried = unsafe {
                GetVolumeInformationW(
                    PCWSTR(root_w.as_ptr()),
                    Some(&mut name),
                    None,
                    None,
                    None,
                    None,
                )
            };

            if queried.is_ok() {
                let label = OsString::from_wide(&name)
                    .to_string_lossy()
                    .trim_end_matches('\0')
                    .to_string();
                volumes.push(Volume {
                    root: PathBuf::from(root),
                    label,
                });
            }
        }

        Ok(volumes)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{mount_point_for_label, unescape_mount_field};

    const MOUNTS: &str = "\
/dev/nvme0n1p2 / ext4 rw,relatime 0 0
tmpfs /run/user/1000 tmpfs rw,nosuid,nodev 0 0
/dev/sda1 /media/dj/REKORDBOX vfat rw,nosuid,nodev 0 0
/dev/mmcblk0p1 /media/dj/SD\\040CARD exfat rw,nosuid,nodev 0 0
";

    #[test]
    fn finds_mount_by_directory_name() {
        assert_eq!(
            mount_point_for_label(MOUNTS, "REKORDBOX"),
            Some(PathBuf::from("/media/dj/REKORDBOX"))
        );
    }

    #[test]
    fn label_must_match_whole_directory_name() {
        assert_eq!(mount_point_for_label(MOUNTS, "REKORD"), None);
        assert_eq!(mount_point_for_label(MOUNTS, "dj"), None);
    }

    #[test]
    fn decodes_escaped_spaces() {
        assert_eq!(unescape_mount_field("/media/dj/SD\\040CARD"), "/media/dj/SD CARD");
        assert_eq!(
            mount_point_for_label(MOUNTS, "SD CARD"),
            Some(PathBuf::from("/media/dj/SD CARD"))
        );
    }

    #[cfg(not(target_os = "windows"))]
    #[tokio::test]
    async fn unknown_label_is_not_mounted() {
        let found = super::find_mount_by_label("PROLINK-NO-SUCH-VOLUME").await;
        assert!(found.is_err());
    }

    #[test]
    fn leaves_stray_backslashes_alone() {
        assert_eq!(unescape_mount_field("/a\\b"), "/a\\b");
        assert_eq!(unescape_mount_field("/a\\9xx"), "/a\\9xx");
    }
}
