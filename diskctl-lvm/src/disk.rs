//! Generic block device inspection via `fdisk`, and loop-mount helpers.
//!
//! `Disk` is deliberately not a supertype of `LogicalVolume` — see the
//! design notes on the object hierarchy in the original source: instead of
//! `Snapshot is-a LogicalVolume is-a Disk`, each type owns just the
//! capability it needs and `LogicalVolume`/`Snapshot` call into this module
//! for partition inspection when asked to mount a raw image.

use diskctl_runner::CommandRunner;

use crate::error::{Error, Result};

/// A block device as reported by `fdisk`.
#[derive(Debug, Clone)]
pub struct Disk {
    device_path: String,
    sector_size: Option<u64>,
}

/// One partition entry from `fdisk -u=sectors --bytes -l <dev>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub path_id: String,
    pub boot: bool,
    pub start_sector: u64,
    pub end_sector: u64,
    pub sectors: u64,
    pub size_bytes: u64,
    pub id: u32,
    pub partition_type: String,
}

impl Partition {
    /// Size in whole GiB, used to pick the partition worth mounting.
    pub fn size_gib(&self) -> u64 {
        self.size_bytes / (1024 * 1024 * 1024)
    }
}

impl Disk {
    pub fn new(device_path: impl Into<String>) -> Self {
        Self {
            device_path: device_path.into(),
            sector_size: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.device_path
    }

    pub fn sector_size(&self) -> Option<u64> {
        self.sector_size
    }

    /// Lists the `/dev/sdX:` disks known to the kernel.
    pub async fn get_all(runner: &CommandRunner) -> Result<Vec<String>> {
        let output = runner
            .run("fdisk", &["-l"])
            .await
            .ok_or_else(|| Error::CommandFailed("fdisk -l".to_string()))?;

        let mut disks = Vec::new();
        for line in output.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("Disk ") {
                if let Some(path) = rest.split(':').next() {
                    if path.starts_with("/dev/sd") {
                        disks.push(path.to_string());
                    }
                }
            }
        }
        Ok(disks)
    }

    /// Parses `fdisk -u=sectors --bytes -l <device>` into partition records.
    pub async fn get_partitions(&mut self, runner: &CommandRunner) -> Result<Vec<Partition>> {
        let output = runner
            .run("fdisk", &["-u=sectors", "--bytes", "-l", &self.device_path])
            .await
            .ok_or_else(|| Error::CommandFailed(format!("fdisk -l {}", self.device_path)))?;

        let mut partitions = Vec::new();
        let mut in_table = false;

        for raw_line in output.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix("Sector size") {
                if let Some(bytes_str) = rest.split(':').nth(1) {
                    if let Some(num) = bytes_str.split_whitespace().next() {
                        self.sector_size = num.parse().ok();
                    }
                }
                continue;
            }

            if line.starts_with("Device") && line.contains("Boot") && line.contains("Start") && line.contains("End") {
                in_table = true;
                continue;
            }

            if !in_table {
                continue;
            }

            if let Some(partition) = parse_partition_line(line) {
                partitions.push(partition);
            }
        }

        Ok(partitions)
    }

    /// Mounts the first partition larger than 1 GiB at `mount_point`,
    /// read-write, via a loop device with a byte offset.
    pub async fn mount(&mut self, runner: &CommandRunner, mount_point: &str) -> Result<bool> {
        let partitions = self.get_partitions(runner).await?;
        let sector_size = self
            .sector_size
            .ok_or_else(|| Error::Parse("fdisk output did not report a sector size".to_string()))?;

        for partition in partitions {
            if partition.size_gib() <= 1 {
                continue;
            }
            let offset = partition.start_sector * sector_size;
            let options = format!("loop,offset={offset}");
            let output = runner
                .run(
                    "mount",
                    &["--rw", "--options", &options, &self.device_path, mount_point],
                )
                .await;
            // mount is silent on success, matching tgtadm's convention.
            if output.as_deref().map(str::trim).unwrap_or_default().is_empty() {
                return Ok(true);
            }
            return Ok(false);
        }
        Ok(false)
    }

    pub async fn unmount(runner: &CommandRunner, mount_point: &str) -> Result<bool> {
        let output = runner.run("umount", &["-f", mount_point]).await;
        Ok(output.as_deref().map(str::trim).unwrap_or_default().is_empty())
    }
}

fn parse_partition_line(line: &str) -> Option<Partition> {
    let mut fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 7 {
        return None;
    }

    let path_id = fields.remove(0).to_string();
    let boot = fields[0] == "*";
    if boot {
        fields.remove(0);
    }

    // Type can contain spaces ("Linux filesystem", "W95 FAT32"); everything
    // past the 6th remaining numeric column belongs to it.
    if fields.len() < 6 {
        return None;
    }
    let start_sector: u64 = fields[0].parse().ok()?;
    let end_sector: u64 = fields[1].parse().ok()?;
    let sectors: u64 = fields[2].parse().ok()?;
    let size_bytes: u64 = fields[3].parse().ok()?;
    let id: u32 = fields[4].parse().ok()?;
    let partition_type = fields[5..].join(" ");

    Some(Partition {
        path_id,
        boot,
        start_sector,
        end_sector,
        sectors,
        size_bytes,
        id,
        partition_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_bootable_partition_line() {
        let line = "/dev/sda1  *     2048  1050623  1048576  536870912  83  Linux";
        let p = parse_partition_line(line).unwrap();
        assert!(p.boot);
        assert_eq!(p.start_sector, 2048);
        assert_eq!(p.size_bytes, 536_870_912);
        assert_eq!(p.partition_type, "Linux");
        assert_eq!(p.size_gib(), 0);
    }

    #[test]
    fn parses_a_non_bootable_large_partition() {
        let line = "/dev/sda2  1050624  42000000  40949377  20974528512  83  Linux filesystem";
        let p = parse_partition_line(line).unwrap();
        assert!(!p.boot);
        assert_eq!(p.size_gib(), 19);
        assert_eq!(p.partition_type, "Linux filesystem");
    }
}
