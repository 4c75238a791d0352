//! Named constants for the exact textual confirmations `lvm2` tools print on
//! success, and the parsers for their info-dump output.
//!
//! lvm2 has no machine-readable success signal on the mutating commands
//! (`lvcreate`, `lvremove`, `vgcreate`, `vgremove`, `lvrename`, `pvcreate`,
//! `pvremove`): the only ground truth is a specific line of English text on
//! stdout. These are kept as named constants, with the exact substring each
//! caller must match, both to avoid scattering string literals and to give
//! the parser test suite fixed fixtures.

/// `lvcreate --name <name> ...` success line is `Logical volume "<name>" created`.
pub fn lv_created(name: &str) -> String {
    format!("Logical volume \"{name}\" created")
}

/// `lvremove --force <vg>/<name>` success line.
pub fn lv_removed(name: &str) -> String {
    format!("Logical volume \"{name}\" successfully removed")
}

/// `lvrename <vg> <old> <new>` success line — the FULL line must match, not
/// merely the substring "in volume group" (see design notes: a prior
/// implementation only checked for that substring and so never actually
/// verified the rename happened to the right volume in the right group).
pub fn lv_renamed(old: &str, new: &str, vg: &str) -> String {
    format!("Renamed \"{old}\" to \"{new}\" in volume group \"{vg}\"")
}

/// `vgcreate <name> ...` success line.
pub fn vg_created(name: &str) -> String {
    format!("Volume group \"{name}\" successfully created")
}

/// `vgremove <name>` success line.
pub fn vg_removed(name: &str) -> String {
    format!("Volume group \"{name}\" successfully removed")
}

/// `pvcreate <path>` success line.
pub fn pv_created(path: &str) -> String {
    format!("Physical volume \"{path}\" successfully created.")
}

/// `pvremove <path>` success line.
pub fn pv_removed(path: &str) -> String {
    format!("Labels on physical volume \"{path}\" successfully wiped.")
}

/// Parses the `--- <section> ---` delimited key/value dump that `lvdisplay`
/// and `pvdisplay` print (without `-c`).
///
/// Lines are split on runs of two-or-more spaces into a `key` / `value`
/// pair. The row that introduces "source of" (the logical volumes that are
/// snapshots of this one) is handled specially: every following one-column
/// line up to the next two-column line is accumulated into the `source_of`
/// list rather than overwriting a single value.
pub fn parse_section(output: &str, section_header: &str) -> Option<InfoMap> {
    let mut in_section = false;
    let mut in_source_of = false;
    let mut info = InfoMap::default();

    for raw_line in output.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            if in_section {
                break;
            }
            continue;
        }
        if line.contains(section_header) {
            in_section = true;
            continue;
        }
        if !in_section {
            continue;
        }

        let columns: Vec<&str> = split_on_double_space(line);
        if columns.len() >= 2 {
            if columns[1].contains("source of") {
                in_source_of = true;
                continue;
            }
            info.fields.insert(columns[0].to_string(), columns[1].to_string());
            in_source_of = false;
        } else if in_source_of {
            if let Some(word) = columns.first() {
                let name = word.split_whitespace().next().unwrap_or(word);
                info.source_of.push(name.to_string());
            }
        }
    }

    if info.fields.is_empty() && info.source_of.is_empty() {
        None
    } else {
        Some(info)
    }
}

fn split_on_double_space(line: &str) -> Vec<&str> {
    // lvdisplay/pvdisplay align the value column with runs of two+ spaces;
    // a single space can appear inside either the key or the value.
    let bytes = line.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b' ' && i + 1 < bytes.len() && bytes[i + 1] == b' ' {
            parts.push(line[start..i].trim());
            while i < bytes.len() && bytes[i] == b' ' {
                i += 1;
            }
            start = i;
        } else {
            i += 1;
        }
    }
    parts.push(line[start..].trim());
    parts
}

/// Parsed `--- ... ---` section of an `lvdisplay`/`pvdisplay` dump.
#[derive(Debug, Default, Clone)]
pub struct InfoMap {
    pub fields: std::collections::HashMap<String, String>,
    pub source_of: Vec<String>,
}

impl InfoMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|s| s.as_str())
    }
}

/// Splits an lvm2 size string like `"20.00 GiB"` into `(20.00, "GiB")`.
pub fn parse_size(raw: &str) -> Option<(f64, String)> {
    let raw = raw.trim();
    let mut parts = raw.splitn(2, char::is_whitespace);
    let number = parts.next()?.parse::<f64>().ok()?;
    let unit = parts.next()?.trim().to_string();
    Some((number, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_logical_volume_section_with_source_of() {
        let output = r#"
  --- Logical volume ---
  LV Path                /dev/vg0/base
  LV Name                base
  VG Name                vg0
  LV Size                20.00 GiB
  Snapshot Logical Volumes   source of
                         s1
                         s2

"#;
        let info = parse_section(output, "--- Logical volume ---").unwrap();
        assert_eq!(info.get("LV Name"), Some("base"));
        assert_eq!(info.get("LV Size"), Some("20.00 GiB"));
        assert_eq!(info.source_of, vec!["s1".to_string(), "s2".to_string()]);
    }

    #[test]
    fn parses_snapshot_cow_table_size() {
        let output = r#"
  --- Logical volume ---
  LV Path                /dev/vg0/s1
  LV Name                s1
  VG Name                vg0
  LV snapshot status     active destination for base
  COW-table size         5.00 GiB

"#;
        let info = parse_section(output, "--- Logical volume ---").unwrap();
        assert_eq!(info.get("COW-table size"), Some("5.00 GiB"));
        assert_eq!(parse_size(info.get("COW-table size").unwrap()), Some((5.0, "GiB".to_string())));
    }

    #[test]
    fn rename_confirmation_requires_full_line_not_substring() {
        let line = lv_renamed("old", "new", "vg0");
        assert_eq!(line, "Renamed \"old\" to \"new\" in volume group \"vg0\"");
        // A line that merely contains "in volume group" for an unrelated
        // rename must not satisfy the check.
        let unrelated = "Renamed \"foo\" to \"bar\" in volume group \"vg1\"";
        assert_ne!(unrelated, lv_renamed("old", "new", "vg0"));
    }
}
