//! iSCSI target administration via `tgtadm --lld iscsi --mode target|logicalunit`.

use std::collections::{BTreeMap, HashMap};

use diskctl_runner::CommandRunner;
use tracing::warn;

use crate::error::{Error, Result};
use crate::initiator::{Initiator, ALL};

const IQN_PREFIX: &str = "iqn.2018-01.com.nls90.iscsitarget";
const CANT_FIND_TARGET: &str = "can't find the target";

/// Builds the canonical IQN for a target name.
pub fn qualified_name(name: &str) -> String {
    format!("{IQN_PREFIX}:{name}")
}

/// An iSCSI target, identified by its numeric tid and logical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    id: u32,
    name: String,
}

impl Target {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn iqn(&self) -> String {
        qualified_name(&self.name)
    }

    async fn run_target(&self, runner: &CommandRunner, args: &[&str]) -> Option<String> {
        let mut full = vec!["--lld", "iscsi", "--mode", "target"];
        full.extend(args);
        runner.run_merged("tgtadm", &full).await
    }

    async fn run_lun(&self, runner: &CommandRunner, args: &[&str]) -> Option<String> {
        let mut full = vec!["--lld", "iscsi", "--mode", "logicalunit"];
        full.extend(args);
        runner.run_merged("tgtadm", &full).await
    }

    async fn run_conn(&self, runner: &CommandRunner, args: &[&str]) -> Option<String> {
        let mut full = vec!["--lld", "iscsi", "--mode", "conn"];
        full.extend(args);
        runner.run_merged("tgtadm", &full).await
    }

    /// `--op show --tid <id>`; false when the daemon reports no such target.
    pub async fn exists(&self, runner: &CommandRunner) -> Result<bool> {
        let tid = self.id.to_string();
        let output = self
            .run_target(runner, &["--op", "show", "--tid", &tid])
            .await
            .ok_or_else(|| Error::CommandFailed("tgtadm --mode target --op show".to_string()))?;

        Ok(!output.trim().is_empty() && !output.contains(CANT_FIND_TARGET))
    }

    pub async fn add(&self, runner: &CommandRunner) -> Result<bool> {
        let tid = self.id.to_string();
        let iqn = self.iqn();
        let output = self
            .run_target(runner, &["--op", "new", "--tid", &tid, "--targetname", &iqn])
            .await
            .ok_or_else(|| Error::CommandFailed("tgtadm --mode target --op new".to_string()))?;
        Ok(output.trim().is_empty())
    }

    pub async fn remove(&self, runner: &CommandRunner) -> Result<bool> {
        let tid = self.id.to_string();
        let output = self
            .run_target(runner, &["--op", "delete", "--tid", &tid, "--force"])
            .await
            .ok_or_else(|| Error::CommandFailed("tgtadm --mode target --op delete".to_string()))?;
        Ok(output.trim().is_empty())
    }

    /// Full `--op show --tid <id>` dump, used by the LUN parsers below.
    async fn show(&self, runner: &CommandRunner) -> Result<String> {
        let tid = self.id.to_string();
        self.run_target(runner, &["--op", "show", "--tid", &tid])
            .await
            .ok_or_else(|| Error::CommandFailed("tgtadm --mode target --op show".to_string()))
    }

    /// Mapping LUN-id → backing-store device-path, for LUNs with id > 0 and
    /// a path beginning with `/dev/` (LUN 0 is the controller and has none).
    pub async fn list_active_logical_units(&self, runner: &CommandRunner) -> Result<BTreeMap<u32, String>> {
        let output = self.show(runner).await?;
        Ok(parse_active_logical_units(&output))
    }

    /// LUN id currently bound to `device_path`, if any.
    pub async fn get_logical_unit_number(&self, runner: &CommandRunner, device_path: &str) -> Result<Option<u32>> {
        let luns = self.list_active_logical_units(runner).await?;
        Ok(luns.into_iter().find(|(_, path)| path == device_path).map(|(id, _)| id))
    }

    /// Attaches `path` at exactly `lun_id` (the caller's LogicalUnit primary
    /// key, per the on-wire LUN identity convention — this does not
    /// auto-increment the way a naive next-free-LUN allocator would).
    pub async fn attach_logical_unit(&self, runner: &CommandRunner, path: &str, lun_id: u32) -> Result<bool> {
        if self.list_active_logical_units(runner).await?.contains_key(&lun_id) {
            return Err(Error::LunCollision(lun_id));
        }
        let tid = self.id.to_string();
        let lun = lun_id.to_string();
        let output = self
            .run_lun(
                runner,
                &["--op", "new", "--tid", &tid, "--lun", &lun, "--backing-store", path],
            )
            .await
            .ok_or_else(|| Error::CommandFailed("tgtadm --mode logicalunit --op new".to_string()))?;
        Ok(output.trim().is_empty())
    }

    pub async fn detach_logical_unit(&self, runner: &CommandRunner, lun_id: u32) -> Result<bool> {
        let tid = self.id.to_string();
        let lun = lun_id.to_string();
        let output = self
            .run_lun(runner, &["--op", "delete", "--tid", &tid, "--lun", &lun])
            .await
            .ok_or_else(|| Error::CommandFailed("tgtadm --mode logicalunit --op delete".to_string()))?;
        Ok(output.trim().is_empty())
    }

    pub async fn detach_all_logical_units(&self, runner: &CommandRunner) -> Result<bool> {
        let luns = self.list_active_logical_units(runner).await?;
        let mut all_ok = true;
        for lun_id in luns.keys() {
            if !self.detach_logical_unit(runner, *lun_id).await? {
                all_ok = false;
            }
        }
        Ok(all_ok)
    }

    /// `--op update --params k=v,k=v` against vendor_id/product_id/product_rev.
    pub async fn update_logical_unit_params(
        &self,
        runner: &CommandRunner,
        lun_id: u32,
        vendor_id: Option<&str>,
        product_id: Option<&str>,
        product_rev: Option<&str>,
    ) -> Result<bool> {
        let mut params = Vec::new();
        if let Some(v) = vendor_id {
            params.push(format!("vendor_id={v}"));
        }
        if let Some(v) = product_id {
            params.push(format!("product_id={v}"));
        }
        if let Some(v) = product_rev {
            params.push(format!("product_rev={v}"));
        }
        if params.is_empty() {
            return Ok(true);
        }
        let tid = self.id.to_string();
        let lun = lun_id.to_string();
        let joined = params.join(",");
        let output = self
            .run_lun(runner, &["--op", "update", "--tid", &tid, "--lun", &lun, "--params", &joined])
            .await
            .ok_or_else(|| Error::CommandFailed("tgtadm --mode logicalunit --op update".to_string()))?;
        Ok(output.trim().is_empty())
    }

    /// `--mode conn --op show`, parsed into IP → session-id → connection-ids,
    /// optionally restricted to one initiator's address.
    pub async fn list_connections(
        &self,
        runner: &CommandRunner,
        initiator: Option<&Initiator>,
    ) -> Result<HashMap<String, HashMap<u32, Vec<u32>>>> {
        let tid = self.id.to_string();
        let output = self
            .run_conn(runner, &["--op", "show", "--tid", &tid])
            .await
            .ok_or_else(|| Error::CommandFailed("tgtadm --mode conn --op show".to_string()))?;

        Ok(parse_connections(&output, initiator))
    }

    pub async fn close_connection(&self, runner: &CommandRunner, session_id: u32, connection_id: u32) -> Result<bool> {
        let tid = self.id.to_string();
        let sid = session_id.to_string();
        let cid = connection_id.to_string();
        let output = self
            .run_conn(runner, &["--op", "delete", "--tid", &tid, "--sid", &sid, "--cid", &cid])
            .await
            .ok_or_else(|| Error::CommandFailed("tgtadm --mode conn --op delete".to_string()))?;
        Ok(output.trim().is_empty())
    }

    pub async fn close_initiator_connections(&self, runner: &CommandRunner, initiator: &Initiator) -> Result<bool> {
        let sessions = self.list_connections(runner, Some(initiator)).await?;
        let mut all_ok = true;
        for conns in sessions.values() {
            for (session_id, connection_ids) in conns {
                for connection_id in connection_ids {
                    if !self.close_connection(runner, *session_id, *connection_id).await? {
                        all_ok = false;
                    }
                }
            }
        }
        Ok(all_ok)
    }

    pub async fn close_all_connections(&self, runner: &CommandRunner) -> Result<bool> {
        let sessions = self.list_connections(runner, None).await?;
        let mut all_ok = true;
        for conns in sessions.values() {
            for (session_id, connection_ids) in conns {
                for connection_id in connection_ids {
                    if !self.close_connection(runner, *session_id, *connection_id).await? {
                        all_ok = false;
                    }
                }
            }
        }
        Ok(all_ok)
    }

    async fn bind_or_unbind(
        &self,
        runner: &CommandRunner,
        operation: &str,
        initiator: Option<&Initiator>,
        by: &str,
    ) -> Result<bool> {
        let by_flag = if by == "name" { "--initiator-name" } else { "--initiator-address" };
        let by_value = match initiator {
            Some(initiator) if by == "name" => initiator.name().to_string(),
            Some(initiator) => initiator.address().to_string(),
            None => ALL.to_string(),
        };
        let tid = self.id.to_string();
        let output = self
            .run_target(runner, &["--op", operation, "--tid", &tid, by_flag, &by_value])
            .await
            .ok_or_else(|| Error::CommandFailed(format!("tgtadm --mode target --op {operation}")))?;
        if !output.trim().is_empty() {
            warn!(target = %self.name, operation, "tgtadm bind/unbind produced output");
        }
        Ok(output.trim().is_empty())
    }

    pub async fn bind_to_initiator(&self, runner: &CommandRunner, initiator: Option<&Initiator>, by: &str) -> Result<bool> {
        self.bind_or_unbind(runner, "bind", initiator, by).await
    }

    pub async fn unbind_from_initiator(&self, runner: &CommandRunner, initiator: Option<&Initiator>, by: &str) -> Result<bool> {
        self.bind_or_unbind(runner, "unbind", initiator, by).await
    }
}

/// Parses a `--mode target --op show --tid <id>` dump into LUN-id →
/// backing-store path, restricted to LUNs with id > 0 and a `/dev/` path.
fn parse_active_logical_units(output: &str) -> BTreeMap<u32, String> {
    let mut luns = BTreeMap::new();
    let mut current_lun: Option<u32> = None;

    for raw_line in output.lines() {
        let line = raw_line.trim();
        if let Some(rest) = line.strip_prefix("LUN: ") {
            current_lun = rest.trim().parse().ok();
            continue;
        }
        if let Some(rest) = line.strip_prefix("Backing store path:") {
            let path = rest.trim();
            if let Some(id) = current_lun {
                if id > 0 && path.starts_with("/dev/") {
                    luns.insert(id, path.to_string());
                }
            }
        }
    }
    luns
}

/// Parses a `--mode conn --op show --tid <id>` dump into IP → session-id →
/// connection-ids, optionally restricted to one initiator's address.
fn parse_connections(output: &str, initiator: Option<&Initiator>) -> HashMap<String, HashMap<u32, Vec<u32>>> {
    let mut sessions: HashMap<String, HashMap<u32, Vec<u32>>> = HashMap::new();
    let mut current_session: Option<u32> = None;
    let mut current_connection: Option<u32> = None;

    for raw_line in output.lines() {
        let line = raw_line.trim();
        if let Some(rest) = line.strip_prefix("Session: ") {
            current_session = rest.trim().parse().ok();
            current_connection = None;
            continue;
        }
        if let Some(rest) = line.strip_prefix("Connection: ") {
            current_connection = rest.trim().parse().ok();
            continue;
        }
        if let Some(rest) = line.strip_prefix("IP Address:") {
            let (Some(session), Some(connection)) = (current_session, current_connection) else {
                continue;
            };
            let ip = rest.trim().to_string();
            if let Some(requested) = initiator {
                if requested.address() != ip {
                    continue;
                }
            }
            sessions.entry(ip).or_default().entry(session).or_default().push(connection);
        }
    }
    sessions
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW_DUMP: &str = r#"
Target 1: iqn.2018-01.com.nls90.iscsitarget:foo
    System information:
        Driver: iscsi
        State: ready
    LUN information:
        LUN: 0
            Type: controller
            Backing store path: None
        LUN: 3
            Type: disk
            Backing store path: /dev/vg0/base
        LUN: 7
            Type: disk
            Backing store path: /dev/vg0/s1
"#;

    const CONN_DUMP: &str = r#"
Session: 12
    Connection: 0
        IP Address: 10.0.0.5
Session: 13
    Connection: 0
        IP Address: 10.0.0.9
    Connection: 1
        IP Address: 10.0.0.9
"#;

    #[test]
    fn qualified_name_uses_the_fixed_prefix() {
        assert_eq!(qualified_name("foo"), "iqn.2018-01.com.nls90.iscsitarget:foo");
    }

    #[test]
    fn target_iqn_matches_qualified_name() {
        let t = Target::new(1, "foo");
        assert_eq!(t.iqn(), qualified_name("foo"));
    }

    #[test]
    fn parses_active_luns_skipping_the_controller_lun() {
        let luns = parse_active_logical_units(SHOW_DUMP);
        assert_eq!(luns.len(), 2);
        assert_eq!(luns.get(&3), Some(&"/dev/vg0/base".to_string()));
        assert_eq!(luns.get(&7), Some(&"/dev/vg0/s1".to_string()));
        assert!(!luns.contains_key(&0));
    }

    #[test]
    fn parses_connections_grouped_by_ip_and_session() {
        let sessions = parse_connections(CONN_DUMP, None);
        assert_eq!(sessions.get("10.0.0.5").unwrap().get(&12).unwrap(), &vec![0]);
        assert_eq!(sessions.get("10.0.0.9").unwrap().get(&13).unwrap(), &vec![0, 1]);
    }

    #[test]
    fn filters_connections_to_one_initiator() {
        let initiator = Initiator::new("10.0.0.9", "iqn.initiator:x");
        let sessions = parse_connections(CONN_DUMP, Some(&initiator));
        assert!(!sessions.contains_key("10.0.0.5"));
        assert!(sessions.contains_key("10.0.0.9"));
    }
}
