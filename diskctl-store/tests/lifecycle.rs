//! Integration tests against a throwaway SQLite file, covering the
//! relationships and constraints from §3.1.

use diskctl_store::models::{ControlDeviceKind, InitiatorMode, LogicalUnitStatus, TargetStatus};
use diskctl_store::{control_devices, initiators, logical_units, snapshots, targets};

async fn throwaway_pool() -> sqlx::SqlitePool {
    let path = std::env::temp_dir().join(format!("diskctl-store-test-{}.sqlite", std::process::id()));
    let _ = std::fs::remove_file(&path);
    diskctl_store::connect(path.to_str().unwrap()).await.unwrap()
}

#[tokio::test]
async fn initiator_target_logical_unit_chain_round_trips() {
    let pool = throwaway_pool().await;

    let initiator = initiators::create(&pool, "aa:bb:cc:dd:ee:ff", "node-1", InitiatorMode::Automatic, None, None, None, None, None)
        .await
        .unwrap();

    let target = targets::create(&pool, "node-1-target", true, true, Some(initiator.id)).await.unwrap();
    assert_eq!(target.status, TargetStatus::Offline);

    let lu = logical_units::create(&pool, "node-1-base", "diskctl", "disk", "1.0", "vg0", 20.0, true, Some(target.id))
        .await
        .unwrap();
    assert_eq!(lu.status, LogicalUnitStatus::Offline);
    assert_eq!(lu.boot_count, 0);

    let fetched_by_mac = targets::list_by_initiator_mac(&pool, "aa:bb:cc:dd:ee:ff").await.unwrap();
    assert_eq!(fetched_by_mac.len(), 1);
    assert_eq!(fetched_by_mac[0].id, target.id);

    logical_units::save_lifecycle(&pool, lu.id, LogicalUnitStatus::Online, lu.boot_count + 1, None)
        .await
        .unwrap();
    let reloaded = logical_units::get(&pool, lu.id).await.unwrap();
    assert_eq!(reloaded.status, LogicalUnitStatus::Online);
    assert_eq!(reloaded.boot_count, 1);

    let by_status = logical_units::list_by_status(&pool, LogicalUnitStatus::Online).await.unwrap();
    assert_eq!(by_status.len(), 1);
}

#[tokio::test]
async fn deleting_a_target_sets_logical_unit_target_id_null() {
    let pool = throwaway_pool().await;
    let target = targets::create(&pool, "t1", false, false, None).await.unwrap();
    let lu = logical_units::create(&pool, "lu1", "v", "p", "r", "vg0", 10.0, true, Some(target.id)).await.unwrap();

    targets::delete(&pool, target.id).await.unwrap();

    let reloaded = logical_units::get(&pool, lu.id).await.unwrap();
    assert_eq!(reloaded.target_id, None);
}

#[tokio::test]
async fn deleting_a_logical_unit_cascades_its_snapshots() {
    let pool = throwaway_pool().await;
    let lu = logical_units::create(&pool, "lu1", "v", "p", "r", "vg0", 10.0, true, None).await.unwrap();
    let snap = snapshots::create(&pool, "s1", 2.0, "pre-update", lu.id).await.unwrap();

    logical_units::delete(&pool, lu.id).await.unwrap();

    let err = snapshots::get(&pool, snap.id).await.unwrap_err();
    assert!(matches!(err, diskctl_store::Error::NotFound { .. }));
}

#[tokio::test]
async fn only_one_snapshot_can_be_active_per_logical_unit() {
    let pool = throwaway_pool().await;
    let lu = logical_units::create(&pool, "lu1", "v", "p", "r", "vg0", 10.0, true, None).await.unwrap();
    let s1 = snapshots::create(&pool, "s1", 2.0, "", lu.id).await.unwrap();
    let s2 = snapshots::create(&pool, "s2", 2.0, "", lu.id).await.unwrap();

    snapshots::activate(&pool, s1.id).await.unwrap();
    assert_eq!(snapshots::get_active(&pool, lu.id).await.unwrap().unwrap().id, s1.id);

    snapshots::activate(&pool, s2.id).await.unwrap();
    let active = snapshots::get_active(&pool, lu.id).await.unwrap().unwrap();
    assert_eq!(active.id, s2.id);
    assert!(!snapshots::get(&pool, s1.id).await.unwrap().active);
}

#[tokio::test]
async fn pdu_and_kvm_share_the_control_device_shape() {
    let pool = throwaway_pool().await;
    let pdu = control_devices::create(&pool, ControlDeviceKind::Pdu, "pdu-1", "10.0.0.1", None, 24, "APC", "SN1", "admin", "secret")
        .await
        .unwrap();
    assert_eq!(pdu.total_ports, 24);

    let kvm = control_devices::create(&pool, ControlDeviceKind::Kvm, "kvm-1", "10.0.0.2", None, 8, "Raritan", "SN2", "admin", "secret")
        .await
        .unwrap();
    assert_eq!(kvm.total_ports, 8);

    assert_eq!(control_devices::list(&pool, ControlDeviceKind::Pdu).await.unwrap().len(), 1);
    assert_eq!(control_devices::list(&pool, ControlDeviceKind::Kvm).await.unwrap().len(), 1);
}
