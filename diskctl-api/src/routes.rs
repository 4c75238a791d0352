//! Builds the full HTTP router (§4.6): one `axum::Router` parameterized by
//! [`Core`] as shared state, wiring every resource's CRUD plus the
//! non-standard target/logical-unit actions from §6's action table.

use axum::routing::{get, patch, post};
use axum::Router;
use diskctl_core::Core;

use crate::handlers::{control_devices, initiators, logical_units, snapshots, targets};

pub fn build(core: Core) -> Router {
    Router::new()
        .route("/pdus", get(control_devices::list_pdus).post(control_devices::create_pdu))
        .route("/pdus/:id", get(control_devices::get_pdu).delete(control_devices::delete_pdu))
        .route("/kvms", get(control_devices::list_kvms).post(control_devices::create_kvm))
        .route("/kvms/:id", get(control_devices::get_kvm).delete(control_devices::delete_kvm))
        .route("/initiators", get(initiators::list).post(initiators::create))
        .route("/initiators/:id", get(initiators::get).delete(initiators::delete))
        .route("/targets", get(targets::list).post(targets::create))
        .route("/targets/:id", get(targets::get).delete(targets::destroy))
        .route("/targets/:id/get_boot_disk_info", get(targets::get_boot_disk_info))
        .route("/targets/:id/get_map_disk_info", get(targets::get_map_disk_info))
        .route("/targets/:id/attach_all_usable_logical_units", post(targets::attach_all_usable_logical_units))
        .route("/logical_units", get(logical_units::list).post(logical_units::create))
        .route("/logical_units/:id", get(logical_units::get).delete(logical_units::delete))
        .route("/logical_units/:id/revert", patch(logical_units::revert))
        .route("/logical_units/:id/recreate", patch(logical_units::recreate))
        .route("/logical_units/:id/dump", patch(logical_units::dump))
        .route("/logical_units/:id/restore", patch(logical_units::restore))
        .route("/logical_units/:id/get_mount_device_path", get(logical_units::get_mount_device_path))
        .route("/logical_units/:id/snapshots", get(snapshots::list))
        .route("/snapshots", post(snapshots::create))
        .route("/snapshots/:id", get(snapshots::get).delete(snapshots::delete).patch(snapshots::activate))
        .with_state(core)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use diskctl_core::Core;
    use diskctl_runner::CommandRunner;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use super::build;

    async fn throwaway_core() -> Core {
        let path = std::env::temp_dir().join(format!("diskctl-api-test-{}-{}.sqlite", std::process::id(), rand_suffix()));
        let _ = std::fs::remove_file(&path);
        let pool = diskctl_store::connect(path.to_str().unwrap()).await.unwrap();
        Core::new(pool, CommandRunner::new())
    }

    fn rand_suffix() -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        hasher.finish()
    }

    async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, value)
    }

    #[tokio::test]
    async fn initiator_crud_round_trips_through_the_router() {
        let app = build(throwaway_core().await);

        let (status, body) = send(
            &app,
            "POST",
            "/initiators",
            Some(json!({"mac_address": "aa:bb:cc:dd:ee:ff", "name": "node-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_i64().unwrap();

        let (status, body) = send(&app, "GET", &format!("/initiators/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mac_address"], "aa:bb:cc:dd:ee:ff");

        let (status, _) = send(&app, "GET", "/initiators/999999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn target_with_no_initiator_fails_the_boot_negotiation_with_an_envelope() {
        let app = build(throwaway_core().await);

        let (status, body) = send(&app, "POST", "/targets", Some(json!({"name": "bare-target"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_i64().unwrap();

        let (status, body) = send(&app, "GET", &format!("/targets/{id}/get_boot_disk_info"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], false);
        assert_eq!(body["message"], "target has no initiator bound");
    }

    #[tokio::test]
    async fn logical_unit_status_filter_maps_the_query_literal() {
        let app = build(throwaway_core().await);

        send(
            &app,
            "POST",
            "/logical_units",
            Some(json!({
                "name": "disk0", "vendor_id": "diskctl", "product_id": "disk",
                "product_rev": "1.0", "vg_name": "vg0", "size_gib": 20.0
            })),
        )
        .await;

        let (status, body) = send(&app, "GET", "/logical_units?status=offline", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "GET", "/logical_units?status=online", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn reverting_a_logical_unit_with_no_snapshot_fails_with_an_envelope_not_an_error() {
        let app = build(throwaway_core().await);

        let (_, body) = send(
            &app,
            "POST",
            "/logical_units",
            Some(json!({
                "name": "disk0", "vendor_id": "diskctl", "product_id": "disk",
                "product_rev": "1.0", "vg_name": "vg0", "size_gib": 20.0
            })),
        )
        .await;
        let id = body["id"].as_i64().unwrap();

        let (status, body) = send(&app, "PATCH", &format!("/logical_units/{id}/revert"), Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], false);
        assert_eq!(body["message"], "Could not find any active snapshot to revert to");
    }

    #[tokio::test]
    async fn patching_a_snapshot_activates_it_and_deactivates_its_sibling() {
        let core = throwaway_core().await;
        let lu = diskctl_store::logical_units::create(&core.pool, "disk0", "diskctl", "disk", "1.0", "vg0", 20.0, false, None)
            .await
            .unwrap();
        let s1 = diskctl_store::snapshots::create(&core.pool, "s1", 5.0, "", lu.id).await.unwrap();
        let s2 = diskctl_store::snapshots::create(&core.pool, "s2", 5.0, "", lu.id).await.unwrap();

        let app = build(core);

        let (status, body) = send(&app, "PATCH", &format!("/snapshots/{}", s1.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active"], true);

        let (status, body) = send(&app, "PATCH", &format!("/snapshots/{}", s2.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active"], true);

        let (_, body) = send(&app, "GET", &format!("/snapshots/{}", s1.id), None).await;
        assert_eq!(body["active"], false);
    }
}
