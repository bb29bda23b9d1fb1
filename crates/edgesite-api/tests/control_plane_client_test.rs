#![allow(clippy::unwrap_used)]
// Integration tests for `ControlPlaneClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use edgesite_api::types::{
    DhcpSettingsPayload, InterfaceLan, InterfaceUpdate, NativeRangeUpdate,
    SiteGeneralDetailsUpdate, SiteLocationPayload,
};
use edgesite_api::{ControlPlaneClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ControlPlaneClient) {
    let server = MockServer::start().await;
    let client =
        ControlPlaneClient::from_reqwest(&server.uri(), "4242", reqwest::Client::new()).unwrap();
    (server, client)
}

fn account_path(suffix: &str) -> String {
    format!("/api/v1/accounts/4242/{suffix}")
}

// ── URL handling ────────────────────────────────────────────────────

#[tokio::test]
async fn test_base_url_tolerates_api_suffix() {
    let client = ControlPlaneClient::from_reqwest(
        "https://cp.example.net/api/",
        "77",
        reqwest::Client::new(),
    )
    .unwrap();
    assert_eq!(
        client.base_url().as_str(),
        "https://cp.example.net/api/v1/accounts/77/"
    );
}

#[tokio::test]
async fn test_api_key_header_is_sent() {
    let server = MockServer::start().await;
    let key: secrecy::SecretString = "s3cret".to_string().into();
    let client = ControlPlaneClient::from_api_key(
        &server.uri(),
        "4242",
        &key,
        &edgesite_api::TransportConfig::default(),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path(account_path("sites/1001")))
        .and(header("X-API-KEY", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1001",
            "name": "branch-1",
            "connectionType": "SOCKET_X1600"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let site = client.get_site("1001").await.unwrap();
    assert_eq!(site.name, "branch-1");
    assert!(site.site_location.is_none());
}

// ── Sites ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_site_with_location() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(account_path("sites/1001")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1001",
            "name": "branch-1",
            "connectionType": "SOCKET_ESX1500",
            "description": "lab",
            "siteLocation": {
                "countryCode": "DE",
                "timezone": "Europe/Berlin",
                "city": "Berlin",
                "address": " "
            }
        })))
        .mount(&server)
        .await;

    let site = client.get_site("1001").await.unwrap();
    assert_eq!(site.connection_type, "SOCKET_ESX1500");
    let loc = site.site_location.unwrap();
    assert_eq!(loc.country_code.as_deref(), Some("DE"));
    assert_eq!(loc.city.as_deref(), Some("Berlin"));
    assert_eq!(loc.state_code, None);
}

#[tokio::test]
async fn test_remove_site() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(account_path("sites/1001")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.remove_site("1001").await.unwrap();
}

#[tokio::test]
async fn test_update_general_details_sends_clearing_values() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(account_path("sites/1001/general-details")))
        .and(body_json(json!({
            "siteLocation": { "countryCode": "DE", "city": " ", "address": "" }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let body = SiteGeneralDetailsUpdate {
        description: None,
        site_location: SiteLocationPayload {
            country_code: Some("DE".into()),
            city: Some(" ".into()),
            address: Some(String::new()),
            ..SiteLocationPayload::default()
        },
    };
    client.update_site_general_details("1001", &body).await.unwrap();
}

// ── Interfaces ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_interfaces_keeps_helper_fields() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(account_path("sites/1001/interfaces")))
        .and(query_param("connectionType", "SOCKET_X1600"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "items": [
                {
                    "id": "1001-INT_5",
                    "index": "INT_5",
                    "name": "LAN 01",
                    "isDefault": true,
                    "helperFields": { "subnet": "10.0.0.0/24", "destType": "LAN" }
                },
                {
                    "id": "1001-INT_6",
                    "index": "6",
                    "helperFields": { "destType": "LAN_LAG_MEMBER", "lagMinLinks": "2" }
                }
            ]
        })))
        .mount(&server)
        .await;

    let listing = client.list_interfaces("1001", "SOCKET_X1600").await.unwrap();
    assert_eq!(listing.total, 2);
    assert_eq!(listing.items[0].is_default, Some(true));
    assert_eq!(listing.items[0].helper_fields["subnet"], "10.0.0.0/24");
    assert_eq!(listing.items[1].is_default, None);
    assert_eq!(listing.items[1].name, None);
    assert_eq!(listing.items[1].helper_fields["lagMinLinks"], "2");
}

#[tokio::test]
async fn test_list_lag_members_filters_by_dest_type() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(account_path("sites/1001/interfaces")))
        .and(query_param("destType", "LAN_LAG_MEMBER"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client.list_lag_members("1001").await.unwrap();
    assert!(listing.items.is_empty());
    assert_eq!(listing.total, 0);
}

#[tokio::test]
async fn test_update_interface_omits_absent_sections() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(account_path("sites/1001/interfaces/INT_7")))
        .and(body_json(json!({
            "destType": "LAN",
            "name": "staging",
            "lan": { "subnet": "192.0.2.0/30", "localIp": "192.0.2.1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "siteId": "1001",
            "interfaceId": "1001-INT_7"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let body = InterfaceUpdate {
        dest_type: "LAN".into(),
        name: Some("staging".into()),
        lan: Some(InterfaceLan {
            subnet: "192.0.2.0/30".into(),
            local_ip: "192.0.2.1".into(),
            translated_subnet: None,
        }),
        lag: None,
    };
    let result = client.update_interface("1001", "INT_7", &body).await.unwrap();
    assert_eq!(result.interface_id.as_deref(), Some("1001-INT_7"));
}

// ── Native range ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_native_range() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(account_path("sites/1001/ranges/native")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r-77",
            "interfaceId": "1001-INT_5",
            "subnet": "10.0.0.0/24",
            "localIp": "10.0.0.1",
            "rangeType": "Native",
            "dhcpSettings": { "dhcpType": "DHCP_RANGE", "ipRange": "10.0.0.10-10.0.0.20" }
        })))
        .mount(&server)
        .await;

    let range = client.get_native_range("1001").await.unwrap();
    assert_eq!(range.id, "r-77");
    assert_eq!(range.vlan, None);
    let dhcp = range.dhcp_settings.unwrap();
    assert_eq!(dhcp.dhcp_type, "DHCP_RANGE");
    assert_eq!(dhcp.relay_group_id, None);
}

#[tokio::test]
async fn test_update_native_range_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(account_path("ranges/r-77")))
        .and(body_json(json!({
            "subnet": "10.0.0.0/24",
            "localIp": "10.0.0.1",
            "gateway": "10.0.0.1",
            "vlan": 20,
            "mdnsReflector": false,
            "dhcpSettings": { "dhcpType": "DHCP_RELAY", "relayGroupId": "rg-1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "r-77" })))
        .expect(1)
        .mount(&server)
        .await;

    let body = NativeRangeUpdate {
        subnet: "10.0.0.0/24".into(),
        local_ip: "10.0.0.1".into(),
        gateway: "10.0.0.1".into(),
        vlan: Some(20),
        translated_subnet: None,
        mdns_reflector: false,
        dhcp_settings: Some(DhcpSettingsPayload {
            dhcp_type: "DHCP_RELAY".into(),
            relay_group_id: Some("rg-1".into()),
            ..DhcpSettingsPayload::default()
        }),
    };
    let result = client.update_native_range("r-77", &body).await.unwrap();
    assert_eq!(result.id, "r-77");
}

#[tokio::test]
async fn test_find_relay_groups() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(account_path("dhcp-relay-groups")))
        .and(query_param("name", "corp-relay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "items": [{ "id": "rg-1", "name": "corp-relay" }]
        })))
        .mount(&server)
        .await;

    let listing = client.find_relay_groups("corp-relay").await.unwrap();
    assert_eq!(listing.items[0].id, "rg-1");
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_401_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_site("1001").await;
    assert!(
        matches!(result, Err(Error::InvalidApiKey)),
        "expected InvalidApiKey, got: {result:?}"
    );
}

#[tokio::test]
async fn test_error_404_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(account_path("sites/missing")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "site not found",
            "code": "site.not_found"
        })))
        .mount(&server)
        .await;

    let err = client.get_site("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_transient());
    assert_eq!(err.api_error_code(), Some("site.not_found"));
    assert!(err.to_string().contains("site not found"));
}

#[tokio::test]
async fn test_error_429_rate_limited() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .mount(&server)
        .await;

    let err = client.get_native_range("1001").await.unwrap_err();
    assert!(matches!(err, Error::RateLimited { retry_after_secs: 12 }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_error_500_plain_text_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = client.remove_site("1001").await.unwrap_err();
    match err {
        Error::Api {
            status,
            ref message,
            ref code,
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
            assert!(code.is_none());
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_success_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client.get_site("1001").await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>gateway</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
