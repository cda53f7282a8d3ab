//! Tests for the JSON-RPC envelope handling and wire serialization.

use serde_json::json;

use super::super::types::{ApiError, ElementType, HostRef, MapDefinition, MapElement, MapLink};
use super::{endpoint_url, parse_rpc_response};

fn element(selementid: u32) -> MapElement {
    MapElement {
        selementid,
        x: 100,
        y: 200,
        use_iconmap: 0,
        elementtype: ElementType::Image,
        elements: None,
        elementid: Some("0".to_owned()),
        iconid_off: "26".to_owned(),
        label: None,
    }
}

#[test]
fn endpoint_url_joins_pieces() {
    assert_eq!(
        endpoint_url("http", "localhost", "/zabbix/"),
        "http://localhost/zabbix/api_jsonrpc.php"
    );
    assert_eq!(
        endpoint_url("https", "mon.example.org", "zabbix"),
        "https://mon.example.org/zabbix/api_jsonrpc.php"
    );
    assert_eq!(endpoint_url("http", "10.0.0.1", "/"), "http://10.0.0.1/api_jsonrpc.php");
}

#[test]
fn parse_result_payload() {
    let token: String =
        parse_rpc_response("user.login", r#"{"jsonrpc":"2.0","result":"abc123","id":1}"#).unwrap();
    assert_eq!(token, "abc123");
}

#[test]
fn parse_rpc_error_object() {
    let body = r#"{
        "jsonrpc": "2.0",
        "error": {"code": -32602, "message": "Invalid params.", "data": "No permissions."},
        "id": 2
    }"#;
    let err = parse_rpc_response::<String>("map.create", body).unwrap_err();
    match err {
        ApiError::Rpc { method, code, message, data } => {
            assert_eq!(method, "map.create");
            assert_eq!(code, -32602);
            assert_eq!(message, "Invalid params.");
            assert_eq!(data, "No permissions.");
        }
        other => panic!("expected Rpc error, got {other:?}"),
    }
}

#[test]
fn parse_error_without_data_field() {
    let body = r#"{"jsonrpc":"2.0","error":{"code":-1,"message":"boom"},"id":3}"#;
    let err = parse_rpc_response::<String>("host.get", body).unwrap_err();
    assert!(matches!(err, ApiError::Rpc { data, .. } if data.is_empty()));
}

#[test]
fn parse_missing_result_is_an_error() {
    let err = parse_rpc_response::<String>("map.get", r#"{"jsonrpc":"2.0","id":4}"#).unwrap_err();
    assert!(matches!(err, ApiError::Parse { method: "map.get", .. }));
}

#[test]
fn parse_malformed_body_is_an_error() {
    let err = parse_rpc_response::<String>("image.get", "<html>gateway timeout</html>").unwrap_err();
    assert!(matches!(err, ApiError::Parse { .. }));
}

#[test]
fn host_element_serializes_binding_and_omits_elementid() {
    let mut el = element(1);
    el.elementtype = ElementType::Host;
    el.elements = Some(vec![HostRef { hostid: Some("10084".to_owned()) }]);
    el.elementid = None;

    let value = serde_json::to_value(&el).unwrap();
    assert_eq!(value["elementtype"], json!(0));
    assert_eq!(value["elements"], json!([{"hostid": "10084"}]));
    assert!(value.get("elementid").is_none());
    assert!(value.get("label").is_none());
}

#[test]
fn unresolved_host_binding_serializes_as_null() {
    let host_ref = HostRef { hostid: None };
    assert_eq!(serde_json::to_value(&host_ref).unwrap(), json!({"hostid": null}));
}

#[test]
fn image_element_serializes_zero_elementid() {
    let value = serde_json::to_value(element(7)).unwrap();
    assert_eq!(value["selementid"], json!(7));
    assert_eq!(value["elementtype"], json!(4));
    assert_eq!(value["elementid"], json!("0"));
    assert_eq!(value["use_iconmap"], json!(0));
}

#[test]
fn map_definition_omits_sysmapid_until_replace() {
    let def = MapDefinition::new("net", 1920, 1280, vec![element(1)], Vec::new());
    let value = serde_json::to_value(&def).unwrap();
    assert!(value.get("sysmapid").is_none());
    assert_eq!(value["name"], json!("net"));
    assert_eq!(value["label_format"], json!(1));
    assert_eq!(value["label_type_image"], json!(0));
    assert_eq!(value["width"], json!(1920));
    assert_eq!(value["height"], json!(1280));
    assert_eq!(value["links"], json!([]));
}

#[test]
fn link_serializes_optional_label() {
    let link = MapLink { selementid1: 1, selementid2: 2, color: "00FF00".to_owned(), label: None };
    let value = serde_json::to_value(&link).unwrap();
    assert!(value.get("label").is_none());
    assert_eq!(value["color"], json!("00FF00"));
}

#[test]
fn element_type_wire_codes() {
    assert_eq!(ElementType::Host.code(), 0);
    assert_eq!(ElementType::Map.code(), 1);
    assert_eq!(ElementType::Trigger.code(), 2);
    assert_eq!(ElementType::HostGroup.code(), 3);
    assert_eq!(ElementType::Image.code(), 4);
}
