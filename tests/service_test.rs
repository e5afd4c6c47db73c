//! Tests for LineageService over JSON member files

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use lineage::application::services::LineageService;
use lineage::application::ApplicationError;
use lineage::config::Settings;
use lineage::domain::{BuildOptions, VIRTUAL_ROOT_ID};
use lineage::infrastructure::di::ServiceContainer;
use lineage::infrastructure::traits::{JsonFileMemberSource, MemberSource};
use lineage::util::testing::init_test_setup;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/members")
        .join(name)
}

fn service_for(path: PathBuf) -> LineageService {
    init_test_setup();
    LineageService::new(
        Arc::new(JsonFileMemberSource::new(path)),
        BuildOptions::default(),
    )
}

#[test]
fn given_members_file_when_fetching_then_sorted_by_name() {
    let source = JsonFileMemberSource::new(resource("seeded.json"));

    let members = source.fetch_members().unwrap();

    assert_eq!(members.len(), 8);
    assert_eq!(members[0].name, "Alice Nguyen");
    assert_eq!(members[7].name, "Henry Okafor");
    assert_eq!(members[1].mentor(), Some("alice"));
    assert_eq!(members[0].mentor(), None);
}

#[test]
fn given_members_file_when_loading_page_then_trees_names_and_years() {
    let service = service_for(resource("seeded.json"));

    let page = service.page();

    assert_eq!(page.tree_names, vec!["Lambda Tree", "Sigma Tree"]);
    assert_eq!(
        page.graduation_years,
        vec![2025, 2024, 2023, 2022, 2021, 2020, 2019]
    );
    assert_eq!(page.trees[1].root.name, "Eve Johnson");
}

#[test]
fn given_page_when_serialized_then_camel_case_and_sparse_attributes() {
    let service = service_for(resource("seeded.json"));

    let value = serde_json::to_value(service.page()).unwrap();

    assert!(value.get("treeNames").is_some());
    assert!(value.get("graduationYears").is_some());
    let alice = &value["trees"][0]["root"];
    assert_eq!(alice["name"], "Alice Nguyen");
    assert_eq!(alice["attributes"]["graduationYear"], "2019");
    assert_eq!(alice["attributes"]["role"], "President");
    assert!(alice["attributes"].get("imageUrl").is_none());
    let carol = &alice["children"][0]["children"][0];
    assert_eq!(carol["name"], "Carol Thompson");
    assert!(carol.get("children").is_none());
}

#[rstest]
#[case::missing_file("absent.json")]
#[case::cycle("cycle.json")]
fn given_unusable_data_when_loading_page_then_empty_page(#[case] file: &str) {
    let service = service_for(resource(file));

    assert!(service.load_forest().is_err());
    let page = service.page();
    assert!(page.is_empty());
    assert!(page.tree_names.is_empty());
    assert!(page.graduation_years.is_empty());
}

#[test]
fn given_malformed_json_when_loading_then_operation_failed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("members.json");
    fs::write(&path, "[{\"id\": \"a\", \"name\": }]").unwrap();

    let err = service_for(path).load_forest().unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}

#[test]
fn given_no_tree_when_viewing_then_first_tree_decorated() {
    let service = service_for(resource("seeded.json"));

    let (name, root) = service.view(None, "frank", None).unwrap().unwrap();

    assert_eq!(name, "Lambda Tree");
    assert!(root.decoration.search_active);
    assert!(root.iter().all(|n| !n.decoration.highlighted));
}

#[test]
fn given_named_tree_when_viewing_then_that_tree_decorated() {
    let service = service_for(resource("seeded.json"));

    let (name, root) = service
        .view(Some("Sigma Tree"), "frank", None)
        .unwrap()
        .unwrap();

    assert_eq!(name, "Sigma Tree");
    let hits: Vec<_> = root
        .iter()
        .filter(|n| n.decoration.highlighted)
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(hits, vec!["Frank Liu"]);
}

#[test]
fn given_unknown_tree_when_viewing_then_tree_not_found() {
    let service = service_for(resource("seeded.json"));

    let err = service.view(Some("Omega Tree"), "", None).unwrap_err();

    assert!(matches!(err, ApplicationError::TreeNotFound(ref name) if name == "Omega Tree"));
}

#[test]
fn given_container_with_configured_file_when_building_service_then_uses_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("members.json");
    fs::write(
        &path,
        r#"[{"id": "a", "name": "Ann"}, {"id": "b", "name": "Ben"}]"#,
    )
    .unwrap();
    let settings = Settings {
        members_file: Some(path),
        default_tree_name: "Orphans".into(),
        ..Settings::default()
    };
    let container = ServiceContainer::new(settings);

    let source = container.member_source(None).expect("configured source");
    let trees = container.lineage_service(source).load_forest().unwrap();

    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].name, "Orphans");
    assert_eq!(trees[0].root.attributes.id, VIRTUAL_ROOT_ID);
}

#[test]
fn given_container_without_file_when_requesting_source_then_none() {
    let container = ServiceContainer::new(Settings::default());
    assert!(container.member_source(None).is_none());
}
