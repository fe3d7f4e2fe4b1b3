use appswitch_core::name_resolver::{resolve_aliases, resolve_canonical_name};
use appswitch_core::process_source::list_running_applications;
use appswitch_core::model::RunningApp;
use appswitch_core::shell::ScriptedCommandRunner;

const VISIBLE: &str = "lsappinfo visibleProcessList";
const LISTING: &str = "lsappinfo list";

const LISTING_OUTPUT: &str = r#"
 1) "Finder" ASN:0x0-0x2002:
    bundleID="com.apple.finder"
    bundle path="/System/Library/CoreServices/Finder.app"
 2) "Code" ASN:0x0-0x4a04a:
    bundleID="com.microsoft.VSCode"
    bundle path="/Applications/Visual Studio Code.app"
 3) "Google_Chrome" ASN:0x0-0x1c01c:
    bundle path="/Applications/Google Chrome.app"
 4) "Helper" ASN:0x0-0x5005:
    bundleID="com.example.helper"
"#;

fn names(apps: &[RunningApp]) -> Vec<&str> {
    apps.iter().map(|app| app.name.as_str()).collect()
}

#[tokio::test]
async fn lists_visible_processes_with_spaces_restored() {
    let runner = ScriptedCommandRunner::default().with_output(
        VISIBLE,
        "ASN:0x0-0x2002-\"Finder\": ASN:0x0-0x1c01c-\"Google_Chrome\": ASN:0x0-0x4a04a-\"Code\":\n",
    );

    let apps = list_running_applications(&runner).await;

    assert_eq!(names(&apps), vec!["Finder", "Google Chrome", "Code"]);
    assert_eq!(runner.calls(), vec![VISIBLE]);
}

#[tokio::test]
async fn process_query_failure_yields_empty_list() {
    let runner = ScriptedCommandRunner::default().with_failure(VISIBLE, "lsappinfo: not permitted");
    assert!(list_running_applications(&runner).await.is_empty());
}

#[tokio::test]
async fn canonical_name_comes_from_bundle_path() {
    let runner = ScriptedCommandRunner::default().with_output(LISTING, LISTING_OUTPUT);

    assert_eq!(resolve_canonical_name(&runner, "Code").await, "Visual Studio Code");
    assert_eq!(resolve_canonical_name(&runner, "Finder").await, "Finder");
    assert_eq!(resolve_canonical_name(&runner, "Helper").await, "Helper");
    assert_eq!(resolve_canonical_name(&runner, "Unknown").await, "Unknown");
}

#[tokio::test]
async fn listing_failure_falls_back_to_identity() {
    let runner = ScriptedCommandRunner::default().with_failure(LISTING, "boom");
    assert_eq!(resolve_canonical_name(&runner, "Code").await, "Code");
}

#[tokio::test]
async fn aliases_record_only_changed_names_from_one_listing() {
    let runner = ScriptedCommandRunner::default().with_output(LISTING, LISTING_OUTPUT);
    let running = vec![
        RunningApp::new("Finder"),
        RunningApp::new("Code"),
        RunningApp::new("Google Chrome"),
    ];

    let aliases = resolve_aliases(&runner, &running).await;

    assert_eq!(aliases.len(), 1);
    assert_eq!(aliases.get("Code").map(String::as_str), Some("Visual Studio Code"));
    assert_eq!(runner.calls(), vec![LISTING]);
}

#[tokio::test]
async fn no_running_apps_skips_the_listing_query() {
    let runner = ScriptedCommandRunner::default();
    assert!(resolve_aliases(&runner, &[]).await.is_empty());
    assert!(runner.calls().is_empty());
}
