use std::fs;
use std::path::Path;

use fieldtags::Fields;
use fieldtags_build::{ScannedRecord, generate_manifest};
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("file has a parent")).expect("create dirs");
    fs::write(path, content).expect("write source");
}

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = dir.path().join("src");

    write(
        &src,
        "lib.rs",
        r#"
            pub mod billing;

            #[derive(Debug, fieldtags::Tagged)]
            pub struct Session {
                #[tags(json = "token")]
                pub token: String,
                pub scratch: Vec<u8>,
            }
        "#,
    );
    write(
        &src,
        "billing/mod.rs",
        r#"
            #[derive(Tagged)]
            pub struct Account {
                #[tags(json = "id", sql = "id,pk")]
                pub id: u64,
                #[tags(sql = "-")]
                pub cache: Option<String>,
                #[tags(yaml = "note")]
                pub note: String,
            }

            pub struct NotTagged {
                #[tags(json = "ignored")]
                pub field: u8,
            }
        "#,
    );
    write(&src, "broken.rs", "this is not rust");
    write(&src, "generated/skip.rs", "#[derive(Tagged)] struct Skipped { a: u8 }");

    dir
}

fn record<'a>(records: &'a [ScannedRecord], name: &str) -> &'a ScannedRecord {
    records.iter().find(|r| r.name == name).expect("record present")
}

fn names(fields: &Fields) -> Vec<&str> {
    fields.names().collect()
}

#[test]
fn collect_discovers_tagged_structs() {
    init_logging();
    let dir = fixture();

    let records = generate_manifest()
        .scan_path(dir.path().join("src"))
        .crate_name("app")
        .collect()
        .expect("scan succeeds");

    let found: Vec<_> = records.iter().map(|r| (r.module_path.as_str(), r.name.as_str())).collect();
    assert_eq!(found, [("app", "Session"), ("app::billing", "Account")]);

    let account = record(&records, "Account");
    assert_eq!(names(&account.fields), ["id", "cache", "note"]);
    assert!(account.fields.field("cache").and_then(|f| f.tag("sql")).is_some_and(|t| t.ignored()));
    assert_eq!(record(&records, "Session").fields.len(), 2);
}

#[test]
fn filters_are_applied_per_record() {
    init_logging();
    let dir = fixture();

    let records = generate_manifest()
        .scan_path(dir.path().join("src"))
        .require_tags(["json", "sql"])
        .collect()
        .expect("scan succeeds");
    assert_eq!(names(&record(&records, "Account").fields), ["id", "cache"]);
    assert_eq!(names(&record(&records, "Session").fields), ["token"]);

    let records = generate_manifest()
        .scan_path(dir.path().join("src"))
        .skip_untagged(true)
        .collect()
        .expect("scan succeeds");
    assert_eq!(names(&record(&records, "Session").fields), ["token"]);
    assert_eq!(record(&records, "Account").fields.len(), 3);
}

#[test]
fn run_writes_json_manifest() {
    init_logging();
    let dir = fixture();
    let output = dir.path().join("out/fields.json");

    generate_manifest()
        .scan_path(dir.path().join("src"))
        .output_file(&output)
        .skip_untagged(true)
        .run()
        .expect("manifest written");

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("manifest exists")).expect("valid json");
    assert_eq!(
        written[0],
        serde_json::json!({
            "name": "Session",
            "module_path": "crate",
            "fields": [
                {"name": "token", "type": "String", "tags": [{"key": "json", "value": "token"}]}
            ]
        })
    );
    assert_eq!(written[1]["fields"][0]["tags"][1], serde_json::json!({"key": "sql", "value": "id", "modifiers": ["pk"]}));

    let parsed: Vec<ScannedRecord> = serde_json::from_value(written).expect("round trips");
    assert_eq!(parsed.len(), 2);
}

#[test]
fn scanner_matches_derive() {
    use fieldtags::{Tagged, extract_type};

    #[allow(dead_code)]
    #[derive(Tagged)]
    struct Account {
        #[tags(json = "id", sql = "id,pk")]
        id: u64,
        #[tags = r#"json:"owner,omitempty" sql:"owner_id""#]
        owner: Option<std::collections::HashMap<String, u32>>,
        cache: Vec<u8>,
    }

    let source = r##"
        #[derive(Tagged)]
        struct Account {
            #[tags(json = "id", sql = "id,pk")]
            id: u64,
            #[tags = r#"json:"owner,omitempty" sql:"owner_id""#]
            owner: Option<std::collections::HashMap<String, u32>>,
            cache: Vec<u8>,
        }
    "##;

    let scanned = fieldtags_build::scan_source(source, "crate").expect("parses");
    assert_eq!(Some(scanned[0].fields.clone()), extract_type::<Account>());
}
