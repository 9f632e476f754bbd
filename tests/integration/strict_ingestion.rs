use codestudio::action::strict::{StrictIngestor, EMPTY_PROJECT_NAME, PROJECT_ROOT_NAME};
use codestudio::action::TagVocabulary;
use codestudio::error::ParseError;

fn ingestor() -> StrictIngestor {
    StrictIngestor::new(TagVocabulary::custom("artifact", "action").unwrap())
}

#[test]
fn wrapped_document_builds_tree() {
    let xml = r#"<?xml version="1.0"?>
<artifact>
  <action type="file" filePath="src\main.js">main()</action>
  <action type="file" filePath="/README.md">hello</action>
  <action type="shell">npm start</action>
</artifact>"#;
    let tree = ingestor().ingest(xml).unwrap();
    assert_eq!(tree.root().name, PROJECT_ROOT_NAME);
    assert_eq!(tree.find_file("src/main.js").unwrap().content, "main()");
    assert_eq!(tree.find_file("README.md").unwrap().content, "hello");
    assert_eq!(tree.file_count(), 2);
}

#[test]
fn missing_wrapper_and_child_fields() {
    let xml = r#"<action><type>file</type><filePath>lib/util.js</filePath><code>export {}</code></action>"#;
    let tree = ingestor().ingest(xml).unwrap();
    assert_eq!(tree.find_file("lib/util.js").unwrap().content, "export {}");
}

#[test]
fn conflicts_reported_not_fatal() {
    let xml = r#"<artifact>
  <action type="file" filePath="a">1</action>
  <action type="file" filePath="a/b">2</action>
</artifact>"#;
    let (tree, report) = ingestor().ingest_with_report(xml).unwrap();
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(tree.find_file("a").unwrap().content, "1");
}

#[test]
fn empty_artifact_is_empty_project() {
    let tree = ingestor().ingest("<artifact></artifact>").unwrap();
    assert_eq!(tree.root().name, EMPTY_PROJECT_NAME);
    assert!(tree.is_empty());
}

#[test]
fn malformed_markup_is_single_error() {
    let result = ingestor().ingest(r#"<artifact><action type="file" filePath="a">x</artifact>"#);
    assert!(matches!(result, Err(ParseError::Xml { .. })));
}
