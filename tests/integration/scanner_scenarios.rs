use codestudio::action::{Action, ActionScanner, TagVocabulary};
use codestudio::tree::{FileSystemNode, FileTree};

fn scanner() -> ActionScanner {
    ActionScanner::new(TagVocabulary::custom("Artifact", "Action").unwrap())
}

#[test]
fn file_and_shell_build_nested_tree() {
    let text = r#"<Action type="file" filePath="src/app.js">console.log(1)</Action><Action type="shell">npm install</Action>"#;
    let mut actions = scanner().scan(text);
    assert_eq!(
        actions,
        vec![
            Action::CreateFile {
                path: "src/app.js".to_string(),
                code: "console.log(1)".to_string(),
            },
            Action::Shell {
                command: "npm install".to_string(),
            },
        ]
    );

    let mut tree = FileTree::default();
    let report = tree.apply_all(&mut actions);
    assert!(report.is_clean());
    assert_eq!(report.commands, vec!["npm install".to_string()]);

    let root = tree.root();
    assert_eq!(root.children.len(), 1);
    let src = root.children[0].as_folder().expect("src is a folder");
    assert_eq!(src.name, "src");
    assert_eq!(src.children.len(), 1);
    match &src.children[0] {
        FileSystemNode::File(file) => {
            assert_eq!(file.name, "app.js");
            assert_eq!(file.content, "console.log(1)");
        }
        other => panic!("expected file, got {:?}", other),
    }
}

#[test]
fn file_tag_without_path_yields_nothing() {
    let actions = scanner().scan(r#"<Action type="file">orphan content</Action>"#);
    assert!(actions.is_empty());
}

#[test]
fn bad_designs_json_does_not_block_later_tags() {
    let text = r#"<Action type="designs">{not json</Action>
<Action type="file" filePath="index.html"><h1>ok</h1></Action>"#;
    let actions = scanner().scan(text);
    assert_eq!(actions.len(), 1);
    assert!(!actions.iter().any(|a| matches!(a, Action::Designs { .. })));
    assert_eq!(actions[0].path(), Some("index.html"));
}

#[test]
fn prose_and_truncated_tags_are_ignored() {
    let text = r#"Here is your app:
<boltArtifact id="app" title="App">
<boltAction type="file" filePath="a.js">
  const a = 1;
</boltAction>
<boltAction type="file" filePath="b.js">cut off mid-str"#;
    let actions = ActionScanner::default().scan(text);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].code(), Some("  const a = 1;"));
}

#[test]
fn designs_payload_parsed() {
    let text = r#"<Action type="designs">{"components":[{"name":"Hero","path":"src/Hero.jsx","variations":["src/designs/HeroA.jsx"]}]}</Action>"#;
    match scanner().scan(text).as_slice() {
        [Action::Designs { components }] => {
            assert_eq!(components[0].name, "Hero");
            assert_eq!(components[0].variations.len(), 1);
        }
        other => panic!("unexpected actions: {:?}", other),
    }
}
