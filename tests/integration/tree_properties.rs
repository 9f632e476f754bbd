use codestudio::action::Action;
use codestudio::error::TreeError;
use codestudio::tree::mount::{from_mount, to_mount};
use codestudio::tree::FileTree;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn create(path: &str, code: &str) -> Action {
    Action::CreateFile {
        path: path.to_string(),
        code: code.to_string(),
    }
}

/// Folder segments never end in `.txt` and file names always do, so writes never collide.
fn file_path() -> impl Strategy<Value = String> {
    (prop::collection::vec("[a-c]", 0..3), "[a-c]").prop_map(|(folders, leaf)| {
        let mut segments = folders;
        segments.push(format!("{}.txt", leaf));
        segments.join("/")
    })
}

fn writes() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((file_path(), "[a-z0-9 ]{0,12}"), 1..24)
}

fn build(writes: &[(String, String)]) -> (FileTree, Vec<Action>) {
    let mut actions: Vec<Action> = writes.iter().map(|(p, c)| create(p, c)).collect();
    let mut tree = FileTree::default();
    let report = tree.apply_all(&mut actions);
    assert!(report.is_clean());
    (tree, actions)
}

/// Short paths over two names, so `a` and `a/b` collide often.
fn colliding_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[ab]", 1..4).prop_map(|segments| segments.join("/"))
}

proptest! {
    #[test]
    fn conflicts_leave_earlier_nodes_intact(
        writes in prop::collection::vec((colliding_path(), "[a-z0-9]{0,8}"), 1..24)
    ) {
        let mut tree = FileTree::default();
        let mut files: BTreeMap<String, String> = BTreeMap::new();
        let mut folders: BTreeSet<String> = BTreeSet::new();
        let mut expected_conflicts = Vec::new();

        for (path, content) in &writes {
            let before = tree.clone();
            let result = tree.apply(&mut create(path, content));

            let segments: Vec<&str> = path.split('/').collect();
            let prefixes: Vec<String> = (1..segments.len())
                .map(|depth| segments[..depth].join("/"))
                .collect();
            let collides =
                folders.contains(path) || prefixes.iter().any(|p| files.contains_key(p));
            if collides {
                prop_assert!(matches!(&result, Err(e) if e.is_conflict()), "{:?}", result);
                prop_assert_eq!(&tree, &before);
                expected_conflicts.push(path.clone());
            } else {
                prop_assert!(result.is_ok(), "{:?}", result);
                files.insert(path.clone(), content.clone());
                folders.extend(prefixes);
            }
        }

        for (path, content) in &files {
            let file = tree.find_file(path);
            prop_assert!(file.is_some(), "missing file {}", path);
            prop_assert_eq!(&file.unwrap().content, content);
        }
        prop_assert_eq!(tree.file_count(), files.len());

        let mut actions: Vec<Action> = writes.iter().map(|(p, c)| create(p, c)).collect();
        let mut batch_tree = FileTree::default();
        let report = batch_tree.apply_all(&mut actions);
        let reported: Vec<String> = report.conflicts.iter().map(|c| c.path.clone()).collect();
        prop_assert_eq!(reported, expected_conflicts);
        prop_assert!(report.rejected.is_empty());
        prop_assert_eq!(batch_tree, tree);
    }

    #[test]
    fn last_write_wins_and_folders_exist(writes in writes()) {
        let (tree, _) = build(&writes);

        let mut expected = BTreeMap::new();
        for (path, content) in &writes {
            expected.insert(path.clone(), content.clone());
        }
        for (path, content) in &expected {
            let file = tree.find_file(path);
            prop_assert!(file.is_some(), "missing file {}", path);
            prop_assert_eq!(&file.unwrap().content, content);

            let segments: Vec<&str> = path.split('/').collect();
            for depth in 1..segments.len() {
                let folder = segments[..depth].join("/");
                prop_assert!(tree.find(&folder).and_then(|n| n.as_folder()).is_some());
            }
        }
        prop_assert_eq!(tree.file_count(), expected.len());
    }

    #[test]
    fn repeated_write_is_idempotent(writes in writes()) {
        let (once, _) = build(&writes);

        let doubled: Vec<(String, String)> = writes
            .iter()
            .flat_map(|w| vec![w.clone(), w.clone()])
            .collect();
        let (twice, actions) = build(&doubled);

        prop_assert_eq!(&once, &twice);
        for pair in actions.chunks(2) {
            prop_assert_eq!(pair[1].kind(), "UpdateFile");
        }
    }

    #[test]
    fn digest_is_deterministic(writes in writes()) {
        let (first, _) = build(&writes);
        let (second, _) = build(&writes);
        prop_assert_eq!(first.digest(), second.digest());
    }

    #[test]
    fn mount_round_trip_preserves_files(writes in writes()) {
        let (tree, _) = build(&writes);
        let mount = to_mount(&tree);
        let restored = from_mount(&tree.root().name, &mount).unwrap();

        let original: BTreeSet<(String, String)> = tree
            .files()
            .iter()
            .map(|f| (f.path.clone(), f.content.clone()))
            .collect();
        let round_tripped: BTreeSet<(String, String)> = restored
            .files()
            .iter()
            .map(|f| (f.path.clone(), f.content.clone()))
            .collect();
        prop_assert_eq!(original, round_tripped);
        prop_assert_eq!(to_mount(&restored), mount);
    }
}

#[test]
fn order_decides_content() {
    let mut forward = FileTree::default();
    forward.apply_all(&mut [create("x", "v1"), create("x", "v2")]);
    assert_eq!(forward.find_file("x").unwrap().content, "v2");

    let mut reverse = FileTree::default();
    reverse.apply_all(&mut [create("x", "v2"), create("x", "v1")]);
    assert_eq!(reverse.find_file("x").unwrap().content, "v1");
}

#[test]
fn file_blocks_nested_path() {
    let mut tree = FileTree::default();
    let mut actions = [create("a", "code1"), create("a/b", "code2")];
    let report = tree.apply_all(&mut actions);

    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].path, "a/b");
    assert_eq!(tree.find_file("a").unwrap().content, "code1");
    assert!(tree.find("a/b").is_none());
    assert_eq!(actions[1].kind(), "CreateFile");

    let direct = tree.apply(&mut create("a/c", "x"));
    assert!(matches!(direct, Err(TreeError::FileAsFolder { .. })));
}
