//! Session tests for the s3b REPL
//!
//! Drive the shell dispatcher end to end over an in-memory store with a
//! scripted confirmation callback.

use std::process::Command;
use std::sync::Arc;

use s3b::commands::{Flow, Shell};
use s3b::exit_code::ExitCode;
use s3b::output::{Formatter, OutputConfig};
use s3b_core::{EntryKind, KeyLister, MemoryStore, Navigator, ObjectStore as _};
use tempfile::TempDir;

const BUCKET: &str = "b";

fn formatter() -> Formatter {
    Formatter::new(OutputConfig {
        no_color: true,
        no_progress: true,
    })
}

fn store(keys: &[&str]) -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.create_bucket(BUCKET).unwrap();
    for key in keys {
        let data = if key.ends_with('/') { "" } else { "data" };
        store.insert(BUCKET, key, data).unwrap();
    }
    Arc::new(store)
}

async fn shell(store: &Arc<MemoryStore>, local_dir: &TempDir) -> Shell {
    let navigator = Navigator::open(KeyLister::new(store.clone(), BUCKET)).await.unwrap();
    Shell::new(navigator, formatter(), 20).with_local_dir(local_dir.path())
}

fn names(shell: &Shell) -> Vec<(String, EntryKind)> {
    shell
        .navigator()
        .listing()
        .iter()
        .map(|e| (e.name().to_string(), e.kind()))
        .collect()
}

#[tokio::test]
async fn test_browse_scenario() {
    let store = store(&["a.txt", "docs/", "docs/x.md", "docs/img/", "docs/img/p.png"]);
    let local = TempDir::new().unwrap();
    let mut shell = shell(&store, &local).await;
    let mut never = |_: &str| false;

    assert_eq!(
        names(&shell),
        [
            ("docs".to_string(), EntryKind::Directory),
            ("a.txt".to_string(), EntryKind::File),
        ]
    );
    assert_eq!(shell.prompt(), "<b> ~/$ ");

    assert_eq!(shell.execute("cd docs", &mut never).await, Flow::Continue(ExitCode::Success));
    assert_eq!(shell.prompt(), "<b> ~/docs/$ ");
    assert_eq!(
        names(&shell),
        [
            ("img".to_string(), EntryKind::Directory),
            ("x.md".to_string(), EntryKind::File),
        ]
    );

    assert_eq!(shell.execute("cd img", &mut never).await, Flow::Continue(ExitCode::Success));
    assert_eq!(shell.execute("cd ..", &mut never).await, Flow::Continue(ExitCode::Success));
    assert_eq!(shell.prompt(), "<b> ~/docs/$ ");

    assert_eq!(
        shell.execute("cd nope", &mut never).await,
        Flow::Continue(ExitCode::NotFound)
    );
    assert_eq!(shell.prompt(), "<b> ~/docs/$ ");

    assert_eq!(shell.execute("cd ~", &mut never).await, Flow::Continue(ExitCode::Success));
    assert_eq!(shell.prompt(), "<b> ~/$ ");
}

#[tokio::test]
async fn test_mkdir_and_remove() {
    let store = store(&["a.txt", "b.txt", "c.log", "old/", "old/1.bin", "old/2.bin"]);
    let local = TempDir::new().unwrap();
    let mut shell = shell(&store, &local).await;
    let mut prompts = Vec::new();
    let mut yes = |prompt: &str| {
        prompts.push(prompt.to_string());
        true
    };

    assert_eq!(shell.execute("mkdir new", &mut yes).await, Flow::Continue(ExitCode::Success));
    assert!(store.keys(BUCKET).unwrap().contains(&"new/".to_string()));
    assert_eq!(shell.execute("mkdir new", &mut yes).await, Flow::Continue(ExitCode::Conflict));

    assert_eq!(shell.execute("rm *.txt", &mut yes).await, Flow::Continue(ExitCode::Success));
    assert_eq!(shell.execute("rm old", &mut yes).await, Flow::Continue(ExitCode::Success));
    assert_eq!(shell.execute("rm missing", &mut yes).await, Flow::Continue(ExitCode::NotFound));

    assert_eq!(store.keys(BUCKET).unwrap(), ["c.log", "new/"]);
    assert_eq!(
        prompts,
        [
            "Are you sure you want to delete 2 file(s)? (y/n) ",
            "'old/' is a directory. Are you sure you want to delete it? (y/n) ",
        ]
    );
}

#[tokio::test]
async fn test_declined_remove_keeps_keys() {
    let store = store(&["a.txt"]);
    let local = TempDir::new().unwrap();
    let mut shell = shell(&store, &local).await;
    let mut no = |_: &str| false;

    assert_eq!(shell.execute("rm a.txt", &mut no).await, Flow::Continue(ExitCode::Success));
    assert_eq!(store.keys(BUCKET).unwrap(), ["a.txt"]);
}

#[tokio::test]
async fn test_upload_and_download() {
    let store = store(&["docs/"]);
    let local = TempDir::new().unwrap();
    std::fs::write(local.path().join("one.txt"), "1").unwrap();
    std::fs::write(local.path().join("two.txt"), "22").unwrap();
    let mut shell = shell(&store, &local).await;
    let mut never = |_: &str| false;

    shell.execute("cd docs", &mut never).await;
    assert_eq!(
        shell.execute("up *.txt renamed.txt", &mut never).await,
        Flow::Continue(ExitCode::UsageError)
    );
    assert_eq!(shell.execute("up \"*.txt\"", &mut never).await, Flow::Continue(ExitCode::Success));
    assert_eq!(store.keys(BUCKET).unwrap(), ["docs/", "docs/one.txt", "docs/two.txt"]);

    assert_eq!(
        shell.execute("down two.txt copy.txt", &mut never).await,
        Flow::Continue(ExitCode::Success)
    );
    assert_eq!(std::fs::read_to_string(local.path().join("copy.txt")).unwrap(), "22");
    assert_eq!(
        shell.execute("down nothing*", &mut never).await,
        Flow::Continue(ExitCode::NotFound)
    );
}

#[tokio::test]
async fn test_ls_picks_up_external_changes() {
    let store = store(&["a.txt", "old.txt"]);
    let local = TempDir::new().unwrap();
    let mut shell = shell(&store, &local).await;
    let mut never = |_: &str| false;

    store.insert(BUCKET, "external.txt", "data").unwrap();
    store.insert(BUCKET, "new/", "").unwrap();
    store.delete_object(BUCKET, "old.txt").await.unwrap();

    assert_eq!(shell.execute("ls", &mut never).await, Flow::Continue(ExitCode::Success));
    assert_eq!(
        names(&shell),
        [
            ("new".to_string(), EntryKind::Directory),
            ("a.txt".to_string(), EntryKind::File),
            ("external.txt".to_string(), EntryKind::File),
        ]
    );
}

#[tokio::test]
async fn test_partial_failure_keeps_session() {
    let store = store(&["a.txt", "b.txt"]);
    store.fail_key("b.txt").unwrap();
    let local = TempDir::new().unwrap();
    let mut shell = shell(&store, &local).await;
    let mut yes = |_: &str| true;

    assert_eq!(
        shell.execute("rm *.txt", &mut yes).await,
        Flow::Continue(ExitCode::GeneralError)
    );
    assert_eq!(store.keys(BUCKET).unwrap(), ["b.txt"]);
    assert_eq!(names(&shell), [("b.txt".to_string(), EntryKind::File)]);
}

#[tokio::test]
async fn test_usage_and_quit() {
    let store = store(&[]);
    let local = TempDir::new().unwrap();
    let mut shell = shell(&store, &local).await;
    let mut never = |_: &str| false;

    assert_eq!(shell.execute("", &mut never).await, Flow::Continue(ExitCode::Success));
    assert_eq!(shell.execute("up", &mut never).await, Flow::Continue(ExitCode::UsageError));
    assert_eq!(shell.execute("bogus", &mut never).await, Flow::Continue(ExitCode::UsageError));
    assert_eq!(shell.execute("help", &mut never).await, Flow::Continue(ExitCode::Success));
    assert_eq!(shell.execute("ls long", &mut never).await, Flow::Continue(ExitCode::Success));
    assert_eq!(shell.execute("q", &mut never).await, Flow::Quit);
}

#[test]
fn test_binary_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_s3b"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--bucket"));
    assert!(stdout.contains("--no-progress"));
}
