use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use welldocs_core::DownloadTask;
use welldocs_engine::{rename_downloads, DownloadLayout};

fn task(document_type: &str, content_id: &str) -> DownloadTask {
    DownloadTask {
        external_id: "17".to_string(),
        document_type: document_type.to_string(),
        content_id: content_id.to_string(),
        link: format!("/pls/doc?dDocname={content_id}"),
    }
}

fn place(layout: &DownloadLayout, task: &DownloadTask) {
    let path = layout.pending_path(task);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, &task.content_id).unwrap();
}

fn names(dir: PathBuf) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn sequences_follow_encounter_order() {
    let root = TempDir::new().unwrap();
    let layout = DownloadLayout::new(root.path());
    let tasks = vec![task("WELL_LOG", "C"), task("WELL_LOG", "A"), task("WELL_LOG", "B")];
    tasks.iter().for_each(|task| place(&layout, task));

    let report = rename_downloads(&layout, &tasks);

    assert_eq!(report.renamed.len(), 3);
    let well_logs = root.path().join("well_logs");
    assert_eq!(fs::read_to_string(well_logs.join("17_WELL_LOG_1.pdf")).unwrap(), "C");
    assert_eq!(fs::read_to_string(well_logs.join("17_WELL_LOG_2.pdf")).unwrap(), "A");
    assert_eq!(fs::read_to_string(well_logs.join("17_WELL_LOG_3.pdf")).unwrap(), "B");
}

#[test]
fn each_document_type_counts_separately() {
    let root = TempDir::new().unwrap();
    let layout = DownloadLayout::new(root.path());
    let tasks = vec![task("PERMIT", "P1"), task("SURVEY", "S1"), task("PERMIT", "P2")];
    tasks.iter().for_each(|task| place(&layout, task));

    rename_downloads(&layout, &tasks);

    assert_eq!(
        names(root.path().join("other_files/17")),
        vec!["17_PERMIT_1.pdf", "17_PERMIT_2.pdf", "17_SURVEY_1.pdf"]
    );
}

#[test]
fn missing_files_do_not_use_a_number() {
    let root = TempDir::new().unwrap();
    let layout = DownloadLayout::new(root.path());
    let tasks = vec![task("WELL_LOG", "A"), task("WELL_LOG", "B"), task("WELL_LOG", "C")];
    place(&layout, &tasks[0]);
    place(&layout, &tasks[2]);

    let report = rename_downloads(&layout, &tasks);

    assert_eq!(report.missing, 1);
    assert_eq!(
        names(root.path().join("well_logs")),
        vec!["17_WELL_LOG_1.pdf", "17_WELL_LOG_2.pdf"]
    );
    assert_eq!(
        fs::read_to_string(root.path().join("well_logs/17_WELL_LOG_2.pdf")).unwrap(),
        "C"
    );
}

#[test]
fn numeric_content_ids_do_not_clobber_each_other() {
    let root = TempDir::new().unwrap();
    let layout = DownloadLayout::new(root.path());
    let tasks = vec![task("WELL_LOG", "2"), task("WELL_LOG", "1")];
    tasks.iter().for_each(|task| place(&layout, task));

    let report = rename_downloads(&layout, &tasks);

    assert_eq!(report.renamed.len(), 2);
    assert_eq!(report.failed, 0);
    let well_logs = root.path().join("well_logs");
    assert_eq!(
        names(well_logs.clone()),
        vec!["17_WELL_LOG_1.pdf", "17_WELL_LOG_2.pdf"]
    );
    assert_eq!(fs::read_to_string(well_logs.join("17_WELL_LOG_1.pdf")).unwrap(), "2");
    assert_eq!(fs::read_to_string(well_logs.join("17_WELL_LOG_2.pdf")).unwrap(), "1");
}

#[test]
fn rerun_over_sequenced_files_leaves_no_temporaries() {
    let root = TempDir::new().unwrap();
    let layout = DownloadLayout::new(root.path());
    let tasks = vec![task("WELL_LOG", "A"), task("WELL_LOG", "B")];

    tasks.iter().for_each(|task| place(&layout, task));
    rename_downloads(&layout, &tasks);
    tasks.iter().for_each(|task| place(&layout, task));
    rename_downloads(&layout, &tasks);

    assert_eq!(
        names(root.path().join("well_logs")),
        vec!["17_WELL_LOG_1.pdf", "17_WELL_LOG_2.pdf"]
    );
}
