//! Drift scenarios: trees that got out of sync behind the engine's
//! back, audited and repaired back to health.

use mirror_core::{AuditStatus, FieldWrite, FolderStore, PageStore, ViolationKind};
use mirror_test_utils::TestSite;
use mirror_tree::{FolderId, PageId};
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("mirror_core=debug")
        .with_test_writer()
        .try_init();
}

#[test]
fn test_imported_tree_repairs_into_a_mirror() {
    init_tracing();
    let mut site = TestSite::new();

    // an import writes pages straight into the store, no hooks fire
    let mut docs = site.draft("Docs");
    docs.set_segment("docs");
    let docs_id = site.persist_unmirrored(&mut docs);
    let mut install = site.draft_child("Install", docs_id);
    install.set_segment("install");
    let install_id = site.persist_unmirrored(&mut install);
    let mut faq = site.draft_child("FAQ", docs_id);
    let faq_id = site.persist_unmirrored(&mut faq);

    let report = site.engine.audit(&site.pages, &site.folders).unwrap();
    assert_eq!(report.status, AuditStatus::Drifted);
    assert_eq!(report.violations.len(), 3);
    assert!(
        report
            .violations
            .iter()
            .all(|v| v.kind == ViolationKind::MissingFolder)
    );

    let outcome = site.repair().unwrap();
    assert_eq!(outcome.folder_writes(), 3);
    site.assert_folder_under(docs_id, None);
    site.assert_folder_under(install_id, Some(docs_id));
    site.assert_folder_under(faq_id, Some(docs_id));
    assert_eq!(site.folder_path(install_id), "Articles/docs/install");
    // the import never carried a segment for this one, repair derived
    // it from the title
    site.assert_folder_name(faq_id, "faq");

    assert!(site.repair().unwrap().is_empty());
    let report = site.engine.audit(&site.pages, &site.folders).unwrap();
    assert!(report.is_healthy());
}

#[test]
fn test_import_with_dangling_parent_ref_is_repaired() {
    let mut site = TestSite::new();
    // the import kept a parent id from the old database
    let mut stray = site.draft_child("Migration Notes", PageId::new(424242));
    let stray_id = site.persist_unmirrored(&mut stray);

    let report = site.engine.audit(&site.pages, &site.folders).unwrap();
    assert_eq!(report.status, AuditStatus::Drifted);
    assert_eq!(
        report.violations_for(stray_id)[0].kind,
        ViolationKind::MissingFolder
    );

    site.repair().unwrap();
    site.assert_folder_name(stray_id, "migration-notes");
    site.assert_folder_under(stray_id, None);
    let report = site.engine.audit(&site.pages, &site.folders).unwrap();
    assert!(report.is_healthy());
}

#[test]
fn test_folder_renamed_out_of_band() {
    let mut site = TestSite::new();
    let mut page = site.draft("Pricing");
    let id = site.persist(&mut page).unwrap();

    let mut folder = site.folder_of(id);
    folder.name = "pricing-old".to_string();
    site.folders.write(&folder).unwrap();

    let report = site.engine.audit(&site.pages, &site.folders).unwrap();
    let violations = report.violations_for(id);
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].kind,
        ViolationKind::NameMismatch {
            expected: "pricing".to_string(),
            actual: "pricing-old".to_string(),
        }
    );

    let writes_before = site.folders.write_count();
    site.repair().unwrap();
    assert_eq!(site.folders.write_count(), writes_before + 1);
    site.assert_folder_name(id, "pricing");
}

#[test]
fn test_folder_moved_out_of_band() {
    let mut site = TestSite::new();
    let mut section = site.draft("Guides");
    let section_id = site.persist(&mut section).unwrap();
    let mut page = site.draft_child("Setup", section_id);
    let page_id = site.persist(&mut page).unwrap();

    // drag the child folder up next to its section
    let mut folder = site.folder_of(page_id);
    folder.parent_id = site.folder_of(section_id).parent_id;
    site.folders.write(&folder).unwrap();

    let report = site.engine.audit(&site.pages, &site.folders).unwrap();
    let violations = report.violations_for(page_id);
    assert_eq!(violations.len(), 1);
    assert!(matches!(
        violations[0].kind,
        ViolationKind::ParentMismatch { .. }
    ));

    site.repair().unwrap();
    site.assert_folder_under(page_id, Some(section_id));
    assert_eq!(site.folder_path(page_id), "Articles/guides/setup");
}

#[test]
fn test_dangling_binding_is_rebound() {
    let mut site = TestSite::new();
    let mut page = site.draft("Archive");
    let id = site.persist(&mut page).unwrap();

    site.pages
        .write_field(id, FieldWrite::FolderRef(Some(FolderId::new(999))))
        .unwrap();

    let report = site.engine.audit(&site.pages, &site.folders).unwrap();
    let violations = report.violations_for(id);
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].kind,
        ViolationKind::DanglingFolder {
            folder: FolderId::new(999),
        }
    );

    site.repair().unwrap();
    site.assert_folder_name(id, "archive");
    site.assert_folder_under(id, None);
}

#[test]
fn test_shared_folder_is_split() {
    let mut site = TestSite::new();
    let mut first = site.draft("Pricing");
    let first_id = site.persist(&mut first).unwrap();
    let mut second = site.draft("Team");
    let second_id = site.persist(&mut second).unwrap();

    // point the second page at the first page's folder
    let shared = site.folder_of(first_id).id;
    site.pages
        .write_field(second_id, FieldWrite::FolderRef(Some(shared)))
        .unwrap();

    let report = site.engine.audit(&site.pages, &site.folders).unwrap();
    assert!(
        report
            .violations_for(second_id)
            .iter()
            .any(|v| v.kind == ViolationKind::SharedFolder {
                other_page: first_id,
            })
    );

    site.repair().unwrap();
    assert_eq!(site.folder_of(first_id).id, shared);
    assert_ne!(site.folder_of(second_id).id, shared);
    site.assert_folder_name(second_id, "team");
    let report = site.engine.audit(&site.pages, &site.folders).unwrap();
    assert!(report.is_healthy());
}

#[test]
fn test_shared_folder_from_identical_paths_is_split() {
    let mut site = TestSite::new();
    let mut left = site.draft_typed("VirtualPage", "Left Rail");
    let left_id = site.persist(&mut left).unwrap();
    let mut right = site.draft_typed("VirtualPage", "Right Rail");
    let right_id = site.persist(&mut right).unwrap();

    // same title under two excluded parents: both pages resolve to the
    // root container and the live path adopts one folder for both
    let mut first = site.draft_child("Overview", left_id);
    let first_id = site.persist(&mut first).unwrap();
    let mut second = site.draft_child("Overview", right_id);
    let second_id = site.persist(&mut second).unwrap();
    let shared = site.folder_of(first_id).id;
    assert_eq!(site.folder_of(second_id).id, shared);

    let report = site.engine.audit(&site.pages, &site.folders).unwrap();
    assert!(
        report
            .violations_for(second_id)
            .iter()
            .any(|v| v.kind == ViolationKind::SharedFolder {
                other_page: first_id,
            })
    );

    site.repair().unwrap();
    assert_eq!(site.folder_of(first_id).id, shared);
    assert_ne!(site.folder_of(second_id).id, shared);
    site.assert_folder_name(second_id, "overview-2");
    site.assert_folder_under(second_id, None);
    assert_eq!(site.reload(second_id).segment(), "overview-2");
    let report = site.engine.audit(&site.pages, &site.folders).unwrap();
    assert!(report.is_healthy());
}

#[test]
fn test_excluded_pages_do_not_pollute_the_report() {
    let mut site = TestSite::new();
    let mut ghost = site.draft_typed("VirtualPage", "Ghost");
    let ghost_id = site.persist_unmirrored(&mut ghost);
    let mut child = site.draft_child("Real Content", ghost_id);
    let child_id = site.persist_unmirrored(&mut child);

    let report = site.engine.audit(&site.pages, &site.folders).unwrap();
    assert!(report.violations_for(ghost_id).is_empty());
    assert_eq!(report.violations_for(child_id).len(), 1);

    site.repair().unwrap();
    site.assert_no_folder(ghost_id);
    site.assert_folder_under(child_id, None);
}

#[test]
fn test_report_serializes_for_dashboards() {
    let mut site = TestSite::new();
    let mut page = site.draft("Unbound");
    site.persist_unmirrored(&mut page);

    let report = site.engine.audit(&site.pages, &site.folders).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "drifted");
    assert_eq!(json["violations"][0]["kind"]["kind"], "missing-folder");
    assert_eq!(json["violations"][0]["page"], 1);
    assert!(json["generated_at"].is_string());
}
