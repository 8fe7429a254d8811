//! Full-lifecycle integration scenarios: a host CMS editing a site
//! with folder mirroring wired into both persist hooks.

use mirror_core::{FolderStore, PageEvent, SyncConfig};
use mirror_test_utils::TestSite;
use mirror_tree::LocaleTag;
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("mirror_core=debug")
        .with_test_writer()
        .try_init();
}

#[test]
fn test_building_a_site_mirrors_the_tree() {
    init_tracing();
    let mut site = TestSite::new();

    let mut home = site.draft("Home");
    let home_id = site.persist(&mut home).unwrap();

    let mut about = site.draft_child("About Us", home_id);
    let about_id = site.persist(&mut about).unwrap();

    let mut news = site.draft_child("News & Events", home_id);
    let news_id = site.persist(&mut news).unwrap();

    let mut article = site.draft_child("First Article", news_id);
    let article_id = site.persist(&mut article).unwrap();

    site.assert_folder_name(home_id, "home");
    site.assert_folder_under(home_id, None);
    site.assert_folder_under(about_id, Some(home_id));
    site.assert_folder_under(news_id, Some(home_id));
    site.assert_folder_under(article_id, Some(news_id));
    assert_eq!(
        site.folder_path(article_id),
        "Articles/home/news-and-events/first-article"
    );
}

#[test]
fn test_renaming_a_section_carries_its_subtree() {
    let mut site = TestSite::new();
    let mut news = site.draft("News");
    let news_id = site.persist(&mut news).unwrap();
    let mut article = site.draft_child("Budget Cuts", news_id);
    let article_id = site.persist(&mut article).unwrap();

    let mut reloaded = site.reload(news_id);
    reloaded.set_segment("press");
    site.persist(&mut reloaded).unwrap();

    // the child folder was never touched, its materialized path moved
    // with the renamed parent
    site.assert_folder_name(article_id, "budget-cuts");
    assert_eq!(site.folder_path(article_id), "Articles/press/budget-cuts");
}

#[test]
fn test_editor_duplicates_and_reworks_a_page() {
    let mut site = TestSite::new();
    let mut original = site.draft("Landing Page");
    let original_id = site.persist(&mut original).unwrap();

    let copy_id = site.duplicate(original_id).unwrap();
    site.assert_folder_name(original_id, "landing-page");
    site.assert_folder_name(copy_id, "landing-page-2");

    // the copy then gets its real segment
    let mut copy = site.reload(copy_id);
    copy.set_segment("spring-campaign");
    site.persist(&mut copy).unwrap();

    site.assert_folder_name(copy_id, "spring-campaign");
    site.assert_folder_name(original_id, "landing-page");
    assert_eq!(
        site.folder_of(copy_id).parent_id,
        site.folder_of(original_id).parent_id
    );
}

#[test]
fn test_localized_site_only_mirrors_default_locale() {
    let config = SyncConfig::default().with_default_locale(Some(LocaleTag::new("en_US")));
    let mut site = TestSite::with_config(config);

    let mut english = site.draft_localized("Products", "en_US");
    let english_id = site.persist(&mut english).unwrap();

    let mut french = site.draft_localized("Produits", "fr_FR");
    let french_id = site.persist(&mut french).unwrap();

    site.assert_folder_name(english_id, "products");
    site.assert_no_folder(french_id);
}

#[test]
fn test_after_only_host_converges_to_the_same_tree() {
    let mut both = TestSite::new();
    let mut after_only = TestSite::new();

    let mut page_a = both.draft("Docs");
    let a = both.persist(&mut page_a).unwrap();
    let mut child_a = both.draft_child("Install", a);
    both.persist(&mut child_a).unwrap();

    let mut page_b = after_only.draft("Docs");
    let b = after_only.persist_after_only(&mut page_b).unwrap();
    let mut child_b = after_only.draft_child("Install", b);
    after_only.persist_after_only(&mut child_b).unwrap();

    let paths_both: Vec<String> = both
        .folders
        .all()
        .iter()
        .map(|f| both.folders.path_of(f.id).unwrap().to_string())
        .collect();
    let paths_after: Vec<String> = after_only
        .folders
        .all()
        .iter()
        .map(|f| after_only.folders.path_of(f.id).unwrap().to_string())
        .collect();
    assert_eq!(paths_both, paths_after);
}

#[test]
fn test_event_dispatch_reports_actions() {
    let mut site = TestSite::new();
    let mut page = site.draft("Dispatch Me");

    let outcome = site
        .engine
        .handle(
            PageEvent::BeforePersist,
            &mut page,
            &mut site.pages,
            &mut site.folders,
        )
        .unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["actions"][0]["action"], "segment-assigned");
    assert_eq!(json["actions"][1]["action"], "created-folder");
    assert_eq!(json["actions"][1]["path"], "Articles/dispatch-me");
    assert_eq!(json["actions"][2]["action"], "bound-folder");
}

#[test]
fn test_excluded_types_stay_invisible_end_to_end() {
    let mut site = TestSite::new();
    let mut virtual_page = site.draft_typed("VirtualPage", "Shadow");
    let virtual_id = site.persist(&mut virtual_page).unwrap();
    site.assert_no_folder(virtual_id);

    let mut error_page = site.draft_typed("ErrorPage", "Not Found");
    let error_id = site.persist(&mut error_page).unwrap();
    site.assert_no_folder(error_id);

    // the folder store never saw a write
    assert!(site.folders.is_empty());
}
