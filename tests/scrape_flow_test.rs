// tests/scrape_flow_test.rs

use canvas_dl::{
    ScrapeContext,
    config::{AppConfig, parse_base_url},
    downloader::CourseScraper,
    error::AppError,
    models::Course,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::{
    fs,
    path::Path,
    sync::{Arc, atomic::AtomicBool},
};
use tempfile::{TempDir, tempdir};

const TOKEN: &str = "test-token";

fn context_for(server: &ServerGuard, output: &Path, force: bool, ignore: &[&str]) -> ScrapeContext {
    let config = AppConfig {
        base_url: parse_base_url(&server.url()).unwrap(),
        output_dir: output.to_path_buf(),
        force_redownload: force,
        ..Default::default()
    };
    ScrapeContext::new(
        Arc::new(config),
        Some(TOKEN),
        ignore.iter().map(|s| s.to_string()).collect(),
        Arc::new(AtomicBool::new(false)),
    )
    .unwrap()
}

fn course(id: u64, name: &str) -> Course {
    Course {
        id,
        name: name.to_string(),
        ..Default::default()
    }
}

fn output_dir() -> TempDir {
    tempdir().unwrap()
}

fn entries_of(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

// --- Course discovery ---

#[tokio::test(flavor = "multi_thread")]
async fn test_course_discovery_follows_pagination_and_filters() {
    let mut server = Server::new_async().await;
    let url = server.url();
    let page_one = server
        .mock("GET", "/api/v1/courses")
        .match_query(Matcher::Regex("^per_page=1000$".into()))
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(200)
        .with_header(
            "link",
            &format!(
                r#"<{url}/api/v1/courses?page=2&per_page=1000>; rel="next", <{url}/api/v1/courses?page=1&per_page=1000>; rel="first""#
            ),
        )
        .with_body(json!([{"id": 1, "name": "Intro To X"}]).to_string())
        .create_async()
        .await;
    let page_two = server
        .mock("GET", "/api/v1/courses")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(json!([{"id": 2, "name": "Advanced Y"}, {"id": 3, "name": "intro to x"}]).to_string())
        .create_async()
        .await;

    let out = output_dir();
    let context = context_for(&server, out.path(), false, &[]);

    let filtered = context.api.list_courses(&["IntroToX".to_string()]).await.unwrap();
    let ids: Vec<u64> = filtered.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 3]);

    page_one.assert_async().await;
    page_two.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_course_discovery_keeps_base_url_path_prefix() {
    let mut server = Server::new_async().await;
    let courses = server
        .mock("GET", "/canvas/api/v1/courses")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([{"id": 1, "name": "Intro To X"}]).to_string())
        .expect(1)
        .create_async()
        .await;

    let out = output_dir();
    let config = AppConfig {
        base_url: parse_base_url(&format!("{}/canvas", server.url())).unwrap(),
        output_dir: out.path().to_path_buf(),
        ..Default::default()
    };
    let context = ScrapeContext::new(Arc::new(config), Some(TOKEN), Vec::new(), Arc::new(AtomicBool::new(false))).unwrap();

    assert_eq!(context.api.list_courses(&[]).await.unwrap().len(), 1);
    courses.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_course_discovery_rejects_non_array_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/courses")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"courses": "not a list"}"#)
        .create_async()
        .await;

    let out = output_dir();
    let context = context_for(&server, out.path(), false, &[]);
    let err = context.api.list_courses(&[]).await.unwrap_err();
    assert!(matches!(err, AppError::ApiParseFailed { .. }), "got {:?}", err);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_course_discovery_reports_unauthorized_envelope() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/courses")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"status":"unauthenticated","errors":[{"message":"Invalid access token."}]}"#)
        .create_async()
        .await;

    let out = output_dir();
    let context = context_for(&server, out.path(), false, &[]);
    let err = context.api.list_courses(&[]).await.unwrap_err();
    match err {
        AppError::Unauthorized { message, .. } => assert!(message.contains("Invalid access token")),
        other => panic!("expected Unauthorized, got {:?}", other),
    }
}

// --- Module traversal ---

#[tokio::test(flavor = "multi_thread")]
async fn test_modules_items_and_pages_are_downloaded() {
    let mut server = Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/api/v1/courses/1/modules")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([{"id": 10, "name": "Week 1", "items_url": format!("{url}/api/v1/courses/1/modules/10/items")}])
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/v1/courses/1/modules/10/items")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([
                {"id": 100, "title": "Slides", "type": "File", "url": format!("{url}/api/v1/courses/1/files/5")},
                {"id": 101, "title": "Reading", "type": "Page", "url": format!("{url}/api/v1/courses/1/pages/reading")},
                {"id": 102, "title": "Quiz", "type": "Quiz", "url": format!("{url}/api/v1/courses/1/quizzes/9")},
                {"id": 103, "title": "Heading", "type": "SubHeader"}
            ])
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/v1/courses/1/files/5")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({"id": 5, "display_name": "Week 1 Slides.pdf", "filename": "Week 1 Slides.pdf", "url": format!("{url}/files/5/download")})
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/v1/courses/1/pages/reading")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "title": "Reading",
                "body": format!(r#"<p>See <a class="instructure_file_link" href="{url}/courses/1/files/6?wrap=1" data-api-endpoint="{url}/api/v1/courses/1/files/6" data-api-returntype="File">notes</a> and <a data-api-endpoint="{url}/api/v1/courses/1/files/6">again</a></p>"#)
            })
            .to_string(),
        )
        .create_async()
        .await;
    let page_file = server
        .mock("GET", "/api/v1/courses/1/files/6")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({"id": 6, "display_name": "notes.txt", "filename": "notes.txt", "url": format!("{url}/files/6/download")})
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let quiz = server
        .mock("GET", "/api/v1/courses/1/quizzes/9")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    server
        .mock("GET", "/files/5/download")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("slides")
        .create_async()
        .await;
    server
        .mock("GET", "/files/6/download")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("notes")
        .create_async()
        .await;

    let out = output_dir();
    let context = context_for(&server, out.path(), false, &[]);
    CourseScraper::new(context.clone())
        .run(&course(1, "Intro To X"))
        .await
        .unwrap();

    let course_dir = out.path().join("IntroToX");
    assert_eq!(fs::read_to_string(course_dir.join("Week1Slides.pdf")).unwrap(), "slides");
    assert_eq!(fs::read_to_string(course_dir.join("notes.txt")).unwrap(), "notes");
    assert_eq!(entries_of(&course_dir), vec!["Week1Slides.pdf", "notes.txt"]);

    let stats = context.manager.get_stats();
    assert_eq!((stats.total, stats.success, stats.failed), (2, 2, 0));
    page_file.assert_async().await;
    quiz.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_no_modules_falls_back_to_course_files_once() {
    let mut server = Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/api/v1/courses/2/modules")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let files_listing = server
        .mock("GET", "/api/v1/courses/2/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([{"id": 7, "display_name": "Lab Sheet.pdf", "filename": "Lab Sheet.pdf", "url": format!("{url}/files/7/download")}])
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let download = server
        .mock("GET", "/files/7/download")
        .match_query(Matcher::Any)
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(200)
        .with_body("lab")
        .expect(1)
        .create_async()
        .await;

    let out = output_dir();
    let context = context_for(&server, out.path(), false, &[]);
    CourseScraper::new(context.clone())
        .run(&course(2, "Advanced Y"))
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("AdvancedY").join("LabSheet.pdf")).unwrap(),
        "lab"
    );
    files_listing.assert_async().await;
    download.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_course_without_files_is_skipped() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/courses/3/modules")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    server
        .mock("GET", "/api/v1/courses/3/files")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"status":"unauthorized","errors":[{"message":"user not authorized to perform that action"}]}"#)
        .create_async()
        .await;

    let out = output_dir();
    let context = context_for(&server, out.path(), false, &[]);
    CourseScraper::new(context.clone())
        .run(&course(3, "Locked Course"))
        .await
        .unwrap();

    assert_eq!(context.manager.get_stats().total, 0);
    let issues = context.manager.course_issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].0, "Locked Course");
    assert!(out.path().join("LockedCourse").is_dir());
    assert!(entries_of(&out.path().join("LockedCourse")).is_empty());
}

// --- Download decisions ---

async fn single_file_course(server: &mut ServerGuard, filename: &str, body: &str, expected_gets: usize) -> mockito::Mock {
    let url = server.url();
    server
        .mock("GET", "/api/v1/courses/4/modules")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    server
        .mock("GET", "/api/v1/courses/4/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([{"id": 8, "display_name": filename, "filename": filename, "url": format!("{url}/files/8/download")}])
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/files/8/download")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body)
        .expect(expected_gets)
        .create_async()
        .await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ignored_extension_is_never_fetched() {
    let mut server = Server::new_async().await;
    let download = single_file_course(&mut server, "notes.MP4", "video", 0).await;

    let out = output_dir();
    let context = context_for(&server, out.path(), false, &["mp4"]);
    CourseScraper::new(context.clone())
        .run(&course(4, "Media"))
        .await
        .unwrap();

    let stats = context.manager.get_stats();
    assert_eq!((stats.total, stats.skipped, stats.failed), (1, 1, 0));
    assert!(!out.path().join("Media").join("notes.MP4").exists());
    download.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_second_run_skips_existing_files() {
    let mut server = Server::new_async().await;
    let download = single_file_course(&mut server, "handout.pdf", "v1", 1).await;

    let out = output_dir();
    for _ in 0..2 {
        let context = context_for(&server, out.path(), false, &[]);
        CourseScraper::new(context)
            .run(&course(4, "Media"))
            .await
            .unwrap();
    }

    assert_eq!(
        fs::read_to_string(out.path().join("Media").join("handout.pdf")).unwrap(),
        "v1"
    );
    download.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_force_overwrites_existing_files() {
    let mut server = Server::new_async().await;
    let download = single_file_course(&mut server, "handout.pdf", "fresh", 1).await;

    let out = output_dir();
    let target_dir = out.path().join("Media");
    fs::create_dir_all(&target_dir).unwrap();
    fs::write(target_dir.join("handout.pdf"), "stale").unwrap();

    let context = context_for(&server, out.path(), true, &[]);
    CourseScraper::new(context.clone())
        .run(&course(4, "Media"))
        .await
        .unwrap();

    assert_eq!(fs::read_to_string(target_dir.join("handout.pdf")).unwrap(), "fresh");
    assert_eq!(context.manager.get_stats().success, 1);
    download.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_download_leaves_no_file_behind() {
    let mut server = Server::new_async().await;
    let url = server.url();
    server
        .mock("GET", "/api/v1/courses/5/modules")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    server
        .mock("GET", "/api/v1/courses/5/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([
                {"id": 11, "filename": "gone.pdf", "url": format!("{url}/files/11/download")},
                {"id": 12, "filename": "no-url.pdf"}
            ])
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/files/11/download")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let out = output_dir();
    let context = context_for(&server, out.path(), false, &[]);
    CourseScraper::new(context.clone())
        .run(&course(5, "Broken"))
        .await
        .unwrap();

    let stats = context.manager.get_stats();
    assert_eq!((stats.total, stats.success, stats.failed), (2, 0, 2));
    assert!(!context.manager.did_all_succeed());
    assert!(entries_of(&out.path().join("Broken")).is_empty());
}

async fn module_with_items(server: &mut ServerGuard, course_id: u64, items: serde_json::Value) {
    let url = server.url();
    server
        .mock("GET", format!("/api/v1/courses/{course_id}/modules").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([{"id": 1, "name": "Week 1", "items_url": format!("{url}/api/v1/courses/{course_id}/modules/1/items")}])
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", format!("/api/v1/courses/{course_id}/modules/1/items").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(items.to_string())
        .create_async()
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_file_items_are_not_saved() {
    let mut server = Server::new_async().await;
    let url = server.url();
    module_with_items(
        &mut server,
        6,
        json!([
            {"id": 1, "title": "Discuss", "type": "Discussion", "url": format!("{url}/api/v1/courses/6/discussion_topics/3")},
            {"id": 2, "title": "Essay", "type": "Assignment", "url": format!("{url}/api/v1/courses/6/assignments/4")}
        ]),
    )
    .await;
    server
        .mock("GET", "/api/v1/courses/6/discussion_topics/3")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({"id": 3, "title": "Discuss", "url": format!("{url}/api/v1/courses/6/discussion_topics/3")}).to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/v1/courses/6/assignments/4")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({"id": 4, "name": "Essay", "html_url": format!("{url}/courses/6/assignments/4")}).to_string())
        .create_async()
        .await;

    let out = output_dir();
    let context = context_for(&server, out.path(), false, &[]);
    CourseScraper::new(context.clone())
        .run(&course(6, "Forum"))
        .await
        .unwrap();

    assert_eq!(context.manager.get_stats().total, 0);
    assert!(context.manager.course_issues().is_empty());
    assert!(entries_of(&out.path().join("Forum")).is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_broken_page_link_does_not_lose_sibling_links() {
    let mut server = Server::new_async().await;
    let url = server.url();
    module_with_items(
        &mut server,
        7,
        json!([{"id": 1, "title": "Reading", "type": "Page", "url": format!("{url}/api/v1/courses/7/pages/reading")}]),
    )
    .await;
    server
        .mock("GET", "/api/v1/courses/7/pages/reading")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "title": "Reading",
                "body": format!(r#"<a data-api-endpoint="{url}/api/v1/courses/7/files/8">gone</a> <a data-api-endpoint="{url}/api/v1/courses/7/files/9">good</a>"#)
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/v1/courses/7/files/8")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"errors":[{"message":"The specified resource does not exist."}]}"#)
        .create_async()
        .await;
    let good_record = server
        .mock("GET", "/api/v1/courses/7/files/9")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({"id": 9, "filename": "good.pdf", "url": format!("{url}/files/9/download")}).to_string())
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/files/9/download")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("good")
        .create_async()
        .await;

    let out = output_dir();
    let context = context_for(&server, out.path(), false, &[]);
    CourseScraper::new(context.clone())
        .run(&course(7, "Readings"))
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("Readings").join("good.pdf")).unwrap(),
        "good"
    );
    let stats = context.manager.get_stats();
    assert_eq!((stats.total, stats.success), (1, 1));
    let issues = context.manager.course_issues();
    assert_eq!(issues.len(), 1);
    assert!(issues[0].0.ends_with("/api/v1/courses/7/files/8"), "got {:?}", issues);
    good_record.assert_async().await;
}

async fn course_with_files_listing(server: &mut ServerGuard, course_id: u64, status: usize, body: &str) {
    server
        .mock("GET", format!("/api/v1/courses/{course_id}/modules").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    server
        .mock("GET", format!("/api/v1/courses/{course_id}/files").as_str())
        .match_query(Matcher::Any)
        .with_status(status)
        .with_body(body)
        .expect(1)
        .create_async()
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_files_listing_is_reported_as_no_files() {
    let mut server = Server::new_async().await;
    course_with_files_listing(&mut server, 8, 200, "[]").await;

    let out = output_dir();
    let context = context_for(&server, out.path(), false, &[]);
    CourseScraper::new(context.clone())
        .run(&course(8, "Empty Course"))
        .await
        .unwrap();

    assert_eq!(context.manager.get_stats().total, 0);
    let issues = context.manager.course_issues();
    assert_eq!(issues, vec![("Empty Course".to_string(), "no files available".to_string())]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_envelope_with_ok_status_is_reported_as_no_files() {
    let mut server = Server::new_async().await;
    course_with_files_listing(
        &mut server,
        9,
        200,
        r#"{"status":"unauthorized","errors":[{"message":"user not authorized to perform that action"}]}"#,
    )
    .await;

    let out = output_dir();
    let context = context_for(&server, out.path(), false, &[]);
    CourseScraper::new(context.clone())
        .run(&course(9, "Hidden Files"))
        .await
        .unwrap();

    assert_eq!(context.manager.get_stats().total, 0);
    let issues = context.manager.course_issues();
    assert_eq!(issues, vec![("Hidden Files".to_string(), "no files available".to_string())]);
}
