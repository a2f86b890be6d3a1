use serde_json::json;

use crate::common::{TestApp, routes};

async fn create_pdf(app: &TestApp, token: &str, filename: &str, downloadable: bool) -> i64 {
    let res = app
        .post_with_token(
            routes::DOCUMENTS,
            &json!({
                "filename": filename,
                "downloadable": downloadable,
                "content_type": "application/pdf"
            }),
            token,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    res.body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn create_then_get_round_trip() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let id = create_pdf(&app, &token, "exam.pdf", true).await;

    let res = app.get_without_token(&routes::document(id)).await;
    assert_eq!(res.status, 200);
    assert_eq!(
        res.body,
        json!({
            "filename": "exam.pdf",
            "downloadable": true,
            "content_type": "application/pdf"
        })
    );
}

#[tokio::test]
async fn disallowed_content_type_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let res = app
        .post_with_token(
            routes::DOCUMENTS,
            &json!({
                "filename": "exam.html",
                "downloadable": true,
                "content_type": "text/html"
            }),
            &token,
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn insecure_filenames_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    for filename in ["../exam.pdf", "a/b.pdf", "", ".hidden", "exam\n.pdf"] {
        let res = app
            .post_with_token(
                routes::DOCUMENTS,
                &json!({
                    "filename": filename,
                    "downloadable": true,
                    "content_type": "application/pdf"
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 400, "filename {filename:?} was accepted");
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn upload_requires_the_declared_content_type_to_match() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let id = create_pdf(&app, &token, "exam.pdf", true).await;

    let res = app
        .upload(id, "application/pdf", b"%PDF-1.4 fake", &token)
        .await;
    assert_eq!(res.status, 204, "{}", res.text);

    let res = app.upload(id, "text/plain", b"not a pdf", &token).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn download_round_trips_bytes_and_headers() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let id = create_pdf(&app, &token, "exam.pdf", true).await;
    let payload = b"%PDF-1.4 round trip";
    let res = app.upload(id, "application/pdf", payload, &token).await;
    assert_eq!(res.status, 204);

    let res = app.download(id, None).await;
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/pdf"
    );
    let disposition = res
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment;"), "{disposition}");
    assert!(disposition.contains("exam.pdf"), "{disposition}");
    let etag = res
        .headers()
        .get("etag")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let bytes = res.bytes().await.unwrap();
    assert_eq!(&bytes[..], payload);

    // A matching If-None-Match answers 304 without a body.
    let res = app
        .client
        .get(format!(
            "http://{}{}",
            app.addr,
            routes::document_download(id)
        ))
        .header("If-None-Match", etag)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 304);
}

#[tokio::test]
async fn download_without_an_upload_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let id = create_pdf(&app, &token, "exam.pdf", true).await;

    let res = app.download(id, Some(&token)).await;
    assert_eq!(res.status().as_u16(), 404);
}

#[tokio::test]
async fn anonymous_visibility_follows_items_and_downloadable() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let on_hidden = create_pdf(&app, &token, "hidden.pdf", true).await;
    let on_shown = create_pdf(&app, &token, "shown.pdf", true).await;
    let unreferenced = create_pdf(&app, &token, "loose.pdf", true).await;
    let locked = create_pdf(&app, &token, "locked.pdf", false).await;

    app.post_with_token(
        routes::ITEMS,
        &json!({"name": "Hidden", "visible": false, "documents": [on_hidden]}),
        &token,
    )
    .await;
    app.post_with_token(
        routes::ITEMS,
        &json!({"name": "Shown", "visible": true, "documents": [on_shown]}),
        &token,
    )
    .await;

    let res = app.get_without_token(routes::DOCUMENTS).await;
    assert_eq!(res.status, 200);
    let listed = res.body.as_object().unwrap();
    assert!(listed.contains_key(&on_shown.to_string()));
    assert!(listed.contains_key(&unreferenced.to_string()));
    assert!(!listed.contains_key(&on_hidden.to_string()));
    assert!(!listed.contains_key(&locked.to_string()));

    // Hidden metadata answers 404 to anonymous callers, 200 to the
    // principal.
    let res = app.get_without_token(&routes::document(on_hidden)).await;
    assert_eq!(res.status, 404);
    let res = app.get_with_token(&routes::document(on_hidden), &token).await;
    assert_eq!(res.status, 200);
}

#[tokio::test]
async fn anonymous_download_is_gated_by_visibility() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let on_hidden = create_pdf(&app, &token, "hidden.pdf", true).await;
    let locked = create_pdf(&app, &token, "locked.pdf", false).await;
    app.upload(on_hidden, "application/pdf", b"hidden bytes", &token)
        .await;
    app.upload(locked, "application/pdf", b"locked bytes", &token)
        .await;

    app.post_with_token(
        routes::ITEMS,
        &json!({"name": "Hidden", "visible": false, "documents": [on_hidden]}),
        &token,
    )
    .await;

    // Anonymous callers are turned away without learning whether the
    // document exists.
    let res = app.download(on_hidden, None).await;
    assert_eq!(res.status().as_u16(), 404);
    let res = app.download(locked, None).await;
    assert_eq!(res.status().as_u16(), 404);

    // The principal bypasses visibility.
    let res = app.download(on_hidden, Some(&token)).await;
    assert_eq!(res.status().as_u16(), 200);
    let res = app.download(locked, Some(&token)).await;
    assert_eq!(res.status().as_u16(), 200);
}

#[tokio::test]
async fn reupload_replaces_the_payload() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let id = create_pdf(&app, &token, "exam.pdf", true).await;
    app.upload(id, "application/pdf", b"first", &token).await;
    app.upload(id, "application/pdf", b"second", &token).await;

    let res = app.download(id, Some(&token)).await;
    let bytes = res.bytes().await.unwrap();
    assert_eq!(&bytes[..], b"second");
}

#[tokio::test]
async fn delete_removes_metadata_and_payload() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let id = create_pdf(&app, &token, "exam.pdf", true).await;
    app.upload(id, "application/pdf", b"bytes", &token).await;

    let res = app.delete_with_token(&routes::document(id), &token).await;
    assert_eq!(res.status, 204);

    let res = app.get_with_token(&routes::document(id), &token).await;
    assert_eq!(res.status, 404);
    let res = app.download(id, Some(&token)).await;
    assert_eq!(res.status().as_u16(), 404);
}

#[tokio::test]
async fn deleting_a_document_without_an_upload_succeeds() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let id = create_pdf(&app, &token, "exam.pdf", true).await;
    let res = app.delete_with_token(&routes::document(id), &token).await;
    assert_eq!(res.status, 204);
}

#[tokio::test]
async fn upload_to_unknown_document_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let res = app.upload(999, "application/pdf", b"bytes", &token).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}
