use serde_json::json;

use crate::common::{TestApp, routes};

/// The end-to-end scenario from the product requirements: a hidden item
/// referencing a course stays invisible until its flag is flipped.
#[tokio::test]
async fn hidden_item_becomes_visible_after_patch() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let res = app
        .post_with_token(
            routes::COURSES,
            &json!({"long_name": "Rocket Science", "short_name": "RS"}),
            &token,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    let course_id = res.body["id"].as_i64().unwrap();

    let res = app
        .post_with_token(
            routes::ITEMS,
            &json!({
                "name": "Exam WS21",
                "date": "2021-12-03",
                "documents": [],
                "authors": [],
                "courses": [course_id],
                "folders": [],
                "visible": false
            }),
            &token,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    let item_id = res.body["id"].as_i64().unwrap();

    // Anonymous callers see an empty collection and get a 404 for the id.
    let res = app.get_without_token(routes::ITEMS).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({}));
    let res = app.get_without_token(&routes::item(item_id)).await;
    assert_eq!(res.status, 404);

    // The principal sees it all along.
    let res = app.get_with_token(&routes::item(item_id), &token).await;
    assert_eq!(res.status, 200);

    let res = app
        .patch_with_token(&routes::item(item_id), &json!({"visible": true}), &token)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let res = app.get_without_token(&routes::item(item_id)).await;
    assert_eq!(res.status, 200);
    assert_eq!(
        res.body,
        json!({
            "name": "Exam WS21",
            "date": "2021-12-03",
            "visible": true,
            "documents": [],
            "authors": [],
            "courses": [course_id],
            "folders": []
        })
    );
}

#[tokio::test]
async fn unknown_relation_ids_reject_the_whole_create() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let res = app
        .post_with_token(
            routes::ITEMS,
            &json!({"name": "Exam WS21", "visible": true, "authors": [999]}),
            &token,
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(
        res.body["message"]
            .as_str()
            .unwrap()
            .contains("authors contains unknown ids"),
        "{}",
        res.text
    );

    // Nothing was written.
    let res = app.get_with_token(routes::ITEMS, &token).await;
    assert_eq!(res.body, json!({}));
}

#[tokio::test]
async fn malformed_date_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let res = app
        .post_with_token(
            routes::ITEMS,
            &json!({"name": "Exam WS21", "date": "yesterday"}),
            &token,
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn patch_without_relations_keeps_them() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let res = app
        .post_with_token(routes::AUTHORS, &json!({"name": "A"}), &token)
        .await;
    let author_id = res.body["id"].as_i64().unwrap();

    let res = app
        .post_with_token(
            routes::ITEMS,
            &json!({"name": "Exam WS21", "visible": true, "authors": [author_id]}),
            &token,
        )
        .await;
    let item_id = res.body["id"].as_i64().unwrap();

    let res = app
        .patch_with_token(&routes::item(item_id), &json!({"name": "Exam WS21/22"}), &token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["name"], "Exam WS21/22");
    assert_eq!(res.body["authors"], json!([author_id]));
}

#[tokio::test]
async fn patch_with_relation_replaces_the_set() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let a = app
        .post_with_token(routes::AUTHORS, &json!({"name": "A"}), &token)
        .await
        .body["id"]
        .as_i64()
        .unwrap();
    let b = app
        .post_with_token(routes::AUTHORS, &json!({"name": "B"}), &token)
        .await
        .body["id"]
        .as_i64()
        .unwrap();

    let res = app
        .post_with_token(
            routes::ITEMS,
            &json!({"name": "Exam WS21", "visible": true, "authors": [a]}),
            &token,
        )
        .await;
    let item_id = res.body["id"].as_i64().unwrap();

    let res = app
        .patch_with_token(&routes::item(item_id), &json!({"authors": [b]}), &token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["authors"], json!([b]));

    let res = app
        .patch_with_token(&routes::item(item_id), &json!({"authors": []}), &token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["authors"], json!([]));
}

#[tokio::test]
async fn patch_can_clear_the_date() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let res = app
        .post_with_token(
            routes::ITEMS,
            &json!({"name": "Exam WS21", "date": "2021-12-03", "visible": true}),
            &token,
        )
        .await;
    let item_id = res.body["id"].as_i64().unwrap();

    let res = app
        .patch_with_token(&routes::item(item_id), &json!({"date": null}), &token)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["date"], json!(null));
}

#[tokio::test]
async fn deleting_an_item_leaves_referenced_entities() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let course_id = app
        .post_with_token(
            routes::COURSES,
            &json!({"long_name": "Rocket Science", "short_name": "RS"}),
            &token,
        )
        .await
        .body["id"]
        .as_i64()
        .unwrap();

    let item_id = app
        .post_with_token(
            routes::ITEMS,
            &json!({"name": "Exam WS21", "visible": true, "courses": [course_id]}),
            &token,
        )
        .await
        .body["id"]
        .as_i64()
        .unwrap();

    let res = app.delete_with_token(&routes::item(item_id), &token).await;
    assert_eq!(res.status, 204);

    let res = app.get_without_token(&routes::item(item_id)).await;
    assert_eq!(res.status, 404);

    let res = app.get_without_token(&routes::course(course_id)).await;
    assert_eq!(res.status, 200);
}

#[tokio::test]
async fn deleting_a_course_removes_it_from_items() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let course_id = app
        .post_with_token(
            routes::COURSES,
            &json!({"long_name": "Rocket Science", "short_name": "RS"}),
            &token,
        )
        .await
        .body["id"]
        .as_i64()
        .unwrap();

    let item_id = app
        .post_with_token(
            routes::ITEMS,
            &json!({"name": "Exam WS21", "visible": true, "courses": [course_id]}),
            &token,
        )
        .await
        .body["id"]
        .as_i64()
        .unwrap();

    let res = app
        .delete_with_token(&routes::course(course_id), &token)
        .await;
    assert_eq!(res.status, 204);

    let res = app.get_without_token(&routes::item(item_id)).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["courses"], json!([]));
}
