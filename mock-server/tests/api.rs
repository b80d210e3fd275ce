use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{json, Value};
use tower::{Service, ServiceExt};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(http::header::COOKIE, cookie);
    }
    builder.body(body.to_string()).unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(http::header::COOKIE, cookie);
    }
    builder.body(String::new()).unwrap()
}

/// Send one request through a long-lived router so state persists.
async fn send(app: &mut axum::routing::RouterIntoService<String>, req: Request<String>) -> axum::response::Response {
    ServiceExt::ready(app).await.unwrap().call(req).await.unwrap()
}

async fn login(app: &mut axum::routing::RouterIntoService<String>, username: &str) -> String {
    let resp = send(
        app,
        json_request(
            "POST",
            "/login",
            None,
            &json!({"username": username, "password": "password"}).to_string(),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp.headers()[http::header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

// --- ping ---

#[tokio::test]
async fn ping_returns_pong() {
    let resp = app().oneshot(get_request("/ping", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"message": "pong"}));
}

// --- session ---

#[tokio::test]
async fn login_with_wrong_password_returns_401_detail() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/login",
            None,
            r#"{"username":"s001","password":"nope"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(resp).await,
        json!({"detail": "认证失败，用户名或密码错误"})
    );
}

#[tokio::test]
async fn login_with_missing_field_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/login", None, r#"{"username":"s001"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn user_requires_session() {
    let resp = app().oneshot(get_request("/user", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({"detail": "未登录"}));
}

#[tokio::test]
async fn logout_ends_session() {
    let mut app = app().into_service();
    let cookie = login(&mut app, "s001").await;

    let resp = send(&mut app, get_request("/user", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let user = body_json(resp).await;
    assert_eq!(user["username"], "s001");
    assert_eq!(user["role"], "student");

    let resp = send(&mut app, json_request("POST", "/logout", Some(&cookie), "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());

    let resp = send(&mut app, get_request("/user", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- topics ---

#[tokio::test]
async fn missing_topic_returns_404_detail() {
    let mut app = app().into_service();
    let cookie = login(&mut app, "t001").await;
    let resp = send(&mut app, get_request("/topics/999", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, json!({"detail": "未找到指定课题"}));
}

#[tokio::test]
async fn student_cannot_create_topic() {
    let mut app = app().into_service();
    let cookie = login(&mut app, "s001").await;
    let body = json!({
        "major_id": 1,
        "topic_name": "NLP",
        "topic_description": "d",
        "topic_max_students": 1,
        "topic_type": 0
    });
    let resp = send(&mut app, json_request("POST", "/topics", Some(&cookie), &body.to_string())).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn search_filters_by_keyword_and_paginates() {
    let mut app = app().into_service();
    let cookie = login(&mut app, "t001").await;
    for name in ["NLP parsing", "Compilers", "NLP summarization"] {
        let body = json!({
            "major_id": 1,
            "topic_name": name,
            "topic_description": "d",
            "topic_max_students": 2,
            "topic_type": 1
        });
        let resp = send(&mut app, json_request("POST", "/topics", Some(&cookie), &body.to_string())).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = send(
        &mut app,
        get_request("/topics/search?keyword=NLP&page=2&page_size=1", Some(&cookie)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["total"], 2);
    assert_eq!(page["page"], 2);
    assert_eq!(page["topics"].as_array().unwrap().len(), 1);
    assert_eq!(page["topics"][0]["topic_name"], "NLP summarization");

    let resp = send(&mut app, get_request("/topics", Some(&cookie))).await;
    assert_eq!(body_json(resp).await["total"], 3);
}

// --- assignments ---

#[tokio::test]
async fn assignment_lifecycle() {
    let mut app = app().into_service();
    let teacher = login(&mut app, "t001").await;
    let student = login(&mut app, "s001").await;

    let body = json!({
        "major_id": 1,
        "topic_name": "Compilers",
        "topic_description": "d",
        "topic_max_students": 1,
        "topic_type": 3
    });
    let resp = send(&mut app, json_request("POST", "/topics", Some(&teacher), &body.to_string())).await;
    let topic_id = body_json(resp).await["topic_id"].as_i64().unwrap();

    let apply = json!({"topic_id": topic_id}).to_string();
    let resp = send(&mut app, json_request("POST", "/assignments", Some(&student), &apply)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // applying twice conflicts
    let resp = send(&mut app, json_request("POST", "/assignments", Some(&student), &apply)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = send(
        &mut app,
        json_request(
            "PATCH",
            &format!("/assignments/3/{topic_id}"),
            Some(&teacher),
            r#"{"approved":true}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&mut app, get_request("/assignments", Some(&student))).await;
    let page = body_json(resp).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["assignments"][0]["status"], 1);

    let resp = send(&mut app, get_request(&format!("/topics/{topic_id}"), Some(&student))).await;
    assert_eq!(body_json(resp).await["current_student_count"], 1);
}

#[tokio::test]
async fn patch_unknown_assignment_returns_404() {
    let mut app = app().into_service();
    let teacher = login(&mut app, "t001").await;
    let resp = send(
        &mut app,
        json_request("PATCH", "/assignments/3/12345", Some(&teacher), r#"{"approved":false}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- progress reports & defenses ---

#[tokio::test]
async fn progress_reports_accept_no_attachment_subroute() {
    let resp = app()
        .oneshot(json_request("POST", "/progress_reports/attachment", None, "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn report_requires_approved_topic() {
    let mut app = app().into_service();
    let student = login(&mut app, "s001").await;
    let resp = send(
        &mut app,
        json_request("POST", "/progress_reports", Some(&student), r#"{"attachment":"a.pdf"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = send(&mut app, get_request("/progress_reports", Some(&student))).await;
    assert_eq!(body_json(resp).await, json!({"reports": []}));
}

#[tokio::test]
async fn defense_list_empty_for_fresh_student() {
    let mut app = app().into_service();
    let student = login(&mut app, "s001").await;
    let resp = send(&mut app, get_request("/final_defenses", Some(&student))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"defenses": []}));
}
