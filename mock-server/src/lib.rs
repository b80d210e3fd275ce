//! In-memory imitation of the thesis management service.
//!
//! Speaks the same paths, JSON shapes and `{"detail": ...}` error bodies as
//! the real service, closely enough for end-to-end client tests. Sessions are
//! an opaque `session` cookie handed out by `/login`.

pub mod store;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

use store::*;

pub type Db = Arc<RwLock<Store>>;

/// Error reply in the service's `{"detail": ...}` shape.
#[derive(Debug)]
pub struct MockError {
    status: StatusCode,
    detail: &'static str,
}

impl MockError {
    fn new(status: StatusCode, detail: &'static str) -> Self {
        Self { status, detail }
    }

    fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "未登录")
    }

    fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "权限不足")
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

type MockResult<T> = Result<T, MockError>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/ping", get(ping))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/user", get(get_user).patch(update_user).post(create_user))
        .route("/topics", get(list_topics).post(create_topic))
        .route("/topics/search", get(search_topics))
        .route("/topics/{id}", get(get_topic).patch(update_topic))
        .route("/assignments", get(list_assignments).post(create_assignment))
        .route("/assignments/{student_id}/{topic_id}", patch(update_assignment))
        .route("/progress_reports", get(list_reports).post(create_report))
        .route("/progress_reports/{id}", patch(update_report))
        .route("/final_defenses", get(list_defenses).post(create_defense))
        .route("/final_defenses/{id}", patch(update_defense))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| pair.trim().strip_prefix("session="))
        .map(str::to_string)
}

fn authed(store: &Store, headers: &HeaderMap) -> MockResult<User> {
    session_token(headers)
        .and_then(|token| store.user_by_session(&token).cloned())
        .ok_or_else(MockError::unauthorized)
}

fn require_role(user: &User, roles: &[&str]) -> MockResult<()> {
    if roles.contains(&user.role.as_str()) {
        Ok(())
    } else {
        Err(MockError::forbidden())
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub keyword: Option<String>,
}

fn paginate(items: Vec<Value>, query: &PageQuery) -> (usize, u32, u32, Vec<Value>) {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(10).max(1);
    let total = items.len();
    let rows = items
        .into_iter()
        .skip(((page - 1) * page_size) as usize)
        .take(page_size as usize)
        .collect();
    (total, page, page_size, rows)
}

// --- ping & session ---

async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<LoginInput>,
) -> MockResult<impl IntoResponse> {
    let mut store = db.write().await;
    let user_id = store
        .users
        .iter()
        .find(|u| u.username == input.username && u.password == input.password)
        .map(|u| u.id)
        .ok_or(MockError::new(StatusCode::UNAUTHORIZED, "认证失败，用户名或密码错误"))?;

    let token = Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), user_id);
    tracing::debug!(user_id, "session opened");
    Ok((
        StatusCode::OK,
        [(SET_COOKIE, format!("session={token}; Path=/; HttpOnly"))],
    ))
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> MockResult<StatusCode> {
    let mut store = db.write().await;
    let token = session_token(&headers).ok_or_else(MockError::unauthorized)?;
    store
        .sessions
        .remove(&token)
        .map(|_| StatusCode::OK)
        .ok_or_else(MockError::unauthorized)
}

// --- user ---

async fn get_user(State(db): State<Db>, headers: HeaderMap) -> MockResult<Json<Value>> {
    let store = db.read().await;
    let user = authed(&store, &headers)?;
    Ok(Json(store.user_json(&user)))
}

#[derive(Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

async fn update_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<UserPatch>,
) -> MockResult<StatusCode> {
    let mut store = db.write().await;
    let id = authed(&store, &headers)?.id;
    let user = store
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(MockError::unauthorized)?;
    if let Some(name) = input.name {
        user.name = Some(name);
    }
    if let Some(password) = input.password {
        user.password = password;
    }
    if let Some(avatar) = input.avatar {
        user.avatar = Some(avatar);
    }
    Ok(StatusCode::OK)
}

#[derive(Deserialize)]
pub struct UserPost {
    pub username: String,
    pub password: String,
    pub role: String,
    pub name: Option<String>,
    pub major_id: Option<i64>,
    pub avatar: Option<String>,
}

async fn create_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<UserPost>,
) -> MockResult<Json<Value>> {
    let mut store = db.write().await;
    let caller = authed(&store, &headers)?;
    require_role(&caller, &[ROLE_ADMIN])?;
    if store.users.iter().any(|u| u.username == input.username) {
        return Err(MockError::new(StatusCode::CONFLICT, "用户创建失败，同名用户已存在"));
    }
    let user = User {
        id: store.next_id(),
        username: input.username,
        password: input.password,
        role: input.role,
        name: input.name,
        avatar: input.avatar,
        major_id: input.major_id,
    };
    let body = store.user_json(&user);
    store.users.push(user);
    Ok(Json(body))
}

// --- topics ---

fn topic_page(store: &Store, query: &PageQuery) -> Value {
    let keyword = query.keyword.as_deref().unwrap_or("");
    let rows: Vec<Value> = store
        .topics
        .iter()
        .filter(|t| keyword.is_empty() || t.topic_name.contains(keyword))
        .map(|t| store.topic_brief(t))
        .collect();
    let (total, page, page_size, topics) = paginate(rows, query);
    json!({ "total": total, "page": page, "page_size": page_size, "topics": topics })
}

async fn list_topics(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> MockResult<Json<Value>> {
    let store = db.read().await;
    authed(&store, &headers)?;
    let query = PageQuery { keyword: None, ..query };
    Ok(Json(topic_page(&store, &query)))
}

async fn search_topics(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> MockResult<Json<Value>> {
    let store = db.read().await;
    authed(&store, &headers)?;
    Ok(Json(topic_page(&store, &query)))
}

async fn get_topic(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> MockResult<Json<Value>> {
    let store = db.read().await;
    authed(&store, &headers)?;
    let topic = store
        .topic(id)
        .ok_or(MockError::new(StatusCode::NOT_FOUND, "未找到指定课题"))?;
    Ok(Json(store.topic_details(topic)))
}

#[derive(Deserialize)]
pub struct TopicPost {
    pub major_id: i64,
    pub topic_name: String,
    pub topic_description: String,
    pub topic_max_students: i32,
    pub topic_type: u8,
}

async fn create_topic(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<TopicPost>,
) -> MockResult<Json<Value>> {
    let mut store = db.write().await;
    let caller = authed(&store, &headers)?;
    require_role(&caller, &[ROLE_TEACHER, ROLE_ADMIN])?;
    let topic_id = store.next_id();
    store.topics.push(Topic {
        topic_id,
        major_id: input.major_id,
        teacher_id: caller.id,
        topic_name: input.topic_name,
        topic_description: input.topic_description,
        topic_max_students: input.topic_max_students,
        topic_type: input.topic_type,
        topic_review_status: 0,
    });
    Ok(Json(json!({ "topic_id": topic_id })))
}

#[derive(Deserialize)]
pub struct TopicPatch {
    pub topic_name: Option<String>,
    pub topic_description: Option<String>,
    pub topic_max_students: Option<i32>,
    pub topic_type: Option<u8>,
    pub topic_review_status: Option<u8>,
}

async fn update_topic(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<TopicPatch>,
) -> MockResult<Json<Value>> {
    let mut store = db.write().await;
    let caller = authed(&store, &headers)?;
    require_role(&caller, &[ROLE_TEACHER, ROLE_OFFICE, ROLE_ADMIN])?;
    let topic = store
        .topics
        .iter_mut()
        .find(|t| t.topic_id == id)
        .ok_or(MockError::new(StatusCode::NOT_FOUND, "未找到指定课题"))?;
    if let Some(name) = input.topic_name {
        topic.topic_name = name;
    }
    if let Some(description) = input.topic_description {
        topic.topic_description = description;
    }
    if let Some(max) = input.topic_max_students {
        topic.topic_max_students = max;
    }
    if let Some(kind) = input.topic_type {
        topic.topic_type = kind;
    }
    if let Some(status) = input.topic_review_status {
        topic.topic_review_status = status;
    }
    let topic = topic.clone();
    Ok(Json(store.topic_details(&topic)))
}

// --- assignments ---

async fn list_assignments(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> MockResult<Json<Value>> {
    let store = db.read().await;
    let caller = authed(&store, &headers)?;
    let rows: Vec<Value> = store
        .assignments
        .iter()
        .filter(|a| caller.role != ROLE_STUDENT || a.student_id == caller.id)
        .map(|a| store.assignment_json(a))
        .collect();
    let (total, page, page_size, assignments) = paginate(rows, &query);
    Ok(Json(json!({
        "total": total,
        "page": page,
        "page_size": page_size,
        "assignments": assignments,
    })))
}

#[derive(Deserialize)]
pub struct AssignmentPost {
    pub topic_id: i64,
}

async fn create_assignment(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<AssignmentPost>,
) -> MockResult<StatusCode> {
    let mut store = db.write().await;
    let caller = authed(&store, &headers)?;
    require_role(&caller, &[ROLE_STUDENT])?;
    let topic = store
        .topic(input.topic_id)
        .ok_or(MockError::new(StatusCode::NOT_FOUND, "未找到指定课题"))?;
    let full = store.approved_count(topic.topic_id) >= topic.topic_max_students;
    let duplicate = store
        .assignments
        .iter()
        .any(|a| a.student_id == caller.id && a.topic_id == input.topic_id);
    if full || duplicate {
        return Err(MockError::new(
            StatusCode::CONFLICT,
            "选题申请失败，课题已满或已存在申请记录",
        ));
    }
    store.assignments.push(AssignmentRecord {
        student_id: caller.id,
        topic_id: input.topic_id,
        request_time: FIXED_TIME.to_string(),
        status: ASSIGNMENT_PENDING,
    });
    Ok(StatusCode::CREATED)
}

#[derive(Deserialize)]
pub struct AssignmentPatch {
    pub approved: bool,
}

async fn update_assignment(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((student_id, topic_id)): Path<(i64, i64)>,
    Json(input): Json<AssignmentPatch>,
) -> MockResult<StatusCode> {
    let mut store = db.write().await;
    let caller = authed(&store, &headers)?;
    require_role(&caller, &[ROLE_TEACHER, ROLE_ADMIN])?;

    let conflict = input.approved
        && (store.approved_topic_of(student_id).is_some()
            || store
                .topic(topic_id)
                .is_some_and(|t| store.approved_count(topic_id) >= t.topic_max_students));

    let record = store
        .assignments
        .iter_mut()
        .find(|a| a.student_id == student_id && a.topic_id == topic_id)
        .ok_or(MockError::new(StatusCode::NOT_FOUND, "未找到指定选题申请或学生"))?;
    if conflict {
        return Err(MockError::new(
            StatusCode::CONFLICT,
            "选题申请状态更新失败，学生已有课题或名额已满",
        ));
    }
    record.status = if input.approved {
        ASSIGNMENT_APPROVED
    } else {
        ASSIGNMENT_REJECTED
    };
    Ok(StatusCode::OK)
}

// --- progress reports ---

async fn list_reports(State(db): State<Db>, headers: HeaderMap) -> MockResult<Json<Value>> {
    let store = db.read().await;
    let caller = authed(&store, &headers)?;
    let reports: Vec<Value> = store
        .reports
        .iter()
        .filter(|r| caller.role != ROLE_STUDENT || r.student_id == caller.id)
        .map(|r| store.report_json(r))
        .collect();
    Ok(Json(json!({ "reports": reports })))
}

#[derive(Deserialize)]
pub struct AttachmentPost {
    pub attachment: String,
}

async fn create_report(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<AttachmentPost>,
) -> MockResult<StatusCode> {
    let mut store = db.write().await;
    let caller = authed(&store, &headers)?;
    require_role(&caller, &[ROLE_STUDENT])?;
    let topic_id = store.approved_topic_of(caller.id).ok_or(MockError::new(
        StatusCode::CONFLICT,
        "进展更新失败，状态存在冲突",
    ))?;
    let previous = store.reports.iter().filter(|r| r.student_id == caller.id).count();
    let prog_report_id = store.next_id();
    store.reports.push(ProgressReport {
        prog_report_id,
        topic_id,
        student_id: caller.id,
        prog_report_type: if previous == 0 { 0 } else { 1 },
        attachment: input.attachment,
        outcome: 0,
        comment: None,
        grade: None,
    });
    Ok(StatusCode::CREATED)
}

#[derive(Deserialize)]
pub struct ReportPatch {
    pub outcome: u8,
    pub comment: Option<String>,
    pub grade: Option<f64>,
}

async fn update_report(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<ReportPatch>,
) -> MockResult<Json<Value>> {
    let mut store = db.write().await;
    let caller = authed(&store, &headers)?;
    require_role(&caller, &[ROLE_TEACHER, ROLE_ADMIN])?;
    let report = store
        .reports
        .iter_mut()
        .find(|r| r.prog_report_id == id)
        .ok_or(MockError::new(StatusCode::NOT_FOUND, "未找到指定进展"))?;
    report.outcome = input.outcome;
    report.comment = input.comment;
    report.grade = input.grade;
    let report = report.clone();
    Ok(Json(store.report_json(&report)))
}

// --- final defenses ---

async fn list_defenses(State(db): State<Db>, headers: HeaderMap) -> MockResult<Json<Value>> {
    let store = db.read().await;
    let caller = authed(&store, &headers)?;
    let defenses: Vec<Value> = store
        .defenses
        .iter()
        .filter(|d| caller.role != ROLE_STUDENT || d.student_id == caller.id)
        .map(|d| store.defense_json(d))
        .collect();
    Ok(Json(json!({ "defenses": defenses })))
}

async fn create_defense(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<AttachmentPost>,
) -> MockResult<StatusCode> {
    let mut store = db.write().await;
    let caller = authed(&store, &headers)?;
    require_role(&caller, &[ROLE_STUDENT])?;
    let conflict = || {
        MockError::new(
            StatusCode::CONFLICT,
            "结项答辩申请提交失败，状态存在冲突",
        )
    };
    let topic_id = store.approved_topic_of(caller.id).ok_or_else(conflict)?;
    if store.defenses.iter().any(|d| d.student_id == caller.id) {
        return Err(conflict());
    }
    let final_def_id = store.next_id();
    store.defenses.push(FinalDefense {
        final_def_id,
        topic_id,
        student_id: caller.id,
        defense_board_id: None,
        attachment: input.attachment,
        outcome: None,
        comment: None,
        grade: None,
    });
    Ok(StatusCode::CREATED)
}

/// Teachers approve the application; the defense board records the verdict.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum DefensePatch {
    Board {
        outcome: bool,
        comment: String,
        grade: f64,
    },
    Teacher {
        approved: bool,
    },
}

async fn update_defense(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<DefensePatch>,
) -> MockResult<Json<Value>> {
    let mut store = db.write().await;
    let caller = authed(&store, &headers)?;
    let board_id = store
        .users
        .iter()
        .find(|u| u.role == ROLE_DEFENSE_BOARD)
        .map(|u| u.id);
    let defense = store
        .defenses
        .iter_mut()
        .find(|d| d.final_def_id == id)
        .ok_or(MockError::new(StatusCode::NOT_FOUND, "未找到指定结项答辩进展"))?;

    match input {
        DefensePatch::Teacher { approved } => {
            require_role(&caller, &[ROLE_TEACHER, ROLE_ADMIN])?;
            if approved {
                defense.defense_board_id = board_id;
            } else {
                defense.outcome = Some(false);
            }
        }
        DefensePatch::Board {
            outcome,
            comment,
            grade,
        } => {
            require_role(&caller, &[ROLE_DEFENSE_BOARD, ROLE_ADMIN])?;
            if defense.defense_board_id.is_none() {
                return Err(MockError::new(
                    StatusCode::CONFLICT,
                    "结项答辩进展更新失败，状态存在冲突",
                ));
            }
            defense.outcome = Some(outcome);
            defense.comment = Some(comment);
            defense.grade = Some(grade);
        }
    }
    let defense = defense.clone();
    Ok(Json(store.defense_json(&defense)))
}
