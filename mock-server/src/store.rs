//! In-memory records backing the mock thesis service.

use std::collections::HashMap;

use serde_json::{json, Value};

/// Timestamp stamped on every record the mock creates.
pub const FIXED_TIME: &str = "2025-03-01T08:00:00Z";

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STUDENT: &str = "student";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_DEFENSE_BOARD: &str = "defense_board";
pub const ROLE_OFFICE: &str = "office";

const MAJOR_NAME: &str = "计算机科学与技术";

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub major_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Topic {
    pub topic_id: i64,
    pub major_id: i64,
    pub teacher_id: i64,
    pub topic_name: String,
    pub topic_description: String,
    pub topic_max_students: i32,
    pub topic_type: u8,
    pub topic_review_status: u8,
}

#[derive(Debug, Clone)]
pub struct AssignmentRecord {
    pub student_id: i64,
    pub topic_id: i64,
    pub request_time: String,
    pub status: u8,
}

#[derive(Debug, Clone)]
pub struct ProgressReport {
    pub prog_report_id: i64,
    pub topic_id: i64,
    pub student_id: i64,
    pub prog_report_type: u8,
    pub attachment: String,
    pub outcome: u8,
    pub comment: Option<String>,
    pub grade: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct FinalDefense {
    pub final_def_id: i64,
    pub topic_id: i64,
    pub student_id: i64,
    pub defense_board_id: Option<i64>,
    pub attachment: String,
    pub outcome: Option<bool>,
    pub comment: Option<String>,
    pub grade: Option<f64>,
}

pub const ASSIGNMENT_PENDING: u8 = 0;
pub const ASSIGNMENT_APPROVED: u8 = 1;
pub const ASSIGNMENT_REJECTED: u8 = 2;

#[derive(Debug)]
pub struct Store {
    pub users: Vec<User>,
    pub topics: Vec<Topic>,
    pub assignments: Vec<AssignmentRecord>,
    pub reports: Vec<ProgressReport>,
    pub defenses: Vec<FinalDefense>,
    pub sessions: HashMap<String, i64>,
    next_id: i64,
}

impl Store {
    /// One account per role, each with password `password`.
    pub fn seeded() -> Self {
        let seed = [
            (1, "admin", ROLE_ADMIN, "管理员"),
            (2, "t001", ROLE_TEACHER, "王老师"),
            (3, "s001", ROLE_STUDENT, "李同学"),
            (4, "office", ROLE_OFFICE, "教务处"),
            (5, "board", ROLE_DEFENSE_BOARD, "答辩组"),
        ];
        let users = seed
            .into_iter()
            .map(|(id, username, role, name)| User {
                id,
                username: username.to_string(),
                password: "password".to_string(),
                role: role.to_string(),
                name: Some(name.to_string()),
                avatar: None,
                major_id: Some(1),
            })
            .collect();

        Self {
            users,
            topics: Vec::new(),
            assignments: Vec::new(),
            reports: Vec::new(),
            defenses: Vec::new(),
            sessions: HashMap::new(),
            next_id: 100,
        }
    }

    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_session(&self, token: &str) -> Option<&User> {
        self.sessions.get(token).and_then(|id| self.user(*id))
    }

    pub fn topic(&self, id: i64) -> Option<&Topic> {
        self.topics.iter().find(|t| t.topic_id == id)
    }

    fn user_name(&self, id: i64) -> String {
        self.user(id)
            .and_then(|u| u.name.clone().or_else(|| Some(u.username.clone())))
            .unwrap_or_default()
    }

    fn topic_name(&self, id: i64) -> String {
        self.topic(id).map(|t| t.topic_name.clone()).unwrap_or_default()
    }

    pub fn approved_count(&self, topic_id: i64) -> i32 {
        self.assignments
            .iter()
            .filter(|a| a.topic_id == topic_id && a.status == ASSIGNMENT_APPROVED)
            .count() as i32
    }

    /// Topic the student has been approved for, if any.
    pub fn approved_topic_of(&self, student_id: i64) -> Option<i64> {
        self.assignments
            .iter()
            .find(|a| a.student_id == student_id && a.status == ASSIGNMENT_APPROVED)
            .map(|a| a.topic_id)
    }

    pub fn user_json(&self, user: &User) -> Value {
        json!({
            "id": user.id,
            "username": user.username,
            "role": user.role,
            "name": user.name,
            "avatar": user.avatar,
        })
    }

    pub fn topic_brief(&self, topic: &Topic) -> Value {
        json!({
            "topic_id": topic.topic_id,
            "teacher_name": self.user_name(topic.teacher_id),
            "topic_name": topic.topic_name,
            "topic_max_students": topic.topic_max_students,
            "topic_type": topic.topic_type,
            "current_student_count": self.approved_count(topic.topic_id),
        })
    }

    pub fn topic_details(&self, topic: &Topic) -> Value {
        json!({
            "topic_id": topic.topic_id,
            "major_id": topic.major_id,
            "major_name": MAJOR_NAME,
            "teacher_id": topic.teacher_id,
            "teacher_name": self.user_name(topic.teacher_id),
            "topic_name": topic.topic_name,
            "topic_description": topic.topic_description,
            "topic_max_students": topic.topic_max_students,
            "topic_type": topic.topic_type,
            "topic_review_status": topic.topic_review_status,
            "current_student_count": self.approved_count(topic.topic_id),
        })
    }

    pub fn assignment_json(&self, record: &AssignmentRecord) -> Value {
        json!({
            "student_id": record.student_id,
            "student_name": self.user_name(record.student_id),
            "student_major": MAJOR_NAME,
            "topic_id": record.topic_id,
            "topic_name": self.topic_name(record.topic_id),
            "request_time": record.request_time,
            "status": record.status,
        })
    }

    pub fn report_json(&self, report: &ProgressReport) -> Value {
        let mut value = json!({
            "prog_report_id": report.prog_report_id,
            "topic_id": report.topic_id,
            "student_id": report.student_id,
            "student_name": self.user_name(report.student_id),
            "prog_report_type": report.prog_report_type,
            "prog_report_time": FIXED_TIME,
            "prog_report_attachment": report.attachment,
            "prog_report_outcome": report.outcome,
        });
        if let Some(comment) = &report.comment {
            value["prog_report_comment"] = json!(comment);
        }
        if let Some(grade) = report.grade {
            value["prog_report_grade"] = json!(grade);
        }
        value
    }

    pub fn defense_json(&self, defense: &FinalDefense) -> Value {
        let mut value = json!({
            "final_def_id": defense.final_def_id,
            "topic_id": defense.topic_id,
            "topic_name": self.topic_name(defense.topic_id),
            "student_id": defense.student_id,
            "student_name": self.user_name(defense.student_id),
            "final_def_time": FIXED_TIME,
            "final_def_attachment": defense.attachment,
        });
        if let Some(board) = defense.defense_board_id {
            value["defense_board_id"] = json!(board);
        }
        if let Some(outcome) = defense.outcome {
            value["final_def_outcome"] = json!(outcome);
        }
        if let Some(comment) = &defense.comment {
            value["final_def_comment"] = json!(comment);
        }
        if let Some(grade) = defense.grade {
            value["final_def_grade"] = json!(grade);
        }
        value
    }
}
