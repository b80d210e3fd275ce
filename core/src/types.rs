//! Wire DTOs for the thesis management API.
//!
//! # Design
//! Field names match the JSON the service speaks. Optional fields are
//! skipped when serializing so partial updates only send what the caller
//! set. The mock-server crate defines its own copies of these shapes; the
//! end-to-end tests catch drift between the two.
//!
//! Status-like enumerations travel as small integers. Decoding an integer
//! outside the known range fails instead of producing a placeholder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An integer that does not name any variant of a coded enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: u8,
}

macro_rules! coded_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        #[repr(u8)]
        pub enum $name {
            $($variant = $code),+
        }

        impl $name {
            /// Every variant in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> u8 {
                self as u8
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = UnknownCode;

            fn try_from(code: u8) -> Result<Self, UnknownCode> {
                match code {
                    $($code => Ok($name::$variant),)+
                    _ => Err(UnknownCode { kind: stringify!($name), code }),
                }
            }
        }
    };
}

coded_enum!(
    /// Category of a thesis topic.
    TopicType {
        Theoretical = 0,
        Application = 1,
        Experimental = 2,
        Engineering = 3,
        Other = 4,
    }
);

coded_enum!(
    /// Office review state of a topic.
    TopicReviewStatus {
        Pending = 0,
        Approved = 1,
        Rejected = 2,
    }
);

coded_enum!(
    /// State of a student's request to take a topic.
    AssignmentStatus {
        Pending = 0,
        Approved = 1,
        Rejected = 2,
    }
);

coded_enum!(
    ProgressReportType {
        Proposal = 0,
        MidTerm = 1,
    }
);

coded_enum!(
    /// Teacher's verdict on a progress report.
    ProgressOutcome {
        Undecided = 0,
        Passed = 1,
        Returned = 2,
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Student,
    Teacher,
    DefenseBoard,
    Office,
}

// ---------------------------------------------------------------------------
// Ping
// ---------------------------------------------------------------------------

/// Liveness reply. Servers answer either `{"message": "pong"}` or a bare
/// JSON string; both decode to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PingWire")]
pub struct PingResponse {
    pub message: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PingWire {
    Object { message: String },
    Bare(String),
}

impl From<PingWire> for PingResponse {
    fn from(wire: PingWire) -> Self {
        match wire {
            PingWire::Object { message } | PingWire::Bare(message) => Self { message },
        }
    }
}

// ---------------------------------------------------------------------------
// Auth & user
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGetResponse {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Partial update of the current user. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPostRequest {
    pub username: String,
    pub password: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

/// Row of a topic listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicBrief {
    pub topic_id: i64,
    pub teacher_name: String,
    pub topic_name: String,
    pub topic_max_students: i32,
    pub topic_type: TopicType,
    pub current_student_count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDetails {
    pub topic_id: i64,
    pub major_id: i64,
    pub major_name: String,
    pub teacher_id: i64,
    pub teacher_name: String,
    pub topic_name: String,
    pub topic_description: String,
    pub topic_max_students: i32,
    pub topic_type: TopicType,
    pub topic_review_status: TopicReviewStatus,
    pub current_student_count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicsGetResponse {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub topics: Vec<TopicBrief>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicsPostRequest {
    pub major_id: i64,
    pub topic_name: String,
    pub topic_description: String,
    pub topic_max_students: i32,
    pub topic_type: TopicType,
}

/// Fields a teacher may change on their own topic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicTeacherPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_max_students: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_type: Option<TopicType>,
}

/// The office only rules on the review status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicOfficePatch {
    pub topic_review_status: TopicReviewStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicAdminPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_max_students: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_type: Option<TopicType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_review_status: Option<TopicReviewStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCreateResponse {
    pub topic_id: i64,
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub student_id: i64,
    pub student_name: String,
    pub student_major: String,
    pub topic_id: i64,
    pub topic_name: String,
    pub request_time: String,
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentsGetResponse {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentsPostRequest {
    pub topic_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRecordPatchRequest {
    pub approved: bool,
}

// ---------------------------------------------------------------------------
// Progress reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReportDetails {
    pub prog_report_id: i64,
    pub topic_id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub prog_report_type: ProgressReportType,
    pub prog_report_time: String,
    pub prog_report_attachment: String,
    pub prog_report_outcome: ProgressOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prog_report_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prog_report_grade: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReportsGetResponse {
    pub reports: Vec<ProgressReportDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReportsPostRequest {
    pub attachment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReportRecordPatchRequest {
    pub outcome: ProgressOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<f64>,
}

// ---------------------------------------------------------------------------
// Final defenses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDefenseDetails {
    pub final_def_id: i64,
    pub topic_id: i64,
    pub topic_name: String,
    pub student_id: i64,
    pub student_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense_board_id: Option<i64>,
    pub final_def_time: String,
    pub final_def_attachment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_def_outcome: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_def_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_def_grade: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDefensesGetResponse {
    pub defenses: Vec<FinalDefenseDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalDefensesPostRequest {
    pub attachment: String,
}

/// The supervising teacher approves or rejects the defense application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalDefenseTeacherPatch {
    pub approved: bool,
}

/// The defense board records the verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalDefenseBoardPatch {
    pub outcome: bool,
    pub comment: String,
    pub grade: f64,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Page selection for listing endpoints. Unset fields are left to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// Query pairs for the fields that are set, `page` first.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("page_size".to_string(), page_size.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coded_enums_travel_as_integers() {
        assert_eq!(serde_json::to_value(TopicType::Engineering).unwrap(), json!(3));
        let status: TopicReviewStatus = serde_json::from_value(json!(2)).unwrap();
        assert_eq!(status, TopicReviewStatus::Rejected);
    }

    #[test]
    fn out_of_range_code_is_rejected() {
        let result: Result<TopicType, _> = serde_json::from_value(json!(5));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown TopicType code 5"), "{err}");
        assert_eq!(
            ProgressReportType::try_from(2u8),
            Err(UnknownCode { kind: "ProgressReportType", code: 2 })
        );
    }

    #[test]
    fn all_lists_variants_in_code_order() {
        let codes: Vec<u8> = TopicType::ALL.iter().map(|t| t.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4]);
        assert_eq!(AssignmentStatus::ALL.len(), 3);
    }

    #[test]
    fn user_role_is_snake_case() {
        assert_eq!(serde_json::to_value(UserRole::DefenseBoard).unwrap(), json!("defense_board"));
        let role: UserRole = serde_json::from_value(json!("office")).unwrap();
        assert_eq!(role, UserRole::Office);
    }

    #[test]
    fn user_response_tolerates_missing_optionals() {
        let user: UserGetResponse =
            serde_json::from_value(json!({"id": 3, "username": "s001", "role": "student"})).unwrap();
        assert_eq!(user.name, None);
        assert_eq!(user.avatar, None);
    }

    #[test]
    fn teacher_patch_only_sends_set_fields() {
        let patch = TopicTeacherPatch {
            topic_max_students: Some(4),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"topic_max_students": 4}));
    }

    #[test]
    fn progress_patch_omits_missing_comment_and_grade() {
        let patch = ProgressReportRecordPatchRequest {
            outcome: ProgressOutcome::Passed,
            comment: None,
            grade: None,
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"outcome": 1}));
    }

    #[test]
    fn pagination_query_skips_unset_fields() {
        assert!(Pagination::default().to_query().is_empty());
        let only_size = Pagination {
            page: None,
            page_size: Some(20),
        };
        assert_eq!(
            only_size.to_query(),
            vec![("page_size".to_string(), "20".to_string())]
        );
        assert_eq!(
            Pagination::new(2, 10).to_query(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "10".to_string())
            ]
        );
    }

    #[test]
    fn final_defense_details_decodes_pending_record() {
        let details: FinalDefenseDetails = serde_json::from_value(json!({
            "final_def_id": 1,
            "topic_id": 2,
            "topic_name": "Compilers",
            "student_id": 3,
            "student_name": "Li",
            "final_def_time": "2025-05-01T10:00:00Z",
            "final_def_attachment": "thesis.pdf"
        }))
        .unwrap();
        assert_eq!(details.defense_board_id, None);
        assert_eq!(details.final_def_outcome, None);
    }

    #[test]
    fn ping_accepts_object_or_bare_string() {
        let object: PingResponse = serde_json::from_value(json!({"message": "pong"})).unwrap();
        let bare: PingResponse = serde_json::from_value(json!("pong")).unwrap();
        assert_eq!(object, bare);
        assert_eq!(bare.message, "pong");
    }
}
