//! Display labels for the coded enumerations.

use crate::types::{AssignmentStatus, ProgressOutcome, TopicReviewStatus, TopicType};

/// Label shown for a code that names no known variant.
pub const UNKNOWN_LABEL: &str = "未知";

/// Color shown for a review status code that names no known variant.
pub const UNKNOWN_COLOR: &str = "default";

impl TopicType {
    pub fn label(self) -> &'static str {
        match self {
            TopicType::Theoretical => "理论研究型",
            TopicType::Application => "应用开发型",
            TopicType::Experimental => "实验研究型",
            TopicType::Engineering => "工程设计型",
            TopicType::Other => "其他",
        }
    }

    pub fn label_of(code: u8) -> &'static str {
        TopicType::try_from(code).map_or(UNKNOWN_LABEL, Self::label)
    }
}

impl TopicReviewStatus {
    pub fn label(self) -> &'static str {
        match self {
            TopicReviewStatus::Pending => "待审核",
            TopicReviewStatus::Approved => "已通过",
            TopicReviewStatus::Rejected => "已拒绝",
        }
    }

    /// Theme color name used to render the status chip.
    pub fn color(self) -> &'static str {
        match self {
            TopicReviewStatus::Pending => "warning",
            TopicReviewStatus::Approved => "success",
            TopicReviewStatus::Rejected => "error",
        }
    }

    pub fn label_of(code: u8) -> &'static str {
        TopicReviewStatus::try_from(code).map_or(UNKNOWN_LABEL, Self::label)
    }

    pub fn color_of(code: u8) -> &'static str {
        TopicReviewStatus::try_from(code).map_or(UNKNOWN_COLOR, Self::color)
    }
}

impl AssignmentStatus {
    pub fn label(self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "待审核",
            AssignmentStatus::Approved => "已通过",
            AssignmentStatus::Rejected => "已拒绝",
        }
    }

    pub fn label_of(code: u8) -> &'static str {
        AssignmentStatus::try_from(code).map_or(UNKNOWN_LABEL, Self::label)
    }
}

impl ProgressOutcome {
    pub fn label(self) -> &'static str {
        match self {
            ProgressOutcome::Undecided => "无结论",
            ProgressOutcome::Passed => "已通过",
            ProgressOutcome::Returned => "已打回",
        }
    }

    pub fn label_of(code: u8) -> &'static str {
        ProgressOutcome::try_from(code).map_or(UNKNOWN_LABEL, Self::label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_type_labels_follow_code_order() {
        let labels: Vec<&str> = TopicType::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(
            labels,
            vec!["理论研究型", "应用开发型", "实验研究型", "工程设计型", "其他"]
        );
    }

    #[test]
    fn review_status_has_label_and_color() {
        assert_eq!(TopicReviewStatus::Pending.label(), "待审核");
        assert_eq!(TopicReviewStatus::Approved.color(), "success");
        assert_eq!(TopicReviewStatus::color_of(2), "error");
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(TopicType::label_of(9), UNKNOWN_LABEL);
        assert_eq!(TopicReviewStatus::label_of(3), UNKNOWN_LABEL);
        assert_eq!(TopicReviewStatus::color_of(3), UNKNOWN_COLOR);
        assert_eq!(AssignmentStatus::label_of(7), UNKNOWN_LABEL);
        assert_eq!(ProgressOutcome::label_of(3), UNKNOWN_LABEL);
    }

    #[test]
    fn known_codes_resolve() {
        assert_eq!(AssignmentStatus::label_of(1), "已通过");
        assert_eq!(ProgressOutcome::label_of(2), "已打回");
    }
}
