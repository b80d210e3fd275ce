//! User-facing error messages keyed by endpoint identifier and status code.
//!
//! # Design
//! Two explicit levels: `endpoint_messages` maps a dotted endpoint identifier
//! (`"topics.patch"`) to its status table, and `default_message` maps a
//! status alone. A lookup that misses the endpoint table for any reason (the
//! endpoint is unknown, or it has no entry for the status) falls back to the
//! default table, then to a fixed string. The function is total.

/// Returned when no status code is available (the request never got a reply).
pub const NETWORK_ERROR_MESSAGE: &str = "网络错误，请检查网络连接";

/// Returned when neither table knows the status code.
pub const GENERIC_FAILURE_MESSAGE: &str = "操作失败，请稍后重试";

type StatusTable = &'static [(u16, &'static str)];

const NOT_LOGGED_IN: &str = "未登录";
const FORBIDDEN: &str = "权限不足";
const MALFORMED_BODY: &str = "请求体格式错误";

const DEFAULT_MESSAGES: StatusTable = &[
    (400, "请求格式错误"),
    (401, "认证失败"),
    (403, "权限不足"),
    (404, "资源不存在"),
    (409, "操作冲突"),
    (422, "数据验证失败"),
    (500, "服务器内部错误"),
    (502, "网关错误"),
    (503, "服务暂时不可用"),
];

/// Every endpoint identifier with a dedicated message table.
pub const ENDPOINTS: &[&str] = &[
    "login",
    "logout",
    "user.get",
    "user.patch",
    "user.post",
    "topics.get",
    "topics.post",
    "topics.getById",
    "topics.patch",
    "topics.search",
    "assignments.get",
    "assignments.post",
    "assignments.patch",
    "progressReports.get",
    "progressReports.post",
    "progressReports.patch",
    "finalDefenses.get",
    "finalDefenses.post",
    "finalDefenses.patch",
];

fn endpoint_messages(endpoint: &str) -> Option<StatusTable> {
    let table: StatusTable = match endpoint {
        "login" => &[(400, MALFORMED_BODY), (401, "认证失败，用户名或密码错误")],
        "logout" => &[(401, NOT_LOGGED_IN)],

        "user.get" => &[(401, NOT_LOGGED_IN)],
        "user.patch" => &[(400, MALFORMED_BODY), (401, NOT_LOGGED_IN)],
        "user.post" => &[
            (400, MALFORMED_BODY),
            (401, NOT_LOGGED_IN),
            (403, FORBIDDEN),
            (409, "用户创建失败，同名用户已存在"),
        ],

        "topics.get" => &[(401, NOT_LOGGED_IN), (403, FORBIDDEN)],
        "topics.post" => &[(400, MALFORMED_BODY), (401, NOT_LOGGED_IN), (403, FORBIDDEN)],
        "topics.getById" => &[
            (401, NOT_LOGGED_IN),
            (403, FORBIDDEN),
            (404, "未找到指定课题"),
        ],
        "topics.patch" => &[
            (400, MALFORMED_BODY),
            (401, NOT_LOGGED_IN),
            (403, FORBIDDEN),
            (404, "未找到指定课题"),
        ],
        "topics.search" => &[(400, MALFORMED_BODY), (401, NOT_LOGGED_IN), (403, FORBIDDEN)],

        "assignments.get" => &[(401, NOT_LOGGED_IN), (403, FORBIDDEN)],
        "assignments.post" => &[
            (400, MALFORMED_BODY),
            (401, NOT_LOGGED_IN),
            (403, FORBIDDEN),
            (409, "选题申请失败，课题已满或已存在申请记录"),
        ],
        "assignments.patch" => &[
            (400, MALFORMED_BODY),
            (401, NOT_LOGGED_IN),
            (403, FORBIDDEN),
            (404, "未找到指定选题申请或学生"),
            (409, "选题申请状态更新失败，学生已有课题或名额已满"),
        ],

        "progressReports.get" => &[
            (401, NOT_LOGGED_IN),
            (403, FORBIDDEN),
            (404, "无当前进展"),
        ],
        "progressReports.post" | "progressReports.patch" => &[
            (400, MALFORMED_BODY),
            (401, NOT_LOGGED_IN),
            (403, FORBIDDEN),
            (404, "未找到指定进展"),
            (409, "进展更新失败，状态存在冲突"),
        ],

        "finalDefenses.get" => &[
            (401, NOT_LOGGED_IN),
            (403, FORBIDDEN),
            (404, "无结项答辩进展"),
        ],
        "finalDefenses.post" => &[
            (401, NOT_LOGGED_IN),
            (403, FORBIDDEN),
            (409, "结项答辩申请提交失败，状态存在冲突"),
        ],
        "finalDefenses.patch" => &[
            (400, MALFORMED_BODY),
            (401, NOT_LOGGED_IN),
            (403, FORBIDDEN),
            (404, "未找到指定结项答辩进展"),
            (409, "结项答辩进展更新失败，状态存在冲突"),
        ],

        _ => return None,
    };
    Some(table)
}

fn lookup(table: StatusTable, status: u16) -> Option<&'static str> {
    table
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, message)| *message)
}

/// Default message for a status code, independent of endpoint.
pub fn default_message(status: u16) -> Option<&'static str> {
    lookup(DEFAULT_MESSAGES, status)
}

/// Message to show the user after `endpoint` failed with `status`.
///
/// A missing (or zero) status means the request never got a response.
pub fn error_message(endpoint: &str, status: Option<u16>) -> &'static str {
    let status = match status {
        Some(status) if status != 0 => status,
        _ => return NETWORK_ERROR_MESSAGE,
    };

    endpoint_messages(endpoint)
        .and_then(|table| lookup(table, status))
        .or_else(|| default_message(status))
        .unwrap_or(GENERIC_FAILURE_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_specific_message() {
        assert_eq!(error_message("topics.patch", Some(404)), "未找到指定课题");
        assert_eq!(
            error_message("login", Some(401)),
            "认证失败，用户名或密码错误"
        );
    }

    #[test]
    fn unknown_status_at_known_endpoint_uses_generic_fallback() {
        assert_eq!(error_message("topics.patch", Some(999)), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn known_endpoint_missing_status_uses_default_table() {
        assert_eq!(error_message("topics.get", Some(500)), "服务器内部错误");
        assert_eq!(error_message("logout", Some(404)), "资源不存在");
    }

    #[test]
    fn unknown_endpoint_uses_default_table() {
        assert_eq!(error_message("unknown.endpoint", Some(404)), "资源不存在");
    }

    #[test]
    fn intermediate_node_is_not_an_endpoint() {
        // "user" groups get/patch/post but has no status table of its own.
        assert_eq!(error_message("user", Some(409)), "操作冲突");
        assert_eq!(error_message("topics.patch.extra", Some(404)), "资源不存在");
    }

    #[test]
    fn missing_status_is_network_error() {
        assert_eq!(error_message("login", None), NETWORK_ERROR_MESSAGE);
        assert_eq!(error_message("topics.patch", Some(0)), NETWORK_ERROR_MESSAGE);
        assert_eq!(error_message("", None), NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn every_listed_endpoint_has_a_table() {
        for endpoint in ENDPOINTS {
            assert!(endpoint_messages(endpoint).is_some(), "{endpoint}");
        }
    }

    #[test]
    fn never_empty() {
        for endpoint in ENDPOINTS.iter().copied().chain(["", "nope", "a.b.c"]) {
            for status in [None, Some(0), Some(200), Some(400), Some(401), Some(409), Some(599)] {
                assert!(!error_message(endpoint, status).is_empty());
            }
        }
    }
}
