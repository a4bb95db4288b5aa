use shared::error::RestFailure;

pub const INFO_PLACEHOLDER: &str = "%INFO%";

/// Substitutes `%INFO%` in `template` with status and response details, e.g.
/// `(Status: 401, Response: denied)`. Missing parts are left out.
pub fn rest_info(template: &str, status: Option<u16>, body: &str) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(status) = status {
        parts.push(format!("Status: {status}"));
    }
    let body = body.trim();
    if !body.is_empty() {
        parts.push(format!("Response: {body}"));
    }

    let info = if parts.is_empty() {
        String::new()
    } else {
        format!("({})", parts.join(", "))
    };
    template.replace(INFO_PLACEHOLDER, &info).trim_end().to_string()
}

pub fn describe_failure(template: &str, failure: &RestFailure) -> String {
    rest_info(template, failure.status, &failure.body)
}
