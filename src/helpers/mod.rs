use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub mod handler_404;

/// Current UTC time as an RFC 3339 string, for response and event payloads.
pub fn current_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
