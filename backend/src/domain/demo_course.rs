//! Demo course identifier derivation for new instructor accounts.
//!
//! Every new instructor receives a demo course whose identifier is derived
//! from their email: the local part keeps its course-id-safe characters, the
//! mail host is abbreviated to three characters, and a `-demo` marker is
//! appended. `lebron@gmail.com` becomes `lebron.gma-demo`. When an id is
//! already taken, numeric suffixes are tried in order (`-demo0`, `-demo1`,
//! ...), and over-long candidates are truncated from the head so the
//! distinctive tail survives.

/// Maximum length of a course identifier.
pub const COURSE_ID_MAX_LENGTH: usize = 40;

const DEMO_MARKER: &str = "-demo";

fn is_course_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '$' | '-')
}

fn truncate_head(value: &str, max_len: usize) -> String {
    let len = value.chars().count();
    if len <= max_len {
        value.to_owned()
    } else {
        value.chars().skip(len - max_len).collect()
    }
}

fn demo_course_id_root(email: &str) -> String {
    let (username, host) = email.split_once('@').unwrap_or((email, ""));
    let head: String = username
        .chars()
        .map(|c| if is_course_id_char(c) { c } else { '_' })
        .collect();
    let host_abbreviation: String = host.chars().take(3).collect();
    format!("{head}.{host_abbreviation}{DEMO_MARKER}")
}

/// Produce the next candidate id from an email or a taken candidate.
///
/// - an email yields the root form, e.g. `lebron@gmail.com` →
///   `lebron.gma-demo`;
/// - a root form gains a `0` suffix: `lebron.gma-demo` → `lebron.gma-demo0`;
/// - a suffixed form increments: `lebron.gma-demo0` → `lebron.gma-demo1`.
///
/// Candidates longer than `max_len` are truncated from the head.
#[must_use]
pub fn next_demo_course_id(email_or_previous: &str, max_len: usize) -> String {
    if email_or_previous.contains('@') {
        return truncate_head(&demo_course_id_root(email_or_previous), max_len);
    }

    if email_or_previous.ends_with(DEMO_MARKER) {
        return truncate_head(&format!("{email_or_previous}0"), max_len);
    }

    let incremented = email_or_previous
        .rsplit_once(DEMO_MARKER)
        .and_then(|(root, suffix)| {
            suffix
                .parse::<u64>()
                .ok()
                .map(|n| format!("{root}{DEMO_MARKER}{}", n + 1))
        })
        // Input that never came from this module; start a fresh suffix run.
        .unwrap_or_else(|| format!("{email_or_previous}0"));
    truncate_head(&incremented, max_len)
}

/// Derive a free demo course id for `email`, consulting `is_taken` for
/// collisions.
#[must_use]
pub fn generate_demo_course_id(email: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = next_demo_course_id(email, COURSE_ID_MAX_LENGTH);
    while is_taken(&candidate) {
        candidate = next_demo_course_id(&candidate, COURSE_ID_MAX_LENGTH);
    }
    candidate
}
