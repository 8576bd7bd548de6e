//! Display names for candidates, derived from CV file names.
//!
//! `"john_doe_cv.pdf"` becomes `"John Doe"`. The derivation only looks at the
//! file name; the path is accepted so callers can pass both without caring.

use once_cell::sync::Lazy;
use regex::Regex;

const FALLBACK_NAME: &str = "Unknown";

static EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(pdf|doc|docx|txt)$").expect("Invalid extension regex"));

static UNDERSCORE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)_(cv|resume|curriculum)$").expect("Invalid underscore marker regex")
});

static LEADING_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(cv|resume|curriculum)[\s_-]*").expect("Invalid leading marker regex")
});

static TRAILING_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[\s_-]*(cv|resume|curriculum)$").expect("Invalid trailing marker regex")
});

/// Derives a human-friendly candidate name from a CV file name.
///
/// Steps, each on the output of the previous one:
/// 1. drop a trailing `.pdf` / `.doc` / `.docx` / `.txt`
/// 2. drop a trailing `_cv` / `_resume` / `_curriculum`
/// 3. underscores → spaces
/// 4. drop a leading `cv` / `resume` / `curriculum` and its separators
/// 5. drop the same marker at the end
///
/// Steps 1–5 (plus trimming) repeat until nothing changes, so `"bob.pdf.pdf"`
/// and `"bob_cv_cv"` settle in one call. The result is then title-cased, falling
/// back to `"Unknown"` when nothing is left. Applying it to its own output is
/// a no-op.
pub fn display_name(file_name: &str, _path: &str) -> String {
    let name = title_case(&strip_markers(file_name));

    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name
    }
}

fn strip_markers(file_name: &str) -> String {
    let mut current = file_name.to_string();
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_once(name: &str) -> String {
    let name = EXTENSION.replace(name, "");
    let name = UNDERSCORE_MARKER.replace(&name, "");
    let name = name.replace('_', " ");
    let name = LEADING_MARKER.replace(&name, "");
    TRAILING_MARKER.replace(&name, "").trim().to_string()
}

/// Upper-cases the first character of every space-separated word and
/// lower-cases the rest. Characters whose upper case expands to several
/// characters (`ß` → `SS`) are left alone so the transform stays stable.
fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut upper = first.to_uppercase();
                    let head = match (upper.next(), upper.next()) {
                        (Some(single), None) => single,
                        _ => first,
                    };
                    let mut out = String::with_capacity(word.len());
                    out.push(head);
                    out.push_str(&chars.as_str().to_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
