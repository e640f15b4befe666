//! ---
//! kr_section: "02-application-model"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Application descriptor, manifests and component resolution."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::cmp::Ordering;

/// Compare two dotted version strings such as `1.2.0` and `1.2.0.RC4`.
///
/// Segments are compared numerically when both parse as integers and
/// lexicographically otherwise. A missing segment counts as `0`, so `1.2`
/// equals `1.2.0`.
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    let mut lhs = left.trim().split('.');
    let mut rhs = right.trim().split('.');
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return Ordering::Equal,
            (l, r) => {
                let ordering = compare_segment(l.unwrap_or("0"), r.unwrap_or("0"));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

fn compare_segment(left: &str, right: &str) -> Ordering {
    match (left.parse::<u64>(), right.parse::<u64>()) {
        (Ok(l), Ok(r)) => l.cmp(&r),
        _ => left.cmp(right),
    }
}
