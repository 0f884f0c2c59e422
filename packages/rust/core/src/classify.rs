//! Role lookup for leadership and the teaching/non-teaching split for faculty.

use sitepages_shared::{Faculty, FacultyPage, Leader};
use tracing::warn;

/// First leader whose role equals `role`, ignoring case.
///
/// Duplicates are not rejected; the first match wins and the rest are
/// reported in the log.
pub fn find_by_role<'a>(leaders: &'a [Leader], role: &str) -> Option<&'a Leader> {
    let target = role.to_lowercase();
    let mut matches = leaders.iter().filter(|l| l.role.to_lowercase() == target);

    let first = matches.next();
    let extra = matches.count();
    if extra > 0 {
        warn!(
            role,
            duplicates = extra,
            "several leaders share a role, using the first"
        );
    }
    first
}

/// Split faculty into teaching and non-teaching staff, preserving order.
///
/// Only an explicit `isTeaching: false` lands in `non_teaching`.
pub fn partition_teaching(faculty: Vec<Faculty>) -> FacultyPage {
    let (teaching, non_teaching) = faculty.into_iter().partition(Faculty::is_teaching_staff);
    FacultyPage {
        teaching,
        non_teaching,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leader(id: &str, name: &str, role: &str) -> Leader {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "name": name,
            "role": role,
            "position": role,
            "createdAt": "2024-03-01T08:00:00Z",
            "updatedAt": "2024-03-01T08:00:00Z"
        }))
        .expect("leader fixture")
    }

    fn member(id: &str, is_teaching: Option<bool>) -> Faculty {
        let mut json = serde_json::json!({"_id": id, "name": id, "designation": "Staff"});
        if let Some(flag) = is_teaching {
            json["isTeaching"] = flag.into();
        }
        serde_json::from_value(json).expect("faculty fixture")
    }

    fn ids(list: &[Faculty]) -> Vec<&str> {
        list.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn role_lookup_is_case_insensitive() {
        let leaders = vec![leader("1", "A", "principal")];
        assert_eq!(find_by_role(&leaders, "Principal").map(|l| l.name.as_str()), Some("A"));
        assert!(find_by_role(&leaders, "Chairman").is_none());

        let leaders = vec![leader("2", "B", "CHAIRMAN")];
        assert!(find_by_role(&leaders, "chairman").is_some());
    }

    #[test]
    fn role_lookup_first_match_wins() {
        let leaders = vec![
            leader("1", "Registrar", "Secretary"),
            leader("2", "First", "secretary"),
            leader("3", "Second", "Secretary"),
        ];
        let found = find_by_role(&leaders, "Secretary").unwrap();
        assert_eq!(found.id, "1");
    }

    #[test]
    fn role_lookup_on_empty_list() {
        assert!(find_by_role(&[], "Principal").is_none());
    }

    #[test]
    fn partition_follows_tri_state_flag() {
        let page = partition_teaching(vec![
            member("1", Some(true)),
            member("2", None),
            member("3", Some(false)),
        ]);
        assert_eq!(ids(&page.teaching), ["1", "2"]);
        assert_eq!(ids(&page.non_teaching), ["3"]);
    }

    #[test]
    fn partition_is_exhaustive_and_disjoint() {
        let input: Vec<Faculty> = (0..12)
            .map(|i| {
                let flag = match i % 3 {
                    0 => None,
                    1 => Some(true),
                    _ => Some(false),
                };
                member(&format!("m{i}"), flag)
            })
            .collect();
        let total = input.len();

        let page = partition_teaching(input);
        assert_eq!(page.teaching.len() + page.non_teaching.len(), total);
        assert!(
            page.teaching
                .iter()
                .all(|t| page.non_teaching.iter().all(|n| n.id != t.id))
        );
        assert!(page.non_teaching.iter().all(|f| f.is_teaching == Some(false)));
    }

    #[test]
    fn partition_of_nothing_is_empty() {
        assert_eq!(partition_teaching(Vec::new()), FacultyPage::EMPTY);
    }
}
