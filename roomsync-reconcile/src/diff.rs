//! Membership differ.

use std::collections::HashSet;

use roomsync_core::{Member, PersonId};

/// Members of `source` whose person id does not appear in `destination`.
///
/// Output keeps `source` order. The source roster is not de-duplicated: a
/// person listed twice in `source` and absent from `destination` appears
/// twice in the result and is attempted twice.
pub fn missing_members(source: &[Member], destination: &[Member]) -> Vec<Member> {
    let present: HashSet<&PersonId> = destination.iter().map(|m| &m.person_id).collect();
    source
        .iter()
        .filter(|m| !present.contains(&m.person_id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn roster(ids: &[&str]) -> Vec<Member> {
        ids.iter()
            .map(|id| Member {
                person_id: PersonId::from(*id),
                person_email: format!("{}@example.com", id.to_lowercase()),
                person_display_name: id.to_string(),
            })
            .collect()
    }

    fn ids(members: &[Member]) -> Vec<&str> {
        members.iter().map(|m| m.person_id.0.as_str()).collect()
    }

    #[rstest]
    #[case(&["A"], &[], &["A"])]
    #[case(&["A", "B"], &["A"], &["B"])]
    #[case(&["C", "A", "B"], &["B"], &["C", "A"])]
    #[case(&["A", "B"], &["B", "A"], &[])]
    #[case(&[], &["A", "B"], &[])]
    #[case(&[], &[], &[])]
    #[case(&["A"], &["Z"], &["A"])]
    fn returns_source_members_absent_from_destination(
        #[case] source: &[&str],
        #[case] destination: &[&str],
        #[case] expected: &[&str],
    ) {
        let missing = missing_members(&roster(source), &roster(destination));
        assert_eq!(ids(&missing), expected);
    }

    #[test]
    fn roster_diffed_against_itself_is_empty() {
        let a = roster(&["A", "B", "C", "D"]);
        assert!(missing_members(&a, &a).is_empty());
    }

    #[test]
    fn duplicate_source_entries_both_pass_through() {
        let missing = missing_members(&roster(&["A", "B", "A"]), &roster(&["B"]));
        assert_eq!(ids(&missing), vec!["A", "A"]);
    }

    #[test]
    fn comparison_is_exact_without_normalization() {
        let missing = missing_members(&roster(&["abc", "ABC", " abc"]), &roster(&["abc"]));
        assert_eq!(ids(&missing), vec!["ABC", " abc"]);
    }

    #[test]
    fn identity_ignores_descriptive_fields() {
        let source = roster(&["A"]);
        let mut destination = roster(&["A"]);
        destination[0].person_email = "renamed@example.com".to_string();
        destination[0].person_display_name = "Someone Else".to_string();
        assert!(missing_members(&source, &destination).is_empty());
    }

    #[test]
    fn missing_members_are_full_snapshots() {
        let missing = missing_members(&roster(&["A"]), &[]);
        assert_eq!(missing[0].person_email, "a@example.com");
        assert_eq!(missing[0].person_display_name, "A");
    }
}
