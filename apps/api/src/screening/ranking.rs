//! Results presentation order: stable sorting of candidate records.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::screening::models::CandidateRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    CandidateName,
    #[default]
    MatchScore,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Current sort of the results table. Defaults to best match first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    /// Header-click rule: the active column flips direction, another column
    /// becomes active in descending order.
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                key,
                direction: SortDirection::Desc,
            }
        }
    }
}

/// Query parameters accepted wherever results are returned.
///
/// `sort` and `direction` describe the client's current order; `toggle`
/// names a clicked column header and is applied on top of it.
#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    pub sort: Option<SortKey>,
    pub direction: Option<SortDirection>,
    pub toggle: Option<SortKey>,
}

impl From<SortQuery> for SortState {
    fn from(query: SortQuery) -> Self {
        let current = Self {
            key: query.sort.unwrap_or_default(),
            direction: query.direction.unwrap_or_default(),
        };
        match query.toggle {
            Some(key) => current.toggle(key),
            None => current,
        }
    }
}

/// Sorts in place. The sort is stable in both directions: records that
/// compare equal keep their relative input order.
pub fn sort_candidates(records: &mut [CandidateRecord], sort: SortState) {
    records.sort_by(|a, b| {
        let ordering = compare(a, b, sort.key);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &CandidateRecord, b: &CandidateRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::CandidateName => a.candidate_name.cmp(&b.candidate_name),
        SortKey::MatchScore => a.match_score.cmp(&b.match_score),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn record(name: &str, score: u32, file: &str) -> CandidateRecord {
        CandidateRecord {
            id: Uuid::new_v4(),
            candidate_name: name.to_string(),
            email: "Not found".to_string(),
            file_name: file.to_string(),
            file_url: String::new(),
            match_score: score,
            top_matched_skills: vec![],
            resume_text: String::new(),
        }
    }

    fn files(records: &[CandidateRecord]) -> Vec<&str> {
        records.iter().map(|r| r.file_name.as_str()).collect()
    }

    #[test]
    fn test_default_sort_is_score_descending() {
        assert_eq!(
            SortState::default(),
            SortState { key: SortKey::MatchScore, direction: SortDirection::Desc }
        );
    }

    #[test]
    fn test_score_descending_keeps_ties_in_input_order() {
        let mut records = vec![
            record("A", 40, "a.pdf"),
            record("B", 90, "b.pdf"),
            record("C", 90, "c.pdf"),
            record("D", 10, "d.pdf"),
        ];
        sort_candidates(&mut records, SortState::default());
        assert_eq!(files(&records), vec!["b.pdf", "c.pdf", "a.pdf", "d.pdf"]);
    }

    #[test]
    fn test_score_ascending_keeps_ties_in_input_order() {
        let mut records = vec![
            record("A", 90, "a.pdf"),
            record("B", 10, "b.pdf"),
            record("C", 90, "c.pdf"),
        ];
        let sort = SortState { key: SortKey::MatchScore, direction: SortDirection::Asc };
        sort_candidates(&mut records, sort);
        assert_eq!(files(&records), vec!["b.pdf", "a.pdf", "c.pdf"]);
    }

    #[test]
    fn test_name_sort_is_lexicographic() {
        let mut records = vec![
            record("Zoe Quinn", 50, "z.pdf"),
            record("Ada Byron", 20, "a.pdf"),
            record("Not found", 70, "n.pdf"),
        ];
        let sort = SortState { key: SortKey::CandidateName, direction: SortDirection::Asc };
        sort_candidates(&mut records, sort);
        assert_eq!(files(&records), vec!["a.pdf", "n.pdf", "z.pdf"]);
    }

    #[test]
    fn test_toggle_same_key_flips_direction() {
        let state = SortState::default().toggle(SortKey::MatchScore);
        assert_eq!(state.direction, SortDirection::Asc);
        assert_eq!(state.toggle(SortKey::MatchScore).direction, SortDirection::Desc);
    }

    #[test]
    fn test_toggle_new_key_starts_descending() {
        let asc = SortState { key: SortKey::MatchScore, direction: SortDirection::Asc };
        let state = asc.toggle(SortKey::CandidateName);
        assert_eq!(state, SortState { key: SortKey::CandidateName, direction: SortDirection::Desc });
    }

    #[test]
    fn test_sort_query_deserializes_wire_names() {
        let query: SortQuery =
            serde_json::from_str(r#"{"sort": "candidate_name", "direction": "asc"}"#).unwrap();
        let state = SortState::from(query);
        assert_eq!(state.key, SortKey::CandidateName);
        assert_eq!(state.direction, SortDirection::Asc);
        assert_eq!(SortState::from(SortQuery::default()), SortState::default());
    }

    #[test]
    fn test_sort_query_applies_header_click() {
        let query: SortQuery = serde_json::from_str(
            r#"{"sort": "match_score", "direction": "desc", "toggle": "match_score"}"#,
        )
        .unwrap();
        assert_eq!(
            SortState::from(query),
            SortState { key: SortKey::MatchScore, direction: SortDirection::Asc }
        );

        let query: SortQuery = serde_json::from_str(r#"{"toggle": "candidate_name"}"#).unwrap();
        assert_eq!(
            SortState::from(query),
            SortState { key: SortKey::CandidateName, direction: SortDirection::Desc }
        );
    }
}
