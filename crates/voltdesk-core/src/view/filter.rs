// ── Substring filtering ──
//
// Case-insensitive search over one or more string fields. Pure; the
// input collection is never modified.

use std::sync::Arc;

use crate::model::{Device, Menu, Meter, Power, Role, User};

/// Extracts one searchable field from a record.
pub type FieldFn<T> = for<'a> fn(&'a T) -> Option<&'a str>;

/// Records with a default set of searchable fields.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Device {
    fn search_fields(&self) -> Vec<&str> {
        [Some(self.sn.as_str()), self.name.as_deref(), self.location.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl Searchable for Meter {
    fn search_fields(&self) -> Vec<&str> {
        [Some(self.meter_no.as_str()), self.name.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl Searchable for Power {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.code]
    }
}

impl Searchable for Role {
    fn search_fields(&self) -> Vec<&str> {
        [Some(self.name.as_str()), self.description.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.username.as_str()),
            self.display_name.as_deref(),
            self.email.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl Searchable for Menu {
    fn search_fields(&self) -> Vec<&str> {
        [Some(self.title.as_str()), self.path.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn normalize(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Keep records where any of `fields` contains `query`, ignoring case.
///
/// A blank query returns the input `Arc` itself.
pub fn filter_by_substring<T>(
    records: &Arc<Vec<Arc<T>>>,
    query: &str,
    fields: &[FieldFn<T>],
) -> Arc<Vec<Arc<T>>> {
    let Some(needle) = normalize(query) else {
        return Arc::clone(records);
    };
    let kept = records
        .iter()
        .filter(|r| {
            let record: &T = r;
            fields
                .iter()
                .filter_map(|field| field(record))
                .any(|value| contains(value, &needle))
        })
        .cloned()
        .collect();
    Arc::new(kept)
}

/// [`filter_by_substring`] over the record's [`Searchable`] fields.
pub fn filter_by<T: Searchable>(records: &Arc<Vec<Arc<T>>>, query: &str) -> Arc<Vec<Arc<T>>> {
    let Some(needle) = normalize(query) else {
        return Arc::clone(records);
    };
    let kept = records
        .iter()
        .filter(|r| r.search_fields().into_iter().any(|v| contains(v, &needle)))
        .cloned()
        .collect();
    Arc::new(kept)
}

/// Memoized search: recomputes only when the collection `Arc` or the
/// query changes.
pub struct SearchView<T> {
    fields: Vec<FieldFn<T>>,
    last: Option<Memo<T>>,
}

struct Memo<T> {
    input: Arc<Vec<Arc<T>>>,
    query: String,
    output: Arc<Vec<Arc<T>>>,
}

impl<T> SearchView<T> {
    pub fn new(fields: Vec<FieldFn<T>>) -> Self {
        Self { fields, last: None }
    }

    pub fn apply(&mut self, records: &Arc<Vec<Arc<T>>>, query: &str) -> Arc<Vec<Arc<T>>> {
        if let Some(memo) = &self.last {
            if Arc::ptr_eq(&memo.input, records) && memo.query == query {
                return Arc::clone(&memo.output);
            }
        }
        let output = filter_by_substring(records, query, &self.fields);
        self.last = Some(Memo {
            input: Arc::clone(records),
            query: query.to_owned(),
            output: Arc::clone(&output),
        });
        output
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Audit, EntityId};

    fn user(id: i64, username: &str, email: Option<&str>) -> Arc<User> {
        Arc::new(User {
            id: EntityId::new(id),
            username: username.into(),
            display_name: None,
            email: email.map(Into::into),
            role_id: None,
            enabled: true,
            audit: Audit::default(),
        })
    }

    fn username(u: &User) -> Option<&str> {
        Some(&u.username)
    }

    fn email(u: &User) -> Option<&str> {
        u.email.as_deref()
    }

    fn users() -> Arc<Vec<Arc<User>>> {
        Arc::new(vec![
            user(1, "Alice", Some("alice@grid.io")),
            user(2, "bob", None),
            user(3, "carol", Some("ops@ALICE.dev")),
        ])
    }

    fn ids(records: &[Arc<User>]) -> Vec<i64> {
        records.iter().map(|u| u.id.get()).collect()
    }

    #[test]
    fn matches_any_field_ignoring_case() {
        let all = users();
        let hits = filter_by_substring(&all, "alice", &[username, email]);
        assert_eq!(ids(&hits), vec![1, 3]);

        let hits = filter_by_substring(&all, "BOB", &[username]);
        assert_eq!(ids(&hits), vec![2]);
    }

    #[test]
    fn blank_query_returns_input() {
        let all = users();
        let hits = filter_by_substring(&all, "   ", &[username]);
        assert!(Arc::ptr_eq(&all, &hits));
        assert!(Arc::ptr_eq(&all, &filter_by(&all, "")));
    }

    #[test]
    fn searchable_uses_default_fields() {
        let hits = filter_by(&users(), "grid");
        assert_eq!(ids(&hits), vec![1]);
    }

    #[test]
    fn search_view_memoizes() {
        let all = users();
        let mut view = SearchView::new(vec![username as FieldFn<User>]);

        let first = view.apply(&all, "o");
        let second = view.apply(&all, "o");
        assert!(Arc::ptr_eq(&first, &second));

        let third = view.apply(&all, "car");
        assert_eq!(ids(&third), vec![3]);

        let replaced = users();
        let fourth = view.apply(&replaced, "car");
        assert!(!Arc::ptr_eq(&third, &fourth));
    }
}
