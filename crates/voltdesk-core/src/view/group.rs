// ── Grouping ──

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::model::{EntityId, Menu, Power};

pub const UNASSIGNED_GROUP: &str = "Unassigned";

/// Partition `records` by `key_fn`.
///
/// Groups appear in first-seen order and keep the relative order of
/// their members. Every record lands in exactly one group.
pub fn group_by_key<T, F>(records: &[Arc<T>], key_fn: F) -> IndexMap<String, Vec<Arc<T>>>
where
    F: Fn(&T) -> String,
{
    let mut groups: IndexMap<String, Vec<Arc<T>>> = IndexMap::new();
    for record in records {
        groups
            .entry(key_fn(record))
            .or_default()
            .push(Arc::clone(record));
    }
    groups
}

/// Group powers under the title of the menu they belong to.
pub fn group_powers_by_menu(
    powers: &[Arc<Power>],
    menus: &[Arc<Menu>],
) -> IndexMap<String, Vec<Arc<Power>>> {
    let titles: HashMap<EntityId, &str> = menus.iter().map(|m| (m.id, m.title.as_str())).collect();
    group_by_key(powers, |power| match power.menu_id {
        Some(id) => titles
            .get(&id)
            .map_or_else(|| format!("Menu {id}"), |title| (*title).to_owned()),
        None => UNASSIGNED_GROUP.to_owned(),
    })
}

/// Memoized `group_powers_by_menu`: recomputes only when either input
/// collection `Arc` changes, otherwise hands back the same groups.
#[derive(Default)]
pub struct MenuGroupView {
    last: Option<GroupMemo>,
}

struct GroupMemo {
    powers: Arc<Vec<Arc<Power>>>,
    menus: Arc<Vec<Arc<Menu>>>,
    output: Arc<IndexMap<String, Vec<Arc<Power>>>>,
}

impl MenuGroupView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(
        &mut self,
        powers: &Arc<Vec<Arc<Power>>>,
        menus: &Arc<Vec<Arc<Menu>>>,
    ) -> Arc<IndexMap<String, Vec<Arc<Power>>>> {
        if let Some(memo) = &self.last {
            if Arc::ptr_eq(&memo.powers, powers) && Arc::ptr_eq(&memo.menus, menus) {
                return Arc::clone(&memo.output);
            }
        }
        let output = Arc::new(group_powers_by_menu(powers, menus));
        self.last = Some(GroupMemo {
            powers: Arc::clone(powers),
            menus: Arc::clone(menus),
            output: Arc::clone(&output),
        });
        output
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Audit;

    fn power(id: i64, menu: Option<i64>) -> Arc<Power> {
        Arc::new(Power {
            id: EntityId::new(id),
            name: format!("power-{id}"),
            code: format!("p:{id}"),
            menu_id: menu.map(EntityId::new),
            description: None,
            audit: Audit::default(),
        })
    }

    fn menu(id: i64, title: &str) -> Arc<Menu> {
        Arc::new(Menu {
            id: EntityId::new(id),
            title: title.into(),
            path: None,
            parent_id: None,
            sort: 0,
            audit: Audit::default(),
        })
    }

    fn ids(powers: &[Arc<Power>]) -> Vec<i64> {
        powers.iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn groups_partition_input_in_first_seen_order() {
        let powers = vec![power(1, Some(10)), power(2, Some(20)), power(3, Some(10)), power(4, None)];
        let groups = group_by_key(&powers, |p| {
            p.menu_id.map_or_else(|| "none".to_owned(), |id| id.to_string())
        });

        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["10", "20", "none"]);
        assert_eq!(ids(&groups["10"]), vec![1, 3]);

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, powers.len());
    }

    #[test]
    fn empty_input_yields_no_groups() {
        let groups = group_by_key::<Power, _>(&[], |p| p.name.clone());
        assert!(groups.is_empty());
    }

    #[test]
    fn powers_grouped_by_menu_title() {
        let powers = vec![power(1, Some(10)), power(2, Some(99)), power(3, None), power(4, Some(10))];
        let menus = vec![menu(10, "Devices")];
        let groups = group_powers_by_menu(&powers, &menus);

        assert_eq!(ids(&groups["Devices"]), vec![1, 4]);
        assert_eq!(ids(&groups["Menu 99"]), vec![2]);
        assert_eq!(ids(&groups[UNASSIGNED_GROUP]), vec![3]);
    }

    #[test]
    fn menu_group_view_reuses_result_until_an_input_changes() {
        let powers = Arc::new(vec![power(1, Some(10)), power(2, None)]);
        let menus = Arc::new(vec![menu(10, "Devices")]);
        let mut view = MenuGroupView::new();

        let first = view.apply(&powers, &menus);
        let again = view.apply(&powers, &menus);
        assert!(Arc::ptr_eq(&first, &again));

        let renamed = Arc::new(vec![menu(10, "Meters")]);
        let regrouped = view.apply(&powers, &renamed);
        assert!(!Arc::ptr_eq(&first, &regrouped));
        assert_eq!(ids(&regrouped["Meters"]), vec![1]);

        let fewer = Arc::new(vec![power(2, None)]);
        let shrunk = view.apply(&fewer, &renamed);
        let keys: Vec<&str> = shrunk.keys().map(String::as_str).collect();
        assert_eq!(keys, vec![UNASSIGNED_GROUP]);
    }
}
