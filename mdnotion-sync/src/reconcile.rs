//! Local vs remote diff.

use mdnotion_core::{Document, LocalInventory, RemoteId, RemoteInventory, Title};

/// A local document with no remote page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateItem {
    pub title: Title,
    pub document: Document,
}

/// A local document whose page already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateItem {
    pub title: Title,
    pub document: Document,
    pub remote_id: RemoteId,
}

/// A remote page with no local document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteItem {
    pub title: Title,
    pub remote_id: RemoteId,
}

/// Work for one pass. Every local title is in exactly one of `to_create` and
/// `to_update`; every remote page is in exactly one of `to_update` and
/// `to_delete`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub to_create: Vec<CreateItem>,
    pub to_update: Vec<UpdateItem>,
    pub to_delete: Vec<DeleteItem>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}

/// Partition titles by exact equality. Local order drives create and update;
/// remote order drives delete.
pub fn reconcile(local: &LocalInventory, remote: &RemoteInventory) -> DiffResult {
    let mut diff = DiffResult::default();
    for (title, document) in local {
        match remote.get(title) {
            Some(node) => diff.to_update.push(UpdateItem {
                title: title.clone(),
                document: document.clone(),
                remote_id: node.id.clone(),
            }),
            None => diff.to_create.push(CreateItem {
                title: title.clone(),
                document: document.clone(),
            }),
        }
    }
    for (title, node) in remote {
        if !local.contains_key(title) {
            diff.to_delete.push(DeleteItem {
                title: title.clone(),
                remote_id: node.id.clone(),
            });
        }
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdnotion_core::RemoteNode;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn local(titles: &[&str]) -> LocalInventory {
        titles
            .iter()
            .map(|t| {
                (
                    Title::from(*t),
                    Document {
                        title: Title::from(*t),
                        path: PathBuf::from(format!("{t}.md")),
                        body: String::new(),
                    },
                )
            })
            .collect()
    }

    fn remote(entries: &[(&str, &str)]) -> RemoteInventory {
        entries
            .iter()
            .map(|(t, id)| {
                (
                    Title::from(*t),
                    RemoteNode {
                        id: RemoteId::from(*id),
                        title: Title::from(*t),
                    },
                )
            })
            .collect()
    }

    fn names(diff: &DiffResult) -> (Vec<&str>, Vec<(&str, &str)>, Vec<&str>) {
        (
            diff.to_create.iter().map(|c| c.title.as_str()).collect(),
            diff.to_update
                .iter()
                .map(|u| (u.title.as_str(), u.remote_id.as_str()))
                .collect(),
            diff.to_delete.iter().map(|d| d.remote_id.as_str()).collect(),
        )
    }

    #[test]
    fn partitions_titles() {
        let diff = reconcile(
            &local(&["A", "B", "C"]),
            &remote(&[("D", "4"), ("B", "2"), ("E", "5")]),
        );
        assert_eq!(
            names(&diff),
            (vec!["A", "C"], vec![("B", "2")], vec!["4", "5"])
        );
    }

    #[test]
    fn only_local_creates_everything() {
        let diff = reconcile(&local(&["A"]), &RemoteInventory::new());
        assert_eq!(names(&diff), (vec!["A"], vec![], vec![]));
    }

    #[test]
    fn only_remote_deletes_everything() {
        let diff = reconcile(&LocalInventory::new(), &remote(&[("B", "b1")]));
        assert_eq!(names(&diff), (vec![], vec![], vec!["b1"]));
    }

    #[test]
    fn titles_match_exactly() {
        let diff = reconcile(&local(&["Guide"]), &remote(&[("guide", "g")]));
        assert_eq!(names(&diff), (vec!["Guide"], vec![], vec!["g"]));
    }

    #[test]
    fn empty_inputs_give_empty_diff() {
        assert!(reconcile(&LocalInventory::new(), &RemoteInventory::new()).is_empty());
    }

    /// Every local title lands in create or update, every remote page in
    /// update or delete, and nothing twice.
    fn assert_partition(local: &LocalInventory, remote: &RemoteInventory, diff: &DiffResult) {
        let mut titles: Vec<&str> = diff
            .to_create
            .iter()
            .map(|c| c.title.as_str())
            .chain(diff.to_update.iter().map(|u| u.title.as_str()))
            .collect();
        titles.sort_unstable();
        let mut expected_titles: Vec<&str> = local.keys().map(Title::as_str).collect();
        expected_titles.sort_unstable();
        assert_eq!(titles, expected_titles);

        let mut ids: Vec<&str> = diff
            .to_update
            .iter()
            .map(|u| u.remote_id.as_str())
            .chain(diff.to_delete.iter().map(|d| d.remote_id.as_str()))
            .collect();
        ids.sort_unstable();
        let mut expected_ids: Vec<&str> = remote.values().map(|n| n.id.as_str()).collect();
        expected_ids.sort_unstable();
        assert_eq!(ids, expected_ids);

        for item in &diff.to_create {
            assert!(!remote.contains_key(&item.title));
        }
        for item in &diff.to_delete {
            assert!(!local.contains_key(&item.title));
        }
    }

    #[test]
    fn every_input_is_partitioned_exactly_once() {
        let cases = [
            (local(&[]), remote(&[])),
            (local(&["A"]), remote(&[])),
            (local(&[]), remote(&[("A", "a")])),
            (local(&["A", "B", "C"]), remote(&[("C", "c"), ("D", "d")])),
            (local(&["README", "Guide", "FAQ"]), remote(&[("FAQ", "f"), ("Guide", "g")])),
            (local(&["x", "X"]), remote(&[("X", "1"), ("y", "2"), ("x", "3")])),
        ];
        for (l, r) in &cases {
            assert_partition(l, r, &reconcile(l, r));
        }
    }
}
