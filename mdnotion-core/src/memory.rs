//! In-memory [`PageStore`] with a call log and one-shot failure injection.
//!
//! Used by the test suites of every crate in the workspace. Appended blocks are
//! stored in their listed form so a later pass reads back exactly what an
//! earlier pass wrote.

use std::cell::RefCell;
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::blocks::Block;
use crate::error::StoreError;
use crate::store::{ChildPage, Page, PageStore, RemoteBlock};
use crate::types::{RemoteId, Title};

/// A call received by a [`MemoryStore`], failed calls included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    RetrievePage { id: RemoteId },
    ListChildren { id: RemoteId },
    CreatePage { parent: RemoteId, title: Title },
    AppendChildren { id: RemoteId, count: usize },
    DeleteBlock { id: RemoteId },
}

/// A failure armed on a [`MemoryStore`]. Each fault fires once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Fail `create_page` for this title.
    CreatePage { title: Title },
    /// Fail `append_children` on the page with this title.
    AppendChildren { title: Title },
    /// Fail `delete_block` for this id.
    DeleteBlock { id: RemoteId },
    /// Fail `list_children` for this id.
    ListChildren { id: RemoteId },
    /// Report `list_children` for this id as not found.
    ListChildrenNotFound { id: RemoteId },
}

#[derive(Debug, Default)]
struct State {
    /// Page id → title. Roots have the empty title.
    pages: IndexMap<RemoteId, Title>,
    children: HashMap<RemoteId, Vec<RemoteBlock>>,
    next_id: u64,
    calls: Vec<StoreCall>,
    faults: Vec<Fault>,
}

impl State {
    fn mint(&mut self, prefix: &str) -> RemoteId {
        self.next_id += 1;
        RemoteId(format!("{prefix}-{}", self.next_id))
    }

    fn take_fault(&mut self, matches: impl Fn(&Fault) -> bool) -> Option<Fault> {
        let pos = self.faults.iter().position(matches)?;
        Some(self.faults.remove(pos))
    }

    fn insert_page(&mut self, parent: &RemoteId, title: &Title) -> RemoteId {
        let id = self.mint("page");
        self.pages.insert(id.clone(), title.clone());
        self.children.insert(id.clone(), Vec::new());
        self.children
            .entry(parent.clone())
            .or_default()
            .push(RemoteBlock {
                id: id.clone(),
                block_type: "child_page".to_string(),
                archived: false,
                in_trash: false,
                child_page: Some(ChildPage {
                    title: title.0.clone(),
                }),
                paragraph: None,
            });
        id
    }

    fn insert_blocks(&mut self, id: &RemoteId, blocks: &[Block]) -> Result<(), StoreError> {
        let mut listed = Vec::with_capacity(blocks.len());
        for block in blocks {
            let block_id = self.mint("blk");
            listed.push(RemoteBlock::from_block(block_id, block)?);
        }
        self.children.entry(id.clone()).or_default().extend(listed);
        Ok(())
    }

    fn remove(&mut self, id: &RemoteId) -> bool {
        let mut found = false;
        for blocks in self.children.values_mut() {
            let before = blocks.len();
            blocks.retain(|b| &b.id != id);
            found |= blocks.len() != before;
        }
        if self.pages.shift_remove(id).is_some() {
            self.children.remove(id);
            found = true;
        }
        found
    }

    fn exists(&self, id: &RemoteId) -> bool {
        self.pages.contains_key(id)
    }
}

/// Thread-confined fake of the Notion page tree.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RefCell<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding one root page with the given id.
    pub fn with_root(root: &RemoteId) -> Self {
        let store = Self::new();
        store.add_root(root);
        store
    }

    pub fn add_root(&self, id: &RemoteId) {
        let mut state = self.state.borrow_mut();
        state.pages.insert(id.clone(), Title::from(""));
        state.children.entry(id.clone()).or_default();
    }

    /// Seed a child page without logging a call.
    pub fn add_page(&self, parent: &RemoteId, title: &str) -> RemoteId {
        self.state
            .borrow_mut()
            .insert_page(parent, &Title::from(title))
    }

    /// Seed blocks under `id` without logging a call.
    pub fn add_blocks(&self, id: &RemoteId, blocks: &[Block]) -> Result<(), StoreError> {
        self.state.borrow_mut().insert_blocks(id, blocks)
    }

    /// Seed an already-listed block, e.g. an archived page entry.
    pub fn add_remote_block(&self, parent: &RemoteId, block: RemoteBlock) {
        self.state
            .borrow_mut()
            .children
            .entry(parent.clone())
            .or_default()
            .push(block);
    }

    pub fn inject(&self, fault: Fault) {
        self.state.borrow_mut().faults.push(fault);
    }

    /// Current children of `id`; empty if unknown.
    pub fn children(&self, id: &RemoteId) -> Vec<RemoteBlock> {
        self.state
            .borrow()
            .children
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    /// Titles of the live child pages of `parent`, in order.
    pub fn page_titles(&self, parent: &RemoteId) -> Vec<String> {
        self.children(parent)
            .iter()
            .filter_map(|b| b.child_page_title().map(str::to_string))
            .collect()
    }

    /// Id of the child page of `parent` titled `title`.
    pub fn page_id(&self, parent: &RemoteId, title: &str) -> Option<RemoteId> {
        self.children(parent)
            .into_iter()
            .find(|b| b.child_page_title() == Some(title))
            .map(|b| b.id)
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Number of mutating calls logged (create, append, delete).
    pub fn mutation_count(&self) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    StoreCall::CreatePage { .. }
                        | StoreCall::AppendChildren { .. }
                        | StoreCall::DeleteBlock { .. }
                )
            })
            .count()
    }

    fn log(&self, call: StoreCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl PageStore for MemoryStore {
    fn retrieve_page(&self, id: &RemoteId) -> Result<Page, StoreError> {
        self.log(StoreCall::RetrievePage { id: id.clone() });
        let state = self.state.borrow();
        if !state.exists(id) {
            return Err(StoreError::NotFound { id: id.0.clone() });
        }
        Ok(Page {
            id: id.clone(),
            url: None,
        })
    }

    fn list_children(&self, id: &RemoteId) -> Result<Vec<RemoteBlock>, StoreError> {
        self.log(StoreCall::ListChildren { id: id.clone() });
        let mut state = self.state.borrow_mut();
        if let Some(fault) = state.take_fault(|f| match f {
            Fault::ListChildren { id: fid } | Fault::ListChildrenNotFound { id: fid } => fid == id,
            _ => false,
        }) {
            return Err(match fault {
                Fault::ListChildrenNotFound { .. } => StoreError::NotFound { id: id.0.clone() },
                _ => StoreError::Injected(format!("list children of {id}")),
            });
        }
        if !state.exists(id) {
            return Err(StoreError::NotFound { id: id.0.clone() });
        }
        Ok(state.children.get(id).cloned().unwrap_or_default())
    }

    fn create_page(&self, parent: &RemoteId, title: &Title) -> Result<Page, StoreError> {
        self.log(StoreCall::CreatePage {
            parent: parent.clone(),
            title: title.clone(),
        });
        let mut state = self.state.borrow_mut();
        if state
            .take_fault(|f| matches!(f, Fault::CreatePage { title: t } if t == title))
            .is_some()
        {
            return Err(StoreError::Injected(format!("create page {title}")));
        }
        if !state.exists(parent) {
            return Err(StoreError::NotFound {
                id: parent.0.clone(),
            });
        }
        let id = state.insert_page(parent, title);
        Ok(Page { id, url: None })
    }

    fn append_children(&self, id: &RemoteId, blocks: &[Block]) -> Result<(), StoreError> {
        self.log(StoreCall::AppendChildren {
            id: id.clone(),
            count: blocks.len(),
        });
        let mut state = self.state.borrow_mut();
        let Some(title) = state.pages.get(id).cloned() else {
            return Err(StoreError::NotFound { id: id.0.clone() });
        };
        if state
            .take_fault(|f| matches!(f, Fault::AppendChildren { title: t } if *t == title))
            .is_some()
        {
            return Err(StoreError::Injected(format!("append to {title}")));
        }
        state.insert_blocks(id, blocks)
    }

    fn delete_block(&self, id: &RemoteId) -> Result<(), StoreError> {
        self.log(StoreCall::DeleteBlock { id: id.clone() });
        let mut state = self.state.borrow_mut();
        if state
            .take_fault(|f| matches!(f, Fault::DeleteBlock { id: fid } if fid == id))
            .is_some()
        {
            return Err(StoreError::Injected(format!("delete {id}")));
        }
        if !state.remove(id) {
            return Err(StoreError::NotFound { id: id.0.clone() });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::RichText;

    fn root() -> RemoteId {
        RemoteId::from("root")
    }

    #[test]
    fn created_pages_are_listed_under_parent() {
        let store = MemoryStore::with_root(&root());
        let page = store
            .create_page(&root(), &Title::from("Guide"))
            .expect("create");
        assert_eq!(store.page_titles(&root()), vec!["Guide"]);
        assert_eq!(store.page_id(&root(), "Guide"), Some(page.id.clone()));
        assert!(store.retrieve_page(&page.id).is_ok());
    }

    #[test]
    fn appended_blocks_read_back_in_order() {
        let store = MemoryStore::with_root(&root());
        let page = store.add_page(&root(), "A");
        store
            .append_children(
                &page,
                &[
                    Block::divider(),
                    Block::paragraph(vec![RichText::plain("last")]),
                ],
            )
            .expect("append");
        let children = store.children(&page);
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].block_type, "divider");
        assert_eq!(children[1].block_type, "paragraph");
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let store = MemoryStore::with_root(&root());
        let missing = RemoteId::from("nope");
        assert!(store.retrieve_page(&missing).expect_err("err").is_not_found());
        assert!(store.list_children(&missing).expect_err("err").is_not_found());
        assert!(store.delete_block(&missing).expect_err("err").is_not_found());
    }

    #[test]
    fn faults_fire_once() {
        let store = MemoryStore::with_root(&root());
        store.inject(Fault::CreatePage {
            title: Title::from("X"),
        });
        assert!(store.create_page(&root(), &Title::from("X")).is_err());
        assert!(store.create_page(&root(), &Title::from("X")).is_ok());
    }

    #[test]
    fn append_fault_targets_page_by_title() {
        let store = MemoryStore::with_root(&root());
        let a = store.add_page(&root(), "A");
        let b = store.add_page(&root(), "B");
        store.inject(Fault::AppendChildren {
            title: Title::from("B"),
        });
        assert!(store.append_children(&a, &[Block::divider()]).is_ok());
        assert!(store.append_children(&b, &[Block::divider()]).is_err());
    }

    #[test]
    fn deleting_a_page_removes_it_from_parent() {
        let store = MemoryStore::with_root(&root());
        let page = store.add_page(&root(), "Gone");
        store.delete_block(&page).expect("delete");
        assert!(store.page_titles(&root()).is_empty());
        assert!(store.retrieve_page(&page).is_err());
    }

    #[test]
    fn every_call_is_logged() {
        let store = MemoryStore::with_root(&root());
        store.retrieve_page(&root()).expect("retrieve");
        store.list_children(&root()).expect("list");
        let _ = store.delete_block(&RemoteId::from("missing"));
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::RetrievePage { id: root() },
                StoreCall::ListChildren { id: root() },
                StoreCall::DeleteBlock {
                    id: RemoteId::from("missing")
                },
            ]
        );
        assert_eq!(store.mutation_count(), 1);
        store.clear_calls();
        assert!(store.calls().is_empty());
    }
}
