//! Инкрементальный построитель дерева: один подвижный указатель
//! вместо явного стека.
//!
//! Ключевая механика — `attach` всегда спускается в только что
//! добавленный узел, а `close` деактивирует текущий узел и поднимается
//! к родителю. Провод декодера транслируется ровно в эти два вызова.

use crate::error::TagError;

use super::node::{Tag, TagId, TagTree};

/// Курсор, владеющий строящимся деревом.
#[derive(Debug)]
pub struct TreeCursor {
    tree: TagTree,
    current: TagId,
}

impl TreeCursor {
    /// Свежий курсор над пустым деревом, `current` — синтетический корень.
    pub fn new() -> Self {
        let tree = TagTree::new();
        let current = tree.root();
        Self { tree, current }
    }

    pub fn current(&self) -> TagId {
        self.current
    }

    pub fn at_root(&self) -> bool {
        self.current == self.tree.root()
    }

    pub fn tree(&self) -> &TagTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TagTree {
        &mut self.tree
    }

    /// Забирает построенное дерево, потребляя курсор.
    pub fn into_tree(self) -> TagTree {
        self.tree
    }

    /// Добавляет тег последним ребёнком текущего узла и спускается в него.
    pub fn attach(&mut self, tag: Tag) -> Result<TagId, TagError> {
        let id = self.tree.insert(tag);
        self.tree.attach_child(self.current, id)?;
        self.current = id;
        Ok(id)
    }

    /// Деактивирует текущий узел и поднимается к родителю.
    ///
    /// Закрыть корень нельзя: это разбалансированный поток.
    pub fn close(&mut self) -> Result<(), TagError> {
        let parent = self
            .tree
            .parent(self.current)
            .ok_or(TagError::UnbalancedClose)?;
        self.tree.deactivate(self.current);
        self.current = parent;
        Ok(())
    }

    /// Поиск в слое текущего узла (сам узел, затем его дети).
    pub fn find_in_layer(&self, layer: TagId, title: &str) -> Option<TagId> {
        self.tree.find_in_layer(layer, title)
    }

    /// Полный pre-order поиск от корня.
    pub fn find_from_root(&self, title: &str) -> Option<TagId> {
        self.tree.find_from_root(title)
    }

    /// Сбрасывает всё: старое дерево выбрасывается, курсор — на новом корне.
    pub fn reset(&mut self) {
        self.tree = TagTree::new();
        self.current = self.tree.root();
    }
}

impl Default for TreeCursor {
    fn default() -> Self {
        Self::new()
    }
}
