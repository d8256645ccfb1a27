//! Узлы дерева тегов и арена, которая ими владеет.
//!
//! [`Tag`] — это ещё не прикреплённый узел: заголовок плюс необязательное
//! байтовое значение. Всё остальное (дети, родитель, флаг активности)
//! появляется только после вставки в [`TagTree`] и управляется самой ареной.

use crate::error::TagError;

/// Заголовок синтетического корня. На провод он никогда не попадает.
pub const ROOT_TITLE: &str = "root";

/// Индекс узла в арене [`TagTree`].
///
/// Идентификатор валиден только внутри породившего его дерева;
/// обращение с чужим `TagId` — ошибка программирования.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagId(u32);

/// Отсоединённый тег: заголовок и необязательное значение.
///
/// Отсутствующее значение и пустое значение — разные вещи:
/// на проводе первое кодируется маркером NOVALUE, второе — VALUE
/// с нулевой длиной.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub title: String,
    pub value: Option<Vec<u8>>,
}

impl Tag {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: None,
        }
    }

    pub fn with_value(title: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            title: title.into(),
            value: Some(value.into()),
        }
    }
}

/// Внутреннее представление узла в арене.
#[derive(Debug, Clone)]
struct Node {
    title: String,
    value: Option<Vec<u8>>,
    children: Vec<TagId>,
    parent: Option<TagId>,
    active: bool,
}

/// Арена узлов, закреплённая за одним синтетическим корнем.
///
/// Дерево ацикличное и строго однородительское: узел попадает в список
/// детей не более одного раза, список детей растёт только пока узел
/// активен. После деактивации структура узла заморожена.
#[derive(Debug, Clone)]
pub struct TagTree {
    nodes: Vec<Node>,
}

impl TagTree {
    /// Создаёт пустое дерево с одним синтетическим корнем.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                title: ROOT_TITLE.to_string(),
                value: None,
                children: Vec::new(),
                parent: None,
                active: true,
            }],
        }
    }

    pub fn root(&self) -> TagId {
        TagId(0)
    }

    /// Кол-во узлов в арене, включая синтетический корень и ещё
    /// не прикреплённые узлы. Не путать с [`TagTree::is_empty`]:
    /// та смотрит только на верхние теги.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Пустым считается дерево без верхних тегов; корень есть всегда.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Кладёт отсоединённый тег в арену. Узел ещё ни к кому не прикреплён.
    pub fn insert(&mut self, tag: Tag) -> TagId {
        let id = TagId(self.nodes.len() as u32);
        self.nodes.push(Node {
            title: tag.title,
            value: tag.value,
            children: Vec::new(),
            parent: None,
            active: true,
        });
        id
    }

    /// Прикрепляет `child` последним ребёнком `parent`.
    ///
    /// Родитель обязан быть активным, ребёнок — ещё не прикреплённым
    /// (однородительский инвариант).
    pub fn attach_child(&mut self, parent: TagId, child: TagId) -> Result<(), TagError> {
        if !self.node(parent).active {
            return Err(TagError::InactiveParent {
                title: self.node(parent).title.clone(),
            });
        }
        if self.node(child).parent.is_some() || child == self.root() {
            return Err(TagError::AlreadyAttached);
        }
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
        Ok(())
    }

    /// Снимает флаг активности. Повторный вызов — no-op.
    pub fn deactivate(&mut self, id: TagId) {
        self.node_mut(id).active = false;
    }

    pub fn is_active(&self, id: TagId) -> bool {
        self.node(id).active
    }

    pub fn title(&self, id: TagId) -> &str {
        &self.node(id).title
    }

    pub fn value(&self, id: TagId) -> Option<&[u8]> {
        self.node(id).value.as_deref()
    }

    /// Заменяет значение узла. `None` стирает значение совсем.
    pub fn set_value(&mut self, id: TagId, value: Option<Vec<u8>>) {
        self.node_mut(id).value = value;
    }

    pub fn children(&self, id: TagId) -> &[TagId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: TagId) -> Option<TagId> {
        self.node(id).parent
    }

    /// Является ли узел последним ребёнком своего родителя.
    /// Для корня всегда `false`.
    pub fn is_last_child(&self, id: TagId) -> bool {
        match self.node(id).parent {
            Some(p) => self.node(p).children.last() == Some(&id),
            None => false,
        }
    }

    /// Поиск в слое: сам узел, затем его непосредственные дети.
    pub fn find_in_layer(&self, layer: TagId, title: &str) -> Option<TagId> {
        if self.node(layer).title == title {
            return Some(layer);
        }
        self.node(layer)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).title == title)
    }

    /// Полный поиск в глубину от корня, первый найденный узел.
    pub fn find_from_root(&self, title: &str) -> Option<TagId> {
        self.find_from(self.root(), title)
    }

    /// Поиск в глубину от произвольного узла (pre-order).
    pub fn find_from(&self, start: TagId, title: &str) -> Option<TagId> {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if self.node(id).title == title {
                return Some(id);
            }
            // Дети кладутся в обратном порядке, чтобы обход шёл слева направо.
            stack.extend(self.node(id).children.iter().rev());
        }
        None
    }

    /// Структурное равенство поддеревьев: заголовки, байты значений и
    /// списки детей поэлементно, рекурсивно. Флаг активности не сравнивается.
    pub fn structural_eq(&self, a: TagId, other: &TagTree, b: TagId) -> bool {
        let na = self.node(a);
        let nb = other.node(b);
        na.title == nb.title
            && na.value == nb.value
            && na.children.len() == nb.children.len()
            && na
                .children
                .iter()
                .zip(&nb.children)
                .all(|(&ca, &cb)| self.structural_eq(ca, other, cb))
    }

    fn node(&self, id: TagId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: TagId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }
}

impl Default for TagTree {
    fn default() -> Self {
        Self::new()
    }
}
