//! Модель дерева тегов и инкрементальный курсор.
//!
//! Дерево хранится в арене ([`TagTree`]): каждый узел адресуется
//! индексом [`TagId`], обратная ссылка на родителя — тоже индекс,
//! поэтому владение всегда идёт строго сверху вниз.
//!
//! [`TreeCursor`] — единственный «текущий» указатель, через пару
//! операций `attach`/`close` строящий дерево без явного стека.
//! Им пользуются и программный билдер, и потоковый декодер.

pub mod cursor;
pub mod node;

pub use cursor::TreeCursor;
pub use node::{Tag, TagId, TagTree, ROOT_TITLE};
