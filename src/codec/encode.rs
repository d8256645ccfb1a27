//! Потоковая запись дерева тегов в проводной формат.
//!
//! Обход строго pre-order. Для каждого узла пишется OPEN с заголовком и
//! обязательный VALUE либо NOVALUE; маркеры CLOSE пишутся только после
//! листьев: от листа идём вверх, пока текущий узел — последний ребёнок
//! своего родителя, по CLOSE на каждый шаг, и ещё один CLOSE за уровень
//! самого листа. Так серия «конец поддерева, и ещё, и ещё…» передаётся
//! без явного поля глубины.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::trace;

use crate::{
    error::EncodeError,
    tag::{TagId, TagTree},
};

use super::markers::{
    MARKER_CLOSE, MARKER_NOVALUE, MARKER_OPEN, MARKER_VALUE, MAX_TITLE_LEN, MAX_VALUE_LEN,
};

/// Пишет одно поддерево, начиная с `top`.
///
/// Перед первым байтом всё поддерево валидируется, поэтому при ошибке
/// в поток не попадает ничего (никакого частичного вывода).
pub fn write_tag<W: Write>(w: &mut W, tree: &TagTree, top: TagId) -> Result<(), EncodeError> {
    validate(tree, top)?;
    emit(w, tree, top, top)
}

/// Пишет лес: все верхние теги дерева по порядку.
///
/// Протокол закрытия сам возвращает неявный курсор к корню после
/// каждого верхнего тега, отдельных разделителей между деревьями нет.
pub fn write_forest<W: Write>(w: &mut W, tree: &TagTree) -> Result<(), EncodeError> {
    for &top in tree.children(tree.root()) {
        validate(tree, top)?;
    }
    for &top in tree.children(tree.root()) {
        emit(w, tree, top, top)?;
    }
    Ok(())
}

/// Кодирует поддерево в буфер.
pub fn encode_tag(tree: &TagTree, top: TagId) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    write_tag(&mut buf, tree, top)?;
    Ok(buf)
}

/// Кодирует весь лес в буфер.
pub fn encode_forest(tree: &TagTree) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    write_forest(&mut buf, tree)?;
    Ok(buf)
}

/// Проверяет пределы формата до записи единственного байта.
fn validate(tree: &TagTree, id: TagId) -> Result<(), EncodeError> {
    let title_len = tree.title(id).len();
    if title_len == 0 {
        return Err(EncodeError::EmptyTitle);
    }
    if title_len > MAX_TITLE_LEN {
        return Err(EncodeError::TitleTooLong { len: title_len });
    }
    if let Some(value) = tree.value(id) {
        if value.len() > MAX_VALUE_LEN {
            return Err(EncodeError::ValueTooLong { len: value.len() });
        }
    }
    for &child in tree.children(id) {
        validate(tree, child)?;
    }
    Ok(())
}

fn emit<W: Write>(w: &mut W, tree: &TagTree, id: TagId, top: TagId) -> Result<(), EncodeError> {
    let title = tree.title(id);
    w.write_u8(MARKER_OPEN)?;
    w.write_u8(title.len() as u8)?;
    w.write_all(title.as_bytes())?;

    // За заголовком всегда ровно один из двух маркеров,
    // декодеру никогда не приходится гадать.
    match tree.value(id) {
        Some(value) => {
            w.write_u8(MARKER_VALUE)?;
            w.write_u16::<LittleEndian>(value.len() as u16)?;
            w.write_all(value)?;
        }
        None => w.write_u8(MARKER_NOVALUE)?,
    }
    trace!(title, "encoded tag header");

    for &child in tree.children(id) {
        emit(w, tree, child, top)?;
    }

    if tree.children(id).is_empty() {
        // Закрытие происходит только на листьях: поднимаемся, пока узел —
        // последний ребёнок родителя (не выходя за верх поддерева),
        // затем один CLOSE за уровень самого листа.
        let mut cur = id;
        while cur != top && tree.is_last_child(cur) {
            w.write_u8(MARKER_CLOSE)?;
            cur = tree.parent(cur).unwrap_or(top);
        }
        w.write_u8(MARKER_CLOSE)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::tag::Tag;

    use super::*;

    fn attach_new(tree: &mut TagTree, parent: TagId, tag: Tag) -> TagId {
        let id = tree.insert(tag);
        tree.attach_child(parent, id).unwrap();
        id
    }

    #[test]
    fn test_single_leaf_encoding() {
        let mut tree = TagTree::new();
        let root = tree.root();
        let main = attach_new(&mut tree, root, Tag::new("ab"));

        let bytes = encode_tag(&tree, main).unwrap();
        assert_eq!(
            bytes,
            vec![
                MARKER_OPEN,
                2,
                b'a',
                b'b',
                MARKER_NOVALUE,
                MARKER_CLOSE,
            ]
        );
    }

    #[test]
    fn test_leaf_with_value_encoding() {
        let mut tree = TagTree::new();
        let root = tree.root();
        let main = attach_new(&mut tree, root, Tag::with_value("x", vec![0xAA, 0xBB]));

        let bytes = encode_tag(&tree, main).unwrap();
        assert_eq!(
            bytes,
            vec![
                MARKER_OPEN,
                1,
                b'x',
                MARKER_VALUE,
                2,
                0, // u16 LE длина
                0xAA,
                0xBB,
                MARKER_CLOSE,
            ]
        );
    }

    #[test]
    fn test_close_run_for_nested_last_children() {
        // main -> a -> b: лист b закрывает три уровня одной серией CLOSE.
        let mut tree = TagTree::new();
        let root = tree.root();
        let main = attach_new(&mut tree, root, Tag::new("m"));
        let a = attach_new(&mut tree, main, Tag::new("a"));
        let _b = attach_new(&mut tree, a, Tag::new("b"));

        let bytes = encode_tag(&tree, main).unwrap();
        let closes = bytes.iter().filter(|&&b| b == MARKER_CLOSE).count();
        assert_eq!(closes, 3);
        assert_eq!(&bytes[bytes.len() - 3..], &[MARKER_CLOSE; 3]);
    }

    #[test]
    fn test_middle_child_closes_once() {
        // first не последний ребёнок, после него ровно один CLOSE.
        let mut tree = TagTree::new();
        let root = tree.root();
        let main = attach_new(&mut tree, root, Tag::new("m"));
        attach_new(&mut tree, main, Tag::new("first"));
        attach_new(&mut tree, main, Tag::new("last"));

        let bytes = encode_tag(&tree, main).unwrap();
        let expected = vec![
            MARKER_OPEN, 1, b'm', MARKER_NOVALUE,
            MARKER_OPEN, 5, b'f', b'i', b'r', b's', b't', MARKER_NOVALUE, MARKER_CLOSE,
            MARKER_OPEN, 4, b'l', b'a', b's', b't', MARKER_NOVALUE, MARKER_CLOSE, MARKER_CLOSE,
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_title_boundaries() {
        let mut tree = TagTree::new();
        let root = tree.root();
        let ok = attach_new(&mut tree, root, Tag::new("a".repeat(255)));
        assert!(encode_tag(&tree, ok).is_ok());

        let mut tree = TagTree::new();
        let root = tree.root();
        let too_long = attach_new(&mut tree, root, Tag::new("a".repeat(256)));
        let mut out = Vec::new();
        let err = write_tag(&mut out, &tree, too_long).unwrap_err();
        assert!(matches!(err, EncodeError::TitleTooLong { len: 256 }));
        // Ни одного байта до ошибки.
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut tree = TagTree::new();
        let root = tree.root();
        let bad = attach_new(&mut tree, root, Tag::new(""));
        let err = encode_tag(&tree, bad).unwrap_err();
        assert!(matches!(err, EncodeError::EmptyTitle));
    }

    #[test]
    fn test_value_boundaries() {
        let mut tree = TagTree::new();
        let root = tree.root();
        let ok = attach_new(
            &mut tree,
            root,
            Tag::with_value("v", vec![0u8; MAX_VALUE_LEN]),
        );
        assert!(encode_tag(&tree, ok).is_ok());

        let mut tree = TagTree::new();
        let root = tree.root();
        let too_long = attach_new(
            &mut tree,
            root,
            Tag::with_value("v", vec![0u8; MAX_VALUE_LEN + 1]),
        );
        let mut out = Vec::new();
        let err = write_tag(&mut out, &tree, too_long).unwrap_err();
        assert!(matches!(err, EncodeError::ValueTooLong { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_deep_child_leaves_stream_untouched() {
        // Ошибка глубоко в поддереве обнаруживается валидацией заранее.
        let mut tree = TagTree::new();
        let root = tree.root();
        let main = attach_new(&mut tree, root, Tag::new("m"));
        let a = attach_new(&mut tree, main, Tag::new("a"));
        attach_new(&mut tree, a, Tag::new("b".repeat(300)));

        let mut out = Vec::new();
        assert!(write_tag(&mut out, &tree, main).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_forest_encoding_is_concatenation() {
        let mut tree = TagTree::new();
        let root = tree.root();
        let one = attach_new(&mut tree, root, Tag::new("one"));
        let two = attach_new(&mut tree, root, Tag::new("two"));

        let forest = encode_forest(&tree).unwrap();
        let mut expected = encode_tag(&tree, one).unwrap();
        expected.extend(encode_tag(&tree, two).unwrap());
        assert_eq!(forest, expected);
    }
}
