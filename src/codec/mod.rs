//! Сериализация и десериализация дерева тегов.
//!
//! Формат — плоский поток записей без заголовка и контрольных сумм:
//! маркер OPEN открывает тег (и курсор спускается в него), за заголовком
//! обязательно следует VALUE или NOVALUE, глубина закрывается серией
//! маркеров CLOSE. Явного поля глубины или длины поддерева нет —
//! кодер и декодер держат протокол закрытия в точном зеркале.
//!
//! ## Модули
//!
//! - [`markers`] — байты маркеров и пределы формата
//! - [`encode`] — потоковая запись дерева (pre-order)
//! - [`decode`] — потоковое восстановление дерева через курсор
//! - [`value`] — упаковка чисел минимальной ширины и текста

pub mod decode;
pub mod encode;
pub mod markers;
pub mod value;

pub use decode::{read_document, Decoder};
pub use encode::{encode_forest, encode_tag, write_forest, write_tag};
pub use markers::*;
pub use value::{decode_optimized_int, decode_text, encode_optimized_int, encode_text};
