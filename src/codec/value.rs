//! Упаковка значений: числа минимальной ширины и текст.
//!
//! «Оптимизированное» число хранится в самом узком из трёх представлений:
//! - 0..=255 — 1 байт без знака
//! - диапазон i16 — 2 байта со знаком, little-endian
//! - иначе — 4 байта со знаком, little-endian
//!
//! Ширина при чтении определяется исключительно длиной полезной нагрузки;
//! любая другая длина — повреждённые данные, а не молчаливый ноль.

use crate::error::ValueError;

/// Кодирует `n` в самое узкое представление, которое его вмещает.
///
/// # Examples
/// ```
/// use btag::codec::value::encode_optimized_int;
///
/// assert_eq!(encode_optimized_int(3).len(), 1);
/// assert_eq!(encode_optimized_int(3005).len(), 2);
/// assert_eq!(encode_optimized_int(104_000).len(), 4);
/// ```
pub fn encode_optimized_int(n: i32) -> Vec<u8> {
    if (0..=u8::MAX as i32).contains(&n) {
        vec![n as u8]
    } else if (i16::MIN as i32..=i16::MAX as i32).contains(&n) {
        (n as i16).to_le_bytes().to_vec()
    } else {
        n.to_le_bytes().to_vec()
    }
}

/// Восстанавливает число по длине полезной нагрузки.
///
/// # Errors
/// [`ValueError::MalformedValue`] для любой ширины, кроме 1, 2 и 4 байт.
pub fn decode_optimized_int(bytes: &[u8]) -> Result<i32, ValueError> {
    match bytes {
        [b0] => Ok(*b0 as i32),
        [b0, b1] => Ok(i16::from_le_bytes([*b0, *b1]) as i32),
        [b0, b1, b2, b3] => Ok(i32::from_le_bytes([*b0, *b1, *b2, *b3])),
        other => Err(ValueError::MalformedValue { len: other.len() }),
    }
}

/// Текст всегда кодируется в UTF-8, без каких-либо platform-default кодировок.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Обратное преобразование; не-UTF-8 байты — ошибка, не замена символов.
pub fn decode_text(bytes: &[u8]) -> Result<String, ValueError> {
    Ok(String::from_utf8(bytes.to_vec())?)
}
