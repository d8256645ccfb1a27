//! Маркерные байты проводного формата и его жёсткие пределы.
//!
//! Грамматика потока: `tag := OPEN (VALUE | NOVALUE) tag*`,
//! лист завершается одним или несколькими CLOSE — по одному на каждый
//! закрываемый в этой точке уровень. Используется в `encode` и `decode`.

/// Тег без значения: за заголовком ничего не следует.
pub const MARKER_NOVALUE: u8 = 0x00;
/// Открытие тега: далее u8-длина заголовка и сам заголовок.
pub const MARKER_OPEN: u8 = 0x01;
/// Закрытие одного уровня вложенности.
pub const MARKER_CLOSE: u8 = 0x02;
/// Значение тега: далее u16 LE длина и байты значения.
pub const MARKER_VALUE: u8 = 0x03;

/// Максимальная длина заголовка в байтах (однобайтовая длина на проводе).
pub const MAX_TITLE_LEN: usize = u8::MAX as usize;
/// Максимальная длина значения в байтах (двухбайтовая длина на проводе).
pub const MAX_VALUE_LEN: usize = u16::MAX as usize;
