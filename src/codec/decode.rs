//! Потоковое восстановление дерева тегов из проводного формата.
//!
//! Один проход, по одному маркеру за раз, без заглядывания вперёд:
//! OPEN транслируется в `cursor.attach`, CLOSE — в `cursor.close`,
//! любой другой байт — повреждённая запись. Конец потока допустим
//! только когда курсор вернулся к синтетическому корню.
//!
//! Декодер строит дерево в отдельном, ещё не опубликованном курсоре
//! и отдаёт его лишь при полном успехе — наполовину построенную
//! структуру снаружи увидеть нельзя.

use std::io::{ErrorKind, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{error, trace};

use crate::{
    error::DecodeError,
    tag::{Tag, TagTree, TreeCursor},
};

use super::markers::{MARKER_CLOSE, MARKER_NOVALUE, MARKER_OPEN, MARKER_VALUE};

/// Декодирует весь документ (лес верхних тегов) из потока.
pub fn read_document<R: Read>(reader: R) -> Result<TagTree, DecodeError> {
    Decoder::new(reader).decode()
}

/// Потоковый декодер с текущим смещением для сообщений об ошибках.
pub struct Decoder<R: Read> {
    reader: R,
    offset: u64,
    cursor: TreeCursor,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            cursor: TreeCursor::new(),
        }
    }

    /// Читает поток до конца и возвращает построенное дерево.
    pub fn decode(mut self) -> Result<TagTree, DecodeError> {
        loop {
            match self.next_marker()? {
                None => break,
                Some(MARKER_OPEN) => self.read_tag()?,
                Some(MARKER_CLOSE) => {
                    if self.cursor.at_root() {
                        let err = DecodeError::UnbalancedClose {
                            offset: self.offset - 1,
                        };
                        error!("{err}");
                        return Err(err);
                    }
                    self.cursor.close()?;
                }
                Some(other) => {
                    let err = DecodeError::MalformedRecord {
                        offset: self.offset - 1,
                        reason: format!("unknown marker byte 0x{other:02X}"),
                    };
                    error!("{err}");
                    return Err(err);
                }
            }
        }

        if !self.cursor.at_root() {
            let err = DecodeError::TruncatedInput {
                offset: self.offset,
            };
            error!("{err}");
            return Err(err);
        }
        trace!(
            nodes = self.cursor.tree().node_count(),
            bytes = self.offset,
            "document decoded"
        );
        Ok(self.cursor.into_tree())
    }

    /// Одна запись OPEN: заголовок, затем обязательный VALUE или NOVALUE.
    fn read_tag(&mut self) -> Result<(), DecodeError> {
        let title_len = self.read_u8()? as usize;
        if title_len == 0 {
            return Err(DecodeError::MalformedRecord {
                offset: self.offset - 1,
                reason: "zero-length title".to_string(),
            });
        }
        let title_offset = self.offset;
        let mut title = vec![0u8; title_len];
        self.read_exact(&mut title)?;
        let title = String::from_utf8(title).map_err(|_| DecodeError::InvalidUtf8 {
            offset: title_offset,
        })?;

        let value = match self.read_u8()? {
            MARKER_VALUE => {
                let len = self.read_u16_le()? as usize;
                let mut value = vec![0u8; len];
                self.read_exact(&mut value)?;
                Some(value)
            }
            MARKER_NOVALUE => None,
            other => {
                let err = DecodeError::MalformedRecord {
                    offset: self.offset - 1,
                    reason: format!("expected VALUE or NOVALUE after title, got 0x{other:02X}"),
                };
                error!("{err}");
                return Err(err);
            }
        };

        trace!(title, "decoded tag header");
        self.cursor.attach(Tag { title, value })?;
        Ok(())
    }

    /// Следующий маркер или `None` на чистой границе записи.
    fn next_marker(&mut self) -> Result<Option<u8>, DecodeError> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.offset += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(DecodeError::Io(e)),
            }
        }
    }

    // Обязательные чтения: конец потока посреди записи — TruncatedInput.

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let b = self.reader.read_u8().map_err(|e| self.eof_or_io(e))?;
        self.offset += 1;
        Ok(b)
    }

    fn read_u16_le(&mut self) -> Result<u16, DecodeError> {
        let v = self
            .reader
            .read_u16::<LittleEndian>()
            .map_err(|e| self.eof_or_io(e))?;
        self.offset += 2;
        Ok(v)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DecodeError> {
        self.reader
            .read_exact(buf)
            .map_err(|e| self.eof_or_io(e))?;
        self.offset += buf.len() as u64;
        Ok(())
    }

    fn eof_or_io(&self, e: std::io::Error) -> DecodeError {
        if e.kind() == ErrorKind::UnexpectedEof {
            let err = DecodeError::TruncatedInput {
                offset: self.offset,
            };
            error!("{err}");
            err
        } else {
            DecodeError::Io(e)
        }
    }
}
