//! Транспорт: TCP-слушатель, принимающий документы с префиксом длины.
//!
//! Фрейминг целиком лежит на транспорте: кодек получает байт-в-байт
//! полное сообщение и ничего не знает о сокетах.

pub mod server;

pub use server::{serve, serve_on, TreeHandler, MAX_FRAME_LEN};
