//! TCP-слушатель документов с деревьями тегов.
//!
//! Проводной формат транспорта: u16 little-endian длина сообщения,
//! затем ровно столько байт одного полного документа. Накопленное
//! сообщение отдаётся декодеру как есть; ошибка декодирования
//! закрывает соединение, других клиентов не задевая.

use std::io::ErrorKind;

use tokio::{
    io::AsyncReadExt,
    net::{TcpListener, TcpStream},
};
use tracing::{debug, error, info};

use crate::{codec::decode::read_document, error::NetworkError, tag::TagTree};

/// Максимальный размер одного сообщения, ограничен u16-префиксом.
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Обработчик полностью декодированного документа.
///
/// Вызывается из задачи соединения, поэтому должен быть `Send + Sync`
/// и клонироваться на каждое соединение.
pub trait TreeHandler: Fn(TagTree) + Clone + Send + Sync + 'static {}

impl<F> TreeHandler for F where F: Fn(TagTree) + Clone + Send + Sync + 'static {}

/// Привязывается к адресу и обслуживает соединения до отмены задачи.
pub async fn serve<H: TreeHandler>(addr: &str, handler: H) -> Result<(), NetworkError> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, handler).await
}

/// Обслуживает уже привязанный слушатель (удобно для тестов:
/// порт выбирается заранее).
pub async fn serve_on<H: TreeHandler>(
    listener: TcpListener,
    handler: H,
) -> Result<(), NetworkError> {
    info!(addr = %listener.local_addr()?, "listening");

    loop {
        let (socket, peer) = listener.accept().await?;
        debug!(%peer, "accepted connection");
        let handler = handler.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, handler).await {
                error!(%peer, "connection error: {e}");
            }
        });
    }
}

async fn handle_connection<H: TreeHandler>(
    mut socket: TcpStream,
    handler: H,
) -> Result<(), NetworkError> {
    loop {
        // Чистое закрытие допустимо только на границе фрейма.
        let len = match socket.read_u16_le().await {
            Ok(len) => len as usize,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                debug!("peer disconnected");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let mut payload = vec![0u8; len];
        socket.read_exact(&mut payload).await?;

        let tree = read_document(payload.as_slice())?;
        debug!(bytes = len, nodes = tree.node_count(), "frame decoded");
        handler(tree);
    }
}

#[cfg(test)]
mod tests {
    use tokio::{io::AsyncWriteExt, sync::mpsc};

    use crate::{
        codec::encode::encode_tag,
        tag::{Tag, TagTree},
    };

    use super::*;

    async fn spawn_server() -> (std::net::SocketAddr, mpsc::UnboundedReceiver<TagTree>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(serve_on(listener, move |tree: TagTree| {
            let _ = tx.send(tree);
        }));
        (addr, rx)
    }

    fn sample_frame() -> (TagTree, Vec<u8>) {
        let mut tree = TagTree::new();
        let main = tree.insert(Tag::new("main"));
        tree.attach_child(tree.root(), main).unwrap();
        let child = tree.insert(Tag::with_value("child", vec![1, 2, 3]));
        tree.attach_child(main, child).unwrap();

        let payload = encode_tag(&tree, main).unwrap();
        let mut frame = (payload.len() as u16).to_le_bytes().to_vec();
        frame.extend(&payload);
        (tree, frame)
    }

    #[tokio::test]
    async fn test_frame_is_decoded_and_handed_over() {
        let (addr, mut rx) = spawn_server().await;
        let (tree, frame) = sample_frame();

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(&frame).await.unwrap();
        client.flush().await.unwrap();

        let received = rx.recv().await.unwrap();
        assert!(tree.structural_eq(tree.root(), &received, received.root()));
    }

    #[tokio::test]
    async fn test_two_frames_on_one_connection() {
        let (addr, mut rx) = spawn_server().await;
        let (_, frame) = sample_frame();

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(&frame).await.unwrap();
        client.write_all(&frame).await.unwrap();
        client.flush().await.unwrap();

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_malformed_frame_closes_connection_quietly() {
        let (addr, mut rx) = spawn_server().await;

        // Длина заявлена, но содержимое — мусорный маркер.
        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(&1u16.to_le_bytes()).await.unwrap();
        client.write_all(&[0x7F]).await.unwrap();
        client.flush().await.unwrap();

        // Обработчик не должен получить ничего; сервер продолжает слушать.
        drop(client);
        let (tree, frame) = sample_frame();
        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(&frame).await.unwrap();
        client.flush().await.unwrap();

        let received = rx.recv().await.unwrap();
        assert!(tree.structural_eq(tree.root(), &received, received.root()));
    }
}
