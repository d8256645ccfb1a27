//! Навигационная обёртка над файлом: открыть, полностью декодировать,
//! ходить по дереву курсором, править значения и сохранять обратно.
//!
//! Вся работа с форматом делегируется в [`crate::codec`]; здесь только
//! файловая граница и текущая позиция.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    codec::{
        decode::read_document,
        encode::encode_forest,
        value::{decode_optimized_int, decode_text, encode_optimized_int, encode_text},
    },
    error::DocumentError,
    tag::{TagId, TagTree},
};

/// Документ с деревом тегов и текущей позицией навигации.
#[derive(Debug)]
pub struct TagDocument {
    path: PathBuf,
    tree: TagTree,
    current: TagId,
}

impl TagDocument {
    /// Открывает и полностью декодирует файл; позиция — на корне.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref().to_path_buf();
        let tree = Self::parse(&path)?;
        let current = tree.root();
        debug!(path = %path.display(), nodes = tree.node_count(), "document opened");
        Ok(Self {
            path,
            tree,
            current,
        })
    }

    fn parse(path: &Path) -> Result<TagTree, DocumentError> {
        let file = File::open(path).map_err(|source| DocumentError::StreamUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(read_document(BufReader::new(file))?)
    }

    /// Перечитывает другой файл, сбрасывая дерево и позицию.
    pub fn change_file(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref().to_path_buf();
        let tree = Self::parse(&path)?;
        self.current = tree.root();
        self.tree = tree;
        self.path = path;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tree(&self) -> &TagTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TagTree {
        &mut self.tree
    }

    pub fn current(&self) -> TagId {
        self.current
    }

    pub fn title(&self) -> &str {
        self.tree.title(self.current)
    }

    /// Ищет тег в слое текущего узла и переходит в него при попадании.
    /// Промах — обычный результат, позиция не меняется.
    pub fn find_in_layer(&mut self, title: &str) -> Option<TagId> {
        let found = self.tree.find_in_layer(self.current, title)?;
        self.current = found;
        Some(found)
    }

    /// Полный поиск от корня с переходом при попадании.
    pub fn find_from_root(&mut self, title: &str) -> Option<TagId> {
        let found = self.tree.find_from_root(title)?;
        self.current = found;
        Some(found)
    }

    /// Поднимается к родителю; `false`, если позиция уже на корне.
    pub fn go_up(&mut self) -> bool {
        match self.tree.parent(self.current) {
            Some(parent) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    pub fn go_to_root(&mut self) {
        self.current = self.tree.root();
    }

    /// Число из значения текущего тега.
    pub fn value_int(&self) -> Result<i32, DocumentError> {
        Ok(decode_optimized_int(self.value_bytes()?)?)
    }

    /// Строка из значения текущего тега.
    pub fn value_str(&self) -> Result<String, DocumentError> {
        Ok(decode_text(self.value_bytes()?)?)
    }

    fn value_bytes(&self) -> Result<&[u8], DocumentError> {
        self.tree
            .value(self.current)
            .ok_or_else(|| DocumentError::NoValue {
                title: self.title().to_string(),
            })
    }

    pub fn set_value_int(&mut self, n: i32) {
        self.tree
            .set_value(self.current, Some(encode_optimized_int(n)));
    }

    pub fn set_value_str(&mut self, s: &str) {
        self.tree.set_value(self.current, Some(encode_text(s)));
    }

    /// Сохраняет весь лес обратно в файл документа.
    pub fn save(&self) -> Result<(), DocumentError> {
        self.save_as(&self.path)
    }

    /// Сохраняет в произвольный файл, не меняя путь документа.
    ///
    /// Сначала лес целиком кодируется в память, затем пишется во временный
    /// файл рядом и подменяет целевой переименованием: при любой ошибке
    /// прежнее содержимое файла остаётся нетронутым.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let bytes = encode_forest(&self.tree)?;

        let tmp_path: PathBuf = {
            let mut os = path.as_os_str().to_os_string();
            os.push(".tmp");
            os.into()
        };
        let file = File::create(&tmp_path).map_err(|source| DocumentError::StreamUnavailable {
            path: tmp_path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes)?;
        writer.flush()?;
        fs::rename(&tmp_path, path)?;
        debug!(path = %path.display(), "document saved");
        Ok(())
    }
}
