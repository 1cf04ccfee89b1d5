//! # 세션 저장소(SessionStore) 추상화
//!
//! 브라우저의 localStorage처럼 "문자열 키 → 문자열 값"을 보관하는 저장소입니다.
//! `SessionManager`는 이 트레이트에만 의존하므로,
//! 만료 정책(30분)을 저장 방식과 분리해서 테스트할 수 있습니다.
//!
//! 구현체:
//! - `MemorySessionStore`: 프로세스 메모리 (테스트, 단일 프로세스 클라이언트)
//! - `FileSessionStore`: JSON 파일 하나 (CLI/데스크톱 클라이언트에서 localStorage 대용)

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// 세션 저장소 에러
#[derive(Debug, Error)]
pub enum StoreError {
    /// 파일 읽기/쓰기 실패
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 저장된 값의 JSON 파싱/생성 실패
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 저장소를 사용할 수 없음 (잠금 오염 등)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// 키-값 세션 저장소
///
/// 모든 메서드는 `&self`를 받습니다. 내부 가변성은 구현체가 책임집니다.
pub trait SessionStore: Send + Sync {
    /// 키에 저장된 값을 읽습니다. 없으면 `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// 키에 값을 저장합니다. 기존 값은 덮어씁니다.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// 키를 삭제합니다. 없는 키를 삭제해도 에러가 아닙니다.
    fn clear(&self, key: &str) -> Result<(), StoreError>;
}

/// 메모리 기반 저장소
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// JSON 파일 기반 저장소
///
/// 파일 전체가 하나의 JSON 객체(`{ "key": "value", ... }`)입니다.
/// `set`/`clear`마다 파일을 통째로 다시 씁니다. 데이터가 몇 개의 키뿐이므로 충분합니다.
/// 새 내용은 같은 디렉토리의 임시 파일에 쓴 뒤 rename으로 교체하므로,
/// 잠금 없이 읽는 `get`도 이전 내용이나 새 내용 중 하나만 봅니다.
/// 같은 파일을 여러 프로세스가 동시에 쓰는 경우는 고려하지 않습니다.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    // 같은 프로세스 안에서 읽기-수정-쓰기가 겹치지 않도록 잠급니다
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 파일을 읽어 맵으로 변환합니다. 파일이 없으면 빈 맵입니다.
    fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // rename이 원자적이려면 임시 파일이 대상과 같은 파일시스템에 있어야 합니다
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(serde_json::to_string_pretty(entries)?.as_bytes())?;
        tmp.as_file().sync_all()?;
        // persist 실패 시 PersistError 안의 io::Error만 꺼냅니다 (임시 파일은 drop 때 삭제)
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn modify(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let mut entries = self.load()?;
        f(&mut entries);
        self.save(&entries)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set_clear() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        store.clear("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.clear("missing").unwrap();
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileSessionStore::new(&path);
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "hello").unwrap();
        store.set("other", "x").unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("hello"));
        reopened.clear("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert_eq!(store.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn file_store_readers_never_see_partial_writes() {
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let store = Arc::new(FileSessionStore::new(&path));
        store.set("k", "initial").unwrap();

        // 큰 값을 계속 덮어쓰는 동안 다른 스레드가 잠금 없이 읽습니다
        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..200 {
                    let value = format!("{i}-{}", "x".repeat(64 * 1024));
                    store.set("k", &value).unwrap();
                }
            })
        };
        let reader = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..500 {
                    let value = store.get("k").expect("read during write must parse");
                    assert!(value.is_some());
                }
            })
        };
        writer.join().unwrap();
        reader.join().unwrap();

        // 임시 파일이 남지 않고 대상 파일 하나만 있어야 합니다
        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn file_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(matches!(store.get("k"), Err(StoreError::Serialization(_))));
    }
}
