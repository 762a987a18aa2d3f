use pagechat_core::Document;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory url → [`Document`] map behind one coarse lock.
///
/// Every operation takes the same mutex, so `clear` excludes concurrent `put`/`get`/`delete`.
/// Last write wins on re-scrape of the same URL. Entries never expire.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: Mutex<HashMap<String, Document>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Document>> {
        // Each critical section is a single map call, so a poisoned map is still consistent.
        self.docs.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert or replace the document stored for `url`.
    pub fn put(&self, url: impl Into<String>, doc: Document) {
        self.lock().insert(url.into(), doc);
    }

    /// Snapshot of the document stored for `url`.
    pub fn get(&self, url: &str) -> Option<Document> {
        self.lock().get(url).cloned()
    }

    /// Remove the document for `url`; `false` when nothing was stored.
    pub fn delete(&self, url: &str) -> bool {
        self.lock().remove(url).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Stored keys, sorted.
    pub fn urls(&self) -> Vec<String> {
        let mut out: Vec<String> = self.lock().keys().cloned().collect();
        out.sort();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn doc(url: &str, title: &str) -> Document {
        Document {
            url: url.to_string(),
            title: title.to_string(),
            content: String::new(),
            links: Vec::new(),
            content_length: 0,
        }
    }

    #[test]
    fn put_get_and_last_write_wins() {
        let s = DocumentStore::new();
        assert!(s.get("https://a.com/").is_none());
        s.put("https://a.com/", doc("https://a.com/", "first"));
        s.put("https://a.com/", doc("https://a.com/", "second"));
        assert_eq!(s.len(), 1);
        assert_eq!(s.get("https://a.com/").unwrap().title, "second");
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let s = DocumentStore::new();
        assert!(!s.delete("https://missing.com/"));

        s.put("https://a.com/", doc("https://a.com/", "a"));
        assert!(s.delete("https://a.com/"));
        assert!(s.get("https://a.com/").is_none());
        assert!(!s.delete("https://a.com/"));
    }

    #[test]
    fn clear_removes_everything() {
        let s = DocumentStore::new();
        s.put("https://b.com/", doc("https://b.com/", "b"));
        s.put("https://a.com/", doc("https://a.com/", "a"));
        assert_eq!(s.urls(), vec!["https://a.com/", "https://b.com/"]);
        s.clear();
        assert!(s.is_empty());
        assert!(s.urls().is_empty());
    }

    #[test]
    fn concurrent_writers_do_not_lose_updates() {
        let s = Arc::new(DocumentStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let s = Arc::clone(&s);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let url = format!("https://t{t}.com/{i}");
                        s.put(url.clone(), doc(&url, "x"));
                        assert!(s.get(&url).is_some());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(s.len(), 400);
    }
}
