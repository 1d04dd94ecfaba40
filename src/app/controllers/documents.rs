use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::app::domain::document::{Document, DocumentId, ReadOptions, SaveOperation};
use crate::app::domain::format::DocumentFormat;
use crate::app::domain::preferences::Preferences;
use crate::app::infrastructure::error::DocumentError;
use crate::app::services::codec::CodecRegistry;

/// Open documents and which one is frontmost.
pub struct DocumentController {
    documents: Vec<Document>,
    active_id: Option<DocumentId>,
    next_id: u64,
    untitled_counter: u32,
    codecs: CodecRegistry,
    prefs: Rc<RefCell<Preferences>>,
}

impl DocumentController {
    pub fn new(prefs: Rc<RefCell<Preferences>>) -> Self {
        Self::with_codecs(prefs, CodecRegistry::default())
    }

    pub fn with_codecs(prefs: Rc<RefCell<Preferences>>, codecs: CodecRegistry) -> Self {
        Self {
            documents: Vec::new(),
            active_id: None,
            next_id: 1,
            untitled_counter: 0,
            codecs,
            prefs,
        }
    }

    fn next_document_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn new_document(&mut self) -> DocumentId {
        self.untitled_counter += 1;
        let id = self.next_document_id();
        let doc = Document::new_untitled(id, self.untitled_counter, &self.prefs.borrow());
        self.documents.push(doc);
        self.active_id = Some(id);
        id
    }

    /// The empty document created at launch. It is transient: the first file
    /// opened replaces it unless the user has typed into it.
    pub fn open_untitled_on_launch(&mut self) -> DocumentId {
        let id = self.new_document();
        if let Some(doc) = self.doc_by_id_mut(id) {
            doc.set_transient(true);
        }
        id
    }

    /// Open `path` with the current read preferences.
    pub fn open_document(&mut self, path: &Path) -> Result<DocumentId, DocumentError> {
        let options = ReadOptions::from_preferences(&self.prefs.borrow());
        self.open_document_with(path, &options)
    }

    pub fn open_document_with(
        &mut self,
        path: &Path,
        options: &ReadOptions,
    ) -> Result<DocumentId, DocumentError> {
        if let Some(id) = self.find_by_path(path) {
            self.active_id = Some(id);
            return Ok(id);
        }

        let id = self.next_document_id();
        let doc = Document::open(id, path, options, &self.prefs.borrow(), &self.codecs)?;

        let replaceable = self
            .documents
            .iter()
            .position(|d| d.is_transient_and_can_be_replaced());
        match replaceable {
            Some(idx) => {
                log::debug!(
                    "Replacing transient document {} with {}",
                    self.documents[idx].display_name(),
                    path.display()
                );
                self.documents[idx] = doc;
            }
            None => self.documents.push(doc),
        }
        self.active_id = Some(id);
        Ok(id)
    }

    fn find_mut(documents: &mut [Document], id: DocumentId) -> Result<&mut Document, DocumentError> {
        documents
            .iter_mut()
            .find(|d| d.id() == id)
            .ok_or(DocumentError::UnknownDocument(id.0))
    }

    /// Save in place. Lossy or converted documents need `confirmed`.
    pub fn save(&mut self, id: DocumentId, confirmed: bool) -> Result<(), DocumentError> {
        let prefs = self.prefs.borrow();
        let doc = Self::find_mut(&mut self.documents, id)?;
        doc.save(confirmed, &prefs, &self.codecs)
    }

    pub fn save_as(
        &mut self,
        id: DocumentId,
        path: &Path,
        format: DocumentFormat,
        operation: SaveOperation,
    ) -> Result<(), DocumentError> {
        let prefs = self.prefs.borrow();
        let doc = Self::find_mut(&mut self.documents, id)?;
        doc.write_to(path, format, operation, &prefs, &self.codecs)
    }

    pub fn revert(&mut self, id: DocumentId) -> Result<(), DocumentError> {
        let doc = Self::find_mut(&mut self.documents, id)?;
        doc.revert(&self.codecs)
    }

    /// Remove a document by id. Activates the nearest neighbor.
    pub fn close(&mut self, id: DocumentId) {
        let idx = match self.documents.iter().position(|d| d.id() == id) {
            Some(i) => i,
            None => return,
        };
        self.documents.remove(idx);

        if self.active_id == Some(id) {
            self.active_id = if self.documents.is_empty() {
                None
            } else {
                Some(self.documents[idx.min(self.documents.len() - 1)].id())
            };
        }
    }

    /// Documents with unsaved edits, for the quit prompt.
    pub fn unsaved_documents(&self) -> Vec<DocumentId> {
        self.documents
            .iter()
            .filter(|d| d.is_dirty())
            .map(|d| d.id())
            .collect()
    }

    pub fn active_doc(&self) -> Option<&Document> {
        let active_id = self.active_id?;
        self.doc_by_id(active_id)
    }

    pub fn active_doc_mut(&mut self) -> Option<&mut Document> {
        let active_id = self.active_id?;
        self.doc_by_id_mut(active_id)
    }

    pub fn set_active(&mut self, id: DocumentId) {
        if self.documents.iter().any(|d| d.id() == id) {
            self.active_id = Some(id);
        }
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active_id
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn find_by_path(&self, path: &Path) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|d| d.file_path() == Some(path))
            .map(|d| d.id())
    }

    pub fn doc_by_id(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id() == id)
    }

    pub fn doc_by_id_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id() == id)
    }

    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn controller() -> DocumentController {
        DocumentController::new(Rc::new(RefCell::new(Preferences::default())))
    }

    #[test]
    fn test_new_documents_are_numbered() {
        let mut dc = controller();
        let a = dc.new_document();
        let b = dc.new_document();
        assert_eq!(dc.doc_by_id(a).unwrap().display_name(), "Untitled");
        assert_eq!(dc.doc_by_id(b).unwrap().display_name(), "Untitled 2");
        assert_eq!(dc.active_id(), Some(b));
    }

    #[test]
    fn test_open_replaces_transient_untouched_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "hello").unwrap();

        let mut dc = controller();
        dc.open_untitled_on_launch();
        let id = dc.open_document(&path).unwrap();
        assert_eq!(dc.count(), 1);
        assert_eq!(dc.active_doc().unwrap().id(), id);
        assert_eq!(dc.active_doc().unwrap().text(), "hello");
        assert!(dc.unsaved_documents().is_empty());
    }

    #[test]
    fn test_open_keeps_edited_transient_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "hello").unwrap();

        let mut dc = controller();
        let launch = dc.open_untitled_on_launch();
        dc.doc_by_id_mut(launch).unwrap().insert(0, "draft").unwrap();
        dc.open_document(&path).unwrap();
        assert_eq!(dc.count(), 2);
        assert_eq!(dc.unsaved_documents(), vec![launch]);
    }

    #[test]
    fn test_open_same_path_activates_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "x").unwrap();

        let mut dc = controller();
        let first = dc.open_document(&path).unwrap();
        dc.new_document();
        let again = dc.open_document(&path).unwrap();
        assert_eq!(first, again);
        assert_eq!(dc.count(), 2);
        assert_eq!(dc.active_id(), Some(first));
    }

    #[test]
    fn test_failed_open_leaves_documents_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut dc = controller();
        let launch = dc.open_untitled_on_launch();
        assert!(dc.open_document(&dir.path().join("nope.txt")).is_err());
        assert_eq!(dc.count(), 1);
        assert_eq!(dc.active_id(), Some(launch));
    }

    #[test]
    fn test_close_activates_neighbor() {
        let mut dc = controller();
        let a = dc.new_document();
        let b = dc.new_document();
        let c = dc.new_document();
        dc.set_active(b);
        dc.close(b);
        assert_eq!(dc.active_id(), Some(c));
        dc.close(c);
        assert_eq!(dc.active_id(), Some(a));
        dc.close(a);
        assert_eq!(dc.active_id(), None);
    }

    #[test]
    fn test_save_as_then_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.rtf");
        let mut dc = controller();
        let id = dc.new_document();
        dc.doc_by_id_mut(id).unwrap().set_text("body").unwrap();
        dc.save_as(id, &path, DocumentFormat::RichText, SaveOperation::SaveAs).unwrap();
        assert_eq!(dc.find_by_path(&path), Some(id));

        dc.doc_by_id_mut(id).unwrap().insert(4, " more").unwrap();
        dc.save(id, false).unwrap();
        dc.revert(id).unwrap();
        assert_eq!(dc.doc_by_id(id).unwrap().text(), "body more");
    }

    #[test]
    fn test_unknown_id_is_distinct_from_missing_location() {
        let dir = tempfile::tempdir().unwrap();
        let mut dc = controller();
        let id = dc.new_document();
        assert!(matches!(dc.save(id, false), Err(DocumentError::NoLocation)));

        let missing = DocumentId(999);
        assert!(matches!(dc.save(missing, false), Err(DocumentError::UnknownDocument(999))));
        assert!(matches!(
            dc.save_as(missing, &dir.path().join("x.rtf"), DocumentFormat::RichText, SaveOperation::SaveAs),
            Err(DocumentError::UnknownDocument(999))
        ));
        assert!(matches!(dc.revert(missing), Err(DocumentError::UnknownDocument(999))));
    }
}
