/// Where the next sequenced search for a document may start.
///
/// Transcripts of one document arrive in reading order, so each match's end
/// offset bounds the next query's search from below. The state is owned by
/// the caller and passed to every `align` call; only a successful match
/// moves it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequencingState {
    last_document_key: Option<String>,
    last_end_offset: usize,
}

impl SequencingState {
    pub fn new() -> Self { Self::default() }

    pub fn last_document_key(&self) -> Option<&str> { self.last_document_key.as_deref() }

    pub fn last_end_offset(&self) -> usize { self.last_end_offset }

    /// Lower bound of the search region. Anything but a sequenced query on
    /// the same document starts from zero.
    pub fn search_start(&self, key: &str, sequenced: bool) -> usize {
        if sequenced && self.last_document_key.as_deref() == Some(key) {
            self.last_end_offset
        } else {
            0
        }
    }

    pub fn advance(&mut self, key: &str, end_offset: usize) {
        if self.last_document_key.as_deref() != Some(key) {
            self.last_document_key = Some(key.to_string());
        }
        self.last_end_offset = end_offset;
    }

    pub fn reset(&mut self) { *self = Self::default(); }
}
