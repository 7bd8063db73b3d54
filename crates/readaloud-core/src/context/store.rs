//! ContextStore: the ordered conversation log with scoped mutation.

use std::ops::Deref;

use tracing::debug;

use readaloud_types::llm::{Message, MessageRole};

/// One entry of the conversation log.
pub type ContextEntry = Message;

/// Ordered conversation log. The first entry is always the single system
/// instruction; it is never removed.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    entries: Vec<ContextEntry>,
}

impl ConversationContext {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            entries: vec![Message::system(system_instruction)],
        }
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the system instruction is permanent.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn system_instruction(&self) -> &str {
        &self.entries[0].content
    }

    /// Clone the log into the message list of a request.
    pub fn to_messages(&self) -> Vec<Message> {
        self.entries.clone()
    }
}

/// What happens to the model's reply once a page has been read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Nothing outlives the call. The context never grows.
    #[default]
    Discard,
    /// Keep a text-only copy of the page instruction and the reply, so later
    /// pages see earlier text. At most `max_pages` exchanges are kept; the
    /// oldest are evicted first.
    RetainReplies { max_pages: usize },
}

/// Owns the session's [`ConversationContext`].
#[derive(Debug, Clone)]
pub struct ContextStore {
    context: ConversationContext,
    retention: RetentionPolicy,
}

impl ContextStore {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            context: ConversationContext::new(system_instruction),
            retention: RetentionPolicy::Discard,
        }
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn len(&self) -> usize {
        self.context.len()
    }

    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
    }

    /// Number of page exchanges currently retained after the system instruction.
    pub fn retained_pages(&self) -> usize {
        (self.context.len() - 1) / 2
    }

    /// Append `turn` and return a guard that removes it when dropped.
    ///
    /// The guard restores the log to exactly its pre-call length, whether the
    /// caller returns normally, bails out with `?`, panics, or has its future
    /// cancelled mid-await.
    pub fn push_transient(&mut self, turn: ContextEntry) -> TransientTurn<'_> {
        let base_len = self.context.entries.len();
        self.context.entries.push(turn);
        TransientTurn {
            context: &mut self.context,
            base_len,
        }
    }

    /// Run `op` against the context with `turn` appended, then retract it.
    pub async fn with_transient_turn<T, F>(&mut self, turn: ContextEntry, op: F) -> T
    where
        F: AsyncFnOnce(&ConversationContext) -> T,
    {
        let guard = self.push_transient(turn);
        let output = op(&*guard).await;
        drop(guard);
        output
    }

    /// Record a completed page exchange according to the retention policy.
    ///
    /// `instruction` is the text of the page instruction (without the
    /// image); `reply` is what the model returned. No-op under
    /// [`RetentionPolicy::Discard`].
    pub fn retain_exchange(&mut self, instruction: &str, reply: &str) {
        let RetentionPolicy::RetainReplies { max_pages } = self.retention else {
            return;
        };
        if max_pages == 0 {
            return;
        }

        let entries = &mut self.context.entries;
        entries.push(Message::user(instruction));
        entries.push(Message::assistant(reply));

        while (entries.len() - 1) / 2 > max_pages {
            // Oldest exchange sits right after the system instruction.
            entries.drain(1..3);
        }

        debug!(
            retained = (entries.len() - 1) / 2,
            max_pages, "Retained page exchange in context"
        );
    }
}

/// Scoped transient turn. Dereferences to the full context (including the
/// transient turn) and truncates the log back to its previous length on drop.
pub struct TransientTurn<'a> {
    context: &'a mut ConversationContext,
    base_len: usize,
}

impl TransientTurn<'_> {
    /// The turn appended by this guard.
    pub fn turn(&self) -> &ContextEntry {
        &self.context.entries[self.base_len]
    }
}

impl Deref for TransientTurn<'_> {
    type Target = ConversationContext;

    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl Drop for TransientTurn<'_> {
    fn drop(&mut self) {
        self.context.entries.truncate(self.base_len);
        debug_assert_eq!(
            self.context.entries.first().map(|e| e.role),
            Some(MessageRole::System)
        );
    }
}
