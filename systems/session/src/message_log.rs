//! Ordered log of human-readable messages.

/// Run of consecutive identical messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Repeated message.
    pub message: &'a str,
    /// Number of consecutive repetitions.
    pub count: usize,
}

impl Chunk<'_> {
    /// Formats the chunk as `message` or `message xN` when repeated.
    #[must_use]
    pub fn render(&self) -> String {
        if self.count > 1 {
            format!("{} x{}", self.message, self.count)
        } else {
            self.message.to_owned()
        }
    }
}

/// Messages in the order they were emitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageLog {
    messages: Vec<String>,
}

impl MessageLog {
    /// Appends a message.
    pub fn push<M>(&mut self, message: M)
    where
        M: Into<String>,
    {
        self.messages.push(message.into());
    }

    /// Every message, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Collapses consecutive identical messages.
    #[must_use]
    pub fn chunks(&self) -> Vec<Chunk<'_>> {
        let mut chunks: Vec<Chunk<'_>> = Vec::new();
        for message in &self.messages {
            let message = message.as_str();
            if let Some(last) = chunks.last_mut().filter(|last| last.message == message) {
                last.count += 1;
                continue;
            }
            chunks.push(Chunk { message, count: 1 });
        }
        chunks
    }

    /// The last `count` chunks, rendered for display.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<String> {
        let chunks = self.chunks();
        let start = chunks.len().saturating_sub(count);
        chunks[start..].iter().map(Chunk::render).collect()
    }
}
