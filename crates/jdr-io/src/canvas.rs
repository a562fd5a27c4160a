use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jdr_types::CanvasSettings;
use tracing::{error, info, trace, warn};

/// A user-facing message published while saving or loading.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Info(String),
    Warning(String),
    Error(String),
    Progress { done: usize, total: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
    Progress,
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Info(_) => MessageKind::Info,
            Self::Warning(_) => MessageKind::Warning,
            Self::Error(_) => MessageKind::Error,
            Self::Progress { .. } => MessageKind::Progress,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info(text) | Self::Warning(text) | Self::Error(text) => f.write_str(text),
            Self::Progress { done, total } => write!(f, "{done}/{total}"),
        }
    }
}

/// Receives messages from the codecs. The codecs never log or prompt on
/// their own; everything user-facing goes through this interface.
pub trait MessageSystem: Send + Sync {
    fn publish(&self, message: Message);
}

/// Forwards every message to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingMessages;

impl MessageSystem for TracingMessages {
    fn publish(&self, message: Message) {
        match message {
            Message::Info(text) => info!("{text}"),
            Message::Warning(text) => warn!("{text}"),
            Message::Error(text) => error!("{text}"),
            Message::Progress { done, total } => trace!(done, total, "progress"),
        }
    }
}

/// Records messages in memory. Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The log stays readable after a publisher panicked.
    fn entries(&self) -> MutexGuard<'_, Vec<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.entries().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                Message::Warning(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, kind: MessageKind) -> usize {
        self.messages().iter().filter(|m| m.kind() == kind).count()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

impl MessageSystem for MessageLog {
    fn publish(&self, message: Message) {
        self.entries().push(message);
    }
}

/// Localised message templates. `{0}`, `{1}`, ... are replaced by arguments.
#[derive(Clone, Debug)]
pub struct Dictionary {
    entries: HashMap<String, String>,
}

impl Dictionary {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The built-in English messages.
    pub fn english() -> Self {
        let mut dict = Self::empty();
        for (key, text) in [
            ("io.unsupported", "{0} is not supported in version {1}; saving as {2}"),
            ("io.omitted", "{0} is not supported in version {1} and has been omitted"),
            (
                "io.paper_only",
                "Paper-only settings are not supported in version {0}; saving all settings",
            ),
            ("io.missing_bitmap", "Cannot find bitmap '{0}'"),
            ("io.discarded_bitmap", "Bitmap '{0}' discarded"),
            (
                "io.anchor_bug",
                "Version 1.7 anchor index bug detected (found {0} for a path of {1} segments); skipping anchors",
            ),
            (
                "io.lossy_charset",
                "The file is not valid {0} and version {1} does not declare a charset; unreadable characters were replaced",
            ),
            ("io.loaded", "Loaded {0} objects"),
        ] {
            dict.insert(key, text);
        }
        dict
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// The template for `key` with arguments substituted. Unknown keys are
    /// returned verbatim followed by the arguments.
    pub fn format(&self, key: &str, args: &[&dyn fmt::Display]) -> String {
        match self.entries.get(key) {
            Some(template) => {
                let mut text = template.clone();
                for (i, arg) in args.iter().enumerate() {
                    text = text.replace(&format!("{{{i}}}"), &arg.to_string());
                }
                text
            }
            None => {
                let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                if rendered.is_empty() {
                    key.to_string()
                } else {
                    format!("{key}: {}", rendered.join(", "))
                }
            }
        }
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::english()
    }
}

/// Context supplied by the application for a save or load: the canvas
/// settings, a message sink and the localisation dictionary.
pub struct CanvasGraphics {
    pub settings: CanvasSettings,
    pub dictionary: Dictionary,
    messages: Box<dyn MessageSystem>,
}

impl CanvasGraphics {
    pub fn new() -> Self {
        Self::with_messages(TracingMessages)
    }

    pub fn with_messages(messages: impl MessageSystem + 'static) -> Self {
        Self {
            settings: CanvasSettings::default(),
            dictionary: Dictionary::english(),
            messages: Box::new(messages),
        }
    }

    pub fn with_settings(mut self, settings: CanvasSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn publish(&self, message: Message) {
        self.messages.publish(message);
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.publish(Message::Warning(text.into()));
    }

    pub fn progress(&self, done: usize, total: usize) {
        self.publish(Message::Progress { done, total });
    }

    /// A localised message for `key`.
    pub fn message(&self, key: &str, args: &[&dyn fmt::Display]) -> String {
        self.dictionary.format(key, args)
    }
}

impl Default for CanvasGraphics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CanvasGraphics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasGraphics")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poisoned_log_keeps_recording() {
        let log = MessageLog::new();
        log.publish(Message::Warning("before".into()));
        let shared = log.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.messages.lock().unwrap();
            panic!("publisher failed");
        })
        .join();
        assert!(log.messages.is_poisoned());

        log.publish(Message::Warning("after".into()));
        assert_eq!(log.warnings(), vec!["before", "after"]);
        log.clear();
        assert!(log.messages().is_empty());
    }

    #[test]
    fn dictionary_substitutes_arguments() {
        let dict = Dictionary::english();
        let text = dict.format("io.unsupported", &[&"radial paint", &"1.0", &"gradient paint"]);
        assert_eq!(
            text,
            "radial paint is not supported in version 1.0; saving as gradient paint"
        );
    }

    #[test]
    fn unknown_key_falls_back() {
        let dict = Dictionary::empty();
        assert_eq!(dict.format("x.y", &[]), "x.y");
        assert_eq!(dict.format("x.y", &[&1, &"a"]), "x.y: 1, a");
    }

    #[test]
    fn message_log_is_shared_between_clones() {
        let log = MessageLog::new();
        let canvas = CanvasGraphics::with_messages(log.clone());
        canvas.warning("first");
        canvas.progress(1, 2);
        assert_eq!(log.warnings(), vec!["first".to_string()]);
        assert_eq!(log.count(MessageKind::Progress), 1);
        log.clear();
        assert!(log.messages().is_empty());
    }
}
