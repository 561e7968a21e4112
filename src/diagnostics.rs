/// Append-only diagnostic collection for one export run.
///
/// A fresh collector is constructed per run and threaded through the call
/// chain by reference; nothing here is global. Messages keep their stable
/// code, human text, and the name of the offending scene object so a user
/// can follow the trail back into the authoring tool.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCode {
    /// Container has no vertical quad
    E001,
    /// Quad has no material or no texture path
    E002,
    /// Texture not resolvable / dimensions unreadable
    E003,
    /// Layer group name has no integer prefix
    E004,
    /// Group percentages do not sum to 100
    E005,
    /// Zero valid trees under a root
    E006,
    /// Vertical quads do not share one 2D shader material
    E007,
    /// Complex objects do not share one 3D shader material
    E008,
    /// Directory creation or file write failed
    E009,
    /// No exportable roots in the scene
    E010,
    /// Container has more than one horizontal quad
    E011,
    /// Quad has no usable UV data
    E012,
    /// Settings value out of bounds
    E013,
    /// Unclassifiable mesh skipped
    W001,
    /// Informational notice
    I000,
    /// Run finished without errors
    S000,
}

impl MessageCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageCode::E001 => "E001",
            MessageCode::E002 => "E002",
            MessageCode::E003 => "E003",
            MessageCode::E004 => "E004",
            MessageCode::E005 => "E005",
            MessageCode::E006 => "E006",
            MessageCode::E007 => "E007",
            MessageCode::E008 => "E008",
            MessageCode::E009 => "E009",
            MessageCode::E010 => "E010",
            MessageCode::E011 => "E011",
            MessageCode::E012 => "E012",
            MessageCode::E013 => "E013",
            MessageCode::W001 => "W001",
            MessageCode::I000 => "I000",
            MessageCode::S000 => "S000",
        }
    }
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Success,
}

impl Severity {
    fn label(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
            Severity::Success => "SUCCESS",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub code: MessageCode,
    pub severity: Severity,
    pub text: String,
    /// Name of the offending scene object, when one exists.
    pub subject: Option<String>,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(
                f,
                "{} ({}): {}: {}",
                self.code,
                self.severity.label(),
                subject,
                self.text
            ),
            None => write!(f, "{} ({}): {}", self.code, self.severity.label(), self.text),
        }
    }
}

/// Ordered collector with optional console echo.
pub struct Diagnostics {
    messages: Vec<Message>,
    echo: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            echo: false,
        }
    }

    /// Collector that also prints each message as it is logged.
    pub fn with_console_echo() -> Self {
        Self {
            messages: Vec::new(),
            echo: true,
        }
    }

    pub fn error(&mut self, code: MessageCode, text: impl Into<String>, subject: Option<&str>) {
        self.push(Severity::Error, code, text.into(), subject);
    }

    pub fn warn(&mut self, code: MessageCode, text: impl Into<String>, subject: Option<&str>) {
        self.push(Severity::Warning, code, text.into(), subject);
    }

    pub fn info(&mut self, code: MessageCode, text: impl Into<String>, subject: Option<&str>) {
        self.push(Severity::Info, code, text.into(), subject);
    }

    pub fn success(&mut self, code: MessageCode, text: impl Into<String>, subject: Option<&str>) {
        self.push(Severity::Success, code, text.into(), subject);
    }

    fn push(&mut self, severity: Severity, code: MessageCode, text: String, subject: Option<&str>) {
        let message = Message {
            code,
            severity,
            text,
            subject: subject.map(str::to_string),
        };
        if self.echo {
            println!("{}", message);
        }
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn errors(&self) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .count()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}
