//! Scripted in-memory engine.
//!
//! Understands a small sample-rule language:
//!
//! ```text
//! # comment
//! rule=tag1,tag2:%-:word% %severity:word% %msg:rest%
//! ```
//!
//! Field types are `word` (up to the next space), `number` (decimal digits,
//! emitted as an integer) and `rest` (everything left). A field named `-` is
//! matched but not emitted.

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use crate::{status, Engine, LastError, NodeKind, ValueNode};

/// Owned value tree handed out by reference, like the real engine does.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FakeNode {
    Null,
    Bool(bool),
    Double(f64),
    Int(i64),
    Str(Vec<u8>),
    Array(Vec<Option<FakeNode>>),
    /// Keys in engine order; duplicates are allowed.
    Object(Vec<(Vec<u8>, Option<FakeNode>)>),
    /// A shape tag the bridge does not know.
    Opaque,
}

impl FakeNode {
    pub(crate) fn str(text: &str) -> Self {
        FakeNode::Str(text.as_bytes().to_vec())
    }

    pub(crate) fn object<const N: usize>(entries: [(&str, Option<FakeNode>); N]) -> Self {
        FakeNode::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.as_bytes().to_vec(), value))
                .collect(),
        )
    }
}

impl<'a> ValueNode<'a> for &'a FakeNode {
    type Entries = FakeEntries<'a>;

    fn kind(self) -> NodeKind {
        match self {
            FakeNode::Null => NodeKind::Null,
            FakeNode::Bool(_) => NodeKind::Boolean,
            FakeNode::Double(_) => NodeKind::Double,
            FakeNode::Int(_) => NodeKind::Int,
            FakeNode::Str(_) => NodeKind::String,
            FakeNode::Array(_) => NodeKind::Array,
            FakeNode::Object(_) => NodeKind::Object,
            FakeNode::Opaque => NodeKind::Unknown,
        }
    }

    fn as_bool(self) -> bool {
        matches!(self, FakeNode::Bool(true))
    }

    fn as_f64(self) -> f64 {
        match self {
            FakeNode::Double(v) => *v,
            _ => 0.0,
        }
    }

    fn as_i64(self) -> i64 {
        match self {
            FakeNode::Int(v) => *v,
            _ => 0,
        }
    }

    fn as_bytes(self) -> &'a [u8] {
        match self {
            FakeNode::Str(bytes) => bytes.as_slice(),
            _ => &[],
        }
    }

    fn array_len(self) -> usize {
        match self {
            FakeNode::Array(items) => items.len(),
            _ => 0,
        }
    }

    fn array_get(self, index: usize) -> Option<Self> {
        match self {
            FakeNode::Array(items) => items.get(index)?.as_ref(),
            _ => None,
        }
    }

    fn entries(self) -> FakeEntries<'a> {
        let entries: &'a [(Vec<u8>, Option<FakeNode>)] = match self {
            FakeNode::Object(entries) => entries.as_slice(),
            _ => &[],
        };
        FakeEntries { entries, pos: 0 }
    }
}

pub(crate) struct FakeEntries<'a> {
    entries: &'a [(Vec<u8>, Option<FakeNode>)],
    pos: usize,
}

impl<'a> Iterator for FakeEntries<'a> {
    type Item = (&'a [u8], Option<&'a FakeNode>);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.entries.get(self.pos)?;
        self.pos += 1;
        Some((key.as_slice(), value.as_ref()))
    }
}

/// Shared counters observed by tests after the engine has been moved into a context.
#[derive(Debug, Clone, Default)]
pub(crate) struct Probe {
    created: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    normalize_calls: Arc<AtomicUsize>,
    inputs: Arc<Mutex<Vec<Vec<u8>>>>,
    loaded: Arc<Mutex<Vec<PathBuf>>>,
}

impl Probe {
    pub(crate) fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub(crate) fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub(crate) fn normalize_calls(&self) -> usize {
        self.normalize_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn inputs(&self) -> Vec<Vec<u8>> {
        self.inputs.lock().unwrap().clone()
    }

    pub(crate) fn loaded_files(&self) -> Vec<String> {
        self.loaded
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }
}

/// Canned `normalize` outcome that bypasses rule matching.
#[derive(Debug, Clone)]
pub(crate) struct Forced {
    pub status: i32,
    pub message: Option<&'static str>,
    pub result: Option<FakeNode>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Setup {
    pub fail_alloc: bool,
    pub forced: Option<Forced>,
}

thread_local! {
    static NEXT: RefCell<(Setup, Probe)> = RefCell::new(Default::default());
}

/// Configures the next [`FakeEngine::create`] on this thread and returns its probe.
pub(crate) fn arm(setup: Setup) -> Probe {
    let probe = Probe::default();
    NEXT.with(|next| *next.borrow_mut() = (setup, probe.clone()));
    probe
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum FieldType {
    Word,
    Number,
    Rest,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Token {
    Literal(String),
    Field { name: String, ty: FieldType },
}

#[derive(Debug, Clone)]
struct Rule {
    tags: Vec<String>,
    tokens: Vec<Token>,
}

pub(crate) struct FakeEngine {
    sink: Option<LastError>,
    rules: Vec<Rule>,
    result: Option<FakeNode>,
    setup: Setup,
    probe: Probe,
}

impl FakeEngine {
    fn report(&self, message: &str) {
        if let Some(sink) = self.sink.as_ref() {
            sink.record(message.as_bytes());
        }
    }

    fn add_rules(&mut self, origin: &str, text: &str) -> i32 {
        let mut parsed = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') || line.starts_with("version=") {
                continue;
            }
            match parse_rule(line) {
                Ok(rule) => parsed.push(rule),
                Err(reason) => {
                    self.report(&format!("{origin}, line {}: {reason}", idx + 1));
                    return status::BADCONFIG;
                }
            }
        }
        self.rules.extend(parsed);
        status::OK
    }
}

impl Engine for FakeEngine {
    type Node<'a> = &'a FakeNode;

    fn create() -> Option<Self> {
        let (setup, probe) = NEXT.with(|next| next.take());
        if setup.fail_alloc {
            return None;
        }
        probe.created.fetch_add(1, Ordering::SeqCst);
        Some(Self {
            sink: None,
            rules: Vec::new(),
            result: None,
            setup,
            probe,
        })
    }

    fn set_error_callback(&mut self, sink: LastError) {
        self.sink = Some(sink);
    }

    fn load_samples(&mut self, path: &Path) -> i32 {
        self.probe.loaded.lock().unwrap().push(path.to_path_buf());
        match fs::read_to_string(path) {
            Ok(text) => self.add_rules(&format!("rulebase file {}", path.display()), &text),
            Err(err) => {
                self.report(&format!("cannot open rulebase file {}: {err}", path.display()));
                -2
            }
        }
    }

    fn load_samples_from_string(&mut self, rules: &str) -> i32 {
        self.add_rules("rulebase string", rules)
    }

    fn normalize(&mut self, input: &[u8]) -> (i32, Option<&FakeNode>) {
        self.probe.normalize_calls.fetch_add(1, Ordering::SeqCst);
        self.probe.inputs.lock().unwrap().push(input.to_vec());

        if let Some(forced) = self.setup.forced.clone() {
            if let Some(message) = forced.message {
                self.report(message);
            }
            self.result = forced.result;
            return (forced.status, self.result.as_ref());
        }

        let text = String::from_utf8_lossy(input);
        let matched = self
            .rules
            .iter()
            .find_map(|rule| match_rule(rule, &text).map(|fields| (rule, fields)));

        match matched {
            Some((rule, mut fields)) => {
                if !rule.tags.is_empty() {
                    let tags = rule.tags.iter().map(|t| Some(FakeNode::str(t))).collect();
                    fields.push((b"event.tags".to_vec(), Some(FakeNode::Array(tags))));
                }
                self.result = Some(FakeNode::Object(fields));
                (status::OK, self.result.as_ref())
            }
            None => {
                self.result = Some(FakeNode::object([
                    ("originalmsg", Some(FakeNode::str(&text))),
                    ("unparsed-data", Some(FakeNode::str(&text))),
                ]));
                (status::WRONGPARSER, self.result.as_ref())
            }
        }
    }

    fn version() -> String {
        "2.0.6-fake".to_string()
    }
}

impl Drop for FakeEngine {
    fn drop(&mut self) {
        self.probe.released.fetch_add(1, Ordering::SeqCst);
    }
}

fn parse_rule(line: &str) -> Result<Rule, String> {
    let body = line
        .strip_prefix("rule=")
        .ok_or_else(|| format!("invalid record type: {line}"))?;
    let (tags, pattern) = body
        .split_once(':')
        .ok_or_else(|| "missing ':' after tags".to_string())?;
    let tags = tags
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let mut tokens = Vec::new();
    let mut rest = pattern;
    while !rest.is_empty() {
        match rest.find('%') {
            Some(0) => {
                let end = rest[1..]
                    .find('%')
                    .ok_or_else(|| "unterminated field".to_string())?;
                let field = &rest[1..1 + end];
                let (name, ty) = field
                    .split_once(':')
                    .ok_or_else(|| format!("field without type: {field}"))?;
                if name.is_empty() {
                    return Err("field without name".to_string());
                }
                let ty = match ty {
                    "word" => FieldType::Word,
                    "number" => FieldType::Number,
                    "rest" => FieldType::Rest,
                    other => return Err(format!("unknown field type: {other}")),
                };
                tokens.push(Token::Field {
                    name: name.to_string(),
                    ty,
                });
                rest = &rest[end + 2..];
            }
            Some(idx) => {
                tokens.push(Token::Literal(rest[..idx].to_string()));
                rest = &rest[idx..];
            }
            None => {
                tokens.push(Token::Literal(rest.to_string()));
                rest = "";
            }
        }
    }
    Ok(Rule { tags, tokens })
}

fn match_rule(rule: &Rule, input: &str) -> Option<Vec<(Vec<u8>, Option<FakeNode>)>> {
    let mut fields = Vec::new();
    let mut rest = input;
    for token in &rule.tokens {
        match token {
            Token::Literal(lit) => rest = rest.strip_prefix(lit.as_str())?,
            Token::Field { name, ty } => {
                let len = match ty {
                    FieldType::Word => rest.find(' ').unwrap_or(rest.len()),
                    FieldType::Number => rest
                        .find(|c: char| !c.is_ascii_digit())
                        .unwrap_or(rest.len()),
                    FieldType::Rest => rest.len(),
                };
                if len == 0 && *ty != FieldType::Rest {
                    return None;
                }
                let (taken, remaining) = rest.split_at(len);
                let node = match ty {
                    FieldType::Number => FakeNode::Int(taken.parse().ok()?),
                    _ => FakeNode::str(taken),
                };
                if name != "-" {
                    fields.push((name.as_bytes().to_vec(), Some(node)));
                }
                rest = remaining;
            }
        }
    }
    rest.is_empty().then_some(fields)
}

/// Writes `contents` to `dir/name` and returns the path.
pub(crate) fn write_rulebase(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

pub(crate) const SEVERITY_RULES: &str = "rule=:%-:word% %severity:word% %msg:rest%\n";
