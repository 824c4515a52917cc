//! Expansion of `<% ... %>` directives in template documents.

use super::conditions::ConditionStack;
use super::cursor::Cursor;
use super::provider::SymbolProvider;
use super::symbols::{SymbolKind, SymbolTable};
use tracing::debug;

/// Errors reported before an expansion starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// The document cannot be expanded (it contains a NUL byte).
    #[error("invalid input: template documents must not contain NUL bytes")]
    InvalidInput,
}

/// State of one document expansion.
struct TemplateGenerator<'a, P: ?Sized> {
    provider: &'a mut P,
    symbols: SymbolTable,
    conditions: ConditionStack,
    output: &'a mut Vec<u8>,
}

impl<'a, P: SymbolProvider + ?Sized> TemplateGenerator<'a, P> {
    fn new(provider: &'a mut P, output: &'a mut Vec<u8>) -> Self {
        output.clear();
        Self {
            provider,
            symbols: SymbolTable::new(),
            conditions: ConditionStack::new(),
            output,
        }
    }

    /// Append to the output if every enclosing condition holds.
    fn emit(&mut self, bytes: &[u8]) {
        if self.conditions.is_satisfied() {
            self.output.extend_from_slice(bytes);
        }
    }

    fn run(&mut self, input: &[u8]) {
        let mut cursor = Cursor::new(input);

        while !cursor.is_at_end() {
            let start = cursor.position();
            let Some(percent) = cursor.find(b'%') else {
                self.emit(cursor.remaining());
                break;
            };

            // A tag opener must lie inside the unconsumed input.
            if percent > start && cursor.byte_at(percent - 1) == Some(b'<') {
                self.emit(&input[start..percent - 1]);
                let body = percent + 1;
                cursor.seek(body);
                self.process_directive(&mut cursor);
                // The tag ends at the first `%>` after `<%`, whatever the
                // directive consumed.
                cursor.seek(body);
                cursor.skip_past_close();
            } else {
                self.emit(&input[start..=percent]);
                cursor.seek(percent + 1);
            }
        }

        if !self.conditions.is_empty() {
            debug!(
                depth = self.conditions.depth(),
                "Template ended inside an open If block"
            );
        }
    }

    /// Handle the body of one tag; the cursor sits just past `<%`.
    fn process_directive(&mut self, cursor: &mut Cursor<'_>) {
        let first = symbol_name(cursor.read_symbol());

        match self.symbols.kind(&first) {
            SymbolKind::If => {
                let condition = symbol_name(cursor.read_symbol());
                let value = self.test_symbol(&condition).unwrap_or(false);
                self.conditions.push(value);
            }
            SymbolKind::Else => self.conditions.flip(),
            SymbolKind::EndIf => self.conditions.pop(),
            SymbolKind::Output => {
                let name = symbol_name(cursor.read_symbol());
                self.output_symbol(&name);
            }
            SymbolKind::Variable | SymbolKind::Invalid => self.output_symbol(&first),
        }
    }

    fn output_symbol(&mut self, name: &str) {
        if let Some(text) = self.resolve_symbol(name) {
            self.emit(text.as_bytes());
        }
    }

    /// Resolve a data symbol to text, promoting it on first success.
    fn resolve_symbol(&mut self, name: &str) -> Option<String> {
        let kind = self.symbols.kind(name);
        if name.is_empty() || !kind.is_data() {
            return None;
        }

        let value = self.provider.resolve_string(name);
        self.record_resolution(name, kind, value.is_some());
        value
    }

    /// Resolve a data symbol to a condition, promoting it on first success.
    fn test_symbol(&mut self, name: &str) -> Option<bool> {
        let kind = self.symbols.kind(name);
        if name.is_empty() || !kind.is_data() {
            return None;
        }

        let value = self.provider.resolve_boolean(name);
        self.record_resolution(name, kind, value.is_some());
        value
    }

    fn record_resolution(&mut self, name: &str, kind: SymbolKind, resolved: bool) {
        if !resolved {
            debug!(symbol = name, "Unknown template symbol");
        } else if kind == SymbolKind::Invalid {
            self.symbols.promote(name);
        }
    }
}

fn symbol_name(token: &[u8]) -> String {
    String::from_utf8_lossy(token).into_owned()
}

/// Expand `input` into `output`, resolving symbols through `provider`.
///
/// `output` is cleared first. Unresolvable symbols expand to nothing and
/// unbalanced `If`/`EndIf` directives are tolerated; the only failure is
/// [`TemplateError::InvalidInput`], returned before anything is written.
pub fn generate_output<P>(
    input: &[u8],
    output: &mut Vec<u8>,
    provider: &mut P,
) -> Result<(), TemplateError>
where
    P: SymbolProvider + ?Sized,
{
    if memchr::memchr(0, input).is_some() {
        return Err(TemplateError::InvalidInput);
    }

    TemplateGenerator::new(provider, output).run(input);
    Ok(())
}

/// Expand `input` into a freshly allocated buffer.
pub fn render<P>(input: &[u8], provider: &mut P) -> Result<Vec<u8>, TemplateError>
where
    P: SymbolProvider + ?Sized,
{
    let mut output = Vec::with_capacity(input.len() + 1);
    generate_output(input, &mut output, provider)?;
    Ok(output)
}
