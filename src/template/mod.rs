//! Template interpreter for monitoring pages.
//!
//! Documents are plain HTML with embedded directive tags:
//!
//! - `<%= name %>` or `<% name %>` writes the value of a data symbol
//! - `<% If name %>`, `<% Else %>` and `<% EndIf %>` gate the enclosed text
//!
//! Values come from a [`SymbolProvider`]; text inside nested `If` blocks is
//! written only when every enclosing condition holds.
//!
//! ```
//! use pi_chart::template::{render, StaticSymbols};
//!
//! let mut symbols = StaticSymbols::new().with_string("gpio.4", "HIGH");
//! let page = render(b"Pin 4 is <%= gpio.4 %>", &mut symbols).unwrap();
//! assert_eq!(page, b"Pin 4 is HIGH");
//! ```

pub mod conditions;
mod cursor;
pub mod generator;
pub mod provider;
pub mod symbols;

pub(crate) use cursor::is_space;

pub use conditions::{ConditionStack, MAX_CONDITION_DEPTH};
pub use generator::{generate_output, render, TemplateError};
pub use provider::{StaticSymbols, SymbolProvider};
pub use symbols::{SymbolKind, SymbolTable};
