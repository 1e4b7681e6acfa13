mod error_kind;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Implements `calx_error::ErrorKind` for a struct.
///
/// The error is described by an `#[error(...)]` attribute holding `tag = expression` pairs:
/// ```
/// use calx_attrs::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(
///     message = format!("`{}` is not a number", name),
///     labels = ["this value"],
///     help = "numbers are written with digits",
/// )]
/// pub struct NotANumber {
///     name: String,
/// }
/// ```
///
/// - `message` (required): the headline of the report.
/// - `labels`: anything iterable whose items implement `ToString`, giving one label per span of
///   the error. An empty label highlights its span without text.
/// - `help`: a note telling the user how to fix the problem. If it is an `Option`, `None` means
///   no note.
///
/// The expressions can name the struct's fields directly. Tuple structs are rejected.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error_kind::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
