//! Proc macros for element-forms: `element!` HTML-like element composition.
//!
//! This crate is not meant to be used directly. Enable the `macros` feature on `element-forms`.

use proc_macro::TokenStream;

mod element_macro;

/// HTML-like element composition macro.
///
/// Transforms markup into `ElementSpec` builder calls.
///
/// # Syntax
///
/// - `<tag />`: element with no children
/// - `<tag attr="val"> ... </tag>`: element with children
/// - children may be elements, string literals (text), or `{expr}` (anything
///   convertible into `Addable`)
///
/// # Attributes
///
/// - `id` and `class` become `.id(..)` and `.class(..)`
/// - `text` and `html` set the content
/// - `name="value"` or `name={expr}` becomes `.attr("name", value)`
/// - a bare `name` becomes `.attr("name", true)`
///
/// One root element yields an `ElementSpec`; several yield a `Vec<ElementSpec>`.
///
/// # Example
///
/// ```ignore
/// let unit = element! {
///     <div class="ce-unit">
///         <label for="ce-age1">"Age"</label>
///         <div>
///             <input id="ce-age1" type="number" value={age} required />
///         </div>
///     </div>
/// };
/// ```
#[proc_macro]
pub fn element(input: TokenStream) -> TokenStream {
    element_macro::element_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
